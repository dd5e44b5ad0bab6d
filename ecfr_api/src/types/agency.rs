use serde::{Deserialize, Serialize};

/// Body of `GET /api/admin/v1/agencies.json`.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct AgenciesResponse {
    #[serde(default)]
    pub agencies: Vec<AgencyRecord>,
}

/// An agency as published by the directory. Sub-agencies nest under `children`.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct AgencyRecord {
    pub name: String,
    #[serde(default)]
    pub short_name: Option<String>,
    #[serde(default)]
    pub display_name: Option<String>,
    pub slug: String,
    #[serde(default)]
    pub children: Vec<AgencyRecord>,
    #[serde(default)]
    pub cfr_references: Vec<CfrReferenceRecord>,
}

/// A title/chapter pointer into the CFR. Only `title` is always present.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct CfrReferenceRecord {
    pub title: u32,
    #[serde(default)]
    pub chapter: Option<String>,
    #[serde(default)]
    pub subtitle: Option<String>,
    #[serde(default)]
    pub subchapter: Option<String>,
    #[serde(default)]
    pub part: Option<String>,
}
