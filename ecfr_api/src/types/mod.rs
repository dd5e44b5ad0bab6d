mod title;
pub use self::title::{TitleSummary, TitlesResponse};

mod agency;
pub use self::agency::{AgenciesResponse, AgencyRecord, CfrReferenceRecord};

mod search;
pub use self::search::{SearchMeta, SearchResponse, SearchResult};

use serde::{Deserialize, Deserializer};

/// Keeps a field only when it is a JSON string; any other shape becomes `None`.
pub(crate) fn string_or_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::String(s)) => Some(s),
        _ => None,
    })
}
