use ecfr_api::{Client, ContentQuery, Error, SearchQuery};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn load_fixture(name: &str) -> String {
    std::fs::read_to_string(format!("tests/fixtures/{}", name)).unwrap()
}

#[tokio::test]
async fn get_titles_success() {
    let mock_server = MockServer::start().await;
    let body = load_fixture("titles.json");

    Mock::given(method("GET"))
        .and(path("/api/versioner/v1/titles"))
        .respond_with(ResponseTemplate::new(200).set_body_string(&body))
        .mount(&mock_server)
        .await;

    let client = Client::with_base_url(&mock_server.uri()).unwrap();
    let resp = client.get_titles().await.unwrap();
    assert_eq!(resp.titles.unwrap().len(), 3);
}

#[tokio::test]
async fn get_titles_server_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/versioner/v1/titles"))
        .respond_with(ResponseTemplate::new(500).set_body_string("Internal Server Error"))
        .mount(&mock_server)
        .await;

    let client = Client::with_base_url(&mock_server.uri()).unwrap();
    let err = client.get_titles().await.unwrap_err();
    assert!(matches!(err, Error::HttpStatus { status: 500, .. }));
    assert_eq!(err.status(), Some(500));
}

#[tokio::test]
async fn get_titles_malformed_json() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/versioner/v1/titles"))
        .respond_with(ResponseTemplate::new(200).set_body_string("{not valid json}"))
        .mount(&mock_server)
        .await;

    let client = Client::with_base_url(&mock_server.uri()).unwrap();
    let result = client.get_titles().await;
    assert!(matches!(result, Err(Error::Parse(_))));
}

#[tokio::test]
async fn get_agencies_success() {
    let mock_server = MockServer::start().await;
    let body = load_fixture("agencies.json");

    Mock::given(method("GET"))
        .and(path("/api/admin/v1/agencies.json"))
        .respond_with(ResponseTemplate::new(200).set_body_string(&body))
        .mount(&mock_server)
        .await;

    let client = Client::with_base_url(&mock_server.uri()).unwrap();
    let resp = client.get_agencies().await.unwrap();
    assert_eq!(resp.agencies.len(), 2);
}

#[tokio::test]
async fn get_chapter_xml_sends_date_title_and_chapter() {
    let mock_server = MockServer::start().await;
    let body = load_fixture("chapter.xml");

    Mock::given(method("GET"))
        .and(path("/api/versioner/v1/full/2024-05-31/title-40.xml"))
        .and(query_param("chapter", "I"))
        .respond_with(ResponseTemplate::new(200).set_body_string(&body))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = Client::with_base_url(&mock_server.uri()).unwrap();
    let xml = client
        .get_chapter_xml("2024-05-31", 40, &ContentQuery::new("I"))
        .await
        .unwrap();
    assert!(xml.contains("ENVIRONMENTAL PROTECTION AGENCY"));
}

#[tokio::test]
async fn get_chapter_xml_rate_limited() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/versioner/v1/full/2024-05-31/title-40.xml"))
        .respond_with(ResponseTemplate::new(429).set_body_string("slow down"))
        .mount(&mock_server)
        .await;

    let client = Client::with_base_url(&mock_server.uri()).unwrap();
    let err = client
        .get_chapter_xml("2024-05-31", 40, &ContentQuery::new("I"))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::RateLimited));
    assert_eq!(err.status(), Some(429));
}

#[tokio::test]
async fn get_chapter_xml_not_found() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/versioner/v1/full/2024-05-31/title-99.xml"))
        .respond_with(ResponseTemplate::new(404).set_body_string("{\"error\":\"not found\"}"))
        .mount(&mock_server)
        .await;

    let client = Client::with_base_url(&mock_server.uri()).unwrap();
    let err = client
        .get_chapter_xml("2024-05-31", 99, &ContentQuery::new("N/A"))
        .await
        .unwrap_err();
    match err {
        Error::HttpStatus { status, body } => {
            assert_eq!(status, 404);
            assert!(body.contains("not found"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn search_sends_query_params() {
    let mock_server = MockServer::start().await;
    let body = load_fixture("search.json");

    Mock::given(method("GET"))
        .and(path("/api/search/v1/results"))
        .and(query_param("query", "emissions"))
        .and(query_param("per_page", "20"))
        .respond_with(ResponseTemplate::new(200).set_body_string(&body))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = Client::with_base_url(&mock_server.uri()).unwrap();
    let resp = client
        .search(&SearchQuery::new("emissions").with_per_page(20))
        .await
        .unwrap();
    assert_eq!(resp.results.len(), 2);
}
