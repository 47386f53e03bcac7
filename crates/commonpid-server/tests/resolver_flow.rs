//! End-to-end resolver scenarios against an in-memory store and a
//! mock upstream server standing in for Crossref, DataCite, and the
//! DOI handle service.

use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use commonpid_core::{File, Reference, Title, Work, WorkStore, WorkType};
use commonpid_metadata::{CrossrefClient, DataciteClient, HandleClient, RegistryProbe};
use commonpid_server::{app_router, AppState};
use http_body_util::BodyExt;
use mockito::{Server, ServerGuard};
use tower::ServiceExt;

async fn state_with(server: &ServerGuard) -> Arc<AppState> {
    let url = server.url();
    Arc::new(AppState {
        store: WorkStore::open_in_memory().unwrap(),
        crossref: CrossrefClient::with_params(&url, Duration::from_secs(0), None).unwrap(),
        datacite: DataciteClient::with_params(&url, Duration::from_secs(0)).unwrap(),
        probe: RegistryProbe::new(HandleClient::with_base(&url).unwrap()),
        docs_host: "https://docs.example.org".to_string(),
    })
}

async fn get(
    state: Arc<AppState>,
    uri: &str,
    accept: Option<&str>,
) -> axum::http::Response<Body> {
    let mut request = Request::builder().uri(uri);
    if let Some(accept) = accept {
        request = request.header(header::ACCEPT, accept);
    }
    app_router(state)
        .oneshot(request.body(Body::empty()).unwrap())
        .await
        .unwrap()
}

fn location(response: &axum::http::Response<Body>) -> &str {
    response
        .headers()
        .get(header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
}

async fn body_json(response: axum::http::Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn stored_article(pid: &str, url: &str) -> Work {
    let mut work = Work::base(pid);
    work.work_type = Some(WorkType::JournalArticle);
    work.url = url.to_string();
    work.provider = "Crossref".to_string();
    work.titles = vec![Title { title: "Stored".into(), ..Default::default() }];
    work
}

#[tokio::test]
async fn doi_hit_with_html_redirects_to_landing_page() {
    let server = Server::new_async().await;
    let state = state_with(&server).await;
    state
        .store
        .upsert(&stored_article("https://doi.org/10.5555/12345", "https://example.org/a"))
        .await
        .unwrap();

    let response = get(state, "/10.5555/12345", Some("text/html")).await;
    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(location(&response), "https://example.org/a");
}

#[tokio::test]
async fn doi_miss_populates_from_crossref_and_serves_commonmeta() {
    let mut server = Server::new_async().await;
    let _ra = server
        .mock("GET", "/ra/10.5555")
        .with_status(200)
        .with_body(r#"[{"DOI": "10.5555", "RA": "Crossref"}]"#)
        .create_async()
        .await;
    let _works = server
        .mock("GET", "/works/10.5555/67890")
        .with_status(200)
        .with_body(
            r#"{"message": {
                "DOI": "10.5555/67890",
                "type": "journal-article",
                "title": ["T"],
                "resource": {"primary": {"URL": "https://example.org/t"}}
            }}"#,
        )
        .create_async()
        .await;

    let state = state_with(&server).await;
    let response = get(
        state.clone(),
        "/10.5555/67890",
        Some("application/vnd.commonmeta+json"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["id"], "https://doi.org/10.5555/67890");
    assert_eq!(body["type"], "JournalArticle");
    assert_eq!(body["titles"], serde_json::json!([{"title": "T"}]));

    let stored = state
        .store
        .find_by_pid("https://doi.org/10.5555/67890")
        .await
        .unwrap();
    assert!(stored.is_some());
    assert_eq!(stored.unwrap().provider, "Crossref");
}

#[tokio::test]
async fn unsupported_type_delegates_to_crossref_transform() {
    let mut server = Server::new_async().await;
    let _ra = server
        .mock("GET", "/ra/10.5555")
        .with_status(200)
        .with_body(r#"[{"DOI": "10.5555", "RA": "Crossref"}]"#)
        .create_async()
        .await;
    let _works = server
        .mock("GET", "/works/10.5555/1")
        .with_status(200)
        .with_body(r#"{"message": {"DOI": "10.5555/1", "type": "journal-article", "title": ["T"]}}"#)
        .create_async()
        .await;

    let state = state_with(&server).await;
    let response = get(state, "/10.5555/1/transform/application/vnd.weird+json", None).await;
    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(
        location(&response),
        "https://api.crossref.org/works/10.5555/1/transform/application/vnd.weird+json"
    );
}

#[tokio::test]
async fn unsupported_type_delegates_to_datacite_crosscite() {
    let server = Server::new_async().await;
    let state = state_with(&server).await;
    let mut work = stored_article("https://doi.org/10.5555/2", "https://example.org/2");
    work.provider = "DataCite".to_string();
    state.store.upsert(&work).await.unwrap();

    let response = get(state, "/10.5555/2", Some("application/x-bibtex")).await;
    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(
        location(&response),
        "https://data.crosscite.org/application/x-bibtex/10.5555/2"
    );
}

#[tokio::test]
async fn datacite_miss_serves_csl_after_populate() {
    let mut server = Server::new_async().await;
    let _ra = server
        .mock("GET", "/ra/10.5282")
        .with_status(200)
        .with_body(r#"[{"DOI": "10.5282", "RA": "DataCite"}]"#)
        .create_async()
        .await;
    let _dois = server
        .mock("GET", "/dois/10.5282/dc1")
        .with_status(200)
        .with_body(
            r#"{"data": {"attributes": {
                "doi": "10.5282/dc1",
                "url": "https://repo.example.org/dc1",
                "types": {"resourceTypeGeneral": "Dataset"},
                "titles": [{"title": "A dataset"}],
                "publisher": "Example Repo"
            }}}"#,
        )
        .create_async()
        .await;

    let state = state_with(&server).await;
    let response = get(
        state,
        "/10.5282/dc1",
        Some("application/vnd.citationstyles.csl+json"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["type"], "dataset");
    assert_eq!(body["title"], "A dataset");
    assert_eq!(body["DOI"], "10.5282/dc1");
}

#[tokio::test]
async fn pdf_artifact_redirects_or_406() {
    let server = Server::new_async().await;
    let state = state_with(&server).await;

    let mut with_pdf = stored_article("https://doi.org/10.5555/pdf", "https://example.org/p");
    with_pdf.files = vec![File {
        url: "https://ex/x.pdf".into(),
        mime_type: "application/pdf".into(),
    }];
    state.store.upsert(&with_pdf).await.unwrap();
    state
        .store
        .upsert(&stored_article("https://doi.org/10.5555/nopdf", "https://example.org/n"))
        .await
        .unwrap();

    let response = get(state.clone(), "/10.5555/pdf", Some("application/pdf")).await;
    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(location(&response), "https://ex/x.pdf");

    let response = get(state, "/10.5555/nopdf", Some("application/pdf")).await;
    assert_eq!(response.status(), StatusCode::NOT_ACCEPTABLE);
}

#[tokio::test]
async fn references_expand_in_response_only() {
    let server = Server::new_async().await;
    let state = state_with(&server).await;

    let mut a = stored_article("https://doi.org/10.5555/a", "https://example.org/a");
    a.references = vec![Reference {
        key: "ref1".into(),
        id: "https://doi.org/10.1/b".into(),
        ..Default::default()
    }];
    state.store.upsert(&a).await.unwrap();

    let mut b = stored_article("https://doi.org/10.1/b", "https://example.org/b");
    b.work_type = Some(WorkType::Dataset);
    b.titles = vec![Title { title: "Referenced".into(), ..Default::default() }];
    state.store.upsert(&b).await.unwrap();

    let response = get(state.clone(), "/10.5555/a", Some("application/json")).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;

    // The response carries the full stored record of B.
    assert_eq!(body["references"][0]["id"], "https://doi.org/10.1/b");
    assert_eq!(body["references"][0]["type"], "Dataset");
    assert_eq!(body["references"][0]["titles"][0]["title"], "Referenced");

    // The stored copy of A is untouched.
    let stored = state.store.find_by_pid("https://doi.org/10.5555/a").await.unwrap().unwrap();
    assert_eq!(stored.references.len(), 1);
    assert_eq!(stored.references[0].key, "ref1");
}

#[tokio::test]
async fn minimal_record_serves_html_but_not_json() {
    let server = Server::new_async().await;
    let state = state_with(&server).await;
    state
        .store
        .upsert(&Work::minimal(
            "https://doi.org/10.5555/min",
            "https://example.org/landing",
            "Crossref",
        ))
        .await
        .unwrap();

    let response = get(state.clone(), "/10.5555/min", Some("text/html")).await;
    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(location(&response), "https://example.org/landing");

    let response = get(state, "/10.5555/min", Some("application/json")).await;
    assert_eq!(response.status(), StatusCode::NOT_ACCEPTABLE);
}

#[tokio::test]
async fn unknown_agency_miss_is_404() {
    let mut server = Server::new_async().await;
    let _ra = server
        .mock("GET", "/ra/10.9999")
        .with_status(404)
        .create_async()
        .await;

    let state = state_with(&server).await;
    let response = get(state, "/10.9999/unknown", Some("text/html")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn non_doi_miss_is_404() {
    let server = Server::new_async().await;
    let state = state_with(&server).await;
    let response = get(state, "/example.org/nope", Some("text/html")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn upstream_fetch_failure_is_400_with_message() {
    let mut server = Server::new_async().await;
    let _ra = server
        .mock("GET", "/ra/10.5555")
        .with_status(200)
        .with_body(r#"[{"DOI": "10.5555", "RA": "Crossref"}]"#)
        .create_async()
        .await;
    let _works = server
        .mock("GET", "/works/10.5555/gone")
        .with_status(404)
        .with_body("Resource not found.")
        .create_async()
        .await;

    let state = state_with(&server).await;
    let response = get(state, "/10.5555/gone", Some("text/html")).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert!(body["error"].as_str().unwrap().contains("404"));
}

#[tokio::test]
async fn legacy_paths_redirect_to_docs_host() {
    let server = Server::new_async().await;
    let state = state_with(&server).await;

    let response = get(state.clone(), "/", None).await;
    assert_eq!(response.status(), StatusCode::MOVED_PERMANENTLY);
    assert_eq!(location(&response), "https://docs.example.org/");

    let response = get(state, "/robots.txt", None).await;
    assert_eq!(response.status(), StatusCode::MOVED_PERMANENTLY);
    assert_eq!(location(&response), "https://docs.example.org/robots.txt");
}

#[tokio::test]
async fn unixref_and_schema_org_bodies_are_served() {
    let server = Server::new_async().await;
    let state = state_with(&server).await;
    state
        .store
        .upsert(&stored_article("https://doi.org/10.5555/x", "https://example.org/x"))
        .await
        .unwrap();

    let response = get(
        state.clone(),
        "/10.5555/x",
        Some("application/vnd.crossref.unixsd+xml"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let xml = String::from_utf8(bytes.to_vec()).unwrap();
    assert!(xml.contains("<doi_records>"));
    assert!(xml.contains("<doi>10.5555/x</doi>"));

    let response = get(state, "/10.5555/x", Some("application/vnd.schemaorg.ld+json")).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["@type"], "ScholarlyArticle");
    assert_eq!(body["@id"], "https://doi.org/10.5555/x");
}

#[tokio::test]
async fn markdown_artifact_missing_is_406() {
    let server = Server::new_async().await;
    let state = state_with(&server).await;
    state
        .store
        .upsert(&stored_article("https://doi.org/10.5555/md", "https://example.org/md"))
        .await
        .unwrap();

    let response = get(state, "/10.5555/md", Some("text/markdown")).await;
    assert_eq!(response.status(), StatusCode::NOT_ACCEPTABLE);
    let body = body_json(response).await;
    assert_eq!(body["error"], "Markdown version not available");
}

#[tokio::test]
async fn datacite_json_body_is_served() {
    let server = Server::new_async().await;
    let state = state_with(&server).await;
    state
        .store
        .upsert(&stored_article("https://doi.org/10.5555/dc", "https://example.org/dc"))
        .await
        .unwrap();

    let response = get(
        state,
        "/10.5555/dc",
        Some("application/vnd.datacite.datacite+json"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["doi"], "10.5555/dc");
    assert_eq!(body["types"]["resourceTypeGeneral"], "JournalArticle");
}
