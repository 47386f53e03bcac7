//! Fixed 301 redirects for paths that used to be served here and now
//! live on the documentation host.

use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::Router;

/// Paths redirected to the same path on the documentation host. `/`
/// goes to the host root.
pub const LEGACY_PATHS: &[&str] = &[
    "/",
    "/challenges.html",
    "/implementations.html",
    "/use-cases.html",
    "/schema.html",
    "/robots.txt",
    "/schema.json",
];

fn moved_permanently(location: &str) -> Response {
    (
        StatusCode::MOVED_PERMANENTLY,
        [(header::LOCATION, location.to_string())],
    )
        .into_response()
}

/// Register the legacy redirect routes on a router.
pub fn register<S: Clone + Send + Sync + 'static>(mut router: Router<S>, docs_host: &str) -> Router<S> {
    let docs_host = docs_host.trim_end_matches('/');
    for path in LEGACY_PATHS {
        let target = if *path == "/" {
            format!("{docs_host}/")
        } else {
            format!("{docs_host}{path}")
        };
        router = router.route(
            path,
            get(move || {
                let target = target.clone();
                async move { moved_permanently(&target) }
            }),
        );
    }
    router
}
