//! JSON query surface over a shared [`StateHolder`].
//!
//! `/api/current` and `/api/history` never answer with an error: they fall
//! back to the cached zero state and an empty history. `/api/refresh` is the
//! one mutating route and reports a failed log append as a 500.

use crate::state::StateHolder;
use actix_web::dev::{Server, ServerHandle};
use actix_web::{web, App, HttpResponse, HttpServer};
use std::sync::Arc;
use tracing::{error, info};

/// Samples returned by `/api/history`.
pub const HISTORY_LIMIT: usize = 24;

/// Bind address for the HTTP server.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

type SharedState = web::Data<Arc<StateHolder>>;

async fn current(state: SharedState) -> HttpResponse {
    HttpResponse::Ok().json(state.current())
}

async fn history(state: SharedState) -> HttpResponse {
    let state = state.get_ref().clone();
    let samples = match web::block(move || state.history(HISTORY_LIMIT)).await {
        Ok(samples) => samples,
        Err(err) => {
            error!("History read was cancelled: {}", err);
            Vec::new()
        }
    };
    HttpResponse::Ok().json(samples)
}

async fn refresh(state: SharedState) -> HttpResponse {
    let holder = state.get_ref().clone();
    match web::block(move || holder.sample_once()).await {
        Ok(Ok(_)) => HttpResponse::Ok().json(state.current()),
        Ok(Err(err)) => {
            error!("Refresh failed: {}", err);
            HttpResponse::InternalServerError().json(serde_json::json!({ "error": err.to_string() }))
        }
        Err(err) => {
            error!("Refresh was cancelled: {}", err);
            HttpResponse::InternalServerError().json(serde_json::json!({ "error": err.to_string() }))
        }
    }
}

/// Register the API routes. Shared with the test harness.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .route("/current", web::get().to(current))
            .route("/history", web::get().to(history))
            .route("/refresh", web::get().to(refresh))
            .route("/refresh", web::post().to(refresh)),
    );
}

/// Bind the server. Signal handling is left to the caller, which stops it
/// through the returned [`ServerHandle`].
pub fn bind(config: &ServerConfig, state: Arc<StateHolder>) -> std::io::Result<(Server, ServerHandle)> {
    let addr = config.addr();
    let data = web::Data::new(state);

    let server = HttpServer::new(move || App::new().app_data(data.clone()).configure(configure))
        .workers(1)
        .disable_signals()
        .bind(&addr)?
        .run();
    let handle = server.handle();

    info!("File counter running at http://{}", addr);
    Ok((server, handle))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::log_store::LogStore;
    use crate::sample::Sample;
    use crate::sampler::DirectorySampler;
    use actix_web::http::StatusCode;
    use actix_web::test;
    use std::fs;
    use tempfile::tempdir;

    fn state_for(folder: &std::path::Path, log: &std::path::Path) -> Arc<StateHolder> {
        Arc::new(StateHolder::new(
            folder,
            Box::new(DirectorySampler::new()),
            LogStore::open(log).unwrap(),
        ))
    }

    #[actix_web::test]
    async fn test_current_before_any_sample() {
        let root = tempdir().unwrap();
        let state = state_for(root.path(), &root.path().join("log.csv"));
        let app = test::init_service(
            App::new().app_data(web::Data::new(state)).configure(configure),
        )
        .await;

        let req = test::TestRequest::get().uri("/api/current").to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body["count"], 0);
        assert!(body["lastUpdated"].is_null());
        assert_eq!(body["folderPath"], root.path().display().to_string());
    }

    #[actix_web::test]
    async fn test_refresh_samples_and_reports_current() {
        let root = tempdir().unwrap();
        let folder = root.path().join("watched");
        fs::create_dir(&folder).unwrap();
        fs::write(folder.join("a.txt"), b"a").unwrap();
        fs::write(folder.join("b.txt"), b"b").unwrap();
        fs::create_dir(folder.join("nested")).unwrap();

        let state = state_for(&folder, &root.path().join("log.csv"));
        let app = test::init_service(
            App::new().app_data(web::Data::new(state)).configure(configure),
        )
        .await;

        let req = test::TestRequest::post().uri("/api/refresh").to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["count"], 2);
        assert!(body["lastUpdated"].is_string());

        let req = test::TestRequest::get().uri("/api/current").to_request();
        let current: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(current, body);

        let req = test::TestRequest::get().uri("/api/history").to_request();
        let history: Vec<Sample> = test::call_and_read_body_json(&app, req).await;
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].count, 2);
        assert_eq!(history[0].folder, folder.display().to_string());
    }

    #[actix_web::test]
    async fn test_history_is_capped() {
        let root = tempdir().unwrap();
        let log = root.path().join("log.csv");
        let state = state_for(root.path(), &log);

        let store = LogStore::open(&log).unwrap();
        for i in 0..30u64 {
            store
                .append(&Sample {
                    timestamp: format!("2024-01-15 10:{:02}:00", i),
                    folder: "/data".to_string(),
                    count: i,
                })
                .unwrap();
        }

        let app = test::init_service(
            App::new().app_data(web::Data::new(state)).configure(configure),
        )
        .await;
        let req = test::TestRequest::get().uri("/api/history").to_request();
        let history: Vec<Sample> = test::call_and_read_body_json(&app, req).await;

        assert_eq!(history.len(), HISTORY_LIMIT);
        assert_eq!(history.first().map(|s| s.count), Some(6));
        assert_eq!(history.last().map(|s| s.count), Some(29));
    }

    #[actix_web::test]
    async fn test_history_degrades_to_empty() {
        let root = tempdir().unwrap();
        let log = root.path().join("log.csv");
        let state = state_for(root.path(), &log);
        fs::remove_file(&log).unwrap();

        let app = test::init_service(
            App::new().app_data(web::Data::new(state)).configure(configure),
        )
        .await;
        let req = test::TestRequest::get().uri("/api/history").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let history: Vec<Sample> = test::read_body_json(resp).await;
        assert!(history.is_empty());
    }

    #[actix_web::test]
    async fn test_refresh_reports_append_failure() {
        let root = tempdir().unwrap();
        let log = root.path().join("log.csv");
        let state = state_for(root.path(), &log);
        fs::remove_file(&log).unwrap();

        let app = test::init_service(
            App::new().app_data(web::Data::new(state)).configure(configure),
        )
        .await;
        let req = test::TestRequest::get().uri("/api/refresh").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body: serde_json::Value = test::read_body_json(resp).await;
        assert!(body["error"].as_str().unwrap().contains("append"));
    }
}
