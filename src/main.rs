use actix_web::{get, http::StatusCode, middleware, post, web, App, HttpResponse, HttpServer, Responder};
use tracing::{error, info};
use tracing_subscriber::util::SubscriberInitExt; // <- needed for .try_init()
use tracing_subscriber::{fmt, EnvFilter};

mod extract;
mod scrape;
mod types;

use crate::scrape::{scrape_ghazal, ScrapeClient, ScrapeError, FETCH_TIMEOUT, USER_AGENT};
use crate::types::ScrapeRequest;

#[get("/health")]
async fn health() -> impl Responder {
    web::Json(serde_json::json!({ "status": "ok" }))
}

/* ------------------------ / ------------------------ */

#[get("/")]
async fn index() -> impl Responder {
    HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(include_str!("../static/index.html"))
}

/* ------------------------ /scrape ------------------------ */

#[post("/scrape")]
async fn scrape_url(
    payload: web::Json<ScrapeRequest>,
    sc: web::Data<ScrapeClient>,
) -> actix_web::Result<impl Responder> {
    let req = payload.into_inner();
    match scrape_ghazal(&sc, &req.url).await {
        Ok(result) => {
            info!(url = %req.url, count = result.count, "extracted verses");
            Ok(HttpResponse::Ok().json(result))
        }
        Err(e) => {
            error!(error = ?e, url = %req.url, "scrape failed");
            Ok(HttpResponse::build(status_for(&e))
                .json(serde_json::json!({ "error": e.to_string() })))
        }
    }
}

fn status_for(e: &ScrapeError) -> StatusCode {
    match e {
        ScrapeError::MissingUrl | ScrapeError::UnsupportedSource => StatusCode::BAD_REQUEST,
        ScrapeError::UpstreamNotFound | ScrapeError::NoVerses => StatusCode::NOT_FOUND,
        ScrapeError::Timeout => StatusCode::REQUEST_TIMEOUT,
        ScrapeError::Failed(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Logging
    let _ = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .finish()
        .try_init();

    // Config
    let addr = std::env::var("WORKER_BIND").unwrap_or_else(|_| "127.0.0.1:5003".into());

    let sc = ScrapeClient::new(USER_AGENT, FETCH_TIMEOUT);

    info!("🌐 ghazal worker listening on {}", addr);
    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(sc.clone()))
            .wrap(middleware::Logger::default())
            .service(health)
            .service(index)
            .service(scrape_url)
    })
    .bind(addr)?
    .workers(2)
    .run()
    .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test;
    use std::time::Duration;

    fn test_client() -> ScrapeClient {
        ScrapeClient::new(USER_AGENT, Duration::from_secs(1))
    }

    #[actix_web::test]
    async fn health_reports_ok() {
        let app = test::init_service(App::new().service(health)).await;
        let resp =
            test::call_service(&app, test::TestRequest::get().uri("/health").to_request()).await;
        assert!(resp.status().is_success());

        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["status"], "ok");
    }

    #[actix_web::test]
    async fn missing_url_field_is_bad_request() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(test_client()))
                .service(scrape_url),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/scrape")
            .set_json(serde_json::json!({}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["error"], "URL is required");
    }

    #[actix_web::test]
    async fn foreign_url_is_bad_request() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(test_client()))
                .service(scrape_url),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/scrape")
            .set_json(serde_json::json!({ "url": "https://example.com/poem" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["error"], "Only Rekhta.org URLs are supported");
    }

    #[actix_web::test]
    async fn index_serves_the_page() {
        let app = test::init_service(App::new().service(index)).await;
        let resp = test::call_service(&app, test::TestRequest::get().uri("/").to_request()).await;
        assert!(resp.status().is_success());
    }
}
