use std::time::Instant;

use actix_files::Files;
use actix_web::body::MessageBody;
use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::error::UrlencodedError;
use actix_web::http::header::ContentType;
use actix_web::middleware::{DefaultHeaders, Logger};
use actix_web::{web, App, HttpRequest, HttpResponse, Responder};
use log::{error, info, warn};

use crate::analysis::AnalysisClient;
use crate::config::Config;
use crate::error::AppError;
use crate::models::{AnalyzeForm, ApiResponse};
use crate::rate_limit::{RateLimiter, UNKNOWN_CLIENT};
use crate::render;
use crate::sanitize::prepare_text;

// A character is at most 4 UTF-8 bytes, each percent-encoded as 3.
const ENCODED_BYTES_PER_CHAR: usize = 12;
const FORM_OVERHEAD_BYTES: usize = 1024;

/// Largest url-encoded body that can still carry `max_text_length` characters.
pub fn form_limit(max_text_length: usize) -> usize {
    max_text_length
        .saturating_mul(ENCODED_BYTES_PER_CHAR)
        .saturating_add(FORM_OVERHEAD_BYTES)
}

/// Shared across workers through `web::Data`.
pub struct AppState {
    pub client: AnalysisClient,
    pub limiter: RateLimiter,
    pub max_text_length: usize,
}

impl AppState {
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        Ok(AppState {
            client: AnalysisClient::new(config.analysis.clone())?,
            limiter: RateLimiter::per_minute(config.rate_limit_per_minute),
            max_text_length: config.max_text_length,
        })
    }
}

/// Full application: middleware, routes, static files and fallback.
pub fn build_app(
    state: web::Data<AppState>,
    static_dir: &str,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse<impl MessageBody>,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let max_text_length = state.max_text_length;
    App::new()
        .wrap(Logger::default())
        .wrap(
            DefaultHeaders::new()
                .add(("X-Content-Type-Options", "nosniff"))
                .add(("X-Frame-Options", "DENY")),
        )
        .app_data(state)
        .app_data(
            web::FormConfig::default()
                .limit(form_limit(max_text_length))
                .error_handler(move |err, _req| form_error(err, max_text_length).into()),
        )
        .route("/", web::get().to(index))
        .route("/analyze", web::post().to(analyze))
        .route("/api/health", web::get().to(health_check))
        .service(Files::new("/static", static_dir).prefer_utf8(true))
        .default_service(web::route().to(not_found))
}

fn form_error(err: UrlencodedError, max_text_length: usize) -> AppError {
    match err {
        UrlencodedError::Overflow { .. } => AppError::FormTooLarge {
            max: max_text_length,
        },
        other => AppError::InvalidForm(other.to_string()),
    }
}

pub async fn index(state: web::Data<AppState>) -> impl Responder {
    HttpResponse::Ok()
        .content_type(ContentType::html())
        .body(render::index_page(state.max_text_length))
}

pub async fn analyze(
    state: web::Data<AppState>,
    form: web::Form<AnalyzeForm>,
    request: HttpRequest,
) -> Result<HttpResponse, AppError> {
    let start_time = Instant::now();
    let client_ip = request
        .peer_addr()
        .map(|addr| addr.ip().to_string())
        .unwrap_or_else(|| UNKNOWN_CLIENT.to_string());

    if let Err(e) = state.limiter.check(&client_ip) {
        warn!("Rate limit exceeded for {}", client_ip);
        return Err(e);
    }

    let text = prepare_text(&form.text, state.max_text_length).map_err(|e| {
        warn!("Rejected input from {}: {}", client_ip, e);
        e
    })?;

    info!("Analysis requested by {} ({} chars)", client_ip, text.chars().count());

    let report = state.client.detect_pii(&text).await.map_err(|e| {
        error!("Analysis failed: {}", e);
        AppError::from(e)
    })?;

    info!(
        "Analysis done: {} PII findings in {} ms",
        report.findings.len(),
        start_time.elapsed().as_millis()
    );

    Ok(HttpResponse::Ok()
        .content_type(ContentType::html())
        .body(render::result_page(&report)))
}

pub async fn health_check() -> impl Responder {
    HttpResponse::Ok().json(ApiResponse::success("ok"))
}

pub async fn not_found(request: HttpRequest) -> Result<HttpResponse, AppError> {
    if request.path().starts_with("/api/") {
        return Ok(HttpResponse::NotFound().json(ApiResponse::<String>::error("Endpoint not found")));
    }
    Err(AppError::NotFound)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn form_limit_covers_fully_encoded_text() {
        // "é" url-encodes to "%C3%A9"
        assert!(form_limit(20_000) >= "text=".len() + 20_000 * 6);
        assert!(form_limit(10) >= 10 * 12);
        assert_eq!(form_limit(usize::MAX), usize::MAX);
    }

    #[test]
    fn overflow_maps_to_too_large() {
        let err = form_error(UrlencodedError::Overflow { size: 10, limit: 5 }, 3);
        assert!(matches!(err, AppError::FormTooLarge { max: 3 }));

        let err = form_error(UrlencodedError::ContentType, 3);
        assert!(matches!(err, AppError::InvalidForm(_)));
    }
}
