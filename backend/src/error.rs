use actix_web::http::{header::ContentType, StatusCode};
use actix_web::{HttpResponse, ResponseError};
use thiserror::Error;

use crate::analysis::AnalysisError;
use crate::render;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("text too long: {actual} characters, maximum {max}")]
    TextTooLong { max: usize, actual: usize },
    #[error("form body larger than {max} characters can encode")]
    FormTooLarge { max: usize },
    #[error("empty text")]
    EmptyText,
    #[error("invalid form: {0}")]
    InvalidForm(String),
    #[error("rate limit exceeded")]
    RateLimited,
    #[error("analysis failed: {0}")]
    Analysis(#[from] AnalysisError),
    #[error("not found")]
    NotFound,
}

impl AppError {
    /// Message shown to the user. Analysis details are never exposed.
    pub fn user_message(&self) -> String {
        match self {
            AppError::TextTooLong { max, actual } => format!(
                "Text is too long ({} characters, maximum {}).",
                actual, max
            ),
            AppError::FormTooLarge { max } => {
                format!("Text is too long (maximum {} characters).", max)
            }
            AppError::EmptyText => "Please enter some text to analyze.".to_string(),
            AppError::InvalidForm(_) => "The submitted form is invalid.".to_string(),
            AppError::RateLimited => "Too many requests, please slow down.".to_string(),
            AppError::Analysis(_) => "An error occurred while analyzing the text.".to_string(),
            AppError::NotFound => "Page not found.".to_string(),
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::TextTooLong { .. }
            | AppError::FormTooLarge { .. }
            | AppError::EmptyText
            | AppError::InvalidForm(_) => StatusCode::BAD_REQUEST,
            AppError::RateLimited => StatusCode::TOO_MANY_REQUESTS,
            AppError::Analysis(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::NotFound => StatusCode::NOT_FOUND,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        HttpResponse::build(status)
            .content_type(ContentType::html())
            .body(render::error_page(status, &self.user_message()))
    }
}
