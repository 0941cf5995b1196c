//! REST API module.
//!
//! Contains all API routes and handlers. Every JSON response uses the
//! `{success, data}` / `{success, error}` envelope.

mod cross_references;
mod evidence;
mod format;
mod incidents;
mod timeline;
mod templates;

pub use cross_references::*;
pub use evidence::*;
pub use format::*;
pub use incidents::*;
pub use timeline::*;
pub use templates::*;

use axum::{
    extract::{multipart::MultipartError, FromRequest},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::errors::AppError;

/// Success response envelope.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    pub data: T,
    #[serde(skip)]
    status: StatusCode,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn new(data: T) -> Self {
        Self {
            success: true,
            data,
            status: StatusCode::OK,
        }
    }

    /// Envelope for a newly created resource (201).
    pub fn created(data: T) -> Self {
        Self {
            status: StatusCode::CREATED,
            ..Self::new(data)
        }
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        (self.status, Json(self)).into_response()
    }
}

/// Response type that can be either success or error.
pub type ApiResult<T> = Result<ApiResponse<T>, AppError>;

/// Create a successful API response.
pub fn success<T: Serialize>(data: T) -> ApiResult<T> {
    Ok(ApiResponse::new(data))
}

pub fn created<T: Serialize>(data: T) -> ApiResult<T> {
    Ok(ApiResponse::created(data))
}

/// JSON body extractor whose rejections use the error envelope.
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct AppJson<T>(pub T);

/// Parse a numeric path identifier.
pub fn parse_id(raw: &str, kind: &str) -> Result<i64, AppError> {
    raw.trim()
        .parse::<i64>()
        .ok()
        .filter(|id| *id > 0)
        .ok_or_else(|| AppError::BadRequest(format!("Invalid {kind} ID")))
}

fn not_found(kind: &str, id: i64) -> AppError {
    AppError::NotFound(format!("{kind} {id} not found"))
}

/// Map a multipart read failure; a body over the limit becomes 413.
fn multipart_error(err: MultipartError) -> AppError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::UploadTooLarge("Upload exceeds the maximum allowed size".to_string())
    } else {
        AppError::BadRequest(err.body_text())
    }
}
