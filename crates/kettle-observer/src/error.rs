//! Error types for the web control surface.
//!
//! [`ObserverError`] unifies all failure modes into a single enum that
//! can be converted into an Axum HTTP response via its
//! [`IntoResponse`](axum::response::IntoResponse) implementation.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use kettle_core::RegistryError;

/// Errors that can occur in the web layer.
#[derive(Debug, thiserror::Error)]
pub enum ObserverError {
    /// The requested kettle does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// The request carried a value the handler cannot act on.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// A page template failed to load or render.
    #[error("template error: {0}")]
    Template(#[from] minijinja::Error),

    /// An internal error occurred.
    #[error("internal error: {0}")]
    Internal(String),
}

impl From<RegistryError> for ObserverError {
    fn from(err: RegistryError) -> Self {
        match err {
            RegistryError::NotFound { .. } => Self::NotFound(err.to_string()),
            RegistryError::Duplicate { .. } => Self::Internal(err.to_string()),
        }
    }
}

impl IntoResponse for ObserverError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            Self::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            Self::InvalidInput(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            Self::Template(e) => {
                tracing::error!(error = %e, "Page rendering failed");
                (StatusCode::INTERNAL_SERVER_ERROR, format!("template error: {e}"))
            }
            Self::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg.clone()),
        };

        let body = serde_json::json!({
            "error": message,
            "status": status.as_u16(),
        });

        (status, axum::Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use kettle_types::KettleId;

    use super::*;

    #[test]
    fn registry_not_found_maps_to_404() {
        let err = ObserverError::from(RegistryError::NotFound { id: KettleId::new() });
        assert_eq!(err.into_response().status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn invalid_input_maps_to_400() {
        let err = ObserverError::InvalidInput("bad".to_owned());
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
    }
}
