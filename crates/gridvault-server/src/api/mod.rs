mod auth;
mod health;
mod sheets;
mod tables;


use axum::extract::{FromRequest, FromRequestParts, Request};
use axum::middleware::{self, Next};
use axum::response::Response;
use axum::Router;
use serde::Serialize;

use crate::auth::CurrentSession;
use crate::error::AppError;
use crate::AppState;

/// JSON body extractor whose rejections use the application error shape
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct JsonBody<T>(pub T);

/// Query string extractor whose rejections use the application error shape
#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(AppError))]
pub struct QueryParams<T>(pub T);

/// `{message}` response body
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// `{success, message}` response body
#[derive(Debug, Serialize)]
pub struct OutcomeResponse {
    pub success: bool,
    pub message: String,
}

impl OutcomeResponse {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }

    pub fn rejected(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }
}

/// Reject requests that carry no live session
async fn require_session(
    session: CurrentSession,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    if !session.is_logged_in() {
        return Err(AppError::Unauthorized("Login required".to_string()));
    }
    Ok(next.run(request).await)
}

/// Create the API router
pub fn router(state: &AppState) -> Router<AppState> {
    let mut data = Router::new()
        .merge(sheets::router())
        .merge(tables::router());
    if state.require_auth {
        data = data.route_layer(middleware::from_fn_with_state(
            state.clone(),
            require_session,
        ));
    }

    Router::new()
        .merge(health::router())
        .merge(auth::router())
        .merge(data)
}
