use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use axum_extra::extract::cookie::SignedCookieJar;
use serde::{Deserialize, Serialize};

use super::{JsonBody, MessageResponse, OutcomeResponse};
use crate::auth::{CurrentSession, Credentials, UserSummary, SESSION_COOKIE};
use crate::error::AppError;
use crate::AppState;

/// Username and password as sent by the client
#[derive(Debug, Deserialize)]
pub struct CredentialsRequest {
    pub username: Option<String>,
    pub password: Option<String>,
}

impl CredentialsRequest {
    fn into_credentials(self) -> Result<Credentials, AppError> {
        Ok(Credentials::from_fields(self.username, self.password)?)
    }
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub success: bool,
    pub message: String,
    pub user: UserSummary,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionResponse {
    pub logged_in: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<UserSummary>,
}

async fn signup(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<CredentialsRequest>,
) -> Result<(StatusCode, Json<MessageResponse>), AppError> {
    state.accounts.signup(req.into_credentials()?).await?;
    Ok((
        StatusCode::CREATED,
        Json(MessageResponse::new("User registered successfully!")),
    ))
}

async fn login(
    State(state): State<AppState>,
    jar: SignedCookieJar,
    JsonBody(req): JsonBody<CredentialsRequest>,
) -> Result<(SignedCookieJar, Json<LoginResponse>), AppError> {
    let account = state.accounts.login(req.into_credentials()?).await?;

    // never carry a previous session over into the new login
    if let Some(previous) = jar.get(SESSION_COOKIE) {
        state.sessions.end(previous.value()).await?;
    }
    let session = state.sessions.start(&account).await?;
    let jar = jar.add(state.sessions.cookie(&session));

    Ok((
        jar,
        Json(LoginResponse {
            success: true,
            message: "Login successful".to_string(),
            user: UserSummary::from(&account),
        }),
    ))
}

async fn logout(
    State(state): State<AppState>,
    session: CurrentSession,
    jar: SignedCookieJar,
) -> Result<(SignedCookieJar, Json<OutcomeResponse>), AppError> {
    if let Some(record) = session.record() {
        state.sessions.end(&record.token).await?;
        tracing::info!(username = %record.username, "session ended");
    }
    let jar = jar.remove(state.sessions.removal_cookie());
    Ok((jar, Json(OutcomeResponse::ok("Logged out"))))
}

async fn current_session(session: CurrentSession) -> Json<SessionResponse> {
    Json(SessionResponse {
        logged_in: session.is_logged_in(),
        user: session.record().map(|record| record.user()),
    })
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/signup", post(signup))
        .route("/api/login", post(login))
        .route("/api/logout", post(logout))
        .route("/api/session", get(current_session))
}
