use axum::{
    extract::State,
    routing::{delete, get, post},
    Json, Router,
};
use gridvault_core::{SheetError, SheetName};
use serde::{Deserialize, Serialize};

use super::{JsonBody, MessageResponse, OutcomeResponse};
use crate::auth::CurrentSession;
use crate::error::AppError;
use crate::selection::{self, SelectionScope};
use crate::AppState;

/// Request to change the active sheet
#[derive(Debug, Deserialize)]
pub struct SelectSheetRequest {
    pub collection: Option<String>,
}

/// Request naming a sheet to add or delete
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SheetNameRequest {
    pub sheet_name: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SheetsResponse {
    pub sheets: Vec<String>,
}

/// Select the sheet that table reads and writes target
async fn set_collection(
    State(state): State<AppState>,
    session: CurrentSession,
    JsonBody(req): JsonBody<SelectSheetRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    let name = SheetName::from_field(req.collection)?;
    let scope =
        selection::select_sheet(&state.active, &state.sessions, &session, name.clone()).await?;
    let per_session = scope == SelectionScope::Session;
    tracing::debug!(sheet = %name, per_session, "sheet selected");

    Ok(Json(MessageResponse::new(format!(
        "Active collection set to {name}"
    ))))
}

/// Register a sheet name
async fn add_sheet(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<SheetNameRequest>,
) -> Result<Json<OutcomeResponse>, AppError> {
    let name = SheetName::from_field(req.sheet_name)?;
    match state.sheets.add_sheet(&name).await {
        Ok(()) => Ok(Json(OutcomeResponse::ok("Sheet added successfully"))),
        // a duplicate is an ordinary outcome for the client, not an HTTP error
        Err(err @ SheetError::AlreadyExists(_)) => {
            Ok(Json(OutcomeResponse::rejected(err.to_string())))
        }
        Err(err) => Err(err.into()),
    }
}

/// List registered sheet names
async fn get_sheets(State(state): State<AppState>) -> Result<Json<SheetsResponse>, AppError> {
    let sheets = state.sheets.list_sheets().await?;
    Ok(Json(SheetsResponse { sheets }))
}

/// Unregister a sheet and delete its table
async fn delete_sheet(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<SheetNameRequest>,
) -> Result<Json<OutcomeResponse>, AppError> {
    let name = SheetName::from_field(req.sheet_name)?;
    state.sheets.remove_sheet(&name).await?;
    Ok(Json(OutcomeResponse::ok(format!(
        "Sheet \"{name}\" deleted successfully"
    ))))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/setCollection", post(set_collection))
        .route("/api/addSheet", post(add_sheet))
        .route("/api/getSheets", get(get_sheets))
        .route("/api/deleteSheet", delete(delete_sheet))
}
