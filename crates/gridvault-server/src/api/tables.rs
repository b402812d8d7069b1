use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use gridvault_core::{CellEntry, SheetName, TableSnapshot};
use serde::{Deserialize, Serialize};

use super::{JsonBody, MessageResponse, QueryParams};
use crate::auth::CurrentSession;
use crate::error::AppError;
use crate::selection;
use crate::AppState;

/// Optional explicit target, bypassing the active-sheet pointers
#[derive(Debug, Default, Deserialize)]
pub struct SheetQuery {
    pub sheet: Option<String>,
}

impl SheetQuery {
    fn sheet_name(self) -> Result<Option<SheetName>, AppError> {
        Ok(self.sheet.map(SheetName::parse).transpose()?)
    }
}

/// Full grid sent by the client
#[derive(Debug, Deserialize)]
pub struct SaveTableRequest {
    pub rows: Option<u32>,
    pub columns: Option<u32>,
    #[serde(default)]
    pub data: Vec<CellEntry>,
}

#[derive(Debug, Serialize)]
pub struct GridMetadata {
    pub rows: u32,
    pub columns: u32,
}

#[derive(Debug, Serialize)]
pub struct TableResponse {
    pub metadata: GridMetadata,
    pub data: Vec<CellEntry>,
}

impl From<TableSnapshot> for TableResponse {
    fn from(table: TableSnapshot) -> Self {
        Self {
            metadata: GridMetadata {
                rows: table.rows,
                columns: table.columns,
            },
            data: table.cells,
        }
    }
}

/// Read the active sheet's table
async fn get_table(
    State(state): State<AppState>,
    session: CurrentSession,
    QueryParams(query): QueryParams<SheetQuery>,
) -> Result<Json<TableResponse>, AppError> {
    let target = selection::target_sheet(&state.active, &session, query.sheet_name()?).await;
    let table = state.sheets.table(&target).await?;
    Ok(Json(table.into()))
}

/// Replace the active sheet's table
async fn save_table(
    State(state): State<AppState>,
    session: CurrentSession,
    QueryParams(query): QueryParams<SheetQuery>,
    JsonBody(req): JsonBody<SaveTableRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    let (Some(rows), Some(columns)) = (req.rows, req.columns) else {
        return Err(AppError::Validation(
            "Rows and columns are required!".to_string(),
        ));
    };

    let target = selection::target_sheet(&state.active, &session, query.sheet_name()?).await;
    state
        .sheets
        .save_table(&target, &TableSnapshot::new(rows, columns, req.data))
        .await?;

    Ok(Json(MessageResponse::new("Table data saved successfully")))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/getTable", get(get_table))
        .route("/api/saveTable", post(save_table))
}
