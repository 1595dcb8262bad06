//! Dues handlers
//!
//! Endpoints for the due roster and its printable report.

use axum::{
    extract::{Query, State},
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;

use crate::domain::entities::{DueRoster, Month};
use crate::error::AppError;
use crate::report::{render_due_list, report_file_name};
use crate::AppState;

/// Optional `?month=MAR25` reference month
#[derive(Debug, Default, Deserialize)]
pub struct MonthQuery {
    pub month: Option<String>,
}

impl MonthQuery {
    /// The requested month, or the current one
    pub fn reference_month(&self) -> Result<Month, AppError> {
        match self.month.as_deref().map(str::trim) {
            None | Some("") => Ok(Month::current()),
            Some(raw) => Ok(raw.parse::<Month>()?),
        }
    }
}

/// GET /dues
///
/// Members with outstanding dues as of the reference month, plus totals.
pub async fn get_dues(
    State(state): State<AppState>,
    Query(query): Query<MonthQuery>,
) -> Result<Json<DueRoster>, AppError> {
    let reference = query.reference_month()?;
    let roster = state.ledger.due_roster(reference).await?;
    Ok(Json(roster))
}

/// GET /dues/report
///
/// Printable markdown due list, served as a download.
pub async fn get_due_report(
    State(state): State<AppState>,
    Query(query): Query<MonthQuery>,
) -> Result<Response, AppError> {
    let reference = query.reference_month()?;
    let roster = state.ledger.due_roster(reference).await?;

    let body = render_due_list(&state.club_name, &roster);
    let disposition = format!("attachment; filename=\"{}\"", report_file_name(reference));

    Ok((
        [
            (header::CONTENT_TYPE, "text/markdown; charset=utf-8".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        body,
    )
        .into_response())
}
