//! Member handlers
//!
//! Endpoints for enrolling members, recording payments and viewing accounts.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};

use super::dues::MonthQuery;
use crate::app::fee_config::CURRENCY;
use crate::domain::entities::{MemberId, Month, MonthField};
use crate::error::AppError;
use crate::AppState;

/// Request body for enrolling a member
#[derive(Debug, Deserialize)]
pub struct AddMemberRequest {
    pub name: String,
}

/// Response body for an enrolled member
#[derive(Debug, Serialize)]
pub struct AddMemberResponse {
    pub member_id: MemberId,
    pub name: String,
    pub message: String,
}

/// POST /members
///
/// Enroll a member and return the new member ID.
pub async fn add_member(
    State(state): State<AppState>,
    Json(request): Json<AddMemberRequest>,
) -> Result<(StatusCode, Json<AddMemberResponse>), AppError> {
    let member = state.ledger.add_member(&request.name).await?;

    Ok((
        StatusCode::CREATED,
        Json(AddMemberResponse {
            message: format!("Member added successfully with ID: {}", member.member_id),
            member_id: member.member_id,
            name: member.name,
        }),
    ))
}

/// One entry of the member picker
#[derive(Debug, Serialize)]
pub struct MemberSummary {
    pub member_id: MemberId,
    pub name: String,
}

/// GET /members
///
/// All members ordered by ID.
pub async fn list_members(
    State(state): State<AppState>,
) -> Result<Json<Vec<MemberSummary>>, AppError> {
    let members = state.ledger.list_members().await?;

    Ok(Json(
        members
            .into_iter()
            .map(|m| MemberSummary {
                member_id: m.member_id,
                name: m.name,
            })
            .collect(),
    ))
}

/// Single-row account view
#[derive(Debug, Serialize)]
pub struct AccountResponse {
    pub name: String,
    pub member_id: MemberId,
    pub total_paid: u64,
    pub last_payment_month: MonthField,
    pub valid_upto: MonthField,
    pub reference_month: Month,
    pub due_period: String,
    pub due_months: u64,
    pub due_amount: u64,
    pub has_dues: bool,
    pub message: String,
}

/// GET /members/:member_id
///
/// A member's record and dues as of `?month=` (default: this month).
pub async fn get_member(
    State(state): State<AppState>,
    Path(member_id): Path<String>,
    Query(query): Query<MonthQuery>,
) -> Result<Json<AccountResponse>, AppError> {
    let reference = query.reference_month()?;
    let account = state.ledger.member_account(&member_id, reference).await?;

    let has_dues = account.due.months_due() > 0;
    Ok(Json(AccountResponse {
        due_period: account.due.period_label(),
        due_months: account.due.months_due(),
        due_amount: account.due.amount_due(),
        has_dues,
        message: if has_dues {
            "Member has dues.".to_string()
        } else {
            "Member is up to date.".to_string()
        },
        name: account.member.name,
        member_id: account.member.member_id,
        total_paid: account.member.total_paid,
        last_payment_month: account.member.last_payment_month,
        valid_upto: account.member.valid_upto,
        reference_month: account.reference_month,
    }))
}

/// Request body for recording a payment
#[derive(Debug, Deserialize)]
pub struct PaymentRequest {
    pub amount: u64,
}

/// Response body for a recorded payment
#[derive(Debug, Serialize)]
pub struct PaymentResponse {
    pub member_id: MemberId,
    pub name: String,
    pub amount: u64,
    pub months_credited: u64,
    pub total_paid: u64,
    pub valid_upto: MonthField,
    pub message: String,
}

/// POST /members/:member_id/payments
///
/// Record a payment made this month. Amounts below one month's fee are
/// refused here; the ledger itself accepts any amount.
pub async fn record_payment(
    State(state): State<AppState>,
    Path(member_id): Path<String>,
    Json(request): Json<PaymentRequest>,
) -> Result<Json<PaymentResponse>, AppError> {
    let fee = state.ledger.monthly_fee();
    if request.amount < fee {
        return Err(AppError::BadRequest(format!(
            "Minimum payment is {} {}",
            CURRENCY, fee
        )));
    }

    let receipt = state
        .ledger
        .record_payment(&member_id, request.amount, Month::current())
        .await?;

    let member = receipt.member;
    Ok(Json(PaymentResponse {
        message: format!(
            "{} {} added. Valid upto: {}",
            CURRENCY, receipt.amount, member.valid_upto
        ),
        member_id: member.member_id,
        name: member.name,
        amount: receipt.amount,
        months_credited: receipt.months_credited,
        total_paid: member.total_paid,
        valid_upto: member.valid_upto,
    }))
}
