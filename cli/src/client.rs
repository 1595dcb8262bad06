//! HTTP client for the RKSC ledger API

use anyhow::{Context, Result};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_DISPOSITION};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// HTTP client for communicating with the ledger API
#[derive(Clone)]
pub struct LedgerClient {
    client: reqwest::Client,
    base_url: String,
}

impl LedgerClient {
    /// Create a new client for the API at `base_url`
    pub fn new(base_url: &str) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    #[cfg(test)]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Enroll a member
    pub async fn add_member(&self, name: &str) -> Result<AddMemberResponse> {
        self.post_json(
            "/members",
            &AddMemberRequest {
                name: name.to_string(),
            },
        )
        .await
    }

    /// Record a payment made this month
    pub async fn record_payment(&self, member_id: &str, amount: u64) -> Result<PaymentResponse> {
        self.post_json(
            &format!("{}/payments", member_path(member_id)?),
            &PaymentRequest { amount },
        )
        .await
    }

    /// All members, ordered by ID
    pub async fn list_members(&self) -> Result<Vec<MemberSummary>> {
        self.get_json("/members", None).await
    }

    /// A member's record and dues
    pub async fn account(&self, member_id: &str, month: Option<&str>) -> Result<AccountResponse> {
        self.get_json(&member_path(member_id)?, month).await
    }

    /// Members owing dues, with totals
    pub async fn dues(&self, month: Option<&str>) -> Result<DueRoster> {
        self.get_json("/dues", month).await
    }

    /// Printable due list and its suggested file name
    pub async fn due_report(&self, month: Option<&str>) -> Result<DueReport> {
        let response = self
            .request(reqwest::Method::GET, "/dues/report", month)
            .header(ACCEPT, "text/markdown")
            .send()
            .await
            .context("Failed to GET /dues/report")?;

        let file_name = response
            .headers()
            .get(CONTENT_DISPOSITION)
            .and_then(|v| v.to_str().ok())
            .and_then(attachment_file_name)
            .unwrap_or_else(|| "duelist.md".to_string());

        let body = handle_text_response(response).await?;
        Ok(DueReport { file_name, body })
    }

    // --- Internal helpers ---

    fn request(
        &self,
        method: reqwest::Method,
        path: &str,
        month: Option<&str>,
    ) -> reqwest::RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        let builder = self.client.request(method, &url);
        match month {
            Some(month) => builder.query(&[("month", month)]),
            None => builder,
        }
    }

    async fn get_json<R: DeserializeOwned>(&self, path: &str, month: Option<&str>) -> Result<R> {
        let response = self
            .request(reqwest::Method::GET, path, month)
            .send()
            .await
            .with_context(|| format!("Failed to GET {}", path))?;

        handle_json_response(response).await
    }

    async fn post_json<T: Serialize, R: DeserializeOwned>(&self, path: &str, body: &T) -> Result<R> {
        let response = self
            .request(reqwest::Method::POST, path, None)
            .json(body)
            .send()
            .await
            .with_context(|| format!("Failed to POST {}", path))?;

        handle_json_response(response).await
    }
}

async fn handle_text_response(response: reqwest::Response) -> Result<String> {
    let status = response.status();
    let body = response
        .text()
        .await
        .context("Failed to read response body")?;

    if !status.is_success() {
        anyhow::bail!(api_error_message(status.as_u16(), &body));
    }

    Ok(body)
}

async fn handle_json_response<R: DeserializeOwned>(response: reqwest::Response) -> Result<R> {
    let body = handle_text_response(response).await?;
    serde_json::from_str(&body).context("Unexpected response from ledger API")
}

/// `/members/<id>`, refusing IDs that would change the route
fn member_path(member_id: &str) -> Result<String> {
    if member_id.is_empty() || !member_id.chars().all(|c| c.is_ascii_alphanumeric()) {
        anyhow::bail!(
            "Invalid member ID '{}': use letters and digits only, e.g. RKSC0001",
            member_id
        );
    }
    Ok(format!("/members/{}", member_id))
}

/// Readable message for an error response
fn api_error_message(status: u16, body: &str) -> String {
    match serde_json::from_str::<ErrorBody>(body) {
        Ok(ErrorBody {
            error,
            details: Some(details),
        }) => format!("{}: {}", error, details),
        Ok(ErrorBody { error, .. }) => format!("{} ({})", error, status),
        Err(_) => format!("API error ({}): {}", status, body),
    }
}

/// File name from a `Content-Disposition: attachment; filename="..."` value
fn attachment_file_name(value: &str) -> Option<String> {
    value
        .split(';')
        .map(str::trim)
        .find_map(|part| part.strip_prefix("filename="))
        .map(|name| name.trim_matches('"'))
        .filter(|name| !name.is_empty() && !name.contains(|c| c == '/' || c == '\\'))
        .map(str::to_string)
}

// --- Request Types ---

#[derive(Debug, Serialize)]
struct AddMemberRequest {
    name: String,
}

#[derive(Debug, Serialize)]
struct PaymentRequest {
    amount: u64,
}

// --- Response Types ---

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
    details: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct AddMemberResponse {
    pub member_id: String,
    pub name: String,
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub struct PaymentResponse {
    pub member_id: String,
    pub name: String,
    pub amount: u64,
    pub months_credited: u64,
    pub total_paid: u64,
    pub valid_upto: Option<String>,
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub struct MemberSummary {
    pub member_id: String,
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct AccountResponse {
    pub name: String,
    pub member_id: String,
    pub total_paid: u64,
    pub last_payment_month: Option<String>,
    pub valid_upto: Option<String>,
    pub reference_month: String,
    pub due_period: String,
    pub due_months: u64,
    pub due_amount: u64,
    pub has_dues: bool,
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub struct DuePeriod {
    pub start_month: String,
    pub end_month: String,
    pub months_due: u64,
    pub amount_due: u64,
}

#[derive(Debug, Deserialize)]
pub struct DueEntry {
    pub name: String,
    pub member_id: String,
    pub period: DuePeriod,
}

#[derive(Debug, Deserialize)]
pub struct DueTotals {
    pub months_due: u64,
    pub amount_due: u64,
}

#[derive(Debug, Deserialize)]
pub struct DueRoster {
    pub reference_month: String,
    pub entries: Vec<DueEntry>,
    pub total: DueTotals,
}

pub struct DueReport {
    pub file_name: String,
    pub body: String,
}
