//! Full integration tests for the ledger API
//!
//! Drive the HTTP router end to end against an in-memory blob store:
//! 1. Enroll a member
//! 2. Record payments
//! 3. Read the account and the due roster
//! 4. Download the printable due list
//!
//! Run with: cargo test integration_tests

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::http::StatusCode;
    use axum_test::TestServer;
    use serde_json::{json, Value};

    use crate::app::{LedgerService, LedgerSettings};
    use crate::domain::entities::Month;
    use crate::domain::ports::BlobStore;
    use crate::test_utils::{FailingBlobStore, InMemoryBlobStore};
    use crate::{build_router, AppState};

    fn server_with(store: Arc<dyn BlobStore>) -> TestServer {
        let state = AppState {
            ledger: Arc::new(LedgerService::new(store, LedgerSettings::default())),
            club_name: "RKSC Club".to_string(),
        };
        TestServer::new(build_router(state)).unwrap()
    }

    fn test_server() -> TestServer {
        server_with(Arc::new(InMemoryBlobStore::new()))
    }

    fn seeded_server() -> TestServer {
        server_with(Arc::new(
            InMemoryBlobStore::new()
                .with_blob(
                    "/members/RKSC0001.txt",
                    "Name: Asha\nMember ID: RKSC0001\nTotal Paid: 60\nLast Payment Month: DEC24\nValid Upto: FEB25\n",
                )
                .with_blob(
                    "/members/RKSC0002.txt",
                    "Name: Ravi\nMember ID: RKSC0002\nTotal Paid: 40\nLast Payment Month: DEC24\nValid Upto: JAN25\n",
                )
                .with_blob(
                    "/members/RKSC0003.txt",
                    "Name: Meena\nMember ID: RKSC0003\nTotal Paid: 80\nLast Payment Month: FEB25\nValid Upto: MAY25\n",
                ),
        ))
    }

    #[tokio::test]
    async fn health_reports_ok() {
        let server = test_server();

        let response = server.get("/health").await;

        response.assert_status_ok();
        assert_eq!(response.json::<Value>()["status"], "ok");
    }

    #[tokio::test]
    async fn add_member_returns_new_id() {
        let server = test_server();

        let response = server
            .post("/members")
            .json(&json!({ "name": "Asha Rao" }))
            .await;

        response.assert_status(StatusCode::CREATED);
        let body: Value = response.json();
        assert_eq!(body["member_id"], "RKSC0001");
        assert_eq!(body["name"], "Asha Rao");
        assert_eq!(body["message"], "Member added successfully with ID: RKSC0001");
    }

    #[tokio::test]
    async fn add_member_rejects_blank_name() {
        let server = test_server();

        let response = server.post("/members").json(&json!({ "name": "  " })).await;

        response.assert_status(StatusCode::BAD_REQUEST);
        assert_eq!(response.json::<Value>()["details"], "Please enter the name");
    }

    #[tokio::test]
    async fn enroll_pay_and_view_account() {
        let server = test_server();
        server
            .post("/members")
            .json(&json!({ "name": "Asha" }))
            .await
            .assert_status(StatusCode::CREATED);

        let response = server
            .post("/members/RKSC0001/payments")
            .json(&json!({ "amount": 60 }))
            .await;

        response.assert_status_ok();
        let expected_valid_upto = Month::current().shift(2).unwrap().to_string();
        let body: Value = response.json();
        assert_eq!(body["months_credited"], 3);
        assert_eq!(body["total_paid"], 60);
        assert_eq!(body["valid_upto"], expected_valid_upto.as_str());
        assert_eq!(
            body["message"],
            format!("INR 60 added. Valid upto: {}", expected_valid_upto)
        );

        let account: Value = server.get("/members/RKSC0001").await.json();
        assert_eq!(account["has_dues"], false);
        assert_eq!(account["due_period"], "No dues");
        assert_eq!(account["message"], "Member is up to date.");
        assert_eq!(
            account["last_payment_month"],
            Month::current().to_string().as_str()
        );
    }

    #[tokio::test]
    async fn new_member_account_shows_unset_months() {
        let server = test_server();
        server
            .post("/members")
            .json(&json!({ "name": "Asha" }))
            .await
            .assert_status(StatusCode::CREATED);

        let account: Value = server
            .get("/members/RKSC0001")
            .add_query_param("month", "MAR25")
            .await
            .json();

        assert_eq!(account["valid_upto"], Value::Null);
        assert_eq!(account["due_period"], "MAR25 - MAR25");
        assert_eq!(account["due_amount"], 20);
        assert_eq!(account["message"], "Member has dues.");
    }

    #[tokio::test]
    async fn payment_below_fee_is_rejected() {
        let server = seeded_server();

        let response = server
            .post("/members/RKSC0001/payments")
            .json(&json!({ "amount": 10 }))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        assert_eq!(
            response.json::<Value>()["details"],
            "Minimum payment is INR 20"
        );
    }

    #[tokio::test]
    async fn unknown_member_is_not_found() {
        let server = seeded_server();

        server
            .get("/members/RKSC0042")
            .await
            .assert_status(StatusCode::NOT_FOUND);
        server
            .post("/members/RKSC0042/payments")
            .json(&json!({ "amount": 20 }))
            .await
            .assert_status(StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn list_members_is_ordered_by_id() {
        let server = seeded_server();

        let members: Vec<Value> = server.get("/members").await.json();

        let ids: Vec<&str> = members
            .iter()
            .filter_map(|m| m["member_id"].as_str())
            .collect();
        assert_eq!(ids, vec!["RKSC0001", "RKSC0002", "RKSC0003"]);
    }

    #[tokio::test]
    async fn dues_roster_for_reference_month() {
        let server = seeded_server();

        let response = server.get("/dues").add_query_param("month", "MAR25").await;

        response.assert_status_ok();
        let roster: Value = response.json();
        assert_eq!(roster["reference_month"], "MAR25");
        assert_eq!(roster["entries"].as_array().unwrap().len(), 2);
        assert_eq!(roster["entries"][0]["member_id"], "RKSC0001");
        assert_eq!(roster["entries"][0]["period"]["months_due"], 1);
        assert_eq!(roster["entries"][1]["member_id"], "RKSC0002");
        assert_eq!(roster["entries"][1]["period"]["start_month"], "FEB25");
        assert_eq!(roster["total"]["months_due"], 3);
        assert_eq!(roster["total"]["amount_due"], 60);
    }

    #[tokio::test]
    async fn dues_with_invalid_month_is_bad_request() {
        let server = seeded_server();

        server
            .get("/dues")
            .add_query_param("month", "March")
            .await
            .assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn dues_report_is_markdown_download() {
        let server = seeded_server();

        let response = server
            .get("/dues/report")
            .add_query_param("month", "MAR25")
            .await;

        response.assert_status_ok();
        assert_eq!(
            response.header("content-disposition"),
            "attachment; filename=\"duelist_01_March_2025.md\""
        );
        let text = response.text();
        assert!(text.starts_with("# RKSC Club - Due List (01 March 2025)"));
        assert!(text.contains("| Ravi | RKSC0002 | FEB25 - MAR25 | 2 | INR 40 |"));
        assert!(text.contains("| **TOTAL** | | | **3** | **INR 60** |"));
    }

    #[tokio::test]
    async fn dues_report_with_no_dues() {
        let server = test_server();

        let text = server
            .get("/dues/report")
            .add_query_param("month", "MAR25")
            .await
            .text();

        assert!(text.contains("No dues. All members are up to date!"));
    }

    #[tokio::test]
    async fn unknown_route_is_json_404() {
        let server = test_server();

        let response = server.get("/payments").await;

        response.assert_status(StatusCode::NOT_FOUND);
        assert_eq!(response.json::<Value>()["error"], "Not found");
    }

    #[tokio::test]
    async fn storage_outage_is_bad_gateway() {
        let server = server_with(Arc::new(FailingBlobStore));

        server
            .get("/dues")
            .add_query_param("month", "MAR25")
            .await
            .assert_status(StatusCode::BAD_GATEWAY);
    }
}
