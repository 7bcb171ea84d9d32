//! HTTP server for Folio.
//!
//! Exposes the [`Books`](folio_ledger::Books) service as a JSON REST API:
//! number previews, document creation for the three stores, lookups,
//! lifecycle actions, edits, deletes, the merged ledger and its summary.
//! Ledger errors are mapped onto HTTP statuses in [`ServerError`].

pub mod config;
pub mod error;
pub mod handler;
pub mod router;
pub mod server;
pub mod state;

pub use config::ServerConfig;
pub use error::{ServerError, ServerResult};
pub use router::build_router;
pub use server::FolioServer;
pub use state::AppState;

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{Method, Request, StatusCode};
    use axum::Router;
    use serde_json::{json, Value};
    use tower::util::ServiceExt;

    fn app() -> Router {
        FolioServer::open(ServerConfig::default()).unwrap().router()
    }

    async fn send(
        app: &Router,
        method: Method,
        uri: &str,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let request = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => request
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => request.body(Body::empty()).unwrap(),
        };
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    fn invoice() -> Value {
        json!({
            "type": "Invoice",
            "date": "2024-06-03",
            "name": "Acme",
            "amount": "250.00",
            "paymentMethod": "Card"
        })
    }

    fn receipt(day: u32) -> Value {
        json!({
            "date": format!("2024-06-{day:02}"),
            "customerName": "Globex",
            "amount": "75.00",
            "paymentMethod": "Bank Transfer"
        })
    }

    #[tokio::test]
    async fn health_endpoint() {
        let (status, body) = send(&app(), Method::GET, "/v1/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn info_endpoint() {
        let (status, body) = send(&app(), Method::GET, "/v1/info", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["name"], "folio-server");
    }

    #[tokio::test]
    async fn create_and_fetch_transaction() {
        let app = app();
        let (status, created) = send(
            &app,
            Method::POST,
            "/v1/transactions?period=2024-06",
            Some(invoice()),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(created["transactionNumber"], "TXN24060001");
        assert_eq!(created["voucherNumber"], "I24060001");
        assert_eq!(created["status"], "Draft");

        let id = created["id"].as_str().unwrap();
        let (status, fetched) =
            send(&app, Method::GET, &format!("/v1/documents/{id}"), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(fetched["store"], "transaction");
        assert_eq!(fetched["name"], "Acme");
    }

    #[tokio::test]
    async fn number_preview_follows_existing_documents() {
        let app = app();
        send(&app, Method::POST, "/v1/receipts?period=2024-06", Some(receipt(1))).await;

        let (status, body) = send(
            &app,
            Method::POST,
            "/v1/numbers/transaction?period=2024-06",
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["number"], "TXN24060002");

        let (_, body) = send(&app, Method::POST, "/v1/numbers/receipt-voucher", None).await;
        assert_eq!(body["number"], "RCP0002");

        let (status, _) = send(&app, Method::POST, "/v1/numbers/voucher", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (_, body) = send(
            &app,
            Method::POST,
            "/v1/numbers/voucher?kind=bill&period=2024-06",
            None,
        )
        .await;
        assert_eq!(body["number"], "B24060001");
    }

    #[tokio::test]
    async fn lifecycle_over_http() {
        let app = app();
        let (_, created) = send(
            &app,
            Method::POST,
            "/v1/transactions?period=2024-06",
            Some(invoice()),
        )
        .await;
        let id = created["id"].as_str().unwrap().to_string();

        let (status, posted) = send(
            &app,
            Method::POST,
            &format!("/v1/documents/{id}/actions/post"),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(posted["status"], "Posted");

        let (status, body) = send(
            &app,
            Method::POST,
            &format!("/v1/documents/{id}/actions/post"),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["error"], "invalid_transition");

        let (status, _) = send(
            &app,
            Method::POST,
            &format!("/v1/documents/{id}/actions/approve"),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn receipt_status_assignment_is_guarded() {
        let app = app();
        let (_, created) = send(&app, Method::POST, "/v1/receipts", Some(receipt(2))).await;
        let id = created["id"].as_str().unwrap().to_string();
        let uri = format!("/v1/documents/{id}/status");

        let (status, _) = send(&app, Method::PUT, &uri, Some(json!({"status": "Completed"}))).await;
        assert_eq!(status, StatusCode::OK);
        let (status, _) = send(&app, Method::PUT, &uri, Some(json!({"status": "Draft"}))).await;
        assert_eq!(status, StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn ledger_filters_and_pages() {
        let app = app();
        send(&app, Method::POST, "/v1/transactions?period=2024-06", Some(invoice())).await;
        for day in 1..=3 {
            send(&app, Method::POST, "/v1/receipts?period=2024-06", Some(receipt(day))).await;
        }

        let (status, page) = send(&app, Method::GET, "/v1/ledger?type=Receipt", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(page["total"], 3);
        let dates: Vec<&str> = page["items"]
            .as_array()
            .unwrap()
            .iter()
            .map(|e| e["date"].as_str().unwrap())
            .collect();
        assert_eq!(dates, vec!["2024-06-03", "2024-06-02", "2024-06-01"]);

        let (_, page) = send(&app, Method::GET, "/v1/ledger?limit=2&offset=1", None).await;
        assert_eq!(page["total"], 4);
        assert_eq!(page["items"].as_array().unwrap().len(), 2);

        let (status, _) = send(&app, Method::GET, "/v1/ledger?type=Refund", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (_, summary) = send(&app, Method::GET, "/v1/summary", None).await;
        assert_eq!(summary["total"]["count"], 4);
    }

    #[tokio::test]
    async fn deletes_follow_store_rules() {
        let app = app();
        let (_, t) = send(&app, Method::POST, "/v1/transactions", Some(invoice())).await;
        let (_, r) = send(&app, Method::POST, "/v1/receipts", Some(receipt(1))).await;
        let t_id = t["id"].as_str().unwrap().to_string();
        let r_id = r["id"].as_str().unwrap().to_string();

        let (_, body) = send(&app, Method::DELETE, &format!("/v1/documents/{t_id}"), None).await;
        assert_eq!(body["deletion"], "deactivated");
        let (_, body) = send(&app, Method::DELETE, &format!("/v1/documents/{r_id}"), None).await;
        assert_eq!(body["deletion"], "removed");

        let (status, found) = send(&app, Method::GET, &format!("/v1/documents/{t_id}"), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(found["isActive"], false);

        let (status, body) = send(&app, Method::GET, &format!("/v1/documents/{r_id}"), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "not_found");

        let (_, page) = send(&app, Method::GET, "/v1/ledger", None).await;
        assert_eq!(page["total"], 0);
    }

    #[tokio::test]
    async fn validation_errors_are_bad_requests() {
        let app = app();
        let mut card_receipt = receipt(1);
        card_receipt["paymentMethod"] = json!("Card");
        let (status, body) = send(&app, Method::POST, "/v1/receipts", Some(card_receipt)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "validation");

        let (status, _) = send(&app, Method::GET, "/v1/documents/not-an-id", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn writes_are_persisted_to_the_data_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("books.json");
        let config = ServerConfig {
            data_file: Some(path.clone()),
            ..ServerConfig::default()
        };
        let app = FolioServer::open(config.clone()).unwrap().router();
        send(&app, Method::POST, "/v1/payments", Some(json!({
            "date": "2024-06-05",
            "supplierName": "Initech",
            "amount": "-40.00"
        })))
        .await;
        assert!(path.exists());

        let reopened = FolioServer::open(config).unwrap().router();
        let (_, page) = send(&reopened, Method::GET, "/v1/payments", None).await;
        assert_eq!(page["total"], 1);
        assert_eq!(page["items"][0]["voucherNumber"], "PV0001");
    }

    #[tokio::test]
    async fn failed_save_still_reports_the_change() {
        let dir = tempfile::tempdir().unwrap();
        let config = ServerConfig {
            data_file: Some(dir.path().join("missing").join("books.json")),
            ..ServerConfig::default()
        };
        let books = std::sync::Arc::new(folio_ledger::Books::in_memory(config.books.clone()));
        let app = build_router(AppState::new(books, &config));
        let payment = json!({
            "date": "2024-06-05",
            "supplierName": "Initech",
            "amount": "-40.00"
        });

        let (status, first) = send(&app, Method::POST, "/v1/payments", Some(payment.clone())).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(first["voucherNumber"], "PV0001");
        let (status, second) = send(&app, Method::POST, "/v1/payments", Some(payment)).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(second["voucherNumber"], "PV0002");

        let (_, page) = send(&app, Method::GET, "/v1/payments", None).await;
        assert_eq!(page["total"], 2);
        assert!(!dir.path().join("missing").exists());
    }
}
