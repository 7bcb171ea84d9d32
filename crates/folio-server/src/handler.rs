use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::Json;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use folio_ledger::{
    Document, DocumentPatch, LedgerEntry, LedgerFilter, LedgerSummary, LifecycleAction, NewPayment,
    NewReceipt, NewTransaction,
};
use folio_store::{PaymentRecord, ReceiptRecord, TransactionRecord};
use folio_types::{AccountRef, DocumentId, DocumentKind, Period};

use crate::error::{ServerError, ServerResult};
use crate::state::AppState;

/// Health check handler.
pub async fn health_handler() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

/// Info handler.
pub async fn info_handler() -> Json<Value> {
    Json(json!({
        "name": "folio-server",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

#[derive(Debug, Default, Deserialize)]
pub struct NumberParams {
    pub kind: Option<String>,
    pub period: Option<String>,
}

/// Preview the next free number for a scheme. Nothing is reserved; the
/// number may be taken by the time it is used.
pub async fn allocate_number(
    State(state): State<AppState>,
    Path(scheme): Path<String>,
    Query(params): Query<NumberParams>,
) -> ServerResult<Json<Value>> {
    let period = parse_period(params.period.as_deref())?;
    let number = match scheme.as_str() {
        "transaction" => {
            state
                .read(move |books| books.allocate_transaction_number(period))
                .await?
        }
        "voucher" => {
            let kind = parse_kind(params.kind.as_deref())?.ok_or_else(|| {
                ServerError::BadRequest("voucher numbers need a document kind".into())
            })?;
            state
                .read(move |books| books.allocate_voucher_number(kind, period))
                .await?
        }
        "receipt-voucher" => {
            state
                .read(|books| books.allocate_receipt_voucher_number())
                .await?
        }
        "payment-voucher" => {
            state
                .read(|books| books.allocate_payment_voucher_number())
                .await?
        }
        other => {
            return Err(ServerError::BadRequest(format!(
                "unknown numbering scheme: {other}"
            )))
        }
    };
    Ok(Json(json!({ "scheme": scheme, "number": number })))
}

#[derive(Debug, Default, Deserialize)]
pub struct CreateParams {
    pub period: Option<String>,
}

pub async fn create_transaction(
    State(state): State<AppState>,
    Query(params): Query<CreateParams>,
    Json(draft): Json<NewTransaction>,
) -> ServerResult<(StatusCode, Json<TransactionRecord>)> {
    let period = parse_period(params.period.as_deref())?;
    let record = state
        .write(move |books| books.create_transaction(draft, period))
        .await?;
    Ok((StatusCode::CREATED, Json(record)))
}

pub async fn create_receipt(
    State(state): State<AppState>,
    Query(params): Query<CreateParams>,
    Json(draft): Json<NewReceipt>,
) -> ServerResult<(StatusCode, Json<ReceiptRecord>)> {
    let period = parse_period(params.period.as_deref())?;
    let record = state
        .write(move |books| books.create_receipt(draft, period))
        .await?;
    Ok((StatusCode::CREATED, Json(record)))
}

pub async fn create_payment(
    State(state): State<AppState>,
    Json(draft): Json<NewPayment>,
) -> ServerResult<(StatusCode, Json<PaymentRecord>)> {
    let record = state
        .write(move |books| books.create_payment(draft))
        .await?;
    Ok((StatusCode::CREATED, Json(record)))
}

pub async fn get_document(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ServerResult<Json<Document>> {
    let id = parse_id(&id)?;
    Ok(Json(state.read(move |books| books.get(&id)).await?))
}

pub async fn update_document(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(patch): Json<DocumentPatch>,
) -> ServerResult<Json<Document>> {
    let id = parse_id(&id)?;
    if patch.is_empty() {
        return Err(ServerError::BadRequest("empty patch".into()));
    }
    Ok(Json(
        state.write(move |books| books.update(&id, &patch)).await?,
    ))
}

#[derive(Debug, Deserialize)]
pub struct StatusBody {
    pub status: String,
}

pub async fn set_status(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<StatusBody>,
) -> ServerResult<Json<Document>> {
    let id = parse_id(&id)?;
    Ok(Json(
        state
            .write(move |books| books.set_status(&id, &body.status))
            .await?,
    ))
}

pub async fn apply_action(
    State(state): State<AppState>,
    Path((id, action)): Path<(String, String)>,
) -> ServerResult<Json<Document>> {
    let id = parse_id(&id)?;
    let action: LifecycleAction = action.parse()?;
    Ok(Json(
        state
            .write(move |books| books.transition(&id, action))
            .await?,
    ))
}

pub async fn delete_document(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ServerResult<Json<Value>> {
    let id = parse_id(&id)?;
    let deletion = state.write(move |books| books.delete(&id)).await?;
    Ok(Json(json!({ "id": id, "deletion": deletion })))
}

/// Listing filters plus paging, as query parameters.
#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub status: Option<String>,
    pub account: Option<String>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub search: Option<String>,
    pub limit: Option<usize>,
    pub offset: Option<usize>,
}

impl ListParams {
    fn filter(&self) -> ServerResult<LedgerFilter> {
        Ok(LedgerFilter {
            kind: parse_kind(self.kind.as_deref())?,
            status: non_empty(&self.status),
            account: non_empty(&self.account).map(AccountRef::new),
            from: self.from,
            to: self.to,
            search: non_empty(&self.search),
        })
    }
}

/// One slice of a listing.
#[derive(Debug, Serialize, Deserialize)]
pub struct Page<T> {
    pub total: usize,
    pub offset: usize,
    pub limit: usize,
    pub items: Vec<T>,
}

impl<T> Page<T> {
    fn slice(all: Vec<T>, offset: Option<usize>, limit: Option<usize>, max: usize) -> Self {
        let total = all.len();
        let offset = offset.unwrap_or(0);
        let limit = limit.unwrap_or(max).min(max);
        let items = all.into_iter().skip(offset).take(limit).collect();
        Self {
            total,
            offset,
            limit,
            items,
        }
    }
}

pub async fn list_ledger(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> ServerResult<Json<Page<LedgerEntry>>> {
    let filter = params.filter()?;
    let entries = state.read(move |books| books.list_ledger(&filter)).await?;
    Ok(Json(Page::slice(
        entries,
        params.offset,
        params.limit,
        state.max_page_size(),
    )))
}

pub async fn list_payments(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> ServerResult<Json<Page<PaymentRecord>>> {
    let filter = params.filter()?;
    let payments = state.read(move |books| books.list_payments(&filter)).await?;
    Ok(Json(Page::slice(
        payments,
        params.offset,
        params.limit,
        state.max_page_size(),
    )))
}

pub async fn summary(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> ServerResult<Json<LedgerSummary>> {
    let filter = params.filter()?;
    Ok(Json(state.read(move |books| books.summarize(&filter)).await?))
}

fn parse_id(text: &str) -> ServerResult<DocumentId> {
    text.parse()
        .map_err(|e: folio_types::TypeError| ServerError::BadRequest(e.to_string()))
}

fn parse_period(text: Option<&str>) -> ServerResult<Period> {
    match text {
        None | Some("") => Ok(Period::current()),
        Some(text) => text
            .parse()
            .map_err(|e: folio_types::TypeError| ServerError::BadRequest(e.to_string())),
    }
}

fn parse_kind(text: Option<&str>) -> ServerResult<Option<DocumentKind>> {
    match text {
        None | Some("") => Ok(None),
        Some(text) => text
            .parse()
            .map(Some)
            .map_err(|e: folio_types::TypeError| ServerError::BadRequest(e.to_string())),
    }
}

fn non_empty(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_slicing() {
        let page = Page::slice((1..=10).collect::<Vec<_>>(), Some(3), Some(4), 500);
        assert_eq!(page.total, 10);
        assert_eq!(page.items, vec![4, 5, 6, 7]);

        let capped = Page::slice((1..=10).collect::<Vec<_>>(), None, Some(1_000), 5);
        assert_eq!(capped.limit, 5);
        assert_eq!(capped.items.len(), 5);

        let past_end = Page::slice((1..=3).collect::<Vec<_>>(), Some(10), None, 500);
        assert!(past_end.items.is_empty());
        assert_eq!(past_end.total, 3);
    }

    #[test]
    fn list_params_to_filter() {
        let params = ListParams {
            kind: Some("receipt".into()),
            status: Some("  ".into()),
            account: Some("1010".into()),
            ..Default::default()
        };
        let filter = params.filter().unwrap();
        assert_eq!(filter.kind, Some(DocumentKind::Receipt));
        assert_eq!(filter.status, None);
        assert_eq!(filter.account, Some(AccountRef::new("1010")));
    }

    #[test]
    fn bad_inputs_are_bad_requests() {
        assert!(matches!(parse_id("nope"), Err(ServerError::BadRequest(_))));
        assert!(matches!(
            parse_period(Some("2024-13")),
            Err(ServerError::BadRequest(_))
        ));
        assert!(matches!(
            parse_kind(Some("Refund")),
            Err(ServerError::BadRequest(_))
        ));
    }
}
