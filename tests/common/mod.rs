// Allow dead_code because these helpers are used across different test files
// which are compiled separately
#![allow(dead_code)]

use anyhow::Result;
use axum::Router;
use axum::body::Body;
use axum::http::{Request, Response, header};
use chrono::NaiveDate;
use http_body_util::BodyExt;
use ledgerbook::application::LedgerService;
use ledgerbook::domain::{AccountId, NewTransaction};
use ledgerbook::http::{AppState, create_router};
use tempfile::TempDir;
use tower::ServiceExt;

/// Helper to create a test service with a temporary database
pub async fn test_service() -> Result<(LedgerService, TempDir)> {
    let temp_dir = TempDir::new()?;
    let db_path = temp_dir.path().join("test.db");
    let service = LedgerService::init(db_path.to_str().unwrap()).await?;
    Ok((service, temp_dir))
}

/// Helper to create a router over a temporary database. Reports are staged
/// in the returned directory's `staging` subdirectory.
pub async fn test_app() -> Result<(Router, LedgerService, TempDir)> {
    let (service, temp_dir) = test_service().await?;
    let staging = temp_dir.path().join("staging");
    std::fs::create_dir(&staging)?;
    let app = create_router(AppState::new(service.clone(), staging));
    Ok((app, service, temp_dir))
}

/// Helper to parse a date string
pub fn parse_date(date_str: &str) -> NaiveDate {
    NaiveDate::parse_from_str(date_str, "%Y-%m-%d").unwrap()
}

/// Build a debit row
pub fn debit(date: &str, account_id: AccountId, cents: i64, description: &str) -> NewTransaction {
    NewTransaction {
        date: parse_date(date),
        account_id: Some(account_id),
        description: description.to_string(),
        debit_cents: cents,
        credit_cents: 0,
    }
}

/// Build a credit row
pub fn credit(date: &str, account_id: AccountId, cents: i64, description: &str) -> NewTransaction {
    NewTransaction {
        date: parse_date(date),
        account_id: Some(account_id),
        description: description.to_string(),
        debit_cents: 0,
        credit_cents: cents,
    }
}

pub async fn get(app: &Router, uri: &str) -> Result<Response<Body>> {
    let request = Request::builder().uri(uri).body(Body::empty())?;
    Ok(app.clone().oneshot(request).await?)
}

pub async fn post_form(app: &Router, uri: &str, body: &str) -> Result<Response<Body>> {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(body.to_string()))?;
    Ok(app.clone().oneshot(request).await?)
}

pub async fn body_text(response: Response<Body>) -> Result<String> {
    let bytes = response.into_body().collect().await?.to_bytes();
    Ok(String::from_utf8(bytes.to_vec())?)
}

pub async fn body_json(response: Response<Body>) -> Result<serde_json::Value> {
    let bytes = response.into_body().collect().await?.to_bytes();
    Ok(serde_json::from_slice(&bytes)?)
}
