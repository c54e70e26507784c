//! Journal report download.

use axum::{
    Router,
    body::Body,
    extract::State,
    http::header,
    response::{IntoResponse, Response},
    routing::get,
};
use axum_extra::extract::Query;
use serde::Deserialize;
use tracing::info;

use super::{non_blank, parse_account_ref};
use crate::application::{AppError, JournalFilter};
use crate::domain::parse_date;
use crate::http::AppState;
use crate::io::{JOURNAL_REPORT_FILENAME, StagedReport, render_journal_report};

/// Creates the report routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/download_journal_report", get(download_journal_report))
}

/// Query string of the report download; `account_id` may repeat.
#[derive(Debug, Default, Deserialize)]
pub struct JournalReportQuery {
    #[serde(default)]
    pub account_id: Vec<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

impl JournalReportQuery {
    pub fn into_filter(self) -> Result<JournalFilter, AppError> {
        if self.account_id.is_empty() {
            return Err(AppError::validation("No accounts selected for the report."));
        }

        let account_ids = self
            .account_id
            .iter()
            .map(String::as_str)
            .map(parse_account_ref)
            .collect::<Result<Vec<_>, _>>()?;

        let mut filter = JournalFilter::new(account_ids);
        if let Some(start) = non_blank(self.start_date.as_deref()) {
            filter = filter.with_start_date(parse_date(start).ok_or_else(AppError::invalid_date)?);
        }
        if let Some(end) = non_blank(self.end_date.as_deref()) {
            filter = filter.with_end_date(parse_date(end).ok_or_else(AppError::invalid_date)?);
        }
        Ok(filter)
    }
}

/// GET `/download_journal_report` - Tab-delimited journal as an attachment.
///
/// The document is staged in a temporary file that lives exactly as long as
/// the response body.
async fn download_journal_report(
    State(state): State<AppState>,
    Query(query): Query<JournalReportQuery>,
) -> Result<Response, AppError> {
    let filter = query.into_filter()?;
    let lines = state.ledger.query_journal(&filter).await?;
    let report = render_journal_report(&filter, &lines);

    let staged = StagedReport::stage(&report, &state.staging_dir)?;
    info!(
        accounts = filter.account_ids.len(),
        lines = lines.len(),
        path = %staged.path().display(),
        "Journal report staged"
    );

    let headers = [
        (header::CONTENT_TYPE, "text/plain; charset=utf-8".to_string()),
        (
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", JOURNAL_REPORT_FILENAME),
        ),
    ];
    Ok((headers, Body::from_stream(staged.into_stream())).into_response())
}
