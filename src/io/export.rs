use std::io::Write;
use std::path::Path;
use std::pin::Pin;
use std::task::{Context as TaskContext, Poll};

use anyhow::{Context, Result};
use bytes::Bytes;
use futures::Stream;
use tempfile::TempPath;
use tokio_util::io::ReaderStream;

use crate::application::JournalFilter;
use crate::domain::{JournalLine, format_cents, format_date};

/// File name offered to the client for the journal report download.
pub const JOURNAL_REPORT_FILENAME: &str = "journal_report.txt";

const RULE_WIDTH: usize = 80;

/// Render the tab-delimited journal report.
pub fn render_journal_report(filter: &JournalFilter, lines: &[JournalLine]) -> String {
    let accounts = filter
        .account_ids
        .iter()
        .map(|id| id.to_string())
        .collect::<Vec<_>>()
        .join(", ");

    let mut report = format!("Journal Entries Report for Accounts: {}\n\n", accounts);

    if filter.has_date_range() {
        let start = filter
            .start_date
            .map(format_date)
            .unwrap_or_else(|| "Start".to_string());
        let end = filter
            .end_date
            .map(format_date)
            .unwrap_or_else(|| "End".to_string());
        report.push_str(&format!("Date Range: {} to {}\n\n", start, end));
    }

    report.push_str("Date\t\tAccount\t\tDescription\t\tDebit\t\tCredit\n");
    report.push_str(&"-".repeat(RULE_WIDTH));
    report.push('\n');

    for line in lines {
        let t = &line.transaction;
        report.push_str(&format!(
            "{}\t{}\t{}\t{}\t{}\n",
            format_date(t.date),
            line.account_name,
            t.description,
            format_cents(t.debit_cents),
            format_cents(t.credit_cents),
        ));
    }

    report
}

/// A rendered report written to a temporary file in a staging directory.
///
/// The file is removed when this value, or the stream it turns into, is
/// dropped.
pub struct StagedReport {
    path: TempPath,
    file: tokio::fs::File,
}

impl StagedReport {
    /// Write `content` to a fresh temporary file inside `dir`.
    pub fn stage(content: &str, dir: &Path) -> Result<Self> {
        let mut temp = tempfile::Builder::new()
            .prefix("journal_report_")
            .suffix(".txt")
            .tempfile_in(dir)
            .with_context(|| format!("Failed to create report file in {}", dir.display()))?;

        temp.write_all(content.as_bytes())
            .context("Failed to write report file")?;
        temp.flush().context("Failed to flush report file")?;

        let reader = temp.reopen().context("Failed to reopen report file")?;
        Ok(Self {
            path: temp.into_temp_path(),
            file: tokio::fs::File::from_std(reader),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Turn the staged file into a byte stream that owns the file's lifetime.
    pub fn into_stream(self) -> ReportStream {
        ReportStream {
            inner: ReaderStream::new(self.file),
            _path: self.path,
        }
    }
}

/// Streams a staged report; dropping it deletes the staged file, whether or
/// not the stream was read to the end.
pub struct ReportStream {
    inner: ReaderStream<tokio::fs::File>,
    _path: TempPath,
}

impl Stream for ReportStream {
    type Item = std::io::Result<Bytes>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut TaskContext<'_>) -> Poll<Option<Self::Item>> {
        Pin::new(&mut self.inner).poll_next(cx)
    }
}
