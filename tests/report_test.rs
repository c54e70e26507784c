mod common;

use anyhow::Result;
use axum::http::{StatusCode, header};
use common::{body_text, credit, debit, get, test_app};

fn staged_files(temp: &tempfile::TempDir) -> Result<usize> {
    Ok(std::fs::read_dir(temp.path().join("staging"))?.count())
}

#[tokio::test]
async fn test_download_journal_report() -> Result<()> {
    let (app, service, temp) = test_app().await?;

    let rent = service.create_account("Rent").await?;
    let bank = service.create_account("Bank").await?;
    service.record_transaction(debit("2024-03-02", rent, 10000, "rent")).await?;
    service.record_transaction(credit("2024-03-01", bank, 2500, "fee")).await?;

    let response = get(
        &app,
        &format!("/download_journal_report?account_id={rent}&account_id={bank}"),
    )
    .await?;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::CONTENT_DISPOSITION],
        "attachment; filename=\"journal_report.txt\""
    );
    assert_eq!(staged_files(&temp)?, 1);

    let report = body_text(response).await?;
    let lines: Vec<&str> = report.lines().collect();
    assert_eq!(
        lines[0],
        format!("Journal Entries Report for Accounts: {rent}, {bank}")
    );
    assert_eq!(lines[2], "Date\t\tAccount\t\tDescription\t\tDebit\t\tCredit");
    assert_eq!(lines[3], "-".repeat(80));
    assert_eq!(lines[4], "2024-03-01\tBank\tfee\t0.00\t25.00");
    assert_eq!(lines[5], "2024-03-02\tRent\trent\t100.00\t0.00");
    assert_eq!(lines.len(), 6);

    assert_eq!(staged_files(&temp)?, 0);
    Ok(())
}

#[tokio::test]
async fn test_report_with_date_range() -> Result<()> {
    let (app, service, _temp) = test_app().await?;

    let cash = service.create_account("Cash").await?;
    for date in ["2023-12-31", "2024-01-10", "2024-02-01"] {
        service.record_transaction(debit(date, cash, 100, date)).await?;
    }

    let response = get(
        &app,
        &format!(
            "/download_journal_report?account_id={cash}&start_date=2024-01-01&end_date=2024-01-31"
        ),
    )
    .await?;
    let report = body_text(response).await?;

    assert!(report.contains("Date Range: 2024-01-01 to 2024-01-31\n\n"));
    assert!(report.contains("2024-01-10\tCash\t2024-01-10\t1.00\t0.00\n"));
    assert!(!report.contains("2023-12-31\tCash"));
    assert!(!report.contains("2024-02-01\tCash"));
    Ok(())
}

#[tokio::test]
async fn test_report_requires_account_selection() -> Result<()> {
    let (app, _service, temp) = test_app().await?;

    let response = get(&app, "/download_journal_report?start_date=2024-01-01").await?;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        body_text(response).await?,
        "No accounts selected for the report."
    );
    assert_eq!(staged_files(&temp)?, 0);
    Ok(())
}

#[tokio::test]
async fn test_unsent_report_is_cleaned_up() -> Result<()> {
    let (app, service, temp) = test_app().await?;
    let cash = service.create_account("Cash").await?;

    let response = get(&app, &format!("/download_journal_report?account_id={cash}")).await?;
    assert_eq!(staged_files(&temp)?, 1);

    // Client went away before the body was read
    drop(response);
    assert_eq!(staged_files(&temp)?, 0);
    Ok(())
}
