use anyhow::{Context, Result};
use std::path::Path;

use crate::models::{ArrearsRow, InstallationReportRow, MonthlyReport};

fn writer(path: &Path) -> Result<csv::Writer<std::fs::File>> {
    csv::Writer::from_path(path)
        .with_context(|| format!("Failed to create CSV file: {}", path.display()))
}

/// Write the arrears report; returns the number of data rows.
pub(crate) fn write_arrears(path: &Path, rows: &[ArrearsRow]) -> Result<usize> {
    let mut wtr = writer(path)?;
    wtr.write_record([
        "customer_id",
        "customer_name",
        "total_outstanding",
        "oldest_unpaid_period",
        "periods_overdue",
    ])?;
    for row in rows {
        wtr.write_record([
            row.customer_id.to_string(),
            row.customer_name.clone(),
            row.total_outstanding.to_string(),
            row.oldest_unpaid_period.to_string(),
            row.periods_overdue.to_string(),
        ])?;
    }
    wtr.flush().context("Failed to flush CSV file")?;
    Ok(rows.len())
}

pub(crate) fn write_installation_report(
    path: &Path,
    rows: &[InstallationReportRow],
) -> Result<usize> {
    let mut wtr = writer(path)?;
    wtr.write_record([
        "installation_id",
        "customer_name",
        "installation_fee",
        "material_cost",
        "profit_loss",
        "status",
        "completed_date",
    ])?;
    for row in rows {
        wtr.write_record([
            row.installation_id.to_string(),
            row.customer_name.clone(),
            row.installation_fee.to_string(),
            row.material_cost.to_string(),
            row.profit_loss.to_string(),
            row.status.to_string(),
            row.completed_date.map(|d| d.to_string()).unwrap_or_default(),
        ])?;
    }
    wtr.flush().context("Failed to flush CSV file")?;
    Ok(rows.len())
}

/// One header row and one value row.
pub(crate) fn write_monthly_report(path: &Path, report: &MonthlyReport) -> Result<()> {
    let mut wtr = writer(path)?;
    wtr.write_record([
        "period",
        "subscription_income",
        "installation_income",
        "total_income",
        "material_expenses",
        "net_balance",
        "total_customers",
        "new_installations",
    ])?;
    wtr.write_record([
        report.period.to_string(),
        report.subscription_income.to_string(),
        report.installation_income.to_string(),
        report.total_income.to_string(),
        report.material_expenses.to_string(),
        report.net_balance.to_string(),
        report.total_customers.to_string(),
        report.new_installations.to_string(),
    ])?;
    wtr.flush().context("Failed to flush CSV file")?;
    Ok(())
}
