use chrono::NaiveDate;

use crate::db::Store;
use crate::error::LedgerResult;
use crate::models::{
    sum_money, CustomerStatus, DateWindow, InstallationReportRow, MonthlyReport, Period,
};

/// Balance sheet for one calendar month.
pub(crate) fn monthly_report(store: &Store<'_>, period: Period) -> LedgerResult<MonthlyReport> {
    monthly_report_within(store, period, period.window())
}

/// Like [`monthly_report`] with an explicit date window in place of the
/// period's own first-to-last-day bounds.
///
/// Subscription income needs both conditions at once: the payment's bill
/// belongs to `period` and the payment itself is dated inside `window`. A
/// late payment for an old bill is therefore counted in neither month.
/// `total_customers` is a current snapshot and ignores the window.
pub(crate) fn monthly_report_within(
    store: &Store<'_>,
    period: Period,
    window: DateWindow,
) -> LedgerResult<MonthlyReport> {
    let subscription_income = sum_money(store.subscription_payment_amounts(period, window)?);
    let installation_income = sum_money(store.paid_fees_completed_within(window)?);
    let material_expenses = sum_money(store.material_costs_completed_within(window)?);
    let total_customers = store.count_customers_with_status(CustomerStatus::Active)?;
    let new_installations = store.count_completed_within(window)?;

    let total_income = subscription_income + installation_income;
    let report = MonthlyReport {
        period,
        subscription_income,
        installation_income,
        total_income,
        material_expenses,
        net_balance: total_income - material_expenses,
        total_customers,
        new_installations,
    };
    tracing::debug!(
        period = %report.period,
        window_start = %window.start,
        window_end = %window.end,
        net_balance = %report.net_balance,
        "monthly report computed"
    );
    Ok(report)
}

/// Fee, cost and profit snapshot per installation, optionally limited to
/// those completed between `from` and `to` (inclusive).
pub(crate) fn installation_report(
    store: &Store<'_>,
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
) -> LedgerResult<Vec<InstallationReportRow>> {
    if let (Some(start), Some(end)) = (from, to) {
        DateWindow::new(start, end)?;
    }
    Ok(store
        .installations_with_customer(from, to)?
        .into_iter()
        .map(|(customer_name, inst)| InstallationReportRow {
            installation_id: inst.id,
            customer_name,
            installation_fee: inst.installation_fee,
            material_cost: inst.total_material_cost,
            profit_loss: inst.profit_loss,
            status: inst.status,
            completed_date: inst.completed_date,
        })
        .collect())
}

#[cfg(test)]
#[path = "report_tests.rs"]
mod tests;
