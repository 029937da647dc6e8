use chrono::NaiveDate;
use std::collections::BTreeMap;

use crate::db::Store;
use crate::error::LedgerResult;
use crate::models::{round_money, ArrearsRow, Period};

/// Outstanding unpaid bills per customer as of `today`.
///
/// Customers without unpaid bills are left out. `periods_overdue` counts
/// calendar months from the oldest unpaid period to the period containing
/// `today`, never below zero. Rows are ordered by amount owed, largest first.
pub(crate) fn arrears(
    store: &Store<'_>,
    customer_id: Option<i64>,
    today: NaiveDate,
) -> LedgerResult<Vec<ArrearsRow>> {
    let current = Period::containing(today);
    let unpaid = store.unpaid_bills(customer_id)?;
    tracing::debug!(unpaid_bills = unpaid.len(), customer_id = ?customer_id, "aggregating arrears");

    let mut by_customer: BTreeMap<i64, ArrearsRow> = BTreeMap::new();
    for (customer_name, bill) in unpaid {
        by_customer
            .entry(bill.customer_id)
            .and_modify(|row| {
                row.total_outstanding += bill.amount;
                row.oldest_unpaid_period = row.oldest_unpaid_period.min(bill.bill_month);
            })
            .or_insert_with(|| ArrearsRow {
                customer_id: bill.customer_id,
                customer_name,
                total_outstanding: bill.amount,
                oldest_unpaid_period: bill.bill_month,
                periods_overdue: 0,
            });
    }

    let mut rows: Vec<ArrearsRow> = by_customer
        .into_values()
        .map(|mut row| {
            row.total_outstanding = round_money(row.total_outstanding);
            row.periods_overdue = row.oldest_unpaid_period.months_until(current).max(0);
            row
        })
        .collect();
    rows.sort_by(|a, b| {
        b.total_outstanding
            .cmp(&a.total_outstanding)
            .then_with(|| a.customer_name.cmp(&b.customer_name))
    });
    Ok(rows)
}

#[cfg(test)]
#[path = "arrears_tests.rs"]
mod tests;
