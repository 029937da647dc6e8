use rust_decimal::Decimal;

use crate::config::BillingConfig;
use crate::db::{Database, Store};
use crate::error::LedgerResult;
use crate::models::{positive_money, MonthlyBill, Period};

/// Create one unpaid bill for every eligible customer not yet billed for
/// `period`, returning only the bills created by this call.
///
/// Eligible means active with a subscription that started before the first
/// day of the period. `amount` defaults to the configured monthly fee. The
/// whole batch commits or none of it does.
pub(crate) fn generate_monthly_bills(
    db: &mut Database,
    period: Period,
    amount: Option<Decimal>,
) -> LedgerResult<Vec<MonthlyBill>> {
    let bills = db.atomically(|store| generate_in(store, period, amount))?;
    tracing::info!(period = %period, created = bills.len(), "monthly bills generated");
    Ok(bills)
}

fn generate_in(
    store: &Store<'_>,
    period: Period,
    amount: Option<Decimal>,
) -> LedgerResult<Vec<MonthlyBill>> {
    let amount = match amount {
        Some(a) => a,
        None => BillingConfig::load(store)?.monthly_fee,
    };
    let amount = positive_money("bill amount", amount)?;

    let eligible = store.active_customers_subscribed_before(period.first_day())?;
    if eligible.is_empty() {
        tracing::debug!(period = %period, "no eligible customers");
        return Ok(Vec::new());
    }

    let already_billed = store.billed_customer_ids(period)?;
    let due_date = period.due_date();
    let mut created = Vec::new();
    for customer in &eligible {
        if already_billed.contains(&customer.id) {
            tracing::debug!(customer_id = customer.id, period = %period, "already billed, skipping");
            continue;
        }
        created.push(store.insert_bill(customer.id, period, amount, due_date)?);
    }
    Ok(created)
}

#[cfg(test)]
#[path = "bills_tests.rs"]
mod tests;
