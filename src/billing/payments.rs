use crate::db::{Database, Store};
use crate::error::{LedgerError, LedgerResult};
use crate::models::{positive_money, BillStatus, NewPayment, Payment};

/// Record a payment and settle the referenced bill when this payment alone
/// covers its face amount.
///
/// Payments without a bill are arrears payments and touch no bill. Earlier
/// payments against the same bill are not added up: two partial payments
/// leave the bill unpaid.
pub(crate) fn record_payment(db: &mut Database, new: NewPayment) -> LedgerResult<Payment> {
    let amount = positive_money("payment amount", new.amount).map_err(|err| {
        tracing::warn!(customer_id = new.customer_id, amount = %new.amount, "rejected payment amount");
        err
    })?;
    let new = NewPayment {
        amount,
        notes: new.notes.filter(|n| !n.trim().is_empty()),
        ..new
    };

    let (payment, settled) = db.atomically(|store| record_in(store, &new))?;
    tracing::info!(
        payment_id = payment.id,
        customer_id = payment.customer_id,
        bill_id = ?payment.bill_id,
        amount = %payment.amount,
        settled,
        "payment recorded"
    );
    Ok(payment)
}

fn record_in(store: &Store<'_>, new: &NewPayment) -> LedgerResult<(Payment, bool)> {
    if store.get_customer(new.customer_id)?.is_none() {
        return Err(LedgerError::not_found("customer", new.customer_id));
    }

    let bill = match new.bill_id {
        Some(bill_id) => {
            let bill = store
                .get_bill(bill_id)?
                .ok_or_else(|| LedgerError::not_found("bill", bill_id))?;
            if bill.customer_id != new.customer_id {
                return Err(LedgerError::invalid(format!(
                    "bill {bill_id} belongs to customer {}, not {}",
                    bill.customer_id, new.customer_id
                )));
            }
            Some(bill)
        }
        None => None,
    };

    let payment = store.insert_payment(new)?;

    let mut settled = false;
    if let Some(bill) = bill {
        if !bill.bill_month.contains(payment.payment_date) {
            tracing::debug!(
                bill_id = bill.id,
                bill_month = %bill.bill_month,
                payment_date = %payment.payment_date,
                "payment dated outside its bill's period, excluded from monthly income"
            );
        }
        if !bill.is_paid() && bill.is_settled_by(payment.amount) {
            store.set_bill_status(bill.id, BillStatus::Paid)?;
            settled = true;
        }
    }
    Ok((payment, settled))
}

#[cfg(test)]
#[path = "payments_tests.rs"]
mod tests;
