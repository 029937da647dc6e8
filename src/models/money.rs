use rust_decimal::{Decimal, RoundingStrategy};

use crate::error::{LedgerError, LedgerResult};

const MONEY_PLACES: u32 = 2;
const QUANTITY_PLACES: u32 = 3;

/// Round to currency precision, half away from zero, always carrying two
/// decimal places so stored strings stay uniform.
pub fn round_money(amount: Decimal) -> Decimal {
    let mut rounded =
        amount.round_dp_with_strategy(MONEY_PLACES, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(MONEY_PLACES);
    rounded
}

/// Sum an iterator of amounts at currency precision.
pub fn sum_money<I>(amounts: I) -> Decimal
where
    I: IntoIterator<Item = Decimal>,
{
    round_money(amounts.into_iter().sum())
}

fn within_places(field: &str, value: Decimal, places: u32) -> LedgerResult<Decimal> {
    if value.normalize().scale() > places {
        return Err(LedgerError::invalid(format!(
            "{field} {value} has more than {places} decimal places"
        )));
    }
    Ok(value)
}

/// An input amount that fits the money columns without rounding.
pub fn exact_money(field: &str, amount: Decimal) -> LedgerResult<Decimal> {
    within_places(field, amount, MONEY_PLACES).map(round_money)
}

pub fn positive_money(field: &str, amount: Decimal) -> LedgerResult<Decimal> {
    let amount = exact_money(field, amount)?;
    if amount <= Decimal::ZERO {
        return Err(LedgerError::invalid(format!(
            "{field} must be positive, got {amount}"
        )));
    }
    Ok(amount)
}

/// Material quantities hold at most three decimal places.
pub fn positive_quantity(quantity: Decimal) -> LedgerResult<Decimal> {
    let quantity = within_places("quantity", quantity, QUANTITY_PLACES)?;
    if quantity <= Decimal::ZERO {
        return Err(LedgerError::invalid(format!(
            "quantity must be positive, got {quantity}"
        )));
    }
    Ok(quantity)
}
