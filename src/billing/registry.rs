use rust_decimal::Decimal;

use crate::db::{Database, Store};
use crate::error::{LedgerError, LedgerResult};
use crate::models::{positive_money, Customer, CustomerUpdate, MaterialPreset, NewCustomer};

fn required(field: &str, value: &str) -> LedgerResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(LedgerError::invalid(format!("{field} must not be empty")));
    }
    Ok(trimmed.to_string())
}

fn optional_text(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

pub(crate) fn create_customer(store: &Store<'_>, new: NewCustomer) -> LedgerResult<Customer> {
    let new = NewCustomer {
        name: required("customer name", &new.name)?,
        address: required("customer address", &new.address)?,
        phone: optional_text(new.phone),
        ..new
    };
    let customer = store.insert_customer(&new)?;
    tracing::info!(customer_id = customer.id, name = %customer.name, "customer created");
    Ok(customer)
}

/// Change only the supplied fields. An empty phone clears it.
pub(crate) fn update_customer(
    db: &mut Database,
    id: i64,
    update: CustomerUpdate,
) -> LedgerResult<Customer> {
    db.atomically(|store| {
        let mut customer = store
            .get_customer(id)?
            .ok_or_else(|| LedgerError::not_found("customer", id))?;
        if let Some(name) = &update.name {
            customer.name = required("customer name", name)?;
        }
        if let Some(address) = &update.address {
            customer.address = required("customer address", address)?;
        }
        if update.phone.is_some() {
            customer.phone = optional_text(update.phone.clone());
        }
        if let Some(status) = update.status {
            customer.status = status;
        }
        store.update_customer(&customer)?;
        tracing::info!(customer_id = id, status = %customer.status, "customer updated");
        Ok(customer)
    })
}

pub(crate) fn create_material_preset(
    store: &Store<'_>,
    name: &str,
    default_unit_price: Decimal,
    unit: &str,
) -> LedgerResult<MaterialPreset> {
    let name = required("preset name", name)?;
    let unit = required("preset unit", unit)?;
    let default_unit_price = positive_money("default unit price", default_unit_price)?;
    let existing = store.get_presets()?;
    if MaterialPreset::find_by_name(&existing, &name).is_some() {
        return Err(LedgerError::Duplicate(format!("material preset '{name}' already exists")));
    }
    store.insert_preset(&name, default_unit_price, &unit)
}
