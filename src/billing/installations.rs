use crate::config::BillingConfig;
use crate::db::{Database, Store};
use crate::error::{LedgerError, LedgerResult};
use crate::models::{
    exact_money, positive_money, positive_quantity, round_money, sum_money, CustomerStatus,
    Installation, InstallationMaterial, InstallationStatus, InstallationUpdate, NewInstallation,
    NewMaterial,
};

/// Invoked inside the update transaction whenever an installation is marked
/// completed. An error aborts the whole update.
pub(crate) trait CompletionHook {
    fn installation_completed(
        &self,
        store: &Store<'_>,
        installation: &Installation,
    ) -> LedgerResult<()>;
}

/// Completing an installation makes its customer an active, billable subscriber.
pub(crate) struct ActivateCustomer;

impl CompletionHook for ActivateCustomer {
    fn installation_completed(
        &self,
        store: &Store<'_>,
        installation: &Installation,
    ) -> LedgerResult<()> {
        let changed = store.set_customer_status(installation.customer_id, CustomerStatus::Active)?;
        if changed == 0 {
            return Err(LedgerError::not_found("customer", installation.customer_id));
        }
        tracing::debug!(
            customer_id = installation.customer_id,
            installation_id = installation.id,
            "customer activated by completed installation"
        );
        Ok(())
    }
}

pub(crate) fn create_installation(
    db: &mut Database,
    new: NewInstallation,
) -> LedgerResult<Installation> {
    let installation = db.atomically(|store| {
        if store.get_customer(new.customer_id)?.is_none() {
            return Err(LedgerError::not_found("customer", new.customer_id));
        }
        let fee = match new.installation_fee {
            Some(fee) => fee,
            None => BillingConfig::load(store)?.installation_fee,
        };
        let fee = exact_money("installation fee", fee)?;
        if fee.is_sign_negative() {
            return Err(LedgerError::invalid(format!(
                "installation fee must not be negative, got {fee}"
            )));
        }
        store.insert_installation(new.customer_id, fee, new.scheduled_date)
    })?;
    tracing::info!(
        installation_id = installation.id,
        customer_id = installation.customer_id,
        fee = %installation.installation_fee,
        "installation created"
    );
    Ok(installation)
}

/// Append a material line and fold its cost into the installation's running
/// totals in the same transaction.
pub(crate) fn add_installation_material(
    db: &mut Database,
    new: NewMaterial,
) -> LedgerResult<InstallationMaterial> {
    let new = validate_material(new)?;
    let material = db.atomically(|store| {
        let mut installation = store
            .get_installation(new.installation_id)?
            .ok_or_else(|| LedgerError::not_found("installation", new.installation_id))?;

        let total_cost = round_money(new.quantity * new.unit_price);
        let material = store.insert_material(&new, total_cost)?;

        installation.apply_material_cost(installation.total_material_cost + total_cost);
        store.set_installation_totals(
            installation.id,
            installation.total_material_cost,
            installation.profit_loss,
        )?;
        Ok(material)
    })?;
    tracing::info!(
        installation_id = material.installation_id,
        material = %material.material_name,
        total_cost = %material.total_cost,
        "installation material added"
    );
    Ok(material)
}

fn validate_material(new: NewMaterial) -> LedgerResult<NewMaterial> {
    let material_name = new.material_name.trim().to_string();
    if material_name.is_empty() {
        return Err(LedgerError::invalid("material name must not be empty"));
    }
    Ok(NewMaterial {
        material_name,
        quantity: positive_quantity(new.quantity)?,
        unit_price: positive_money("unit price", new.unit_price)?,
        ..new
    })
}

/// Apply status, fee flag and completion date changes after recomputing the
/// running totals from every stored material row.
///
/// Setting the status to completed calls `hook` before commit.
pub(crate) fn update_installation(
    db: &mut Database,
    id: i64,
    update: InstallationUpdate,
    hook: &dyn CompletionHook,
) -> LedgerResult<Installation> {
    let installation = db.atomically(|store| {
        let mut installation = store
            .get_installation(id)?
            .ok_or_else(|| LedgerError::not_found("installation", id))?;

        let materials = store.get_materials(id)?;
        installation.apply_material_cost(sum_money(materials.iter().map(|m| m.total_cost)));

        if let Some(status) = update.status {
            installation.status = status;
        }
        if let Some(fee_paid) = update.fee_paid {
            installation.fee_paid = fee_paid;
        }
        if let Some(completed_date) = update.completed_date {
            installation.completed_date = Some(completed_date);
        }
        store.save_installation(&installation)?;

        if update.status == Some(InstallationStatus::Completed) {
            hook.installation_completed(store, &installation)?;
        }
        Ok(installation)
    })?;
    tracing::info!(
        installation_id = installation.id,
        status = %installation.status,
        fee_paid = installation.fee_paid,
        profit_loss = %installation.profit_loss,
        "installation updated"
    );
    Ok(installation)
}

pub(crate) fn installation_materials(
    store: &Store<'_>,
    installation_id: i64,
) -> LedgerResult<Vec<InstallationMaterial>> {
    if store.get_installation(installation_id)?.is_none() {
        return Err(LedgerError::not_found("installation", installation_id));
    }
    store.get_materials(installation_id)
}

#[cfg(test)]
#[path = "installations_tests.rs"]
mod tests;
