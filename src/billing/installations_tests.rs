#![allow(clippy::unwrap_used)]

use super::*;
use crate::billing::test_support::*;
use crate::config::{update_setting, INSTALLATION_FEE_KEY};
use crate::models::Customer;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::cell::RefCell;

fn material(installation_id: i64, name: &str, quantity: Decimal, unit_price: Decimal) -> NewMaterial {
    NewMaterial {
        installation_id,
        material_name: name.into(),
        quantity,
        unit_price,
    }
}

fn customer(db: &Database, id: i64) -> Customer {
    db.store().get_customer(id).unwrap().unwrap()
}

#[derive(Default)]
struct RecordingHook {
    completed: RefCell<Vec<i64>>,
}

impl CompletionHook for RecordingHook {
    fn installation_completed(&self, _: &Store<'_>, installation: &Installation) -> LedgerResult<()> {
        self.completed.borrow_mut().push(installation.id);
        Ok(())
    }
}

struct FailingHook;

impl CompletionHook for FailingHook {
    fn installation_completed(&self, _: &Store<'_>, _: &Installation) -> LedgerResult<()> {
        Err(LedgerError::invalid("hook refused"))
    }
}

// ── create_installation ───────────────────────────────────────

#[test]
fn test_create_installation_defaults() {
    let mut db = Database::open_in_memory().unwrap();
    let c = add_customer(&db, "Ana", date(2024, 1, 1));
    let inst = create_installation(
        &mut db,
        NewInstallation {
            customer_id: c,
            installation_fee: None,
            scheduled_date: Some(date(2024, 1, 20)),
        },
    )
    .unwrap();
    assert_eq!(inst.installation_fee, dec!(300000));
    assert_eq!(inst.status, InstallationStatus::Pending);
    assert!(!inst.fee_paid);
    assert_eq!(inst.total_material_cost, Decimal::ZERO);
    assert_eq!(inst.profit_loss, Decimal::ZERO);
    assert!(inst.completed_date.is_none());
}

#[test]
fn test_create_installation_uses_configured_fee() {
    let mut db = Database::open_in_memory().unwrap();
    let c = add_customer(&db, "Ana", date(2024, 1, 1));
    update_setting(&db.store(), INSTALLATION_FEE_KEY, "250000").unwrap();
    let inst = create_installation(
        &mut db,
        NewInstallation {
            customer_id: c,
            installation_fee: None,
            scheduled_date: None,
        },
    )
    .unwrap();
    assert_eq!(inst.installation_fee, dec!(250000));
}

#[test]
fn test_create_installation_unknown_customer() {
    let mut db = Database::open_in_memory().unwrap();
    let err = create_installation(
        &mut db,
        NewInstallation {
            customer_id: 77,
            installation_fee: Some(dec!(100)),
            scheduled_date: None,
        },
    )
    .unwrap_err();
    assert!(matches!(err, LedgerError::NotFound { entity: "customer", id: 77 }));
}

// ── add_installation_material ─────────────────────────────────

#[test]
fn test_material_cost_accumulates() {
    let mut db = Database::open_in_memory().unwrap();
    let c = add_customer(&db, "Ana", date(2024, 1, 1));
    let inst = add_installation(&mut db, c, dec!(500.00));

    add_installation_material(&mut db, material(inst, "Cable", dec!(1), dec!(100.00))).unwrap();
    let after_first = db.store().get_installation(inst).unwrap().unwrap();
    assert_eq!(after_first.total_material_cost, dec!(100.00));
    assert_eq!(after_first.profit_loss, dec!(400.00));

    add_installation_material(&mut db, material(inst, "Router", dec!(1), dec!(150.00))).unwrap();
    let after_second = db.store().get_installation(inst).unwrap().unwrap();
    assert_eq!(after_second.total_material_cost, dec!(250.00));
    assert_eq!(after_second.profit_loss, dec!(250.00));
}

#[test]
fn test_material_totals_independent_of_order() {
    let mut db = Database::open_in_memory().unwrap();
    let c = add_customer(&db, "Ana", date(2024, 1, 1));
    let forward = add_installation(&mut db, c, dec!(500.00));
    let reverse = add_installation(&mut db, c, dec!(500.00));

    for cost in [dec!(100.00), dec!(150.00)] {
        add_installation_material(&mut db, material(forward, "Part", dec!(1), cost)).unwrap();
    }
    for cost in [dec!(150.00), dec!(100.00)] {
        add_installation_material(&mut db, material(reverse, "Part", dec!(1), cost)).unwrap();
    }
    let f = db.store().get_installation(forward).unwrap().unwrap();
    let r = db.store().get_installation(reverse).unwrap().unwrap();
    assert_eq!(f.total_material_cost, r.total_material_cost);
    assert_eq!(f.profit_loss, r.profit_loss);
    assert_eq!(r.profit_loss, dec!(250.00));
}

#[test]
fn test_material_total_rounds_half_up() {
    let mut db = Database::open_in_memory().unwrap();
    let c = add_customer(&db, "Ana", date(2024, 1, 1));
    let inst = add_installation(&mut db, c, dec!(500.00));
    let m = add_installation_material(&mut db, material(inst, "Conduit", dec!(12.5), dec!(3.75))).unwrap();
    assert_eq!(m.total_cost, dec!(46.88));

    let stored = installation_materials(&db.store(), inst).unwrap();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].total_cost, dec!(46.88));
    assert_eq!(stored[0].quantity, dec!(12.5));
}

#[test]
fn test_material_on_unknown_installation() {
    let mut db = Database::open_in_memory().unwrap();
    let err = add_installation_material(&mut db, material(5, "Cable", dec!(1), dec!(1))).unwrap_err();
    assert!(matches!(err, LedgerError::NotFound { entity: "installation", id: 5 }));
}

#[test]
fn test_material_rejects_non_positive_inputs() {
    let mut db = Database::open_in_memory().unwrap();
    let c = add_customer(&db, "Ana", date(2024, 1, 1));
    let inst = add_installation(&mut db, c, dec!(500.00));
    let cases = [
        material(inst, "Cable", dec!(0), dec!(10)),
        material(inst, "Cable", dec!(2), dec!(-1)),
        material(inst, "  ", dec!(2), dec!(1)),
    ];
    for case in cases {
        let err = add_installation_material(&mut db, case).unwrap_err();
        assert!(matches!(err, LedgerError::Validation(_)));
    }
    assert!(db.store().get_materials(inst).unwrap().is_empty());
    let untouched = db.store().get_installation(inst).unwrap().unwrap();
    assert_eq!(untouched.total_material_cost, Decimal::ZERO);
}

#[test]
fn test_material_rejects_inputs_finer_than_stored_precision() {
    let mut db = Database::open_in_memory().unwrap();
    let c = add_customer(&db, "Ana", date(2024, 1, 1));
    let inst = add_installation(&mut db, c, dec!(500.00));
    let cases = [
        material(inst, "Cable", dec!(0.0004), dec!(10)),
        material(inst, "Cable", dec!(1.0005), dec!(100)),
        material(inst, "Cable", dec!(1), dec!(9.995)),
    ];
    for case in cases {
        let err = add_installation_material(&mut db, case).unwrap_err();
        assert!(matches!(err, LedgerError::Validation(_)));
    }
    assert!(db.store().get_materials(inst).unwrap().is_empty());
}

#[test]
fn test_material_total_uses_supplied_values() {
    let mut db = Database::open_in_memory().unwrap();
    let c = add_customer(&db, "Ana", date(2024, 1, 1));
    let inst = add_installation(&mut db, c, dec!(500.00));
    let m = add_installation_material(&mut db, material(inst, "Cable", dec!(1.005), dec!(100))).unwrap();
    assert_eq!(m.quantity, dec!(1.005));
    assert_eq!(m.unit_price, dec!(100.00));
    assert_eq!(m.total_cost, dec!(100.50));

    let m = add_installation_material(&mut db, material(inst, "Clip", dec!(0.333), dec!(0.15))).unwrap();
    assert_eq!(m.total_cost, dec!(0.05));
}

#[test]
fn test_create_installation_rejects_sub_cent_fee() {
    let mut db = Database::open_in_memory().unwrap();
    let c = add_customer(&db, "Ana", date(2024, 1, 1));
    let err = create_installation(
        &mut db,
        NewInstallation {
            customer_id: c,
            installation_fee: Some(dec!(299999.999)),
            scheduled_date: None,
        },
    )
    .unwrap_err();
    assert!(matches!(err, LedgerError::Validation(_)));
    assert!(db.store().get_installations(None).unwrap().is_empty());
}

#[test]
fn test_materials_of_unknown_installation() {
    let db = Database::open_in_memory().unwrap();
    assert!(matches!(
        installation_materials(&db.store(), 3),
        Err(LedgerError::NotFound { .. })
    ));
}

// ── update_installation ───────────────────────────────────────

#[test]
fn test_update_recomputes_totals_from_materials() {
    let mut db = Database::open_in_memory().unwrap();
    let c = add_customer(&db, "Ana", date(2024, 1, 1));
    let inst = add_installation(&mut db, c, dec!(500.00));
    add_installation_material(&mut db, material(inst, "Cable", dec!(2), dec!(60.00))).unwrap();

    // Drift the running totals out of sync with the material rows.
    db.store()
        .set_installation_totals(inst, dec!(999.00), dec!(-499.00))
        .unwrap();

    let healed = update_installation(&mut db, inst, InstallationUpdate::default(), &ActivateCustomer).unwrap();
    assert_eq!(healed.total_material_cost, dec!(120.00));
    assert_eq!(healed.profit_loss, dec!(380.00));

    let again = update_installation(&mut db, inst, InstallationUpdate::default(), &ActivateCustomer).unwrap();
    assert_eq!(again.total_material_cost, healed.total_material_cost);
    assert_eq!(again.profit_loss, healed.profit_loss);
}

#[test]
fn test_update_applies_only_given_fields() {
    let mut db = Database::open_in_memory().unwrap();
    let c = add_customer(&db, "Ana", date(2024, 1, 1));
    let inst = add_installation(&mut db, c, dec!(500.00));

    let paid = update_installation(
        &mut db,
        inst,
        InstallationUpdate {
            fee_paid: Some(true),
            ..Default::default()
        },
        &ActivateCustomer,
    )
    .unwrap();
    assert!(paid.fee_paid);
    assert_eq!(paid.status, InstallationStatus::Pending);
    assert!(paid.completed_date.is_none());

    let dated = update_installation(
        &mut db,
        inst,
        InstallationUpdate {
            completed_date: Some(date(2024, 2, 3)),
            ..Default::default()
        },
        &ActivateCustomer,
    )
    .unwrap();
    assert!(dated.fee_paid);
    assert_eq!(dated.completed_date, Some(date(2024, 2, 3)));
}

#[test]
fn test_completion_activates_customer() {
    let mut db = Database::open_in_memory().unwrap();
    let c = add_customer(&db, "Ana", date(2024, 1, 1));
    db.store().set_customer_status(c, CustomerStatus::Inactive).unwrap();
    let inst = add_installation(&mut db, c, dec!(500.00));

    update_installation(
        &mut db,
        inst,
        InstallationUpdate {
            status: Some(InstallationStatus::Completed),
            completed_date: Some(date(2024, 2, 3)),
            ..Default::default()
        },
        &ActivateCustomer,
    )
    .unwrap();
    assert_eq!(customer(&db, c).status, CustomerStatus::Active);
}

#[test]
fn test_hook_only_fires_on_completion() {
    let mut db = Database::open_in_memory().unwrap();
    let c = add_customer(&db, "Ana", date(2024, 1, 1));
    let inst = add_installation(&mut db, c, dec!(500.00));
    let hook = RecordingHook::default();

    update_installation(
        &mut db,
        inst,
        InstallationUpdate {
            status: Some(InstallationStatus::Pending),
            ..Default::default()
        },
        &hook,
    )
    .unwrap();
    assert!(hook.completed.borrow().is_empty());

    update_installation(
        &mut db,
        inst,
        InstallationUpdate {
            status: Some(InstallationStatus::Completed),
            ..Default::default()
        },
        &hook,
    )
    .unwrap();
    assert_eq!(*hook.completed.borrow(), vec![inst]);
}

#[test]
fn test_failing_hook_rolls_back_update() {
    let mut db = Database::open_in_memory().unwrap();
    let c = add_customer(&db, "Ana", date(2024, 1, 1));
    let inst = add_installation(&mut db, c, dec!(500.00));

    let err = update_installation(
        &mut db,
        inst,
        InstallationUpdate {
            status: Some(InstallationStatus::Completed),
            fee_paid: Some(true),
            completed_date: Some(date(2024, 2, 3)),
        },
        &FailingHook,
    )
    .unwrap_err();
    assert!(matches!(err, LedgerError::Validation(_)));

    let stored = db.store().get_installation(inst).unwrap().unwrap();
    assert_eq!(stored.status, InstallationStatus::Pending);
    assert!(!stored.fee_paid);
    assert!(stored.completed_date.is_none());
}

#[test]
fn test_update_unknown_installation() {
    let mut db = Database::open_in_memory().unwrap();
    let err = update_installation(&mut db, 12, InstallationUpdate::default(), &ActivateCustomer).unwrap_err();
    assert!(matches!(err, LedgerError::NotFound { entity: "installation", id: 12 }));
}
