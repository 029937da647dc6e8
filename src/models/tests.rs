#![allow(clippy::unwrap_used)]

use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::*;
use crate::error::LedgerError;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

// ── Period ────────────────────────────────────────────────────

#[test]
fn test_period_parse_and_display() {
    let p: Period = "2024-03".parse().unwrap();
    assert_eq!(p.year(), 2024);
    assert_eq!(p.month(), 3);
    assert_eq!(p.to_string(), "2024-03");
}

#[test]
fn test_period_parse_rejects_malformed() {
    for bad in ["2024-3", "2024-13", "2024-00", "24-03", "2024/03", "abcd-ef", "", "2024-03-01"] {
        assert!(bad.parse::<Period>().is_err(), "accepted {bad:?}");
    }
}

#[test]
fn test_bad_period_and_window_are_validation_errors() {
    assert!(matches!("2024-13".parse::<Period>(), Err(LedgerError::Validation(_))));
    assert!(matches!(
        DateWindow::new(date(2024, 3, 2), date(2024, 3, 1)),
        Err(LedgerError::Validation(_))
    ));
}

#[test]
fn test_period_bounds() {
    let feb_leap: Period = "2024-02".parse().unwrap();
    assert_eq!(feb_leap.first_day(), date(2024, 2, 1));
    assert_eq!(feb_leap.last_day(), date(2024, 2, 29));

    let feb: Period = "2023-02".parse().unwrap();
    assert_eq!(feb.last_day(), date(2023, 2, 28));

    let century: Period = "1900-02".parse().unwrap();
    assert_eq!(century.last_day(), date(1900, 2, 28));

    let december: Period = "2024-12".parse().unwrap();
    assert_eq!(december.last_day(), date(2024, 12, 31));

    let apr: Period = "2024-04".parse().unwrap();
    assert_eq!(apr.last_day(), date(2024, 4, 30));

    let millennium: Period = "2000-02".parse().unwrap();
    assert_eq!(millennium.last_day(), date(2000, 2, 29));

    let last: Period = "9999-12".parse().unwrap();
    assert_eq!(last.last_day(), date(9999, 12, 31));
}

#[test]
fn test_period_due_date_is_fifteenth() {
    let p: Period = "2024-02".parse().unwrap();
    assert_eq!(p.due_date(), date(2024, 2, 15));
}

#[test]
fn test_period_containing() {
    assert_eq!(Period::containing(date(2024, 2, 29)).to_string(), "2024-02");
    assert_eq!(Period::containing(date(2024, 1, 1)).to_string(), "2024-01");
    let p: Period = "2024-02".parse().unwrap();
    assert!(p.contains(date(2024, 2, 10)));
    assert!(!p.contains(date(2024, 3, 1)));
}

#[test]
fn test_period_months_until() {
    let jan: Period = "2024-01".parse().unwrap();
    let mar: Period = "2024-03".parse().unwrap();
    let next_jan: Period = "2025-01".parse().unwrap();
    assert_eq!(jan.months_until(mar), 2);
    assert_eq!(jan.months_until(next_jan), 12);
    assert_eq!(mar.months_until(jan), -2);
    assert_eq!(jan.months_until(jan), 0);
}

#[test]
fn test_period_ordering_matches_string_ordering() {
    let mut periods: Vec<Period> = ["2024-10", "2023-12", "2024-02"]
        .iter()
        .map(|s| s.parse().unwrap())
        .collect();
    periods.sort();
    let strs: Vec<String> = periods.iter().map(|p| p.to_string()).collect();
    assert_eq!(strs, vec!["2023-12", "2024-02", "2024-10"]);
}

#[test]
fn test_date_window() {
    assert!(DateWindow::new(date(2024, 2, 2), date(2024, 2, 1)).is_err());
    let w = DateWindow::new(date(2024, 2, 1), date(2024, 2, 1)).unwrap();
    assert_eq!(w.start, w.end);
}

// ── Money ─────────────────────────────────────────────────────

#[test]
fn test_round_money_half_up() {
    assert_eq!(round_money(dec!(12.5) * dec!(3.75)), dec!(46.88));
    assert_eq!(round_money(dec!(0.005)), dec!(0.01));
    assert_eq!(round_money(dec!(0.004)), dec!(0.00));
}

#[test]
fn test_round_money_keeps_two_places() {
    assert_eq!(round_money(dec!(30000)).to_string(), "30000.00");
    assert_eq!(round_money(dec!(1.5)).to_string(), "1.50");
}

#[test]
fn test_money_inputs_must_fit_two_places() {
    assert_eq!(exact_money("fee", dec!(1.5)).unwrap().to_string(), "1.50");
    assert_eq!(exact_money("fee", dec!(30000.000)).unwrap(), dec!(30000));
    assert!(exact_money("fee", dec!(29999.995)).is_err());
    assert!(positive_money("amount", dec!(0.004)).is_err());
    assert!(positive_money("amount", dec!(0)).is_err());
    assert_eq!(positive_money("amount", dec!(0.01)).unwrap(), dec!(0.01));
}

#[test]
fn test_quantity_inputs_must_fit_three_places() {
    assert_eq!(positive_quantity(dec!(2.500)).unwrap(), dec!(2.5));
    assert!(positive_quantity(dec!(0.0004)).is_err());
    assert!(positive_quantity(dec!(1.0005)).is_err());
    assert!(positive_quantity(dec!(-1)).is_err());
}

#[test]
fn test_sum_money_has_no_drift() {
    let total = sum_money((0..10).map(|_| dec!(0.10)));
    assert_eq!(total, dec!(1.00));
    assert_eq!(sum_money(Vec::<Decimal>::new()), Decimal::ZERO);
}

// ── Statuses ──────────────────────────────────────────────────

#[test]
fn test_status_roundtrip() {
    for s in [CustomerStatus::Active, CustomerStatus::Inactive] {
        assert_eq!(CustomerStatus::parse(s.as_str()), Some(s));
    }
    for s in [BillStatus::Unpaid, BillStatus::Paid] {
        assert_eq!(BillStatus::parse(s.as_str()), Some(s));
    }
    for s in [InstallationStatus::Pending, InstallationStatus::Completed] {
        assert_eq!(InstallationStatus::parse(s.as_str()), Some(s));
    }
    assert_eq!(CustomerStatus::parse("ACTIVE"), Some(CustomerStatus::Active));
    assert_eq!(BillStatus::parse("overdue"), None);
    assert_eq!(InstallationStatus::parse("done"), None);
    assert_eq!(InstallationStatus::parse("complete"), None);
}

// ── Bills and installations ───────────────────────────────────

fn make_bill(amount: Decimal) -> MonthlyBill {
    MonthlyBill {
        id: 1,
        customer_id: 1,
        bill_month: "2024-02".parse().unwrap(),
        amount,
        status: BillStatus::Unpaid,
        due_date: date(2024, 2, 15),
        created_at: String::new(),
    }
}

#[test]
fn test_bill_settlement_threshold() {
    let bill = make_bill(dec!(30000.00));
    assert!(bill.is_settled_by(dec!(30000.00)));
    assert!(bill.is_settled_by(dec!(30000.01)));
    assert!(!bill.is_settled_by(dec!(29999.99)));
}

#[test]
fn test_installation_apply_material_cost() {
    let mut inst = Installation {
        id: 1,
        customer_id: 1,
        installation_fee: dec!(500.00),
        fee_paid: false,
        status: InstallationStatus::Pending,
        scheduled_date: None,
        completed_date: None,
        total_material_cost: Decimal::ZERO,
        profit_loss: Decimal::ZERO,
        created_at: String::new(),
    };
    inst.apply_material_cost(dec!(650.00));
    assert_eq!(inst.total_material_cost, dec!(650.00));
    assert_eq!(inst.profit_loss, dec!(-150.00));
}

#[test]
fn test_preset_find_by_name() {
    let presets = vec![MaterialPreset {
        id: 1,
        name: "Fiber Cable".into(),
        default_unit_price: dec!(2500),
        unit: "m".into(),
        created_at: String::new(),
    }];
    assert!(MaterialPreset::find_by_name(&presets, "fiber cable").is_some());
    assert!(MaterialPreset::find_by_name(&presets, "router").is_none());
}
