use chrono::NaiveDate;
use rust_decimal::Decimal;

use super::{InstallationStatus, Period};

#[derive(Debug, Clone, PartialEq)]
pub struct ArrearsRow {
    pub customer_id: i64,
    pub customer_name: String,
    pub total_outstanding: Decimal,
    pub oldest_unpaid_period: Period,
    /// Calendar months between the oldest unpaid period and the current one.
    pub periods_overdue: i64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MonthlyReport {
    pub period: Period,
    pub subscription_income: Decimal,
    pub installation_income: Decimal,
    pub total_income: Decimal,
    pub material_expenses: Decimal,
    pub net_balance: Decimal,
    pub total_customers: i64,
    pub new_installations: i64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct InstallationReportRow {
    pub installation_id: i64,
    pub customer_name: String,
    pub installation_fee: Decimal,
    pub material_cost: Decimal,
    pub profit_loss: Decimal,
    pub status: InstallationStatus,
    pub completed_date: Option<NaiveDate>,
}
