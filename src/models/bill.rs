use chrono::NaiveDate;
use rust_decimal::Decimal;

use super::Period;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BillStatus {
    Unpaid,
    Paid,
}

impl BillStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unpaid => "unpaid",
            Self::Paid => "paid",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "unpaid" => Some(Self::Unpaid),
            "paid" => Some(Self::Paid),
            _ => None,
        }
    }
}

impl std::fmt::Display for BillStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone)]
pub struct MonthlyBill {
    pub id: i64,
    pub customer_id: i64,
    pub bill_month: Period,
    pub amount: Decimal,
    pub status: BillStatus,
    pub due_date: NaiveDate,
    pub created_at: String,
}

impl MonthlyBill {
    /// Binary settlement: a single payment settles the bill only if it
    /// covers the full face amount on its own.
    pub fn is_settled_by(&self, payment_amount: Decimal) -> bool {
        payment_amount >= self.amount
    }

    pub fn is_paid(&self) -> bool {
        self.status == BillStatus::Paid
    }
}
