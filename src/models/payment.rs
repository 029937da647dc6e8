use chrono::NaiveDate;
use rust_decimal::Decimal;

#[derive(Debug, Clone)]
pub struct Payment {
    pub id: i64,
    pub customer_id: i64,
    /// `None` for arrears payments not attributed to a bill.
    pub bill_id: Option<i64>,
    pub amount: Decimal,
    pub payment_date: NaiveDate,
    pub notes: Option<String>,
    pub created_at: String,
}

#[derive(Debug, Clone)]
pub struct NewPayment {
    pub customer_id: i64,
    pub bill_id: Option<i64>,
    pub amount: Decimal,
    pub payment_date: NaiveDate,
    pub notes: Option<String>,
}
