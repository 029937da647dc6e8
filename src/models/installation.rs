use chrono::NaiveDate;
use rust_decimal::Decimal;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstallationStatus {
    Pending,
    Completed,
}

impl InstallationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Completed => "completed",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "pending" => Some(Self::Pending),
            "completed" => Some(Self::Completed),
            _ => None,
        }
    }
}

impl std::fmt::Display for InstallationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone)]
pub struct Installation {
    pub id: i64,
    pub customer_id: i64,
    pub installation_fee: Decimal,
    pub fee_paid: bool,
    pub status: InstallationStatus,
    pub scheduled_date: Option<NaiveDate>,
    pub completed_date: Option<NaiveDate>,
    pub total_material_cost: Decimal,
    /// `installation_fee - total_material_cost`
    pub profit_loss: Decimal,
    pub created_at: String,
}

impl Installation {
    /// Replace the running totals with `total_material_cost`.
    pub fn apply_material_cost(&mut self, total_material_cost: Decimal) {
        self.total_material_cost = total_material_cost;
        self.profit_loss = self.installation_fee - total_material_cost;
    }

    pub fn is_completed(&self) -> bool {
        self.status == InstallationStatus::Completed
    }
}

#[derive(Debug, Clone)]
pub struct NewInstallation {
    pub customer_id: i64,
    /// Falls back to the configured standard fee.
    pub installation_fee: Option<Decimal>,
    pub scheduled_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Default)]
pub struct InstallationUpdate {
    pub status: Option<InstallationStatus>,
    pub fee_paid: Option<bool>,
    pub completed_date: Option<NaiveDate>,
}

#[derive(Debug, Clone)]
pub struct InstallationMaterial {
    pub id: i64,
    pub installation_id: i64,
    pub material_name: String,
    pub quantity: Decimal,
    pub unit_price: Decimal,
    pub total_cost: Decimal,
    pub created_at: String,
}

#[derive(Debug, Clone)]
pub struct NewMaterial {
    pub installation_id: i64,
    pub material_name: String,
    pub quantity: Decimal,
    pub unit_price: Decimal,
}
