mod bill;
mod customer;
mod installation;
mod money;
mod payment;
mod period;
mod preset;
mod report;

pub use bill::{BillStatus, MonthlyBill};
pub use customer::{Customer, CustomerStatus, CustomerUpdate, NewCustomer};
pub use installation::{
    Installation, InstallationMaterial, InstallationStatus, InstallationUpdate, NewInstallation,
    NewMaterial,
};
pub use money::{exact_money, positive_money, positive_quantity, round_money, sum_money};
pub use payment::{NewPayment, Payment};
pub use period::{DateWindow, Period};
pub use preset::{MaterialPreset, Setting};
pub use report::{ArrearsRow, InstallationReportRow, MonthlyReport};

#[cfg(test)]
mod tests;
