mod arrears;
mod bills;
mod installations;
mod payments;
mod registry;
mod report;

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::config;
use crate::db::Database;
use crate::error::LedgerResult;
use crate::models::*;

pub(crate) use installations::{ActivateCustomer, CompletionHook};

/// The operations a transport layer exposes, bound to one database.
///
/// Installation completion is routed through the injected [`CompletionHook`]
/// and "today" comes from the injected clock, so both can be replaced in tests.
pub(crate) struct Engine<'db> {
    db: &'db mut Database,
    on_complete: Box<dyn CompletionHook>,
    clock: fn() -> NaiveDate,
}

fn local_today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

impl<'db> Engine<'db> {
    pub(crate) fn new(db: &'db mut Database) -> Self {
        Self {
            db,
            on_complete: Box::new(ActivateCustomer),
            clock: local_today,
        }
    }

    #[cfg(test)]
    pub(crate) fn with_hook(mut self, hook: Box<dyn CompletionHook>) -> Self {
        self.on_complete = hook;
        self
    }

    #[cfg(test)]
    pub(crate) fn with_clock(mut self, clock: fn() -> NaiveDate) -> Self {
        self.clock = clock;
        self
    }

    pub(crate) fn today(&self) -> NaiveDate {
        (self.clock)()
    }

    // ── Billing engine ────────────────────────────────────────

    pub(crate) fn generate_monthly_bills(
        &mut self,
        period: Period,
        amount: Option<Decimal>,
    ) -> LedgerResult<Vec<MonthlyBill>> {
        bills::generate_monthly_bills(self.db, period, amount)
    }

    pub(crate) fn record_payment(&mut self, payment: NewPayment) -> LedgerResult<Payment> {
        payments::record_payment(self.db, payment)
    }

    pub(crate) fn add_installation_material(
        &mut self,
        material: NewMaterial,
    ) -> LedgerResult<InstallationMaterial> {
        installations::add_installation_material(self.db, material)
    }

    pub(crate) fn update_installation(
        &mut self,
        id: i64,
        update: InstallationUpdate,
    ) -> LedgerResult<Installation> {
        installations::update_installation(self.db, id, update, self.on_complete.as_ref())
    }

    pub(crate) fn get_arrears(&self, customer_id: Option<i64>) -> LedgerResult<Vec<ArrearsRow>> {
        arrears::arrears(&self.db.store(), customer_id, self.today())
    }

    /// Defaults to the current month and to that month's own bounds.
    pub(crate) fn get_monthly_report(
        &self,
        period: Option<Period>,
        window: Option<DateWindow>,
    ) -> LedgerResult<MonthlyReport> {
        let period = period.unwrap_or_else(|| Period::containing(self.today()));
        match window {
            Some(window) => report::monthly_report_within(&self.db.store(), period, window),
            None => report::monthly_report(&self.db.store(), period),
        }
    }

    pub(crate) fn get_installation_report(
        &self,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> LedgerResult<Vec<InstallationReportRow>> {
        report::installation_report(&self.db.store(), from, to)
    }

    // ── Registry ──────────────────────────────────────────────

    pub(crate) fn create_customer(&mut self, customer: NewCustomer) -> LedgerResult<Customer> {
        registry::create_customer(&self.db.store(), customer)
    }

    pub(crate) fn update_customer(
        &mut self,
        id: i64,
        update: CustomerUpdate,
    ) -> LedgerResult<Customer> {
        registry::update_customer(self.db, id, update)
    }

    pub(crate) fn get_customers(&self) -> LedgerResult<Vec<Customer>> {
        self.db.store().get_customers()
    }

    pub(crate) fn create_installation(
        &mut self,
        installation: NewInstallation,
    ) -> LedgerResult<Installation> {
        installations::create_installation(self.db, installation)
    }

    pub(crate) fn get_installations(
        &self,
        customer_id: Option<i64>,
    ) -> LedgerResult<Vec<Installation>> {
        self.db.store().get_installations(customer_id)
    }

    pub(crate) fn get_installation_materials(
        &self,
        installation_id: i64,
    ) -> LedgerResult<Vec<InstallationMaterial>> {
        installations::installation_materials(&self.db.store(), installation_id)
    }

    pub(crate) fn get_monthly_bills(
        &self,
        customer_id: Option<i64>,
        period: Option<Period>,
    ) -> LedgerResult<Vec<MonthlyBill>> {
        self.db.store().get_bills(customer_id, period)
    }

    pub(crate) fn get_payments(&self, customer_id: Option<i64>) -> LedgerResult<Vec<Payment>> {
        self.db.store().get_payments(customer_id)
    }

    pub(crate) fn create_material_preset(
        &mut self,
        name: &str,
        default_unit_price: Decimal,
        unit: &str,
    ) -> LedgerResult<MaterialPreset> {
        registry::create_material_preset(&self.db.store(), name, default_unit_price, unit)
    }

    pub(crate) fn get_material_presets(&self) -> LedgerResult<Vec<MaterialPreset>> {
        self.db.store().get_presets()
    }

    pub(crate) fn get_settings(&self) -> LedgerResult<Vec<Setting>> {
        config::settings(&self.db.store())
    }

    pub(crate) fn update_setting(&mut self, key: &str, value: &str) -> LedgerResult<Setting> {
        config::update_setting(&self.db.store(), key, value)
    }
}
