mod schema;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use rusqlite::types::{ToSql, Type};
use rusqlite::{params, Connection, OptionalExtension, Row};
use rust_decimal::Decimal;
use std::collections::HashSet;
use std::path::Path;
use std::str::FromStr;

use crate::error::LedgerResult;
use crate::models::*;

pub(crate) struct Database {
    conn: Connection,
}

impl Database {
    pub(crate) fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)
            .with_context(|| format!("Failed to open database: {}", path.display()))?;
        conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA foreign_keys=ON;")
            .context("Failed to set database pragmas")?;
        let mut db = Self { conn };
        db.migrate().context("Database migration failed")?;
        Ok(db)
    }

    #[cfg(test)]
    pub(crate) fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        let mut db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    fn migrate(&mut self) -> Result<()> {
        let has_version_table: bool = self.conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type='table' AND name='schema_version')",
            [],
            |row| row.get(0),
        )?;

        if !has_version_table {
            let tx = self.conn.transaction()?;
            tx.execute_batch(schema::SCHEMA_V1)?;
            tx.execute(
                "INSERT INTO schema_version (version) VALUES (?1)",
                params![schema::CURRENT_VERSION],
            )?;
            tx.commit()?;
            tracing::debug!(version = schema::CURRENT_VERSION, "created ledger schema");
            return Ok(());
        }

        let current: i32 = self
            .conn
            .query_row("SELECT version FROM schema_version LIMIT 1", [], |row| {
                row.get(0)
            })
            .unwrap_or(0);

        for &(from_version, sql) in schema::MIGRATIONS {
            if current <= from_version {
                self.conn.execute_batch(sql)?;
            }
        }

        if current < schema::CURRENT_VERSION {
            self.conn.execute(
                "UPDATE schema_version SET version = ?1",
                params![schema::CURRENT_VERSION],
            )?;
            tracing::info!(from = current, to = schema::CURRENT_VERSION, "migrated ledger schema");
        }

        Ok(())
    }

    /// Read/write access outside of any explicit transaction.
    pub(crate) fn store(&self) -> Store<'_> {
        Store { conn: &self.conn }
    }

    /// Run `f` inside one transaction. Commits only when `f` returns `Ok`;
    /// an error rolls every write back.
    pub(crate) fn atomically<T, F>(&mut self, f: F) -> LedgerResult<T>
    where
        F: FnOnce(&Store<'_>) -> LedgerResult<T>,
    {
        let tx = self.conn.transaction()?;
        let value = f(&Store { conn: &*tx })?;
        tx.commit()?;
        Ok(value)
    }
}

/// Query and mutate operations over the ledger tables.
pub(crate) struct Store<'c> {
    conn: &'c Connection,
}

const CUSTOMER_COLUMNS: &str =
    "c.id, c.name, c.address, c.phone, c.status, c.subscription_start_date, c.created_at";
const BILL_COLUMNS: &str =
    "b.id, b.customer_id, b.bill_month, b.amount, b.status, b.due_date, b.created_at";
const PAYMENT_COLUMNS: &str =
    "p.id, p.customer_id, p.bill_id, p.amount, p.payment_date, p.notes, p.created_at";
const INSTALLATION_COLUMNS: &str = "i.id, i.customer_id, i.installation_fee, i.fee_paid, i.status,
     i.scheduled_date, i.completed_date, i.total_material_cost, i.profit_loss, i.created_at";
const MATERIAL_COLUMNS: &str = "m.id, m.installation_id, m.material_name, m.quantity, m.unit_price,
     m.total_cost, m.created_at";

impl Store<'_> {
    // ── Customers ─────────────────────────────────────────────

    pub(crate) fn insert_customer(&self, new: &NewCustomer) -> LedgerResult<Customer> {
        let created_at = timestamp();
        self.conn.execute(
            "INSERT INTO customers (name, address, phone, status, subscription_start_date, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                new.name,
                new.address,
                new.phone,
                CustomerStatus::Active.as_str(),
                new.subscription_start_date,
                created_at,
            ],
        )?;
        Ok(Customer {
            id: self.conn.last_insert_rowid(),
            name: new.name.clone(),
            address: new.address.clone(),
            phone: new.phone.clone(),
            status: CustomerStatus::Active,
            subscription_start_date: new.subscription_start_date,
            created_at,
        })
    }

    pub(crate) fn get_customer(&self, id: i64) -> LedgerResult<Option<Customer>> {
        let sql = format!("SELECT {CUSTOMER_COLUMNS} FROM customers c WHERE c.id = ?1");
        Ok(self
            .conn
            .query_row(&sql, params![id], customer_from_row)
            .optional()?)
    }

    pub(crate) fn get_customers(&self) -> LedgerResult<Vec<Customer>> {
        let sql = format!("SELECT {CUSTOMER_COLUMNS} FROM customers c ORDER BY c.name, c.id");
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map([], customer_from_row)?;
        Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
    }

    /// Active customers whose subscription started strictly before `date`.
    pub(crate) fn active_customers_subscribed_before(
        &self,
        date: NaiveDate,
    ) -> LedgerResult<Vec<Customer>> {
        let sql = format!(
            "SELECT {CUSTOMER_COLUMNS} FROM customers c
             WHERE c.status = ?1 AND c.subscription_start_date < ?2
             ORDER BY c.id"
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map(
            params![CustomerStatus::Active.as_str(), date],
            customer_from_row,
        )?;
        Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
    }

    pub(crate) fn update_customer(&self, customer: &Customer) -> LedgerResult<()> {
        self.conn.execute(
            "UPDATE customers SET name = ?1, address = ?2, phone = ?3, status = ?4 WHERE id = ?5",
            params![
                customer.name,
                customer.address,
                customer.phone,
                customer.status.as_str(),
                customer.id,
            ],
        )?;
        Ok(())
    }

    /// Returns the number of rows changed (zero for an unknown id).
    pub(crate) fn set_customer_status(
        &self,
        customer_id: i64,
        status: CustomerStatus,
    ) -> LedgerResult<usize> {
        Ok(self.conn.execute(
            "UPDATE customers SET status = ?1 WHERE id = ?2",
            params![status.as_str(), customer_id],
        )?)
    }

    pub(crate) fn count_customers_with_status(&self, status: CustomerStatus) -> LedgerResult<i64> {
        Ok(self.conn.query_row(
            "SELECT COUNT(*) FROM customers WHERE status = ?1",
            params![status.as_str()],
            |row| row.get(0),
        )?)
    }

    // ── Monthly bills ─────────────────────────────────────────

    pub(crate) fn insert_bill(
        &self,
        customer_id: i64,
        period: Period,
        amount: Decimal,
        due_date: NaiveDate,
    ) -> LedgerResult<MonthlyBill> {
        let created_at = timestamp();
        self.conn.execute(
            "INSERT INTO monthly_bills (customer_id, bill_month, amount, status, due_date, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                customer_id,
                period.to_string(),
                amount.to_string(),
                BillStatus::Unpaid.as_str(),
                due_date,
                created_at,
            ],
        )?;
        Ok(MonthlyBill {
            id: self.conn.last_insert_rowid(),
            customer_id,
            bill_month: period,
            amount,
            status: BillStatus::Unpaid,
            due_date,
            created_at,
        })
    }

    pub(crate) fn get_bill(&self, id: i64) -> LedgerResult<Option<MonthlyBill>> {
        let sql = format!("SELECT {BILL_COLUMNS} FROM monthly_bills b WHERE b.id = ?1");
        Ok(self
            .conn
            .query_row(&sql, params![id], bill_from_row)
            .optional()?)
    }

    pub(crate) fn get_bills(
        &self,
        customer_id: Option<i64>,
        period: Option<Period>,
    ) -> LedgerResult<Vec<MonthlyBill>> {
        let mut sql = format!("SELECT {BILL_COLUMNS} FROM monthly_bills b WHERE 1=1");
        let mut param_values: Vec<Box<dyn ToSql>> = Vec::new();

        if let Some(cid) = customer_id {
            sql.push_str(&format!(" AND b.customer_id = ?{}", param_values.len() + 1));
            param_values.push(Box::new(cid));
        }
        if let Some(p) = period {
            sql.push_str(&format!(" AND b.bill_month = ?{}", param_values.len() + 1));
            param_values.push(Box::new(p.to_string()));
        }
        sql.push_str(" ORDER BY b.bill_month, b.customer_id, b.id");

        let params_ref: Vec<&dyn ToSql> = param_values.iter().map(|p| p.as_ref()).collect();
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map(params_ref.as_slice(), bill_from_row)?;
        Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
    }

    /// Customers that already hold a bill for `period`.
    pub(crate) fn billed_customer_ids(&self, period: Period) -> LedgerResult<HashSet<i64>> {
        let mut stmt = self
            .conn
            .prepare("SELECT customer_id FROM monthly_bills WHERE bill_month = ?1")?;
        let rows = stmt.query_map(params![period.to_string()], |row| row.get(0))?;
        Ok(rows.collect::<std::result::Result<HashSet<i64>, _>>()?)
    }

    pub(crate) fn set_bill_status(&self, bill_id: i64, status: BillStatus) -> LedgerResult<()> {
        self.conn.execute(
            "UPDATE monthly_bills SET status = ?1 WHERE id = ?2",
            params![status.as_str(), bill_id],
        )?;
        Ok(())
    }

    /// Unpaid bills paired with the owning customer's name.
    pub(crate) fn unpaid_bills(
        &self,
        customer_id: Option<i64>,
    ) -> LedgerResult<Vec<(String, MonthlyBill)>> {
        let mut sql = format!(
            "SELECT {BILL_COLUMNS}, c.name
             FROM monthly_bills b JOIN customers c ON b.customer_id = c.id
             WHERE b.status = ?1"
        );
        let mut param_values: Vec<Box<dyn ToSql>> =
            vec![Box::new(BillStatus::Unpaid.as_str().to_string())];
        if let Some(cid) = customer_id {
            sql.push_str(&format!(" AND b.customer_id = ?{}", param_values.len() + 1));
            param_values.push(Box::new(cid));
        }
        sql.push_str(" ORDER BY b.customer_id, b.bill_month");

        let params_ref: Vec<&dyn ToSql> = param_values.iter().map(|p| p.as_ref()).collect();
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map(params_ref.as_slice(), |row| {
            Ok((row.get::<_, String>(7)?, bill_from_row(row)?))
        })?;
        Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
    }

    // ── Payments ──────────────────────────────────────────────

    pub(crate) fn insert_payment(&self, new: &NewPayment) -> LedgerResult<Payment> {
        let created_at = timestamp();
        self.conn.execute(
            "INSERT INTO payments (customer_id, bill_id, amount, payment_date, notes, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                new.customer_id,
                new.bill_id,
                new.amount.to_string(),
                new.payment_date,
                new.notes,
                created_at,
            ],
        )?;
        Ok(Payment {
            id: self.conn.last_insert_rowid(),
            customer_id: new.customer_id,
            bill_id: new.bill_id,
            amount: new.amount,
            payment_date: new.payment_date,
            notes: new.notes.clone(),
            created_at,
        })
    }

    /// Newest payments first.
    pub(crate) fn get_payments(&self, customer_id: Option<i64>) -> LedgerResult<Vec<Payment>> {
        let mut sql = format!("SELECT {PAYMENT_COLUMNS} FROM payments p");
        let mut param_values: Vec<Box<dyn ToSql>> = Vec::new();
        if let Some(cid) = customer_id {
            sql.push_str(" WHERE p.customer_id = ?1");
            param_values.push(Box::new(cid));
        }
        sql.push_str(" ORDER BY p.payment_date DESC, p.id DESC");

        let params_ref: Vec<&dyn ToSql> = param_values.iter().map(|p| p.as_ref()).collect();
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map(params_ref.as_slice(), payment_from_row)?;
        Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
    }

    /// Amounts of payments linked to a bill of `period` and themselves dated
    /// inside `window`.
    pub(crate) fn subscription_payment_amounts(
        &self,
        period: Period,
        window: DateWindow,
    ) -> LedgerResult<Vec<Decimal>> {
        let mut stmt = self.conn.prepare(
            "SELECT p.amount FROM payments p
             JOIN monthly_bills b ON p.bill_id = b.id
             WHERE b.bill_month = ?1 AND p.payment_date BETWEEN ?2 AND ?3",
        )?;
        let rows = stmt.query_map(
            params![period.to_string(), window.start, window.end],
            |row| decimal_at(row, 0),
        )?;
        Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
    }

    // ── Installations ─────────────────────────────────────────

    pub(crate) fn insert_installation(
        &self,
        customer_id: i64,
        installation_fee: Decimal,
        scheduled_date: Option<NaiveDate>,
    ) -> LedgerResult<Installation> {
        let created_at = timestamp();
        let zero = round_money(Decimal::ZERO);
        self.conn.execute(
            "INSERT INTO installations (customer_id, installation_fee, fee_paid, status,
                 scheduled_date, completed_date, total_material_cost, profit_loss, created_at)
             VALUES (?1, ?2, 0, ?3, ?4, NULL, ?5, ?5, ?6)",
            params![
                customer_id,
                installation_fee.to_string(),
                InstallationStatus::Pending.as_str(),
                scheduled_date,
                zero.to_string(),
                created_at,
            ],
        )?;
        Ok(Installation {
            id: self.conn.last_insert_rowid(),
            customer_id,
            installation_fee,
            fee_paid: false,
            status: InstallationStatus::Pending,
            scheduled_date,
            completed_date: None,
            total_material_cost: zero,
            profit_loss: zero,
            created_at,
        })
    }

    pub(crate) fn get_installation(&self, id: i64) -> LedgerResult<Option<Installation>> {
        let sql = format!("SELECT {INSTALLATION_COLUMNS} FROM installations i WHERE i.id = ?1");
        Ok(self
            .conn
            .query_row(&sql, params![id], installation_from_row)
            .optional()?)
    }

    pub(crate) fn get_installations(
        &self,
        customer_id: Option<i64>,
    ) -> LedgerResult<Vec<Installation>> {
        let mut sql = format!("SELECT {INSTALLATION_COLUMNS} FROM installations i");
        let mut param_values: Vec<Box<dyn ToSql>> = Vec::new();
        if let Some(cid) = customer_id {
            sql.push_str(" WHERE i.customer_id = ?1");
            param_values.push(Box::new(cid));
        }
        sql.push_str(" ORDER BY i.id");

        let params_ref: Vec<&dyn ToSql> = param_values.iter().map(|p| p.as_ref()).collect();
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map(params_ref.as_slice(), installation_from_row)?;
        Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
    }

    /// Write back status, fee flag, completion date and running totals.
    pub(crate) fn save_installation(&self, inst: &Installation) -> LedgerResult<()> {
        self.conn.execute(
            "UPDATE installations
             SET fee_paid = ?1, status = ?2, completed_date = ?3,
                 total_material_cost = ?4, profit_loss = ?5
             WHERE id = ?6",
            params![
                inst.fee_paid,
                inst.status.as_str(),
                inst.completed_date,
                inst.total_material_cost.to_string(),
                inst.profit_loss.to_string(),
                inst.id,
            ],
        )?;
        Ok(())
    }

    pub(crate) fn set_installation_totals(
        &self,
        installation_id: i64,
        total_material_cost: Decimal,
        profit_loss: Decimal,
    ) -> LedgerResult<()> {
        self.conn.execute(
            "UPDATE installations SET total_material_cost = ?1, profit_loss = ?2 WHERE id = ?3",
            params![
                total_material_cost.to_string(),
                profit_loss.to_string(),
                installation_id,
            ],
        )?;
        Ok(())
    }

    /// Installations with their customer's name, filtered on completed_date
    /// (inclusive). Any bound excludes installations that never completed.
    pub(crate) fn installations_with_customer(
        &self,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> LedgerResult<Vec<(String, Installation)>> {
        let mut sql = format!(
            "SELECT {INSTALLATION_COLUMNS}, c.name
             FROM installations i JOIN customers c ON i.customer_id = c.id
             WHERE 1=1"
        );
        let mut param_values: Vec<Box<dyn ToSql>> = Vec::new();
        if let Some(start) = from {
            sql.push_str(&format!(" AND i.completed_date >= ?{}", param_values.len() + 1));
            param_values.push(Box::new(start));
        }
        if let Some(end) = to {
            sql.push_str(&format!(" AND i.completed_date <= ?{}", param_values.len() + 1));
            param_values.push(Box::new(end));
        }
        sql.push_str(" ORDER BY i.id");

        let params_ref: Vec<&dyn ToSql> = param_values.iter().map(|p| p.as_ref()).collect();
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map(params_ref.as_slice(), |row| {
            Ok((row.get::<_, String>(10)?, installation_from_row(row)?))
        })?;
        Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
    }

    /// Fees of installations whose fee is paid and that completed inside `window`.
    pub(crate) fn paid_fees_completed_within(
        &self,
        window: DateWindow,
    ) -> LedgerResult<Vec<Decimal>> {
        let mut stmt = self.conn.prepare(
            "SELECT installation_fee FROM installations
             WHERE fee_paid = 1 AND completed_date BETWEEN ?1 AND ?2",
        )?;
        let rows = stmt.query_map(params![window.start, window.end], |row| {
            decimal_at(row, 0)
        })?;
        Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
    }

    pub(crate) fn count_completed_within(&self, window: DateWindow) -> LedgerResult<i64> {
        Ok(self.conn.query_row(
            "SELECT COUNT(*) FROM installations
             WHERE status = ?1 AND completed_date BETWEEN ?2 AND ?3",
            params![
                InstallationStatus::Completed.as_str(),
                window.start,
                window.end
            ],
            |row| row.get(0),
        )?)
    }

    // ── Installation materials ────────────────────────────────

    pub(crate) fn insert_material(
        &self,
        new: &NewMaterial,
        total_cost: Decimal,
    ) -> LedgerResult<InstallationMaterial> {
        let created_at = timestamp();
        self.conn.execute(
            "INSERT INTO installation_materials
                 (installation_id, material_name, quantity, unit_price, total_cost, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                new.installation_id,
                new.material_name,
                new.quantity.to_string(),
                new.unit_price.to_string(),
                total_cost.to_string(),
                created_at,
            ],
        )?;
        Ok(InstallationMaterial {
            id: self.conn.last_insert_rowid(),
            installation_id: new.installation_id,
            material_name: new.material_name.clone(),
            quantity: new.quantity,
            unit_price: new.unit_price,
            total_cost,
            created_at,
        })
    }

    /// Materials of one installation in insertion order.
    pub(crate) fn get_materials(
        &self,
        installation_id: i64,
    ) -> LedgerResult<Vec<InstallationMaterial>> {
        let sql = format!(
            "SELECT {MATERIAL_COLUMNS} FROM installation_materials m
             WHERE m.installation_id = ?1 ORDER BY m.id"
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map(params![installation_id], material_from_row)?;
        Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
    }

    /// Material costs of installations that completed inside `window`.
    pub(crate) fn material_costs_completed_within(
        &self,
        window: DateWindow,
    ) -> LedgerResult<Vec<Decimal>> {
        let mut stmt = self.conn.prepare(
            "SELECT m.total_cost FROM installation_materials m
             JOIN installations i ON m.installation_id = i.id
             WHERE i.completed_date IS NOT NULL AND i.completed_date BETWEEN ?1 AND ?2",
        )?;
        let rows = stmt.query_map(params![window.start, window.end], |row| {
            decimal_at(row, 0)
        })?;
        Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
    }

    // ── Material presets ──────────────────────────────────────

    pub(crate) fn insert_preset(
        &self,
        name: &str,
        default_unit_price: Decimal,
        unit: &str,
    ) -> LedgerResult<MaterialPreset> {
        let created_at = timestamp();
        self.conn.execute(
            "INSERT INTO material_presets (name, default_unit_price, unit, created_at)
             VALUES (?1, ?2, ?3, ?4)",
            params![name, default_unit_price.to_string(), unit, created_at],
        )?;
        Ok(MaterialPreset {
            id: self.conn.last_insert_rowid(),
            name: name.to_string(),
            default_unit_price,
            unit: unit.to_string(),
            created_at,
        })
    }

    pub(crate) fn get_presets(&self) -> LedgerResult<Vec<MaterialPreset>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, name, default_unit_price, unit, created_at FROM material_presets ORDER BY name",
        )?;
        let rows = stmt.query_map([], preset_from_row)?;
        Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
    }

    // ── Settings ──────────────────────────────────────────────

    pub(crate) fn get_setting(&self, key: &str) -> LedgerResult<Option<Setting>> {
        Ok(self
            .conn
            .query_row(
                "SELECT id, key, value, updated_at FROM settings WHERE key = ?1",
                params![key],
                setting_from_row,
            )
            .optional()?)
    }

    pub(crate) fn get_settings(&self) -> LedgerResult<Vec<Setting>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, key, value, updated_at FROM settings ORDER BY key")?;
        let rows = stmt.query_map([], setting_from_row)?;
        Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
    }

    pub(crate) fn upsert_setting(&self, key: &str, value: &str) -> LedgerResult<Setting> {
        self.conn.execute(
            "INSERT INTO settings (key, value, updated_at) VALUES (?1, ?2, ?3)
             ON CONFLICT(key) DO UPDATE SET value = ?2, updated_at = ?3",
            params![key, value, timestamp()],
        )?;
        Ok(self.conn.query_row(
            "SELECT id, key, value, updated_at FROM settings WHERE key = ?1",
            params![key],
            setting_from_row,
        )?)
    }
}

// ── Row mapping ───────────────────────────────────────────────

fn timestamp() -> String {
    chrono::Utc::now().to_rfc3339()
}

fn conversion_error(idx: usize, message: String) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, message.into())
}

fn decimal_at(row: &Row<'_>, idx: usize) -> rusqlite::Result<Decimal> {
    let raw: String = row.get(idx)?;
    Decimal::from_str(raw.trim())
        .map_err(|e| conversion_error(idx, format!("'{raw}' is not a decimal: {e}")))
}

fn period_at(row: &Row<'_>, idx: usize) -> rusqlite::Result<Period> {
    let raw: String = row.get(idx)?;
    Period::from_str(&raw).map_err(|e| conversion_error(idx, e.to_string()))
}

fn status_at<T>(row: &Row<'_>, idx: usize, parse: fn(&str) -> Option<T>) -> rusqlite::Result<T> {
    let raw: String = row.get(idx)?;
    parse(&raw).ok_or_else(|| conversion_error(idx, format!("unknown status '{raw}'")))
}

fn customer_from_row(row: &Row<'_>) -> rusqlite::Result<Customer> {
    Ok(Customer {
        id: row.get(0)?,
        name: row.get(1)?,
        address: row.get(2)?,
        phone: row.get(3)?,
        status: status_at(row, 4, CustomerStatus::parse)?,
        subscription_start_date: row.get(5)?,
        created_at: row.get(6)?,
    })
}

fn bill_from_row(row: &Row<'_>) -> rusqlite::Result<MonthlyBill> {
    Ok(MonthlyBill {
        id: row.get(0)?,
        customer_id: row.get(1)?,
        bill_month: period_at(row, 2)?,
        amount: decimal_at(row, 3)?,
        status: status_at(row, 4, BillStatus::parse)?,
        due_date: row.get(5)?,
        created_at: row.get(6)?,
    })
}

fn payment_from_row(row: &Row<'_>) -> rusqlite::Result<Payment> {
    Ok(Payment {
        id: row.get(0)?,
        customer_id: row.get(1)?,
        bill_id: row.get(2)?,
        amount: decimal_at(row, 3)?,
        payment_date: row.get(4)?,
        notes: row.get(5)?,
        created_at: row.get(6)?,
    })
}

fn installation_from_row(row: &Row<'_>) -> rusqlite::Result<Installation> {
    Ok(Installation {
        id: row.get(0)?,
        customer_id: row.get(1)?,
        installation_fee: decimal_at(row, 2)?,
        fee_paid: row.get(3)?,
        status: status_at(row, 4, InstallationStatus::parse)?,
        scheduled_date: row.get(5)?,
        completed_date: row.get(6)?,
        total_material_cost: decimal_at(row, 7)?,
        profit_loss: decimal_at(row, 8)?,
        created_at: row.get(9)?,
    })
}

fn material_from_row(row: &Row<'_>) -> rusqlite::Result<InstallationMaterial> {
    Ok(InstallationMaterial {
        id: row.get(0)?,
        installation_id: row.get(1)?,
        material_name: row.get(2)?,
        quantity: decimal_at(row, 3)?,
        unit_price: decimal_at(row, 4)?,
        total_cost: decimal_at(row, 5)?,
        created_at: row.get(6)?,
    })
}

fn preset_from_row(row: &Row<'_>) -> rusqlite::Result<MaterialPreset> {
    Ok(MaterialPreset {
        id: row.get(0)?,
        name: row.get(1)?,
        default_unit_price: decimal_at(row, 2)?,
        unit: row.get(3)?,
        created_at: row.get(4)?,
    })
}

fn setting_from_row(row: &Row<'_>) -> rusqlite::Result<Setting> {
    Ok(Setting {
        id: row.get(0)?,
        key: row.get(1)?,
        value: row.get(2)?,
        updated_at: row.get(3)?,
    })
}
