pub(crate) const SCHEMA_V1: &str = r#"
CREATE TABLE IF NOT EXISTS schema_version (
    version INTEGER NOT NULL
);

CREATE TABLE IF NOT EXISTS customers (
    id                      INTEGER PRIMARY KEY AUTOINCREMENT,
    name                    TEXT NOT NULL,
    address                 TEXT NOT NULL,
    phone                   TEXT,
    status                  TEXT NOT NULL DEFAULT 'active',
    subscription_start_date TEXT NOT NULL,
    created_at              TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS monthly_bills (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    customer_id INTEGER NOT NULL REFERENCES customers(id),
    bill_month  TEXT NOT NULL,
    amount      TEXT NOT NULL,
    status      TEXT NOT NULL DEFAULT 'unpaid',
    due_date    TEXT NOT NULL,
    created_at  TEXT NOT NULL,
    UNIQUE(customer_id, bill_month)
);

CREATE INDEX IF NOT EXISTS idx_bills_month ON monthly_bills(bill_month);
CREATE INDEX IF NOT EXISTS idx_bills_status ON monthly_bills(status);

CREATE TABLE IF NOT EXISTS payments (
    id           INTEGER PRIMARY KEY AUTOINCREMENT,
    customer_id  INTEGER NOT NULL REFERENCES customers(id),
    bill_id      INTEGER REFERENCES monthly_bills(id),
    amount       TEXT NOT NULL,
    payment_date TEXT NOT NULL,
    notes        TEXT,
    created_at   TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_payments_customer ON payments(customer_id);
CREATE INDEX IF NOT EXISTS idx_payments_bill ON payments(bill_id);
CREATE INDEX IF NOT EXISTS idx_payments_date ON payments(payment_date);

CREATE TABLE IF NOT EXISTS installations (
    id                  INTEGER PRIMARY KEY AUTOINCREMENT,
    customer_id         INTEGER NOT NULL REFERENCES customers(id),
    installation_fee    TEXT NOT NULL,
    fee_paid            BOOLEAN NOT NULL DEFAULT 0,
    status              TEXT NOT NULL DEFAULT 'pending',
    scheduled_date      TEXT,
    completed_date      TEXT,
    total_material_cost TEXT NOT NULL DEFAULT '0.00',
    profit_loss         TEXT NOT NULL DEFAULT '0.00',
    created_at          TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_installations_customer ON installations(customer_id);
CREATE INDEX IF NOT EXISTS idx_installations_completed ON installations(completed_date);

CREATE TABLE IF NOT EXISTS installation_materials (
    id              INTEGER PRIMARY KEY AUTOINCREMENT,
    installation_id INTEGER NOT NULL REFERENCES installations(id),
    material_name   TEXT NOT NULL,
    quantity        TEXT NOT NULL,
    unit_price      TEXT NOT NULL,
    total_cost      TEXT NOT NULL,
    created_at      TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_materials_installation ON installation_materials(installation_id);

CREATE TABLE IF NOT EXISTS material_presets (
    id                 INTEGER PRIMARY KEY AUTOINCREMENT,
    name               TEXT NOT NULL UNIQUE,
    default_unit_price TEXT NOT NULL,
    unit               TEXT NOT NULL,
    created_at         TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS settings (
    id         INTEGER PRIMARY KEY AUTOINCREMENT,
    key        TEXT NOT NULL UNIQUE,
    value      TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

"#;

pub(crate) const CURRENT_VERSION: i32 = 1;

/// Migrations from version N to N+1.
/// Each entry is (from_version, sql).
pub(crate) const MIGRATIONS: &[(i32, &str)] = &[];
