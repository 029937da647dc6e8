use rust_decimal::Decimal;
use std::str::FromStr;

use crate::db::Store;
use crate::error::{LedgerError, LedgerResult};
use crate::models::{exact_money, Setting};

pub(crate) const MONTHLY_FEE_KEY: &str = "monthly_fee";
pub(crate) const INSTALLATION_FEE_KEY: &str = "installation_fee";

/// Standard fees applied when a caller does not supply an amount.
///
/// Read from the `settings` table at call time; keys that were never stored
/// fall back to [`BillingConfig::default`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct BillingConfig {
    pub(crate) monthly_fee: Decimal,
    pub(crate) installation_fee: Decimal,
}

impl Default for BillingConfig {
    fn default() -> Self {
        Self {
            monthly_fee: Decimal::from(30_000),
            installation_fee: Decimal::from(300_000),
        }
    }
}

impl BillingConfig {
    pub(crate) fn load(store: &Store<'_>) -> LedgerResult<Self> {
        let defaults = Self::default();
        Ok(Self {
            monthly_fee: stored_fee(store, MONTHLY_FEE_KEY)?.unwrap_or(defaults.monthly_fee),
            installation_fee: stored_fee(store, INSTALLATION_FEE_KEY)?
                .unwrap_or(defaults.installation_fee),
        })
    }

    fn default_value(key: &str) -> Option<Decimal> {
        let defaults = Self::default();
        match key {
            MONTHLY_FEE_KEY => Some(defaults.monthly_fee),
            INSTALLATION_FEE_KEY => Some(defaults.installation_fee),
            _ => None,
        }
    }
}

fn stored_fee(store: &Store<'_>, key: &str) -> LedgerResult<Option<Decimal>> {
    match store.get_setting(key)? {
        Some(setting) => parse_fee(key, &setting.value).map(Some),
        None => Ok(None),
    }
}

fn parse_fee(key: &str, value: &str) -> LedgerResult<Decimal> {
    let fee = Decimal::from_str(value.trim())
        .map_err(|_| LedgerError::invalid(format!("setting {key} = '{value}' is not a number")))?;
    let fee = exact_money(&format!("setting {key}"), fee)?;
    if fee.is_sign_negative() {
        return Err(LedgerError::invalid(format!(
            "setting {key} must not be negative"
        )));
    }
    Ok(fee)
}

/// Stored settings plus the fee defaults that were never overridden.
pub(crate) fn settings(store: &Store<'_>) -> LedgerResult<Vec<Setting>> {
    let mut all = store.get_settings()?;
    for key in [MONTHLY_FEE_KEY, INSTALLATION_FEE_KEY] {
        if all.iter().any(|s| s.key == key) {
            continue;
        }
        if let Some(value) = BillingConfig::default_value(key) {
            all.push(Setting {
                id: 0,
                key: key.to_string(),
                value: value.to_string(),
                updated_at: String::new(),
            });
        }
    }
    all.sort_by(|a, b| a.key.cmp(&b.key));
    Ok(all)
}

/// Insert or replace a setting. Fee keys must hold non-negative amounts.
pub(crate) fn update_setting(store: &Store<'_>, key: &str, value: &str) -> LedgerResult<Setting> {
    let key = key.trim();
    if key.is_empty() {
        return Err(LedgerError::invalid("setting key must not be empty"));
    }
    let value = if BillingConfig::default_value(key).is_some() {
        parse_fee(key, value)?.to_string()
    } else {
        value.to_string()
    };
    let setting = store.upsert_setting(key, &value)?;
    tracing::info!(key, value = %setting.value, "setting updated");
    Ok(setting)
}
