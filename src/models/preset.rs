use rust_decimal::Decimal;

/// A reusable material with a default unit price.
#[derive(Debug, Clone)]
pub struct MaterialPreset {
    pub id: i64,
    pub name: String,
    pub default_unit_price: Decimal,
    pub unit: String,
    pub created_at: String,
}

impl MaterialPreset {
    /// Find a preset by name (case-insensitive) in a slice.
    pub fn find_by_name<'a>(presets: &'a [MaterialPreset], name: &str) -> Option<&'a MaterialPreset> {
        let lower = name.to_lowercase();
        presets.iter().find(|p| p.name.to_lowercase() == lower)
    }
}

#[derive(Debug, Clone)]
pub struct Setting {
    /// Zero for defaults that have never been stored.
    pub id: i64,
    pub key: String,
    pub value: String,
    pub updated_at: String,
}
