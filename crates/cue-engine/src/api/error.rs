/// Rejected settings or tuning input.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("invalid settings json: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("{field} out of range: {value}")]
    OutOfRange { field: &'static str, value: f64 },

    #[error("{field} is not a #rgb or #rrggbb color: {value:?}")]
    InvalidColor { field: &'static str, value: String },
}

pub type Result<T> = std::result::Result<T, SettingsError>;

/// Fail with `OutOfRange` unless `min <= value <= max`. NaN always fails.
pub(crate) fn check_range(field: &'static str, value: f64, min: f64, max: f64) -> Result<()> {
    if value >= min && value <= max {
        Ok(())
    } else {
        Err(SettingsError::OutOfRange { field, value })
    }
}

/// Accept `#rgb` and `#rrggbb` hex colors.
pub(crate) fn check_color(field: &'static str, value: &str) -> Result<()> {
    let valid = value
        .strip_prefix('#')
        .is_some_and(|hex| matches!(hex.len(), 3 | 6) && hex.chars().all(|c| c.is_ascii_hexdigit()));
    if valid {
        Ok(())
    } else {
        Err(SettingsError::InvalidColor { field, value: value.to_string() })
    }
}
