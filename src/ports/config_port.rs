//! Configuration access port trait.

use crate::domain::error::TradesentinelError;

pub trait ConfigPort {
    fn get_string(&self, section: &str, key: &str) -> Option<String>;
    fn get_int(&self, section: &str, key: &str, default: i64) -> i64;
    fn get_double(&self, section: &str, key: &str, default: f64) -> f64;

    /// `get_string` for keys that must be present and non-blank.
    fn require_string(&self, section: &str, key: &str) -> Result<String, TradesentinelError> {
        self.get_string(section, key)
            .filter(|s| !s.trim().is_empty())
            .ok_or_else(|| TradesentinelError::ConfigMissing {
                section: section.to_string(),
                key: key.to_string(),
            })
    }
}
