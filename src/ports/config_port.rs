//! Configuration access port trait.

use crate::domain::error::RebaseError;

/// Keyed configuration lookup. Implementors only supply raw strings; the
/// typed getters fall back to `default` for absent or blank keys and reject
/// values that do not parse.
pub trait ConfigPort {
    fn get_string(&self, section: &str, key: &str) -> Option<String>;

    fn get_usize(&self, section: &str, key: &str, default: usize) -> Result<usize, RebaseError> {
        match non_blank(self.get_string(section, key)) {
            None => Ok(default),
            Some(v) => v.parse().map_err(|_| {
                RebaseError::invalid(section, key, format!("expected a whole number, got {v:?}"))
            }),
        }
    }

    fn get_double(&self, section: &str, key: &str, default: f64) -> Result<f64, RebaseError> {
        match non_blank(self.get_string(section, key)) {
            None => Ok(default),
            Some(v) => v.parse().map_err(|_| {
                RebaseError::invalid(section, key, format!("expected a number, got {v:?}"))
            }),
        }
    }

    fn get_bool(&self, section: &str, key: &str, default: bool) -> Result<bool, RebaseError> {
        match non_blank(self.get_string(section, key)) {
            None => Ok(default),
            Some(v) => parse_bool(&v).ok_or_else(|| {
                RebaseError::invalid(section, key, format!("expected true/false, got {v:?}"))
            }),
        }
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.to_lowercase().as_str() {
        "true" | "yes" | "1" => Some(true),
        "false" | "no" | "0" => Some(false),
        _ => None,
    }
}
