//! Key/value configuration handed to plugins during `configure`.
//!
//! Values are JSON-shaped, so a configuration can be built programmatically
//! with [`Configuration::with`] or parsed from a JSON object string. Lookups
//! go through typed getters with a single accessor convention: `get_*` fails
//! on a missing key, `get_*_or` substitutes a default for a missing key but
//! still rejects a value of the wrong type.

use serde_json::{Map, Value};

use crate::error::ConfigError;

/// An immutable-after-construction view of plugin configuration.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Configuration {
    values: Map<String, Value>,
}

impl Configuration {
    /// Creates an empty configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a configuration from a JSON object string.
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let value: Value =
            serde_json::from_str(text).map_err(|e| ConfigError::Parse(e.to_string()))?;
        match value {
            Value::Object(values) => Ok(Self { values }),
            other => Err(ConfigError::Parse(format!(
                "expected a JSON object, got {other}"
            ))),
        }
    }

    /// Sets a key, replacing any previous value.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.values.insert(key.into(), value.into());
    }

    /// Builder-style [`set`](Self::set).
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set(key, value);
        self
    }

    /// Returns whether a key is present.
    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    /// Returns an iterator over the configured keys.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    fn lookup(&self, key: &str) -> Result<&Value, ConfigError> {
        self.values.get(key).ok_or_else(|| ConfigError::MissingKey {
            key: key.to_owned(),
        })
    }

    fn mismatch(key: &str, expected: &'static str) -> ConfigError {
        ConfigError::TypeMismatch {
            key: key.to_owned(),
            expected,
        }
    }

    /// Returns a string value.
    pub fn get_str(&self, key: &str) -> Result<&str, ConfigError> {
        self.lookup(key)?
            .as_str()
            .ok_or_else(|| Self::mismatch(key, "string"))
    }

    /// Returns a string value, or `default` if the key is absent.
    pub fn get_str_or(&self, key: &str, default: &str) -> Result<String, ConfigError> {
        if !self.contains(key) {
            return Ok(default.to_owned());
        }
        self.get_str(key).map(str::to_owned)
    }

    /// Returns a floating point value.
    pub fn get_f64(&self, key: &str) -> Result<f64, ConfigError> {
        self.lookup(key)?
            .as_f64()
            .ok_or_else(|| Self::mismatch(key, "number"))
    }

    /// Returns a floating point value, or `default` if the key is absent.
    pub fn get_f64_or(&self, key: &str, default: f64) -> Result<f64, ConfigError> {
        if !self.contains(key) {
            return Ok(default);
        }
        self.get_f64(key)
    }

    /// Returns an unsigned integer value.
    pub fn get_u64(&self, key: &str) -> Result<u64, ConfigError> {
        self.lookup(key)?
            .as_u64()
            .ok_or_else(|| Self::mismatch(key, "non-negative integer"))
    }

    /// Returns an unsigned integer value, or `default` if the key is absent.
    pub fn get_u64_or(&self, key: &str, default: u64) -> Result<u64, ConfigError> {
        if !self.contains(key) {
            return Ok(default);
        }
        self.get_u64(key)
    }

    /// Returns a boolean value.
    pub fn get_bool(&self, key: &str) -> Result<bool, ConfigError> {
        self.lookup(key)?
            .as_bool()
            .ok_or_else(|| Self::mismatch(key, "boolean"))
    }

    /// Returns a boolean value, or `default` if the key is absent.
    pub fn get_bool_or(&self, key: &str, default: bool) -> Result<bool, ConfigError> {
        if !self.contains(key) {
            return Ok(default);
        }
        self.get_bool(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn typed_getters() {
        let config = Configuration::new()
            .with("background", "black")
            .with("size", 200u64)
            .with("rate", 0.5)
            .with("enabled", true);

        assert_eq!(config.get_str("background"), Ok("black"));
        assert_eq!(config.get_u64("size"), Ok(200));
        assert_eq!(config.get_f64("rate"), Ok(0.5));
        assert_eq!(config.get_bool("enabled"), Ok(true));
        // integers are usable as floats
        assert_eq!(config.get_f64("size"), Ok(200.0));
    }

    #[test]
    fn missing_key() {
        let config = Configuration::new();
        assert_eq!(
            config.get_str("background"),
            Err(ConfigError::MissingKey {
                key: "background".to_owned()
            })
        );
        assert_eq!(config.get_str_or("background", "white").unwrap(), "white");
        assert_eq!(config.get_u64_or("size", 100).unwrap(), 100);
    }

    #[test]
    fn type_mismatch() {
        let config = Configuration::new().with("size", "huge");
        assert_eq!(
            config.get_u64("size"),
            Err(ConfigError::TypeMismatch {
                key: "size".to_owned(),
                expected: "non-negative integer"
            })
        );
        // defaulted getters still reject present-but-wrong values
        assert!(config.get_u64_or("size", 100).is_err());
    }

    #[test]
    fn from_json() {
        let config = Configuration::from_json(r#"{"background": "black", "size": 200}"#).unwrap();
        assert_eq!(config.get_str("background"), Ok("black"));
        assert_eq!(config.get_u64("size"), Ok(200));

        assert!(Configuration::from_json("[1, 2]").is_err());
        assert!(Configuration::from_json("not json").is_err());
    }
}
