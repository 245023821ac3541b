//! settings environment
//!
//! Build settings are resolved by name to a string. Booleans are encoded as strings too
//! (`YES`/`NO`), see [parse_boolean].
use crate::value::Value;
use indexmap::IndexMap;

/// Resolves build settings for the target currently being processed
pub trait Environment {
    /// Value of a setting, empty when unset
    fn resolve(&self, name: &str) -> String;

    fn resolve_boolean(&self, name: &str) -> bool {
        parse_boolean(&self.resolve(name))
    }

    /// Expand `$(NAME)` and `${NAME}` references
    ///
    /// Unterminated references are kept verbatim.
    fn expand(&self, value: &str) -> String {
        let mut out = String::with_capacity(value.len());
        let mut rest = value;

        while let Some(start) = rest.find('$') {
            out.push_str(&rest[..start]);
            let after = &rest[start + 1..];

            let close = match after.chars().next() {
                Some('(') => ')',
                Some('{') => '}',
                _ => {
                    out.push('$');
                    rest = after;
                    continue;
                }
            };

            let Some(end) = after.find(close) else {
                out.push_str(&rest[start..]);
                rest = "";
                break;
            };

            out.push_str(&self.resolve(&after[1..end]));
            rest = &after[end + 1..];
        }

        out.push_str(rest);
        out
    }
}

/// Truthy setting values: `YES`, `TRUE` and `1`, ignoring case
pub fn parse_boolean(value: &str) -> bool {
    let value = value.trim();
    value.eq_ignore_ascii_case("yes") || value.eq_ignore_ascii_case("true") || value == "1"
}

/// Flat, order-preserving setting store
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Settings {
    values: IndexMap<String, String>,
}

impl Settings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.values.insert(name.into(), value.into());
        self
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl Environment for Settings {
    fn resolve(&self, name: &str) -> String {
        self.values.get(name).cloned().unwrap_or_default()
    }
}

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum SettingsError {
    #[error("settings document must be an object")]
    NotAnObject,
    #[error("setting {0} must be a scalar")]
    NotAScalar(String),
}

impl TryFrom<Value> for Settings {
    type Error = SettingsError;

    /// Scalars become setting strings; booleans become `YES`/`NO`
    fn try_from(value: Value) -> Result<Self, Self::Error> {
        let Value::Object(object) = value else {
            return Err(SettingsError::NotAnObject);
        };

        let mut settings = Settings::new();
        for (name, value) in object {
            let value = match value {
                Value::Boolean(true) => "YES".to_string(),
                Value::Boolean(false) => "NO".to_string(),
                Value::Integer(i) => i.to_string(),
                Value::Decimal(d) => d.to_string(),
                Value::String(s) => s,
                Value::Array(_) | Value::Object(_) => return Err(SettingsError::NotAScalar(name)),
            };
            settings.set(name, value);
        }

        Ok(settings)
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Settings {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut settings = Settings::new();
        for (k, v) in iter {
            settings.set(k, v);
        }
        settings
    }
}
