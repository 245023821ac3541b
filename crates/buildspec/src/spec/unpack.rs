use crate::settings::parse_boolean;
use crate::value::{Object, Value};
use indexmap::{IndexMap, IndexSet};

/// Typed access to the keys of a document object
///
/// Tracks which keys were consumed so leftovers can be reported. A key holding the wrong
/// node shape is recorded as an issue and treated as absent.
pub(crate) struct Unpack<'a> {
    object: &'a Object,
    seen: IndexSet<&'a str>,
    issues: Vec<String>,
}

impl<'a> Unpack<'a> {
    pub fn new(object: &'a Object) -> Self {
        Self {
            object,
            seen: IndexSet::new(),
            issues: Vec::new(),
        }
    }

    pub fn value(&mut self, key: &str) -> Option<&'a Value> {
        let (key, value) = self.object.get_key_value(key)?;
        self.seen.insert(key.as_str());
        Some(value)
    }

    fn mismatch(&mut self, key: &str, expected: &str, found: &Value) {
        self.issues
            .push(format!("{key}: expected {expected}, found {}", found.kind()));
    }

    pub fn string(&mut self, key: &str) -> Option<String> {
        match self.value(key)? {
            Value::String(s) => Some(s.clone()),
            other => {
                self.mismatch(key, "string", other);
                None
            }
        }
    }

    /// Booleans, or strings with `YES`/`NO` semantics
    pub fn boolean(&mut self, key: &str) -> Option<bool> {
        match self.value(key)? {
            Value::Boolean(b) => Some(*b),
            Value::String(s) => Some(parse_boolean(s)),
            Value::Integer(i) => Some(*i != 0),
            other => {
                self.mismatch(key, "boolean", other);
                None
            }
        }
    }

    /// Integers, or strings holding one
    pub fn integer(&mut self, key: &str) -> Option<i64> {
        match self.value(key)? {
            Value::Integer(i) => Some(*i),
            other => match other.as_str().and_then(|s| s.trim().parse().ok()) {
                Some(i) => Some(i),
                None => {
                    self.mismatch(key, "integer", other);
                    None
                }
            },
        }
    }

    pub fn array(&mut self, key: &str) -> Option<Vec<Value>> {
        match self.value(key)? {
            Value::Array(a) => Some(a.clone()),
            other => {
                self.mismatch(key, "array", other);
                None
            }
        }
    }

    /// An array of strings; a single string is read as a one element list
    pub fn strings(&mut self, key: &str) -> Option<Vec<String>> {
        let value = self.value(key)?;
        let items = match value {
            Value::String(s) => return Some(vec![s.clone()]),
            Value::Array(a) => a,
            other => {
                self.mismatch(key, "array of strings", other);
                return None;
            }
        };

        let mut out = Vec::with_capacity(items.len());
        for item in items {
            match item {
                Value::String(s) => out.push(s.clone()),
                other => self.mismatch(key, "string element", other),
            }
        }
        Some(out)
    }

    pub fn object(&mut self, key: &str) -> Option<Object> {
        match self.value(key)? {
            Value::Object(o) => Some(o.clone()),
            other => {
                self.mismatch(key, "object", other);
                None
            }
        }
    }

    /// An object whose values are scalars, rendered as setting strings
    pub fn string_map(&mut self, key: &str) -> Option<IndexMap<String, String>> {
        let object = self.object(key)?;

        let mut out = IndexMap::with_capacity(object.len());
        for (name, value) in object {
            let value = match value {
                Value::String(s) => s,
                Value::Boolean(true) => "YES".to_string(),
                Value::Boolean(false) => "NO".to_string(),
                Value::Integer(i) => i.to_string(),
                Value::Decimal(d) => d.to_string(),
                other => {
                    self.mismatch(&format!("{key}.{name}"), "scalar", &other);
                    continue;
                }
            };
            out.insert(name, value);
        }
        Some(out)
    }

    /// Keys that were never consumed
    pub fn unknown_keys(&self) -> Vec<&'a str> {
        self.object
            .keys()
            .map(String::as_str)
            .filter(|key| !self.seen.contains(key))
            .collect()
    }

    /// Finish unpacking
    ///
    /// Returns the shape issues and, when `check` is set, one issue per unknown key.
    pub fn complete(self, check: bool) -> Vec<String> {
        let mut issues = if check {
            self.unknown_keys()
                .into_iter()
                .map(|key| format!("{key}: unknown key"))
                .collect()
        } else {
            Vec::new()
        };

        issues.extend(self.issues);
        issues
    }
}
