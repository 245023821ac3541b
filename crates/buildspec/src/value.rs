//! generic document tree
//!
//! Specification, settings and project documents are read into the following data types
//! - boolean (true/false)
//! - integer (signed, i64)
//! - decimal (f64)
//! - string (utf-8)
//! - array ("list" of values)
//! - object (order-preserving "map"/"dictionary", where the key is of type string)
//!
//! Additionally:
//! - there is no `null`/`None` value. Converting a source tree that contains one fails with
//!   [UnsupportedValue].
//! - object keys that are not strings (yaml allows this) are rendered to their string form.
//!
use serde::{
    ser::{SerializeMap, SerializeSeq},
    Serializer,
};

pub type Object = indexmap::IndexMap<String, Value>;

/// All possible value types
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Boolean(bool),
    Integer(i64),
    Decimal(f64),
    String(String),
    Array(Vec<Value>),
    Object(Object),
}

impl Value {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&Object> {
        match self {
            Value::Object(o) => Some(o),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Value::Array(a) => Some(a),
            _ => None,
        }
    }

    /// Short name of the node shape, used in diagnostics
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Boolean(_) => "boolean",
            Value::Integer(_) => "integer",
            Value::Decimal(_) => "decimal",
            Value::String(_) => "string",
            Value::Array(_) => "array",
            Value::Object(_) => "object",
        }
    }
}

/// A source node that has no [Value] representation
#[derive(thiserror::Error, Debug, PartialEq)]
#[error("unsupported {0} value in document")]
pub struct UnsupportedValue(pub &'static str);

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::String(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_string())
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Self::Boolean(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(value: Vec<T>) -> Self {
        Value::Array(value.into_iter().map(Into::into).collect())
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Value {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Value::Object(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

impl TryFrom<hcl::Number> for Value {
    type Error = UnsupportedValue;

    fn try_from(value: hcl::Number) -> Result<Self, Self::Error> {
        if let Some(int) = value.as_i64() {
            return Ok(Value::Integer(int));
        }

        value
            .as_f64()
            .map(Value::Decimal)
            .ok_or(UnsupportedValue("out of range number"))
    }
}

impl TryFrom<hcl::Value> for Value {
    type Error = UnsupportedValue;

    fn try_from(value: hcl::Value) -> Result<Self, Self::Error> {
        Ok(match value {
            hcl::Value::Bool(b) => b.into(),
            hcl::Value::Number(n) => n.try_into()?,
            hcl::Value::String(s) => s.into(),
            hcl::Value::Array(a) => array(a)?,
            hcl::Value::Object(o) => object(o.into_iter().map(|(k, v)| (Ok(k), v)))?,
            hcl::Value::Null => return Err(UnsupportedValue("null")),
        })
    }
}

impl TryFrom<serde_json::Value> for Value {
    type Error = UnsupportedValue;

    fn try_from(value: serde_json::Value) -> Result<Self, Self::Error> {
        use serde_json::Value as Json;

        Ok(match value {
            Json::Bool(b) => b.into(),
            Json::Number(n) => {
                if let Some(int) = n.as_i64() {
                    Value::Integer(int)
                } else {
                    Value::Decimal(
                        n.as_f64()
                            .ok_or(UnsupportedValue("out of range number"))?,
                    )
                }
            }
            Json::String(s) => s.into(),
            Json::Array(a) => array(a)?,
            Json::Object(o) => object(o.into_iter().map(|(k, v)| (Ok(k), v)))?,
            Json::Null => return Err(UnsupportedValue("null")),
        })
    }
}

impl TryFrom<serde_yaml::Value> for Value {
    type Error = UnsupportedValue;

    fn try_from(value: serde_yaml::Value) -> Result<Self, Self::Error> {
        use serde_yaml::Value as Yaml;

        Ok(match value {
            Yaml::Bool(b) => b.into(),
            Yaml::Number(n) => {
                if let Some(int) = n.as_i64() {
                    Value::Integer(int)
                } else {
                    Value::Decimal(
                        n.as_f64()
                            .ok_or(UnsupportedValue("out of range number"))?,
                    )
                }
            }
            Yaml::String(s) => s.into(),
            Yaml::Sequence(a) => array(a)?,
            Yaml::Mapping(m) => object(m.into_iter().map(|(k, v)| (yaml_key(k), v)))?,
            Yaml::Tagged(tagged) => tagged.value.try_into()?,
            Yaml::Null => return Err(UnsupportedValue("null")),
        })
    }
}

fn array<T>(items: Vec<T>) -> Result<Value, UnsupportedValue>
where
    Value: TryFrom<T, Error = UnsupportedValue>,
{
    let mut out = Vec::with_capacity(items.len());
    for item in items {
        out.push(Value::try_from(item)?);
    }
    Ok(Value::Array(out))
}

fn object<T>(
    entries: impl Iterator<Item = (Result<String, UnsupportedValue>, T)>,
) -> Result<Value, UnsupportedValue>
where
    Value: TryFrom<T, Error = UnsupportedValue>,
{
    let mut out = Object::new();
    for (key, value) in entries {
        out.insert(key?, Value::try_from(value)?);
    }
    Ok(Value::Object(out))
}

fn yaml_key(key: serde_yaml::Value) -> Result<String, UnsupportedValue> {
    use serde_yaml::Value as Yaml;

    match key {
        Yaml::String(s) => Ok(s),
        Yaml::Bool(b) => Ok(b.to_string()),
        Yaml::Number(n) => Ok(n.to_string()),
        _ => Err(UnsupportedValue("non-scalar object key")),
    }
}

impl serde::ser::Serialize for Value {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Value::Boolean(value) => serializer.serialize_bool(*value),
            Value::Integer(value) => serializer.serialize_i64(*value),
            Value::Decimal(value) => serializer.serialize_f64(*value),
            Value::String(value) => serializer.serialize_str(value),
            Value::Array(value) => {
                let mut ser = serializer.serialize_seq(Some(value.len()))?;
                for element in value {
                    ser.serialize_element(element)?;
                }
                ser.end()
            }
            Value::Object(value) => {
                let mut ser = serializer.serialize_map(Some(value.len()))?;
                for (element_key, element_value) in value {
                    ser.serialize_entry(element_key, element_value)?;
                }
                ser.end()
            }
        }
    }
}
