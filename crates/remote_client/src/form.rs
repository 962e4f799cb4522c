//! Form and query-string encoding
//!
//! Fields whose value is an empty string are omitted, as are fields given
//! no value at all. Integers are always sent, zero included, and booleans are
//! sent as `true`/`false`.

use std::fmt;

/// A single form value
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormValue {
    Text(String),
    Int(i64),
    Bool(bool),
}

impl FormValue {
    /// Whether the encoder drops this value
    pub fn is_omitted(&self) -> bool {
        matches!(self, FormValue::Text(s) if s.is_empty())
    }
}

impl fmt::Display for FormValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FormValue::Text(s) => write!(f, "{}", s),
            FormValue::Int(n) => write!(f, "{}", n),
            FormValue::Bool(b) => write!(f, "{}", b),
        }
    }
}

impl From<String> for FormValue {
    fn from(s: String) -> Self {
        FormValue::Text(s)
    }
}

impl From<&str> for FormValue {
    fn from(s: &str) -> Self {
        FormValue::Text(s.to_string())
    }
}

impl From<&String> for FormValue {
    fn from(s: &String) -> Self {
        FormValue::Text(s.clone())
    }
}

impl From<i64> for FormValue {
    fn from(n: i64) -> Self {
        FormValue::Int(n)
    }
}

impl From<u32> for FormValue {
    fn from(n: u32) -> Self {
        FormValue::Int(n as i64)
    }
}

impl From<u8> for FormValue {
    fn from(n: u8) -> Self {
        FormValue::Int(n as i64)
    }
}

impl From<bool> for FormValue {
    fn from(b: bool) -> Self {
        FormValue::Bool(b)
    }
}

/// Ordered set of named form fields
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormFields {
    fields: Vec<(String, FormValue)>,
}

impl FormFields {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a field, builder style
    pub fn with(mut self, name: &str, value: impl Into<FormValue>) -> Self {
        self.push(name, value);
        self
    }

    /// Add a field that may be absent, builder style
    pub fn with_opt<V: Into<FormValue>>(mut self, name: &str, value: Option<V>) -> Self {
        if let Some(value) = value {
            self.push(name, value);
        }
        self
    }

    pub fn push(&mut self, name: &str, value: impl Into<FormValue>) {
        self.fields.push((name.to_string(), value.into()));
    }

    /// Value of the first field with the given name
    pub fn get(&self, name: &str) -> Option<&FormValue> {
        self.fields
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v)
    }

    /// Whether the encoded form would be empty
    pub fn is_empty(&self) -> bool {
        self.fields.iter().all(|(_, v)| v.is_omitted())
    }

    /// Fields that survive encoding, in insertion order
    pub fn retained(&self) -> impl Iterator<Item = (&str, &FormValue)> {
        self.fields
            .iter()
            .filter(|(_, v)| !v.is_omitted())
            .map(|(n, v)| (n.as_str(), v))
    }

    /// `application/x-www-form-urlencoded` body (also used for query strings)
    pub fn encode(&self) -> String {
        self.retained()
            .map(|(name, value)| {
                format!(
                    "{}={}",
                    urlencoding::encode(name),
                    urlencoding::encode(&value.to_string())
                )
            })
            .collect::<Vec<_>>()
            .join("&")
    }

    /// Parse an encoded body back into name/value pairs
    pub fn decode(encoded: &str) -> Vec<(String, String)> {
        encoded
            .split('&')
            .filter(|pair| !pair.is_empty())
            .map(|pair| {
                let (name, value) = pair.split_once('=').unwrap_or((pair, ""));
                (decode_component(name), decode_component(value))
            })
            .collect()
    }
}

fn decode_component(component: &str) -> String {
    let spaced = component.replace('+', " ");
    urlencoding::decode(&spaced)
        .map(|s| s.into_owned())
        .unwrap_or(spaced)
}
