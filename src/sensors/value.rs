//! Reading values and their two views: ordered list and named mapping.
//!
//! Every adapter keeps one ordered record of last readings.  [`Values`] is
//! that record as a list; [`NamedValues`] pairs each slot with a short
//! field name (`t`, `h`, `p`, `lux`, `d`, `t0`, `b0`, `_b0`, ...).  A
//! missing reading is `None` and serialises to JSON `null`.

use core::fmt::Write;

use serde::Serialize;
use serde::ser::SerializeMap;

/// Upper bound on slots per sensor (16 buttons x current/previous).
pub const MAX_FIELDS: usize = 32;

/// Short field name such as `t` or `_b12`.
pub type FieldName = heapless::String<8>;

/// Ordered last readings of one sensor.
pub type Values = heapless::Vec<Option<Value>, MAX_FIELDS>;

/// A single scalar reading.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    Float(f32),
    Int(i32),
    Bool(bool),
}

impl Value {
    pub fn as_f32(self) -> Option<f32> {
        match self {
            Self::Float(v) => Some(v),
            Self::Int(v) => Some(v as f32),
            Self::Bool(_) => None,
        }
    }

    pub fn as_i32(self) -> Option<i32> {
        match self {
            Self::Int(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_bool(self) -> Option<bool> {
        match self {
            Self::Bool(v) => Some(v),
            _ => None,
        }
    }
}

impl From<f32> for Value {
    fn from(v: f32) -> Self {
        Self::Float(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Self::Int(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

/// Round half away from zero to `decimals` places.
pub fn round_to(x: f32, decimals: u8) -> f32 {
    let scale = 10f32.powi(i32::from(decimals));
    (x * scale).round() / scale
}

/// Build a [`Values`] list from optional scalars.  Items past
/// [`MAX_FIELDS`] are a bug in the caller.
pub fn values_of<T, I>(items: I) -> Values
where
    T: Into<Value>,
    I: IntoIterator<Item = Option<T>>,
{
    let mut values = Values::new();
    for item in items {
        let pushed = values.push(item.map(Into::into));
        debug_assert!(pushed.is_ok(), "more than {MAX_FIELDS} fields");
    }
    values
}

/// Format an indexed field name (`t3`, `_b0`, ...).
pub fn indexed_name(prefix: &str, index: usize) -> FieldName {
    let mut name = FieldName::new();
    let _ = write!(name, "{prefix}{index}");
    name
}

// ---------------------------------------------------------------------------
// Named view
// ---------------------------------------------------------------------------

/// Insertion-ordered `name -> reading` mapping.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NamedValues {
    entries: heapless::Vec<(FieldName, Option<Value>), MAX_FIELDS>,
}

impl NamedValues {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pair fixed field names with a values list, position by position.
    pub fn zip(names: &[&str], values: &Values) -> Self {
        let mut named = Self::new();
        for (name, value) in names.iter().zip(values.iter()) {
            named.insert(name, *value);
        }
        named
    }

    /// Append an entry, replacing the value if `name` is already present.
    /// Over-long names and entries past capacity are caller bugs: they
    /// assert in debug builds and are dropped in release.
    pub fn insert(&mut self, name: &str, value: Option<Value>) {
        if let Some(slot) = self.entries.iter_mut().find(|(n, _)| n.as_str() == name) {
            slot.1 = value;
            return;
        }
        let key = FieldName::try_from(name);
        debug_assert!(key.is_ok(), "field name {name:?} longer than 8 bytes");
        let Ok(key) = key else {
            return;
        };
        let pushed = self.entries.push((key, value));
        debug_assert!(pushed.is_ok(), "more than {MAX_FIELDS} fields");
    }

    /// Look up a field.  Outer `None`: no such field.  Inner `None`: no reading yet.
    pub fn get(&self, name: &str) -> Option<Option<Value>> {
        self.entries
            .iter()
            .find(|(n, _)| n.as_str() == name)
            .map(|(_, v)| *v)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<Value>)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), *v))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(n, _)| n.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// True when every field is still "no reading yet".
    pub fn all_unset(&self) -> bool {
        self.entries.iter().all(|(_, v)| v.is_none())
    }
}

impl Serialize for NamedValues {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (name, value) in &self.entries {
            map.serialize_entry(name.as_str(), value)?;
        }
        map.end()
    }
}
