//! Renderer definitions: the declarative rules mapping feature attributes to
//! symbols.
//!
//! Three kinds are understood (`simple`, `uniqueValue`, `classBreaks`). Any
//! other `type` parses to [`Renderer::Unsupported`], which keeps the raw JSON
//! and is handled downstream as an empty icon rather than an error.
//!
//! Like symbols, renderers re-serialize to the JSON they were parsed from.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Number, Value};

use crate::wire::{from_object, impl_wire_object, number, serialize_tagged, tagged_object};
use crate::{Symbol, SymbologyError, SymbologyResult};

/// Separator between the parts of a unique-value composite key.
pub const FIELD_DELIMITER: &str = ", ";

#[derive(Debug, Clone, PartialEq)]
pub enum Renderer {
    /// `simple`
    Simple(SimpleRenderer),
    /// `uniqueValue`
    UniqueValue(UniqueValueRenderer),
    /// `classBreaks`
    ClassBreaks(ClassBreaksRenderer),
    /// Any other `type`, kept as received.
    Unsupported(Value),
}

impl Renderer {
    /// Parse a renderer from server JSON.
    pub fn from_json(json: &str) -> SymbologyResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Renderer::Simple(_) => "simple",
            Renderer::UniqueValue(_) => "uniqueValue",
            Renderer::ClassBreaks(_) => "classBreaks",
            Renderer::Unsupported(_) => "unsupported",
        }
    }

    /// Check the structural invariants matching relies on.
    pub fn validate(&self) -> SymbologyResult<()> {
        match self {
            Renderer::Simple(_) | Renderer::Unsupported(_) => Ok(()),
            Renderer::UniqueValue(uv) => uv.validate(),
            Renderer::ClassBreaks(cb) => cb.validate(),
        }
    }
}

impl Serialize for Renderer {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Renderer::Simple(r) => serialize_tagged(serializer, "simple", r),
            Renderer::UniqueValue(r) => serialize_tagged(serializer, "uniqueValue", r),
            Renderer::ClassBreaks(r) => serialize_tagged(serializer, "classBreaks", r),
            Renderer::Unsupported(raw) => raw.serialize(serializer),
        }
    }
}

impl<'de> Deserialize<'de> for Renderer {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        let (tag, object) = tagged_object::<D::Error>(value)?;
        let renderer = match tag.as_deref() {
            None => return Err(serde::de::Error::missing_field("type")),
            Some("simple") => Renderer::Simple(from_object::<_, D::Error>(object)?),
            Some("uniqueValue") => Renderer::UniqueValue(from_object::<_, D::Error>(object)?),
            Some("classBreaks") => Renderer::ClassBreaks(from_object::<_, D::Error>(object)?),
            Some(_) => Renderer::Unsupported(Value::Object(object)),
        };
        Ok(renderer)
    }
}

/// One symbol for every feature.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimpleRenderer {
    pub symbol: Symbol,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl SimpleRenderer {
    pub fn new(symbol: Symbol) -> Self {
        Self {
            symbol,
            label: None,
            extra: Map::new(),
        }
    }

    pub fn label(&self) -> &str {
        self.label.as_deref().unwrap_or("")
    }
}

/// Symbol chosen by exact match on up to three attribute values.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UniqueValueRenderer {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field1: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field2: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field3: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field_delimiter: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_symbol: Option<Symbol>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unique_value_infos: Option<Vec<UniqueValueInfo>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl UniqueValueRenderer {
    /// Configured key fields in order. Blank `field2`/`field3` do not count.
    pub fn fields(&self) -> Vec<&str> {
        std::iter::once(self.field1.as_deref().unwrap_or(""))
            .chain(self.field2.as_deref().filter(|f| !f.is_empty()))
            .chain(self.field3.as_deref().filter(|f| !f.is_empty()))
            .collect()
    }

    pub fn infos(&self) -> &[UniqueValueInfo] {
        self.unique_value_infos.as_deref().unwrap_or_default()
    }

    fn validate(&self) -> SymbologyResult<()> {
        if self.field1.as_deref().unwrap_or("").is_empty() && self.fields().len() > 1 {
            return Err(SymbologyError::MalformedInput(
                "uniqueValue renderer has field2/field3 without field1".to_string(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UniqueValueInfo {
    pub value: UniqueValue,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    pub symbol: Symbol,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl UniqueValueInfo {
    pub fn new(value: impl Into<UniqueValue>, label: impl Into<String>, symbol: Symbol) -> Self {
        Self {
            value: value.into(),
            label: Some(label.into()),
            symbol,
            extra: Map::new(),
        }
    }

    pub fn label(&self) -> &str {
        self.label.as_deref().unwrap_or("")
    }
}

/// The `value` of a unique-value entry: the JSON as written plus the string
/// key it is matched by.
#[derive(Debug, Clone, PartialEq)]
pub struct UniqueValue {
    raw: Value,
    key: String,
}

impl UniqueValue {
    pub fn as_str(&self) -> &str {
        &self.key
    }

    pub fn raw(&self) -> &Value {
        &self.raw
    }
}

impl From<Value> for UniqueValue {
    fn from(raw: Value) -> Self {
        let key = attribute_to_string(&raw);
        Self { raw, key }
    }
}

impl From<String> for UniqueValue {
    fn from(key: String) -> Self {
        Self {
            raw: Value::String(key.clone()),
            key,
        }
    }
}

impl From<&str> for UniqueValue {
    fn from(key: &str) -> Self {
        Self::from(key.to_string())
    }
}

impl Serialize for UniqueValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.raw.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for UniqueValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(Self::from(Value::deserialize(deserializer)?))
    }
}

/// Symbol chosen by the numeric interval an attribute falls in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassBreaksRenderer {
    pub field: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_value: Option<Number>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_symbol: Option<Symbol>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub class_break_infos: Option<Vec<ClassBreakInfo>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ClassBreaksRenderer {
    /// Lower bound of the first class, 0 when unset.
    pub fn min_value(&self) -> f64 {
        number(&self.min_value).unwrap_or(0.0)
    }

    pub fn infos(&self) -> &[ClassBreakInfo] {
        self.class_break_infos.as_deref().unwrap_or_default()
    }

    fn validate(&self) -> SymbologyResult<()> {
        if self.field.is_empty() {
            return Err(SymbologyError::MalformedInput(
                "classBreaks renderer has no field".to_string(),
            ));
        }

        let mut previous = self.min_value() - 1.0;
        for info in self.infos() {
            let max = info.max_value();
            if !max.is_finite() || max < previous {
                return Err(SymbologyError::MalformedInput(format!(
                    "classBreaks upper bound {} out of order",
                    info.class_max_value
                )));
            }
            previous = max;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassBreakInfo {
    pub class_max_value: Number,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub class_min_value: Option<Number>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    pub symbol: Symbol,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ClassBreakInfo {
    /// Inclusive upper bound of the class.
    pub fn max_value(&self) -> f64 {
        self.class_max_value.as_f64().unwrap_or(f64::NAN)
    }

    pub fn label(&self) -> &str {
        self.label.as_deref().unwrap_or("")
    }
}

impl_wire_object!(SimpleRenderer, UniqueValueRenderer, ClassBreaksRenderer);

/// Stringify an attribute value the way keys are compared.
///
/// `null` becomes the empty string; whole floats drop their fraction so
/// `5.0` and `5` produce the same key.
pub fn attribute_to_string(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => {
            if n.is_i64() || n.is_u64() {
                return n.to_string();
            }
            match n.as_f64() {
                Some(f) if f.is_finite() && f.fract() == 0.0 && f.abs() < 1e21 => {
                    format!("{:.0}", f)
                }
                Some(f) => f.to_string(),
                None => n.to_string(),
            }
        }
        other => other.to_string(),
    }
}
