//! Helpers for re-emitting server JSON unchanged.
//!
//! Objects are parsed into typed structs for drawing and matching, but a
//! re-emitted symbol or renderer must carry everything it came in with:
//! unknown keys, explicit nulls, integer versus float numbers and unknown
//! enum names.

use serde::de::DeserializeOwned;
use serde::{Serialize, Serializer};
use serde_json::{Map, Number, Value};

/// A typed object that keeps the keys it does not model.
pub(crate) trait WireObject: DeserializeOwned {
    fn extra_mut(&mut self) -> &mut Map<String, Value>;
}

/// Parse a typed object from a JSON object whose `type` tag was already
/// read.
///
/// Keys set to `null` are parsed as absent and put back as `null` in the
/// object's extra keys, so they are emitted again.
pub(crate) fn from_object<T, E>(mut object: Map<String, Value>) -> Result<T, E>
where
    T: WireObject,
    E: serde::de::Error,
{
    object.remove("type");
    let nulls: Vec<String> = object
        .iter()
        .filter(|(_, v)| v.is_null())
        .map(|(k, _)| k.clone())
        .collect();
    object.retain(|_, v| !v.is_null());

    let mut parsed: T = serde_json::from_value(Value::Object(object)).map_err(E::custom)?;
    let extra = parsed.extra_mut();
    for key in nulls {
        extra.insert(key, Value::Null);
    }
    Ok(parsed)
}

/// Split a JSON value into its `type` tag and object body.
pub(crate) fn tagged_object<E>(value: Value) -> Result<(Option<String>, Map<String, Value>), E>
where
    E: serde::de::Error,
{
    match value {
        Value::Object(object) => {
            let tag = object.get("type").and_then(Value::as_str).map(str::to_string);
            Ok((tag, object))
        }
        other => Err(E::custom(format!("expected a JSON object, got {}", other))),
    }
}

/// Serialize `body` with a leading `type` tag.
pub(crate) fn serialize_tagged<S, T>(serializer: S, tag: &str, body: &T) -> Result<S::Ok, S::Error>
where
    S: Serializer,
    T: Serialize,
{
    #[derive(Serialize)]
    struct Tagged<'a, T> {
        #[serde(rename = "type")]
        tag: &'a str,
        #[serde(flatten)]
        body: &'a T,
    }

    Tagged { tag, body }.serialize(serializer)
}

/// `f64` view of an optional wire number.
pub fn number(value: &Option<Number>) -> Option<f64> {
    value.as_ref().and_then(Number::as_f64)
}

/// Wire number for `value`. Whole values are written as integers.
pub fn to_number(value: f64) -> Option<Number> {
    if value.fract() == 0.0 && value.abs() < 9.0e15 {
        Some(Number::from(value as i64))
    } else {
        Number::from_f64(value)
    }
}

/// A string enum whose unknown names are kept verbatim in `Unknown`.
macro_rules! wire_enum {
    (
        $(#[$meta:meta])*
        $name:ident {
            $($(#[$vmeta:meta])* $variant:ident => $wire:literal,)+
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash)]
        pub enum $name {
            $($(#[$vmeta])* $variant,)+
            /// A name outside the known set.
            Unknown(String),
        }

        impl $name {
            /// Name as written in server JSON.
            pub fn as_str(&self) -> &str {
                match self {
                    $($name::$variant => $wire,)+
                    $name::Unknown(name) => name,
                }
            }

            pub fn from_wire(name: &str) -> Self {
                match name {
                    $($wire => $name::$variant,)+
                    other => $name::Unknown(other.to_string()),
                }
            }
        }

        impl serde::Serialize for $name {
            fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.as_str())
            }
        }

        impl<'de> serde::Deserialize<'de> for $name {
            fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let name = <String as serde::Deserialize>::deserialize(deserializer)?;
                Ok($name::from_wire(&name))
            }
        }
    };
}

pub(crate) use wire_enum;

/// Implement [`WireObject`] for structs whose unmodelled keys live in
/// `extra`.
macro_rules! impl_wire_object {
    ($($ty:ty),+) => {
        $(impl $crate::wire::WireObject for $ty {
            fn extra_mut(&mut self) -> &mut serde_json::Map<String, serde_json::Value> {
                &mut self.extra
            }
        })+
    };
}

pub(crate) use impl_wire_object;
