//! Resolving a feature's icon and symbol from an enhanced renderer.
//!
//! Matching is synchronous and never fails: anything that does not resolve
//! falls back to the default branch, and an icon that was never attached is
//! replaced by the shared empty icon.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use serde_json::{Map, Value};
use symbology_common::{
    attribute_to_string, ClassBreaksRenderer, Symbol, UniqueValueRenderer, FIELD_DELIMITER,
};
use tracing::warn;

use crate::enhance::{EnhancedClassBreaks, EnhancedRenderer, EnhancedUniqueValue};
use crate::icon::IconImage;

/// Read access to a feature's attribute values by field name.
pub trait AttributeSource {
    fn attribute(&self, field: &str) -> Option<&Value>;
}

impl AttributeSource for Map<String, Value> {
    fn attribute(&self, field: &str) -> Option<&Value> {
        self.get(field)
    }
}

impl<S: std::hash::BuildHasher> AttributeSource for HashMap<String, Value, S> {
    fn attribute(&self, field: &str) -> Option<&Value> {
        self.get(field)
    }
}

impl AttributeSource for BTreeMap<String, Value> {
    fn attribute(&self, field: &str) -> Option<&Value> {
        self.get(field)
    }
}

/// A JSON object; any other value has no attributes.
impl AttributeSource for Value {
    fn attribute(&self, field: &str) -> Option<&Value> {
        self.as_object().and_then(|o| o.get(field))
    }
}

/// Result of matching one feature.
#[derive(Debug, Clone)]
pub struct Match<'a> {
    pub icon: Arc<IconImage>,
    pub symbol: Option<&'a Symbol>,
}

impl<'a> Match<'a> {
    fn new(icon: Option<&Arc<IconImage>>, symbol: Option<&'a Symbol>) -> Self {
        Self {
            icon: icon.cloned().unwrap_or_else(IconImage::shared_empty),
            symbol,
        }
    }
}

/// Composite lookup key over the renderer's configured fields, joined with
/// `", "`. Missing and null values contribute an empty string.
pub fn composite_key<A: AttributeSource + ?Sized>(
    attributes: &A,
    renderer: &UniqueValueRenderer,
) -> String {
    renderer
        .fields()
        .into_iter()
        .map(|field| {
            attributes
                .attribute(field)
                .map(attribute_to_string)
                .unwrap_or_default()
        })
        .collect::<Vec<_>>()
        .join(FIELD_DELIMITER)
}

/// Numeric value of a class-breaks field. Strings are parsed.
fn numeric_value<A: AttributeSource + ?Sized>(attributes: &A, field: &str) -> Option<f64> {
    let value = match attributes.attribute(field)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    value.filter(|v| !v.is_nan())
}

/// Index of the class whose interval `(previous upper, upper]` holds `value`.
/// The first lower bound is `minValue - 1`; values under `minValue` never
/// match.
pub fn class_index(renderer: &ClassBreaksRenderer, value: f64) -> Option<usize> {
    let min_value = renderer.min_value();
    if value < min_value {
        return None;
    }

    let mut lower = min_value - 1.0;
    for (idx, info) in renderer.infos().iter().enumerate() {
        let upper = info.max_value();
        if value > lower && value <= upper {
            return Some(idx);
        }
        lower = upper;
    }
    None
}

fn match_unique_value<'a, A: AttributeSource + ?Sized>(
    attributes: &A,
    enhanced: &'a EnhancedUniqueValue,
) -> Match<'a> {
    let key = composite_key(attributes, &enhanced.renderer);
    let branch = enhanced
        .renderer
        .infos()
        .iter()
        .position(|info| info.value.as_str() == key);

    match branch {
        Some(idx) => Match::new(
            enhanced.branch_icons.get(idx).and_then(Option::as_ref),
            Some(&enhanced.renderer.infos()[idx].symbol),
        ),
        None => Match::new(
            enhanced.default_icon.as_ref(),
            enhanced.renderer.default_symbol.as_ref(),
        ),
    }
}

fn match_class_breaks<'a, A: AttributeSource + ?Sized>(
    attributes: &A,
    enhanced: &'a EnhancedClassBreaks,
) -> Match<'a> {
    let renderer = &enhanced.renderer;
    let branch = numeric_value(attributes, &renderer.field).and_then(|v| class_index(renderer, v));

    match branch {
        Some(idx) => Match::new(
            enhanced.branch_icons.get(idx).and_then(Option::as_ref),
            Some(&renderer.infos()[idx].symbol),
        ),
        None => Match::new(
            enhanced.default_icon.as_ref(),
            renderer.default_symbol.as_ref(),
        ),
    }
}

/// Select the branch that applies to a feature.
pub fn match_feature<'a, A: AttributeSource + ?Sized>(
    attributes: &A,
    enhanced: &'a EnhancedRenderer,
) -> Match<'a> {
    match enhanced {
        EnhancedRenderer::Simple(simple) => {
            Match::new(simple.icon.as_ref(), Some(&simple.renderer.symbol))
        }
        EnhancedRenderer::UniqueValue(uv) => match_unique_value(attributes, uv),
        EnhancedRenderer::ClassBreaks(cb) => match_class_breaks(attributes, cb),
        EnhancedRenderer::Unsupported => {
            warn!("Matching against unsupported renderer type");
            Match::new(None, None)
        }
    }
}

/// Icon for a feature. Never empty-handed: unmatched features get the empty
/// icon.
pub fn graphic_icon<A: AttributeSource + ?Sized>(
    attributes: &A,
    enhanced: &EnhancedRenderer,
) -> Arc<IconImage> {
    match_feature(attributes, enhanced).icon
}

/// Symbol for a feature, `None` when neither a branch nor a default applies.
pub fn graphic_symbol<'a, A: AttributeSource + ?Sized>(
    attributes: &A,
    enhanced: &'a EnhancedRenderer,
) -> Option<&'a Symbol> {
    match_feature(attributes, enhanced).symbol
}
