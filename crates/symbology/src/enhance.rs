//! Attaching legend icons to renderer branches.
//!
//! Enhancement never touches the input [`Renderer`]: it clones the definition
//! into an [`EnhancedRenderer`] whose branches each carry an optional shared
//! icon looked up by label.

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;

use futures::future::{join_all, try_join_all, BoxFuture, FutureExt};
use serde::Deserialize;
use symbology_common::{
    ClassBreaksRenderer, Renderer, SimpleRenderer, SymbologyResult, UniqueValueRenderer,
};
use tracing::{debug, warn};

use crate::icon::IconImage;
use crate::legend::{LegendEntry, LegendResponse};

/// How the async enhancer treats a legend icon that failed to generate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JoinPolicy {
    /// A label whose icon failed on an unsupported type or an unreachable
    /// resource gets the empty icon; siblings are unaffected. Malformed input
    /// and internal errors still fail the enhancement.
    #[default]
    Degrade,
    /// Any failure fails the whole enhancement.
    Abort,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EnhancedSimple {
    pub renderer: SimpleRenderer,
    pub icon: Option<Arc<IconImage>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EnhancedUniqueValue {
    pub renderer: UniqueValueRenderer,
    pub default_icon: Option<Arc<IconImage>>,
    /// Parallel to `renderer.infos()`
    pub branch_icons: Vec<Option<Arc<IconImage>>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EnhancedClassBreaks {
    pub renderer: ClassBreaksRenderer,
    pub default_icon: Option<Arc<IconImage>>,
    /// Parallel to `renderer.infos()`
    pub branch_icons: Vec<Option<Arc<IconImage>>>,
}

/// A renderer whose branches carry icons.
#[derive(Debug, Clone, PartialEq)]
pub enum EnhancedRenderer {
    Simple(EnhancedSimple),
    UniqueValue(EnhancedUniqueValue),
    ClassBreaks(EnhancedClassBreaks),
    Unsupported,
}

impl EnhancedRenderer {
    pub fn type_name(&self) -> &'static str {
        match self {
            EnhancedRenderer::Simple(_) => "simple",
            EnhancedRenderer::UniqueValue(_) => "uniqueValue",
            EnhancedRenderer::ClassBreaks(_) => "classBreaks",
            EnhancedRenderer::Unsupported => "unsupported",
        }
    }
}

/// Label to icon lookup. Later entries overwrite earlier ones with the same
/// label.
fn icon_lookup(legend: &[LegendEntry]) -> HashMap<&str, Arc<IconImage>> {
    let mut lookup = HashMap::with_capacity(legend.len());
    for entry in legend {
        if lookup
            .insert(entry.label.as_str(), entry.icon.clone())
            .is_some()
        {
            debug!(label = %entry.label, "Duplicate legend label, keeping the later icon");
        }
    }
    lookup
}

/// Attach icons from `legend` to a copy of `renderer`.
pub fn enhance(renderer: &Renderer, legend: &[LegendEntry]) -> EnhancedRenderer {
    let lookup = icon_lookup(legend);
    let find = |label: &str| lookup.get(label).cloned();

    match renderer {
        Renderer::Simple(simple) => EnhancedRenderer::Simple(EnhancedSimple {
            renderer: simple.clone(),
            icon: find(simple.label()),
        }),
        Renderer::UniqueValue(uv) => EnhancedRenderer::UniqueValue(EnhancedUniqueValue {
            renderer: uv.clone(),
            default_icon: uv.default_label.as_deref().and_then(find),
            branch_icons: uv
                .infos()
                .iter()
                .map(|info| find(info.label()))
                .collect(),
        }),
        Renderer::ClassBreaks(cb) => EnhancedRenderer::ClassBreaks(EnhancedClassBreaks {
            renderer: cb.clone(),
            default_icon: cb.default_label.as_deref().and_then(find),
            branch_icons: cb
                .infos()
                .iter()
                .map(|info| find(info.label()))
                .collect(),
        }),
        Renderer::Unsupported(_) => {
            warn!("Enhancing unsupported renderer type, no icons attached");
            EnhancedRenderer::Unsupported
        }
    }
}

/// Enhance with the legend of layer index 0 of a legend response.
pub fn enhance_from_response(renderer: &Renderer, response: &LegendResponse) -> EnhancedRenderer {
    let legend = response
        .layers
        .first()
        .map(|layer| layer.legend.as_slice())
        .unwrap_or_default();
    enhance(renderer, legend)
}

/// A legend entry whose icon is still being generated.
pub struct PendingLegendEntry {
    pub label: String,
    icon: BoxFuture<'static, SymbologyResult<IconImage>>,
}

impl PendingLegendEntry {
    pub fn new<F>(label: impl Into<String>, icon: F) -> Self
    where
        F: Future<Output = SymbologyResult<IconImage>> + Send + 'static,
    {
        Self {
            label: label.into(),
            icon: icon.boxed(),
        }
    }

    /// An entry whose icon is already known.
    pub fn ready(label: impl Into<String>, icon: IconImage) -> Self {
        Self::new(label, futures::future::ready(Ok(icon)))
    }
}

impl std::fmt::Debug for PendingLegendEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PendingLegendEntry")
            .field("label", &self.label)
            .finish_non_exhaustive()
    }
}

/// Wait for every pending icon, then enhance.
///
/// Icons are awaited concurrently. Results are keyed by label, so
/// completion order does not affect the outcome.
pub async fn enhance_renderer(
    renderer: &Renderer,
    pending: Vec<PendingLegendEntry>,
    policy: JoinPolicy,
) -> SymbologyResult<EnhancedRenderer> {
    let (labels, futures): (Vec<String>, Vec<_>) = pending
        .into_iter()
        .map(|entry| (entry.label, entry.icon))
        .unzip();

    let icons: Vec<Arc<IconImage>> = match policy {
        JoinPolicy::Abort => try_join_all(futures)
            .await?
            .into_iter()
            .map(Arc::new)
            .collect(),
        JoinPolicy::Degrade => join_all(futures)
            .await
            .into_iter()
            .zip(&labels)
            .map(|(result, label)| match result {
                Ok(icon) => Ok(Arc::new(icon)),
                Err(e) if e.degrades_to_blank() => {
                    warn!(label = %label, error = %e, "Legend icon failed, using empty icon");
                    Ok(IconImage::shared_empty())
                }
                Err(e) => Err(e),
            })
            .collect::<SymbologyResult<_>>()?,
    };

    let legend: Vec<LegendEntry> = labels
        .into_iter()
        .zip(icons)
        .map(|(label, icon)| LegendEntry { label, icon })
        .collect();

    Ok(enhance(renderer, &legend))
}
