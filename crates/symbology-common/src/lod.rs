//! Levels of detail and scale-to-zoom-level resolution.

use serde::{Deserialize, Serialize};

/// A single zoom step.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Lod {
    /// Zoom level identifier, when the service reports one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<u32>,

    /// Map units per pixel
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resolution: Option<f64>,

    /// Scale denominator
    pub scale: f64,
}

impl Lod {
    pub fn new(scale: f64) -> Self {
        Self {
            level: None,
            resolution: None,
            scale,
        }
    }
}

/// Standard Web Mercator levels 0..=22, most zoomed out first.
pub fn web_mercator_lods() -> Vec<Lod> {
    (0..=22u32)
        .map(|z| {
            let n = 2u32.pow(z) as f64;
            let scale = 559082264.0287178 / n;
            Lod {
                level: Some(z),
                // Standard pixel size is 0.28mm
                resolution: Some(scale * 0.00028),
                scale,
            }
        })
        .collect()
}

/// Find the level whose scale is as close to `target_scale` as possible while
/// still being at or above it.
///
/// `lods` is ordered most zoomed out first, so scales decrease with the
/// index. A `target_scale` of `0` means "no limit" and resolves to the last
/// (most zoomed in) level. When no level reaches the target the first level is
/// returned. An empty list resolves to `0`.
pub fn resolve_zoom_level(lods: &[Lod], target_scale: f64) -> usize {
    search(lods, target_scale).0
}

/// Binary search returning `(index, iterations)`.
fn search(lods: &[Lod], target_scale: f64) -> (usize, u32) {
    let len = lods.len();
    if len == 0 {
        return (0, 0);
    }
    if target_scale == 0.0 {
        return (len - 1, 0);
    }

    match len {
        1 => return (0, 0),
        2 => {
            let idx = if lods[1].scale >= target_scale { 1 } else { 0 };
            return (idx, 1);
        }
        _ => {}
    }

    let mut low = 0;
    let mut high = len - 1;
    // low < mid < high must hold or the loop never closes the gap
    let mut mid = len.div_ceil(2).min(high - 1);
    let mut iterations = 0;

    while high != low + 1 {
        iterations += 1;
        if lods[mid].scale >= target_scale {
            low = mid;
        } else {
            high = mid;
        }
        mid = (low + high) / 2;
    }

    // The loop never visits the untouched upper end.
    if high == len - 1 && lods[high].scale >= target_scale {
        return (high, iterations);
    }

    (mid, iterations)
}
