//! Off-screen measurement surface.
//!
//! Markers are measured before they are scaled into the content area. A
//! surface is acquired per rasterization, used to lay out a scratch SVG
//! document, and released when it goes out of scope on every path.

use std::fmt::Write as _;

use tracing::trace;

use crate::icon::CONTAINER_SIZE;

/// Axis-aligned bounds of measured markup.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Bounds {
    pub fn center(&self) -> (f64, f64) {
        (self.x + self.width / 2.0, self.y + self.height / 2.0)
    }
}

/// Scratch document used for bounding-box measurement.
pub struct MeasureSurface {
    options: usvg::Options<'static>,
    document: String,
}

impl MeasureSurface {
    pub fn acquire() -> Self {
        trace!("Acquired measurement surface");
        Self {
            options: usvg::Options::default(),
            document: String::with_capacity(512),
        }
    }

    /// Bounds of `fragment` in document coordinates, transforms applied.
    ///
    /// Returns `None` when the fragment cannot be parsed or draws nothing.
    pub fn measure(&mut self, fragment: &str) -> Option<Bounds> {
        self.document.clear();
        let _ = write!(
            self.document,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{size}" height="{size}">{fragment}</svg>"#,
            size = CONTAINER_SIZE,
        );

        let tree = match usvg::Tree::from_str(&self.document, &self.options) {
            Ok(tree) => tree,
            Err(e) => {
                trace!(error = %e, "Measurement parse failed");
                return None;
            }
        };

        let bbox = tree.root().abs_bounding_box();
        let bounds = Bounds {
            x: bbox.x() as f64,
            y: bbox.y() as f64,
            width: bbox.width() as f64,
            height: bbox.height() as f64,
        };

        if bounds.width <= 0.0 && bounds.height <= 0.0 {
            return None;
        }
        Some(bounds)
    }
}

impl Drop for MeasureSurface {
    fn drop(&mut self) {
        self.document.clear();
        trace!("Released measurement surface");
    }
}
