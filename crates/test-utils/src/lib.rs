//! Shared test utilities for the map-symbology workspace.
//!
//! This crate provides common testing infrastructure including:
//! - Renderer and server legend JSON fixtures
//! - Generated image bytes (PNG, SVG) and their base64/data URI forms
//! - Level-of-detail scale lists
//!
//! # Usage
//!
//! Add to your crate's `Cargo.toml`:
//!
//! ```toml
//! [dev-dependencies]
//! test-utils = { path = "../test-utils" }
//! ```
//!
//! Then import in your tests:
//!
//! ```ignore
//! use test_utils::{fixtures, png_bytes};
//! ```

pub mod fixtures;
pub mod generators;

// Re-export commonly used items at the crate root
pub use fixtures::*;
pub use generators::*;

/// Macro for approximate floating-point equality assertions.
///
/// # Usage
///
/// ```ignore
/// use test_utils::assert_approx_eq;
///
/// assert_approx_eq!(1.0001_f64, 1.0_f64, 0.001_f64); // passes
/// assert_approx_eq!(1.1_f32, 1.0_f32, 0.001_f32);    // fails
/// ```
#[macro_export]
macro_rules! assert_approx_eq {
    ($left:expr, $right:expr, $epsilon:expr) => {{
        let left: f64 = $left as f64;
        let right: f64 = $right as f64;
        let epsilon: f64 = $epsilon as f64;
        let diff = (left - right).abs();
        if diff > epsilon {
            panic!(
                "assertion failed: `(left ≈ right)`\n  left: `{:?}`,\n right: `{:?}`,\n  diff: `{:?}` > epsilon `{:?}`",
                left, right, diff, epsilon
            );
        }
    }};
}

/// Assert that generated markup contains every given fragment.
///
/// # Usage
///
/// ```ignore
/// use test_utils::assert_markup_contains;
///
/// assert_markup_contains!(icon.markup(), "translate(16 16)", "scale(1)");
/// ```
#[macro_export]
macro_rules! assert_markup_contains {
    ($markup:expr, $($fragment:expr),+ $(,)?) => {{
        let markup: &str = $markup;
        $(
            if !markup.contains($fragment) {
                panic!(
                    "assertion failed: markup does not contain `{}`\n markup: `{}`",
                    $fragment, markup
                );
            }
        )+
    }};
}

#[cfg(test)]
mod tests {
    #[test]
    fn test_assert_approx_eq_passes() {
        assert_approx_eq!(1.0001, 1.0, 0.001);
        assert_approx_eq!(0.0, 0.0, 0.0001);
        assert_approx_eq!(-5.5, -5.500001, 0.0001);
    }

    #[test]
    #[should_panic(expected = "assertion failed")]
    fn test_assert_approx_eq_fails() {
        assert_approx_eq!(1.1, 1.0, 0.001);
    }

    #[test]
    fn test_assert_markup_contains_passes() {
        assert_markup_contains!("<rect x=\"4\"/>", "rect", "x=\"4\"");
    }

    #[test]
    #[should_panic(expected = "does not contain")]
    fn test_assert_markup_contains_fails() {
        assert_markup_contains!("<rect/>", "circle");
    }
}
