//! Legend entries for layers that have no renderer of their own.

use quick_xml::escape::escape;
use symbology_common::Color;
use tracing::warn;

use crate::icon::{fmt_num, IconImage, ViewBox, CONTAINER_CENTER, CONTENT_PADDING, CONTENT_SIZE};
use crate::legend::LegendEntry;
use crate::picture::resolve_url;
use crate::rasterize::Rasterizer;

/// Background used when no color is given.
pub const DEFAULT_PLACEHOLDER_COLOR: Color = Color {
    r: 0x2e,
    g: 0x2e,
    b: 0x2e,
    a: 255,
};

const GLYPH_SIZE: f64 = 16.0;

/// First character of `name`, uppercased.
fn initial(name: &str) -> Option<String> {
    name.trim()
        .chars()
        .next()
        .map(|c| c.to_uppercase().collect())
}

/// The name's initial in white on a colored square.
///
/// `color` is a CSS hex or named color; unparseable values fall back to the
/// default.
pub fn generate_placeholder_symbology(name: &str, color: Option<&str>) -> LegendEntry {
    let background = match color {
        Some(value) => Color::from_hex(value).unwrap_or_else(|| {
            warn!(color = %value, "Invalid placeholder color, using default");
            DEFAULT_PLACEHOLDER_COLOR
        }),
        None => DEFAULT_PLACEHOLDER_COLOR,
    };

    let mut markup = format!(
        r#"<rect x="{p}" y="{p}" width="{s}" height="{s}" fill="{fill}" fill-opacity="{opacity}"/>"#,
        p = fmt_num(CONTENT_PADDING),
        s = fmt_num(CONTENT_SIZE),
        fill = background.to_hex(),
        opacity = fmt_num(background.opacity()),
    );

    if let Some(glyph) = initial(name) {
        markup.push_str(&format!(
            r##"<text x="{c}" y="{c}" fill="#ffffff" font-family="sans-serif" font-size="{size}" font-weight="bold" text-anchor="middle" dominant-baseline="central">{glyph}</text>"##,
            c = fmt_num(CONTAINER_CENTER),
            size = fmt_num(GLYPH_SIZE),
            glyph = escape(glyph.as_str()),
        ));
    }

    LegendEntry::new(name, IconImage::new(markup))
}

/// Wrap an externally rendered legend image (URL or `data:` URI).
///
/// The view box follows the image's natural size. A missing image or one that
/// fails to load gives an empty icon.
pub async fn generate_wms_symbology(
    rasterizer: &Rasterizer,
    name: &str,
    image: Option<&str>,
) -> LegendEntry {
    let Some(url) = image.filter(|u| !u.trim().is_empty()) else {
        return LegendEntry::new(name, IconImage::empty());
    };

    let icon = match resolve_url(url, rasterizer.loader()).await {
        Ok(resolved) if resolved.width > 0.0 && resolved.height > 0.0 => {
            IconImage::with_view_box(
                format!(
                    r#"<image x="0" y="0" width="{w}" height="{h}" xlink:href="{href}"/>"#,
                    w = fmt_num(resolved.width),
                    h = fmt_num(resolved.height),
                    href = resolved.href,
                ),
                ViewBox::new(0.0, 0.0, resolved.width, resolved.height),
            )
        }
        Ok(_) => {
            warn!(layer = %name, "WMS legend image has no size, using empty icon");
            IconImage::empty()
        }
        Err(e) => {
            warn!(layer = %name, error = %e, "WMS legend image failed, using empty icon");
            IconImage::empty()
        }
    };

    LegendEntry::new(name, icon)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial() {
        assert_eq!(initial("river").as_deref(), Some("R"));
        assert_eq!(initial("  ölfeld").as_deref(), Some("Ö"));
        assert_eq!(initial("   "), None);
    }

    #[test]
    fn test_default_color() {
        let entry = generate_placeholder_symbology("Lakes", None);
        assert!(entry.icon.markup().contains(r##"fill="#2e2e2e""##));
        assert!(entry.icon.markup().contains(">L</text>"));
    }

    #[test]
    fn test_invalid_color_falls_back() {
        let entry = generate_placeholder_symbology("Lakes", Some("not-a-color"));
        assert!(entry.icon.markup().contains(r##"fill="#2e2e2e""##));
    }

    #[test]
    fn test_markup_glyph_is_escaped() {
        let entry = generate_placeholder_symbology("<layer>", None);
        assert!(entry.icon.markup().contains(">&lt;</text>"), "{}", entry.icon.markup());
    }

    #[test]
    fn test_empty_name_has_no_glyph() {
        let entry = generate_placeholder_symbology("", Some("#ff0000"));
        assert!(!entry.icon.markup().contains("<text"));
    }

    #[tokio::test]
    async fn test_wms_without_image_is_empty() {
        let entry = generate_wms_symbology(&Rasterizer::offline(), "Radar", None).await;
        assert_eq!(entry.label, "Radar");
        assert!(entry.icon.is_empty());
    }

    #[tokio::test]
    async fn test_wms_fetch_failure_is_empty() {
        let entry =
            generate_wms_symbology(&Rasterizer::offline(), "Radar", Some("http://x/legend.png"))
                .await;
        assert!(entry.icon.is_empty());
    }
}
