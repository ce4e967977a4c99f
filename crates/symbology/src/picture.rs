//! Picture marker and picture fill drawing.
//!
//! Image references resolve to a self-contained `data:` URI plus intrinsic
//! size. Inline `imageData` wins over `url`; remote URLs go through the
//! [`ImageLoader`].

use base64::{engine::general_purpose::STANDARD, Engine as _};
use image::GenericImageView;
use symbology_common::{
    ImageReference, PictureFillSymbol, PictureMarkerSymbol, SymbologyError, SymbologyResult,
};
use tracing::debug;

use crate::fetch::ImageLoader;
use crate::fill::{content_rect, next_pattern_id};
use crate::icon::{fmt_num, IconImage, CONTAINER_CENTER, PICTURE_CONTENT_SIZE};
use crate::marker::fit_scale;
use crate::style::{pattern_fill, Stroke};

const DEFAULT_CONTENT_TYPE: &str = "image/png";

/// An image ready to be embedded.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedImage {
    /// `data:` URI
    pub href: String,
    pub width: f64,
    pub height: f64,
}

/// Resolve a symbol's image reference to embeddable data.
pub async fn resolve_image(
    reference: &ImageReference,
    loader: &dyn ImageLoader,
) -> SymbologyResult<ResolvedImage> {
    if let Some(data) = reference.image_data.as_deref().filter(|d| !d.is_empty()) {
        let content_type = reference
            .content_type
            .as_deref()
            .unwrap_or(DEFAULT_CONTENT_TYPE);
        let bytes = STANDARD
            .decode(data.trim())
            .map_err(|e| SymbologyError::ImageDecode(format!("invalid base64: {}", e)))?;
        return embed(&bytes, content_type);
    }

    match reference.url.as_deref().filter(|u| !u.is_empty()) {
        Some(url) => resolve_url(url, loader).await,
        None => Err(SymbologyError::MalformedInput(
            "picture symbol has neither imageData nor url".to_string(),
        )),
    }
}

/// Resolve a `data:` URI or fetch a remote URL.
pub async fn resolve_url(url: &str, loader: &dyn ImageLoader) -> SymbologyResult<ResolvedImage> {
    if let Some(rest) = url.strip_prefix("data:") {
        let (header, payload) = rest
            .split_once(',')
            .ok_or_else(|| SymbologyError::ImageDecode("data URI without payload".to_string()))?;
        let content_type = header.split(';').next().filter(|t| !t.is_empty());
        if !header.ends_with(";base64") {
            return Err(SymbologyError::ImageDecode(
                "only base64 data URIs are supported".to_string(),
            ));
        }
        let bytes = STANDARD
            .decode(payload.trim())
            .map_err(|e| SymbologyError::ImageDecode(format!("invalid base64: {}", e)))?;
        return embed(&bytes, content_type.unwrap_or(DEFAULT_CONTENT_TYPE));
    }

    debug!(url = %url, "Fetching picture symbol image");
    let loaded = loader.load(url).await?;
    let content_type = loaded
        .content_type
        .as_deref()
        .and_then(|t| t.split(';').next())
        .map(str::trim)
        .filter(|t| t.starts_with("image/"))
        .map(str::to_string)
        .or_else(|| sniff_content_type(&loaded.bytes).map(str::to_string))
        .unwrap_or_else(|| DEFAULT_CONTENT_TYPE.to_string());
    embed(&loaded.bytes, &content_type)
}

/// Decode `bytes` for their size and wrap them in a `data:` URI.
fn embed(bytes: &[u8], content_type: &str) -> SymbologyResult<ResolvedImage> {
    let (width, height) = decode_dimensions(bytes, content_type)?;
    Ok(ResolvedImage {
        href: format!("data:{};base64,{}", content_type, STANDARD.encode(bytes)),
        width,
        height,
    })
}

fn decode_dimensions(bytes: &[u8], content_type: &str) -> SymbologyResult<(f64, f64)> {
    if content_type.contains("svg") {
        let tree = usvg::Tree::from_data(bytes, &usvg::Options::default())
            .map_err(|e| SymbologyError::ImageDecode(format!("invalid SVG image: {}", e)))?;
        let size = tree.size();
        return Ok((size.width() as f64, size.height() as f64));
    }

    let decoded = image::load_from_memory(bytes)
        .map_err(|e| SymbologyError::ImageDecode(e.to_string()))?;
    let (w, h) = decoded.dimensions();
    Ok((w as f64, h as f64))
}

fn sniff_content_type(bytes: &[u8]) -> Option<&'static str> {
    let mime = match image::guess_format(bytes).ok()? {
        image::ImageFormat::Png => "image/png",
        image::ImageFormat::Jpeg => "image/jpeg",
        image::ImageFormat::Gif => "image/gif",
        image::ImageFormat::WebP => "image/webp",
        image::ImageFormat::Bmp => "image/bmp",
        image::ImageFormat::Ico => "image/x-icon",
        image::ImageFormat::Tiff => "image/tiff",
        _ => return None,
    };
    Some(mime)
}

fn image_element(image: &ResolvedImage, width: f64, height: f64, x: f64, y: f64) -> String {
    format!(
        r#"<image x="{}" y="{}" width="{}" height="{}" preserveAspectRatio="none" xlink:href="{}"/>"#,
        fmt_num(x),
        fmt_num(y),
        fmt_num(width),
        fmt_num(height),
        image.href
    )
}

/// Size of a `width` x `height` box after rotating it by `angle` degrees.
fn rotated_extent(width: f64, height: f64, angle: f64) -> (f64, f64) {
    let (sin, cos) = angle.to_radians().sin_cos();
    (
        width * cos.abs() + height * sin.abs(),
        width * sin.abs() + height * cos.abs(),
    )
}

/// Draw an `esriPMS` symbol: the picture, rotated, fit into 28x28.
pub async fn draw_picture_marker(
    symbol: &PictureMarkerSymbol,
    loader: &dyn ImageLoader,
) -> SymbologyResult<IconImage> {
    let image = resolve_image(&symbol.image, loader).await?;
    let width = symbol.width().filter(|w| *w > 0.0).unwrap_or(image.width);
    let height = symbol.height().filter(|h| *h > 0.0).unwrap_or(image.height);
    let angle = symbol.angle();

    let (extent_w, extent_h) = rotated_extent(width, height, angle);
    let scale = fit_scale(extent_w, extent_h, PICTURE_CONTENT_SIZE);

    let markup = format!(
        r#"<g transform="translate({c} {c}) scale({s}) rotate({a})">{img}</g>"#,
        c = fmt_num(CONTAINER_CENTER),
        s = fmt_num(scale),
        a = fmt_num(angle),
        img = image_element(&image, width, height, -width / 2.0, -height / 2.0),
    );
    Ok(IconImage::new(markup))
}

/// Draw an `esriPFS` symbol: the picture tiled over the content rectangle.
pub async fn draw_picture_fill(
    symbol: &PictureFillSymbol,
    loader: &dyn ImageLoader,
) -> SymbologyResult<IconImage> {
    let image = resolve_image(&symbol.image, loader).await?;
    let width = symbol.width().filter(|w| *w > 0.0).unwrap_or(image.width) * symbol.xscale();
    let height = symbol.height().filter(|h| *h > 0.0).unwrap_or(image.height) * symbol.yscale();

    if width <= 0.0 || height <= 0.0 {
        return Err(SymbologyError::ImageDecode(format!(
            "picture fill tile has no area ({}x{})",
            width, height
        )));
    }

    let id = next_pattern_id();
    let stroke = Stroke::from_outline(symbol.outline.as_ref()).attributes();
    let markup = format!(
        r#"<defs><pattern id="{id}" patternUnits="userSpaceOnUse" width="{w}" height="{h}">{img}</pattern></defs>{rect}"#,
        id = id,
        w = fmt_num(width),
        h = fmt_num(height),
        img = image_element(&image, width, height, 0.0, 0.0),
        rect = content_rect(&format!("{}{}", pattern_fill(&id), stroke)),
    );
    Ok(IconImage::new(markup))
}
