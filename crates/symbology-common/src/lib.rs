//! Common types shared across the symbology workspace.
//!
//! Holds the server JSON data model (renderers, symbols, colors, legend
//! payloads), the error type, and level-of-detail utilities. Nothing here does
//! I/O or drawing.

pub mod color;
pub mod error;
pub mod legend;
pub mod lod;
pub mod renderer;
pub mod symbol;
mod wire;

pub use color::Color;
pub use error::{ErrorCategory, SymbologyError, SymbologyResult};
pub use legend::{ServerLayerLegend, ServerLegendItem, ServerLegendResponse, ServiceErrorBody};
pub use lod::{resolve_zoom_level, web_mercator_lods, Lod};
pub use renderer::{
    attribute_to_string, ClassBreakInfo, ClassBreaksRenderer, Renderer, SimpleRenderer,
    UniqueValue, UniqueValueInfo, UniqueValueRenderer, FIELD_DELIMITER,
};
pub use symbol::{
    FillStyle, FillSymbol, ImageReference, LineCap, LineJoin, LineStyle, LineSymbol,
    MarkerStyle, MarkerSymbol, Outline, PictureFillSymbol, PictureMarkerSymbol, Symbol,
    TextSymbol,
};
pub use wire::{number, to_number};
