//! Map symbology: icons for renderer symbols, legends, and feature matching.
//!
//! - [`rasterize`]: symbol descriptions to 32x32 vector icons
//! - [`enhance`]: attaching legend icons to renderer branches
//! - [`matcher`]: icon/symbol lookup for feature attributes
//! - [`legend`]: legends from renderers and from server legend payloads
//! - [`placeholder`]: initials and WMS image symbology

pub mod enhance;
pub mod fetch;
pub mod fill;
pub mod icon;
pub mod legend;
pub mod marker;
pub mod matcher;
pub mod picture;
pub mod placeholder;
pub mod rasterize;
pub mod service;
pub mod style;
pub mod surface;

pub use enhance::{
    enhance, enhance_from_response, enhance_renderer, EnhancedRenderer, JoinPolicy,
    PendingLegendEntry,
};
pub use fetch::{HttpClient, HttpConfig, ImageLoader, LegendSource, LoadedImage, OfflineLoader};
pub use icon::{IconImage, ViewBox};
pub use legend::{
    map_server_to_local_legend, renderer_to_legend, server_legend_to_fake_renderer, LayerLegend,
    LegendEntry, LegendResponse,
};
pub use matcher::{graphic_icon, graphic_symbol, match_feature, AttributeSource, Match};
pub use placeholder::{generate_placeholder_symbology, generate_wms_symbology};
pub use rasterize::Rasterizer;
pub use service::SymbologyService;
pub use symbology_common::{
    resolve_zoom_level, Lod, Renderer, Symbol, SymbologyError, SymbologyResult,
};
