//! # layerdeck
//!
//! Layer stack, style catalog and control wiring for a small interactive map
//! viewer.
//!
//! The crate owns the parts of a web map page that are not rendering: which
//! basemap sits at the bottom of the stack, which feature layers are attached,
//! how each feature layer is styled, and what the coordinate readout says when
//! the pointer moves. Everything is driven through a typed handler interface so
//! it can run headless in tests or be bound to a real DOM with the `wasm`
//! feature.

pub mod core;
pub mod data;
pub mod input;
pub mod layers;
pub mod prelude;
pub mod ui;
pub mod viewer;

#[cfg(feature = "wasm")]
pub mod web;

pub use crate::core::constants;

// Re-export public API
pub use core::{
    config::{ViewerOptions, ViewerProfile},
    geo::{LatLng, LatLngBounds, Point, TileCoord},
    map::MapView,
    viewport::Viewport,
};

pub use layers::{
    base::LayerTrait,
    manager::LayerRegistry,
    style::{StyleCatalog, StyleDescriptor},
    tile::BasemapOption,
    vector::FeatureLayer,
};

pub use input::{
    events::{ControlEvent, MapEvent},
    handler::{EventManager, MapEventHandler},
};

pub use ui::controls::{ControlSurface, MemorySurface};

pub use viewer::{AppState, InteractionController, Viewer};

pub use data::loader::{FeatureFetcher, HttpFetcher, StaticFetcher};

/// Result type used throughout the library
pub type Result<T> = std::result::Result<T, MapError>;

/// Common error types
#[derive(Debug, thiserror::Error)]
pub enum MapError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Missing required element: #{0}")]
    MissingElement(String),

    #[error("Unknown basemap: {0}")]
    UnknownBasemap(String),

    #[error("Unknown feature layer: {0}")]
    UnknownLayer(String),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Invalid coordinates: {0}")]
    InvalidCoordinates(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Resource unavailable: {0}")]
    Unavailable(String),
}

/// Error type alias for convenience
pub type Error = MapError;
