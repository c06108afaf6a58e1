//! Prelude module for common layerdeck types and traits
//!
//! This module re-exports the most commonly used types, traits, and functions
//! for easy importing with `use layerdeck::prelude::*;`

pub use crate::core::{
    config::{BasemapConfig, FeatureLayerConfig, ViewerOptions, ViewerProfile},
    geo::{LatLng, LatLngBounds, Point, TileCoord},
    map::{LayerRef, MapView},
    viewport::Viewport,
};

pub use crate::layers::{
    base::{LayerProperties, LayerTrait, LayerType},
    manager::{BasemapSet, FeatureLayerSet, LayerRegistry},
    style::{Color, Fill, LineCap, LineJoin, Stroke, StyleCatalog, StyleDescriptor},
    tile::{BasemapOption, TileSource, XyzSource},
    vector::{FeatureLayer, LayerData},
};

pub use crate::data::{
    geojson::{GeoJson, GeoJsonFeature, GeoJsonGeometry},
    loader::{FeatureFetcher, HttpFetcher, PendingLoad, StaticFetcher},
};

pub use crate::input::{
    events::{ControlEvent, MapEvent},
    handler::{EventManager, MapEventHandler},
};

pub use crate::ui::{
    controls::{ControlSurface, MemorySurface},
    readout::CoordinateReadout,
};

pub use crate::viewer::{AppState, InteractionController, Viewer};

pub use crate::{Error as MapError, Result};

pub use std::sync::Arc;

pub use fxhash::{FxHashMap as HashMap, FxHashSet as HashSet};
