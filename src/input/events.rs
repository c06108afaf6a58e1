use crate::core::geo::{LatLng, Point};
use serde::{Deserialize, Serialize};

/// Events the page feeds into the viewer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ControlEvent {
    /// A basemap radio became checked
    BasemapChange { basemap_id: String },
    /// A feature-layer checkbox changed
    LayerToggle { layer_id: String, checked: bool },
    /// Pointer moved over the map; `coordinate` is projected (EPSG:3857, metres)
    PointerMove { coordinate: Point },
}

impl ControlEvent {
    /// Checks if this is a pointer event
    pub fn is_pointer_event(&self) -> bool {
        matches!(self, ControlEvent::PointerMove { .. })
    }
}

/// Map event types that can be emitted by the map
#[derive(Debug, Clone, PartialEq)]
pub enum MapEvent {
    /// Base layer was changed
    BaseLayerChange { layer_id: String },
    /// Overlay layer was added
    OverlayAdd { layer_id: String },
    /// Overlay layer was removed
    OverlayRemove { layer_id: String },
    /// Overlay data arrived (possibly empty after a failed fetch)
    OverlayLoad { layer_id: String, feature_count: usize },
    /// Pointer moved over the map
    PointerMove { lat_lng: LatLng, coordinate: Point },
}

impl MapEvent {
    /// Name listeners subscribe with
    pub fn event_type(&self) -> &'static str {
        match self {
            MapEvent::BaseLayerChange { .. } => "baselayerchange",
            MapEvent::OverlayAdd { .. } => "overlayadd",
            MapEvent::OverlayRemove { .. } => "overlayremove",
            MapEvent::OverlayLoad { .. } => "overlayload",
            MapEvent::PointerMove { .. } => "pointermove",
        }
    }
}
