use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LayerType {
    /// Raster basemap built from image tiles
    Tile,
    /// Features decoded from a feature collection
    Vector,
}

impl fmt::Display for LayerType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LayerType::Tile => write!(f, "tile"),
            LayerType::Vector => write!(f, "vector"),
        }
    }
}

/// Properties every layer shares, whichever kind it is
#[derive(Debug, Clone)]
pub struct LayerProperties {
    pub id: String,
    pub name: String,
    pub layer_type: LayerType,
    /// Id of the page control (radio or checkbox) bound to this layer
    pub control_id: String,
}

impl LayerProperties {
    pub fn new(id: String, name: String, layer_type: LayerType, control_id: String) -> Self {
        Self {
            id,
            name,
            layer_type,
            control_id,
        }
    }
}

/// Common surface of basemaps and feature layers, used when walking the stack
pub trait LayerTrait {
    fn id(&self) -> &str;

    fn name(&self) -> &str;

    fn layer_type(&self) -> LayerType;

    fn control_id(&self) -> &str;

    /// Layer-specific settings as JSON, for diagnostics and host pages
    fn options(&self) -> serde_json::Value;
}
