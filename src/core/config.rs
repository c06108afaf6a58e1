//! Viewer configuration
//!
//! The viewer went through several revisions that differ only in data: which
//! basemaps and feature layers exist, the ids of their controls, and how many
//! decimals the coordinate readout shows. Each revision is a profile here.

use crate::constants::{
    BASEMAP_GROUP, CLASSIC_COORDINATE_PRECISION, COORDINATE_PRECISION, INITIAL_CENTER,
    INITIAL_ZOOM, MAP_ELEMENT_ID, MAX_COORDINATE_PRECISION, MAX_ZOOM, READOUT_ELEMENT_ID,
};
use crate::core::geo::LatLng;
use crate::layers::style::StyleCatalog;
use crate::prelude::HashSet;
use crate::{MapError, Result};
use serde::{Deserialize, Serialize};

const OSM_TILES: &str = "https://tile.openstreetmap.org/{z}/{x}/{y}.png";
const ESRI_IMAGERY_TILES: &str =
    "https://server.arcgisonline.com/ArcGIS/rest/services/World_Imagery/MapServer/tile/{z}/{y}/{x}";
const CARTO_DARK_TILES: &str = "https://{s}.basemaps.cartocdn.com/dark_all/{z}/{x}/{y}.png";

const OSM_ATTRIBUTION: &str = "© OpenStreetMap contributors";
const ESRI_ATTRIBUTION: &str = "Tiles © Esri";
const CARTO_ATTRIBUTION: &str = "© OpenStreetMap contributors © CARTO";

#[derive(Debug, Clone, PartialEq, Default)]
pub enum ViewerProfile {
    /// First revision: street/satellite, points of interest and roads, 4 decimals
    Classic,
    /// Street/satellite/dark, points, trails and polygons, 5 decimals
    #[default]
    Full,
    Custom(ViewerOptions),
}

impl ViewerProfile {
    pub fn resolve(&self) -> ViewerOptions {
        match self {
            Self::Classic => ViewerOptions {
                coordinate_precision: CLASSIC_COORDINATE_PRECISION,
                default_basemap: "osm".to_string(),
                basemaps: vec![
                    BasemapConfig::new("osm", "OpenStreetMap", "osm", OSM_TILES)
                        .with_attribution(OSM_ATTRIBUTION),
                    BasemapConfig::new("sat", "Satellite", "sat", ESRI_IMAGERY_TILES)
                        .with_attribution(ESRI_ATTRIBUTION),
                ],
                feature_layers: vec![
                    FeatureLayerConfig::new(
                        "poi",
                        "Points of interest",
                        "layer1",
                        "points_of_interest.geojson",
                        "poi",
                    ),
                    FeatureLayerConfig::new("roads", "Roads", "layer2", "roads.geojson", "roads"),
                ],
                ..ViewerOptions::base()
            },
            Self::Full => ViewerOptions {
                coordinate_precision: COORDINATE_PRECISION,
                default_basemap: "street".to_string(),
                basemaps: vec![
                    BasemapConfig::new("street", "Street", "streetMode", OSM_TILES)
                        .with_attribution(OSM_ATTRIBUTION),
                    BasemapConfig::new("satellite", "Satellite", "satelliteMode", ESRI_IMAGERY_TILES)
                        .with_attribution(ESRI_ATTRIBUTION),
                    BasemapConfig::new("dark", "Dark", "darkMode", CARTO_DARK_TILES)
                        .with_subdomains(&["a", "b", "c"])
                        .with_attribution(CARTO_ATTRIBUTION),
                ],
                feature_layers: vec![
                    FeatureLayerConfig::new(
                        "points",
                        "Points of interest",
                        "pointsCheck",
                        "points_of_interest.geojson",
                        "points",
                    ),
                    FeatureLayerConfig::new("trails", "Trails", "trailCheck", "trails.geojson", "trails"),
                    FeatureLayerConfig::new(
                        "polygons",
                        "Areas",
                        "polygonCheck",
                        "polygons.geojson",
                        "polygons",
                    ),
                ],
                ..ViewerOptions::base()
            },
            Self::Custom(options) => options.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BasemapConfig {
    pub id: String,
    pub name: String,
    /// Id of the radio input selecting this basemap
    pub control_id: String,
    pub url_template: String,
    #[serde(default)]
    pub subdomains: Vec<String>,
    #[serde(default)]
    pub attribution: Option<String>,
}

impl BasemapConfig {
    pub fn new(id: &str, name: &str, control_id: &str, url_template: &str) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            control_id: control_id.to_string(),
            url_template: url_template.to_string(),
            subdomains: Vec::new(),
            attribution: None,
        }
    }

    pub fn with_subdomains(mut self, subdomains: &[&str]) -> Self {
        self.subdomains = subdomains.iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn with_attribution(mut self, attribution: &str) -> Self {
        self.attribution = Some(attribution.to_string());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureLayerConfig {
    pub id: String,
    pub name: String,
    /// Id of the checkbox toggling this layer
    pub control_id: String,
    /// Feature collection URL, relative URLs resolve against `data_base_url`
    pub url: String,
    /// Key into the style catalog
    pub style: String,
}

impl FeatureLayerConfig {
    pub fn new(id: &str, name: &str, control_id: &str, url: &str, style: &str) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            control_id: control_id.to_string(),
            url: url.to_string(),
            style: style.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerOptions {
    pub center: LatLng,
    pub zoom: f64,
    pub coordinate_precision: usize,
    pub map_element: String,
    pub readout_element: String,
    /// Name of the radio group holding the basemap controls
    pub basemap_group: String,
    /// Used when no basemap radio is checked at startup
    pub default_basemap: String,
    pub basemaps: Vec<BasemapConfig>,
    pub feature_layers: Vec<FeatureLayerConfig>,
    pub data_base_url: Option<String>,
}

impl ViewerOptions {
    /// Page-level settings shared by every profile, with no layers
    fn base() -> Self {
        Self {
            center: LatLng::from_lon_lat(INITIAL_CENTER.0, INITIAL_CENTER.1),
            zoom: INITIAL_ZOOM,
            coordinate_precision: COORDINATE_PRECISION,
            map_element: MAP_ELEMENT_ID.to_string(),
            readout_element: READOUT_ELEMENT_ID.to_string(),
            basemap_group: BASEMAP_GROUP.to_string(),
            default_basemap: String::new(),
            basemaps: Vec::new(),
            feature_layers: Vec::new(),
            data_base_url: None,
        }
    }

    /// Parses options from JSON. Missing fields fall back to the full profile.
    pub fn from_json(json: &str) -> Result<Self> {
        let options: ViewerOptions = serde_json::from_str(json)?;
        options.validate(StyleCatalog::builtin())?;
        Ok(options)
    }

    pub fn validate(&self, catalog: &StyleCatalog) -> Result<()> {
        if self.basemaps.is_empty() {
            return Err(MapError::Config("at least one basemap is required".into()));
        }
        if !self.basemaps.iter().any(|b| b.id == self.default_basemap) {
            return Err(MapError::Config(format!(
                "default basemap '{}' is not configured",
                self.default_basemap
            )));
        }
        if self.coordinate_precision > MAX_COORDINATE_PRECISION {
            return Err(MapError::Config(format!(
                "coordinate precision {} exceeds {}",
                self.coordinate_precision, MAX_COORDINATE_PRECISION
            )));
        }
        if !(0.0..=MAX_ZOOM).contains(&self.zoom) {
            return Err(MapError::Config(format!("zoom {} out of range", self.zoom)));
        }
        if !self.center.is_valid() {
            return Err(MapError::InvalidCoordinates(format!(
                "center {}, {}",
                self.center.lng, self.center.lat
            )));
        }

        let mut ids = HashSet::default();
        let mut controls = HashSet::default();
        let layer_keys = self
            .basemaps
            .iter()
            .map(|b| (&b.id, &b.control_id))
            .chain(self.feature_layers.iter().map(|l| (&l.id, &l.control_id)));
        for (id, control_id) in layer_keys {
            if !ids.insert(id.as_str()) {
                return Err(MapError::Config(format!("duplicate layer id '{}'", id)));
            }
            if !controls.insert(control_id.as_str()) {
                return Err(MapError::Config(format!("duplicate control id '{}'", control_id)));
            }
        }

        if let Some(layer) = self
            .feature_layers
            .iter()
            .find(|l| !catalog.contains(&l.style))
        {
            return Err(MapError::Config(format!(
                "layer '{}' uses unknown style '{}'",
                layer.id, layer.style
            )));
        }

        Ok(())
    }

    pub fn basemap(&self, id: &str) -> Option<&BasemapConfig> {
        self.basemaps.iter().find(|b| b.id == id)
    }

    pub fn feature_layer(&self, id: &str) -> Option<&FeatureLayerConfig> {
        self.feature_layers.iter().find(|l| l.id == id)
    }

    /// Every element id the page must provide
    pub fn required_elements(&self) -> Vec<&str> {
        let mut ids = vec![self.map_element.as_str(), self.readout_element.as_str()];
        ids.extend(self.basemaps.iter().map(|b| b.control_id.as_str()));
        ids.extend(self.feature_layers.iter().map(|l| l.control_id.as_str()));
        ids
    }
}

impl Default for ViewerOptions {
    fn default() -> Self {
        ViewerProfile::default().resolve()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_profiles_validate() {
        let catalog = StyleCatalog::builtin();
        assert!(ViewerProfile::Classic.resolve().validate(catalog).is_ok());
        assert!(ViewerProfile::Full.resolve().validate(catalog).is_ok());
    }

    #[test]
    fn test_full_profile_is_default() {
        let options = ViewerOptions::default();
        assert_eq!(options.coordinate_precision, 5);
        assert_eq!(options.default_basemap, "street");
        assert_eq!(options.basemaps.len(), 3);
        assert_eq!(options.feature_layer("trails").unwrap().control_id, "trailCheck");
    }

    #[test]
    fn test_classic_profile() {
        let options = ViewerProfile::Classic.resolve();
        assert_eq!(options.coordinate_precision, 4);
        assert_eq!(options.basemap("sat").unwrap().control_id, "sat");
        assert_eq!(options.feature_layer("poi").unwrap().control_id, "layer1");
    }

    #[test]
    fn test_required_elements() {
        let options = ViewerProfile::Classic.resolve();
        assert_eq!(
            options.required_elements(),
            vec!["map", "coords", "osm", "sat", "layer1", "layer2"]
        );
    }

    #[test]
    fn test_from_json_fills_defaults() {
        let options = ViewerOptions::from_json(r#"{"coordinate_precision": 3}"#).unwrap();
        assert_eq!(options.coordinate_precision, 3);
        assert_eq!(options.basemaps.len(), 3);
    }

    #[test]
    fn test_rejects_unknown_default_basemap() {
        let result = ViewerOptions::from_json(r#"{"default_basemap": "topo"}"#);
        assert!(matches!(result, Err(MapError::Config(_))));
    }

    #[test]
    fn test_rejects_unknown_style() {
        let mut options = ViewerOptions::default();
        options.feature_layers[0].style = "neon".to_string();
        assert!(options.validate(StyleCatalog::builtin()).is_err());
    }

    #[test]
    fn test_rejects_duplicate_control_ids() {
        let mut options = ViewerOptions::default();
        options.feature_layers[1].control_id = "pointsCheck".to_string();
        assert!(options.validate(StyleCatalog::builtin()).is_err());
    }

    #[test]
    fn test_rejects_bad_json() {
        assert!(matches!(
            ViewerOptions::from_json("{"),
            Err(MapError::Serialization(_))
        ));
    }
}
