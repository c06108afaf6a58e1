use crate::{
    core::config::FeatureLayerConfig,
    data::geojson::{GeoJson, GeoJsonFeature},
    impl_layer_trait,
    layers::{
        base::{LayerProperties, LayerTrait, LayerType},
        style::{StyleCatalog, StyleDescriptor},
    },
    MapError, Result,
};

/// Where a feature layer's data currently stands
#[derive(Debug, Clone, PartialEq)]
pub enum LayerData {
    /// Detached, nothing held in memory
    Unloaded,
    /// Attached, waiting for its source to be fetched
    Pending,
    /// Attached and decoded. Failed loads land here with no features.
    Loaded(Vec<GeoJsonFeature>),
}

/// A layer of features decoded from a remote feature collection
#[derive(Debug)]
pub struct FeatureLayer {
    properties: LayerProperties,
    url: String,
    styles: Vec<StyleDescriptor>,
    attached: bool,
    data: LayerData,
    /// Bumped on every attach so late fetch results can be recognised as stale
    generation: u64,
}

impl FeatureLayer {
    /// Create a new feature layer. At least one style pass is required.
    pub fn new(
        id: String,
        name: String,
        control_id: String,
        url: String,
        styles: Vec<StyleDescriptor>,
    ) -> Result<Self> {
        if styles.is_empty() {
            return Err(MapError::Config(format!("layer '{}' has no styles", id)));
        }

        Ok(Self {
            properties: LayerProperties::new(id, name, LayerType::Vector, control_id),
            url,
            styles,
            attached: false,
            data: LayerData::Unloaded,
            generation: 0,
        })
    }

    pub fn from_config(config: &FeatureLayerConfig, catalog: &StyleCatalog) -> Result<Self> {
        let styles = catalog
            .get(&config.style)
            .ok_or_else(|| MapError::Config(format!("unknown style '{}'", config.style)))?
            .to_vec();

        Self::new(
            config.id.clone(),
            config.name.clone(),
            config.control_id.clone(),
            config.url.clone(),
            styles,
        )
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Paint passes, back to front
    pub fn styles(&self) -> &[StyleDescriptor] {
        &self.styles
    }

    pub fn is_attached(&self) -> bool {
        self.attached
    }

    pub fn data(&self) -> &LayerData {
        &self.data
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Decoded features, empty until loaded
    pub fn features(&self) -> &[GeoJsonFeature] {
        match &self.data {
            LayerData::Loaded(features) => features,
            _ => &[],
        }
    }

    pub fn feature_count(&self) -> usize {
        self.features().len()
    }

    pub fn needs_load(&self) -> bool {
        self.attached && self.data == LayerData::Pending
    }

    /// Marks the layer attached and queues a fresh load. Returns false if it
    /// already was attached.
    pub fn attach(&mut self) -> bool {
        if self.attached {
            return false;
        }
        self.attached = true;
        self.generation += 1;
        self.data = LayerData::Pending;
        true
    }

    /// Detaches and drops every decoded feature. Returns false if it was not
    /// attached.
    pub fn detach(&mut self) -> bool {
        if !self.attached {
            return false;
        }
        self.attached = false;
        self.data = LayerData::Unloaded;
        true
    }

    /// Applies a fetch result for `generation`.
    ///
    /// Stale results (detached or re-attached since the fetch started) are
    /// dropped and `false` is returned. Fetch or decode failures leave the layer
    /// loaded with no features.
    pub fn complete_load(&mut self, generation: u64, body: Result<String>) -> bool {
        if !self.attached || generation != self.generation {
            log::debug!(
                "dropping stale load for layer '{}' (generation {} != {})",
                self.properties.id,
                generation,
                self.generation
            );
            return false;
        }

        let features = match body.and_then(|text| GeoJson::parse(&text)) {
            Ok(geojson) => geojson.into_features(),
            Err(e) => {
                log::warn!(
                    "feature layer '{}' failed to load from {}: {}",
                    self.properties.id,
                    self.url,
                    e
                );
                Vec::new()
            }
        };

        log::debug!(
            "feature layer '{}' loaded {} features",
            self.properties.id,
            features.len()
        );
        self.data = LayerData::Loaded(features);
        true
    }
}

impl LayerTrait for FeatureLayer {
    impl_layer_trait!(properties);

    fn options(&self) -> serde_json::Value {
        serde_json::json!({
            "url": self.url,
            "attached": self.attached,
            "feature_count": self.feature_count(),
            "style_passes": self.styles.len(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TWO_POINTS: &str = r#"{
        "type": "FeatureCollection",
        "features": [
            {"type": "Feature", "geometry": {"type": "Point", "coordinates": [-66.1296, 43.8160]}, "properties": {"name": "Lighthouse"}},
            {"type": "Feature", "geometry": {"type": "Point", "coordinates": [-66.1174, 43.8375]}, "properties": null}
        ]
    }"#;

    fn points_layer() -> FeatureLayer {
        FeatureLayer::new(
            "points".to_string(),
            "Points of interest".to_string(),
            "pointsCheck".to_string(),
            "points_of_interest.geojson".to_string(),
            StyleCatalog::builtin().get("points").unwrap().to_vec(),
        )
        .unwrap()
    }

    #[test]
    fn test_feature_layer_creation() {
        let layer = points_layer();
        assert_eq!(layer.id(), "points");
        assert_eq!(layer.layer_type(), LayerType::Vector);
        assert!(!layer.is_attached());
        assert_eq!(layer.data(), &LayerData::Unloaded);
        assert_eq!(layer.styles().len(), 2);
    }

    #[test]
    fn test_layer_without_styles_is_rejected() {
        let result = FeatureLayer::new(
            "bare".into(),
            "Bare".into(),
            "bareCheck".into(),
            "bare.geojson".into(),
            Vec::new(),
        );
        assert!(matches!(result, Err(MapError::Config(_))));
    }

    #[test]
    fn test_attach_detach_are_idempotent() {
        let mut layer = points_layer();
        assert!(layer.attach());
        assert!(!layer.attach());
        assert_eq!(layer.generation(), 1);
        assert!(layer.needs_load());

        assert!(layer.detach());
        assert!(!layer.detach());
        assert_eq!(layer.data(), &LayerData::Unloaded);
    }

    #[test]
    fn test_load_and_discard_on_detach() {
        let mut layer = points_layer();
        layer.attach();
        assert!(layer.complete_load(1, Ok(TWO_POINTS.to_string())));
        assert_eq!(layer.feature_count(), 2);

        layer.detach();
        assert_eq!(layer.feature_count(), 0);

        layer.attach();
        assert_eq!(layer.generation(), 2);
        assert!(layer.needs_load());
    }

    #[test]
    fn test_failed_load_leaves_empty_layer() {
        let mut layer = points_layer();
        layer.attach();
        assert!(layer.complete_load(1, Ok("not geojson".to_string())));
        assert!(layer.is_attached());
        assert_eq!(layer.data(), &LayerData::Loaded(Vec::new()));
    }

    #[test]
    fn test_stale_load_is_dropped() {
        let mut layer = points_layer();
        layer.attach();
        layer.detach();
        layer.attach();

        assert!(!layer.complete_load(1, Ok(TWO_POINTS.to_string())));
        assert!(layer.needs_load());
        assert!(layer.complete_load(2, Ok(TWO_POINTS.to_string())));
    }
}
