use crate::{
    core::config::ViewerOptions,
    layers::{
        base::LayerTrait, style::StyleCatalog, tile::BasemapOption, vector::FeatureLayer,
    },
    prelude::HashMap,
    Result,
};

/// Layers keyed by id, remembering the order they were configured in
#[derive(Debug)]
pub struct LayerSet<L> {
    layers: HashMap<String, L>,
    order: Vec<String>,
}

pub type BasemapSet = LayerSet<BasemapOption>;
pub type FeatureLayerSet = LayerSet<FeatureLayer>;

impl<L: LayerTrait> LayerSet<L> {
    pub fn new() -> Self {
        Self {
            layers: HashMap::default(),
            order: Vec::new(),
        }
    }

    /// Adds a layer, replacing any layer with the same id in place
    pub fn insert(&mut self, layer: L) {
        let id = layer.id().to_string();
        if self.layers.insert(id.clone(), layer).is_none() {
            self.order.push(id);
        }
    }

    pub fn get(&self, id: &str) -> Option<&L> {
        self.layers.get(id)
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut L> {
        self.layers.get_mut(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.layers.contains_key(id)
    }

    /// Ids in configuration order
    pub fn ids(&self) -> &[String] {
        &self.order
    }

    /// Layers in configuration order
    pub fn iter(&self) -> impl Iterator<Item = &L> {
        self.order.iter().filter_map(|id| self.layers.get(id))
    }

    /// Finds the layer bound to a page control
    pub fn by_control(&self, control_id: &str) -> Option<&L> {
        self.iter().find(|l| l.control_id() == control_id)
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }
}

impl<L: LayerTrait> Default for LayerSet<L> {
    fn default() -> Self {
        Self::new()
    }
}

/// Builds every basemap and feature layer the viewer knows about.
///
/// Construction only binds sources and styles, nothing is fetched here.
#[derive(Debug)]
pub struct LayerRegistry {
    pub basemaps: BasemapSet,
    pub feature_layers: FeatureLayerSet,
}

impl LayerRegistry {
    pub fn build(options: &ViewerOptions, catalog: &StyleCatalog) -> Result<Self> {
        Ok(Self {
            basemaps: Self::build_basemaps(options),
            feature_layers: Self::build_feature_layers(options, catalog)?,
        })
    }

    pub fn build_basemaps(options: &ViewerOptions) -> BasemapSet {
        let mut set = BasemapSet::new();
        for config in &options.basemaps {
            set.insert(BasemapOption::from_config(config));
        }
        set
    }

    pub fn build_feature_layers(
        options: &ViewerOptions,
        catalog: &StyleCatalog,
    ) -> Result<FeatureLayerSet> {
        let mut set = FeatureLayerSet::new();
        for config in &options.feature_layers {
            set.insert(FeatureLayer::from_config(config, catalog)?);
        }
        Ok(set)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::ViewerProfile;
    use crate::layers::vector::LayerData;

    #[test]
    fn test_build_full_profile() {
        let registry =
            LayerRegistry::build(&ViewerProfile::Full.resolve(), StyleCatalog::builtin()).unwrap();

        assert_eq!(registry.basemaps.ids(), ["street", "satellite", "dark"]);
        assert_eq!(registry.feature_layers.ids(), ["points", "trails", "polygons"]);
    }

    #[test]
    fn test_build_does_not_fetch() {
        let registry =
            LayerRegistry::build(&ViewerProfile::Classic.resolve(), StyleCatalog::builtin())
                .unwrap();

        for layer in registry.feature_layers.iter() {
            assert!(!layer.is_attached());
            assert_eq!(layer.data(), &LayerData::Unloaded);
        }
        assert_eq!(registry.feature_layers.get("roads").unwrap().url(), "roads.geojson");
    }

    #[test]
    fn test_lookup_by_control() {
        let registry =
            LayerRegistry::build(&ViewerProfile::Full.resolve(), StyleCatalog::builtin()).unwrap();

        assert_eq!(registry.basemaps.by_control("darkMode").unwrap().id(), "dark");
        assert_eq!(
            registry.feature_layers.by_control("polygonCheck").unwrap().id(),
            "polygons"
        );
        assert!(registry.basemaps.by_control("nope").is_none());
    }

    #[test]
    fn test_unknown_style_fails_build() {
        let mut options = ViewerProfile::Full.resolve();
        options.feature_layers[2].style = "missing".to_string();
        assert!(LayerRegistry::build(&options, StyleCatalog::builtin()).is_err());
    }
}
