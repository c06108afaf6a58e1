//! Basemap tile layers
//!
//! A basemap only knows where its tiles live. Fetching and drawing them is the
//! renderer's job; the viewer only decides which basemap sits in slot 0.

use crate::{
    core::{config::BasemapConfig, geo::TileCoord},
    impl_layer_trait,
    layers::base::{LayerProperties, LayerTrait, LayerType},
};

/// Trait representing anything that can produce tile URLs for a given coordinate.
pub trait TileSource: Send + Sync {
    /// Build a URL for the requested `coord`.
    fn url(&self, coord: TileCoord) -> String;

    /// The raw template, for renderers that expand it themselves.
    fn template(&self) -> &str;
}

/// XYZ source expanding `{z}`, `{x}`, `{y}` and an optional `{s}` subdomain.
#[derive(Debug, Clone, PartialEq)]
pub struct XyzSource {
    template: String,
    subdomains: Vec<String>,
}

impl XyzSource {
    pub fn new(template: impl Into<String>, subdomains: Vec<String>) -> Self {
        Self {
            template: template.into(),
            subdomains,
        }
    }

    fn subdomain(&self, coord: TileCoord) -> &str {
        if self.subdomains.is_empty() {
            return "";
        }
        let idx = ((coord.x as u64 + coord.y as u64) % self.subdomains.len() as u64) as usize;
        &self.subdomains[idx]
    }
}

impl TileSource for XyzSource {
    fn url(&self, coord: TileCoord) -> String {
        self.template
            .replace("{s}", self.subdomain(coord))
            .replace("{z}", &coord.z.to_string())
            .replace("{x}", &coord.x.to_string())
            .replace("{y}", &coord.y.to_string())
    }

    fn template(&self) -> &str {
        &self.template
    }
}

/// One selectable basemap. Immutable once built.
pub struct BasemapOption {
    properties: LayerProperties,
    source: Box<dyn TileSource>,
    attribution: Option<String>,
}

impl BasemapOption {
    pub fn new(
        id: String,
        name: String,
        control_id: String,
        source: Box<dyn TileSource>,
    ) -> Self {
        Self {
            properties: LayerProperties::new(id, name, LayerType::Tile, control_id),
            source,
            attribution: None,
        }
    }

    pub fn from_config(config: &BasemapConfig) -> Self {
        let source = XyzSource::new(config.url_template.clone(), config.subdomains.clone());
        let mut basemap = Self::new(
            config.id.clone(),
            config.name.clone(),
            config.control_id.clone(),
            Box::new(source),
        );
        basemap.attribution = config.attribution.clone();
        basemap
    }

    pub fn attribution(&self) -> Option<&str> {
        self.attribution.as_deref()
    }
}

impl std::fmt::Debug for BasemapOption {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BasemapOption")
            .field("id", &self.properties.id)
            .field("template", &self.source.template())
            .finish()
    }
}

impl LayerTrait for BasemapOption {
    impl_layer_trait!(properties);

    fn options(&self) -> serde_json::Value {
        serde_json::json!({
            "template": self.source.template(),
            "attribution": self.attribution,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_xyz_expansion() {
        let source = XyzSource::new("https://tile.openstreetmap.org/{z}/{x}/{y}.png", vec![]);
        assert_eq!(
            source.url(TileCoord::new(1295, 1488, 12)),
            "https://tile.openstreetmap.org/12/1295/1488.png"
        );
    }

    #[test]
    fn test_row_before_column_template() {
        let source = XyzSource::new(
            "https://server.arcgisonline.com/ArcGIS/rest/services/World_Imagery/MapServer/tile/{z}/{y}/{x}",
            vec![],
        );
        assert!(source.url(TileCoord::new(3, 5, 4)).ends_with("/tile/4/5/3"));
    }

    #[test]
    fn test_subdomain_rotation() {
        let source = XyzSource::new(
            "https://{s}.example.com/{z}/{x}/{y}.png",
            vec!["a".into(), "b".into(), "c".into()],
        );
        assert!(source.url(TileCoord::new(0, 0, 1)).starts_with("https://a."));
        assert!(source.url(TileCoord::new(1, 0, 1)).starts_with("https://b."));
        assert!(source.url(TileCoord::new(1, 1, 1)).starts_with("https://c."));
    }

    #[test]
    fn test_basemap_layer_trait() {
        let basemap = BasemapOption::new(
            "street".into(),
            "Street".into(),
            "streetMode".into(),
            Box::new(XyzSource::new("https://t/{z}/{x}/{y}.png", vec![])),
        );
        assert_eq!(basemap.id(), "street");
        assert_eq!(basemap.control_id(), "streetMode");
        assert_eq!(basemap.layer_type(), LayerType::Tile);
        assert_eq!(basemap.options()["template"], "https://t/{z}/{x}/{y}.png");
    }
}
