use crate::{
    core::viewport::Viewport,
    input::{events::MapEvent, handler::EventManager},
};

/// One entry of the layer stack
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum LayerRef {
    Basemap(String),
    Feature(String),
}

impl LayerRef {
    pub fn id(&self) -> &str {
        match self {
            LayerRef::Basemap(id) | LayerRef::Feature(id) => id,
        }
    }

    pub fn is_basemap(&self) -> bool {
        matches!(self, LayerRef::Basemap(_))
    }
}

/// The map as the page shows it: a view and an ordered layer stack.
///
/// The basemap lives in its own slot, so the stack always starts with exactly
/// one basemap. Feature layers follow in the order they were attached.
pub struct MapView {
    pub viewport: Viewport,
    basemap: String,
    overlays: Vec<String>,
    event_manager: EventManager,
}

impl MapView {
    /// Builds the initial map. Duplicate overlay ids are attached once.
    pub fn compose<I>(viewport: Viewport, basemap: String, overlays: I) -> Self
    where
        I: IntoIterator<Item = String>,
    {
        let mut map = Self {
            viewport,
            basemap,
            overlays: Vec::new(),
            event_manager: EventManager::new(),
        };
        for id in overlays {
            if !map.has_overlay(&id) {
                map.overlays.push(id);
            }
        }
        map
    }

    pub fn basemap(&self) -> &str {
        &self.basemap
    }

    /// Attached feature layers in stack order
    pub fn overlays(&self) -> &[String] {
        &self.overlays
    }

    pub fn has_overlay(&self, id: &str) -> bool {
        self.overlays.iter().any(|o| o == id)
    }

    /// The full stack, basemap first
    pub fn layer_stack(&self) -> Vec<LayerRef> {
        std::iter::once(LayerRef::Basemap(self.basemap.clone()))
            .chain(self.overlays.iter().cloned().map(LayerRef::Feature))
            .collect()
    }

    /// Stack ids, basemap first
    pub fn layer_ids(&self) -> Vec<&str> {
        std::iter::once(self.basemap.as_str())
            .chain(self.overlays.iter().map(String::as_str))
            .collect()
    }

    /// Number of layers in the stack, the basemap included
    pub fn len(&self) -> usize {
        1 + self.overlays.len()
    }

    /// Always false, the basemap slot is never empty
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Replaces slot 0 in place. Returns false if `id` already was the basemap.
    pub fn set_basemap(&mut self, id: &str) -> bool {
        if self.basemap == id {
            return false;
        }
        self.basemap = id.to_string();
        log::debug!("basemap is now '{}'", id);
        self.event_manager.emit(MapEvent::BaseLayerChange {
            layer_id: id.to_string(),
        });
        true
    }

    /// Appends a feature layer. Returns false if it was already attached.
    pub fn add_overlay(&mut self, id: &str) -> bool {
        if self.has_overlay(id) {
            return false;
        }
        self.overlays.push(id.to_string());
        log::debug!("attached feature layer '{}'", id);
        self.event_manager.emit(MapEvent::OverlayAdd {
            layer_id: id.to_string(),
        });
        true
    }

    /// Removes a feature layer. Returns false if it was not attached.
    pub fn remove_overlay(&mut self, id: &str) -> bool {
        let before = self.overlays.len();
        self.overlays.retain(|o| o != id);
        if self.overlays.len() == before {
            return false;
        }
        log::debug!("detached feature layer '{}'", id);
        self.event_manager.emit(MapEvent::OverlayRemove {
            layer_id: id.to_string(),
        });
        true
    }

    pub fn event_manager(&self) -> &EventManager {
        &self.event_manager
    }

    pub fn event_manager_mut(&mut self) -> &mut EventManager {
        &mut self.event_manager
    }
}

impl std::fmt::Debug for MapView {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MapView")
            .field("viewport", &self.viewport)
            .field("stack", &self.layer_ids())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::geo::{LatLng, Point};

    fn map_with(overlays: &[&str]) -> MapView {
        MapView::compose(
            Viewport::new(LatLng::default(), 12.0, Point::new(800.0, 600.0)),
            "street".to_string(),
            overlays.iter().map(|s| s.to_string()),
        )
    }

    #[test]
    fn test_compose_keeps_order_and_dedupes() {
        let map = map_with(&["points", "polygons", "points"]);
        assert_eq!(map.layer_ids(), vec!["street", "points", "polygons"]);
        assert_eq!(map.len(), 3);
        assert!(map.layer_stack()[0].is_basemap());
    }

    #[test]
    fn test_set_basemap_keeps_overlays() {
        let mut map = map_with(&["points", "trails"]);
        assert!(map.set_basemap("dark"));
        assert_eq!(map.layer_ids(), vec!["dark", "points", "trails"]);
        assert!(!map.set_basemap("dark"));
    }

    #[test]
    fn test_overlay_add_remove_are_idempotent() {
        let mut map = map_with(&[]);
        assert!(map.add_overlay("trails"));
        assert!(!map.add_overlay("trails"));
        assert_eq!(map.overlays(), ["trails"]);

        assert!(map.remove_overlay("trails"));
        assert!(!map.remove_overlay("trails"));
        assert!(map.overlays().is_empty());
        assert_eq!(map.len(), 1);
        assert!(!map.is_empty());
    }

    #[test]
    fn test_changes_emit_events() {
        let mut map = map_with(&[]);
        map.add_overlay("points");
        map.add_overlay("points");
        map.set_basemap("satellite");
        map.remove_overlay("points");

        let events = map.event_manager_mut().process_events();
        assert_eq!(
            events,
            vec![
                MapEvent::OverlayAdd {
                    layer_id: "points".into()
                },
                MapEvent::BaseLayerChange {
                    layer_id: "satellite".into()
                },
                MapEvent::OverlayRemove {
                    layer_id: "points".into()
                },
            ]
        );
    }
}
