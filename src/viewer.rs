//! The running viewer: application state plus the controller that keeps it in
//! step with the page controls.

use crate::{
    core::{
        config::ViewerOptions,
        geo::Point,
        map::MapView,
        viewport::Viewport,
    },
    data::loader::{FeatureFetcher, PendingLoad},
    input::{
        events::MapEvent,
        handler::MapEventHandler,
    },
    layers::{base::LayerTrait, manager::LayerRegistry, style::StyleCatalog},
    ui::{controls::ControlSurface, readout::CoordinateReadout},
    MapError, Result,
};
use futures::future::join_all;

/// Everything the viewer knows, owned in one place
#[derive(Debug)]
pub struct AppState {
    pub options: ViewerOptions,
    pub registry: LayerRegistry,
    pub map: MapView,
    pub readout: CoordinateReadout,
}

/// Picks the basemap to show first: the first checked radio in configuration
/// order, else the configured default.
pub fn initial_basemap<S: ControlSurface>(surface: &S, options: &ViewerOptions) -> String {
    options
        .basemaps
        .iter()
        .find(|b| surface.is_checked(&b.control_id) == Some(true))
        .map(|b| b.id.clone())
        .unwrap_or_else(|| options.default_basemap.clone())
}

/// Ids of the feature layers whose checkbox starts checked, in configuration
/// order
pub fn initial_overlays<S: ControlSurface>(surface: &S, options: &ViewerOptions) -> Vec<String> {
    options
        .feature_layers
        .iter()
        .filter(|l| surface.is_checked(&l.control_id) == Some(true))
        .map(|l| l.id.clone())
        .collect()
}

/// Owns the state and the page it is bound to, and applies control changes
pub struct Viewer<S: ControlSurface> {
    state: AppState,
    surface: S,
}

/// The viewer seen through its event-handling role
pub type InteractionController<S> = Viewer<S>;

impl<S: ControlSurface> Viewer<S> {
    /// Starts with the built-in style catalog
    pub fn start(options: ViewerOptions, surface: S) -> Result<Self> {
        Self::start_with_catalog(options, StyleCatalog::builtin(), surface)
    }

    /// Validates the options, checks the page provides every control, builds
    /// the layers and composes the initial map from the current control state.
    pub fn start_with_catalog(
        options: ViewerOptions,
        catalog: &StyleCatalog,
        surface: S,
    ) -> Result<Self> {
        options.validate(catalog)?;
        surface.require(options.required_elements())?;

        let mut registry = LayerRegistry::build(&options, catalog)?;

        let basemap = initial_basemap(&surface, &options);
        let overlays = initial_overlays(&surface, &options);
        for id in &overlays {
            if let Some(layer) = registry.feature_layers.get_mut(id) {
                layer.attach();
            }
        }

        let viewport = Viewport::new(options.center, options.zoom, Point::default());
        let map = MapView::compose(viewport, basemap, overlays);
        log::info!("viewer started with layers {:?}", map.layer_ids());

        let readout = CoordinateReadout::new(options.coordinate_precision);
        Ok(Self {
            state: AppState {
                options,
                registry,
                map,
                readout,
            },
            surface,
        })
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn options(&self) -> &ViewerOptions {
        &self.state.options
    }

    pub fn map(&self) -> &MapView {
        &self.state.map
    }

    pub fn viewport(&self) -> &Viewport {
        &self.state.map.viewport
    }

    pub fn viewport_mut(&mut self) -> &mut Viewport {
        &mut self.state.map.viewport
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    /// Stack ids, basemap first
    pub fn layer_ids(&self) -> Vec<&str> {
        self.state.map.layer_ids()
    }

    /// The layers currently on the map, basemap first
    pub fn stack_layers(&self) -> Vec<&dyn LayerTrait> {
        let registry = &self.state.registry;
        let map = &self.state.map;

        let basemap = registry
            .basemaps
            .get(map.basemap())
            .map(|b| b as &dyn LayerTrait);
        let overlays = map
            .overlays()
            .iter()
            .filter_map(|id| registry.feature_layers.get(id))
            .map(|l| l as &dyn LayerTrait);

        basemap.into_iter().chain(overlays).collect()
    }

    pub fn on<F>(&mut self, event_type: &str, callback: F)
    where
        F: Fn(&MapEvent) + Send + Sync + 'static,
    {
        self.state.map.event_manager_mut().on(event_type, callback);
    }

    pub fn process_events(&mut self) -> Vec<MapEvent> {
        self.state.map.event_manager_mut().process_events()
    }

    /// Pointer at `client` page pixels over a map container whose top-left
    /// corner is at `container_origin`. The container size is re-read on every
    /// move since the page may have been resized.
    pub fn pointer_at(
        &mut self,
        client: Point,
        container_origin: Point,
        container_size: Point,
    ) -> Result<()> {
        let viewport = &mut self.state.map.viewport;
        viewport.set_size(container_size);
        let offset = client.subtract(&container_origin);
        let coordinate = viewport.container_point_to_coordinate(&offset);
        self.on_pointer_move(coordinate)
    }

    /// Re-reads one control from the page and applies its state. Used by
    /// hosts that only learn which control changed.
    pub fn sync_control(&mut self, control_id: &str) -> Result<()> {
        let registry = &self.state.registry;
        if let Some(basemap) = registry.basemaps.by_control(control_id) {
            let id = basemap.id().to_string();
            return match self.surface.is_checked(control_id) {
                Some(true) => self.on_basemap_change(&id),
                _ => Ok(()),
            };
        }
        if let Some(layer) = registry.feature_layers.by_control(control_id) {
            let id = layer.id().to_string();
            let checked = self.surface.is_checked(control_id).unwrap_or(false);
            return self.on_layer_toggle(&id, checked);
        }
        Err(MapError::MissingElement(control_id.to_string()))
    }

    /// Attached layers still waiting for data
    pub fn pending_loads(&self) -> Vec<PendingLoad> {
        self.state
            .registry
            .feature_layers
            .iter()
            .filter(|l| l.needs_load())
            .map(|l| PendingLoad {
                layer_id: l.id().to_string(),
                url: l.url().to_string(),
                generation: l.generation(),
            })
            .collect()
    }

    /// Hands a fetch result to its layer. Returns whether it was applied;
    /// results for a layer detached or re-attached since are dropped.
    pub fn complete_load(
        &mut self,
        layer_id: &str,
        generation: u64,
        body: Result<String>,
    ) -> Result<bool> {
        let AppState { registry, map, .. } = &mut self.state;
        let layer = registry
            .feature_layers
            .get_mut(layer_id)
            .ok_or_else(|| MapError::UnknownLayer(layer_id.to_string()))?;

        if !layer.complete_load(generation, body) {
            return Ok(false);
        }

        map.event_manager_mut().emit(MapEvent::OverlayLoad {
            layer_id: layer_id.to_string(),
            feature_count: layer.feature_count(),
        });
        Ok(true)
    }

    /// Fetches every pending layer concurrently and applies the results.
    /// Returns how many were applied.
    pub async fn load_pending<F>(&mut self, fetcher: &F) -> Result<usize>
    where
        F: FeatureFetcher + ?Sized,
    {
        let pending = self.pending_loads();
        if pending.is_empty() {
            return Ok(0);
        }

        let bodies = join_all(pending.iter().map(|load| fetcher.fetch(&load.url))).await;

        let mut applied = 0;
        for (load, body) in pending.into_iter().zip(bodies) {
            if self.complete_load(&load.layer_id, load.generation, body)? {
                applied += 1;
            }
        }
        Ok(applied)
    }

    /// `load_pending` on a throwaway current-thread runtime, for native hosts
    /// that are not async themselves
    #[cfg(feature = "tokio-runtime")]
    pub fn load_pending_blocking<F>(&mut self, fetcher: &F) -> Result<usize>
    where
        F: FeatureFetcher + ?Sized,
    {
        let runtime = ::tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| MapError::Unavailable(format!("async runtime: {}", e)))?;
        runtime.block_on(self.load_pending(fetcher))
    }
}

impl<S: ControlSurface> MapEventHandler for Viewer<S> {
    fn on_basemap_change(&mut self, basemap_id: &str) -> Result<()> {
        if !self.state.registry.basemaps.contains(basemap_id) {
            return Err(MapError::UnknownBasemap(basemap_id.to_string()));
        }
        self.state.map.set_basemap(basemap_id);
        Ok(())
    }

    fn on_layer_toggle(&mut self, layer_id: &str, checked: bool) -> Result<()> {
        let AppState { registry, map, .. } = &mut self.state;
        let layer = registry
            .feature_layers
            .get_mut(layer_id)
            .ok_or_else(|| MapError::UnknownLayer(layer_id.to_string()))?;

        if checked {
            if layer.attach() {
                map.add_overlay(layer_id);
            }
        } else if layer.detach() {
            map.remove_overlay(layer_id);
        }
        Ok(())
    }

    fn on_pointer_move(&mut self, coordinate: Point) -> Result<()> {
        let lat_lng = CoordinateReadout::to_lon_lat(coordinate);
        let text = self.state.readout.format(&lat_lng);
        self.surface
            .set_text(&self.state.options.readout_element, &text)?;

        // Pointer moves are too frequent to queue for nobody
        let events = self.state.map.event_manager_mut();
        if events.has_listeners("pointermove") {
            events.emit(MapEvent::PointerMove {
                lat_lng,
                coordinate,
            });
        }
        Ok(())
    }
}

impl<S: ControlSurface> std::fmt::Debug for Viewer<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Viewer").field("state", &self.state).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::ViewerProfile;
    use crate::data::loader::StaticFetcher;
    use crate::layers::base::LayerType;
    use crate::ui::controls::MemorySurface;

    fn full_surface() -> MemorySurface {
        MemorySurface::for_options(&ViewerOptions::default())
    }

    #[test]
    fn test_initial_basemap_falls_back_to_default() {
        let options = ViewerOptions::default();
        assert_eq!(initial_basemap(&full_surface(), &options), "street");

        let mut surface = full_surface();
        surface.set_checked("satelliteMode", true);
        assert_eq!(initial_basemap(&surface, &options), "satellite");
    }

    #[test]
    fn test_initial_overlays_follow_config_order() {
        let mut surface = full_surface();
        surface.set_checked("polygonCheck", true);
        surface.set_checked("pointsCheck", true);
        assert_eq!(
            initial_overlays(&surface, &ViewerOptions::default()),
            vec!["points", "polygons"]
        );
    }

    #[test]
    fn test_start_attaches_checked_layers() {
        let surface = full_surface().with_checkbox("trailCheck", true);
        let viewer = Viewer::start(ViewerOptions::default(), surface).unwrap();

        assert_eq!(viewer.layer_ids(), vec!["street", "trails"]);
        let trails = viewer.state().registry.feature_layers.get("trails").unwrap();
        assert!(trails.is_attached());
        assert_eq!(viewer.pending_loads().len(), 1);
    }

    #[test]
    fn test_unknown_ids_are_rejected() {
        let mut viewer = Viewer::start(ViewerOptions::default(), full_surface()).unwrap();
        assert!(matches!(
            viewer.on_basemap_change("topo"),
            Err(MapError::UnknownBasemap(_))
        ));
        assert!(matches!(
            viewer.on_layer_toggle("rivers", true),
            Err(MapError::UnknownLayer(_))
        ));
        assert_eq!(viewer.layer_ids(), vec!["street"]);
    }

    #[test]
    fn test_sync_control_reads_surface() {
        let mut viewer = Viewer::start(ViewerOptions::default(), full_surface()).unwrap();

        viewer.surface_mut().set_checked("darkMode", true);
        viewer.sync_control("darkMode").unwrap();
        viewer.surface_mut().set_checked("pointsCheck", true);
        viewer.sync_control("pointsCheck").unwrap();
        assert_eq!(viewer.layer_ids(), vec!["dark", "points"]);

        viewer.surface_mut().set_checked("pointsCheck", false);
        viewer.sync_control("pointsCheck").unwrap();
        assert_eq!(viewer.layer_ids(), vec!["dark"]);

        assert!(viewer.sync_control("coords").is_err());
    }

    #[test]
    fn test_pointer_at_is_relative_to_container() {
        let mut viewer = Viewer::start(ViewerOptions::default(), full_surface()).unwrap();

        // Container centre shows the map centre wherever the container sits
        viewer
            .pointer_at(Point::new(500.0, 350.0), Point::new(100.0, 50.0), Point::new(800.0, 600.0))
            .unwrap();
        assert_eq!(viewer.surface().text("coords"), Some("-66.11740, 43.83750"));

        // 200 px right of centre at zoom 12
        viewer
            .pointer_at(Point::new(700.0, 350.0), Point::new(100.0, 50.0), Point::new(800.0, 600.0))
            .unwrap();
        assert_eq!(viewer.surface().text("coords"), Some("-66.04874, 43.83750"));
    }

    #[test]
    fn test_pointer_at_follows_resize() {
        let mut viewer = Viewer::start(ViewerOptions::default(), full_surface()).unwrap();
        viewer
            .pointer_at(Point::new(400.0, 300.0), Point::default(), Point::new(800.0, 600.0))
            .unwrap();

        viewer
            .pointer_at(Point::new(200.0, 150.0), Point::default(), Point::new(400.0, 300.0))
            .unwrap();
        assert_eq!(viewer.viewport().size, Point::new(400.0, 300.0));
        assert_eq!(viewer.surface().text("coords"), Some("-66.11740, 43.83750"));
    }

    #[test]
    fn test_pointer_moves_queue_only_when_observed() {
        let mut viewer = Viewer::start(ViewerOptions::default(), full_surface()).unwrap();
        for i in 0..100 {
            viewer.on_pointer_move(Point::new(i as f64, 0.0)).unwrap();
        }
        assert_eq!(viewer.map().event_manager().pending_events(), 0);

        viewer.on("pointermove", |_| {});
        viewer.on_pointer_move(Point::default()).unwrap();
        assert_eq!(viewer.map().event_manager().pending_events(), 1);
    }

    #[test]
    fn test_stack_layers_resolve_to_layers() {
        let surface = MemorySurface::for_options(&ViewerProfile::Classic.resolve())
            .with_checkbox("layer2", true);
        let viewer = Viewer::start(ViewerProfile::Classic.resolve(), surface).unwrap();

        let names: Vec<_> = viewer.stack_layers().iter().map(|l| l.name().to_string()).collect();
        assert_eq!(names, vec!["OpenStreetMap", "Roads"]);
    }

    #[test]
    fn test_stack_layers_describe_their_controls() {
        let surface = full_surface().with_checkbox("trailCheck", true);
        let viewer = Viewer::start(ViewerOptions::default(), surface).unwrap();

        let described: Vec<_> = viewer
            .stack_layers()
            .iter()
            .map(|l| (l.layer_type(), l.control_id().to_string()))
            .collect();
        assert_eq!(
            described,
            vec![
                (LayerType::Tile, "streetMode".to_string()),
                (LayerType::Vector, "trailCheck".to_string()),
            ]
        );
        assert_eq!(viewer.stack_layers()[1].options()["attached"], true);
    }

    #[test]
    fn test_complete_load_emits_event() {
        let surface = full_surface().with_checkbox("pointsCheck", true);
        let mut viewer = Viewer::start(ViewerOptions::default(), surface).unwrap();
        let load = viewer.pending_loads().remove(0);

        let body = r#"{"type": "Point", "coordinates": [-66.1, 43.8]}"#;
        assert!(viewer
            .complete_load(&load.layer_id, load.generation, Ok(body.to_string()))
            .unwrap());
        assert!(viewer.pending_loads().is_empty());

        assert_eq!(
            viewer.process_events(),
            vec![MapEvent::OverlayLoad {
                layer_id: "points".into(),
                feature_count: 1
            }]
        );
    }

    #[tokio::test]
    async fn test_load_pending_fetches_all() {
        let surface = full_surface()
            .with_checkbox("pointsCheck", true)
            .with_checkbox("polygonCheck", true);
        let mut viewer = Viewer::start(ViewerOptions::default(), surface).unwrap();

        let fetcher = StaticFetcher::new().with(
            "points_of_interest.geojson",
            r#"{"type": "FeatureCollection", "features": []}"#,
        );
        assert_eq!(viewer.load_pending(&fetcher).await.unwrap(), 2);
        assert!(viewer.pending_loads().is_empty());
        assert_eq!(viewer.load_pending(&fetcher).await.unwrap(), 0);
    }

    #[cfg(feature = "tokio-runtime")]
    #[test]
    fn test_load_pending_blocking() {
        let surface = full_surface().with_checkbox("trailCheck", true);
        let mut viewer = Viewer::start(ViewerOptions::default(), surface).unwrap();
        let fetcher = StaticFetcher::new().with(
            "trails.geojson",
            r#"{"type": "LineString", "coordinates": [[-66.13, 43.82], [-66.11, 43.84]]}"#,
        );

        assert_eq!(viewer.load_pending_blocking(&fetcher).unwrap(), 1);
        let trails = viewer.state().registry.feature_layers.get("trails").unwrap();
        assert_eq!(trails.feature_count(), 1);
    }
}
