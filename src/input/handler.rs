use crate::{
    core::geo::Point,
    input::events::{ControlEvent, MapEvent},
    prelude::HashMap,
    Result,
};
use std::collections::VecDeque;

/// The three things the page can tell the viewer.
///
/// Each call is independent and leaves the map consistent with the control
/// that triggered it, so callers can replay any sequence of control changes.
pub trait MapEventHandler {
    /// A basemap radio became checked
    fn on_basemap_change(&mut self, basemap_id: &str) -> Result<()>;

    /// A feature-layer checkbox changed to `checked`
    fn on_layer_toggle(&mut self, layer_id: &str, checked: bool) -> Result<()>;

    /// The pointer moved to `coordinate` (EPSG:3857 metres)
    fn on_pointer_move(&mut self, coordinate: Point) -> Result<()>;

    /// Routes a typed event to the matching method
    fn dispatch(&mut self, event: ControlEvent) -> Result<()> {
        match event {
            ControlEvent::BasemapChange { basemap_id } => self.on_basemap_change(&basemap_id),
            ControlEvent::LayerToggle { layer_id, checked } => {
                self.on_layer_toggle(&layer_id, checked)
            }
            ControlEvent::PointerMove { coordinate } => self.on_pointer_move(coordinate),
        }
    }
}

/// Event listener callback type
pub type EventCallback = Box<dyn Fn(&MapEvent) + Send + Sync>;

/// Event management system for the map
#[derive(Default)]
pub struct EventManager {
    /// Event listeners by event type
    listeners: HashMap<String, Vec<EventCallback>>,
    /// Event queue for processing
    event_queue: VecDeque<MapEvent>,
}

impl EventManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an event listener
    pub fn on<F>(&mut self, event_type: &str, callback: F)
    where
        F: Fn(&MapEvent) + Send + Sync + 'static,
    {
        self.listeners
            .entry(event_type.to_string())
            .or_default()
            .push(Box::new(callback));
    }

    /// Whether anything listens for `event_type`
    pub fn has_listeners(&self, event_type: &str) -> bool {
        self.listeners
            .get(event_type)
            .map_or(false, |callbacks| !callbacks.is_empty())
    }

    /// Emit an event to the queue
    pub fn emit(&mut self, event: MapEvent) {
        self.event_queue.push_back(event);
    }

    /// Process all queued events
    pub fn process_events(&mut self) -> Vec<MapEvent> {
        let events: Vec<_> = self.event_queue.drain(..).collect();

        for event in &events {
            if let Some(callbacks) = self.listeners.get(event.event_type()) {
                for callback in callbacks {
                    callback(event);
                }
            }
        }

        events
    }

    /// Clear all events from the queue
    pub fn clear_events(&mut self) {
        self.event_queue.clear();
    }

    /// Get number of pending events
    pub fn pending_events(&self) -> usize {
        self.event_queue.len()
    }
}
