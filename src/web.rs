//! Browser binding: a `ControlSurface` over the DOM and the wasm entry point
//! that wires page events into the viewer.

use crate::{
    core::{config::ViewerOptions, geo::Point},
    data::loader::{FeatureFetcher, HttpFetcher},
    prelude::HashSet,
    ui::controls::ControlSurface,
    viewer::Viewer,
    MapError, Result,
};
use std::{cell::RefCell, rc::Rc};
use wasm_bindgen::{prelude::*, JsCast};
use wasm_bindgen_futures::spawn_local;
use web_sys::{Document, HtmlElement, HtmlInputElement};

/// Reads and writes page elements by id
#[derive(Debug, Clone)]
pub struct DomSurface {
    document: Document,
}

impl DomSurface {
    pub fn new(document: Document) -> Self {
        Self { document }
    }

    fn input(&self, id: &str) -> Option<HtmlInputElement> {
        self.document
            .get_element_by_id(id)
            .and_then(|e| e.dyn_into::<HtmlInputElement>().ok())
    }
}

impl ControlSurface for DomSurface {
    fn has_element(&self, id: &str) -> bool {
        self.document.get_element_by_id(id).is_some()
    }

    fn is_checked(&self, id: &str) -> Option<bool> {
        self.input(id).map(|input| input.checked())
    }

    fn set_text(&mut self, id: &str, text: &str) -> Result<()> {
        let element = self
            .document
            .get_element_by_id(id)
            .ok_or_else(|| MapError::MissingElement(id.to_string()))?;
        element.set_text_content(Some(text));
        Ok(())
    }
}

/// What the event listeners share
struct Session {
    viewer: RefCell<Viewer<DomSurface>>,
    fetcher: HttpFetcher,
    in_flight: RefCell<HashSet<(String, u64)>>,
}

impl Session {
    /// Starts a fetch for every pending layer that is not already being fetched
    fn spawn_pending_loads(this: &Rc<Self>) {
        let pending = this.viewer.borrow().pending_loads();
        for load in pending {
            let key = (load.layer_id.clone(), load.generation);
            if !this.in_flight.borrow_mut().insert(key.clone()) {
                continue;
            }

            let session = Rc::clone(this);
            spawn_local(async move {
                let body = session.fetcher.fetch(&load.url).await;
                session.in_flight.borrow_mut().remove(&key);

                let mut viewer = session.viewer.borrow_mut();
                if let Err(e) = viewer.complete_load(&load.layer_id, load.generation, body) {
                    log::error!("could not apply load for '{}': {}", load.layer_id, e);
                }
                viewer.process_events();
            });
        }
    }

    fn on_control_change(this: &Rc<Self>, control_id: &str) {
        {
            let mut viewer = this.viewer.borrow_mut();
            if let Err(e) = viewer.sync_control(control_id) {
                log::error!("control '{}' change failed: {}", control_id, e);
            }
            viewer.process_events();
        }
        Self::spawn_pending_loads(this);
    }

    fn on_pointer_move(&self, client: Point, container: &HtmlElement) {
        let rect = container.get_bounding_client_rect();
        let mut viewer = self.viewer.borrow_mut();
        let result = viewer.pointer_at(
            client,
            Point::new(rect.left(), rect.top()),
            Point::new(rect.width(), rect.height()),
        );
        if let Err(e) = result {
            log::error!("pointer readout failed: {}", e);
        }
        viewer.process_events();
    }
}

fn to_js(error: MapError) -> JsValue {
    JsValue::from_str(&error.to_string())
}

/// Starts the viewer on the current page.
///
/// `options_json` overrides the built-in configuration; missing fields fall
/// back to the default profile.
#[wasm_bindgen]
pub fn start(options_json: Option<String>) -> std::result::Result<(), JsValue> {
    console_error_panic_hook::set_once();
    // Already initialised when the page calls start twice
    let _ = console_log::init_with_level(log::Level::Debug);

    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
    let document = window
        .document()
        .ok_or_else(|| JsValue::from_str("no document"))?;

    let options = match options_json {
        Some(json) => ViewerOptions::from_json(&json).map_err(to_js)?,
        None => ViewerOptions::default(),
    };

    let base_url = match &options.data_base_url {
        Some(url) => Some(url.clone()),
        None => document.url().ok(),
    };
    let fetcher = HttpFetcher::new(base_url.as_deref()).map_err(to_js)?;

    let map_element = options.map_element.clone();
    let control_ids: Vec<String> = options
        .basemaps
        .iter()
        .map(|b| b.control_id.clone())
        .chain(options.feature_layers.iter().map(|l| l.control_id.clone()))
        .collect();

    let mut viewer = Viewer::start(options, DomSurface::new(document.clone())).map_err(to_js)?;

    let container = document
        .get_element_by_id(&map_element)
        .and_then(|e| e.dyn_into::<HtmlElement>().ok())
        .ok_or_else(|| to_js(MapError::MissingElement(map_element.clone())))?;
    let rect = container.get_bounding_client_rect();
    viewer
        .viewport_mut()
        .set_size(Point::new(rect.width(), rect.height()));

    let session = Rc::new(Session {
        viewer: RefCell::new(viewer),
        fetcher,
        in_flight: RefCell::new(HashSet::default()),
    });

    for control_id in control_ids {
        let element = document
            .get_element_by_id(&control_id)
            .ok_or_else(|| to_js(MapError::MissingElement(control_id.clone())))?;

        let listener_session = Rc::clone(&session);
        let on_change = Closure::wrap(Box::new(move |_event: web_sys::Event| {
            Session::on_control_change(&listener_session, &control_id);
        }) as Box<dyn FnMut(web_sys::Event)>);
        element.add_event_listener_with_callback("change", on_change.as_ref().unchecked_ref())?;
        on_change.forget();
    }

    let pointer_session = Rc::clone(&session);
    let pointer_container = container.clone();
    let on_pointer = Closure::wrap(Box::new(move |event: web_sys::PointerEvent| {
        // offsetX is relative to whichever child element is under the pointer
        let client = Point::new(event.client_x() as f64, event.client_y() as f64);
        pointer_session.on_pointer_move(client, &pointer_container);
    }) as Box<dyn FnMut(web_sys::PointerEvent)>);
    container.add_event_listener_with_callback("pointermove", on_pointer.as_ref().unchecked_ref())?;
    on_pointer.forget();

    Session::spawn_pending_loads(&session);
    log::info!("viewer bound to #{}", map_element);
    Ok(())
}
