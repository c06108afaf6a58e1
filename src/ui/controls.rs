//! The page controls the viewer reads and writes
//!
//! A `ControlSurface` is the whole contract with the page: look up elements by
//! id, read a radio or checkbox state, and set an element's text. The browser
//! binding implements it over the DOM; `MemorySurface` keeps it in memory.

use crate::core::config::ViewerOptions;
use crate::prelude::HashMap;
use crate::{MapError, Result};

pub trait ControlSurface {
    fn has_element(&self, id: &str) -> bool;

    /// `checked` state of a radio or checkbox, `None` if there is no such input
    fn is_checked(&self, id: &str) -> Option<bool>;

    fn set_text(&mut self, id: &str, text: &str) -> Result<()>;

    /// Fails with the first id the page does not provide
    fn require<'a, I>(&self, ids: I) -> Result<()>
    where
        I: IntoIterator<Item = &'a str>,
        Self: Sized,
    {
        match ids.into_iter().find(|id| !self.has_element(id)) {
            Some(missing) => Err(MapError::MissingElement(missing.to_string())),
            None => Ok(()),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
enum ElementKind {
    Plain,
    Checkbox,
    Radio { group: String },
}

#[derive(Debug, Clone)]
struct Element {
    kind: ElementKind,
    checked: bool,
    text: String,
}

/// In-memory stand-in for a page
#[derive(Debug, Clone, Default)]
pub struct MemorySurface {
    elements: HashMap<String, Element>,
}

impl MemorySurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// A surface with every element `options` needs, all inputs unchecked
    pub fn for_options(options: &ViewerOptions) -> Self {
        let mut surface = Self::new()
            .with_element(&options.map_element)
            .with_element(&options.readout_element);
        for basemap in &options.basemaps {
            surface = surface.with_radio(&options.basemap_group, &basemap.control_id, false);
        }
        for layer in &options.feature_layers {
            surface = surface.with_checkbox(&layer.control_id, false);
        }
        surface
    }

    pub fn with_element(mut self, id: &str) -> Self {
        self.insert(id, ElementKind::Plain, false);
        self
    }

    pub fn with_checkbox(mut self, id: &str, checked: bool) -> Self {
        self.insert(id, ElementKind::Checkbox, false);
        self.set_checked(id, checked);
        self
    }

    pub fn with_radio(mut self, group: &str, id: &str, checked: bool) -> Self {
        self.insert(
            id,
            ElementKind::Radio {
                group: group.to_string(),
            },
            false,
        );
        self.set_checked(id, checked);
        self
    }

    pub fn without(mut self, id: &str) -> Self {
        self.elements.remove(id);
        self
    }

    fn insert(&mut self, id: &str, kind: ElementKind, checked: bool) {
        self.elements.insert(
            id.to_string(),
            Element {
                kind,
                checked,
                text: String::new(),
            },
        );
    }

    /// Sets an input's state; checking a radio unchecks the rest of its group.
    /// Returns false if `id` is not an input.
    pub fn set_checked(&mut self, id: &str, checked: bool) -> bool {
        let group = match self.elements.get(id).map(|e| &e.kind) {
            Some(ElementKind::Radio { group }) => Some(group.clone()),
            Some(ElementKind::Checkbox) => None,
            _ => return false,
        };

        if let (Some(group), true) = (&group, checked) {
            for element in self.elements.values_mut() {
                if matches!(&element.kind, ElementKind::Radio { group: g } if g == group) {
                    element.checked = false;
                }
            }
        }

        if let Some(element) = self.elements.get_mut(id) {
            element.checked = checked;
        }
        true
    }

    pub fn text(&self, id: &str) -> Option<&str> {
        self.elements.get(id).map(|e| e.text.as_str())
    }
}

impl ControlSurface for MemorySurface {
    fn has_element(&self, id: &str) -> bool {
        self.elements.contains_key(id)
    }

    fn is_checked(&self, id: &str) -> Option<bool> {
        self.elements
            .get(id)
            .filter(|e| e.kind != ElementKind::Plain)
            .map(|e| e.checked)
    }

    fn set_text(&mut self, id: &str, text: &str) -> Result<()> {
        let element = self
            .elements
            .get_mut(id)
            .ok_or_else(|| MapError::MissingElement(id.to_string()))?;
        element.text = text.to_string();
        Ok(())
    }
}
