//! Style catalog for feature layers
//!
//! Styles are plain data. A layer carries an ordered list of descriptors that a
//! renderer paints back-to-front, which is how the glow effects are built: a
//! wide, faint pass underneath a narrow, strong one.

use crate::prelude::HashMap;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::fmt;

/// RGBA color, alpha as 0.0 to 1.0 the way CSS writes it
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f32,
}

impl Color {
    pub const RED: Color = Color::rgb(255, 0, 0);
    pub const BLUE: Color = Color::rgb(0, 0, 255);
    pub const WHITE: Color = Color::rgb(255, 255, 255);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: f32) -> Self {
        Self { r, g, b, a }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineCap {
    #[default]
    Butt,
    Round,
    Square,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineJoin {
    Bevel,
    #[default]
    Round,
    Miter,
}

/// Area or marker fill
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fill {
    pub color: Color,
    /// Multiplied into the color's own alpha
    pub opacity: f32,
}

impl Fill {
    pub fn new(color: Color) -> Self {
        Self {
            color,
            opacity: 1.0,
        }
    }
}

/// Outline or line stroke
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stroke {
    pub color: Color,
    pub opacity: f32,
    pub width: f32,
    /// Alternating dash/gap lengths in pixels; empty for a solid line
    pub dash: Vec<f32>,
    pub cap: LineCap,
    pub join: LineJoin,
}

impl Stroke {
    pub fn new(color: Color, width: f32) -> Self {
        Self {
            color,
            opacity: 1.0,
            width,
            dash: Vec::new(),
            cap: LineCap::default(),
            join: LineJoin::default(),
        }
    }

    pub fn with_dash(mut self, dash: &[f32]) -> Self {
        self.dash = dash.to_vec();
        self
    }

    pub fn with_cap(mut self, cap: LineCap) -> Self {
        self.cap = cap;
        self
    }

    pub fn with_opacity(mut self, opacity: f32) -> Self {
        self.opacity = opacity.clamp(0.0, 1.0);
        self
    }

    pub fn is_dashed(&self) -> bool {
        !self.dash.is_empty()
    }
}

/// One paint pass for a feature layer
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct StyleDescriptor {
    pub fill: Option<Fill>,
    pub stroke: Option<Stroke>,
    /// Marker radius for point geometries
    pub radius: Option<f32>,
}

impl StyleDescriptor {
    /// A circle marker for point features
    pub fn circle(radius: f32, fill: Fill) -> Self {
        Self {
            fill: Some(fill),
            stroke: None,
            radius: Some(radius),
        }
    }

    pub fn line(stroke: Stroke) -> Self {
        Self {
            fill: None,
            stroke: Some(stroke),
            radius: None,
        }
    }

    pub fn area(fill: Fill, stroke: Stroke) -> Self {
        Self {
            fill: Some(fill),
            stroke: Some(stroke),
            radius: None,
        }
    }

    pub fn with_stroke(mut self, stroke: Stroke) -> Self {
        self.stroke = Some(stroke);
        self
    }
}

static BUILTIN: Lazy<StyleCatalog> = Lazy::new(|| {
    let gold = Color::rgb(255, 196, 0);
    let trail_green = Color::rgb(0, 200, 120);
    let water_blue = Color::rgb(30, 136, 229);

    let mut catalog = StyleCatalog::empty();

    catalog.insert(
        "poi",
        vec![StyleDescriptor::circle(5.0, Fill::new(Color::RED))],
    );
    catalog.insert(
        "roads",
        vec![StyleDescriptor::line(Stroke::new(Color::BLUE, 2.0))],
    );
    catalog.insert(
        "points",
        vec![
            StyleDescriptor::circle(
                10.0,
                Fill {
                    color: gold,
                    opacity: 0.3,
                },
            ),
            StyleDescriptor::circle(
                5.0,
                Fill {
                    color: gold,
                    opacity: 0.9,
                },
            )
            .with_stroke(Stroke::new(Color::WHITE, 1.0)),
        ],
    );
    catalog.insert(
        "trails",
        vec![
            StyleDescriptor::line(
                Stroke::new(trail_green, 8.0)
                    .with_opacity(0.3)
                    .with_dash(&[12.0, 8.0])
                    .with_cap(LineCap::Round),
            ),
            StyleDescriptor::line(
                Stroke::new(trail_green, 3.0)
                    .with_dash(&[6.0, 6.0])
                    .with_cap(LineCap::Round),
            ),
        ],
    );
    catalog.insert(
        "polygons",
        vec![StyleDescriptor::area(
            Fill {
                color: water_blue,
                opacity: 0.2,
            },
            Stroke::new(water_blue, 2.0).with_opacity(0.9),
        )],
    );

    catalog
});

/// Pure mapping from style key to the ordered passes used to draw a layer
#[derive(Debug, Clone)]
pub struct StyleCatalog {
    styles: HashMap<String, Vec<StyleDescriptor>>,
}

impl StyleCatalog {
    pub fn empty() -> Self {
        Self {
            styles: HashMap::default(),
        }
    }

    /// The styles used by the built-in viewer profiles
    pub fn builtin() -> &'static StyleCatalog {
        &BUILTIN
    }

    /// Registers (or replaces) the passes for a key. Empty lists are ignored,
    /// every layer needs at least one pass.
    pub fn insert(&mut self, key: &str, passes: Vec<StyleDescriptor>) {
        if passes.is_empty() {
            return;
        }
        self.styles.insert(key.to_string(), passes);
    }

    pub fn get(&self, key: &str) -> Option<&[StyleDescriptor]> {
        self.styles.get(key).map(Vec::as_slice)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.styles.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.styles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.styles.is_empty()
    }
}

impl Default for StyleCatalog {
    fn default() -> Self {
        Self::builtin().clone()
    }
}
