//! GeoJSON decoding for feature layers
//!
//! Only the pieces a feature layer needs: geometries, features with their
//! properties, and the three top-level shapes a file can have.

use crate::core::geo::{LatLng, LatLngBounds};
use crate::{MapError, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// `[lon, lat]` with any further ordinates (altitude, measure) ignored
pub type Position = Vec<f64>;

/// GeoJSON geometry types
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum GeoJsonGeometry {
    Point {
        coordinates: Position,
    },
    LineString {
        coordinates: Vec<Position>,
    },
    Polygon {
        coordinates: Vec<Vec<Position>>,
    },
    MultiPoint {
        coordinates: Vec<Position>,
    },
    MultiLineString {
        coordinates: Vec<Vec<Position>>,
    },
    MultiPolygon {
        coordinates: Vec<Vec<Vec<Position>>>,
    },
    GeometryCollection {
        geometries: Vec<GeoJsonGeometry>,
    },
}

/// GeoJSON feature with geometry and properties
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoJsonFeature {
    #[serde(default)]
    pub id: Option<Value>,
    #[serde(default)]
    pub geometry: Option<GeoJsonGeometry>,
    #[serde(default)]
    pub properties: Option<Map<String, Value>>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
struct FeatureCollection {
    features: Vec<GeoJsonFeature>,
}

/// Root GeoJSON object
#[derive(Debug, Clone, PartialEq)]
pub enum GeoJson {
    Feature(GeoJsonFeature),
    FeatureCollection(Vec<GeoJsonFeature>),
    Geometry(GeoJsonGeometry),
}

impl GeoJson {
    /// Parses a GeoJSON document, checking every position has a longitude and
    /// a latitude
    pub fn parse(text: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(text)
            .map_err(|e| MapError::ParseError(format!("Invalid GeoJSON: {}", e)))?;

        let kind = value
            .get("type")
            .and_then(Value::as_str)
            .ok_or_else(|| MapError::ParseError("GeoJSON object has no type".into()))?
            .to_string();

        let decode_err = |e: serde_json::Error| MapError::ParseError(format!("Invalid {}: {}", kind, e));
        let geojson = match kind.as_str() {
            "FeatureCollection" => {
                let collection: FeatureCollection =
                    serde_json::from_value(value).map_err(decode_err)?;
                GeoJson::FeatureCollection(collection.features)
            }
            "Feature" => GeoJson::Feature(serde_json::from_value(value).map_err(decode_err)?),
            _ => GeoJson::Geometry(serde_json::from_value(value).map_err(decode_err)?),
        };

        geojson.check_positions()?;
        Ok(geojson)
    }

    /// Flattens to a list of features; a bare geometry becomes one feature
    pub fn into_features(self) -> Vec<GeoJsonFeature> {
        match self {
            GeoJson::FeatureCollection(features) => features,
            GeoJson::Feature(feature) => vec![feature],
            GeoJson::Geometry(geometry) => vec![GeoJsonFeature {
                id: None,
                geometry: Some(geometry),
                properties: None,
            }],
        }
    }

    fn check_positions(&self) -> Result<()> {
        let geometries: Vec<&GeoJsonGeometry> = match self {
            GeoJson::FeatureCollection(features) => {
                features.iter().filter_map(|f| f.geometry.as_ref()).collect()
            }
            GeoJson::Feature(feature) => feature.geometry.iter().collect(),
            GeoJson::Geometry(geometry) => vec![geometry],
        };

        let mut bad = None;
        for geometry in geometries {
            geometry.for_each_position(&mut |p| {
                if bad.is_none() && position_to_lat_lng(p).is_none() {
                    bad = Some(p.clone());
                }
            });
        }

        match bad {
            Some(p) => Err(MapError::ParseError(format!("Invalid position {:?}", p))),
            None => Ok(()),
        }
    }
}

fn position_to_lat_lng(position: &[f64]) -> Option<LatLng> {
    match position {
        [lon, lat, ..] if lon.is_finite() && lat.is_finite() => Some(LatLng::from_lon_lat(*lon, *lat)),
        _ => None,
    }
}

impl GeoJsonGeometry {
    fn for_each_position<F: FnMut(&Position)>(&self, f: &mut F) {
        match self {
            GeoJsonGeometry::Point { coordinates } => f(coordinates),
            GeoJsonGeometry::LineString { coordinates }
            | GeoJsonGeometry::MultiPoint { coordinates } => coordinates.iter().for_each(f),
            GeoJsonGeometry::Polygon { coordinates }
            | GeoJsonGeometry::MultiLineString { coordinates } => {
                coordinates.iter().flatten().for_each(f)
            }
            GeoJsonGeometry::MultiPolygon { coordinates } => {
                coordinates.iter().flatten().flatten().for_each(f)
            }
            GeoJsonGeometry::GeometryCollection { geometries } => {
                for geometry in geometries {
                    geometry.for_each_position(f);
                }
            }
        }
    }

    /// Every position of the geometry, holes included
    pub fn to_lat_lng_points(&self) -> Vec<LatLng> {
        let mut points = Vec::new();
        self.for_each_position(&mut |p| {
            if let Some(point) = position_to_lat_lng(p) {
                points.push(point);
            }
        });
        points
    }

    pub fn bounds(&self) -> Option<LatLngBounds> {
        LatLngBounds::from_points(&self.to_lat_lng_points())
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            GeoJsonGeometry::Point { .. } => "Point",
            GeoJsonGeometry::LineString { .. } => "LineString",
            GeoJsonGeometry::Polygon { .. } => "Polygon",
            GeoJsonGeometry::MultiPoint { .. } => "MultiPoint",
            GeoJsonGeometry::MultiLineString { .. } => "MultiLineString",
            GeoJsonGeometry::MultiPolygon { .. } => "MultiPolygon",
            GeoJsonGeometry::GeometryCollection { .. } => "GeometryCollection",
        }
    }
}

impl GeoJsonFeature {
    pub fn property(&self, key: &str) -> Option<&Value> {
        self.properties.as_ref().and_then(|p| p.get(key))
    }

    pub fn bounds(&self) -> Option<LatLngBounds> {
        self.geometry.as_ref().and_then(GeoJsonGeometry::bounds)
    }
}
