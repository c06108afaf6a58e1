//! Core constants shared by the built-in viewer profiles.
//! Keeping them in a single place makes it easier to tweak the page defaults.

/// Default square tile size in pixels.
pub const TILE_SIZE: u32 = 256;

/// Highest zoom level a viewer configuration may ask for.
pub const MAX_ZOOM: f64 = 22.0;

/// Initial map center as (longitude, latitude): downtown Yarmouth, Nova Scotia.
pub const INITIAL_CENTER: (f64, f64) = (-66.1174, 43.8375);

/// Initial zoom level.
pub const INITIAL_ZOOM: f64 = 12.0;

/// Decimal places in the coordinate readout.
pub const COORDINATE_PRECISION: usize = 5;

/// Decimal places used by the first revision of the viewer.
pub const CLASSIC_COORDINATE_PRECISION: usize = 4;

/// Upper bound on readout precision; beyond this the digits are noise.
pub const MAX_COORDINATE_PRECISION: usize = 10;

/// Id of the element hosting the map.
pub const MAP_ELEMENT_ID: &str = "map";

/// Id of the element receiving the coordinate readout.
pub const READOUT_ELEMENT_ID: &str = "coords";

/// Name of the basemap radio group.
pub const BASEMAP_GROUP: &str = "basemap";
