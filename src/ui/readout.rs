use crate::core::geo::{LatLng, Point};
use rust_decimal::{Decimal, RoundingStrategy};

/// Formats pointer positions as `"<lon>, <lat>"` with a fixed number of decimals
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CoordinateReadout {
    precision: usize,
}

impl CoordinateReadout {
    pub fn new(precision: usize) -> Self {
        Self { precision }
    }

    pub fn precision(&self) -> usize {
        self.precision
    }

    /// Projected coordinate to geographic, longitude wrapped into [-180, 180]
    pub fn to_lon_lat(coordinate: Point) -> LatLng {
        let lat_lng = LatLng::from_mercator(coordinate);
        LatLng::new(lat_lng.lat, LatLng::wrap_lng(lat_lng.lng))
    }

    pub fn format(&self, lat_lng: &LatLng) -> String {
        format!(
            "{}, {}",
            self.fixed(lat_lng.lng),
            self.fixed(lat_lng.lat)
        )
    }

    /// Fixed-point text with exact halves rounded away from zero
    fn fixed(&self, value: f64) -> String {
        let dp = self.precision as u32;
        match Decimal::from_f64_retain(value) {
            Some(decimal) => {
                let mut rounded =
                    decimal.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero);
                rounded.rescale(dp);
                rounded.to_string()
            }
            None => format!("{:.prec$}", value, prec = self.precision),
        }
    }

    pub fn format_coordinate(&self, coordinate: Point) -> String {
        self.format(&Self::to_lon_lat(coordinate))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_five_decimals() {
        let readout = CoordinateReadout::new(5);
        assert_eq!(
            readout.format(&LatLng::from_lon_lat(-66.1296, 43.8160)),
            "-66.12960, 43.81600"
        );
    }

    #[test]
    fn test_four_decimals() {
        let readout = CoordinateReadout::new(4);
        assert_eq!(
            readout.format(&LatLng::from_lon_lat(-66.11744, 43.83756)),
            "-66.1174, 43.8376"
        );
    }

    #[test]
    fn test_exact_halves_round_away_from_zero() {
        let readout = CoordinateReadout::new(5);
        assert_eq!(
            readout.format(&LatLng::from_lon_lat(-66.015625, 43.0)),
            "-66.01563, 43.00000"
        );
        assert_eq!(
            CoordinateReadout::new(0).format(&LatLng::from_lon_lat(-2.5, 0.5)),
            "-3, 1"
        );

        let classic = CoordinateReadout::new(4);
        assert_eq!(
            classic.format(&LatLng::from_lon_lat(-66.03125, 44.03125)),
            "-66.0313, 44.0313"
        );
    }

    #[test]
    fn test_projected_round_trip() {
        let readout = CoordinateReadout::new(5);
        let coordinate = LatLng::from_lon_lat(-66.1296, 43.8160).to_mercator();
        assert_eq!(readout.format_coordinate(coordinate), "-66.12960, 43.81600");
    }

    #[test]
    fn test_longitude_wraps_past_antimeridian() {
        let coordinate = LatLng::from_lon_lat(190.0, 10.0).to_mercator();
        let lat_lng = CoordinateReadout::to_lon_lat(coordinate);
        assert!((lat_lng.lng + 170.0).abs() < 1e-9);
    }
}
