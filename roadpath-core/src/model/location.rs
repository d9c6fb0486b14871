//! Request-side locations: raw GPS coordinates and bounding boxes

use std::fmt;
use std::str::FromStr;

use geo::Point;
use serde::{Deserialize, Serialize};

use crate::Error;

/// WGS84 coordinate as received from a caller
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub lat: f64,
    pub lon: f64,
}

impl Coordinate {
    pub fn new(lat: f64, lon: f64) -> Result<Self, Error> {
        let coordinate = Self { lat, lon };
        coordinate.validate()?;
        Ok(coordinate)
    }

    /// Checks latitude is within [-90, 90] and longitude within [-180, 180]
    pub fn validate(&self) -> Result<(), Error> {
        if !self.lat.is_finite() || !(-90.0..=90.0).contains(&self.lat) {
            return Err(Error::InvalidInput(format!(
                "latitude {} is outside [-90, 90]",
                self.lat
            )));
        }
        if !self.lon.is_finite() || !(-180.0..=180.0).contains(&self.lon) {
            return Err(Error::InvalidInput(format!(
                "longitude {} is outside [-180, 180]",
                self.lon
            )));
        }
        Ok(())
    }

    pub fn point(&self) -> Point<f64> {
        Point::new(self.lon, self.lat)
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.lat, self.lon)
    }
}

impl FromStr for Coordinate {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (lat, lon) = s
            .split_once(',')
            .ok_or_else(|| Error::InvalidInput(format!("expected 'lat,lon', got '{s}'")))?;
        let lat = lat
            .trim()
            .parse::<f64>()
            .map_err(|e| Error::InvalidInput(format!("bad latitude '{lat}': {e}")))?;
        let lon = lon
            .trim()
            .parse::<f64>()
            .map_err(|e| Error::InvalidInput(format!("bad longitude '{lon}': {e}")))?;
        Coordinate::new(lat, lon)
    }
}

/// Axis-aligned geographic box in degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min_lat: f64,
    pub min_lon: f64,
    pub max_lat: f64,
    pub max_lon: f64,
}

impl BoundingBox {
    pub fn new(min_lat: f64, min_lon: f64, max_lat: f64, max_lon: f64) -> Self {
        Self {
            min_lat: min_lat.min(max_lat),
            min_lon: min_lon.min(max_lon),
            max_lat: min_lat.max(max_lat),
            max_lon: min_lon.max(max_lon),
        }
    }

    /// Smallest box around all points, `None` for an empty input
    pub fn from_points<I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = Point<f64>>,
    {
        let mut min_lat = f64::MAX;
        let mut min_lon = f64::MAX;
        let mut max_lat = f64::MIN;
        let mut max_lon = f64::MIN;
        let mut seen = false;

        for point in points {
            seen = true;
            min_lat = min_lat.min(point.y());
            min_lon = min_lon.min(point.x());
            max_lat = max_lat.max(point.y());
            max_lon = max_lon.max(point.x());
        }

        seen.then_some(Self {
            min_lat,
            min_lon,
            max_lat,
            max_lon,
        })
    }

    /// Box grown by `margin_deg` on every side, clamped to valid ranges
    #[must_use]
    pub fn padded(&self, margin_deg: f64) -> Self {
        Self {
            min_lat: (self.min_lat - margin_deg).max(-90.0),
            min_lon: (self.min_lon - margin_deg).max(-180.0),
            max_lat: (self.max_lat + margin_deg).min(90.0),
            max_lon: (self.max_lon + margin_deg).min(180.0),
        }
    }

    pub fn contains(&self, lat: f64, lon: f64) -> bool {
        (self.min_lat..=self.max_lat).contains(&lat) && (self.min_lon..=self.max_lon).contains(&lon)
    }

    /// Lower and upper corners as `[lon, lat]`
    pub fn corners(&self) -> ([f64; 2], [f64; 2]) {
        ([self.min_lon, self.min_lat], [self.max_lon, self.max_lat])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_out_of_range_coordinates() {
        assert!(Coordinate::new(45.0, 7.0).is_ok());
        assert!(matches!(
            Coordinate::new(91.0, 0.0),
            Err(Error::InvalidInput(_))
        ));
        assert!(Coordinate::new(0.0, -180.5).is_err());
        assert!(Coordinate::new(f64::NAN, 0.0).is_err());
    }

    #[test]
    fn parses_lat_lon_pairs() {
        let coordinate: Coordinate = " 48.85, 2.35 ".parse().unwrap();
        assert_eq!(coordinate.lat, 48.85);
        assert_eq!(coordinate.lon, 2.35);
        assert!("48.85".parse::<Coordinate>().is_err());
        assert!("abc,2".parse::<Coordinate>().is_err());
        assert!("100,2".parse::<Coordinate>().is_err());
    }

    #[test]
    fn bounding_box_padding_is_clamped() {
        let bbox = BoundingBox::from_points([Point::new(179.8, 89.9), Point::new(170.0, 80.0)])
            .unwrap()
            .padded(0.5);
        assert_eq!(bbox.max_lat, 90.0);
        assert_eq!(bbox.max_lon, 180.0);
        assert_eq!(bbox.min_lat, 79.5);
        assert_eq!(bbox.min_lon, 169.5);
        assert!(bbox.contains(85.0, 175.0));
        assert!(!bbox.contains(70.0, 175.0));
    }

    #[test]
    fn empty_points_have_no_box() {
        assert!(BoundingBox::from_points(Vec::<Point<f64>>::new()).is_none());
    }
}
