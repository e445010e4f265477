//! Spatial point values and coordinate reference systems.

use std::fmt;

use crate::error::ValueError;

/// A coordinate reference system known to the codec.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Crs {
    code: i32,
    name: &'static str,
    dimension: usize,
    geographic: bool,
}

impl Crs {
    /// WGS-84 longitude/latitude.
    pub const WGS84: Crs = Crs {
        code: 4326,
        name: "wgs-84",
        dimension: 2,
        geographic: true,
    };

    /// WGS-84 longitude/latitude/height.
    pub const WGS84_3D: Crs = Crs {
        code: 4979,
        name: "wgs-84-3d",
        dimension: 3,
        geographic: true,
    };

    pub const CARTESIAN: Crs = Crs {
        code: 7203,
        name: "cartesian",
        dimension: 2,
        geographic: false,
    };

    pub const CARTESIAN_3D: Crs = Crs {
        code: 9157,
        name: "cartesian-3d",
        dimension: 3,
        geographic: false,
    };

    const ALL: [Crs; 4] = [Crs::WGS84, Crs::WGS84_3D, Crs::CARTESIAN, Crs::CARTESIAN_3D];

    /// Resolves a CRS by its EPSG/SR-ORG code.
    pub fn from_code(code: i32) -> Result<Crs, ValueError> {
        Crs::ALL
            .into_iter()
            .find(|crs| crs.code == code)
            .ok_or(ValueError::UnknownCrs { code })
    }

    pub fn code(&self) -> i32 {
        self.code
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Number of coordinates a point in this CRS has.
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// True for longitude/latitude systems.
    pub fn is_geographic(&self) -> bool {
        self.geographic
    }
}

impl fmt::Display for Crs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.code)
    }
}

/// A 2D or 3D point in a known CRS.
///
/// Construction validates the coordinates, so every `Point` is encodable.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    crs: Crs,
    coords: [f64; 3],
}

impl Point {
    /// Creates a point, checking dimensionality and coordinate domain.
    ///
    /// For geographic systems the first coordinate is longitude and the
    /// second latitude.
    pub fn new(crs: Crs, coordinates: &[f64]) -> Result<Point, ValueError> {
        if coordinates.len() != crs.dimension {
            return Err(ValueError::DimensionMismatch {
                crs: crs.name,
                expected: crs.dimension,
                actual: coordinates.len(),
            });
        }
        if coordinates.iter().any(|c| c.is_nan()) {
            return Err(ValueError::CoordinateIsNan);
        }
        if crs.is_geographic() {
            let (lon, lat) = (coordinates[0], coordinates[1]);
            if !(-180.0..=180.0).contains(&lon) {
                return Err(ValueError::LongitudeOutOfRange { crs: crs.name, lon });
            }
            if !(-90.0..=90.0).contains(&lat) {
                return Err(ValueError::LatitudeOutOfRange { crs: crs.name, lat });
            }
        }

        let mut coords = [0.0; 3];
        coords[..coordinates.len()].copy_from_slice(coordinates);
        Ok(Point { crs, coords })
    }

    /// Creates a 2D cartesian point.
    pub fn cartesian(x: f64, y: f64) -> Result<Point, ValueError> {
        Point::new(Crs::CARTESIAN, &[x, y])
    }

    /// Creates a 2D WGS-84 point.
    pub fn wgs84(longitude: f64, latitude: f64) -> Result<Point, ValueError> {
        Point::new(Crs::WGS84, &[longitude, latitude])
    }

    pub fn crs(&self) -> Crs {
        self.crs
    }

    pub fn coordinates(&self) -> &[f64] {
        &self.coords[..self.crs.dimension]
    }

    pub fn x(&self) -> f64 {
        self.coords[0]
    }

    pub fn y(&self) -> f64 {
        self.coords[1]
    }

    /// Third coordinate, present only for 3D systems.
    pub fn z(&self) -> Option<f64> {
        (self.crs.dimension == 3).then_some(self.coords[2])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_crs_lookup() {
        assert_eq!(Crs::from_code(4326), Ok(Crs::WGS84));
        assert_eq!(Crs::from_code(9157), Ok(Crs::CARTESIAN_3D));
        assert_eq!(Crs::from_code(-999), Err(ValueError::UnknownCrs { code: -999 }));
    }

    #[test]
    fn test_point_dimension_mismatch() {
        let err = Point::new(Crs::CARTESIAN_3D, &[1.0, 2.0]).unwrap_err();
        assert_eq!(
            err,
            ValueError::DimensionMismatch {
                crs: "cartesian-3d",
                expected: 3,
                actual: 2
            }
        );
    }

    #[test]
    fn test_point_geographic_range() {
        assert!(Point::wgs84(-122.4194, 37.7749).is_ok());
        assert!(matches!(
            Point::wgs84(181.0, 0.0),
            Err(ValueError::LongitudeOutOfRange { .. })
        ));
        assert!(matches!(
            Point::wgs84(0.0, -91.0),
            Err(ValueError::LatitudeOutOfRange { .. })
        ));
        // cartesian coordinates are unbounded
        assert!(Point::cartesian(1e12, -1e12).is_ok());
    }

    #[test]
    fn test_point_nan_rejected() {
        assert_eq!(
            Point::new(Crs::CARTESIAN_3D, &[0.0, 0.0, f64::NAN]),
            Err(ValueError::CoordinateIsNan)
        );
    }

    #[test]
    fn test_point_accessors() {
        let p = Point::new(Crs::CARTESIAN_3D, &[1.0, 2.0, 3.0]).unwrap();
        assert_eq!(p.coordinates(), &[1.0, 2.0, 3.0]);
        assert_eq!(p.z(), Some(3.0));

        let p = Point::cartesian(1.0, 2.0).unwrap();
        assert_eq!(p.coordinates(), &[1.0, 2.0]);
        assert_eq!(p.z(), None);
    }
}
