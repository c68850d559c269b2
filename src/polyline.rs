//! Encoded polyline codec for route geometries.
//!
//! Routes travel between the routing backend, the map surface and the host
//! as compact encoded polylines (delta coded fixed-point coordinates packed
//! into 5-bit chunks offset into printable ASCII). Decoding happens at the
//! boundary, whenever points are needed for the camera or a pick payload.

use serde::{Deserialize, Serialize};

use crate::error::{GeometryError, PolylineError};
use crate::geo::{self, BoundingBox, Coordinate};

/// Decimal precision used by OSRM and the host (1e5).
pub const DEFAULT_PRECISION: u32 = 5;

const CHUNK_BITS: u32 = 5;
const CHUNK_MASK: i64 = 0x1f;
const CONTINUATION: i64 = 0x20;
const ASCII_OFFSET: i64 = 63;

/// A polyline representing a route geometry as decoded coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Polyline {
    points: Vec<Coordinate>,
}

impl Polyline {
    /// Creates a new Polyline from decoded coordinate points.
    pub fn new(points: Vec<Coordinate>) -> Self {
        Self { points }
    }

    /// Decodes `encoded` with `precision` decimal digits.
    ///
    /// The precision must be the one used to encode the string.
    pub fn decode(encoded: &str, precision: u32) -> Result<Self, PolylineError> {
        let factor = scale(precision);
        let bytes = encoded.as_bytes();
        let mut position = 0;
        let mut lat = 0i64;
        let mut lng = 0i64;
        let mut points = Vec::new();

        while position < bytes.len() {
            lat = accumulate(lat, bytes, &mut position)?;
            if position >= bytes.len() {
                return Err(PolylineError::Truncated { position });
            }
            lng = accumulate(lng, bytes, &mut position)?;
            points.push(Coordinate::new(lat as f64 / factor, lng as f64 / factor));
        }

        Ok(Self { points })
    }

    /// Encodes the points with `precision` decimal digits.
    pub fn encode(&self, precision: u32) -> String {
        let factor = scale(precision);
        let mut encoded = String::with_capacity(self.points.len() * 8);
        let mut previous = (0i64, 0i64);

        for point in &self.points {
            let lat = (point.lat * factor).round() as i64;
            let lng = (point.lng * factor).round() as i64;
            push_value(&mut encoded, lat.wrapping_sub(previous.0));
            push_value(&mut encoded, lng.wrapping_sub(previous.1));
            previous = (lat, lng);
        }

        encoded
    }

    /// Returns a reference to the coordinate points.
    pub fn points(&self) -> &[Coordinate] {
        &self.points
    }

    /// Consumes the polyline and returns the owned coordinate points.
    pub fn into_points(self) -> Vec<Coordinate> {
        self.points
    }

    pub fn bounding_box(&self) -> Result<BoundingBox, GeometryError> {
        geo::bounding_box(&self.points)
    }
}

fn scale(precision: u32) -> f64 {
    10f64.powi(precision as i32)
}

/// Adds the next delta to `total`; a sum outside `i64` is malformed input.
fn accumulate(total: i64, bytes: &[u8], position: &mut usize) -> Result<i64, PolylineError> {
    let start = *position;
    let delta = next_value(bytes, position)?;
    total
        .checked_add(delta)
        .ok_or(PolylineError::Malformed { position: start })
}

fn next_value(bytes: &[u8], position: &mut usize) -> Result<i64, PolylineError> {
    let mut result = 0i64;
    let mut shift = 0u32;

    loop {
        let Some(&byte) = bytes.get(*position) else {
            return Err(PolylineError::Truncated { position: *position });
        };
        let chunk = byte as i64 - ASCII_OFFSET;
        // 12 chunks already exceed any i64 coordinate delta
        if !(0..64).contains(&chunk) || shift > 55 {
            return Err(PolylineError::Malformed { position: *position });
        }
        *position += 1;
        result |= (chunk & CHUNK_MASK) << shift;
        shift += CHUNK_BITS;
        if chunk & CONTINUATION == 0 {
            break;
        }
    }

    Ok(if result & 1 == 1 { !(result >> 1) } else { result >> 1 })
}

fn push_value(out: &mut String, value: i64) {
    let mut zigzag = ((value << 1) ^ (value >> 63)) as u64;
    while zigzag >= CONTINUATION as u64 {
        let chunk = (zigzag & CHUNK_MASK as u64) as i64;
        out.push(((CONTINUATION | chunk) + ASCII_OFFSET) as u8 as char);
        zigzag >>= CHUNK_BITS;
    }
    out.push((zigzag as i64 + ASCII_OFFSET) as u8 as char);
}

#[cfg(test)]
mod tests {
    use super::*;

    const REFERENCE: &str = "_p~iF~ps|U_ulLnnqC_mqNvxq`@";

    fn reference_points() -> Vec<Coordinate> {
        vec![
            Coordinate::new(38.5, -120.2),
            Coordinate::new(40.7, -120.95),
            Coordinate::new(43.252, -126.453),
        ]
    }

    #[test]
    fn test_new_and_points() {
        let points = reference_points();
        let polyline = Polyline::new(points.clone());
        assert_eq!(polyline.points(), &points[..]);
    }

    #[test]
    fn test_into_points() {
        let points = vec![Coordinate::new(38.5, -120.2), Coordinate::new(40.7, -120.95)];
        let polyline = Polyline::new(points.clone());
        assert_eq!(polyline.into_points(), points);
    }

    #[test]
    fn test_encode_reference() {
        let polyline = Polyline::new(reference_points());
        assert_eq!(polyline.encode(DEFAULT_PRECISION), REFERENCE);
    }

    #[test]
    fn test_decode_reference() {
        let polyline = Polyline::decode(REFERENCE, DEFAULT_PRECISION).unwrap();
        for (decoded, expected) in polyline.points().iter().zip(reference_points()) {
            assert!((decoded.lat - expected.lat).abs() < 1e-9);
            assert!((decoded.lng - expected.lng).abs() < 1e-9);
        }
        assert_eq!(polyline.points().len(), 3);
    }

    #[test]
    fn test_empty_polyline() {
        let polyline = Polyline::decode("", DEFAULT_PRECISION).unwrap();
        assert!(polyline.points().is_empty());
        assert_eq!(Polyline::new(vec![]).encode(DEFAULT_PRECISION), "");
        assert_eq!(polyline.bounding_box(), Err(GeometryError::EmptyInput));
    }

    #[test]
    fn test_invalid_byte_is_malformed() {
        // '!' sits below the printable offset
        let err = Polyline::decode("_p~iF!ps|U", DEFAULT_PRECISION).unwrap_err();
        assert_eq!(err, PolylineError::Malformed { position: 5 });
    }

    #[test]
    fn test_missing_longitude_is_truncated() {
        let err = Polyline::decode("_p~iF", DEFAULT_PRECISION).unwrap_err();
        assert_eq!(err, PolylineError::Truncated { position: 5 });
    }

    #[test]
    fn test_dangling_continuation_is_truncated() {
        // '_' carries the continuation bit with nothing after it
        let err = Polyline::decode("_p~iF~ps|U_", DEFAULT_PRECISION).unwrap_err();
        assert!(matches!(err, PolylineError::Truncated { .. }));
    }

    #[test]
    fn test_overflowing_deltas_are_malformed() {
        // Every group is a valid maximal delta; their running sum leaves i64
        let encoded = "~~~~~~~~~~~N".repeat(80);
        let err = Polyline::decode(&encoded, DEFAULT_PRECISION).unwrap_err();
        assert!(matches!(err, PolylineError::Malformed { .. }));
    }

    #[test]
    fn test_encode_extreme_values_does_not_panic() {
        let polyline = Polyline::new(vec![
            Coordinate::new(f64::MAX, f64::MIN),
            Coordinate::new(f64::MIN, f64::NAN),
            Coordinate::new(f64::INFINITY, 0.0),
        ]);
        let encoded = polyline.encode(DEFAULT_PRECISION);
        assert!(encoded.is_ascii());
    }

    #[test]
    fn test_precision_six() {
        let polyline = Polyline::new(vec![Coordinate::new(48.858093, 2.294694)]);
        let encoded = polyline.encode(6);
        let decoded = Polyline::decode(&encoded, 6).unwrap();
        assert!((decoded.points()[0].lat - 48.858093).abs() < 1e-7);
        assert!((decoded.points()[0].lng - 2.294694).abs() < 1e-7);
    }

    #[test]
    fn test_single_point_bounding_box() {
        let point = Coordinate::new(48.85, 2.35);
        let bbox = Polyline::new(vec![point]).bounding_box().unwrap();
        assert_eq!(bbox.southwest, point);
        assert_eq!(bbox.northeast, point);
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        fn valid_coord() -> impl Strategy<Value = Coordinate> {
            (-90.0..=90.0, -180.0..=180.0).prop_map(|(lat, lng)| Coordinate { lat, lng })
        }

        proptest! {
            #[test]
            fn prop_round_trip_within_precision(
                points in prop::collection::vec(valid_coord(), 0..40),
                precision in 1u32..=7
            ) {
                let encoded = Polyline::new(points.clone()).encode(precision);
                let decoded = Polyline::decode(&encoded, precision).unwrap();
                let tolerance = 1.0 / 10f64.powi(precision as i32);

                prop_assert_eq!(decoded.points().len(), points.len());
                for (got, want) in decoded.points().iter().zip(&points) {
                    prop_assert!((got.lat - want.lat).abs() <= tolerance);
                    prop_assert!((got.lng - want.lng).abs() <= tolerance);
                }
            }

            #[test]
            fn prop_decode_never_panics(input in "\\PC{0,40}") {
                let _ = Polyline::decode(&input, DEFAULT_PRECISION);
            }

            #[test]
            fn prop_long_printable_input_never_panics(input in "[?-~]{0,2000}") {
                let _ = Polyline::decode(&input, DEFAULT_PRECISION);
            }
        }
    }
}
