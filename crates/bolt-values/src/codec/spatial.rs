//! Point struct encoding/decoding.
//!
//! `X` carries `(crs, x, y)`, `Y` carries `(crs, x, y, z)`. The CRS code is
//! an integer, coordinates are floats.

use crate::codec::header::{tag, write_header};
use crate::codec::primitives::{Reader, Writer};
use crate::codec::registry::StructDecoder;
use crate::codec::value::ValueReader;
use crate::error::{DecodeError, EncodeError};
use crate::model::{Crs, Point, Value};

/// Decoders for 2D and 3D points.
pub fn decoders() -> [&'static dyn StructDecoder; 2] {
    [&POINT_2D, &POINT_3D]
}

static POINT_2D: PointDecoder = PointDecoder { dimension: 2 };
static POINT_3D: PointDecoder = PointDecoder { dimension: 3 };

/// Decodes a point with a fixed number of coordinates.
#[derive(Debug, Clone, Copy)]
pub struct PointDecoder {
    dimension: usize,
}

impl StructDecoder for PointDecoder {
    fn tag(&self) -> u8 {
        if self.dimension == 3 {
            tag::POINT_3D
        } else {
            tag::POINT_2D
        }
    }

    fn arity(&self) -> u16 {
        self.dimension as u16 + 1
    }

    fn decode(&self, reader: &mut Reader<'_>, _: &ValueReader<'_>) -> Result<Value, DecodeError> {
        let code = reader.read_int("crs")?;
        let mut coords = [0.0; 3];
        for coord in coords.iter_mut().take(self.dimension) {
            *coord = reader.read_float("coordinate")?;
        }
        let coords = &coords[..self.dimension];

        let crs = i32::try_from(code)
            .ok()
            .and_then(|code| Crs::from_code(code).ok())
            .ok_or_else(|| DecodeError::argument("crs", format!("unknown coordinate reference system code {}", code)))?;
        if crs.dimension() != self.dimension {
            return Err(DecodeError::argument(
                "crs",
                format!("{} is not a {}D coordinate reference system", crs, self.dimension),
            ));
        }

        let point = Point::new(crs, coords).map_err(|e| {
            DecodeError::argument("coordinates", format!("{} {:?}: {}", crs, coords, e))
        })?;
        Ok(Value::Point(point))
    }
}

/// Writes a point as `X` or `Y` depending on its dimension.
pub fn write_point(writer: &mut Writer, point: &Point) -> Result<(), EncodeError> {
    let coords = point.coordinates();
    let tag = if coords.len() == 3 {
        tag::POINT_3D
    } else {
        tag::POINT_2D
    };
    write_header(writer, tag, coords.len() as u16 + 1)?;
    writer.write_int(point.crs().code() as i64);
    for &coord in coords {
        writer.write_float(coord);
    }
    Ok(())
}
