use super::projection::{to_web_mercator, MAX_MERCATOR_LATITUDE};
use super::Crs;
use geo::{coord, Coord, LineString, Point, Polygon};
use std::f64::consts::TAU;

/// Segments used to approximate each quarter of the circle.
pub const QUADRANT_SEGMENTS: usize = 16;

#[derive(Debug, thiserror::Error)]
pub enum BufferError {
    #[error("buffer radius must be a positive number of meters, got {0}")]
    InvalidRadius(f64),
    #[error("center longitude {0} is outside -180..=180")]
    InvalidLongitude(f64),
    #[error("center latitude {0} is outside the Web Mercator range")]
    InvalidLatitude(f64),
}

/// Circular search region, already in planar meters.
#[derive(Debug, Clone)]
pub struct BufferRegion {
    pub center: Point<f64>,
    pub radius_meters: f64,
    pub polygon: Polygon<f64>,
    pub crs: Crs,
}

impl BufferRegion {
    /// Projects the lon/lat center first, then expands it by `radius_meters`.
    pub fn around(lon: f64, lat: f64, radius_meters: f64) -> Result<Self, BufferError> {
        if !lon.is_finite() || !(-180.0..=180.0).contains(&lon) {
            return Err(BufferError::InvalidLongitude(lon));
        }
        if !lat.is_finite() || lat.abs() > MAX_MERCATOR_LATITUDE {
            return Err(BufferError::InvalidLatitude(lat));
        }
        if !radius_meters.is_finite() || radius_meters <= 0.0 {
            return Err(BufferError::InvalidRadius(radius_meters));
        }

        let center = Point::from(to_web_mercator(coord! { x: lon, y: lat }));
        let polygon = circle(center, radius_meters, QUADRANT_SEGMENTS);

        Ok(Self {
            center,
            radius_meters,
            polygon,
            crs: Crs::WebMercator,
        })
    }
}

fn circle(center: Point<f64>, radius: f64, quadrant_segments: usize) -> Polygon<f64> {
    let steps = quadrant_segments * 4;
    let ring: Vec<Coord<f64>> = (0..=steps)
        .map(|step| {
            let angle = TAU * (step % steps) as f64 / steps as f64;
            coord! {
                x: center.x() + radius * angle.cos(),
                y: center.y() + radius * angle.sin()
            }
        })
        .collect();

    Polygon::new(LineString::from(ring), Vec::new())
}
