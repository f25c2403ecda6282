//! Boundary loading, reprojection, buffering and the intersect filter.

mod boundary;
mod buffer;
mod projection;
mod spatial;

pub use boundary::{BoundaryError, BoundaryLayer, ZctaBoundary};
pub use buffer::{BufferError, BufferRegion, QUADRANT_SEGMENTS};
pub use projection::{to_web_mercator, MAX_MERCATOR_LATITUDE};
pub use spatial::{filter_intersecting, SpatialError};

/// Coordinate reference system carried alongside every geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Crs {
    /// EPSG:4326 longitude/latitude degrees.
    Wgs84,
    /// EPSG:3857 spherical Mercator meters.
    WebMercator,
}

impl Crs {
    pub fn label(&self) -> &'static str {
        match self {
            Crs::Wgs84 => "EPSG:4326",
            Crs::WebMercator => "EPSG:3857",
        }
    }
}
