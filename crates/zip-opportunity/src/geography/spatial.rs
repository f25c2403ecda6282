use super::boundary::{BoundaryLayer, ZctaBoundary};
use super::buffer::BufferRegion;
use geo::Intersects;
use tracing::info;

#[derive(Debug, thiserror::Error)]
pub enum SpatialError {
    #[error("boundary layer is in {layer} but the buffer is in {buffer}; reproject before filtering")]
    CrsMismatch { layer: &'static str, buffer: &'static str },
}

/// Keeps the boundaries that touch or overlap the buffer, in input order.
pub fn filter_intersecting(
    layer: &BoundaryLayer,
    region: &BufferRegion,
) -> Result<Vec<ZctaBoundary>, SpatialError> {
    if layer.crs != region.crs {
        return Err(SpatialError::CrsMismatch {
            layer: layer.crs.label(),
            buffer: region.crs.label(),
        });
    }

    let matched: Vec<ZctaBoundary> = layer
        .boundaries
        .iter()
        .filter(|boundary| boundary.geometry.intersects(&region.polygon))
        .cloned()
        .collect();

    info!(
        candidates = layer.len(),
        matched = matched.len(),
        radius_meters = region.radius_meters,
        "filtered ZCTAs to buffer region"
    );
    Ok(matched)
}
