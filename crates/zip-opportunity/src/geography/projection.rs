use geo::{coord, Coord, MapCoords, MultiPolygon};
use std::f64::consts::FRAC_PI_4;

const EARTH_RADIUS_METERS: f64 = 6_378_137.0;

/// Latitude at which spherical Mercator becomes square.
pub const MAX_MERCATOR_LATITUDE: f64 = 85.051_128_779_806_59;

/// Forward EPSG:4326 -> EPSG:3857 transform. Latitudes beyond the
/// Mercator limit are clamped to it.
pub fn to_web_mercator(lonlat: Coord<f64>) -> Coord<f64> {
    let lat = lonlat
        .y
        .clamp(-MAX_MERCATOR_LATITUDE, MAX_MERCATOR_LATITUDE)
        .to_radians();

    coord! {
        x: EARTH_RADIUS_METERS * lonlat.x.to_radians(),
        y: EARTH_RADIUS_METERS * (FRAC_PI_4 + lat / 2.0).tan().ln()
    }
}

pub(crate) fn project_multi_polygon(geometry: &MultiPolygon<f64>) -> MultiPolygon<f64> {
    geometry.map_coords(to_web_mercator)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 0.01,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn origin_maps_to_origin() {
        let projected = to_web_mercator(coord! { x: 0.0, y: 0.0 });
        assert_close(projected.x, 0.0);
        assert_close(projected.y, 0.0);
    }

    #[test]
    fn antimeridian_and_limit_latitude_hit_extent() {
        let projected = to_web_mercator(coord! { x: 180.0, y: MAX_MERCATOR_LATITUDE });
        assert_close(projected.x, 20_037_508.34);
        assert_close(projected.y, 20_037_508.34);
    }

    #[test]
    fn raleigh_area_projects_to_known_meters() {
        let projected = to_web_mercator(coord! { x: -78.8260, y: 35.8587 });
        assert!((projected.x - -8_774_870.18).abs() < 0.5, "x = {}", projected.x);
        assert!((projected.y - 4_281_196.09).abs() < 0.5, "y = {}", projected.y);
    }
}
