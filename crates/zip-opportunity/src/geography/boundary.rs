use super::projection::project_multi_polygon;
use super::Crs;
use crate::zip_code::ZipCode;
use geo::{coord, LineString, MultiPolygon, Polygon};
use geojson::{GeoJson, PolygonType};
use serde_json::Value as JsonValue;
use shapefile::dbase::FieldValue;
use shapefile::Shape;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

#[derive(Debug, thiserror::Error)]
pub enum BoundaryError {
    #[error("failed to read boundary file {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid shapefile {path}: {source}")]
    Shapefile {
        path: PathBuf,
        source: shapefile::Error,
    },
    #[error("invalid GeoJSON {path}: {source}")]
    GeoJson {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("GeoJSON {0} holds a bare geometry; expected features with properties")]
    MissingFeatures(PathBuf),
    #[error("unsupported boundary format for {0} (expected .shp, .geojson or .json)")]
    UnsupportedFormat(PathBuf),
}

/// One ZIP code tabulation area polygon.
#[derive(Debug, Clone)]
pub struct ZctaBoundary {
    pub zip: ZipCode,
    pub geometry: MultiPolygon<f64>,
    pub crs: Crs,
}

/// All usable boundaries from one file, in a single CRS.
#[derive(Debug, Clone)]
pub struct BoundaryLayer {
    pub boundaries: Vec<ZctaBoundary>,
    pub crs: Crs,
    /// Records dropped for lacking a polygon or a readable ZIP.
    pub skipped: usize,
}

impl BoundaryLayer {
    /// Reads a shapefile or GeoJSON file in lon/lat degrees.
    pub fn from_path<P: AsRef<Path>>(path: P, zip_field: &str) -> Result<Self, BoundaryError> {
        let path = path.as_ref();
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase());

        let layer = match extension.as_deref() {
            Some("shp") => read_shapefile(path, zip_field)?,
            Some("geojson") | Some("json") => read_geojson(path, zip_field)?,
            _ => return Err(BoundaryError::UnsupportedFormat(path.to_path_buf())),
        };

        info!(
            path = %path.display(),
            loaded = layer.boundaries.len(),
            skipped = layer.skipped,
            "loaded ZCTA boundaries"
        );
        Ok(layer)
    }

    pub fn from_boundaries(boundaries: Vec<ZctaBoundary>, crs: Crs) -> Self {
        Self {
            boundaries,
            crs,
            skipped: 0,
        }
    }

    /// Reprojects every geometry to EPSG:3857. A layer already in
    /// Web Mercator is returned untouched.
    pub fn into_web_mercator(self) -> Self {
        if self.crs == Crs::WebMercator {
            return self;
        }

        let boundaries = self
            .boundaries
            .into_iter()
            .map(|boundary| ZctaBoundary {
                zip: boundary.zip,
                geometry: project_multi_polygon(&boundary.geometry),
                crs: Crs::WebMercator,
            })
            .collect();

        Self {
            boundaries,
            crs: Crs::WebMercator,
            skipped: self.skipped,
        }
    }

    pub fn len(&self) -> usize {
        self.boundaries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.boundaries.is_empty()
    }
}

fn read_shapefile(path: &Path, zip_field: &str) -> Result<BoundaryLayer, BoundaryError> {
    let shapefile_error = |source| BoundaryError::Shapefile {
        path: path.to_path_buf(),
        source,
    };

    let mut reader = shapefile::Reader::from_path(path).map_err(shapefile_error)?;
    let mut boundaries = Vec::new();
    let mut skipped = 0;

    for (index, entry) in reader.iter_shapes_and_records().enumerate() {
        let (shape, record) = entry.map_err(shapefile_error)?;

        let zip = match record.get(zip_field) {
            Some(FieldValue::Character(Some(value))) => ZipCode::parse(value),
            Some(FieldValue::Numeric(Some(value))) => ZipCode::from_number(*value),
            _ => None,
        };
        let geometry = match shape {
            Shape::Polygon(polygon) => Some(MultiPolygon::<f64>::from(polygon)),
            Shape::PolygonM(polygon) => Some(MultiPolygon::<f64>::from(polygon)),
            Shape::PolygonZ(polygon) => Some(MultiPolygon::<f64>::from(polygon)),
            _ => None,
        };

        match (zip, geometry) {
            (Some(zip), Some(geometry)) => boundaries.push(ZctaBoundary {
                zip,
                geometry,
                crs: Crs::Wgs84,
            }),
            (zip, geometry) => {
                warn!(
                    record = index,
                    has_zip = zip.is_some(),
                    has_polygon = geometry.is_some(),
                    "skipping shapefile record"
                );
                skipped += 1;
            }
        }
    }

    Ok(BoundaryLayer {
        boundaries,
        crs: Crs::Wgs84,
        skipped,
    })
}

fn read_geojson(path: &Path, zip_field: &str) -> Result<BoundaryLayer, BoundaryError> {
    let file = File::open(path).map_err(|source| BoundaryError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let parsed =
        GeoJson::from_reader(BufReader::new(file)).map_err(|source| BoundaryError::GeoJson {
            path: path.to_path_buf(),
            source,
        })?;
    debug!(path = %path.display(), "parsed GeoJSON boundaries");

    let features = match parsed {
        GeoJson::FeatureCollection(collection) => collection.features,
        GeoJson::Feature(feature) => vec![feature],
        GeoJson::Geometry(_) => return Err(BoundaryError::MissingFeatures(path.to_path_buf())),
    };

    let mut boundaries = Vec::new();
    let mut skipped = 0;

    for (index, feature) in features.into_iter().enumerate() {
        let zip = feature.property(zip_field).and_then(zip_from_json);
        let geometry = feature
            .geometry
            .and_then(|geometry| polygons_from_value(geometry.value));

        match (zip, geometry) {
            (Some(zip), Some(geometry)) => boundaries.push(ZctaBoundary {
                zip,
                geometry,
                crs: Crs::Wgs84,
            }),
            (zip, geometry) => {
                warn!(
                    feature = index,
                    has_zip = zip.is_some(),
                    has_polygon = geometry.is_some(),
                    "skipping GeoJSON feature"
                );
                skipped += 1;
            }
        }
    }

    Ok(BoundaryLayer {
        boundaries,
        crs: Crs::Wgs84,
        skipped,
    })
}

fn zip_from_json(value: &JsonValue) -> Option<ZipCode> {
    match value {
        JsonValue::String(text) => ZipCode::parse(text),
        JsonValue::Number(number) => number.as_f64().and_then(ZipCode::from_number),
        _ => None,
    }
}

fn polygons_from_value(value: geojson::Value) -> Option<MultiPolygon<f64>> {
    let polygons = match value {
        geojson::Value::Polygon(rings) => vec![polygon_from_rings(rings)?],
        geojson::Value::MultiPolygon(parts) => parts
            .into_iter()
            .map(polygon_from_rings)
            .collect::<Option<Vec<_>>>()?,
        _ => return None,
    };

    Some(MultiPolygon::new(polygons))
}

fn polygon_from_rings(mut rings: PolygonType) -> Option<Polygon<f64>> {
    if rings.is_empty() {
        return None;
    }

    let exterior = line_string(rings.remove(0))?;
    let interiors = rings
        .into_iter()
        .map(line_string)
        .collect::<Option<Vec<_>>>()?;
    Some(Polygon::new(exterior, interiors))
}

fn line_string(positions: Vec<geojson::Position>) -> Option<LineString<f64>> {
    positions
        .into_iter()
        .map(|position| match position.as_slice() {
            [x, y, ..] => Some(coord! { x: *x, y: *y }),
            _ => None,
        })
        .collect::<Option<Vec<_>>>()
        .map(LineString::from)
}
