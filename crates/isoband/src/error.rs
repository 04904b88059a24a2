use thiserror::Error;

#[derive(Error, Debug)]
pub enum IsobandError {
    #[error("Invalid mesh: {0}")]
    InvalidMesh(String),

    #[error("Field has {found} values but the mesh has {expected} vertices")]
    FieldSizeMismatch { expected: usize, found: usize },

    #[error("Field contains no valid values")]
    EmptyField,

    #[error("{levels} contour levels require {} bands, got {bands}", .levels + 1)]
    LevelBandMismatch { levels: usize, bands: usize },

    #[error("Contour levels must be in ascending order")]
    UnsortedLevels,

    #[error("Invalid GeoJSON: {0}")]
    InvalidGeoJson(String),

    #[error("Contour builder error: {0}")]
    ContourBuilder(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("GeoJSON error: {0}")]
    GeoJson(#[from] geojson::Error),
}

/// Failure confined to a single ring or polygon.
///
/// These are collected next to the successful records of an extraction and
/// never abort the surrounding band.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GeometryError {
    #[error("Ring of {points} points has zero signed area")]
    DegenerateOrientation { points: usize },

    #[error("Invalid geometry: {reason}")]
    InvalidGeometry { reason: String },
}

pub type Result<T> = std::result::Result<T, IsobandError>;
