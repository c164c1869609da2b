use thiserror::Error;

/// Why a route geometry could not be evaluated.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum GeometryError {
    #[error("geometry must be a JSON object")]
    NotAnObject,

    #[error("geometry has no \"type\" member")]
    MissingType,

    #[error("unsupported geometry type: {0}")]
    Unsupported(String),

    #[error("geometry has no usable \"coordinates\"")]
    MissingCoordinates,

    #[error("position {index} is not a [longitude, latitude] pair")]
    BadPosition { index: usize },

    #[error("position {index} has a non-finite coordinate")]
    NonFinite { index: usize },

    #[error("ring has {vertices} distinct vertices, need at least 3")]
    RingTooShort { vertices: usize },
}
