use thiserror::Error;

// Main Application Error Type

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration Error: {0}")]
    Config(#[from] config::ConfigError),
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),
    #[error("Pipeline Error: {0}")]
    Pipeline(String),
    #[error("Geometry Error: {0}")]
    Geometry(#[from] GeometryError),
    #[error("Detection Error: {0}")]
    Detection(#[from] DetectionError),
}

// Frame geometry could not produce a usable region of interest
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GeometryError {
    #[error("unsupported rotation of {0} degrees")]
    UnsupportedRotation(u32),
    #[error("source frame is empty ({width}x{height})")]
    EmptySource { width: u32, height: u32 },
    #[error("empty region of interest {width}x{height} in a {frame_width}x{frame_height} frame")]
    EmptyRegion {
        width: u32,
        height: u32,
        frame_width: u32,
        frame_height: u32,
    },
}

// The text detection engine failed for a single frame
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DetectionError {
    #[error("text recognition failed: {0}")]
    Engine(String),
    #[error("text detection engine is unavailable: {0}")]
    Unavailable(String),
}
