use thiserror::Error;

#[derive(Error, Debug)]
pub enum GridError {
    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("missing required grid header {0}")]
    Header(&'static str),

    #[error("invalid value {value:?} for grid header {key}")]
    HeaderValue { key: String, value: String },

    #[error("invalid elevation sample {0:?}")]
    Sample(String),

    #[error("expected {expected} elevation samples, found {found}")]
    SampleCount { expected: usize, found: usize },

    #[error("grid dimensions {rows}x{cols} do not match {samples} samples")]
    Dimensions {
        rows: usize,
        cols: usize,
        samples: usize,
    },

    #[error("non-positive grid cell size {0}")]
    CellSize(f64),
}
