use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PrecisionError {
    // Transport failure or non-2xx response from the metadata endpoint
    #[error("fetch exchange metadata: {0}")]
    Fetch(String),

    #[error("parse exchange metadata: {0}")]
    Parse(String),
}

impl PrecisionError {
    pub fn is_fetch(&self) -> bool {
        matches!(self, Self::Fetch(_))
    }
}
