use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmissionError {
    // Rejected by the exchange or lost in transport
    #[error("{0}")]
    Exchange(String),

    #[error("quantity {0} is not a number")]
    Quantity(String),
}
