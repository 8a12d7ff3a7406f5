use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum PropagationError {
    #[error("invalid tle: {0}")]
    InvalidTle(String),
    #[error("elements error: {0}")]
    Elements(String),
    #[error("time out of range: {0}")]
    Time(String),
    #[error("propagation error: {0}")]
    Propagation(String),
    #[error("non-finite position")]
    NonFinite,
}

impl From<sgp4::TleError> for PropagationError {
    fn from(err: sgp4::TleError) -> Self {
        PropagationError::InvalidTle(err.to_string())
    }
}

impl From<sgp4::ElementsError> for PropagationError {
    fn from(err: sgp4::ElementsError) -> Self {
        PropagationError::Elements(err.to_string())
    }
}

impl From<sgp4::Error> for PropagationError {
    fn from(err: sgp4::Error) -> Self {
        PropagationError::Propagation(err.to_string())
    }
}
