use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Catalog error: {0}")]
    Catalog(String),
    #[error("Parse error: {0}")]
    Parse(String),
    #[error("Duplicate series variation: {0}")]
    DuplicateVariation(String),
    #[error("Evaluation error: {0}")]
    Evaluation(String),
}

impl From<serde_json::Error> for EngineError {
    fn from(error: serde_json::Error) -> Self {
        EngineError::Parse(error.to_string())
    }
}

impl Serialize for EngineError {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.to_string().as_ref())
    }
}

pub type EngineResult<T> = Result<T, EngineError>;

#[cfg(test)]
#[path = "tests/errors_tests.rs"]
mod tests;
