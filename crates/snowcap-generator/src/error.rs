use crate::config::GeneratorType;
use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum GeneratorError {
    #[error(transparent)]
    Flake(#[from] snowcap_flake::Error),
    #[error("{operation} is not supported by the {generator} generator")]
    Unsupported {
        operation: &'static str,
        generator: GeneratorType,
    },
}
