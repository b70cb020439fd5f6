use thiserror::Error;

use crate::stub::StoreError;

#[derive(Debug, Error)]
pub enum ContractError {
    #[error("Incorrect number of arguments. Expecting {expected}")]
    Arity { expected: usize },

    /// Every unknown name yields the same message.
    #[error("Invalid Smart Contract function name.")]
    UnknownFunction(String),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("failed to encode payload: {0}")]
    Encode(#[from] serde_json::Error),
}

impl ContractError {
    /// Stable machine-readable code for the error kind.
    pub fn code(&self) -> &'static str {
        match self {
            ContractError::Arity { .. } => "ARITY",
            ContractError::UnknownFunction(_) => "UNKNOWN_FUNCTION",
            ContractError::Store(_) => "STORE",
            ContractError::Encode(_) => "ENCODE",
        }
    }
}
