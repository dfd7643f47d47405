use crate::sdk::ReasonCode;

/// Errors raised by the binding.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A native call returned a non-zero reason code.
    #[error("{call} failed: {code}")]
    Sdk {
        call: &'static str,
        code: ReasonCode,
    },

    #[error("failed to load SDK library: {0}")]
    Load(#[from] libloading::Error),

    #[error("SDK library is missing symbol {0}")]
    MissingSymbol(&'static str),

    #[error("no attribute named {0}")]
    UnknownAttribute(String),

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("SDK returned a null instance handle")]
    NullInstance,

    #[error("bot thread failed: {0}")]
    Task(#[from] tokio::task::JoinError),

    #[error("bot stopped before it was ready")]
    NotReady,
}

pub type Result<T> = std::result::Result<T, Error>;
