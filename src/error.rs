use thiserror::Error;

#[derive(Error, Debug)]
pub enum SnapshotError {
    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("Invalid amount: {0:?}, expected digits optionally followed by '.' and digits")]
    InvalidAmount(String),

    #[error("Amount {amount} has more than {decimals} fractional digits")]
    PrecisionOverflow { amount: String, decimals: u32 },

    #[error("No eligible holders: every holder is excluded or the eligible balance is zero")]
    NoEligibleHolders,

    #[error("Transport error: {0}")]
    Transport(String),
}

impl From<reqwest::Error> for SnapshotError {
    fn from(err: reqwest::Error) -> Self {
        SnapshotError::Transport(err.to_string())
    }
}

pub type SnapshotResult<T> = Result<T, SnapshotError>;
