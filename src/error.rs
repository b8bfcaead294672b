// src/error.rs
use std::fmt;

/// Everything an action can fail with. Every action boundary catches these
/// uniformly and writes them to the activity log; none of them tears down
/// the session, so the user can always retry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppError {
    /// Rejected during validation, before any network call was made.
    InvalidInput(String),
    /// No wallet endpoint answered, or it answered with no accounts.
    WalletUnavailable(String),
    /// The user declined the request in the wallet prompt (EIP-1193 4001).
    UserRejected,
    /// The wallet does not know the requested chain id (EIP-1193 4902).
    /// Drives the add-chain fallback in the switch-network flow.
    ChainUnknown,
    /// Connected network differs from the target chain. Warning only,
    /// never blocks an action.
    ChainMismatch { expected: u64, actual: u64 },
    /// The node or wallet rejected a query or submission.
    Remote(String),
    /// The contract reverted the call or the mined transaction.
    Reverted(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::InvalidInput(msg) => write!(f, "invalid input: {}", msg),
            AppError::WalletUnavailable(msg) => write!(f, "wallet unavailable: {}", msg),
            AppError::UserRejected => write!(f, "request rejected in the wallet"),
            AppError::ChainUnknown => {
                write!(f, "the wallet does not recognize the requested chain")
            }
            AppError::ChainMismatch { expected, actual } => {
                write!(f, "connected to chain {}, expected chain {}", actual, expected)
            }
            AppError::Remote(msg) => write!(f, "remote call failed: {}", msg),
            AppError::Reverted(msg) => write!(f, "transaction reverted: {}", msg),
        }
    }
}

impl std::error::Error for AppError {}
