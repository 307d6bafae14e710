//! Error types for ledger operations.

use std::fmt;

use thiserror::Error;

use crate::access::AccessModel;
use crate::account::AccountId;
use crate::amount::Amount;

/// Result type alias for ledger operations.
pub type Result<T> = std::result::Result<T, LedgerError>;

/// Broad class of a [`LedgerError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// The caller lacks the required privilege.
    Authorization,
    /// A null or otherwise invalid account was supplied.
    Validation,
    /// The requested movement or adjustment is not representable.
    Accounting,
    /// The call is not offered by this token's access model.
    Dispatch,
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Authorization => write!(f, "authorization"),
            Self::Validation => write!(f, "validation"),
            Self::Accounting => write!(f, "accounting"),
            Self::Dispatch => write!(f, "dispatch"),
        }
    }
}

/// Errors returned by ledger and access-control operations.
///
/// Every error leaves the ledger exactly as it was before the call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    /// Caller is not the owner, or not a minter, for a gated operation.
    #[error("unauthorized: {caller} may not perform this operation")]
    Unauthorized {
        /// The rejected caller.
        caller: AccountId,
    },

    /// Caller tried to renounce a minter role it does not hold.
    #[error("not a minter: {account}")]
    NotAMinter {
        /// The account without the role.
        account: AccountId,
    },

    /// Recipient is the null account.
    #[error("invalid recipient: transfer to the null account")]
    InvalidRecipient,

    /// Sender (source of funds or caller) is the null account.
    #[error("invalid sender: transfer from the null account")]
    InvalidSender,

    /// Spender is the null account.
    #[error("invalid spender: approve to the null account")]
    InvalidSpender,

    /// New owner is the null account.
    #[error("invalid owner: new owner is the null account")]
    InvalidOwner,

    /// New minter is null or already holds the role.
    #[error("invalid minter: {account} is null or already a minter")]
    InvalidMinter {
        /// The rejected account.
        account: AccountId,
    },

    /// Balance too small for the requested movement.
    #[error("insufficient balance: {account} has {have}, needs {need}")]
    InsufficientBalance {
        /// The account being debited.
        account: AccountId,
        /// Current balance.
        have: Amount,
        /// Requested amount.
        need: Amount,
    },

    /// Allowance too small for the requested delegated transfer.
    #[error("insufficient allowance: {spender} may move {have} from {owner}, needs {need}")]
    InsufficientAllowance {
        /// Account whose funds are being spent.
        owner: AccountId,
        /// Account spending them.
        spender: AccountId,
        /// Remaining allowance.
        have: Amount,
        /// Requested amount.
        need: Amount,
    },

    /// Allowance decrease below zero.
    #[error("allowance underflow: cannot decrease {current} by {delta}")]
    AllowanceUnderflow {
        /// Current allowance.
        current: Amount,
        /// Requested decrease.
        delta: Amount,
    },

    /// Result exceeds the maximum representable amount.
    #[error("arithmetic overflow")]
    ArithmeticOverflow,

    /// The call does not exist for this token's access model.
    #[error("unsupported call: {call} is not available on a {model} token")]
    UnsupportedCall {
        /// Name of the rejected call.
        call: &'static str,
        /// Access model of the token.
        model: AccessModel,
    },
}

impl LedgerError {
    /// Create an unauthorized error.
    #[must_use]
    pub const fn unauthorized(caller: AccountId) -> Self {
        Self::Unauthorized { caller }
    }

    /// Create an insufficient balance error.
    #[must_use]
    pub const fn insufficient_balance(account: AccountId, have: Amount, need: Amount) -> Self {
        Self::InsufficientBalance {
            account,
            have,
            need,
        }
    }

    /// Category this error belongs to.
    #[must_use]
    pub const fn category(&self) -> ErrorCategory {
        match self {
            Self::Unauthorized { .. } | Self::NotAMinter { .. } => ErrorCategory::Authorization,
            Self::InvalidRecipient
            | Self::InvalidSender
            | Self::InvalidSpender
            | Self::InvalidOwner
            | Self::InvalidMinter { .. } => ErrorCategory::Validation,
            Self::InsufficientBalance { .. }
            | Self::InsufficientAllowance { .. }
            | Self::AllowanceUnderflow { .. }
            | Self::ArithmeticOverflow => ErrorCategory::Accounting,
            Self::UnsupportedCall { .. } => ErrorCategory::Dispatch,
        }
    }

    /// Stable machine-readable name of the error kind.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Unauthorized { .. } => "Unauthorized",
            Self::NotAMinter { .. } => "NotAMinter",
            Self::InvalidRecipient => "InvalidRecipient",
            Self::InvalidSender => "InvalidSender",
            Self::InvalidSpender => "InvalidSpender",
            Self::InvalidOwner => "InvalidOwner",
            Self::InvalidMinter { .. } => "InvalidMinter",
            Self::InsufficientBalance { .. } => "InsufficientBalance",
            Self::InsufficientAllowance { .. } => "InsufficientAllowance",
            Self::AllowanceUnderflow { .. } => "AllowanceUnderflow",
            Self::ArithmeticOverflow => "ArithmeticOverflow",
            Self::UnsupportedCall { .. } => "UnsupportedCall",
        }
    }
}

/// Errors parsing account identifiers or amounts from text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// Malformed account identifier.
    #[error("invalid account: {message}")]
    InvalidAccount {
        /// Description of the problem.
        message: String,
    },

    /// Malformed amount.
    #[error("invalid amount: {message}")]
    InvalidAmount {
        /// Description of the problem.
        message: String,
    },

    /// Name that matches no known variant.
    #[error("unknown {what} '{value}'")]
    Unknown {
        /// What was being parsed.
        what: &'static str,
        /// The rejected input.
        value: String,
    },
}

impl ParseError {
    /// Create an invalid account error.
    #[must_use]
    pub fn invalid_account(message: impl Into<String>) -> Self {
        Self::InvalidAccount {
            message: message.into(),
        }
    }

    /// Create an invalid amount error.
    #[must_use]
    pub fn invalid_amount(message: impl Into<String>) -> Self {
        Self::InvalidAmount {
            message: message.into(),
        }
    }
}

/// Errors loading or saving ledger state and configuration.
#[derive(Debug, Error)]
pub enum StoreError {
    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Stored state violates a ledger invariant.
    #[error("corrupt snapshot: {0}")]
    Corrupt(String),

    /// Invalid token configuration.
    #[error("configuration error: {0}")]
    Config(String),

    /// Rebuilding state hit a ledger error.
    #[error(transparent)]
    Ledger(#[from] LedgerError),
}
