//! Error codes shared across the curve SDK.

use core::fmt;

/// Result type alias that carries [`ErrorCode`] failures.
pub type Result<T> = std::result::Result<T, ErrorCode>;

/// Unified error taxonomy for reading, quoting and building trades.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u16)]
pub enum ErrorCode {
    /// Token was never registered on this curve (zero mint returned).
    TokenNotFound = 1001,
    /// Curve is complete; trading moved to the external AMM pool.
    CurveGraduated = 1002,
    /// Zero amount or otherwise unusable numeric input.
    InvalidInput = 2001,
    /// Address is malformed or the zero address.
    InvalidAddress = 2002,
    /// Virtual reserves are zero, no price exists.
    EmptyReserves = 2003,
    /// Quote arithmetic produced a negative or reserve-exceeding output.
    InvalidQuote = 2101,
    /// Quoted output is below the caller's floor.
    SlippageExceeded = 3001,
    /// JSON-RPC transport failure; safe to retry.
    RpcFailure = 4001,
    /// Return data did not decode against the curve ABI.
    DecodeFailure = 4002,
}

impl ErrorCode {
    /// Numeric representation associated with the error.
    pub fn code(self) -> u16 {
        self as u16
    }

    /// Message suitable for surfacing to an end user.
    pub fn reason(self) -> &'static str {
        match self {
            Self::TokenNotFound => "token not tracked by curve",
            Self::CurveGraduated => "curve graduated; trade via external AMM",
            Self::InvalidInput => "amount must be greater than zero",
            Self::InvalidAddress => "invalid token address",
            Self::EmptyReserves => "curve has no virtual reserves",
            Self::InvalidQuote => "quote out of reserve bounds",
            Self::SlippageExceeded => "slippage exceeded",
            Self::RpcFailure => "rpc request failed",
            Self::DecodeFailure => "curve contract returned undecodable data",
        }
    }

    /// Only transport failures are worth retrying unchanged.
    pub fn is_retryable(self) -> bool {
        matches!(self, Self::RpcFailure)
    }

    /// Expected outcomes a caller should present as a declined trade rather than a fault.
    pub fn is_rejection(self) -> bool {
        matches!(
            self,
            Self::TokenNotFound | Self::CurveGraduated | Self::SlippageExceeded
        )
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({self:?} {})", self.reason(), self.code())
    }
}

impl std::error::Error for ErrorCode {}
