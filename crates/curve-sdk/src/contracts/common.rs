use core::fmt;

use alloy_primitives::B256;

/// Hash of a trade broadcast through a signing transport.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TxHash(pub B256);

impl From<B256> for TxHash {
    fn from(value: B256) -> Self {
        Self(value)
    }
}

impl fmt::Display for TxHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
