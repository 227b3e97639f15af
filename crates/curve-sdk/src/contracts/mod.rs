pub mod bonding_curve;
pub mod common;

pub use bonding_curve::{encode_buy, encode_sell, BondingCurve, BondingCurveClient};
pub use common::TxHash;
