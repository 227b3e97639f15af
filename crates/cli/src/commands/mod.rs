pub mod common;
pub mod quote;
pub mod serve;
pub mod trade;
