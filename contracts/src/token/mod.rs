//! Token standards.
pub mod erc20;
