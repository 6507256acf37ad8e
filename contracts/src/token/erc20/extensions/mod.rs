//! Common extensions to the ERC-20 standard.
pub mod permit;

pub use permit::Erc20Permit;
