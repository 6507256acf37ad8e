//! Solidity ABI of the token calls made by the relay.
//!
//! These are defined with [`alloy_sol_types::sol`], so that call data can be
//! built for [`stylus_sdk::call::RawCall`] and the raw result inspected.
//! Tokens that return no value from `transferFrom` can then be supported.

#![allow(missing_docs)]
#![cfg_attr(coverage_nightly, coverage(off))]

use alloy_sol_types::sol;

sol! {
    /// ERC-20 token with the [EIP-2612] permit extension.
    ///
    /// [EIP-2612]: https://eips.ethereum.org/EIPS/eip-2612
    interface IErc20Permit {
        function transferFrom(address from, address to, uint256 value) external returns (bool);
        function permit(
            address owner,
            address spender,
            uint256 value,
            uint256 deadline,
            uint8 v,
            bytes32 r,
            bytes32 s
        ) external;
    }
}
