//! Wrappers around the ERC-20 calls made by the relay.
//!
//! Tokens that return no value (and instead revert on failure) are supported:
//! a call that does not revert and returns nothing is successful. A call that
//! returns `false` fails with [`SafeErc20FailedOperation`]. A call that
//! reverts fails with the token's own revert data, unchanged, so callers see
//! the same error as if they had called the token directly.
//!
//! NOTE: Unlike the Solidity library, these operations are not routed by
//! `#[public]`. A contract embedding [`SafeErc20`] would otherwise let anyone
//! spend the allowances granted to it.

use alloc::{vec, vec::Vec};

use alloy_primitives::{Address, B256, U256};
use alloy_sol_types::{SolCall, SolError};
pub use sol::*;
use stylus_sdk::{
    call::{MethodError, RawCall},
    prelude::*,
    types::AddressVM,
};

use crate::{
    token::erc20::interface::IErc20Permit,
    utils::ReentrantCallHandler,
};

#[cfg_attr(coverage_nightly, coverage(off))]
mod sol {
    use alloy_sol_macro::sol;

    sol! {
        /// An operation with an ERC-20 token failed.
        ///
        /// * `token` - Address of the ERC-20 token.
        #[derive(Debug)]
        #[allow(missing_docs)]
        error SafeErc20FailedOperation(address token);
    }
}

/// A [`SafeErc20`] error.
#[derive(Debug)]
pub enum Error {
    /// The token is not a contract, or returned `false`.
    SafeErc20FailedOperation(SafeErc20FailedOperation),
    /// The token reverted with this data.
    Reverted(Vec<u8>),
}

impl From<SafeErc20FailedOperation> for Error {
    fn from(value: SafeErc20FailedOperation) -> Self {
        Error::SafeErc20FailedOperation(value)
    }
}

impl From<Error> for Vec<u8> {
    fn from(value: Error) -> Self {
        match value {
            Error::SafeErc20FailedOperation(e) => e.abi_encode(),
            Error::Reverted(data) => data,
        }
    }
}

#[cfg_attr(coverage_nightly, coverage(off))]
impl MethodError for Error {
    fn encode(self) -> alloc::vec::Vec<u8> {
        self.into()
    }
}

/// State of a [`SafeErc20`] contract.
#[storage]
pub struct SafeErc20 {}

/// Operations of a [`SafeErc20`] utility contract.
pub trait ISafeErc20 {
    /// The error type associated to this trait implementation.
    type Error: Into<alloc::vec::Vec<u8>>;

    /// Calls `permit` on `token`, so that `spender` may move `value` of
    /// `owner`'s tokens.
    ///
    /// # Arguments
    ///
    /// * `&mut self` - Write access to the contract's state.
    /// * `token` - Address of the ERC-20 token contract.
    /// * `owner` - Account that signed the permit.
    /// * `spender` - Account approved by the permit.
    /// * `value` - Approved amount.
    /// * `deadline` - Last timestamp at which the permit is valid.
    /// * `v` - `v` value from the `owner`'s signature.
    /// * `r` - `r` value from the `owner`'s signature.
    /// * `s` - `s` value from the `owner`'s signature.
    ///
    /// # Errors
    ///
    /// * [`Error::SafeErc20FailedOperation`] - If `token` is not a contract
    ///   or returns `false`.
    /// * [`Error::Reverted`] - If `token` reverts.
    #[allow(clippy::too_many_arguments)]
    fn safe_permit(
        &mut self,
        token: Address,
        owner: Address,
        spender: Address,
        value: U256,
        deadline: U256,
        v: u8,
        r: B256,
        s: B256,
    ) -> Result<(), Self::Error>;

    /// Moves `value` of `token` from `from` to `to`, spending the allowance
    /// given by `from` to the calling contract.
    ///
    /// # Arguments
    ///
    /// * `&mut self` - Write access to the contract's state.
    /// * `token` - Address of the ERC-20 token contract.
    /// * `from` - Account to transfer tokens from.
    /// * `to` - Account to transfer tokens to.
    /// * `value` - Amount of tokens to transfer.
    ///
    /// # Errors
    ///
    /// * [`Error::SafeErc20FailedOperation`] - If `token` is not a contract
    ///   or returns `false`.
    /// * [`Error::Reverted`] - If `token` reverts.
    fn safe_transfer_from(
        &mut self,
        token: Address,
        from: Address,
        to: Address,
        value: U256,
    ) -> Result<(), Self::Error>;
}

impl ISafeErc20 for SafeErc20 {
    type Error = Error;

    fn safe_permit(
        &mut self,
        token: Address,
        owner: Address,
        spender: Address,
        value: U256,
        deadline: U256,
        v: u8,
        r: B256,
        s: B256,
    ) -> Result<(), Self::Error> {
        let call = IErc20Permit::permitCall {
            owner,
            spender,
            value,
            deadline,
            v,
            r,
            s,
        };

        Self::call_optional_return(token, &call)
    }

    fn safe_transfer_from(
        &mut self,
        token: Address,
        from: Address,
        to: Address,
        value: U256,
    ) -> Result<(), Self::Error> {
        let call = IErc20Permit::transferFromCall { from, to, value };

        Self::call_optional_return(token, &call)
    }
}

impl SafeErc20 {
    /// Calls `token` with `call`, accepting either no return data or an ABI
    /// encoded `true`.
    ///
    /// The return data is not limited, since a revert is bubbled in full.
    ///
    /// # Arguments
    ///
    /// * `token` - Address of the ERC-20 token contract.
    /// * `call` - [`IErc20Permit`] call.
    ///
    /// # Errors
    ///
    /// * [`Error::SafeErc20FailedOperation`] - If `token` is not a contract
    ///   or returns anything but `true`.
    /// * [`Error::Reverted`] - If `token` reverts.
    fn call_optional_return(
        token: Address,
        call: &impl SolCall,
    ) -> Result<(), Error> {
        if !Address::has_code(&token) {
            return Err(SafeErc20FailedOperation { token }.into());
        }

        let data = RawCall::new()
            .call_with_reentrant_handling(token, &call.abi_encode())
            .map_err(Error::Reverted)?;

        if data.is_empty() || Self::encodes_true(&data) {
            Ok(())
        } else {
            Err(SafeErc20FailedOperation { token }.into())
        }
    }

    /// Returns true if `data` is exactly one ABI word holding `true`.
    fn encodes_true(data: &[u8]) -> bool {
        data.len() == 32
            && data[31] == 1
            && data[..31].iter().all(|&byte| byte == 0)
    }
}

#[cfg(test)]
mod tests {
    use super::SafeErc20;

    #[test]
    fn encodes_true_rejects_empty_slice() {
        assert!(!SafeErc20::encodes_true(&[]));
    }

    #[test]
    fn encodes_true_rejects_false() {
        assert!(!SafeErc20::encodes_true(&[0]));
        assert!(!SafeErc20::encodes_true(&[0; 32]));
    }

    #[test]
    fn encodes_true_accepts_abi_word() {
        let mut word = [0u8; 32];
        word[31] = 1;
        assert!(SafeErc20::encodes_true(&word));
    }

    #[test]
    fn encodes_true_rejects_unpadded_or_oversized_data() {
        assert!(!SafeErc20::encodes_true(&[1]));

        let mut words = [0u8; 64];
        words[31] = 1;
        assert!(!SafeErc20::encodes_true(&words));
    }

    #[test]
    fn encodes_true_rejects_dirty_padding() {
        let mut word = [0u8; 32];
        word[0] = 1;
        word[31] = 1;
        assert!(!SafeErc20::encodes_true(&word));
    }
}
