//! Single-use counters for signed messages.
//!
//! Every account has a counter that starts at zero and only moves forward. A
//! signature covers the counter value it was made over, so consuming that
//! value retires the signature for good.

use alloc::{vec, vec::Vec};

use alloy_primitives::{Address, U256};
pub use sol::*;
use stylus_sdk::{
    call::MethodError,
    prelude::*,
    storage::{StorageMap, StorageU256},
};

use crate::utils::math::storage::AddAssignChecked;

#[cfg_attr(coverage_nightly, coverage(off))]
mod sol {
    use alloy_sol_macro::sol;

    sol! {
        /// `account` tried to consume a nonce other than `current_nonce`.
        #[derive(Debug)]
        #[allow(missing_docs)]
        error InvalidAccountNonce(address account, uint256 current_nonce);
    }
}

/// A [`Nonces`] error.
#[derive(SolidityError, Debug)]
pub enum Error {
    /// The nonce is not the one expected next.
    InvalidAccountNonce(InvalidAccountNonce),
}

#[cfg_attr(coverage_nightly, coverage(off))]
impl MethodError for Error {
    fn encode(self) -> alloc::vec::Vec<u8> {
        self.into()
    }
}

/// State of a [`Nonces`] contract.
#[storage]
pub struct Nonces {
    /// Nonce the next signature of each account must cover.
    pub(crate) next: StorageMap<Address, StorageU256>,
}

#[public]
impl Nonces {
    /// Returns the nonce the next signature of `owner` must cover.
    ///
    /// # Arguments
    ///
    /// * `&self` - Read access to the contract's state.
    /// * `owner` - Account to read the nonce of.
    #[must_use]
    pub fn nonces(&self, owner: Address) -> U256 {
        self.next.get(owner)
    }
}

impl Nonces {
    /// Consumes the next nonce of `owner` and returns it.
    ///
    /// # Panics
    ///
    /// * If the nonce of `owner` would exceed [`U256::MAX`].
    pub fn use_nonce(&mut self, owner: Address) -> U256 {
        let mut next = self.next.setter(owner);
        let nonce = next.get();
        next.add_assign_checked(
            U256::ONE,
            "nonce should not exceed `U256::MAX`",
        );
        nonce
    }

    /// Consumes `nonce` for `owner`, provided it is the next one. A mismatch
    /// leaves the counter where it was.
    ///
    /// # Errors
    ///
    /// * [`Error::InvalidAccountNonce`] - If `nonce` is not the next nonce
    ///   of `owner`.
    ///
    /// # Panics
    ///
    /// * If the nonce of `owner` would exceed [`U256::MAX`].
    pub fn use_checked_nonce(
        &mut self,
        owner: Address,
        nonce: U256,
    ) -> Result<(), Error> {
        let current_nonce = self.nonces(owner);
        if nonce != current_nonce {
            return Err(InvalidAccountNonce { account: owner, current_nonce }
                .into());
        }

        self.use_nonce(owner);
        Ok(())
    }
}
