//! Gas-less ERC-20 payments through [EIP-2612] permits.
//!
//! The token holder (`owner`) signs a permit off-chain that approves this
//! contract for `amount + fee`. Anyone holding the signature (the
//! submitter) then calls [`IPermitRelay::permit_and_transfer`], which
//! consumes the permit and pays `amount` to the receiver and `fee` to the
//! submitter, both straight out of the owner's balance. The owner never
//! sends a transaction and needs no native currency.
//!
//! NOTE: The `receiver` is not part of the signed permit. Whoever holds the
//! signature chooses where `amount` goes, so owners should only hand their
//! signature to a submitter they trust with it.
//!
//! [EIP-2612]: https://eips.ethereum.org/EIPS/eip-2612

use alloc::{vec, vec::Vec};

use alloy_primitives::{Address, B256, U256};
pub use sol::*;
use stylus_sdk::{call::MethodError, contract, evm, msg, prelude::*};

use crate::token::erc20::utils::safe_erc20::{
    self, ISafeErc20, SafeErc20, SafeErc20FailedOperation,
};

#[cfg_attr(coverage_nightly, coverage(off))]
mod sol {
    use alloy_sol_macro::sol;

    sol! {
        /// Emitted when a permit for `token` has been relayed, moving
        /// `amount` from `owner` to `receiver` and `fee` from `owner` to
        /// `submitter`.
        #[derive(Debug)]
        #[allow(missing_docs)]
        event PermitRelayed(
            address indexed token,
            address indexed owner,
            address indexed receiver,
            address submitter,
            uint256 amount,
            uint256 fee
        );
    }
}

/// A [`PermitRelay`] error.
#[derive(Debug)]
pub enum Error {
    /// The token is not a contract, or one of its calls returned `false`.
    SafeErc20FailedOperation(SafeErc20FailedOperation),
    /// The token reverted. Its revert data is returned unchanged.
    Reverted(alloc::vec::Vec<u8>),
}

impl From<safe_erc20::Error> for Error {
    fn from(value: safe_erc20::Error) -> Self {
        match value {
            safe_erc20::Error::SafeErc20FailedOperation(e) => {
                Error::SafeErc20FailedOperation(e)
            }
            safe_erc20::Error::Reverted(data) => Error::Reverted(data),
        }
    }
}

impl From<Error> for alloc::vec::Vec<u8> {
    fn from(value: Error) -> Self {
        match value {
            Error::SafeErc20FailedOperation(e) => {
                safe_erc20::Error::SafeErc20FailedOperation(e).into()
            }
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

/// State of a [`PermitRelay`] contract.
#[storage]
pub struct PermitRelay {
    /// [`SafeErc20`] contract.
    pub(crate) safe_erc20: SafeErc20,
}

/// NOTE: Implementation of [`TopLevelStorage`] to be able use `&mut self` when
/// calling other contracts and not `&mut (impl TopLevelStorage +
/// BorrowMut<Self>)`. Should be fixed in the future by the Stylus team.
unsafe impl TopLevelStorage for PermitRelay {}

/// Interface of a permit relay.
pub trait IPermitRelay {
    /// The error type associated to this trait implementation.
    type Error: Into<alloc::vec::Vec<u8>>;

    /// Relays `owner`'s permit for `token`, then transfers `amount` to
    /// `receiver` and `fee` to the caller.
    ///
    /// The permit must approve this contract for exactly `amount + fee`.
    /// The token calls are made in this order: `permit`, `transferFrom` of
    /// `amount` to `receiver`, `transferFrom` of `fee` to the caller. The
    /// second transfer happens even when `fee` is zero.
    ///
    /// # Arguments
    ///
    /// * `&mut self` - Write access to the contract's state.
    /// * `token` - Address of the EIP-2612 token.
    /// * `owner` - Account that signed the permit and pays.
    /// * `receiver` - Account that receives `amount`.
    /// * `amount` - Amount paid to `receiver`.
    /// * `fee` - Amount paid to the caller.
    /// * `deadline` - Deadline of the permit.
    /// * `v` - `v` value from the `owner`'s signature.
    /// * `r` - `r` value from the `owner`'s signature.
    /// * `s` - `s` value from the `owner`'s signature.
    ///
    /// # Errors
    ///
    /// * [`Error::SafeErc20FailedOperation`] - If `token` has no code, or
    ///   returns `false` from one of the calls.
    /// * [`Error::Reverted`] - If `token` reverts, e.g. on an expired or
    ///   invalid permit, or an insufficient balance.
    ///
    /// # Panics
    ///
    /// * If `amount + fee` exceeds `U256::MAX`.
    ///
    /// # Events
    ///
    /// * [`PermitRelayed`].
    #[allow(clippy::too_many_arguments)]
    fn permit_and_transfer(
        &mut self,
        token: Address,
        owner: Address,
        receiver: Address,
        amount: U256,
        fee: U256,
        deadline: U256,
        v: u8,
        r: B256,
        s: B256,
    ) -> Result<(), Self::Error>;
}

#[public]
#[implements(IPermitRelay<Error = Error>)]
impl PermitRelay {}

#[public]
impl IPermitRelay for PermitRelay {
    type Error = Error;

    #[selector(name = "permitAndTransfer")]
    fn permit_and_transfer(
        &mut self,
        token: Address,
        owner: Address,
        receiver: Address,
        amount: U256,
        fee: U256,
        deadline: U256,
        v: u8,
        r: B256,
        s: B256,
    ) -> Result<(), Self::Error> {
        let value = amount
            .checked_add(fee)
            .expect("`amount + fee` should not exceed `U256::MAX`");
        let submitter = msg::sender();

        self.safe_erc20.safe_permit(
            token,
            owner,
            contract::address(),
            value,
            deadline,
            v,
            r,
            s,
        )?;
        self.safe_erc20.safe_transfer_from(token, owner, receiver, amount)?;
        self.safe_erc20.safe_transfer_from(token, owner, submitter, fee)?;

        evm::log(PermitRelayed {
            token,
            owner,
            receiver,
            submitter,
            amount,
            fee,
        });

        Ok(())
    }
}
