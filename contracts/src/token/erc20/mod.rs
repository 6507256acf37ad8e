//! Implementation of the ERC-20 token standard.
//!
//! Functions revert instead of returning `false` on failure, as in
//! `OpenZeppelin` Contracts. This is the token the relay moves in tests and
//! in the `erc20-permit` demo.
use alloc::{vec, vec::Vec};

use alloy_primitives::{Address, U256};
pub use sol::*;
use stylus_sdk::{
    call::MethodError,
    evm, msg,
    prelude::*,
    storage::{StorageMap, StorageU256},
};

pub mod extensions;
pub mod interface;
pub mod utils;

#[cfg_attr(coverage_nightly, coverage(off))]
mod sol {
    use alloy_sol_macro::sol;

    sol! {
        /// Emitted when `value` tokens are moved from `from` to `to`.
        ///
        /// Note that `value` may be zero.
        #[derive(Debug)]
        #[allow(missing_docs)]
        event Transfer(address indexed from, address indexed to, uint256 value);

        /// Emitted when the allowance of `spender` for `owner` is set.
        /// `value` is the new allowance.
        #[derive(Debug)]
        #[allow(missing_docs)]
        event Approval(address indexed owner, address indexed spender, uint256 value);
    }

    sol! {
        /// The balance of `sender` is lower than `needed`.
        ///
        /// * `sender` - Account whose tokens are being transferred.
        /// * `balance` - Current balance of `sender`.
        /// * `needed` - Amount the transfer requires.
        #[derive(Debug)]
        #[allow(missing_docs)]
        error ERC20InsufficientBalance(address sender, uint256 balance, uint256 needed);

        /// Tokens cannot be sent from `sender`.
        ///
        /// * `sender` - Account whose tokens are being transferred.
        #[derive(Debug)]
        #[allow(missing_docs)]
        error ERC20InvalidSender(address sender);

        /// Tokens cannot be sent to `receiver`.
        ///
        /// * `receiver` - Account tokens are being transferred to.
        #[derive(Debug)]
        #[allow(missing_docs)]
        error ERC20InvalidReceiver(address receiver);

        /// The allowance of `spender` is lower than `needed`.
        ///
        /// * `spender` - Account spending tokens on behalf of their owner.
        /// * `allowance` - Current allowance of `spender`.
        /// * `needed` - Amount the transfer requires.
        #[derive(Debug)]
        #[allow(missing_docs)]
        error ERC20InsufficientAllowance(address spender, uint256 allowance, uint256 needed);

        /// `spender` cannot be approved.
        ///
        /// * `spender` - Account that would be approved.
        #[derive(Debug)]
        #[allow(missing_docs)]
        error ERC20InvalidSpender(address spender);

        /// `approver` cannot approve.
        ///
        /// * `approver` - Account initiating the approval.
        #[derive(Debug)]
        #[allow(missing_docs)]
        error ERC20InvalidApprover(address approver);
    }
}

/// An [`Erc20`] error defined as described in [ERC-6093].
///
/// [ERC-6093]: https://eips.ethereum.org/EIPS/eip-6093
#[derive(SolidityError, Debug)]
pub enum Error {
    /// The balance of the sender is too low.
    InsufficientBalance(ERC20InsufficientBalance),
    /// Tokens cannot be sent from this account.
    InvalidSender(ERC20InvalidSender),
    /// Tokens cannot be sent to this account.
    InvalidReceiver(ERC20InvalidReceiver),
    /// The allowance of the spender is too low.
    InsufficientAllowance(ERC20InsufficientAllowance),
    /// This account cannot be approved.
    InvalidSpender(ERC20InvalidSpender),
    /// This account cannot approve.
    InvalidApprover(ERC20InvalidApprover),
}

#[cfg_attr(coverage_nightly, coverage(off))]
impl MethodError for Error {
    fn encode(self) -> alloc::vec::Vec<u8> {
        self.into()
    }
}

/// State of an [`Erc20`] token.
#[storage]
pub struct Erc20 {
    /// Balance of every account.
    pub(crate) balances: StorageMap<Address, StorageU256>,
    /// Allowance of every spender, per owner.
    pub(crate) allowances:
        StorageMap<Address, StorageMap<Address, StorageU256>>,
    /// Total amount of tokens in existence.
    pub(crate) total_supply: StorageU256,
}

/// Required interface of an [`Erc20`] compliant contract.
pub trait IErc20 {
    /// The error type associated to this trait implementation.
    type Error: Into<alloc::vec::Vec<u8>>;

    /// Returns the amount of tokens in existence.
    ///
    /// # Arguments
    ///
    /// * `&self` - Read access to the contract's state.
    fn total_supply(&self) -> U256;

    /// Returns the amount of tokens owned by `account`.
    ///
    /// # Arguments
    ///
    /// * `&self` - Read access to the contract's state.
    /// * `account` - Account to read the balance of.
    fn balance_of(&self, account: Address) -> U256;

    /// Moves `value` tokens from the caller to `to`.
    ///
    /// # Arguments
    ///
    /// * `&mut self` - Write access to the contract's state.
    /// * `to` - Account to transfer tokens to.
    /// * `value` - Amount of tokens to transfer.
    ///
    /// # Errors
    ///
    /// * [`Error::InvalidReceiver`] - If `to` is [`Address::ZERO`].
    /// * [`Error::InsufficientBalance`] - If the caller owns less than
    ///   `value`.
    ///
    /// # Events
    ///
    /// * [`Transfer`].
    fn transfer(
        &mut self,
        to: Address,
        value: U256,
    ) -> Result<bool, Self::Error>;

    /// Returns the amount `spender` may still move on behalf of `owner`
    /// through [`Self::transfer_from`].
    ///
    /// # Arguments
    ///
    /// * `&self` - Read access to the contract's state.
    /// * `owner` - Account that owns the tokens.
    /// * `spender` - Account that spends the tokens.
    fn allowance(&self, owner: Address, spender: Address) -> U256;

    /// Sets the allowance of `spender` over the caller's tokens to `value`.
    ///
    /// WARNING: Changing an allowance with this method lets `spender` use
    /// both the old and the new allowance through unfortunate transaction
    /// ordering. Prefer reducing the allowance to zero first.
    ///
    /// # Arguments
    ///
    /// * `&mut self` - Write access to the contract's state.
    /// * `spender` - Account that spends the tokens.
    /// * `value` - New allowance.
    ///
    /// # Errors
    ///
    /// * [`Error::InvalidSpender`] - If `spender` is [`Address::ZERO`].
    ///
    /// # Events
    ///
    /// * [`Approval`].
    fn approve(
        &mut self,
        spender: Address,
        value: U256,
    ) -> Result<bool, Self::Error>;

    /// Moves `value` tokens from `from` to `to`, spending the caller's
    /// allowance.
    ///
    /// NOTE: An allowance of [`U256::MAX`] is infinite and never decreases.
    ///
    /// # Arguments
    ///
    /// * `&mut self` - Write access to the contract's state.
    /// * `from` - Account to transfer tokens from.
    /// * `to` - Account to transfer tokens to.
    /// * `value` - Amount of tokens to transfer.
    ///
    /// # Errors
    ///
    /// * [`Error::InvalidApprover`] - If `from` is [`Address::ZERO`].
    /// * [`Error::InvalidReceiver`] - If `to` is [`Address::ZERO`].
    /// * [`Error::InsufficientAllowance`] - If the caller's allowance is
    ///   lower than `value`.
    /// * [`Error::InsufficientBalance`] - If `from` owns less than `value`.
    ///
    /// # Events
    ///
    /// * [`Transfer`].
    fn transfer_from(
        &mut self,
        from: Address,
        to: Address,
        value: U256,
    ) -> Result<bool, Self::Error>;
}

#[public]
#[implements(IErc20<Error = Error>)]
impl Erc20 {}

#[public]
impl IErc20 for Erc20 {
    type Error = Error;

    fn total_supply(&self) -> U256 {
        self.total_supply.get()
    }

    fn balance_of(&self, account: Address) -> U256 {
        self.balances.get(account)
    }

    fn transfer(
        &mut self,
        to: Address,
        value: U256,
    ) -> Result<bool, Self::Error> {
        let from = msg::sender();
        self._transfer(from, to, value)?;
        Ok(true)
    }

    fn allowance(&self, owner: Address, spender: Address) -> U256 {
        self.allowances.get(owner).get(spender)
    }

    fn approve(
        &mut self,
        spender: Address,
        value: U256,
    ) -> Result<bool, Self::Error> {
        let owner = msg::sender();
        self._approve(owner, spender, value, true)?;
        Ok(true)
    }

    fn transfer_from(
        &mut self,
        from: Address,
        to: Address,
        value: U256,
    ) -> Result<bool, Self::Error> {
        let spender = msg::sender();
        self._spend_allowance(from, spender, value)?;
        self._transfer(from, to, value)?;
        Ok(true)
    }
}

impl Erc20 {
    /// Sets `value` as the allowance of `spender` over `owner`'s tokens.
    ///
    /// # Arguments
    ///
    /// * `&mut self` - Write access to the contract's state.
    /// * `owner` - Account that owns the tokens.
    /// * `spender` - Account that spends the tokens.
    /// * `value` - New allowance.
    /// * `emit_event` - Whether to emit an [`Approval`] event.
    ///
    /// # Errors
    ///
    /// * [`Error::InvalidApprover`] - If `owner` is [`Address::ZERO`].
    /// * [`Error::InvalidSpender`] - If `spender` is [`Address::ZERO`].
    ///
    /// # Events
    ///
    /// * [`Approval`], if `emit_event` is set.
    pub fn _approve(
        &mut self,
        owner: Address,
        spender: Address,
        value: U256,
        emit_event: bool,
    ) -> Result<(), Error> {
        if owner.is_zero() {
            return Err(ERC20InvalidApprover { approver: Address::ZERO }.into());
        }

        if spender.is_zero() {
            return Err(ERC20InvalidSpender { spender: Address::ZERO }.into());
        }

        self.allowances.setter(owner).insert(spender, value);

        if emit_event {
            evm::log(Approval { owner, spender, value });
        }

        Ok(())
    }

    /// Moves `value` tokens from `from` to `to`.
    ///
    /// # Arguments
    ///
    /// * `&mut self` - Write access to the contract's state.
    /// * `from` - Account to transfer tokens from.
    /// * `to` - Account to transfer tokens to.
    /// * `value` - Amount of tokens to transfer.
    ///
    /// # Errors
    ///
    /// * [`Error::InvalidSender`] - If `from` is [`Address::ZERO`].
    /// * [`Error::InvalidReceiver`] - If `to` is [`Address::ZERO`].
    /// * [`Error::InsufficientBalance`] - If `from` owns less than `value`.
    ///
    /// # Events
    ///
    /// * [`Transfer`].
    pub fn _transfer(
        &mut self,
        from: Address,
        to: Address,
        value: U256,
    ) -> Result<(), Error> {
        if from.is_zero() {
            return Err(ERC20InvalidSender { sender: Address::ZERO }.into());
        }

        if to.is_zero() {
            return Err(ERC20InvalidReceiver { receiver: Address::ZERO }.into());
        }

        self._update(from, to, value)
    }

    /// Creates `value` tokens and assigns them to `account`.
    ///
    /// # Arguments
    ///
    /// * `&mut self` - Write access to the contract's state.
    /// * `account` - Account receiving the new tokens.
    /// * `value` - Amount of tokens to create.
    ///
    /// # Errors
    ///
    /// * [`Error::InvalidReceiver`] - If `account` is [`Address::ZERO`].
    ///
    /// # Events
    ///
    /// * [`Transfer`].
    ///
    /// # Panics
    ///
    /// * If the total supply would exceed [`U256::MAX`].
    pub fn _mint(
        &mut self,
        account: Address,
        value: U256,
    ) -> Result<(), Error> {
        if account.is_zero() {
            return Err(ERC20InvalidReceiver { receiver: Address::ZERO }.into());
        }

        self._update(Address::ZERO, account, value)
    }

    /// Destroys `value` tokens of `account`.
    ///
    /// # Arguments
    ///
    /// * `&mut self` - Write access to the contract's state.
    /// * `account` - Account losing the tokens.
    /// * `value` - Amount of tokens to destroy.
    ///
    /// # Errors
    ///
    /// * [`Error::InvalidSender`] - If `account` is [`Address::ZERO`].
    /// * [`Error::InsufficientBalance`] - If `account` owns less than
    ///   `value`.
    ///
    /// # Events
    ///
    /// * [`Transfer`].
    pub fn _burn(
        &mut self,
        account: Address,
        value: U256,
    ) -> Result<(), Error> {
        if account.is_zero() {
            return Err(ERC20InvalidSender { sender: Address::ZERO }.into());
        }

        self._update(account, Address::ZERO, value)
    }

    /// Moves `value` tokens from `from` to `to`, minting when `from` is
    /// [`Address::ZERO`] and burning when `to` is [`Address::ZERO`].
    ///
    /// Every balance change goes through this function.
    ///
    /// # Arguments
    ///
    /// * `&mut self` - Write access to the contract's state.
    /// * `from` - Account to take the tokens from.
    /// * `to` - Account to give the tokens to.
    /// * `value` - Amount of tokens.
    ///
    /// # Errors
    ///
    /// * [`Error::InsufficientBalance`] - If `from` owns less than `value`.
    ///
    /// # Events
    ///
    /// * [`Transfer`].
    ///
    /// # Panics
    ///
    /// * If the total supply would exceed [`U256::MAX`].
    pub fn _update(
        &mut self,
        from: Address,
        to: Address,
        value: U256,
    ) -> Result<(), Error> {
        if from.is_zero() {
            let total_supply = self
                .total_supply
                .get()
                .checked_add(value)
                .expect("should not exceed `U256::MAX` for `total_supply`");
            self.total_supply.set(total_supply);
        } else {
            let from_balance = self.balances.get(from);
            if from_balance < value {
                return Err(ERC20InsufficientBalance {
                    sender: from,
                    balance: from_balance,
                    needed: value,
                }
                .into());
            }
            // `value` <= `from_balance` <= `total_supply`.
            self.balances.setter(from).set(from_balance - value);
        }

        if to.is_zero() {
            // `value` <= `from_balance` <= `total_supply`.
            let total_supply = self.total_supply.get();
            self.total_supply.set(total_supply - value);
        } else {
            // `balance_to + value` <= `total_supply`.
            let balance_to = self.balances.get(to);
            self.balances.setter(to).set(balance_to + value);
        }

        evm::log(Transfer { from, to, value });

        Ok(())
    }

    /// Decreases the allowance of `spender` over `owner`'s tokens by `value`.
    ///
    /// An allowance of [`U256::MAX`] is left untouched.
    ///
    /// # Arguments
    ///
    /// * `&mut self` - Write access to the contract's state.
    /// * `owner` - Account that owns the tokens.
    /// * `spender` - Account that spends the tokens.
    /// * `value` - Amount of tokens spent.
    ///
    /// # Errors
    ///
    /// * [`Error::InsufficientAllowance`] - If the allowance is lower than
    ///   `value`.
    /// * [`Error::InvalidApprover`] - If `owner` is [`Address::ZERO`].
    pub fn _spend_allowance(
        &mut self,
        owner: Address,
        spender: Address,
        value: U256,
    ) -> Result<(), Error> {
        let current_allowance = self.allowance(owner, spender);
        if current_allowance == U256::MAX {
            return Ok(());
        }

        if current_allowance < value {
            return Err(ERC20InsufficientAllowance {
                spender,
                allowance: current_allowance,
                needed: value,
            }
            .into());
        }

        self._approve(owner, spender, current_allowance - value, false)
    }
}
