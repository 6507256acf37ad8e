//! Permit extension of the ERC-20 standard, as defined in [EIP-2612].
//!
//! Adds [`Erc20Permit::permit`], which sets an allowance from a message
//! signed off-chain by the token holder. The holder does not need to send a
//! transaction, and so does not need to hold native currency at all. This is
//! what makes [`crate::relay::PermitRelay`] possible.
//!
//! [EIP-2612]: https://eips.ethereum.org/EIPS/eip-2612

use alloc::{vec, vec::Vec};

use alloy_primitives::{b256, keccak256, Address, B256, U256};
use alloy_sol_types::SolType;
pub use sol::*;
use stylus_sdk::{block, call::MethodError, prelude::*};

use crate::{
    token::erc20::{self, Erc20},
    utils::{
        cryptography::{
            ecdsa::{self, Signature},
            eip712::IEip712,
        },
        nonces::Nonces,
    },
};

/// keccak256("Permit(address owner,address spender,uint256 value,uint256
/// nonce,uint256 deadline)")
pub const PERMIT_TYPEHASH: B256 =
    b256!("6e71edae12b1b97f4d1f60370fef10105fa2faae0126114a169c64845d6126c9");

/// ABI layout of the hashed `Permit` struct.
pub type StructHashTuple = alloy_sol_types::sol! {
    tuple(bytes32, address, address, uint256, uint256, uint256)
};

#[cfg_attr(coverage_nightly, coverage(off))]
mod sol {
    use alloy_sol_macro::sol;

    sol! {
        /// The permit `deadline` has passed.
        ///
        /// * `deadline` - Timestamp the permit was valid until.
        #[derive(Debug)]
        #[allow(missing_docs)]
        error ERC2612ExpiredSignature(uint256 deadline);

        /// The permit was signed by `signer` instead of `owner`.
        ///
        /// * `signer` - Account recovered from the signature.
        /// * `owner` - Account the permit is for.
        #[derive(Debug)]
        #[allow(missing_docs)]
        error ERC2612InvalidSigner(address signer, address owner);
    }
}

/// An [`Erc20Permit`] error.
#[derive(SolidityError, Debug)]
pub enum Error {
    /// The permit `deadline` has passed.
    ExpiredSignature(ERC2612ExpiredSignature),
    /// The permit was not signed by its owner.
    InvalidSigner(ERC2612InvalidSigner),
    /// The balance of the sender is too low.
    InsufficientBalance(erc20::ERC20InsufficientBalance),
    /// Tokens cannot be sent from this account.
    InvalidSender(erc20::ERC20InvalidSender),
    /// Tokens cannot be sent to this account.
    InvalidReceiver(erc20::ERC20InvalidReceiver),
    /// The allowance of the spender is too low.
    InsufficientAllowance(erc20::ERC20InsufficientAllowance),
    /// This account cannot be approved.
    InvalidSpender(erc20::ERC20InvalidSpender),
    /// This account cannot approve.
    InvalidApprover(erc20::ERC20InvalidApprover),
    /// The signature recovers to [`Address::ZERO`].
    ECDSAInvalidSignature(ecdsa::ECDSAInvalidSignature),
    /// The signature has an `s` value in the upper half order.
    ECDSAInvalidSignatureS(ecdsa::ECDSAInvalidSignatureS),
}

impl From<erc20::Error> for Error {
    fn from(value: erc20::Error) -> Self {
        match value {
            erc20::Error::InsufficientBalance(e) => {
                Error::InsufficientBalance(e)
            }
            erc20::Error::InvalidSender(e) => Error::InvalidSender(e),
            erc20::Error::InvalidReceiver(e) => Error::InvalidReceiver(e),
            erc20::Error::InsufficientAllowance(e) => {
                Error::InsufficientAllowance(e)
            }
            erc20::Error::InvalidSpender(e) => Error::InvalidSpender(e),
            erc20::Error::InvalidApprover(e) => Error::InvalidApprover(e),
        }
    }
}

impl From<ecdsa::Error> for Error {
    fn from(value: ecdsa::Error) -> Self {
        match value {
            ecdsa::Error::InvalidSignature(e) => {
                Error::ECDSAInvalidSignature(e)
            }
            ecdsa::Error::InvalidSignatureS(e) => {
                Error::ECDSAInvalidSignatureS(e)
            }
        }
    }
}

#[cfg_attr(coverage_nightly, coverage(off))]
impl MethodError for Error {
    fn encode(self) -> alloc::vec::Vec<u8> {
        self.into()
    }
}

/// State of an [`Erc20Permit`] contract.
///
/// `T` configures the EIP-712 signing domain, usually a zero-sized
/// `#[storage]` struct implementing [`IEip712`].
#[storage]
pub struct Erc20Permit<T: IEip712 + StorageType> {
    /// EIP-712 signing domain.
    pub(crate) eip712: T,
}

/// NOTE: Implementation of [`TopLevelStorage`] to be able use `&self` as the
/// context of the `ecRecover` static call.
unsafe impl<T: IEip712 + StorageType> TopLevelStorage for Erc20Permit<T> {}

/// Required interface of an [`Erc20Permit`] compliant contract.
pub trait IErc20Permit {
    /// The error type associated to this trait implementation.
    type Error: Into<alloc::vec::Vec<u8>>;

    /// Returns the next unused permit nonce of `owner`.
    ///
    /// # Arguments
    ///
    /// * `&self` - Read access to the contract's state.
    /// * `owner` - Account to read the nonce of.
    fn nonces(&self, owner: Address) -> U256;

    /// Returns the domain separator of the permit signatures.
    ///
    /// # Arguments
    ///
    /// * `&self` - Read access to the contract's state.
    fn domain_separator(&self) -> B256;

    /// Sets `value` as the allowance of `spender` over `owner`'s tokens,
    /// given `owner`'s signature.
    ///
    /// See [`Erc20Permit::permit`].
    ///
    /// # Arguments
    ///
    /// * `&mut self` - Write access to the contract's state.
    /// * `owner` - Account that owns the tokens.
    /// * `spender` - Account that spends the tokens.
    /// * `value` - New allowance.
    /// * `deadline` - Last timestamp at which the permit is valid.
    /// * `v` - `v` value from the `owner`'s signature.
    /// * `r` - `r` value from the `owner`'s signature.
    /// * `s` - `s` value from the `owner`'s signature.
    ///
    /// # Errors
    ///
    /// * [`Error::ExpiredSignature`] - If `deadline` has passed.
    /// * [`Error::InvalidSigner`] - If the signer is not `owner`.
    #[allow(clippy::too_many_arguments)]
    fn permit(
        &mut self,
        owner: Address,
        spender: Address,
        value: U256,
        deadline: U256,
        v: u8,
        r: B256,
        s: B256,
    ) -> Result<(), Self::Error>;
}

impl<T: IEip712 + StorageType> Erc20Permit<T> {
    /// Returns the domain separator of the permit signatures.
    ///
    /// # Arguments
    ///
    /// * `&self` - Read access to the contract's state.
    #[must_use]
    pub fn domain_separator(&self) -> B256 {
        self.eip712.domain_separator_v4()
    }

    /// Sets `value` as the allowance of `spender` over `owner`'s tokens,
    /// given `owner`'s signature over the EIP-712 `Permit` struct.
    ///
    /// The signature must use `owner`'s current nonce, which is consumed.
    ///
    /// # Arguments
    ///
    /// * `&mut self` - Write access to the contract's state.
    /// * `owner` - Account that owns the tokens.
    /// * `spender` - Account that spends the tokens.
    /// * `value` - New allowance.
    /// * `deadline` - Last timestamp at which the permit is valid.
    /// * `v` - `v` value from the `owner`'s signature.
    /// * `r` - `r` value from the `owner`'s signature.
    /// * `s` - `s` value from the `owner`'s signature.
    /// * `erc20` - Token the allowance is set on.
    /// * `nonces` - Nonces of the permit signers.
    ///
    /// # Errors
    ///
    /// * [`Error::ExpiredSignature`] - If `deadline` is before the current
    ///   block timestamp.
    /// * [`Error::ECDSAInvalidSignatureS`] - If the signature is malleable.
    /// * [`Error::ECDSAInvalidSignature`] - If the signature recovers to
    ///   [`Address::ZERO`].
    /// * [`Error::InvalidSigner`] - If the signer is not `owner`.
    /// * [`Error::InvalidSpender`] - If `spender` is [`Address::ZERO`].
    ///
    /// # Events
    ///
    /// * [`erc20::Approval`].
    ///
    /// # Panics
    ///
    /// * If the nonce of `owner` would exceed [`U256::MAX`].
    #[allow(clippy::too_many_arguments)]
    pub fn permit(
        &mut self,
        owner: Address,
        spender: Address,
        value: U256,
        deadline: U256,
        v: u8,
        r: B256,
        s: B256,
        erc20: &mut Erc20,
        nonces: &mut Nonces,
    ) -> Result<(), Error> {
        if U256::from(block::timestamp()) > deadline {
            return Err(ERC2612ExpiredSignature { deadline }.into());
        }

        let struct_hash = keccak256(StructHashTuple::abi_encode(&(
            PERMIT_TYPEHASH,
            owner,
            spender,
            value,
            nonces.use_nonce(owner),
            deadline,
        )));

        let hash = self.eip712.hash_typed_data_v4(struct_hash);

        let signer = Signature { v, r, s }.recover(&*self, hash)?;
        if signer != owner {
            return Err(ERC2612InvalidSigner { signer, owner }.into());
        }

        erc20._approve(owner, spender, value, true)?;

        Ok(())
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use alloy_primitives::{uint, Address, B256, U256};
    use alloy_signer::SignerSync;
    use alloy_signer_local::PrivateKeySigner;
    use motsu::prelude::*;
    use stylus_sdk::block;

    use super::*;
    use crate::{
        token::erc20::{ERC20InvalidSpender, IErc20},
        utils::cryptography::message_hash_utils::to_typed_data_hash,
    };

    /// Signs the EIP-712 `Permit` struct with `signer`.
    pub(crate) fn sign_permit(
        signer: &PrivateKeySigner,
        domain_separator: B256,
        spender: Address,
        value: U256,
        nonce: U256,
        deadline: U256,
    ) -> Signature {
        let struct_hash = keccak256(StructHashTuple::abi_encode(&(
            PERMIT_TYPEHASH,
            signer.address(),
            spender,
            value,
            nonce,
            deadline,
        )));
        let hash = to_typed_data_hash(&domain_separator, &struct_hash);

        let signature =
            signer.sign_hash_sync(&hash).expect("should sign the permit");

        Signature {
            v: 27 + u8::from(signature.v()),
            r: B256::from_slice(&signature.r().to_be_bytes_vec()),
            s: B256::from_slice(&signature.s().to_be_bytes_vec()),
        }
    }

    /// Deadline one hour after the current block.
    pub(crate) fn fair_deadline() -> U256 {
        U256::from(block::timestamp() + 3600)
    }

    #[storage]
    pub(crate) struct TokenDomain;

    impl IEip712 for TokenDomain {
        const NAME: &'static str = "Relay Test Token";
        const VERSION: &'static str = "1";
    }

    /// ERC-20 token with permit, as deployed next to a relay.
    #[storage]
    pub(crate) struct PermitToken {
        pub(crate) erc20: Erc20,
        pub(crate) nonces: Nonces,
        pub(crate) erc20_permit: Erc20Permit<TokenDomain>,
    }

    unsafe impl TopLevelStorage for PermitToken {}

    #[public]
    #[implements(IErc20<Error = erc20::Error>, IErc20Permit<Error = Error>)]
    impl PermitToken {}

    #[public]
    impl IErc20 for PermitToken {
        type Error = erc20::Error;

        fn total_supply(&self) -> U256 {
            self.erc20.total_supply()
        }

        fn balance_of(&self, account: Address) -> U256 {
            self.erc20.balance_of(account)
        }

        fn transfer(
            &mut self,
            to: Address,
            value: U256,
        ) -> Result<bool, Self::Error> {
            self.erc20.transfer(to, value)
        }

        fn allowance(&self, owner: Address, spender: Address) -> U256 {
            self.erc20.allowance(owner, spender)
        }

        fn approve(
            &mut self,
            spender: Address,
            value: U256,
        ) -> Result<bool, Self::Error> {
            self.erc20.approve(spender, value)
        }

        fn transfer_from(
            &mut self,
            from: Address,
            to: Address,
            value: U256,
        ) -> Result<bool, Self::Error> {
            self.erc20.transfer_from(from, to, value)
        }
    }

    #[public]
    impl IErc20Permit for PermitToken {
        type Error = Error;

        fn nonces(&self, owner: Address) -> U256 {
            self.nonces.nonces(owner)
        }

        #[selector(name = "DOMAIN_SEPARATOR")]
        fn domain_separator(&self) -> B256 {
            self.erc20_permit.domain_separator()
        }

        fn permit(
            &mut self,
            owner: Address,
            spender: Address,
            value: U256,
            deadline: U256,
            v: u8,
            r: B256,
            s: B256,
        ) -> Result<(), Self::Error> {
            self.erc20_permit.permit(
                owner,
                spender,
                value,
                deadline,
                v,
                r,
                s,
                &mut self.erc20,
                &mut self.nonces,
            )
        }
    }

    #[motsu::test]
    fn permit_sets_allowance_and_consumes_nonce(
        token: Contract<PermitToken>,
        bob: Address,
    ) {
        let owner = PrivateKeySigner::random();
        let value = uint!(42_U256);
        let deadline = fair_deadline();
        let domain_separator = token.sender(bob).domain_separator();
        let sig = sign_permit(
            &owner,
            domain_separator,
            bob,
            value,
            U256::ZERO,
            deadline,
        );

        token
            .sender(bob)
            .permit(owner.address(), bob, value, deadline, sig.v, sig.r, sig.s)
            .expect("should accept the owner's signature");

        assert_eq!(value, token.sender(bob).allowance(owner.address(), bob));
        assert_eq!(U256::ONE, token.sender(bob).nonces(owner.address()));
        token.assert_emitted(&erc20::Approval {
            owner: owner.address(),
            spender: bob,
            value,
        });
    }

    #[motsu::test]
    fn permit_rejects_replayed_signature(
        token: Contract<PermitToken>,
        bob: Address,
    ) {
        let owner = PrivateKeySigner::random();
        let value = uint!(42_U256);
        let deadline = fair_deadline();
        let domain_separator = token.sender(bob).domain_separator();
        let sig = sign_permit(
            &owner,
            domain_separator,
            bob,
            value,
            U256::ZERO,
            deadline,
        );

        token
            .sender(bob)
            .permit(owner.address(), bob, value, deadline, sig.v, sig.r, sig.s)
            .expect("should accept the owner's signature");

        let err = token
            .sender(bob)
            .permit(owner.address(), bob, value, deadline, sig.v, sig.r, sig.s)
            .expect_err("should reject a used nonce");

        assert!(matches!(
            err,
            Error::InvalidSigner(ERC2612InvalidSigner { owner: o, .. })
                if o == owner.address()
        ));
    }

    #[motsu::test]
    fn permit_rejects_expired_deadline(
        token: Contract<PermitToken>,
        alice: Address,
        bob: Address,
    ) {
        let err = token
            .sender(bob)
            .permit(
                alice,
                bob,
                U256::ONE,
                U256::ZERO,
                27,
                B256::ZERO,
                B256::ZERO,
            )
            .expect_err("should reject an expired permit");

        assert!(matches!(
            err,
            Error::ExpiredSignature(ERC2612ExpiredSignature { deadline })
                if deadline.is_zero()
        ));
    }

    #[motsu::test]
    fn permit_rejects_other_signer(
        token: Contract<PermitToken>,
        alice: Address,
        bob: Address,
    ) {
        let mallory = PrivateKeySigner::random();
        let value = uint!(42_U256);
        let deadline = fair_deadline();
        let domain_separator = token.sender(bob).domain_separator();
        let sig = sign_permit(
            &mallory,
            domain_separator,
            bob,
            value,
            U256::ZERO,
            deadline,
        );

        let err = token
            .sender(bob)
            .permit(alice, bob, value, deadline, sig.v, sig.r, sig.s)
            .expect_err("should reject a signature of another account");

        assert!(matches!(
            err,
            Error::InvalidSigner(ERC2612InvalidSigner { owner, .. })
                if owner == alice
        ));
        assert_eq!(U256::ZERO, token.sender(bob).allowance(alice, bob));
    }

    #[motsu::test]
    fn permit_rejects_zero_spender(token: Contract<PermitToken>, bob: Address) {
        let owner = PrivateKeySigner::random();
        let deadline = fair_deadline();
        let domain_separator = token.sender(bob).domain_separator();
        let sig = sign_permit(
            &owner,
            domain_separator,
            Address::ZERO,
            U256::ONE,
            U256::ZERO,
            deadline,
        );

        let err = token
            .sender(bob)
            .permit(
                owner.address(),
                Address::ZERO,
                U256::ONE,
                deadline,
                sig.v,
                sig.r,
                sig.s,
            )
            .expect_err("should not approve the zero address");

        assert!(matches!(
            err,
            Error::InvalidSpender(ERC20InvalidSpender { spender })
                if spender.is_zero()
        ));
    }
}
