//! Signer recovery for secp256k1 signatures, through the `ecRecover`
//! precompile.
//!
//! Only canonical signatures are recovered: `v` must be 27 or 28 and `s`
//! must lie in the lower half of the group order, so that each signed
//! message has exactly one accepted signature.

use alloy_primitives::{address, uint, Address, B256, U256};
pub use sol::*;
use stylus_sdk::{
    call::{self, MethodError, StaticCallContext},
    prelude::*,
};

/// Address of the `ecRecover` precompile.
pub const ECRECOVER: Address =
    address!("0000000000000000000000000000000000000001");

/// Half the secp256k1 group order.
pub const HALF_ORDER: U256 = uint!(
    0x7FFFFFFFFFFFFFFFFFFFFFFFFFFFFFFF5D576E7357A4501DDFE92F46681B20A0_U256
);

#[cfg_attr(coverage_nightly, coverage(off))]
mod sol {
    use alloy_sol_macro::sol;

    sol! {
        /// No account recovers from the signature.
        #[derive(Debug)]
        #[allow(missing_docs)]
        error ECDSAInvalidSignature();

        /// The signature's `s` value is in the upper half order.
        ///
        /// * `s` - Rejected `s` value.
        #[derive(Debug)]
        #[allow(missing_docs)]
        error ECDSAInvalidSignatureS(bytes32 s);
    }
}

/// An `ECDSA` error.
#[derive(SolidityError, Debug)]
pub enum Error {
    /// No account recovers from the signature.
    InvalidSignature(ECDSAInvalidSignature),
    /// The signature's `s` value is in the upper half order.
    InvalidSignatureS(ECDSAInvalidSignatureS),
}

#[cfg_attr(coverage_nightly, coverage(off))]
impl MethodError for Error {
    fn encode(self) -> alloc::vec::Vec<u8> {
        self.into()
    }
}

/// A signature split the way EIP-2612 `permit` takes it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Signature {
    /// Recovery id, 27 or 28.
    pub v: u8,
    /// `r` value.
    pub r: B256,
    /// `s` value.
    pub s: B256,
}

impl Signature {
    /// Returns the account that signed `hash`.
    ///
    /// # Arguments
    ///
    /// * `&self` - The signature.
    /// * `context` - Context for the static call to [`ECRECOVER`].
    /// * `hash` - Signed digest.
    ///
    /// # Errors
    ///
    /// * [`Error::InvalidSignatureS`] - If `s` is above [`HALF_ORDER`].
    /// * [`Error::InvalidSignature`] - If `v` is neither 27 nor 28, or no
    ///   account recovers from the signature.
    ///
    /// # Panics
    ///
    /// * If the `ecRecover` precompile cannot be called.
    pub fn recover(
        &self,
        context: impl StaticCallContext,
        hash: B256,
    ) -> Result<Address, Error> {
        self.ensure_canonical()?;

        let output =
            call::static_call(context, ECRECOVER, &self.precompile_input(hash))
                .expect("should call `ecRecover` precompile");

        // Unrecoverable signatures produce no output.
        match output.get(12..32).map(Address::from_slice) {
            Some(signer) if !signer.is_zero() => Ok(signer),
            _ => Err(ECDSAInvalidSignature {}.into()),
        }
    }

    fn ensure_canonical(&self) -> Result<(), Error> {
        if U256::from_be_slice(self.s.as_slice()) > HALF_ORDER {
            return Err(ECDSAInvalidSignatureS { s: self.s }.into());
        }
        if !matches!(self.v, 27 | 28) {
            return Err(ECDSAInvalidSignature {}.into());
        }
        Ok(())
    }

    /// `hash`, `v`, `r` and `s` as four 32-byte words.
    fn precompile_input(&self, hash: B256) -> [u8; 128] {
        let mut input = [0u8; 128];
        input[..32].copy_from_slice(hash.as_slice());
        input[63] = self.v;
        input[64..96].copy_from_slice(self.r.as_slice());
        input[96..].copy_from_slice(self.s.as_slice());
        input
    }
}

#[cfg(test)]
mod tests {
    use alloy_primitives::{keccak256, B256, U256};
    use alloy_signer::SignerSync;
    use alloy_signer_local::PrivateKeySigner;
    use motsu::prelude::*;

    use super::*;

    #[storage]
    struct Verifier;

    unsafe impl TopLevelStorage for Verifier {}

    #[public]
    impl Verifier {}

    fn sign(signer: &PrivateKeySigner, hash: B256) -> Signature {
        let signature =
            signer.sign_hash_sync(&hash).expect("should sign the hash");

        Signature {
            v: 27 + u8::from(signature.v()),
            r: B256::from_slice(&signature.r().to_be_bytes_vec()),
            s: B256::from_slice(&signature.s().to_be_bytes_vec()),
        }
    }

    #[test]
    fn precompile_input_is_word_aligned() {
        let signature = Signature {
            v: 28,
            r: B256::repeat_byte(0xaa),
            s: B256::repeat_byte(0xbb),
        };

        let input = signature.precompile_input(B256::repeat_byte(0x11));

        assert_eq!([0x11_u8; 32], input[..32]);
        assert_eq!([0_u8; 31], input[32..63]);
        assert_eq!(28, input[63]);
        assert_eq!([0xaa_u8; 32], input[64..96]);
        assert_eq!([0xbb_u8; 32], input[96..]);
    }

    #[test]
    fn accepts_s_at_half_order() {
        let signature = Signature {
            v: 27,
            r: B256::ZERO,
            s: B256::from_slice(&HALF_ORDER.to_be_bytes_vec()),
        };

        assert!(signature.ensure_canonical().is_ok());
    }

    #[test]
    fn rejects_s_above_half_order() {
        let s = B256::from_slice(&(HALF_ORDER + U256::ONE).to_be_bytes_vec());
        let signature = Signature { v: 27, r: B256::ZERO, s };

        let err = signature
            .ensure_canonical()
            .expect_err("should reject a malleable `s`");

        assert!(matches!(
            err,
            Error::InvalidSignatureS(ECDSAInvalidSignatureS { s: rejected })
                if rejected == s
        ));
    }

    #[test]
    fn rejects_raw_parity_and_unknown_v() {
        for v in [0, 1, 26, 29] {
            let signature = Signature { v, r: B256::ZERO, s: B256::ZERO };

            let err = signature
                .ensure_canonical()
                .expect_err("should reject a non-canonical `v`");

            assert!(matches!(
                err,
                Error::InvalidSignature(ECDSAInvalidSignature {})
            ));
        }
    }

    #[motsu::test]
    fn recovers_signer(contract: Contract<Verifier>, alice: Address) {
        let signer = PrivateKeySigner::random();
        let hash = keccak256("permit relay");
        let signature = sign(&signer, hash);

        let recovered = signature
            .recover(&*contract.sender(alice), hash)
            .expect("should recover the signer");

        assert_eq!(signer.address(), recovered);
    }

    #[motsu::test]
    fn recovers_other_account_for_other_hash(
        contract: Contract<Verifier>,
        alice: Address,
    ) {
        let signer = PrivateKeySigner::random();
        let signature = sign(&signer, keccak256("permit relay"));

        let recovered = signature
            .recover(&*contract.sender(alice), keccak256("something else"));

        assert!(!matches!(
            recovered,
            Ok(account) if account == signer.address()
        ));
    }
}
