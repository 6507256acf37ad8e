//! [EIP-712] hashing of typed structured data.
//!
//! The domain separator is recomputed on every use from the current chain id
//! and contract address, so signatures cannot be replayed on a fork of the
//! chain or against another deployment.
//!
//! NOTE: This is the "v4" encoding, as produced by the
//! [`eth_signTypedData_v4`] JSON-RPC method.
//!
//! [EIP-712]: https://eips.ethereum.org/EIPS/eip-712
//! [`eth_signTypedData_v4`]: https://docs.metamask.io/wallet/reference/json-rpc-methods/eth_signtypeddata_v4/

use alloc::{borrow::ToOwned, string::String, vec, vec::Vec};

use alloy_primitives::{
    b256, fixed_bytes, keccak256, Address, FixedBytes, B256, U256,
};
use alloy_sol_types::{sol, SolType};
use stylus_sdk::{block, contract};

use crate::utils::cryptography::message_hash_utils::to_typed_data_hash;

/// keccak256("EIP712Domain(string name,string version,uint256 chainId,address
/// verifyingContract)")
pub const TYPE_HASH: B256 =
    b256!("8b73c3c69bb8fe3d512ecc4cf759cc79239f7b179b0ffacaa9a75d522b39400f");

/// Bit set of the domain fields in use: name, version, chain id and
/// verifying contract.
pub const FIELDS: FixedBytes<1> = fixed_bytes!("0f");

/// The domain has no salt.
pub const SALT: B256 = B256::ZERO;

/// ABI layout of the encoded domain.
pub type DomainSeparatorTuple = sol! {
    tuple(bytes32, bytes32, bytes32, uint256, address)
};

/// Fields of an EIP-712 domain, in the order defined by [ERC-5267].
///
/// [ERC-5267]: https://eips.ethereum.org/EIPS/eip-5267
pub type Eip712Domain =
    (FixedBytes<1>, String, String, U256, Address, B256, Vec<U256>);

/// Configuration and hashing of an EIP-712 signing domain.
///
/// Implementors only need to provide [`IEip712::NAME`] and
/// [`IEip712::VERSION`]; everything else has a default.
pub trait IEip712 {
    /// Name of the signing domain, usually the name of the token.
    const NAME: &'static str;
    /// keccak256 of [`IEip712::NAME`].
    const HASHED_NAME: [u8; 32] =
        keccak_const::Keccak256::new().update(Self::NAME.as_bytes()).finalize();

    /// Version of the signing domain.
    const VERSION: &'static str;
    /// keccak256 of [`IEip712::VERSION`].
    const HASHED_VERSION: [u8; 32] = keccak_const::Keccak256::new()
        .update(Self::VERSION.as_bytes())
        .finalize();

    /// Returns the id of the current chain.
    fn chain_id() -> U256 {
        U256::from(block::chainid())
    }

    /// Returns the address that verifies the signatures.
    fn contract_address() -> Address {
        contract::address()
    }

    /// Returns the fields and values of the domain.
    ///
    /// # Arguments
    ///
    /// * `&self` - Read access to the contract's state.
    fn eip712_domain(&self) -> Eip712Domain {
        (
            FIELDS,
            Self::NAME.to_owned(),
            Self::VERSION.to_owned(),
            Self::chain_id(),
            Self::contract_address(),
            SALT,
            Vec::new(),
        )
    }

    /// Returns the domain separator of the current chain.
    ///
    /// # Arguments
    ///
    /// * `&self` - Read access to the contract's state.
    fn domain_separator_v4(&self) -> B256 {
        let encoded = DomainSeparatorTuple::abi_encode(&(
            TYPE_HASH,
            B256::new(Self::HASHED_NAME),
            B256::new(Self::HASHED_VERSION),
            Self::chain_id(),
            Self::contract_address(),
        ));

        keccak256(encoded)
    }

    /// Returns the digest to sign for an already [hashed struct] in this
    /// domain.
    ///
    /// [hashed struct]: https://eips.ethereum.org/EIPS/eip-712#definition-of-hashstruct
    ///
    /// # Arguments
    ///
    /// * `&self` - Read access to the contract's state.
    /// * `struct_hash` - `hashStruct` of the signed message.
    fn hash_typed_data_v4(&self, struct_hash: B256) -> B256 {
        let domain_separator = self.domain_separator_v4();
        to_typed_data_hash(&domain_separator, &struct_hash)
    }
}
