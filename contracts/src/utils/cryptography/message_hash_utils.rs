//! Digests of signed messages, as consumed by
//! [`super::ecdsa::Signature::recover`].
//!
//! Only the structured data flavour of [ERC-191] (version `0x01`, used by
//! [EIP-712]) is needed by permits.
//!
//! [ERC-191]: https://eips.ethereum.org/EIPS/eip-191
//! [EIP-712]: https://eips.ethereum.org/EIPS/eip-712

use alloy_primitives::{keccak256, B256};

/// ERC-191 prefix of version `0x01` messages.
pub const TYPED_DATA_PREFIX: [u8; 2] = [0x19, 0x01];

/// Returns `keccak256("\x19\x01" ‖ domain_separator ‖ struct_hash)`.
///
/// This is the digest signed by the `eth_signTypedData` JSON-RPC method.
#[must_use]
pub fn to_typed_data_hash(
    domain_separator: &[u8; 32],
    struct_hash: &[u8; 32],
) -> B256 {
    let mut preimage = [0u8; 66];
    preimage[..2].copy_from_slice(&TYPED_DATA_PREFIX);
    preimage[2..34].copy_from_slice(domain_separator);
    preimage[34..].copy_from_slice(struct_hash);
    keccak256(preimage)
}
