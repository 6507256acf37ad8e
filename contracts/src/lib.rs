/*!
# Permit Relay for Stylus

A smart contract for [Arbitrum Stylus] that relays an [EIP-2612] permit and
settles a payment in the same transaction.

The token holder signs a permit off-chain. Anyone holding that signature can
submit it to the relay, which then:

1. Calls `permit` on the token, approving the relay for `amount + fee`.
2. Moves `amount` tokens from the holder to the receiver.
3. Moves `fee` tokens from the holder to the submitter of the transaction.

The holder never needs native currency to pay for gas, and the submitter is
compensated in the token itself.

> This project has never been audited nor thoroughly reviewed for security
> vulnerabilities. Do not use in production.

## Usage

```ignore
use permit_relay_stylus::relay::{self, IPermitRelay, PermitRelay};
use stylus_sdk::prelude::*;

#[entrypoint]
#[storage]
struct MyRelay {
    relay: PermitRelay,
}

#[public]
#[implements(IPermitRelay<Error = relay::Error>)]
impl MyRelay {}

#[public]
impl IPermitRelay for MyRelay {
    type Error = relay::Error;

    // Delegate to `self.relay`.
}
```

[Arbitrum Stylus]: https://docs.arbitrum.io/stylus/stylus-gentle-introduction
[EIP-2612]: https://eips.ethereum.org/EIPS/eip-2612
*/

#![allow(
    clippy::module_name_repetitions,
    clippy::used_underscore_items,
    clippy::unreadable_literal
)]
#![cfg_attr(not(any(test, feature = "std")), no_std, no_main)]
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
#![deny(rustdoc::broken_intra_doc_links)]
extern crate alloc;

pub mod relay;
pub mod token;
pub mod utils;
