#![cfg_attr(not(any(test, feature = "export-abi")), no_main)]
extern crate alloc;

use permit_relay_stylus::relay::{self, IPermitRelay, PermitRelay};
use stylus_sdk::{
    alloy_primitives::{Address, B256, U256},
    prelude::*,
};

#[entrypoint]
#[storage]
struct PermitRelayExample {
    relay: PermitRelay,
}

#[public]
#[implements(IPermitRelay<Error = relay::Error>)]
impl PermitRelayExample {}

#[public]
impl IPermitRelay for PermitRelayExample {
    type Error = relay::Error;

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
        self.relay.permit_and_transfer(
            token, owner, receiver, amount, fee, deadline, v, r, s,
        )
    }
}
