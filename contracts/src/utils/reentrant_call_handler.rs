//! Raw contract calls that stay sound when the `reentrant` feature is on.
//!
//! With `reentrant` enabled, a called contract may call back into the caller.
//! Storage values cached by the caller would then alias the callee's writes,
//! so the cache is flushed before the call is made. Without the feature the
//! call is made as is.

use alloy_primitives::Address;
use stylus_sdk::{call::RawCall, ArbResult};

/// Performs a [`RawCall`], flushing the storage cache first when reentrancy
/// is allowed.
pub trait ReentrantCallHandler {
    /// Calls `contract` with `call_data`.
    ///
    /// # Arguments
    ///
    /// * `contract` - Address of the called contract.
    /// * `call_data` - ABI encoded call.
    ///
    /// # Errors
    ///
    /// * The revert data of `contract`, if the call reverted.
    fn call_with_reentrant_handling(
        self,
        contract: Address,
        call_data: &[u8],
    ) -> ArbResult;
}

impl ReentrantCallHandler for RawCall {
    fn call_with_reentrant_handling(
        self,
        contract: Address,
        call_data: &[u8],
    ) -> ArbResult {
        #[cfg(feature = "reentrant")]
        unsafe {
            self.flush_storage_cache().call(contract, call_data)
        }
        // SAFETY: without `reentrant` the callee cannot call back into this
        // contract, so no cached storage value can be aliased.
        #[cfg(not(feature = "reentrant"))]
        unsafe {
            self.call(contract, call_data)
        }
    }
}
