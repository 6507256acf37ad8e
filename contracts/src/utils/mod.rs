//! Common Smart Contracts utilities.
pub mod cryptography;
pub mod math;
pub mod nonces;
pub mod reentrant_call_handler;

pub use reentrant_call_handler::ReentrantCallHandler;
