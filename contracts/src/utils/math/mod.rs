//! Math helpers.
pub(crate) mod storage;
