#![deny(missing_docs)]

//! txsig signing SDK.
//!
//! Re-exports all txsig components for convenient single-crate usage.

pub use txsig_primitives as primitives;
pub use txsig_transaction as transaction;
pub use txsig_wallet as wallet;
