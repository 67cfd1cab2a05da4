//! Hyperlane validator container: signing key, container lookup, launch.

pub mod containers;
pub mod key;
pub mod launch;

pub use key::PrivateKey;
pub use launch::{launch, ValidatorInput};
