mod bank;
mod config;
pub mod constants;
mod result;
mod suite;
mod tracing;
mod verifier;

pub use {bank::*, config::*, result::*, suite::*, tracing::*, verifier::*};
