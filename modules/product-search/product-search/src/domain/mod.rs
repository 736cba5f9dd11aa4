pub mod error;
pub mod ports;
pub mod service;
pub mod signer;
