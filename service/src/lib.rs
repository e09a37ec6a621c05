//! A crate that builds, signs and submits extrinsics to a remote substrate node.
//!
//! The pipeline is: [`ExtrinsicPayload`] → [`signer::sign`] → [`Extrinsic`] →
//! [`comm::submit`]. [`service::sign_and_submit`] runs all of it in one go.

pub mod chain_data;
pub mod comm;
mod config;
pub mod era;
pub mod error;
pub mod extrinsic;
pub mod payload;
pub mod scale;
pub mod service;
pub mod signer;

pub use chain_data::{
    AccountId, Address, Balance, Call, CallIndex, FeeExchange, Hash, MultiSignature, Nonce,
    TransactionPayment,
};
pub use comm::{submit, RpcComm, Transport};
pub use config::Config;
pub use era::Era;
pub use error::{Error, Result};
pub use extrinsic::{assemble, extrinsic_hash, Extrinsic, ExtrinsicSignature};
pub use payload::{ExtrinsicPayload, RuntimeVersion};
pub use service::{build_signed, sign_and_submit, ChainState};
pub use signer::{CryptoScheme, KeyPair, Signer};
