//! The payload that gets signed.
//!
//! Note that the call goes in bare: prefixing it with its length would change the data-as-signed
//! and the runtime would reject every signature over it. This also means the payload cannot be
//! decoded back, which is fine since it is only ever produced for signing.

use crate::chain_data::{Call, Hash, Nonce, TransactionPayment};
use crate::era::Era;
use crate::error::{Error, Result};
use crate::scale::{self, Decode};
use codec::{Encode, Input, Output};
use serde::Deserialize;

/// The versions of the runtime the transaction is built for.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuntimeVersion {
    pub spec_version: u32,
    pub transaction_version: u32,
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct ExtrinsicPayload {
    /// The encoded call.
    pub method: Vec<u8>,
    pub era: Era,
    pub nonce: Nonce,
    pub payment: TransactionPayment,
    pub spec_version: u32,
    pub transaction_version: u32,
    pub genesis_hash: Hash,
    /// The hash of the block the era is anchored at. Equals the genesis hash for immortal eras.
    pub block_hash: Hash,
}

impl ExtrinsicPayload {
    pub fn new(
        call: &Call,
        era: Era,
        nonce: Nonce,
        payment: TransactionPayment,
        runtime_version: RuntimeVersion,
        genesis_hash: Hash,
        block_hash: Hash,
    ) -> Self {
        Self {
            method: call.encode(),
            era,
            nonce,
            payment,
            spec_version: runtime_version.spec_version,
            transaction_version: runtime_version.transaction_version,
            genesis_hash,
            block_hash,
        }
    }
}

impl Encode for ExtrinsicPayload {
    fn size_hint(&self) -> usize {
        self.method.len()
            + self.era.size_hint()
            + scale::compact_len(self.nonce.into())
            + self.payment.size_hint()
            + 4
            + 4
            + 32
            + 32
    }

    fn encode_to<T: Output + ?Sized>(&self, dest: &mut T) {
        scale::encode_bytes_bare(&self.method, dest);
        self.era.encode_to(dest);
        scale::encode_compact(self.nonce.into(), dest);
        self.payment.encode_to(dest);
        self.spec_version.encode_to(dest);
        self.transaction_version.encode_to(dest);
        self.genesis_hash.encode_to(dest);
        self.block_hash.encode_to(dest);
    }
}

impl Decode for ExtrinsicPayload {
    fn decode_from<I: Input>(_input: &mut I) -> Result<Self> {
        Err(Error::UnsupportedOperation("decoding of an extrinsic payload"))
    }
}
