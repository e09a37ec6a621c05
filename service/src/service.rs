//! High-level logic that orchestrates building, signing and submitting an extrinsic.
//!
//! Every step works only on its arguments. The chain state is gathered up front into a
//! [`ChainState`] and nothing is cached between submissions.

use crate::chain_data::{Address, Call, Hash, Nonce, TransactionPayment};
use crate::comm::{self, RpcComm, Transport};
use crate::era::Era;
use crate::error::Result;
use crate::extrinsic::{Extrinsic, ExtrinsicSignature};
use crate::payload::{ExtrinsicPayload, RuntimeVersion};
use crate::signer::{self, Signer};
use codec::Encode;
use log::{debug, info};

/// The chain state a single extrinsic is built against.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct ChainState {
    pub genesis_hash: Hash,
    pub runtime_version: RuntimeVersion,
    pub nonce: Nonce,
    pub era: Era,
    /// The hash of the block the era starts at, or the genesis hash for an immortal era.
    pub block_hash: Hash,
}

impl ChainState {
    /// Query everything needed to sign on behalf of `signer`.
    ///
    /// With `era_period` set the transaction is made mortal, anchored at the finalized head.
    pub async fn fetch<S: Signer + ?Sized>(
        comm: &RpcComm,
        signer: &S,
        era_period: Option<u64>,
    ) -> anyhow::Result<Self> {
        let genesis_hash = comm.genesis_hash().await?;
        let runtime_version = comm.runtime_version().await?;
        let nonce = comm.account_next_index(&signer.account_id()).await?;

        let (era, block_hash) = match era_period {
            None => (Era::Immortal, genesis_hash),
            Some(period) => {
                let head = comm.finalized_head().await?;
                let head_number = comm.header(&head).await?.number()?;
                let era = Era::mortal(period, head_number);
                // The phase may have been rounded down, in which case the era starts earlier.
                let birth = era.birth(head_number);
                let block_hash = if birth == head_number {
                    head
                } else {
                    comm.block_hash(birth)
                        .await?
                        .ok_or_else(|| anyhow::anyhow!("no block hash for block {}", birth))?
                };
                (era, block_hash)
            }
        };

        debug!(
            "chain state: spec {} tx {} nonce {} era {:?}",
            runtime_version.spec_version, runtime_version.transaction_version, nonce, era
        );
        Ok(Self {
            genesis_hash,
            runtime_version,
            nonce,
            era,
            block_hash,
        })
    }
}

/// Build the payload for `call`, sign it and wrap everything into a signed extrinsic.
pub fn build_signed<S: Signer + ?Sized>(
    signer: &S,
    call: Call,
    payment: TransactionPayment,
    state: &ChainState,
) -> Result<Extrinsic> {
    let payload = ExtrinsicPayload::new(
        &call,
        state.era,
        state.nonce,
        payment.clone(),
        state.runtime_version,
        state.genesis_hash,
        state.block_hash,
    );
    let signature = signer::sign(&payload, signer)?;

    Ok(Extrinsic::signed(
        ExtrinsicSignature {
            signer: Address::Id(signer.account_id()),
            signature,
            era: state.era,
            nonce: state.nonce,
            payment,
        },
        call,
    ))
}

/// Build, sign and submit `call`, returning the transaction hash reported by the node.
pub async fn sign_and_submit<T, S>(
    transport: &T,
    signer: &S,
    call: Call,
    payment: TransactionPayment,
    state: &ChainState,
) -> Result<Hash>
where
    T: Transport + ?Sized,
    S: Signer + ?Sized,
{
    let extrinsic = build_signed(signer, call, payment, state)?;
    let encoded = extrinsic.encode();
    let hash = comm::submit(transport, &encoded).await?;
    info!(
        "submitted extrinsic {}",
        impl_serde::serialize::to_hex(&hash, false)
    );
    Ok(hash)
}
