//! A module that abstracts all concerns regarding the connection to the node.
//!
//! Submission goes through the [`Transport`] trait so the core does not depend on a particular
//! RPC client. [`RpcComm`] is the implementation backed by a websocket connection. It also
//! answers the chain state queries needed to build a transaction.

use crate::chain_data::{AccountId, Hash, Nonce};
use crate::error::{Error, Result};
use crate::payload::RuntimeVersion;
use async_trait::async_trait;
use jsonrpsee::core::client::ClientT;
use jsonrpsee::rpc_params;
use jsonrpsee::ws_client::{WsClient, WsClientBuilder};
use log::{debug, info};
use serde::Deserialize;
use sp_core::crypto::{AccountId32, Ss58Codec};

/// Something that can hand an extrinsic over to a node.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Submit the `0x` prefixed, lowercase hex encoding of an extrinsic and return the hash the
    /// node reports for it, as is.
    async fn submit_extrinsic(&self, extrinsic_hex: String) -> anyhow::Result<String>;
}

/// Submit an encoded, length-prefixed extrinsic and return its transaction hash.
///
/// Failures of the transport are passed through inside [`Error::SubmissionFailure`]. Nothing is
/// retried.
pub async fn submit<T: Transport + ?Sized>(transport: &T, extrinsic: &[u8]) -> Result<Hash> {
    let extrinsic_hex = impl_serde::serialize::to_hex(extrinsic, false);
    debug!("submitting extrinsic of {} bytes", extrinsic.len());
    let response = transport
        .submit_extrinsic(extrinsic_hex)
        .await
        .map_err(Error::SubmissionFailure)?;
    parse_hash(&response)
}

/// Parse a `0x` prefixed 32 byte hash.
pub fn parse_hash(hex: &str) -> Result<Hash> {
    let bytes =
        impl_serde::serialize::from_hex(hex).map_err(|err| Error::InvalidHex(err.to_string()))?;
    <Hash>::try_from(bytes.as_slice())
        .map_err(|_| Error::InvalidHex(format!("expected 32 bytes, got {}", bytes.len())))
}

#[derive(Debug, Deserialize)]
pub struct Header {
    pub number: String,
    // snip...
}

impl Header {
    pub fn number(&self) -> anyhow::Result<u64> {
        let hex_number = self.number.trim_start_matches("0x");
        Ok(u64::from_str_radix(hex_number, 16)?)
    }
}

pub struct RpcComm {
    client: WsClient,
}

impl RpcComm {
    pub async fn connect(rpc_endpoint: &str) -> anyhow::Result<Self> {
        let client = WsClientBuilder::default().build(rpc_endpoint).await?;
        info!("connected to {}", rpc_endpoint);
        Ok(Self { client })
    }

    pub async fn block_hash(&self, block_number: u64) -> anyhow::Result<Option<Hash>> {
        let response: Option<String> = self
            .client
            .request("chain_getBlockHash", rpc_params![block_number])
            .await?;
        Ok(response.as_deref().map(parse_hash).transpose()?)
    }

    pub async fn genesis_hash(&self) -> anyhow::Result<Hash> {
        self.block_hash(0)
            .await?
            .ok_or_else(|| anyhow::anyhow!("the node does not know the genesis block"))
    }

    pub async fn finalized_head(&self) -> anyhow::Result<Hash> {
        let response: String = self
            .client
            .request("chain_getFinalizedHead", rpc_params![])
            .await?;
        Ok(parse_hash(&response)?)
    }

    pub async fn header(&self, hash: &Hash) -> anyhow::Result<Header> {
        let hash = impl_serde::serialize::to_hex(hash, false);
        let header = self
            .client
            .request("chain_getHeader", rpc_params![hash])
            .await?;
        Ok(header)
    }

    pub async fn runtime_version(&self) -> anyhow::Result<RuntimeVersion> {
        let version = self
            .client
            .request("state_getRuntimeVersion", rpc_params![])
            .await?;
        Ok(version)
    }

    /// The next nonce of `account`, taking the transaction pool into account.
    pub async fn account_next_index(&self, account: &AccountId) -> anyhow::Result<Nonce> {
        let address = AccountId32::new(*account).to_ss58check();
        let nonce: u64 = self
            .client
            .request("system_accountNextIndex", rpc_params![address])
            .await?;
        Ok(Nonce::try_from(nonce)?)
    }
}

#[async_trait]
impl Transport for RpcComm {
    async fn submit_extrinsic(&self, extrinsic_hex: String) -> anyhow::Result<String> {
        let hash = self
            .client
            .request("author_submitExtrinsic", rpc_params![extrinsic_hex])
            .await?;
        Ok(hash)
    }
}
