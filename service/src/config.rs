use crate::chain_data::Balance;
use crate::signer::CryptoScheme;

#[derive(Clone, Debug)]
pub struct Config {
    /// The hostname where to find the RPC endpoint exposed by a substrate node.
    pub rpc_hostname: String,
    /// The secret URI of the signing account, e.g. `//Alice`.
    pub signer_uri: String,
    pub signer_scheme: CryptoScheme,
    /// Makes transactions mortal with roughly this many blocks of validity. Immortal if `None`.
    pub era_period: Option<u64>,
    pub tip: Balance,
}
