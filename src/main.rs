//! Submits a remark to a substrate node.
//!
//! Configuration comes from the environment (or a `.env` file), see `config.rs`. Run a dev node
//! with:
//!
//!    ./substrate-node --dev --rpc-port 9944
//!

use extrinsic_oxide_service::{
    scale, service, Call, ChainState, KeyPair, RpcComm, Signer, TransactionPayment,
};
use log::info;

mod config;

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let (config, remark) = config::obtain()?;
    let signer = KeyPair::from_uri(config.signer_scheme, &config.signer_uri)?;
    info!("signing as {:?}", signer);

    async_std::task::block_on(async move {
        let comm = RpcComm::connect(&config.rpc_hostname).await?;
        let state = ChainState::fetch(&comm, &signer, config.era_period).await?;

        let mut args = Vec::new();
        scale::encode_bytes_prefixed(remark.text.as_bytes(), &mut args);
        let call = Call::new(remark.section, remark.method, args);

        let hash = service::sign_and_submit(
            &comm,
            &signer,
            call,
            TransactionPayment::with_tip(config.tip),
            &state,
        )
        .await?;

        println!("{}", impl_serde::serialize::to_hex(&hash, false));
        info!(
            "account {} nonce {}",
            impl_serde::serialize::to_hex(&signer.account_id(), false),
            state.nonce
        );
        Ok::<_, anyhow::Error>(())
    })
}
