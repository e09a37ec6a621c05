use anyhow::{anyhow, Context, Result};
use extrinsic_oxide_service::{Balance, CryptoScheme, Config};
use std::env;

/// What the binary submits: a remark call carrying a piece of text.
pub struct Remark {
    pub section: u8,
    pub method: u8,
    pub text: String,
}

fn default_config() -> Config {
    // The defaults are selected in such a way that a local dev node won't require any settings.
    Config {
        rpc_hostname: "ws://localhost:9944".to_string(),
        signer_uri: "//Alice".to_string(),
        signer_scheme: CryptoScheme::Sr25519,
        era_period: None,
        tip: 0,
    }
}

fn rpc_hostname() -> Option<String> {
    env::var("RPC_HOST").ok()
}

fn signer_uri() -> Option<String> {
    env::var("SIGNER_URI").ok()
}

fn signer_scheme() -> Result<Option<CryptoScheme>> {
    match env::var("SIGNER_SCHEME").ok() {
        Some(scheme) => Ok(Some(scheme.parse()?)),
        None => Ok(None),
    }
}

/// `0` or an unset variable means immortal.
fn era_period() -> Result<Option<u64>> {
    let period = match env::var("ERA_PERIOD").ok() {
        Some(period) => period.parse::<u64>().context("ERA_PERIOD")?,
        None => return Ok(None),
    };
    Ok(Some(period).filter(|&period| period != 0))
}

fn tip() -> Result<Option<Balance>> {
    match env::var("TIP").ok() {
        Some(tip) => Ok(Some(tip.parse().context("TIP")?)),
        None => Ok(None),
    }
}

/// Parse a call index written as `section,method`.
fn parse_call_index(text: &str) -> Result<(u8, u8)> {
    let mut parts = text.split(',').map(|part| part.trim().parse::<u8>());
    match (parts.next(), parts.next(), parts.next()) {
        (Some(Ok(section)), Some(Ok(method)), None) => Ok((section, method)),
        _ => Err(anyhow!("expected `section,method`, got `{}`", text)),
    }
}

fn remark() -> Result<Remark> {
    let (section, method) = match env::var("REMARK_CALL_INDEX").ok() {
        Some(index) => parse_call_index(&index).context("REMARK_CALL_INDEX")?,
        // `System::remark` in a default FRAME runtime.
        None => (0, 0),
    };
    let text = env::var("REMARK").unwrap_or_else(|_| "hello from extrinsic-oxide".to_string());
    Ok(Remark {
        section,
        method,
        text,
    })
}

/// Read the config file.
pub fn obtain() -> Result<(Config, Remark)> {
    // First, make sure that we've loaded configuration from the .env file.
    let _ = dotenv::dotenv();

    // Read the config or use the defaults.
    let defaults = default_config();
    let config = Config {
        rpc_hostname: rpc_hostname().unwrap_or(defaults.rpc_hostname),
        signer_uri: signer_uri().unwrap_or(defaults.signer_uri),
        signer_scheme: signer_scheme()?.unwrap_or(defaults.signer_scheme),
        era_period: era_period()?.or(defaults.era_period),
        tip: tip()?.unwrap_or(defaults.tip),
    };
    Ok((config, remark()?))
}
