//! Signing of extrinsic payloads.
//!
//! Key material is always passed in explicitly. There is no keyring or any other process-wide
//! signing state.

use crate::chain_data::{AccountId, MultiSignature};
use crate::error::{Error, Result};
use crate::payload::ExtrinsicPayload;
use codec::Encode;
use log::trace;
use sp_core::{ecdsa, ed25519, sr25519, Pair};
use std::fmt;
use std::str::FromStr;

/// Anything that can produce a [`MultiSignature`] over a message on behalf of an account.
pub trait Signer {
    /// The account the signatures are attributed to.
    fn account_id(&self) -> AccountId;

    fn sign(&self, message: &[u8]) -> Result<MultiSignature>;
}

/// Sign the encoded `payload`.
///
/// The signer receives exactly the bytes of the payload encoding, nothing is hashed or prefixed
/// on the way.
pub fn sign<S: Signer + ?Sized>(payload: &ExtrinsicPayload, signer: &S) -> Result<MultiSignature> {
    let message = payload.encode();
    trace!(
        "signing payload {}",
        impl_serde::serialize::to_hex(&message, false)
    );
    signer.sign(&message)
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum CryptoScheme {
    Ed25519,
    Sr25519,
    Ecdsa,
}

impl FromStr for CryptoScheme {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "ed25519" => Ok(CryptoScheme::Ed25519),
            "sr25519" => Ok(CryptoScheme::Sr25519),
            "ecdsa" => Ok(CryptoScheme::Ecdsa),
            other => Err(Error::SigningFailure(format!(
                "unknown crypto scheme `{}`",
                other
            ))),
        }
    }
}

/// A key pair of one of the supported schemes.
#[derive(Clone)]
pub enum KeyPair {
    Ed25519(ed25519::Pair),
    Sr25519(sr25519::Pair),
    Ecdsa(ecdsa::Pair),
}

impl KeyPair {
    /// Derive a key pair from a secret URI, e.g. `//Alice`, a mnemonic with derivation junctions
    /// or a `0x` prefixed hex seed.
    pub fn from_uri(scheme: CryptoScheme, uri: &str) -> Result<Self> {
        fn derive<P: Pair>(uri: &str) -> Result<P> {
            P::from_string(uri, None)
                .map_err(|err| Error::SigningFailure(format!("invalid secret uri: {:?}", err)))
        }

        Ok(match scheme {
            CryptoScheme::Ed25519 => KeyPair::Ed25519(derive(uri)?),
            CryptoScheme::Sr25519 => KeyPair::Sr25519(derive(uri)?),
            CryptoScheme::Ecdsa => KeyPair::Ecdsa(derive(uri)?),
        })
    }

    pub fn scheme(&self) -> CryptoScheme {
        match self {
            KeyPair::Ed25519(_) => CryptoScheme::Ed25519,
            KeyPair::Sr25519(_) => CryptoScheme::Sr25519,
            KeyPair::Ecdsa(_) => CryptoScheme::Ecdsa,
        }
    }
}

impl Signer for KeyPair {
    /// For ECDSA the account is the blake2-256 hash of the compressed public key.
    fn account_id(&self) -> AccountId {
        match self {
            KeyPair::Ed25519(pair) => pair.public().0,
            KeyPair::Sr25519(pair) => pair.public().0,
            KeyPair::Ecdsa(pair) => sp_core::hashing::blake2_256(&pair.public().0),
        }
    }

    fn sign(&self, message: &[u8]) -> Result<MultiSignature> {
        Ok(match self {
            KeyPair::Ed25519(pair) => MultiSignature::Ed25519(pair.sign(message).0),
            KeyPair::Sr25519(pair) => MultiSignature::Sr25519(pair.sign(message).0),
            KeyPair::Ecdsa(pair) => MultiSignature::Ecdsa(pair.sign(message).0),
        })
    }
}

impl fmt::Debug for KeyPair {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "KeyPair({:?}, {})",
            self.scheme(),
            impl_serde::serialize::to_hex(&self.account_id(), false)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chain_data::{Call, TransactionPayment};
    use crate::era::Era;
    use crate::payload::RuntimeVersion;
    use hex_literal::hex;

    const SEED: &str = "0x9d61b19deffd5a60ba844af492ec2cc44449c5697b326919703bac031cae7f60";
    const GENESIS: [u8; 32] =
        hex!("dcd1346701ca8396496e52aa2785b1748deb6db09551b72159dcb3e08991025b");

    fn payload(args: Vec<u8>) -> ExtrinsicPayload {
        ExtrinsicPayload::new(
            &Call::new(0x06, 0x00, args),
            Era::Immortal,
            1,
            TransactionPayment::default(),
            RuntimeVersion {
                spec_version: 1,
                transaction_version: 1,
            },
            GENESIS,
            GENESIS,
        )
    }

    fn fixture_args() -> Vec<u8> {
        hex!("ff8eaf04151687736326c9fea17e25fc5287613693c912909cb226aa4794f26a48e56c").to_vec()
    }

    #[test]
    fn ed25519_signature_matches_known_vector() {
        let pair = KeyPair::from_uri(CryptoScheme::Ed25519, SEED).unwrap();
        assert_eq!(pair.scheme(), CryptoScheme::Ed25519);
        assert_eq!(
            pair.account_id(),
            hex!("d75a980182b10ab7d54bfed3c964073a0ee172f3daa62325af021a68f707511a")
        );
        let signature = sign(&payload(fixture_args()), &pair).unwrap();
        assert_eq!(
            signature,
            MultiSignature::Ed25519(hex!(
                "42dee0864e9aeba0c418c325752d074eab917399c3ce235d2d196f2345da04ea"
                "d7f82d06c6081b3f5f8458a28eb458e70b268bb21053d66d5c7d3b6c3ebacb09"
            ))
        );
    }

    #[test]
    fn one_byte_of_args_changes_the_signature() {
        let pair = KeyPair::from_uri(CryptoScheme::Ed25519, SEED).unwrap();
        let mut args = fixture_args();
        *args.last_mut().unwrap() ^= 1;

        let original = sign(&payload(fixture_args()), &pair).unwrap();
        let altered = sign(&payload(args), &pair).unwrap();
        assert_ne!(original, altered);
        assert_eq!(
            altered,
            MultiSignature::Ed25519(hex!(
                "658c9c31816d8606054555f108dd6f85a65ed29ff2380cbecdc8d25e9d149203"
                "1dc5f72e454a2acb89eb51467d44acfb103f7765443bd5c0f443ea30c9a3970c"
            ))
        );
    }

    #[test]
    fn signature_variant_follows_the_scheme() {
        let message = payload(fixture_args()).encode();

        let sr = KeyPair::from_uri(CryptoScheme::Sr25519, "//Alice").unwrap();
        let signature = sr.sign(&message).unwrap();
        match &signature {
            MultiSignature::Sr25519(raw) => {
                let public = sr25519::Public::from_raw(sr.account_id());
                assert!(sr25519::Pair::verify(
                    &sr25519::Signature::from_raw(*raw),
                    &message,
                    &public
                ));
            }
            other => panic!("unexpected signature {:?}", other),
        }

        let ecdsa = KeyPair::from_uri(CryptoScheme::Ecdsa, "//Alice").unwrap();
        assert!(matches!(
            ecdsa.sign(&message).unwrap(),
            MultiSignature::Ecdsa(_)
        ));
    }

    #[test]
    fn invalid_uri_is_a_signing_failure() {
        assert!(matches!(
            KeyPair::from_uri(CryptoScheme::Sr25519, "not a valid uri///"),
            Err(Error::SigningFailure(_))
        ));
        assert!(matches!(
            "rsa".parse::<CryptoScheme>(),
            Err(Error::SigningFailure(_))
        ));
        assert_eq!("Sr25519".parse::<CryptoScheme>().unwrap(), CryptoScheme::Sr25519);
    }
}
