//! Declaration of various on-chain data structures.
//!
//! Discriminants of the tagged types are fixed by the runtime and hard-coded here.

use crate::error::{Error, Result};
use crate::scale::{self, Decode};
use codec::{Encode, Input, Output};
use std::fmt;

pub type AccountId = [u8; 32];
pub type AccountIndex = u32;
pub type Hash = [u8; 32];
pub type Balance = u128;
pub type Nonce = u32;

/// The account that signs an extrinsic.
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum Address {
    Id(AccountId),
    Index(AccountIndex),
}

impl Address {
    const ID: u8 = 0x00;
    const INDEX: u8 = 0x01;
}

impl From<AccountId> for Address {
    fn from(id: AccountId) -> Self {
        Address::Id(id)
    }
}

impl Encode for Address {
    fn size_hint(&self) -> usize {
        match *self {
            Address::Id(_) => 33,
            Address::Index(index) => 1 + scale::compact_len(index.into()),
        }
    }

    fn encode_to<T: Output + ?Sized>(&self, dest: &mut T) {
        match *self {
            Address::Id(ref id) => scale::encode_tagged(Self::ID, id, dest),
            Address::Index(index) => {
                dest.push_byte(Self::INDEX);
                scale::encode_compact(index.into(), dest);
            }
        }
    }
}

impl Decode for Address {
    fn decode_from<I: Input>(input: &mut I) -> Result<Self> {
        match scale::read_byte(input)? {
            Self::ID => Ok(Address::Id(scale::read_array(input)?)),
            Self::INDEX => Ok(Address::Index(scale::decode_compact_u32(input)?)),
            tag => Err(Error::InvalidVariant { ty: "Address", tag }),
        }
    }
}

#[derive(Clone, PartialEq, Eq)]
pub enum MultiSignature {
    /// An Ed25519 signature.
    Ed25519([u8; 64]),
    /// An Sr25519 signature.
    Sr25519([u8; 64]),
    /// An ECDSA/SECP256k1 signature.
    Ecdsa([u8; 65]),
}

impl MultiSignature {
    const ED25519: u8 = 0x00;
    const SR25519: u8 = 0x01;
    const ECDSA: u8 = 0x02;

    /// The raw signature bytes without the discriminant.
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            Self::Ed25519(raw) | Self::Sr25519(raw) => &raw[..],
            Self::Ecdsa(raw) => &raw[..],
        }
    }
}

impl fmt::Debug for MultiSignature {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Self::Ed25519(ref raw) => write!(f, "Ed25519({:?})", &raw[..]),
            Self::Sr25519(ref raw) => write!(f, "Sr25519({:?})", &raw[..]),
            Self::Ecdsa(ref raw) => write!(f, "Ecdsa({:?})", &raw[..]),
        }
    }
}

impl Encode for MultiSignature {
    fn size_hint(&self) -> usize {
        1 + self.as_bytes().len()
    }

    fn encode_to<T: Output + ?Sized>(&self, dest: &mut T) {
        match self {
            Self::Ed25519(raw) => scale::encode_tagged(Self::ED25519, raw, dest),
            Self::Sr25519(raw) => scale::encode_tagged(Self::SR25519, raw, dest),
            Self::Ecdsa(raw) => scale::encode_tagged(Self::ECDSA, raw, dest),
        }
    }
}

impl Decode for MultiSignature {
    fn decode_from<I: Input>(input: &mut I) -> Result<Self> {
        match scale::read_byte(input)? {
            Self::ED25519 => Ok(Self::Ed25519(scale::read_array(input)?)),
            Self::SR25519 => Ok(Self::Sr25519(scale::read_array(input)?)),
            Self::ECDSA => Ok(Self::Ecdsa(scale::read_array(input)?)),
            tag => Err(Error::InvalidVariant {
                ty: "MultiSignature",
                tag,
            }),
        }
    }
}

/// Identifies the dispatchable: the pallet (section) and the call within it (method).
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct CallIndex {
    pub section: u8,
    pub method: u8,
}

/// A call with its arguments kept as an opaque, already encoded blob.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Call {
    pub index: CallIndex,
    pub args: Vec<u8>,
}

impl Call {
    pub fn new(section: u8, method: u8, args: Vec<u8>) -> Self {
        Self {
            index: CallIndex { section, method },
            args,
        }
    }
}

impl Encode for Call {
    fn size_hint(&self) -> usize {
        2 + self.args.len()
    }

    fn encode_to<T: Output + ?Sized>(&self, dest: &mut T) {
        dest.push_byte(self.index.section);
        dest.push_byte(self.index.method);
        scale::encode_bytes_bare(&self.args, dest);
    }
}

impl Decode for Call {
    /// The arguments have no length of their own, so this consumes the rest of `input`.
    fn decode_from<I: Input>(input: &mut I) -> Result<Self> {
        let section = scale::read_byte(input)?;
        let method = scale::read_byte(input)?;
        let args = scale::read_remaining(input)?;
        Ok(Self::new(section, method, args))
    }
}

/// Lets the fee be paid in an asset other than the native one.
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum FeeExchange {
    V1 {
        asset_id: u128,
        max_payment: Balance,
    },
}

impl FeeExchange {
    const V1_TAG: u8 = 0x00;
}

impl Encode for FeeExchange {
    fn size_hint(&self) -> usize {
        match *self {
            FeeExchange::V1 {
                asset_id,
                max_payment,
            } => 1 + scale::compact_len(asset_id) + scale::compact_len(max_payment),
        }
    }

    fn encode_to<T: Output + ?Sized>(&self, dest: &mut T) {
        match *self {
            FeeExchange::V1 {
                asset_id,
                max_payment,
            } => {
                dest.push_byte(Self::V1_TAG);
                scale::encode_compact(asset_id, dest);
                scale::encode_compact(max_payment, dest);
            }
        }
    }
}

impl Decode for FeeExchange {
    fn decode_from<I: Input>(input: &mut I) -> Result<Self> {
        match scale::read_byte(input)? {
            Self::V1_TAG => Ok(FeeExchange::V1 {
                asset_id: scale::decode_compact(input).map_err(|e| e.in_field("asset_id"))?,
                max_payment: scale::decode_compact(input)
                    .map_err(|e| e.in_field("max_payment"))?,
            }),
            tag => Err(Error::InvalidVariant {
                ty: "FeeExchange",
                tag,
            }),
        }
    }
}

#[derive(Clone, PartialEq, Eq, Debug, Default)]
pub struct TransactionPayment {
    pub tip: Balance,
    pub fee_exchange: Option<FeeExchange>,
}

impl TransactionPayment {
    pub fn with_tip(tip: Balance) -> Self {
        Self {
            tip,
            fee_exchange: None,
        }
    }
}

impl Encode for TransactionPayment {
    fn size_hint(&self) -> usize {
        scale::compact_len(self.tip) + 1 + self.fee_exchange.as_ref().map_or(0, |f| f.size_hint())
    }

    fn encode_to<T: Output + ?Sized>(&self, dest: &mut T) {
        scale::encode_compact(self.tip, dest);
        scale::encode_option(self.fee_exchange.as_ref(), dest);
    }
}

impl Decode for TransactionPayment {
    fn decode_from<I: Input>(input: &mut I) -> Result<Self> {
        Ok(Self {
            tip: scale::decode_compact(input).map_err(|e| e.in_field("tip"))?,
            fee_exchange: scale::decode_option(input).map_err(|e| e.in_field("fee_exchange"))?,
        })
    }
}
