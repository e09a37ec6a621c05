//! The transmittable extrinsic.
//!
//! On the wire an extrinsic is the compact length of its body followed by the body: the
//! version byte, the signature block if signed, and the call.

use crate::chain_data::{Address, Call, Hash, MultiSignature, Nonce, TransactionPayment};
use crate::era::Era;
use crate::error::{Error, Result};
use crate::scale::{self, Decode};
use codec::{Encode, Input, Output};

/// The extrinsic format version this crate produces and understands.
pub const EXTRINSIC_VERSION: u8 = 4;

const SIGNED_FLAG: u8 = 0b1000_0000;
const VERSION_MASK: u8 = 0b0111_1111;

/// Everything a signed extrinsic carries besides the call.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct ExtrinsicSignature {
    pub signer: Address,
    pub signature: MultiSignature,
    pub era: Era,
    pub nonce: Nonce,
    pub payment: TransactionPayment,
}

impl Encode for ExtrinsicSignature {
    fn size_hint(&self) -> usize {
        self.signer.size_hint()
            + self.signature.size_hint()
            + self.era.size_hint()
            + scale::compact_len(self.nonce.into())
            + self.payment.size_hint()
    }

    fn encode_to<T: Output + ?Sized>(&self, dest: &mut T) {
        self.signer.encode_to(dest);
        self.signature.encode_to(dest);
        self.era.encode_to(dest);
        scale::encode_compact(self.nonce.into(), dest);
        self.payment.encode_to(dest);
    }
}

impl Decode for ExtrinsicSignature {
    fn decode_from<I: Input>(input: &mut I) -> Result<Self> {
        Ok(Self {
            signer: scale::decode_field("signer", input)?,
            signature: scale::decode_field("signature", input)?,
            era: scale::decode_field("era", input)?,
            nonce: scale::decode_compact_u32(input).map_err(|e| e.in_field("nonce"))?,
            payment: scale::decode_field("payment", input)?,
        })
    }
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Extrinsic {
    pub signature: Option<ExtrinsicSignature>,
    pub call: Call,
}

impl Extrinsic {
    pub fn unsigned(call: Call) -> Self {
        Self {
            signature: None,
            call,
        }
    }

    pub fn signed(signature: ExtrinsicSignature, call: Call) -> Self {
        Self {
            signature: Some(signature),
            call,
        }
    }

    pub fn is_signed(&self) -> bool {
        self.signature.is_some()
    }

    /// The leading byte of the body: the format version with the top bit set for signed
    /// extrinsics.
    pub fn version_byte(&self) -> u8 {
        if self.is_signed() {
            SIGNED_FLAG | EXTRINSIC_VERSION
        } else {
            EXTRINSIC_VERSION
        }
    }

    /// The hash a node reports for this extrinsic once submitted.
    pub fn hash(&self) -> Hash {
        extrinsic_hash(&self.encode())
    }

    fn encode_body(&self) -> Vec<u8> {
        let mut body = Vec::with_capacity(
            1 + self.signature.as_ref().map_or(0, |s| s.size_hint()) + self.call.size_hint(),
        );
        body.push(self.version_byte());
        if let Some(ref signature) = self.signature {
            signature.encode_to(&mut body);
        }
        self.call.encode_to(&mut body);
        body
    }
}

impl Encode for Extrinsic {
    fn encode_to<T: Output + ?Sized>(&self, dest: &mut T) {
        scale::encode_bytes_prefixed(&self.encode_body(), dest);
    }
}

impl Decode for Extrinsic {
    fn decode_from<I: Input>(input: &mut I) -> Result<Self> {
        let declared = usize::try_from(scale::decode_compact(input).map_err(|e| e.in_field("length"))?)
            .map_err(|_| Error::DecodeOverflow)?;
        // Bytes past the declared length belong to whatever follows and are left unread.
        if let Some(actual) = input.remaining_len()? {
            if actual < declared {
                return Err(Error::LengthMismatch { declared, actual });
            }
        }
        let body = scale::read_bytes(declared, input)?;
        let input = &mut &body[..];

        let version = scale::read_byte(input).map_err(|e| e.in_field("version"))?;
        let is_signed = version & SIGNED_FLAG != 0;
        let version = version & VERSION_MASK;
        if version != EXTRINSIC_VERSION {
            return Err(Error::UnsupportedVersion(version));
        }

        let signature = if is_signed {
            Some(ExtrinsicSignature::decode_from(input)?)
        } else {
            None
        };
        let call = scale::decode_field("call", input)?;
        Ok(Self { signature, call })
    }
}

/// Build the length-prefixed encoding of a signed extrinsic.
pub fn assemble(
    signer: Address,
    signature: MultiSignature,
    era: Era,
    nonce: Nonce,
    payment: TransactionPayment,
    call: Call,
) -> Vec<u8> {
    let signature = ExtrinsicSignature {
        signer,
        signature,
        era,
        nonce,
        payment,
    };
    Extrinsic::signed(signature, call).encode()
}

/// The blake2-256 hash of an encoded, length-prefixed extrinsic.
pub fn extrinsic_hash(encoded: &[u8]) -> Hash {
    sp_core::hashing::blake2_256(encoded)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chain_data::FeeExchange;
    use hex_literal::hex;

    const ALICE: [u8; 32] = hex!("d75a980182b10ab7d54bfed3c964073a0ee172f3daa62325af021a68f707511a");
    const SIGNATURE: [u8; 64] = hex!(
        "42dee0864e9aeba0c418c325752d074eab917399c3ce235d2d196f2345da04ea"
        "d7f82d06c6081b3f5f8458a28eb458e70b268bb21053d66d5c7d3b6c3ebacb09"
    );

    fn fixture_call() -> Call {
        Call::new(
            0x06,
            0x00,
            hex!("ff8eaf04151687736326c9fea17e25fc5287613693c912909cb226aa4794f26a48e56c").to_vec(),
        )
    }

    #[test]
    fn assembles_signed_extrinsic() {
        let encoded = assemble(
            Address::Id(ALICE),
            MultiSignature::Ed25519(SIGNATURE),
            Era::Immortal,
            1,
            TransactionPayment::default(),
            fixture_call(),
        );
        let expected = hex!(
            "3102" "84"
            "00d75a980182b10ab7d54bfed3c964073a0ee172f3daa62325af021a68f707511a"
            "0042dee0864e9aeba0c418c325752d074eab917399c3ce235d2d196f2345da04ea"
            "d7f82d06c6081b3f5f8458a28eb458e70b268bb21053d66d5c7d3b6c3ebacb09"
            "00" "04" "00" "00"
            "0600ff8eaf04151687736326c9fea17e25fc5287613693c912909cb226aa4794f26a48e56c"
        );
        assert_eq!(encoded, expected);
        assert_eq!(
            extrinsic_hash(&encoded),
            hex!("49ab8ac31b5bfe7ce3600eff2834af41e3e912b53175d36e6d599f47060a216e")
        );
    }

    #[test]
    fn signed_extrinsic_decodes_back() {
        let extrinsic = Extrinsic::signed(
            ExtrinsicSignature {
                signer: Address::Index(1000),
                signature: MultiSignature::Sr25519([7; 64]),
                era: Era::mortal(64, 1234),
                nonce: 70000,
                payment: TransactionPayment {
                    tip: 5,
                    fee_exchange: Some(FeeExchange::V1 {
                        asset_id: 1,
                        max_payment: 1_000_000,
                    }),
                },
            },
            fixture_call(),
        );
        assert_eq!(extrinsic.version_byte(), 0x84);
        let encoded = extrinsic.encode();
        assert_eq!(scale::decode::<Extrinsic>(&encoded).unwrap(), extrinsic);
        assert_eq!(extrinsic.hash(), extrinsic_hash(&encoded));
    }

    #[test]
    fn unsigned_extrinsic() {
        let extrinsic = Extrinsic::unsigned(Call::new(0x00, 0x01, vec![0x08, 0xab, 0xcd]));
        assert_eq!(extrinsic.version_byte(), 0x04);
        let encoded = extrinsic.encode();
        assert_eq!(encoded, hex!("18" "04" "0001" "08abcd"));
        assert_eq!(scale::decode::<Extrinsic>(&encoded).unwrap(), extrinsic);
    }

    #[test]
    fn length_prefix_must_match() {
        assert!(matches!(
            scale::decode::<Extrinsic>(&hex!("1c040001")),
            Err(Error::LengthMismatch {
                declared: 7,
                actual: 3
            })
        ));
    }

    #[test]
    fn concatenated_extrinsics_decode_one_by_one() {
        let first = Extrinsic::unsigned(Call::new(0x00, 0x01, vec![0x08, 0xab, 0xcd]));
        let second = Extrinsic::unsigned(Call::new(0x06, 0x00, vec![0x01]));
        let mut buf = first.encode();
        buf.extend(second.encode());

        let input = &mut &buf[..];
        assert_eq!(Extrinsic::decode_from(input).unwrap(), first);
        assert_eq!(Extrinsic::decode_from(input).unwrap(), second);
        assert!(input.is_empty());
    }

    /// An input that does not know how many bytes it holds.
    struct Stream<'a>(&'a [u8]);

    impl Input for Stream<'_> {
        fn remaining_len(&mut self) -> std::result::Result<Option<usize>, codec::Error> {
            Ok(None)
        }

        fn read(&mut self, into: &mut [u8]) -> std::result::Result<(), codec::Error> {
            self.0.read(into)
        }
    }

    #[test]
    fn stream_of_unknown_length() {
        let extrinsic = Extrinsic::unsigned(Call::new(0x00, 0x01, vec![0x08, 0xab, 0xcd]));
        let encoded = extrinsic.encode();
        let mut stream = Stream(&encoded);
        assert_eq!(Extrinsic::decode_from(&mut stream).unwrap(), extrinsic);

        // A length prefix of 2^30 - 1 with only a few bytes behind it.
        let short = hex!("feffffff" "040001");
        let mut stream = Stream(&short);
        assert!(matches!(
            Extrinsic::decode_from(&mut stream),
            Err(Error::DecodeTruncated)
        ));
    }

    #[test]
    fn unknown_version_is_rejected() {
        assert!(matches!(
            scale::decode::<Extrinsic>(&hex!("0c030001")),
            Err(Error::UnsupportedVersion(3))
        ));
    }

    #[test]
    fn decode_reports_failing_field() {
        // Signed, the address is fine but the signature discriminant is unknown.
        let mut body = vec![0x84];
        body.extend_from_slice(&Address::Id(ALICE).encode());
        body.push(0x07);
        let mut encoded = Vec::new();
        scale::encode_bytes_prefixed(&body, &mut encoded);

        match scale::decode::<Extrinsic>(&encoded) {
            Err(Error::Field { field, source }) => {
                assert_eq!(field, "signature");
                assert!(matches!(
                    *source,
                    Error::InvalidVariant {
                        ty: "MultiSignature",
                        tag: 0x07
                    }
                ));
            }
            other => panic!("unexpected {:?}", other),
        }
    }
}
