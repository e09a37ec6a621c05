//! The validity window of a transaction.

use crate::error::{Error, Result};
use crate::scale::{self, Decode};
use codec::{Encode, Input, Output};

pub type Period = u64;
pub type Phase = u64;

/// The smallest period a mortal era can have.
pub const MIN_PERIOD: Period = 4;
/// The largest period a mortal era can have. The packed form keeps four bits for the period.
pub const MAX_PERIOD: Period = 1 << 16;

/// An era describes the range of blocks in which a transaction is valid.
///
/// [`Era::mortal`] and decoding always yield a period that is a power of two in
/// `MIN_PERIOD..=MAX_PERIOD` and a quantized phase smaller than the period. A `Mortal` value built
/// by hand that breaks this is normalized the same way [`Era::mortal`] does when it is encoded.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum Era {
    /// The transaction is valid forever.
    #[default]
    Immortal,
    /// Period and phase. The transaction is valid for `period` blocks starting at the most recent
    /// block whose number modulo `period` equals `phase`.
    Mortal(Period, Phase),
}

impl Era {
    /// Create a mortal era that starts at `current` and lasts roughly `period` blocks.
    ///
    /// The period is rounded up to a power of two and clamped to the allowed bounds. The phase is
    /// rounded down to the precision the two byte encoding can express.
    pub fn mortal(period: u64, current: u64) -> Self {
        let (period, phase) = normalize(period, current);
        Era::Mortal(period, phase)
    }

    pub fn immortal() -> Self {
        Era::Immortal
    }

    pub fn is_immortal(&self) -> bool {
        matches!(self, Era::Immortal)
    }

    /// The first block number at which a transaction with this era is valid, given any block in
    /// its window.
    pub fn birth(self, current: u64) -> u64 {
        match self {
            Era::Immortal => 0,
            Era::Mortal(period, phase) => (current.max(phase) - phase) / period * period + phase,
        }
    }

    /// The first block number at which a transaction with this era is no longer valid.
    pub fn death(self, current: u64) -> u64 {
        match self {
            Era::Immortal => u64::MAX,
            Era::Mortal(period, _) => self.birth(current).saturating_add(period),
        }
    }
}

fn normalize(period: u64, current: u64) -> (Period, Phase) {
    let period = period
        .checked_next_power_of_two()
        .unwrap_or(MAX_PERIOD)
        .clamp(MIN_PERIOD, MAX_PERIOD);
    let phase = current % period;
    let quantize_factor = (period >> 12).max(1);
    (period, phase / quantize_factor * quantize_factor)
}

impl Encode for Era {
    fn size_hint(&self) -> usize {
        match self {
            Era::Immortal => 1,
            Era::Mortal(..) => 2,
        }
    }

    fn encode_to<T: Output + ?Sized>(&self, dest: &mut T) {
        match *self {
            Era::Immortal => dest.push_byte(0),
            Era::Mortal(period, phase) => {
                let (period, phase) = normalize(period, phase);
                let quantize_factor = (period >> 12).max(1);
                let encoded = period.trailing_zeros().saturating_sub(1).clamp(1, 15) as u16
                    | ((phase / quantize_factor) << 4) as u16;
                encoded.encode_to(dest);
            }
        }
    }
}

impl Decode for Era {
    fn decode_from<I: Input>(input: &mut I) -> Result<Self> {
        let first = scale::read_byte(input)?;
        if first == 0 {
            Ok(Era::Immortal)
        } else {
            let encoded = first as u64 + ((scale::read_byte(input)? as u64) << 8);
            let period = 2 << (encoded % (1 << 4));
            let quantize_factor = (period >> 12).max(1);
            let phase = (encoded >> 4) * quantize_factor;
            if period >= MIN_PERIOD && phase < period {
                Ok(Era::Mortal(period, phase))
            } else {
                Err(Error::InvalidEra)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn immortal_is_a_single_zero_byte() {
        assert_eq!(Era::Immortal.encode(), vec![0u8]);
        assert_eq!(scale::decode::<Era>(&[0u8]).unwrap(), Era::Immortal);
        assert!(Era::immortal().is_immortal());
        assert_eq!(Era::Immortal.birth(100), 0);
        assert_eq!(Era::Immortal.death(100), u64::MAX);
    }

    #[test]
    fn mortal_era_packs_into_two_bytes() {
        let era = Era::mortal(64, 42);
        assert_eq!(era, Era::Mortal(64, 42));
        assert_eq!(era.encode(), vec![0xa5, 0x02]);
        assert_eq!(scale::decode::<Era>(&era.encode()).unwrap(), era);
        assert_eq!(era.birth(42), 42);
        assert_eq!(era.birth(105), 42);
        assert_eq!(era.death(105), 106);
    }

    #[test]
    fn long_period_quantizes_phase() {
        let era = Era::mortal(32768, 20000);
        assert_eq!(era, Era::Mortal(32768, 20000));
        assert_eq!(era.encode(), vec![0x4e, 0x9c]);
        assert_eq!(scale::decode::<Era>(&era.encode()).unwrap(), era);

        // 20001 is not a multiple of the quantize factor of 8.
        assert_eq!(Era::mortal(32768, 20001), Era::Mortal(32768, 20000));
    }

    #[test]
    fn period_is_rounded_and_clamped() {
        assert_eq!(Era::mortal(0, 7), Era::Mortal(4, 3));
        assert_eq!(Era::mortal(100, 7), Era::Mortal(128, 7));
        assert_eq!(Era::mortal(1 << 20, 7), Era::Mortal(MAX_PERIOD, 0));
        assert_eq!(Era::mortal(u64::MAX, 7), Era::Mortal(MAX_PERIOD, 0));
    }

    #[test]
    fn decoded_period_is_a_bounded_power_of_two() {
        for period in [4u64, 8, 64, 1024, 4096, 8192, 65536] {
            for current in [0u64, 1, 1000, 123_456_789] {
                let era = Era::mortal(period, current);
                let encoded = era.encode();
                assert_eq!(encoded.len(), 2);
                match scale::decode::<Era>(&encoded).unwrap() {
                    Era::Mortal(decoded_period, phase) => {
                        assert!(decoded_period.is_power_of_two());
                        assert!((MIN_PERIOD..=MAX_PERIOD).contains(&decoded_period));
                        assert!(phase < decoded_period);
                        assert_eq!(Era::Mortal(decoded_period, phase), era);
                    }
                    Era::Immortal => panic!("mortal era decoded as immortal"),
                }
            }
        }
    }

    #[test]
    fn hand_built_era_is_normalized_on_encode() {
        let era = Era::Mortal(100, 7);
        assert_eq!(era.encode(), Era::mortal(100, 7).encode());
        assert_eq!(era.encode(), vec![0x76, 0x00]);
        assert_eq!(scale::decode::<Era>(&era.encode()).unwrap(), Era::Mortal(128, 7));

        // The phase is taken modulo the period.
        assert_eq!(Era::Mortal(64, 100).encode(), vec![0x45, 0x02]);
        assert_eq!(
            scale::decode::<Era>(&Era::Mortal(64, 100).encode()).unwrap(),
            Era::Mortal(64, 36)
        );
    }

    #[test]
    fn invalid_encodings_are_rejected() {
        // Period of 2 is below the minimum.
        assert!(matches!(scale::decode::<Era>(&[0x10, 0x00]), Err(Error::InvalidEra)));
        // Phase 4 is not smaller than period 4.
        assert!(matches!(scale::decode::<Era>(&[0x41, 0x00]), Err(Error::InvalidEra)));
        assert!(matches!(scale::decode::<Era>(&[0x05]), Err(Error::DecodeTruncated)));
    }
}
