//! Primitive SCALE building blocks.
//!
//! Encoding goes through `codec::Output` so that every type in this crate can implement
//! `codec::Encode` and be written into any buffer. Decoding reads from a `codec::Input` but reports
//! the typed [`Error`] so the caller can tell a truncated stream from a non-canonical one.
//!
//! Raw byte buffers have two distinct encoders on purpose: [`encode_bytes_bare`] copies the bytes
//! as they are, [`encode_bytes_prefixed`] puts a compact length in front. The signing payload
//! relies on the former and would be broken by the latter.

use crate::error::{Error, Result};
use codec::{Compact, CompactLen, Encode, Input, Output};

/// The largest value that still fits into the single-byte compact mode.
const SINGLE_BYTE_MAX: u128 = 0b0011_1111;
const TWO_BYTE_MAX: u128 = 0x3fff;
const FOUR_BYTE_MAX: u128 = 0x3fff_ffff;

/// A value that can be decoded from a SCALE stream with typed errors.
pub trait Decode: Sized {
    fn decode_from<I: Input>(input: &mut I) -> Result<Self>;
}

/// Decode a value from a byte slice. Trailing bytes are left unread.
pub fn decode<T: Decode>(mut bytes: &[u8]) -> Result<T> {
    T::decode_from(&mut bytes)
}

/// Write `value` as a compact integer using the fewest bytes possible.
pub fn encode_compact<O: Output + ?Sized>(value: u128, dest: &mut O) {
    Compact(value).encode_to(dest)
}

/// The number of bytes `encode_compact` emits for `value`.
pub fn compact_len(value: u128) -> usize {
    Compact::<u128>::compact_len(&value)
}

pub fn decode_compact<I: Input>(input: &mut I) -> Result<u128> {
    let prefix = read_byte(input)?;
    match prefix & 0b11 {
        0b00 => Ok(u128::from(prefix >> 2)),
        0b01 => {
            let value = u128::from(u16::from_le_bytes([prefix, read_byte(input)?]) >> 2);
            canonical(value, SINGLE_BYTE_MAX)
        }
        0b10 => {
            let mut buf = [prefix, 0, 0, 0];
            input.read(&mut buf[1..])?;
            let value = u128::from(u32::from_le_bytes(buf) >> 2);
            canonical(value, TWO_BYTE_MAX)
        }
        _ => {
            let len = usize::from(prefix >> 2) + 4;
            if len > 16 {
                return Err(Error::DecodeOverflow);
            }
            let mut buf = [0u8; 16];
            input.read(&mut buf[..len])?;
            let value = u128::from_le_bytes(buf);
            if len == 4 {
                canonical(value, FOUR_BYTE_MAX)
            } else if buf[len - 1] == 0 {
                // The most significant byte is zero, so a shorter length would have done.
                Err(Error::DecodeNonCanonical)
            } else {
                Ok(value)
            }
        }
    }
}

fn canonical(value: u128, previous_mode_max: u128) -> Result<u128> {
    if value > previous_mode_max {
        Ok(value)
    } else {
        Err(Error::DecodeNonCanonical)
    }
}

/// Decode a compact integer that must fit into a `u32`.
pub fn decode_compact_u32<I: Input>(input: &mut I) -> Result<u32> {
    u32::try_from(decode_compact(input)?).map_err(|_| Error::DecodeOverflow)
}

/// Write exactly `width` little-endian bytes of `value`.
///
/// Fails without writing anything if `value` needs more than `width` bytes. Supported widths are
/// 1 to 16.
pub fn encode_fixed<O: Output + ?Sized>(width: usize, value: u128, dest: &mut O) -> Result<()> {
    let fits = match width {
        1..=15 => value >> (8 * width) == 0,
        16 => true,
        _ => false,
    };
    if !fits {
        return Err(Error::EncodeOverflow { value, width });
    }
    dest.write(&value.to_le_bytes()[..width]);
    Ok(())
}

pub fn decode_fixed<I: Input>(width: usize, input: &mut I) -> Result<u128> {
    if width == 0 || width > 16 {
        return Err(Error::DecodeOverflow);
    }
    let mut buf = [0u8; 16];
    input.read(&mut buf[..width])?;
    Ok(u128::from_le_bytes(buf))
}

/// Copy `buf` verbatim, without any length prefix.
pub fn encode_bytes_bare<O: Output + ?Sized>(buf: &[u8], dest: &mut O) {
    dest.write(buf)
}

/// Write the compact length of `buf` followed by `buf` itself.
pub fn encode_bytes_prefixed<O: Output + ?Sized>(buf: &[u8], dest: &mut O) {
    encode_compact(buf.len() as u128, dest);
    dest.write(buf)
}

pub fn decode_bytes_prefixed<I: Input>(input: &mut I) -> Result<Vec<u8>> {
    let len = usize::try_from(decode_compact(input)?).map_err(|_| Error::DecodeOverflow)?;
    if let Some(remaining) = input.remaining_len()? {
        if remaining < len {
            return Err(Error::DecodeTruncated);
        }
    }
    read_bytes(len, input)
}

/// Read exactly `len` bytes.
///
/// The buffer grows with the bytes actually read, so a bogus length taken from the input cannot
/// reserve more memory than the input holds.
pub fn read_bytes<I: Input>(len: usize, input: &mut I) -> Result<Vec<u8>> {
    const CHUNK: usize = 4096;
    let mut buf = Vec::with_capacity(len.min(CHUNK));
    while buf.len() < len {
        let start = buf.len();
        let end = start + (len - start).min(CHUNK);
        buf.resize(end, 0);
        input.read(&mut buf[start..end])?;
    }
    Ok(buf)
}

/// Read everything that is left in `input`.
pub fn read_remaining<I: Input>(input: &mut I) -> Result<Vec<u8>> {
    if let Some(len) = input.remaining_len()? {
        let mut buf = vec![0; len];
        input.read(&mut buf)?;
        Ok(buf)
    } else {
        let mut buf = Vec::new();
        while let Ok(value) = input.read_byte() {
            buf.push(value);
        }
        Ok(buf)
    }
}

pub fn read_byte<I: Input>(input: &mut I) -> Result<u8> {
    Ok(input.read_byte()?)
}

pub fn read_array<I: Input, const N: usize>(input: &mut I) -> Result<[u8; N]> {
    let mut buf = [0u8; N];
    input.read(&mut buf)?;
    Ok(buf)
}

/// `0x00` for `None`, `0x01` followed by the value for `Some`.
pub fn encode_option<T: Encode, O: Output + ?Sized>(value: Option<&T>, dest: &mut O) {
    match value {
        None => dest.push_byte(0),
        Some(value) => {
            dest.push_byte(1);
            value.encode_to(dest);
        }
    }
}

pub fn decode_option<T: Decode, I: Input>(input: &mut I) -> Result<Option<T>> {
    match read_byte(input)? {
        0 => Ok(None),
        1 => T::decode_from(input).map(Some),
        tag => Err(Error::InvalidVariant { ty: "Option", tag }),
    }
}

/// Write the discriminant of a tagged type followed by the payload of the active variant.
pub fn encode_tagged<T: Encode + ?Sized, O: Output + ?Sized>(
    discriminant: u8,
    payload: &T,
    dest: &mut O,
) {
    dest.push_byte(discriminant);
    payload.encode_to(dest);
}

/// Decode one field of a composite, naming it in the error if it fails.
pub fn decode_field<T: Decode, I: Input>(field: &'static str, input: &mut I) -> Result<T> {
    T::decode_from(input).map_err(|err| err.in_field(field))
}

impl<const N: usize> Decode for [u8; N] {
    fn decode_from<I: Input>(input: &mut I) -> Result<Self> {
        read_array(input)
    }
}

impl Decode for u32 {
    fn decode_from<I: Input>(input: &mut I) -> Result<Self> {
        Ok(decode_fixed(4, input)? as u32)
    }
}
