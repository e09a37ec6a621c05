//! The error type shared by every stage of the pipeline.

/// Something went wrong while encoding, decoding, signing or submitting an extrinsic.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("value {value} does not fit into {width} byte(s)")]
    EncodeOverflow { value: u128, width: usize },
    #[error("unexpected end of input")]
    DecodeTruncated,
    #[error("compact integer uses more bytes than required")]
    DecodeNonCanonical,
    #[error("decoded value does not fit into the target integer")]
    DecodeOverflow,
    #[error("unknown discriminant {tag:#04x} for {ty}")]
    InvalidVariant { ty: &'static str, tag: u8 },
    #[error("invalid period and phase")]
    InvalidEra,
    #[error("unsupported extrinsic version {0}")]
    UnsupportedVersion(u8),
    #[error("length prefix declares {declared} bytes but {actual} follow")]
    LengthMismatch { declared: usize, actual: usize },
    #[error("cannot decode `{field}`: {source}")]
    Field {
        field: &'static str,
        #[source]
        source: Box<Error>,
    },
    #[error("{0} is not supported")]
    UnsupportedOperation(&'static str),
    #[error("signing failed: {0}")]
    SigningFailure(String),
    #[error("submission failed: {0}")]
    SubmissionFailure(#[source] anyhow::Error),
    #[error("malformed hex: {0}")]
    InvalidHex(String),
}

impl Error {
    /// Attach the name of the composite field whose decoding failed.
    pub fn in_field(self, field: &'static str) -> Self {
        Error::Field {
            field,
            source: Box::new(self),
        }
    }
}

impl From<codec::Error> for Error {
    // `codec::Input` only fails when there are not enough bytes to read.
    fn from(_: codec::Error) -> Self {
        Error::DecodeTruncated
    }
}

pub type Result<T> = std::result::Result<T, Error>;
