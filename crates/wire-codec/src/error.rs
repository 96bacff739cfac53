use thiserror::Error;

/// Base58 text decoding errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Base58Error {
    #[error("invalid base58 character {character:?} at index {index}")]
    InvalidCharacter { character: char, index: usize },

    #[error("invalid decoded length: expected {expected} bytes, got {actual}")]
    InvalidLength { expected: usize, actual: usize },

    #[error("base58 checksum mismatch")]
    InvalidChecksum,

    #[error("base58check payload shorter than its checksum")]
    TooShort,
}

/// Errors raised while reading binary data.
///
/// Any of these aborts the decode of the whole record; a decoder never
/// substitutes a default value for malformed input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodingError {
    #[error("unexpected end of data: needed {needed} bytes, {remaining} remaining")]
    UnexpectedEndOfData { needed: usize, remaining: usize },

    #[error("invalid bool byte: {0}")]
    InvalidBool(u8),

    #[error("invalid option tag: {0}")]
    InvalidOptionTag(u8),

    #[error("string is not valid utf-8")]
    InvalidUtf8,

    #[error("length prefix overflow")]
    LengthOverflow,

    #[error("non-canonical compact length encoding")]
    NonCanonicalLength,

    #[error("{0} trailing bytes after value")]
    TrailingBytes(usize),

    #[error("unsupported message version: {0}")]
    UnsupportedVersion(u8),

    #[error("invalid value: {0}")]
    InvalidValue(String),
}

/// Errors raised while writing binary data.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EncodingError {
    #[error("length {0} does not fit the length prefix")]
    LengthOverflow(usize),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_invalid_character() {
        let err = Base58Error::InvalidCharacter {
            character: '0',
            index: 3,
        };
        assert_eq!(err.to_string(), "invalid base58 character '0' at index 3");
    }

    #[test]
    fn display_unexpected_end() {
        let err = DecodingError::UnexpectedEndOfData {
            needed: 8,
            remaining: 2,
        };
        assert_eq!(
            err.to_string(),
            "unexpected end of data: needed 8 bytes, 2 remaining"
        );
    }

    #[test]
    fn display_length_overflow() {
        let err = EncodingError::LengthOverflow(70_000);
        assert_eq!(
            err.to_string(),
            "length 70000 does not fit the length prefix"
        );
    }

    #[test]
    fn error_trait_is_implemented() {
        let err: Box<dyn std::error::Error> = Box::new(DecodingError::InvalidUtf8);
        assert!(err.to_string().contains("utf-8"));
    }
}
