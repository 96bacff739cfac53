//! Canonical byte encodings shared by the transaction and account layers.
//!
//! - [`base58`]: text form of keys, hashes and signatures
//! - [`short_vec`]: compact-length counts used by the wire message format
//! - [`binary`]: Borsh-style positional encoding for instruction payloads and
//!   account state
//!
//! Nothing here allocates global state or performs I/O.

pub mod base58;
pub mod binary;
pub mod error;
pub mod short_vec;

pub use binary::{BinaryDecode, BinaryEncode, Reader, Writer};
pub use error::{Base58Error, DecodingError, EncodingError};
pub use short_vec::{decode_compact_len, encode_compact_len};
