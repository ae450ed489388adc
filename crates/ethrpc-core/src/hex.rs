//! Hex codec for the Ethereum wire conventions.
//!
//! Two encodings share the `0x` prefix but differ in grammar:
//!
//! - **Quantity** — a big-endian integer, minimal digits, `0x0` for zero.
//!   Never emitted with leading zeros.
//! - **Data** — an opaque byte string, always an even number of digits,
//!   `0x` for empty.
//!
//! Encoders are strict (minimal quantities, lowercase). Decoders reject a
//! missing or uppercase `0X` prefix and surrounding whitespace, but accept
//! non-minimal quantities and mixed-case digits, matching what nodes emit
//! in the wild.

use alloy_primitives::U256;

use crate::error::CodecError;

/// Strip the mandatory lowercase `0x` prefix.
fn strip_prefix(s: &str) -> Result<&str, CodecError> {
    s.strip_prefix("0x")
        .ok_or_else(|| CodecError::MissingPrefix(s.to_string()))
}

/// Encode a quantity as minimal lowercase hex (`0x0` for zero).
pub fn encode_quantity(n: U256) -> String {
    if n.is_zero() {
        return "0x0".to_string();
    }
    let digits = hex::encode(n.to_be_bytes::<32>());
    format!("0x{}", digits.trim_start_matches('0'))
}

/// Decode a `0x`-prefixed quantity into a [`U256`].
///
/// Leading zero digits are tolerated; everything else is strict.
pub fn decode_quantity(s: &str) -> Result<U256, CodecError> {
    let digits = strip_prefix(s)?;
    if digits.is_empty() {
        return Err(CodecError::EmptyQuantity);
    }
    if !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(CodecError::InvalidDigit(s.to_string()));
    }
    U256::from_str_radix(digits, 16).map_err(|_| CodecError::Overflow(s.to_string()))
}

/// Encode a byte string as even-length lowercase hex (`0x` for empty).
pub fn encode_data(bytes: &[u8]) -> String {
    format!("0x{}", hex::encode(bytes))
}

/// Decode a `0x`-prefixed, even-length hex string into bytes.
pub fn decode_data(s: &str) -> Result<Vec<u8>, CodecError> {
    let digits = strip_prefix(s)?;
    if digits.len() % 2 != 0 {
        return Err(CodecError::OddLength { len: digits.len() });
    }
    hex::decode(digits).map_err(|_| CodecError::InvalidDigit(s.to_string()))
}

/// Validate a 42-char address string and normalize it to lowercase.
///
/// Any digit case is accepted on input; no EIP-55 checksum is applied.
pub fn normalize_address(s: &str) -> Result<String, CodecError> {
    normalize_fixed(s, 40)
}

/// Validate a 66-char hash string and normalize it to lowercase.
pub fn normalize_hash(s: &str) -> Result<String, CodecError> {
    normalize_fixed(s, 64)
}

fn normalize_fixed(s: &str, expected: usize) -> Result<String, CodecError> {
    let digits = strip_prefix(s)?;
    if digits.len() != expected {
        return Err(CodecError::BadLength {
            expected,
            got: digits.len(),
        });
    }
    if !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(CodecError::InvalidDigit(s.to_string()));
    }
    Ok(format!("0x{}", digits.to_ascii_lowercase()))
}

/// Serde adapter for mandatory Quantity fields.
pub mod quantity {
    use alloy_primitives::U256;
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(n: &U256, ser: S) -> Result<S::Ok, S::Error> {
        ser.serialize_str(&super::encode_quantity(*n))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(de: D) -> Result<U256, D::Error> {
        let s = String::deserialize(de)?;
        super::decode_quantity(&s).map_err(de::Error::custom)
    }
}

/// Serde adapter for optional Quantity fields (`null` or absent → `None`).
pub mod quantity_opt {
    use alloy_primitives::U256;
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(n: &Option<U256>, ser: S) -> Result<S::Ok, S::Error> {
        match n {
            Some(n) => ser.serialize_str(&super::encode_quantity(*n)),
            None => ser.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(de: D) -> Result<Option<U256>, D::Error> {
        match Option::<String>::deserialize(de)? {
            Some(s) => super::decode_quantity(&s)
                .map(Some)
                .map_err(de::Error::custom),
            None => Ok(None),
        }
    }
}

/// Serde adapter for mandatory Data fields.
pub mod data {
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], ser: S) -> Result<S::Ok, S::Error> {
        ser.serialize_str(&super::encode_data(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(de: D) -> Result<Vec<u8>, D::Error> {
        let s = String::deserialize(de)?;
        super::decode_data(&s).map_err(de::Error::custom)
    }
}

/// Serde adapter for optional Data fields.
pub mod data_opt {
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &Option<Vec<u8>>, ser: S) -> Result<S::Ok, S::Error> {
        match bytes {
            Some(b) => ser.serialize_str(&super::encode_data(b)),
            None => ser.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(de: D) -> Result<Option<Vec<u8>>, D::Error> {
        match Option::<String>::deserialize(de)? {
            Some(s) => super::decode_data(&s).map(Some).map_err(de::Error::custom),
            None => Ok(None),
        }
    }
}
