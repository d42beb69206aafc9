//! Sensor and Device Identifiers
//!
//! Identifiers are opaque 24-character lowercase hex strings on the
//! wire, which is exactly 12 raw bytes. Storing the decoded bytes
//! instead of the string keeps ids `Copy`, makes comparison a 12-byte
//! memcmp, and matches the compact binary record layout, where the id
//! travels as its raw bytes rather than hex text.
//!
//! Uppercase hex is accepted on input and normalized; output is always
//! lowercase.

use core::fmt;
use core::str::FromStr;

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::errors::IdParseError;

/// Raw byte length of an identifier
pub const ID_BYTES: usize = 12;

/// Hex character length of an identifier
pub const ID_HEX_CHARS: usize = 24;

fn decode_hex24(s: &str) -> Result<[u8; ID_BYTES], IdParseError> {
    let bytes = s.as_bytes();
    if bytes.len() != ID_HEX_CHARS {
        return Err(IdParseError::InvalidLength { length: bytes.len() });
    }

    let mut out = [0u8; ID_BYTES];
    for (i, pair) in bytes.chunks_exact(2).enumerate() {
        let hi = hex_nibble(pair[0]).ok_or(IdParseError::InvalidCharacter { position: i * 2 })?;
        let lo =
            hex_nibble(pair[1]).ok_or(IdParseError::InvalidCharacter { position: i * 2 + 1 })?;
        out[i] = (hi << 4) | lo;
    }
    Ok(out)
}

fn hex_nibble(c: u8) -> Option<u8> {
    match c {
        b'0'..=b'9' => Some(c - b'0'),
        b'a'..=b'f' => Some(c - b'a' + 10),
        b'A'..=b'F' => Some(c - b'A' + 10),
        _ => None,
    }
}

fn write_hex(bytes: &[u8; ID_BYTES], f: &mut fmt::Formatter<'_>) -> fmt::Result {
    for byte in bytes {
        write!(f, "{byte:02x}")?;
    }
    Ok(())
}

macro_rules! hex_id {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub struct $name([u8; ID_BYTES]);

        impl $name {
            /// Parse from a 24-character hex string
            pub fn parse_hex(s: &str) -> Result<Self, IdParseError> {
                decode_hex24(s).map(Self)
            }

            /// Construct from raw identifier bytes
            pub const fn from_bytes(bytes: [u8; ID_BYTES]) -> Self {
                Self(bytes)
            }

            /// Raw identifier bytes
            pub const fn as_bytes(&self) -> &[u8; ID_BYTES] {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write_hex(&self.0, f)
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!(stringify!($name), "("))?;
                write_hex(&self.0, f)?;
                write!(f, ")")
            }
        }

        impl FromStr for $name {
            type Err = IdParseError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::parse_hex(s)
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.collect_str(self)
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                struct HexVisitor;

                impl Visitor<'_> for HexVisitor {
                    type Value = $name;

                    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                        f.write_str("a 24-character hex identifier")
                    }

                    fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
                        $name::parse_hex(v).map_err(E::custom)
                    }
                }

                deserializer.deserialize_str(HexVisitor)
            }
        }
    };
}

hex_id! {
    /// Identifier of one sensor channel on a device
    SensorId
}

hex_id! {
    /// Identifier of a field device
    DeviceId
}
