//! The Script type: an ordered sequence of chunks.
//!
//! Scripts round-trip byte-for-byte through decode/encode and carry no
//! kind tag; template classification is recomputed on demand via
//! [`Script::classify`].

use std::fmt;
use std::str::FromStr;

use ebx_primitives::util::ByteReader;
use serde::de::Error as SerdeError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::chunk::ScriptChunk;
use crate::ScriptError;

/// An ordered sequence of script chunks.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Script {
    pub chunks: Vec<ScriptChunk>,
}

impl Script {
    pub fn new(chunks: Vec<ScriptChunk>) -> Self {
        Script { chunks }
    }

    pub fn empty() -> Self {
        Script { chunks: Vec::new() }
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    /// Encoded length in bytes.
    pub fn size(&self) -> usize {
        self.chunks.iter().map(ScriptChunk::size).sum()
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.size());
        for chunk in &self.chunks {
            out.extend_from_slice(&chunk.to_bytes());
        }
        out
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, ScriptError> {
        let mut reader = ByteReader::new(bytes);
        Self::from_reader_exact(&mut reader)
    }

    /// Decodes chunks until the reader is exhausted.
    pub fn from_reader_exact(reader: &mut ByteReader) -> Result<Self, ScriptError> {
        let mut chunks = Vec::new();
        while !reader.eof() {
            chunks.push(ScriptChunk::from_reader(reader)?);
        }
        Ok(Script { chunks })
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.to_bytes())
    }

    pub fn from_hex(s: &str) -> Result<Self, ScriptError> {
        Ok(Self::from_bytes(&hex::decode(s)?)?)
    }

    /// True when every chunk is a push.
    pub fn is_push_only(&self) -> bool {
        self.chunks.iter().all(|c| c.push_value().is_some())
    }

    /// The values a push-only script places on the stack, bottom
    /// first. Fails with `NotPushOnly` when any chunk is an operation.
    pub fn push_values(&self) -> Result<Vec<Vec<u8>>, ScriptError> {
        self.chunks
            .iter()
            .map(|c| c.push_value().ok_or(ScriptError::NotPushOnly))
            .collect()
    }
}

impl fmt::Display for Script {
    /// Space-separated chunk tokens.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tokens: Vec<String> = self.chunks.iter().map(|c| c.to_string()).collect();
        write!(f, "{}", tokens.join(" "))
    }
}

impl FromStr for Script {
    type Err = ScriptError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let chunks = s
            .split_whitespace()
            .map(str::parse)
            .collect::<Result<Vec<ScriptChunk>, _>>()?;
        Ok(Script { chunks })
    }
}

impl Serialize for Script {
    /// Serializes as a hex string of the encoded script.
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Script {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Script::from_hex(&s).map_err(D::Error::custom)
    }
}
