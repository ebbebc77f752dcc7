//! Script chunks: one opcode plus optional push data.
//!
//! Push payloads are carried only by the PUSHDATA1/2/4 opcodes with
//! big-endian lengths. Encoding is length-minimal and decode rejects
//! any wider-than-necessary form, mirroring the VarInt rule.

use std::fmt;
use std::str::FromStr;

use ebx_primitives::util::ByteReader;

use crate::opcodes::*;
use crate::ScriptError;

/// One opcode with its optional push payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptChunk {
    pub opcode: u8,
    pub data: Option<Vec<u8>>,
}

impl ScriptChunk {
    /// A bare opcode with no payload.
    pub fn new(opcode: u8) -> Self {
        ScriptChunk { opcode, data: None }
    }

    /// Most compact chunk that pushes `data`: empty data becomes
    /// `OP_0`, a single byte in 1..=16 becomes the small-number
    /// opcode, anything else the smallest PUSHDATA that fits.
    pub fn from_data(data: Vec<u8>) -> Result<Self, ScriptError> {
        match data.len() {
            0 => Ok(ScriptChunk::new(OP_0)),
            1 if (1..=16).contains(&data[0]) => Ok(ScriptChunk::new(OP_1 + data[0] - 1)),
            len if len <= 0xff => Ok(ScriptChunk { opcode: OP_PUSHDATA1, data: Some(data) }),
            len if len <= 0xffff => Ok(ScriptChunk { opcode: OP_PUSHDATA2, data: Some(data) }),
            len if len <= 0xffff_ffff => {
                Ok(ScriptChunk { opcode: OP_PUSHDATA4, data: Some(data) })
            }
            len => Err(ScriptError::DataTooBig(len)),
        }
    }

    /// The value this chunk places on the stack, or `None` for a
    /// non-push opcode.
    pub fn push_value(&self) -> Option<Vec<u8>> {
        match self.opcode {
            OP_PUSHDATA1 | OP_PUSHDATA2 | OP_PUSHDATA4 => self.data.clone(),
            OP_0 => Some(Vec::new()),
            OP_1NEGATE => Some(vec![0x81]),
            op if (OP_1..=OP_16).contains(&op) => Some(vec![op - OP_1 + 1]),
            _ => None,
        }
    }

    /// Encoded length in bytes.
    pub fn size(&self) -> usize {
        match self.opcode {
            OP_PUSHDATA1 => 2 + self.data.as_ref().map_or(0, Vec::len),
            OP_PUSHDATA2 => 3 + self.data.as_ref().map_or(0, Vec::len),
            OP_PUSHDATA4 => 5 + self.data.as_ref().map_or(0, Vec::len),
            _ => 1,
        }
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = vec![self.opcode];
        if let Some(data) = &self.data {
            match self.opcode {
                OP_PUSHDATA1 => out.push(data.len() as u8),
                OP_PUSHDATA2 => out.extend_from_slice(&(data.len() as u16).to_be_bytes()),
                OP_PUSHDATA4 => out.extend_from_slice(&(data.len() as u32).to_be_bytes()),
                _ => {}
            }
            out.extend_from_slice(data);
        }
        out
    }

    /// Decodes one chunk, enforcing minimal push encoding.
    pub fn from_reader(reader: &mut ByteReader) -> Result<Self, ScriptError> {
        let opcode = reader.read_u8()?;
        if opcode_to_name(opcode).is_none() {
            return Err(ScriptError::InvalidOpcode(opcode));
        }
        let len = match opcode {
            OP_PUSHDATA1 => reader.read_u8()? as usize,
            OP_PUSHDATA2 => reader.read_u16_be()? as usize,
            OP_PUSHDATA4 => reader.read_u32_be()? as usize,
            _ => return Ok(ScriptChunk::new(opcode)),
        };
        match opcode {
            OP_PUSHDATA1 if len == 0 => return Err(ScriptError::NonMinimalPush),
            OP_PUSHDATA2 if len <= 0xff => return Err(ScriptError::NonMinimalPush),
            OP_PUSHDATA4 if len <= 0xffff => return Err(ScriptError::NonMinimalPush),
            _ => {}
        }
        let data = reader.read_bytes(len)?;
        // a lone small number must be its own opcode
        if opcode == OP_PUSHDATA1 && data.len() == 1 && (1..=16).contains(&data[0]) {
            return Err(ScriptError::NonMinimalPush);
        }
        Ok(ScriptChunk { opcode, data: Some(data) })
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, ScriptError> {
        let mut reader = ByteReader::new(bytes);
        let chunk = Self::from_reader(&mut reader)?;
        if reader.remaining() > 0 {
            return Err(ebx_primitives::PrimitivesError::TooMuchData(reader.remaining()).into());
        }
        Ok(chunk)
    }
}

impl fmt::Display for ScriptChunk {
    /// `0x<hex>` for push data, the bare opcode name otherwise.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.data {
            Some(data) => write!(f, "0x{}", hex::encode(data)),
            None => match opcode_to_name(self.opcode) {
                Some(name) => write!(f, "{}", name),
                None => write!(f, "0x{:02x}?", self.opcode),
            },
        }
    }
}

impl FromStr for ScriptChunk {
    type Err = ScriptError;

    fn from_str(token: &str) -> Result<Self, Self::Err> {
        if let Some(hex_str) = token.strip_prefix("0x") {
            let data = hex::decode(hex_str)?;
            return Self::from_data(data);
        }
        match name_to_opcode(token) {
            Some(op) if op != OP_PUSHDATA1 && op != OP_PUSHDATA2 && op != OP_PUSHDATA4 => {
                Ok(ScriptChunk::new(op))
            }
            Some(_) => Err(ScriptError::UnknownOpcodeName(token.to_string())),
            None => Err(ScriptError::UnknownOpcodeName(token.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_data_picks_smallest_form() {
        assert_eq!(ScriptChunk::from_data(vec![]).unwrap(), ScriptChunk::new(OP_0));
        assert_eq!(ScriptChunk::from_data(vec![1]).unwrap(), ScriptChunk::new(OP_1));
        assert_eq!(ScriptChunk::from_data(vec![16]).unwrap(), ScriptChunk::new(OP_16));
        // 0 and 17 are not small numbers
        assert_eq!(ScriptChunk::from_data(vec![0]).unwrap().opcode, OP_PUSHDATA1);
        assert_eq!(ScriptChunk::from_data(vec![17]).unwrap().opcode, OP_PUSHDATA1);
        assert_eq!(ScriptChunk::from_data(vec![0x81]).unwrap().opcode, OP_PUSHDATA1);
        assert_eq!(ScriptChunk::from_data(vec![7; 255]).unwrap().opcode, OP_PUSHDATA1);
        assert_eq!(ScriptChunk::from_data(vec![7; 256]).unwrap().opcode, OP_PUSHDATA2);
        assert_eq!(ScriptChunk::from_data(vec![7; 65_536]).unwrap().opcode, OP_PUSHDATA4);
    }

    #[test]
    fn pushdata1_wire_form() {
        let chunk = ScriptChunk::from_data(vec![0xaa, 0xbb]).unwrap();
        assert_eq!(chunk.to_bytes(), vec![OP_PUSHDATA1, 0x02, 0xaa, 0xbb]);
        assert_eq!(chunk.size(), 4);
        assert_eq!(ScriptChunk::from_bytes(&chunk.to_bytes()).unwrap(), chunk);
    }

    #[test]
    fn pushdata2_wire_form_is_big_endian() {
        let chunk = ScriptChunk::from_data(vec![7; 0x0102]).unwrap();
        let bytes = chunk.to_bytes();
        assert_eq!(&bytes[..3], &[OP_PUSHDATA2, 0x01, 0x02]);
        assert_eq!(ScriptChunk::from_bytes(&bytes).unwrap(), chunk);
    }

    #[test]
    fn decode_rejects_non_minimal_pushes() {
        // empty payload must be OP_0
        assert!(matches!(
            ScriptChunk::from_bytes(&[OP_PUSHDATA1, 0x00]),
            Err(ScriptError::NonMinimalPush)
        ));
        // single byte 1..=16 must be a small-number opcode
        assert!(matches!(
            ScriptChunk::from_bytes(&[OP_PUSHDATA1, 0x01, 0x05]),
            Err(ScriptError::NonMinimalPush)
        ));
        // 0x11 = 17 is not a small number, so this one is fine
        assert!(ScriptChunk::from_bytes(&[OP_PUSHDATA1, 0x01, 0x11]).is_ok());
        // length 255 fits in PUSHDATA1
        let mut bytes = vec![OP_PUSHDATA2, 0x00, 0xff];
        bytes.extend_from_slice(&[7; 255]);
        assert!(matches!(
            ScriptChunk::from_bytes(&bytes),
            Err(ScriptError::NonMinimalPush)
        ));
        // length 65535 fits in PUSHDATA2
        let mut bytes = vec![OP_PUSHDATA4, 0x00, 0x00, 0xff, 0xff];
        bytes.extend_from_slice(&[7; 65_535]);
        assert!(matches!(
            ScriptChunk::from_bytes(&bytes),
            Err(ScriptError::NonMinimalPush)
        ));
    }

    #[test]
    fn decode_rejects_unknown_opcode() {
        assert!(matches!(
            ScriptChunk::from_bytes(&[0x50]),
            Err(ScriptError::InvalidOpcode(0x50))
        ));
    }

    #[test]
    fn truncated_payload_is_a_codec_error() {
        let err = ScriptChunk::from_bytes(&[OP_PUSHDATA1, 0x05, 0x01]).unwrap_err();
        assert!(matches!(err, ScriptError::Primitives(_)));
    }

    #[test]
    fn push_values() {
        assert_eq!(ScriptChunk::new(OP_0).push_value(), Some(vec![]));
        assert_eq!(ScriptChunk::new(OP_1NEGATE).push_value(), Some(vec![0x81]));
        assert_eq!(ScriptChunk::new(OP_9).push_value(), Some(vec![9]));
        assert_eq!(
            ScriptChunk::from_data(vec![0xab, 0xcd]).unwrap().push_value(),
            Some(vec![0xab, 0xcd])
        );
        assert_eq!(ScriptChunk::new(OP_DUP).push_value(), None);
    }

    #[test]
    fn string_forms() {
        assert_eq!(ScriptChunk::new(OP_DUP).to_string(), "DUP");
        assert_eq!(ScriptChunk::new(OP_0).to_string(), "0");
        assert_eq!(ScriptChunk::new(OP_16).to_string(), "16");
        let chunk = ScriptChunk::from_data(vec![0xde, 0xad]).unwrap();
        assert_eq!(chunk.to_string(), "0xdead");
        assert_eq!("0xdead".parse::<ScriptChunk>().unwrap(), chunk);
        assert_eq!("CHECKSIG".parse::<ScriptChunk>().unwrap().opcode, OP_CHECKSIG);
        assert!("OP_DUP".parse::<ScriptChunk>().is_err());
        // hex data canonicalizes to the small-number form
        assert_eq!("0x05".parse::<ScriptChunk>().unwrap(), ScriptChunk::new(OP_5));
    }
}
