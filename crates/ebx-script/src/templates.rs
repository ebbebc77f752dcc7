//! Standard output-script templates and their unlocking scripts.
//!
//! Three locking families, recognized structurally:
//! - pkh: `DUP DOUBLEBLAKE3 <pkh> EQUALVERIFY CHECKSIG`
//! - pkhx: the pkh body behind `IF`, with an `ELSE` branch that lets
//!   anyone sweep the output once its relative lock has passed
//! - pkhxr: pkhx plus a recovery-key branch behind a shorter lock
//!
//! Unlocking scripts pick the branch with trailing `1`/`0` selectors.
//! Classification is computed on demand; scripts carry no kind tag.

use ebx_primitives::ec::{COMPACT_SIG_SIZE, PUB_KEY_SIZE};
use ebx_primitives::pkh::{Pkh, PKH_SIZE};

use crate::chunk::ScriptChunk;
use crate::opcodes::*;
use crate::script::Script;

/// Blocks until a 90-day pkhx output expires (600s blocks).
pub const PKHX_90D_LOCK_REL: u32 = 12960;
/// Blocks until a 1-hour pkhx output expires.
pub const PKHX_1H_LOCK_REL: u32 = 6;
/// Recovery window of the 90d/60d pkhxr template.
pub const PKHXR_60D_LOCK_REL: u32 = 8640;
/// Recovery window of the 1h/40m pkhxr template.
pub const PKHXR_40M_LOCK_REL: u32 = 4;

/// Full transaction signature length (hash-type byte + compact sig).
const SIG_SIZE: usize = COMPACT_SIG_SIZE + 1;

/// The template an output script matches, if any.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScriptTemplate {
    Pkh,
    Pkhx90d,
    Pkhx1h,
    Pkhxr90d60d,
    Pkhxr1h40m,
    Unknown,
}

/// Push chunk for payloads longer than a small number. All template
/// payloads (32/33/65 bytes, multi-byte lock values) fit PUSHDATA1.
fn push_chunk(data: Vec<u8>) -> ScriptChunk {
    ScriptChunk { opcode: OP_PUSHDATA1, data: Some(data) }
}

/// Minimal chunk pushing `lock_rel` in signed-number form.
fn lock_rel_chunk(lock_rel: u32) -> ScriptChunk {
    match lock_rel {
        0 => ScriptChunk::new(OP_0),
        1..=16 => ScriptChunk::new(OP_1 + (lock_rel as u8) - 1),
        _ => {
            let mut bytes = Vec::new();
            let mut n = lock_rel;
            while n > 0 {
                bytes.push((n & 0xff) as u8);
                n >>= 8;
            }
            if bytes.last().is_some_and(|&b| b & 0x80 != 0) {
                bytes.push(0);
            }
            push_chunk(bytes)
        }
    }
}

fn is_push_of_len(chunk: &ScriptChunk, len: usize) -> bool {
    chunk.opcode == OP_PUSHDATA1 && chunk.data.as_ref().is_some_and(|d| d.len() == len)
}

/// The five pkh-check chunks shared by every template body.
fn pkh_body(pkh: &Pkh) -> [ScriptChunk; 5] {
    [
        ScriptChunk::new(OP_DUP),
        ScriptChunk::new(OP_DOUBLEBLAKE3),
        push_chunk(pkh.to_bytes().to_vec()),
        ScriptChunk::new(OP_EQUALVERIFY),
        ScriptChunk::new(OP_CHECKSIG),
    ]
}

fn is_pkh_body(chunks: &[ScriptChunk]) -> bool {
    chunks.len() == 5
        && chunks[0].opcode == OP_DUP
        && chunks[1].opcode == OP_DOUBLEBLAKE3
        && is_push_of_len(&chunks[2], PKH_SIZE)
        && chunks[3].opcode == OP_EQUALVERIFY
        && chunks[4].opcode == OP_CHECKSIG
}

fn body_pkh(chunks: &[ScriptChunk]) -> Option<Pkh> {
    let data = chunks[2].data.as_ref()?;
    Pkh::from_slice(data).ok()
}

impl Script {
    // ----- plain pkh -----

    pub fn from_pkh_output(pkh: &Pkh) -> Script {
        Script::new(pkh_body(pkh).to_vec())
    }

    pub fn is_pkh_output(&self) -> bool {
        is_pkh_body(&self.chunks)
    }

    pub fn pkh_output_pkh(&self) -> Option<Pkh> {
        if self.is_pkh_output() {
            body_pkh(&self.chunks)
        } else {
            None
        }
    }

    pub fn from_pkh_input(sig: &[u8; SIG_SIZE], pub_key: &[u8; PUB_KEY_SIZE]) -> Script {
        Script::new(vec![push_chunk(sig.to_vec()), push_chunk(pub_key.to_vec())])
    }

    /// Zero-filled pkh input, for size estimation before signing.
    pub fn from_pkh_input_placeholder() -> Script {
        Script::from_pkh_input(&[0; SIG_SIZE], &[0; PUB_KEY_SIZE])
    }

    pub fn is_pkh_input(&self) -> bool {
        self.chunks.len() == 2
            && is_push_of_len(&self.chunks[0], SIG_SIZE)
            && is_push_of_len(&self.chunks[1], PUB_KEY_SIZE)
    }

    // ----- expiring pkhx -----

    fn from_pkhx_output(pkh: &Pkh, lock_rel: u32) -> Script {
        let mut chunks = vec![ScriptChunk::new(OP_IF)];
        chunks.extend(pkh_body(pkh));
        chunks.extend([
            ScriptChunk::new(OP_ELSE),
            lock_rel_chunk(lock_rel),
            ScriptChunk::new(OP_CHECKLOCKRELVERIFY),
            ScriptChunk::new(OP_DROP),
            ScriptChunk::new(OP_1),
            ScriptChunk::new(OP_ENDIF),
        ]);
        Script::new(chunks)
    }

    fn is_pkhx_output(&self, lock_rel: u32) -> bool {
        let c = &self.chunks;
        c.len() == 12
            && c[0].opcode == OP_IF
            && is_pkh_body(&c[1..6])
            && c[6].opcode == OP_ELSE
            && c[7] == lock_rel_chunk(lock_rel)
            && c[8].opcode == OP_CHECKLOCKRELVERIFY
            && c[9].opcode == OP_DROP
            && c[10].opcode == OP_1
            && c[11].opcode == OP_ENDIF
    }

    pub fn from_pkhx_90d_output(pkh: &Pkh) -> Script {
        Self::from_pkhx_output(pkh, PKHX_90D_LOCK_REL)
    }

    pub fn is_pkhx_90d_output(&self) -> bool {
        self.is_pkhx_output(PKHX_90D_LOCK_REL)
    }

    pub fn from_pkhx_1h_output(pkh: &Pkh) -> Script {
        Self::from_pkhx_output(pkh, PKHX_1H_LOCK_REL)
    }

    pub fn is_pkhx_1h_output(&self) -> bool {
        self.is_pkhx_output(PKHX_1H_LOCK_REL)
    }

    pub fn pkhx_output_pkh(&self) -> Option<Pkh> {
        if self.is_pkhx_90d_output() || self.is_pkhx_1h_output() {
            body_pkh(&self.chunks[1..6])
        } else {
            None
        }
    }

    /// Spend-by-owner input: selects the `IF` branch.
    pub fn from_pkhx_unexpired_input(
        sig: &[u8; SIG_SIZE],
        pub_key: &[u8; PUB_KEY_SIZE],
    ) -> Script {
        Script::new(vec![
            push_chunk(sig.to_vec()),
            push_chunk(pub_key.to_vec()),
            ScriptChunk::new(OP_1),
        ])
    }

    pub fn from_pkhx_unexpired_input_placeholder() -> Script {
        Script::from_pkhx_unexpired_input(&[0; SIG_SIZE], &[0; PUB_KEY_SIZE])
    }

    pub fn is_pkhx_unexpired_input(&self) -> bool {
        self.chunks.len() == 3
            && is_push_of_len(&self.chunks[0], SIG_SIZE)
            && is_push_of_len(&self.chunks[1], PUB_KEY_SIZE)
            && self.chunks[2].opcode == OP_1
    }

    /// Sweep-after-expiry input: selects the `ELSE` branch, no key.
    pub fn from_pkhx_expired_input() -> Script {
        Script::new(vec![ScriptChunk::new(OP_0)])
    }

    pub fn is_pkhx_expired_input(&self) -> bool {
        self.chunks.len() == 1 && self.chunks[0].opcode == OP_0
    }

    // ----- expiring pkhx with recovery -----

    fn from_pkhxr_output(pkh: &Pkh, recovery_pkh: &Pkh, lock_rel: u32, r_lock_rel: u32) -> Script {
        let mut chunks = vec![ScriptChunk::new(OP_IF)];
        chunks.extend(pkh_body(pkh));
        chunks.extend([
            ScriptChunk::new(OP_ELSE),
            ScriptChunk::new(OP_IF),
            lock_rel_chunk(r_lock_rel),
            ScriptChunk::new(OP_CHECKLOCKRELVERIFY),
            ScriptChunk::new(OP_DROP),
        ]);
        chunks.extend(pkh_body(recovery_pkh));
        chunks.extend([
            ScriptChunk::new(OP_ELSE),
            lock_rel_chunk(lock_rel),
            ScriptChunk::new(OP_CHECKLOCKRELVERIFY),
            ScriptChunk::new(OP_DROP),
            ScriptChunk::new(OP_1),
            ScriptChunk::new(OP_ENDIF),
            ScriptChunk::new(OP_ENDIF),
        ]);
        Script::new(chunks)
    }

    fn is_pkhxr_output(&self, lock_rel: u32, r_lock_rel: u32) -> bool {
        let c = &self.chunks;
        c.len() == 23
            && c[0].opcode == OP_IF
            && is_pkh_body(&c[1..6])
            && c[6].opcode == OP_ELSE
            && c[7].opcode == OP_IF
            && c[8] == lock_rel_chunk(r_lock_rel)
            && c[9].opcode == OP_CHECKLOCKRELVERIFY
            && c[10].opcode == OP_DROP
            && is_pkh_body(&c[11..16])
            && c[16].opcode == OP_ELSE
            && c[17] == lock_rel_chunk(lock_rel)
            && c[18].opcode == OP_CHECKLOCKRELVERIFY
            && c[19].opcode == OP_DROP
            && c[20].opcode == OP_1
            && c[21].opcode == OP_ENDIF
            && c[22].opcode == OP_ENDIF
    }

    pub fn from_pkhxr_90d_60d_output(pkh: &Pkh, recovery_pkh: &Pkh) -> Script {
        Self::from_pkhxr_output(pkh, recovery_pkh, PKHX_90D_LOCK_REL, PKHXR_60D_LOCK_REL)
    }

    pub fn is_pkhxr_90d_60d_output(&self) -> bool {
        self.is_pkhxr_output(PKHX_90D_LOCK_REL, PKHXR_60D_LOCK_REL)
    }

    pub fn from_pkhxr_1h_40m_output(pkh: &Pkh, recovery_pkh: &Pkh) -> Script {
        Self::from_pkhxr_output(pkh, recovery_pkh, PKHX_1H_LOCK_REL, PKHXR_40M_LOCK_REL)
    }

    pub fn is_pkhxr_1h_40m_output(&self) -> bool {
        self.is_pkhxr_output(PKHX_1H_LOCK_REL, PKHXR_40M_LOCK_REL)
    }

    /// Primary and recovery pkh embedded in a pkhxr output.
    pub fn pkhxr_output_pkhs(&self) -> Option<(Pkh, Pkh)> {
        if self.is_pkhxr_90d_60d_output() || self.is_pkhxr_1h_40m_output() {
            let pkh = body_pkh(&self.chunks[1..6])?;
            let recovery_pkh = body_pkh(&self.chunks[11..16])?;
            Some((pkh, recovery_pkh))
        } else {
            None
        }
    }

    /// Spend-by-owner input: `1` selects the outer `IF` branch.
    pub fn from_pkhxr_unexpired_input(
        sig: &[u8; SIG_SIZE],
        pub_key: &[u8; PUB_KEY_SIZE],
    ) -> Script {
        Script::new(vec![
            push_chunk(sig.to_vec()),
            push_chunk(pub_key.to_vec()),
            ScriptChunk::new(OP_1),
        ])
    }

    pub fn from_pkhxr_unexpired_input_placeholder() -> Script {
        Script::from_pkhxr_unexpired_input(&[0; SIG_SIZE], &[0; PUB_KEY_SIZE])
    }

    pub fn is_pkhxr_unexpired_input(&self) -> bool {
        self.is_pkhx_unexpired_input()
    }

    /// Recovery-key input: `1 0` selects the inner `IF` branch.
    pub fn from_pkhxr_recovery_input(
        sig: &[u8; SIG_SIZE],
        pub_key: &[u8; PUB_KEY_SIZE],
    ) -> Script {
        Script::new(vec![
            push_chunk(sig.to_vec()),
            push_chunk(pub_key.to_vec()),
            ScriptChunk::new(OP_1),
            ScriptChunk::new(OP_0),
        ])
    }

    pub fn from_pkhxr_recovery_input_placeholder() -> Script {
        Script::from_pkhxr_recovery_input(&[0; SIG_SIZE], &[0; PUB_KEY_SIZE])
    }

    pub fn is_pkhxr_recovery_input(&self) -> bool {
        self.chunks.len() == 4
            && is_push_of_len(&self.chunks[0], SIG_SIZE)
            && is_push_of_len(&self.chunks[1], PUB_KEY_SIZE)
            && self.chunks[2].opcode == OP_1
            && self.chunks[3].opcode == OP_0
    }

    /// Sweep-after-expiry input: `0 0` falls through both branches.
    pub fn from_pkhxr_expired_input() -> Script {
        Script::new(vec![ScriptChunk::new(OP_0), ScriptChunk::new(OP_0)])
    }

    pub fn is_pkhxr_expired_input(&self) -> bool {
        self.chunks.len() == 2
            && self.chunks[0].opcode == OP_0
            && self.chunks[1].opcode == OP_0
    }

    // ----- expiry predicates -----

    pub fn is_pkhx_90d_expired(new_block_num: u32, prev_block_num: u32) -> bool {
        new_block_num >= prev_block_num.saturating_add(PKHX_90D_LOCK_REL)
    }

    pub fn is_pkhx_1h_expired(new_block_num: u32, prev_block_num: u32) -> bool {
        new_block_num >= prev_block_num.saturating_add(PKHX_1H_LOCK_REL)
    }

    pub fn is_pkhxr_90d_60d_expired(new_block_num: u32, prev_block_num: u32) -> bool {
        new_block_num >= prev_block_num.saturating_add(PKHX_90D_LOCK_REL)
    }

    pub fn is_pkhxr_90d_60d_recoverable(new_block_num: u32, prev_block_num: u32) -> bool {
        new_block_num >= prev_block_num.saturating_add(PKHXR_60D_LOCK_REL)
    }

    pub fn is_pkhxr_1h_40m_expired(new_block_num: u32, prev_block_num: u32) -> bool {
        new_block_num >= prev_block_num.saturating_add(PKHX_1H_LOCK_REL)
    }

    pub fn is_pkhxr_1h_40m_recoverable(new_block_num: u32, prev_block_num: u32) -> bool {
        new_block_num >= prev_block_num.saturating_add(PKHXR_40M_LOCK_REL)
    }

    // ----- classification -----

    /// Matches the script against the known output templates.
    pub fn classify(&self) -> ScriptTemplate {
        if self.is_pkh_output() {
            ScriptTemplate::Pkh
        } else if self.is_pkhx_90d_output() {
            ScriptTemplate::Pkhx90d
        } else if self.is_pkhx_1h_output() {
            ScriptTemplate::Pkhx1h
        } else if self.is_pkhxr_90d_60d_output() {
            ScriptTemplate::Pkhxr90d60d
        } else if self.is_pkhxr_1h_40m_output() {
            ScriptTemplate::Pkhxr1h40m
        } else {
            ScriptTemplate::Unknown
        }
    }
}
