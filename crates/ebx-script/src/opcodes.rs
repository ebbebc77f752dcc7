//! Opcode constants and name lookup.
//!
//! Numbering is bitwise-compatible with Bitcoin Script where an
//! analogue exists; the BLAKE3 and timelock opcodes occupy the slots of
//! their closest relatives. Canonical names drop the `OP_` prefix in
//! string form (`DUP`, `CHECKSIG`, `1`).

// constants
pub const OP_0: u8 = 0x00;
pub const OP_PUSHDATA1: u8 = 0x4c;
pub const OP_PUSHDATA2: u8 = 0x4d;
pub const OP_PUSHDATA4: u8 = 0x4e;
pub const OP_1NEGATE: u8 = 0x4f;
pub const OP_1: u8 = 0x51;
pub const OP_2: u8 = 0x52;
pub const OP_3: u8 = 0x53;
pub const OP_4: u8 = 0x54;
pub const OP_5: u8 = 0x55;
pub const OP_6: u8 = 0x56;
pub const OP_7: u8 = 0x57;
pub const OP_8: u8 = 0x58;
pub const OP_9: u8 = 0x59;
pub const OP_10: u8 = 0x5a;
pub const OP_11: u8 = 0x5b;
pub const OP_12: u8 = 0x5c;
pub const OP_13: u8 = 0x5d;
pub const OP_14: u8 = 0x5e;
pub const OP_15: u8 = 0x5f;
pub const OP_16: u8 = 0x60;

pub const OP_NOP: u8 = 0x61;
pub const OP_IF: u8 = 0x63;
pub const OP_NOTIF: u8 = 0x64;
pub const OP_ELSE: u8 = 0x67;
pub const OP_ENDIF: u8 = 0x68;
pub const OP_VERIFY: u8 = 0x69;
pub const OP_RETURN: u8 = 0x6a;

pub const OP_TOALTSTACK: u8 = 0x6b;
pub const OP_FROMALTSTACK: u8 = 0x6c;
pub const OP_2DROP: u8 = 0x6d;
pub const OP_2DUP: u8 = 0x6e;
pub const OP_3DUP: u8 = 0x6f;
pub const OP_2OVER: u8 = 0x70;
pub const OP_2ROT: u8 = 0x71;
pub const OP_2SWAP: u8 = 0x72;
pub const OP_IFDUP: u8 = 0x73;
pub const OP_DEPTH: u8 = 0x74;
pub const OP_DROP: u8 = 0x75;
pub const OP_DUP: u8 = 0x76;
pub const OP_NIP: u8 = 0x77;
pub const OP_OVER: u8 = 0x78;
pub const OP_PICK: u8 = 0x79;
pub const OP_ROLL: u8 = 0x7a;
pub const OP_ROT: u8 = 0x7b;
pub const OP_SWAP: u8 = 0x7c;
pub const OP_TUCK: u8 = 0x7d;

pub const OP_CAT: u8 = 0x7e;
pub const OP_SUBSTR: u8 = 0x7f;
pub const OP_LEFT: u8 = 0x80;
pub const OP_RIGHT: u8 = 0x81;
pub const OP_SIZE: u8 = 0x82;

pub const OP_INVERT: u8 = 0x83;
pub const OP_AND: u8 = 0x84;
pub const OP_OR: u8 = 0x85;
pub const OP_XOR: u8 = 0x86;
pub const OP_EQUAL: u8 = 0x87;
pub const OP_EQUALVERIFY: u8 = 0x88;

pub const OP_1ADD: u8 = 0x8b;
pub const OP_1SUB: u8 = 0x8c;
pub const OP_2MUL: u8 = 0x8d;
pub const OP_2DIV: u8 = 0x8e;
pub const OP_NEGATE: u8 = 0x8f;
pub const OP_ABS: u8 = 0x90;
pub const OP_NOT: u8 = 0x91;
pub const OP_0NOTEQUAL: u8 = 0x92;
pub const OP_ADD: u8 = 0x93;
pub const OP_SUB: u8 = 0x94;
pub const OP_MUL: u8 = 0x95;
pub const OP_DIV: u8 = 0x96;
pub const OP_MOD: u8 = 0x97;
pub const OP_LSHIFT: u8 = 0x98;
pub const OP_RSHIFT: u8 = 0x99;
pub const OP_BOOLAND: u8 = 0x9a;
pub const OP_BOOLOR: u8 = 0x9b;
pub const OP_NUMEQUAL: u8 = 0x9c;
pub const OP_NUMEQUALVERIFY: u8 = 0x9d;
pub const OP_NUMNOTEQUAL: u8 = 0x9e;
pub const OP_LESSTHAN: u8 = 0x9f;
pub const OP_GREATERTHAN: u8 = 0xa0;
pub const OP_LESSTHANOREQUAL: u8 = 0xa1;
pub const OP_GREATERTHANOREQUAL: u8 = 0xa2;
pub const OP_MIN: u8 = 0xa3;
pub const OP_MAX: u8 = 0xa4;
pub const OP_WITHIN: u8 = 0xa5;

pub const OP_BLAKE3: u8 = 0xa8;
pub const OP_DOUBLEBLAKE3: u8 = 0xaa;
pub const OP_CHECKSIG: u8 = 0xac;
pub const OP_CHECKSIGVERIFY: u8 = 0xad;
pub const OP_CHECKMULTISIG: u8 = 0xae;
pub const OP_CHECKMULTISIGVERIFY: u8 = 0xaf;

pub const OP_CHECKLOCKABSVERIFY: u8 = 0xb1;
pub const OP_CHECKLOCKRELVERIFY: u8 = 0xb2;

/// Canonical name of an opcode, or `None` for an unassigned byte.
pub fn opcode_to_name(opcode: u8) -> Option<&'static str> {
    let name = match opcode {
        OP_0 => "0",
        OP_PUSHDATA1 => "PUSHDATA1",
        OP_PUSHDATA2 => "PUSHDATA2",
        OP_PUSHDATA4 => "PUSHDATA4",
        OP_1NEGATE => "1NEGATE",
        OP_1 => "1",
        OP_2 => "2",
        OP_3 => "3",
        OP_4 => "4",
        OP_5 => "5",
        OP_6 => "6",
        OP_7 => "7",
        OP_8 => "8",
        OP_9 => "9",
        OP_10 => "10",
        OP_11 => "11",
        OP_12 => "12",
        OP_13 => "13",
        OP_14 => "14",
        OP_15 => "15",
        OP_16 => "16",
        OP_NOP => "NOP",
        OP_IF => "IF",
        OP_NOTIF => "NOTIF",
        OP_ELSE => "ELSE",
        OP_ENDIF => "ENDIF",
        OP_VERIFY => "VERIFY",
        OP_RETURN => "RETURN",
        OP_TOALTSTACK => "TOALTSTACK",
        OP_FROMALTSTACK => "FROMALTSTACK",
        OP_2DROP => "2DROP",
        OP_2DUP => "2DUP",
        OP_3DUP => "3DUP",
        OP_2OVER => "2OVER",
        OP_2ROT => "2ROT",
        OP_2SWAP => "2SWAP",
        OP_IFDUP => "IFDUP",
        OP_DEPTH => "DEPTH",
        OP_DROP => "DROP",
        OP_DUP => "DUP",
        OP_NIP => "NIP",
        OP_OVER => "OVER",
        OP_PICK => "PICK",
        OP_ROLL => "ROLL",
        OP_ROT => "ROT",
        OP_SWAP => "SWAP",
        OP_TUCK => "TUCK",
        OP_CAT => "CAT",
        OP_SUBSTR => "SUBSTR",
        OP_LEFT => "LEFT",
        OP_RIGHT => "RIGHT",
        OP_SIZE => "SIZE",
        OP_INVERT => "INVERT",
        OP_AND => "AND",
        OP_OR => "OR",
        OP_XOR => "XOR",
        OP_EQUAL => "EQUAL",
        OP_EQUALVERIFY => "EQUALVERIFY",
        OP_1ADD => "1ADD",
        OP_1SUB => "1SUB",
        OP_2MUL => "2MUL",
        OP_2DIV => "2DIV",
        OP_NEGATE => "NEGATE",
        OP_ABS => "ABS",
        OP_NOT => "NOT",
        OP_0NOTEQUAL => "0NOTEQUAL",
        OP_ADD => "ADD",
        OP_SUB => "SUB",
        OP_MUL => "MUL",
        OP_DIV => "DIV",
        OP_MOD => "MOD",
        OP_LSHIFT => "LSHIFT",
        OP_RSHIFT => "RSHIFT",
        OP_BOOLAND => "BOOLAND",
        OP_BOOLOR => "BOOLOR",
        OP_NUMEQUAL => "NUMEQUAL",
        OP_NUMEQUALVERIFY => "NUMEQUALVERIFY",
        OP_NUMNOTEQUAL => "NUMNOTEQUAL",
        OP_LESSTHAN => "LESSTHAN",
        OP_GREATERTHAN => "GREATERTHAN",
        OP_LESSTHANOREQUAL => "LESSTHANOREQUAL",
        OP_GREATERTHANOREQUAL => "GREATERTHANOREQUAL",
        OP_MIN => "MIN",
        OP_MAX => "MAX",
        OP_WITHIN => "WITHIN",
        OP_BLAKE3 => "BLAKE3",
        OP_DOUBLEBLAKE3 => "DOUBLEBLAKE3",
        OP_CHECKSIG => "CHECKSIG",
        OP_CHECKSIGVERIFY => "CHECKSIGVERIFY",
        OP_CHECKMULTISIG => "CHECKMULTISIG",
        OP_CHECKMULTISIGVERIFY => "CHECKMULTISIGVERIFY",
        OP_CHECKLOCKABSVERIFY => "CHECKLOCKABSVERIFY",
        OP_CHECKLOCKRELVERIFY => "CHECKLOCKRELVERIFY",
        _ => return None,
    };
    Some(name)
}

/// Opcode byte for a canonical name, or `None`.
pub fn name_to_opcode(name: &str) -> Option<u8> {
    let opcode = match name {
        "0" => OP_0,
        "PUSHDATA1" => OP_PUSHDATA1,
        "PUSHDATA2" => OP_PUSHDATA2,
        "PUSHDATA4" => OP_PUSHDATA4,
        "1NEGATE" => OP_1NEGATE,
        "1" => OP_1,
        "2" => OP_2,
        "3" => OP_3,
        "4" => OP_4,
        "5" => OP_5,
        "6" => OP_6,
        "7" => OP_7,
        "8" => OP_8,
        "9" => OP_9,
        "10" => OP_10,
        "11" => OP_11,
        "12" => OP_12,
        "13" => OP_13,
        "14" => OP_14,
        "15" => OP_15,
        "16" => OP_16,
        "NOP" => OP_NOP,
        "IF" => OP_IF,
        "NOTIF" => OP_NOTIF,
        "ELSE" => OP_ELSE,
        "ENDIF" => OP_ENDIF,
        "VERIFY" => OP_VERIFY,
        "RETURN" => OP_RETURN,
        "TOALTSTACK" => OP_TOALTSTACK,
        "FROMALTSTACK" => OP_FROMALTSTACK,
        "2DROP" => OP_2DROP,
        "2DUP" => OP_2DUP,
        "3DUP" => OP_3DUP,
        "2OVER" => OP_2OVER,
        "2ROT" => OP_2ROT,
        "2SWAP" => OP_2SWAP,
        "IFDUP" => OP_IFDUP,
        "DEPTH" => OP_DEPTH,
        "DROP" => OP_DROP,
        "DUP" => OP_DUP,
        "NIP" => OP_NIP,
        "OVER" => OP_OVER,
        "PICK" => OP_PICK,
        "ROLL" => OP_ROLL,
        "ROT" => OP_ROT,
        "SWAP" => OP_SWAP,
        "TUCK" => OP_TUCK,
        "CAT" => OP_CAT,
        "SUBSTR" => OP_SUBSTR,
        "LEFT" => OP_LEFT,
        "RIGHT" => OP_RIGHT,
        "SIZE" => OP_SIZE,
        "INVERT" => OP_INVERT,
        "AND" => OP_AND,
        "OR" => OP_OR,
        "XOR" => OP_XOR,
        "EQUAL" => OP_EQUAL,
        "EQUALVERIFY" => OP_EQUALVERIFY,
        "1ADD" => OP_1ADD,
        "1SUB" => OP_1SUB,
        "2MUL" => OP_2MUL,
        "2DIV" => OP_2DIV,
        "NEGATE" => OP_NEGATE,
        "ABS" => OP_ABS,
        "NOT" => OP_NOT,
        "0NOTEQUAL" => OP_0NOTEQUAL,
        "ADD" => OP_ADD,
        "SUB" => OP_SUB,
        "MUL" => OP_MUL,
        "DIV" => OP_DIV,
        "MOD" => OP_MOD,
        "LSHIFT" => OP_LSHIFT,
        "RSHIFT" => OP_RSHIFT,
        "BOOLAND" => OP_BOOLAND,
        "BOOLOR" => OP_BOOLOR,
        "NUMEQUAL" => OP_NUMEQUAL,
        "NUMEQUALVERIFY" => OP_NUMEQUALVERIFY,
        "NUMNOTEQUAL" => OP_NUMNOTEQUAL,
        "LESSTHAN" => OP_LESSTHAN,
        "GREATERTHAN" => OP_GREATERTHAN,
        "LESSTHANOREQUAL" => OP_LESSTHANOREQUAL,
        "GREATERTHANOREQUAL" => OP_GREATERTHANOREQUAL,
        "MIN" => OP_MIN,
        "MAX" => OP_MAX,
        "WITHIN" => OP_WITHIN,
        "BLAKE3" => OP_BLAKE3,
        "DOUBLEBLAKE3" => OP_DOUBLEBLAKE3,
        "CHECKSIG" => OP_CHECKSIG,
        "CHECKSIGVERIFY" => OP_CHECKSIGVERIFY,
        "CHECKMULTISIG" => OP_CHECKMULTISIG,
        "CHECKMULTISIGVERIFY" => OP_CHECKMULTISIGVERIFY,
        "CHECKLOCKABSVERIFY" => OP_CHECKLOCKABSVERIFY,
        "CHECKLOCKRELVERIFY" => OP_CHECKLOCKRELVERIFY,
        _ => return None,
    };
    Some(opcode)
}

/// True for opcodes that only place a value on the stack: `OP_0`,
/// the PUSHDATA family, `OP_1NEGATE`, and `OP_1..OP_16`.
pub fn is_push_opcode(opcode: u8) -> bool {
    opcode == OP_0
        || opcode == OP_PUSHDATA1
        || opcode == OP_PUSHDATA2
        || opcode == OP_PUSHDATA4
        || (OP_1NEGATE..=OP_16).contains(&opcode) && opcode != 0x50
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_named_opcode_round_trips() {
        let mut count = 0;
        for byte in 0..=0xffu8 {
            if let Some(name) = opcode_to_name(byte) {
                assert_eq!(name_to_opcode(name), Some(byte), "{}", name);
                count += 1;
            }
        }
        assert_eq!(count, 93);
    }

    #[test]
    fn unknown_bytes_and_names_have_no_mapping() {
        assert_eq!(opcode_to_name(0xff), None);
        assert_eq!(opcode_to_name(0x50), None);
        assert_eq!(name_to_opcode("OP_DUP"), None);
        assert_eq!(name_to_opcode("FROBNICATE"), None);
    }

    #[test]
    fn push_opcode_classification() {
        assert!(is_push_opcode(OP_0));
        assert!(is_push_opcode(OP_PUSHDATA4));
        assert!(is_push_opcode(OP_1NEGATE));
        assert!(is_push_opcode(OP_16));
        assert!(!is_push_opcode(0x50));
        assert!(!is_push_opcode(OP_DUP));
        assert!(!is_push_opcode(OP_CHECKSIG));
    }
}
