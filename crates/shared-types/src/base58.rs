//! Base58 text encoding for addresses and other human-facing byte strings.
//!
//! The alphabet and its inverse are compile-time constants; there is no
//! shared mutable state.

use crate::errors::{CodecError, CodecResult};

/// Bitcoin Base58 alphabet (no `0`, `O`, `I`, `l`).
pub const ALPHABET: &[u8; 58] = b"123456789ABCDEFGHJKLMNPQRSTUVWXYZabcdefghijkmnopqrstuvwxyz";

const INVALID: u8 = 0xff;

/// ASCII byte -> alphabet index, `INVALID` for characters outside it.
const DECODE_TABLE: [u8; 128] = build_decode_table();

const fn build_decode_table() -> [u8; 128] {
    let mut table = [INVALID; 128];
    let mut i = 0;
    while i < ALPHABET.len() {
        table[ALPHABET[i] as usize] = i as u8;
        i += 1;
    }
    table
}

/// Encode bytes as Base58. Each leading zero byte becomes a leading `'1'`.
pub fn encode(input: &[u8]) -> String {
    let zeros = input.iter().take_while(|&&b| b == 0).count();

    // Little-endian base-58 digits of the big-endian number in `input`.
    let mut digits: Vec<u8> = Vec::with_capacity(input.len() * 138 / 100 + 1);
    for &byte in &input[zeros..] {
        let mut carry = u32::from(byte);
        for digit in digits.iter_mut() {
            carry += u32::from(*digit) << 8;
            *digit = (carry % 58) as u8;
            carry /= 58;
        }
        while carry > 0 {
            digits.push((carry % 58) as u8);
            carry /= 58;
        }
    }

    let mut out = String::with_capacity(zeros + digits.len());
    out.extend(std::iter::repeat(ALPHABET[0] as char).take(zeros));
    out.extend(digits.iter().rev().map(|&d| ALPHABET[d as usize] as char));
    out
}

/// Decode Base58 text. Leading `'1'` characters become leading zero bytes.
pub fn decode(input: &str) -> CodecResult<Vec<u8>> {
    let zeros = input.bytes().take_while(|&b| b == ALPHABET[0]).count();

    // Little-endian base-256 bytes of the value.
    let mut bytes: Vec<u8> = Vec::with_capacity(input.len() * 733 / 1000 + 1);
    for (position, character) in input.chars().enumerate().skip(zeros) {
        let value = lookup(character).ok_or(CodecError::InvalidBase58Character {
            character,
            position,
        })?;
        let mut carry = u32::from(value);
        for byte in bytes.iter_mut() {
            carry += u32::from(*byte) * 58;
            *byte = (carry & 0xff) as u8;
            carry >>= 8;
        }
        while carry > 0 {
            bytes.push((carry & 0xff) as u8);
            carry >>= 8;
        }
    }

    let mut out = vec![0u8; zeros];
    out.extend(bytes.iter().rev());
    Ok(out)
}

fn lookup(character: char) -> Option<u8> {
    let code = usize::try_from(u32::from(character)).ok()?;
    match DECODE_TABLE.get(code) {
        Some(&INVALID) | None => None,
        Some(&value) => Some(value),
    }
}
