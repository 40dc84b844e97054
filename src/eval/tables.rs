//! C5: byte and word table construction.
//!
//! One 256-entry table advances the register by a single byte; the word
//! table builds on top of it by chaining the byte advance across the
//! lanes of a multi-byte group.

use crate::eval::bitwise::step_byte;
use crate::model::Model;
use crate::poly::mask_width;

/// `table_byte[k]` is the raw (no `xorout`, no `rev`) register reached
/// from a zero register after processing byte `k`. Non-reflected,
/// `width <= 8` models store the byte-aligned representation (see
/// `eval::bitwise::step_byte`) so the byte-wise/word-wise evaluators can
/// XOR new data in without a shift on every iteration.
pub fn table_byte(model: &Model) -> [u128; 256] {
    let mut table = [0u128; 256];
    for (k, slot) in table.iter_mut().enumerate() {
        *slot = step_byte(model, 0, k as u8);
    }
    table
}

/// Advance the raw register `v` by exactly one zero byte, using only the
/// byte table — this is `step_byte(model, v, 0)` folded into a single
/// table lookup via the linearity of the recurrence.
pub(crate) fn advance_one_byte(model: &Model, byte_table: &[u128; 256], v: u128) -> u128 {
    let width = model.width;
    if model.refin {
        (v >> 8) ^ byte_table[(v & 0xFF) as usize]
    } else if width <= 8 {
        byte_table[(v & 0xFF) as usize]
    } else {
        let mask = mask_width(width);
        ((v << 8) ^ byte_table[((v >> (width - 8)) & 0xFF) as usize]) & mask
    }
}

/// `lanes[n][k]` is `table_byte[k]` advanced by `n` further zero bytes —
/// one 256-entry lane per byte position within a `word_bytes`-byte group.
/// `word_bytes` is 4 or 8, the two native CPU word sizes.
#[derive(Debug, Clone)]
pub struct WordTable {
    pub word_bytes: usize,
    pub lanes: Vec<[u128; 256]>,
}

pub fn table_word(model: &Model, byte_table: &[u128; 256], word_bytes: usize) -> WordTable {
    assert!(
        word_bytes == 4 || word_bytes == 8,
        "word size must be 4 or 8 bytes, got {word_bytes}"
    );
    let mut lanes = Vec::with_capacity(word_bytes);
    lanes.push(*byte_table);
    for n in 1..word_bytes {
        let prev = &lanes[n - 1];
        let mut next = [0u128; 256];
        for (k, slot) in next.iter_mut().enumerate() {
            *slot = advance_one_byte(model, byte_table, prev[k]);
        }
        lanes.push(next);
    }
    WordTable { word_bytes, lanes }
}
