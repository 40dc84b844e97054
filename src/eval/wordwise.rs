//! C6: the word-table-driven evaluator (word half).
//!
//! A C implementation on architectures without unaligned-load support
//! needs an alignment prologue: a loop that walks the buffer pointer up
//! to a word boundary one byte at a time before the bulk loop dereferences
//! a whole word. Safe Rust never dereferences a raw pointer here —
//! `chunks_exact` copies bytes out of the slice regardless of where its
//! backing allocation starts — so there is no address to align and the
//! result never depends on one; alignment independence holds by
//! construction rather than by a prologue loop. The leftover bytes that
//! don't fill a whole word are instead handled as a single tail, which is
//! mathematically interchangeable with a leading prologue since CRC
//! folding is strictly sequential in the byte content either way.

use crate::bitrev::reverse;
use crate::eval::tables::{advance_one_byte, WordTable};
use crate::model::Model;
use crate::poly::mask_width;

pub fn crc_wordwise(
    model: &Model,
    byte_table: &[u128; 256],
    words: &WordTable,
    crc: u128,
    buf: Option<&[u8]>,
) -> u128 {
    let data = match buf {
        None => return model.init,
        Some(d) => d,
    };
    let width = model.width;
    let mask = mask_width(width);
    let word_bytes = words.word_bytes;

    let mut crc = crc ^ model.xorout;
    if model.rev {
        crc = reverse(crc, width);
    }

    let byte_aligned = !model.refin && width <= 8;
    let shift = if byte_aligned { 8 - width } else { 0 };
    let mut v = if byte_aligned {
        (crc << shift) & 0xFF
    } else {
        crc & mask
    };

    let mut chunks = data.chunks_exact(word_bytes);
    for group in &mut chunks {
        let mut advanced = v;
        for _ in 0..word_bytes {
            advanced = advance_one_byte(model, byte_table, advanced);
        }
        let mut acc = advanced;
        for (i, &b) in group.iter().enumerate() {
            let lane = &words.lanes[word_bytes - 1 - i];
            acc ^= lane[b as usize];
        }
        v = acc;
    }

    for &b in chunks.remainder() {
        v = if byte_aligned {
            byte_table[(v ^ b as u128) as usize & 0xFF]
        } else if model.refin {
            (v >> 8) ^ byte_table[((v as u8) ^ b) as usize]
        } else {
            ((v << 8) ^ byte_table[(((v >> (width - 8)) as u8) ^ b) as usize]) & mask
        };
    }

    let mut crc = if byte_aligned { v >> shift } else { v };
    if model.rev {
        crc = reverse(crc, width);
    }
    (crc ^ model.xorout) & mask
}
