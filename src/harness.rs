//! C10: a library-level rendering of the `crctest` driver's per-model
//! checks — bit/byte/word agreement, the catalog `check` value, the
//! `res` residue, and the combine law — returned as a list of failures
//! instead of printed to stdout and exited. The out-of-scope `crctest`
//! binary would wrap this and format the result.

use crate::combine::{build_combine_table, crc_combine};
use crate::eval::bitwise::{crc_bitwise, crc_bitwise_raw};
use crate::eval::bytewise::crc_bytewise;
use crate::eval::tables::{table_byte, table_word};
use crate::eval::wordwise::crc_wordwise;
use crate::model::Model;

const CHECK_MESSAGE: &[u8] = b"123456789";
const WORD_BYTES: usize = 8;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckKind {
    BitCatalogCheck,
    ByteAgreesWithBit,
    WordAgreesWithBit,
    Residue,
    CombineLaw,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckFailure {
    pub model_name: String,
    pub kind: CheckKind,
    pub expected: u128,
    pub actual: u128,
}

/// Run every applicable check for `model` and return one [`CheckFailure`]
/// per failing property; an empty vector means `model` passed all of
/// them. Byte/word/combine checks are skipped when
/// `model.exceeds_word_width()`; the bit and residue paths still run.
pub fn check_model(model: &Model) -> Vec<CheckFailure> {
    let mut failures = Vec::new();

    let bit_check = crc_bitwise(model, model.init, Some(CHECK_MESSAGE));
    if bit_check != model.check {
        failures.push(CheckFailure {
            model_name: model.name.clone(),
            kind: CheckKind::BitCatalogCheck,
            expected: model.check,
            actual: bit_check,
        });
    }

    let residue = residue_of(model, CHECK_MESSAGE);
    if residue != model.res {
        failures.push(CheckFailure {
            model_name: model.name.clone(),
            kind: CheckKind::Residue,
            expected: model.res,
            actual: residue,
        });
    }

    if model.exceeds_word_width() {
        return failures;
    }

    let byte_table = table_byte(model);
    let byte_check = crc_bytewise(model, &byte_table, model.init, Some(CHECK_MESSAGE));
    if byte_check != bit_check {
        failures.push(CheckFailure {
            model_name: model.name.clone(),
            kind: CheckKind::ByteAgreesWithBit,
            expected: bit_check,
            actual: byte_check,
        });
    }

    let words = table_word(model, &byte_table, WORD_BYTES);
    let word_check = crc_wordwise(model, &byte_table, &words, model.init, Some(CHECK_MESSAGE));
    if word_check != bit_check {
        failures.push(CheckFailure {
            model_name: model.name.clone(),
            kind: CheckKind::WordAgreesWithBit,
            expected: bit_check,
            actual: word_check,
        });
    }

    let combine_table = build_combine_table(model);
    let (head, tail) = CHECK_MESSAGE.split_at(5);
    let crc_head = crc_bitwise(model, model.init, Some(head));
    let crc_tail = crc_bitwise(model, model.init, Some(tail));
    let combined = crc_combine(model, crc_head, crc_tail, tail.len() as u64, &combine_table);
    if combined != bit_check {
        failures.push(CheckFailure {
            model_name: model.name.clone(),
            kind: CheckKind::CombineLaw,
            expected: bit_check,
            actual: combined,
        });
    }

    failures
}

/// The residue property: CRC-ing a message with its own CRC value
/// appended — in little-endian (LSB-first) byte order — starting from
/// `model.init`, and taking the raw register value from just before the
/// final `xorout` step (not the ordinary CRC output, which would apply
/// `xorout` a second time), yields a constant independent of the
/// message — `model.res`.
fn residue_of(model: &Model, message: &[u8]) -> u128 {
    let crc = crc_bitwise(model, model.init, Some(message));
    let width_bytes = (model.width as usize).div_ceil(8);
    let mut appended = message.to_vec();
    for i in 0..width_bytes {
        appended.push(((crc >> (i * 8)) & 0xFF) as u8);
    }
    crc_bitwise_raw(model, model.init, &appended)
}

pub fn check_all_catalog_models() -> Vec<CheckFailure> {
    crate::catalog::six_scenarios()
        .into_iter()
        .flat_map(check_model)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog;

    #[test]
    fn crc32_iso_hdlc_passes_every_check() {
        let failures = check_model(catalog::crc32_iso_hdlc());
        assert!(failures.is_empty(), "{failures:?}");
    }

    #[test]
    fn crc8_smbus_passes_every_check() {
        let failures = check_model(catalog::crc8_smbus());
        assert!(failures.is_empty(), "{failures:?}");
    }

    #[test]
    fn crc16_kermit_passes_every_check() {
        let failures = check_model(catalog::crc16_kermit());
        assert!(failures.is_empty(), "{failures:?}");
    }
}
