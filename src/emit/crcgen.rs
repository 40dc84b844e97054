//! C9: emit a standalone, dependency-free Rust source file implementing
//! `{prefix}_bit`, `{prefix}_rem`, `{prefix}_byte`, `{prefix}_word`, and
//! `{prefix}_comb` for one fixed `Model`.
//!
//! The generator picks exactly one of the three branches
//! `eval::bitwise::step_byte` dispatches on at runtime and writes out only
//! that branch's body — the same specialization a hand-written C emitter
//! (crcany) performs, just expressed as Rust text instead of C text. When
//! `model.exceeds_word_width()`, only `_bit` and `_rem` are emitted, since
//! the byte/word/combine paths are unavailable past the 64-bit host word.

use std::fmt::Write as _;

use crate::combine::build_combine_table;
use crate::emit::naming::normalize_name;
use crate::emit::reverser::{storage_bits, uint_type_name};
use crate::error::EmitError;
use crate::eval::tables::{table_byte, table_word};
use crate::model::Model;

const WORD_BYTES: usize = 8;

/// Build the full generated source text for `model`. Infallible: every
/// input is already a validated `Model`, and this function never touches
/// a filesystem (see `write_model`/`emit_to_new_file` for the I/O-facing
/// wrappers that can fail).
pub fn emit_model(model: &Model) -> String {
    let prefix = normalize_name(model.width, &model.name);
    let bits = storage_bits(model.width);
    let ty = uint_type_name(bits);

    let mut out = String::new();
    let _ = writeln!(out, "// Generated CRC implementation for {}.", model.name);
    let _ = writeln!(out, "// width = {}, poly = {:#x}", model.width, model.poly);
    let _ = writeln!(out);
    let _ = writeln!(out, "pub type T = {ty};");
    let _ = writeln!(out, "pub const WIDTH: u32 = {};", model.width);
    let _ = writeln!(out, "pub const POLY: T = {:#x};", model.poly);
    let _ = writeln!(out, "pub const INIT: T = {:#x};", model.init);
    let _ = writeln!(out, "pub const XOROUT: T = {:#x};", model.xorout);
    let _ = writeln!(out);

    emit_bit_fn(&mut out, model, &prefix, ty);
    let _ = writeln!(out);
    emit_rem_fn(&mut out, model, &prefix, ty);

    if !model.exceeds_word_width() {
        let byte_table = table_byte(model);
        let _ = writeln!(out);
        emit_byte_table(&mut out, &byte_table, ty);
        let _ = writeln!(out);
        emit_byte_fn(&mut out, model, &prefix, ty);

        let words = table_word(model, &byte_table, WORD_BYTES);
        let _ = writeln!(out);
        emit_word_table(&mut out, &words, ty);
        let _ = writeln!(out);
        emit_word_fn(&mut out, model, &prefix);

        let comb = build_combine_table(model);
        let _ = writeln!(out);
        emit_comb_table(&mut out, &comb, ty);
        let _ = writeln!(out);
        emit_comb_fn(&mut out, model, &prefix, ty);
    }

    out
}

fn hex(v: u128, ty: &str) -> String {
    format!("{v:#x}{}", ty)
}

fn emit_bit_fn(out: &mut String, model: &Model, prefix: &str, ty: &str) {
    let _ = writeln!(out, "pub fn {prefix}_bit(crc: T, mem: Option<&[u8]>) -> T {{");
    let _ = writeln!(out, "    let data = match mem {{ None => return INIT, Some(d) => d }};");
    let _ = writeln!(out, "    let mut crc = crc ^ XOROUT;");
    if model.rev {
        let _ = writeln!(out, "    crc = crc.reverse_bits();");
        if storage_bits(model.width) != model.width {
            let _ = writeln!(
                out,
                "    crc >>= {};",
                storage_bits(model.width) - model.width
            );
        }
    }
    let _ = writeln!(out, "    for &byte in data {{");
    if model.refin {
        let _ = writeln!(out, "        crc ^= byte as {ty};");
        let _ = writeln!(out, "        for _ in 0..8 {{");
        let _ = writeln!(
            out,
            "            crc = if crc & 1 == 1 {{ (crc >> 1) ^ POLY }} else {{ crc >> 1 }};"
        );
        let _ = writeln!(out, "        }}");
    } else if model.width <= 8 {
        let shift = 8 - model.width;
        let _ = writeln!(out, "        crc = (crc << {shift}) ^ (byte as {ty});");
        let _ = writeln!(out, "        for _ in 0..8 {{");
        let _ = writeln!(
            out,
            "            crc = if crc & 0x80 != 0 {{ (crc << 1) ^ (POLY << {shift}) }} else {{ crc << 1 }};"
        );
        let _ = writeln!(out, "        }}");
        let _ = writeln!(out, "        crc >>= {shift};");
    } else {
        let shift = model.width.saturating_sub(8);
        let topbit = hex(1u128 << (model.width - 1), ty);
        let _ = writeln!(out, "        crc ^= (byte as {ty}) << {shift};");
        let _ = writeln!(out, "        for _ in 0..8 {{");
        let _ = writeln!(
            out,
            "            crc = if crc & {topbit} != 0 {{ (crc << 1) ^ POLY }} else {{ crc << 1 }};"
        );
        let _ = writeln!(out, "        }}");
    }
    let _ = writeln!(out, "    }}");
    if model.rev {
        let _ = writeln!(out, "    crc = crc.reverse_bits();");
        if storage_bits(model.width) != model.width {
            let _ = writeln!(
                out,
                "    crc >>= {};",
                storage_bits(model.width) - model.width
            );
        }
    }
    let _ = writeln!(out, "    crc ^ XOROUT");
    let _ = writeln!(out, "}}");
}

fn emit_rem_fn(out: &mut String, model: &Model, prefix: &str, ty: &str) {
    // Applies the final `bits`-wide remainder of a message that is not a
    // whole number of bytes long: feed `val`'s low `bits` bits through
    // the same one-bit-at-a-time recurrence `_bit` uses, most significant
    // (of the `bits` considered) first.
    let _ = writeln!(out, "pub fn {prefix}_rem(crc: T, val: u32, bits: u32) -> T {{");
    let _ = writeln!(out, "    let mut crc = crc;");
    let _ = writeln!(out, "    for i in (0..bits).rev() {{");
    let _ = writeln!(out, "        let bit = ((val >> i) & 1) as {ty};");
    if model.refin {
        let _ = writeln!(out, "        crc ^= bit;");
        let _ = writeln!(
            out,
            "        crc = if crc & 1 == 1 {{ (crc >> 1) ^ POLY }} else {{ crc >> 1 }};"
        );
    } else {
        let topbit = hex(1u128 << (storage_bits(model.width) - 1), ty);
        let shift = storage_bits(model.width) - 1;
        let _ = writeln!(out, "        crc ^= bit << {shift};");
        let _ = writeln!(
            out,
            "        crc = if crc & {topbit} != 0 {{ (crc << 1) ^ POLY }} else {{ crc << 1 }};"
        );
    }
    let _ = writeln!(out, "    }}");
    let _ = writeln!(out, "    crc");
    let _ = writeln!(out, "}}");
}

fn emit_array_literal(values: impl Iterator<Item = u128>, ty: &str, per_line: usize) -> String {
    let mut body = String::new();
    let mut col = 0;
    for v in values {
        if col == 0 {
            body.push_str("    ");
        }
        body.push_str(&hex(v, ty));
        body.push_str(", ");
        col += 1;
        if col == per_line {
            body.push('\n');
            col = 0;
        }
    }
    if col != 0 {
        body.push('\n');
    }
    body
}

fn emit_byte_table(out: &mut String, table: &[u128; 256], ty: &str) {
    let _ = writeln!(out, "pub static BYTE_TABLE: [T; 256] = [");
    out.push_str(&emit_array_literal(table.iter().copied(), ty, 8));
    let _ = writeln!(out, "];");
}

fn emit_byte_fn(out: &mut String, model: &Model, prefix: &str, ty: &str) {
    let _ = writeln!(out, "pub fn {prefix}_byte(crc: T, mem: Option<&[u8]>) -> T {{");
    let _ = writeln!(out, "    let data = match mem {{ None => return INIT, Some(d) => d }};");
    let _ = writeln!(out, "    let mut crc = crc ^ XOROUT;");
    if model.rev {
        let _ = writeln!(out, "    crc = crc.reverse_bits();");
    }
    let _ = writeln!(out, "    for &byte in data {{");
    if model.refin {
        let _ = writeln!(
            out,
            "        crc = (crc >> 8) ^ BYTE_TABLE[((crc as u8) ^ byte) as usize];"
        );
    } else if model.width <= 8 {
        let shift = 8 - model.width;
        let _ = writeln!(out, "        crc <<= {shift};");
        let _ = writeln!(
            out,
            "        crc = BYTE_TABLE[((crc as u8) ^ byte) as usize];"
        );
        let _ = writeln!(out, "        crc >>= {shift};");
    } else {
        let shift = model.width - 8;
        let _ = writeln!(
            out,
            "        crc = (crc << 8) ^ BYTE_TABLE[(((crc >> {shift}) as u8) ^ byte) as usize];"
        );
    }
    let _ = writeln!(out, "    }}");
    if model.rev {
        let _ = writeln!(out, "    crc = crc.reverse_bits();");
    }
    let _ = writeln!(out, "    crc ^ XOROUT");
    let _ = writeln!(out, "}}");
}

fn emit_word_table(out: &mut String, words: &crate::eval::tables::WordTable, ty: &str) {
    let _ = writeln!(
        out,
        "pub static WORD_TABLE: [[T; 256]; {}] = [",
        words.word_bytes
    );
    for lane in &words.lanes {
        let _ = writeln!(out, "    [");
        out.push_str(&emit_array_literal(lane.iter().copied(), ty, 8));
        let _ = writeln!(out, "    ],");
    }
    let _ = writeln!(out, "];");
}

fn emit_word_fn(out: &mut String, model: &Model, prefix: &str) {
    let wb = WORD_BYTES;
    let _ = writeln!(out, "pub fn {prefix}_word(crc: T, mem: Option<&[u8]>) -> T {{");
    let _ = writeln!(out, "    let data = match mem {{ None => return INIT, Some(d) => d }};");
    let _ = writeln!(out, "    let mut crc = crc ^ XOROUT;");
    if model.rev {
        let _ = writeln!(out, "    crc = crc.reverse_bits();");
    }
    let _ = writeln!(out, "    let mut chunks = data.chunks_exact({wb});");
    let _ = writeln!(out, "    for group in &mut chunks {{");
    let _ = writeln!(out, "        let mut advanced = crc;");
    let _ = writeln!(out, "        for _ in 0..{wb} {{");
    if model.refin {
        let _ = writeln!(
            out,
            "            advanced = (advanced >> 8) ^ BYTE_TABLE[(advanced & 0xFF) as usize];"
        );
    } else if model.width <= 8 {
        let _ = writeln!(
            out,
            "            advanced = BYTE_TABLE[(advanced & 0xFF) as usize];"
        );
    } else {
        let shift = model.width - 8;
        let _ = writeln!(
            out,
            "            advanced = (advanced << 8) ^ BYTE_TABLE[((advanced >> {shift}) & 0xFF) as usize];"
        );
    }
    let _ = writeln!(out, "        }}");
    let _ = writeln!(out, "        let mut acc = advanced;");
    let _ = writeln!(out, "        for (i, &b) in group.iter().enumerate() {{");
    let _ = writeln!(out, "            acc ^= WORD_TABLE[{wb} - 1 - i][b as usize];");
    let _ = writeln!(out, "        }}");
    let _ = writeln!(out, "        crc = acc;");
    let _ = writeln!(out, "    }}");
    let _ = writeln!(out, "    for &byte in chunks.remainder() {{");
    if model.refin {
        let _ = writeln!(
            out,
            "        crc = (crc >> 8) ^ BYTE_TABLE[((crc as u8) ^ byte) as usize];"
        );
    } else if model.width <= 8 {
        let _ = writeln!(
            out,
            "        crc = BYTE_TABLE[((crc as u8) ^ byte) as usize];"
        );
    } else {
        let shift = model.width - 8;
        let _ = writeln!(
            out,
            "        crc = (crc << 8) ^ BYTE_TABLE[(((crc >> {shift}) as u8) ^ byte) as usize];"
        );
    }
    let _ = writeln!(out, "    }}");
    if model.rev {
        let _ = writeln!(out, "    crc = crc.reverse_bits();");
    }
    let _ = writeln!(out, "    crc ^ XOROUT");
    let _ = writeln!(out, "}}");
}

fn emit_comb_table(out: &mut String, table: &crate::combine::CombineTable, ty: &str) {
    let _ = writeln!(out, "pub static COMB_TABLE: [T; {}] = [", table.powers.len());
    out.push_str(&emit_array_literal(table.powers.iter().copied(), ty, 8));
    let _ = writeln!(out, "];");
    let _ = writeln!(
        out,
        "pub const COMB_CYCLE: Option<usize> = {:?};",
        table.cycle
    );
    let _ = writeln!(
        out,
        "pub const COMB_BACK: Option<usize> = {:?};",
        table.back
    );
}

fn emit_comb_fn(out: &mut String, model: &Model, prefix: &str, ty: &str) {
    let _ = writeln!(
        out,
        "pub fn {prefix}_comb(crc1: T, crc2: T, len2: u64) -> T {{"
    );
    let _ = writeln!(out, "    let mut crc1 = crc1 ^ INIT;");
    let _ = writeln!(out, "    let mut crc2 = crc2;");
    if model.rev {
        let _ = writeln!(out, "    crc1 = crc1.reverse_bits();");
        let _ = writeln!(out, "    crc2 = crc2.reverse_bits();");
    }
    let identity = if model.refin {
        1u128 << (model.width - 1)
    } else {
        1u128
    };
    let _ = writeln!(out, "    let mut acc: T = {};", hex(identity, ty));
    let _ = writeln!(out, "    let mut n = len2 * 8;");
    let _ = writeln!(out, "    let mut k = 0usize;");
    let _ = writeln!(out, "    while n != 0 {{");
    let _ = writeln!(out, "        if n & 1 == 1 {{");
    let _ = writeln!(out, "            let idx = resolve_comb_index(k);");
    let _ = writeln!(out, "            acc = multmodp(COMB_TABLE[idx], acc);");
    let _ = writeln!(out, "        }}");
    let _ = writeln!(out, "        n >>= 1;");
    let _ = writeln!(out, "        k += 1;");
    let _ = writeln!(out, "    }}");
    let _ = writeln!(out, "    let mut result = multmodp(acc, crc1) ^ crc2;");
    if model.rev {
        let _ = writeln!(out, "    result = result.reverse_bits();");
    }
    let _ = writeln!(out, "    result");
    let _ = writeln!(out, "}}");
    let _ = writeln!(out);
    let _ = writeln!(out, "fn resolve_comb_index(k: usize) -> usize {{");
    let _ = writeln!(out, "    match COMB_CYCLE {{");
    let _ = writeln!(
        out,
        "        Some(cycle) if k >= cycle => {{ let back = COMB_BACK.unwrap(); back + (k - cycle) % (cycle - back) }}"
    );
    let _ = writeln!(out, "        _ => k,");
    let _ = writeln!(out, "    }}");
    let _ = writeln!(out, "}}");
    let _ = writeln!(out);
    let _ = writeln!(out, "fn multmodp(mut a: T, b: T) -> T {{");
    let _ = writeln!(out, "    let mut prod: T = 0;");
    let _ = writeln!(out, "    let mut b = b;");
    if model.refin {
        let topbit = hex(1u128 << (model.width - 1), ty);
        let _ = writeln!(out, "    while a != 0 {{");
        let _ = writeln!(out, "        if a & {topbit} != 0 {{ prod ^= b; }}");
        let _ = writeln!(out, "        a <<= 1;");
        let _ = writeln!(
            out,
            "        b = if b & 1 == 1 {{ (b >> 1) ^ POLY }} else {{ b >> 1 }};"
        );
        let _ = writeln!(out, "    }}");
    } else {
        let topbit = hex(1u128 << (model.width - 1), ty);
        let _ = writeln!(out, "    while a != 0 {{");
        let _ = writeln!(out, "        if a & 1 != 0 {{ prod ^= b; }}");
        let _ = writeln!(out, "        a >>= 1;");
        let _ = writeln!(
            out,
            "        b = if b & {topbit} != 0 {{ (b << 1) ^ POLY }} else {{ b << 1 }};"
        );
        let _ = writeln!(out, "    }}");
    }
    let _ = writeln!(out, "    prod");
    let _ = writeln!(out, "}}");
}

/// Write the generated source for `model` through `out`, surfacing I/O
/// failures as `EmitError::Io`.
pub fn write_model<W: std::io::Write>(model: &Model, out: &mut W) -> Result<(), EmitError> {
    out.write_all(emit_model(model).as_bytes())?;
    Ok(())
}

/// Convenience wrapper for the common case of emitting straight to a new
/// file: refuses to overwrite an existing path, surfacing that as
/// `EmitError::NameCollision` rather than silently clobbering whatever a
/// prior run already produced.
pub fn emit_to_new_file(model: &Model, path: &std::path::Path) -> Result<(), EmitError> {
    use std::io::ErrorKind;

    let mut file = match std::fs::OpenOptions::new().write(true).create_new(true).open(path) {
        Ok(f) => f,
        Err(e) if e.kind() == ErrorKind::AlreadyExists => {
            log::warn!("refusing to overwrite existing generated source at {path:?}");
            return Err(EmitError::NameCollision {
                path: path.display().to_string(),
            });
        }
        Err(e) => return Err(EmitError::Io(e)),
    };
    write_model(model, &mut file)
}
