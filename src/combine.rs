//! C3 part 2 / C7: the squaring table (`table_comb`) and the two
//! operations it powers, applying a run of zero bits in `O(log n)` and
//! concatenating two CRCs given only the length of the second. The
//! cycle-detection shape here was cross-checked against Mark Adler's
//! GF(2)-matrix combine algorithm in
//! `other_examples/.../crc-fast-1.3.0/src/combine.rs`, but the actual
//! construction is the squaring-table recipe, not the matrix approach.

use crate::bitrev::reverse;
use crate::eval::bitwise::crc_zeros_bitwise;
use crate::model::Model;
use crate::poly::{mask_width, multmodp, zero_bit_step};

/// `powers[k] == x^(2^k) mod p(x)`. Squaring a width-bit polynomial
/// eventually cycles (the multiplicative group of the quotient ring is
/// finite); once it does, `cycle` records how many leading entries are
/// distinct and `back` records which earlier entry the cycle returns to,
/// so `crc_zeros` can keep walking bits of `n` past `cycle` without
/// growing the table further.
#[derive(Debug, Clone)]
pub struct CombineTable {
    pub powers: Vec<u128>,
    pub cycle: Option<usize>,
    pub back: Option<usize>,
}

/// Entries beyond this are vanishingly unlikely to be needed: even a
/// pathological polynomial cycles long before 256 squarings for any width
/// this crate supports, and `n < 2^256` bits covers any message anyone
/// could plausibly construct.
const DEFAULT_CAPACITY: usize = 256;

pub fn build_combine_table(model: &Model) -> CombineTable {
    build_combine_table_with_capacity(model, DEFAULT_CAPACITY)
}

pub fn build_combine_table_with_capacity(model: &Model, capacity: usize) -> CombineTable {
    let width = model.width;
    let x0 = identity_value(model);
    let mut cur = zero_bit_step(width, model.poly, model.refin, x0);
    let mut powers = vec![cur];
    let mut cycle = None;
    let mut back = None;

    while powers.len() < capacity {
        cur = multmodp(width, model.poly, model.refin, cur, cur);
        if let Some(j) = powers.iter().position(|&p| p == cur) {
            cycle = Some(powers.len());
            back = Some(j);
            break;
        }
        powers.push(cur);
    }

    CombineTable {
        powers,
        cycle,
        back,
    }
}

/// The register value representing the polynomial "1" (degree 0), in
/// whichever orientation `model.refin` calls for: `x^0 = 1`, or its
/// reflected equivalent `1 << (width - 1)`.
fn identity_value(model: &Model) -> u128 {
    if model.refin {
        1u128 << (model.width - 1)
    } else {
        1u128
    }
}

fn resolve_index(table: &CombineTable, k: usize) -> usize {
    match table.cycle {
        Some(cycle) if k >= cycle => {
            let back = table.back.expect("cycle implies back is set");
            let period = cycle - back;
            back + (k - cycle) % period
        }
        _ => k,
    }
}

/// Walk the bits of `n`, multiplying `seed` by `x^(2^k) mod p(x)` for
/// every set bit `k`, i.e. computing `seed * x^n mod p(x)`. Shared by
/// `crc_zeros` and `crc_combine`; callers own any `xorout`/`rev`
/// pre- and post-processing.
fn apply_zero_bits(model: &Model, seed: u128, n: u64, table: &CombineTable) -> u128 {
    let width = model.width;
    let mut acc = seed;
    let mut remaining = n;
    let mut k = 0usize;
    while remaining != 0 {
        if remaining & 1 == 1 {
            let idx = resolve_index(table, k);
            let power = table
                .powers
                .get(idx)
                .copied()
                .unwrap_or_else(|| panic!("combine table exhausted at bit {k} with no cycle"));
            acc = multmodp(width, model.poly, model.refin, power, acc);
        }
        remaining >>= 1;
        k += 1;
    }
    acc
}

/// Apply `n` zero bits to `crc`. For `n < 128` this defers to the direct
/// bit-serial reference (`eval::bitwise::crc_zeros_bitwise`); past that
/// threshold it uses `table` for `O(log n)` performance.
pub fn crc_zeros(model: &Model, crc: u128, n: u64, table: &CombineTable) -> u128 {
    if n < 128 {
        return crc_zeros_bitwise(model, crc, n);
    }

    let width = model.width;
    let mask = mask_width(width);

    let mut reg = crc ^ model.xorout;
    if model.rev {
        reg = reverse(reg, width);
    }
    reg &= mask;

    let mut acc = apply_zero_bits(model, reg, n, table);

    if model.rev {
        acc = reverse(acc, width);
    }
    (acc ^ model.xorout) & mask
}

/// Concatenate two CRCs: given `crc1 = CRC(a)`, `crc2 = CRC(b)`, and
/// `len2 = |b|` in bytes, return `CRC(a || b)` without ever seeing `a` or
/// `b`.
pub fn crc_combine(model: &Model, crc1: u128, crc2: u128, len2: u64, table: &CombineTable) -> u128 {
    let width = model.width;
    let mask = mask_width(width);

    let mut crc1 = (crc1 ^ model.init) & mask;
    let mut crc2 = crc2 & mask;
    if model.rev {
        crc1 = reverse(crc1, width);
        crc2 = reverse(crc2, width);
    }

    let len2_bits = len2.checked_mul(8).expect("len2 in bits overflowed u64");
    let x0 = identity_value(model);
    let xp = apply_zero_bits(model, x0, len2_bits, table);

    let mut result = multmodp(width, model.poly, model.refin, xp, crc1) ^ crc2;
    if model.rev {
        result = reverse(result, width);
    }
    result & mask
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::eval::bitwise::crc_bitwise;
    use crate::model::RawParams;

    fn crc32_iso_hdlc() -> Model {
        Model::new(RawParams {
            width: 32,
            poly: 0x04C11DB7,
            init: 0xFFFFFFFF,
            xorout: 0xFFFFFFFF,
            refin: true,
            refout: true,
            check: 0xCBF43926,
            res: 0xDEBB20E3,
            name: "CRC-32/ISO-HDLC".into(),
        })
        .unwrap()
    }

    fn crc8_smbus() -> Model {
        Model::new(RawParams {
            width: 8,
            poly: 0x07,
            init: 0x00,
            xorout: 0x00,
            refin: false,
            refout: false,
            check: 0xF4,
            res: 0x00,
            name: "CRC-8/SMBUS".into(),
        })
        .unwrap()
    }

    #[test]
    fn zero_bits_consistency_past_threshold() {
        let m = crc32_iso_hdlc();
        let table = build_combine_table(&m);
        let start = crc_bitwise(&m, m.init, Some(b"some leading bytes"));
        let n_bits = 300u64;
        let n_bytes = (n_bits / 8) as usize;
        let zero_buf = vec![0u8; n_bytes];
        let via_bitwise = crc_bitwise(&m, start, Some(&zero_buf));
        let via_table = crc_zeros(&m, start, n_bits, &table);
        assert_eq!(via_bitwise, via_table);
    }

    #[test]
    fn combine_law_matches_direct_crc() {
        let m = crc32_iso_hdlc();
        let table = build_combine_table(&m);
        let crc_a = crc_bitwise(&m, m.init, Some(b"12345"));
        let crc_b = crc_bitwise(&m, m.init, Some(b"6789"));
        let combined = crc_combine(&m, crc_a, crc_b, 4, &table);
        let direct = crc_bitwise(&m, m.init, Some(b"123456789"));
        assert_eq!(combined, direct);
        assert_eq!(combined, m.check);
    }

    #[test]
    fn combine_law_small_non_reflected() {
        let m = crc8_smbus();
        let table = build_combine_table(&m);
        let crc_a = crc_bitwise(&m, m.init, Some(b"12345"));
        let crc_b = crc_bitwise(&m, m.init, Some(b"6789"));
        let combined = crc_combine(&m, crc_a, crc_b, 4, &table);
        let direct = crc_bitwise(&m, m.init, Some(b"123456789"));
        assert_eq!(combined, direct);
    }
}
