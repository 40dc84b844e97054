//! C4: the bit-serial evaluator — the reference every other evaluator in
//! this crate is checked against.

use crate::bitrev::reverse;
use crate::model::Model;
use crate::poly::{mask_width, zero_bit_step};

/// Process one byte through the raw (no `xorout`, no `rev`) recurrence, in
/// whichever register representation `model` calls for:
///
/// - reflected (`refin`): the natural `width`-bit register.
/// - non-reflected, `width <= 8`: an 8-bit, *byte-aligned* register (the
///   live value occupies bits `[7 ..= 8-width]`), pre-shifting `poly` and
///   the register left by `8 - width` so the byte XOR and top-bit test
///   always land on bit 7. Byte and word tables (`eval::tables`) store
///   entries in this same convention.
/// - non-reflected, `width > 8`: the natural `width`-bit register.
pub(crate) fn step_byte(model: &Model, v: u128, byte: u8) -> u128 {
    let width = model.width;
    if model.refin {
        let mut crc = v ^ (byte as u128);
        for _ in 0..8 {
            crc = zero_bit_step(width, model.poly, true, crc);
        }
        crc
    } else if width <= 8 {
        let shift = 8 - width;
        let poly8 = (model.poly << shift) & 0xFF;
        let mut crc8 = (v & 0xFF) ^ (byte as u128);
        for _ in 0..8 {
            crc8 = if crc8 & 0x80 != 0 {
                (crc8 << 1) ^ poly8
            } else {
                crc8 << 1
            };
            crc8 &= 0xFF;
        }
        crc8
    } else {
        let mut crc = v ^ ((byte as u128) << (width - 8));
        for _ in 0..8 {
            crc = zero_bit_step(width, model.poly, false, crc);
        }
        crc
    }
}

/// Advance a register already in "natural" orientation (post-`xorout`,
/// reversed if `model.rev`) through `data`, returning the register in
/// that same orientation. Shared by `crc_bitwise` and `crc_bitwise_raw`,
/// which differ only in what they do with the register before and after
/// this step.
fn advance(model: &Model, crc: u128, data: &[u8]) -> u128 {
    let width = model.width;
    if !model.refin && width <= 8 {
        let shift = 8 - width;
        let mut crc8 = (crc << shift) & 0xFF;
        for &b in data {
            crc8 = step_byte(model, crc8, b);
        }
        crc8 >> shift
    } else {
        let mut crc = crc & mask_width(width);
        for &b in data {
            crc = step_byte(model, crc, b);
        }
        crc
    }
}

/// Bit-serial CRC. `buf = None` is the "fresh message" sentinel: it
/// returns `model.init` verbatim, ignoring `crc`.
pub fn crc_bitwise(model: &Model, crc: u128, buf: Option<&[u8]>) -> u128 {
    let data = match buf {
        None => return model.init,
        Some(d) => d,
    };
    let width = model.width;
    let mask = mask_width(width);

    let mut crc = crc ^ model.xorout;
    if model.rev {
        crc = reverse(crc, width);
    }
    crc = advance(model, crc, data);
    if model.rev {
        crc = reverse(crc, width);
    }
    (crc ^ model.xorout) & mask
}

/// Like `crc_bitwise`, but returns the raw register value from just
/// before the final `xorout` step instead of the publicly visible CRC.
/// The residue check (`harness::check_model`) is defined in terms of this
/// raw value, not the ordinary CRC output.
pub(crate) fn crc_bitwise_raw(model: &Model, crc: u128, buf: &[u8]) -> u128 {
    let width = model.width;
    let mask = mask_width(width);

    let mut crc = crc ^ model.xorout;
    if model.rev {
        crc = reverse(crc, width);
    }
    crc = advance(model, crc, buf);
    if model.rev {
        crc = reverse(crc, width);
    }
    crc & mask
}

/// Apply `n` zero bits to `crc` by brute force, one bit at a time. This is
/// the reference `combine::crc_zeros` checks itself against ("zero-bits
/// consistency") and the direct implementation used for `n < 128`, below
/// the threshold where table-driven combining pays for itself.
pub fn crc_zeros_bitwise(model: &Model, crc: u128, n: u64) -> u128 {
    let width = model.width;
    let mask = mask_width(width);

    let mut crc = crc ^ model.xorout;
    if model.rev {
        crc = reverse(crc, width);
    }

    if !model.refin && width <= 8 {
        let shift = 8 - width;
        let poly8 = (model.poly << shift) & 0xFF;
        let mut crc8 = (crc << shift) & 0xFF;
        for _ in 0..n {
            crc8 = if crc8 & 0x80 != 0 {
                (crc8 << 1) ^ poly8
            } else {
                crc8 << 1
            };
            crc8 &= 0xFF;
        }
        crc = crc8 >> shift;
    } else {
        crc &= mask;
        for _ in 0..n {
            crc = zero_bit_step(width, model.poly, model.refin, crc);
        }
    }

    if model.rev {
        crc = reverse(crc, width);
    }
    (crc ^ model.xorout) & mask
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::RawParams;

    fn crc16_kermit() -> Model {
        Model::new(RawParams {
            width: 16,
            poly: 0x1021,
            init: 0x0000,
            xorout: 0x0000,
            refin: true,
            refout: true,
            check: 0x2189,
            res: 0x0000,
            name: "CRC-16/KERMIT".into(),
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
    fn empty_message_is_init() {
        let m = crc16_kermit();
        assert_eq!(crc_bitwise(&m, m.init, None), m.init);
    }

    #[test]
    fn catalog_check_reflected() {
        let m = crc16_kermit();
        let crc = crc_bitwise(&m, m.init, Some(b"123456789"));
        assert_eq!(crc, m.check);
    }

    #[test]
    fn catalog_check_non_reflected_byte_aligned() {
        let m = crc8_smbus();
        let crc = crc_bitwise(&m, m.init, Some(b"123456789"));
        assert_eq!(crc, m.check);
    }

    #[test]
    fn raw_register_differs_from_output_by_xorout() {
        let m = crc16_kermit();
        let crc = crc_bitwise(&m, m.init, Some(b"123456789"));
        let raw = crc_bitwise_raw(&m, m.init, b"123456789");
        assert_eq!(crc, (raw ^ m.xorout) & m.mask());
    }

    #[test]
    fn chunking_matches_one_shot() {
        let m = crc16_kermit();
        let one_shot = crc_bitwise(&m, m.init, Some(b"123456789"));
        let mut running = m.init;
        for chunk in [&b"123"[..], &b"456"[..], &b"789"[..]] {
            running = crc_bitwise(&m, running, Some(chunk));
        }
        assert_eq!(one_shot, running);
    }

    #[test]
    fn zero_bits_matches_processing_zero_bytes() {
        let m = crc8_smbus();
        let start = crc_bitwise(&m, m.init, Some(b"abc"));
        let via_zero_bytes = crc_bitwise(&m, start, Some(&[0u8; 3]));
        let via_zero_bits = crc_zeros_bitwise(&m, start, 24);
        assert_eq!(via_zero_bytes, via_zero_bits);
    }
}
