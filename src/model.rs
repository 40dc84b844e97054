//! C1: the canonicalized CRC model.

use crate::bitrev::reverse;
use crate::error::ModelError;
use crate::poly::mask_width;

/// Raw, uncanonicalized Williams/Rocksoft parameters, as they would arrive
/// from the out-of-scope textual parser. `Model::new` turns this into the
/// canonical form every evaluator in this crate assumes.
#[derive(Debug, Clone)]
pub struct RawParams {
    pub width: u32,
    pub poly: u128,
    pub init: u128,
    pub xorout: u128,
    pub refin: bool,
    pub refout: bool,
    pub check: u128,
    pub res: u128,
    pub name: String,
}

/// A canonicalized CRC model. Every evaluator and the emitter take `&Model`
/// and never mutate it; it is `Clone + Send + Sync` by construction so it
/// may be shared read-only across threads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Model {
    pub width: u32,
    pub poly: u128,
    pub init: u128,
    pub xorout: u128,
    pub refin: bool,
    pub refout: bool,
    /// `refin != refout`, computed once by `process_model` and consulted
    /// by every evaluator to decide whether to reverse the register at its
    /// entry and exit.
    pub rev: bool,
    pub check: u128,
    pub res: u128,
    pub name: String,
}

impl Model {
    /// Canonicalize `raw`:
    ///
    /// 1. If `refin`, bit-reverse `poly` across `width` bits.
    /// 2. If `refout` and not `refin`, bit-reverse the caller-supplied
    ///    initial register contents across `width` bits.
    /// 3. XOR the (possibly reversed) initial register contents with
    ///    `xorout`, so `init` becomes "the CRC of the empty message."
    /// 4. Set `rev := refin XOR refout`.
    pub fn new(raw: RawParams) -> Result<Model, ModelError> {
        if raw.width == 0 {
            return Err(ModelError::ZeroWidth);
        }
        if raw.width > 128 {
            return Err(ModelError::WidthTooWide { width: raw.width });
        }
        if raw.poly & 1 == 0 {
            return Err(ModelError::EvenPolynomial);
        }

        let mask = mask_width(raw.width);
        if raw.check & !mask != 0 {
            return Err(ModelError::CheckOutOfRange);
        }

        if raw.width > 64 {
            log::info!(
                "model `{}`: width {} exceeds the 64-bit host word; byte/word/combine paths are unavailable, bit and residue paths still run",
                raw.name,
                raw.width,
            );
        }

        let mut poly = raw.poly & mask;
        if raw.refin {
            poly = reverse(poly, raw.width);
        }

        let mut init = raw.init & mask;
        if raw.refout && !raw.refin {
            init = reverse(init, raw.width);
        }
        init ^= raw.xorout & mask;

        let rev = raw.refin != raw.refout;

        Ok(Model {
            width: raw.width,
            poly,
            init,
            xorout: raw.xorout & mask,
            refin: raw.refin,
            refout: raw.refout,
            rev,
            check: raw.check & mask,
            res: raw.res & mask,
            name: raw.name,
        })
    }

    /// `true` once `width` exceeds the 64-bit host word. Informational
    /// only, not a construction failure.
    pub fn exceeds_word_width(&self) -> bool {
        self.width > 64
    }

    pub fn mask(&self) -> u128 {
        mask_width(self.width)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn crc8_smbus() -> RawParams {
        RawParams {
            width: 8,
            poly: 0x07,
            init: 0x00,
            xorout: 0x00,
            refin: false,
            refout: false,
            check: 0xF4,
            res: 0x00,
            name: "CRC-8/SMBUS".into(),
        }
    }

    #[test]
    fn non_reflected_no_xorout_init_is_zero() {
        let m = Model::new(crc8_smbus()).unwrap();
        assert_eq!(m.init, 0);
        assert_eq!(m.poly, 0x07);
        assert!(!m.rev);
    }

    #[test]
    fn reflected_poly_is_bit_reversed() {
        let raw = RawParams {
            width: 16,
            poly: 0x1021,
            init: 0x0000,
            xorout: 0x0000,
            refin: true,
            refout: true,
            check: 0x2189,
            res: 0x0000,
            name: "CRC-16/KERMIT".into(),
        };
        let m = Model::new(raw).unwrap();
        assert_eq!(m.poly, reverse(0x1021, 16));
        assert!(!m.rev);
    }

    #[test]
    fn rejects_even_polynomial() {
        let mut raw = crc8_smbus();
        raw.poly = 0x06;
        assert_eq!(Model::new(raw).unwrap_err(), ModelError::EvenPolynomial);
    }

    #[test]
    fn rejects_zero_width() {
        let mut raw = crc8_smbus();
        raw.width = 0;
        assert_eq!(Model::new(raw).unwrap_err(), ModelError::ZeroWidth);
    }

    #[test]
    fn rejects_width_over_ceiling() {
        let mut raw = crc8_smbus();
        raw.width = 129;
        assert_eq!(
            Model::new(raw).unwrap_err(),
            ModelError::WidthTooWide { width: 129 }
        );
    }

    #[test]
    fn rejects_out_of_range_check() {
        let mut raw = crc8_smbus();
        raw.check = 0x1F4;
        assert_eq!(Model::new(raw).unwrap_err(), ModelError::CheckOutOfRange);
    }
}
