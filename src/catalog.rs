//! A small built-in table of named RevEng models, covering six well-known
//! catalog scenarios. Built once, lazily, behind a `lazy_static!` table, so
//! the harness and the doctests have something concrete to run against
//! without depending on the out-of-scope textual parser.

use lazy_static::lazy_static;

use crate::model::{Model, RawParams};

fn build(
    width: u32,
    poly: u128,
    init: u128,
    xorout: u128,
    refin: bool,
    refout: bool,
    check: u128,
    res: u128,
    name: &str,
) -> Model {
    Model::new(RawParams {
        width,
        poly,
        init,
        xorout,
        refin,
        refout,
        check,
        res,
        name: name.to_string(),
    })
    .unwrap_or_else(|e| panic!("built-in catalog model {name} is malformed: {e}"))
}

lazy_static! {
    static ref CRC3_GSM: Model =
        build(3, 0x3, 0x0, 0x7, false, false, 0x4, 0x2, "CRC-3/GSM");
    static ref CRC8_SMBUS: Model =
        build(8, 0x07, 0x00, 0x00, false, false, 0xF4, 0x00, "CRC-8/SMBUS");
    static ref CRC16_KERMIT: Model =
        build(16, 0x1021, 0x0000, 0x0000, true, true, 0x2189, 0x0000, "CRC-16/KERMIT");
    static ref CRC32_ISO_HDLC: Model = build(
        32,
        0x04C1_1DB7,
        0xFFFF_FFFF,
        0xFFFF_FFFF,
        true,
        true,
        0xCBF4_3926,
        0xDEBB_20E3,
        "CRC-32/ISO-HDLC",
    );
    static ref CRC64_XZ: Model = build(
        64,
        0x42F0_E1EB_A9EA_3693,
        0xFFFF_FFFF_FFFF_FFFF,
        0xFFFF_FFFF_FFFF_FFFF,
        true,
        true,
        0x995D_C9BB_DF19_39FA,
        0x4995_8C9A_BD7D_353F,
        "CRC-64/XZ",
    );
    static ref CRC82_DARC: Model = build(
        82,
        0x0308_C011_1011_4014_4041_1,
        0x0,
        0x0,
        true,
        true,
        0x09EA_83F6_2502_3801_FD61_2,
        0x0,
        "CRC-82/DARC",
    );
}

/// Six well-known models spanning the catalog's range of widths and
/// reflection settings.
pub fn six_scenarios() -> Vec<&'static Model> {
    vec![
        &CRC3_GSM,
        &CRC8_SMBUS,
        &CRC16_KERMIT,
        &CRC32_ISO_HDLC,
        &CRC64_XZ,
        &CRC82_DARC,
    ]
}

pub fn crc3_gsm() -> &'static Model {
    &CRC3_GSM
}

pub fn crc8_smbus() -> &'static Model {
    &CRC8_SMBUS
}

pub fn crc16_kermit() -> &'static Model {
    &CRC16_KERMIT
}

pub fn crc32_iso_hdlc() -> &'static Model {
    &CRC32_ISO_HDLC
}

pub fn crc64_xz() -> &'static Model {
    &CRC64_XZ
}

pub fn crc82_darc() -> &'static Model {
    &CRC82_DARC
}
