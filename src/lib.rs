//! A width-parametric CRC kernel and source-code generator for the
//! Williams/RevEng parameter family (`width`, `poly`, `init`, `refin`,
//! `refout`, `xorout`, plus the `check`/`res` self-test constants).
//!
//! A [`RawParams`] value is canonicalized by [`Model::new`] into a
//! [`Model`]; every evaluator in [`eval`] and the combiner in [`combine`]
//! take `&Model` and agree bit-for-bit no matter which one computes a
//! given CRC:
//!
//! - [`eval::bitwise::crc_bitwise`] — the bit-serial reference.
//! - [`eval::bytewise::crc_bytewise`] — driven by a 256-entry byte table
//!   ([`eval::tables::table_byte`]).
//! - [`eval::wordwise::crc_wordwise`] — driven by a slicing-by-N word
//!   table ([`eval::tables::table_word`]).
//!
//! [`combine::crc_combine`] concatenates two CRCs given only the length
//! of the second operand, and [`combine::crc_zeros`] appends a run of
//! zero bits in `O(log n)`, both backed by [`combine::CombineTable`].
//! [`emit::crcgen::emit_model`] specializes a fixed `Model` down to
//! dependency-free Rust source text. [`harness::check_model`] runs every
//! property above against a model's own `check`/`res` constants.
//!
//! ```
//! use crc_forge::catalog;
//! use crc_forge::eval::bitwise::crc_bitwise;
//!
//! let model = catalog::crc32_iso_hdlc();
//! let crc = crc_bitwise(model, model.init, Some(b"123456789"));
//! assert_eq!(crc, model.check);
//! ```
//!
//! ```
//! use crc_forge::catalog;
//! use crc_forge::eval::bitwise::crc_bitwise;
//!
//! let model = catalog::crc16_kermit();
//! let crc = crc_bitwise(model, model.init, Some(b"123456789"));
//! assert_eq!(crc, model.check);
//! ```

pub mod bitrev;
pub mod catalog;
pub mod combine;
pub mod emit;
pub mod error;
pub mod eval;
pub mod harness;
pub mod model;
pub mod poly;

pub use combine::{crc_combine, crc_zeros, CombineTable};
pub use error::{EmitError, ModelError};
pub use eval::bitwise::crc_bitwise;
pub use eval::bytewise::crc_bytewise;
pub use eval::wordwise::crc_wordwise;
pub use harness::{check_model, CheckFailure, CheckKind};
pub use model::{Model, RawParams};
