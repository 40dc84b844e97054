//! C4/C5/C6: the three equivalent CRC evaluators and the tables that
//! drive the faster two.

pub mod bitwise;
pub mod bytewise;
pub mod tables;
pub mod wordwise;
