//! Move notation codecs.
//!
//! * [`san`]: Standard Algebraic Notation, `Nf3`, `exd5`, `O-O`, `e8=Q+`.
//! * [`uci`]: coordinate notation used by engines, `g1f3`, `e7e8q`, and the
//!   UCI `position` command.
//!
//! Both are built on the query surface of [`Position`](crate::Position):
//! move generation, `moves_to`, `moves_from` and check detection.

pub mod san;
pub mod uci;

pub use san::{from_san, to_san, variation_to_san};
pub use uci::{from_uci, parse_position_command, to_uci, uci_position_command};
