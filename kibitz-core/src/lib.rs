//! Chess rules, notation codecs and game trees.
//!
//! Positions are immutable and remember the position they came from.
//! Games record lines of play, and annotated games record whole trees with
//! comments, glyphs and variations, readable from and writable to PGN.

pub mod annotated;
pub mod coretypes;
pub mod error;
pub mod fen;
pub mod game;
pub mod mailbox;
pub mod movegen;
pub mod movelist;
pub mod notation;
pub mod perft;
pub mod pgn;
pub mod position;
pub mod tables;
pub mod zobrist;

pub use annotated::{AnnotatedGame, Node, NodeId};
pub use coretypes::{Castling, Color, File, GameResult, Move, Piece, PieceKind, Rank, Square};
pub use error::{Error, ErrorKind};
pub use fen::Fen;
pub use game::Game;
pub use movelist::{Line, MoveList};
pub use pgn::{Pgn, PgnToken, WriteOptions};
pub use position::Position;
