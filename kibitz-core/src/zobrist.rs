//! Zobrist Hashing

use std::collections::HashSet;
use std::ops::Index;
use std::sync::OnceLock;

use rand::prelude::*;

use crate::coretypes::{Castling, Color, File, Piece, Square, SquareIndexable};
use crate::coretypes::{NUM_FILES, NUM_PIECE_KINDS, NUM_SQUARES};
use crate::position::Position;

/// HashKind is an alias for the underlying type of a Zobrist Hash.
pub type HashKind = u64;

/// Seed of the process-wide table, fixed so hashes are reproducible across runs.
const TABLE_SEED: u64 = 0x6b69_6269_747a;

/// Zobrist Hashing is a quick way to hash a chess position.
/// ZobristTable contains unique, pseudo-randomly generated values
/// used for calculating Zobrist Hash of a chess position.
///
/// Each Piece gets a unique number for each square.
/// A single side to move gets a unique number.
/// Each possible combination of castling rights gets a unique number.
/// Each possible file for En-Passant gets a unique number.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct ZobristTable {
    piece_hash: [[HashKind; NUM_SQUARES]; NUM_PIECE_KINDS],
    ep_hash: [HashKind; NUM_FILES],
    castling_hash: [HashKind; Castling::ENUMERATIONS],
    player_hash: HashKind,
}

impl ZobristTable {
    const TOGGLE_PLAYER: Color = Color::Black;

    /// Returns a new ZobristTable with unique values generated from seeded rng.
    pub fn with_seed(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    /// Returns a new ZobristTable with unique values generated from rng.
    fn with_rng(mut rng: StdRng) -> Self {
        // Ensure there are no duplicates in Table. Each value used must be unique.
        let mut used_values = HashSet::new();
        let mut unique_value = move || loop {
            let value: HashKind = rng.gen();
            // insert returns false if item was already in set.
            if used_values.insert(value) {
                break value;
            }
        };

        let mut piece_hash = [[HashKind::default(); NUM_SQUARES]; NUM_PIECE_KINDS];
        let mut ep_hash = [HashKind::default(); NUM_FILES];
        let mut castling_hash = [HashKind::default(); Castling::ENUMERATIONS];

        for item in piece_hash
            .iter_mut()
            .flatten()
            .chain(ep_hash.iter_mut())
            .chain(castling_hash.iter_mut())
        {
            *item = unique_value();
        }
        let player_hash = unique_value();

        Self {
            piece_hash,
            ep_hash,
            castling_hash,
            player_hash,
        }
    }

    /// Generate a hash value of a position in context of this ZobristTable.
    /// Counters and history do not contribute to the hash.
    pub fn generate_hash(&self, position: &Position) -> HashKind {
        let mut hash = HashKind::default();

        // For each piece, xor its value from ztable into the hash.
        for (square, piece) in position.board().pieces() {
            hash ^= self[(piece, square)];
        }

        // Hash the en-passant file if it exists.
        if let Some(ep_square) = position.en_passant() {
            hash ^= self[ep_square.file()];
        }

        hash ^= self[position.castling()];

        // Hash player. Only need to hash when active player is Black.
        if position.side_to_move() == ZobristTable::TOGGLE_PLAYER {
            hash ^= self.player_hash;
        }

        hash
    }
}

/// The table shared by every position in the process.
pub fn table() -> &'static ZobristTable {
    static TABLE: OnceLock<ZobristTable> = OnceLock::new();
    TABLE.get_or_init(|| ZobristTable::with_seed(TABLE_SEED))
}

/// Hash a position with the shared table.
pub fn hash(position: &Position) -> HashKind {
    table().generate_hash(position)
}

/// Index used for accessing piece_hash.
impl Index<(Piece, Square)> for ZobristTable {
    type Output = HashKind;
    fn index(&self, index: (Piece, Square)) -> &Self::Output {
        let (piece, square) = index;
        &self.piece_hash[piece.index()][square.idx()]
    }
}

// Index used for accessing ep_hash (en-passant hash).
impl Index<File> for ZobristTable {
    type Output = HashKind;
    fn index(&self, index: File) -> &Self::Output {
        &self.ep_hash[index as usize]
    }
}

// Index used for accessing castling_hash.
impl Index<Castling> for ZobristTable {
    type Output = HashKind;
    fn index(&self, index: Castling) -> &Self::Output {
        &self.castling_hash[index.bits() as usize]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coretypes::{Move, Square::*};
    use crate::fen::Fen;

    fn test_before_and_after(table: &ZobristTable, before: Position, after: Position, move_: Move) {
        let hash_before = table.generate_hash(&before);
        let hash_after = table.generate_hash(&after);

        // Multiple hashes generated from same table and position are equal.
        assert_eq!(hash_before, table.generate_hash(&before));
        assert_eq!(hash_after, table.generate_hash(&after));
        assert_ne!(hash_before, hash_after);

        // Playing the move reaches a position that hashes like the parsed one.
        let played = before.do_move(move_);
        assert_eq!(played, after);
        assert_eq!(table.generate_hash(&played), hash_after);
    }

    #[test]
    fn seeded_tables_are_reproducible() {
        assert_eq!(ZobristTable::with_seed(7), ZobristTable::with_seed(7));
        assert_ne!(ZobristTable::with_seed(7), ZobristTable::with_seed(8));
        let start = Position::start_position();
        assert_eq!(hash(&start), table().generate_hash(&start));
    }

    #[test]
    fn hash_start_position() {
        let table = ZobristTable::with_seed(1);
        let legal_move = Move::new(D2, D4, None);
        let start_position = Position::start_position();
        let queens_pawn_game = start_position.do_move(legal_move);

        test_before_and_after(&table, start_position, queens_pawn_game, legal_move);
    }

    #[test]
    fn hash_en_passant_position() {
        let table = ZobristTable::with_seed(2);
        let legal_move = Move::en_passant(D5, E6);
        let pos_before =
            Position::parse_fen("rnbqkbnr/pp1p1ppp/8/2pPp3/8/8/PPP1PPPP/RNBQKBNR w KQkq e6 0 3")
                .unwrap();
        let pos_after =
            Position::parse_fen("rnbqkbnr/pp1p1ppp/4P3/2p5/8/8/PPP1PPPP/RNBQKBNR b KQkq - 0 3")
                .unwrap();

        test_before_and_after(&table, pos_before, pos_after, legal_move);
    }

    #[test]
    fn hash_castling_position() {
        let table = ZobristTable::with_seed(3);
        let legal_move = Move::castle(E1, G1);
        let pos_before = Position::parse_fen(
            "rnb1k1nr/pp3ppp/3bp3/q2p4/2Pp4/2NBPN2/PP3PPP/R1BQK2R w KQkq - 0 7",
        )
        .unwrap();
        let pos_after =
            Position::parse_fen("rnb1k1nr/pp3ppp/3bp3/q2p4/2Pp4/2NBPN2/PP3PPP/R1BQ1RK1 b kq - 1 7")
                .unwrap();

        test_before_and_after(&table, pos_before, pos_after, legal_move);
    }
}
