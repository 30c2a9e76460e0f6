//! Board geometry and lookup tables useful for move generation.
//!
//! Pieces live on an "extended" 10x12 board: the real 8x8 board sits in the
//! middle of a sentinel frame one file wide on each side and two ranks tall
//! at the top and bottom. Stepping off the real board by any king or knight
//! offset always lands on a frame square, so ray scans and step moves detect
//! the edge with a single lookup.
//!
//! ```text
//!  row 11  . . . . . . . . . .
//!  row 10  . . . . . . . . . .
//!  row  9  . a8 . . . . . h8 .     (90 .. 99)
//!  ...
//!  row  2  . a1 . . . . . h1 .     (20 .. 29)
//!  row  1  . . . . . . . . . .
//!  row  0  . . . . . . . . . .
//! ```

use crate::coretypes::{Color, Piece, PieceKind, Square, NUM_FILES, NUM_RANKS, NUM_SQUARES};

pub const EXT_FILES: usize = NUM_FILES + 2;
pub const EXT_RANKS: usize = NUM_RANKS + 4;
pub const EXT_SIZE: usize = EXT_FILES * EXT_RANKS;

/// Extended index of A1.
const EXT_A1: usize = 2 * EXT_FILES + 1;

/// A square index on the extended board, which includes the sentinel frame.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct ExtSquare(pub(crate) u8);

/// Difference between two extended square indices.
/// Adding a Delta to an ExtSquare walks in that direction.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct Delta(pub i8);

impl Delta {
    pub const NORTH: Delta = Delta(EXT_FILES as i8);
    pub const SOUTH: Delta = Delta(-(EXT_FILES as i8));
    pub const EAST: Delta = Delta(1);
    pub const WEST: Delta = Delta(-1);
    pub const NORTH_EAST: Delta = Delta(Self::NORTH.0 + Self::EAST.0);
    pub const NORTH_WEST: Delta = Delta(Self::NORTH.0 + Self::WEST.0);
    pub const SOUTH_EAST: Delta = Delta(Self::SOUTH.0 + Self::EAST.0);
    pub const SOUTH_WEST: Delta = Delta(Self::SOUTH.0 + Self::WEST.0);

    pub const ROOK_DIRECTIONS: [Delta; 4] = [Self::NORTH, Self::EAST, Self::SOUTH, Self::WEST];
    pub const BISHOP_DIRECTIONS: [Delta; 4] = [
        Self::NORTH_EAST,
        Self::NORTH_WEST,
        Self::SOUTH_EAST,
        Self::SOUTH_WEST,
    ];
    pub const QUEEN_DIRECTIONS: [Delta; 8] = [
        Self::NORTH,
        Self::EAST,
        Self::SOUTH,
        Self::WEST,
        Self::NORTH_EAST,
        Self::NORTH_WEST,
        Self::SOUTH_EAST,
        Self::SOUTH_WEST,
    ];
    pub const KING_OFFSETS: [Delta; 8] = Self::QUEEN_DIRECTIONS;
    pub const KNIGHT_OFFSETS: [Delta; 8] = [
        Delta(2 * Self::NORTH.0 + 1),
        Delta(2 * Self::NORTH.0 - 1),
        Delta(2 * Self::SOUTH.0 + 1),
        Delta(2 * Self::SOUTH.0 - 1),
        Delta(Self::NORTH.0 + 2),
        Delta(Self::NORTH.0 - 2),
        Delta(Self::SOUTH.0 + 2),
        Delta(Self::SOUTH.0 - 2),
    ];

    /// Direction a pawn of `color` pushes in.
    pub const fn pawn_push(color: Color) -> Delta {
        match color {
            Color::White => Self::NORTH,
            Color::Black => Self::SOUTH,
        }
    }

    /// The two diagonal directions a pawn of `color` captures in.
    pub const fn pawn_captures(color: Color) -> [Delta; 2] {
        match color {
            Color::White => [Self::NORTH_WEST, Self::NORTH_EAST],
            Color::Black => [Self::SOUTH_WEST, Self::SOUTH_EAST],
        }
    }
}

impl ExtSquare {
    /// Returns the extended index, usable to address a board array of EXT_SIZE.
    pub const fn idx(&self) -> usize {
        self.0 as usize
    }

    /// Returns true if this square is part of the sentinel frame.
    pub const fn is_outside(&self) -> bool {
        let file = self.0 as usize % EXT_FILES;
        let row = self.0 as usize / EXT_FILES;
        file == 0 || file == EXT_FILES - 1 || row < 2 || row >= EXT_RANKS - 2
    }

    /// Square reached by walking one step of `delta`.
    /// Walking off the extended board entirely is a programming error.
    pub fn offset(&self, delta: Delta) -> ExtSquare {
        let next = self.0 as i16 + delta.0 as i16;
        assert!(
            (0..EXT_SIZE as i16).contains(&next),
            "extended square {} stepped off the frame by {}",
            self.0,
            delta.0
        );
        ExtSquare(next as u8)
    }

    /// Maps back to a real board square, or None for frame squares.
    pub const fn compress(&self) -> Option<Square> {
        if self.is_outside() {
            return None;
        }
        let file = self.0 as usize % EXT_FILES - 1;
        let rank = self.0 as usize / EXT_FILES - 2;
        Square::from_u8((rank * NUM_FILES + file) as u8)
    }
}

impl Square {
    /// Extended board index of this square.
    pub const fn expand(&self) -> ExtSquare {
        let file = self.file_u8() as usize;
        let rank = self.rank_u8() as usize;
        ExtSquare((EXT_A1 + rank * EXT_FILES + file) as u8)
    }
}

impl From<Square> for ExtSquare {
    fn from(square: Square) -> Self {
        square.expand()
    }
}

///////////////////////////////////
// Attack direction lookup
//
// For an attacker class and the extended-index difference `target - origin`,
// ATTACK_TABLE holds the single step the attacker walks to reach the target,
// or 0 if the difference is not along any of its movement lines.
// Real squares differ by at most 77 in either direction.

const MAX_DELTA: usize = 7 * EXT_FILES + 7;
const DELTA_RANGE: usize = 2 * MAX_DELTA + 1;
const NUM_ATTACKER_CLASSES: usize = 7;

pub const ATTACK_TABLE: [[i8; DELTA_RANGE]; NUM_ATTACKER_CLASSES] = generate_attack_table();

/// Attackers are grouped by how they attack; pawns differ per color.
const fn attacker_class(piece: Piece) -> usize {
    match (piece.color, piece.piece_kind) {
        (Color::White, PieceKind::Pawn) => 0,
        (Color::Black, PieceKind::Pawn) => 1,
        (_, PieceKind::Knight) => 2,
        (_, PieceKind::Bishop) => 3,
        (_, PieceKind::Rook) => 4,
        (_, PieceKind::Queen) => 5,
        (_, PieceKind::King) => 6,
    }
}

/// Returns the direction `piece` standing on `origin` would walk to attack `target`,
/// if `target` lies on one of its lines. Blocking pieces are not considered, and
/// a returned direction for a slider still needs a scan to confirm the line stays on the board.
pub fn attack_direction(piece: Piece, origin: ExtSquare, target: ExtSquare) -> Option<Delta> {
    let difference = target.0 as isize - origin.0 as isize;
    if difference.unsigned_abs() > MAX_DELTA {
        return None;
    }
    let step = ATTACK_TABLE[attacker_class(piece)][(difference + MAX_DELTA as isize) as usize];
    (step != 0).then_some(Delta(step))
}

//////////////////////////////////////
// Generate Constant Lookup Helpers //
//////////////////////////////////////

const fn generate_attack_table() -> [[i8; DELTA_RANGE]; NUM_ATTACKER_CLASSES] {
    let mut table = [[0i8; DELTA_RANGE]; NUM_ATTACKER_CLASSES];

    let white_pawn = Delta::pawn_captures(Color::White);
    let black_pawn = Delta::pawn_captures(Color::Black);
    let mut i = 0;
    while i < 2 {
        table[0] = with_step(table[0], white_pawn[i].0);
        table[1] = with_step(table[1], black_pawn[i].0);
        i += 1;
    }

    let mut i = 0;
    while i < 8 {
        table[2] = with_step(table[2], Delta::KNIGHT_OFFSETS[i].0);
        table[6] = with_step(table[6], Delta::KING_OFFSETS[i].0);
        i += 1;
    }

    let mut i = 0;
    while i < 4 {
        table[3] = with_ray(table[3], Delta::BISHOP_DIRECTIONS[i].0);
        table[4] = with_ray(table[4], Delta::ROOK_DIRECTIONS[i].0);
        table[5] = with_ray(table[5], Delta::BISHOP_DIRECTIONS[i].0);
        table[5] = with_ray(table[5], Delta::ROOK_DIRECTIONS[i].0);
        i += 1;
    }

    table
}

const fn with_step(mut row: [i8; DELTA_RANGE], step: i8) -> [i8; DELTA_RANGE] {
    row[(step as isize + MAX_DELTA as isize) as usize] = step;
    row
}

const fn with_ray(mut row: [i8; DELTA_RANGE], step: i8) -> [i8; DELTA_RANGE] {
    let mut distance = 1;
    while distance < NUM_FILES as isize {
        let difference = step as isize * distance;
        row[(difference + MAX_DELTA as isize) as usize] = step;
        distance += 1;
    }
    row
}

/// All extended indices of real squares, in compressed order.
pub const REAL_SQUARES: [ExtSquare; NUM_SQUARES] = generate_real_squares();

const fn generate_real_squares() -> [ExtSquare; NUM_SQUARES] {
    let mut squares = [ExtSquare(0); NUM_SQUARES];
    let mut i = 0;
    while i < NUM_SQUARES {
        squares[i] = ExtSquare((EXT_A1 + (i / NUM_FILES) * EXT_FILES + i % NUM_FILES) as u8);
        i += 1;
    }
    squares
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coretypes::Square::*;

    #[test]
    fn compress_expand_round_trip() {
        for square in Square::iter() {
            let ext = square.expand();
            assert!(!ext.is_outside());
            assert_eq!(ext.compress(), Some(square));
            assert_eq!(REAL_SQUARES[square as usize], ext);
        }
    }

    #[test]
    fn frame_is_outside() {
        let inside = (0..EXT_SIZE as u8)
            .map(ExtSquare)
            .filter(|ext| !ext.is_outside())
            .count();
        assert_eq!(inside, NUM_SQUARES);
        assert!(ExtSquare(0).is_outside());
        assert!(A1.expand().offset(Delta::WEST).is_outside());
        assert!(H8.expand().offset(Delta::NORTH).is_outside());
        assert_eq!(ExtSquare(0).compress(), None);
    }

    #[test]
    fn knight_jumps_stay_in_frame() {
        for square in [A1, H1, A8, H8, B2, G7] {
            for delta in Delta::KNIGHT_OFFSETS {
                let _ = square.expand().offset(delta);
            }
        }
    }

    #[test]
    fn attack_directions() {
        let rook = Piece::new(Color::White, PieceKind::Rook);
        let bishop = Piece::new(Color::Black, PieceKind::Bishop);
        let knight = Piece::new(Color::White, PieceKind::Knight);
        let white_pawn = Piece::new(Color::White, PieceKind::Pawn);
        let black_pawn = Piece::new(Color::Black, PieceKind::Pawn);

        assert_eq!(
            attack_direction(rook, A1.expand(), A8.expand()),
            Some(Delta::NORTH)
        );
        assert_eq!(
            attack_direction(rook, H1.expand(), A1.expand()),
            Some(Delta::WEST)
        );
        assert_eq!(attack_direction(rook, A1.expand(), B2.expand()), None);
        assert_eq!(
            attack_direction(bishop, H8.expand(), A1.expand()),
            Some(Delta::SOUTH_WEST)
        );
        assert!(attack_direction(knight, G1.expand(), F3.expand()).is_some());
        assert!(attack_direction(knight, G1.expand(), G3.expand()).is_none());
        assert!(attack_direction(white_pawn, E4.expand(), D5.expand()).is_some());
        assert!(attack_direction(white_pawn, E4.expand(), D3.expand()).is_none());
        assert!(attack_direction(black_pawn, E4.expand(), D3.expand()).is_some());
    }
}
