//! A [mailbox](https://www.chessprogramming.org/Mailbox) is a square-centric
//! representation of a chess board.
//!
//! This Mailbox is laid out on the extended 10x12 board described in
//! [`crate::tables`], so every index is either a real square, which holds a
//! piece or is empty, or a frame square, which is permanently outside.

use std::fmt::{self, Display};

use crate::coretypes::{Color, Move, Piece, PieceKind, Rank, Square, NUM_FILES, NUM_RANKS};
use crate::fen::ParseFenError;
use crate::tables::{attack_direction, Delta, ExtSquare, EXT_SIZE, REAL_SQUARES};

/// Contents of one extended board index.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Cell {
    /// Beyond the edge of the real board.
    Outside,
    /// A real square with nothing on it.
    Empty,
    Occupied(Piece),
}

/// Board representation of a chess position's piece placement.
/// Index starts at the extended square of A1, see [`Square::expand`].
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub struct Mailbox {
    board: [Cell; EXT_SIZE],
}

impl Mailbox {
    pub const FILES: usize = NUM_FILES;
    pub const RANKS: usize = NUM_RANKS;
    pub const SIZE: usize = EXT_SIZE;

    /// Creates an empty Mailbox, where all real squares are Empty.
    pub fn new() -> Self {
        let mut board = [Cell::Outside; EXT_SIZE];
        for ext in REAL_SQUARES {
            board[ext.idx()] = Cell::Empty;
        }
        Mailbox { board }
    }

    /// Create Mailbox with pieces arranged in starting chess position.
    pub fn start_position() -> Self {
        use Color::*;
        use PieceKind::*;
        use Square::*;
        let mut mb = Self::new();

        let back_rank = [Rook, Knight, Bishop, Queen, King, Bishop, Knight, Rook];
        let files = [A1, B1, C1, D1, E1, F1, G1, H1];
        for (square, piece_kind) in files.into_iter().zip(back_rank) {
            let file = square.file();
            mb.put_piece(Piece::new(White, piece_kind), square);
            mb.put_piece(Piece::new(White, Pawn), Square::from((file, Rank::R2)));
            mb.put_piece(Piece::new(Black, Pawn), Square::from((file, Rank::R7)));
            mb.put_piece(Piece::new(Black, piece_kind), Square::from((file, Rank::R8)));
        }

        mb
    }

    /// Contents of an extended index. Indices within the frame return Outside;
    /// indices beyond the extended board are a programming error and panic.
    pub fn cell(&self, ext: ExtSquare) -> Cell {
        self.board[ext.idx()]
    }

    /// Piece on an extended index, if any.
    pub fn piece_at(&self, ext: ExtSquare) -> Option<Piece> {
        match self.cell(ext) {
            Cell::Occupied(piece) => Some(piece),
            Cell::Empty | Cell::Outside => None,
        }
    }

    pub fn piece_on(&self, square: Square) -> Option<Piece> {
        self.piece_at(square.expand())
    }

    pub fn is_empty(&self, square: Square) -> bool {
        self.cell(square.expand()) == Cell::Empty
    }

    /// Places piece on square, replacing anything already there.
    pub fn put_piece(&mut self, piece: Piece, square: Square) {
        self.board[square.expand().idx()] = Cell::Occupied(piece);
    }

    /// Empties square, returning the piece that stood there.
    pub fn remove_piece(&mut self, square: Square) -> Option<Piece> {
        let removed = self.piece_on(square);
        self.board[square.expand().idx()] = Cell::Empty;
        removed
    }

    /// Moves whatever stands on `from` to `to`, returning any piece captured on `to`.
    pub fn move_piece(&mut self, from: Square, to: Square) -> Option<Piece> {
        let moving = self.remove_piece(from);
        let captured = self.remove_piece(to);
        if let Some(piece) = moving {
            self.put_piece(piece, to);
        }
        captured
    }

    /// Apply a move to the piece placement, in place.
    /// `do_move` does not check if the move is legal, it only relocates pieces:
    /// castling also moves the rook, en-passant removes the passed pawn,
    /// and promotions replace the pawn with the promoted piece.
    /// Does nothing if there is no piece on the from square.
    pub fn do_move(&mut self, move_: Move) {
        let Some(active_piece) = self.remove_piece(move_.from) else {
            return;
        };

        if move_.castle {
            if let Some((rook_from, rook_to)) = castling_rook_squares(move_.to) {
                self.move_piece(rook_from, rook_to);
            }
        }

        if move_.en_passant {
            self.remove_piece(Square::from((move_.to.file(), move_.from.rank())));
        }

        let placed = match move_.promotion {
            Some(piece_kind) => Piece::new(active_piece.color, piece_kind),
            None => active_piece,
        };
        self.put_piece(placed, move_.to);
    }

    /// Walks from `origin` in steps of `delta` and returns the first square that is
    /// not empty, either an occupied square or the first frame square.
    pub fn scan(&self, origin: ExtSquare, delta: Delta) -> ExtSquare {
        let mut current = origin.offset(delta);
        while self.cell(current) == Cell::Empty {
            current = current.offset(delta);
        }
        current
    }

    /// Returns true if `from` and `to` share a rank, file or diagonal and every
    /// square strictly between them is empty.
    pub fn line_is_clear(&self, from: Square, to: Square) -> bool {
        let queen = Piece::new(Color::White, PieceKind::Queen);
        let (origin, target) = (from.expand(), to.expand());
        match attack_direction(queen, origin, target) {
            Some(delta) => self.ray_is_clear(origin, target, delta),
            None => false,
        }
    }

    /// Walks from `origin` towards `target` in steps of `delta`, returning false
    /// if anything but an empty square is met before arriving.
    fn ray_is_clear(&self, origin: ExtSquare, target: ExtSquare, delta: Delta) -> bool {
        let mut current = origin.offset(delta);
        while current != target {
            if self.cell(current) != Cell::Empty {
                return false;
            }
            current = current.offset(delta);
        }
        true
    }

    /// Returns true if the piece on `origin` attacks `target`.
    /// Pieces attack squares regardless of what stands on the target square.
    pub fn piece_attacks_square(&self, origin: Square, target: Square) -> bool {
        let Some(piece) = self.piece_on(origin) else {
            return false;
        };
        let (from, to) = (origin.expand(), target.expand());
        match attack_direction(piece, from, to) {
            Some(delta) if piece.piece_kind.is_sliding() => self.ray_is_clear(from, to, delta),
            Some(delta) => from.offset(delta) == to,
            None => false,
        }
    }

    /// Returns true if any piece of `color` attacks `target`.
    pub fn side_attacks_square(&self, color: Color, target: Square) -> bool {
        Square::iter().any(|origin| {
            matches!(self.piece_on(origin), Some(piece) if piece.color == color)
                && self.piece_attacks_square(origin, target)
        })
    }

    /// Iterator over every occupied real square and its piece.
    pub fn pieces(&self) -> impl Iterator<Item = (Square, Piece)> + '_ {
        Square::iter().filter_map(move |square| self.piece_on(square).map(|piece| (square, piece)))
    }

    /// Square of the first king of `color` found in square order, if any.
    pub fn find_king(&self, color: Color) -> Option<Square> {
        self.pieces()
            .find(|(_, piece)| *piece == Piece::new(color, PieceKind::King))
            .map(|(square, _)| square)
    }

    /// Parse the piece placement field of a FEN string.
    /// Ranks are listed 8 to 1, separated by '/', with runs of empty squares as digits.
    pub fn parse_fen_placement(placement: &str) -> Result<Self, ParseFenError> {
        let mut mb = Mailbox::new();
        let ranks: Vec<&str> = placement.split('/').collect();
        if ranks.len() != Self::RANKS {
            return Err(ParseFenError::Placement);
        }

        for (rank_index, rank_str) in ranks.into_iter().enumerate() {
            let rank = Self::RANKS - 1 - rank_index;
            let mut file = 0usize;
            for ch in rank_str.chars() {
                if let Some(skip) = ch.to_digit(10) {
                    if !(1..=8).contains(&skip) {
                        return Err(ParseFenError::Placement);
                    }
                    file += skip as usize;
                } else {
                    let piece = Piece::try_from(ch).map_err(|_| ParseFenError::Placement)?;
                    if file >= Self::FILES {
                        return Err(ParseFenError::Placement);
                    }
                    let square = Square::from_u8((rank * Self::FILES + file) as u8)
                        .ok_or(ParseFenError::Placement)?;
                    mb.put_piece(piece, square);
                    file += 1;
                }
                if file > Self::FILES {
                    return Err(ParseFenError::Placement);
                }
            }
            if file != Self::FILES {
                return Err(ParseFenError::Placement);
            }
        }

        Ok(mb)
    }

    /// The piece placement field of a FEN string.
    pub fn to_fen_placement(&self) -> String {
        let mut placement = String::with_capacity(72);
        for rank in (0..Self::RANKS).rev() {
            let mut empty_run = 0u8;
            for file in 0..Self::FILES {
                let square = REAL_SQUARES[rank * Self::FILES + file];
                match self.piece_at(square) {
                    Some(piece) => {
                        if empty_run > 0 {
                            placement.push((b'0' + empty_run) as char);
                            empty_run = 0;
                        }
                        placement.push(char::from(piece));
                    }
                    None => empty_run += 1,
                }
            }
            if empty_run > 0 {
                placement.push((b'0' + empty_run) as char);
            }
            if rank > 0 {
                placement.push('/');
            }
        }
        placement
    }

    /// Returns pretty-printed chess board representation of Self.
    /// The chess board has borders and file/rank indicators.
    pub fn pretty(&self) -> String {
        const RANK_SEP: &str = "+---+---+---+---+---+---+---+---+\n";
        let mut pretty = String::with_capacity(626);

        pretty.push_str(RANK_SEP);
        for rank in (0..Self::RANKS).rev() {
            pretty.push_str("| ");

            for file in 0..Self::FILES {
                pretty.push(match self.piece_at(REAL_SQUARES[rank * Self::FILES + file]) {
                    Some(piece) => char::from(piece),
                    None => ' ',
                });
                pretty.push_str(" | ");
            }
            pretty.push_str(&(rank + 1).to_string());
            pretty.push('\n');
            pretty.push_str(RANK_SEP);
        }
        pretty.push_str("  a   b   c   d   e   f   g   h\n");

        pretty
    }
}

/// Rook origin and target for a castling king landing on `king_to`.
pub(crate) const fn castling_rook_squares(king_to: Square) -> Option<(Square, Square)> {
    use Square::*;
    match king_to {
        G1 => Some((H1, F1)),
        C1 => Some((A1, D1)),
        G8 => Some((H8, F8)),
        C8 => Some((A8, D8)),
        _ => None,
    }
}

/// Default value is an empty board.
impl Default for Mailbox {
    fn default() -> Self {
        Mailbox::new()
    }
}

impl Display for Mailbox {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.pretty())
    }
}
