//! Forsyth-Edwards Notation
//!
//! A FEN string describes a full chess position in six space separated fields:
//! `<placement> <side to move> <castling> <en-passant> <halfmove clock> <fullmove number>`

use std::error::Error as StdError;
use std::fmt::{self, Display};
use std::str::FromStr;

use crate::coretypes::{
    Castling, Color, MoveCount, PieceKind, Rank, Square, MAX_PAWNS_PER_SIDE, MAX_PIECES_PER_SIDE,
};
use crate::error;
use crate::mailbox::Mailbox;
use crate::position::Position;

/// FEN of the standard chess start position.
pub const START_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

/// Names the FEN field that failed to parse.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum ParseFenError {
    /// Input did not split into exactly six fields.
    IllFormed,
    Placement,
    SideToMove,
    Castling,
    EnPassant,
    HalfMoveClock,
    FullMoveNumber,
    /// Fields parsed, but the position lacks exactly one king per side.
    Kings,
    /// A side has more pieces or pawns than a game allows, or a pawn stands on
    /// the first or last rank.
    Material,
}

impl ParseFenError {
    pub fn as_str(&self) -> &'static str {
        match self {
            ParseFenError::IllFormed => "ill-formed fen, expected 6 fields",
            ParseFenError::Placement => "malformed piece placement",
            ParseFenError::SideToMove => "malformed side to move",
            ParseFenError::Castling => "malformed castling rights",
            ParseFenError::EnPassant => "malformed en-passant square",
            ParseFenError::HalfMoveClock => "malformed halfmove clock",
            ParseFenError::FullMoveNumber => "malformed fullmove number",
            ParseFenError::Kings => "position must have one king per side",
            ParseFenError::Material => "impossible material on the board",
        }
    }
}

impl Display for ParseFenError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl StdError for ParseFenError {}

/// Fen trait allows parsing and producing FEN text for a type.
pub trait Fen: Sized {
    /// Parse a full FEN string into Self.
    fn parse_fen(fen: &str) -> error::Result<Self>;

    /// Produce the full FEN string of Self.
    fn to_fen(&self) -> String;

    /// Parse the side to move field.
    fn parse_side_to_move(field: &str) -> Result<Color, ParseFenError> {
        match field {
            "w" => Ok(Color::White),
            "b" => Ok(Color::Black),
            _ => Err(ParseFenError::SideToMove),
        }
    }

    /// Parse the castling rights field.
    fn parse_castling(field: &str) -> Result<Castling, ParseFenError> {
        Castling::from_str(field).map_err(|_| ParseFenError::Castling)
    }

    /// Parse the en-passant field, `-` or the square behind a pawn the opponent
    /// just pushed two squares: rank 6 with White to move, rank 3 with Black.
    fn parse_en_passant(field: &str, side_to_move: Color) -> Result<Option<Square>, ParseFenError> {
        if field == "-" {
            return Ok(None);
        }
        let square = Square::from_str(field).map_err(|_| ParseFenError::EnPassant)?;
        match (side_to_move, square.rank()) {
            (Color::White, Rank::R6) | (Color::Black, Rank::R3) => Ok(Some(square)),
            _ => Err(ParseFenError::EnPassant),
        }
    }

    /// Parse the halfmove clock field.
    fn parse_halfmoves(field: &str) -> Result<MoveCount, ParseFenError> {
        field.parse().map_err(|_| ParseFenError::HalfMoveClock)
    }

    /// Parse the fullmove number field, which starts at 1.
    fn parse_fullmoves(field: &str) -> Result<MoveCount, ParseFenError> {
        match field.parse::<MoveCount>() {
            Ok(fullmoves) if fullmoves > 0 => Ok(fullmoves),
            _ => Err(ParseFenError::FullMoveNumber),
        }
    }
}

impl Fen for Position {
    fn parse_fen(fen: &str) -> error::Result<Self> {
        let fields: Vec<&str> = fen.split_whitespace().collect();
        let &[placement, side, castling, en_passant, halfmoves, fullmoves] = fields.as_slice() else {
            return Err(ParseFenError::IllFormed.into());
        };

        let board = Mailbox::parse_fen_placement(placement)?;
        let side_to_move = Self::parse_side_to_move(side)?;
        let castling = Self::parse_castling(castling)?;
        let en_passant = Self::parse_en_passant(en_passant, side_to_move)?;
        let halfmoves = Self::parse_halfmoves(halfmoves)?;
        let fullmoves = Self::parse_fullmoves(fullmoves)?;

        let count_kings = |color| {
            board
                .pieces()
                .filter(|(_, piece)| piece.color() == color && piece.piece_kind() == PieceKind::King)
                .count()
        };
        if count_kings(Color::White) != 1 || count_kings(Color::Black) != 1 {
            return Err(ParseFenError::Kings.into());
        }
        if !is_possible_material(&board) {
            return Err(ParseFenError::Material.into());
        }

        let ply = (fullmoves - 1)
            .checked_mul(2)
            .and_then(|ply| ply.checked_add((side_to_move == Color::Black) as MoveCount))
            .ok_or(ParseFenError::FullMoveNumber)?;

        Ok(Position::from_parts(
            board,
            side_to_move,
            castling,
            en_passant,
            halfmoves,
            ply,
        ))
    }

    fn to_fen(&self) -> String {
        let en_passant = match self.en_passant() {
            Some(square) => square.to_string(),
            None => String::from("-"),
        };
        format!(
            "{} {} {} {} {} {}",
            self.board().to_fen_placement(),
            self.side_to_move(),
            self.castling(),
            en_passant,
            self.halfmoves(),
            self.fullmoves()
        )
    }
}

/// Returns true if no side holds more pieces or pawns than a game can produce
/// and no pawn stands on the first or last rank.
fn is_possible_material(board: &Mailbox) -> bool {
    [Color::White, Color::Black].into_iter().all(|color| {
        let mut pieces = 0;
        let mut pawns = 0;
        for (square, piece) in board.pieces().filter(|(_, piece)| piece.color() == color) {
            pieces += 1;
            if piece.piece_kind() == PieceKind::Pawn {
                if matches!(square.rank(), Rank::R1 | Rank::R8) {
                    return false;
                }
                pawns += 1;
            }
        }
        pieces <= MAX_PIECES_PER_SIDE && pawns <= MAX_PAWNS_PER_SIDE
    })
}
