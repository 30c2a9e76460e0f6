//! Standard Algebraic Notation
//!
//! Encoding needs the position a move is played from, both to name the moving
//! piece and to find other pieces of the same kind that could reach the same
//! square. Decoding resolves text against the legal moves of a position and
//! only succeeds if exactly one move matches.

use std::str::FromStr;

use crate::coretypes::{Color, File, Move, PieceKind, Rank, Square};
use crate::movelist::MoveList;
use crate::position::Position;

const KINGSIDE: &str = "O-O";
const QUEENSIDE: &str = "O-O-O";

/// Encode a legal move of `position` as SAN, including any check or mate suffix.
pub fn to_san(position: &Position, move_: Move) -> String {
    let mut san = if move_.is_castle() {
        match move_.to().file() {
            File::G => String::from(KINGSIDE),
            _ => String::from(QUEENSIDE),
        }
    } else {
        match position.piece_on(move_.from()) {
            Some(piece) if piece.piece_kind() == PieceKind::Pawn => pawn_san(move_),
            Some(piece) => piece_san(position, piece.piece_kind(), move_),
            // Nothing to name, fall back to coordinates.
            None => return move_.to_string(),
        }
    };

    let after = position.do_move(move_);
    if after.is_checkmate() {
        san.push('#');
    } else if after.is_in_check() {
        san.push('+');
    }
    san
}

/// Pawns name their origin file only when they capture.
fn pawn_san(move_: Move) -> String {
    let mut san = String::with_capacity(6);
    if move_.from().file() != move_.to().file() {
        san.push(move_.from().file().to_char());
        san.push('x');
    }
    san.push_str(&move_.to().to_string());
    if let Some(promotion) = move_.promotion() {
        san.push('=');
        san.push(promotion.to_char());
    }
    san
}

fn piece_san(position: &Position, piece_kind: PieceKind, move_: Move) -> String {
    let mut san = String::with_capacity(7);
    san.push(piece_kind.to_char());
    san.push_str(&disambiguation(position, piece_kind, move_));
    if position.piece_on(move_.to()).is_some() {
        san.push('x');
    }
    san.push_str(&move_.to().to_string());
    san
}

/// The part of the origin square needed to tell move_ apart from other legal
/// moves of the same piece kind onto the same square.
fn disambiguation(position: &Position, piece_kind: PieceKind, move_: Move) -> String {
    let mut origins: Vec<Square> = position
        .moves_to(piece_kind, move_.to())
        .iter()
        .map(|candidate| candidate.from())
        .collect();
    origins.sort();
    origins.dedup();

    if origins.len() <= 1 {
        return String::new();
    }

    let all_distinct = |key: fn(&Square) -> u8| {
        let mut keys: Vec<u8> = origins.iter().map(key).collect();
        keys.sort_unstable();
        keys.windows(2).all(|pair| pair[0] != pair[1])
    };

    if all_distinct(Square::file_u8) {
        move_.from().file().to_char().to_string()
    } else if all_distinct(Square::rank_u8) {
        move_.from().rank().to_char().to_string()
    } else {
        move_.from().to_string()
    }
}

/// Decode SAN text into the single legal move of `position` it describes.
/// Capture, promotion, check and annotation marks are ignored.
/// Returns None if the text names no legal move, or more than one.
pub fn from_san(position: &Position, san: &str) -> Option<Move> {
    let cleaned: String = san
        .trim()
        .chars()
        .filter(|ch| !matches!(ch, 'x' | '=' | '+' | '#' | '!' | '?'))
        .collect();

    match cleaned.as_str() {
        KINGSIDE | "0-0" => return castle_move(position, File::G),
        QUEENSIDE | "0-0-0" => return castle_move(position, File::C),
        _ => (),
    }

    let mut chars = cleaned.chars();
    let first = chars.next()?;
    match PieceKind::from_san_char(first) {
        Some(piece_kind) => piece_move(position, piece_kind, chars.as_str()),
        None => pawn_move(position, &cleaned),
    }
}

fn castle_move(position: &Position, file: File) -> Option<Move> {
    let king = position.king_square(position.side_to_move())?;
    exactly_one(
        position
            .moves_from(king)
            .into_iter()
            .filter(|move_| move_.is_castle() && move_.to().file() == file)
            .collect(),
    )
}

/// `body` is everything after the piece letter: optional disambiguation and destination.
fn piece_move(position: &Position, piece_kind: PieceKind, body: &str) -> Option<Move> {
    let split = body.len().checked_sub(2)?;
    let (hint, destination) = (body.get(..split)?, body.get(split..)?);
    let to = Square::from_str(destination).ok()?;
    let hint = OriginHint::parse(hint)?;

    exactly_one(
        position
            .moves_to(piece_kind, to)
            .into_iter()
            .filter(|move_| hint.matches(move_.from()))
            .collect(),
    )
}

/// Pawn text is an optional origin file, the destination, and an optional promotion letter.
fn pawn_move(position: &Position, text: &str) -> Option<Move> {
    let (text, promotion) = match text.chars().last().and_then(PieceKind::from_san_char) {
        Some(promotion) => (&text[..text.len() - 1], Some(promotion)),
        None => (text, None),
    };

    let split = text.len().checked_sub(2)?;
    let (from_file, destination) = (text.get(..split)?, text.get(split..)?);
    let to = Square::from_str(destination).ok()?;
    let from_file = match from_file.chars().collect::<Vec<char>>().as_slice() {
        [] => to.file(),
        [file] => File::try_from(*file).ok()?,
        _ => return None,
    };

    exactly_one(
        position
            .moves_to(PieceKind::Pawn, to)
            .into_iter()
            .filter(|move_| move_.from().file() == from_file && move_.promotion() == promotion)
            .collect(),
    )
}

fn exactly_one(candidates: MoveList) -> Option<Move> {
    match candidates.as_slice() {
        [move_] => Some(*move_),
        _ => None,
    }
}

/// Optional disambiguation between a piece letter and its destination.
enum OriginHint {
    Any,
    File(File),
    Rank(Rank),
    Square(Square),
}

impl OriginHint {
    fn parse(hint: &str) -> Option<Self> {
        let chars: Vec<char> = hint.chars().collect();
        match chars.as_slice() {
            [] => Some(OriginHint::Any),
            [ch] if ch.is_ascii_digit() => Rank::try_from(*ch).ok().map(OriginHint::Rank),
            [ch] => File::try_from(*ch).ok().map(OriginHint::File),
            [_, _] => Square::from_str(hint).ok().map(OriginHint::Square),
            _ => None,
        }
    }

    fn matches(&self, from: Square) -> bool {
        match self {
            OriginHint::Any => true,
            OriginHint::File(file) => from.file() == *file,
            OriginHint::Rank(rank) => from.rank() == *rank,
            OriginHint::Square(square) => from == *square,
        }
    }
}

/// Encode a sequence of moves played from `position` as numbered SAN,
/// for example `1. e4 e5 2. Nf3` or, starting with Black, `3... Nc6 4. Bb5`.
pub fn variation_to_san(position: &Position, moves: &[Move]) -> String {
    let mut parts: Vec<String> = Vec::with_capacity(moves.len() * 2);
    let mut current = position.clone();

    for (index, move_) in moves.iter().enumerate() {
        match current.side_to_move() {
            Color::White => parts.push(format!("{}.", current.fullmoves())),
            Color::Black if index == 0 => {
                parts.push(format!("{}...", current.fullmoves()))
            }
            Color::Black => (),
        }
        parts.push(to_san(&current, *move_));
        current = current.do_move(*move_);
    }
    parts.join(" ")
}
