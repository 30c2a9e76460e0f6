//! Universal Chess Interface notation
//!
//! Moves are written as origin and destination squares with an optional
//! lowercase promotion letter, `e2e4` or `e7e8q`. Positions are exchanged
//! with engines through the `position` command:
//! `position [fen <fen> | startpos] (moves <move> ...)`

use std::str::{FromStr, SplitWhitespace};

use log::debug;

use crate::coretypes::{Move, PieceKind, Square};
use crate::error::{self, ErrorKind};
use crate::fen::Fen;
use crate::movelist::Line;
use crate::position::Position;

/// Encode a move as UCI text.
pub fn to_uci(move_: Move) -> String {
    move_.to_string()
}

/// Decode UCI text into the legal move of `position` it describes.
/// Returns None for malformed text or a move that is not legal.
pub fn from_uci(position: &Position, text: &str) -> Option<Move> {
    let text = text.trim();
    let from = Square::from_str(text.get(0..2)?).ok()?;
    let to = Square::from_str(text.get(2..4)?).ok()?;
    let promotion = match text.get(4..)? {
        "" => None,
        "q" => Some(PieceKind::Queen),
        "r" => Some(PieceKind::Rook),
        "b" => Some(PieceKind::Bishop),
        "n" => Some(PieceKind::Knight),
        _ => return None,
    };

    position
        .moves_from(from)
        .into_iter()
        .find(|move_| move_.to() == to && move_.promotion() == promotion)
}

/// Build the UCI `position` command that reaches `position`.
/// The FEN root is the most recent ancestor where the halfmove clock was reset,
/// or the start of the recorded history, so that an engine still sees every
/// position that could repeat.
pub fn uci_position_command(position: &Position) -> String {
    let mut moves: Vec<Move> = Vec::new();
    let mut root = position;

    while root.halfmoves() > 0 {
        match (root.parent(), root.last_move()) {
            (Some(parent), Some(move_)) => {
                moves.push(move_);
                root = parent;
            }
            _ => break,
        }
    }
    moves.reverse();

    let mut command = format!("position fen {}", root.to_fen());
    if !moves.is_empty() {
        command.push_str(" moves");
        for move_ in moves {
            command.push(' ');
            command.push_str(&to_uci(move_));
        }
    }
    command
}

/// Parse a UCI `position` command into its root position and the legal moves
/// played from it, in order.
pub fn parse_position_command(command: &str) -> error::Result<(Position, Line)> {
    let mut input = command.split_whitespace();
    if input.next() != Some("position") {
        return Err((ErrorKind::UciPositionMalformed, "expected `position`").into());
    }
    let root = parse_root(&mut input)?;

    let mut moves = Line::new();
    match input.next() {
        None => return Ok((root, moves)),
        Some("moves") => (),
        Some(other) => return Err((ErrorKind::UciPositionMalformed, other).into()),
    }

    let mut current = root.clone();
    for text in input {
        let move_ = from_uci(&current, text).ok_or_else(|| {
            debug!("uci move `{text}` is not legal in {}", current.to_fen());
            error::Error::from((ErrorKind::GameIllegalMove, text))
        })?;
        current = current.do_move(move_);
        moves.push(move_);
    }
    Ok((root, moves))
}

/// Parse `startpos` or `fen` followed by the six FEN fields.
fn parse_root(input: &mut SplitWhitespace) -> error::Result<Position> {
    match input.next() {
        Some("startpos") => Ok(Position::start_position()),
        Some("fen") => {
            let mut fields = Vec::with_capacity(6);
            for _ in 0..6 {
                fields.push(input.next().ok_or((
                    ErrorKind::UciPositionMalformed,
                    "fen needs six fields",
                ))?);
            }
            Position::parse_fen(&fields.join(" "))
        }
        _ => Err((
            ErrorKind::UciPositionMalformed,
            "position missing description [fen | startpos]",
        )
            .into()),
    }
}
