//! Pseudo-legal move generation on the extended mailbox.
//!
//! *_pseudo_moves:
//! generate pseudo legal moves for each piece kind, including pushes and
//! captures. These moves do not consider check, but they do consider
//! occupancy. Legality filtering is done by [`Position`].

use crate::coretypes::{Castling, Color, Move, Piece, PieceKind, PieceKind::*, Rank, Square};
use crate::mailbox::{castling_rook_squares, Cell, Mailbox};
use crate::movelist::MoveList;
use crate::position::Position;
use crate::tables::Delta;

/// Generate all pseudo-legal moves for the side to move of a position.
pub fn pseudo_legal_moves(position: &Position) -> MoveList {
    let mut moves = MoveList::new();
    let player = position.side_to_move();

    for (from, piece) in position.board().pieces() {
        if piece.color() == player {
            piece_pseudo_moves(&mut moves, position, from, piece.piece_kind());
        }
    }
    moves
}

/// Generate pseudo-legal moves of the piece of kind `piece_kind` standing on `from`,
/// which must belong to the side to move.
pub fn piece_pseudo_moves(
    moves: &mut MoveList,
    position: &Position,
    from: Square,
    piece_kind: PieceKind,
) {
    let board = position.board();
    let player = position.side_to_move();

    match piece_kind {
        Pawn => pawn_pseudo_moves(moves, board, from, player, position.en_passant()),
        Knight => step_pseudo_moves(moves, board, from, player, &Delta::KNIGHT_OFFSETS),
        Bishop => sliding_pseudo_moves(moves, board, from, player, &Delta::BISHOP_DIRECTIONS),
        Rook => sliding_pseudo_moves(moves, board, from, player, &Delta::ROOK_DIRECTIONS),
        Queen => sliding_pseudo_moves(moves, board, from, player, &Delta::QUEEN_DIRECTIONS),
        King => {
            step_pseudo_moves(moves, board, from, player, &Delta::KING_OFFSETS);
            castling_pseudo_moves(moves, board, from, player, position.castling());
        }
    }
}

/// Returns true if a piece of `player` may land on `cell`, either empty or an enemy.
fn is_available(cell: Cell, player: Color) -> bool {
    match cell {
        Cell::Empty => true,
        Cell::Occupied(piece) => piece.color() != player,
        Cell::Outside => false,
    }
}

/// Generate all pseudo-legal pawn moves and append to move list.
/// params:
/// moves - move list to add new moves to.
/// from - square of the pawn.
/// player - color of the pawn.
/// en_passant - Optional en-passant target square.
pub fn pawn_pseudo_moves(
    moves: &mut MoveList,
    board: &Mailbox,
    from: Square,
    player: Color,
    en_passant: Option<Square>,
) {
    let (start_rank, promotion_rank) = match player {
        Color::White => (Rank::R2, Rank::R8),
        Color::Black => (Rank::R7, Rank::R1),
    };
    let origin = from.expand();
    let push = Delta::pawn_push(player);

    // Pushes only land on empty squares.
    let single = origin.offset(push);
    if board.cell(single) == Cell::Empty {
        if let Some(to) = single.compress() {
            push_pawn_move(moves, from, to, promotion_rank);
        }
        let double = single.offset(push);
        if from.rank() == start_rank && board.cell(double) == Cell::Empty {
            if let Some(to) = double.compress() {
                moves.push(Move::new(from, to, None));
            }
        }
    }

    // Captures land on enemy pieces or the en-passant square.
    for capture in Delta::pawn_captures(player) {
        let target = origin.offset(capture);
        let Some(to) = target.compress() else {
            continue;
        };
        match board.cell(target) {
            Cell::Occupied(piece) if piece.color() != player => {
                push_pawn_move(moves, from, to, promotion_rank)
            }
            Cell::Empty if en_passant == Some(to) => moves.push(Move::en_passant(from, to)),
            _ => (),
        }
    }
}

/// Pushes a pawn move, expanding it into all four promotions on the last rank.
fn push_pawn_move(moves: &mut MoveList, from: Square, to: Square, promotion_rank: Rank) {
    if to.rank() == promotion_rank {
        moves.push(Move::new(from, to, Some(Queen)));
        moves.push(Move::new(from, to, Some(Rook)));
        moves.push(Move::new(from, to, Some(Bishop)));
        moves.push(Move::new(from, to, Some(Knight)));
    } else {
        moves.push(Move::new(from, to, None));
    }
}

/// Generate pseudo-legal moves for pieces that take a single step per offset,
/// knights and kings, and append to move list.
pub fn step_pseudo_moves(
    moves: &mut MoveList,
    board: &Mailbox,
    from: Square,
    player: Color,
    offsets: &[Delta],
) {
    let origin = from.expand();
    for &offset in offsets {
        let target = origin.offset(offset);
        if is_available(board.cell(target), player) {
            if let Some(to) = target.compress() {
                moves.push(Move::new(from, to, None));
            }
        }
    }
}

/// Generate pseudo-legal moves for sliding pieces and append to move list.
/// Each ray runs until blocked, including the blocking square if it holds an enemy.
pub fn sliding_pseudo_moves(
    moves: &mut MoveList,
    board: &Mailbox,
    from: Square,
    player: Color,
    directions: &[Delta],
) {
    let origin = from.expand();
    for &direction in directions {
        let blocker = board.scan(origin, direction);

        let mut target = origin.offset(direction);
        while target != blocker {
            if let Some(to) = target.compress() {
                moves.push(Move::new(from, to, None));
            }
            target = target.offset(direction);
        }

        if is_available(board.cell(blocker), player) {
            if let Some(to) = blocker.compress() {
                moves.push(Move::new(from, to, None));
            }
        }
    }
}

/// Generate castling moves and append to move list.
/// Castling is pseudo-legal if the player still holds the right with the rook
/// at home, every square between king and rook is empty, and the king neither
/// starts on nor passes through an attacked square. Landing in check is left
/// to the legality filter.
pub fn castling_pseudo_moves(
    moves: &mut MoveList,
    board: &Mailbox,
    from: Square,
    player: Color,
    castling: Castling,
) {
    use Square::*;
    let (king_home, kingside, queenside) = match player {
        Color::White => (E1, Castling::W_KING, Castling::W_QUEEN),
        Color::Black => (E8, Castling::B_KING, Castling::B_QUEEN),
    };
    if from != king_home {
        return;
    }
    let opponent = !player;

    // (right, king target, squares that must be empty, squares the king passes)
    let sides = match player {
        Color::White => [
            (kingside, G1, &[F1, G1][..], F1),
            (queenside, C1, &[D1, C1, B1][..], D1),
        ],
        Color::Black => [
            (kingside, G8, &[F8, G8][..], F8),
            (queenside, C8, &[D8, C8, B8][..], D8),
        ],
    };

    for (right, to, between, transit) in sides {
        if !castling.has(right) {
            continue;
        }
        // Rights read from FEN are not checked against the board.
        let rook_home = castling_rook_squares(to).map(|(rook_from, _)| rook_from);
        if rook_home.and_then(|square| board.piece_on(square)) != Some(Piece::new(player, Rook)) {
            continue;
        }
        if !between.iter().all(|&square| board.is_empty(square)) {
            continue;
        }
        if board.side_attacks_square(opponent, king_home)
            || board.side_attacks_square(opponent, transit)
        {
            continue;
        }
        moves.push(Move::castle(king_home, to));
    }
}
