//! Mates
//!
//! Tests to ensure checkmate and stalemate are recognized, both in set up
//! positions and at the end of games played move by move.

use kibitz_core::fen::Fen;
use kibitz_core::notation::to_san;
use kibitz_core::*;

fn mate_tester(fen_str: &str, winner: Color) {
    let pos = Position::parse_fen(fen_str).unwrap();
    assert!(pos.is_in_check());
    assert!(pos.is_checkmate());
    assert!(!pos.is_stalemate());
    assert!(pos.legal_moves().is_empty());
    assert_eq!(pos.result(), GameResult::win_for(winner));
}

fn stalemate_tester(fen_str: &str) {
    let pos = Position::parse_fen(fen_str).unwrap();
    assert!(!pos.is_in_check());
    assert!(pos.is_stalemate());
    assert!(!pos.is_checkmate());
    assert_eq!(pos.result(), GameResult::Draw);
}

/// Play `moves` from the start position, checking the last move is written as mate.
fn play_to_mate(moves: &[&str], winner: Color) {
    let mut game = Game::new();
    for san in moves {
        game.add_san_move(san).unwrap();
    }
    let last = game.positions()[game.positions().len() - 2].clone();
    let move_ = game.position().last_move().unwrap();
    assert!(to_san(&last, move_).ends_with('#'));
    assert!(game.position().is_checkmate());
    assert_eq!(game.result(), GameResult::win_for(winner));
}

/// A unique position where a king should not be able to capture a checking queen,
/// even though recapturing piece is pinned to opposing king.
/// https://support.chess.com/article/373-checkmate-with-a-pinned-piece-whats-going-on
#[test]
fn mate_with_pinned_piece() {
    mate_tester("k7/1r6/8/8/4B3/8/1q6/K7 w - - 0 1", Color::Black);
}

#[test]
fn mate_back_rank() {
    mate_tester("R5k1/5ppp/8/8/8/8/8/7K b - - 1 1", Color::White);
}

#[test]
fn mate_back_rank_played() {
    let pos = Position::parse_fen("6k1/5ppp/8/8/8/8/8/R6K w - - 0 1").unwrap();
    let mut game = Game::from_position(pos);
    assert_eq!(game.add_san_move("Ra8").unwrap(), Move::new(Square::A1, Square::A8, None));
    assert!(game.position().is_checkmate());
    assert!(game.moves().is_empty());
    assert_eq!(game.result(), GameResult::WhiteWins);
}

#[test]
fn mate_smothered() {
    mate_tester("6rk/5Npp/8/8/8/8/8/6K1 b - - 0 1", Color::White);
}

#[test]
fn mate_fools() {
    play_to_mate(&["f3", "e5", "g4", "Qh4#"], Color::Black);
}

#[test]
fn mate_scholars() {
    play_to_mate(&["e4", "e5", "Bc4", "Nc6", "Qh5", "Nf6", "Qxf7#"], Color::White);
}

#[test]
fn check_is_not_mate() {
    let pos = Position::parse_fen("4k3/8/8/8/8/8/8/4R2K b - - 0 1").unwrap();
    assert!(pos.is_in_check());
    assert!(!pos.is_checkmate());
    assert_eq!(pos.result(), GameResult::Unknown);

    // Blocking is the only defence.
    let pos = Position::parse_fen("R5k1/5ppp/8/8/8/8/2r5/7K b - - 1 1").unwrap();
    assert!(!pos.is_checkmate());
    assert!(pos.legal_moves().iter().all(|move_| move_.to() == Square::C8));
}

#[test]
fn stalemate_queen_corner() {
    stalemate_tester("7k/5Q2/6K1/8/8/8/8/8 b - - 0 1");
    stalemate_tester("k7/8/1Q6/8/8/8/8/7K b - - 0 1");
}

#[test]
fn stalemate_blocked_pawns() {
    // The black king is boxed in and its only pawn is blocked.
    stalemate_tester("8/8/8/8/p7/P5Q1/5K2/7k b - - 0 1");
}
