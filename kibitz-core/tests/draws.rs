//! Draws
//!
//! Tests to ensure threefold repetition, 50-move rule and insufficient
//! material draws are correctly recognized.

use kibitz_core::coretypes::{Move, Square::*};
use kibitz_core::fen::Fen;
use kibitz_core::*;

fn play(game: &mut Game, moves: &[&str]) {
    for san in moves {
        game.add_san_move(san).unwrap();
    }
}

#[test]
fn threefold_repetition_knight_shuffle() {
    let shuffle = ["Nf3", "Nf6", "Ng1", "Ng8"];
    let mut game = Game::new();

    play(&mut game, &shuffle);
    assert!(!game.position().is_threefold_repetition());
    assert_eq!(game.result(), GameResult::Unknown);

    play(&mut game, &shuffle);
    assert!(game.position().is_threefold_repetition());
    assert_eq!(game.position().result(), GameResult::Draw);
    assert_eq!(game.result(), GameResult::Draw);
}

#[test]
fn threefold_repetition_perpetual_check() {
    // White has huge material advantage but black can perpetually check.
    let mut pos = Position::parse_fen("k7/1p2QP2/4PP2/8/1P5q/8/6P1/1RRN2K1 b - - 0 1").unwrap();
    let cycle = [
        Move::new(H4, E1, None),
        Move::new(G1, H2, None),
        Move::new(E1, H4, None),
        Move::new(H2, G1, None),
    ];

    for _ in 0..2 {
        for move_ in cycle {
            assert!(!pos.is_threefold_repetition());
            pos = pos.do_move(move_);
        }
    }
    assert!(pos.is_threefold_repetition());
}

#[test]
fn pawn_move_resets_repetition() {
    // The pieces return to the same squares, but a pawn move separates the visits.
    let mut game = Game::from_position(
        Position::parse_fen("4k3/8/8/3p4/8/8/8/R3K3 w - - 0 1").unwrap(),
    );
    play(&mut game, &["Ra2", "Ke7", "Ra1", "Ke8", "Ra2", "Ke7", "Ra1"]);
    play(&mut game, &["d4", "Ra2", "Ke8", "Ra1", "Ke7"]);
    assert!(!game.position().is_threefold_repetition());
}

#[test]
fn fifty_move_rule() {
    let pos = Position::parse_fen("4k3/8/8/8/8/8/8/4K2R w - - 99 80").unwrap();
    assert!(!pos.is_fifty_move_draw());
    assert_eq!(pos.result(), GameResult::Unknown);

    let pos = pos.do_move(Move::new(H1, H2, None));
    assert_eq!(pos.halfmoves(), 100);
    assert!(pos.is_fifty_move_draw());
    assert_eq!(pos.result(), GameResult::Draw);

    // A pawn move resets the clock.
    let pos = Position::parse_fen("4k3/4p3/8/8/8/8/8/4K2R b - - 99 80").unwrap();
    let pos = pos.do_move(Move::new(E7, E6, None));
    assert_eq!(pos.halfmoves(), 0);
    assert!(!pos.is_fifty_move_draw());
}

#[test]
fn insufficient_material() {
    let drawn = [
        "8/8/4k3/8/8/3K4/8/8 w - - 0 1",
        "8/8/4k3/8/8/3KN3/8/8 w - - 0 1",
        "8/8/4k3/8/8/3K4/8/4b3 w - - 0 1",
        // Bishops on squares of the same color.
        "8/8/4k3/2b5/8/3KB3/8/8 w - - 0 1",
    ];
    for fen in drawn {
        let pos = Position::parse_fen(fen).unwrap();
        assert!(pos.is_insufficient_material(), "{fen}");
        assert_eq!(pos.result(), GameResult::Draw, "{fen}");
    }

    let playable = [
        "8/8/4k3/8/8/3KP3/8/8 w - - 0 1",
        "8/8/4k3/8/8/R2K4/8/8 w - - 0 1",
        "8/8/4k3/8/8/2NKN3/8/8 w - - 0 1",
        // Bishops on squares of different colors.
        "8/8/2b1k3/8/8/3KB3/8/8 w - - 0 1",
    ];
    for fen in playable {
        let pos = Position::parse_fen(fen).unwrap();
        assert!(!pos.is_insufficient_material(), "{fen}");
    }
}
