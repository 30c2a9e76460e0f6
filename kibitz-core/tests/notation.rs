//! Notation
//!
//! Round trips of FEN, SAN and UCI over positions reached from the start
//! position, and the legality of every generated move along the way.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use kibitz_core::fen::Fen;
use kibitz_core::notation::*;
use kibitz_core::*;

const PLAYOUT_SEED: u64 = 0x6b69_6269_747a;
const PLAYOUTS: usize = 200;
const PLAYOUT_PLY: usize = 6;

/// Check every codec and the legality of every move of `position`.
fn check_position(position: &Position) {
    let fen = position.to_fen();
    let parsed = Position::parse_fen(&fen).unwrap();
    assert_eq!(&parsed, position, "{fen}");
    assert!(parsed.parent().is_none());
    assert!(parsed.last_move().is_none());

    let mover = position.side_to_move();
    for move_ in position.legal_moves() {
        assert_eq!(from_uci(position, &to_uci(move_)), Some(move_), "{fen} {move_}");

        let san = to_san(position, move_);
        assert_eq!(from_san(position, &san), Some(move_), "{fen} {san}");

        let after = position.do_move(move_);
        assert!(!after.is_color_in_check(mover), "{fen} {move_}");
        assert_eq!(after.parent(), Some(position));
        assert_eq!(after.last_move(), Some(move_));
    }
}

fn exhaustive(position: &Position, ply: usize) {
    check_position(position);
    if ply == 0 {
        return;
    }
    for move_ in position.legal_moves() {
        exhaustive(&position.do_move(move_), ply - 1);
    }
}

#[test]
fn codecs_round_trip_to_depth_3() {
    exhaustive(&Position::start_position(), 3);
}

#[test]
fn codecs_round_trip_random_playouts() {
    let mut rng = StdRng::seed_from_u64(PLAYOUT_SEED);
    for _ in 0..PLAYOUTS {
        let mut position = Position::start_position();
        for _ in 0..PLAYOUT_PLY {
            check_position(&position);
            let moves = position.legal_moves();
            match moves.choose(&mut rng) {
                Some(move_) => position = position.do_move(*move_),
                None => break,
            }
        }
    }
}

#[test]
fn codecs_round_trip_tactical_positions() {
    let fens = [
        "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
        "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1",
        "r3k2r/Pppp1ppp/1b3nbN/nP6/BBP1P3/q4N2/Pp1P2PP/R2Q1RK1 w kq - 0 1",
        "rnbq1k1r/pp1Pbppp/2p5/8/2B5/8/PPP1NnPP/RNBQK2R w KQ - 1 8",
        "r4rk1/1pp1qppp/p1np1n2/2b1p1B1/2B1P1b1/P1NP1N2/1PP1QPPP/R4RK1 w - - 0 10",
    ];
    for fen in fens {
        let position = Position::parse_fen(fen).unwrap();
        assert_eq!(position.to_fen(), fen);
        exhaustive(&position, 1);
    }
}

#[test]
fn malformed_fen_is_rejected() {
    let fens = [
        "",
        "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0",
        "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP w KQkq - 0 1",
        "rnbqkbnr/pppppppp/9/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1",
        "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR x KQkq - 0 1",
        "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkx - 0 1",
        "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq e9 0 1",
        "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - a 1",
    ];
    for fen in fens {
        let error = Position::parse_fen(fen).unwrap_err();
        assert_eq!(error.kind(), ErrorKind::Fen, "{fen}");
    }
}

#[test]
fn variation_text_of_a_game() {
    let mut game = Game::new();
    for san in ["e4", "c5", "Nf3", "d6", "d4", "cxd4", "Nxd4", "Nf6", "Nc3", "a6"] {
        game.add_san_move(san).unwrap();
    }
    assert_eq!(
        variation_to_san(game.root(), &game.line()),
        "1. e4 c5 2. Nf3 d6 3. d4 cxd4 4. Nxd4 Nf6 5. Nc3 a6"
    );

    game.go_to_move(5);
    let rest = game.line()[5..].to_vec();
    assert_eq!(
        variation_to_san(game.position(), &rest),
        "3... cxd4 4. Nxd4 Nf6 5. Nc3 a6"
    );
}

#[test]
fn uci_command_round_trip() {
    let mut game = Game::new();
    for uci in ["e2e4", "e7e5", "g1f3", "b8c6", "f1b5", "g8f6"] {
        game.add_uci_move(uci).unwrap();
    }

    // The last pawn move reset the clock, so the command starts after it.
    let command = game.to_uci_position_command();
    assert_eq!(
        command,
        "position fen rnbqkbnr/pppp1ppp/8/4p3/4P3/8/PPPP1PPP/RNBQKBNR w KQkq e6 0 2 \
         moves g1f3 b8c6 f1b5 g8f6"
    );

    let rebuilt = Game::from_uci_position_command(&command).unwrap();
    assert_eq!(rebuilt.position(), game.position());
}
