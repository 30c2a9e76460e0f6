//! Command shell for exploring annotated chess games.

use std::fs;
use std::io::{self, Write};

use log::{debug, info};

use kibitz_core::fen::Fen;
use kibitz_core::notation::{to_san, to_uci, variation_to_san};
use kibitz_core::{AnnotatedGame, GameResult, Position, WriteOptions};

enum InputKind {
    Exit,
    Newgame,
    Help,
    Show,
    Moves,
    Back,
    Forward,
    Start,
    End,
    Pgn,
    Uci,
    Fen(String),
    Load(String),
    Comment(String),
    Nag(u32),
    Error,
    GameMove(String),
}

impl From<&str> for InputKind {
    fn from(s: &str) -> Self {
        let (command, rest) = match s.trim().split_once(char::is_whitespace) {
            Some((command, rest)) => (command, rest.trim()),
            None => (s.trim(), ""),
        };

        match (command, rest) {
            ("exit" | "quit", "") => Self::Exit,
            ("new" | "ng", "") => Self::Newgame,
            ("help", "") => Self::Help,
            ("show", "") => Self::Show,
            ("moves", "") => Self::Moves,
            ("back" | "b", "") => Self::Back,
            ("forward" | "f", "") => Self::Forward,
            ("start", "") => Self::Start,
            ("end", "") => Self::End,
            ("pgn", "") => Self::Pgn,
            ("uci", "") => Self::Uci,
            ("fen", fen) if !fen.is_empty() => Self::Fen(fen.to_string()),
            ("load", path) if !path.is_empty() => Self::Load(path.to_string()),
            ("comment", text) => Self::Comment(text.to_string()),
            ("nag", glyph) => glyph.parse().map(Self::Nag).unwrap_or(Self::Error),
            ("", _) => Self::Show,
            (text, "") => Self::GameMove(text.to_string()),
            _ => Self::Error,
        }
    }
}

fn print_help() {
    println!("Commands:");
    println!("new | ng => Begin a new game from the start position.");
    println!("fen <FEN> => Begin a new game from a position.");
    println!("load <file.pgn> => Load the first game of a PGN file.");
    println!("show => Print the position in focus.");
    println!("moves => List the legal moves in the position in focus.");
    println!("back | forward | start | end => Move the focus through the game.");
    println!("comment <text> => Comment the move in focus, or clear it with no text.");
    println!("nag <n> => Attach glyph $n to the move in focus.");
    println!("pgn => Print the game as PGN.");
    println!("uci => Print the UCI position command for the position in focus.");
    println!("help => Print this help text.");
    println!("exit => end the shell.");
    println!("\nTo make a move, enter it in SAN or coordinate form.");
    println!("Examples: Nf3, exd5, O-O, e7e8q");
}

fn show(game: &AnnotatedGame) {
    let node = game.focus_node();
    println!("{}", game.position());
    if let (Some(parent), Some(move_)) = (node.parent(), node.last_move()) {
        if let Some(before) = game.node(parent) {
            println!("Last move: {}", variation_to_san(before.position(), &[move_]));
        }
    }
    if let Some(comment) = game.comment() {
        println!("Comment: {comment}");
    }

    let continuations: Vec<String> = game
        .variations()
        .iter()
        .filter_map(|id| game.node(*id)?.last_move())
        .map(|move_| to_san(game.position(), move_))
        .collect();
    if continuations.len() > 1 {
        println!("Variations: {}", continuations.join(", "));
    }

    let result = game.position().result();
    if result != GameResult::Unknown {
        println!("Game over: {result}");
    }
}

fn load(path: &str) -> Result<AnnotatedGame, String> {
    let text = fs::read_to_string(path).map_err(|error| error.to_string())?;
    let games = kibitz_core::pgn::parse_all(&text).map_err(|error| error.to_string())?;
    info!("{} contains {} games", path, games.len());
    match games.first() {
        Some(pgn) => AnnotatedGame::from_parsed_pgn(pgn).map_err(|error| error.to_string()),
        None => Err(format!("{path} contains no games")),
    }
}

fn main() -> io::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    println!("Kibitz 0.1.0\n");
    let mut game = AnnotatedGame::new();
    let mut input = String::new();

    show(&game);
    loop {
        print!("> ");
        io::stdout().flush()?;
        input.clear();
        if io::stdin().read_line(&mut input)? == 0 {
            break;
        }

        let input_kind: InputKind = input.trim().into();

        match input_kind {
            InputKind::Exit => break,
            InputKind::Newgame => {
                game = AnnotatedGame::new();
                println!("Starting new game...");
                show(&game);
            }
            InputKind::Help => print_help(),
            InputKind::Show => show(&game),
            InputKind::Moves => {
                let moves: Vec<String> = game
                    .moves()
                    .into_iter()
                    .map(|move_| format!("{} ({})", to_san(game.position(), move_), to_uci(move_)))
                    .collect();
                println!("{}", moves.join(", "));
            }
            InputKind::Back => {
                if !game.back() {
                    println!("Already at the beginning.");
                }
                show(&game);
            }
            InputKind::Forward => {
                if !game.forward() {
                    println!("Already at the end.");
                }
                show(&game);
            }
            InputKind::Start => {
                game.to_beginning();
                show(&game);
            }
            InputKind::End => {
                game.to_end();
                show(&game);
            }
            InputKind::Pgn => print!("{}", game.to_pgn(&WriteOptions::default())),
            InputKind::Uci => {
                println!("{}", kibitz_core::notation::uci_position_command(game.position()))
            }
            InputKind::Fen(fen) => match Position::parse_fen(&fen) {
                Ok(position) => {
                    game = AnnotatedGame::from_position(position);
                    show(&game);
                }
                Err(error) => println!("Invalid FEN: {error}"),
            },
            InputKind::Load(path) => match load(&path) {
                Ok(loaded) => {
                    game = loaded;
                    println!("Loaded {} moves.", game.main_line().len());
                    show(&game);
                }
                Err(error) => println!("Could not load {path}: {error}"),
            },
            InputKind::Comment(text) => {
                game.set_comment((!text.is_empty()).then_some(text));
            }
            InputKind::Nag(glyph) => game.set_glyph(Some(glyph)),
            InputKind::Error => println!("Invalid command: {}", input.trim()),
            InputKind::GameMove(text) => {
                let added = game
                    .add_san_move(&text)
                    .or_else(|_| game.add_uci_move(&text));
                match added {
                    Ok(id) => {
                        debug!("added node {id}");
                        show(&game);
                    }
                    Err(_) => println!("That move was illegal! No action taken."),
                }
            }
        }
    }
    Ok(())
}
