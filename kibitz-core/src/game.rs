//! Game structure.
//!
//! A Game is a single line of play: a root position, the positions reached
//! by each move after it, and a focus marking the position being looked at.
//! Games are cheap to clone. Clones share their history until one of them
//! is edited.

use std::sync::Arc;

use log::debug;

use crate::coretypes::{Color, GameResult, Move, Square};
use crate::error::{self, ErrorKind};
use crate::fen::{Fen, START_FEN};
use crate::movelist::{Line, MoveList};
use crate::notation::{from_san, from_uci, parse_position_command, to_san, uci_position_command};
use crate::pgn::{self, Pgn, PgnToken, WriteOptions};
use crate::position::Position;

/// Ordered PGN tag pairs.
pub type Headers = Vec<(String, String)>;

/// Game contains information for a game without variations:
/// the positions from the root to the last move played, the index of the
/// position in focus, and the PGN headers describing the game.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Game {
    headers: Headers,
    positions: Arc<Vec<Position>>,
    focus: usize,
    result: Option<GameResult>,
}

impl Game {
    /// Create a new game in the standard chess start position.
    pub fn new() -> Self {
        Self::from_position(Position::start_position())
    }

    /// Create a new game rooted at `position`.
    pub fn from_position(position: Position) -> Self {
        Self {
            headers: Headers::new(),
            positions: Arc::new(vec![position]),
            focus: 0,
            result: None,
        }
    }

    /// Import the main line of a PGN game. Variations are skipped, comments
    /// and glyphs are dropped. The focus is left on the root.
    pub fn from_pgn(text: &str) -> error::Result<Self> {
        Self::from_parsed_pgn(&pgn::parse(text)?)
    }

    /// Import the main line of an already parsed game.
    pub fn from_parsed_pgn(pgn: &Pgn) -> error::Result<Self> {
        let mut game = Self::from_position(root_from_headers(&pgn.headers)?);
        game.headers = pgn.headers.clone();

        for token in &pgn.moves {
            match token {
                PgnToken::Move(text) => {
                    let move_ = resolve_move(game.position(), text)?;
                    let next = game.position().do_move(move_);
                    game.push_position(next);
                }
                PgnToken::Termination(result) => game.result = Some(*result),
                PgnToken::MoveNumber { .. }
                | PgnToken::Comment(_)
                | PgnToken::Nag(_)
                | PgnToken::Variation(_) => (),
            }
        }
        game.to_beginning();
        Ok(game)
    }

    /// Create a game from a UCI `position` command, focused on its last position.
    pub fn from_uci_position_command(command: &str) -> error::Result<Self> {
        let (root, moves) = parse_position_command(command)?;
        let mut game = Self::from_position(root);
        for move_ in moves {
            game.add_move(move_)?;
        }
        Ok(game)
    }

    /// The position in focus.
    pub fn position(&self) -> &Position {
        &self.positions[self.focus]
    }

    /// The position the game started from.
    pub fn root(&self) -> &Position {
        &self.positions[0]
    }

    /// Every position of the game, root first.
    pub fn positions(&self) -> &[Position] {
        &self.positions
    }

    /// Index of the focus, which is the number of moves played to reach it.
    pub fn focus(&self) -> usize {
        self.focus
    }

    /// Moves played from the root to the last position.
    pub fn line(&self) -> Line {
        self.positions
            .iter()
            .skip(1)
            .filter_map(Position::last_move)
            .collect()
    }

    /// Legal moves in the position in focus.
    pub fn moves(&self) -> MoveList {
        self.position().legal_moves()
    }

    /// Legal moves of the piece standing on `square` in the position in focus.
    pub fn moves_from(&self, square: Square) -> MoveList {
        self.position().moves_from(square)
    }

    /// Play a legal move at the focus. Any moves after the focus are dropped.
    pub fn add_move(&mut self, move_: Move) -> error::Result<()> {
        if !self.position().is_legal(move_) {
            return Err((ErrorKind::GameIllegalMove, move_).into());
        }
        let next = self.position().do_move(move_);
        self.push_position(next);
        Ok(())
    }

    /// Play a move given in SAN at the focus.
    pub fn add_san_move(&mut self, san: &str) -> error::Result<Move> {
        let move_ = from_san(self.position(), san)
            .ok_or_else(|| error::Error::from((ErrorKind::GameIllegalMove, san)))?;
        self.add_move(move_)?;
        Ok(move_)
    }

    /// Play a move given in UCI notation at the focus.
    pub fn add_uci_move(&mut self, uci: &str) -> error::Result<Move> {
        let move_ = from_uci(self.position(), uci)
            .ok_or_else(|| error::Error::from((ErrorKind::GameIllegalMove, uci)))?;
        self.add_move(move_)?;
        Ok(move_)
    }

    /// Truncate after the focus, then append `position` and focus on it.
    fn push_position(&mut self, position: Position) {
        let positions = Arc::make_mut(&mut self.positions);
        positions.truncate(self.focus + 1);
        positions.push(position);
        self.focus += 1;
    }

    /// Step the focus back one move. Returns false if already at the root.
    pub fn back(&mut self) -> bool {
        match self.focus {
            0 => false,
            _ => {
                self.focus -= 1;
                true
            }
        }
    }

    /// Step the focus forward one move. Returns false if already at the end.
    pub fn forward(&mut self) -> bool {
        match self.focus + 1 < self.positions.len() {
            true => {
                self.focus += 1;
                true
            }
            false => false,
        }
    }

    pub fn to_beginning(&mut self) {
        self.focus = 0;
    }

    pub fn to_end(&mut self) {
        self.focus = self.positions.len() - 1;
    }

    /// Focus on the position after `ply` moves, or the last position if there are fewer.
    pub fn go_to_move(&mut self, ply: usize) {
        self.focus = ply.min(self.positions.len() - 1);
    }

    pub fn headers(&self) -> &Headers {
        &self.headers
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        header(&self.headers, name)
    }

    /// Set a header, replacing the value of an existing one of the same name.
    pub fn set_header(&mut self, name: &str, value: &str) {
        set_header(&mut self.headers, name, value);
    }

    /// Result of the game: the recorded one if known, otherwise whatever the
    /// last position decides.
    pub fn result(&self) -> GameResult {
        let last = &self.positions[self.positions.len() - 1];
        recorded_result(self.result, &self.headers).unwrap_or_else(|| last.result())
    }

    /// Write the game as PGN. Comments, glyphs and variations never exist in
    /// a Game, so only the line length of `options` applies.
    pub fn to_pgn(&self, options: &WriteOptions) -> String {
        let mut tokens = Vec::new();
        let mut needs_number = true;
        for pair in self.positions.windows(2) {
            let (before, after) = (&pair[0], &pair[1]);
            if let Some(move_) = after.last_move() {
                push_move_tokens(&mut tokens, before, move_, needs_number);
                needs_number = false;
            }
        }
        let result = self.result();
        tokens.push(PgnToken::Termination(result));

        Pgn {
            headers: export_headers(&self.headers, self.root(), result),
            moves: tokens,
        }
        .write(options)
    }

    /// The UCI `position` command reaching the position in focus.
    pub fn to_uci_position_command(&self) -> String {
        uci_position_command(self.position())
    }
}

impl Default for Game {
    fn default() -> Self {
        Self::new()
    }
}

/// Convert a position to a Game with no past moves.
impl From<Position> for Game {
    fn from(position: Position) -> Self {
        Self::from_position(position)
    }
}

/// Resolve move text from a game record, SAN first and coordinates second.
pub(crate) fn resolve_move(position: &Position, text: &str) -> error::Result<Move> {
    from_san(position, text)
        .or_else(|| from_uci(position, text))
        .ok_or_else(|| {
            debug!("move `{}` does not resolve in {}", text, position.to_fen());
            (ErrorKind::GameIllegalMove, text).into()
        })
}

/// Root of an imported game: the `FEN` header if present, else the start position.
pub(crate) fn root_from_headers(headers: &[(String, String)]) -> error::Result<Position> {
    match header(headers, "FEN") {
        Some(fen) => Position::parse_fen(fen),
        None => Ok(Position::start_position()),
    }
}

/// Headers as written on export: `Result` always reflects `result`, and a
/// root other than the start position is recorded with `SetUp` and `FEN`.
pub(crate) fn export_headers(headers: &[(String, String)], root: &Position, result: GameResult) -> Headers {
    let mut headers = headers.to_vec();
    set_header(&mut headers, "Result", result.as_str());
    let fen = root.to_fen();
    if fen != START_FEN {
        set_header(&mut headers, "SetUp", "1");
        set_header(&mut headers, "FEN", &fen);
    }
    headers
}

/// A known result from the termination marker or the `Result` header.
pub(crate) fn recorded_result(
    termination: Option<GameResult>,
    headers: &[(String, String)],
) -> Option<GameResult> {
    termination
        .or_else(|| header(headers, "Result")?.parse().ok())
        .filter(|result| *result != GameResult::Unknown)
}

pub(crate) fn header<'a>(headers: &'a [(String, String)], name: &str) -> Option<&'a str> {
    headers
        .iter()
        .find(|(key, _)| key == name)
        .map(|(_, value)| value.as_str())
}

pub(crate) fn set_header(headers: &mut Headers, name: &str, value: &str) {
    match headers.iter_mut().find(|(key, _)| key == name) {
        Some((_, old)) => *old = value.to_string(),
        None => headers.push((name.to_string(), value.to_string())),
    }
}

/// Push the move number, when due, and the SAN of `move_` played from `before`.
/// White moves are always numbered, Black moves only when `needs_number`.
pub(crate) fn push_move_tokens(
    tokens: &mut Vec<PgnToken>,
    before: &Position,
    move_: Move,
    needs_number: bool,
) {
    let number = u32::from(before.fullmoves());
    match before.side_to_move() {
        Color::White => tokens.push(PgnToken::MoveNumber {
            number,
            continuation: false,
        }),
        Color::Black if needs_number => tokens.push(PgnToken::MoveNumber {
            number,
            continuation: true,
        }),
        Color::Black => (),
    }
    tokens.push(PgnToken::Move(to_san(before, move_)));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coretypes::Square::*;

    #[test]
    fn add_moves_and_navigate() {
        let mut game = Game::new();
        game.add_san_move("e4").unwrap();
        game.add_uci_move("e7e5").unwrap();
        game.add_move(Move::new(G1, F3, None)).unwrap();
        assert_eq!(game.focus(), 3);
        assert_eq!(game.line().len(), 3);

        assert!(game.back());
        assert!(game.back());
        assert_eq!(game.position().side_to_move(), Color::Black);
        assert!(game.forward());
        game.to_beginning();
        assert!(!game.back());
        assert_eq!(game.position(), &Position::start_position());
        game.to_end();
        assert!(!game.forward());
        game.go_to_move(99);
        assert_eq!(game.focus(), 3);
    }

    #[test]
    fn add_move_truncates_after_focus() {
        let mut game = Game::new();
        game.add_san_move("e4").unwrap();
        game.add_san_move("e5").unwrap();
        game.back();
        game.add_san_move("c5").unwrap();
        assert_eq!(game.line(), vec![Move::new(E2, E4, None), Move::new(C7, C5, None)]);
    }

    #[test]
    fn illegal_moves_are_rejected() {
        let mut game = Game::new();
        let err = game.add_move(Move::new(E2, E5, None)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::GameIllegalMove);
        assert_eq!(game.add_san_move("Ke2").unwrap_err().kind(), ErrorKind::GameIllegalMove);
        assert_eq!(game.add_uci_move("e1e2").unwrap_err().kind(), ErrorKind::GameIllegalMove);
        assert_eq!(game.positions().len(), 1);
    }

    #[test]
    fn clones_share_until_edited() {
        let mut game = Game::new();
        game.add_san_move("d4").unwrap();
        let snapshot = game.clone();
        game.add_san_move("d5").unwrap();
        assert_eq!(snapshot.positions().len(), 2);
        assert_eq!(game.positions().len(), 3);
    }

    #[test]
    fn import_and_export() {
        let text = "[Event \"Test\"]\n[Result \"*\"]\n\n1. e4 {comment} e5 (1... c5) 2. Nf3 Nc6 *\n";
        let game = Game::from_pgn(text).unwrap();
        assert_eq!(game.header("Event"), Some("Test"));
        assert_eq!(game.focus(), 0);
        assert_eq!(game.line().len(), 4);
        assert_eq!(game.result(), GameResult::Unknown);
        assert_eq!(
            game.to_pgn(&WriteOptions::default()),
            "[Event \"Test\"]\n[Result \"*\"]\n\n1. e4 e5 2. Nf3 Nc6 *\n"
        );
    }

    #[test]
    fn set_up_positions() {
        let fen = "4k3/8/8/8/8/8/8/R3K3 b - - 0 40";
        let mut game = Game::from_position(Position::parse_fen(fen).unwrap());
        game.add_san_move("Kd7").unwrap();
        game.add_san_move("Ra7+").unwrap();
        let text = game.to_pgn(&WriteOptions::default());
        assert_eq!(
            text,
            format!("[Result \"*\"]\n[SetUp \"1\"]\n[FEN \"{fen}\"]\n\n40... Kd7 41. Ra7+ *\n")
        );

        let imported = Game::from_pgn(&text).unwrap();
        assert_eq!(imported.root(), game.root());
        assert_eq!(imported.line(), game.line());
    }

    #[test]
    fn result_from_position() {
        let mut game = Game::from_position(
            Position::parse_fen("6k1/5ppp/8/8/8/8/8/R6K w - - 0 1").unwrap(),
        );
        assert_eq!(game.result(), GameResult::Unknown);
        game.add_san_move("Ra8#").unwrap();
        assert_eq!(game.result(), GameResult::WhiteWins);
        game.set_header("Result", "1/2-1/2");
        assert_eq!(game.result(), GameResult::Draw);
    }

    #[test]
    fn uci_position_commands() {
        let game = Game::from_uci_position_command("position startpos moves e2e4 e7e5 g1f3").unwrap();
        assert_eq!(game.focus(), 3);
        assert_eq!(
            game.to_uci_position_command(),
            "position fen rnbqkbnr/pppp1ppp/8/4p3/4P3/8/PPPP1PPP/RNBQKBNR w KQkq e6 0 2 moves g1f3"
        );
        let replayed = Game::from_uci_position_command(&game.to_uci_position_command()).unwrap();
        assert_eq!(replayed.position(), game.position());
    }
}
