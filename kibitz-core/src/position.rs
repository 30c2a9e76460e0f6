//! Holds Position struct, the most important data structure of the crate.
//! Position represents a chess position, together with the chain of
//! positions and moves that led to it.

use std::fmt::{self, Display};
use std::sync::Arc;

use crate::coretypes::{Castling, Color, GameResult, Move, MoveCount, Piece, PieceKind, Square};
use crate::coretypes::{Color::*, PieceKind::*};
use crate::fen::Fen;
use crate::mailbox::Mailbox;
use crate::movegen as mg;
use crate::movelist::MoveList;
use crate::zobrist::{self, HashKind};

/// Halfmove clock value at which either player may claim a draw.
const FIFTY_MOVE_HALFMOVES: MoveCount = 100;

/// struct Position
/// A complete data set that can represent any chess position.
/// Positions never change after creation, [`Position::do_move`] returns a new
/// Position that keeps a shared link to the one it was made from.
/// # Members:
/// * board - a square-centric container of all pieces.
/// * side_to_move - Color of player whose turn it is.
/// * white_king, black_king - king squares, absent only on an empty board.
/// * castling - Castling rights for both players.
/// * en_passant - Indicates if en passant is possible, and for which square.
/// * halfmoves - Tracker for 50 move draw rule. Resets after capture/pawn move.
/// * ply - Number of half moves played since the start of the game.
/// * last_move - The move that produced this position from its parent.
/// * parent - The position before last_move.
#[derive(Debug, Clone)]
pub struct Position {
    board: Mailbox,
    side_to_move: Color,
    white_king: Option<Square>,
    black_king: Option<Square>,
    castling: Castling,
    en_passant: Option<Square>,
    halfmoves: MoveCount,
    ply: MoveCount,
    last_move: Option<Move>,
    parent: Option<Arc<Position>>,
}

impl Position {
    /// Standard chess start position.
    pub fn start_position() -> Self {
        Self::from_parts(
            Mailbox::start_position(),
            White,
            Castling::start_position(),
            None,
            0,
            0,
        )
    }

    /// A position with no pieces on the board. It has no legal moves and is
    /// only useful as a placeholder or as a canvas for `Mailbox` edits.
    pub fn empty() -> Self {
        Self::from_parts(Mailbox::new(), White, Castling::NONE, None, 0, 0)
    }

    /// Assemble a root position, one without history, from its parts.
    /// King squares are looked up on the board. Move lists are sized for at
    /// most 16 pieces per side; [`Fen::parse_fen`] rejects boards beyond that.
    pub fn from_parts(
        board: Mailbox,
        side_to_move: Color,
        castling: Castling,
        en_passant: Option<Square>,
        halfmoves: MoveCount,
        ply: MoveCount,
    ) -> Self {
        Self {
            white_king: board.find_king(White),
            black_king: board.find_king(Black),
            board,
            side_to_move,
            castling,
            en_passant,
            halfmoves,
            ply,
            last_move: None,
            parent: None,
        }
    }

    /// Const getters.
    pub fn board(&self) -> &Mailbox {
        &self.board
    }
    pub fn side_to_move(&self) -> Color {
        self.side_to_move
    }
    pub fn castling(&self) -> Castling {
        self.castling
    }
    pub fn en_passant(&self) -> Option<Square> {
        self.en_passant
    }
    pub fn halfmoves(&self) -> MoveCount {
        self.halfmoves
    }
    pub fn ply(&self) -> MoveCount {
        self.ply
    }
    pub fn last_move(&self) -> Option<Move> {
        self.last_move
    }
    pub fn parent(&self) -> Option<&Position> {
        self.parent.as_deref()
    }

    /// Fullmoves start at 1 and increment after each of Black's moves.
    pub fn fullmoves(&self) -> MoveCount {
        self.ply / 2 + 1
    }

    pub fn piece_on(&self, square: Square) -> Option<Piece> {
        self.board.piece_on(square)
    }

    pub fn king_square(&self, color: Color) -> Option<Square> {
        match color {
            White => self.white_king,
            Black => self.black_king,
        }
    }

    /// Returns true if move_ takes an enemy piece, directly or en-passant.
    pub fn is_capture(&self, move_: Move) -> bool {
        move_.en_passant || self.board.piece_on(move_.to).is_some()
    }

    /// Generates a new Position from applying move on current Position.
    /// `do_move` does not check if the move is legal, it simply executes it
    /// while assuming legality. The returned position has self as its parent.
    pub fn do_move(&self, move_: Move) -> Position {
        let active_piece = self.board.piece_on(move_.from);
        let is_pawn_move = matches!(active_piece, Some(piece) if piece.piece_kind == Pawn);
        let is_capture = self.is_capture(move_);

        let mut board = self.board.clone();
        board.do_move(move_);

        let mut castling = self.castling;
        castling.clear_square(move_.from);
        castling.clear_square(move_.to);

        // En Passant square is set to the skipped square after any double pawn push.
        let en_passant = match is_pawn_move {
            true if move_.from.rank_u8().abs_diff(move_.to.rank_u8()) == 2 => {
                let skipped = (move_.from as u8 + move_.to as u8) / 2;
                Square::from_u8(skipped)
            }
            _ => None,
        };

        let halfmoves = match is_pawn_move || is_capture {
            true => 0,
            false => self.halfmoves.saturating_add(1),
        };

        let (mut white_king, mut black_king) = (self.white_king, self.black_king);
        if let Some(Piece { color, piece_kind: King }) = active_piece {
            match color {
                White => white_king = Some(move_.to),
                Black => black_king = Some(move_.to),
            }
        }

        Position {
            board,
            side_to_move: !self.side_to_move,
            white_king,
            black_king,
            castling,
            en_passant,
            halfmoves,
            ply: self.ply.saturating_add(1),
            last_move: Some(move_),
            parent: Some(Arc::new(self.clone())),
        }
    }

    /// Returns true if the king of `color` is attacked by the opponent.
    /// A side without a king is never in check.
    pub fn is_color_in_check(&self, color: Color) -> bool {
        match self.king_square(color) {
            Some(king) => self.board.side_attacks_square(!color, king),
            None => false,
        }
    }

    /// Returns true if active player's king is in any check.
    pub fn is_in_check(&self) -> bool {
        self.is_color_in_check(self.side_to_move)
    }

    /// Returns true if playing pseudo-legal move_ keeps the mover's king safe.
    /// The move is simulated on a copy of the board only, which is enough
    /// to ask whether the king is attacked afterwards.
    fn keeps_king_safe(&self, move_: Move) -> bool {
        let player = self.side_to_move;
        let mut board = self.board.clone();
        board.do_move(move_);

        let king = match self.king_square(player) {
            Some(king) if king == move_.from => Some(move_.to),
            other => other,
        };
        match king {
            Some(king) => !board.side_attacks_square(!player, king),
            None => true,
        }
    }

    /// Returns a list of all pseudo-legal moves for active player.
    pub fn pseudo_legal_moves(&self) -> MoveList {
        mg::pseudo_legal_moves(self)
    }

    /// Returns a list of all legal moves for active player.
    pub fn legal_moves(&self) -> MoveList {
        let mut legal_moves = self.pseudo_legal_moves();
        legal_moves.retain(|move_| self.keeps_king_safe(*move_));
        legal_moves
    }

    /// Legal moves of the active player's piece standing on `from`.
    /// Empty if the square holds no piece of the side to move.
    pub fn moves_from(&self, from: Square) -> MoveList {
        let mut moves = MoveList::new();
        if let Some(piece) = self.board.piece_on(from) {
            if piece.color == self.side_to_move {
                mg::piece_pseudo_moves(&mut moves, self, from, piece.piece_kind);
                moves.retain(|move_| self.keeps_king_safe(*move_));
            }
        }
        moves
    }

    /// Legal moves of any active player's piece of kind `piece_kind` that land on `to`.
    /// Used to resolve and disambiguate algebraic notation.
    pub fn moves_to(&self, piece_kind: PieceKind, to: Square) -> MoveList {
        let mut moves = MoveList::new();
        let piece = Piece::new(self.side_to_move, piece_kind);

        for (from, _) in self.board.pieces().filter(|(_, p)| *p == piece) {
            let mut piece_moves = MoveList::new();
            mg::piece_pseudo_moves(&mut piece_moves, self, from, piece_kind);
            moves.extend(
                piece_moves
                    .into_iter()
                    .filter(|move_| move_.to == to && self.keeps_king_safe(*move_)),
            );
        }
        moves
    }

    /// Checks if given move is legal for current position.
    pub fn is_legal(&self, move_: Move) -> bool {
        self.moves_from(move_.from).contains(&move_)
    }

    /// Active player is in check and has no legal moves.
    pub fn is_checkmate(&self) -> bool {
        self.is_in_check() && self.legal_moves().is_empty()
    }

    /// Active player is not in check and has no legal moves.
    pub fn is_stalemate(&self) -> bool {
        !self.is_in_check() && self.legal_moves().is_empty()
    }

    /// Fifty moves by each player have passed without a capture or pawn move.
    pub fn is_fifty_move_draw(&self) -> bool {
        self.halfmoves >= FIFTY_MOVE_HALFMOVES
    }

    /// Returns true if neither side has the material to deliver mate:
    /// K vs K, K and one minor piece vs K, or K+B vs K+B with same colored bishops.
    pub fn is_insufficient_material(&self) -> bool {
        let others: Vec<(Square, Piece)> = self
            .board
            .pieces()
            .filter(|(_, piece)| piece.piece_kind != King)
            .collect();

        match others.as_slice() {
            [] => true,
            [(_, piece)] => matches!(piece.piece_kind, Knight | Bishop),
            [(square_a, a), (square_b, b)] => {
                a.piece_kind == Bishop
                    && b.piece_kind == Bishop
                    && a.color != b.color
                    && square_a.is_dark() == square_b.is_dark()
            }
            _ => false,
        }
    }

    /// Returns true if this position occurred at least three times in the game.
    /// Only ancestors since the last capture or pawn move can repeat it.
    pub fn is_threefold_repetition(&self) -> bool {
        let hash = self.hash();
        let mut occurrences = 1;
        let mut ancestor = self.parent();

        for _ in 0..self.halfmoves {
            let Some(position) = ancestor else {
                break;
            };
            if position.side_to_move == self.side_to_move && position.hash() == hash {
                occurrences += 1;
                if occurrences >= 3 {
                    return true;
                }
            }
            ancestor = position.parent();
        }
        false
    }

    /// Result decided by the position alone, Unknown if the game may go on.
    pub fn result(&self) -> GameResult {
        if self.legal_moves().is_empty() {
            return match self.is_in_check() {
                true => GameResult::win_for(!self.side_to_move),
                false => GameResult::Draw,
            };
        }
        if self.is_fifty_move_draw()
            || self.is_insufficient_material()
            || self.is_threefold_repetition()
        {
            return GameResult::Draw;
        }
        GameResult::Unknown
    }

    /// Zobrist hash of the position, which excludes counters and history.
    pub fn hash(&self) -> HashKind {
        zobrist::hash(self)
    }
}

/// Positions are equal when everything a FEN string records is equal.
/// History links are not compared.
impl PartialEq for Position {
    fn eq(&self, other: &Self) -> bool {
        self.board == other.board
            && self.side_to_move == other.side_to_move
            && self.castling == other.castling
            && self.en_passant == other.en_passant
            && self.halfmoves == other.halfmoves
            && self.ply == other.ply
    }
}

impl Eq for Position {}

/// Defaults to standard chess start position.
impl Default for Position {
    fn default() -> Self {
        Self::start_position()
    }
}

/// Displays pretty-printed chess board and Fen string representing Position.
impl Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}\n Fen: {}\n", self.board, self.to_fen())
    }
}
