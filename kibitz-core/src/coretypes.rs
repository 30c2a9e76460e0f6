//! The fundamental and simple types of `kibitz_core`.

use std::convert::TryFrom;
use std::fmt::{self, Display, Write};
use std::mem::replace;
use std::ops::{BitOr, Not};
use std::str::FromStr;

use crate::error::{self, ErrorKind};

///////////////
// Constants //
///////////////
pub const NUM_FILES: usize = 8; // A, B, C, D, E, F, G, H
pub const NUM_RANKS: usize = 8; // 1, 2, 3, 4, 5, 6, 7, 8
pub const NUM_SQUARES: usize = NUM_FILES * NUM_RANKS;

// 6 Black, 6 White of Pawn, Knight, Bishop, Rook, Queen, King.
pub const NUM_PIECE_KINDS: usize = 12;

// The max possible measured number of legal moves for any chess position is 218.
// Pseudo-legal lists share the type, so the bound covers any board with at most
// 16 pieces per side: 15 pieces reaching at most 27 squares like a queen, plus a
// king with 8 steps and 2 castles.
pub const MAX_MOVES: usize = 15 * 27 + 8 + 2;

/// Most pieces, and most pawns, a side can hold in a real game.
pub const MAX_PIECES_PER_SIDE: usize = 16;
pub const MAX_PAWNS_PER_SIDE: usize = 8;

/////////////////////////
// Data and Structures //
/////////////////////////

/// Counter for half-move clock, plies and full-moves.
pub type MoveCount = u16;

/// Color can represent the color of a piece, or a player.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Color {
    White,
    Black,
}

/// Enum variant order and discriminant are important.
/// Must be contiguous and start from 0.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum PieceKind {
    Pawn,
    Knight,
    Bishop,
    Rook,
    Queen,
    King,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct Piece {
    pub(crate) color: Color,
    pub(crate) piece_kind: PieceKind,
}

/// Observe Castling rights for a position.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct Castling(u8);

/// Castling Enum constants.
impl Castling {
    pub const W_KING: Castling = Castling(0b00000001);
    pub const W_QUEEN: Castling = Castling(0b00000010);
    pub const B_KING: Castling = Castling(0b00000100);
    pub const B_QUEEN: Castling = Castling(0b00001000);
    pub const W_SIDE: Castling = Castling(Self::W_KING.0 | Self::W_QUEEN.0);
    pub const B_SIDE: Castling = Castling(Self::B_KING.0 | Self::B_QUEEN.0);
    pub const ALL: Castling = Castling(Self::W_SIDE.0 | Self::B_SIDE.0);
    pub const NONE: Castling = Castling(0u8);
    pub const ENUMERATIONS: usize = 16; // 16 possibilities for castling rights.
}

/// Enum variant order and discriminant must be contiguous, start from 0,
/// and be in ascending order ABCDEFGH.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[rustfmt::skip]
#[repr(u8)]
pub enum File {
    A, B, C, D, E, F, G, H = 7u8,
}

/// Enum variant order and discriminant must be contiguous, start from 0,
/// and be in ascending order 12345678.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[rustfmt::skip]
#[repr(u8)]
pub enum Rank {
    R1, R2, R3, R4, R5, R6, R7, R8 = 7u8,
}

/// Square
/// Every possible square on a chess board, in the compressed 0-63 encoding
/// used for moves and algebraic text. The extended board encoding lives in
/// [`crate::tables`].
/// WARNING: The exact ordering of enums is important for their discriminants.
///          Changing the discriminant of any variant is breaking.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[rustfmt::skip]
#[repr(u8)]
pub enum Square {
    A1, B1, C1, D1, E1, F1, G1, H1,
    A2, B2, C2, D2, E2, F2, G2, H2,
    A3, B3, C3, D3, E3, F3, G3, H3,
    A4, B4, C4, D4, E4, F4, G4, H4,
    A5, B5, C5, D5, E5, F5, G5, H5,
    A6, B6, C6, D6, E6, F6, G6, H6,
    A7, B7, C7, D7, E7, F7, G7, H7,
    A8, B8, C8, D8, E8, F8, G8, H8 = 63u8,
}

/// Move
/// A single chess "half move", or "ply", with the flags needed to apply it
/// to a board without looking anything else up.
/// Equality is by value, flags included.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct Move {
    pub(crate) from: Square,
    pub(crate) to: Square,
    pub(crate) promotion: Option<PieceKind>,
    pub(crate) castle: bool,
    pub(crate) en_passant: bool,
}

/// Outcome of a game, as written in a PGN termination marker or `Result` tag.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum GameResult {
    WhiteWins,
    BlackWins,
    Draw,
    Unknown,
}

////////////
// Traits //
////////////

/// SquareIndexable
/// A chessboard has 64 squares on it. SquareIndexable can be implemented
/// for types whose values can map directly to a chess Square's index.
pub trait SquareIndexable {
    /// idx(&self) must return a number between 0-63 inclusive, representing
    /// a square on a chess board in little-endian, rank-file order.
    fn idx(&self) -> usize;
}

// Blanket impl on references of types that are SquareIndexable.
impl<I: SquareIndexable> SquareIndexable for &I {
    fn idx(&self) -> usize {
        I::idx(*self)
    }
}

//////////////////////
/// Implementations //
//////////////////////

impl Color {
    /// FEN compliant conversion.
    pub const fn to_char(&self) -> char {
        match self {
            Color::White => 'w',
            Color::Black => 'b',
        }
    }

    pub const fn iter() -> ColorIterator {
        ColorIterator::new()
    }
}

impl Not for Color {
    type Output = Self;
    fn not(self) -> Self::Output {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }
}

impl Not for &Color {
    type Output = Color;
    fn not(self) -> Self::Output {
        Color::not(*self)
    }
}

impl From<Color> for char {
    fn from(color: Color) -> Self {
        color.to_char()
    }
}

impl TryFrom<char> for Color {
    type Error = error::Error;
    fn try_from(ch: char) -> error::Result<Self> {
        match ch {
            'w' => Ok(Color::White),
            'b' => Ok(Color::Black),
            _ => Err((ErrorKind::ParseColorMalformed, "char is not w|b").into()),
        }
    }
}

impl Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_char(char::from(*self))
    }
}

pub struct ColorIterator {
    maybe_color: Option<Color>,
}

impl ColorIterator {
    pub const fn new() -> Self {
        Self {
            maybe_color: Some(Color::White),
        }
    }
}

impl Iterator for ColorIterator {
    type Item = Color;
    fn next(&mut self) -> Option<Self::Item> {
        let value = match self.maybe_color {
            Some(Color::White) => Some(Color::Black),
            Some(Color::Black) | None => None,
        };
        replace(&mut self.maybe_color, value)
    }
}

impl PieceKind {
    /// FEN compliant conversion, defaults as white pieces.
    pub const fn to_char(&self) -> char {
        match self {
            PieceKind::Pawn => 'P',
            PieceKind::Rook => 'R',
            PieceKind::Knight => 'N',
            PieceKind::Bishop => 'B',
            PieceKind::Queen => 'Q',
            PieceKind::King => 'K',
        }
    }

    /// Parses an uppercase SAN piece letter. Pawns have no SAN letter.
    pub const fn from_san_char(ch: char) -> Option<Self> {
        match ch {
            'N' => Some(PieceKind::Knight),
            'B' => Some(PieceKind::Bishop),
            'R' => Some(PieceKind::Rook),
            'Q' => Some(PieceKind::Queen),
            'K' => Some(PieceKind::King),
            _ => None,
        }
    }

    /// Returns true if PieceKind can slide, false otherwise.
    /// Sliding piece_kinds are Rooks, Bishops, and Queens.
    pub const fn is_sliding(&self) -> bool {
        matches!(self, PieceKind::Rook | PieceKind::Bishop | PieceKind::Queen)
    }

    pub const fn iter() -> PieceKindIterator {
        PieceKindIterator::new()
    }
}

pub struct PieceKindIterator {
    maybe_piece_kind: Option<PieceKind>,
}

impl PieceKindIterator {
    pub const fn new() -> Self {
        Self {
            maybe_piece_kind: Some(PieceKind::Pawn),
        }
    }
}

impl Iterator for PieceKindIterator {
    type Item = PieceKind;
    fn next(&mut self) -> Option<Self::Item> {
        let value = match self.maybe_piece_kind {
            Some(PieceKind::Pawn) => Some(PieceKind::Knight),
            Some(PieceKind::Knight) => Some(PieceKind::Bishop),
            Some(PieceKind::Bishop) => Some(PieceKind::Rook),
            Some(PieceKind::Rook) => Some(PieceKind::Queen),
            Some(PieceKind::Queen) => Some(PieceKind::King),
            Some(PieceKind::King) | None => None,
        };
        replace(&mut self.maybe_piece_kind, value)
    }
}

impl Piece {
    pub const fn new(color: Color, piece_kind: PieceKind) -> Self {
        Piece { color, piece_kind }
    }
    /// Immutable Getters.
    pub const fn color(&self) -> Color {
        self.color
    }
    pub const fn piece_kind(&self) -> PieceKind {
        self.piece_kind
    }

    /// Dense index of this piece in 0..NUM_PIECE_KINDS, white pieces first.
    pub const fn index(&self) -> usize {
        let color_offset = match self.color {
            Color::White => 0,
            Color::Black => NUM_PIECE_KINDS / 2,
        };
        color_offset + self.piece_kind as usize
    }

    pub const fn to_char(&self) -> char {
        match self.color {
            Color::White => self.piece_kind.to_char(),
            Color::Black => self.piece_kind.to_char().to_ascii_lowercase(),
        }
    }
}

impl From<Piece> for char {
    fn from(piece: Piece) -> Self {
        piece.to_char()
    }
}

impl TryFrom<char> for Piece {
    type Error = error::Error;
    fn try_from(value: char) -> error::Result<Self> {
        let color = match value.is_ascii_uppercase() {
            true => Color::White,
            false => Color::Black,
        };
        let piece_kind = match value.to_ascii_uppercase() {
            'P' => PieceKind::Pawn,
            'R' => PieceKind::Rook,
            'N' => PieceKind::Knight,
            'B' => PieceKind::Bishop,
            'Q' => PieceKind::Queen,
            'K' => PieceKind::King,
            _ => {
                return Err((
                    ErrorKind::ParsePieceMalformed,
                    "char is not in PRNBQKprnbqk",
                )
                    .into())
            }
        };
        Ok(Piece { color, piece_kind })
    }
}

impl Display for Piece {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_char(char::from(*self))
    }
}

impl Castling {
    /// Make new Castling with all rights of initial chess position.
    pub const fn start_position() -> Self {
        Self::ALL
    }

    /// Returns underlying bits used to represent Castling rights.
    pub const fn bits(&self) -> u8 {
        self.0
    }

    /// Returns true if there are no castling rights.
    pub const fn is_none(&self) -> bool {
        self.0 == 0u8
    }

    /// Returns true if Castling mask has all of provided bits.
    pub fn has(&self, rights: Castling) -> bool {
        debug_assert!(rights.is_mask_valid());
        self.0 & rights.0 == rights.0
    }

    /// Set given bits to '1' on Castling mask.
    pub fn set(&mut self, rights: Castling) {
        debug_assert!(rights.is_mask_valid());
        self.0 |= rights.0;
    }

    /// Set given bits to '0' on Castling mask.
    pub fn clear(&mut self, rights: Castling) {
        debug_assert!(rights.is_mask_valid());
        self.0 &= !rights.0;
    }

    /// Removes all castling rights for a color.
    pub fn clear_color(&mut self, color: Color) {
        match color {
            Color::White => self.clear(Self::W_SIDE),
            Color::Black => self.clear(Self::B_SIDE),
        }
    }

    /// Clears every right that depends on a piece standing on `square`.
    /// Called for both the origin and the target of every move, so rights
    /// are lost when a king or rook leaves home or a rook is captured there.
    pub fn clear_square(&mut self, square: Square) {
        match square {
            Square::E1 => self.clear_color(Color::White),
            Square::E8 => self.clear_color(Color::Black),
            Square::H1 => self.clear(Self::W_KING),
            Square::A1 => self.clear(Self::W_QUEEN),
            Square::H8 => self.clear(Self::B_KING),
            Square::A8 => self.clear(Self::B_QUEEN),
            _ => (),
        }
    }

    /// Returns true if all bits set in Castling are valid, and false otherwise.
    pub const fn is_mask_valid(&self) -> bool {
        self.0 <= Self::ALL.0
    }
}

/// Defaults to Castling rights for starting chess position, ALL.
impl Default for Castling {
    fn default() -> Self {
        Self::start_position()
    }
}

impl BitOr for Castling {
    type Output = Self;
    fn bitor(self, rhs: Self) -> Self::Output {
        Self(self.0 | rhs.0)
    }
}

/// Displays in FEN-component format.
impl Display for Castling {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let mut castling_str = String::with_capacity(4);

        if self.is_none() {
            castling_str.push('-');
        } else {
            if self.has(Self::W_KING) {
                castling_str.push('K');
            }
            if self.has(Self::W_QUEEN) {
                castling_str.push('Q');
            }
            if self.has(Self::B_KING) {
                castling_str.push('k');
            }
            if self.has(Self::B_QUEEN) {
                castling_str.push('q');
            }
        }
        f.write_str(&castling_str)
    }
}

/// Castling ::= '-' | ['K'] ['Q'] ['k'] ['q']
impl FromStr for Castling {
    type Err = error::Error;
    fn from_str(s: &str) -> error::Result<Self> {
        if s == "-" {
            return Ok(Castling::NONE);
        }
        if s.is_empty() || s.len() > 4 {
            return Err((ErrorKind::ParseCastlingMalformed, "expected - or 1-4 of KQkq").into());
        }

        let mut castling_rights = Castling::NONE;
        for ch in s.chars() {
            match ch {
                'K' => castling_rights.set(Self::W_KING),
                'Q' => castling_rights.set(Self::W_QUEEN),
                'k' => castling_rights.set(Self::B_KING),
                'q' => castling_rights.set(Self::B_QUEEN),
                _ => return Err((ErrorKind::ParseCastlingMalformed, "char not of KQkq").into()),
            };
        }
        Ok(castling_rights)
    }
}

impl File {
    /// File enum variants cover all u8 values from 0-7 inclusive.
    pub const fn from_u8(value: u8) -> Option<Self> {
        use File::*;
        match value {
            0 => Some(A),
            1 => Some(B),
            2 => Some(C),
            3 => Some(D),
            4 => Some(E),
            5 => Some(F),
            6 => Some(G),
            7 => Some(H),
            _ => None,
        }
    }
    /// Get the character representation of File, in lowercase.
    pub const fn to_char(&self) -> char {
        (b'a' + *self as u8) as char
    }
}

impl Rank {
    /// Rank enum variants cover all u8 values from 0-7 inclusive.
    pub const fn from_u8(value: u8) -> Option<Self> {
        use Rank::*;
        match value {
            0 => Some(R1),
            1 => Some(R2),
            2 => Some(R3),
            3 => Some(R4),
            4 => Some(R5),
            5 => Some(R6),
            6 => Some(R7),
            7 => Some(R8),
            _ => None,
        }
    }
    pub const fn to_char(&self) -> char {
        (b'1' + *self as u8) as char
    }
}

impl TryFrom<char> for File {
    type Error = error::Error;
    fn try_from(ch: char) -> error::Result<Self> {
        match ch {
            'a'..='h' => Ok(Self::from_u8(ch as u8 - b'a').ok_or(ErrorKind::ParseFileMalformed)?),
            _ => Err((ErrorKind::ParseFileMalformed, "file char not of abcdefgh").into()),
        }
    }
}

impl TryFrom<char> for Rank {
    type Error = error::Error;
    fn try_from(ch: char) -> error::Result<Self> {
        match ch {
            '1'..='8' => Ok(Self::from_u8(ch as u8 - b'1').ok_or(ErrorKind::ParseRankMalformed)?),
            _ => Err((ErrorKind::ParseRankMalformed, "rank char not of 12345678").into()),
        }
    }
}

impl Display for File {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_char(self.to_char())
    }
}

impl Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_char(self.to_char())
    }
}

impl SquareIndexable for (File, Rank) {
    fn idx(&self) -> usize {
        let &(file, rank) = self;
        NUM_FILES * rank as usize + file as usize
    }
}

pub struct SquareIterator {
    square_discriminant: u8,
}

impl Square {
    #[rustfmt::skip]
    const ALL: [Square; NUM_SQUARES] = {
        use Square::*;
        [
            A1, B1, C1, D1, E1, F1, G1, H1,
            A2, B2, C2, D2, E2, F2, G2, H2,
            A3, B3, C3, D3, E3, F3, G3, H3,
            A4, B4, C4, D4, E4, F4, G4, H4,
            A5, B5, C5, D5, E5, F5, G5, H5,
            A6, B6, C6, D6, E6, F6, G6, H6,
            A7, B7, C7, D7, E7, F7, G7, H7,
            A8, B8, C8, D8, E8, F8, G8, H8,
        ]
    };

    /// Square enum variants cover all u8 values from 0-63 inclusive.
    pub const fn from_u8(value: u8) -> Option<Self> {
        if (value as usize) < NUM_SQUARES {
            Some(Self::ALL[value as usize])
        } else {
            None
        }
    }
    pub const fn from_file_rank(file: File, rank: Rank) -> Self {
        Self::ALL[rank as usize * NUM_FILES + file as usize]
    }

    pub const fn iter() -> SquareIterator {
        SquareIterator::new()
    }

    pub const fn file(&self) -> File {
        Self::ALL_FILES[self.file_u8() as usize]
    }

    pub const fn rank(&self) -> Rank {
        Self::ALL_RANKS[self.rank_u8() as usize]
    }

    #[rustfmt::skip]
    const ALL_FILES: [File; NUM_FILES] = [File::A, File::B, File::C, File::D, File::E, File::F, File::G, File::H];
    #[rustfmt::skip]
    const ALL_RANKS: [Rank; NUM_RANKS] = [Rank::R1, Rank::R2, Rank::R3, Rank::R4, Rank::R5, Rank::R6, Rank::R7, Rank::R8];

    /// Returns 0-based file (0,1,2,3,4,5,6,7), not 1-based chess file.
    pub const fn file_u8(&self) -> u8 {
        *self as u8 % NUM_FILES as u8
    }

    /// Returns 0-based rank (0,1,2,3,4,5,6,7), not 1-based chess rank.
    pub const fn rank_u8(&self) -> u8 {
        *self as u8 / NUM_FILES as u8
    }

    /// Returns true for dark squares (a1 is dark).
    pub const fn is_dark(&self) -> bool {
        (self.file_u8() + self.rank_u8()) % 2 == 0
    }
}

impl SquareIterator {
    const fn new() -> Self {
        Self {
            square_discriminant: Square::A1 as u8,
        }
    }
}

impl Iterator for SquareIterator {
    type Item = Square;
    fn next(&mut self) -> Option<Self::Item> {
        let maybe_item = Square::from_u8(self.square_discriminant);
        if self.square_discriminant <= Square::H8 as u8 {
            self.square_discriminant += 1;
        }
        maybe_item
    }
}

impl From<(File, Rank)> for Square {
    fn from((file, rank): (File, Rank)) -> Self {
        Self::from_file_rank(file, rank)
    }
}

/// Square::= <fileLetter><rankNumber>
impl FromStr for Square {
    type Err = error::Error;
    fn from_str(s: &str) -> error::Result<Self> {
        let mut chars = s.chars();
        let file = File::try_from(chars.next().ok_or(ErrorKind::ParseSquareMalformed)?)?;
        let rank = Rank::try_from(chars.next().ok_or(ErrorKind::ParseSquareMalformed)?)?;
        if chars.next().is_some() {
            return Err((ErrorKind::ParseSquareMalformed, "trailing characters").into());
        }
        Ok(Square::from((file, rank)))
    }
}

impl Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}{}", self.file(), self.rank())
    }
}

impl SquareIndexable for Square {
    fn idx(&self) -> usize {
        *self as usize
    }
}

impl Move {
    /// A plain move, or a promotion if `promotion` is set.
    pub const fn new(from: Square, to: Square, promotion: Option<PieceKind>) -> Self {
        Self {
            from,
            to,
            promotion,
            castle: false,
            en_passant: false,
        }
    }

    /// A castling move, described by the king's origin and target squares.
    pub const fn castle(from: Square, to: Square) -> Self {
        Self {
            castle: true,
            ..Self::new(from, to, None)
        }
    }

    /// A pawn capturing en-passant onto the en-passant target square `to`.
    pub const fn en_passant(from: Square, to: Square) -> Self {
        Self {
            en_passant: true,
            ..Self::new(from, to, None)
        }
    }

    // Immutable Getters
    pub const fn from(&self) -> Square {
        self.from
    }
    pub const fn to(&self) -> Square {
        self.to
    }
    pub const fn promotion(&self) -> Option<PieceKind> {
        self.promotion
    }
    pub const fn is_castle(&self) -> bool {
        self.castle
    }
    pub const fn is_en_passant(&self) -> bool {
        self.en_passant
    }
}

/// Pure coordinate form, as used by UCI.
/// # Example
/// Move { from: A7, to: B8, promotion: Some(Queen) } -> `a7b8q`.
impl Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}{}", self.from, self.to)?;
        if let Some(piece_kind) = self.promotion {
            f.write_char(piece_kind.to_char().to_ascii_lowercase())?;
        }
        Ok(())
    }
}

impl GameResult {
    /// PGN termination marker for this result.
    pub const fn as_str(&self) -> &'static str {
        match self {
            GameResult::WhiteWins => "1-0",
            GameResult::BlackWins => "0-1",
            GameResult::Draw => "1/2-1/2",
            GameResult::Unknown => "*",
        }
    }

    /// Result where `color` is the side that won.
    pub const fn win_for(color: Color) -> Self {
        match color {
            Color::White => GameResult::WhiteWins,
            Color::Black => GameResult::BlackWins,
        }
    }
}

impl Default for GameResult {
    fn default() -> Self {
        GameResult::Unknown
    }
}

impl Display for GameResult {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result ::= '1-0' | '0-1' | '1/2-1/2' | '*'
impl FromStr for GameResult {
    type Err = error::Error;
    fn from_str(s: &str) -> error::Result<Self> {
        match s {
            "1-0" => Ok(GameResult::WhiteWins),
            "0-1" => Ok(GameResult::BlackWins),
            "1/2-1/2" => Ok(GameResult::Draw),
            "*" => Ok(GameResult::Unknown),
            _ => Err((ErrorKind::ParseResultMalformed, s).into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use PieceKind::*;
    use Square::*;

    #[test]
    fn logical_not_color() {
        assert_eq!(!Color::White, Color::Black);
        assert_eq!(!Color::Black, Color::White);
    }

    #[test]
    fn castling_logical_ops() {
        let mut cr = Castling::default();
        assert!(cr.has(Castling::ALL));
        assert!(cr.has(Castling::W_SIDE));
        assert!(cr.has(Castling::B_SIDE));
        assert!(!cr.is_none());

        cr.clear(Castling::W_KING);
        assert!(!cr.has(Castling::ALL));
        assert!(!cr.has(Castling::W_KING));
        assert!(cr.has(Castling::W_QUEEN));
        assert!(!cr.has(Castling::W_SIDE));
        assert!(cr.has(Castling::B_SIDE));

        cr.clear(Castling::W_QUEEN);
        cr.clear(Castling::B_KING);
        assert!(cr.has(Castling::B_QUEEN));
        assert!(!cr.has(Castling::B_SIDE));

        cr.clear(Castling::B_QUEEN);
        assert!(cr.is_none());
    }

    #[test]
    fn castling_cleared_by_home_squares() {
        let mut cr = Castling::ALL;
        cr.clear_square(H1);
        assert_eq!(cr, Castling::W_QUEEN | Castling::B_SIDE);
        cr.clear_square(E4);
        assert_eq!(cr, Castling::W_QUEEN | Castling::B_SIDE);
        cr.clear_square(E8);
        assert_eq!(cr, Castling::W_QUEEN);
        cr.clear_square(A1);
        assert!(cr.is_none());

        let mut cr = Castling::ALL;
        cr.clear_square(E1);
        assert_eq!(cr, Castling::B_SIDE);
    }

    #[test]
    fn castling_to_from_string() {
        assert_eq!(Castling::from_str("-").unwrap(), Castling::NONE);
        assert_eq!(Castling::from_str("K").unwrap(), Castling::W_KING);
        assert_eq!(
            Castling::from_str("Kk").unwrap(),
            Castling::W_KING | Castling::B_KING
        );
        assert_eq!(Castling::from_str("KQkq").unwrap(), Castling::ALL);
        assert_eq!(
            Castling::from_str("Qq").unwrap(),
            Castling::W_QUEEN | Castling::B_QUEEN
        );
        assert!(Castling::from_str("").is_err());
        assert!(Castling::from_str("x").is_err());
        assert_eq!(Castling::ALL.to_string(), "KQkq");
        assert_eq!(Castling::NONE.to_string(), "-");
    }

    #[test]
    fn square_to_from_string() {
        for (text, square) in [("a1", A1), ("a8", A8), ("b7", B7), ("e4", E4), ("h8", H8)] {
            assert_eq!(Square::from_str(text).unwrap(), square);
            assert_eq!(square.to_string(), text);
        }
        assert!(Square::from_str("A1").is_err());
        assert!(Square::from_str("X3").is_err());
        assert!(Square::from_str("a$").is_err());
        assert!(Square::from_str("g").is_err());
        assert!(Square::from_str("a11").is_err());
    }

    #[test]
    fn square_to_from_file_rank() {
        use File::*;
        use Rank::*;
        let a1 = Square::from((A, R1));
        assert_eq!(a1.file(), A);
        assert_eq!(a1.rank(), R1);

        let h8 = Square::from((H, R8));
        assert_eq!(h8.file(), H);
        assert_eq!(h8.rank(), R8);
        assert_eq!(h8.file_u8(), H as u8);
        assert_eq!(h8.rank_u8(), R8 as u8);

        let e4 = Square::from((E, R4));
        assert_eq!(e4, E4);
        assert!(A1.is_dark());
        assert!(!H1.is_dark());
    }

    #[test]
    fn square_iterator_covers_board() {
        let squares: Vec<Square> = Square::iter().collect();
        assert_eq!(squares.len(), NUM_SQUARES);
        assert_eq!(squares[0], A1);
        assert_eq!(squares[63], H8);
    }

    #[test]
    fn display_move_coordinates() {
        assert_eq!(Move::new(E2, E4, None).to_string(), "e2e4");
        assert_eq!(Move::new(H7, H8, Some(Queen)).to_string(), "h7h8q");
        assert_eq!(Move::castle(E1, G1).to_string(), "e1g1");
        assert_ne!(Move::castle(E1, G1), Move::new(E1, G1, None));
    }

    #[test]
    fn piece_index_is_dense() {
        let mut seen = [false; NUM_PIECE_KINDS];
        for color in Color::iter() {
            for piece_kind in PieceKind::iter() {
                seen[Piece::new(color, piece_kind).index()] = true;
            }
        }
        assert!(seen.iter().all(|&s| s));
    }

    #[test]
    fn game_result_tokens() {
        for result in [
            GameResult::WhiteWins,
            GameResult::BlackWins,
            GameResult::Draw,
            GameResult::Unknown,
        ] {
            assert_eq!(result.as_str().parse::<GameResult>().unwrap(), result);
        }
        assert!("1-1".parse::<GameResult>().is_err());
    }
}
