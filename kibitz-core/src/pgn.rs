//! Portable Game Notation
//!
//! A recursive-descent parser turning PGN text into headers and a token
//! stream, and a writer turning them back into text.
//!
//! Grammar:
//! ```text
//! pgn         := tag_pair* movetext
//! tag_pair    := '[' name '"' value '"' ']'
//! movetext    := (move_number | move | comment | nag | variation | termination)*
//! move_number := digits ('.' | '...')
//! variation   := '(' movetext ')'
//! comment     := '{' any char but '}' '}' | ';' rest of line
//! nag         := '$' digits
//! termination := '1-0' | '0-1' | '1/2-1/2' | '*'
//! move        := any run of characters but whitespace and parentheses
//! ```
//! Suffix annotations written on a move, such as `e4!?`, are split off into
//! their numeric glyph.

use std::fmt::{self, Display};
use std::str::FromStr;

use log::debug;

use crate::coretypes::GameResult;
use crate::error::{self, ErrorKind};

/// One element of PGN movetext.
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub enum PgnToken {
    /// `12.` or, when the next move is Black's, `12...`.
    MoveNumber { number: u32, continuation: bool },
    /// Move text as written, usually SAN.
    Move(String),
    Comment(String),
    /// Numeric annotation glyph, `$n`.
    Nag(u32),
    /// Alternative continuation replacing the move just before it.
    Variation(Vec<PgnToken>),
    Termination(GameResult),
}

/// Headers and movetext of one game.
#[derive(Debug, Clone, Default, Eq, PartialEq, Hash)]
pub struct Pgn {
    /// Tag pairs in order of appearance.
    pub headers: Vec<(String, String)>,
    pub moves: Vec<PgnToken>,
}

/// Controls how games are written as PGN.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct WriteOptions {
    /// Movetext lines are wrapped before exceeding this many characters.
    pub max_line_len: usize,
    pub comments: bool,
    pub glyphs: bool,
    pub variations: bool,
}

impl Default for WriteOptions {
    fn default() -> Self {
        Self {
            max_line_len: 80,
            comments: true,
            glyphs: true,
            variations: true,
        }
    }
}

/// Parse the text of a single game.
///
/// Variations are parsed by recursion, so nesting depth is bounded only
/// by the stack available to the calling thread.
pub fn parse(text: &str) -> error::Result<Pgn> {
    let mut parser = Parser::new(text);
    let pgn = parser.game()?;
    parser.skip_whitespace();
    match parser.peek() {
        None => Ok(pgn),
        Some(_) => Err(parser.error(ErrorKind::PgnUnexpectedToken, "text after game termination")),
    }
}

/// Parse every game of a PGN database. Each game but the last must end
/// with a termination marker.
pub fn parse_all(text: &str) -> error::Result<Vec<Pgn>> {
    let mut parser = Parser::new(text);
    let mut games = Vec::new();
    loop {
        parser.skip_whitespace();
        if parser.peek().is_none() {
            return Ok(games);
        }
        games.push(parser.game()?);
    }
}

impl Pgn {
    pub fn new() -> Self {
        Self::default()
    }

    /// Value of the first header named `name`.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Result given by the termination marker, or by the `Result` header if
    /// the movetext has none.
    pub fn result(&self) -> Option<GameResult> {
        self.moves
            .iter()
            .rev()
            .find_map(|token| match token {
                PgnToken::Termination(result) => Some(*result),
                _ => None,
            })
            .or_else(|| self.header("Result")?.parse().ok())
    }

    /// Write as PGN text, tag pairs first, then the wrapped movetext.
    pub fn write(&self, options: &WriteOptions) -> String {
        let mut text = String::new();
        for (name, value) in &self.headers {
            text.push_str(&format!("[{} \"{}\"]\n", name, escape(value)));
        }
        if !self.headers.is_empty() {
            text.push('\n');
        }

        let mut words = Vec::new();
        movetext_words(&self.moves, &mut words);
        text.push_str(&wrap(&words, options.max_line_len));
        text.push('\n');
        text
    }
}

impl FromStr for Pgn {
    type Err = error::Error;
    fn from_str(s: &str) -> error::Result<Self> {
        parse(s)
    }
}

impl Display for Pgn {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.write(&WriteOptions::default()))
    }
}

/// Numeric glyphs of the traditional suffix annotations.
fn suffix_glyph(suffix: &str) -> Option<u32> {
    match suffix {
        "!" => Some(1),
        "?" => Some(2),
        "!!" => Some(3),
        "??" => Some(4),
        "!?" => Some(5),
        "?!" => Some(6),
        _ => None,
    }
}

/// Comments may span lines. Runs of whitespace inside them read as one space.
fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<&str>>().join(" ")
}

fn escape(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}

struct Parser<'a> {
    text: &'a str,
    offset: usize,
}

impl<'a> Parser<'a> {
    fn new(text: &'a str) -> Self {
        Self { text, offset: 0 }
    }

    fn rest(&self) -> &'a str {
        &self.text[self.offset..]
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.offset += ch.len_utf8();
        Some(ch)
    }

    fn eat(&mut self, expected: char) -> bool {
        match self.peek() {
            Some(ch) if ch == expected => {
                self.bump();
                true
            }
            _ => false,
        }
    }

    /// Consume characters while `predicate` holds, returning them.
    fn take_while(&mut self, predicate: impl Fn(char) -> bool) -> &'a str {
        let start = self.offset;
        while matches!(self.peek(), Some(ch) if predicate(ch)) {
            self.bump();
        }
        &self.text[start..self.offset]
    }

    fn skip_whitespace(&mut self) {
        self.take_while(char::is_whitespace);
    }

    fn error(&self, kind: ErrorKind, reason: &str) -> error::Error {
        debug!("pgn parse failed at byte {}: {} ({})", self.offset, reason, kind);
        (kind, format!("at byte {}: {}", self.offset, reason)).into()
    }

    fn game(&mut self) -> error::Result<Pgn> {
        let headers = self.headers()?;
        let moves = self.movetext(false)?;
        Ok(Pgn { headers, moves })
    }

    fn headers(&mut self) -> error::Result<Vec<(String, String)>> {
        let mut headers = Vec::new();
        loop {
            self.skip_whitespace();
            if !self.eat('[') {
                return Ok(headers);
            }
            headers.push(self.tag_pair()?);
        }
    }

    /// Parse the remainder of a tag pair after its opening bracket.
    fn tag_pair(&mut self) -> error::Result<(String, String)> {
        self.skip_whitespace();
        let name = self.take_while(|ch| ch.is_alphanumeric() || ch == '_');
        if name.is_empty() {
            return Err(self.error(ErrorKind::PgnHeaderMalformed, "missing tag name"));
        }

        self.skip_whitespace();
        if !self.eat('"') {
            return Err(self.error(ErrorKind::PgnHeaderMalformed, "missing opening quote"));
        }
        let mut value = String::new();
        loop {
            match self.bump() {
                Some('"') => break,
                Some('\\') => match self.bump() {
                    Some(escaped) => value.push(escaped),
                    None => break,
                },
                Some(ch) => value.push(ch),
                None => {
                    return Err(self.error(ErrorKind::PgnHeaderMalformed, "missing closing quote"))
                }
            }
        }

        self.skip_whitespace();
        if !self.eat(']') {
            return Err(self.error(ErrorKind::PgnHeaderMalformed, "missing closing bracket"));
        }
        Ok((name.to_string(), value))
    }

    /// Parse tokens until the end of input, a closing parenthesis when
    /// inside a variation, or a termination marker at the top level.
    fn movetext(&mut self, in_variation: bool) -> error::Result<Vec<PgnToken>> {
        let mut tokens = Vec::new();
        loop {
            self.skip_whitespace();
            let Some(ch) = self.peek() else {
                return match in_variation {
                    true => Err(self.error(ErrorKind::PgnUnterminatedVariation, "missing `)`")),
                    false => Ok(tokens),
                };
            };

            match ch {
                ')' if in_variation => {
                    self.bump();
                    return Ok(tokens);
                }
                '(' => {
                    self.bump();
                    tokens.push(PgnToken::Variation(self.movetext(true)?));
                }
                '{' => {
                    self.bump();
                    let comment = self.take_while(|ch| ch != '}');
                    if !self.eat('}') {
                        return Err(self.error(ErrorKind::PgnUnterminatedComment, "missing `}`"));
                    }
                    tokens.push(PgnToken::Comment(collapse_whitespace(comment)));
                }
                ';' => {
                    self.bump();
                    let comment = self.take_while(|ch| ch != '\n');
                    tokens.push(PgnToken::Comment(collapse_whitespace(comment)));
                }
                '$' => {
                    self.bump();
                    let digits = self.take_while(|ch| ch.is_ascii_digit());
                    let nag = digits
                        .parse()
                        .map_err(|_| self.error(ErrorKind::PgnNumberMalformed, "glyph digits"))?;
                    tokens.push(PgnToken::Nag(nag));
                }
                ')' | '}' | '[' | ']' => {
                    return Err(self.error(ErrorKind::PgnUnexpectedToken, "stray bracket"));
                }
                _ => {
                    if let Some(result) = self.termination() {
                        tokens.push(PgnToken::Termination(result));
                        if !in_variation {
                            return Ok(tokens);
                        }
                    } else if ch.is_ascii_digit() && !self.rest().starts_with("0-0") {
                        tokens.push(self.move_number()?);
                    } else {
                        self.san_move(&mut tokens)?;
                    }
                }
            }
        }
    }

    /// Consume a termination marker if one starts here and ends a token.
    fn termination(&mut self) -> Option<GameResult> {
        for marker in ["1-0", "0-1", "1/2-1/2", "*"] {
            let Some(after) = self.rest().strip_prefix(marker) else {
                continue;
            };
            let ends_token = match after.chars().next() {
                None => true,
                Some(ch) => ch.is_whitespace() || ch == '(' || ch == ')',
            };
            if ends_token {
                self.offset += marker.len();
                return marker.parse().ok();
            }
        }
        None
    }

    fn move_number(&mut self) -> error::Result<PgnToken> {
        let digits = self.take_while(|ch| ch.is_ascii_digit());
        let number = digits
            .parse()
            .map_err(|_| self.error(ErrorKind::PgnNumberMalformed, "move number digits"))?;
        self.skip_whitespace();
        let dots = self.take_while(|ch| ch == '.');
        match dots.len() {
            0 => Err(self.error(ErrorKind::PgnNumberMalformed, "move number without `.`")),
            1 => Ok(PgnToken::MoveNumber {
                number,
                continuation: false,
            }),
            _ => Ok(PgnToken::MoveNumber {
                number,
                continuation: true,
            }),
        }
    }

    /// A move is a maximal run of non-whitespace, non-parenthesis characters.
    /// A trailing suffix annotation becomes a following glyph.
    fn san_move(&mut self, tokens: &mut Vec<PgnToken>) -> error::Result<()> {
        let text =
            self.take_while(|ch| !ch.is_whitespace() && !matches!(ch, '(' | ')' | '{' | '$'));
        let text = text.trim();
        if text.is_empty() {
            return Err(self.error(ErrorKind::PgnUnexpectedToken, "blank move"));
        }

        let body = text.trim_end_matches(['!', '?']);
        match suffix_glyph(&text[body.len()..]) {
            Some(glyph) if !body.is_empty() => {
                tokens.push(PgnToken::Move(body.to_string()));
                tokens.push(PgnToken::Nag(glyph));
            }
            _ => tokens.push(PgnToken::Move(text.to_string())),
        }
        Ok(())
    }
}

/// Flatten tokens into the whitespace separated words of movetext.
fn movetext_words(tokens: &[PgnToken], words: &mut Vec<String>) {
    for token in tokens {
        match token {
            PgnToken::MoveNumber {
                number,
                continuation: false,
            } => words.push(format!("{number}.")),
            PgnToken::MoveNumber {
                number,
                continuation: true,
            } => words.push(format!("{number}...")),
            PgnToken::Move(text) => words.push(text.clone()),
            PgnToken::Comment(comment) => {
                // Comments may be broken across lines at any space. A brace comment
                // cannot hold `}`, so it is written as `)`.
                let mut parts: Vec<String> = comment
                    .split_whitespace()
                    .map(|part| part.replace('}', ")"))
                    .collect();
                let count = parts.len();
                match (parts.first_mut(), count) {
                    (Some(first), 1) => *first = format!("{{{first}}}"),
                    (Some(first), _) => first.insert(0, '{'),
                    (None, _) => parts.push(String::from("{}")),
                }
                if parts.len() > 1 {
                    if let Some(last) = parts.last_mut() {
                        last.push('}');
                    }
                }
                words.extend(parts);
            }
            PgnToken::Nag(nag) => words.push(format!("${nag}")),
            PgnToken::Variation(inner) => {
                let start = words.len();
                movetext_words(inner, words);
                if words.len() == start {
                    words.push(String::from("()"));
                } else {
                    words[start].insert(0, '(');
                    if let Some(last) = words.last_mut() {
                        last.push(')');
                    }
                }
            }
            PgnToken::Termination(result) => words.push(result.to_string()),
        }
    }
}

/// Join words with single spaces, breaking lines before they exceed `max_line_len`.
/// A single word longer than a line gets a line of its own.
fn wrap(words: &[String], max_line_len: usize) -> String {
    let mut text = String::new();
    let mut line_len = 0;
    for word in words {
        let word_len = word.chars().count();
        if line_len > 0 && line_len + 1 + word_len > max_line_len {
            text.push('\n');
            line_len = 0;
        } else if line_len > 0 {
            text.push(' ');
            line_len += 1;
        }
        text.push_str(word);
        line_len += word_len;
    }
    text
}
