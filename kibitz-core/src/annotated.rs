//! Annotated game tree.
//!
//! An AnnotatedGame stores every position reached in a game as a node of a
//! tree. The first child of a node continues its line, later children are
//! variations. Nodes carry the comments and glyphs of PGN movetext, and a
//! focus names the node being looked at and edited.
//!
//! Nodes live in a flat arena addressed by [`NodeId`], shared between clones
//! of a game until one of them is edited.

use std::sync::Arc;

use log::trace;

use crate::coretypes::{GameResult, Move, MoveCount, Square};
use crate::error::{self, ErrorKind};
use crate::game::{self, Headers};
use crate::movelist::{Line, MoveList};
use crate::notation::{from_san, from_uci};
use crate::pgn::{self, Pgn, PgnToken, WriteOptions};
use crate::position::Position;

/// Index of a node within its game.
pub type NodeId = usize;

/// The root node holds the position the game starts from.
pub const ROOT: NodeId = 0;

/// One position of the game tree and its annotations.
/// The move leading to a node is the last move of its position.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Node {
    position: Position,
    comment: Option<String>,
    precomment: Option<String>,
    glyph: Option<u32>,
    id: NodeId,
    ply: MoveCount,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

impl Node {
    fn new(position: Position, id: NodeId, parent: Option<NodeId>) -> Self {
        Self {
            ply: position.ply(),
            position,
            comment: None,
            precomment: None,
            glyph: None,
            id,
            parent,
            children: Vec::new(),
        }
    }

    pub fn position(&self) -> &Position {
        &self.position
    }
    /// Comment written after the move.
    pub fn comment(&self) -> Option<&str> {
        self.comment.as_deref()
    }
    /// Comment written before the move.
    pub fn precomment(&self) -> Option<&str> {
        self.precomment.as_deref()
    }
    pub fn glyph(&self) -> Option<u32> {
        self.glyph
    }
    pub fn id(&self) -> NodeId {
        self.id
    }
    pub fn ply(&self) -> MoveCount {
        self.ply
    }
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }
    /// Continuations of this node, main line first.
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }
    /// The move leading to this node, None for the root.
    pub fn last_move(&self) -> Option<Move> {
        self.position.last_move()
    }
}

/// A game tree with comments, glyphs, variations and a focus.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct AnnotatedGame {
    headers: Headers,
    nodes: Arc<Vec<Node>>,
    focus: NodeId,
    result: Option<GameResult>,
}

impl AnnotatedGame {
    /// Create a new game in the standard chess start position.
    pub fn new() -> Self {
        Self::from_position(Position::start_position())
    }

    /// Create a new game rooted at `position`.
    pub fn from_position(position: Position) -> Self {
        Self {
            headers: Headers::new(),
            nodes: Arc::new(vec![Node::new(position, ROOT, None)]),
            focus: ROOT,
            result: None,
        }
    }

    /// Import a PGN game with all of its comments, glyphs and variations.
    /// The focus is left on the root.
    pub fn from_pgn(text: &str) -> error::Result<Self> {
        Self::from_parsed_pgn(&pgn::parse(text)?)
    }

    /// Import an already parsed game.
    pub fn from_parsed_pgn(pgn: &Pgn) -> error::Result<Self> {
        let mut game = Self::from_position(game::root_from_headers(&pgn.headers)?);
        game.headers = pgn.headers.clone();
        game.fold(&pgn.moves, true)?;
        game.to_beginning();
        Ok(game)
    }

    /// Apply tokens in order from the focus, leaving the focus after the last move.
    ///
    /// A comment met at the root, or where the focus already has
    /// continuations, belongs before the next move rather than after the
    /// focus, so it is held until that move is made. One still held at the
    /// end becomes the comment of the focus.
    fn fold(&mut self, tokens: &[PgnToken], top_level: bool) -> error::Result<()> {
        let mut precomment: Option<String> = None;

        for token in tokens {
            trace!("fold {:?} at node {}", token, self.focus);
            match token {
                PgnToken::MoveNumber { .. } => (),
                PgnToken::Move(text) => {
                    let move_ = game::resolve_move(self.position(), text)?;
                    self.add_move(move_)?;
                    if let Some(text) = precomment.take() {
                        self.focus_node_mut().precomment = Some(text);
                    }
                }
                PgnToken::Comment(text) => {
                    if self.focus == ROOT || !self.focus_node().children.is_empty() {
                        append_comment(&mut precomment, text);
                    } else {
                        append_comment(&mut self.focus_node_mut().comment, text);
                    }
                }
                PgnToken::Nag(glyph) => self.focus_node_mut().glyph = Some(*glyph),
                PgnToken::Variation(inner) => self.add_variation(inner)?,
                PgnToken::Termination(result) if top_level => self.result = Some(*result),
                PgnToken::Termination(_) => (),
            }
        }

        if let Some(text) = precomment {
            append_comment(&mut self.focus_node_mut().comment, &text);
        }
        Ok(())
    }

    /// Fold a variation: step back one move, play `tokens` from there as an
    /// alternative to the focus, then return the focus to where it was.
    pub fn add_variation(&mut self, tokens: &[PgnToken]) -> error::Result<()> {
        let resume = self.focus;
        self.back();
        self.fold(tokens, false)?;
        self.focus = resume;
        Ok(())
    }

    /// Play a legal move at the focus and focus on the new node.
    /// If the focus already has continuations, the move becomes a new variation.
    pub fn add_move(&mut self, move_: Move) -> error::Result<NodeId> {
        if !self.position().is_legal(move_) {
            return Err((ErrorKind::GameIllegalMove, move_).into());
        }
        let position = self.position().do_move(move_);
        let parent = self.focus;
        let nodes = Arc::make_mut(&mut self.nodes);
        let id = nodes.len();
        nodes.push(Node::new(position, id, Some(parent)));
        nodes[parent].children.push(id);
        self.focus = id;
        Ok(id)
    }

    /// Play a move given in SAN at the focus.
    pub fn add_san_move(&mut self, san: &str) -> error::Result<NodeId> {
        let move_ = from_san(self.position(), san)
            .ok_or_else(|| error::Error::from((ErrorKind::GameIllegalMove, san)))?;
        self.add_move(move_)
    }

    /// Play a move given in UCI notation at the focus.
    pub fn add_uci_move(&mut self, uci: &str) -> error::Result<NodeId> {
        let move_ = from_uci(self.position(), uci)
            .ok_or_else(|| error::Error::from((ErrorKind::GameIllegalMove, uci)))?;
        self.add_move(move_)
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id)
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn focus(&self) -> NodeId {
        self.focus
    }

    pub fn focus_node(&self) -> &Node {
        &self.nodes[self.focus]
    }

    fn focus_node_mut(&mut self) -> &mut Node {
        let focus = self.focus;
        &mut Arc::make_mut(&mut self.nodes)[focus]
    }

    /// The position in focus.
    pub fn position(&self) -> &Position {
        &self.focus_node().position
    }

    /// The position the game started from.
    pub fn root(&self) -> &Position {
        &self.nodes[ROOT].position
    }

    /// Legal moves in the position in focus.
    pub fn moves(&self) -> MoveList {
        self.position().legal_moves()
    }

    /// Legal moves of the piece standing on `square` in the position in focus.
    pub fn moves_from(&self, square: Square) -> MoveList {
        self.position().moves_from(square)
    }

    /// Continuations of the focus, main line first.
    pub fn variations(&self) -> &[NodeId] {
        &self.focus_node().children
    }

    /// Moves of the main line, following first children from the root.
    pub fn main_line(&self) -> Line {
        let mut line = Line::new();
        let mut id = ROOT;
        while let Some(&child) = self.nodes[id].children.first() {
            line.extend(self.nodes[child].last_move());
            id = child;
        }
        line
    }

    /// Focus on the main continuation. Returns false at the end of a line.
    pub fn forward(&mut self) -> bool {
        match self.focus_node().children.first() {
            Some(&child) => {
                self.focus = child;
                true
            }
            None => false,
        }
    }

    /// Focus on the parent. Returns false at the root.
    pub fn back(&mut self) -> bool {
        match self.focus_node().parent {
            Some(parent) => {
                self.focus = parent;
                true
            }
            None => false,
        }
    }

    pub fn to_beginning(&mut self) {
        self.focus = ROOT;
    }

    /// Focus on the last node of the main line.
    pub fn to_end(&mut self) {
        self.to_beginning();
        self.to_end_of_variation();
    }

    /// The root and every node that is not its parent's first child start a variation.
    pub fn is_at_beginning_of_variation(&self) -> bool {
        match self.focus_node().parent {
            Some(parent) => self.nodes[parent].children.first() != Some(&self.focus),
            None => true,
        }
    }

    pub fn is_at_end_of_variation(&self) -> bool {
        self.focus_node().children.is_empty()
    }

    /// Walk back to the node starting the variation the focus is in.
    pub fn to_beginning_of_variation(&mut self) {
        while !self.is_at_beginning_of_variation() {
            self.back();
        }
    }

    /// Walk forward along first children until the line ends.
    pub fn to_end_of_variation(&mut self) {
        while self.forward() {}
    }

    /// Focus on the main line node `ply` moves after the root, or the end of
    /// the main line if it is shorter.
    pub fn go_to_move(&mut self, ply: usize) {
        self.to_beginning();
        for _ in 0..ply {
            if !self.forward() {
                break;
            }
        }
    }

    /// Focus on any node. Returns false if no node has this id.
    pub fn go_to(&mut self, id: NodeId) -> bool {
        match id < self.nodes.len() {
            true => {
                self.focus = id;
                true
            }
            false => false,
        }
    }

    pub fn comment(&self) -> Option<&str> {
        self.focus_node().comment()
    }

    pub fn set_comment(&mut self, comment: Option<String>) {
        self.focus_node_mut().comment = comment;
    }

    pub fn precomment(&self) -> Option<&str> {
        self.focus_node().precomment()
    }

    pub fn set_precomment(&mut self, precomment: Option<String>) {
        self.focus_node_mut().precomment = precomment;
    }

    pub fn glyph(&self) -> Option<u32> {
        self.focus_node().glyph
    }

    pub fn set_glyph(&mut self, glyph: Option<u32>) {
        self.focus_node_mut().glyph = glyph;
    }

    pub fn headers(&self) -> &Headers {
        &self.headers
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        game::header(&self.headers, name)
    }

    /// Set a header, replacing the value of an existing one of the same name.
    pub fn set_header(&mut self, name: &str, value: &str) {
        game::set_header(&mut self.headers, name, value);
    }

    /// Result of the game: the recorded one if known, otherwise whatever the
    /// last position of the main line decides.
    pub fn result(&self) -> GameResult {
        game::recorded_result(self.result, &self.headers).unwrap_or_else(|| {
            let mut end = self.clone();
            end.to_end();
            end.position().result()
        })
    }

    /// Movetext tokens of the whole tree, ending with the termination marker.
    ///
    /// A root comment is written ahead of the first move. Movetext cannot tell
    /// it apart from that move's precomment, so once there is a first move it
    /// reads back as the start of the precomment.
    pub fn to_pgn_tokens(&self, options: &WriteOptions) -> Vec<PgnToken> {
        let mut tokens = Vec::new();
        if let (true, Some(comment)) = (options.comments, &self.nodes[ROOT].comment) {
            tokens.push(PgnToken::Comment(comment.clone()));
        }
        self.continuation_tokens(ROOT, options, &mut tokens, true);
        tokens.push(PgnToken::Termination(self.result()));
        tokens
    }

    /// Write the game as PGN.
    pub fn to_pgn(&self, options: &WriteOptions) -> String {
        Pgn {
            headers: game::export_headers(&self.headers, self.root(), self.result()),
            moves: self.to_pgn_tokens(options),
        }
        .write(options)
    }

    /// Emit the line continuing from `id`. At each node the main continuation
    /// comes first, then each later child as a variation, then the main line goes on.
    fn continuation_tokens(
        &self,
        mut id: NodeId,
        options: &WriteOptions,
        tokens: &mut Vec<PgnToken>,
        mut needs_number: bool,
    ) {
        while let Some((&main, siblings)) = self.nodes[id].children.split_first() {
            let mut next_needs_number = self.move_tokens(main, options, tokens, needs_number);

            if options.variations {
                for &sibling in siblings {
                    let mut inner = Vec::new();
                    let after = self.move_tokens(sibling, options, &mut inner, true);
                    self.continuation_tokens(sibling, options, &mut inner, after);
                    tokens.push(PgnToken::Variation(inner));
                    next_needs_number = true;
                }
            }

            id = main;
            needs_number = next_needs_number;
        }
    }

    /// Emit the tokens of the move leading to `id`, returning true if a Black
    /// move after it needs its own number.
    fn move_tokens(
        &self,
        id: NodeId,
        options: &WriteOptions,
        tokens: &mut Vec<PgnToken>,
        mut needs_number: bool,
    ) -> bool {
        let node = &self.nodes[id];
        let (Some(parent), Some(move_)) = (node.parent, node.last_move()) else {
            return needs_number;
        };

        if let (true, Some(precomment)) = (options.comments, &node.precomment) {
            tokens.push(PgnToken::Comment(precomment.clone()));
            needs_number = true;
        }
        game::push_move_tokens(tokens, &self.nodes[parent].position, move_, needs_number);
        if let (true, Some(glyph)) = (options.glyphs, node.glyph) {
            tokens.push(PgnToken::Nag(glyph));
        }
        match (options.comments, &node.comment) {
            (true, Some(comment)) => {
                tokens.push(PgnToken::Comment(comment.clone()));
                true
            }
            _ => false,
        }
    }
}

impl Default for AnnotatedGame {
    fn default() -> Self {
        Self::new()
    }
}

fn append_comment(slot: &mut Option<String>, text: &str) {
    match slot {
        Some(existing) => {
            existing.push(' ');
            existing.push_str(text);
        }
        None => *slot = Some(text.to_string()),
    }
}
