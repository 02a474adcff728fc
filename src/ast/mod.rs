//! AST module for Parsley
//!
//! Parsers produce a tree of [`Node`]s. Leaves are [`TerminalNode`]s carrying a literal
//! [`Value`]; inner nodes are [`NonTerminalNode`]s that hand their children to an
//! [`Interpreter`] when asked for their value. Evaluation is lazy: nothing is interpreted
//! until [`Node::value`] is called, and nothing is cached afterwards.

// ============================================================================
// IMPORTS
// ============================================================================

use std::any::Any;
use std::fmt;
use std::rc::Rc;

use crate::text::Position;
use crate::ParsleyError;

pub mod builder;
pub mod value;

pub use builder::{BuilderRef, NodeBuilder};
pub use value::Value;

// ============================================================================
// INTERPRETERS
// ============================================================================

/// Turns the children of a [`NonTerminalNode`] into a value.
///
/// Interpreters are supplied by grammar authors. They are called again on every evaluation,
/// so they should be pure.
pub trait Interpreter {
    fn eval(&self, ctx: &dyn Any, nodes: &[Node]) -> Result<Value, ParsleyError>;
}

/// Adapter implementing [`Interpreter`] for a closure.
pub struct InterpreterFn<F>(pub F);

impl<F> Interpreter for InterpreterFn<F>
where
    F: Fn(&dyn Any, &[Node]) -> Result<Value, ParsleyError>,
{
    fn eval(&self, ctx: &dyn Any, nodes: &[Node]) -> Result<Value, ParsleyError> {
        (self.0)(ctx, nodes)
    }
}

/// Wraps a closure as a shareable interpreter.
///
/// # Examples
///
/// ```rust
/// use parsley::ast::{interpreter, Interpreter, Node, TerminalNode, Value};
/// use parsley::text::Position;
/// let count = interpreter(|_ctx, nodes| Ok(Value::Int(nodes.len() as i64)));
/// let leaf = Node::from(TerminalNode::new("INT", Value::Int(1), Position::default(), Position::default()));
/// assert_eq!(count.eval(&(), &[leaf]).unwrap(), Value::Int(1));
/// ```
pub fn interpreter<F>(f: F) -> Rc<dyn Interpreter>
where
    F: Fn(&dyn Any, &[Node]) -> Result<Value, ParsleyError> + 'static,
{
    Rc::new(InterpreterFn(f))
}

// ============================================================================
// NODES
// ============================================================================

/// A leaf: a matched token with its literal value.
#[derive(Debug, Clone, PartialEq)]
pub struct TerminalNode {
    token: String,
    value: Value,
    pos: Position,
    reader_pos: Position,
}

impl TerminalNode {
    /// `pos` is where the token starts, `reader_pos` is the position right after it.
    pub fn new(token: impl Into<String>, value: Value, pos: Position, reader_pos: Position) -> Self {
        Self {
            token: token.into(),
            value,
            pos,
            reader_pos,
        }
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    pub fn pos(&self) -> Position {
        self.pos
    }

    pub fn reader_pos(&self) -> Position {
        self.reader_pos
    }

    /// The literal value, regardless of context.
    pub fn value(&self) -> &Value {
        &self.value
    }
}

impl fmt::Display for TerminalNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "T{{{}, {}, {}..{}}}", self.token, self.value, self.pos, self.reader_pos)
    }
}

/// An inner node owning its children and, optionally, the interpreter that evaluates them.
#[derive(Clone)]
pub struct NonTerminalNode {
    token: String,
    children: Vec<Node>,
    interpreter: Option<Rc<dyn Interpreter>>,
    pos: Position,
    reader_pos: Position,
}

impl NonTerminalNode {
    /// Creates a node spanning its children.
    ///
    /// A node without children starts and ends at the beginning of the input; use
    /// [`NonTerminalNode::empty`] to place an empty node elsewhere.
    pub fn new(
        token: impl Into<String>,
        children: Vec<Node>,
        interpreter: Option<Rc<dyn Interpreter>>,
    ) -> Self {
        let pos = children.first().map(Node::pos).unwrap_or_default();
        let reader_pos = children.last().map_or(pos, Node::reader_pos);
        Self {
            token: token.into(),
            children,
            interpreter,
            pos,
            reader_pos,
        }
    }

    /// A node without children or interpreter at `pos`.
    pub fn empty(token: impl Into<String>, pos: Position) -> Self {
        Self {
            token: token.into(),
            children: Vec::new(),
            interpreter: None,
            pos,
            reader_pos: pos,
        }
    }

    pub fn with_interpreter(mut self, interpreter: Rc<dyn Interpreter>) -> Self {
        self.interpreter = Some(interpreter);
        self
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    pub fn children(&self) -> &[Node] {
        &self.children
    }

    pub fn into_children(self) -> Vec<Node> {
        self.children
    }

    pub fn has_interpreter(&self) -> bool {
        self.interpreter.is_some()
    }

    pub fn pos(&self) -> Position {
        self.pos
    }

    pub fn reader_pos(&self) -> Position {
        self.reader_pos
    }

    /// Evaluates the node.
    ///
    /// With an interpreter the children are handed to it on every call. Without one the node
    /// evaluates to the list of its children's values.
    pub fn value(&self, ctx: &dyn Any) -> Result<Value, ParsleyError> {
        match &self.interpreter {
            Some(interpreter) => interpreter.eval(ctx, &self.children),
            None => self
                .children
                .iter()
                .map(|child| child.value(ctx))
                .collect::<Result<Vec<_>, _>>()
                .map(Value::List),
        }
    }
}

impl fmt::Debug for NonTerminalNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NonTerminalNode")
            .field("token", &self.token)
            .field("children", &self.children)
            .field("interpreter", &self.interpreter.is_some())
            .field("pos", &self.pos)
            .field("reader_pos", &self.reader_pos)
            .finish()
    }
}

/// Interpreters have no identity to compare, so only their presence is compared.
impl PartialEq for NonTerminalNode {
    fn eq(&self, other: &Self) -> bool {
        self.token == other.token
            && self.children == other.children
            && self.interpreter.is_some() == other.interpreter.is_some()
            && self.pos == other.pos
            && self.reader_pos == other.reader_pos
    }
}

impl fmt::Display for NonTerminalNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NT{{{}, [", self.token)?;
        for (i, child) in self.children.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", child)?;
        }
        write!(f, "]}}")
    }
}

/// A node of the syntax tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Terminal(TerminalNode),
    NonTerminal(NonTerminalNode),
}

impl Node {
    pub fn token(&self) -> &str {
        match self {
            Node::Terminal(node) => node.token(),
            Node::NonTerminal(node) => node.token(),
        }
    }

    /// Where the node starts.
    pub fn pos(&self) -> Position {
        match self {
            Node::Terminal(node) => node.pos(),
            Node::NonTerminal(node) => node.pos(),
        }
    }

    /// The position right after the node.
    pub fn reader_pos(&self) -> Position {
        match self {
            Node::Terminal(node) => node.reader_pos(),
            Node::NonTerminal(node) => node.reader_pos(),
        }
    }

    pub fn value(&self, ctx: &dyn Any) -> Result<Value, ParsleyError> {
        match self {
            Node::Terminal(node) => Ok(node.value().clone()),
            Node::NonTerminal(node) => node.value(ctx),
        }
    }

    pub fn as_non_terminal(&self) -> Option<&NonTerminalNode> {
        match self {
            Node::NonTerminal(node) => Some(node),
            Node::Terminal(_) => None,
        }
    }
}

impl From<TerminalNode> for Node {
    fn from(node: TerminalNode) -> Self {
        Node::Terminal(node)
    }
}

impl From<NonTerminalNode> for Node {
    fn from(node: NonTerminalNode) -> Self {
        Node::NonTerminal(node)
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Node::Terminal(node) => node.fmt(f),
            Node::NonTerminal(node) => node.fmt(f),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;
    use crate::eval_err;

    fn leaf(value: &str, offset: usize) -> Node {
        TerminalNode::new(
            "STR",
            Value::from(value),
            Position::new(offset, 1, offset + 1),
            Position::new(offset + 1, 1, offset + 2),
        )
        .into()
    }

    #[test]
    fn test_terminal_value_ignores_context() {
        let node = leaf("a", 0);
        assert_eq!(node.value(&()).unwrap(), Value::from("a"));
        assert_eq!(node.value(&42_i64).unwrap(), Value::from("a"));
        assert_eq!(node.token(), "STR");
    }

    #[test]
    fn test_non_terminal_positions_span_children() {
        let node = NonTerminalNode::new("NT", vec![leaf("a", 2), leaf("b", 4)], None);
        assert_eq!(node.pos(), Position::new(2, 1, 3));
        assert_eq!(node.reader_pos(), Position::new(5, 1, 6));
    }

    #[test]
    fn test_non_terminal_passes_context_and_children() {
        let join = interpreter(|ctx, nodes| {
            let sep = ctx.downcast_ref::<&str>().copied().unwrap_or("");
            let mut parts = Vec::new();
            for node in nodes {
                parts.push(node.value(ctx)?.to_string());
            }
            Ok(Value::String(parts.join(sep)))
        });
        let node = NonTerminalNode::new("NT", vec![leaf("a", 0), leaf("b", 1)], Some(join));
        assert_eq!(node.value(&"-").unwrap(), Value::from("a-b"));
    }

    #[test]
    fn test_non_terminal_reevaluates_every_call() {
        let calls = Rc::new(Cell::new(0));
        let counter = Rc::clone(&calls);
        let counting = interpreter(move |_ctx, _nodes| {
            counter.set(counter.get() + 1);
            Ok(Value::Nil)
        });
        let node = Node::from(NonTerminalNode::new("NT", vec![], Some(counting)));
        node.value(&()).unwrap();
        node.value(&()).unwrap();
        assert_eq!(calls.get(), 2);
    }

    #[test]
    fn test_non_terminal_without_interpreter_lists_children() {
        let node = NonTerminalNode::new("NT", vec![leaf("a", 0), leaf("b", 1)], None);
        assert_eq!(
            node.value(&()).unwrap(),
            Value::List(vec![Value::from("a"), Value::from("b")])
        );
        let empty = NonTerminalNode::empty("NT", Position::new(3, 1, 4));
        assert_eq!(empty.value(&()).unwrap(), Value::List(vec![]));
        assert_eq!(empty.pos(), Position::new(3, 1, 4));
    }

    #[test]
    fn test_interpreter_error_propagates() {
        let failing = interpreter(|_ctx, nodes| Err(eval_err!(nodes[0].pos(), "boom")));
        let node = NonTerminalNode::new("NT", vec![leaf("a", 7)], Some(failing));
        let err = node.value(&()).unwrap_err();
        assert_eq!(err.pos(), Some(Position::new(7, 1, 8)));
    }
}
