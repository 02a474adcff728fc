//! # Node Builders
//!
//! Combinators that match several sub-parsers (sequences, repetitions) fold the matched
//! nodes into a single node with a [`NodeBuilder`]. Sub-matches of the empty string carry no
//! node and contribute nothing to the list a builder receives.

use std::rc::Rc;

use crate::ast::{Interpreter, Node, NonTerminalNode};

/// Folds the nodes matched by one combinator invocation into one node (or none).
pub trait NodeBuilder {
    fn build(&self, nodes: Vec<Node>) -> Option<Node>;
}

impl<F> NodeBuilder for F
where
    F: Fn(Vec<Node>) -> Option<Node>,
{
    fn build(&self, nodes: Vec<Node>) -> Option<Node> {
        self(nodes)
    }
}

pub type BuilderRef = Rc<dyn NodeBuilder>;

/// Discards every node.
pub fn nil() -> BuilderRef {
    Rc::new(|_nodes: Vec<Node>| -> Option<Node> { None })
}

/// Keeps only the `i`th node.
///
/// ```rust
/// use parsley::ast::{builder, Node, NodeBuilder, TerminalNode, Value};
/// use parsley::text::Position;
/// let node = |v: i64| Node::from(TerminalNode::new("INT", Value::Int(v), Position::default(), Position::default()));
/// let picked = builder::select(1).build(vec![node(1), node(2)]).unwrap();
/// assert_eq!(picked.value(&()).unwrap(), Value::Int(2));
/// ```
pub fn select(i: usize) -> BuilderRef {
    Rc::new(move |nodes: Vec<Node>| nodes.into_iter().nth(i))
}

/// Wraps all nodes into a [`NonTerminalNode`] with the given token and interpreter.
pub fn all(token: &str, interpreter: Option<Rc<dyn Interpreter>>) -> BuilderRef {
    let token = token.to_string();
    Rc::new(move |nodes: Vec<Node>| {
        Some(Node::from(NonTerminalNode::new(
            token.clone(),
            nodes,
            interpreter.clone(),
        )))
    })
}
