//! # JSON grammar
//!
//! A complete JSON reader assembled from the combinators, used by the `parsley-json` binary.
//! Arrays evaluate to [`Value::List`], objects to [`Value::Map`] (a repeated key keeps its
//! last value) and numbers to [`Value::Int`] unless they have a fraction or exponent.

use std::rc::Rc;

use im::OrdMap;

use crate::ast::{builder, interpreter, Interpreter, Node, Value};
use crate::combinator::{sep_by, seq, Choice, Sentence};
use crate::parser::{ParserExt, Rule};
use crate::text::{terminal, Position};
use crate::{eval_err, ParsleyError};

/// Builds the grammar of a whole JSON document.
///
/// ```rust
/// use parsley::ast::Value;
/// use parsley::engine::evaluate;
/// use parsley::text::Reader;
/// let json = parsley::json::grammar().unwrap();
/// let value = evaluate(&json, &Reader::new(r#"{"a": [1, 2.5, null]}"#, true), &()).unwrap();
/// assert_eq!(value.to_string(), "map[a:[1 2.5 nil]]");
/// ```
pub fn grammar() -> Result<Sentence, ParsleyError> {
    let value = Rule::new("value");

    let array = seq(
        builder::select(1),
        vec![
            terminal::rune('[', "ARR_START").rc(),
            sep_by("ARR", value.reference().rc(), terminal::rune(',', ",").rc(), Some(items())).rc(),
            terminal::rune(']', "ARR_END").rc(),
        ],
    )?
    .with_name("array");

    let pair = seq(
        builder::all("PAIR", Some(key_value())),
        vec![
            terminal::quoted_string().rc(),
            terminal::rune(':', ":").rc(),
            value.reference().rc(),
        ],
    )?;
    let object = seq(
        builder::all("OBJECT", Some(object())),
        vec![
            terminal::rune('{', "OBJ_START").rc(),
            sep_by("PAIRS", pair.rc(), terminal::rune(',', ",").rc(), Some(items())).rc(),
            terminal::rune('}', "OBJ_END").rc(),
        ],
    )?
    .with_name("object");

    let number = Choice::new("number", vec![terminal::float().rc(), terminal::integer().rc()])?;
    value.define(
        Choice::new(
            "value",
            vec![
                terminal::quoted_string().rc(),
                number.rc(),
                terminal::bool().rc(),
                terminal::nil("null")?.rc(),
                array.rc(),
                object.rc(),
            ],
        )?
        .rc(),
    )?;

    Ok(Sentence::new(Rc::new(value)))
}

/// Values of the items of a separated list, skipping the separators.
fn items() -> Rc<dyn Interpreter> {
    interpreter(|ctx, nodes| {
        let values = nodes
            .iter()
            .step_by(2)
            .map(|node| node.value(ctx))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Value::List(values))
    })
}

/// `"key" : value` as a two element list.
fn key_value() -> Rc<dyn Interpreter> {
    interpreter(|ctx, nodes| match nodes {
        [key, _, value] => Ok(Value::List(vec![key.value(ctx)?, value.value(ctx)?])),
        _ => Err(eval_err!(start(nodes), "malformed object member")),
    })
}

fn object() -> Rc<dyn Interpreter> {
    interpreter(|ctx, nodes| {
        let [_, members, _] = nodes else {
            return Err(eval_err!(start(nodes), "malformed object"));
        };
        let mut map = OrdMap::new();
        for member in members.value(ctx)?.into_list().unwrap_or_default() {
            if let Value::List(kv) = member {
                if let [Value::String(key), value] = kv.as_slice() {
                    map.insert(key.clone(), value.clone());
                }
            }
        }
        Ok(Value::Map(map))
    })
}

fn start(nodes: &[Node]) -> Position {
    nodes.first().map(Node::pos).unwrap_or_default()
}
