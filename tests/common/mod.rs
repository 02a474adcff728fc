//! Shared grammar pieces for the integration tests.

#![allow(dead_code)]

use std::rc::Rc;

use parsley::prelude::*;

pub fn ch(c: char) -> ParserRef {
    terminal::rune(c, &c.to_string()).rc()
}

pub fn int() -> ParserRef {
    terminal::integer().rc()
}

/// Values of every other node, skipping separators.
pub fn every_other() -> Rc<dyn Interpreter> {
    interpreter(|ctx, nodes| {
        let values = nodes
            .iter()
            .step_by(2)
            .map(|node| node.value(ctx))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Value::List(values))
    })
}

/// Sum of every other node.
pub fn sum() -> Rc<dyn Interpreter> {
    interpreter(|ctx, nodes| {
        let mut total = 0;
        for node in nodes.iter().step_by(2) {
            total += node.value(ctx)?.as_int().unwrap_or(0);
        }
        Ok(Value::Int(total))
    })
}

pub fn eval(parser: &dyn Parser, text: &str) -> Result<Value, ParsleyError> {
    evaluate(parser, &Reader::new(text, true), &())
}

pub fn ints(values: &[i64]) -> Value {
    Value::List(values.iter().copied().map(Value::Int).collect())
}
