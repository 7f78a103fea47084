//! Query string rendering.
//!
//! Turns an [`Expression`] into Lucene/Solr query syntax. Literal text is
//! emitted bare only when it is a plain alphanumeric word; anything else is
//! double-quoted with `\` and `"` escaped, so caller data can never be read
//! back as query syntax.
//!
//! Parentheses are added only where precedence requires them:
//!
//! - a group inside a group with a different combinator: `(a OR b) AND c`
//! - a negation inside a group: `(NOT a) AND b`
//! - a group under `NOT`, a boost, or a field: `NOT (a OR b)`, `f:(a OR b)`

use std::{borrow::Cow, fmt};

use crate::expr::{Combinator, Expression};

/// Words the query parser treats as operators when they appear bare.
const OPERATOR_KEYWORDS: [&str; 4] = ["AND", "OR", "NOT", "TO"];

/// Returns true if `text` cannot be emitted bare.
pub fn needs_quoting(text: &str) -> bool {
    text.is_empty()
        || !text.bytes().all(|b| b.is_ascii_alphanumeric())
        || OPERATOR_KEYWORDS.contains(&text)
}

/// Wraps `text` in double quotes, escaping backslashes and quotes.
pub fn quote(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 2);
    out.push('"');
    for ch in text.chars() {
        if matches!(ch, '\\' | '"') {
            out.push('\\');
        }
        out.push(ch);
    }
    out.push('"');
    out
}

/// Returns the safe representation of a literal: bare if possible, quoted otherwise.
pub fn escape(text: &str) -> Cow<'_, str> {
    if needs_quoting(text) {
        Cow::Owned(quote(text))
    } else {
        Cow::Borrowed(text)
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_expr(f, self)
    }
}

/// Writes one node and, recursively, its children.
fn write_expr<W: fmt::Write>(out: &mut W, expr: &Expression) -> fmt::Result {
    match expr {
        Expression::Term(term) => out.write_str(&escape(term.text())),
        Expression::Field(field) => {
            write!(out, "{}:", field.name())?;
            let value = field.value();
            write_grouped(
                out,
                value,
                matches!(value, Expression::Group(_) | Expression::Field(_)),
            )
        }
        Expression::Group(group) => {
            let separator = match group.combinator() {
                Combinator::And => " AND ",
                Combinator::Or => " OR ",
            };
            for (i, child) in group.children().iter().enumerate() {
                if i > 0 {
                    out.write_str(separator)?;
                }
                let parens = match child {
                    Expression::Group(inner) => inner.combinator() != group.combinator(),
                    Expression::Not(_) => true,
                    _ => false,
                };
                write_grouped(out, child, parens)?;
            }
            Ok(())
        }
        Expression::Not(negation) => {
            out.write_str("NOT ")?;
            let child = negation.child();
            write_grouped(out, child, matches!(child, Expression::Group(_)))
        }
        Expression::Range(range) => {
            let (open, close) = range.bounds().brackets();
            write!(
                out,
                "{open}{} TO {}{close}",
                escape(range.lower()),
                escape(range.upper())
            )
        }
        Expression::Boost(boost) => {
            let child = boost.child();
            write_grouped(
                out,
                child,
                matches!(child, Expression::Group(_) | Expression::Not(_)),
            )?;
            write!(out, "^{}", boost.factor())
        }
        Expression::Proximity(near) => {
            write!(out, "{}~{}", quote(near.phrase()), near.distance())
        }
    }
}

/// Writes `expr`, wrapped in parentheses when `parens` is set.
fn write_grouped<W: fmt::Write>(out: &mut W, expr: &Expression, parens: bool) -> fmt::Result {
    if parens {
        out.write_char('(')?;
        write_expr(out, expr)?;
        out.write_char(')')
    } else {
        write_expr(out, expr)
    }
}
