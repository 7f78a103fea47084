//! Builder functions.
//!
//! These are the usual entry points for assembling a query. Functions taking
//! `(name, value)` pairs sort them by field name first, so the output does not
//! depend on the order the pairs were produced in.

use crate::{
    error::Result,
    expr::{Bounds, Combinator, Expression},
};

/// Creates a literal term. Escaping is applied when the query is rendered.
pub fn term(text: impl Into<String>) -> Expression {
    Expression::term(text)
}

/// Binds a value to a field: `name:value`.
///
/// Strings become terms; any other expression (a range, a group, a boost) is
/// bound as is.
///
/// # Errors
///
/// `InvalidArgument` if `name` is empty.
pub fn field(name: impl Into<String>, value: impl Into<Expression>) -> Result<Expression> {
    Expression::field(name, value)
}

/// Joins expressions with AND. This is the default combinator.
///
/// # Errors
///
/// `InvalidArgument` if `children` is empty.
pub fn all<I>(children: I) -> Result<Expression>
where
    I: IntoIterator,
    I::Item: Into<Expression>,
{
    Expression::group(Combinator::And, collect(children))
}

/// Joins expressions with OR.
///
/// # Errors
///
/// `InvalidArgument` if `children` is empty.
pub fn any<I>(children: I) -> Result<Expression>
where
    I: IntoIterator,
    I::Item: Into<Expression>,
{
    Expression::group(Combinator::Or, collect(children))
}

/// Negates an expression.
pub fn not(expr: impl Into<Expression>) -> Expression {
    expr.into().negate()
}

/// Matches none of the expressions: `NOT (a OR b ...)`.
///
/// # Errors
///
/// `InvalidArgument` if `children` is empty.
pub fn none<I>(children: I) -> Result<Expression>
where
    I: IntoIterator,
    I::Item: Into<Expression>,
{
    any(children).map(Expression::negate)
}

/// Field bindings joined with AND, ordered by field name.
///
/// # Errors
///
/// `InvalidArgument` if `pairs` is empty or a field name is empty.
pub fn all_fields<I, K, V>(pairs: I) -> Result<Expression>
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<Expression>,
{
    Expression::group(Combinator::And, field_nodes(pairs)?)
}

/// Field bindings joined with OR, ordered by field name.
///
/// # Errors
///
/// `InvalidArgument` if `pairs` is empty or a field name is empty.
pub fn any_fields<I, K, V>(pairs: I) -> Result<Expression>
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<Expression>,
{
    Expression::group(Combinator::Or, field_nodes(pairs)?)
}

/// Negated AND of field bindings.
///
/// # Errors
///
/// `InvalidArgument` if `pairs` is empty or a field name is empty.
pub fn not_fields<I, K, V>(pairs: I) -> Result<Expression>
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<Expression>,
{
    all_fields(pairs).map(Expression::negate)
}

/// Negated OR of field bindings.
///
/// # Errors
///
/// `InvalidArgument` if `pairs` is empty or a field name is empty.
pub fn none_fields<I, K, V>(pairs: I) -> Result<Expression>
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<Expression>,
{
    any_fields(pairs).map(Expression::negate)
}

/// Joins two expressions with AND. See [`Expression::and`].
pub fn and(a: impl Into<Expression>, b: impl Into<Expression>) -> Expression {
    a.into().and(b)
}

/// Joins two expressions with OR. See [`Expression::or`].
pub fn or(a: impl Into<Expression>, b: impl Into<Expression>) -> Expression {
    a.into().or(b)
}

/// Boosts an expression. See [`Expression::boost`] for the accepted factor
/// types.
///
/// # Errors
///
/// `InvalidArgument` for a non-positive factor, `InvalidOperation` for a
/// range, boost or proximity query.
pub fn boost(expr: impl Into<Expression>, factor: impl Into<f64>) -> Result<Expression> {
    expr.into().boost(factor)
}

/// Turns a phrase into a proximity query. See [`Expression::proximity`].
///
/// # Errors
///
/// `InvalidOperation` unless `expr` is a multi-word term, `InvalidArgument`
/// for a zero distance.
pub fn proximity(expr: impl Into<Expression>, distance: u32) -> Result<Expression> {
    expr.into().proximity(distance)
}

/// Inclusive range: `[low TO high]`.
///
/// # Errors
///
/// `InvalidArgument` if either bound is empty.
pub fn range_inclusive(low: impl Into<String>, high: impl Into<String>) -> Result<Expression> {
    Expression::range(low, high, Bounds::Inclusive)
}

/// Exclusive range: `{low TO high}`.
///
/// # Errors
///
/// `InvalidArgument` if either bound is empty.
pub fn range_exclusive(low: impl Into<String>, high: impl Into<String>) -> Result<Expression> {
    Expression::range(low, high, Bounds::Exclusive)
}

/// Alias for [`range_inclusive`].
///
/// # Errors
///
/// `InvalidArgument` if either bound is empty.
pub fn range(low: impl Into<String>, high: impl Into<String>) -> Result<Expression> {
    range_inclusive(low, high)
}

/// Alias for [`range_exclusive`].
///
/// # Errors
///
/// `InvalidArgument` if either bound is empty.
pub fn between(low: impl Into<String>, high: impl Into<String>) -> Result<Expression> {
    range_exclusive(low, high)
}

/// Converts every child into an expression.
fn collect<I>(children: I) -> Vec<Expression>
where
    I: IntoIterator,
    I::Item: Into<Expression>,
{
    children.into_iter().map(Into::into).collect()
}

/// Builds one field binding per pair, ordered by field name.
fn field_nodes<I, K, V>(pairs: I) -> Result<Vec<Expression>>
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<Expression>,
{
    let mut pairs: Vec<(String, Expression)> = pairs
        .into_iter()
        .map(|(name, value)| (name.into(), value.into()))
        .collect();
    pairs.sort_by(|a, b| a.0.cmp(&b.0));

    pairs
        .into_iter()
        .map(|(name, value)| Expression::field(name, value))
        .collect()
}
