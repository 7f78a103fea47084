//! Canonical ordering of boolean group children.
//!
//! Children are sorted so that the same set of clauses always renders the
//! same way, whatever order the caller supplied them in. Nested groups come
//! first, everything else is ordered by its sort key. Children with equal keys
//! (`f:x` and `f:x^2`, or two nested groups) fall back to their rendered text.

use crate::expr::Expression;

/// Sorts group children into canonical order.
pub(crate) fn canonicalize(children: &mut [Expression]) {
    children.sort_by_cached_key(|expr| (sort_key(expr), expr.render()));
}

/// Returns the key a child is ordered by, or `None` for nested groups.
///
/// `None` orders before every `Some`, which puts groups first.
fn sort_key(expr: &Expression) -> Option<Vec<String>> {
    match expr {
        Expression::Term(term) => Some(vec![term.text().to_owned()]),
        Expression::Field(field) => {
            let mut key = vec![field.name().to_owned()];
            match sort_key(field.value()) {
                Some(rest) => key.extend(rest),
                None => key.push(field.value().render()),
            }
            Some(key)
        }
        Expression::Group(_) => None,
        Expression::Boost(boost) => sort_key(boost.child()),
        Expression::Proximity(near) => Some(vec![near.phrase().to_owned()]),
        Expression::Not(_) | Expression::Range(_) => Some(vec![expr.render()]),
    }
}
