//! Safe construction of Lucene/Solr-style search queries.
//!
//! Queries are built as an immutable expression tree and rendered to a query
//! string. Literal values are always escaped, so untrusted input cannot inject
//! query syntax:
//!
//! - **Terms**: `term("some literal")` → `"some literal"`
//! - **Fields**: `field("title", "guide")` → `title:guide`
//! - **AND / OR**: `all([...])`, `any([...])`, or `a.and(b)`, `a | b`
//! - **Negation**: `not(x)`, `none([...])` → `NOT (a OR b)`
//! - **Ranges**: `range("red", "rum")` → `[red TO rum]`, `between` → `{red TO rum}`
//! - **Boosting**: `term("red").boost(5.0)` → `red^5`
//! - **Proximity**: `term("See spot run").proximity(20)` → `"See spot run"~20`
//!
//! Children of AND/OR groups are kept in a canonical order, so equivalent
//! queries render identically.
//!
//! # Example
//!
//! ```
//! use rk_query::{any_fields, field, not, term};
//!
//! let login = any_fields([("username", "foo"), ("email", "foo@example.com")])?;
//! let query = login & field("password", "s3cr3t")? & not(field("blocked", "yes")?);
//!
//! assert_eq!(
//!     query.render(),
//!     r#"(email:"foo@example.com" OR username:foo) AND (NOT blocked:yes) AND password:s3cr3t"#
//! );
//! assert_eq!(term("word1").or(term("word2")).to_string(), "word1 OR word2");
//! # Ok::<(), rk_query::QueryError>(())
//! ```

mod build;
mod error;
mod expr;
mod order;
mod render;

pub use build::{
    all, all_fields, and, any, any_fields, between, boost, field, none, none_fields, not,
    not_fields, or, proximity, range, range_exclusive, range_inclusive, term,
};
pub use error::{QueryError, Result};
pub use expr::{
    BooleanGroup, Boost, Bounds, Combinator, Expression, FieldValue, Negation, Proximity, Range,
    Term,
};
pub use render::{escape, needs_quoting, quote};
