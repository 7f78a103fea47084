//! Query expression tree.
//!
//! Nodes are immutable once built. Payload types keep their fields private so
//! the only way to obtain one is through the validating constructors in this
//! module and the builder functions.

use std::{
    fmt,
    ops::{BitAnd, BitOr, Not},
};

use tracing::debug;

use crate::{
    error::{QueryError, Result},
    order,
};

/// A query expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    /// A literal search term or phrase.
    Term(Term),

    /// A field-scoped expression: `name:value`.
    Field(FieldValue),

    /// Two or more expressions joined by AND or OR.
    Group(BooleanGroup),

    /// Negation: results must NOT match the inner expression.
    Not(Negation),

    /// A bounded interval: `[low TO high]` or `{low TO high}`.
    Range(Range),

    /// Boosted expression: multiplies the relevance of the inner expression.
    Boost(Boost),

    /// Phrase match allowing intervening words: `"a b c"~n`.
    Proximity(Proximity),
}

/// The boolean operator joining the children of a [`BooleanGroup`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Combinator {
    /// Conjunction: all children must match.
    And,
    /// Disjunction: at least one child must match.
    Or,
}

impl Combinator {
    /// Returns the query-language keyword for this combinator.
    pub fn keyword(self) -> &'static str {
        match self {
            Self::And => "AND",
            Self::Or => "OR",
        }
    }
}

impl fmt::Display for Combinator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

/// A literal string, escaped only when rendered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Term {
    /// The raw, unescaped text.
    text: String,
}

impl Term {
    /// Returns the raw text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Returns true if the text holds at least two whitespace-separated words.
    pub fn is_phrase(&self) -> bool {
        self.text.split_whitespace().nth(1).is_some()
    }
}

/// A `name:value` binding.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldValue {
    /// Field name, emitted verbatim.
    name: String,
    /// The expression matched against the field.
    value: Box<Expression>,
}

impl FieldValue {
    /// Returns the field name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the bound expression.
    pub fn value(&self) -> &Expression {
        &self.value
    }
}

/// Children joined by a single combinator, in canonical order.
#[derive(Debug, Clone, PartialEq)]
pub struct BooleanGroup {
    /// The joining operator.
    combinator: Combinator,
    /// Child expressions; never empty.
    children: Vec<Expression>,
}

impl BooleanGroup {
    /// Returns the joining operator.
    pub fn combinator(&self) -> Combinator {
        self.combinator
    }

    /// Returns the child expressions.
    pub fn children(&self) -> &[Expression] {
        &self.children
    }
}

/// `NOT child`.
#[derive(Debug, Clone, PartialEq)]
pub struct Negation {
    /// The negated expression.
    child: Box<Expression>,
}

impl Negation {
    /// Returns the negated expression.
    pub fn child(&self) -> &Expression {
        &self.child
    }
}

/// Inclusivity of both ends of a [`Range`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Bounds {
    /// Both bounds match: `[low TO high]`.
    Inclusive,
    /// Neither bound matches: `{low TO high}`.
    Exclusive,
}

impl Bounds {
    /// Returns the opening and closing brackets.
    pub fn brackets(self) -> (char, char) {
        match self {
            Self::Inclusive => ('[', ']'),
            Self::Exclusive => ('{', '}'),
        }
    }
}

/// An interval between two literal bounds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Range {
    /// Lower bound.
    lower: String,
    /// Upper bound.
    upper: String,
    /// Whether the bounds themselves match.
    bounds: Bounds,
}

impl Range {
    /// Returns the lower bound.
    pub fn lower(&self) -> &str {
        &self.lower
    }

    /// Returns the upper bound.
    pub fn upper(&self) -> &str {
        &self.upper
    }

    /// Returns the bound inclusivity.
    pub fn bounds(&self) -> Bounds {
        self.bounds
    }
}

/// A relevance multiplier applied to an expression.
#[derive(Debug, Clone, PartialEq)]
pub struct Boost {
    /// The boosted expression.
    child: Box<Expression>,
    /// Positive, finite factor.
    factor: f64,
}

impl Boost {
    /// Returns the boosted expression.
    pub fn child(&self) -> &Expression {
        &self.child
    }

    /// Returns the boost factor.
    pub fn factor(&self) -> f64 {
        self.factor
    }
}

/// A phrase whose words may be up to `distance` positions apart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Proximity {
    /// Multi-word phrase text.
    phrase: String,
    /// Maximum word distance; never zero.
    distance: u32,
}

impl Proximity {
    /// Returns the phrase text.
    pub fn phrase(&self) -> &str {
        &self.phrase
    }

    /// Returns the allowed distance.
    pub fn distance(&self) -> u32 {
        self.distance
    }
}

impl Expression {
    /// Creates a literal term.
    pub fn term(text: impl Into<String>) -> Self {
        Self::Term(Term { text: text.into() })
    }

    /// Creates a field binding.
    ///
    /// A negated value is hoisted out of the field, so `name:(NOT x)` is built
    /// as `NOT name:x`.
    pub fn field(name: impl Into<String>, value: impl Into<Self>) -> Result<Self> {
        let name = name.into();
        if name.is_empty() {
            debug!("rejected field binding with empty name");
            return Err(QueryError::invalid_argument("field name must not be empty"));
        }

        match value.into() {
            Self::Not(negation) => Ok(Self::field(name, *negation.child)?.negate()),
            value => Ok(Self::Field(FieldValue {
                name,
                value: Box::new(value),
            })),
        }
    }

    /// Creates a group of children joined by `combinator`.
    ///
    /// Children that are groups with the same combinator are flattened, and a
    /// single child is returned unwrapped.
    pub fn group(combinator: Combinator, children: Vec<Self>) -> Result<Self> {
        if children.is_empty() {
            debug!(%combinator, "rejected boolean group with no children");
            return Err(QueryError::invalid_argument(format!(
                "{combinator} needs at least one expression"
            )));
        }
        Ok(Self::join(combinator, children))
    }

    /// Creates a range between two literal bounds.
    pub fn range(
        lower: impl Into<String>,
        upper: impl Into<String>,
        bounds: Bounds,
    ) -> Result<Self> {
        let (lower, upper) = (lower.into(), upper.into());
        if lower.is_empty() || upper.is_empty() {
            debug!(%lower, %upper, "rejected range with empty bound");
            return Err(QueryError::invalid_argument("range bounds must not be empty"));
        }
        Ok(Self::Range(Range {
            lower,
            upper,
            bounds,
        }))
    }

    /// Joins two expressions with AND, merging existing AND groups.
    pub fn and(self, other: impl Into<Self>) -> Self {
        Self::join(Combinator::And, vec![self, other.into()])
    }

    /// Joins two expressions with OR, merging existing OR groups.
    pub fn or(self, other: impl Into<Self>) -> Self {
        Self::join(Combinator::Or, vec![self, other.into()])
    }

    /// Wraps this expression in a negation.
    ///
    /// Double negations are kept as written.
    pub fn negate(self) -> Self {
        Self::Not(Negation {
            child: Box::new(self),
        })
    }

    /// Boosts this expression by `factor`.
    ///
    /// `factor` accepts anything with a lossless conversion into `f64`: `f64`,
    /// `f32`, and integers up to 32 bits (`5`, `5u32`). Cast `u64`, `i64` and
    /// `usize` weights with `as f64`.
    ///
    /// Ranges, boosts and proximity queries cannot be boosted.
    pub fn boost(self, factor: impl Into<f64>) -> Result<Self> {
        let factor = factor.into();
        if let Some(kind) = self.unboostable_kind() {
            debug!(kind, factor, "rejected boost");
            return Err(QueryError::invalid_operation(format!("cannot boost a {kind}")));
        }
        if !factor.is_finite() || factor <= 0.0 {
            debug!(factor, "rejected boost factor");
            return Err(QueryError::invalid_argument(format!(
                "boost factor must be a positive number, got {factor}"
            )));
        }
        Ok(Self::Boost(Boost {
            child: Box::new(self),
            factor,
        }))
    }

    /// Turns a multi-word term into a proximity query.
    pub fn proximity(self, distance: u32) -> Result<Self> {
        let phrase = match self {
            Self::Term(term) if term.is_phrase() => term.text,
            other => {
                debug!(kind = other.kind_name(), "rejected proximity");
                return Err(QueryError::invalid_operation(format!(
                    "proximity applies only to multi-word phrases, not a {}",
                    other.kind_name()
                )));
            }
        };
        if distance == 0 {
            debug!("rejected zero proximity distance");
            return Err(QueryError::invalid_argument(
                "proximity distance must be positive",
            ));
        }
        Ok(Self::Proximity(Proximity { phrase, distance }))
    }

    /// Renders the expression as a query string. Same as the `Display` output.
    pub fn render(&self) -> String {
        self.to_string()
    }

    /// Returns the combinator if this is a boolean group.
    pub fn combinator(&self) -> Option<Combinator> {
        match self {
            Self::Group(group) => Some(group.combinator),
            _ => None,
        }
    }

    /// Flattens same-combinator groups, orders the children and wraps them.
    ///
    /// `children` must not be empty.
    fn join(combinator: Combinator, children: Vec<Self>) -> Self {
        let mut flattened: Vec<Self> = children
            .into_iter()
            .flat_map(|e| match e {
                Self::Group(group) if group.combinator == combinator => group.children,
                other => vec![other],
            })
            .collect();
        order::canonicalize(&mut flattened);

        match <[Self; 1]>::try_from(flattened) {
            Ok([only]) => only,
            Err(children) => Self::Group(BooleanGroup {
                combinator,
                children,
            }),
        }
    }

    /// Names the node kind if it cannot carry a boost.
    fn unboostable_kind(&self) -> Option<&'static str> {
        match self {
            Self::Range(_) | Self::Boost(_) | Self::Proximity(_) => Some(self.kind_name()),
            _ => None,
        }
    }

    /// Short human-readable name of the node kind, for error messages.
    fn kind_name(&self) -> &'static str {
        match self {
            Self::Term(term) if term.is_phrase() => "phrase",
            Self::Term(_) => "single-word term",
            Self::Field(_) => "field binding",
            Self::Group(_) => "boolean group",
            Self::Not(_) => "negation",
            Self::Range(_) => "range",
            Self::Boost(_) => "boost",
            Self::Proximity(_) => "proximity query",
        }
    }
}

impl From<&str> for Expression {
    fn from(text: &str) -> Self {
        Self::term(text)
    }
}

impl From<String> for Expression {
    fn from(text: String) -> Self {
        Self::term(text)
    }
}

impl From<Term> for Expression {
    fn from(term: Term) -> Self {
        Self::Term(term)
    }
}

impl BitAnd for Expression {
    type Output = Self;

    fn bitand(self, rhs: Self) -> Self {
        self.and(rhs)
    }
}

impl BitOr for Expression {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        self.or(rhs)
    }
}

impl Not for Expression {
    type Output = Self;

    fn not(self) -> Self {
        self.negate()
    }
}
