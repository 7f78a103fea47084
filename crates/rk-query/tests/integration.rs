//! Integration tests for rk-query.
//!
//! Covers the documented builder-to-string contract and the escaping and
//! ordering guarantees of the renderer.

// Integration tests live outside cfg(test) by design
#![allow(clippy::tests_outside_test_module)]

use proptest::prelude::*;
use rk_query::{
    Expression, QueryError, all, all_fields, and, any_fields, between, boost, field, none,
    none_fields, not, not_fields, or, range, range_exclusive, range_inclusive, term,
};

/// Decodes the value of a rendered `name:value` clause.
///
/// Returns `None` if the text is not exactly one such clause, e.g. because
/// a quote was left open or trailing syntax follows the value.
fn decode_field_value(rendered: &str, name: &str) -> Option<String> {
    let value = rendered.strip_prefix(name)?.strip_prefix(':')?;

    let Some(quoted) = value.strip_prefix('"') else {
        let bare = !value.is_empty()
            && value.bytes().all(|b| b.is_ascii_alphanumeric())
            && !["AND", "OR", "NOT", "TO"].contains(&value);
        return bare.then(|| value.to_owned());
    };

    let mut decoded = String::new();
    let mut chars = quoted.chars();
    while let Some(ch) = chars.next() {
        match ch {
            '\\' => decoded.push(chars.next()?),
            '"' => return chars.next().is_none().then_some(decoded),
            other => decoded.push(other),
        }
    }
    None
}

#[test]
fn test_documented_examples() {
    let cases: Vec<(Expression, &str)> = vec![
        (term("some literal"), r#""some literal""#),
        (
            field("field", "literal value").unwrap(),
            r#"field:"literal value""#,
        ),
        (not(field("blocked", "yes").unwrap()), "NOT blocked:yes"),
        (all([term("word1"), term("word2")]).unwrap(), "word1 AND word2"),
        (
            rk_query::any([
                field("username", "foo").unwrap(),
                field("email", "foo@example.com").unwrap(),
            ])
            .unwrap(),
            r#"email:"foo@example.com" OR username:foo"#,
        ),
        (
            and(
                rk_query::any([term("word1"), term("word2")]).unwrap(),
                term("word3"),
            ),
            "(word1 OR word2) AND word3",
        ),
        (
            none([
                field("blocked", "yes").unwrap(),
                field("cheque_bounced", "yes").unwrap(),
            ])
            .unwrap(),
            "NOT (blocked:yes OR cheque_bounced:yes)",
        ),
        (range_inclusive("red", "rum").unwrap(), "[red TO rum]"),
        (range_exclusive("red", "rum").unwrap(), "{red TO rum}"),
        (term("red").boost(5.0).unwrap(), "red^5"),
        (
            term("See spot run").proximity(20).unwrap(),
            r#""See spot run"~20"#,
        ),
    ];

    for (expr, expected) in cases {
        assert_eq!(expr.render(), expected, "rendering {expr:?}");
    }
}

#[test]
fn test_named_pair_examples() {
    let creds = all_fields([("username", "foo"), ("password", "s3cr3t")]).unwrap();
    assert_eq!(creds.render(), "password:s3cr3t AND username:foo");

    let login = any_fields([("username", "foo"), ("email", "foo@example.com")]).unwrap();
    assert_eq!(
        login.render(),
        r#"email:"foo@example.com" OR username:foo"#
    );

    let query = login & field("password", "s3cr3t").unwrap();
    assert_eq!(
        query.render(),
        r#"(email:"foo@example.com" OR username:foo) AND password:s3cr3t"#
    );
}

#[test]
fn test_negation_helpers() {
    let blocked = [("blocked", "yes"), ("cheque_bounced", "yes")];
    let expected = "NOT (blocked:yes OR cheque_bounced:yes)";

    assert_eq!(none_fields(blocked).unwrap().render(), expected);
    assert_eq!((!any_fields(blocked).unwrap()).render(), expected);
    assert_eq!(
        not_fields([("blocked", "yes")]).unwrap().render(),
        "NOT blocked:yes"
    );
}

#[test]
fn test_group_as_field_value() {
    let expr = field("field", rk_query::any(["string1", "string2"]).unwrap()).unwrap();
    assert_eq!(expr.render(), "field:(string1 OR string2)");
}

#[test]
fn test_range_as_field_value() {
    let expr = field("field", range("red", "rum").unwrap()).unwrap();
    assert_eq!(expr.render(), "field:[red TO rum]");
}

#[test]
fn test_range_constructors_pick_brackets() {
    assert_eq!(range("a", "b").unwrap().render(), "[a TO b]");
    assert_eq!(range_inclusive("a", "b").unwrap().render(), "[a TO b]");
    assert_eq!(range_exclusive("a", "b").unwrap().render(), "{a TO b}");
    assert_eq!(between("a", "b").unwrap().render(), "{a TO b}");
}

#[test]
fn test_or_with_and_group_puts_group_first() {
    let expr = term("word3").or(all(["word1", "word2"]).unwrap());
    assert_eq!(expr.render(), "(word1 AND word2) OR word3");
}

#[test]
fn test_associativity_flattening() {
    let (a, b, c) = (term("a"), term("b"), term("c"));

    let left = and(and(a.clone(), b.clone()), c.clone());
    let right = and(a.clone(), and(b.clone(), c.clone()));
    let flat = all([a, b, c]).unwrap();

    assert_eq!(left.render(), "a AND b AND c");
    assert_eq!(right.render(), "a AND b AND c");
    assert_eq!(flat.render(), "a AND b AND c");
    assert_eq!(left, flat);
    assert_eq!(right, flat);
}

#[test]
fn test_and_of_two_and_groups_is_flat() {
    let first = all(["A", "B"]).unwrap() & all(["C", "D"]).unwrap();
    let second = all(["A", "B", "C", "D"]).unwrap();
    assert_eq!(first.render(), second.render());

    let first = rk_query::any(["A", "B"]).unwrap() | rk_query::any(["C", "D"]).unwrap();
    let second = rk_query::any(["A", "B", "C", "D"]).unwrap();
    assert_eq!(first.render(), second.render());
}

#[test]
fn test_mixed_combinators_are_grouped() {
    let expr = and(or("a", "b"), "c");
    assert_eq!(expr.render(), "(a OR b) AND c");

    let expr = or(and("a", "b"), and("c", "d"));
    assert_eq!(expr.render(), "(a AND b) OR (c AND d)");
}

#[test]
fn test_duplicate_field_names_render_the_same_in_any_order() {
    let forward = all_fields([("f", boost("x", 2).unwrap()), ("f", term("x"))]).unwrap();
    let backward = all_fields([("f", term("x")), ("f", boost("x", 2).unwrap())]).unwrap();
    assert_eq!(forward.render(), "f:x AND f:x^2");
    assert_eq!(backward.render(), forward.render());
}

#[test]
fn test_boosted_and_plain_twins_render_the_same_in_any_order() {
    let boosted = term("x").boost(2).unwrap();
    let forward = rk_query::any([boosted.clone(), term("x")]).unwrap();
    let backward = rk_query::any([term("x"), boosted]).unwrap();
    assert_eq!(forward.render(), "x OR x^2");
    assert_eq!(backward.render(), forward.render());
}

#[test]
fn test_double_negation_is_kept() {
    assert_eq!(not(not("a")).render(), "NOT NOT a");
    assert_eq!(not(not(or("a", "b"))).render(), "NOT NOT (a OR b)");
}

#[test]
fn test_construction_errors() {
    assert!(matches!(
        field("", "x"),
        Err(QueryError::InvalidArgument { .. })
    ));
    assert!(matches!(
        range("", "rum"),
        Err(QueryError::InvalidArgument { .. })
    ));
    assert!(matches!(
        term("red").boost(0.0),
        Err(QueryError::InvalidArgument { .. })
    ));
    assert!(matches!(
        term("red").proximity(3),
        Err(QueryError::InvalidOperation { .. })
    ));
    assert!(matches!(
        range("a", "b").unwrap().boost(2.0),
        Err(QueryError::InvalidOperation { .. })
    ));
}

#[test]
fn test_injection_attempts_stay_literal() {
    let hostile = [
        r#"foo" OR admin:true OR "x"#,
        r"\",
        r#"\""#,
        "OR",
        "a) OR (b",
        "*:*",
        "",
    ];
    for value in hostile {
        let rendered = field("f", value).unwrap().render();
        assert_eq!(
            decode_field_value(&rendered, "f").as_deref(),
            Some(value),
            "value {value:?} rendered as {rendered}"
        );
    }
}

#[test]
fn test_expressions_are_thread_safe() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<Expression>();
    assert_send_sync::<QueryError>();
}

/// Literals weighted towards characters with meaning in the query syntax.
fn hostile_literal() -> impl Strategy<Value = String> {
    prop_oneof![
        any::<String>(),
        r#"[a-zA-Z0-9 +\-&|!(){}\[\]^"~*?:\\/@.]{0,24}"#,
        Just("AND".to_owned()),
        Just("NOT".to_owned()),
    ]
}

/// Field values that are either a plain term or the same term boosted.
fn plain_or_boosted_value() -> impl Strategy<Value = Expression> {
    ("[a-c]{1,2}", prop::option::of(1u8..4)).prop_map(|(text, factor)| match factor {
        Some(factor) => term(text).boost(factor).unwrap(),
        None => term(text),
    })
}

proptest! {
    /// Property: every literal renders as one field clause that decodes back to itself
    #[test]
    fn prop_field_value_round_trips(value in hostile_literal()) {
        let rendered = field("f", value.as_str()).unwrap().render();
        prop_assert_eq!(decode_field_value(&rendered, "f"), Some(value));
    }

    /// Property: named pairs render the same whatever order they arrive in
    #[test]
    fn prop_named_pairs_are_order_independent(
        (pairs, shuffled) in prop::collection::vec(("[a-z_]{1,8}", hostile_literal()), 1..6)
            .prop_flat_map(|pairs| (Just(pairs.clone()), Just(pairs).prop_shuffle()))
    ) {
        let first = all_fields(pairs.clone()).unwrap().render();
        let second = all_fields(shuffled).unwrap().render();
        let again = all_fields(pairs).unwrap().render();
        prop_assert_eq!(&first, &second);
        prop_assert_eq!(first, again);
    }

    /// Property: repeated field names with plain or boosted values still render
    /// the same whatever order they arrive in
    #[test]
    fn prop_duplicate_names_are_order_independent(
        (pairs, shuffled) in prop::collection::vec(("[fg]", plain_or_boosted_value()), 1..8)
            .prop_flat_map(|pairs| (Just(pairs.clone()), Just(pairs).prop_shuffle()))
    ) {
        let first = all_fields(pairs.clone()).unwrap().render();
        let second = all_fields(shuffled.clone()).unwrap().render();
        prop_assert_eq!(first, second);

        let values: Vec<Expression> = pairs.into_iter().map(|(_, value)| value).collect();
        let shuffled: Vec<Expression> = shuffled.into_iter().map(|(_, value)| value).collect();
        prop_assert_eq!(
            rk_query::any(values).unwrap().render(),
            rk_query::any(shuffled).unwrap().render()
        );
    }

    /// Property: rendering never emits unbalanced quotes for a plain term
    #[test]
    fn prop_term_quotes_are_balanced(value in hostile_literal()) {
        let rendered = term(value).render();
        let mut escaped = false;
        let mut unescaped_quotes = 0;
        for ch in rendered.chars() {
            match (escaped, ch) {
                (true, _) => escaped = false,
                (false, '\\') => escaped = true,
                (false, '"') => unescaped_quotes += 1,
                _ => {}
            }
        }
        prop_assert!(unescaped_quotes == 0 || unescaped_quotes == 2);
    }
}
