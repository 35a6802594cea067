//! Property tests for the prerequisite module
//!
//! Parsing accepts every generated well-formed expression, comparison
//! results agree with plain arithmetic, and AND/OR follow boolean logic.

use proptest::prelude::*;

use crate::character::{Attribute, TraitState};
use crate::config::TraitOption;
use crate::prereq::ast::{Operator, PrereqNode, Subject, Test};
use crate::prereq::evaluator::check;
use crate::prereq::parser::parse;

// ═══════════════════════════════════════════════════════════════════════════
// Strategy generators for property tests
// ═══════════════════════════════════════════════════════════════════════════

fn attribute_name_strategy() -> impl Strategy<Value = &'static str> {
    prop_oneof![
        Just("ST"),
        Just("DX"),
        Just("IQ"),
        Just("HT"),
        Just("Will"),
        Just("Per"),
    ]
}

fn operator_strategy() -> impl Strategy<Value = (&'static str, Operator)> {
    prop_oneof![
        Just((">", Operator::Greater)),
        Just(("<", Operator::Less)),
        Just((">=", Operator::GreaterEqual)),
        Just(("<=", Operator::LessEqual)),
        Just(("=", Operator::Equal)),
        Just(("!=", Operator::NotEqual)),
    ]
}

fn trait_name_strategy() -> impl Strategy<Value = String> {
    "[A-Z][a-z]{2,8}( [A-Z][a-z]{2,8})?"
        .prop_filter("attribute names are not traits", |name| {
            Attribute::from_name(name).is_none()
        })
}

fn simple_requirement_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        trait_name_strategy(),
        trait_name_strategy().prop_map(|name| format!("!{}", name)),
        (trait_name_strategy(), operator_strategy(), 0..=6i32)
            .prop_map(|(name, (op, _), level)| format!("{}{}{}", name, op, level)),
        (attribute_name_strategy(), operator_strategy(), 5..=18i32)
            .prop_map(|(attr, (op, _), value)| format!("{}{}{}", attr, op, value)),
    ]
}

fn compound_strategy() -> impl Strategy<Value = String> {
    prop::collection::vec((simple_requirement_strategy(), prop::bool::ANY), 1..=5).prop_map(
        |parts| {
            let mut text = String::new();
            for (i, (part, use_and)) in parts.iter().enumerate() {
                if i > 0 {
                    text.push_str(if *use_and { " & " } else { " | " });
                }
                text.push_str(part);
            }
            text
        },
    )
}

// ═══════════════════════════════════════════════════════════════════════════
// Property Tests
// ═══════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn prop_well_formed_expressions_parse(expr in compound_strategy()) {
        let ast = parse(&expr);
        prop_assert!(ast.is_ok(), "failed to parse {}: {:?}", expr, ast.err());
    }

    #[test]
    fn prop_parenthesised_expressions_parse(expr in compound_strategy()) {
        let wrapped = format!("({})", expr);
        prop_assert_eq!(parse(&wrapped).unwrap(), parse(&expr).unwrap());
    }

    #[test]
    fn prop_attribute_comparison_matches_arithmetic(
        attr in attribute_name_strategy(),
        (symbol, operator) in operator_strategy(),
        base in 6..=16i32,
        bonus in 0..=4i32,
        threshold in 5..=20i32
    ) {
        let mut state = TraitState::new();
        let primary = match attr {
            "Will" | "Per" => "IQ",
            other => other,
        };
        state.record(&TraitOption::new(&format!("{} {}", primary, base), 0));
        if bonus > 0 {
            state.record(&TraitOption::new(&format!("{} +{}", primary, bonus), 0));
        }

        let ast = parse(&format!("{}{}{}", attr, symbol, threshold)).unwrap();
        let expected = operator.apply((base + bonus) as f64, threshold as f64);
        prop_assert_eq!(check(&ast, &state), expected);
    }

    #[test]
    fn prop_level_comparison_matches_arithmetic(
        name in trait_name_strategy(),
        level in 1..=6i32,
        (symbol, operator) in operator_strategy(),
        threshold in 0..=7i32
    ) {
        let mut state = TraitState::new();
        state.record(&TraitOption::new(&format!("{} {}", name, level), 5));

        let ast = parse(&format!("\"{}\"{}{}", name, symbol, threshold)).unwrap();
        match &ast {
            PrereqNode::Single(req) => {
                prop_assert_eq!(&req.subject, &Subject::Trait(name.clone()));
                prop_assert_eq!(req.test, Test::Compare(operator, threshold as f64));
            }
            other => prop_assert!(false, "expected single requirement, got {:?}", other),
        }
        prop_assert_eq!(check(&ast, &state), operator.apply(level as f64, threshold as f64));
    }

    #[test]
    fn prop_and_or_follow_boolean_logic(
        a in trait_name_strategy(),
        b in trait_name_strategy(),
        has_a in prop::bool::ANY,
        has_b in prop::bool::ANY
    ) {
        prop_assume!(a != b);
        let mut state = TraitState::new();
        if has_a {
            state.record(&TraitOption::new(&a, 1));
        }
        if has_b {
            state.record(&TraitOption::new(&b, 1));
        }

        let and = parse(&format!("{} & {}", a, b)).unwrap();
        let or = parse(&format!("{} | {}", a, b)).unwrap();
        let not_a = parse(&format!("!{}", a)).unwrap();
        prop_assert_eq!(check(&and, &state), has_a && has_b);
        prop_assert_eq!(check(&or, &state), has_a || has_b);
        prop_assert_eq!(check(&not_a, &state), !has_a);
    }
}
