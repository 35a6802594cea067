//! Prerequisite evaluator

use crate::character::TraitState;
use crate::prereq::ast::{PrereqNode, Requirement, Subject, Test};

/// Evaluate an AST against the character built so far
pub fn check(ast: &PrereqNode, state: &TraitState) -> bool {
    match ast {
        PrereqNode::Single(req) => check_single(req, state),
        PrereqNode::And(left, right) => check(left, state) && check(right, state),
        PrereqNode::Or(left, right) => check(left, state) || check(right, state),
    }
}

fn check_single(req: &Requirement, state: &TraitState) -> bool {
    match (&req.subject, req.test) {
        (Subject::Trait(name), Test::Present) => state.has_trait(name),
        (Subject::Trait(name), Test::Absent) => !state.has_trait(name),
        (Subject::Trait(name), Test::Compare(op, value)) => {
            op.apply(state.trait_level(name) as f64, value)
        }

        (Subject::Tag(tag), Test::Present) => state.tag_count(tag) > 0,
        (Subject::Tag(tag), Test::Absent) => state.tag_count(tag) == 0,
        (Subject::Tag(tag), Test::Compare(op, value)) => {
            op.apply(state.tag_count(tag) as f64, value)
        }

        (Subject::Attribute(attribute), Test::Compare(op, value)) => {
            op.apply(state.attribute(*attribute), value)
        }
        // The parser never produces bare attribute requirements
        (Subject::Attribute(_), _) => false,
    }
}
