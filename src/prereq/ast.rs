//! Abstract Syntax Tree for prerequisite expressions

use crate::character::Attribute;

/// AST node for prerequisite expressions
#[derive(Debug, Clone, PartialEq)]
pub enum PrereqNode {
    /// Single requirement like `Magery>=2`
    Single(Requirement),
    /// AND operation
    And(Box<PrereqNode>, Box<PrereqNode>),
    /// OR operation
    Or(Box<PrereqNode>, Box<PrereqNode>),
}

impl PrereqNode {
    /// Every requirement in the tree, left to right
    pub fn requirements(&self) -> Vec<&Requirement> {
        let mut out = Vec::new();
        self.collect(&mut out);
        out
    }

    fn collect<'a>(&'a self, out: &mut Vec<&'a Requirement>) {
        match self {
            PrereqNode::Single(req) => out.push(req),
            PrereqNode::And(left, right) | PrereqNode::Or(left, right) => {
                left.collect(out);
                right.collect(out);
            }
        }
    }
}

/// Single requirement expression
#[derive(Debug, Clone, PartialEq)]
pub struct Requirement {
    pub subject: Subject,
    pub test: Test,
}

/// What a requirement looks at
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Subject {
    /// A trait by name, or the base name of a leveled trait
    Trait(String),
    /// Number of picks carrying a tag (`@Fire`)
    Tag(String),
    /// A primary or secondary attribute
    Attribute(Attribute),
}

/// How the subject is tested
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Test {
    Present,
    Absent,
    Compare(Operator, f64),
}

/// Comparison operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    /// Greater than (>)
    Greater,
    /// Less than (<)
    Less,
    /// Greater than or equal (>=)
    GreaterEqual,
    /// Less than or equal (<=)
    LessEqual,
    /// Equal (=)
    Equal,
    /// Not equal (!=)
    NotEqual,
}

impl Operator {
    #[inline]
    pub fn apply(self, left: f64, right: f64) -> bool {
        match self {
            Operator::Greater => left > right,
            Operator::Less => left < right,
            Operator::GreaterEqual => left >= right,
            Operator::LessEqual => left <= right,
            Operator::Equal => (left - right).abs() < f64::EPSILON,
            Operator::NotEqual => (left - right).abs() >= f64::EPSILON,
        }
    }
}
