//! Per-category point counters

use crate::config::{BudgetSpec, BudgetUnit};
use crate::error::{GeneratorError, Result};

/// One declared category
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pool {
    pub category: String,
    /// Signed allocation as declared (negative for disadvantages)
    pub allocation: i32,
    pub unit: BudgetUnit,
    remaining: u32,
}

impl Pool {
    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    /// Magnitude charged so far
    pub fn spent(&self) -> u32 {
        self.allocation.unsigned_abs() - self.remaining
    }
}

/// Remaining build points per category.
///
/// Counters hold magnitudes, so a `-20` disadvantage allowance is a pool of 20
/// that disadvantage costs are charged against. No counter can go below zero.
#[derive(Debug, Clone, Default)]
pub struct PointBudget {
    // Declaration order is kept for display
    pools: Vec<Pool>,
}

impl PointBudget {
    pub fn new(specs: &[BudgetSpec]) -> Self {
        let pools = specs
            .iter()
            .map(|spec| Pool {
                category: spec.category.clone(),
                allocation: spec.points,
                unit: spec.unit,
                remaining: spec.points.unsigned_abs(),
            })
            .collect();
        Self { pools }
    }

    #[inline]
    fn pool(&self, category: &str) -> Option<&Pool> {
        self.pools.iter().find(|p| p.category == category)
    }

    /// Remaining points; undeclared categories have none
    #[inline]
    pub fn available(&self, category: &str) -> u32 {
        self.pool(category).map(|p| p.remaining).unwrap_or(0)
    }

    #[inline]
    pub fn can_afford(&self, category: &str, amount: u32) -> bool {
        self.pool(category).is_some_and(|p| amount <= p.remaining)
    }

    /// Deduct `amount` from `category`, or fail without touching the counter
    pub fn charge(&mut self, category: &str, amount: u32) -> Result<()> {
        let pool = self
            .pools
            .iter_mut()
            .find(|p| p.category == category)
            .ok_or_else(|| GeneratorError::UnknownCategory(category.to_string()))?;

        if amount > pool.remaining {
            return Err(GeneratorError::InsufficientPoints {
                category: category.to_string(),
                requested: amount,
                available: pool.remaining,
            });
        }

        pool.remaining -= amount;
        Ok(())
    }

    pub fn has_category(&self, category: &str) -> bool {
        self.pool(category).is_some()
    }

    pub fn allocation(&self, category: &str) -> Option<i32> {
        self.pool(category).map(|p| p.allocation)
    }

    pub fn spent(&self, category: &str) -> u32 {
        self.pool(category).map(Pool::spent).unwrap_or(0)
    }

    pub fn unit(&self, category: &str) -> Option<BudgetUnit> {
        self.pool(category).map(|p| p.unit)
    }

    /// Pools in declaration order
    pub fn pools(&self) -> &[Pool] {
        &self.pools
    }

    pub fn categories(&self) -> impl Iterator<Item = &str> {
        self.pools.iter().map(|p| p.category.as_str())
    }
}
