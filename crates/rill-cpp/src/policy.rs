//! Strategy selection: a pure decision table from complexity
//! classification to lowering strategy.
//!
//! Every selectable strategy for a given classification encodes the same
//! observable control flow; swapping one for another changes only which
//! C++ construct carries it.

use crate::analysis::{BlockComplexity, MatchShape};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockStrategy {
    /// Substitute the result expression in place, no wrapping.
    Inline,
    /// Immediately-invoked `[&]` closure: statements, then an explicit
    /// return of the result expression.
    Iife,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CondStrategy {
    Ternary,
    /// Explicit branches inside an immediately-invoked closure.
    Branch,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchStrategy {
    /// Ordered if/return chain over regex tests, first match wins.
    RegexIfChain,
    /// Dispatch over the sum type's variant tag via
    /// `std::holds_alternative`.
    VariantChain,
}

#[derive(Debug, Clone, Copy)]
pub struct RuntimePolicy {
    trivial_block: BlockStrategy,
    simple_block: BlockStrategy,
    complex_block: BlockStrategy,
}

impl Default for RuntimePolicy {
    fn default() -> Self {
        Self {
            trivial_block: BlockStrategy::Inline,
            simple_block: BlockStrategy::Iife,
            complex_block: BlockStrategy::Iife,
        }
    }
}

impl RuntimePolicy {
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the strategy used for one block classification.
    pub fn with_block_strategy(mut self, class: BlockComplexity, strategy: BlockStrategy) -> Self {
        match class {
            BlockComplexity::Trivial => self.trivial_block = strategy,
            BlockComplexity::Simple => self.simple_block = strategy,
            BlockComplexity::Complex => self.complex_block = strategy,
        }
        self
    }

    pub fn block_strategy(&self, class: BlockComplexity) -> BlockStrategy {
        match class {
            BlockComplexity::Trivial => self.trivial_block,
            BlockComplexity::Simple => self.simple_block,
            BlockComplexity::Complex => self.complex_block,
        }
    }

    pub fn cond_strategy(&self, ternary_candidate: bool) -> CondStrategy {
        if ternary_candidate {
            CondStrategy::Ternary
        } else {
            CondStrategy::Branch
        }
    }

    pub fn match_strategy(&self, shape: MatchShape) -> MatchStrategy {
        if shape.has_regex {
            MatchStrategy::RegexIfChain
        } else {
            MatchStrategy::VariantChain
        }
    }
}
