//! Token predicates with quantifiers, alternation and inversion
use crate::tokens::{Category, Token, Value};
use std::ops::BitOr;
use std::slice;

/// Single-token predicate; empty category or value lists accept anything
#[derive(Debug, Clone, PartialEq)]
pub struct Leaf {
    categories: Vec<Category>,
    values: Vec<Value>,
    inverted: bool,
}

impl Leaf {
    fn category_match(&self, category: Category) -> bool {
        self.categories.is_empty() || self.categories.contains(&category)
    }

    fn value_match(&self, value: &Value) -> bool {
        self.values.is_empty() || self.values.contains(value)
    }

    pub fn matches(&self, token: Option<&Token>) -> bool {
        match token {
            None => false,
            Some(token) => {
                (self.category_match(token.category()) && self.value_match(token.value()))
                    ^ self.inverted
            }
        }
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn values(&self) -> &[Value] {
        &self.values
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Predicate {
    Leaf(Leaf),
    Any(Vec<Leaf>),
}

/// Matches a run of tokens.
///
/// Builders consume the matcher and return a new one, so a matcher shared by
/// clone is never changed behind another holder's back.
#[derive(Debug, Clone, PartialEq)]
pub struct Matcher {
    predicate: Predicate,
    min: usize,
    max: Option<usize>,
    caret: bool,
}

/// Result of [`Matcher::match_tokens`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MatchOutcome<'a> {
    pub matched: bool,
    pub tokens: &'a [Token],
}

impl<'a> MatchOutcome<'a> {
    pub fn consumed(&self) -> usize {
        self.tokens.len()
    }
}

impl Matcher {
    pub fn new<C, V>(categories: C, values: V) -> Self
    where
        C: IntoIterator<Item = Category>,
        V: IntoIterator<Item = Value>,
    {
        Self::from_predicate(Predicate::Leaf(Leaf {
            categories: categories.into_iter().collect(),
            values: values.into_iter().collect(),
            inverted: false,
        }))
    }

    /// Any token of `category`
    pub fn category(category: Category) -> Self {
        Self::new([category], std::iter::empty())
    }

    fn from_predicate(predicate: Predicate) -> Self {
        Self {
            predicate,
            min: 1,
            max: Some(1),
            caret: false,
        }
    }

    /// Toggle negation of a leaf; composites are unaffected
    pub fn invert(mut self) -> Self {
        if let Predicate::Leaf(leaf) = &mut self.predicate {
            leaf.inverted = !leaf.inverted;
        }
        self
    }

    /// Tag as anchored; matching itself ignores the tag
    pub fn caret(mut self) -> Self {
        self.caret = true;
        self
    }

    /// Zero or more
    pub fn star(mut self) -> Self {
        self.min = 0;
        self.max = None;
        self
    }

    /// Unbounded above; the lower bound is kept
    pub fn plus(mut self) -> Self {
        self.max = None;
        self
    }

    pub fn is_caret(&self) -> bool {
        self.caret
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self.predicate, Predicate::Leaf(_))
    }

    pub fn min(&self) -> usize {
        self.min
    }

    /// Upper bound, `None` when unbounded
    pub fn max(&self) -> Option<usize> {
        self.max
    }

    pub fn leaves(&self) -> &[Leaf] {
        match &self.predicate {
            Predicate::Leaf(leaf) => slice::from_ref(leaf),
            Predicate::Any(leaves) => leaves,
        }
    }

    fn into_leaves(self) -> Vec<Leaf> {
        match self.predicate {
            Predicate::Leaf(leaf) => vec![leaf],
            Predicate::Any(leaves) => leaves,
        }
    }

    /// Whether a single token satisfies the predicate; `None` never does
    pub fn matches(&self, token: Option<&Token>) -> bool {
        match &self.predicate {
            Predicate::Leaf(leaf) => leaf.matches(token),
            Predicate::Any(leaves) => leaves.iter().any(|leaf| leaf.matches(token)),
        }
    }

    /// Greedily consume tokens from `offset` without backtracking.
    ///
    /// Stops at the first rejected token, the end of the stream or the upper
    /// bound; matched when the count lies within the bounds.
    pub fn match_tokens<'a>(&self, tokens: &'a [Token], offset: usize) -> MatchOutcome<'a> {
        let start = offset.min(tokens.len());
        let mut count = 0;

        while self.max.map_or(true, |max| count < max) && self.matches(tokens.get(start + count)) {
            count += 1;
        }

        MatchOutcome {
            matched: count >= self.min && self.max.map_or(true, |max| count <= max),
            tokens: &tokens[start..start + count],
        }
    }
}

impl BitOr for Matcher {
    type Output = Matcher;

    /// Either operand; leaves are flattened and the quantifier reset to one
    fn bitor(self, rhs: Matcher) -> Matcher {
        let mut leaves = self.into_leaves();
        leaves.extend(rhs.into_leaves());
        Matcher::from_predicate(Predicate::Any(leaves))
    }
}
