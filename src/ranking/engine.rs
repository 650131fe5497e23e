//! Rule composition engine.

use super::types::{RankKey, RankingRule};

/// Engine for composing and applying ranking rules.
///
/// Keys are compared exactly and sorting is stable: items whose keys tie
/// on every rule keep their relative input order.
///
/// # Examples
///
/// ```
/// use u_allocate::ranking::{RankKey, RankingRule, RuleEngine};
///
/// struct Ascending;
/// impl RankingRule<i64, ()> for Ascending {
///     fn name(&self) -> &str { "Ascending" }
///     fn key(&self, item: &i64, _ctx: &()) -> RankKey { RankKey::Int(*item) }
/// }
///
/// let engine = RuleEngine::new().with_rule(Ascending);
/// assert_eq!(engine.sort_indices(&[3, 1, 2], &()), vec![1, 2, 0]);
/// ```
pub struct RuleEngine<T, C> {
    rules: Vec<Box<dyn RankingRule<T, C>>>,
}

impl<T, C> RuleEngine<T, C> {
    /// Creates an engine with no rules.
    pub fn new() -> Self {
        Self { rules: Vec::new() }
    }

    /// Appends a rule. Rules are consulted in insertion order.
    pub fn with_rule<R: RankingRule<T, C> + 'static>(mut self, rule: R) -> Self {
        self.rules.push(Box::new(rule));
        self
    }

    /// Returns the number of rules in this engine.
    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }

    /// Returns the names of all rules in order.
    pub fn rule_names(&self) -> Vec<&str> {
        self.rules.iter().map(|r| r.name()).collect()
    }

    fn keys(&self, item: &T, context: &C) -> Vec<RankKey> {
        self.rules.iter().map(|r| r.key(item, context)).collect()
    }

    /// Ranks items and returns indices into the original slice.
    pub fn sort_indices(&self, items: &[T], context: &C) -> Vec<usize> {
        self.sort_subset(items, (0..items.len()).collect(), context)
    }

    /// Ranks only the items at `indices`, which must be valid positions in
    /// `items`. Ties keep the order `indices` was given in.
    pub fn sort_subset(&self, items: &[T], indices: Vec<usize>, context: &C) -> Vec<usize> {
        if self.rules.is_empty() {
            return indices;
        }

        let mut keyed: Vec<(Vec<RankKey>, usize)> = indices
            .into_iter()
            .map(|i| (self.keys(&items[i], context), i))
            .collect();

        // `sort_by` is stable; full ties keep input order.
        keyed.sort_by(|a, b| a.0.cmp(&b.0));
        keyed.into_iter().map(|(_, i)| i).collect()
    }
}

impl<T, C> Default for RuleEngine<T, C> {
    fn default() -> Self {
        Self::new()
    }
}
