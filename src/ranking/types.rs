//! Core trait and key type for ranking rules.

use std::cmp::Ordering;

/// A ranking key. Lower keys rank earlier.
///
/// Integer keys compare exactly over the whole `i64` range. Float keys use
/// IEEE total ordering, except that `0.0` and `-0.0` are equal, so every
/// key (NaN included) has a place in one strict total order. A rule should
/// always return the same variant; mixed variants order `Int` before
/// `Float`.
#[derive(Debug, Clone, Copy)]
pub enum RankKey {
    Int(i64),
    Float(f64),
}

impl Ord for RankKey {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (RankKey::Int(a), RankKey::Int(b)) => a.cmp(b),
            (RankKey::Float(a), RankKey::Float(b)) => {
                if a == b {
                    Ordering::Equal
                } else {
                    a.total_cmp(b)
                }
            }
            (RankKey::Int(_), RankKey::Float(_)) => Ordering::Less,
            (RankKey::Float(_), RankKey::Int(_)) => Ordering::Greater,
        }
    }
}

impl PartialOrd for RankKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for RankKey {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for RankKey {}

impl From<i64> for RankKey {
    fn from(v: i64) -> Self {
        RankKey::Int(v)
    }
}

impl From<f64> for RankKey {
    fn from(v: f64) -> Self {
        RankKey::Float(v)
    }
}

/// A scoring rule that places an item in a ranking.
///
/// A rule that ranks larger values first negates its key.
///
/// # Type Parameters
///
/// * `T` - The item type being ranked
/// * `C` - The context type providing state information
///
/// # Examples
///
/// ```ignore
/// struct HeaviestFirst;
///
/// impl RankingRule<Parcel, ()> for HeaviestFirst {
///     fn name(&self) -> &str { "HeaviestFirst" }
///     fn key(&self, parcel: &Parcel, _ctx: &()) -> RankKey {
///         RankKey::Float(-parcel.mass)
///     }
/// }
/// ```
pub trait RankingRule<T, C>: Send + Sync {
    /// Returns the name of this rule.
    fn name(&self) -> &str;

    /// Computes the ranking key for the given item.
    fn key(&self, item: &T, context: &C) -> RankKey;
}
