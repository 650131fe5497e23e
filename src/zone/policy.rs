//! Zone selection policies.

use super::types::ZoneState;
use std::collections::HashMap;
use thiserror::Error;

/// A failed policy lookup. Scoped to one request; the batch continues.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PolicyError {
    /// The policy has never seen this state.
    #[error("invalid state: {0}")]
    UnknownState(ZoneState),

    /// The state is known but its action values are unusable.
    #[error("no usable action for state {0}")]
    NoAction(ZoneState),
}

/// Picks exactly one target zone for a state.
///
/// Any `Fn(&ZoneState) -> Result<String, PolicyError>` closure is a policy.
pub trait ZonePolicy: Send + Sync {
    fn best_zone(&self, state: &ZoneState) -> Result<String, PolicyError>;
}

impl<F> ZonePolicy for F
where
    F: Fn(&ZoneState) -> Result<String, PolicyError> + Send + Sync,
{
    fn best_zone(&self, state: &ZoneState) -> Result<String, PolicyError> {
        self(state)
    }
}

/// A tabular action-value policy: one row of action values per known
/// state; the chosen zone is the action with the highest value.
///
/// Ties go to the lowest action index. NaN values never win.
///
/// # Examples
///
/// ```
/// use u_allocate::zone::{QTablePolicy, Urgency, ZonePolicy, ZoneState};
///
/// let policy = QTablePolicy::new(vec!["A1".into(), "B1".into()])
///     .with_state(ZoneState::new(Urgency::High, false, false), vec![0.2, 0.9]);
///
/// let state = ZoneState::new(Urgency::High, false, false);
/// assert_eq!(policy.best_zone(&state).unwrap(), "B1");
/// assert!(policy.best_zone(&ZoneState::new(Urgency::Low, false, false)).is_err());
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct QTablePolicy {
    actions: Vec<String>,
    q_table: Vec<Vec<f64>>,
    #[cfg_attr(feature = "serde", serde(skip))]
    state_to_index: HashMap<ZoneState, usize>,
    states: Vec<ZoneState>,
}

impl QTablePolicy {
    /// Creates a policy over the given action (zone) labels, with no states.
    pub fn new(actions: Vec<String>) -> Self {
        Self {
            actions,
            ..Self::default()
        }
    }

    /// Adds or replaces the action values for a state.
    pub fn with_state(mut self, state: ZoneState, q_values: Vec<f64>) -> Self {
        self.insert(state, q_values);
        self
    }

    /// Adds or replaces the action values for a state.
    pub fn insert(&mut self, state: ZoneState, q_values: Vec<f64>) {
        match self.index_of(&state) {
            Some(idx) => self.q_table[idx] = q_values,
            None => {
                self.state_to_index.insert(state.clone(), self.q_table.len());
                self.states.push(state);
                self.q_table.push(q_values);
            }
        }
    }

    pub fn actions(&self) -> &[String] {
        &self.actions
    }

    /// Number of known states.
    pub fn state_count(&self) -> usize {
        self.states.len()
    }

    fn index_of(&self, state: &ZoneState) -> Option<usize> {
        self.state_to_index.get(state).copied().or_else(|| {
            // The index map is skipped by serde; rebuilt lazily by scanning.
            self.states.iter().position(|s| s == state)
        })
    }
}

impl ZonePolicy for QTablePolicy {
    fn best_zone(&self, state: &ZoneState) -> Result<String, PolicyError> {
        let idx = self
            .index_of(state)
            .ok_or_else(|| PolicyError::UnknownState(state.clone()))?;

        let mut best: Option<(usize, f64)> = None;
        for (action, &q) in self.q_table[idx].iter().enumerate() {
            if q.is_nan() {
                continue;
            }
            match best {
                Some((_, b)) if q <= b => {}
                _ => best = Some((action, q)),
            }
        }

        best.and_then(|(action, _)| self.actions.get(action).cloned())
            .ok_or_else(|| PolicyError::NoAction(state.clone()))
    }
}
