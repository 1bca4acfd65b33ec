//! Memoization of simulation results.
//!
//! Simulations are deterministic, so a result can be reused whenever the
//! same debts, budget, policy and configuration come around again, as they
//! do when a budget slider is dragged back and forth.

use crate::core::debt_id::DebtId;
use crate::core::debt_set::DebtSet;
use crate::policy::OrderingPolicy;
use crate::simulation::config::SimulationConfig;
use crate::simulation::result::SimulationResult;
use crate::simulation::simulator::{PayoffSimulator, SimulationError};
use log::trace;
use rust_decimal::Decimal;
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

/// Entries kept by [`SimulationCache::default`].
pub const DEFAULT_CAPACITY: usize = 256;

/// Everything a run depends on. Creditor names never reach the result and
/// are left out.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct CacheKey {
    debts: Vec<(DebtId, Decimal, Decimal, Decimal)>,
    budget: Decimal,
    policy: String,
}

impl CacheKey {
    fn new(debts: &DebtSet, policy: &dyn OrderingPolicy) -> Self {
        Self {
            debts: debts
                .debts()
                .iter()
                .map(|d| {
                    (
                        d.id().clone(),
                        d.remaining_balance(),
                        d.annual_interest_rate_percent(),
                        d.minimum_monthly_payment(),
                    )
                })
                .collect(),
            budget: debts.monthly_budget(),
            policy: policy.name().to_string(),
        }
    }
}

/// A simulator that remembers up to `capacity` of the results it has
/// produced, evicting the oldest first.
///
/// Policies are keyed by [`OrderingPolicy::name`], so two custom policies
/// sharing a name must also share behavior.
#[derive(Debug)]
pub struct SimulationCache {
    simulator: PayoffSimulator,
    results: HashMap<CacheKey, Arc<SimulationResult>>,
    insertion_order: VecDeque<CacheKey>,
    capacity: usize,
    hits: u64,
    misses: u64,
}

impl Default for SimulationCache {
    fn default() -> Self {
        Self::new(SimulationConfig::default())
    }
}

impl SimulationCache {
    pub fn new(config: SimulationConfig) -> Self {
        Self::with_capacity(config, DEFAULT_CAPACITY)
    }

    /// A cache holding at most `capacity` results. Zero disables caching.
    pub fn with_capacity(config: SimulationConfig, capacity: usize) -> Self {
        Self {
            simulator: PayoffSimulator::new(config),
            results: HashMap::new(),
            insertion_order: VecDeque::new(),
            capacity,
            hits: 0,
            misses: 0,
        }
    }

    /// Return the cached result or run the simulation and remember it.
    pub fn simulate(
        &mut self,
        debts: &DebtSet,
        policy: &dyn OrderingPolicy,
    ) -> Result<Arc<SimulationResult>, SimulationError> {
        let key = CacheKey::new(debts, policy);
        if let Some(result) = self.results.get(&key) {
            self.hits += 1;
            trace!("cache hit for {} ({:x})", key.policy, debts.fingerprint());
            return Ok(Arc::clone(result));
        }

        self.misses += 1;
        let result = Arc::new(self.simulator.run(debts, policy)?);
        if self.capacity == 0 {
            return Ok(result);
        }
        while self.results.len() >= self.capacity {
            match self.insertion_order.pop_front() {
                Some(oldest) => {
                    self.results.remove(&oldest);
                }
                None => break,
            }
        }
        self.insertion_order.push_back(key.clone());
        self.results.insert(key, Arc::clone(&result));
        Ok(result)
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn hits(&self) -> u64 {
        self.hits
    }

    pub fn misses(&self) -> u64 {
        self.misses
    }

    pub fn clear(&mut self) {
        self.results.clear();
        self.insertion_order.clear();
    }
}
