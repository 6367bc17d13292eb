//! Scenario runner for batch projections
//!
//! Holds the tax tables and horizon once, then runs many parameter sets.
//! Each projection is sequential on its own; independent parameter sets run
//! in parallel.

use rayon::prelude::*;

use crate::errors::Result;
use crate::projection::{ProjectionConfig, ProjectionEngine, ProjectionParams, ProjectionResult};
use crate::tax::TaxProfiles;

/// Pre-configured scenario runner
///
/// # Example
/// ```ignore
/// let runner = ScenarioRunner::new();
/// let results = runner.run_sweep(&params, &[4.0, 5.79, 7.0], |p, rate| {
///     p.mortgage.interest_rate_percent = rate;
/// })?;
/// ```
#[derive(Debug, Clone, Default)]
pub struct ScenarioRunner {
    engine: ProjectionEngine,
}

impl ScenarioRunner {
    /// Create runner with the built-in tax tables and a 30 year horizon
    pub fn new() -> Self {
        Self::default()
    }

    /// Create runner with custom tax tables and horizon
    pub fn with_profiles(profiles: TaxProfiles, config: ProjectionConfig) -> Self {
        Self {
            engine: ProjectionEngine::new(profiles, config),
        }
    }

    /// Run a single projection
    pub fn run(&self, params: &ProjectionParams) -> Result<ProjectionResult> {
        self.engine.project(params)
    }

    /// Run several parameter sets; fails if any one of them fails
    pub fn run_batch(&self, scenarios: &[ProjectionParams]) -> Result<Vec<ProjectionResult>> {
        scenarios.par_iter().map(|params| self.engine.project(params)).collect()
    }

    /// Vary one input over `values`, starting from `base` each time
    pub fn run_sweep<F>(&self, base: &ProjectionParams, values: &[f64], apply: F) -> Result<Vec<(f64, ProjectionResult)>>
    where
        F: Fn(&mut ProjectionParams, f64) + Sync,
    {
        values
            .par_iter()
            .map(|&value| -> Result<(f64, ProjectionResult)> {
                let mut params = base.clone();
                apply(&mut params, value);
                Ok((value, self.engine.project(&params)?))
            })
            .collect()
    }

    pub fn engine(&self) -> &ProjectionEngine {
        &self.engine
    }
}
