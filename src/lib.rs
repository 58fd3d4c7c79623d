pub mod config;
pub mod goals;
pub mod rest;
pub mod storage;
pub mod week;

use std::sync::Arc;

use config::HabitdConfig;
use goals::{CompletionAccountant, GoalRegistry, SummaryAggregator};
use storage::Storage;

/// Shared application state passed to every route handler.
#[derive(Clone)]
pub struct AppContext {
    pub config: Arc<HabitdConfig>,
    pub storage: Arc<Storage>,
    pub goal_registry: GoalRegistry,
    pub accountant: CompletionAccountant,
    pub summary_aggregator: SummaryAggregator,
    pub started_at: std::time::Instant,
}

impl AppContext {
    pub fn new(config: Arc<HabitdConfig>, storage: Arc<Storage>) -> Self {
        Self {
            config,
            goal_registry: GoalRegistry::new(storage.clone()),
            accountant: CompletionAccountant::new(storage.clone()),
            summary_aggregator: SummaryAggregator::new(storage.clone()),
            storage,
            started_at: std::time::Instant::now(),
        }
    }
}
