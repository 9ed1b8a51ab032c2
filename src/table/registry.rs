//! Tables keyed by channel, each wrapping one serialized engine.

use std::sync::{Arc, Mutex as StdMutex, PoisonError};

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::Mutex;

use super::timer::RoundTimer;
use crate::core::{ConfigError, DiceRng, PerudoConfig, UserRef};
use crate::engine::{ActionError, ActionOutcome, Command, GameEngine};
use crate::stats::{NullStats, StatsSink};

/// Host-side table key (typically a chat channel id).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TableId(pub u64);

impl std::fmt::Display for TableId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Table({})", self.0)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum TableError {
    #[error("a game is already running at {0}")]
    AlreadyExists(TableId),
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// One table: an engine behind an async mutex plus its round timer.
///
/// Every command goes through the mutex, so commands against the same
/// table never interleave.
#[derive(Debug)]
pub struct Table {
    id: TableId,
    engine: Arc<Mutex<GameEngine>>,
    timer: StdMutex<RoundTimer>,
}

impl Table {
    #[must_use]
    pub fn new(id: TableId, engine: GameEngine) -> Self {
        Self {
            id,
            engine: Arc::new(Mutex::new(engine)),
            timer: StdMutex::new(RoundTimer::new()),
        }
    }

    #[must_use]
    pub fn id(&self) -> TableId {
        self.id
    }

    /// The engine, for queries and listener registration.
    #[must_use]
    pub fn engine(&self) -> &Arc<Mutex<GameEngine>> {
        &self.engine
    }

    /// Execute a command and schedule the next round when one is due.
    #[tracing::instrument(level = "debug", skip(self), fields(table = %self.id))]
    pub async fn apply(&self, command: Command) -> Result<ActionOutcome, ActionError> {
        let (outcome, delay) = {
            let mut engine = self.engine.lock().await;
            let outcome = engine.apply(command)?;
            (outcome, engine.config().round_delay)
        };
        if outcome.needs_next_round() {
            let armed = self
                .timer
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .arm(Arc::downgrade(&self.engine), delay);
            if !armed {
                tracing::warn!(
                    target: "perudo.table",
                    table = %self.id,
                    "table closed; next round not scheduled"
                );
            }
        }
        Ok(outcome)
    }

    /// Whether a deferred round start is waiting.
    #[must_use]
    pub fn has_pending_round(&self) -> bool {
        self.timer
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_armed()
    }

    /// Abort the deferred round start, if any.
    pub fn cancel_pending_round(&self) -> bool {
        self.timer
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .cancel()
    }

    fn close(&self) {
        self.timer
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .close();
    }
}

/// All live tables. One game per table id.
pub struct TableRegistry {
    tables: FxHashMap<TableId, Arc<Table>>,
    stats: Arc<dyn StatsSink>,
    seeds: Option<DiceRng>,
}

impl Default for TableRegistry {
    fn default() -> Self {
        Self {
            tables: FxHashMap::default(),
            stats: Arc::new(NullStats),
            seeds: None,
        }
    }
}

impl std::fmt::Debug for TableRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TableRegistry")
            .field("tables", &self.tables.len())
            .finish_non_exhaustive()
    }
}

impl TableRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Every engine created here reports to `stats`.
    #[must_use]
    pub fn with_stats(mut self, stats: Arc<dyn StatsSink>) -> Self {
        self.stats = stats;
        self
    }

    /// Seed every table created without its own seed from a fork of `seed`.
    ///
    /// The same registry seed and creation order replay the same dice.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seeds = Some(DiceRng::new(seed));
        self
    }

    /// Open a lobby at `id` with `host` seated.
    pub fn create(
        &mut self,
        id: TableId,
        host: UserRef,
        config: PerudoConfig,
    ) -> Result<Arc<Table>, TableError> {
        if self.tables.contains_key(&id) {
            return Err(TableError::AlreadyExists(id));
        }
        let config = match (&mut self.seeds, config.seed) {
            (Some(seeds), None) => config.with_seed(seeds.fork().seed()),
            _ => config,
        };
        let engine = GameEngine::with_host(host, config)?.with_stats(self.stats.clone());
        let table = Arc::new(Table::new(id, engine));
        self.tables.insert(id, table.clone());
        tracing::info!(target: "perudo.table", table = %id, "table created");
        Ok(table)
    }

    #[must_use]
    pub fn get(&self, id: TableId) -> Option<Arc<Table>> {
        self.tables.get(&id).cloned()
    }

    #[must_use]
    pub fn contains(&self, id: TableId) -> bool {
        self.tables.contains_key(&id)
    }

    /// Remove a table and cancel its pending round.
    pub fn delete(&mut self, id: TableId) -> bool {
        match self.tables.remove(&id) {
            Some(table) => {
                table.close();
                tracing::info!(target: "perudo.table", table = %id, "table deleted");
                true
            }
            None => false,
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.tables.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = TableId> + '_ {
        self.tables.keys().copied()
    }
}
