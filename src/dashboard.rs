//! Dashboard service: selection in, panel out
//!
//! Every error raised while resolving, fetching or parsing is turned into a
//! [`Panel::Failed`] here, so callers can render it and keep going.

use crate::cache::{CacheStats, Clock, FreshnessCache, Loaded, SystemClock};
use crate::catalog::{Category, FetchTarget, Resolved, Resolver, Selection};
use crate::config::Config;
use crate::error::{DashError, DashResult, ErrorKind};
use crate::fetch::{SheetFetcher, TableSource, UreqTransport};
use crate::table::Table;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use std::time::Duration;
use tracing::warn;

/// Dashboard wired to the network
pub type LiveDashboard = Dashboard<SheetFetcher<UreqTransport>>;

/// A loaded table ready for display
#[derive(Debug, Clone)]
pub struct View {
    pub title: String,
    pub category: Category,
    pub target: FetchTarget,
    pub table: Arc<Table>,
    pub row_count: usize,
    pub fetched_at: DateTime<Utc>,
    pub cached: bool,
}

impl View {
    fn new(resolved: Resolved, loaded: Loaded) -> Self {
        Self {
            title: resolved.title(),
            category: resolved.category,
            row_count: loaded.table.row_count(),
            table: loaded.table,
            fetched_at: loaded.fetched_at,
            cached: loaded.cached,
            target: resolved.target,
        }
    }

    /// Count line, e.g. `Total Conversations: 12`
    pub fn summary(&self) -> String {
        format!("{}: {}", self.category.count_label(), self.row_count)
    }
}

/// What the presentation renders for one selection
#[derive(Debug, Clone)]
pub enum Panel {
    Loaded(View),
    Failed {
        kind: ErrorKind,
        message: String,
        hint: Option<&'static str>,
        /// Trying the same selection again may succeed
        retryable: bool,
    },
}

/// Resolver and table cache shared by every selection in a process
pub struct Dashboard<S, C = SystemClock> {
    resolver: Resolver,
    cache: FreshnessCache<S, C>,
}

impl LiveDashboard {
    /// Build the dashboard from configuration
    pub fn from_config(config: &Config) -> DashResult<Self> {
        let resolver = Resolver::from_sources(&config.sources)?;
        let cache = FreshnessCache::new(
            SheetFetcher::from_config(&config.http),
            Duration::from_secs(config.cache.ttl_secs),
        );
        Ok(Self::new(resolver, cache))
    }
}

impl<S: TableSource, C: Clock> Dashboard<S, C> {
    pub fn new(resolver: Resolver, cache: FreshnessCache<S, C>) -> Self {
        Self { resolver, cache }
    }

    pub fn resolver(&self) -> &Resolver {
        &self.resolver
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    /// Resolve and load a selection
    pub fn open(&self, selection: &Selection) -> DashResult<View> {
        let resolved = self.resolver.resolve_selection(selection)?;
        let loaded = self.cache.load(&resolved.target)?;
        Ok(View::new(resolved, loaded))
    }

    /// Like [`open`](Self::open) but always fetches.
    ///
    /// A failed fetch leaves any cached copy in place.
    pub fn refresh(&self, selection: &Selection) -> DashResult<View> {
        let resolved = self.resolver.resolve_selection(selection)?;
        let loaded = self.cache.reload(&resolved.target)?;
        Ok(View::new(resolved, loaded))
    }

    /// Load a selection, converting failures into an error panel
    pub fn show(&self, selection: &Selection) -> Panel {
        into_panel(selection.category, self.open(selection))
    }

    /// Like [`show`](Self::show) but bypasses the cache
    pub fn show_fresh(&self, selection: &Selection) -> Panel {
        into_panel(selection.category, self.refresh(selection))
    }
}

fn into_panel(category: Category, result: DashResult<View>) -> Panel {
    match result {
        Ok(view) => Panel::Loaded(view),
        Err(e) => {
            let e = DashError::load(category.failure_prefix(), e);
            warn!("{}", e);
            Panel::Failed {
                kind: e.kind(),
                message: e.to_string(),
                hint: e.hint(),
                retryable: e.is_retryable(),
            }
        }
    }
}
