//! Persistence boundary and the compute-then-persist service.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::chart::{BirthChart, BirthData, ChartBuilder};
use crate::error::{AstrotError, Result};

/// Stores one chart per user.
#[async_trait]
pub trait ChartStore: Send + Sync {
    /// Insert or replace the user's chart.
    async fn save(&self, chart: &BirthChart) -> Result<()>;
    async fn load(&self, user_id: &str) -> Result<Option<BirthChart>>;
    /// Returns whether a chart was removed.
    async fn delete(&self, user_id: &str) -> Result<bool>;
}

/// Process-local store
#[derive(Debug, Default, Clone)]
pub struct InMemoryChartStore {
    charts: Arc<RwLock<HashMap<String, BirthChart>>>,
}

impl InMemoryChartStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.charts.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.charts.read().await.is_empty()
    }
}

#[async_trait]
impl ChartStore for InMemoryChartStore {
    async fn save(&self, chart: &BirthChart) -> Result<()> {
        self.charts
            .write()
            .await
            .insert(chart.user_id.clone(), chart.clone());
        Ok(())
    }

    async fn load(&self, user_id: &str) -> Result<Option<BirthChart>> {
        Ok(self.charts.read().await.get(user_id).cloned())
    }

    async fn delete(&self, user_id: &str) -> Result<bool> {
        Ok(self.charts.write().await.remove(user_id).is_some())
    }
}

/// Computes charts under the ephemeris timeout and persists only complete
/// results.
pub struct ChartService<S: ChartStore> {
    builder: ChartBuilder,
    store: S,
}

impl<S: ChartStore> ChartService<S> {
    pub fn new(builder: ChartBuilder, store: S) -> Self {
        Self { builder, store }
    }

    pub fn builder(&self) -> &ChartBuilder {
        &self.builder
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Compute the user's chart and store it. A user has one chart: when
    /// one is already stored it is recomputed under the same id and
    /// creation time.
    pub async fn submit(&self, user_id: &str, birth_data: BirthData) -> Result<BirthChart> {
        let existing = self.store.load(user_id).await?;
        let derived = self.builder.build_bounded(&birth_data).await.map_err(|e| {
            log::warn!("chart for {} not computed: {}", user_id, e);
            e
        })?;
        let chart = match existing {
            Some(mut chart) => {
                chart.recompute(birth_data, derived);
                chart
            }
            None => BirthChart::new(user_id, birth_data, derived),
        };
        self.store.save(&chart).await?;
        log::info!("stored chart {} for {}", chart.id, user_id);
        Ok(chart)
    }

    /// Recompute the user's existing chart from corrected birth data,
    /// keeping its id and creation time.
    pub async fn resubmit(&self, user_id: &str, birth_data: BirthData) -> Result<BirthChart> {
        if self.store.load(user_id).await?.is_none() {
            return Err(AstrotError::Storage(format!(
                "no chart stored for user {}",
                user_id
            )));
        }
        self.submit(user_id, birth_data).await
    }

    pub async fn fetch(&self, user_id: &str) -> Result<Option<BirthChart>> {
        self.store.load(user_id).await
    }
}
