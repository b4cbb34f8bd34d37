use std::sync::Arc;
use std::time::Duration;
use tokio::time::MissedTickBehavior;

use crate::application::use_cases::EvictIdleSessionsUseCase;

/// Periodically sweeps idle sessions out of the session table.
pub struct SessionReaper {
    evict_idle_sessions: Arc<EvictIdleSessionsUseCase>,
    sweep_interval: Duration,
}

impl SessionReaper {
    pub fn new(evict_idle_sessions: Arc<EvictIdleSessionsUseCase>, sweep_interval: Duration) -> Self {
        Self {
            evict_idle_sessions,
            sweep_interval,
        }
    }

    /// Runs until the task is dropped.
    pub async fn start(&self) {
        tracing::info!(
            interval_secs = self.sweep_interval.as_secs(),
            "starting idle session reaper"
        );

        let mut ticker = tokio::time::interval(self.sweep_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // The first tick completes immediately.
        ticker.tick().await;

        loop {
            ticker.tick().await;
            if let Err(e) = self.evict_idle_sessions.execute().await {
                tracing::error!("idle session sweep failed: {}", e);
            }
        }
    }
}
