//! Best-effort usage counters.
//!
//! Increments are read-modify-write patches with no transaction; concurrent
//! turns can lose an update. These numbers are telemetry, not billing, so a
//! failed patch is logged and the turn carries on.

use crate::db::Database;
use std::time::Instant;
use tokio::time::{interval, Duration};
use tracing::warn;

const UPTIME_PATCH_INTERVAL_SECS: u64 = 60;

#[derive(Clone)]
pub struct UsageTracker {
    db: Database,
    started: Instant,
}

impl UsageTracker {
    pub fn new(db: Database) -> Self {
        Self {
            db,
            started: Instant::now(),
        }
    }

    /// Count a handled message and/or a completion-service call.
    pub fn record(&self, messages: bool, api_calls: bool) {
        let result = self.db.patch_counters(|c| {
            if messages {
                c.message_count += 1;
            }
            if api_calls {
                c.api_call_count += 1;
            }
        });
        if let Err(e) = result {
            warn!("Failed to update usage counters: {}", e);
        }
    }

    pub fn record_new_conversation(&self) {
        if let Err(e) = self.db.patch_counters(|c| c.conversation_count += 1) {
            warn!("Failed to update conversation counter: {}", e);
        }
    }

    pub fn set_server_count(&self, count: usize) {
        if let Err(e) = self.db.patch_counters(|c| c.server_count = count as i64) {
            warn!("Failed to update server counter: {}", e);
        }
    }

    /// Periodically writes process uptime into the counters row.
    pub async fn run_uptime_task(self) {
        let mut ticker = interval(Duration::from_secs(UPTIME_PATCH_INTERVAL_SECS));
        loop {
            ticker.tick().await;
            let uptime = self.started.elapsed().as_secs() as i64;
            if let Err(e) = self.db.patch_counters(|c| c.uptime_secs = uptime) {
                warn!("Failed to record uptime: {}", e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    fn test_db() -> Database {
        let config = Config {
            discord_token: "test".to_string(),
            openai_url: "test".to_string(),
            openai_api_key: None,
            openai_model: "test".to_string(),
            database_url: ":memory:".to_string(),
            status_message: "test".to_string(),
            max_context_messages: 10,
        };
        let db = Database::new(&config).unwrap();
        db.execute_init().unwrap();
        db
    }

    #[test]
    fn test_record_increments_selected_counters() {
        let db = test_db();
        let tracker = UsageTracker::new(db.clone());

        tracker.record(true, true);
        tracker.record(true, false);
        tracker.record_new_conversation();

        let counters = db.get_counters().unwrap();
        assert_eq!(counters.message_count, 2);
        assert_eq!(counters.api_call_count, 1);
        assert_eq!(counters.conversation_count, 1);
    }

    #[test]
    fn test_server_count_is_overwritten_not_accumulated() {
        let db = test_db();
        let tracker = UsageTracker::new(db.clone());

        tracker.set_server_count(3);
        tracker.set_server_count(7);

        assert_eq!(db.get_counters().unwrap().server_count, 7);
    }
}
