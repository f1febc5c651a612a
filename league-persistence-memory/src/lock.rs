use std::sync::Arc;

use dashmap::DashMap;
use league_app::ports::match_lock::{MatchGuard, MatchLockPort};
use league_core::MatchId;
use tokio::sync::Mutex;

pub struct MatchLockAdapter {
    locks: DashMap<MatchId, Arc<Mutex<()>>>,
}

impl MatchLockAdapter {
    pub fn new() -> Self {
        Self {
            locks: DashMap::new(),
        }
    }
}

#[async_trait::async_trait]
impl MatchLockPort for MatchLockAdapter {
    async fn lock_match(&self, match_id: MatchId) -> MatchGuard {
        let lock = self.locks.entry(match_id).or_default().clone();
        lock.lock_owned().await
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[tokio::test]
    async fn test_same_match_is_serialized() {
        let adapter = MatchLockAdapter::new();
        let match_id = MatchId::new();

        let guard = adapter.lock_match(match_id).await;
        let blocked =
            tokio::time::timeout(Duration::from_millis(20), adapter.lock_match(match_id)).await;
        assert!(blocked.is_err());

        drop(guard);
        let reacquired =
            tokio::time::timeout(Duration::from_millis(20), adapter.lock_match(match_id)).await;
        assert!(reacquired.is_ok());
    }

    #[tokio::test]
    async fn test_different_matches_do_not_block() {
        let adapter = MatchLockAdapter::new();
        let _first = adapter.lock_match(MatchId::new()).await;
        let other = MatchId::new();
        let second =
            tokio::time::timeout(Duration::from_millis(20), adapter.lock_match(other)).await;
        assert!(second.is_ok());
    }
}
