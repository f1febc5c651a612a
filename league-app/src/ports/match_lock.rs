use league_core::MatchId;

pub type MatchGuard = tokio::sync::OwnedMutexGuard<()>;

/// Serializes everything that reads and then writes the scores of one match.
/// The guard releases the match when dropped.
#[async_trait::async_trait]
pub trait MatchLockPort {
    async fn lock_match(&self, match_id: MatchId) -> MatchGuard;
}
