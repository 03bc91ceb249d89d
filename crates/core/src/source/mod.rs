//! Upstream data sources for achievements and player data.

use std::future::Future;

use crate::achievement::SourceResult;

/// Flat JSON fallback files.
pub mod fallback;
/// Player stats, profile and library retrieval.
pub mod player;
/// Live Steam achievement endpoint.
pub mod steam;

pub use fallback::{FallbackAchievementSource, FallbackStore};
pub use player::{PlayerSource, SourceError};
pub use steam::SteamAchievementSource;

/// Supplies raw achievement records for a Steam app.
///
/// Implementations report every failure as [`SourceResult::Failure`]; the
/// curator decides how to recover.
pub trait AchievementSource: Send + Sync {
    /// Fetch the player's records for `app_id`.
    fn fetch(&self, app_id: &str) -> impl Future<Output = SourceResult> + Send;
}

/// Tries `primary`, consulting `secondary` when it fails or returns nothing.
pub struct ChainedSource<P, S> {
    primary: P,
    secondary: S,
}

impl<P, S> ChainedSource<P, S> {
    /// Chain two sources.
    pub fn new(primary: P, secondary: S) -> Self {
        Self { primary, secondary }
    }
}

impl<P, S> AchievementSource for ChainedSource<P, S>
where
    P: AchievementSource,
    S: AchievementSource,
{
    fn fetch(&self, app_id: &str) -> impl Future<Output = SourceResult> + Send {
        async move {
            let primary = self.primary.fetch(app_id).await;
            if primary.usable_records().is_some() {
                return primary;
            }
            match self.secondary.fetch(app_id).await {
                result @ SourceResult::Records(_) if result.usable_records().is_some() => result,
                _ => primary,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::achievement::{RawAchievementRecord, SourceFailure};

    struct Fixed(SourceResult);

    impl AchievementSource for Fixed {
        fn fetch(&self, _app_id: &str) -> impl Future<Output = SourceResult> + Send {
            let result = self.0.clone();
            async move { result }
        }
    }

    #[tokio::test]
    async fn chain_prefers_primary_then_secondary() {
        let records = vec![RawAchievementRecord::unlocked("a", 1)];
        let chain = ChainedSource::new(
            Fixed(SourceFailure::Timeout.into()),
            Fixed(SourceResult::Records(records.clone())),
        );
        assert_eq!(chain.fetch("1").await, SourceResult::Records(records.clone()));

        let chain = ChainedSource::new(
            Fixed(SourceResult::Records(records.clone())),
            Fixed(SourceFailure::Timeout.into()),
        );
        assert_eq!(chain.fetch("1").await, SourceResult::Records(records));

        let chain = ChainedSource::new(
            Fixed(SourceFailure::Status(500).into()),
            Fixed(SourceResult::Records(Vec::new())),
        );
        assert_eq!(
            chain.fetch("1").await,
            SourceResult::Failure(SourceFailure::Status(500))
        );
    }
}
