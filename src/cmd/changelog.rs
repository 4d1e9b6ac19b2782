use crate::context::AppContext;
use crate::domain::revision::EntryLimit;
use crate::error::AppResult;
use crate::workflow::changelog::generate_changelog;

#[derive(Debug, Clone)]
pub struct ChangelogCommandArgs {
    pub limit: EntryLimit,
}

pub async fn run(ctx: &AppContext, args: ChangelogCommandArgs) -> AppResult<String> {
    generate_changelog(ctx, args.limit).await
}

#[cfg(test)]
mod tests {
    use std::num::NonZeroUsize;
    use std::path::Path;
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;

    use super::*;
    use crate::config::{AppConfig, StoredConfig};
    use crate::domain::revision::RevisionEntry;
    use crate::error::AppError;
    use crate::services::{HistorySource, IdentityService};

    struct FakeHistory {
        entries: AppResult<Vec<RevisionEntry>>,
        requested: Mutex<Option<EntryLimit>>,
    }

    #[async_trait]
    impl HistorySource for FakeHistory {
        async fn fetch_log(&self, limit: EntryLimit) -> AppResult<Vec<RevisionEntry>> {
            *self.requested.lock().unwrap() = Some(limit);
            match &self.entries {
                Ok(entries) => Ok(entries.clone()),
                Err(_) => Err(AppError::VersionControl("not a working copy".to_string())),
            }
        }
    }

    struct Handles;

    #[async_trait]
    impl IdentityService for Handles {
        async fn resolve(&self, handle: &str) -> String {
            handle.to_string()
        }
    }

    fn context(history: Arc<FakeHistory>) -> AppContext {
        let config =
            AppConfig::from_layers(Path::new("."), StoredConfig::default(), |_| None).unwrap();
        AppContext::new(config, history, Arc::new(Handles))
    }

    #[tokio::test]
    async fn passes_limit_to_history_and_renders() {
        let history = Arc::new(FakeHistory {
            entries: Ok(vec![RevisionEntry::new(
                "3",
                "jdoe",
                "2012-01-14T10:00:00Z",
                "Initial import",
            )]),
            requested: Mutex::new(None),
        });
        let limit = EntryLimit::Last(NonZeroUsize::new(3).unwrap());

        let output = run(&context(history.clone()), ChangelogCommandArgs { limit })
            .await
            .unwrap();

        assert_eq!(output, "2012-01-14 jdoe\n    * Initial import\n\n");
        assert_eq!(*history.requested.lock().unwrap(), Some(limit));
    }

    #[tokio::test]
    async fn history_failure_is_fatal() {
        let history = Arc::new(FakeHistory {
            entries: Err(AppError::VersionControl(String::new())),
            requested: Mutex::new(None),
        });

        let result = run(
            &context(history),
            ChangelogCommandArgs {
                limit: EntryLimit::All,
            },
        )
        .await;

        assert!(matches!(result, Err(AppError::VersionControl(_))));
    }
}
