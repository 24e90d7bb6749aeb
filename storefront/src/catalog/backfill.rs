//! Description backfill - fills missing product descriptions one at a time
//!
//! The generation endpoint enforces a rate limit shared by every call, so
//! candidates are processed strictly sequentially. A one-permit semaphore is
//! held for the whole batch: a second batch started concurrently waits until
//! the first one finishes.
//!
//! Results are never persisted here. Publishing is a separate, confirmed
//! admin action.

use aura_client::{DescriptionGenerator, GenerationError};
use shared::DisplayProduct;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;

/// Description text that marks a product as never described
pub const PLACEHOLDER_DESCRIPTION: &str = "No description available.";
/// Descriptions shorter than this (in characters) are regenerated
pub const MIN_DESCRIPTION_CHARS: usize = 20;

/// Whether a description should be (re)generated
pub fn needs_description(description: &str) -> bool {
    description.is_empty()
        || description == PLACEHOLDER_DESCRIPTION
        || description.chars().count() < MIN_DESCRIPTION_CHARS
}

/// Pacing and retry limits
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    /// Attempts per candidate, first call included
    pub max_attempts: u32,
    /// Pause after a success before the next candidate
    pub inter_request_delay: Duration,
    /// Wait for a rate limit without a suggested delay
    pub quota_backoff: Duration,
    /// Added to a provider-suggested delay
    pub retry_buffer: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            inter_request_delay: Duration::from_secs(2),
            quota_backoff: Duration::from_secs(60),
            retry_buffer: Duration::from_secs(1),
        }
    }
}

/// Result of a backfill batch
#[derive(Debug, Clone, PartialEq)]
pub struct BackfillOutcome {
    /// All input entries, in input order, with new descriptions applied
    pub entries: Vec<DisplayProduct>,
    /// Number of entries whose description was replaced
    pub success_count: usize,
    /// Number of entries that needed a description
    pub candidate_count: usize,
}

/// Single-worker description generator
pub struct DescriptionBackfill {
    generator: Arc<dyn DescriptionGenerator>,
    policy: RetryPolicy,
    worker: Arc<Semaphore>,
}

impl std::fmt::Debug for DescriptionBackfill {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DescriptionBackfill")
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}

impl DescriptionBackfill {
    pub fn new(generator: Arc<dyn DescriptionGenerator>) -> Self {
        Self {
            generator,
            policy: RetryPolicy::default(),
            worker: Arc::new(Semaphore::new(1)),
        }
    }

    pub fn with_policy(mut self, policy: RetryPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// Generate descriptions for every entry that [`needs_description`]
    ///
    /// Entries that fail keep their original description.
    pub async fn fill_missing_descriptions(
        &self,
        mut entries: Vec<DisplayProduct>,
    ) -> BackfillOutcome {
        let candidates: Vec<usize> = entries
            .iter()
            .enumerate()
            .filter(|(_, e)| needs_description(&e.description))
            .map(|(i, _)| i)
            .collect();

        let candidate_count = candidates.len();
        if candidate_count == 0 {
            tracing::info!("No products need new descriptions");
            return BackfillOutcome {
                entries,
                success_count: 0,
                candidate_count,
            };
        }

        let Ok(_permit) = self.worker.acquire().await else {
            tracing::error!("Backfill worker closed, skipping batch");
            return BackfillOutcome {
                entries,
                success_count: 0,
                candidate_count,
            };
        };

        tracing::info!(candidates = candidate_count, "Starting description backfill");
        let mut success_count = 0;

        for (position, &index) in candidates.iter().enumerate() {
            let Some(description) = self.generate_with_retry(&entries[index]).await else {
                continue;
            };

            entries[index].description = description;
            success_count += 1;

            if position + 1 < candidate_count {
                tokio::time::sleep(self.policy.inter_request_delay).await;
            }
        }

        tracing::info!(
            updated = success_count,
            candidates = candidate_count,
            "Description backfill complete"
        );

        BackfillOutcome {
            entries,
            success_count,
            candidate_count,
        }
    }

    /// Up to `max_attempts` calls; `None` when the candidate is abandoned
    async fn generate_with_retry(&self, entry: &DisplayProduct) -> Option<String> {
        let max_attempts = self.policy.max_attempts;

        for attempt in 1..=max_attempts {
            tracing::debug!(product = %entry.name, attempt, "Generating description");

            let wait = match self.generator.generate(entry).await {
                Ok(description) => return Some(description),
                Err(GenerationError::RateLimited { retry_after }) => {
                    let wait = retry_after + self.policy.retry_buffer;
                    tracing::warn!(
                        product = %entry.name,
                        attempt,
                        wait_secs = wait.as_secs_f64(),
                        "Rate limit hit, waiting before retry"
                    );
                    wait
                }
                Err(GenerationError::Quota(message)) => {
                    tracing::warn!(
                        product = %entry.name,
                        attempt,
                        wait_secs = self.policy.quota_backoff.as_secs(),
                        "Generic rate limit: {message}"
                    );
                    self.policy.quota_backoff
                }
                Err(GenerationError::Other(message)) => {
                    tracing::warn!(
                        product = %entry.name,
                        "Skipping product due to non-retriable error: {message}"
                    );
                    return None;
                }
            };

            if attempt < max_attempts {
                tokio::time::sleep(wait).await;
            }
        }

        tracing::warn!(
            product = %entry.name,
            attempts = max_attempts,
            "Giving up on product after exhausting retries"
        );
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use shared::CatalogEntry;
    use std::collections::{HashMap, VecDeque};
    use std::sync::Mutex;
    use tokio::time::Instant;

    /// Replays scripted results per product id; records call times
    #[derive(Default)]
    struct ScriptedGenerator {
        scripts: Mutex<HashMap<String, VecDeque<Result<String, GenerationError>>>>,
        calls: Mutex<Vec<(String, Instant)>>,
    }

    impl ScriptedGenerator {
        fn script(self, id: &str, results: Vec<Result<String, GenerationError>>) -> Self {
            self.scripts
                .lock()
                .unwrap()
                .insert(id.to_string(), results.into());
            self
        }

        fn calls_for(&self, id: &str) -> Vec<Instant> {
            self.calls
                .lock()
                .unwrap()
                .iter()
                .filter(|(call_id, _)| call_id == id)
                .map(|(_, at)| *at)
                .collect()
        }

        fn total_calls(&self) -> usize {
            self.calls.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl DescriptionGenerator for ScriptedGenerator {
        async fn generate(&self, product: &DisplayProduct) -> Result<String, GenerationError> {
            self.calls
                .lock()
                .unwrap()
                .push((product.id.clone(), Instant::now()));
            self.scripts
                .lock()
                .unwrap()
                .get_mut(&product.id)
                .and_then(|s| s.pop_front())
                .unwrap_or_else(|| Ok(format!("Generated description for {}", product.name)))
        }
    }

    fn product(id: &str, description: &str) -> DisplayProduct {
        DisplayProduct::hydrate(CatalogEntry {
            id: id.to_string(),
            name: format!("Product {id}"),
            description: description.to_string(),
            category: "Skin".to_string(),
            ..Default::default()
        })
    }

    const LONG: &str = "A weightless serum that melts into skin.";

    fn rate_limited(secs: u64) -> Result<String, GenerationError> {
        Err(GenerationError::RateLimited {
            retry_after: Duration::from_secs(secs),
        })
    }

    #[test]
    fn test_needs_description() {
        assert!(needs_description(""));
        assert!(needs_description(PLACEHOLDER_DESCRIPTION));
        assert!(needs_description("Too short."));
        assert_eq!("nineteen characters".chars().count(), 19);
        assert!(needs_description("nineteen characters"));
        assert_eq!("twenty characters!!!".chars().count(), 20);
        assert!(!needs_description("twenty characters!!!"));
        assert!(!needs_description(LONG));
        // Counted in characters, not bytes
        assert!(needs_description("éééééééééé"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_end_to_end_only_placeholder_changes() {
        let generator = Arc::new(ScriptedGenerator::default());
        let backfill = DescriptionBackfill::new(generator.clone());
        let input = vec![
            product("a", LONG),
            product("b", PLACEHOLDER_DESCRIPTION),
            product("c", "Rich night cream with peptides and ceramides."),
        ];

        let outcome = backfill.fill_missing_descriptions(input.clone()).await;

        assert_eq!(outcome.success_count, 1);
        assert_eq!(outcome.candidate_count, 1);
        assert_eq!(outcome.entries[0], input[0]);
        assert_eq!(outcome.entries[2], input[2]);
        assert_eq!(
            outcome.entries[1].description,
            "Generated description for Product b"
        );
        assert_eq!(generator.total_calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_explicit_retry_delay_is_honoured() {
        let generator = Arc::new(ScriptedGenerator::default().script(
            "a",
            vec![rate_limited(2), rate_limited(2), Ok("Third time lucky, glowing skin.".into())],
        ));
        let backfill = DescriptionBackfill::new(generator.clone());

        let start = Instant::now();
        let outcome = backfill
            .fill_missing_descriptions(vec![product("a", "")])
            .await;

        let calls = generator.calls_for("a");
        assert_eq!(calls.len(), 3);
        assert_eq!(calls[1] - calls[0], Duration::from_secs(3));
        assert_eq!(calls[2] - calls[1], Duration::from_secs(3));
        assert_eq!(outcome.success_count, 1);
        assert_eq!(outcome.entries[0].description, "Third time lucky, glowing skin.");
        // Last candidate: no trailing inter-request pause
        assert_eq!(Instant::now() - start, Duration::from_secs(6));
    }

    #[tokio::test(start_paused = true)]
    async fn test_quota_without_delay_waits_a_minute() {
        let generator = Arc::new(ScriptedGenerator::default().script(
            "a",
            vec![Err(GenerationError::Quota("429 Too Many Requests".into()))],
        ));
        let backfill = DescriptionBackfill::new(generator.clone());

        let outcome = backfill
            .fill_missing_descriptions(vec![product("a", "")])
            .await;

        let calls = generator.calls_for("a");
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[1] - calls[0], Duration::from_secs(60));
        assert_eq!(outcome.success_count, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_non_retriable_error_skips_candidate() {
        let generator = Arc::new(ScriptedGenerator::default().script(
            "a",
            vec![Err(GenerationError::Other("API key not valid".into()))],
        ));
        let backfill = DescriptionBackfill::new(generator.clone());

        let outcome = backfill
            .fill_missing_descriptions(vec![product("a", "Short"), product("b", "")])
            .await;

        assert_eq!(generator.calls_for("a").len(), 1);
        assert_eq!(outcome.entries[0].description, "Short");
        // Batch continues with the next candidate
        assert_eq!(generator.calls_for("b").len(), 1);
        assert_eq!(outcome.success_count, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_exhausted_retries_leave_description_unchanged() {
        let generator = Arc::new(
            ScriptedGenerator::default()
                .script("a", vec![rate_limited(5), rate_limited(5), rate_limited(5)]),
        );
        let backfill = DescriptionBackfill::new(generator.clone());

        let outcome = backfill
            .fill_missing_descriptions(vec![product("a", PLACEHOLDER_DESCRIPTION)])
            .await;

        assert_eq!(generator.calls_for("a").len(), 3);
        assert_eq!(outcome.entries[0].description, PLACEHOLDER_DESCRIPTION);
        assert_eq!(outcome.success_count, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_successes_are_paced() {
        let generator = Arc::new(ScriptedGenerator::default());
        let backfill = DescriptionBackfill::new(generator.clone());

        backfill
            .fill_missing_descriptions(vec![product("a", ""), product("b", ""), product("c", "")])
            .await;

        let a = generator.calls_for("a")[0];
        let b = generator.calls_for("b")[0];
        let c = generator.calls_for("c")[0];
        assert_eq!(b - a, Duration::from_secs(2));
        assert_eq!(c - b, Duration::from_secs(2));
    }

    #[tokio::test(start_paused = true)]
    async fn test_concurrent_batches_do_not_interleave() {
        let generator = Arc::new(ScriptedGenerator::default());
        let backfill = Arc::new(DescriptionBackfill::new(generator.clone()));

        let first = {
            let backfill = backfill.clone();
            tokio::spawn(async move {
                backfill
                    .fill_missing_descriptions(vec![product("a1", ""), product("a2", "")])
                    .await
            })
        };
        let second = {
            let backfill = backfill.clone();
            tokio::spawn(async move {
                backfill
                    .fill_missing_descriptions(vec![product("b1", ""), product("b2", "")])
                    .await
            })
        };
        let (first, second) = (first.await.unwrap(), second.await.unwrap());

        assert_eq!(first.success_count + second.success_count, 4);
        let order: Vec<String> = generator
            .calls
            .lock()
            .unwrap()
            .iter()
            .map(|(id, _)| id[..1].to_string())
            .collect();
        // One batch runs to completion before the other starts
        assert!(order == ["a", "a", "b", "b"] || order == ["b", "b", "a", "a"]);
    }

    #[tokio::test]
    async fn test_no_candidates_makes_no_calls() {
        let generator = Arc::new(ScriptedGenerator::default());
        let backfill = DescriptionBackfill::new(generator.clone());

        let input = vec![product("a", LONG)];
        let outcome = backfill.fill_missing_descriptions(input.clone()).await;

        assert_eq!(outcome.entries, input);
        assert_eq!(outcome.candidate_count, 0);
        assert_eq!(generator.total_calls(), 0);
    }
}
