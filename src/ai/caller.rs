//! Rate-limit resilience: pacing, model fallback, exponential backoff
//!
//! Free-tier completion endpoints throttle aggressively, so every call is
//! paced, and a throttled call first rotates through the fallback models
//! before it ever sleeps. Only when every roster model has been tried for
//! the current call does exponential backoff start. The model that finally
//! answers stays active for subsequent calls.

use std::time::Duration;

use tracing::{debug, info, warn};

use crate::ai::client::{CompletionApi, CompletionRequest};
use crate::ai::{AiError, AiResult};
use crate::config::RetryConfig;

/// Clock seam so tests can observe sleeps instead of serving them.
pub trait Pacer {
    fn pause(&self, duration: Duration);
}

/// Production pacer: actually sleeps.
pub struct ThreadPacer;

impl Pacer for ThreadPacer {
    fn pause(&self, duration: Duration) {
        std::thread::sleep(duration);
    }
}

/// Wraps a [`CompletionApi`] with pacing, model fallback and backoff.
pub struct ResilientCaller<C: CompletionApi, P: Pacer = ThreadPacer> {
    client: C,
    models: Vec<String>,
    active: usize,
    max_retries: u32,
    base_delay: Duration,
    pacing_delay: Duration,
    cooldown_delay: Duration,
    pacer: P,
}

impl<C: CompletionApi> ResilientCaller<C, ThreadPacer> {
    pub fn new(client: C, models: Vec<String>, retry: &RetryConfig) -> Self {
        Self::with_pacer(client, models, retry, ThreadPacer)
    }
}

impl<C: CompletionApi, P: Pacer> ResilientCaller<C, P> {
    pub fn with_pacer(client: C, models: Vec<String>, retry: &RetryConfig, pacer: P) -> Self {
        Self {
            client,
            models,
            active: 0,
            max_retries: retry.max_retries,
            base_delay: Duration::from_secs(retry.base_delay_secs),
            pacing_delay: Duration::from_secs(retry.pacing_delay_secs),
            cooldown_delay: Duration::from_secs(retry.cooldown_secs),
            pacer,
        }
    }

    pub fn active_model(&self) -> &str {
        self.models
            .get(self.active)
            .map(String::as_str)
            .unwrap_or_default()
    }

    /// Long pause between batches so the provider's per-minute token
    /// window can reset. Callers skip this after the final batch.
    pub fn cooldown(&self) {
        debug!(
            "cooling down {}s before next batch",
            self.cooldown_delay.as_secs()
        );
        self.pacer.pause(self.cooldown_delay);
    }

    /// Run one completion call to completion or defeat.
    ///
    /// A fixed pacing pause precedes the first attempt of each call;
    /// fallback switches and backoff retries within the call are not paced
    /// again. Rate limits first rotate to a roster model not yet tried
    /// during this call; once the roster is exhausted the caller sleeps
    /// with a doubling delay, up to `max_retries` sleeps. Any other error
    /// is returned immediately. The model that succeeds remains active for
    /// the next call.
    pub fn call(&mut self, request: &CompletionRequest) -> AiResult<String> {
        if self.models.is_empty() {
            return Err(AiError::CallFailed {
                attempts: 0,
                message: "no models configured".to_string(),
            });
        }

        let mut switched: Vec<usize> = Vec::new();
        let mut backoffs = 0u32;
        let mut attempts = 0u32;

        self.pacer.pause(self.pacing_delay);

        loop {
            attempts += 1;

            let model = self.models[self.active].clone();
            match self.client.complete(&model, request) {
                Ok(text) => {
                    debug!(model = %model, attempts, "completion succeeded");
                    return Ok(text);
                }
                Err(err) if err.is_rate_limit() => {
                    warn!(model = %model, "rate limited: {err}");

                    if let Some(next) = self.next_fallback(&switched) {
                        info!(
                            from = %model,
                            to = %self.models[next],
                            "switching to fallback model"
                        );
                        switched.push(next);
                        self.active = next;
                        continue;
                    }

                    if backoffs >= self.max_retries {
                        return Err(AiError::CallFailed {
                            attempts,
                            message: err.to_string(),
                        });
                    }
                    let delay = self.base_delay * 2u32.saturating_pow(backoffs);
                    backoffs += 1;
                    warn!("all models throttled, backing off {}s", delay.as_secs());
                    self.pacer.pause(delay);
                }
                Err(err) => return Err(err),
            }
        }
    }

    /// Next roster model this call has not yet switched to, cycling from
    /// the slot after the active one.
    fn next_fallback(&self, switched: &[usize]) -> Option<usize> {
        let len = self.models.len();
        (1..len)
            .map(|offset| (self.active + offset) % len)
            .find(|i| !switched.contains(i))
    }
}
