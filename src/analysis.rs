mod extract;
pub mod format;
mod prompt;
mod solution;

#[cfg(test)]
pub mod test_utils;

pub use extract::Section;
pub use solution::Solution;

use crate::config;
use crate::errors::ProviderError;
use crate::logging::{DEFAULT, error, info, o};
use crate::payload::ImagePayload;
use humantime::parse_duration;
use std::future::Future;
use std::time::Duration;

/// An external model that answers a prompt about one inline image.
pub trait GenerativeModel {
    fn generate_content(
        &self,
        prompt: &str,
        image: &ImagePayload,
    ) -> impl Future<Output = Result<String, ProviderError>> + Send;
}

pub trait Sleep {
    fn sleep(&self, duration: Duration) -> impl Future<Output = ()> + Send;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct TokioSleep;

impl Sleep for TokioSleep {
    fn sleep(&self, duration: Duration) -> impl Future<Output = ()> + Send {
        tokio::time::sleep(duration)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total calls including the first one.
    pub max_attempts: u32,
    /// Delay before the first retry; doubled for each one after it.
    pub initial_backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_backoff: Duration::from_millis(2000),
        }
    }
}

impl RetryPolicy {
    pub fn from_config() -> Self {
        let default = Self::default();
        let max_attempts = config::get("GEMINI_MAX_ATTEMPTS")
            .and_then(|v| Ok(v.parse::<u32>()?))
            .map(|n| n.max(1))
            .unwrap_or(default.max_attempts);
        let initial_backoff = config::get("GEMINI_INITIAL_BACKOFF")
            .and_then(|v| Ok(parse_duration(&v)?))
            .unwrap_or(default.initial_backoff);
        Self {
            max_attempts,
            initial_backoff,
        }
    }
}

enum MaybeRetry<A, B> {
    Through(A),
    Retry(B),
}

pub struct Analyzer<M, S = TokioSleep> {
    model: M,
    sleep: S,
    policy: RetryPolicy,
}

impl<M, S> Analyzer<M, S>
where
    M: GenerativeModel + Sync,
    S: Sleep + Sync,
{
    pub fn new(model: M, sleep: S, policy: RetryPolicy) -> Self {
        Self {
            model,
            sleep,
            policy,
        }
    }

    #[cfg(test)]
    pub fn model(&self) -> &M {
        &self.model
    }

    /// Never fails: any provider error, including an exhausted retry
    /// budget, ends up as [`Solution::overloaded`].
    pub async fn analyze(&self, image: &ImagePayload) -> Solution {
        let log = DEFAULT.new(o!(
            "function" => "Analyzer::analyze",
            "mime_type" => image.mime_type().as_str(),
            "image_size" => image.data().len(),
        ));
        info!(log, "start");
        match self.generate(image).await {
            Ok(reply) => {
                info!(log, "reply received"; "reply_size" => reply.len());
                Solution::from_reply(&reply)
            }
            Err(err) => {
                error!(log, "analysis failed"; "error" => %err);
                Solution::overloaded()
            }
        }
    }

    async fn generate(&self, image: &ImagePayload) -> Result<String, ProviderError> {
        let log = DEFAULT.new(o!(
            "function" => "Analyzer::generate",
            "max_attempts" => self.policy.max_attempts,
        ));
        let mut attempt = 1;
        let mut delay = self.policy.initial_backoff;
        loop {
            let log = log.new(o!("attempt" => attempt));
            match self.generate_maybe_retry(image).await {
                MaybeRetry::Through(res) => return res,
                MaybeRetry::Retry(err) => {
                    if self.policy.max_attempts <= attempt {
                        info!(log, "retry limit reached");
                        return Err(err);
                    }
                    info!(log, "model overloaded, retrying";
                        "delay" => ?delay,
                        "error" => %err,
                    );
                    self.sleep.sleep(delay).await;
                    delay *= 2;
                    attempt += 1;
                }
            }
        }
    }

    async fn generate_maybe_retry(
        &self,
        image: &ImagePayload,
    ) -> MaybeRetry<Result<String, ProviderError>, ProviderError> {
        let log = DEFAULT.new(o!("function" => "Analyzer::generate_maybe_retry"));
        match self.model.generate_content(prompt::PROMPT, image).await {
            Ok(reply) => {
                info!(log, "success");
                MaybeRetry::Through(Ok(reply))
            }
            Err(err) if err.is_transient_overload() => MaybeRetry::Retry(err),
            Err(err) => {
                info!(log, "failure"; "error" => %err);
                MaybeRetry::Through(Err(err))
            }
        }
    }
}
