use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use log::{info, warn};
use parking_lot::RwLock;
use tokio::time::{sleep, timeout, Instant};
use url::Url;

use super::LoadError;
use crate::config::AppConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadState {
    Idle,
    Loading,
    Retrying,
    Loaded,
    Failed,
}

#[derive(Debug, Clone)]
pub struct RetryPolicy {
    // Retries after the initial attempt
    pub max_attempts: u32,
    pub base_delay: Duration,
    pub max_delay: Duration,
    pub load_timeout: Duration,
    // A finished load still reports Loading for at least this long
    pub min_display: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_secs(1),
            max_delay: Duration::from_secs(8),
            load_timeout: Duration::from_secs(15),
            min_display: Duration::ZERO,
        }
    }
}

impl RetryPolicy {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            max_attempts: config.load_max_attempts,
            base_delay: Duration::from_millis(config.load_retry_base_ms),
            max_delay: Duration::from_millis(config.load_retry_cap_ms),
            load_timeout: Duration::from_secs(config.load_timeout),
            min_display: Duration::from_millis(config.load_min_display_ms),
        }
    }

    // base * 2^retry, capped
    pub fn delay_for(&self, retry: u32) -> Duration {
        let factor = 2u32.checked_pow(retry).unwrap_or(u32::MAX);
        self.base_delay
            .checked_mul(factor)
            .map(|d| d.min(self.max_delay))
            .unwrap_or(self.max_delay)
    }
}

// Supervises one logical image load: arms a timeout per attempt, retries
// failures with capped exponential backoff, and exposes the current state.
// A retry is issued under a fresh request identity (cache-busting nonce) so
// the transport cannot just replay the failed attempt.
pub struct LoadSupervisor {
    policy: RetryPolicy,
    state: Arc<RwLock<LoadState>>,
    // Bumped on cancel and on every new run; stale completions compare
    // against it and get ignored
    generation: Arc<AtomicU64>,
}

impl LoadSupervisor {
    pub fn new(policy: RetryPolicy) -> Self {
        Self {
            policy,
            state: Arc::new(RwLock::new(LoadState::Idle)),
            generation: Arc::new(AtomicU64::new(0)),
        }
    }

    pub fn state(&self) -> LoadState {
        *self.state.read()
    }

    // Any state -> Idle; in-flight work notices the generation bump and
    // abandons its result
    pub fn cancel(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
        *self.state.write() = LoadState::Idle;
        info!("Load cancelled");
    }

    pub async fn run<T, F, Fut>(&self, url: &str, mut load: F) -> Result<T, LoadError>
    where
        F: FnMut(String) -> Fut,
        Fut: Future<Output = Result<T, LoadError>>,
    {
        // A new run supersedes whatever was in flight for this supervisor
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let started = Instant::now();
        let mut retries: u32 = 0;

        self.transition(generation, LoadState::Loading, url, retries);

        loop {
            let request_url = if retries == 0 {
                url.to_string()
            } else {
                cache_busted(url)
            };

            let outcome = match timeout(self.policy.load_timeout, load(request_url)).await {
                Ok(result) => result,
                Err(_) => {
                    warn!(
                        "Load timed out after {:?} (attempt {}): {}",
                        self.policy.load_timeout, retries, url
                    );
                    Err(LoadError::Timeout(self.policy.load_timeout))
                }
            };

            if self.generation.load(Ordering::SeqCst) != generation {
                return Err(LoadError::Cancelled);
            }

            match outcome {
                Ok(value) => {
                    // Hold Loading long enough that a fast load does not flash
                    let elapsed = started.elapsed();
                    if elapsed < self.policy.min_display {
                        sleep(self.policy.min_display - elapsed).await;
                        if self.generation.load(Ordering::SeqCst) != generation {
                            return Err(LoadError::Cancelled);
                        }
                    }
                    self.transition(generation, LoadState::Loaded, url, retries);
                    return Ok(value);
                }
                Err(e) => {
                    if retries >= self.policy.max_attempts {
                        self.transition(generation, LoadState::Failed, url, retries);
                        return Err(e);
                    }
                    let delay = self.policy.delay_for(retries);
                    retries += 1;
                    self.transition(generation, LoadState::Retrying, url, retries);
                    warn!(
                        "Load failed ({}), retry {}/{} in {:?}: {}",
                        e, retries, self.policy.max_attempts, delay, url
                    );
                    sleep(delay).await;
                    if self.generation.load(Ordering::SeqCst) != generation {
                        return Err(LoadError::Cancelled);
                    }
                    self.transition(generation, LoadState::Loading, url, retries);
                }
            }
        }
    }

    fn transition(&self, generation: u64, next: LoadState, url: &str, attempt: u32) {
        // Transitions from superseded runs must not touch the state
        if self.generation.load(Ordering::SeqCst) != generation {
            return;
        }
        *self.state.write() = next;
        info!("Load state {:?} (attempt {}) for {}", next, attempt, url);
    }
}

// New request identity for a retry, so caches and connection pools cannot
// replay the failed response
fn cache_busted(url: &str) -> String {
    let nonce: u32 = rand::random();
    match Url::parse(url) {
        Ok(mut parsed) => {
            parsed.query_pairs_mut().append_pair("r", &nonce.to_string());
            parsed.to_string()
        }
        Err(_) => {
            if url.contains('?') {
                format!("{}&r={}", url, nonce)
            } else {
                format!("{}?r={}", url, nonce)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;
    use std::sync::atomic::AtomicU32;

    fn policy() -> RetryPolicy {
        RetryPolicy::default()
    }

    #[test]
    fn backoff_doubles_up_to_the_cap() {
        let policy = policy();
        assert_eq!(policy.delay_for(0), Duration::from_secs(1));
        assert_eq!(policy.delay_for(1), Duration::from_secs(2));
        assert_eq!(policy.delay_for(2), Duration::from_secs(4));
        assert_eq!(policy.delay_for(3), Duration::from_secs(8));
        assert_eq!(policy.delay_for(10), Duration::from_secs(8));
    }

    #[tokio::test]
    async fn immediate_success_loads_on_the_first_attempt() {
        let supervisor = LoadSupervisor::new(policy());
        let calls = AtomicU32::new(0);

        let result = supervisor
            .run("https://img.test/a.png", |url| {
                calls.fetch_add(1, Ordering::SeqCst);
                async move {
                    assert!(!url.contains("r="));
                    Ok::<_, LoadError>(url)
                }
            })
            .await;

        assert!(result.is_ok());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(supervisor.state(), LoadState::Loaded);
    }

    #[tokio::test(start_paused = true)]
    async fn failures_retry_with_one_two_four_second_delays_then_fail() {
        let supervisor = LoadSupervisor::new(policy());
        let times = Mutex::new(Vec::<Instant>::new());

        let result = supervisor
            .run("https://img.test/a.png", |_url| {
                times.lock().push(Instant::now());
                async { Err::<(), _>(LoadError::Status(reqwest::StatusCode::BAD_GATEWAY)) }
            })
            .await;

        assert!(matches!(result, Err(LoadError::Status(_))));
        assert_eq!(supervisor.state(), LoadState::Failed);

        // Initial attempt plus exactly three retries, no fourth
        let times = times.lock();
        assert_eq!(times.len(), 4);
        assert_eq!(times[1] - times[0], Duration::from_secs(1));
        assert_eq!(times[2] - times[1], Duration::from_secs(2));
        assert_eq!(times[3] - times[2], Duration::from_secs(4));
    }

    #[tokio::test(start_paused = true)]
    async fn retries_carry_a_fresh_request_identity() {
        let supervisor = LoadSupervisor::new(policy());
        let urls = Mutex::new(Vec::<String>::new());

        let result = supervisor
            .run("https://img.test/a.png", |url| {
                let attempt = {
                    let mut urls = urls.lock();
                    urls.push(url);
                    urls.len()
                };
                async move {
                    if attempt < 3 {
                        Err(LoadError::Status(reqwest::StatusCode::NOT_FOUND))
                    } else {
                        Ok(attempt)
                    }
                }
            })
            .await;

        assert_eq!(result.unwrap(), 3);
        assert_eq!(supervisor.state(), LoadState::Loaded);

        let urls = urls.lock();
        assert_eq!(urls[0], "https://img.test/a.png");
        assert!(urls[1].contains("r="));
        assert!(urls[2].contains("r="));
        // Each retry is a distinct request
        assert_ne!(urls[1], urls[2]);
    }

    #[tokio::test(start_paused = true)]
    async fn a_hung_load_times_out_into_the_retry_path() {
        let supervisor = LoadSupervisor::new(policy());
        let calls = AtomicU32::new(0);

        let result = supervisor
            .run("https://img.test/a.png", |_url| {
                let attempt = calls.fetch_add(1, Ordering::SeqCst);
                async move {
                    if attempt == 0 {
                        // Never completes; the load timeout has to fire
                        sleep(Duration::from_secs(3600)).await;
                        unreachable!()
                    }
                    Ok(attempt)
                }
            })
            .await;

        assert_eq!(result.unwrap(), 1);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert_eq!(supervisor.state(), LoadState::Loaded);
    }

    #[tokio::test]
    async fn cancellation_discards_a_completion_that_arrives_late() {
        let supervisor = LoadSupervisor::new(policy());

        let result = supervisor
            .run("https://img.test/a.png", |_url| {
                supervisor.cancel();
                async { Ok::<_, LoadError>(42) }
            })
            .await;

        assert!(matches!(result, Err(LoadError::Cancelled)));
        // Cancel wins; the late success must not flip the state to Loaded
        assert_eq!(supervisor.state(), LoadState::Idle);
    }

    #[tokio::test(start_paused = true)]
    async fn success_is_reported_only_after_the_minimum_display_time() {
        let mut policy = policy();
        policy.min_display = Duration::from_millis(500);
        let supervisor = LoadSupervisor::new(policy);

        let started = Instant::now();
        let result = supervisor
            .run("https://img.test/a.png", |_url| async { Ok::<_, LoadError>(()) })
            .await;

        assert!(result.is_ok());
        assert!(started.elapsed() >= Duration::from_millis(500));
        assert_eq!(supervisor.state(), LoadState::Loaded);
    }

    #[test]
    fn cache_busting_appends_a_query_parameter() {
        let busted = cache_busted("https://img.test/a.png");
        assert!(busted.starts_with("https://img.test/a.png?r="));

        let busted = cache_busted("https://img.test/a.png?w=300");
        assert!(busted.contains("w=300"));
        assert!(busted.contains("r="));
    }
}
