//! Retry policy and per-call retry state

use std::time::Duration;
use log::debug;

/// Retry policy for failed generation attempts
#[derive(Debug, Clone)]
pub struct RetryPolicy
{   pub max_attempts: usize
  , pub backoff_multiplier: f32
  , pub initial_backoff: Duration
}

impl RetryPolicy
{   /// Create a new retry policy
    pub fn new(
      max_attempts: usize
    , backoff_multiplier: f32
    , initial_backoff_ms: u64
    ) -> Self
    {   RetryPolicy
        {   max_attempts
          , backoff_multiplier
          , initial_backoff: Duration::from_millis(
              initial_backoff_ms
            )
        }
    }

    /// Calculate backoff duration for attempt number
    /// (attempt counted from 1: 2s, then 4s by default)
    pub fn backoff_for_attempt(
      &self
    , attempt: usize
    ) -> Duration
    {   debug!("Calculating backoff for attempt {}", attempt);
        let multiplier
          = self.backoff_multiplier.powi(attempt as i32);
        Duration::from_millis(
          (self.initial_backoff.as_millis() as f32
            * multiplier) as u64
        )
    }
}

impl Default for RetryPolicy
{   fn default() -> Self
    {   RetryPolicy::new(3, 2.0, 1000)
    }
}

/// Mutable state for one generation call
/// Created at call start, mutated once per failed attempt,
/// discarded when a result is produced or attempts exhaust
#[derive(Debug, Clone)]
pub struct RetryState
{   pub attempts_made: usize
  , pub last_error: Option<crate::error::Error>
}

impl RetryState
{   /// Fresh state at the start of a call
    pub fn new() -> Self
    {   RetryState
        {   attempts_made: 0
          , last_error: None
        }
    }

    /// Record one failed attempt
    pub fn record_failure(&mut self, err: crate::error::Error)
    {   self.attempts_made += 1;
        debug!(
          "Attempt {} failed: {}",
          self.attempts_made, err
        );
        self.last_error = Some(err);
    }

    /// Whether the policy allows another attempt
    pub fn exhausted(&self, policy: &RetryPolicy) -> bool
    {   self.attempts_made >= policy.max_attempts
    }

    /// Terminal error once attempts exhaust
    pub fn into_error(self) -> crate::error::Error
    {   let last = match self.last_error
        {   Some(err) => err.to_string()
          , None => "no attempt recorded".to_string()
        };
        crate::error::Error::RetriesExhausted
        {   attempts: self.attempts_made
          , last
        }
    }
}

impl Default for RetryState
{   fn default() -> Self
    {   RetryState::new()
    }
}
