// Copyright 2025 Google LLC
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     https://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Truncated exponential backoff for polling loops.
//!
//! The first wait is the initial delay. Each attempt multiplies the wait by
//! the scaling factor, up to the maximum delay. The waits have no jitter.

use crate::polling_backoff_policy::PollingBackoffPolicy;
use crate::polling_state::PollingState;
use std::time::Duration;

const DEFAULT_INITIAL_DELAY: Duration = Duration::from_secs(5);
const DEFAULT_MAXIMUM_DELAY: Duration = Duration::from_secs(5 * 60);
const DEFAULT_SCALING: f64 = 2.0;

/// Invalid parameters for an [ExponentialBackoff].
#[derive(thiserror::Error, Debug, PartialEq)]
#[non_exhaustive]
pub enum Error {
    #[error("the scaling factor must be at least 1.0, got {0}")]
    InvalidScalingFactor(f64),
    #[error("the initial delay must be positive, got {0:?}")]
    InvalidInitialDelay(Duration),
    #[error("the maximum delay ({maximum:?}) is shorter than the initial delay ({initial:?})")]
    EmptyRange { maximum: Duration, initial: Duration },
}

/// Builds [ExponentialBackoff] policies.
///
/// The defaults wait 5 seconds after the first attempt and double the wait
/// on each attempt, up to 5 minutes.
///
/// # Example
/// ```
/// # use ads_gax::exponential_backoff::{Error, ExponentialBackoffBuilder};
/// # use ads_gax::polling_backoff_policy::PollingBackoffPolicy;
/// # use ads_gax::polling_state::PollingState;
/// use std::time::Duration;
/// let backoff = ExponentialBackoffBuilder::new()
///     .with_initial_delay(Duration::from_secs(2))
///     .with_maximum_delay(Duration::from_secs(60))
///     .with_scaling(1.5)
///     .build()?;
/// let third = PollingState::default().with_attempt_count(3);
/// assert_eq!(backoff.wait_period(&third), Duration::from_millis(4500));
/// # Ok::<(), Error>(())
/// ```
#[derive(Clone, Debug)]
pub struct ExponentialBackoffBuilder {
    initial_delay: Duration,
    maximum_delay: Duration,
    scaling: f64,
}

impl ExponentialBackoffBuilder {
    pub fn new() -> Self {
        Self {
            initial_delay: DEFAULT_INITIAL_DELAY,
            maximum_delay: DEFAULT_MAXIMUM_DELAY,
            scaling: DEFAULT_SCALING,
        }
    }

    /// The wait after the first attempt.
    pub fn with_initial_delay<V: Into<Duration>>(mut self, v: V) -> Self {
        self.initial_delay = v.into();
        self
    }

    /// The longest wait between two attempts.
    pub fn with_maximum_delay<V: Into<Duration>>(mut self, v: V) -> Self {
        self.maximum_delay = v.into();
        self
    }

    /// The growth of the wait on each attempt.
    pub fn with_scaling<V: Into<f64>>(mut self, v: V) -> Self {
        self.scaling = v.into();
        self
    }

    /// Validates the parameters and creates the policy.
    pub fn build(self) -> Result<ExponentialBackoff, Error> {
        match self {
            Self { scaling, .. } if scaling.is_nan() || scaling < 1.0 => {
                Err(Error::InvalidScalingFactor(scaling))
            }
            Self { initial_delay, .. } if initial_delay.is_zero() => {
                Err(Error::InvalidInitialDelay(initial_delay))
            }
            Self {
                initial_delay,
                maximum_delay,
                ..
            } if maximum_delay < initial_delay => Err(Error::EmptyRange {
                maximum: maximum_delay,
                initial: initial_delay,
            }),
            Self {
                initial_delay,
                maximum_delay,
                scaling,
            } => Ok(ExponentialBackoff {
                initial_delay,
                maximum_delay,
                scaling,
            }),
        }
    }
}

impl Default for ExponentialBackoffBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Waits exponentially longer between attempts, up to a maximum.
#[derive(Clone, Debug)]
pub struct ExponentialBackoff {
    initial_delay: Duration,
    maximum_delay: Duration,
    scaling: f64,
}

impl ExponentialBackoff {
    pub fn initial_delay(&self) -> Duration {
        self.initial_delay
    }

    pub fn maximum_delay(&self) -> Duration {
        self.maximum_delay
    }

    pub fn scaling(&self) -> f64 {
        self.scaling
    }
}

impl Default for ExponentialBackoff {
    fn default() -> Self {
        Self {
            initial_delay: DEFAULT_INITIAL_DELAY,
            maximum_delay: DEFAULT_MAXIMUM_DELAY,
            scaling: DEFAULT_SCALING,
        }
    }
}

impl PollingBackoffPolicy for ExponentialBackoff {
    fn wait_period(&self, state: &PollingState) -> Duration {
        // The first wait follows attempt 1.
        let exponent = state.attempt_count.saturating_sub(1).min(i32::MAX as u32) as i32;
        let factor = self.scaling.powi(exponent);
        let ceiling = self.maximum_delay.div_duration_f64(self.initial_delay);
        if factor.is_finite() && factor < ceiling {
            self.initial_delay.mul_f64(factor)
        } else {
            self.maximum_delay
        }
    }
}
