//! Live-update channel configuration

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

const MAX_SUBSCRIBER_BUFFER: usize = 10_000;
const MAX_DELIVERY_TIMEOUT_MS: u64 = 60_000;

#[derive(Debug, Clone, Deserialize)]
pub struct RealtimeConfig {
    /// Undelivered change events buffered per connection
    #[serde(default = "default_subscriber_buffer")]
    pub subscriber_buffer: usize,

    /// How long a single socket write may take before the connection is dropped
    #[serde(default = "default_delivery_timeout_ms")]
    pub delivery_timeout_ms: u64,
}

impl RealtimeConfig {
    pub fn delivery_timeout(&self) -> Duration {
        Duration::from_millis(self.delivery_timeout_ms)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.subscriber_buffer == 0 || self.subscriber_buffer > MAX_SUBSCRIBER_BUFFER {
            return Err(ValidationError::InvalidSubscriberBuffer(MAX_SUBSCRIBER_BUFFER));
        }
        if self.delivery_timeout_ms == 0 || self.delivery_timeout_ms > MAX_DELIVERY_TIMEOUT_MS {
            return Err(ValidationError::InvalidDeliveryTimeout(MAX_DELIVERY_TIMEOUT_MS));
        }
        Ok(())
    }
}

impl Default for RealtimeConfig {
    fn default() -> Self {
        Self {
            subscriber_buffer: default_subscriber_buffer(),
            delivery_timeout_ms: default_delivery_timeout_ms(),
        }
    }
}

fn default_subscriber_buffer() -> usize {
    128
}

fn default_delivery_timeout_ms() -> u64 {
    5_000
}
