//! ChangePublisher port - how mutating handlers announce committed writes.
//!
//! Handlers depend on this trait rather than on the socket layer, so the
//! fan-out is injected where it is needed instead of looked up globally.

use async_trait::async_trait;

use crate::domain::change::ChangeEvent;

/// Port for broadcasting change events.
///
/// Implementations must:
/// - Only be called after the underlying write was acknowledged
/// - Never block on subscriber I/O
/// - Never fail: per-subscriber delivery problems are logged and swallowed
#[async_trait]
pub trait ChangePublisher: Send + Sync {
    /// Publish an event, returning how many subscribers it was handed to.
    async fn publish(&self, event: ChangeEvent) -> usize;
}

#[cfg(test)]
mod tests {
    use super::*;

    // Compile-time check that trait is object-safe
    #[allow(dead_code)]
    fn assert_object_safe(_: &dyn ChangePublisher) {}
}
