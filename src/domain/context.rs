//! Operation Context
//!
//! Request-scoped metadata carried into a unit of work: how to correlate
//! log lines and how long the work may take.

use std::time::Duration;
use uuid::Uuid;

/// Context for an operation, used for tracing and deadline propagation.
#[derive(Debug, Clone, Default)]
pub struct OperationContext {
    /// Correlation ID for request tracing
    pub correlation_id: Option<Uuid>,

    /// Deadline for the unit of work; falls back to the runner default
    pub timeout: Option<Duration>,
}

impl OperationContext {
    /// Create a new empty context
    pub fn new() -> Self {
        Self::default()
    }

    /// Create context with correlation ID
    pub fn with_correlation_id(mut self, correlation_id: Uuid) -> Self {
        self.correlation_id = Some(correlation_id);
        self
    }

    /// Create context with a deadline
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_context_builder() {
        let correlation_id = Uuid::new_v4();

        let context = OperationContext::new()
            .with_correlation_id(correlation_id)
            .with_timeout(Duration::from_millis(250));

        assert_eq!(context.correlation_id, Some(correlation_id));
        assert_eq!(context.timeout, Some(Duration::from_millis(250)));
    }
}
