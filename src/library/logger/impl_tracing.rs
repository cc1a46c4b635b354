use crate::library::logger::interface::{join_namespace, Logger};
use std::sync::Arc;

/// Forwards log lines to `tracing`, tagging each event with the namespace.
#[derive(Debug, Clone, Default)]
pub struct LoggerTracing {
    namespace: Option<String>,
}

impl LoggerTracing {
    pub fn new() -> Self {
        Self { namespace: None }
    }

    /// Installs the global subscriber. `RUST_LOG` wins over `default_filter`.
    pub fn init_subscriber(default_filter: &str) {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

        let _ = tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().compact())
            .try_init();
    }
}

impl Logger for LoggerTracing {
    fn info(&self, message: &str) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let namespace = self.namespace.as_deref().unwrap_or("-");
        tracing::info!(namespace, "{}", message);
        Ok(())
    }

    fn error(&self, message: &str) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let namespace = self.namespace.as_deref().unwrap_or("-");
        tracing::error!(namespace, "{}", message);
        Ok(())
    }

    fn with_namespace(&self, namespace: &str) -> Arc<dyn Logger + Send + Sync> {
        Arc::new(LoggerTracing {
            namespace: Some(join_namespace(self.namespace.as_deref(), namespace)),
        })
    }
}
