//! Diagnostic source trait and registry.

use crate::error::Result;
use crate::types::{CollectionConfig, Diagnostic, SourceKind};
use std::fmt;
use std::sync::Arc;

/// Trait for tool-specific diagnostic sources.
///
/// Sources are responsible for:
/// - Invoking their underlying tool (usually a subprocess)
/// - Mapping the tool's output envelope to [`Diagnostic`]s
/// - Reporting spawn/parse problems as errors; tool findings are data
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync`; the orchestrator awaits every
/// active source concurrently.
#[async_trait::async_trait]
pub trait DiagnosticSource: Send + Sync {
    /// The integration this source implements.
    fn kind(&self) -> SourceKind;

    /// Human-readable source name.
    fn name(&self) -> &str {
        self.kind().as_str()
    }

    /// Collects diagnostics for one run.
    ///
    /// # Errors
    ///
    /// Returns an error only when the tool could not be run or its output
    /// could not be understood. A tool exiting non-zero because it found
    /// issues is a successful collection.
    async fn collect(&self, config: &CollectionConfig) -> Result<Vec<Diagnostic>>;
}

/// Registry holding diagnostic sources in registration order.
///
/// The registration order is the order results are assembled in after a
/// collection run settles.
#[derive(Default, Clone)]
pub struct SourceRegistry {
    sources: Vec<Arc<dyn DiagnosticSource>>,
}

impl SourceRegistry {
    /// Creates a new empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a source.
    pub fn register(&mut self, source: Arc<dyn DiagnosticSource>) {
        self.sources.push(source);
    }

    /// Returns all registered sources in registration order.
    pub fn all(&self) -> &[Arc<dyn DiagnosticSource>] {
        &self.sources
    }

    /// Number of registered sources.
    pub fn len(&self) -> usize {
        self.sources.len()
    }

    /// Whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }
}

impl fmt::Debug for SourceRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SourceRegistry")
            .field("sources", &self.sources.len())
            .finish()
    }
}
