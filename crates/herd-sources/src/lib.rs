//! Herd Sources - Thin adapters over the JavaScript toolchain tools.
//!
//! Each adapter implements [`DiagnosticSource`] by invoking its tool as
//! an `npx` subprocess and mapping the tool's output envelope to
//! [`Diagnostic`]s:
//!
//! - [`EslintSource`]: `eslint --format json`
//! - [`TypescriptSource`]: `tsc --noEmit --pretty false`
//! - [`VitestSource`]: `vitest run --reporter=json`
//!
//! The tools' engines are not reimplemented here, and a tool exiting
//! non-zero because it found issues is treated as data. Adapters only
//! fail on spawn problems or output they cannot understand.
//!
//! [`Diagnostic`]: herd_core::Diagnostic
//! [`DiagnosticSource`]: herd_core::DiagnosticSource

mod exec;

pub mod eslint;
pub mod typescript;
pub mod vitest;

pub use eslint::EslintSource;
pub use typescript::TypescriptSource;
pub use vitest::VitestSource;

use herd_core::SourceRegistry;
use std::sync::Arc;

/// Builds a registry with the default source set, in the order results
/// are assembled: ESLint, TypeScript, Vitest.
pub fn default_registry() -> SourceRegistry {
    let mut registry = SourceRegistry::new();
    registry.register(Arc::new(EslintSource::new()));
    registry.register(Arc::new(TypescriptSource::new()));
    registry.register(Arc::new(VitestSource::new()));
    registry
}
