// Infrastructure layer modules
pub mod config;
pub mod logging;
pub mod visit_repository;

// Re-exports
pub use config::{CounterConfig, CounterConfigError};
pub use logging::init_logging;
pub use visit_repository::{DynamoVisitRepository, RepositoryError, VisitRepository};
