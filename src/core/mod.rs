//! Core business logic - framework-agnostic BOM calculation, editing and persistence.

/// Bill-of-materials recalculation engine
pub mod calculations;
/// Client operations
pub mod client;
/// In-memory recipe editing session
pub mod draft;
/// Recipe operations
pub mod recipe;
/// BOM report generation and formatting
pub mod report;
/// Signed-in user identity
pub mod session;
