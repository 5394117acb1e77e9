/// CRUD Module
///
/// Parameterized insert/select/update/delete helpers for arbitrary tables.
///
/// ## Layout
///
/// - **Identifiers** (`identifier.rs`): allow-list validation of table and column names
/// - **Predicates** (`predicate.rs`): structured WHERE clauses compiled to bound SQL
/// - **Statements** (`statement.rs`): pure SQL text builders
/// - **Gateway** (`gateway.rs`): prepares, binds and executes on one connection
pub mod gateway;
pub mod identifier;
pub mod predicate;
pub mod statement;

pub use gateway::{CrudGateway, ExecutionResult};
pub use predicate::{CompiledPredicate, Predicate};
pub use statement::SqlStatement;
