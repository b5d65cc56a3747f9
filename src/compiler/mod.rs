//! Model compilers
//!
//! Pure, one-shot translations from a model snapshot to text artifacts: the
//! SQL schema script and the PlantUML diagram source. Neither compiler holds
//! state or writes back into the model.

pub mod diagram;
pub mod schema;

pub use diagram::DiagramCompiler;
pub use schema::SchemaCompiler;

use thiserror::Error;

/// Failure while compiling a snapshot
///
/// The store validates referential consistency at creation time, so these
/// only fire on snapshots built outside the public API.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CompileError {
    #[error("Model references unknown entity '{0}'")]
    UnknownEntity(String),

    #[error("Entity '{0}' has no primary-key attribute")]
    MissingPrimaryKey(String),
}
