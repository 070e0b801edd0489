// creflect - name tables for annotated C enumerations

pub mod config;
pub mod declaration;
pub mod emitter;
pub mod error;
pub mod flags;
pub mod generator;
mod lexical;
pub mod scanner;

// Re-export commonly used items for convenience
pub use config::{CreflectConfig, OutputFormat};
pub use error::{CreflectError, Result};
pub use generator::{GenerateSummary, Generator};
