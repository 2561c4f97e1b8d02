//! astobf: Python syntax-tree identifier obfuscator
//!
//! Reads a Python syntax tree in the JSON shape of the `ast` module, renames
//! its identifiers to visually confusable generated names, and writes the
//! tree back together with the name map.

// Tree model and traversal - re-exported from astobf-ast
pub use astobf_ast as ast;

// Obfuscation engine - re-exported from astobf-core
pub use astobf_core::config;
pub use astobf_core::error;
pub use astobf_core::names;
pub use astobf_core::obfuscate;
pub use astobf_core::output;
pub use astobf_core::reserved;

// Front door
pub mod cli;
