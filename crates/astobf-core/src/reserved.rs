//! Reserved Python identifiers.
//!
//! Names in this module are never renamed: keywords, the `True`/`False`/`None`
//! literals, everything the `builtins` module exposes, dunder names, and any
//! extra names the caller asks to preserve.

use std::collections::{BTreeSet, HashSet};

use thiserror::Error;

/// Error for validation failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Invalid Python identifier name.
    #[error("invalid name '{name}': {reason}")]
    InvalidName { name: String, reason: String },
}

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// The three literal constants that parse as names in older grammars.
pub const PYTHON_LITERALS: &[&str] = &["True", "False", "None"];

/// Python keywords that cannot be used as identifiers.
pub const PYTHON_KEYWORDS: &[&str] = &[
    "False", "None", "True", "and", "as", "assert", "async", "await", "break", "class", "continue",
    "def", "del", "elif", "else", "except", "finally", "for", "from", "global", "if", "import",
    "in", "is", "lambda", "nonlocal", "not", "or", "pass", "raise", "return", "try", "while",
    "with", "yield",
];

/// Names bound by the `builtins` module (Python 3.12).
pub const PYTHON_BUILTINS: &[&str] = &[
    // Built-in functions and types
    "__build_class__",
    "__import__",
    "abs",
    "aiter",
    "all",
    "anext",
    "any",
    "ascii",
    "bin",
    "bool",
    "breakpoint",
    "bytearray",
    "bytes",
    "callable",
    "chr",
    "classmethod",
    "compile",
    "complex",
    "copyright",
    "credits",
    "delattr",
    "dict",
    "dir",
    "divmod",
    "enumerate",
    "eval",
    "exec",
    "exit",
    "filter",
    "float",
    "format",
    "frozenset",
    "getattr",
    "globals",
    "hasattr",
    "hash",
    "help",
    "hex",
    "id",
    "input",
    "int",
    "isinstance",
    "issubclass",
    "iter",
    "len",
    "license",
    "list",
    "locals",
    "map",
    "max",
    "memoryview",
    "min",
    "next",
    "object",
    "oct",
    "open",
    "ord",
    "pow",
    "print",
    "property",
    "quit",
    "range",
    "repr",
    "reversed",
    "round",
    "set",
    "setattr",
    "slice",
    "sorted",
    "staticmethod",
    "str",
    "sum",
    "super",
    "tuple",
    "type",
    "vars",
    "zip",
    // Built-in constants
    "Ellipsis",
    "NotImplemented",
    "__debug__",
    // Built-in exceptions and warnings
    "ArithmeticError",
    "AssertionError",
    "AttributeError",
    "BaseException",
    "BaseExceptionGroup",
    "BlockingIOError",
    "BrokenPipeError",
    "BufferError",
    "BytesWarning",
    "ChildProcessError",
    "ConnectionAbortedError",
    "ConnectionError",
    "ConnectionRefusedError",
    "ConnectionResetError",
    "DeprecationWarning",
    "EOFError",
    "EncodingWarning",
    "EnvironmentError",
    "Exception",
    "ExceptionGroup",
    "FileExistsError",
    "FileNotFoundError",
    "FloatingPointError",
    "FutureWarning",
    "GeneratorExit",
    "IOError",
    "ImportError",
    "ImportWarning",
    "IndentationError",
    "IndexError",
    "InterruptedError",
    "IsADirectoryError",
    "KeyError",
    "KeyboardInterrupt",
    "LookupError",
    "MemoryError",
    "ModuleNotFoundError",
    "NameError",
    "NotADirectoryError",
    "NotImplementedError",
    "OSError",
    "OverflowError",
    "PendingDeprecationWarning",
    "PermissionError",
    "ProcessLookupError",
    "RecursionError",
    "ReferenceError",
    "ResourceWarning",
    "RuntimeError",
    "RuntimeWarning",
    "StopAsyncIteration",
    "StopIteration",
    "SyntaxError",
    "SyntaxWarning",
    "SystemError",
    "SystemExit",
    "TabError",
    "TimeoutError",
    "TypeError",
    "UnboundLocalError",
    "UnicodeDecodeError",
    "UnicodeEncodeError",
    "UnicodeError",
    "UnicodeTranslateError",
    "UnicodeWarning",
    "UserWarning",
    "ValueError",
    "Warning",
    "ZeroDivisionError",
];

/// Check if a name is a Python keyword.
pub fn is_python_keyword(name: &str) -> bool {
    PYTHON_KEYWORDS.contains(&name)
}

/// Check if a name is bound by the `builtins` module.
pub fn is_python_builtin(name: &str) -> bool {
    PYTHON_BUILTINS.contains(&name)
}

/// Check if a name has the `__dunder__` shape reserved for the interpreter.
pub fn is_dunder(name: &str) -> bool {
    name.len() > 4 && name.starts_with("__") && name.ends_with("__")
}

/// Validate that a string is a valid Python identifier.
///
/// Checks:
/// - Non-empty
/// - Starts with letter or underscore
/// - Contains only alphanumeric and underscore
/// - Not a Python keyword
///
/// # Examples
///
/// ```
/// use astobf_core::reserved::validate_python_identifier;
///
/// assert!(validate_python_identifier("foo").is_ok());
/// assert!(validate_python_identifier("_private").is_ok());
/// assert!(validate_python_identifier("").is_err());
/// assert!(validate_python_identifier("123foo").is_err());
/// assert!(validate_python_identifier("class").is_err());
/// ```
pub fn validate_python_identifier(name: &str) -> ValidationResult<()> {
    let mut chars = name.chars();
    let Some(first) = chars.next() else {
        return Err(ValidationError::InvalidName {
            name: name.to_string(),
            reason: "name cannot be empty".to_string(),
        });
    };

    if !first.is_alphabetic() && first != '_' {
        return Err(ValidationError::InvalidName {
            name: name.to_string(),
            reason: "must start with letter or underscore".to_string(),
        });
    }

    if let Some(ch) = chars.find(|ch| !ch.is_alphanumeric() && *ch != '_') {
        return Err(ValidationError::InvalidName {
            name: name.to_string(),
            reason: format!("invalid character: '{}'", ch),
        });
    }

    if is_python_keyword(name) {
        return Err(ValidationError::InvalidName {
            name: name.to_string(),
            reason: "cannot use Python keyword as identifier".to_string(),
        });
    }

    Ok(())
}

// ============================================================================
// ReservedNames
// ============================================================================

/// The immutable set of identifiers a run must leave untouched.
#[derive(Debug, Clone, Default)]
pub struct ReservedNames {
    extra: HashSet<String>,
}

impl ReservedNames {
    /// The Python reserved set with no extra names.
    pub fn python() -> Self {
        Self::default()
    }

    /// The Python reserved set plus caller-supplied names.
    pub fn with_extra<I, S>(extra: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            extra: extra.into_iter().map(Into::into).collect(),
        }
    }

    /// Add caller-supplied names to the set.
    pub fn extend<I, S>(&mut self, extra: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.extra.extend(extra.into_iter().map(Into::into));
    }

    /// Returns true if `name` must not be renamed.
    pub fn contains(&self, name: &str) -> bool {
        PYTHON_LITERALS.contains(&name)
            || is_python_keyword(name)
            || is_python_builtin(name)
            || is_dunder(name)
            || self.extra.contains(name)
    }

    /// Every explicitly listed name, sorted. Dunder names are matched by
    /// shape and are not enumerated.
    pub fn sorted(&self) -> Vec<&str> {
        let all: BTreeSet<&str> = PYTHON_KEYWORDS
            .iter()
            .chain(PYTHON_BUILTINS)
            .copied()
            .chain(self.extra.iter().map(String::as_str))
            .collect();
        all.into_iter().collect()
    }
}

// ============================================================================
// Tests
// ============================================================================
