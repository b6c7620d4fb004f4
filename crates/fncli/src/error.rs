//! Error types for registration, dispatch, and rendering.
//!
//! Registration errors are fatal at startup: a command that fails to
//! register is never made available. Dispatch errors are fatal for one
//! invocation only; batch mode catches them per line.

use std::path::PathBuf;
use thiserror::Error;

/// Failures while parsing a structured doc comment.
#[derive(Debug, Error)]
pub enum DocError {
    /// The doc comment has no `Args:` section header.
    #[error("missing `Args:` section")]
    MissingArgs,

    /// The doc comment has no `Returns:` section header.
    #[error("missing `Returns:` section")]
    MissingReturns,

    /// A parameter line could not be split into name, type, and description.
    #[error("cannot parse parameter line {0:?}")]
    MalformedParam(String),

    /// The `Returns:` section has no `type: description` line.
    #[error("cannot parse return line {0:?}")]
    MalformedReturn(String),

    /// The same parameter is documented more than once.
    #[error("parameter `{0}` is documented twice")]
    DuplicateParam(String),

    /// A documented parameter does not exist in the declared schema.
    #[error("documented parameter `{0}` is not declared")]
    UndeclaredParam(String),

    /// A declared parameter has no matching doc entry.
    #[error("declared parameter `{0}` has no doc entry")]
    UndocumentedParam(String),
}

/// Failures while registering a command.
#[derive(Debug, Error)]
pub enum RegistrationError {
    /// The command's doc comment could not be parsed or does not match
    /// its declared parameters.
    #[error("registering `{command}`: {source}")]
    Doc {
        /// Name of the command being registered.
        command: String,
        /// The underlying doc-comment failure.
        source: DocError,
    },

    /// A command with this name is already registered. The registry
    /// keeps the first registration.
    #[error("command `{0}` is already registered")]
    Duplicate(String),
}

/// Failures while routing a command's output to its renderer.
#[derive(Debug, Error)]
pub enum RenderError {
    /// The command was registered to save an artifact but produced a
    /// renderable value instead.
    #[error("command produced no artifact to save")]
    MissingArtifact,

    /// The command produced an artifact but was registered with the
    /// default text renderer.
    #[error("command produced an artifact but was registered with the default renderer")]
    UnexpectedArtifact,

    /// Writing the artifact file failed.
    #[error("cannot write artifact {}: {source}", .path.display())]
    Io {
        /// Destination the artifact was being written to.
        path: PathBuf,
        /// The underlying I/O failure.
        source: std::io::Error,
    },
}

/// Failures during a single dispatch.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// The first token does not name a registered command.
    #[error("unknown command `{0}`")]
    UnknownCommand(String),

    /// The argument line contained no tokens.
    #[error("empty argument line")]
    EmptyLine,

    /// Wrong number of positional tokens (or an unrecognized option)
    /// for the matched command.
    #[error("{message}")]
    Arity {
        /// Name of the command that was matched.
        command: String,
        /// The parser's diagnostic, including usage.
        message: String,
    },

    /// A token could not be converted by its parameter's coercion.
    #[error("invalid value for `{param}` of `{command}`: {cause:#}")]
    Coercion {
        /// Name of the command being dispatched.
        command: String,
        /// Name of the offending parameter.
        param: String,
        /// The coercion failure, including collaborator errors such as
        /// a table file that could not be read.
        cause: anyhow::Error,
    },

    /// The callable itself returned an error.
    #[error("command `{command}` failed: {cause:#}")]
    Execution {
        /// Name of the command that ran.
        command: String,
        /// The callable's error.
        cause: anyhow::Error,
    },

    /// The selected renderer could not complete its side effect.
    #[error("command `{command}`: {source}")]
    Render {
        /// Name of the command that ran.
        command: String,
        /// The underlying render failure.
        source: RenderError,
    },

    /// The batch source file could not be opened.
    #[error("cannot read batch input {}: {source}", .path.display())]
    BatchSource {
        /// Path passed to `--batch`.
        path: PathBuf,
        /// The underlying I/O failure.
        source: std::io::Error,
    },

    /// An I/O failure while reading batch lines or writing output.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
