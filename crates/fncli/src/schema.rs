//! Declared command schemas and the specs generated from them.
//!
//! A [`CommandDecl`] is the statically declared source of truth for one
//! command: its name, its doc comment, and its ordered, type-tagged
//! parameters. Registration cross-checks the declaration against the doc
//! comment and produces a [`CommandSpec`], which is what the dispatcher
//! actually consumes.

use crate::coerce::{CoercionFn, TypeTag};
use clap::{Arg, Command};
use std::fmt;

/// Name of the renderer-owned destination option for artifact commands.
pub const FILENAME_OPT: &str = "filename";

/// Default destination when `--filename` is not given.
pub const DEFAULT_ARTIFACT_PATH: &str = "plot.png";

/// One declared parameter: a name and its coercion type tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParamDecl {
    /// Parameter name, matched against the doc comment's `Args:` lines.
    pub name: &'static str,
    /// Declared type, looked up in the coercion table.
    pub tag: TypeTag,
}

/// The statically declared schema for one command.
#[derive(Debug, Clone)]
pub struct CommandDecl {
    /// Command name; must be unique across the registry.
    pub name: &'static str,
    /// The structured doc comment (see [`crate::parse_docstring`]).
    pub doc: &'static str,
    /// Parameters in declaration order.
    pub params: Vec<ParamDecl>,
}

impl CommandDecl {
    /// Starts a declaration with no parameters.
    pub fn new(name: &'static str, doc: &'static str) -> Self {
        CommandDecl {
            name,
            doc,
            params: Vec::new(),
        }
    }

    /// Appends a declared parameter.
    pub fn param(mut self, name: &'static str, tag: TypeTag) -> Self {
        self.params.push(ParamDecl { name, tag });
        self
    }
}

/// Which renderer receives the callable's output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputKind {
    /// Write the return value's text representation to stdout.
    #[default]
    Default,
    /// Persist the produced artifact to the `--filename` destination.
    ArtifactSave,
}

/// One parameter of a generated spec: name, doc-derived help, coercion.
#[derive(Clone)]
pub struct ParamSpec {
    /// Parameter name (also the positional argument's id).
    pub name: String,
    /// Help text taken from the doc comment.
    pub help: String,
    pub(crate) coerce: CoercionFn,
}

impl fmt::Debug for ParamSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ParamSpec")
            .field("name", &self.name)
            .field("help", &self.help)
            .finish_non_exhaustive()
    }
}

/// The generated subcommand definition for one registered command.
///
/// Created at registration time, never mutated after, owned by the
/// registry.
#[derive(Clone)]
pub struct CommandSpec {
    /// Unique command name, derived from the declaration.
    pub name: String,
    /// Summary joined with the return description.
    pub description: String,
    /// Positional parameters in declaration order.
    pub params: Vec<ParamSpec>,
    /// Renderer selected at registration time.
    pub output: OutputKind,
}

impl CommandSpec {
    /// Ordered parameter names.
    pub fn param_order(&self) -> impl Iterator<Item = &str> {
        self.params.iter().map(|p| p.name.as_str())
    }

    /// Builds the clap subcommand for this spec.
    ///
    /// Positional arguments follow declaration order and carry the doc
    /// descriptions as help; artifact commands additionally own the
    /// `--filename` option, which is never forwarded to the callable.
    pub(crate) fn to_clap(&self) -> Command {
        let mut cmd = Command::new(self.name.clone()).about(self.description.clone());
        for param in &self.params {
            cmd = cmd.arg(
                Arg::new(param.name.clone())
                    .required(true)
                    .value_name(param.name.to_uppercase())
                    .allow_negative_numbers(true)
                    .help(param.help.clone()),
            );
        }
        if self.output == OutputKind::ArtifactSave {
            cmd = cmd.arg(
                Arg::new(FILENAME_OPT)
                    .long(FILENAME_OPT)
                    .value_name("FILE")
                    .default_value(DEFAULT_ARTIFACT_PATH)
                    .help("Destination file for the saved artifact"),
            );
        }
        cmd
    }
}

impl fmt::Debug for CommandSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandSpec")
            .field("name", &self.name)
            .field("params", &self.params)
            .field("output", &self.output)
            .finish_non_exhaustive()
    }
}
