//! Function-based subcommands for clap CLIs.
//!
//! `fncli` turns plain functions with structured doc comments into the
//! subcommands of a single command-line program. For each registered
//! function it derives an argument parser, doc-driven help text, a
//! per-type input coercion, and an output renderer, without the function
//! author writing any parsing code.
//!
//! # Pipeline
//!
//! - [`parse_docstring`] extracts the summary, per-parameter help, and
//!   return description from the function's doc comment.
//! - [`CoercionTable`] maps declared parameter types to token
//!   conversions (e.g. a `table` parameter loads a CSV file from the
//!   token's path instead of passing the token through).
//! - [`Registry`] binds each callable to its generated [`CommandSpec`];
//!   [`App`] owns the registry and generates the clap command tree.
//! - [`App::dispatch`] runs one argument line; [`App::run_batch`]
//!   replays many lines from a file or stdin, continuing past per-line
//!   failures.
//! - [`OutputKind`] selects the renderer: print the return value to
//!   stdout, or persist a produced artifact to the renderer-owned
//!   `--filename` destination.
//!
//! # Example
//!
//! ```rust
//! use fncli::{App, ArgValue, CommandDecl, Outcome, Output, OutputKind, TypeTag};
//!
//! const DOC: &str = "\
//! Doubles an integer.
//!
//! Args:
//!     n (int): Integer to double.
//!
//! Returns:
//!     int: Twice the argument.";
//!
//! let mut app = App::new("demo");
//! app.register(
//!     CommandDecl::new("double", DOC).param("n", TypeTag::Int),
//!     OutputKind::Default,
//!     |args: &[ArgValue]| Output::render(2 * args[0].as_int().unwrap()),
//! )?;
//!
//! let outcome = app.dispatch(["double", "21"])?;
//! assert_eq!(outcome, Outcome::Rendered("42".into()));
//! # Ok::<(), anyhow::Error>(())
//! ```

mod batch;
mod coerce;
mod dispatch;
mod docstring;
mod error;
mod registry;
mod render;
mod schema;
mod table;

pub use batch::BatchReport;
pub use coerce::{ArgValue, CoercionFn, CoercionTable, TypeTag};
pub use dispatch::App;
pub use docstring::{parse_docstring, ParamDoc, ParsedDoc, ReturnDoc};
pub use error::{DispatchError, DocError, RegistrationError, RenderError};
pub use registry::{CommandFn, Registry};
pub use render::{Outcome, Output};
pub use schema::{
    CommandDecl, CommandSpec, OutputKind, ParamDecl, ParamSpec, DEFAULT_ARTIFACT_PATH,
    FILENAME_OPT,
};
pub use table::Table;
