//! Argument parsing and dispatch.
//!
//! [`App`] is the composition root: it owns the registry, generates the
//! clap command tree from the registered specs, and routes one argument
//! line at a time through parse, coercion, invocation, and rendering.
//! One dispatch call is one attempt; there are no retries.

use crate::coerce::ArgValue;
use crate::error::{DispatchError, RegistrationError};
use crate::registry::Registry;
use crate::render::{render, Outcome, Output};
use crate::schema::{CommandDecl, OutputKind, FILENAME_OPT};
use clap::error::ErrorKind;
use std::io::Write;
use std::path::PathBuf;

/// A CLI application: a named registry plus the dispatch loop.
///
/// Registration happens first (and is the only mutation); dispatch only
/// reads. The two phases must not interleave.
pub struct App {
    name: String,
    about: Option<String>,
    registry: Registry,
}

impl App {
    /// Creates an app with the given program name and a standard
    /// coercion table.
    pub fn new(name: impl Into<String>) -> Self {
        App {
            name: name.into(),
            about: None,
            registry: Registry::new(),
        }
    }

    /// Creates an app around a prepared registry.
    pub fn with_registry(name: impl Into<String>, registry: Registry) -> Self {
        App {
            name: name.into(),
            about: None,
            registry,
        }
    }

    /// Sets the program-level description shown in help.
    pub fn about(mut self, text: impl Into<String>) -> Self {
        self.about = Some(text.into());
        self
    }

    /// The program name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Read access to the registry.
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Registers a command; see [`Registry::register`].
    pub fn register<F>(
        &mut self,
        decl: CommandDecl,
        output: OutputKind,
        func: F,
    ) -> Result<(), RegistrationError>
    where
        F: Fn(&[ArgValue]) -> anyhow::Result<Output> + 'static,
    {
        self.registry.register(decl, output, func)
    }

    /// The full clap command for this app, including the `--batch` flag
    /// and one generated subcommand per registered command.
    pub fn command(&self) -> clap::Command {
        self.clap_command(true)
    }

    fn clap_command(&self, with_batch: bool) -> clap::Command {
        let mut cmd = clap::Command::new(self.name.clone());
        if let Some(about) = &self.about {
            cmd = cmd.about(about.clone());
        }
        if with_batch {
            cmd = cmd.arg(
                clap::Arg::new("batch")
                    .short('b')
                    .long("batch")
                    .value_name("FILE")
                    .num_args(0..=1)
                    .default_missing_value("-")
                    .help("Run argument lines from FILE ('-' or no value reads stdin)"),
            );
        }
        for spec in self.registry.specs() {
            cmd = cmd.subcommand(spec.to_clap());
        }
        cmd
    }

    /// Dispatches one argument line: `[command, args...]`.
    ///
    /// The first token selects the command; the rest are parsed against
    /// its generated subcommand, coerced per parameter, and passed
    /// positionally to the callable. The callable's output goes to the
    /// renderer selected at registration.
    ///
    /// # Errors
    ///
    /// [`DispatchError::UnknownCommand`] for an unregistered first
    /// token, [`DispatchError::Arity`] for wrong positional counts or
    /// unrecognized options, [`DispatchError::Coercion`] when a token
    /// cannot be converted, [`DispatchError::Execution`] when the
    /// callable fails, and [`DispatchError::Render`] when its renderer
    /// cannot complete.
    pub fn dispatch<I, S>(&self, line: I) -> Result<Outcome, DispatchError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let line: Vec<String> = line.into_iter().map(Into::into).collect();
        let Some(command) = line.first().cloned() else {
            return Err(DispatchError::EmptyLine);
        };
        let Some(entry) = self.registry.get(&command) else {
            return Err(DispatchError::UnknownCommand(command));
        };

        let mut argv = Vec::with_capacity(line.len() + 1);
        argv.push(self.name.as_str());
        argv.extend(line.iter().map(String::as_str));
        let matches = match self.clap_command(false).try_get_matches_from(argv) {
            Ok(matches) => matches,
            Err(err) => {
                return match err.kind() {
                    ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
                        Ok(Outcome::Rendered(render_clap_message(&err)))
                    }
                    _ => Err(DispatchError::Arity {
                        command,
                        message: render_clap_message(&err),
                    }),
                }
            }
        };
        let Some((_, sub)) = matches.subcommand() else {
            return Err(DispatchError::UnknownCommand(command));
        };

        let spec = &entry.spec;
        let mut values = Vec::with_capacity(spec.params.len());
        for param in &spec.params {
            let raw = sub
                .get_one::<String>(&param.name)
                .ok_or_else(|| DispatchError::Arity {
                    command: command.clone(),
                    message: format!("missing value for `{}`", param.name),
                })?;
            let value = (param.coerce)(raw).map_err(|cause| DispatchError::Coercion {
                command: command.clone(),
                param: param.name.clone(),
                cause,
            })?;
            values.push(value);
        }

        let output = (entry.func)(&values).map_err(|cause| DispatchError::Execution {
            command: command.clone(),
            cause,
        })?;

        let artifact_path = match spec.output {
            OutputKind::ArtifactSave => sub.get_one::<String>(FILENAME_OPT).map(PathBuf::from),
            OutputKind::Default => None,
        };
        render(spec.output, output, artifact_path.as_deref()).map_err(|source| {
            DispatchError::Render {
                command,
                source,
            }
        })
    }

    /// Runs the app against a full process argument vector (including
    /// the program name at position zero).
    ///
    /// A `--batch` flag switches to batch mode; otherwise the remaining
    /// arguments are dispatched as a single invocation and a rendered
    /// outcome is written to stdout. With no arguments at all, help is
    /// printed.
    pub fn run<I, S>(&self, argv: I) -> Result<(), DispatchError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let argv: Vec<String> = argv.into_iter().map(Into::into).collect();
        let matches = match self
            .clap_command(true)
            .try_get_matches_from(argv.iter().map(String::as_str))
        {
            Ok(matches) => matches,
            Err(err) => {
                return match err.kind() {
                    ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
                        print!("{}", err.render());
                        Ok(())
                    }
                    ErrorKind::InvalidSubcommand => {
                        Err(DispatchError::UnknownCommand(first_operand(&argv)))
                    }
                    _ => Err(DispatchError::Arity {
                        command: self.name.clone(),
                        message: render_clap_message(&err),
                    }),
                }
            }
        };

        if let Some(source) = matches.get_one::<String>("batch") {
            let path = (source != "-").then(|| PathBuf::from(source));
            self.run_batch(path.as_deref())?;
            return Ok(());
        }

        match matches.subcommand() {
            Some(_) => {
                let outcome = self.dispatch(argv[1..].iter().cloned())?;
                self.emit(outcome)
            }
            None => {
                let mut cmd = self.clap_command(true);
                cmd.print_help()?;
                Ok(())
            }
        }
    }

    /// Writes a rendered outcome to stdout. Saved artifacts are silent;
    /// the file itself is the output.
    pub(crate) fn emit(&self, outcome: Outcome) -> Result<(), DispatchError> {
        if let Outcome::Rendered(text) = outcome {
            let stdout = std::io::stdout();
            let mut handle = stdout.lock();
            writeln!(handle, "{text}")?;
        }
        Ok(())
    }
}

impl std::fmt::Debug for App {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("App")
            .field("name", &self.name)
            .field("registry", &self.registry)
            .finish_non_exhaustive()
    }
}

/// A clap diagnostic as a plain string, without the trailing newline.
fn render_clap_message(err: &clap::Error) -> String {
    err.render().to_string().trim_end().to_string()
}

/// First non-flag token after the program name; used to name the
/// offending command when clap rejects a subcommand.
fn first_operand(argv: &[String]) -> String {
    argv.iter()
        .skip(1)
        .find(|arg| !arg.starts_with('-'))
        .cloned()
        .unwrap_or_default()
}
