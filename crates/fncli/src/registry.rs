//! The command registry.
//!
//! Holds every registered command: its callable, its generated
//! [`CommandSpec`], and nothing else. Populated once at startup, read
//! only during dispatch, no deletion. The registry is owned by the
//! composition root (usually via [`crate::App`]) rather than living in
//! ambient global state.

use crate::coerce::{ArgValue, CoercionTable};
use crate::docstring::parse_docstring;
use crate::error::RegistrationError;
use crate::render::Output;
use crate::schema::{CommandDecl, CommandSpec, OutputKind, ParamSpec};
use std::collections::BTreeMap;
use std::fmt;

/// The callable bound to a command: coerced arguments in, output out.
pub type CommandFn = Box<dyn Fn(&[ArgValue]) -> anyhow::Result<Output>>;

pub(crate) struct CommandEntry {
    pub(crate) func: CommandFn,
    pub(crate) spec: CommandSpec,
}

/// The process-wide table of registered commands.
pub struct Registry {
    commands: BTreeMap<String, CommandEntry>,
    coercions: CoercionTable,
}

impl Registry {
    /// A registry using the standard coercion table.
    pub fn new() -> Self {
        Registry::with_coercions(CoercionTable::standard())
    }

    /// A registry with a custom coercion table.
    pub fn with_coercions(coercions: CoercionTable) -> Self {
        Registry {
            commands: BTreeMap::new(),
            coercions,
        }
    }

    /// Registers a command.
    ///
    /// Parses the declaration's doc comment against its declared
    /// parameter names, resolves each parameter's coercion, and stores
    /// the generated spec alongside the callable. The subcommand's
    /// description is the doc summary joined with the return description.
    ///
    /// # Errors
    ///
    /// Fails on a malformed doc comment, a parameter/doc mismatch, or a
    /// duplicate command name; the registry keeps the first registration.
    pub fn register<F>(
        &mut self,
        decl: CommandDecl,
        output: OutputKind,
        func: F,
    ) -> Result<(), RegistrationError>
    where
        F: Fn(&[ArgValue]) -> anyhow::Result<Output> + 'static,
    {
        if self.commands.contains_key(decl.name) {
            return Err(RegistrationError::Duplicate(decl.name.to_string()));
        }

        let declared: Vec<&str> = decl.params.iter().map(|p| p.name).collect();
        let doc = parse_docstring(decl.doc, &declared).map_err(|source| RegistrationError::Doc {
            command: decl.name.to_string(),
            source,
        })?;

        let params = decl
            .params
            .iter()
            .map(|p| ParamSpec {
                name: p.name.to_string(),
                help: doc.params[p.name].description.clone(),
                coerce: self.coercions.resolve(p.tag),
            })
            .collect();

        let spec = CommandSpec {
            name: decl.name.to_string(),
            description: format!("{}\n\nReturns: {}", doc.summary, doc.ret.description),
            params,
            output,
        };
        self.commands.insert(
            decl.name.to_string(),
            CommandEntry {
                func: Box::new(func),
                spec,
            },
        );
        Ok(())
    }

    pub(crate) fn get(&self, name: &str) -> Option<&CommandEntry> {
        self.commands.get(name)
    }

    /// Returns true if a command with this name is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.commands.contains_key(name)
    }

    /// Registered command names, sorted.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.commands.keys().map(String::as_str)
    }

    /// Generated specs, in name order.
    pub fn specs(&self) -> impl Iterator<Item = &CommandSpec> {
        self.commands.values().map(|entry| &entry.spec)
    }

    /// Number of registered commands.
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    /// Returns true if nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

impl Default for Registry {
    fn default() -> Self {
        Registry::new()
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("commands", &self.names().collect::<Vec<_>>())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coerce::TypeTag;
    use crate::error::DocError;

    const FACTORIAL_DOC: &str = "\
Calculates the factorial of a nonnegative integer n.

Args:
    n (int): Integer to calculate the factorial of.

Returns:
    int: Factorial of the argument.";

    fn noop(_args: &[ArgValue]) -> anyhow::Result<Output> {
        Output::render(0)
    }

    #[test]
    fn test_register_builds_spec() {
        let mut registry = Registry::new();
        registry
            .register(
                CommandDecl::new("factorial", FACTORIAL_DOC).param("n", TypeTag::Int),
                OutputKind::Default,
                noop,
            )
            .unwrap();

        assert!(registry.contains("factorial"));
        let spec = registry.specs().next().unwrap();
        assert_eq!(
            spec.description,
            "Calculates the factorial of a nonnegative integer n.\n\nReturns: Factorial of the argument."
        );
        assert_eq!(spec.param_order().collect::<Vec<_>>(), vec!["n"]);
        assert_eq!(
            spec.params[0].help,
            "Integer to calculate the factorial of."
        );
    }

    #[test]
    fn test_duplicate_registration_keeps_first() {
        let mut registry = Registry::new();
        registry
            .register(
                CommandDecl::new("factorial", FACTORIAL_DOC).param("n", TypeTag::Int),
                OutputKind::Default,
                noop,
            )
            .unwrap();

        let err = registry
            .register(
                CommandDecl::new("factorial", FACTORIAL_DOC).param("n", TypeTag::Int),
                OutputKind::ArtifactSave,
                noop,
            )
            .unwrap_err();

        assert!(matches!(err, RegistrationError::Duplicate(name) if name == "factorial"));
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.specs().next().unwrap().output, OutputKind::Default);
    }

    #[test]
    fn test_doc_mismatch_fails_registration() {
        let mut registry = Registry::new();
        let err = registry
            .register(
                CommandDecl::new("factorial", FACTORIAL_DOC)
                    .param("n", TypeTag::Int)
                    .param("extra", TypeTag::Str),
                OutputKind::Default,
                noop,
            )
            .unwrap_err();

        assert!(matches!(
            err,
            RegistrationError::Doc {
                source: DocError::UndocumentedParam(_),
                ..
            }
        ));
        assert!(registry.is_empty());
    }

    #[test]
    fn test_names_are_sorted() {
        let zebra_doc = "\
Does nothing.

Args:

Returns:
    int: Zero.";
        let mut registry = Registry::new();
        registry
            .register(CommandDecl::new("zebra", zebra_doc), OutputKind::Default, noop)
            .unwrap();
        registry
            .register(CommandDecl::new("alpha", zebra_doc), OutputKind::Default, noop)
            .unwrap();
        assert_eq!(registry.names().collect::<Vec<_>>(), vec!["alpha", "zebra"]);
    }
}
