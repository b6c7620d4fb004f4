//! Per-type argument coercion.
//!
//! Each declared parameter type maps to a function that converts a raw
//! command-line token into the value the callable receives. The canonical
//! non-trivial entry treats the token as a file path and loads a table
//! from it. Types without an entry fall back to the identity string
//! coercion, so new richer argument types are added by inserting table
//! entries, never by touching the dispatcher.

use crate::table::Table;
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

/// Stable tag for a declared parameter type.
///
/// Keys the coercion table; avoids keying on runtime type identities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeTag {
    /// Use the token verbatim.
    Str,
    /// Parse the token as a 64-bit signed integer.
    Int,
    /// Parse the token as a 64-bit float.
    Float,
    /// Treat the token as a file path and load a table from it.
    Table,
}

impl TypeTag {
    /// The tag's name as used in doc comments and diagnostics.
    pub fn name(&self) -> &'static str {
        match self {
            TypeTag::Str => "str",
            TypeTag::Int => "int",
            TypeTag::Float => "float",
            TypeTag::Table => "table",
        }
    }
}

/// A coerced argument value, passed positionally to the callable.
#[derive(Debug, Clone, PartialEq)]
pub enum ArgValue {
    /// A verbatim string token.
    Str(String),
    /// A parsed integer.
    Int(i64),
    /// A parsed float.
    Float(f64),
    /// A table loaded from the token's path.
    Table(Table),
}

impl ArgValue {
    /// The string value, if this is a `Str`.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            ArgValue::Str(s) => Some(s),
            _ => None,
        }
    }

    /// The integer value, if this is an `Int`.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            ArgValue::Int(n) => Some(*n),
            _ => None,
        }
    }

    /// The float value, if this is a `Float`.
    pub fn as_float(&self) -> Option<f64> {
        match self {
            ArgValue::Float(x) => Some(*x),
            _ => None,
        }
    }

    /// The table, if this is a `Table`.
    pub fn as_table(&self) -> Option<&Table> {
        match self {
            ArgValue::Table(t) => Some(t),
            _ => None,
        }
    }
}

/// A coercion from a raw token to an argument value.
pub type CoercionFn = Arc<dyn Fn(&str) -> anyhow::Result<ArgValue> + Send + Sync>;

/// The type-to-coercion mapping consulted at registration time.
pub struct CoercionTable {
    entries: HashMap<TypeTag, CoercionFn>,
}

impl CoercionTable {
    /// An empty table: every tag falls back to the identity coercion.
    pub fn empty() -> Self {
        CoercionTable {
            entries: HashMap::new(),
        }
    }

    /// The standard table: `Int` and `Float` parse numbers, `Table`
    /// loads a CSV file from the token's path.
    pub fn standard() -> Self {
        let mut table = CoercionTable::empty();
        table.insert(
            TypeTag::Int,
            Arc::new(|token: &str| {
                let n = token
                    .parse::<i64>()
                    .map_err(|_| anyhow::anyhow!("`{token}` is not an integer"))?;
                Ok(ArgValue::Int(n))
            }),
        );
        table.insert(
            TypeTag::Float,
            Arc::new(|token: &str| {
                let x = token
                    .parse::<f64>()
                    .map_err(|_| anyhow::anyhow!("`{token}` is not a number"))?;
                Ok(ArgValue::Float(x))
            }),
        );
        table.insert(
            TypeTag::Table,
            Arc::new(|token: &str| Table::load(Path::new(token)).map(ArgValue::Table)),
        );
        table
    }

    /// Inserts or replaces the coercion for a tag.
    ///
    /// This is the extensibility point for richer argument types.
    pub fn insert(&mut self, tag: TypeTag, coerce: CoercionFn) {
        self.entries.insert(tag, coerce);
    }

    /// The coercion for a tag, or the identity string coercion if the
    /// tag has no entry.
    pub fn resolve(&self, tag: TypeTag) -> CoercionFn {
        self.entries.get(&tag).cloned().unwrap_or_else(identity)
    }
}

impl Default for CoercionTable {
    fn default() -> Self {
        CoercionTable::standard()
    }
}

impl std::fmt::Debug for CoercionTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut tags: Vec<_> = self.entries.keys().map(TypeTag::name).collect();
        tags.sort_unstable();
        f.debug_struct("CoercionTable")
            .field("tags", &tags)
            .finish_non_exhaustive()
    }
}

fn identity() -> CoercionFn {
    Arc::new(|token: &str| Ok(ArgValue::Str(token.to_string())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_int_coercion() {
        let table = CoercionTable::standard();
        let coerce = table.resolve(TypeTag::Int);
        assert_eq!(coerce("5").unwrap(), ArgValue::Int(5));
        assert_eq!(coerce("-3").unwrap(), ArgValue::Int(-3));
    }

    #[test]
    fn test_int_coercion_rejects_text() {
        let coerce = CoercionTable::standard().resolve(TypeTag::Int);
        let err = coerce("abc").unwrap_err();
        assert!(err.to_string().contains("not an integer"));
    }

    #[test]
    fn test_float_coercion() {
        let coerce = CoercionTable::standard().resolve(TypeTag::Float);
        assert_eq!(coerce("2.5").unwrap(), ArgValue::Float(2.5));
    }

    #[test]
    fn test_identity_fallback() {
        let coerce = CoercionTable::empty().resolve(TypeTag::Int);
        assert_eq!(coerce("5").unwrap(), ArgValue::Str("5".into()));
    }

    #[test]
    fn test_str_is_identity_in_standard_table() {
        let coerce = CoercionTable::standard().resolve(TypeTag::Str);
        assert_eq!(coerce("hello").unwrap(), ArgValue::Str("hello".into()));
    }

    #[test]
    fn test_table_coercion_loads_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "x,y").unwrap();
        writeln!(file, "1,6").unwrap();

        let coerce = CoercionTable::standard().resolve(TypeTag::Table);
        let value = coerce(file.path().to_str().unwrap()).unwrap();
        let table = value.as_table().unwrap();
        assert_eq!(table.headers(), ["x", "y"]);
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_table_coercion_missing_file() {
        let coerce = CoercionTable::standard().resolve(TypeTag::Table);
        let err = coerce("/no/such/table.csv").unwrap_err();
        assert!(err.to_string().contains("cannot open table"));
    }

    #[test]
    fn test_insert_overrides_entry() {
        let mut table = CoercionTable::standard();
        table.insert(
            TypeTag::Int,
            Arc::new(|token: &str| Ok(ArgValue::Int(token.len() as i64))),
        );
        let coerce = table.resolve(TypeTag::Int);
        assert_eq!(coerce("abcd").unwrap(), ArgValue::Int(4));
    }

    #[test]
    fn test_arg_value_accessors() {
        assert_eq!(ArgValue::Int(7).as_int(), Some(7));
        assert_eq!(ArgValue::Int(7).as_str(), None);
        assert_eq!(ArgValue::Float(1.5).as_float(), Some(1.5));
        assert_eq!(ArgValue::Str("a".into()).as_str(), Some("a"));
    }
}
