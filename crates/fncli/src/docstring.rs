//! Structured doc-comment parsing.
//!
//! A command's doc comment carries everything the generated subcommand
//! needs for help text: a summary paragraph, one `name type: description`
//! line per parameter under an `Args:` header, and a `type: description`
//! line under a `Returns:` header. Parsing is a pure function of the doc
//! text and the declared parameter names; any mismatch between the two is
//! a hard failure so that a subcommand with incomplete help is never
//! generated.

use crate::error::DocError;
use std::collections::HashMap;

/// Documentation for one parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParamDoc {
    /// The declared type name as written in the doc comment, with any
    /// surrounding parentheses stripped (`(int)` and `int` are equal).
    pub type_name: String,
    /// Help text for the parameter.
    pub description: String,
}

/// Documentation for the return value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReturnDoc {
    /// The declared return type name.
    pub type_name: String,
    /// Description of what the command returns.
    pub description: String,
}

/// A fully parsed doc comment.
///
/// Produced once per registered command and immutable thereafter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedDoc {
    /// The free-text summary paragraph preceding `Args:`.
    pub summary: String,
    /// Per-parameter documentation, keyed by parameter name.
    pub params: HashMap<String, ParamDoc>,
    /// Return-value documentation.
    pub ret: ReturnDoc,
}

/// Parses a structured doc comment against the declared parameter names.
///
/// The grammar is fixed: summary, `Args:`, one line per parameter in the
/// form `name type: description` (the description is everything after the
/// first colon, trimmed), `Returns:`, then `type: description`.
///
/// # Errors
///
/// Fails if either section header is missing, a line does not fit the
/// grammar, a parameter is documented twice, or the documented names are
/// not exactly the declared names.
pub fn parse_docstring(doc: &str, declared: &[&str]) -> Result<ParsedDoc, DocError> {
    let (summary, rest) = doc.split_once("Args:").ok_or(DocError::MissingArgs)?;
    let (args_raw, ret_raw) = rest.split_once("Returns:").ok_or(DocError::MissingReturns)?;

    let mut params = HashMap::new();
    for line in args_raw.lines().map(str::trim).filter(|l| !l.is_empty()) {
        let (name, param_doc) = parse_param_line(line)?;
        if params.insert(name.clone(), param_doc).is_some() {
            return Err(DocError::DuplicateParam(name));
        }
    }

    let ret_line = ret_raw
        .lines()
        .map(str::trim)
        .find(|l| !l.is_empty())
        .ok_or_else(|| DocError::MalformedReturn(ret_raw.trim().to_string()))?;
    let (ret_type, ret_desc) = ret_line
        .split_once(':')
        .ok_or_else(|| DocError::MalformedReturn(ret_line.to_string()))?;
    if ret_type.trim().is_empty() {
        return Err(DocError::MalformedReturn(ret_line.to_string()));
    }

    for name in declared {
        if !params.contains_key(*name) {
            return Err(DocError::UndocumentedParam((*name).to_string()));
        }
    }
    for name in params.keys() {
        if !declared.contains(&name.as_str()) {
            return Err(DocError::UndeclaredParam(name.clone()));
        }
    }

    Ok(ParsedDoc {
        summary: summary.trim().to_string(),
        params,
        ret: ReturnDoc {
            type_name: ret_type.trim().to_string(),
            description: ret_desc.trim().to_string(),
        },
    })
}

/// Splits one `name type: description` line.
fn parse_param_line(line: &str) -> Result<(String, ParamDoc), DocError> {
    let (head, desc) = line
        .split_once(':')
        .ok_or_else(|| DocError::MalformedParam(line.to_string()))?;

    let mut tokens = head.split_whitespace();
    let (name, type_name) = match (tokens.next(), tokens.next(), tokens.next()) {
        (Some(name), Some(ty), None) => (name, ty),
        _ => return Err(DocError::MalformedParam(line.to_string())),
    };
    let type_name = type_name.trim_matches(|c| c == '(' || c == ')');
    if type_name.is_empty() {
        return Err(DocError::MalformedParam(line.to_string()));
    }

    Ok((
        name.to_string(),
        ParamDoc {
            type_name: type_name.to_string(),
            description: desc.trim().to_string(),
        },
    ))
}
