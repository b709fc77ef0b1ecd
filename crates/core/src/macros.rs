//! Macro and `#eval` preprocessing.
//!
//! A single pass over the normalized lines that extracts `name value;`
//! definitions and `name #eval{ expression };` evaluated macros, removing
//! those lines from the stream the structural parser will see. The result
//! is the remaining lines plus a symbol table consulted on demand whenever
//! the parser meets a `$name` token.

use std::collections::BTreeMap;

use crate::error::Diagnostic;
use crate::expr;
use crate::source::SourceLine;

/// Section keywords that can never define a macro.
const RESERVED: [&str; 7] = [
    "type", "faces", "blocks", "vertices", "edges", "boundary", "scale",
];

/// A stored macro value.
#[derive(Debug, Clone, PartialEq)]
pub enum MacroValue {
    Number(f64),
    Text(String),
    /// A failed `#eval`; resolves to a failure wherever it is referenced.
    Invalid,
}

/// Symbol table built by [`preprocess`]. Later definitions win.
#[derive(Debug, Default)]
pub struct MacroTable {
    values: BTreeMap<String, MacroValue>,
}

impl MacroTable {
    pub fn get(&self, name: &str) -> Option<&MacroValue> {
        self.values.get(name)
    }

    pub fn insert(&mut self, name: impl Into<String>, value: MacroValue) {
        self.values.insert(name.into(), value);
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    fn names(&self) -> impl Iterator<Item = &String> {
        self.values.keys()
    }

    /// Resolve a parser token to a finite number.
    ///
    /// `$name` tokens go through the table; anything else must be a float
    /// literal. Failures append a diagnostic (for reference errors) and
    /// return `None` -- never a substitute value.
    pub fn resolve_number(
        &self,
        token: &str,
        line: u32,
        diagnostics: &mut Vec<Diagnostic>,
    ) -> Option<f64> {
        if let Some(name) = token.strip_prefix('$') {
            return match self.values.get(name) {
                None => {
                    diagnostics.push(Diagnostic::parse(
                        line,
                        format!("undefined macro '{}'", token),
                    ));
                    None
                }
                Some(MacroValue::Invalid) => {
                    diagnostics.push(Diagnostic::parse(
                        line,
                        format!("macro '{}' has an invalid value", token),
                    ));
                    None
                }
                Some(MacroValue::Number(n)) => Some(*n),
                Some(MacroValue::Text(s)) => s.trim().parse().ok().filter(|v: &f64| v.is_finite()),
            };
        }
        token.parse().ok().filter(|v: &f64| v.is_finite())
    }
}

/// Extract macro and `#eval` lines, returning the remaining lines and the
/// finished symbol table. Evaluation failures are recorded and the macro
/// is stored as [`MacroValue::Invalid`].
pub fn preprocess(
    lines: Vec<SourceLine>,
    diagnostics: &mut Vec<Diagnostic>,
) -> (Vec<SourceLine>, MacroTable) {
    let mut table = MacroTable::default();
    let mut kept = Vec::with_capacity(lines.len());

    for line in lines {
        if let Some((name, body)) = match_eval(&line.text) {
            match substitute(&body, &table).and_then(|expanded| {
                expr::evaluate(&expanded).map_err(|e| e.to_string())
            }) {
                Ok(value) => table.insert(name, MacroValue::Number(value)),
                Err(message) => {
                    diagnostics.push(Diagnostic::preprocess(
                        line.number,
                        format!("failed to evaluate #eval for '{}': {}", name, message),
                    ));
                    table.insert(name, MacroValue::Invalid);
                }
            }
            continue;
        }
        if let Some((name, value)) = match_macro(&line.text) {
            let stored = match value.parse::<f64>() {
                Ok(n) if n.is_finite() => MacroValue::Number(n),
                _ => MacroValue::Text(value),
            };
            table.insert(name, stored);
            continue;
        }
        kept.push(line);
    }

    (kept, table)
}

/// Match `name #eval{ expression };`, returning the name and the trimmed
/// expression body.
fn match_eval(text: &str) -> Option<(String, String)> {
    let (name, rest) = take_identifier(text)?;
    if !rest.starts_with(char::is_whitespace) {
        return None;
    }
    let rest = rest.trim_start().strip_prefix("#eval")?.trim_start();
    let body = rest.strip_prefix('{')?.strip_suffix("};")?;
    Some((name, body.trim().to_string()))
}

/// Match `name value;` where `name` is not a reserved section keyword.
fn match_macro(text: &str) -> Option<(String, String)> {
    let (name, rest) = take_identifier(text)?;
    if RESERVED.contains(&name.as_str()) {
        return None;
    }
    if !rest.starts_with(char::is_whitespace) {
        return None;
    }
    let value = rest.trim().strip_suffix(';')?;
    Some((name, value.trim_end().to_string()))
}

/// Leading `[A-Za-z_][A-Za-z0-9_]*` identifier and the remainder.
fn take_identifier(text: &str) -> Option<(String, &str)> {
    let mut chars = text.char_indices();
    match chars.next() {
        Some((_, c)) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return None,
    }
    let end = text
        .char_indices()
        .find(|(_, c)| !(c.is_ascii_alphanumeric() || *c == '_'))
        .map(|(i, _)| i)
        .unwrap_or(text.len());
    Some((text[..end].to_string(), &text[end..]))
}

/// Replace every known `$name` in the expression with the macro's value,
/// longest names first so overlapping names resolve deterministically.
fn substitute(expression: &str, table: &MacroTable) -> Result<String, String> {
    let mut names: Vec<&String> = table.names().collect();
    names.sort_by(|a, b| b.len().cmp(&a.len()).then(a.cmp(b)));

    let mut out = expression.to_string();
    for name in names {
        let needle = format!("${}", name);
        if !out.contains(&needle) {
            continue;
        }
        let replacement = match table.get(name) {
            Some(MacroValue::Number(n)) => n.to_string(),
            Some(MacroValue::Text(s)) => s.clone(),
            Some(MacroValue::Invalid) => {
                return Err(format!("macro '${}' has an invalid value", name))
            }
            None => continue,
        };
        out = out.replace(&needle, &replacement);
    }
    Ok(out)
}
