//! Rendering of reflected enums as C name tables or JSON.

use crate::config::EmitConfig;
use crate::declaration::EnumDeclaration;
use crate::error::Result;
use crate::flags::FlagChain;
use serde::Serialize;
use std::io::{self, Write};

/// One row of a generated table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableEntry {
    /// Enumerator exactly as written in the source; used as the array index.
    pub token: String,
    /// Name after the annotation's flags were applied.
    pub display: String,
}

/// An enum together with its transformed names, ready to be written out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReflectedEnum {
    pub name: String,
    pub underlying: Option<String>,
    #[serde(skip)]
    pub declaration: String,
    pub entries: Vec<TableEntry>,
}

impl ReflectedEnum {
    pub fn new(decl: &EnumDeclaration<'_>, flags: &FlagChain) -> Self {
        let entries = decl
            .enumerators
            .iter()
            .map(|token| TableEntry {
                token: token.clone(),
                display: flags.apply(token),
            })
            .collect();

        Self {
            name: decl.name.to_string(),
            underlying: decl.underlying.map(str::to_string),
            declaration: decl.text.to_string(),
            entries,
        }
    }
}

/// Writes the declaration followed by its name table:
///
/// ```text
/// typedef enum { A, B } Letter;
/// const char * Letter_str[] = {
///   [A] = "a",
///   [B] = "b",
/// };
///
/// ```
pub fn write_c_table<W: Write>(
    out: &mut W,
    reflected: &ReflectedEnum,
    emit: &EmitConfig,
) -> io::Result<()> {
    writeln!(out, "{};", reflected.declaration)?;
    writeln!(
        out,
        "{} {}{}[] = {{",
        emit.table_type.trim(),
        reflected.name,
        emit.table_suffix
    )?;
    for entry in &reflected.entries {
        writeln!(
            out,
            "  [{}] = \"{}\",",
            entry.token,
            escape_c_string(&entry.display)
        )?;
    }
    writeln!(out, "}};")?;
    writeln!(out)
}

pub fn render_json(enums: &[ReflectedEnum]) -> Result<String> {
    let mut json = serde_json::to_string_pretty(enums)?;
    json.push('\n');
    Ok(json)
}

/// Escapes text for use between double quotes in a C string literal.
pub fn escape_c_string(s: &str) -> String {
    let mut escaped = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '"' => escaped.push_str("\\\""),
            '\\' => escaped.push_str("\\\\"),
            '\n' => escaped.push_str("\\n"),
            '\t' => escaped.push_str("\\t"),
            '\r' => escaped.push_str("\\r"),
            c if c.is_control() => escaped.push_str(&format!("\\{:03o}", c as u32)),
            c => escaped.push(c),
        }
    }
    escaped
}
