//! Program text: instructions plus register declarations.
//!
//! # Syntax
//!
//! ```text
//! .int   acc 10          # declare an int register (value optional, default 0)
//! .float volts 4.5       # declare a float register
//! SUB acc, 3, 2          # OPCODE operand, operand, ...
//! HALT
//! ```
//!
//! - `#` starts a comment
//! - Commas between operands are optional
//! - Opcodes are matched exactly (case-sensitive) when dispatched
//! - Lines starting with `.` are directives

use crate::machine::errors::MachineError;
use crate::machine::registers::{NumericKind, Value};
use std::fmt;
use std::fmt::Write;

const COMMENT_CHAR: char = '#';
const DIRECTIVE_PREFIX: char = '.';

/// One decoded instruction: an opcode plus its ordered operand tokens.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Instruction {
    pub opcode: String,
    pub operands: Vec<String>,
    /// 1-based source line, if parsed from text.
    pub line: Option<usize>,
}

impl Instruction {
    /// Builds an instruction directly from tokens.
    pub fn new<I, S>(opcode: &str, operands: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            opcode: opcode.to_string(),
            operands: operands.into_iter().map(Into::into).collect(),
            line: None,
        }
    }

    /// Parses a single instruction line. Returns `Ok(None)` for blank or
    /// comment-only lines.
    pub fn parse_line(line_no: usize, line: &str) -> Result<Option<Self>, MachineError> {
        let tokens = tokenize(line);
        let Some((opcode, operands)) = tokens.split_first() else {
            return Ok(None);
        };
        if opcode.starts_with(DIRECTIVE_PREFIX) {
            return Err(MachineError::ParseError {
                line: line_no,
                message: format!("directive `{opcode}` where an instruction was expected"),
            });
        }
        Ok(Some(Self {
            opcode: opcode.to_string(),
            operands: operands.iter().map(|t| t.to_string()).collect(),
            line: Some(line_no),
        }))
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.opcode)?;
        for (i, operand) in self.operands.iter().enumerate() {
            let sep = if i == 0 { " " } else { ", " };
            write!(f, "{sep}{operand}")?;
        }
        Ok(())
    }
}

/// A register declared by a `.int` / `.float` directive.
#[derive(Clone, Debug, PartialEq)]
pub struct Declaration {
    pub name: String,
    pub initial: Value,
    pub line: usize,
}

/// Ordered instruction list together with the registers it declares.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Program {
    pub declarations: Vec<Declaration>,
    pub instructions: Vec<Instruction>,
}

impl Program {
    /// Wraps already-decoded instructions.
    pub fn from_instructions(instructions: Vec<Instruction>) -> Self {
        Self {
            declarations: Vec::new(),
            instructions,
        }
    }

    /// Parses program text.
    pub fn parse(source: &str) -> Result<Self, MachineError> {
        let mut program = Program::default();

        for (idx, line) in source.lines().enumerate() {
            let line_no = idx + 1;
            let tokens = tokenize(line);
            let Some(first) = tokens.first() else {
                continue;
            };

            if let Some(directive) = first.strip_prefix(DIRECTIVE_PREFIX) {
                program
                    .declarations
                    .push(parse_declaration(line_no, directive, &tokens[1..])?);
            } else if let Some(instr) = Instruction::parse_line(line_no, line)? {
                program.instructions.push(instr);
            }
        }

        Ok(program)
    }

    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Instruction> {
        self.instructions.get(index)
    }
}

/// Splits a line into tokens on whitespace and commas, dropping comments.
fn tokenize(line: &str) -> Vec<&str> {
    let code = line.split(COMMENT_CHAR).next().unwrap_or("");
    code.split(|c: char| c.is_whitespace() || c == ',')
        .filter(|t| !t.is_empty())
        .collect()
}

fn parse_declaration(
    line_no: usize,
    directive: &str,
    args: &[&str],
) -> Result<Declaration, MachineError> {
    let kind = match directive {
        "int" => NumericKind::Int,
        "float" => NumericKind::Float,
        other => {
            return Err(MachineError::ParseError {
                line: line_no,
                message: format!("unknown directive `.{other}`"),
            });
        }
    };

    let (name, initial) = match args {
        [name] => (*name, Value::zero(kind)),
        [name, value] => {
            let initial = Value::parse(kind, value).map_err(|e| MachineError::ParseError {
                line: line_no,
                message: e.to_string(),
            })?;
            (*name, initial)
        }
        _ => {
            return Err(MachineError::ParseError {
                line: line_no,
                message: format!(".{directive} expects NAME [VALUE], got {} tokens", args.len()),
            });
        }
    };

    Ok(Declaration {
        name: name.to_string(),
        initial,
        line: line_no,
    })
}

/// Formats a compiler-style diagnostic pointing at the offending line.
pub fn render_diagnostic(file: &str, source: &str, err: &MachineError) -> String {
    let mut diag = String::new();
    let MachineError::ParseError { line, message } = err else {
        let _ = writeln!(diag, "error: {err}");
        return diag;
    };

    let _ = writeln!(diag, "error: {message}");
    let _ = writeln!(diag, " --> {file}:{line}");
    if let Some(raw_line) = source.lines().nth(line.saturating_sub(1)) {
        let text = raw_line.trim_end_matches('\r');
        let indent = text.len() - text.trim_start().len();
        let width = text.trim().len().max(1);
        let _ = writeln!(diag, "  |");
        let _ = writeln!(diag, "{:>4} | {}", line, text);
        let _ = writeln!(diag, "  | {}{}", " ".repeat(indent), "^".repeat(width));
    }
    diag
}
