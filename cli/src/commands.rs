//! Line protocol for driving the form from a terminal
//!
//! One command per line:
//!
//! ```text
//! unit imperial
//! input height_feet 5
//! input height_inches 10
//! blur weight_stone
//! show
//! flush
//! quit
//! ```
//!
//! Blank lines and lines starting with `#` are ignored.

use bmi_calculator_shared::{parse_field, parse_unit_system, Field, UnitSystem};

use crate::error::CliError;

/// A parsed command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Unit(UnitSystem),
    Input { field: Field, text: String },
    Blur(Field),
    Show,
    Flush,
    Quit,
}

/// Split off the first whitespace-delimited word
fn split_word(s: &str) -> (&str, &str) {
    let s = s.trim_start();
    match s.find(char::is_whitespace) {
        Some(i) => (&s[..i], &s[i..]),
        None => (s, ""),
    }
}

impl Command {
    /// Parse one line. Returns `Ok(None)` for blank lines and comments.
    pub fn parse(line: &str) -> Result<Option<Command>, CliError> {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            return Ok(None);
        }

        let (verb, rest) = split_word(line);
        let command = match verb.to_lowercase().as_str() {
            "unit" => {
                let (name, extra) = split_word(rest);
                if name.is_empty() || !extra.trim().is_empty() {
                    return Err(CliError::Usage("unit <metric|imperial>"));
                }
                Command::Unit(parse_unit_system(name)?)
            }
            "input" => {
                let (name, text) = split_word(rest);
                if name.is_empty() {
                    return Err(CliError::Usage("input <field> [text]"));
                }
                Command::Input {
                    field: parse_field(name)?,
                    text: text.trim().to_string(),
                }
            }
            "blur" => {
                let (name, extra) = split_word(rest);
                if name.is_empty() || !extra.trim().is_empty() {
                    return Err(CliError::Usage("blur <field>"));
                }
                Command::Blur(parse_field(name)?)
            }
            "show" => Command::Show,
            "flush" => Command::Flush,
            "quit" | "exit" => Command::Quit,
            _ => return Err(CliError::UnknownCommand(verb.to_string())),
        };
        Ok(Some(command))
    }
}
