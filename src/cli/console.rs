//! Line-based operator console.
//!
//! Wraps any `BufRead`/`Write` pair so interactive sessions can be scripted
//! in tests. End of input is reported as `None`, never as an error.

use std::io::{self, BufRead, Write};

use crate::cli::output;
use crate::domain::{DomainError, DomainResult, NodeSource, Scalar, Side};

pub struct Console<'a> {
    input: &'a mut dyn BufRead,
    output: &'a mut dyn Write,
}

impl<'a> Console<'a> {
    pub fn new(input: &'a mut dyn BufRead, output: &'a mut dyn Write) -> Self {
        Self { input, output }
    }

    pub fn out(&mut self) -> &mut dyn Write {
        &mut *self.output
    }

    /// Prompt and read one trimmed line, `None` at end of input.
    pub fn ask(&mut self, question: &str) -> io::Result<Option<String>> {
        output::prompt(&mut *self.output, question)?;
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            writeln!(self.output)?;
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    /// Yes/no question; anything but `y`/`yes` (or end of input) is no.
    pub fn confirm(&mut self, question: &str) -> io::Result<bool> {
        Ok(self
            .ask(question)?
            .map(|answer| matches!(answer.to_lowercase().as_str(), "y" | "yes"))
            .unwrap_or(false))
    }
}

/// Operator-driven node source: one integer per node and a yes/no decision
/// per child, bounded by `limit` nodes.
pub struct InteractiveSource<'c, 'a> {
    console: &'c mut Console<'a>,
    limit: usize,
}

impl<'c, 'a> InteractiveSource<'c, 'a> {
    pub fn new(console: &'c mut Console<'a>, limit: usize) -> Self {
        Self { console, limit }
    }
}

fn closed(e: io::Error) -> DomainError {
    DomainError::InputClosed(e.to_string())
}

impl NodeSource for InteractiveSource<'_, '_> {
    fn next_value(&mut self, ordinal: usize) -> DomainResult<Option<Scalar>> {
        let answer = self
            .console
            .ask(&format!("Value for node {}:", ordinal))
            .map_err(closed)?;
        match answer {
            Some(line) => Scalar::parse_int(&line).map(Some),
            None => Err(DomainError::InputClosed(format!(
                "no value entered for node {}",
                ordinal
            ))),
        }
    }

    fn wants_child(&mut self, ordinal: usize, side: Side) -> DomainResult<bool> {
        self.console
            .confirm(&format!("Create {} child for node {}? (y/n):", side, ordinal))
            .map_err(closed)
    }

    fn node_limit(&self) -> Option<usize> {
        Some(self.limit)
    }
}

/// Collect up to `count` numbers, re-prompting on invalid input.
///
/// Stops early at end of input; the caller builds a truncated tree from
/// whatever was collected.
pub fn collect_flat_values(console: &mut Console<'_>, count: usize) -> io::Result<Vec<Scalar>> {
    let mut values = Vec::with_capacity(count);
    while values.len() < count {
        let question = format!("Value {}/{}:", values.len() + 1, count);
        let Some(line) = console.ask(&question)? else {
            break;
        };
        match Scalar::parse_float(&line) {
            Ok(value) => values.push(value),
            Err(e) => output::warning(console.out(), &e)?,
        }
    }
    Ok(values)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::TreeBuilder;
    use std::io::Cursor;

    #[test]
    fn given_invalid_entries_when_collecting_then_reprompts_until_valid() {
        let mut input = Cursor::new("1\nabc\n2.5\n\n3\n");
        let mut output = Vec::new();
        let mut console = Console::new(&mut input, &mut output);

        let values = collect_flat_values(&mut console, 3).unwrap();

        assert_eq!(
            values,
            vec![Scalar::Float(1.0), Scalar::Float(2.5), Scalar::Float(3.0)]
        );
        let transcript = String::from_utf8(output).unwrap();
        assert!(transcript.contains("invalid value 'abc'"));
    }

    #[test]
    fn given_early_end_of_input_when_collecting_then_returns_partial() {
        let mut input = Cursor::new("4\n5\n");
        let mut output = Vec::new();
        let mut console = Console::new(&mut input, &mut output);

        let values = collect_flat_values(&mut console, 5).unwrap();

        assert_eq!(values.len(), 2);
    }

    #[test]
    fn given_answers_when_building_interactively_then_follows_choices() {
        // root=1: left yes, right no; node 2: left yes; node 3 is last
        let mut input = Cursor::new("1\ny\nn\n2\nY\n3\n");
        let mut output = Vec::new();
        let mut console = Console::new(&mut input, &mut output);
        let mut source = InteractiveSource::new(&mut console, 10);

        let tree = TreeBuilder::new(3).build(&mut source).unwrap();

        assert_eq!(tree.len(), 3);
        assert_eq!(tree.depth(), 3);
        assert_eq!(
            tree.values(),
            vec![Scalar::Int(1), Scalar::Int(2), Scalar::Int(3)]
        );
    }

    #[test]
    fn given_non_integer_when_building_interactively_then_aborts() {
        let mut input = Cursor::new("1.5\n");
        let mut output = Vec::new();
        let mut console = Console::new(&mut input, &mut output);
        let mut source = InteractiveSource::new(&mut console, 10);

        let result = TreeBuilder::new(2).build(&mut source);

        assert!(matches!(result, Err(DomainError::InvalidValue { .. })));
    }
}
