//! The interactive read loop.

use crate::parser::parse_line;
use layerkv_core::{execute, Response, Store};
use std::io::{self, BufRead, Write};
use tracing::debug;

/// A read-eval-print loop over one store.
///
/// Results go to `output`, error messages to `errors`. The loop ends on
/// `QUIT` or at end of input; transactions still open at that point are
/// abandoned, never committed.
pub struct Repl<R, W, E> {
    store: Store,
    input: R,
    output: W,
    errors: E,
    prompt: Option<String>,
}

impl<R: BufRead, W: Write, E: Write> Repl<R, W, E> {
    /// Creates a loop without a prompt.
    pub fn new(store: Store, input: R, output: W, errors: E) -> Self {
        Self {
            store,
            input,
            output,
            errors,
            prompt: None,
        }
    }

    /// Sets the prompt printed before each line is read.
    #[must_use]
    pub fn with_prompt(mut self, prompt: Option<String>) -> Self {
        self.prompt = prompt;
        self
    }

    /// Returns the store the loop operates on.
    pub fn store(&self) -> &Store {
        &self.store
    }

    /// Runs until `QUIT` or end of input.
    ///
    /// Returns the number of transactions that were abandoned.
    ///
    /// # Errors
    ///
    /// Returns an error if reading input or writing output fails. Errors from
    /// the store are reported on `errors` and do not stop the loop.
    pub fn run(&mut self) -> io::Result<usize> {
        let mut line = String::new();
        loop {
            if let Some(prompt) = &self.prompt {
                write!(self.output, "{prompt}")?;
                self.output.flush()?;
            }

            line.clear();
            if self.input.read_line(&mut line)? == 0 {
                debug!("end of input");
                break;
            }

            let Some(instruction) = parse_line(&line) else {
                continue;
            };

            match execute(&self.store, &instruction) {
                Ok(Response::Quit { .. }) => break,
                Ok(response) => writeln!(self.output, "{response}")?,
                Err(err) => {
                    debug!(command = %instruction.command, error = %err, "instruction failed");
                    writeln!(self.errors, "{err}")?;
                }
            }
        }

        let abandoned = self.store.active_transactions();
        if abandoned > 0 {
            writeln!(self.output, "{}", Response::Quit { abandoned })?;
        }
        self.output.flush()?;
        Ok(abandoned)
    }
}
