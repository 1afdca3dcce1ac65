//! Line parser for the interactive shell.

use layerkv_core::Instruction;

/// Parses one line of input into an instruction.
///
/// Returns `None` for a blank line. The line is split into at most three
/// parts: the command name (upper-cased), the key, and the remainder of the
/// line verbatim, so values may contain whitespace. Runs of spaces before
/// the command and before the key are skipped, so a key is never empty.
pub fn parse_line(line: &str) -> Option<Instruction> {
    let line = line
        .trim_end_matches(&['\r', '\n'][..])
        .trim_start_matches(' ');
    if line.trim().is_empty() {
        return None;
    }

    let (command, rest) = match line.split_once(' ') {
        Some((command, rest)) => (command, rest.trim_start_matches(' ')),
        None => (line, ""),
    };
    let command = command.to_ascii_uppercase();
    if rest.is_empty() {
        return Some(Instruction::new(command, Vec::<&str>::new()));
    }
    Some(Instruction::new(command, rest.splitn(2, ' ')))
}
