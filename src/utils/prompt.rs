//! Line-oriented console prompts
//!
//! Generic over reader and writer so the prompt logic can be driven from
//! tests with in-memory buffers.

use std::io::{self, BufRead, Write};

/// Ask for a value, showing `current` as the default
///
/// An empty answer keeps `current`. End of input also keeps it.
pub fn prompt_with_default<R: BufRead, W: Write>(
    reader: &mut R,
    writer: &mut W,
    label: &str,
    current: &str,
) -> io::Result<String> {
    if current.is_empty() {
        write!(writer, "{label}: ")?;
    } else {
        write!(writer, "{label} [{current}]: ")?;
    }
    writer.flush()?;

    let mut line = String::new();
    if reader.read_line(&mut line)? == 0 {
        return Ok(current.to_string());
    }
    let answer = line.trim_end_matches(['\r', '\n']).trim();
    if answer.is_empty() {
        Ok(current.to_string())
    } else {
        Ok(answer.to_string())
    }
}

/// Ask a yes/no question; anything but `y`/`yes` is no
pub fn confirm<R: BufRead, W: Write>(reader: &mut R, writer: &mut W, question: &str) -> io::Result<bool> {
    write!(writer, "{question} [y/N]: ")?;
    writer.flush()?;
    let mut line = String::new();
    reader.read_line(&mut line)?;
    Ok(matches!(line.trim().to_ascii_lowercase().as_str(), "y" | "yes"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn ask(input: &str, current: &str) -> (String, String) {
        let mut reader = Cursor::new(input.as_bytes().to_vec());
        let mut writer = Vec::new();
        let answer = prompt_with_default(&mut reader, &mut writer, "Name", current).unwrap();
        (answer, String::from_utf8(writer).unwrap())
    }

    #[test]
    fn test_empty_answer_keeps_current() {
        let (answer, shown) = ask("\r\n", "Foo");
        assert_eq!(answer, "Foo");
        assert_eq!(shown, "Name [Foo]: ");
    }

    #[test]
    fn test_answer_replaces_current() {
        let (answer, _) = ask("  Bar \n", "Foo");
        assert_eq!(answer, "Bar");
    }

    #[test]
    fn test_eof_keeps_current_and_blank_default_is_hidden() {
        let (answer, shown) = ask("", "");
        assert_eq!(answer, "");
        assert_eq!(shown, "Name: ");
    }

    #[test]
    fn test_confirm() {
        let mut writer = Vec::new();
        assert!(confirm(&mut Cursor::new(b"Yes\n".to_vec()), &mut writer, "Go?").unwrap());
        assert!(!confirm(&mut Cursor::new(b"\n".to_vec()), &mut writer, "Go?").unwrap());
    }
}
