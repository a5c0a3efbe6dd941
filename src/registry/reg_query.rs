//! Command-line registry fallback
//!
//! Runs `reg.exe query` and reads its tabular output. Used for `HKU`
//! subtrees that the structured API cannot see, or on request for all
//! paths. The child process is run synchronously.
//!
//! `reg.exe` prints one value per line, columns separated by runs of
//! spaces:
//!
//! ```text
//! HKEY_LOCAL_MACHINE\SOFTWARE\...\Uninstall\Foo_1
//!     DisplayVersion    REG_SZ    2.1
//! ```

use crate::error::{Result, ShelfError};
use crate::registry::path::RegistryPath;
use crate::registry::probe::RegistryBackend;
use regex::Regex;
use std::path::PathBuf;
use std::process::Command;
use std::sync::LazyLock;
use tracing::debug;

/// Two or more spaces (or tabs) separate the name, type and data columns
static COLUMN_SEPARATOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[ \t]{2,}|\t").expect("column separator pattern is valid"));

/// Registry backend that shells out to `reg.exe`
#[derive(Debug, Clone)]
pub struct RegQueryBackend {
    program: PathBuf,
}

impl Default for RegQueryBackend {
    /// `%SystemRoot%\System32\reg.exe`, or `reg.exe` from `PATH`
    fn default() -> Self {
        let program = std::env::var("SystemRoot")
            .map(|root| PathBuf::from(root).join("System32").join("reg.exe"))
            .ok()
            .filter(|path| path.exists())
            .unwrap_or_else(|| PathBuf::from("reg.exe"));
        Self { program }
    }
}

impl RegQueryBackend {
    /// Use a specific `reg.exe`-compatible program
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// Run a query; `None` when the tool reports the key or value missing
    fn run(&self, args: &[&str]) -> Result<Option<String>> {
        let mut command = Command::new(&self.program);
        command.args(args);

        #[cfg(windows)]
        {
            use std::os::windows::process::CommandExt;
            const CREATE_NO_WINDOW: u32 = 0x0800_0000;
            command.creation_flags(CREATE_NO_WINDOW);
        }

        let output = command
            .output()
            .map_err(|e| ShelfError::RegistryError(Box::new(e)))?;
        if !output.status.success() {
            debug!(
                "{} {:?} exited with {}",
                self.program.display(),
                args,
                output.status
            );
            return Ok(None);
        }
        Ok(Some(String::from_utf8_lossy(&output.stdout).into_owned()))
    }
}

impl RegistryBackend for RegQueryBackend {
    fn key_exists(&self, key: &RegistryPath) -> Result<bool> {
        let key = key.reg_exe_form();
        Ok(self.run(&["query", &key])?.is_some())
    }

    fn read_value(&self, key: &RegistryPath, name: &str) -> Result<Option<String>> {
        let key = key.reg_exe_form();
        let output = if name.is_empty() {
            self.run(&["query", &key, "/ve"])?
        } else {
            self.run(&["query", &key, "/v", name])?
        };
        Ok(output.and_then(|text| parse_query_value(&text, name)))
    }
}

/// Extract a value's data from `reg.exe query` output
///
/// An empty `name` picks the default value, whose name column is localized
/// (e.g. `(Default)`), so the first value line is taken.
pub fn parse_query_value(output: &str, name: &str) -> Option<String> {
    output
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.to_ascii_uppercase().starts_with("HKEY_"))
        .find_map(|line| {
            let mut columns = COLUMN_SEPARATOR.splitn(line, 3);
            let value_name = columns.next()?;
            let value_type = columns.next()?;
            if !value_type.starts_with("REG_") {
                return None;
            }
            let matches = if name.is_empty() {
                value_name.starts_with('(')
            } else {
                value_name.eq_ignore_ascii_case(name)
            };
            matches.then(|| columns.next().unwrap_or("").to_string())
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    const OUTPUT: &str = "\r\n\
        HKEY_LOCAL_MACHINE\\SOFTWARE\\WOW6432Node\\Microsoft\\Windows\\CurrentVersion\\Uninstall\\Foo_1\r\n\
        \x20   DisplayName    REG_SZ    Foo  Portable Edition\r\n\
        \x20   DisplayVersion    REG_SZ    2.1\r\n\
        \x20   EstimatedSize    REG_DWORD    0x1f4\r\n\
        \x20   Comments    REG_SZ\r\n\
        \r\n";

    #[test]
    fn test_parse_named_values() {
        assert_eq!(
            parse_query_value(OUTPUT, "DisplayVersion"),
            Some("2.1".to_string())
        );
        assert_eq!(
            parse_query_value(OUTPUT, "displayname"),
            Some("Foo  Portable Edition".to_string())
        );
        assert_eq!(
            parse_query_value(OUTPUT, "EstimatedSize"),
            Some("0x1f4".to_string())
        );
    }

    #[test]
    fn test_parse_empty_and_missing_values() {
        assert_eq!(parse_query_value(OUTPUT, "Comments"), Some(String::new()));
        assert_eq!(parse_query_value(OUTPUT, "Publisher"), None);
        assert_eq!(parse_query_value("", "DisplayVersion"), None);
    }

    #[test]
    fn test_parse_default_value() {
        let output = "HKEY_CURRENT_USER\\Software\\Foo\r\n    (Default)    REG_SZ    D:\\Foo\r\n";
        assert_eq!(parse_query_value(output, ""), Some("D:\\Foo".to_string()));
    }

    #[test]
    fn test_missing_program_is_an_error() {
        let backend = RegQueryBackend::new("definitely-not-a-real-reg-tool-7f3a");
        let key = RegistryPath::parse("HKU\\S-1-5-18").unwrap();
        assert!(backend.key_exists(&key).is_err());
    }
}
