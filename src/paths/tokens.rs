//! Conversion between absolute paths and relocatable token paths

/// Placeholder for the portable app's current root folder
pub const APP_PATH_TOKEN: &str = "[.app_path]";

/// Environment-style token for the Windows directory
pub const SYSTEM_ROOT_TOKEN: &str = "%SystemRoot%";

/// Environment-style token for the command interpreter
pub const COMSPEC_TOKEN: &str = "%ComSpec%";

/// Environment values the environment-style tokens stand for
///
/// Resolved from the process environment by [`TokenContext::from_env`];
/// tests build it directly so results do not depend on the host.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TokenContext {
    /// Windows directory, usually `C:\Windows`
    pub system_root: Option<String>,
    /// Command interpreter, usually `C:\Windows\system32\cmd.exe`
    pub com_spec: Option<String>,
}

impl TokenContext {
    /// Read `%SystemRoot%` (or `%windir%`) and `%ComSpec%` from the environment
    pub fn from_env() -> Self {
        let non_empty = |name: &str| std::env::var(name).ok().filter(|v| !v.trim().is_empty());
        Self {
            system_root: non_empty("SystemRoot").or_else(|| non_empty("windir")),
            com_spec: non_empty("ComSpec"),
        }
    }
}

/// Where a path is anchored, as seen by Windows
enum Anchor<'a> {
    Drive(&'a str),
    Unc,
    Rooted,
    Relative,
}

/// Normalize a Windows path lexically
///
/// Surrounding whitespace and one pair of wrapping quotes are removed, `/`
/// becomes `\`, repeated separators collapse, `.` and `..` are folded and the
/// trailing separator is dropped (except for a bare drive root like `C:\`).
pub fn normalize_path(input: &str) -> String {
    let trimmed = strip_quotes(input.trim());
    if trimmed.is_empty() {
        return String::new();
    }

    let unified = trimmed.replace('/', "\\");
    let (anchor, rest) = if let Some(rest) = unified.strip_prefix("\\\\") {
        (Anchor::Unc, rest)
    } else if has_drive_prefix(&unified) {
        (Anchor::Drive(&unified[..2]), &unified[2..])
    } else if let Some(rest) = unified.strip_prefix('\\') {
        (Anchor::Rooted, rest)
    } else {
        (Anchor::Relative, unified.as_str())
    };

    // Server and share of a UNC path can't be climbed out of
    let floor = if matches!(anchor, Anchor::Unc) { 2 } else { 0 };
    let mut parts: Vec<&str> = Vec::new();
    for part in rest.split('\\') {
        match part {
            "" | "." => {}
            ".." => {
                if parts.len() > floor && parts.last() != Some(&"..") {
                    parts.pop();
                } else if matches!(anchor, Anchor::Relative) {
                    parts.push("..");
                }
            }
            _ => parts.push(part),
        }
    }

    let joined = parts.join("\\");
    match anchor {
        Anchor::Drive(drive) => format!("{drive}\\{joined}"),
        Anchor::Unc => format!("\\\\{joined}"),
        Anchor::Rooted => format!("\\{joined}"),
        Anchor::Relative if joined.is_empty() => ".".to_string(),
        Anchor::Relative => joined,
    }
}

/// Replace the app root, Windows directory or command interpreter in
/// `absolute_path` with its token
///
/// Checked in that order; a path matching none of them is returned
/// normalized. Empty input yields an empty string.
pub fn tokenize(absolute_path: &str, app_root: &str, ctx: &TokenContext) -> String {
    if absolute_path.trim().is_empty() {
        return String::new();
    }
    let normalized = normalize_path(absolute_path);

    if let Some(rest) = relative_to(&normalized, app_root) {
        return format!("{APP_PATH_TOKEN}{rest}");
    }

    if let Some(system_root) = ctx.system_root.as_deref()
        && let Some(rest) = relative_to(&normalized, system_root)
    {
        return format!("{SYSTEM_ROOT_TOKEN}{rest}");
    }

    if let Some(com_spec) = ctx.com_spec.as_deref()
        && !com_spec.trim().is_empty()
        && eq_ignore_case(&normalized, &normalize_path(com_spec))
    {
        return COMSPEC_TOKEN.to_string();
    }

    normalized
}

/// Resolve a token path against the app's current root folder
///
/// Environment-style tokens are expanded from `ctx`; a token whose value is
/// unknown is left in place for the shell to expand.
pub fn detokenize(token: &str, app_root: &str, ctx: &TokenContext) -> String {
    let trimmed = token.trim();
    if trimmed.is_empty() {
        return String::new();
    }

    let substitutions = [
        (APP_PATH_TOKEN, Some(app_root)),
        (SYSTEM_ROOT_TOKEN, ctx.system_root.as_deref()),
        (COMSPEC_TOKEN, ctx.com_spec.as_deref()),
    ];

    for (name, value) in substitutions {
        let Some(value) = value.filter(|v| !v.trim().is_empty()) else {
            continue;
        };
        if let Some(rest) = strip_prefix_ignore_case(trimmed, name) {
            let base = normalize_path(value);
            let base = base.trim_end_matches('\\');
            let joined = if rest.is_empty() || rest.starts_with(['\\', '/']) {
                format!("{base}{rest}")
            } else {
                format!("{base}\\{rest}")
            };
            return normalize_path(&joined);
        }
    }

    normalize_path(trimmed)
}

/// Replace every occurrence of the app root inside a free-form argument
/// string with [`APP_PATH_TOKEN`]
///
/// An occurrence only counts when it ends at a path boundary, so
/// `D:\Apps\Foo` is not replaced inside `D:\Apps\FooBar`.
pub fn tokenize_arguments(arguments: &str, app_root: &str) -> String {
    let root = normalize_path(app_root);
    let root = root.trim_end_matches('\\');
    if root.is_empty() || arguments.is_empty() {
        return arguments.to_string();
    }

    let mut out = String::with_capacity(arguments.len());
    let mut rest = arguments;
    while !rest.is_empty() {
        if let Some(after) = strip_prefix_ignore_case(rest, root)
            && (after.is_empty() || after.starts_with(['\\', '/', '"', ' ']))
        {
            out.push_str(APP_PATH_TOKEN);
            rest = after;
            continue;
        }
        let mut chars = rest.chars();
        let Some(c) = chars.next() else {
            break;
        };
        out.push(c);
        rest = chars.as_str();
    }
    out
}

/// Expand every [`APP_PATH_TOKEN`] inside an argument string
pub fn expand_arguments(arguments: &str, app_root: &str) -> String {
    let root = normalize_path(app_root);
    replace_ignore_case(arguments, APP_PATH_TOKEN, root.trim_end_matches('\\'))
}

/// Split a shell icon location (`path,index`) into its path and index
pub fn split_icon_location(location: &str) -> (&str, Option<i32>) {
    if let Some((path, index)) = location.rsplit_once(',')
        && let Ok(index) = index.trim().parse::<i32>()
    {
        return (path.trim(), Some(index));
    }
    (location.trim(), None)
}

/// The remainder of `path` below `root` (empty or starting with `\`)
fn relative_to<'a>(path: &'a str, root: &str) -> Option<&'a str> {
    if root.trim().is_empty() {
        return None;
    }
    let root = normalize_path(root);
    let root = root.trim_end_matches('\\');
    if root.is_empty() {
        return None;
    }
    let rest = strip_prefix_ignore_case(path, root)?;
    (rest.is_empty() || rest.starts_with('\\')).then_some(rest)
}

fn has_drive_prefix(path: &str) -> bool {
    let bytes = path.as_bytes();
    bytes.len() >= 2 && bytes[0].is_ascii_alphabetic() && bytes[1] == b':'
}

fn strip_quotes(value: &str) -> &str {
    value
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
        .unwrap_or(value)
        .trim()
}

fn chars_eq_ignore_case(a: char, b: char) -> bool {
    a == b || a.to_lowercase().eq(b.to_lowercase())
}

fn eq_ignore_case(a: &str, b: &str) -> bool {
    a.chars().count() == b.chars().count()
        && a.chars().zip(b.chars()).all(|(x, y)| chars_eq_ignore_case(x, y))
}

fn strip_prefix_ignore_case<'a>(value: &'a str, prefix: &str) -> Option<&'a str> {
    let mut chars = value.char_indices();
    let mut end = 0;
    for expected in prefix.chars() {
        let (index, actual) = chars.next()?;
        if !chars_eq_ignore_case(actual, expected) {
            return None;
        }
        end = index + actual.len_utf8();
    }
    Some(&value[end..])
}

fn replace_ignore_case(haystack: &str, needle: &str, replacement: &str) -> String {
    if needle.is_empty() {
        return haystack.to_string();
    }
    let mut out = String::with_capacity(haystack.len());
    let mut rest = haystack;
    while !rest.is_empty() {
        if let Some(after) = strip_prefix_ignore_case(rest, needle) {
            out.push_str(replacement);
            rest = after;
            continue;
        }
        let mut chars = rest.chars();
        let Some(c) = chars.next() else {
            break;
        };
        out.push(c);
        rest = chars.as_str();
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn windows_ctx() -> TokenContext {
        TokenContext {
            system_root: Some("C:\\Windows".to_string()),
            com_spec: Some("C:\\Windows\\system32\\cmd.exe".to_string()),
        }
    }

    #[test]
    fn test_normalize_path() {
        assert_eq!(normalize_path("C:/Tools//Foo/"), "C:\\Tools\\Foo");
        assert_eq!(normalize_path("\"C:\\Tools\\Foo\\bin\\..\\app.exe\""), "C:\\Tools\\Foo\\app.exe");
        assert_eq!(normalize_path("C:\\"), "C:\\");
        assert_eq!(normalize_path("C:\\.."), "C:\\");
        assert_eq!(normalize_path("\\\\nas\\share\\..\\apps"), "\\\\nas\\share\\apps");
        assert_eq!(normalize_path("..\\foo\\..\\.."), "..\\..");
        assert_eq!(normalize_path("   "), "");
    }

    #[test]
    fn test_tokenize_under_app_root() {
        let ctx = windows_ctx();
        assert_eq!(
            tokenize("D:\\Portable\\Foo\\bin\\foo.exe", "D:\\Portable\\Foo", &ctx),
            "[.app_path]\\bin\\foo.exe"
        );
    }

    #[test]
    fn test_tokenize_ignores_case_and_trailing_slash() {
        let ctx = TokenContext::default();
        assert_eq!(
            tokenize("d:/portable/FOO/foo.exe", "D:\\Portable\\Foo\\", &ctx),
            "[.app_path]\\foo.exe"
        );
        assert_eq!(tokenize("D:\\Portable\\Foo", "D:\\Portable\\Foo\\", &ctx), "[.app_path]");
    }

    #[test]
    fn test_tokenize_requires_component_boundary() {
        let ctx = TokenContext::default();
        assert_eq!(
            tokenize("D:\\Portable\\FooBar\\x.exe", "D:\\Portable\\Foo", &ctx),
            "D:\\Portable\\FooBar\\x.exe"
        );
    }

    #[test]
    fn test_tokenize_system_root_and_comspec() {
        let ctx = windows_ctx();
        assert_eq!(
            tokenize("C:\\WINDOWS\\notepad.exe", "D:\\Portable\\Foo", &ctx),
            "%SystemRoot%\\notepad.exe"
        );

        let ctx = TokenContext {
            system_root: Some("C:\\Windows".to_string()),
            com_spec: Some("E:\\Shells\\cmd.exe".to_string()),
        };
        assert_eq!(tokenize("e:\\shells\\CMD.EXE", "D:\\Portable\\Foo", &ctx), "%ComSpec%");
    }

    #[test]
    fn test_tokenize_without_usable_token() {
        let ctx = windows_ctx();
        assert_eq!(
            tokenize("E:/Other/tool.exe", "D:\\Portable\\Foo", &ctx),
            "E:\\Other\\tool.exe"
        );
        assert_eq!(tokenize("", "D:\\Portable\\Foo", &ctx), "");
    }

    #[test]
    fn test_detokenize_resolves_current_root() {
        let ctx = windows_ctx();
        assert_eq!(
            detokenize("[.app_path]\\bin\\foo.exe", "E:\\Moved\\Foo\\", &ctx),
            "E:\\Moved\\Foo\\bin\\foo.exe"
        );
        assert_eq!(detokenize("[.APP_PATH]", "E:\\Moved\\Foo", &ctx), "E:\\Moved\\Foo");
        assert_eq!(
            detokenize("%SystemRoot%\\notepad.exe", "E:\\Moved\\Foo", &ctx),
            "C:\\Windows\\notepad.exe"
        );
        assert_eq!(detokenize("", "E:\\Moved\\Foo", &ctx), "");
    }

    #[test]
    fn test_detokenize_leaves_unknown_env_token() {
        let ctx = TokenContext::default();
        assert_eq!(
            detokenize("%SystemRoot%\\notepad.exe", "E:\\Foo", &ctx),
            "%SystemRoot%\\notepad.exe"
        );
    }

    #[test]
    fn test_arguments_round_trip() {
        let args = "--config \"D:\\Portable\\Foo\\data\\foo.ini\" --other D:\\Portable\\FooBar";
        let tokenized = tokenize_arguments(args, "D:\\Portable\\Foo");
        assert_eq!(
            tokenized,
            "--config \"[.app_path]\\data\\foo.ini\" --other D:\\Portable\\FooBar"
        );
        assert_eq!(
            expand_arguments(&tokenized, "F:\\Apps\\Foo"),
            "--config \"F:\\Apps\\Foo\\data\\foo.ini\" --other D:\\Portable\\FooBar"
        );
    }

    #[test]
    fn test_split_icon_location() {
        assert_eq!(
            split_icon_location("C:\\Foo\\foo.exe,2"),
            ("C:\\Foo\\foo.exe", Some(2))
        );
        assert_eq!(split_icon_location("C:\\Foo\\foo.ico"), ("C:\\Foo\\foo.ico", None));
        assert_eq!(split_icon_location("C:\\a,b\\x.ico"), ("C:\\a,b\\x.ico", None));
    }
}
