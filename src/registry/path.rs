//! Registry path parsing and root alias normalization

use std::fmt;

/// Top-level registry hive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Hive {
    /// `HKEY_LOCAL_MACHINE`
    LocalMachine,
    /// `HKEY_CURRENT_USER`
    CurrentUser,
    /// `HKEY_CLASSES_ROOT`
    ClassesRoot,
    /// `HKEY_USERS`, per-SID subtrees that are often not mounted
    Users,
    /// `HKEY_CURRENT_CONFIG`
    CurrentConfig,
}

impl Hive {
    const ALL: [Self; 5] = [
        Self::LocalMachine,
        Self::CurrentUser,
        Self::ClassesRoot,
        Self::Users,
        Self::CurrentConfig,
    ];

    /// Short alias, e.g. `HKLM`
    pub fn short_name(self) -> &'static str {
        match self {
            Self::LocalMachine => "HKLM",
            Self::CurrentUser => "HKCU",
            Self::ClassesRoot => "HKCR",
            Self::Users => "HKU",
            Self::CurrentConfig => "HKCC",
        }
    }

    /// Long name, e.g. `HKEY_LOCAL_MACHINE`
    pub fn long_name(self) -> &'static str {
        match self {
            Self::LocalMachine => "HKEY_LOCAL_MACHINE",
            Self::CurrentUser => "HKEY_CURRENT_USER",
            Self::ClassesRoot => "HKEY_CLASSES_ROOT",
            Self::Users => "HKEY_USERS",
            Self::CurrentConfig => "HKEY_CURRENT_CONFIG",
        }
    }

    /// Match a root alias, ignoring case and a trailing `:`
    pub fn from_alias(alias: &str) -> Option<Self> {
        let alias = alias.trim().trim_end_matches(':');
        Self::ALL.into_iter().find(|hive| {
            alias.eq_ignore_ascii_case(hive.short_name()) || alias.eq_ignore_ascii_case(hive.long_name())
        })
    }
}

/// A registry key: hive plus subkey (without leading or trailing `\`)
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RegistryPath {
    /// Hive the key lives in
    pub hive: Hive,
    /// Subkey below the hive, `\`-separated
    pub subkey: String,
}

const PROVIDER_PREFIXES: [&str; 2] = ["Microsoft.PowerShell.Core\\Registry::", "Registry::"];

impl RegistryPath {
    /// Parse any common spelling of a registry path
    ///
    /// Accepts `HKLM\...`, `HKLM:\...`, `HKEY_LOCAL_MACHINE\...` and the
    /// `Registry::` provider forms; `/` is accepted as a separator.
    pub fn parse(path: &str) -> Option<Self> {
        let mut rest = path.trim();
        for prefix in PROVIDER_PREFIXES {
            if rest.len() >= prefix.len()
                && rest.is_char_boundary(prefix.len())
                && rest[..prefix.len()].eq_ignore_ascii_case(prefix)
            {
                rest = &rest[prefix.len()..];
                break;
            }
        }

        let unified = rest.replace('/', "\\");
        let (root, subkey) = unified.split_once('\\').unwrap_or((unified.as_str(), ""));
        let hive = Hive::from_alias(root)?;

        let subkey = subkey
            .split('\\')
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join("\\");
        Some(Self { hive, subkey })
    }

    /// Child key below this one
    pub fn join(&self, child: &str) -> Self {
        let child = child.trim_matches(['\\', '/']);
        let subkey = match (self.subkey.is_empty(), child.is_empty()) {
            (_, true) => self.subkey.clone(),
            (true, false) => child.to_string(),
            (false, false) => format!("{}\\{child}", self.subkey),
        };
        Self {
            hive: self.hive,
            subkey,
        }
    }

    /// Form understood by `reg.exe`, e.g. `HKLM\SOFTWARE`
    pub fn reg_exe_form(&self) -> String {
        if self.subkey.is_empty() {
            self.hive.short_name().to_string()
        } else {
            format!("{}\\{}", self.hive.short_name(), self.subkey)
        }
    }
}

impl fmt::Display for RegistryPath {
    /// Canonical provider-style form, e.g. `HKLM:\SOFTWARE`
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:\\{}", self.hive.short_name(), self.subkey)
    }
}

/// Rewrite a registry path's root alias into the canonical `HKLM:\` form
///
/// Input whose root is not a known alias is returned unchanged.
pub fn normalize_root(path: &str) -> String {
    RegistryPath::parse(path).map_or_else(|| path.to_string(), |parsed| parsed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_root_aliases() {
        assert_eq!(normalize_root("HKLM\\SOFTWARE\\Foo"), "HKLM:\\SOFTWARE\\Foo");
        assert_eq!(
            normalize_root("HKEY_LOCAL_MACHINE\\SOFTWARE\\Foo"),
            "HKLM:\\SOFTWARE\\Foo"
        );
        assert_eq!(normalize_root("hkcu:/Software/Foo/"), "HKCU:\\Software\\Foo");
        assert_eq!(
            normalize_root("Registry::HKEY_USERS\\S-1-5-21\\Software"),
            "HKU:\\S-1-5-21\\Software"
        );
        assert_eq!(normalize_root("HKEY_CLASSES_ROOT"), "HKCR:\\");
    }

    #[test]
    fn test_normalize_root_passthrough() {
        assert_eq!(normalize_root("SOFTWARE\\Foo"), "SOFTWARE\\Foo");
        assert_eq!(normalize_root("HKXX\\Foo"), "HKXX\\Foo");
        assert_eq!(normalize_root(""), "");
    }

    #[test]
    fn test_join_and_reg_exe_form() {
        let root = RegistryPath::parse("HKLM\\SOFTWARE\\Microsoft").unwrap();
        let child = root.join("\\Windows\\");
        assert_eq!(child.subkey, "SOFTWARE\\Microsoft\\Windows");
        assert_eq!(child.reg_exe_form(), "HKLM\\SOFTWARE\\Microsoft\\Windows");

        let hive_only = RegistryPath::parse("HKU").unwrap();
        assert_eq!(hive_only.reg_exe_form(), "HKU");
        assert_eq!(hive_only.join("S-1-5-18").subkey, "S-1-5-18");
    }
}
