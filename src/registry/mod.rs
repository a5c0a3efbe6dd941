//! Registry probe
//!
//! Answers "is this key there / does this value match" questions used for
//! install detection. The lookup strategy is pluggable:
//!
//! - `WinRegBackend`: structured access through `winreg` (Windows only)
//! - `RegQueryBackend`: runs `reg.exe query` and parses its text output,
//!   used for `HKU` per-SID subtrees and when forced by configuration
//! - `MemoryRegistry`: in-memory contents for tests and benchmarks
//!
//! Root aliases (`HKLM`, `HKEY_LOCAL_MACHINE`, `HKLM:`, `Registry::...`)
//! are all accepted and normalized to the `HKLM:\` form.

pub mod memory;
pub mod path;
pub mod probe;
pub mod reg_query;
#[cfg(windows)]
pub mod winreg_backend;

pub use memory::MemoryRegistry;
pub use path::{Hive, RegistryPath, normalize_root};
pub use probe::{RegistryBackend, RegistryProbe};
pub use reg_query::{RegQueryBackend, parse_query_value};
#[cfg(windows)]
pub use winreg_backend::WinRegBackend;
