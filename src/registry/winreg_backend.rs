//! Structured registry access through `winreg`

use crate::error::{Result, ShelfError};
use crate::registry::path::{Hive, RegistryPath};
use crate::registry::probe::RegistryBackend;
use std::io::ErrorKind;
use winreg::RegKey;
use winreg::enums::{
    HKEY_CLASSES_ROOT, HKEY_CURRENT_CONFIG, HKEY_CURRENT_USER, HKEY_LOCAL_MACHINE, HKEY_USERS,
    KEY_READ, RegType,
};

/// Registry backend using the native registry API
pub struct WinRegBackend;

impl WinRegBackend {
    fn open(key: &RegistryPath) -> std::io::Result<RegKey> {
        let root = match key.hive {
            Hive::LocalMachine => HKEY_LOCAL_MACHINE,
            Hive::CurrentUser => HKEY_CURRENT_USER,
            Hive::ClassesRoot => HKEY_CLASSES_ROOT,
            Hive::Users => HKEY_USERS,
            Hive::CurrentConfig => HKEY_CURRENT_CONFIG,
        };
        RegKey::predef(root).open_subkey_with_flags(&key.subkey, KEY_READ)
    }
}

impl RegistryBackend for WinRegBackend {
    fn key_exists(&self, key: &RegistryPath) -> Result<bool> {
        match Self::open(key) {
            Ok(_) => Ok(true),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(ShelfError::RegistryError(Box::new(e))),
        }
    }

    fn read_value(&self, key: &RegistryPath, name: &str) -> Result<Option<String>> {
        let opened = match Self::open(key) {
            Ok(opened) => opened,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(ShelfError::RegistryError(Box::new(e))),
        };

        match opened.get_raw_value(name) {
            Ok(raw) => Ok(Some(value_to_string(&raw.vtype, &raw.bytes))),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(ShelfError::RegistryError(Box::new(e))),
        }
    }
}

/// Render raw value data the way a string comparison expects it
fn value_to_string(vtype: &RegType, bytes: &[u8]) -> String {
    match vtype {
        RegType::REG_SZ | RegType::REG_EXPAND_SZ | RegType::REG_MULTI_SZ => {
            let wide: Vec<u16> = bytes
                .chunks_exact(2)
                .map(|pair| u16::from_le_bytes([pair[0], pair[1]]))
                .collect();
            let text = String::from_utf16_lossy(&wide);
            // REG_MULTI_SZ entries are NUL-separated; join them by newline
            text.trim_end_matches('\0')
                .split('\0')
                .collect::<Vec<_>>()
                .join("\n")
        }
        RegType::REG_DWORD if bytes.len() >= 4 => {
            u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]).to_string()
        }
        RegType::REG_QWORD if bytes.len() >= 8 => {
            let mut quad = [0u8; 8];
            quad.copy_from_slice(&bytes[..8]);
            u64::from_le_bytes(quad).to_string()
        }
        _ => hex::encode(bytes),
    }
}
