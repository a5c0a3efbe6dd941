//! Reading and writing `.lnk` shortcut files
//!
//! On Windows this goes through the shell's `IShellLinkW` and
//! `IPersistFile` COM interfaces. Other hosts report `Unsupported`.

use crate::error::Result;
use crate::marker::WindowStyle;
use std::path::Path;

/// A shortcut with every path resolved to an absolute location
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShortcutLink {
    /// Target executable
    pub target: String,
    /// Command-line arguments
    pub arguments: String,
    /// Working directory
    pub working_directory: String,
    /// File the icon is taken from
    pub icon_location: String,
    /// Icon index inside `icon_location`
    pub icon_index: i32,
    /// Initial window state
    pub window_style: WindowStyle,
    /// Tooltip text
    pub description: String,
}

/// Access to shortcut files
pub trait ShortcutLinks {
    /// Read an existing `.lnk`
    fn read(&self, path: &Path) -> Result<ShortcutLink>;

    /// Create or overwrite a `.lnk`
    fn write(&self, path: &Path, link: &ShortcutLink) -> Result<()>;
}

/// Shortcut access through the Windows shell
pub struct ShellLinkStore {
    #[cfg(windows)]
    com_initialized: bool,
}

#[cfg(windows)]
impl ShellLinkStore {
    /// Initialize COM on the calling thread
    #[expect(unsafe_code, reason = "Windows FFI to initialize COM")]
    pub fn new() -> Self {
        use windows::Win32::System::Com::{COINIT_APARTMENTTHREADED, CoInitializeEx};

        // S_FALSE (already initialized) still needs a matching CoUninitialize
        let com_initialized = unsafe { CoInitializeEx(None, COINIT_APARTMENTTHREADED) }
            .ok()
            .inspect_err(|e| tracing::warn!("CoInitializeEx failed: {e}"))
            .is_ok();
        Self { com_initialized }
    }
}

#[cfg(windows)]
impl Drop for ShellLinkStore {
    #[expect(unsafe_code, reason = "Windows FFI to balance CoInitializeEx")]
    fn drop(&mut self) {
        if self.com_initialized {
            unsafe { windows::Win32::System::Com::CoUninitialize() };
        }
    }
}

#[cfg(not(windows))]
impl ShellLinkStore {
    /// Create the store; every operation reports `Unsupported` on this host
    pub fn new() -> Self {
        Self {}
    }
}

impl Default for ShellLinkStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ShortcutLinks for ShellLinkStore {
    fn read(&self, path: &Path) -> Result<ShortcutLink> {
        #[cfg(windows)]
        {
            shell::read(path)
        }

        #[cfg(not(windows))]
        {
            let _ = path;
            Err(crate::error::ShelfError::Unsupported("Shortcut files"))
        }
    }

    fn write(&self, path: &Path, link: &ShortcutLink) -> Result<()> {
        #[cfg(windows)]
        {
            shell::write(path, link)
        }

        #[cfg(not(windows))]
        {
            let _ = (path, link);
            Err(crate::error::ShelfError::Unsupported("Shortcut files"))
        }
    }
}

#[cfg(windows)]
mod shell {
    use super::ShortcutLink;
    use crate::error::{Result, ShelfError};
    use crate::marker::WindowStyle;
    use std::path::Path;
    use tracing::debug;
    use windows::Win32::System::Com::{CLSCTX_INPROC_SERVER, CoCreateInstance, IPersistFile, STGM_READ};
    use windows::Win32::UI::Shell::{IShellLinkW, ShellLink};
    use windows::Win32::UI::WindowsAndMessaging::SHOW_WINDOW_CMD;
    use windows::core::{HSTRING, Interface};

    /// Long enough for extended-length paths
    const BUFFER_LEN: usize = 32_768;

    fn link_error(e: windows::core::Error) -> ShelfError {
        ShelfError::ShortcutLinkError(Box::new(e))
    }

    fn from_wide(buffer: &[u16]) -> String {
        let len = buffer.iter().position(|&c| c == 0).unwrap_or(buffer.len());
        String::from_utf16_lossy(&buffer[..len])
    }

    #[expect(unsafe_code, reason = "Windows COM calls into the shell link object")]
    pub fn read(path: &Path) -> Result<ShortcutLink> {
        unsafe {
            let link: IShellLinkW =
                CoCreateInstance(&ShellLink, None, CLSCTX_INPROC_SERVER).map_err(link_error)?;
            let persist: IPersistFile = link.cast().map_err(link_error)?;
            persist
                .Load(&HSTRING::from(path), STGM_READ)
                .map_err(link_error)?;

            let mut buffer = vec![0u16; BUFFER_LEN];
            link.GetPath(&mut buffer, std::ptr::null_mut(), 0)
                .map_err(link_error)?;
            let target = from_wide(&buffer);

            buffer.fill(0);
            link.GetArguments(&mut buffer).map_err(link_error)?;
            let arguments = from_wide(&buffer);

            buffer.fill(0);
            link.GetWorkingDirectory(&mut buffer).map_err(link_error)?;
            let working_directory = from_wide(&buffer);

            buffer.fill(0);
            let mut icon_index = 0i32;
            link.GetIconLocation(&mut buffer, &raw mut icon_index)
                .map_err(link_error)?;
            let icon_location = from_wide(&buffer);

            buffer.fill(0);
            link.GetDescription(&mut buffer).map_err(link_error)?;
            let description = from_wide(&buffer);

            let show_cmd = link.GetShowCmd().map_err(link_error)?;

            debug!("Read shortcut {}", path.display());
            Ok(ShortcutLink {
                target,
                arguments,
                working_directory,
                icon_location,
                icon_index,
                window_style: WindowStyle::from(i64::from(show_cmd.0)),
                description,
            })
        }
    }

    #[expect(unsafe_code, reason = "Windows COM calls into the shell link object")]
    pub fn write(path: &Path, link: &ShortcutLink) -> Result<()> {
        unsafe {
            let shell_link: IShellLinkW =
                CoCreateInstance(&ShellLink, None, CLSCTX_INPROC_SERVER).map_err(link_error)?;
            shell_link
                .SetPath(&HSTRING::from(link.target.as_str()))
                .map_err(link_error)?;
            shell_link
                .SetArguments(&HSTRING::from(link.arguments.as_str()))
                .map_err(link_error)?;
            shell_link
                .SetWorkingDirectory(&HSTRING::from(link.working_directory.as_str()))
                .map_err(link_error)?;
            if !link.icon_location.is_empty() {
                shell_link
                    .SetIconLocation(&HSTRING::from(link.icon_location.as_str()), link.icon_index)
                    .map_err(link_error)?;
            }
            shell_link
                .SetShowCmd(SHOW_WINDOW_CMD(link.window_style.show_cmd()))
                .map_err(link_error)?;
            shell_link
                .SetDescription(&HSTRING::from(link.description.as_str()))
                .map_err(link_error)?;

            let persist: IPersistFile = shell_link.cast().map_err(link_error)?;
            persist
                .Save(&HSTRING::from(path), true)
                .map_err(link_error)?;
        }
        debug!("Wrote shortcut {}", path.display());
        Ok(())
    }
}
