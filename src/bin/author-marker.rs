//! `author-marker` - create a `.app` marker from existing Start Menu shortcuts
//!
//! Pick the portable app's folder, then the Start Menu folder holding its
//! shortcuts, answer a few prompts, and the marker is written into the app
//! folder. Cancelling a folder picker exits without changes.

use anyhow::{Context, Result, bail};
use portable_shelf::marker::{self, MarkerDetails, MarkerStore};
use portable_shelf::paths::TokenContext;
use portable_shelf::shortcuts::{ShellLinkStore, ShortcutScope, StartMenuRoots};
use portable_shelf::utils::{self, confirm, prompt_with_default};
use std::io::{BufRead, Write};
use std::path::Path;
use tracing::{info, warn};

fn main() -> Result<()> {
    if let Err(e) = utils::init_logging("author-marker") {
        eprintln!("Logging unavailable: {e}");
    }

    let Some(app_folder) = rfd::FileDialog::new()
        .set_title("Select the portable app folder")
        .pick_folder()
    else {
        info!("App folder selection cancelled");
        return Ok(());
    };

    let roots = StartMenuRoots::from_env();
    let mut picker = rfd::FileDialog::new().set_title("Select the Start Menu folder with its shortcuts");
    if let Some(root) = roots.root_for(ShortcutScope::CurrentUser) {
        picker = picker.set_directory(root);
    }
    let Some(menu_folder) = picker.pick_folder() else {
        info!("Start Menu folder selection cancelled");
        return Ok(());
    };

    let links = ShellLinkStore::new();
    let found = marker::collect_links(&menu_folder, &links)
        .with_context(|| format!("Failed to read {}", menu_folder.display()))?;
    if found.is_empty() {
        warn!("No readable shortcuts in {}", menu_folder.display());
    }
    println!("Found {} shortcut(s) in {}", found.len(), menu_folder.display());

    let stdin = std::io::stdin();
    let mut input = stdin.lock();
    let mut output = std::io::stdout();
    let details = ask_details(&mut input, &mut output, &app_folder, &menu_folder)?;
    if details.app_name.trim().is_empty() {
        bail!("An application name is required");
    }

    let app_root = app_folder.to_string_lossy();
    let new_marker = marker::build_marker(&app_root, &found, details, &TokenContext::from_env());
    let target = app_folder.join(marker::marker_file_name(&new_marker.app_name));

    if target.exists()
        && !confirm(
            &mut input,
            &mut output,
            &format!("{} exists. Overwrite?", target.display()),
        )?
    {
        info!("Kept existing {}", target.display());
        return Ok(());
    }

    MarkerStore::save(&target, &new_marker)
        .with_context(|| format!("Failed to write {}", target.display()))?;
    info!("Wrote {}", target.display());
    println!("Wrote {}", target.display());
    Ok(())
}

fn folder_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Prompt for every marker field, defaulting from the picked folders
fn ask_details<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    app_folder: &Path,
    menu_folder: &Path,
) -> std::io::Result<MarkerDetails> {
    let app_name = prompt_with_default(input, output, "Application name", &folder_name(app_folder))?;
    Ok(MarkerDetails {
        app_version: prompt_with_default(input, output, "Version", "")?,
        app_group: prompt_with_default(input, output, "Group (empty for none)", "")?,
        app_description: prompt_with_default(input, output, "Description", "")?,
        app_start_menu_folder_name: prompt_with_default(
            input,
            output,
            "Start Menu folder",
            &folder_name(menu_folder),
        )?,
        app_install_registry_data: prompt_with_default(
            input,
            output,
            "Uninstall registry key (empty for none)",
            "",
        )?,
        app_name,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_defaults_come_from_folders() {
        let mut input = Cursor::new("\n2.4\nMedia\n\n\nscrcpy_is1\n");
        let mut output = Vec::new();
        let details = ask_details(
            &mut input,
            &mut output,
            Path::new("D:/Portable/scrcpy"),
            Path::new("C:/Users/me/Start Menu/Programs/scrcpy"),
        )
        .unwrap();

        assert_eq!(details.app_name, "scrcpy");
        assert_eq!(details.app_version, "2.4");
        assert_eq!(details.app_group, "Media");
        assert_eq!(details.app_description, "");
        assert_eq!(details.app_start_menu_folder_name, "scrcpy");
        assert_eq!(details.app_install_registry_data, "scrcpy_is1");
    }
}
