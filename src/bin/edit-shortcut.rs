//! `edit-shortcut` - edit the properties of an existing `.lnk`
//!
//! Each property is prompted with its current value; an empty answer keeps
//! it. Cancelling the file picker exits without changes.

use anyhow::{Context, Result};
use portable_shelf::marker::WindowStyle;
use portable_shelf::paths;
use portable_shelf::shortcuts::{ShellLinkStore, ShortcutLink, ShortcutLinks};
use portable_shelf::utils::{self, prompt_with_default};
use std::io::{BufRead, Write};
use tracing::info;

fn main() -> Result<()> {
    if let Err(e) = utils::init_logging("edit-shortcut") {
        eprintln!("Logging unavailable: {e}");
    }

    let Some(path) = rfd::FileDialog::new()
        .set_title("Select a shortcut to edit")
        .add_filter("Shortcut", &["lnk"])
        .pick_file()
    else {
        info!("Shortcut selection cancelled");
        return Ok(());
    };

    let links = ShellLinkStore::new();
    let current = links
        .read(&path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    println!("Editing {} (press Enter to keep a value)", path.display());
    let stdin = std::io::stdin();
    let edited = edit_link(&current, &mut stdin.lock(), &mut std::io::stdout())?;

    if edited == current {
        println!("No changes");
        return Ok(());
    }
    links
        .write(&path, &edited)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    info!("Updated {}", path.display());
    println!("Saved {}", path.display());
    Ok(())
}

fn style_name(style: WindowStyle) -> &'static str {
    match style {
        WindowStyle::Normal => "normal",
        WindowStyle::Maximized => "maximized",
        WindowStyle::Minimized => "minimized",
    }
}

fn parse_style(answer: &str, current: WindowStyle) -> WindowStyle {
    match answer.trim().to_ascii_lowercase().as_str() {
        "normal" | "1" => WindowStyle::Normal,
        "maximized" | "max" | "3" => WindowStyle::Maximized,
        "minimized" | "min" | "7" => WindowStyle::Minimized,
        _ => current,
    }
}

/// Prompt for every property of `link`, keeping values left empty
fn edit_link<R: BufRead, W: Write>(
    link: &ShortcutLink,
    input: &mut R,
    output: &mut W,
) -> std::io::Result<ShortcutLink> {
    let target = prompt_with_default(input, output, "Target", &link.target)?;
    let arguments = prompt_with_default(input, output, "Arguments", &link.arguments)?;
    let working_directory =
        prompt_with_default(input, output, "Working directory", &link.working_directory)?;

    let current_icon = if link.icon_location.is_empty() {
        String::new()
    } else {
        format!("{},{}", link.icon_location, link.icon_index)
    };
    let icon = prompt_with_default(input, output, "Icon (path,index)", &current_icon)?;
    let (icon_location, icon_index) = paths::split_icon_location(&icon);

    let style = prompt_with_default(
        input,
        output,
        "Window (normal/maximized/minimized)",
        style_name(link.window_style),
    )?;
    let description = prompt_with_default(input, output, "Description", &link.description)?;

    Ok(ShortcutLink {
        target,
        arguments,
        working_directory,
        icon_location: icon_location.to_string(),
        icon_index: icon_index.unwrap_or(0),
        window_style: parse_style(&style, link.window_style),
        description,
    })
}
