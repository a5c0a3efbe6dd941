//! Console front end
//!
//! Renders the catalog as a numbered checkbox tree and runs commands
//! against the [`AppController`] until the user quits or input ends.

mod command;

pub use command::{Command, HELP, parse_command};

use portable_shelf::controller::AppController;
use portable_shelf::error::get_user_friendly_error;
use portable_shelf::presentation::{NodeKind, Row};
use std::fmt::Write as _;
use std::io::{self, BufRead, Write};
use tracing::{info, warn};

/// Render the current view
pub fn render(controller: &AppController) -> String {
    let view = controller.view();
    let records = controller.records();
    let mut out = String::new();

    let _ = writeln!(
        out,
        "\nPortable apps in {}  [filter: {}]",
        controller.portable_root().display(),
        view.filter()
    );
    let rows = view.tree().rows();
    if rows.is_empty() {
        out.push_str("  (no apps match this filter)\n");
    }
    for (number, row) in rows.iter().enumerate() {
        let _ = writeln!(out, "{}", render_row(number + 1, row, controller));
    }

    let availability = controller.availability();
    let flag = |enabled: bool| if enabled { "available" } else { "-" };
    let _ = writeln!(
        out,
        "  add/update: {}   remove: {}   ({} of {} app(s) checked)",
        flag(availability.add_or_update),
        flag(availability.remove),
        view.tree().checked_records().len(),
        records.len()
    );
    out
}

fn render_row(number: usize, row: &Row<'_>, controller: &AppController) -> String {
    let check = if row.checked { "[x]" } else { "[ ]" };
    let indent = "    ".repeat(row.depth);
    match row.kind {
        NodeKind::Group => format!("{number:>3} {indent}{check} {}", row.label),
        NodeKind::App(index) => {
            let record = &controller.records()[index];
            let state = record.status.display_state();
            let mut line = format!(
                "{number:>3} {indent}{check} {} {}",
                state.glyph(),
                row.label
            );
            if !record.marker.app_version.is_empty() {
                let _ = write!(line, " {}", record.marker.app_version);
            }
            let _ = write!(line, "  ({}", state.label());
            if record.status.has_shortcut && !record.status.shortcut_version.is_empty() {
                let _ = write!(line, ", menu {}", record.status.shortcut_version);
            }
            if record.status.is_installed {
                let _ = write!(line, ", installed {}", record.status.installed_version);
            }
            line.push(')');
            line
        }
    }
}

/// What the loop should do after a command
enum Flow {
    Continue,
    Quit,
}

fn execute<W: Write>(
    controller: &mut AppController,
    command: Command,
    out: &mut W,
) -> io::Result<Flow> {
    let rows: Vec<_> = controller
        .view()
        .tree()
        .rows()
        .iter()
        .map(|row| (row.id, row.kind))
        .collect();
    let row_at = |n: usize| n.checked_sub(1).and_then(|i| rows.get(i)).copied();

    match command {
        Command::Toggle(n) => match row_at(n) {
            Some((id, _)) => controller.toggle(id),
            None => writeln!(out, "No row {n}")?,
        },
        Command::SelectAll => controller.select_all(),
        Command::UnselectAll => controller.unselect_all(),
        Command::Invert => controller.invert_all(),
        Command::Filter(filter) => controller.set_filter(filter),
        Command::Add => {
            let report = controller.add_or_update_selected();
            writeln!(out, "{report}")?;
        }
        Command::Remove => {
            let report = controller.remove_selected();
            writeln!(out, "{report}")?;
        }
        Command::Open(n) => match row_at(n) {
            Some((_, NodeKind::App(index))) => {
                if let Err(e) = controller.open_app_folder(index) {
                    warn!("Open folder failed: {e}");
                    writeln!(out, "{}", get_user_friendly_error(&e))?;
                }
            }
            Some((_, NodeKind::Group)) => writeln!(out, "Row {n} is a group")?,
            None => writeln!(out, "No row {n}")?,
        },
        Command::Rescan => {
            if let Err(e) = controller.rescan() {
                warn!("Rescan failed: {e}");
                writeln!(out, "{}", get_user_friendly_error(&e))?;
            }
        }
        Command::Help => writeln!(out, "{HELP}")?,
        Command::Quit => return Ok(Flow::Quit),
    }
    Ok(Flow::Continue)
}

/// Run the command loop until `quit` or end of input
pub fn run<R: BufRead, W: Write>(
    controller: &mut AppController,
    mut input: R,
    mut out: W,
) -> io::Result<()> {
    writeln!(out, "Type 'help' for commands.")?;
    loop {
        write!(out, "{}> ", render(controller))?;
        out.flush()?;

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            break;
        }
        let command = match parse_command(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(message) => {
                writeln!(out, "{message}")?;
                continue;
            }
        };
        if let Flow::Quit = execute(controller, command, &mut out)? {
            break;
        }
    }
    info!("Console session ended");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use portable_shelf::config::AppConfig;
    use portable_shelf::paths::TokenContext;
    use portable_shelf::registry::{MemoryRegistry, RegistryProbe};
    use portable_shelf::shortcuts::{ShortcutLink, ShortcutLinks, StartMenuRoots};
    use std::io::Cursor;
    use std::path::Path;

    struct NoLinks;

    impl ShortcutLinks for NoLinks {
        fn read(&self, _path: &Path) -> portable_shelf::Result<ShortcutLink> {
            Ok(ShortcutLink::default())
        }

        fn write(&self, _path: &Path, _link: &ShortcutLink) -> portable_shelf::Result<()> {
            Ok(())
        }
    }

    fn controller(dir: &Path) -> AppController {
        for (folder, name, group) in [("Foo", "Foo", "Tools"), ("Bar", "Bar", "Tools")] {
            std::fs::create_dir_all(dir.join("apps").join(folder)).unwrap();
            std::fs::write(
                dir.join("apps").join(folder).join("x.app"),
                format!(r#"{{"appName":"{name}","appVersion":"1.0","appGroup":"{group}"}}"#),
            )
            .unwrap();
        }
        let mut controller = AppController::new(
            AppConfig::default(),
            dir.join("apps"),
            StartMenuRoots {
                all_users: None,
                current_user: Some(dir.join("menu")),
            },
            RegistryProbe::new(
                Box::new(MemoryRegistry::default()),
                Box::new(MemoryRegistry::default()),
            ),
            Box::new(NoLinks),
            TokenContext::default(),
        );
        controller.rescan().unwrap();
        controller
    }

    #[test]
    fn test_render_lists_rows() {
        let dir = tempfile::tempdir().unwrap();
        let controller = controller(dir.path());
        let text = render(&controller);
        assert!(text.contains("  1 [ ] Tools"));
        assert!(text.contains("  2     [ ] - Bar 1.0  (not used)"));
        assert!(text.contains("  3     [ ] - Foo 1.0  (not used)"));
    }

    #[test]
    fn test_run_script() {
        let dir = tempfile::tempdir().unwrap();
        let mut controller = controller(dir.path());
        let mut out = Vec::new();
        run(&mut controller, Cursor::new("1\nbogus\nt 9\nadd\nquit\n"), &mut out).unwrap();
        let out = String::from_utf8(out).unwrap();

        assert!(out.contains("unknown command 'bogus'"));
        assert!(out.contains("No row 9"));
        assert!(out.contains("2 done"));
        assert!(dir.path().join("menu").join("Foo").join(".app").exists());
        assert!(dir.path().join("menu").join("Bar").join(".app").exists());
    }

    #[test]
    fn test_run_stops_at_end_of_input() {
        let dir = tempfile::tempdir().unwrap();
        let mut controller = controller(dir.path());
        run(&mut controller, Cursor::new("invert\n"), Vec::new()).unwrap();
        assert_eq!(controller.view().tree().checked_records().len(), 2);
    }
}
