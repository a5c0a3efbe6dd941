//! Application controller implementation
//!
//! Owns the domain state of one session (classified records and the
//! collaborators used to compute them) next to the UI-side [`CatalogView`].

use crate::catalog::{self, AppRecord, Filter};
use crate::config::AppConfig;
use crate::error::{Result, ShelfError};
use crate::marker::{DEPLOYED_MARKER_NAME, MarkerStore};
use crate::paths::TokenContext;
use crate::presentation::{ActionAvailability, CatalogView, NodeId};
use crate::registry::RegistryProbe;
use crate::shortcuts::{self, ShellLinkStore, ShortcutLinks, StartMenuRoots};
use std::fmt;
use std::path::{Component, Path, PathBuf};
use tracing::{debug, error, info, warn};

/// One app an action could not be applied to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionFailure {
    /// App name
    pub app: String,
    /// Why it failed
    pub reason: String,
}

/// Outcome of a bulk shortcut action
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActionReport {
    /// Apps the action was applied to
    pub succeeded: Vec<String>,
    /// Apps the action failed for
    pub failed: Vec<ActionFailure>,
    /// Set when the catalog could not be rescanned afterwards
    pub rescan_error: Option<String>,
}

impl ActionReport {
    /// Whether nothing was attempted
    pub fn is_empty(&self) -> bool {
        self.succeeded.is_empty() && self.failed.is_empty()
    }

    fn record(&mut self, app: &str, outcome: Result<()>) {
        match outcome {
            Ok(()) => self.succeeded.push(app.to_string()),
            Err(e) => {
                error!("{app}: {e}");
                self.failed.push(ActionFailure {
                    app: app.to_string(),
                    reason: e.to_string(),
                });
            }
        }
    }
}

impl fmt::Display for ActionReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            f.write_str("Nothing to do")?;
        } else {
            write!(f, "{} done", self.succeeded.len())?;
            if !self.failed.is_empty() {
                write!(f, ", {} failed", self.failed.len())?;
                for failure in &self.failed {
                    write!(f, "\n  {}: {}", failure.app, failure.reason)?;
                }
            }
        }
        if let Some(reason) = &self.rescan_error {
            write!(f, "\nRescan failed, the list may be out of date: {reason}")?;
        }
        Ok(())
    }
}

/// Session controller
pub struct AppController {
    config: AppConfig,
    portable_root: PathBuf,
    roots: StartMenuRoots,
    probe: RegistryProbe,
    links: Box<dyn ShortcutLinks>,
    tokens: TokenContext,
    records: Vec<AppRecord>,
    view: CatalogView,
}

impl AppController {
    /// Create a controller from explicit collaborators
    ///
    /// The catalog is empty until [`AppController::rescan`] runs.
    pub fn new(
        config: AppConfig,
        portable_root: PathBuf,
        roots: StartMenuRoots,
        probe: RegistryProbe,
        links: Box<dyn ShortcutLinks>,
        tokens: TokenContext,
    ) -> Self {
        let view = CatalogView::new(&[], config.default_filter);
        Self {
            config,
            portable_root,
            roots,
            probe,
            links,
            tokens,
            records: Vec::new(),
            view,
        }
    }

    /// Create a controller wired to the live system
    pub fn system(config: AppConfig, exe_dir: &Path) -> Self {
        let portable_root = config.resolve_portable_root(exe_dir);
        let probe = RegistryProbe::system().with_force_fallback(config.force_registry_fallback);
        Self::new(
            config,
            portable_root,
            StartMenuRoots::from_env(),
            probe,
            Box::new(ShellLinkStore::new()),
            TokenContext::from_env(),
        )
    }

    /// Discover, scan and classify from scratch
    ///
    /// Classification runs exactly once per call. The active filter is kept
    /// and the selection is reset.
    pub fn rescan(&mut self) -> Result<()> {
        let discovered = catalog::discover_portable_apps(&self.portable_root)?;
        let deployed = shortcuts::scan_shortcuts(&self.roots);
        self.records = catalog::classify(discovered, &deployed, &self.probe);
        self.view.rebuild(&self.records, self.view.filter());
        info!("{}", catalog::StatusSummary::of(&self.records));
        Ok(())
    }

    /// Classified records
    pub fn records(&self) -> &[AppRecord] {
        &self.records
    }

    /// View state
    pub fn view(&self) -> &CatalogView {
        &self.view
    }

    /// Portable-apps root in use
    pub fn portable_root(&self) -> &Path {
        &self.portable_root
    }

    /// Active configuration
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Switch the filter; records are not reclassified
    pub fn set_filter(&mut self, filter: Filter) {
        debug!("Filter changed to {filter}");
        self.view.rebuild(&self.records, filter);
    }

    /// Toggle a tree node as a user would
    pub fn toggle(&mut self, id: NodeId) {
        self.view.tree_mut().toggle(id);
    }

    /// Check every node
    pub fn select_all(&mut self) {
        self.view.tree_mut().select_all();
    }

    /// Uncheck every node
    pub fn unselect_all(&mut self) {
        self.view.tree_mut().unselect_all();
    }

    /// Invert the selection
    pub fn invert_all(&mut self) {
        self.view.tree_mut().invert_all();
    }

    /// Actions enabled by the current selection
    pub fn availability(&self) -> ActionAvailability {
        self.view.availability(&self.records)
    }

    fn selected(&self) -> Vec<&AppRecord> {
        self.view
            .tree()
            .checked_records()
            .into_iter()
            .filter_map(|index| self.records.get(index))
            .collect()
    }

    /// Create or refresh the shortcuts of every checked app that needs it
    ///
    /// A failure for one app does not stop the others. The catalog is
    /// rescanned afterwards; a failed rescan is noted in the report.
    pub fn add_or_update_selected(&mut self) -> ActionReport {
        let mut report = ActionReport::default();
        for record in self.selected() {
            if !record.status.needs_shortcut_update() {
                debug!("{}: shortcut already up to date", record.name());
                continue;
            }
            report.record(record.name(), self.deploy(record));
        }
        info!("Add/update: {report}");
        self.rescan_after(&mut report);
        report
    }

    fn rescan_after(&mut self, report: &mut ActionReport) {
        if let Err(e) = self.rescan() {
            error!("Rescan after action failed: {e}");
            report.rescan_error = Some(e.to_string());
        }
    }

    fn deploy(&self, record: &AppRecord) -> Result<()> {
        let folder = match (record.status.has_shortcut, &record.status.shortcut_folder) {
            (true, Some(existing)) => {
                if self.roots.is_root(existing) {
                    return Err(ShelfError::ActionRefused(format!(
                        "{} is a Start Menu root",
                        existing.display()
                    )));
                }
                remove_links_in(existing)?;
                existing.clone()
            }
            _ => {
                let root = self.roots.root_for(self.config.shortcut_scope).ok_or_else(|| {
                    ShelfError::ActionRefused(format!(
                        "no Start Menu folder known for {}",
                        self.config.shortcut_scope
                    ))
                })?;
                let folder = menu_folder(root, record.marker.start_menu_folder())?;
                ensure_unclaimed(&folder, &record.marker.app_name)?;
                folder
            }
        };
        std::fs::create_dir_all(&folder)?;

        let app_root = record.app_root().to_string_lossy();
        for definition in &record.marker.shortcuts {
            let link = definition.resolve(&app_root, &self.tokens);
            let path = folder.join(definition.link_file_name());
            self.links.write(&path, &link)?;
            debug!("Wrote {}", path.display());
        }

        // Written last, so an interrupted deploy still reads as drifted
        std::fs::copy(record.marker_path(), folder.join(DEPLOYED_MARKER_NAME))?;
        info!("{} deployed to {}", record.name(), folder.display());
        Ok(())
    }

    /// Delete the shortcut folder of every checked app that has one
    ///
    /// A failure for one app does not stop the others. The catalog is
    /// rescanned afterwards; a failed rescan is noted in the report.
    pub fn remove_selected(&mut self) -> ActionReport {
        let mut report = ActionReport::default();
        for record in self.selected() {
            let Some(folder) = record.status.shortcut_folder.as_deref() else {
                continue;
            };
            report.record(record.name(), self.undeploy(folder));
        }
        info!("Remove: {report}");
        self.rescan_after(&mut report);
        report
    }

    fn undeploy(&self, folder: &Path) -> Result<()> {
        if self.roots.is_root(folder) {
            return Err(ShelfError::ActionRefused(format!(
                "{} is a Start Menu root",
                folder.display()
            )));
        }
        std::fs::remove_dir_all(folder)?;
        info!("Removed {}", folder.display());
        Ok(())
    }

    /// Open the folder of the record at `index` in the file manager
    pub fn open_app_folder(&self, index: usize) -> Result<()> {
        let record = self
            .records
            .get(index)
            .ok_or_else(|| ShelfError::ActionRefused(format!("no app #{index}")))?;
        open::that(record.app_root())?;
        Ok(())
    }
}

/// Resolve a possibly nested Start Menu folder name below `root`
///
/// Absolute names and `.`/`..` components are refused so the result always
/// lies strictly inside `root`.
fn menu_folder(root: &Path, name: &str) -> Result<PathBuf> {
    let mut folder = root.to_path_buf();
    let mut depth = 0;
    for part in name.split(['\\', '/']).map(str::trim).filter(|p| !p.is_empty()) {
        let mut components = Path::new(part).components();
        match (components.next(), components.next()) {
            (Some(Component::Normal(_)), None) if !part.contains(':') => {
                folder.push(part);
                depth += 1;
            }
            _ => {
                return Err(ShelfError::ActionRefused(format!(
                    "invalid Start Menu folder name '{name}'"
                )));
            }
        }
    }
    if depth == 0 {
        return Err(ShelfError::ActionRefused(
            "empty Start Menu folder name".to_string(),
        ));
    }
    Ok(folder)
}

/// Refuse a folder whose deployed marker belongs to another app
fn ensure_unclaimed(folder: &Path, app_name: &str) -> Result<()> {
    let marker_path = folder.join(DEPLOYED_MARKER_NAME);
    if !marker_path.exists() {
        return Ok(());
    }
    match MarkerStore::load(&marker_path) {
        Ok(marker) if marker.app_name == app_name => Ok(()),
        Ok(marker) => Err(ShelfError::ActionRefused(format!(
            "{} already holds the shortcuts of {}",
            folder.display(),
            marker.app_name
        ))),
        Err(e) => Err(ShelfError::ActionRefused(format!(
            "{} holds an unreadable marker: {e}",
            folder.display()
        ))),
    }
}

fn remove_links_in(folder: &Path) -> Result<()> {
    if !folder.is_dir() {
        return Ok(());
    }
    for entry in std::fs::read_dir(folder)? {
        let path = entry?.path();
        let is_link = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("lnk"));
        if !is_link {
            continue;
        }
        if path.is_file() {
            std::fs::remove_file(&path)?;
            debug!("Removed stale {}", path.display());
        } else {
            warn!("Not a file, left in place: {}", path.display());
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::DisplayState;
    use crate::registry::MemoryRegistry;
    use crate::shortcuts::{ShortcutLink, ShortcutScope};
    use crate::test_utils::create_test_dir;
    use tempfile::TempDir;

    /// Writes the resolved link as text instead of a real `.lnk`
    struct TextLinks;

    impl ShortcutLinks for TextLinks {
        fn read(&self, path: &Path) -> Result<ShortcutLink> {
            Err(ShelfError::ActionRefused(path.display().to_string()))
        }

        fn write(&self, path: &Path, link: &ShortcutLink) -> Result<()> {
            std::fs::write(path, format!("{}|{}", link.target, link.arguments))?;
            Ok(())
        }
    }

    const FOO_MARKER: &str = r#"{
        "appName": "Foo",
        "appVersion": "1.0",
        "appGroup": "Tools",
        "appStartMenuFolderName": "Foo Suite",
        "shortcuts": [
            { "name": "Foo", "target": "[.app_path]\\foo.exe", "arguments": "--data \"[.app_path]\\data\"" }
        ]
    }"#;

    struct Fixture {
        dir: TempDir,
        controller: AppController,
    }

    impl Fixture {
        fn new() -> Self {
            let dir = create_test_dir();
            let apps = dir.path().join("apps");
            std::fs::create_dir_all(apps.join("Foo")).unwrap();
            std::fs::write(apps.join("Foo").join("foo.app"), FOO_MARKER).unwrap();
            std::fs::create_dir_all(apps.join("Bar")).unwrap();
            std::fs::write(apps.join("Bar").join("bar.app"), r#"{"appName":"Bar"}"#).unwrap();

            let user_menu = dir.path().join("user");
            std::fs::create_dir_all(&user_menu).unwrap();
            let roots = StartMenuRoots {
                all_users: Some(dir.path().join("machine")),
                current_user: Some(user_menu),
            };
            let probe = RegistryProbe::new(
                Box::new(MemoryRegistry::default()),
                Box::new(MemoryRegistry::default()),
            );

            let mut controller = AppController::new(
                AppConfig::default(),
                apps,
                roots,
                probe,
                Box::new(TextLinks),
                TokenContext::default(),
            );
            controller.rescan().unwrap();
            Self { dir, controller }
        }

        fn index_of(&self, name: &str) -> usize {
            self.controller
                .records()
                .iter()
                .position(|r| r.name() == name)
                .unwrap()
        }

        fn check(&mut self, name: &str) {
            let rows = self.controller.view().tree().rows();
            let id = rows.iter().find(|row| row.label == name).unwrap().id;
            self.controller.toggle(id);
        }

        fn state(&self, name: &str) -> DisplayState {
            self.controller.records()[self.index_of(name)]
                .status
                .display_state()
        }

        fn foo_folder(&self) -> PathBuf {
            self.dir.path().join("user").join("Foo Suite")
        }
    }

    #[test]
    fn test_add_creates_links_and_marker_copy() {
        let mut fixture = Fixture::new();
        assert_eq!(fixture.state("Foo"), DisplayState::PortableUnused);

        fixture.check("Foo");
        assert!(fixture.controller.availability().add_or_update);
        let report = fixture.controller.add_or_update_selected();
        assert_eq!(report.succeeded, ["Foo"]);

        let folder = fixture.foo_folder();
        let app_root = fixture.dir.path().join("apps").join("Foo");
        let app_root = crate::paths::normalize_path(&app_root.to_string_lossy());
        let link = std::fs::read_to_string(folder.join("Foo.lnk")).unwrap();
        assert_eq!(link, format!("{app_root}\\foo.exe|--data \"{app_root}\\data\""));
        assert!(folder.join(".app").is_file());
        assert_eq!(fixture.state("Foo"), DisplayState::Synced);
        assert_eq!(
            fixture.controller.records()[fixture.index_of("Foo")]
                .status
                .shortcut_scope,
            Some(ShortcutScope::CurrentUser)
        );
    }

    #[test]
    fn test_refresh_replaces_stale_links() {
        let mut fixture = Fixture::new();
        let folder = fixture.foo_folder();
        std::fs::create_dir_all(&folder).unwrap();
        std::fs::write(folder.join("Old.lnk"), "old").unwrap();
        std::fs::write(folder.join("notes.txt"), "keep").unwrap();
        std::fs::write(folder.join(".app"), r#"{"appName":"Foo","appVersion":"0.9"}"#).unwrap();
        fixture.controller.rescan().unwrap();
        assert_eq!(fixture.state("Foo"), DisplayState::Drifted);

        fixture.check("Foo");
        let report = fixture.controller.add_or_update_selected();
        assert!(report.failed.is_empty());
        assert!(!folder.join("Old.lnk").exists());
        assert!(folder.join("Foo.lnk").exists());
        assert!(folder.join("notes.txt").exists());
        assert_eq!(fixture.state("Foo"), DisplayState::Synced);
    }

    #[test]
    fn test_synced_apps_are_skipped() {
        let mut fixture = Fixture::new();
        fixture.check("Foo");
        fixture.controller.add_or_update_selected();

        fixture.check("Foo");
        assert!(!fixture.controller.availability().add_or_update);
        let report = fixture.controller.add_or_update_selected();
        assert!(report.is_empty());
    }

    #[test]
    fn test_remove_deletes_folder() {
        let mut fixture = Fixture::new();
        fixture.check("Foo");
        fixture.controller.add_or_update_selected();

        fixture.check("Foo");
        assert!(fixture.controller.availability().remove);
        let report = fixture.controller.remove_selected();
        assert_eq!(report.succeeded, ["Foo"]);
        assert!(!fixture.foo_folder().exists());
        assert_eq!(fixture.state("Foo"), DisplayState::PortableUnused);
    }

    #[test]
    fn test_remove_refuses_start_menu_root() {
        let mut fixture = Fixture::new();
        let root = fixture.dir.path().join("user");
        std::fs::copy(
            fixture.dir.path().join("apps").join("Bar").join("bar.app"),
            root.join(".app"),
        )
        .unwrap();
        fixture.controller.rescan().unwrap();
        assert_eq!(fixture.state("Bar"), DisplayState::Synced);

        fixture.check("Bar");
        let report = fixture.controller.remove_selected();
        assert_eq!(report.failed.len(), 1);
        assert!(root.join(".app").exists());
    }

    #[test]
    fn test_refresh_refuses_start_menu_root() {
        let mut fixture = Fixture::new();
        let root = fixture.dir.path().join("user");
        std::fs::write(root.join(".app"), r#"{"appName":"Foo","appVersion":"0.9"}"#).unwrap();
        std::fs::write(root.join("Unrelated Installed App.lnk"), "foreign").unwrap();
        fixture.controller.rescan().unwrap();
        assert_eq!(fixture.state("Foo"), DisplayState::Drifted);

        fixture.check("Foo");
        let report = fixture.controller.add_or_update_selected();
        assert!(report.succeeded.is_empty());
        assert_eq!(report.failed.len(), 1);
        assert!(report.failed[0].reason.contains("Start Menu root"));
        assert!(root.join("Unrelated Installed App.lnk").exists());
        assert!(!root.join("Foo.lnk").exists());
        assert_eq!(fixture.state("Foo"), DisplayState::Drifted);
    }

    #[test]
    fn test_add_refuses_folder_of_another_app() {
        let mut fixture = Fixture::new();
        let folder = fixture.foo_folder();
        std::fs::create_dir_all(&folder).unwrap();
        std::fs::copy(
            fixture.dir.path().join("apps").join("Bar").join("bar.app"),
            folder.join(".app"),
        )
        .unwrap();
        fixture.controller.rescan().unwrap();
        assert_eq!(fixture.state("Bar"), DisplayState::Synced);
        assert_eq!(fixture.state("Foo"), DisplayState::PortableUnused);

        fixture.check("Foo");
        let report = fixture.controller.add_or_update_selected();
        assert_eq!(report.failed.len(), 1);
        assert!(report.failed[0].reason.contains("Bar"));
        assert!(!folder.join("Foo.lnk").exists());
        assert_eq!(fixture.state("Bar"), DisplayState::Synced);
    }

    #[test]
    fn test_add_refuses_folder_with_unreadable_marker() {
        let mut fixture = Fixture::new();
        let folder = fixture.foo_folder();
        std::fs::create_dir_all(&folder).unwrap();
        std::fs::write(folder.join(".app"), "{ not json").unwrap();
        fixture.controller.rescan().unwrap();

        fixture.check("Foo");
        let report = fixture.controller.add_or_update_selected();
        assert_eq!(report.failed.len(), 1);
        assert!(report.failed[0].reason.contains("unreadable"));
        assert!(!folder.join("Foo.lnk").exists());
    }

    #[test]
    fn test_failed_rescan_keeps_report() {
        let mut fixture = Fixture::new();
        fixture.check("Foo");
        fixture.controller.add_or_update_selected();
        assert_eq!(fixture.state("Foo"), DisplayState::Synced);

        fixture.check("Foo");
        std::fs::remove_dir_all(fixture.dir.path().join("apps")).unwrap();
        let report = fixture.controller.remove_selected();
        assert_eq!(report.succeeded, ["Foo"]);
        assert!(report.rescan_error.is_some());
        assert!(report.to_string().starts_with("1 done\nRescan failed"));
        assert!(!fixture.foo_folder().exists());
    }

    #[test]
    fn test_filter_change_keeps_status() {
        let mut fixture = Fixture::new();
        let before: Vec<_> = fixture
            .controller
            .records()
            .iter()
            .map(|r| r.status.clone())
            .collect();
        fixture.controller.set_filter(Filter::Installed);
        assert!(fixture.controller.view().tree().is_empty());
        fixture.controller.set_filter(Filter::All);
        let after: Vec<_> = fixture
            .controller
            .records()
            .iter()
            .map(|r| r.status.clone())
            .collect();
        assert_eq!(before, after);
    }

    #[test]
    fn test_menu_folder_validation() {
        let root = Path::new("/menu");
        assert_eq!(
            menu_folder(root, "Tools\\Foo").unwrap(),
            root.join("Tools").join("Foo")
        );
        assert!(menu_folder(root, "..\\Foo").is_err());
        assert!(menu_folder(root, "C:\\Foo").is_err());
        assert!(menu_folder(root, "  ").is_err());
    }

    #[test]
    fn test_report_display() {
        let mut report = ActionReport::default();
        assert_eq!(report.to_string(), "Nothing to do");
        report.record("Foo", Ok(()));
        report.record("Bar", Err(ShelfError::ActionRefused("nope".to_string())));
        assert_eq!(report.to_string(), "1 done, 1 failed\n  Bar: Action refused: nope");
    }
}
