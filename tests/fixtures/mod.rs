//! Shared test fixtures for integration tests.
#![allow(dead_code)] // Not every test binary uses every fixture

use std::fs;
use std::path::{Path, PathBuf};

use tabdash::assemble::TabContainer;
use tempfile::TempDir;

/// Path of the sample configuration shipped with the crate.
pub fn sample_config_path() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("config.toml")
}

/// Writes `content` as `config.toml` inside `dir` and returns its path.
pub fn write_config(dir: &Path, content: &str) -> PathBuf {
    let path = dir.join("config.toml");
    fs::write(&path, content).expect("Failed to write config");
    path
}

/// Creates a temporary directory holding a `config.toml` with `content`.
pub fn temp_config(content: &str) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let path = write_config(temp_dir.path(), content);
    (temp_dir, path)
}

/// A minimal but complete dashboard configuration.
///
/// The stylesheet path is relative, so callers must also create
/// `style.css` next to the written config (see [`temp_dashboard`]).
pub const DASHBOARD_CONFIG: &str = r#"
[AppSettings]
APP_VERSION = "9.9.9"
TITLE = "Test Dashboard"
CSS_PATH = "style.css"

[TabCreators]
"Main" = "app_tab"
"About" = "about_tab"

[InformationMessages]
STEP_1 = "Paste"
STEP_2 = "Choose"
NO_VACANCY = "Need a vacancy"
NO_SUBJECTS = "Need a course"
EVALUATED = "Done"

[Labels]
VACANCY = "Vacancy"
VACANCY_PLACEHOLDER = "Paste here"
SUBJECTS = "Courses"
EVALUATE = "Evaluate"
RESULTS = "Results"
SUBJECT = "Course"
SCORE = "Score"
MATCHED = "Matched"

[About]
TEXT = "<p>About this dashboard</p>"

[Subjects]
"Databases" = ["sql", "postgresql"]
"Web" = ["html", "css"]
"#;

/// Creates a temporary workspace with [`DASHBOARD_CONFIG`] and its stylesheet.
pub fn temp_dashboard() -> (TempDir, PathBuf) {
    let (temp_dir, path) = temp_config(DASHBOARD_CONFIG);
    fs::write(temp_dir.path().join("style.css"), ".custom { color: red; }\n")
        .expect("Failed to write stylesheet");
    (temp_dir, path)
}

/// Tab host that records the tabs it opens.
///
/// Each panel is the tab's title, so builders can see where they run.
#[derive(Debug, Default)]
pub struct RecordingHost {
    /// Titles of opened tabs, in order.
    pub opened: Vec<String>,
}

impl TabContainer for RecordingHost {
    type Panel = String;

    fn with_tab<R>(
        &mut self,
        title: &str,
        build: impl FnOnce(&mut String) -> anyhow::Result<R>,
    ) -> anyhow::Result<R> {
        self.opened.push(title.to_string());
        let mut panel = title.to_string();
        build(&mut panel)
    }
}
