//! End-to-end tests for resolving `[TabCreators]` and assembling tabs.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use tabdash::{
    assemble, assemble_and_wire, resolve, resolve_file, AssembleError, CallableRegistry,
    ResolveError, Settings, UnknownBuilderError,
};

use tabdash::ui::{textbox, Blocks, Panel};

mod fixtures;
use fixtures::{temp_config, RecordingHost};

type Handles = (&'static str, &'static str);

fn settings(src: &str) -> Settings {
    Settings::from_str_with_origin(src, "test").unwrap()
}

/// Builders that return their own panel name as the first handle.
fn echo_registry(names: &[&'static str]) -> CallableRegistry<String, Vec<String>> {
    let mut registry = CallableRegistry::new();
    for &name in names {
        registry
            .register(name, move |panel: &mut String| {
                Ok(vec![panel.clone(), name.to_string()])
            })
            .unwrap();
    }
    registry
}

#[test]
fn test_main_tab_handles_reach_wiring() {
    let (_temp_dir, path) = temp_config("[TabCreators]\n\"Main\" = \"main_tab\"\n");

    let mut registry: CallableRegistry<String, Handles> = CallableRegistry::new();
    registry
        .register("main_tab", |_: &mut String| Ok(("widgetA", "widgetB")))
        .unwrap();

    let plan = resolve_file(&path, &registry).unwrap();
    let mut host = RecordingHost::default();
    let mut wired = None;

    let results = assemble_and_wire(&plan, &mut host, |_, &(a, b)| {
        wired = Some((a, b));
        Ok(())
    })
    .unwrap();

    assert_eq!(
        results.into_inner(),
        vec![("Main".to_string(), ("widgetA", "widgetB"))]
    );
    assert_eq!(wired, Some(("widgetA", "widgetB")));
    assert_eq!(host.opened, vec!["Main"]);
}

#[test]
fn test_declaration_order_is_preserved() {
    let settings = settings(
        r#"
[TabCreators]
"Zeta" = "c_tab"
"Alpha" = "a_tab"
"Mid" = "b_tab"
"#,
    );
    let registry = echo_registry(&["a_tab", "b_tab", "c_tab"]);

    let plan = resolve(&settings, &registry).unwrap();
    assert_eq!(plan.tab_names(), vec!["Zeta", "Alpha", "Mid"]);

    let mut host = RecordingHost::default();
    let results = assemble(&plan, &mut host).unwrap();

    assert_eq!(results.tab_names(), vec!["Zeta", "Alpha", "Mid"]);
    assert_eq!(host.opened, vec!["Zeta", "Alpha", "Mid"]);
    // Each builder ran inside its own tab.
    assert_eq!(
        results.get("Alpha"),
        Some(&vec!["Alpha".to_string(), "a_tab".to_string()])
    );
}

#[test]
fn test_same_builder_under_two_titles() {
    let settings = settings("[TabCreators]\nOne = \"a_tab\"\nTwo = \"a_tab\"\n");
    let registry = echo_registry(&["a_tab"]);

    let plan = resolve(&settings, &registry).unwrap();
    let results = assemble(&plan, &mut RecordingHost::default()).unwrap();

    assert_eq!(results.len(), 2);
    assert_eq!(results.first().map(|(name, _)| name), Some("One"));
}

#[test]
fn test_unknown_builder_rejects_whole_plan() {
    let settings = settings(
        r#"
[TabCreators]
"Known" = "a_tab"
"Broken" = "nonexistent_tab"
"#,
    );
    let registry = echo_registry(&["a_tab"]);

    let err = resolve(&settings, &registry).unwrap_err();

    match err {
        ResolveError::UnknownBuilder(UnknownBuilderError { tab, builder }) => {
            assert_eq!(tab, "Broken");
            assert_eq!(builder, "nonexistent_tab");
        }
        other => panic!("expected unknown builder, got {other:?}"),
    }
}

#[test]
fn test_empty_tab_creators_has_no_first_tab() {
    let settings = settings("[TabCreators]\n");
    let registry = echo_registry(&["a_tab"]);

    let plan = resolve(&settings, &registry).unwrap();
    assert!(plan.is_empty());

    let mut host = RecordingHost::default();
    let results = assemble(&plan, &mut host).unwrap();
    assert!(results.is_empty());

    let mut wiring_called = false;
    let err = assemble_and_wire(&plan, &mut host, |_, _| {
        wiring_called = true;
        Ok(())
    })
    .unwrap_err();

    assert!(matches!(err, AssembleError::MissingFirstTab(_)));
    assert!(!wiring_called);
    assert!(host.opened.is_empty());
}

#[test]
fn test_missing_tab_creators_section_is_empty_plan() {
    let settings = settings("[Labels]\nTITLE = \"x\"\n");
    let registry = echo_registry(&["a_tab"]);

    let plan = resolve(&settings, &registry).unwrap();

    assert!(plan.is_empty());
}

#[test]
fn test_failing_builder_stops_assembly() {
    let calls = Arc::new(AtomicUsize::new(0));
    let mut registry: CallableRegistry<String, ()> = CallableRegistry::new();

    let counter = Arc::clone(&calls);
    registry
        .register("ok_tab", move |_: &mut String| {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(())
        })
        .unwrap();
    registry
        .register("failing_tab", |_: &mut String| anyhow::bail!("no data source"))
        .unwrap();

    let settings = settings(
        r#"
[TabCreators]
"First" = "ok_tab"
"Second" = "failing_tab"
"Third" = "ok_tab"
"#,
    );
    let plan = resolve(&settings, &registry).unwrap();

    let err = assemble(&plan, &mut RecordingHost::default()).unwrap_err();

    match &err {
        AssembleError::Builder { tab, .. } => assert_eq!(tab, "Second"),
        other => panic!("expected builder failure, got {other:?}"),
    }
    assert!(err.to_string().contains("no data source"));
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[test]
fn test_failing_builder_leaves_no_partial_tab() {
    let mut registry: CallableRegistry<Panel, ()> = CallableRegistry::new();
    registry
        .register("ok_tab", |panel: &mut Panel| {
            panel.add(textbox());
            Ok(())
        })
        .unwrap();
    registry
        .register("failing_tab", |panel: &mut Panel| {
            panel.add(textbox());
            anyhow::bail!("no data source")
        })
        .unwrap();

    let settings = settings("[TabCreators]\nFirst = \"ok_tab\"\nSecond = \"failing_tab\"\n");
    let plan = resolve(&settings, &registry).unwrap();
    let mut blocks = Blocks::new("Test");

    assert!(assemble(&plan, &mut blocks).is_err());

    let titles: Vec<&str> = blocks.tabs().iter().map(|t| t.title.as_str()).collect();
    assert_eq!(titles, vec!["First"]);
    assert_eq!(blocks.tabs()[0].children.len(), 1);
}

#[test]
fn test_wiring_failure_names_first_tab() {
    let settings = settings("[TabCreators]\nMain = \"a_tab\"\nOther = \"a_tab\"\n");
    let registry = echo_registry(&["a_tab"]);
    let plan = resolve(&settings, &registry).unwrap();

    let err = assemble_and_wire(&plan, &mut RecordingHost::default(), |_, handles| {
        anyhow::bail!("expected 3 handles, got {}", handles.len())
    })
    .unwrap_err();

    assert!(matches!(err, AssembleError::Wiring { ref tab, .. } if tab == "Main"));
}

#[test]
fn test_resolve_file_reports_config_errors() {
    let temp_dir = tempfile::TempDir::new().unwrap();
    let registry = echo_registry(&["a_tab"]);

    let err = resolve_file(temp_dir.path().join("missing.toml"), &registry).unwrap_err();

    assert!(matches!(err, ResolveError::Config(_)));
}
