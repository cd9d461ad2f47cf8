//! End-to-end shortcut workflows: settings file, dispatch engine and toolbar automation
//!
//! Each test loads a shortcut table from a settings document on disk, feeds key
//! presses through the engine and checks what the simulated toolbar ended up
//! clicking.

use std::time::{Duration, Instant};

use serde_json::json;
use swatchkeys_shortcut::{KeyEvent, KeyOutcome, ShortcutOptions};
use swatchkeys_toolbar::settings::{
    load_automation_config, save_shortcuts, SHORTCUTS_KEY, DEFAULT_SHORTCUTS_KEY,
};
use swatchkeys_toolbar::{
    ActionKind, FileSettingsStore, SettingsStore, ShortcutApp, ShortcutEntry, SimulatedToolbar,
    ToolbarAutomation, ToolbarClick,
};
use tempfile::TempDir;

fn automation(store: &FileSettingsStore) -> ToolbarAutomation<SimulatedToolbar> {
    let config = load_automation_config(store).expect("automation settings");
    ToolbarAutomation::new(SimulatedToolbar::new(), config)
}

fn press(app: &mut ShortcutApp, spec: &str) -> KeyOutcome {
    app.handle_key(&KeyEvent::parse(spec).expect("valid key press"))
}

/// Fresh install: no settings file, built-in table, defaults published to disk.
#[tokio::test]
async fn test_default_table_from_fresh_settings() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let path = temp_dir.path().join("swatchkeys").join("settings.json");
    let mut store = FileSettingsStore::new(&path);

    let mut app = ShortcutApp::from_settings(&mut store).expect("app from settings");
    assert!(path.exists());
    assert!(store.get_value(DEFAULT_SHORTCUTS_KEY).unwrap().is_some());
    assert!(store.get_value(SHORTCUTS_KEY).unwrap().is_none());

    let mut automation = automation(&store);

    assert!(press(&mut app, "ctrl-alt-shift-w").is_handled());
    assert_eq!(app.run_pending(&mut automation).await, 1);

    assert!(press(&mut app, "c-a-s-b").is_handled());
    assert_eq!(app.run_pending(&mut automation).await, 1);

    let toolbar = automation.toolbar();
    assert_eq!(toolbar.selected_color(), Some(1));
    assert_eq!(toolbar.selected_pen(), 2);
    assert_eq!(
        toolbar.clicks(),
        &[
            ToolbarClick::PenButton,
            ToolbarClick::SelectedPen,
            ToolbarClick::ColorSwatch(1),
            ToolbarClick::PenPreset(2),
        ]
    );
}

/// A user table with multi-key sequences replaces the built-in one.
#[tokio::test]
async fn test_user_table_with_sequences() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let mut store = FileSettingsStore::new(temp_dir.path().join("settings.yaml"));
    save_shortcuts(
        &mut store,
        &[
            ShortcutEntry::new("g c", ActionKind::SelectColor, 5),
            ShortcutEntry::new("g p", ActionKind::SelectPen, 1),
        ],
    )
    .expect("save shortcuts");

    let mut app = ShortcutApp::from_settings(&mut store).expect("app from settings");
    assert_eq!(app.bindings().len(), 2);
    let mut automation = automation(&store);

    assert_eq!(press(&mut app, "c-a-s-q"), KeyOutcome::Unmatched);
    assert_eq!(press(&mut app, "g"), KeyOutcome::Pending);
    assert!(press(&mut app, "c").is_handled());
    assert_eq!(press(&mut app, "g"), KeyOutcome::Pending);
    assert!(press(&mut app, "p").is_handled());

    assert_eq!(app.run_pending(&mut automation).await, 2);
    let toolbar = automation.toolbar();
    assert_eq!(toolbar.selected_color(), Some(5));
    assert_eq!(toolbar.selected_pen(), 1);
}

/// The sequence timeout from settings governs how long a prefix waits.
#[tokio::test]
async fn test_sequence_timeout_from_settings() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let mut store = FileSettingsStore::new(temp_dir.path().join("settings.json"));
    save_shortcuts(&mut store, &[ShortcutEntry::new("g g", ActionKind::SelectPen, 2)])
        .expect("save shortcuts");
    store
        .set_value("dispatch", json!({ "sequence_timeout_ms": 200 }))
        .expect("save dispatch settings");

    let mut app = ShortcutApp::from_settings(&mut store).expect("app from settings");
    assert_eq!(app.engine().config().sequence_timeout_ms, 200);

    let start = Instant::now();
    let g = KeyEvent::new("g");
    assert_eq!(app.handle_key_at(&g, start), KeyOutcome::Pending);
    assert_eq!(
        app.handle_key_at(&g, start + Duration::from_millis(300)),
        KeyOutcome::Pending
    );
    assert!(app
        .handle_key_at(&g, start + Duration::from_millis(450))
        .is_handled());
    assert_eq!(app.take_actions().len(), 1);
}

/// Shortcuts registered by the host next to the table obey context flags.
#[tokio::test]
async fn test_conditions_alongside_table() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let mut store = FileSettingsStore::new(temp_dir.path().join("settings.json"));
    let mut app = ShortcutApp::from_settings(&mut store).expect("app from settings");

    let fired = std::rc::Rc::new(std::cell::Cell::new(0));
    let counter = std::rc::Rc::clone(&fired);
    app.engine_mut()
        .register(
            "c-a-s-q",
            ShortcutOptions::new().condition("drawing && !editingText"),
            move || {
                counter.set(counter.get() + 1);
                Ok(())
            },
        )
        .expect("register");

    // Condition false: the table entry handles the key
    assert!(press(&mut app, "c-a-s-q").is_handled());
    assert_eq!(fired.get(), 0);
    assert_eq!(app.take_actions().len(), 1);

    // Condition true: the newer host shortcut wins
    app.engine_mut().set_context("drawing", true);
    assert!(press(&mut app, "c-a-s-q").is_handled());
    assert_eq!(fired.get(), 1);
    assert!(app.take_actions().is_empty());

    app.engine_mut().set_context("editingText", true);
    assert!(press(&mut app, "c-a-s-q").is_handled());
    assert_eq!(fired.get(), 1);
    assert_eq!(app.take_actions().len(), 1);
}
