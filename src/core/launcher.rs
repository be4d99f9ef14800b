use anyhow::Result;

use crate::core::editor::EditorState;
use crate::shared::constants;

/// Wizard-driven entry point: run the setup menu, then the session.
pub fn run() -> Result<()> {
    let Some(selection) = crate::ui::menu::run_menu()? else {
        println!("Menu cancelled.");
        return Ok(());
    };

    crate::utils::logger::info(&format!(
        "launch selection: map={} size={}",
        selection.path.display(),
        selection
            .dimensions
            .map(|(w, h)| format!("{}x{}", w, h))
            .unwrap_or_else(|| "<from file>".to_string())
    ));

    crate::ui::menu::remember_last_map(&selection.path);

    let fallback = selection.dimensions.unwrap_or((
        constants::DEFAULT_MAP_WIDTH,
        constants::DEFAULT_MAP_HEIGHT,
    ));
    let state = EditorState::open(&selection.path, fallback)?;

    crate::ui::session::run_editor(state)?;

    Ok(())
}
