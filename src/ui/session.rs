use anyhow::Result;
use crossterm::event::{self, Event, KeyEventKind};

use crate::core::editor::{EditorCommand, EditorState, Outcome};
use crate::renderer::cell::ScreenCell;
use crate::renderer::{DisplayManager, FrameComposer};
use crate::utils::{logger, terminal_control};

/// One step of session input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    Command(EditorCommand),
    /// Terminal geometry changed, repaint everything.
    Redraw,
}

/// Capability "read one key event, blocking". The terminal implementation
/// wraps crossterm; tests drive the loop with a scripted feed instead.
pub trait KeyFeed {
    fn next_event(&mut self) -> Result<SessionEvent>;
}

pub struct TerminalKeys;

impl KeyFeed for TerminalKeys {
    fn next_event(&mut self) -> Result<SessionEvent> {
        loop {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    return Ok(SessionEvent::Command(EditorCommand::from_key(key.code)));
                }
                Event::Resize(_, _) => return Ok(SessionEvent::Redraw),
                _ => {}
            }
        }
    }
}

/// Where composed frames go. `DisplayManager` is the real sink.
pub trait FrameSink {
    fn present(&mut self, cells: &[ScreenCell], width: usize) -> Result<()>;
    fn invalidate(&mut self) {}
}

impl FrameSink for DisplayManager {
    fn present(&mut self, cells: &[ScreenCell], width: usize) -> Result<()> {
        self.render_diff(cells, width)
    }

    fn invalidate(&mut self) {
        self.force_redraw();
    }
}

/// Run the editing session on the real terminal.
pub fn run_editor(state: EditorState) -> Result<()> {
    let composer = FrameComposer::new(&state);

    // Grow the window first when the frame does not fit.
    let (cols, rows) = crossterm::terminal::size().unwrap_or((80, 24));
    if composer.width > cols as usize || composer.height > rows as usize {
        logger::debug(&format!(
            "frame {}x{} exceeds terminal {}x{}, requesting resize",
            composer.width, composer.height, cols, rows
        ));
        terminal_control::request_resize(composer.width as u16, composer.height as u16);
        std::thread::sleep(std::time::Duration::from_millis(150));
    }

    logger::info(&format!(
        "session start: {} ({}x{})",
        state.path().display(),
        state.grid.width(),
        state.grid.height()
    ));

    let mut display = DisplayManager::new()?;
    let result = run_loop(state, &mut TerminalKeys, &mut display);

    if let Err(e) = &result {
        logger::error(&format!("session error: {}", e));
    }
    result
}

/// The read-mutate-render loop: compose, present, block on one key,
/// apply. The quit command persists the grid and ends the session.
pub fn run_loop<F: KeyFeed, S: FrameSink>(
    mut state: EditorState,
    feed: &mut F,
    sink: &mut S,
) -> Result<()> {
    let composer = FrameComposer::new(&state);
    let mut cells = vec![ScreenCell::default(); composer.cell_count()];

    loop {
        composer.compose_into(&state, &mut cells);
        sink.present(&cells, composer.width)?;

        match feed.next_event()? {
            SessionEvent::Redraw => sink.invalidate(),
            SessionEvent::Command(cmd) => {
                if state.apply(cmd) == Outcome::Quit {
                    state.save()?;
                    logger::info(&format!("saved {}", state.path().display()));
                    return Ok(());
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::grid::MapGrid;
    use std::fs;

    struct ScriptedFeed {
        events: std::vec::IntoIter<SessionEvent>,
    }

    impl ScriptedFeed {
        fn new(events: Vec<SessionEvent>) -> Self {
            Self {
                events: events.into_iter(),
            }
        }
    }

    impl KeyFeed for ScriptedFeed {
        fn next_event(&mut self) -> Result<SessionEvent> {
            Ok(self.events.next().expect("script ran out of events"))
        }
    }

    #[derive(Default)]
    struct RecordingSink {
        frames: Vec<Vec<ScreenCell>>,
        invalidations: usize,
    }

    impl FrameSink for RecordingSink {
        fn present(&mut self, cells: &[ScreenCell], _width: usize) -> Result<()> {
            self.frames.push(cells.to_vec());
            Ok(())
        }

        fn invalidate(&mut self) {
            self.invalidations += 1;
        }
    }

    #[test]
    fn test_scripted_session_saves_on_quit() {
        let path = std::env::temp_dir().join(format!("tiledit_loop_{}.map", std::process::id()));
        let state = EditorState::new(MapGrid::blank(3, 2), path.clone());

        let mut feed = ScriptedFeed::new(vec![
            SessionEvent::Command(EditorCommand::CycleNext),
            SessionEvent::Command(EditorCommand::Quit),
        ]);
        let mut sink = RecordingSink::default();

        run_loop(state, &mut feed, &mut sink).unwrap();

        assert_eq!(sink.frames.len(), 2);
        assert_eq!(fs::read_to_string(&path).unwrap(), "000\n010");
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_noop_keys_leave_the_frame_unchanged() {
        let path = std::env::temp_dir().join(format!("tiledit_noop_{}.map", std::process::id()));
        let state = EditorState::new(MapGrid::blank(3, 2), path.clone());

        let mut feed = ScriptedFeed::new(vec![
            SessionEvent::Command(EditorCommand::Noop),
            SessionEvent::Command(EditorCommand::Quit),
        ]);
        let mut sink = RecordingSink::default();

        run_loop(state, &mut feed, &mut sink).unwrap();

        assert_eq!(sink.frames.len(), 2);
        assert_eq!(sink.frames[0], sink.frames[1]);
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_redraw_event_invalidates_the_sink() {
        let path = std::env::temp_dir().join(format!("tiledit_rs_{}.map", std::process::id()));
        let state = EditorState::new(MapGrid::blank(2, 2), path.clone());

        let mut feed = ScriptedFeed::new(vec![
            SessionEvent::Redraw,
            SessionEvent::Command(EditorCommand::Quit),
        ]);
        let mut sink = RecordingSink::default();

        run_loop(state, &mut feed, &mut sink).unwrap();

        assert_eq!(sink.invalidations, 1);
        let _ = fs::remove_file(&path);
    }
}
