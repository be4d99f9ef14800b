use anyhow::{Context, Result};
use crossterm::event::KeyCode;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use super::codec;
use super::grid::{Cursor, MapGrid};
use super::palette::{self, TileKind};

/// One editing action, decoupled from the keyboard that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorCommand {
    MoveUp,
    MoveDown,
    MoveLeft,
    MoveRight,
    CyclePrev,
    CycleNext,
    Quit,
    Noop,
}

impl EditorCommand {
    /// Session key map: wasd moves (arrows alias them), z/x cycles the
    /// tile under the cursor, q saves and quits. Everything else is a noop.
    pub fn from_key(code: KeyCode) -> Self {
        match code {
            KeyCode::Char('w') | KeyCode::Up => EditorCommand::MoveUp,
            KeyCode::Char('s') | KeyCode::Down => EditorCommand::MoveDown,
            KeyCode::Char('a') | KeyCode::Left => EditorCommand::MoveLeft,
            KeyCode::Char('d') | KeyCode::Right => EditorCommand::MoveRight,
            KeyCode::Char('z') => EditorCommand::CyclePrev,
            KeyCode::Char('x') => EditorCommand::CycleNext,
            KeyCode::Char('q') => EditorCommand::Quit,
            _ => EditorCommand::Noop,
        }
    }
}

/// What the loop should do after a command was applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Continue,
    Quit,
}

/// The whole session state: grid, cursor and target path. One of these is
/// created per session and threaded through the loop explicitly.
#[derive(Debug, Clone)]
pub struct EditorState {
    pub grid: MapGrid,
    pub cursor: Cursor,
    path: PathBuf,
}

impl EditorState {
    pub fn new(grid: MapGrid, path: PathBuf) -> Self {
        let cursor = Cursor::centered(&grid);
        Self { grid, cursor, path }
    }

    /// Open `path`, decoding it if present and non-empty. A missing or
    /// empty file falls back to a blank grid of `fallback` dimensions.
    pub fn open(path: &Path, fallback: (u16, u16)) -> Result<Self> {
        let grid = match fs::read_to_string(path) {
            Ok(text) if text.is_empty() => blank(fallback),
            Ok(text) => codec::decode(&text)
                .with_context(|| format!("failed to parse map {}", path.display()))?,
            Err(e) if e.kind() == ErrorKind::NotFound => blank(fallback),
            Err(e) => {
                return Err(e).with_context(|| format!("failed to read map {}", path.display()))
            }
        };

        let mut state = Self::new(grid, path.to_path_buf());
        let clamped = state.grid.clamp_to_palette();
        if clamped > 0 {
            crate::utils::logger::info(&format!(
                "{}: clamped {} cell(s) to the palette",
                path.display(),
                clamped
            ));
        }
        Ok(state)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The tile kind under the cursor, for the status line.
    pub fn selected(&self) -> &'static TileKind {
        palette::kind(self.grid.get(self.cursor.x, self.cursor.y))
    }

    /// Apply one command. Pure state transition, no I/O.
    pub fn apply(&mut self, cmd: EditorCommand) -> Outcome {
        match cmd {
            EditorCommand::MoveUp => self.cursor.move_up(),
            EditorCommand::MoveDown => self.cursor.move_down(&self.grid),
            EditorCommand::MoveLeft => self.cursor.move_left(),
            EditorCommand::MoveRight => self.cursor.move_right(&self.grid),
            EditorCommand::CyclePrev => {
                let id = self.grid.get(self.cursor.x, self.cursor.y);
                self.grid.set(self.cursor.x, self.cursor.y, palette::prev(id));
            }
            EditorCommand::CycleNext => {
                let id = self.grid.get(self.cursor.x, self.cursor.y);
                self.grid.set(self.cursor.x, self.cursor.y, palette::next(id));
            }
            EditorCommand::Quit => return Outcome::Quit,
            EditorCommand::Noop => {}
        }
        Outcome::Continue
    }

    /// Serialize the grid to the target path, truncating prior contents.
    pub fn save(&self) -> Result<()> {
        fs::write(&self.path, codec::encode(&self.grid))
            .with_context(|| format!("failed to write map {}", self.path.display()))
    }
}

fn blank(dims: (u16, u16)) -> MapGrid {
    MapGrid::blank(dims.0 as usize, dims.1 as usize)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state(width: usize, height: usize) -> EditorState {
        EditorState::new(MapGrid::blank(width, height), PathBuf::from("test.map"))
    }

    #[test]
    fn test_moves_change_one_axis_by_one() {
        let mut s = state(5, 5);
        let before = s.grid.clone();

        s.apply(EditorCommand::MoveUp);
        assert_eq!((s.cursor.x, s.cursor.y), (2, 1));
        s.apply(EditorCommand::MoveDown);
        assert_eq!((s.cursor.x, s.cursor.y), (2, 2));
        s.apply(EditorCommand::MoveLeft);
        assert_eq!((s.cursor.x, s.cursor.y), (1, 2));
        s.apply(EditorCommand::MoveRight);
        assert_eq!((s.cursor.x, s.cursor.y), (2, 2));

        assert_eq!(s.grid, before, "movement must not touch the grid");
    }

    #[test]
    fn test_moves_stop_at_the_border() {
        let mut s = state(2, 2);
        for _ in 0..5 {
            s.apply(EditorCommand::MoveUp);
            s.apply(EditorCommand::MoveLeft);
        }
        assert_eq!((s.cursor.x, s.cursor.y), (0, 0));

        for _ in 0..5 {
            s.apply(EditorCommand::MoveDown);
            s.apply(EditorCommand::MoveRight);
        }
        assert_eq!((s.cursor.x, s.cursor.y), (1, 1));
    }

    #[test]
    fn test_cycle_edits_the_cell_under_the_cursor() {
        let mut s = state(3, 3);
        s.apply(EditorCommand::CycleNext);
        assert_eq!(s.grid.get(1, 1), 1);
        s.apply(EditorCommand::CyclePrev);
        s.apply(EditorCommand::CyclePrev);
        assert_eq!(s.grid.get(1, 1), palette::max_id());
        assert_eq!(s.grid.get(0, 0), 0);
    }

    #[test]
    fn test_quit_outcome() {
        let mut s = state(2, 2);
        assert_eq!(s.apply(EditorCommand::Noop), Outcome::Continue);
        assert_eq!(s.apply(EditorCommand::Quit), Outcome::Quit);
    }

    #[test]
    fn test_key_map() {
        assert_eq!(EditorCommand::from_key(KeyCode::Char('w')), EditorCommand::MoveUp);
        assert_eq!(EditorCommand::from_key(KeyCode::Up), EditorCommand::MoveUp);
        assert_eq!(EditorCommand::from_key(KeyCode::Char('x')), EditorCommand::CycleNext);
        assert_eq!(EditorCommand::from_key(KeyCode::Char('q')), EditorCommand::Quit);
        assert_eq!(EditorCommand::from_key(KeyCode::Enter), EditorCommand::Noop);
        assert_eq!(EditorCommand::from_key(KeyCode::Char('p')), EditorCommand::Noop);
    }

    #[test]
    fn test_open_missing_file_falls_back_to_blank() {
        let path = std::env::temp_dir().join(format!("tiledit_open_{}.map", std::process::id()));
        let _ = fs::remove_file(&path);

        let s = EditorState::open(&path, (3, 2)).unwrap();
        assert_eq!(s.grid.width(), 3);
        assert_eq!(s.grid.height(), 2);
        assert_eq!((s.cursor.x, s.cursor.y), (1, 1));
    }

    #[test]
    fn test_save_scenario_three_by_two() {
        let path = std::env::temp_dir().join(format!("tiledit_save_{}.map", std::process::id()));
        let mut s = EditorState::new(MapGrid::blank(3, 2), path.clone());

        assert_eq!((s.cursor.x, s.cursor.y), (1, 1));
        s.apply(EditorCommand::CycleNext);
        assert_eq!(s.apply(EditorCommand::Quit), Outcome::Quit);
        s.save().unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "000\n010");
        let _ = fs::remove_file(&path);
    }
}
