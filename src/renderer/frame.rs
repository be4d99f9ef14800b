use super::cell::{CellStyle, ScreenCell};
use crate::core::editor::EditorState;
use crate::core::palette;
use crate::shared::constants;

/// Composes the visible frame for an editor state: title bar, bordered
/// glyph rows with the cursor cell highlighted, a separator and the
/// status line. Pure output; composing never touches the state.
pub struct FrameComposer {
    pub width: usize,
    pub height: usize,
    title: String,
}

impl FrameComposer {
    pub fn new(state: &EditorState) -> Self {
        let name = state
            .path()
            .file_name()
            .map(|f| f.to_string_lossy().to_string())
            .unwrap_or_else(|| state.path().to_string_lossy().to_string());
        let title = format!("-| {} |-", name);

        let inner = state.grid.width() * constants::GLYPH_WIDTH;
        let row_width = inner + 2;
        let bar = title_bar_dashes(inner, &title);
        let title_width = bar * 2 + title.chars().count();

        // Rows: title, one per grid row, separator, status.
        let height = state.grid.height() + 3;
        let width = row_width.max(title_width).max(status_width());

        Self { width, height, title }
    }

    pub fn cell_count(&self) -> usize {
        self.width * self.height
    }

    /// Fill `cells` with the frame for `state`. The buffer is reused
    /// between iterations and must hold exactly `cell_count()` cells.
    pub fn compose_into(&self, state: &EditorState, cells: &mut [ScreenCell]) {
        if cells.len() != self.cell_count() {
            return;
        }
        cells.fill(ScreenCell::default());

        let grid = &state.grid;
        let inner = grid.width() * constants::GLYPH_WIDTH;

        // Title bar.
        let bar = title_bar_dashes(inner, &self.title);
        let mut x = 0;
        for _ in 0..bar {
            x = self.put(cells, 0, x, '-', CellStyle::Normal);
        }
        for ch in self.title.chars() {
            x = self.put(cells, 0, x, ch, CellStyle::Normal);
        }
        for _ in 0..bar {
            x = self.put(cells, 0, x, '-', CellStyle::Normal);
        }

        // Bordered glyph rows.
        for y in 0..grid.height() {
            let row = y + 1;
            let mut x = self.put(cells, row, 0, '|', CellStyle::Normal);
            for gx in 0..grid.width() {
                let style = if gx == state.cursor.x && y == state.cursor.y {
                    CellStyle::Highlight
                } else {
                    CellStyle::Normal
                };
                for ch in palette::kind(grid.get(gx, y)).glyph.chars() {
                    x = self.put(cells, row, x, ch, style);
                }
            }
            self.put(cells, row, x, '|', CellStyle::Normal);
        }

        // Separator.
        let sep_row = grid.height() + 1;
        for x in 0..inner + 2 {
            self.put(cells, sep_row, x, '-', CellStyle::Normal);
        }

        // Status line: glyph and name of the tile under the cursor.
        let status_row = grid.height() + 2;
        let tile = state.selected();
        let status = format!("{}  -  {}", tile.glyph, tile.name);
        for (x, ch) in status.chars().enumerate() {
            self.put(cells, status_row, x, ch, CellStyle::Normal);
        }
    }

    fn put(&self, cells: &mut [ScreenCell], row: usize, x: usize, ch: char, style: CellStyle) -> usize {
        if x < self.width {
            cells[row * self.width + x] = ScreenCell { ch, style };
        }
        x + 1
    }
}

/// Dash run on each side of the framed file name. Matches the historical
/// layout: map width minus half the title length, floored at zero.
fn title_bar_dashes(inner_width: usize, title: &str) -> usize {
    inner_width.saturating_sub(title.chars().count() / 2)
}

fn status_width() -> usize {
    palette::PALETTE
        .iter()
        .map(|t| constants::GLYPH_WIDTH + 5 + t.name.chars().count())
        .max()
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::editor::EditorCommand;
    use crate::core::grid::MapGrid;
    use std::path::PathBuf;

    fn compose(state: &EditorState) -> (FrameComposer, Vec<ScreenCell>) {
        let composer = FrameComposer::new(state);
        let mut cells = vec![ScreenCell::default(); composer.cell_count()];
        composer.compose_into(state, &mut cells);
        (composer, cells)
    }

    fn row_text(cells: &[ScreenCell], width: usize, row: usize) -> String {
        cells[row * width..(row + 1) * width]
            .iter()
            .map(|c| c.ch)
            .collect()
    }

    #[test]
    fn test_compose_is_idempotent() {
        let state = EditorState::new(MapGrid::blank(4, 3), PathBuf::from("ship.map"));
        let (composer, first) = compose(&state);

        let mut second = vec![ScreenCell::default(); composer.cell_count()];
        composer.compose_into(&state, &mut second);
        assert_eq!(first, second);
    }

    #[test]
    fn test_title_bar_frames_the_file_name() {
        let state = EditorState::new(MapGrid::blank(10, 2), PathBuf::from("maps/ship.map"));
        let (composer, cells) = compose(&state);

        let title = row_text(&cells, composer.width, 0);
        assert!(title.contains("-| ship.map |-"), "got {:?}", title);
        assert!(title.starts_with('-'));
    }

    #[test]
    fn test_rows_are_bordered_and_highlighted() {
        let mut state = EditorState::new(MapGrid::blank(3, 2), PathBuf::from("a.map"));
        state.apply(EditorCommand::CycleNext);
        let (composer, cells) = compose(&state);

        // Cursor is at (1, 1): frame row 2, columns 1 + 1*GLYPH_WIDTH ..
        let row = 2;
        let start = 1 + constants::GLYPH_WIDTH;
        for x in start..start + constants::GLYPH_WIDTH {
            assert_eq!(cells[row * composer.width + x].style, CellStyle::Highlight);
        }
        assert_eq!(cells[row * composer.width].ch, '|');
        assert_eq!(cells[row * composer.width + 1].style, CellStyle::Normal);
    }

    #[test]
    fn test_status_line_names_the_selected_tile() {
        let mut state = EditorState::new(MapGrid::blank(3, 3), PathBuf::from("a.map"));
        state.apply(EditorCommand::CycleNext);
        let (composer, cells) = compose(&state);

        let status = row_text(&cells, composer.width, composer.height - 1);
        assert!(status.contains("Oxygen"), "got {:?}", status);
    }

    #[test]
    fn test_separator_spans_the_row_width() {
        let state = EditorState::new(MapGrid::blank(5, 2), PathBuf::from("a.map"));
        let (composer, cells) = compose(&state);

        let sep = row_text(&cells, composer.width, composer.height - 2);
        let expected = 5 * constants::GLYPH_WIDTH + 2;
        assert!(sep.starts_with(&"-".repeat(expected)));
    }
}
