use anyhow::Result;
use crossterm::{
    cursor,
    style::Print,
    terminal::{self, EnterAlternateScreen, LeaveAlternateScreen},
    ExecutableCommand,
};
use std::io::{BufWriter, Stdout, Write};

use super::cell::{CellStyle, ScreenCell};

const SGR_RESET: &[u8] = b"\x1b[0m";
const SGR_HIGHLIGHT: &[u8] = b"\x1b[7;4m";

/// Owns stdout and the raw-mode/alternate-screen lifecycle for a session.
/// Frames are diffed against the previous one so a keystroke normally
/// repaints a handful of cells, not the whole screen.
pub struct DisplayManager {
    stdout: BufWriter<Stdout>,
    last_cells: Option<Vec<ScreenCell>>,
    render_buffer: Vec<u8>,
}

impl DisplayManager {
    pub fn new() -> Result<Self> {
        let stdout = BufWriter::with_capacity(64 * 1024, std::io::stdout());
        let mut dm = Self {
            stdout,
            last_cells: None,
            render_buffer: Vec::with_capacity(64 * 1024),
        };

        dm.initialize_terminal()?;

        Ok(dm)
    }

    fn initialize_terminal(&mut self) -> Result<()> {
        terminal::enable_raw_mode()?;
        self.stdout.execute(EnterAlternateScreen)?;
        self.stdout.execute(cursor::Hide)?;

        // Disable line wrapping (DECAWM) to prevent scrolling at edges
        self.stdout.execute(Print("\x1b[?7l"))?;

        // Disable cursor blinking
        self.stdout.execute(Print("\x1b[?12l"))?;

        Ok(())
    }

    /// Drop the previous frame so the next render clears and repaints
    /// everything. Used after terminal resize events.
    pub fn force_redraw(&mut self) {
        self.last_cells = None;
    }

    // Zero-allocation u16 writing for cursor-move sequences
    #[inline(always)]
    fn write_u16_fast(buffer: &mut Vec<u8>, mut n: u16) {
        if n >= 10000 {
            buffer.push(b'0' + (n / 10000) as u8);
            n %= 10000;
            buffer.push(b'0' + (n / 1000) as u8);
            n %= 1000;
            buffer.push(b'0' + (n / 100) as u8);
            n %= 100;
            buffer.push(b'0' + (n / 10) as u8);
            n %= 10;
            buffer.push(b'0' + n as u8);
        } else if n >= 1000 {
            buffer.push(b'0' + (n / 1000) as u8);
            n %= 1000;
            buffer.push(b'0' + (n / 100) as u8);
            n %= 100;
            buffer.push(b'0' + (n / 10) as u8);
            n %= 10;
            buffer.push(b'0' + n as u8);
        } else if n >= 100 {
            buffer.push(b'0' + (n / 100) as u8);
            n %= 100;
            buffer.push(b'0' + (n / 10) as u8);
            n %= 10;
            buffer.push(b'0' + n as u8);
        } else if n >= 10 {
            buffer.push(b'0' + (n / 10) as u8);
            n %= 10;
            buffer.push(b'0' + n as u8);
        } else {
            buffer.push(b'0' + n as u8);
        }
    }

    /// Diff `cells` against the previous frame and flush the changes in a
    /// single write. `width` is the frame width in columns.
    pub fn render_diff(&mut self, cells: &[ScreenCell], width: usize) -> Result<()> {
        self.render_buffer.clear();
        let buffer = &mut self.render_buffer;

        // Synchronized update begin
        buffer.extend_from_slice(b"\x1b[?2026h");

        let mut force_redraw = false;
        if self.last_cells.as_ref().map(|v| v.len()).unwrap_or(0) != cells.len() {
            buffer.extend_from_slice(b"\x1b[2J");
            self.last_cells = Some(vec![ScreenCell::default(); cells.len()]);
            force_redraw = true;
        }

        let last_cells = match &mut self.last_cells {
            Some(v) => v,
            None => {
                return Ok(());
            }
        };

        let (term_cols, term_rows) = terminal::size().unwrap_or((80, 24));
        let content_width = width as u16;
        let content_height = (cells.len() / width) as u16;

        // Center the frame in the terminal when it fits.
        let offset_x = if term_cols > content_width {
            (term_cols - content_width) / 2
        } else {
            0
        };
        let offset_y = if term_rows > content_height {
            (term_rows - content_height) / 2
        } else {
            0
        };

        // Track virtual cursor position and active attributes
        let mut cursor_x: i32 = -1;
        let mut cursor_y: i32 = -1;
        let mut active_style: Option<CellStyle> = None;

        for (i, cell) in cells.iter().enumerate() {
            let old_cell = &last_cells[i];

            let is_different =
                force_redraw || cell.ch != old_cell.ch || cell.style != old_cell.style;

            if is_different {
                let x = (i % width) as u16;
                let y = (i / width) as u16;

                let target_x = x + offset_x;
                let target_y = y + offset_y;

                // Skip cells that fall outside the terminal
                if target_x >= term_cols || target_y >= term_rows {
                    cursor_x = -1;
                    continue;
                }

                if cursor_x != target_x as i32 || cursor_y != target_y as i32 {
                    buffer.extend_from_slice(b"\x1b[");
                    Self::write_u16_fast(buffer, target_y + 1);
                    buffer.push(b';');
                    Self::write_u16_fast(buffer, target_x + 1);
                    buffer.push(b'H');

                    cursor_x = target_x as i32;
                    cursor_y = target_y as i32;
                }

                if active_style != Some(cell.style) {
                    match cell.style {
                        CellStyle::Normal => buffer.extend_from_slice(SGR_RESET),
                        CellStyle::Highlight => {
                            buffer.extend_from_slice(SGR_RESET);
                            buffer.extend_from_slice(SGR_HIGHLIGHT);
                        }
                    }
                    active_style = Some(cell.style);
                }

                let mut b_dst = [0u8; 4];
                buffer.extend_from_slice(cell.ch.encode_utf8(&mut b_dst).as_bytes());

                last_cells[i] = *cell;

                cursor_x += 1;
            } else {
                // Cell unchanged, invalidate the cursor tracker
                cursor_x = -1;
            }
        }

        buffer.extend_from_slice(SGR_RESET);

        // Synchronized update end
        buffer.extend_from_slice(b"\x1b[?2026l");

        self.stdout.write_all(buffer)?;
        self.stdout.flush()?;

        Ok(())
    }
}

impl Drop for DisplayManager {
    fn drop(&mut self) {
        let _ = self.stdout.execute(Print("\x1b[?7h"));
        let _ = self.stdout.execute(cursor::Show);
        let _ = self.stdout.execute(LeaveAlternateScreen);
        let _ = terminal::disable_raw_mode();
    }
}
