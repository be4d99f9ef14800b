/// SGR attribute of a screen cell. The editor highlights the selected
/// cell; everything else is plain text.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum CellStyle {
    Normal,
    /// Reverse video + underline, marks the cell under the cursor.
    Highlight,
}

/// A single character cell of the composed frame.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct ScreenCell {
    pub ch: char,
    pub style: CellStyle,
}

impl Default for ScreenCell {
    fn default() -> Self {
        Self {
            ch: ' ',
            style: CellStyle::Normal,
        }
    }
}
