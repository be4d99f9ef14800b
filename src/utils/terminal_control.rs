use std::io::{self, IsTerminal, Write};

/// Ask the terminal to resize so the frame fits.
///
/// xterm window op: resize request. Unsupported terminals ignore the
/// sequence, so this is best effort only.
pub fn request_resize(cols: u16, rows: u16) {
    let mut stdout = io::stdout();
    if !stdout.is_terminal() {
        return;
    }

    let _ = write!(stdout, "\x1b[8;{};{}t", rows, cols);
    let _ = stdout.flush();
}
