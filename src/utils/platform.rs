use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::env;

/// What the surrounding terminal looks like. The editor needs ANSI cursor
/// addressing and SGR attributes; `tiledit detect` prints this so a user
/// can see what their environment reports before blaming the renderer.
#[derive(Debug, Serialize, Deserialize)]
pub struct TerminalInfo {
    pub os_name: String,
    pub arch: String,
    pub terminal: String,
    pub shell: String,
    pub terminal_width: u16,
    pub terminal_height: u16,
    pub supports_ansi: bool,
    pub supports_truecolor: bool,
}

impl TerminalInfo {
    pub fn detect() -> Result<Self> {
        let (width, height) = crossterm::terminal::size().unwrap_or((80, 24));

        Ok(Self {
            os_name: std::env::consts::OS.to_string(),
            arch: std::env::consts::ARCH.to_string(),
            terminal: Self::detect_terminal(),
            shell: Self::detect_shell(),
            terminal_width: width,
            terminal_height: height,
            supports_ansi: Self::detect_ansi(),
            supports_truecolor: Self::detect_truecolor(),
        })
    }

    fn detect_terminal() -> String {
        if let Ok(term) = env::var("TERM_PROGRAM") {
            return term;
        }
        if let Ok(term) = env::var("TERM") {
            return term;
        }
        "Unknown".to_string()
    }

    fn detect_shell() -> String {
        if let Ok(shell) = env::var("SHELL") {
            shell.split('/').last().unwrap_or("unknown").to_string()
        } else {
            "unknown".to_string()
        }
    }

    fn detect_ansi() -> bool {
        env::var("TERM").map(|v| v != "dumb").unwrap_or(true)
    }

    fn detect_truecolor() -> bool {
        env::var("COLORTERM")
            .map(|v| v.contains("truecolor") || v.contains("24bit"))
            .unwrap_or(false)
    }
}
