pub const APP_NAME: &str = "tiledit";

pub const TILEDIT_CONFIG_FILE: &str = "tiledit.config";
pub const ERROR_LOG_FILE: &str = "error.log";
pub const DEBUG_LOG_FILE: &str = "debug.log";

pub const MAP_DIR_CANDIDATES: &[&str] = &["maps", "."];
pub const MAP_EXTENSIONS: &[&str] = &["map", "txt"];

pub const DEFAULT_MAP_WIDTH: u16 = 24;
pub const DEFAULT_MAP_HEIGHT: u16 = 12;
pub const MIN_MAP_SIZE: u16 = 1;
pub const MAX_MAP_SIZE: u16 = 512;

/// Every palette glyph occupies exactly this many terminal columns.
pub const GLYPH_WIDTH: usize = 2;

pub const MENU_LOGO: &[&str] = &[
    "  _   _ _          _ _ _   ",
    " | |_(_) | ___  __| (_) |_ ",
    " | __| | |/ _ \\/ _` | | __|",
    " | |_| | |  __/ (_| | | |_ ",
    "  \\__|_|_|\\___|\\__,_|_|\\__|",
];

pub const MENU_NEW_MAP_LABEL: &str = "Create a new map";
pub const MENU_SIZE_HINT: &str = "width x height, e.g. 24x12";
