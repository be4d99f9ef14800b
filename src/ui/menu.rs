use anyhow::{Context, Result};
use crossterm::{
    cursor::{Hide, Show},
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap},
    Frame, Terminal,
};
use std::{
    fs, io,
    path::{Path, PathBuf},
    time::Duration,
};

use crate::shared::constants;
use crate::utils::file_utils;

type UiTerminal = Terminal<CrosstermBackend<io::Stderr>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Step {
    Splash,
    Map,
    Name,
    Size,
    Confirm,
}

impl Step {
    fn title(self) -> &'static str {
        match self {
            Step::Splash => "Start",
            Step::Map => "Map",
            Step::Name => "Name",
            Step::Size => "Size",
            Step::Confirm => "Confirm",
        }
    }

    fn progress(self) -> &'static str {
        match self {
            Step::Splash => "0/4",
            Step::Map => "1/4",
            Step::Name => "2/4",
            Step::Size => "3/4",
            Step::Confirm => "4/4",
        }
    }
}

pub struct MenuSelection {
    pub path: PathBuf,
    /// Dimensions for a freshly created map; None when an existing file
    /// was picked (its dimensions come from the file itself).
    pub dimensions: Option<(u16, u16)>,
}

struct MenuApp {
    step: Step,
    status: String,
    should_quit: bool,
    map_files: Vec<PathBuf>,
    map_index: usize,
    name_input: String,
    size_input: String,
    size: Option<(u16, u16)>,
    selection: Option<MenuSelection>,
}

impl MenuApp {
    fn load() -> Result<Self> {
        let map_files = file_utils::scan_map_files()?;

        // Entry 0 is "create new"; preselect the map edited last time.
        let map_index = read_last_map()
            .and_then(|last| {
                map_files
                    .iter()
                    .position(|p| p.to_string_lossy() == last)
            })
            .map(|pos| pos + 1)
            .unwrap_or(0);

        Ok(Self {
            step: Step::Splash,
            status: "Enter to start, Esc to quit".to_string(),
            should_quit: false,
            map_files,
            map_index,
            name_input: String::new(),
            size_input: String::new(),
            size: None,
            selection: None,
        })
    }

    fn map_len_with_new(&self) -> usize {
        self.map_files.len() + 1
    }

    fn creating_new(&self) -> bool {
        self.map_index == 0
    }

    fn on_key(&mut self, key: KeyCode) {
        match key {
            KeyCode::Esc => {
                self.should_quit = true;
                return;
            }
            // 'q' quits everywhere except the free-text name prompt
            KeyCode::Char('q') if self.step != Step::Name => {
                self.should_quit = true;
                return;
            }
            _ => {}
        }

        match self.step {
            Step::Splash => {
                if key == KeyCode::Enter {
                    self.step = Step::Map;
                    self.status = "Pick a map, or create a new one".to_string();
                }
            }
            Step::Map => self.handle_map_select(key),
            Step::Name => self.handle_name_input(key),
            Step::Size => self.handle_size_input(key),
            Step::Confirm => self.handle_confirm(key),
        }
    }

    fn handle_map_select(&mut self, key: KeyCode) {
        match key {
            KeyCode::Up | KeyCode::Char('k') => {
                self.map_index = self.map_index.saturating_sub(1);
            }
            KeyCode::Down | KeyCode::Char('j') => {
                if self.map_index + 1 < self.map_len_with_new() {
                    self.map_index += 1;
                }
            }
            KeyCode::Enter => {
                if self.creating_new() {
                    self.step = Step::Name;
                    self.status = "Type a file name, Enter to continue".to_string();
                } else {
                    self.step = Step::Confirm;
                    self.status = "Enter to edit, Backspace to go back".to_string();
                }
            }
            _ => {}
        }
    }

    fn handle_name_input(&mut self, key: KeyCode) {
        match key {
            KeyCode::Backspace => {
                self.name_input.pop();
            }
            KeyCode::Char(c) if c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.') => {
                self.name_input.push(c);
            }
            KeyCode::Enter => {
                if self.name_input.trim().is_empty() {
                    self.status = "The file name cannot be empty".to_string();
                    return;
                }
                self.step = Step::Size;
                self.status = format!("Map dimensions ({})", constants::MENU_SIZE_HINT);
            }
            _ => {}
        }
    }

    fn handle_size_input(&mut self, key: KeyCode) {
        match key {
            KeyCode::Backspace => {
                self.size_input.pop();
            }
            KeyCode::Char(c) if c.is_ascii_digit() => {
                self.size_input.push(c);
            }
            KeyCode::Char('x') if !self.size_input.contains('x') => {
                self.size_input.push('x');
            }
            KeyCode::Enter => match parse_size(&self.size_input) {
                Some(size) => {
                    self.size = Some(size);
                    self.step = Step::Confirm;
                    self.status = "Enter to edit, Backspace to go back".to_string();
                }
                None => {
                    self.status = format!(
                        "Sizes are {}..{} ({})",
                        constants::MIN_MAP_SIZE,
                        constants::MAX_MAP_SIZE,
                        constants::MENU_SIZE_HINT
                    );
                }
            },
            _ => {}
        }
    }

    fn handle_confirm(&mut self, key: KeyCode) {
        match key {
            KeyCode::Backspace => {
                if self.creating_new() {
                    self.step = Step::Size;
                    self.status = format!("Map dimensions ({})", constants::MENU_SIZE_HINT);
                } else {
                    self.step = Step::Map;
                    self.status = "Pick a map, or create a new one".to_string();
                }
            }
            KeyCode::Enter => {
                self.selection = Some(MenuSelection {
                    path: self.selected_path(),
                    dimensions: if self.creating_new() { self.size } else { None },
                });
                self.should_quit = true;
            }
            _ => {}
        }
    }

    fn selected_path(&self) -> PathBuf {
        if self.creating_new() {
            let mut name = self.name_input.trim().to_string();
            if !file_utils::has_allowed_extension(Path::new(&name), constants::MAP_EXTENSIONS) {
                name.push_str(".map");
            }
            file_utils::maps_dir().join(name)
        } else {
            self.map_files[self.map_index - 1].clone()
        }
    }
}

fn parse_size(input: &str) -> Option<(u16, u16)> {
    let (w, h) = input.split_once('x')?;
    let w = w.trim().parse::<u16>().ok()?;
    let h = h.trim().parse::<u16>().ok()?;
    let range = constants::MIN_MAP_SIZE..=constants::MAX_MAP_SIZE;
    if range.contains(&w) && range.contains(&h) {
        Some((w, h))
    } else {
        None
    }
}

pub fn run_menu() -> Result<Option<MenuSelection>> {
    let mut app = MenuApp::load()?;

    let mut terminal = setup_terminal()?;
    let run_result = run_app(&mut terminal, &mut app);
    let restore_result = restore_terminal(&mut terminal);

    if let Err(err) = restore_result {
        crate::utils::logger::error(&format!("Failed to restore terminal from menu: {}", err));
    }

    run_result?;

    Ok(app.selection)
}

/// Remember the picked map so the next menu run preselects it.
pub fn remember_last_map(path: &Path) {
    if let Err(err) = write_last_map(&path.to_string_lossy()) {
        crate::utils::logger::error(&format!(
            "Failed to update {}: {}",
            constants::TILEDIT_CONFIG_FILE,
            err
        ));
    }
}

fn setup_terminal() -> Result<UiTerminal> {
    enable_raw_mode().context("failed to enable raw mode")?;

    let mut stderr = io::stderr();
    execute!(stderr, EnterAlternateScreen, Hide).context("failed to switch to alternate screen")?;

    let backend = CrosstermBackend::new(stderr);
    let terminal = Terminal::new(backend).context("failed to initialize terminal backend")?;

    Ok(terminal)
}

fn restore_terminal(terminal: &mut UiTerminal) -> Result<()> {
    disable_raw_mode().context("failed to disable raw mode")?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen, Show)
        .context("failed to leave alternate screen")?;
    terminal.show_cursor().context("failed to show cursor")?;
    Ok(())
}

fn run_app(terminal: &mut UiTerminal, app: &mut MenuApp) -> Result<()> {
    loop {
        terminal.draw(|frame| draw_menu(frame, app))?;

        if app.should_quit {
            break;
        }

        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    app.on_key(key.code);
                }
            }
        }
    }

    Ok(())
}

fn draw_menu(frame: &mut Frame<'_>, app: &MenuApp) {
    let area = frame.size();

    let block = Block::default().borders(Borders::ALL).title(Span::styled(
        format!(
            " {} | {} ({}) ",
            constants::APP_NAME,
            app.step.title(),
            app.step.progress()
        ),
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD),
    ));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(7),
            Constraint::Min(8),
            Constraint::Length(3),
        ])
        .split(inner);

    draw_logo(frame, layout[0]);

    match app.step {
        Step::Splash => draw_splash(frame, layout[1]),
        Step::Map => draw_map_list(frame, layout[1], app),
        Step::Name => draw_name_input(frame, layout[1], app),
        Step::Size => draw_size_input(frame, layout[1], app),
        Step::Confirm => draw_confirm(frame, layout[1], app),
    }

    draw_footer(frame, layout[2], &app.status);
}

fn draw_logo(frame: &mut Frame<'_>, area: Rect) {
    let lines: Vec<Line<'_>> = constants::MENU_LOGO
        .iter()
        .map(|line| {
            Line::from(Span::styled(
                *line,
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            ))
        })
        .collect();

    let logo = Paragraph::new(lines).alignment(Alignment::Center);
    frame.render_widget(logo, area);
}

fn draw_splash(frame: &mut Frame<'_>, area: Rect) {
    let content = Paragraph::new(vec![
        Line::from(""),
        Line::from(Span::styled(
            "Terminal tile-map editor",
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from("Enter: start"),
        Line::from("Esc / q: quit"),
    ])
    .alignment(Alignment::Center)
    .wrap(Wrap { trim: true });

    frame.render_widget(content, area);
}

fn draw_map_list(frame: &mut Frame<'_>, area: Rect, app: &MenuApp) {
    let mut items = vec![ListItem::new(constants::MENU_NEW_MAP_LABEL)];
    items.extend(app.map_files.iter().map(|path| {
        ListItem::new(
            path.file_name()
                .map(|f| f.to_string_lossy().to_string())
                .unwrap_or_else(|| path.to_string_lossy().to_string()),
        )
    }));

    draw_select_list(frame, area, "Select map", items, app.map_index);
}

fn draw_name_input(frame: &mut Frame<'_>, area: Rect, app: &MenuApp) {
    draw_text_input(frame, area, "File name (e.g. station.map)", &app.name_input);
}

fn draw_size_input(frame: &mut Frame<'_>, area: Rect, app: &MenuApp) {
    draw_text_input(frame, area, constants::MENU_SIZE_HINT, &app.size_input);
}

fn draw_text_input(frame: &mut Frame<'_>, area: Rect, title: &'static str, value: &str) {
    let input_block = Block::default().borders(Borders::ALL).title(title);

    let text = if value.is_empty() {
        "_".to_string()
    } else {
        format!("{}_", value)
    };

    let input = Paragraph::new(text)
        .block(input_block)
        .alignment(Alignment::Left)
        .wrap(Wrap { trim: true });

    frame.render_widget(input, area);
}

fn draw_confirm(frame: &mut Frame<'_>, area: Rect, app: &MenuApp) {
    let map = app
        .selected_path()
        .file_name()
        .map(|f| f.to_string_lossy().to_string())
        .unwrap_or_else(|| app.selected_path().to_string_lossy().to_string());

    let size = if app.creating_new() {
        app.size
            .map(|(w, h)| format!("{}x{} (new)", w, h))
            .unwrap_or_else(|| "unset".to_string())
    } else {
        "from file".to_string()
    };

    let confirm = Paragraph::new(vec![
        Line::from(Span::styled(
            "Ready to edit",
            Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(format!("Map:  {}", map)),
        Line::from(format!("Size: {}", size)),
        Line::from(""),
        Line::from("Enter: edit   Backspace: back   Esc: quit"),
    ])
    .block(Block::default().borders(Borders::ALL));

    frame.render_widget(confirm, area);
}

fn draw_select_list(
    frame: &mut Frame<'_>,
    area: Rect,
    title: &'static str,
    items: Vec<ListItem<'_>>,
    selected: usize,
) {
    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title(title))
        .highlight_style(
            Style::default()
                .fg(Color::Black)
                .bg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("▶ ");

    let mut state = ListState::default();
    state.select(Some(selected));
    frame.render_stateful_widget(list, area, &mut state);
}

fn draw_footer(frame: &mut Frame<'_>, area: Rect, status: &str) {
    let footer = Paragraph::new(Line::from(vec![
        Span::styled(
            "[↑↓/j,k] move  [Enter] select  [Esc] quit  ",
            Style::default().fg(Color::DarkGray),
        ),
        Span::styled(status, Style::default().fg(Color::White)),
    ]))
    .alignment(Alignment::Left)
    .wrap(Wrap { trim: true });

    frame.render_widget(footer, area);
}

fn read_last_map() -> Option<String> {
    let config_path = Path::new(constants::TILEDIT_CONFIG_FILE);

    if let Ok(content) = fs::read_to_string(config_path) {
        for line in content.lines() {
            let trimmed = line.trim();
            if trimmed.starts_with("last-map") {
                if let Some(value) = trimmed.split('=').nth(1) {
                    return Some(value.trim().to_string());
                }
            }
        }
    }
    None
}

fn write_last_map(path: &str) -> Result<()> {
    let config_path = Path::new(constants::TILEDIT_CONFIG_FILE);

    let mut replaced = false;
    let mut lines = if let Ok(content) = fs::read_to_string(config_path) {
        content
            .lines()
            .map(|line| {
                if line.trim_start().starts_with("last-map") {
                    replaced = true;
                    format!("last-map = {}", path.trim())
                } else {
                    line.to_string()
                }
            })
            .collect::<Vec<_>>()
    } else {
        Vec::new()
    };

    if !replaced {
        lines.push(format!("last-map = {}", path.trim()));
    }

    let mut new_content = lines.join("\n");
    new_content.push('\n');

    fs::write(config_path, new_content)
        .with_context(|| format!("failed to write {}", config_path.display()))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_size() {
        assert_eq!(parse_size("24x12"), Some((24, 12)));
        assert_eq!(parse_size(" 3 x 2 "), Some((3, 2)));
        assert_eq!(parse_size("0x5"), None);
        assert_eq!(parse_size("24"), None);
        assert_eq!(parse_size("x"), None);
        assert_eq!(parse_size("9999x2"), None);
    }

    #[test]
    fn test_new_map_flow_reaches_confirm() {
        let mut app = MenuApp {
            step: Step::Splash,
            status: String::new(),
            should_quit: false,
            map_files: Vec::new(),
            map_index: 0,
            name_input: String::new(),
            size_input: String::new(),
            size: None,
            selection: None,
        };

        app.on_key(KeyCode::Enter);
        assert_eq!(app.step, Step::Map);
        app.on_key(KeyCode::Enter);
        assert_eq!(app.step, Step::Name);
        for c in "ship".chars() {
            app.on_key(KeyCode::Char(c));
        }
        app.on_key(KeyCode::Enter);
        assert_eq!(app.step, Step::Size);
        for c in "3x2".chars() {
            app.on_key(KeyCode::Char(c));
        }
        app.on_key(KeyCode::Enter);
        assert_eq!(app.step, Step::Confirm);

        app.on_key(KeyCode::Enter);
        assert!(app.should_quit);
        let selection = app.selection.expect("selection must be set");
        assert_eq!(selection.dimensions, Some((3, 2)));
        assert!(selection.path.to_string_lossy().ends_with("ship.map"));
    }

    #[test]
    fn test_name_prompt_accepts_the_letter_q() {
        let mut app = MenuApp {
            step: Step::Name,
            status: String::new(),
            should_quit: false,
            map_files: Vec::new(),
            map_index: 0,
            name_input: String::new(),
            size_input: String::new(),
            size: None,
            selection: None,
        };

        app.on_key(KeyCode::Char('q'));
        assert!(!app.should_quit);
        assert_eq!(app.name_input, "q");
    }
}
