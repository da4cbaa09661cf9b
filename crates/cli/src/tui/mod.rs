pub mod markdown;

use std::io::{self, stdout, Write};
use std::time::Duration;

use crossterm::{
    event::{self, Event, KeyCode, KeyEvent},
    terminal::{self, EnterAlternateScreen, LeaveAlternateScreen},
    ExecutableCommand,
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame, Terminal,
};

use lesart_core::{reader, Corpus, ExplanationMap, ReaderState};

use crate::util;

struct ReaderApp {
    corpus: Corpus,
    explanations: ExplanationMap,
    state: ReaderState,
    /// Vertical scroll of the explanation pane, reset on navigation
    expl_scroll: u16,
    /// Jump-list search input, live while the overlay is open
    search: String,
    /// Corpus indices matching `search`
    matches: Vec<usize>,
    /// Position within `matches`
    selected: usize,
    should_quit: bool,
    show_help: bool,
}

impl ReaderApp {
    fn new(corpus: Corpus, explanations: ExplanationMap, start_index: usize) -> Self {
        let len = corpus.len();
        Self {
            corpus,
            explanations,
            state: ReaderState::with_index(len, start_index),
            expl_scroll: 0,
            search: String::new(),
            matches: Vec::new(),
            selected: 0,
            should_quit: false,
            show_help: false,
        }
    }

    fn handle_key(&mut self, key: KeyEvent) {
        if self.show_help {
            // Any key dismisses help
            self.show_help = false;
            return;
        }

        if self.state.overlay_open() {
            self.handle_overlay_key(key);
            return;
        }

        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => self.should_quit = true,
            KeyCode::Char('?') => self.show_help = true,
            KeyCode::Left | KeyCode::Char('h') => {
                self.state.prev();
                self.expl_scroll = 0;
            }
            KeyCode::Right | KeyCode::Char('l') => {
                self.state.next();
                self.expl_scroll = 0;
            }
            KeyCode::Home | KeyCode::Char('g') => {
                self.state.first();
                self.expl_scroll = 0;
            }
            KeyCode::End | KeyCode::Char('G') => {
                self.state.last();
                self.expl_scroll = 0;
            }
            KeyCode::Up | KeyCode::Char('k') => {
                self.expl_scroll = self.expl_scroll.saturating_sub(1);
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.expl_scroll = self.expl_scroll.saturating_add(1);
            }
            KeyCode::PageUp => {
                self.expl_scroll = self.expl_scroll.saturating_sub(10);
            }
            KeyCode::PageDown => {
                self.expl_scroll = self.expl_scroll.saturating_add(10);
            }
            KeyCode::Char('/') => {
                self.search.clear();
                self.refilter();
                self.state.open_overlay();
            }
            _ => {}
        }
    }

    fn handle_overlay_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => self.state.close_overlay(),
            KeyCode::Enter => {
                if let Some(&idx) = self.matches.get(self.selected) {
                    self.state.jump(idx);
                    self.expl_scroll = 0;
                }
                self.state.close_overlay();
            }
            KeyCode::Up => self.selected = self.selected.saturating_sub(1),
            KeyCode::Down => {
                if self.selected + 1 < self.matches.len() {
                    self.selected += 1;
                }
            }
            KeyCode::Backspace => {
                self.search.pop();
                self.refilter();
            }
            KeyCode::Char(c) => {
                self.search.push(c);
                self.refilter();
            }
            _ => {}
        }
    }

    fn refilter(&mut self) {
        self.matches = reader::filter_indices(self.corpus.propositions(), &self.search);
        self.selected = 0;
    }

    fn draw(&self, frame: &mut Frame) {
        let area = frame.area();
        let chunks = Layout::vertical([
            Constraint::Length(1),
            Constraint::Min(3),
            Constraint::Length(1),
        ])
        .split(area);

        self.draw_title(frame, chunks[0]);
        self.draw_panes(frame, chunks[1]);
        self.draw_status(frame, chunks[2]);

        if self.state.overlay_open() {
            self.draw_jump_list(frame, area);
        }
        if self.show_help {
            self.draw_help(frame, area);
        }
    }

    fn draw_title(&self, frame: &mut Frame, area: Rect) {
        let number = self
            .corpus
            .get(self.state.index())
            .map(|p| p.number.as_str())
            .unwrap_or("?");
        let title = format!(
            " lesart: Philosophical Investigations | proposition {} ({}/{}) ",
            number,
            self.state.index() + 1,
            self.corpus.len(),
        );
        let para = Paragraph::new(Line::from(vec![Span::styled(
            title,
            Style::default()
                .fg(Color::Black)
                .bg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )]))
        .style(Style::default().bg(Color::Cyan));
        frame.render_widget(para, area);
    }

    fn draw_panes(&self, frame: &mut Frame, area: Rect) {
        let halves =
            Layout::horizontal([Constraint::Percentage(50), Constraint::Percentage(50)])
                .split(area);

        let Some(prop) = self.corpus.get(self.state.index()) else {
            let msg = Paragraph::new("(empty corpus)")
                .style(Style::default().fg(Color::DarkGray));
            frame.render_widget(msg, area);
            return;
        };

        let text_block = Block::default()
            .borders(Borders::ALL)
            .title(format!(" Proposition {} ", prop.number));
        let text = Paragraph::new(prop.text.clone())
            .block(text_block)
            .wrap(Wrap { trim: false });
        frame.render_widget(text, halves[0]);

        let expl_block = Block::default()
            .borders(Borders::ALL)
            .title(" Explanation ");
        let lines = match self.explanations.get(&prop.number) {
            Some(exp) => {
                let mut lines = vec![
                    Line::from(Span::styled(
                        "In brief",
                        Style::default()
                            .fg(Color::Cyan)
                            .add_modifier(Modifier::BOLD),
                    )),
                    Line::from(exp.brief.clone()),
                    Line::from(""),
                ];
                lines.extend(markdown::render(&exp.comprehensive));
                lines
            }
            // No explanation yet: empty pane, not an error
            None => Vec::new(),
        };
        let expl = Paragraph::new(lines)
            .block(expl_block)
            .wrap(Wrap { trim: false })
            .scroll((self.expl_scroll, 0));
        frame.render_widget(expl, halves[1]);
    }

    fn draw_status(&self, frame: &mut Frame, area: Rect) {
        let left = format!(
            " {}/{}",
            self.state.index() + 1,
            self.corpus.len(),
        );
        let right = "h/l: turn  j/k: scroll  /: jump  ?: help ";

        let padding = (area.width as usize)
            .saturating_sub(util::display_width(&left) + util::display_width(right));
        let status = format!("{}{:pad$}{}", left, "", right, pad = padding);

        let para = Paragraph::new(Line::from(vec![Span::styled(
            status,
            Style::default().fg(Color::Black).bg(Color::DarkGray),
        )]))
        .style(Style::default().bg(Color::DarkGray));
        frame.render_widget(para, area);
    }

    fn draw_jump_list(&self, frame: &mut Frame, area: Rect) {
        let width: u16 = (area.width.saturating_sub(8)).min(64).max(20);
        let height: u16 = (area.height.saturating_sub(4)).min(18).max(5);
        let x = area.width.saturating_sub(width) / 2;
        let y = area.height.saturating_sub(height) / 2;
        let popup = Rect::new(
            area.x + x,
            area.y + y,
            width.min(area.width),
            height.min(area.height),
        );

        let mut lines = vec![Line::from(vec![
            Span::styled("/ ", Style::default().fg(Color::Cyan)),
            Span::raw(self.search.clone()),
            Span::styled("_", Style::default().add_modifier(Modifier::SLOW_BLINK)),
        ])];

        let list_height = height.saturating_sub(3) as usize;
        let first = self
            .selected
            .saturating_sub(list_height.saturating_sub(1));
        let row_width = width.saturating_sub(4) as usize;
        for (pos, &idx) in self
            .matches
            .iter()
            .enumerate()
            .skip(first)
            .take(list_height)
        {
            let Some(prop) = self.corpus.get(idx) else { continue };
            let label = format!("{:>4}  {}", prop.number, prop.text);
            let display = util::truncate_display(&label, row_width);
            let style = if pos == self.selected {
                Style::default()
                    .fg(Color::Black)
                    .bg(Color::White)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::Gray)
            };
            lines.push(Line::from(Span::styled(display, style)));
        }
        if self.matches.is_empty() {
            lines.push(Line::from(Span::styled(
                "  (no matches)",
                Style::default().fg(Color::DarkGray),
            )));
        }

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan))
            .title(" Jump to proposition ")
            .title_style(
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            )
            .style(Style::default().bg(Color::Black));

        frame.render_widget(Clear, popup);
        frame.render_widget(Paragraph::new(lines).block(block), popup);
    }

    fn draw_help(&self, frame: &mut Frame, area: Rect) {
        let help_lines = [
            "",
            "  Navigation",
            "  ----------",
            "  left / h          Previous proposition",
            "  right / l         Next proposition",
            "  Home / g          First proposition",
            "  End  / G          Last proposition",
            "  up,down / k,j     Scroll explanation",
            "  PgUp / PgDn       Scroll explanation fast",
            "",
            "  Jump list",
            "  ---------",
            "  /                 Open (type to search)",
            "  Enter             Go to selection",
            "  Esc               Close",
            "",
            "  General",
            "  -------",
            "  q / Esc           Quit",
            "  ?                 Toggle this help",
            "",
        ];
        let help_width: u16 = 48;
        let help_height: u16 = help_lines.len() as u16;

        let x = area.width.saturating_sub(help_width) / 2;
        let y = area.height.saturating_sub(help_height) / 2;
        let popup = Rect::new(
            area.x + x,
            area.y + y,
            help_width.min(area.width),
            help_height.min(area.height),
        );

        let lines: Vec<Line> = help_lines
            .iter()
            .map(|s| Line::from(Span::styled(*s, Style::default().fg(Color::White))))
            .collect();

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan))
            .title(" Keybindings ")
            .title_style(
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            )
            .style(Style::default().bg(Color::Black));

        frame.render_widget(Clear, popup);
        frame.render_widget(Paragraph::new(lines).block(block), popup);
    }
}

/// Run the interactive reader. Returns the number of the proposition on
/// screen at exit, for session persistence.
pub fn run(
    corpus: Corpus,
    explanations: ExplanationMap,
    start_index: usize,
) -> Result<Option<String>, String> {
    let mut app = ReaderApp::new(corpus, explanations, start_index);

    terminal::enable_raw_mode()
        .map_err(|e| format!("failed to enable raw mode: {}", e))?;
    stdout()
        .execute(EnterAlternateScreen)
        .map_err(|e| format!("failed to enter alternate screen: {}", e))?;

    struct Cleanup;
    impl Drop for Cleanup {
        fn drop(&mut self) {
            let _ = stdout().execute(LeaveAlternateScreen);
            let _ = terminal::disable_raw_mode();
        }
    }
    let _cleanup = Cleanup;

    let backend = CrosstermBackend::new(stdout());
    let mut terminal =
        Terminal::new(backend).map_err(|e| format!("failed to create terminal: {}", e))?;

    loop {
        terminal
            .draw(|frame| app.draw(frame))
            .map_err(|e| format!("draw error: {}", e))?;

        if event::poll(Duration::from_millis(100))
            .map_err(|e| format!("event poll error: {}", e))?
        {
            if let Event::Key(key) =
                event::read().map_err(|e| format!("event read error: {}", e))?
            {
                app.handle_key(key);
            }
        }

        if app.should_quit {
            break;
        }
    }

    let number = app
        .corpus
        .get(app.state.index())
        .map(|p| p.number.clone());
    Ok(number)
}

/// Print one proposition and its explanation as plain text (no TUI, no raw
/// mode), for piping.
pub fn print_plain(
    corpus: &Corpus,
    explanations: &ExplanationMap,
    index: usize,
) -> Result<(), String> {
    let Some(prop) = corpus.get(index) else {
        return Err("empty corpus".to_string());
    };
    let out = io::stdout();
    let mut w = out.lock();

    writeln!(w, "Proposition {}", prop.number).map_err(|e| e.to_string())?;
    writeln!(w).map_err(|e| e.to_string())?;
    writeln!(w, "{}", prop.text).map_err(|e| e.to_string())?;

    if let Some(exp) = explanations.get(&prop.number) {
        writeln!(w).map_err(|e| e.to_string())?;
        writeln!(w, "Brief: {}", exp.brief).map_err(|e| e.to_string())?;
        writeln!(w).map_err(|e| e.to_string())?;
        writeln!(w, "{}", exp.comprehensive).map_err(|e| e.to_string())?;
    }

    Ok(())
}
