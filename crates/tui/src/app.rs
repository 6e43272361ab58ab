use std::{io, sync::Arc, thread, time::Duration};

use anyhow::{Context, Result};
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use gamebot_core::{
    models::{attribute_label, GameEntry},
    Controller, PopOutcome, Recommendation, Screen, Suggestion,
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap},
    Frame, Terminal,
};
use tokio::sync::mpsc;
use tracing::{error, info, warn};

use crate::forms::{BotField, BotForm, EditField, EditForm, TextInput};

const TICK_RATE: Duration = Duration::from_millis(250);

#[derive(Debug, Clone)]
struct Theme {
    primary_fg: Color,
    accent: Color,
    muted: Color,
    selection_bg: Color,
    success: Color,
    warning: Color,
    danger: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            primary_fg: Color::White,
            accent: Color::Cyan,
            muted: Color::DarkGray,
            selection_bg: Color::DarkGray,
            success: Color::Green,
            warning: Color::Yellow,
            danger: Color::Red,
        }
    }
}

enum AppEvent {
    Input(Event),
    Tick,
    CatalogChanged(Vec<GameEntry>),
}

/// Terminal frontend driving a [`Controller`].
pub struct GameBotApp {
    controller: Controller,
    games: Vec<GameEntry>,
    list: ListCursor,
    /// Snapshot of the game shown on the detail or edit screen.
    current: Option<GameEntry>,
    loaded_screen: Option<Screen>,
    edit: EditForm,
    bot: BotForm,
    status: String,
    should_quit: bool,
    theme: Theme,
}

impl GameBotApp {
    pub fn new(controller: Controller, default_players: u8) -> Self {
        Self {
            controller,
            games: Vec::new(),
            list: ListCursor::default(),
            current: None,
            loaded_screen: None,
            edit: EditForm::default(),
            bot: BotForm::new(default_players),
            status: "Ready".to_string(),
            should_quit: false,
            theme: Theme::default(),
        }
    }

    pub async fn run(&mut self) -> Result<()> {
        let (event_tx, mut event_rx) = mpsc::channel::<AppEvent>(128);

        let catalog_tx = event_tx.clone();
        let subscription = self
            .controller
            .subscribe(Arc::new(move |games: &[GameEntry]| {
                if catalog_tx
                    .try_send(AppEvent::CatalogChanged(games.to_vec()))
                    .is_err()
                {
                    warn!("Dropped catalog update; event queue is full or closed");
                }
            }))
            .await
            .context("failed to subscribe to the catalog")?;

        let mut stdout = io::stdout();
        enable_raw_mode().context("failed to enter raw mode")?;
        execute!(stdout, EnterAlternateScreen).context("failed to enter alternate screen")?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend).context("failed to create terminal")?;
        terminal.hide_cursor()?;
        terminal.clear()?;

        spawn_input_thread(event_tx);

        loop {
            terminal.draw(|frame| self.draw(frame))?;

            let Some(event) = event_rx.recv().await else {
                break;
            };
            if let Err(err) = self.process_event(event).await {
                error!(?err, "Event handling failed");
                self.set_status(format!("Error: {err}"));
            }

            if self.should_quit || self.controller.navigator().is_terminated() {
                break;
            }
        }

        self.controller.unsubscribe(subscription);
        restore_terminal(&mut terminal)?;
        Ok(())
    }

    async fn process_event(&mut self, event: AppEvent) -> Result<()> {
        match event {
            AppEvent::Input(Event::Key(key)) => {
                if key.modifiers == KeyModifiers::CONTROL && key.code == KeyCode::Char('c') {
                    self.should_quit = true;
                    return Ok(());
                }
                self.handle_key(key).await?;
                self.sync_screen().await?;
            }
            AppEvent::Input(_) | AppEvent::Tick => {}
            AppEvent::CatalogChanged(games) => {
                info!(total = games.len(), "Catalog updated");
                self.games = games;
                self.list.clamp(self.games.len());
                if matches!(self.controller.screen(), Some(Screen::Detail(_))) {
                    self.loaded_screen = None;
                    self.sync_screen().await?;
                }
            }
        }
        Ok(())
    }

    /// Refresh per-screen state after the top of the stack changed.
    async fn sync_screen(&mut self) -> Result<()> {
        let screen = self.controller.screen().cloned();
        if screen == self.loaded_screen {
            return Ok(());
        }
        match &screen {
            Some(Screen::Detail(id)) => {
                self.current = self.controller.get_entry(id).await?;
            }
            Some(Screen::Edit(id)) => {
                self.current = self.controller.get_entry(id).await?;
                self.edit.reset();
            }
            Some(Screen::Recommend) => {
                self.bot.suggestion = None;
                self.bot.recommender = None;
                self.current = None;
            }
            Some(Screen::List) | None => self.current = None,
        }
        self.loaded_screen = screen;
        Ok(())
    }

    fn set_status(&mut self, message: impl Into<String>) {
        self.status = message.into();
    }

    fn go_back(&mut self) {
        if let PopOutcome::Resumed(screen) = self.controller.pop_screen() {
            self.set_status(format!("Back to {}", screen.title()));
        }
    }

    async fn handle_key(&mut self, key: KeyEvent) -> Result<()> {
        match self.controller.screen().cloned() {
            Some(Screen::List) => self.handle_list_key(key).await,
            Some(Screen::Detail(id)) => {
                self.handle_detail_key(key, id);
                Ok(())
            }
            Some(Screen::Edit(id)) => self.handle_edit_key(key, id).await,
            Some(Screen::Recommend) => self.handle_bot_key(key).await,
            None => Ok(()),
        }
    }

    async fn handle_list_key(&mut self, key: KeyEvent) -> Result<()> {
        let total = self.games.len();
        match key.code {
            KeyCode::Char('j') | KeyCode::Down => self.list.move_cursor(1, total),
            KeyCode::Char('k') | KeyCode::Up => self.list.move_cursor(-1, total),
            KeyCode::Home | KeyCode::Char('g') => self.list.move_to(0, total),
            KeyCode::End | KeyCode::Char('G') => self.list.move_to(total, total),
            KeyCode::PageDown => self.list.page(1, total),
            KeyCode::PageUp => self.list.page(-1, total),
            KeyCode::Enter => {
                if let Some(game) = self.games.get(self.list.cursor) {
                    let id = game.id.clone();
                    self.controller.push_screen(Screen::Detail(id));
                }
            }
            KeyCode::Char(' ') => {
                if let Some(game) = self.games.get(self.list.cursor) {
                    let id = game.id.clone();
                    let name = game.display_name().to_string();
                    let selected = self.controller.toggle_selection(&id);
                    let verb = if selected { "Selected" } else { "Deselected" };
                    self.set_status(format!("{verb} {name}"));
                }
            }
            KeyCode::Char('n') => {
                let id = self.controller.create_entry().await?;
                self.controller.push_screen(Screen::Edit(id));
                self.set_status("New game created");
            }
            KeyCode::Char('d') | KeyCode::Delete => {
                if self.controller.selected_ids().is_empty() {
                    self.set_status("Select games with Space before deleting");
                } else {
                    let removed = self.controller.delete_selected().await?;
                    self.set_status(format!("Deleted {removed} game(s)"));
                }
            }
            KeyCode::Char('c') => {
                self.controller.clear_selections();
                self.set_status("Selection cleared");
            }
            KeyCode::Char('b') => self.controller.push_screen(Screen::Recommend),
            KeyCode::Char('q') if key.modifiers.is_empty() => self.should_quit = true,
            KeyCode::Esc | KeyCode::Backspace => {
                if self.controller.selected_ids().is_empty() {
                    self.go_back();
                } else {
                    self.controller.clear_selections();
                    self.set_status("Selection cleared");
                }
            }
            _ => {}
        }
        Ok(())
    }

    fn handle_detail_key(&mut self, key: KeyEvent, id: String) {
        match key.code {
            KeyCode::Char('e') | KeyCode::Enter => {
                if self.current.is_some() {
                    self.controller.push_screen(Screen::Edit(id));
                } else {
                    self.set_status("This game no longer exists");
                }
            }
            KeyCode::Char('l') => self.controller.push_screen(Screen::List),
            KeyCode::Char('b') => self.controller.push_screen(Screen::Recommend),
            KeyCode::Char('q') if key.modifiers.is_empty() => self.should_quit = true,
            KeyCode::Esc | KeyCode::Backspace => self.go_back(),
            _ => {}
        }
    }

    async fn handle_edit_key(&mut self, key: KeyEvent, id: String) -> Result<()> {
        if self.edit.input.is_some() {
            return self.handle_edit_text_key(key).await;
        }
        match key.code {
            KeyCode::Char('j') | KeyCode::Down | KeyCode::Tab => self.edit.move_cursor(1),
            KeyCode::Char('k') | KeyCode::Up | KeyCode::BackTab => self.edit.move_cursor(-1),
            KeyCode::Left | KeyCode::Char('-') | KeyCode::Char('h') => {
                self.adjust_current(-1).await?
            }
            KeyCode::Right | KeyCode::Char('+') | KeyCode::Char('=') => {
                self.adjust_current(1).await?
            }
            KeyCode::Char(' ') | KeyCode::Enter => {
                let field = self.edit.field();
                if field.is_text() {
                    if let Some(value) = self.current.as_ref().and_then(|game| field.text(game)) {
                        self.edit.input = Some(TextInput::new(value));
                        self.set_status(format!("Editing {}", field.label().to_lowercase()));
                    }
                } else {
                    self.adjust_current(1).await?;
                }
            }
            KeyCode::Char('d') => self.controller.push_screen(Screen::Detail(id)),
            KeyCode::Char('l') => self.controller.push_screen(Screen::List),
            KeyCode::Char('b') => self.controller.push_screen(Screen::Recommend),
            KeyCode::Esc | KeyCode::Backspace => self.go_back(),
            _ => {}
        }
        Ok(())
    }

    async fn handle_edit_text_key(&mut self, key: KeyEvent) -> Result<()> {
        let Some(input) = self.edit.input.as_mut() else {
            return Ok(());
        };
        match key.code {
            KeyCode::Esc => {
                self.edit.input = None;
                self.set_status("Edit cancelled");
            }
            KeyCode::Enter => {
                let value = input.value().to_string();
                self.edit.input = None;
                let field = self.edit.field();
                if let Some(mut game) = self.current.clone() {
                    if field.set_text(&mut game, &value) {
                        self.save_current(game).await?;
                    }
                }
            }
            KeyCode::Left => input.move_cursor(-1),
            KeyCode::Right => input.move_cursor(1),
            KeyCode::Home => input.move_home(),
            KeyCode::End => input.move_end(),
            KeyCode::Backspace => input.backspace(),
            KeyCode::Delete => input.delete(),
            KeyCode::Char(ch)
                if key.modifiers.is_empty() || key.modifiers == KeyModifiers::SHIFT =>
            {
                input.insert(ch)
            }
            _ => {}
        }
        Ok(())
    }

    async fn adjust_current(&mut self, delta: i8) -> Result<()> {
        let field = self.edit.field();
        if field.is_text() {
            return Ok(());
        }
        if let Some(mut game) = self.current.clone() {
            if field.adjust(&mut game, delta) {
                self.save_current(game).await?;
            }
        }
        Ok(())
    }

    /// Persist an edit immediately and re-read the stored version.
    async fn save_current(&mut self, game: GameEntry) -> Result<()> {
        let id = game.id.clone();
        let saved = self.controller.update_entry(game).await?;
        self.current = self.controller.get_entry(&id).await?;
        match self.current.as_ref() {
            Some(game) if saved => {
                let status = format!("Saved {}", game.display_name());
                self.set_status(status);
            }
            _ => self.set_status("This game no longer exists"),
        }
        Ok(())
    }

    async fn handle_bot_key(&mut self, key: KeyEvent) -> Result<()> {
        match key.code {
            KeyCode::Char('j') | KeyCode::Down | KeyCode::Tab => self.bot.move_cursor(1),
            KeyCode::Char('k') | KeyCode::Up | KeyCode::BackTab => self.bot.move_cursor(-1),
            KeyCode::Left | KeyCode::Char('h') | KeyCode::Char('-') => self.bot.adjust(-1),
            KeyCode::Right | KeyCode::Char('+') | KeyCode::Char('=') => self.bot.adjust(1),
            KeyCode::Char(' ') => self.bot.toggle(),
            KeyCode::Enter | KeyCode::Char('f') => {
                let recommender = self.controller.find_game(self.bot.criteria.clone()).await?;
                self.bot.recommender = Some(recommender);
                self.draw_suggestion();
            }
            KeyCode::Char('a') => {
                if self.bot.recommender.is_some() {
                    self.draw_suggestion();
                } else {
                    self.set_status("Find a game first");
                }
            }
            KeyCode::Char('l') => self.controller.push_screen(Screen::List),
            KeyCode::Char('q') if key.modifiers.is_empty() => self.should_quit = true,
            KeyCode::Esc | KeyCode::Backspace => {
                if !self.bot.dismiss() {
                    self.go_back();
                }
            }
            _ => {}
        }
        Ok(())
    }

    fn draw_suggestion(&mut self) {
        let Some(recommender) = self.bot.recommender.as_ref() else {
            return;
        };
        let suggestion = recommender.draw(&mut rand::thread_rng());
        let status = match &suggestion {
            Suggestion::Picked(recommendation) => format!(
                "Picked {} from {} eligible game(s)",
                recommendation.game.display_name(),
                recommendation.eligible
            ),
            Suggestion::NoEligibleGame => "No eligible game for these filters".to_string(),
        };
        self.bot.suggestion = Some(suggestion);
        self.set_status(status);
    }

    fn draw(&mut self, frame: &mut Frame) {
        let area = frame.size();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(6), Constraint::Length(3)])
            .split(area);

        match self.controller.screen().cloned() {
            Some(Screen::List) => self.draw_list(frame, chunks[0]),
            Some(Screen::Detail(_)) => self.draw_detail(frame, chunks[0]),
            Some(Screen::Edit(_)) => self.draw_edit(frame, chunks[0]),
            Some(Screen::Recommend) => self.draw_bot(frame, chunks[0], area),
            None => {}
        }
        self.render_status(frame, chunks[1]);
    }

    fn draw_list(&mut self, frame: &mut Frame, area: Rect) {
        let height = area.height.saturating_sub(2) as usize;
        self.list.height = height;
        self.list.clamp(self.games.len());

        let selected_count = self.controller.selected_ids().len();
        let title = if selected_count > 0 {
            format!("{selected_count} selected")
        } else {
            format!("Games ({})", self.games.len())
        };
        let block = Block::default().borders(Borders::ALL).title(title);

        if self.games.is_empty() {
            let paragraph = Paragraph::new(vec![
                Line::from("No games yet."),
                Line::from(Span::styled(
                    "Press n to add one.",
                    Style::default().fg(self.theme.muted),
                )),
            ])
            .block(block)
            .alignment(Alignment::Center);
            frame.render_widget(paragraph, area);
            return;
        }

        let end = (self.list.offset + height.max(1)).min(self.games.len());
        let items: Vec<ListItem> = self.games[self.list.offset..end]
            .iter()
            .enumerate()
            .map(|(idx, game)| {
                let global_index = self.list.offset + idx;
                let marker = if global_index == self.list.cursor {
                    Span::styled(
                        "▶ ",
                        Style::default()
                            .fg(self.theme.accent)
                            .add_modifier(Modifier::BOLD),
                    )
                } else {
                    Span::raw("  ")
                };
                let check = if self.controller.navigator().is_selected(&game.id) {
                    Span::styled("[x] ", Style::default().fg(self.theme.warning))
                } else {
                    Span::raw("[ ] ")
                };
                let title = Span::styled(
                    game.display_name().to_string(),
                    Style::default()
                        .fg(self.theme.primary_fg)
                        .add_modifier(Modifier::BOLD),
                );
                let summary = Span::styled(
                    format!(
                        "  {} · {} · {} · {} players{}",
                        attribute_label(game.complexity),
                        attribute_label(game.duration),
                        attribute_label(game.size),
                        game.players_label(),
                        if game.is_coop { " · co-op" } else { "" }
                    ),
                    Style::default().fg(self.theme.muted),
                );
                ListItem::new(Line::from(vec![marker, check, title, summary]))
            })
            .collect();

        let mut list_state = ListState::default();
        list_state.select(Some(self.list.cursor.saturating_sub(self.list.offset)));
        let list = List::new(items)
            .block(block)
            .highlight_style(Style::default().bg(self.theme.selection_bg));
        frame.render_stateful_widget(list, area, &mut list_state);
    }

    fn game_lines(&self, game: &GameEntry) -> Vec<Line<'static>> {
        let mut lines = vec![
            Line::from(Span::styled(
                game.display_name().to_string(),
                Style::default()
                    .fg(self.theme.accent)
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Line::from(format!("Players:    {}", game.players_label())),
            Line::from(format!("Complexity: {}", attribute_label(game.complexity))),
            Line::from(format!("Duration:   {}", attribute_label(game.duration))),
            Line::from(format!("Size:       {}", attribute_label(game.size))),
            Line::from(format!(
                "Mode:       {}",
                if game.is_coop { "Co-op" } else { "Competitive" }
            )),
        ];
        if game.has_picture() {
            lines.push(Line::from(format!("Picture:    {}", game.picture)));
        }
        lines
    }

    fn draw_detail(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default().borders(Borders::ALL).title("Game Details");
        let Some(game) = self.current.as_ref() else {
            let paragraph = Paragraph::new("This game could not be found.")
                .block(block)
                .alignment(Alignment::Center);
            frame.render_widget(paragraph, area);
            return;
        };
        let mut lines = self.game_lines(game);
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            "e edit · l list · b bot · Esc back",
            Style::default().fg(self.theme.muted),
        )));
        let paragraph = Paragraph::new(lines).block(block).wrap(Wrap { trim: true });
        frame.render_widget(paragraph, area);
    }

    fn draw_edit(&self, frame: &mut Frame, area: Rect) {
        let Some(game) = self.current.as_ref() else {
            let block = Block::default().borders(Borders::ALL).title("Edit");
            let paragraph = Paragraph::new("This game could not be found.")
                .block(block)
                .alignment(Alignment::Center);
            frame.render_widget(paragraph, area);
            return;
        };

        let mut lines = Vec::new();
        for (idx, field) in EditField::ALL.iter().copied().enumerate() {
            let focused = idx == self.edit.cursor;
            let marker = if focused {
                Span::styled("▶ ", Style::default().fg(self.theme.accent))
            } else {
                Span::raw("  ")
            };
            let value = match (field, self.edit.input.as_ref()) {
                (_, Some(input)) if focused => format!("> {}", input.value()),
                (EditField::Name, _) => game.display_name().to_string(),
                (EditField::MinPlayers, _) => game.min_players.to_string(),
                (EditField::MaxPlayers, _) => game.max_players.to_string(),
                (EditField::Duration, _) => attribute_label(game.duration),
                (EditField::Complexity, _) => attribute_label(game.complexity),
                (EditField::Size, _) => attribute_label(game.size),
                (EditField::Coop, _) => (if game.is_coop { "yes" } else { "no" }).to_string(),
                (EditField::Picture, _) if game.has_picture() => game.picture.clone(),
                (EditField::Picture, _) => "(none)".to_string(),
            };
            let style = if focused {
                Style::default().add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };
            lines.push(Line::from(vec![
                marker,
                Span::styled(format!("{:<12}", field.label()), style),
                Span::styled(value, style.fg(self.theme.primary_fg)),
            ]));
        }
        lines.push(Line::from(""));
        let help = if self.edit.input.is_some() {
            "Enter save · Esc cancel"
        } else {
            "←/→ change · Enter edit text · d done · Esc back"
        };
        lines.push(Line::from(Span::styled(
            help,
            Style::default().fg(self.theme.muted),
        )));

        let title = format!("Edit · {}", game.display_name());
        let block = Block::default().borders(Borders::ALL).title(title);
        let paragraph = Paragraph::new(lines).block(block);
        frame.render_widget(paragraph, area);

        if let Some(input) = self.edit.input.as_ref() {
            let row = area.y + 1 + self.edit.cursor as u16;
            let column = area.x + 1 + 2 + 12 + 2 + input.cursor() as u16;
            frame.set_cursor(
                column.min(area.x + area.width.saturating_sub(2)),
                row.min(area.y + area.height.saturating_sub(2)),
            );
        }
    }

    fn draw_bot(&self, frame: &mut Frame, area: Rect, full: Rect) {
        let mut lines = Vec::new();
        let mut last_group = "";
        for (idx, field) in self.bot.fields().iter().copied().enumerate() {
            if field.group() != last_group {
                if !last_group.is_empty() {
                    lines.push(Line::from(""));
                }
                last_group = field.group();
                lines.push(Line::from(Span::styled(
                    last_group,
                    Style::default()
                        .fg(self.theme.accent)
                        .add_modifier(Modifier::BOLD),
                )));
            }
            let focused = idx == self.bot.cursor;
            let marker = if focused {
                Span::styled("▶ ", Style::default().fg(self.theme.accent))
            } else {
                Span::raw("  ")
            };
            let value = match field {
                BotField::Players => format!("◀ {:>2} ▶", self.bot.criteria.players),
                _ if field.is_on(&self.bot.criteria) => "[on]".to_string(),
                _ => "[  ]".to_string(),
            };
            let style = if focused {
                Style::default().add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };
            lines.push(Line::from(vec![
                marker,
                Span::styled(format!("{:<12}", field.label()), style),
                Span::styled(value, style),
            ]));
        }
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            "Space toggle · ←/→ players · Enter find · a again · Esc back",
            Style::default().fg(self.theme.muted),
        )));

        let block = Block::default().borders(Borders::ALL).title("Game Bot");
        frame.render_widget(Paragraph::new(lines).block(block), area);

        if let Some(suggestion) = self.bot.suggestion.as_ref() {
            self.render_suggestion(frame, full, suggestion);
        }
    }

    fn render_suggestion(&self, frame: &mut Frame, full: Rect, suggestion: &Suggestion) {
        let (title, color, mut lines) = match suggestion {
            Suggestion::Picked(Recommendation {
                game,
                eligible,
                drawn_at,
            }) => {
                let mut lines = self.game_lines(game);
                lines.push(Line::from(""));
                lines.push(Line::from(Span::styled(
                    format!(
                        "Drawn from {eligible} eligible game(s) at {}",
                        drawn_at.with_timezone(&chrono::Local).format("%H:%M:%S")
                    ),
                    Style::default().fg(self.theme.muted),
                )));
                ("Let's play", self.theme.success, lines)
            }
            Suggestion::NoEligibleGame => (
                "No match",
                self.theme.danger,
                vec![
                    Line::from("No eligible game."),
                    Line::from("Try different filters."),
                ],
            ),
        };
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            "a again · Esc close",
            Style::default().fg(self.theme.muted),
        )));

        let height = (lines.len() as u16 + 2).min(full.height);
        let area = centered_rect(48, height, full);
        frame.render_widget(Clear, area);
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(color))
            .title(title);
        let paragraph = Paragraph::new(lines)
            .block(block)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, area);
    }

    fn render_status(&self, frame: &mut Frame, area: Rect) {
        let title = self
            .controller
            .screen()
            .map(|screen| screen.title())
            .unwrap_or("GameBot");
        let block = Block::default()
            .borders(Borders::ALL)
            .title(format!("Status · {title}"));
        let help = match self.controller.screen() {
            Some(Screen::List) => {
                "Enter open · Space select · n new · d delete · c clear · b bot · q quit"
            }
            _ => "Ctrl-C quit",
        };
        let paragraph = Paragraph::new(vec![
            Line::from(self.status.clone()),
            Line::from(Span::styled(help, Style::default().fg(self.theme.muted))),
        ])
        .block(block)
        .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, area);
    }
}

/// Cursor and scroll offset of the game list.
#[derive(Debug, Clone, Default)]
struct ListCursor {
    cursor: usize,
    offset: usize,
    height: usize,
}

impl ListCursor {
    fn move_cursor(&mut self, delta: isize, total: usize) {
        if total == 0 {
            return;
        }
        let last = total as isize - 1;
        self.cursor = (self.cursor as isize + delta).clamp(0, last) as usize;
        self.ensure_visible(total);
    }

    fn move_to(&mut self, index: usize, total: usize) {
        if total == 0 {
            return;
        }
        self.cursor = index.min(total - 1);
        self.ensure_visible(total);
    }

    fn page(&mut self, direction: isize, total: usize) {
        let step = self.height.max(1).min(total.max(1)) as isize;
        self.move_cursor(direction * step, total);
    }

    fn clamp(&mut self, total: usize) {
        if total == 0 {
            self.cursor = 0;
            self.offset = 0;
            return;
        }
        if self.cursor >= total {
            self.cursor = total - 1;
        }
        self.ensure_visible(total);
    }

    fn ensure_visible(&mut self, total: usize) {
        let height = self.height.max(1);
        if self.cursor < self.offset {
            self.offset = self.cursor;
        } else if self.cursor >= self.offset + height {
            self.offset = self.cursor + 1 - height;
        }
        self.offset = self.offset.min(total.saturating_sub(height));
    }
}

fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
    disable_raw_mode().context("failed to disable raw mode")?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)
        .context("failed to leave alternate screen")?;
    terminal.show_cursor()?;
    Ok(())
}

fn spawn_input_thread(sender: mpsc::Sender<AppEvent>) {
    thread::spawn(move || loop {
        match event::poll(TICK_RATE) {
            Ok(true) => match event::read() {
                Ok(evt) => {
                    if sender.blocking_send(AppEvent::Input(evt)).is_err() {
                        break;
                    }
                }
                Err(_) => break,
            },
            Ok(false) => {
                if sender.blocking_send(AppEvent::Tick).is_err() {
                    break;
                }
            }
            Err(_) => break,
        }
    });
}

fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width, height)
}
