use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction as LayoutDirection, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph},
};

use crate::game::{BoardSnapshot, Direction, Phase, Position};
use crate::modes::login::{LoginField, LoginForm};
use crate::store::UserStats;

/// Cell glyphs for one rendering strategy
///
/// Two fixed sets exist: a Unicode one and a plain-ASCII fallback for
/// terminals that cannot show the former. Which one is in effect makes no
/// functional difference; the head glyph is the only element that varies
/// with the snake's heading.
pub struct GlyphSet {
    head_up: &'static str,
    head_down: &'static str,
    head_left: &'static str,
    head_right: &'static str,
    body: &'static str,
    food: &'static str,
    empty: &'static str,
}

impl GlyphSet {
    pub fn unicode() -> Self {
        Self {
            head_up: "▲ ",
            head_down: "▼ ",
            head_left: "◀ ",
            head_right: "▶ ",
            body: "■ ",
            food: "● ",
            empty: "· ",
        }
    }

    pub fn ascii() -> Self {
        Self {
            head_up: "^ ",
            head_down: "v ",
            head_left: "< ",
            head_right: "> ",
            body: "o ",
            food: "* ",
            empty: ". ",
        }
    }

    /// Pick a set from the locale: UTF-8 terminals get the Unicode glyphs
    pub fn detect() -> Self {
        let utf8 = std::env::var("LC_ALL")
            .or_else(|_| std::env::var("LANG"))
            .map(|value| value.to_ascii_uppercase().contains("UTF-8") || value.to_ascii_uppercase().contains("UTF8"))
            .unwrap_or(false);
        if utf8 { Self::unicode() } else { Self::ascii() }
    }

    fn head(&self, heading: Direction) -> &'static str {
        match heading {
            Direction::Up => self.head_up,
            Direction::Down => self.head_down,
            Direction::Left => self.head_left,
            Direction::Right => self.head_right,
        }
    }
}

/// HUD values shown alongside the grid
pub struct HudContext<'a> {
    pub username: &'a str,
    pub stats: UserStats,
    pub clock: String,
}

pub struct Renderer {
    glyphs: GlyphSet,
}

impl Renderer {
    pub fn new(glyphs: GlyphSet) -> Self {
        Self { glyphs }
    }

    /// Draw the game screen: HUD header, grid with per-phase overlay,
    /// controls footer. Pure over the snapshot; drawing twice for the same
    /// snapshot yields the same frame.
    pub fn render_game(&self, frame: &mut Frame, snapshot: &BoardSnapshot, hud: &HudContext) {
        let chunks = Layout::default()
            .direction(LayoutDirection::Vertical)
            .constraints([
                Constraint::Length(3), // Header
                Constraint::Min(0),    // Game area
                Constraint::Length(3), // Footer
            ])
            .split(frame.area());

        frame.render_widget(self.hud_line(snapshot, hud), chunks[0]);

        let game_area = Layout::default()
            .direction(LayoutDirection::Horizontal)
            .constraints([
                Constraint::Percentage(10),
                Constraint::Percentage(80),
                Constraint::Percentage(10),
            ])
            .split(chunks[1])[1];

        frame.render_widget(self.grid(snapshot), game_area);

        match snapshot.phase {
            Phase::Paused => self.overlay(frame, game_area, self.paused_panel()),
            Phase::GameOver => self.overlay(frame, game_area, self.game_over_panel(snapshot, hud)),
            Phase::Idle | Phase::Playing => {}
        }

        frame.render_widget(self.controls_line(snapshot.phase), chunks[2]);
    }

    /// Draw the login screen
    pub fn render_login(&self, frame: &mut Frame, form: &LoginForm) {
        let outer = Layout::default()
            .direction(LayoutDirection::Vertical)
            .constraints([
                Constraint::Min(0),
                Constraint::Length(12),
                Constraint::Min(0),
            ])
            .split(frame.area())[1];
        let panel = Layout::default()
            .direction(LayoutDirection::Horizontal)
            .constraints([
                Constraint::Min(0),
                Constraint::Length(44),
                Constraint::Min(0),
            ])
            .split(outer)[1];

        let field_line = |label: &'static str, value: String, focused: bool| {
            let style = if focused {
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::Gray)
            };
            let cursor = if focused { "_" } else { "" };
            Line::from(vec![
                Span::styled(label, style),
                Span::styled(format!("{value}{cursor}"), Style::default().fg(Color::White)),
            ])
        };

        let mut lines = vec![
            Line::from(Span::styled(
                "SNAKE",
                Style::default()
                    .fg(Color::Green)
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            field_line(
                "Username: ",
                form.username.clone(),
                form.focus == LoginField::Username,
            ),
            field_line(
                "Password: ",
                "*".repeat(form.password.chars().count()),
                form.focus == LoginField::Password,
            ),
            Line::from(""),
        ];

        lines.push(match &form.error {
            Some(reason) => Line::from(Span::styled(
                reason.clone(),
                Style::default().fg(Color::Red),
            )),
            None => Line::from(Span::styled(
                "New usernames are registered automatically",
                Style::default().fg(Color::DarkGray),
            )),
        });

        lines.push(Line::from(""));
        lines.push(Line::from(vec![
            Span::styled("Enter", Style::default().fg(Color::Cyan)),
            Span::raw(" log in | "),
            Span::styled("Tab", Style::default().fg(Color::Cyan)),
            Span::raw(" switch field | "),
            Span::styled("Ctrl+G", Style::default().fg(Color::Cyan)),
            Span::raw(" guest | "),
            Span::styled("Esc", Style::default().fg(Color::Red)),
            Span::raw(" quit"),
        ]));

        let widget = Paragraph::new(lines).alignment(Alignment::Center).block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .title(" Sign in "),
        );
        frame.render_widget(widget, panel);
    }

    fn grid(&self, snapshot: &BoardSnapshot) -> Paragraph<'_> {
        let head = snapshot.segments[0];
        let mut lines = Vec::with_capacity(snapshot.grid_size);

        for y in 0..snapshot.grid_size {
            let mut spans = Vec::with_capacity(snapshot.grid_size);

            for x in 0..snapshot.grid_size {
                let pos = Position::new(x as i32, y as i32);

                let cell = if pos == head {
                    Span::styled(
                        self.glyphs.head(snapshot.heading),
                        Style::default()
                            .fg(Color::Cyan)
                            .add_modifier(Modifier::BOLD),
                    )
                } else if snapshot.segments.contains(&pos) {
                    Span::styled(self.glyphs.body, Style::default().fg(Color::Green))
                } else if pos == snapshot.food {
                    Span::styled(
                        self.glyphs.food,
                        Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
                    )
                } else {
                    Span::styled(self.glyphs.empty, Style::default().fg(Color::DarkGray))
                };

                spans.push(cell);
            }

            lines.push(Line::from(spans));
        }

        Paragraph::new(lines)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_type(BorderType::Double)
                    .border_style(Style::default().fg(Color::White))
                    .title(" Snake "),
            )
            .alignment(Alignment::Center)
    }

    fn hud_line(&self, snapshot: &BoardSnapshot, hud: &HudContext) -> Paragraph<'_> {
        let text = vec![Line::from(vec![
            Span::styled("Player: ", Style::default().fg(Color::Yellow)),
            Span::styled(
                hud.username.to_string(),
                Style::default()
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw("    "),
            Span::styled("Score: ", Style::default().fg(Color::Yellow)),
            Span::styled(
                snapshot.score.to_string(),
                Style::default()
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw("    "),
            Span::styled("Best: ", Style::default().fg(Color::Yellow)),
            Span::styled(
                hud.stats.high_score.to_string(),
                Style::default().fg(Color::White),
            ),
            Span::raw("    "),
            Span::styled("Games: ", Style::default().fg(Color::Yellow)),
            Span::styled(
                hud.stats.games_played.to_string(),
                Style::default().fg(Color::White),
            ),
            Span::raw("    "),
            Span::styled("Time: ", Style::default().fg(Color::Yellow)),
            Span::styled(hud.clock.clone(), Style::default().fg(Color::White)),
        ])];

        Paragraph::new(text).alignment(Alignment::Center)
    }

    fn paused_panel(&self) -> Paragraph<'_> {
        let text = vec![
            Line::from(""),
            Line::from(Span::styled(
                "PAUSED",
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Line::from(vec![
                Span::styled("Press ", Style::default().fg(Color::Gray)),
                Span::styled(
                    "Space",
                    Style::default()
                        .fg(Color::Green)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled(" to resume", Style::default().fg(Color::Gray)),
            ]),
        ];

        Paragraph::new(text).alignment(Alignment::Center).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Yellow)),
        )
    }

    fn game_over_panel(&self, snapshot: &BoardSnapshot, hud: &HudContext) -> Paragraph<'_> {
        let text = vec![
            Line::from(""),
            Line::from(Span::styled(
                "GAME OVER",
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Line::from(vec![
                Span::styled("Final Score: ", Style::default().fg(Color::Yellow)),
                Span::styled(
                    snapshot.score.to_string(),
                    Style::default()
                        .fg(Color::White)
                        .add_modifier(Modifier::BOLD),
                ),
            ]),
            Line::from(vec![
                Span::styled("Personal Best: ", Style::default().fg(Color::Yellow)),
                Span::styled(
                    hud.stats.high_score.max(snapshot.score).to_string(),
                    Style::default().fg(Color::White),
                ),
            ]),
            Line::from(""),
            Line::from(vec![
                Span::styled("Press ", Style::default().fg(Color::Gray)),
                Span::styled(
                    "Space",
                    Style::default()
                        .fg(Color::Green)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled(" to play again", Style::default().fg(Color::Gray)),
            ]),
        ];

        Paragraph::new(text).alignment(Alignment::Center).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Red)),
        )
    }

    fn controls_line(&self, phase: Phase) -> Paragraph<'_> {
        let space_hint = match phase {
            Phase::Idle | Phase::GameOver => "start",
            Phase::Playing => "pause",
            Phase::Paused => "resume",
        };
        let text = vec![Line::from(vec![
            Span::styled("↑↓←→", Style::default().fg(Color::Cyan)),
            Span::raw(" or "),
            Span::styled("WASD", Style::default().fg(Color::Cyan)),
            Span::raw(" to move | "),
            Span::styled("Space", Style::default().fg(Color::Green)),
            Span::raw(format!(" to {space_hint} | ")),
            Span::styled("R", Style::default().fg(Color::Yellow)),
            Span::raw(" restart | "),
            Span::styled("L", Style::default().fg(Color::Yellow)),
            Span::raw(" log out | "),
            Span::styled("Q", Style::default().fg(Color::Red)),
            Span::raw(" quit"),
        ])];

        Paragraph::new(text).alignment(Alignment::Center)
    }

    /// Draw `panel` centered over the game area
    fn overlay(&self, frame: &mut Frame, area: Rect, panel: Paragraph) {
        let vertical = Layout::default()
            .direction(LayoutDirection::Vertical)
            .constraints([
                Constraint::Min(0),
                Constraint::Length(9),
                Constraint::Min(0),
            ])
            .split(area)[1];
        let centered = Layout::default()
            .direction(LayoutDirection::Horizontal)
            .constraints([
                Constraint::Min(0),
                Constraint::Length(34),
                Constraint::Min(0),
            ])
            .split(vertical)[1];

        frame.render_widget(Clear, centered);
        frame.render_widget(panel, centered);
    }
}
