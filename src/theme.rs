use ratatui::{
    style::{Color, Modifier, Style},
    text::Span,
    widgets::{Block, BorderType, Borders, Padding},
};

const ACCENT: Color = Color::Rgb(0, 122, 204);
const ERROR: Color = Color::Rgb(220, 60, 60);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ThemeMode {
    #[default]
    Dark,
    Light,
}

impl ThemeMode {
    pub fn label(self) -> &'static str {
        match self {
            ThemeMode::Dark => "Dark",
            ThemeMode::Light => "Light",
        }
    }
}

/// Holds only the mode flag; colors are derived on every lookup.
#[derive(Debug, Clone, Copy, Default)]
pub struct ThemeState {
    mode: ThemeMode,
}

impl ThemeState {
    pub fn mode(&self) -> ThemeMode {
        self.mode
    }

    pub fn toggle(&mut self) {
        self.mode = match self.mode {
            ThemeMode::Dark => ThemeMode::Light,
            ThemeMode::Light => ThemeMode::Dark,
        };
    }

    pub fn palette(&self) -> Palette {
        Palette::for_mode(self.mode)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub background: Color,
    pub surface: Color,
    pub text: Color,
    pub subtle: Color,
    pub accent: Color,
    pub error: Color,
}

impl Palette {
    pub fn for_mode(mode: ThemeMode) -> Self {
        match mode {
            ThemeMode::Dark => Self {
                background: Color::Rgb(28, 28, 28),
                surface: Color::Rgb(45, 45, 48),
                text: Color::Rgb(255, 255, 255),
                subtle: Color::Rgb(170, 170, 170),
                accent: ACCENT,
                error: ERROR,
            },
            ThemeMode::Light => Self {
                background: Color::Rgb(242, 242, 242),
                surface: Color::Rgb(255, 255, 255),
                text: Color::Rgb(0, 0, 0),
                subtle: Color::Rgb(100, 100, 100),
                accent: ACCENT,
                error: ERROR,
            },
        }
    }

    pub fn block(&self, title: &str) -> Block<'static> {
        Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(self.subtle))
            .style(Style::default().bg(self.background).fg(self.text))
            .title(Span::styled(
                title.to_string(),
                Style::default()
                    .fg(self.accent)
                    .add_modifier(Modifier::BOLD),
            ))
    }

    pub fn panel(&self, title: &str) -> Block<'static> {
        self.block(title).padding(Padding {
            left: 1,
            right: 1,
            top: 0,
            bottom: 0,
        })
    }

    pub fn highlight(&self) -> Style {
        Style::default()
            .bg(self.accent)
            .fg(Color::White)
            .add_modifier(Modifier::BOLD)
    }
}
