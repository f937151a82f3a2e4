//! Static pages hosted by the app

pub mod auth;
pub mod dashboard;
pub mod home;

pub use auth::{AuthForm, AuthKind};
pub use dashboard::DashboardPage;
pub use home::HomePage;

use crate::config::Theme;
use ratatui::style::{Color, Style};

/// Colours for page chrome in the active theme
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub background: Color,
    pub text: Color,
    pub muted: Color,
    pub accent: Color,
}

impl Palette {
    pub fn for_theme(theme: Theme, accent: Color) -> Self {
        match theme {
            Theme::Light => Self {
                background: Color::White,
                text: Color::Black,
                muted: Color::DarkGray,
                accent,
            },
            Theme::Dark => Self {
                background: Color::Black,
                text: Color::White,
                muted: Color::Gray,
                accent,
            },
        }
    }

    pub fn base(&self) -> Style {
        Style::default().fg(self.text).bg(self.background)
    }

    pub fn muted(&self) -> Style {
        Style::default().fg(self.muted).bg(self.background)
    }

    pub fn heading(&self) -> Style {
        Style::default().fg(self.accent).bg(self.background)
    }
}
