use crate::ui::pages::Palette;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind};
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
};

pub const UNAVAILABLE_NOTICE: &str = "Sign-in is not available in this demo.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthKind {
    Login,
    Register,
}

#[derive(Debug, Clone)]
pub struct FormField {
    pub label: &'static str,
    pub placeholder: &'static str,
    pub secret: bool,
    pub value: String,
}

impl FormField {
    fn new(label: &'static str, placeholder: &'static str) -> Self {
        Self {
            label,
            placeholder,
            secret: false,
            value: String::new(),
        }
    }

    fn secret(mut self) -> Self {
        self.secret = true;
        self
    }

    fn display_value(&self) -> String {
        if self.secret {
            "•".repeat(self.value.chars().count())
        } else {
            self.value.clone()
        }
    }
}

/// Login or registration form. Submitting goes nowhere.
#[derive(Debug, Clone)]
pub struct AuthForm {
    kind: AuthKind,
    palette: Palette,
    fields: Vec<FormField>,
    focused: usize,
    notice: Option<&'static str>,
}

impl AuthForm {
    pub fn new(kind: AuthKind, palette: Palette) -> Self {
        let fields = match kind {
            AuthKind::Login => vec![
                FormField::new("Email", "name@example.com"),
                FormField::new("Password", "••••••••").secret(),
            ],
            AuthKind::Register => vec![
                FormField::new("First Name", "John"),
                FormField::new("Last Name", "Doe"),
                FormField::new("Email", "name@example.com"),
                FormField::new("Company (Optional)", "Your Company"),
                FormField::new("Password", "••••••••").secret(),
                FormField::new("Confirm Password", "••••••••").secret(),
            ],
        };

        Self {
            kind,
            palette,
            fields,
            focused: 0,
            notice: None,
        }
    }

    pub fn focused(&self) -> usize {
        self.focused
    }

    pub fn fields(&self) -> &[FormField] {
        &self.fields
    }

    pub fn notice(&self) -> Option<&'static str> {
        self.notice
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.kind != KeyEventKind::Press {
            return;
        }

        match key.code {
            KeyCode::Tab | KeyCode::Down => {
                self.focused = (self.focused + 1) % self.fields.len();
            }
            KeyCode::BackTab | KeyCode::Up => {
                self.focused = (self.focused + self.fields.len() - 1) % self.fields.len();
            }
            KeyCode::Enter => {
                self.notice = Some(UNAVAILABLE_NOTICE);
            }
            KeyCode::Backspace => {
                self.fields[self.focused].value.pop();
            }
            KeyCode::Char(c) => {
                self.fields[self.focused].value.push(c);
            }
            _ => {}
        }
    }

    fn title(&self) -> (&'static str, &'static str) {
        match self.kind {
            AuthKind::Login => ("Welcome Back!", "Sign In"),
            AuthKind::Register => ("Start Your Journey", "Create Account"),
        }
    }
}

impl Widget for &AuthForm {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let palette = &self.palette;
        let (headline, action) = self.title();

        let block = Block::default()
            .borders(Borders::ALL)
            .title(format!(" AI Chat Widget · {} ", headline));
        let inner = block.inner(area);
        block.render(area, buf);

        let mut constraints: Vec<Constraint> = self.fields.iter().map(|_| Constraint::Length(3)).collect();
        constraints.push(Constraint::Length(1));
        constraints.push(Constraint::Length(1));
        constraints.push(Constraint::Min(0));
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints(constraints)
            .split(inner);

        for (index, field) in self.fields.iter().enumerate() {
            let focused = index == self.focused;
            let border = if focused {
                Style::default().fg(palette.accent)
            } else {
                Style::default().fg(Color::Gray)
            };
            let content = if field.value.is_empty() {
                Span::styled(field.placeholder, Style::default().fg(Color::DarkGray))
            } else {
                Span::raw(field.display_value())
            };

            Paragraph::new(Line::from(content))
                .block(
                    Block::default()
                        .borders(Borders::ALL)
                        .border_style(border)
                        .title(field.label),
                )
                .render(rows[index], buf);
        }

        let button_row = rows[self.fields.len()];
        Paragraph::new(Line::from(Span::styled(
            format!("[ {} ]  (Enter)", action),
            Style::default().add_modifier(Modifier::BOLD),
        )))
        .render(button_row, buf);

        if let Some(notice) = self.notice {
            Paragraph::new(Line::from(Span::styled(notice, Style::default().fg(Color::Red))))
                .render(rows[self.fields.len() + 1], buf);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;
    use pretty_assertions::assert_eq;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn palette() -> Palette {
        Palette::for_theme(crate::config::Theme::Light, Color::Blue)
    }

    #[test]
    fn register_form_has_every_field() {
        let labels: Vec<_> = AuthForm::new(AuthKind::Register, palette())
            .fields()
            .iter()
            .map(|field| field.label)
            .collect();
        assert_eq!(
            labels,
            vec![
                "First Name",
                "Last Name",
                "Email",
                "Company (Optional)",
                "Password",
                "Confirm Password"
            ]
        );
    }

    #[test]
    fn focus_wraps_and_typing_fills_the_focused_field() {
        let mut form = AuthForm::new(AuthKind::Login, palette());
        for c in "me@example.com".chars() {
            form.handle_key(key(KeyCode::Char(c)));
        }
        form.handle_key(key(KeyCode::Tab));
        for c in "hunter2".chars() {
            form.handle_key(key(KeyCode::Char(c)));
        }

        assert_eq!(form.fields()[0].value, "me@example.com");
        assert_eq!(form.fields()[1].display_value(), "•••••••");

        form.handle_key(key(KeyCode::Tab));
        assert_eq!(form.focused(), 0);
        form.handle_key(key(KeyCode::Up));
        assert_eq!(form.focused(), 1);
    }

    #[test]
    fn submitting_only_shows_a_notice() {
        let mut form = AuthForm::new(AuthKind::Login, palette());
        form.handle_key(key(KeyCode::Enter));
        assert_eq!(form.notice(), Some(UNAVAILABLE_NOTICE));
    }
}
