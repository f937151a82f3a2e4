use crate::config::{Config, WidgetPosition};
use crate::conversation::{ConversationViewModel, ReplyOutcome, ReplyProducer, SubmitOutcome, ViewState};
use crate::ui::widget::commands::{SlashCommand, get_help_text};
use crate::ui::widget::composer::{ComposerResult, MessageComposer};
use crate::ui::widget::message_list::{MessageList, MessageListState};
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, StatefulWidget, Widget, Wrap},
};
use std::str::FromStr;
use std::sync::Arc;

const PANEL_WIDTH: u16 = 48;
const PANEL_HEIGHT: u16 = 22;
const BUTTON_WIDTH: u16 = 8;
const BUTTON_HEIGHT: u16 = 3;

/// Actions the shell asks its host to perform
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShellAction {
    None,
    OpenDashboard,
    Quit,
}

/// Floating chat widget: the button when closed, the chat panel when open
pub struct ChatWidgetShell {
    view_model: ConversationViewModel,
    composer: MessageComposer,
    list_state: MessageListState,
    is_open: bool,
    title: String,
    subtitle: String,
    agent_name: String,
    position: WidgetPosition,
    handoff_enabled: bool,
    primary: Color,
    secondary: Color,
    notice: Option<String>,
}

/// Parse a `#rrggbb` colour, falling back when the value is not usable
pub fn parse_color(value: &str, fallback: Color) -> Color {
    Color::from_str(value.trim()).unwrap_or(fallback)
}

impl ChatWidgetShell {
    pub fn new(config: &Config, producer: Arc<dyn ReplyProducer>) -> Self {
        let widget = &config.widget;
        let primary = parse_color(&widget.primary_color, Color::Blue);
        let secondary = parse_color(&widget.secondary_color, Color::White);

        let mut composer = MessageComposer::new("Type your message here...", primary);
        composer.set_focus(widget.initial_open);

        Self {
            view_model: ConversationViewModel::new(producer, widget.greeting()),
            composer,
            list_state: MessageListState::default(),
            is_open: widget.initial_open,
            title: widget.title.clone(),
            subtitle: widget.subtitle.clone(),
            agent_name: widget.agent_name.clone(),
            position: widget.position,
            handoff_enabled: config.assistant.human_handoff,
            primary,
            secondary,
            notice: None,
        }
    }

    pub fn view_model(&self) -> &ConversationViewModel {
        &self.view_model
    }

    pub fn is_open(&self) -> bool {
        self.is_open
    }

    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    pub fn toggle(&mut self) {
        self.is_open = !self.is_open;
        self.composer.set_focus(self.is_open);
    }

    /// Apply a finished reply, if any. Called on every UI tick.
    pub fn tick(&mut self) -> Option<ReplyOutcome> {
        let outcome = self.view_model.poll_reply();
        self.sync_composer();
        outcome
    }

    fn sync_composer(&mut self) {
        self.composer
            .set_disabled(self.view_model.state() == ViewState::AwaitingReply);
    }

    fn can_request_human(&self) -> bool {
        self.handoff_enabled && !self.view_model.conversation().is_human_agent()
    }

    /// Route a key to the widget. Keys are only consumed while the panel is open,
    /// apart from the open shortcut.
    pub fn handle_key(&mut self, key: KeyEvent) -> ShellAction {
        if key.kind != KeyEventKind::Press {
            return ShellAction::None;
        }

        if !self.is_open {
            if matches!(key.code, KeyCode::Enter | KeyCode::Char('c')) {
                self.toggle();
            }
            return ShellAction::None;
        }

        if key.modifiers.contains(KeyModifiers::CONTROL) {
            if key.code == KeyCode::Char('h') {
                self.request_human_agent();
            }
            return ShellAction::None;
        }

        match key.code {
            KeyCode::Esc => {
                self.toggle();
                return ShellAction::None;
            }
            KeyCode::PageUp => {
                self.list_state.scroll_up(5);
                return ShellAction::None;
            }
            KeyCode::PageDown => {
                self.list_state.scroll_down(5);
                return ShellAction::None;
            }
            _ => {}
        }

        match self.composer.handle_key(key) {
            ComposerResult::Submitted(text) => {
                self.notice = None;
                self.submit(&text);
                ShellAction::None
            }
            ComposerResult::Command(command) => self.run_command(command),
            ComposerResult::None => ShellAction::None,
        }
    }

    pub fn submit(&mut self, text: &str) -> SubmitOutcome {
        let outcome = self.view_model.submit(text);
        self.sync_composer();
        outcome
    }

    fn request_human_agent(&mut self) {
        if self.can_request_human() {
            self.view_model.request_human_agent();
        } else if !self.handoff_enabled {
            self.notice = Some("Human handoff is turned off for this widget.".to_string());
        }
    }

    fn run_command(&mut self, command: SlashCommand) -> ShellAction {
        match command {
            SlashCommand::Human => {
                self.request_human_agent();
                ShellAction::None
            }
            SlashCommand::Close => {
                self.toggle();
                ShellAction::None
            }
            SlashCommand::Dashboard => ShellAction::OpenDashboard,
            SlashCommand::Quit => ShellAction::Quit,
            SlashCommand::Help => {
                self.notice = Some(get_help_text());
                ShellAction::None
            }
        }
    }

    /// Area the widget occupies inside the page
    pub fn area(&self, page: Rect) -> Rect {
        let (width, height) = if self.is_open {
            (PANEL_WIDTH.min(page.width), PANEL_HEIGHT.min(page.height))
        } else {
            (BUTTON_WIDTH.min(page.width), BUTTON_HEIGHT.min(page.height))
        };

        let right = page.x + page.width.saturating_sub(width);
        let bottom = page.y + page.height.saturating_sub(height);
        let (x, y) = match self.position {
            WidgetPosition::BottomRight => (right, bottom),
            WidgetPosition::BottomLeft => (page.x, bottom),
            WidgetPosition::TopRight => (right, page.y),
            WidgetPosition::TopLeft => (page.x, page.y),
        };

        Rect::new(x, y, width, height)
    }

    pub fn render(&mut self, page: Rect, buf: &mut Buffer) {
        let area = self.area(page);
        Clear.render(area, buf);

        if !self.is_open {
            Paragraph::new(Line::from(Span::styled(
                " 💬 ",
                Style::default().fg(self.secondary).bg(self.primary),
            )))
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(self.primary)),
            )
            .render(area, buf);
            return;
        }

        let frame = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(self.primary));
        let inner = frame.inner(area);
        frame.render(area, buf);

        let footer_height = if self.can_request_human() { 1 } else { 0 };
        let notice_height = self
            .notice
            .as_ref()
            .map(|notice| (notice.lines().count() as u16).min(6))
            .unwrap_or(0);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(2),             // Header
                Constraint::Min(3),                // Messages
                Constraint::Length(notice_height), // Notice
                Constraint::Length(3),             // Composer
                Constraint::Length(footer_height), // Handoff hint
            ])
            .split(inner);

        self.render_header(chunks[0], buf);

        let conversation = self.view_model.conversation();
        let typing = if conversation.is_agent_typing() {
            self.view_model.pending_sender()
        } else {
            None
        };
        MessageList::new(conversation.messages(), &self.agent_name)
            .typing(typing)
            .accent(self.primary)
            .render(chunks[1], buf, &mut self.list_state);

        if let Some(notice) = &self.notice {
            Paragraph::new(notice.as_str())
                .style(Style::default().fg(Color::Yellow))
                .wrap(Wrap { trim: false })
                .render(chunks[2], buf);
        }

        (&self.composer).render(chunks[3], buf);

        if footer_height > 0 {
            Paragraph::new(Line::from(vec![
                Span::styled("Ctrl+H", Style::default().add_modifier(Modifier::BOLD)),
                Span::styled("  talk to a human agent", Style::default().fg(Color::DarkGray)),
            ]))
            .alignment(ratatui::layout::Alignment::Center)
            .render(chunks[4], buf);
        }
    }

    fn render_header(&self, area: Rect, buf: &mut Buffer) {
        let header_style = Style::default().fg(self.secondary).bg(self.primary);
        let subtitle = if self.view_model.conversation().is_human_agent() {
            "Human Agent"
        } else {
            self.subtitle.as_str()
        };

        Paragraph::new(vec![
            Line::from(Span::styled(
                format!(" {}", self.title),
                header_style.add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(format!(" {}", subtitle), header_style)),
        ])
        .style(header_style)
        .render(area, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conversation::{MockReplyProducer, Sender};
    use pretty_assertions::assert_eq;
    use std::time::Duration;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn ctrl(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL)
    }

    fn shell(config: &Config) -> ChatWidgetShell {
        ChatWidgetShell::new(
            config,
            Arc::new(MockReplyProducer::new(Duration::from_millis(1500))),
        )
    }

    fn type_line(shell: &mut ChatWidgetShell, text: &str) -> ShellAction {
        for c in text.chars() {
            shell.handle_key(key(KeyCode::Char(c)));
        }
        shell.handle_key(key(KeyCode::Enter))
    }

    #[tokio::test(start_paused = true)]
    async fn keys_are_ignored_until_opened() {
        let mut shell = shell(&Config::default());
        assert!(!shell.is_open());

        shell.handle_key(key(KeyCode::Char('x')));
        shell.handle_key(key(KeyCode::Enter));
        assert!(shell.is_open());
        assert_eq!(shell.view_model().conversation().message_count(), 1);

        shell.handle_key(key(KeyCode::Esc));
        assert!(!shell.is_open());
    }

    #[tokio::test(start_paused = true)]
    async fn typed_message_flows_to_the_view_model() {
        let mut config = Config::default();
        config.widget.initial_open = true;
        let mut shell = shell(&config);

        type_line(&mut shell, "Hi");

        assert_eq!(shell.view_model().state(), ViewState::AwaitingReply);
        assert_eq!(shell.view_model().conversation().message_count(), 2);

        // Composer is disabled until the reply lands
        type_line(&mut shell, "again");
        assert_eq!(shell.view_model().conversation().message_count(), 2);

        tokio::time::sleep(Duration::from_millis(1600)).await;
        assert!(shell.tick().is_some());
        assert_eq!(shell.view_model().conversation().message_count(), 3);
        assert_eq!(shell.view_model().state(), ViewState::Idle);
    }

    #[tokio::test(start_paused = true)]
    async fn ctrl_h_hands_off_once_and_hides_the_hint() {
        let mut config = Config::default();
        config.widget.initial_open = true;
        let mut shell = shell(&config);

        shell.handle_key(ctrl('h'));
        shell.handle_key(ctrl('h'));

        let conversation = shell.view_model().conversation();
        assert!(conversation.is_human_agent());
        assert_eq!(conversation.message_count(), 2);
        assert_eq!(conversation.last().unwrap().sender, Sender::Ai);
    }

    #[tokio::test(start_paused = true)]
    async fn handoff_respects_configuration() {
        let mut config = Config::default();
        config.widget.initial_open = true;
        config.assistant.human_handoff = false;
        let mut shell = shell(&config);

        type_line(&mut shell, "/human");

        assert!(!shell.view_model().conversation().is_human_agent());
        assert!(shell.notice().is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn slash_commands_map_to_actions() {
        let mut config = Config::default();
        config.widget.initial_open = true;
        let mut shell = shell(&config);

        assert_eq!(type_line(&mut shell, "/admin"), ShellAction::OpenDashboard);
        assert_eq!(type_line(&mut shell, "/q"), ShellAction::Quit);
        type_line(&mut shell, "/help");
        assert!(shell.notice().unwrap().contains("/human"));
        type_line(&mut shell, "/close");
        assert!(!shell.is_open());
    }

    #[test]
    fn widget_sits_in_the_configured_corner() {
        let page = Rect::new(0, 0, 100, 40);
        let mut config = Config::default();

        config.widget.position = WidgetPosition::BottomRight;
        let shell_br = shell(&config);
        assert_eq!(shell_br.area(page), Rect::new(92, 37, 8, 3));

        config.widget.position = WidgetPosition::TopLeft;
        config.widget.initial_open = true;
        let shell_tl = shell(&config);
        assert_eq!(shell_tl.area(page), Rect::new(0, 0, 48, 22));
    }

    #[test]
    fn colors_parse_from_hex() {
        assert_eq!(parse_color("#4f46e5", Color::Blue), Color::Rgb(0x4f, 0x46, 0xe5));
        assert_eq!(parse_color("not a colour", Color::Blue), Color::Blue);
    }

    #[tokio::test(start_paused = true)]
    async fn renders_open_panel_without_panicking() {
        let mut config = Config::default();
        config.widget.initial_open = true;
        let mut shell = shell(&config);
        shell.submit("Hello");

        let page = Rect::new(0, 0, 80, 30);
        let mut buf = Buffer::empty(page);
        shell.render(page, &mut buf);

        let text: String = (0..page.height)
            .flat_map(|y| (0..page.width).map(move |x| (x, y)))
            .map(|(x, y)| buf.get(x, y).symbol().to_string())
            .collect();
        assert!(text.contains("Chat Support"));
    }
}
