//! Message list display component

use crate::conversation::{Message, MessageKind, Sender};
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, StatefulWidget, Widget},
};

const HUMAN_AGENT_LABEL: &str = "Support Agent";

/// Scroll position of the list, counted in lines from the bottom.
///
/// Snaps back to the newest message whenever the message count changes.
#[derive(Debug, Clone, Default)]
pub struct MessageListState {
    offset_from_bottom: u16,
    seen_messages: usize,
}

impl MessageListState {
    pub fn scroll_up(&mut self, lines: u16) {
        self.offset_from_bottom = self.offset_from_bottom.saturating_add(lines);
    }

    pub fn scroll_down(&mut self, lines: u16) {
        self.offset_from_bottom = self.offset_from_bottom.saturating_sub(lines);
    }

    pub fn scroll_to_bottom(&mut self) {
        self.offset_from_bottom = 0;
    }

    pub fn offset_from_bottom(&self) -> u16 {
        self.offset_from_bottom
    }

    fn observe(&mut self, message_count: usize) {
        if message_count != self.seen_messages {
            self.seen_messages = message_count;
            self.scroll_to_bottom();
        }
    }
}

/// Renders messages in order; owns nothing besides what it borrows
pub struct MessageList<'a> {
    messages: &'a [Message],
    /// Sender of the reply being typed, if any
    typing: Option<Sender>,
    agent_name: &'a str,
    accent: Color,
}

impl<'a> MessageList<'a> {
    pub fn new(messages: &'a [Message], agent_name: &'a str) -> Self {
        Self {
            messages,
            typing: None,
            agent_name,
            accent: Color::Blue,
        }
    }

    pub fn typing(mut self, sender: Option<Sender>) -> Self {
        self.typing = sender;
        self
    }

    pub fn accent(mut self, accent: Color) -> Self {
        self.accent = accent;
        self
    }

    /// All lines for the current messages at the given width
    pub fn lines(&self, width: u16) -> Vec<Line<'static>> {
        let mut all_lines = Vec::new();
        for message in self.messages {
            all_lines.extend(self.render_message(message, width));
            // spacing between messages
            all_lines.push(Line::default());
        }
        if let Some(sender) = self.typing {
            all_lines.extend(self.render_typing(sender));
        }
        all_lines
    }

    fn sender_label(&self, sender: Sender) -> String {
        match sender {
            Sender::User => "You".to_string(),
            Sender::Ai => self.agent_name.to_string(),
            Sender::Human => HUMAN_AGENT_LABEL.to_string(),
        }
    }

    fn alignment(sender: Sender) -> Alignment {
        match sender {
            Sender::User => Alignment::Right,
            Sender::Ai | Sender::Human => Alignment::Left,
        }
    }

    fn content_style(&self, message: &Message) -> Style {
        if message.is_error() {
            return Style::default().fg(Color::Red);
        }
        match message.sender {
            Sender::User => Style::default().fg(self.accent),
            Sender::Ai => Style::default().fg(Color::Reset),
            Sender::Human => Style::default().fg(Color::Cyan),
        }
    }

    /// Render a single message into lines
    fn render_message(&self, message: &Message, width: u16) -> Vec<Line<'static>> {
        let alignment = Self::alignment(message.sender);
        let mut lines = Vec::new();

        let mut header = vec![Span::styled(
            self.sender_label(message.sender),
            Style::default().fg(Color::DarkGray).add_modifier(Modifier::BOLD),
        )];
        if message.sender == Sender::Human {
            header.push(Span::raw(" "));
            header.push(Span::styled(
                "[Human]",
                Style::default().fg(Color::Black).bg(Color::Cyan),
            ));
        }
        header.push(Span::styled(
            format!(" {}", message.timestamp.format("%H:%M")),
            Style::default().fg(Color::DarkGray),
        ));
        lines.push(Line::from(header).alignment(alignment));

        let style = self.content_style(message);
        let max_width = (width as usize).saturating_mul(4) / 5;
        match message.kind() {
            MessageKind::Text => {
                for content_line in wrap_text(message.content(), max_width.max(1)) {
                    lines.push(Line::from(Span::styled(content_line, style)).alignment(alignment));
                }
            }
            MessageKind::Image => {
                let url = message.image_url().unwrap_or_default();
                let entry = format!("[image] {}", url);
                for content_line in wrap_text(&entry, max_width.max(1)) {
                    lines.push(Line::from(Span::styled(content_line, style)).alignment(alignment));
                }
            }
        }

        lines
    }

    fn render_typing(&self, sender: Sender) -> Vec<Line<'static>> {
        let dots = match (chrono::Utc::now().timestamp_subsec_millis() / 250) % 4 {
            0 => "●  ",
            1 => "●● ",
            2 => "●●●",
            _ => "   ",
        };

        vec![
            Line::from(Span::styled(
                self.sender_label(sender),
                Style::default().fg(Color::DarkGray).add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(dots, Style::default().fg(Color::Yellow))),
        ]
    }
}

impl StatefulWidget for MessageList<'_> {
    type State = MessageListState;

    fn render(self, area: Rect, buf: &mut Buffer, state: &mut MessageListState) {
        state.observe(self.messages.len());

        let mut lines = self.lines(area.width);
        // Paragraph scroll offsets are u16; only the newest lines stay reachable
        let overflow = lines.len().saturating_sub(usize::from(u16::MAX));
        lines.drain(..overflow);
        let total = u16::try_from(lines.len()).unwrap_or(u16::MAX);
        let max_offset = total.saturating_sub(area.height);
        state.offset_from_bottom = state.offset_from_bottom.min(max_offset);
        let top = max_offset - state.offset_from_bottom;

        Paragraph::new(lines).scroll((top, 0)).render(area, buf);
    }
}

/// Wrap text to fit within the given width, keeping explicit line breaks.
///
/// Spacing inside a line is kept as typed; whitespace at a break is dropped.
/// Words longer than the width are split across lines.
pub fn wrap_text(text: &str, width: usize) -> Vec<String> {
    if width == 0 {
        return vec![text.to_string()];
    }

    let mut lines = Vec::new();
    for paragraph in text.split('\n') {
        let mut current = String::new();
        let mut current_len = 0;

        for token in tokens(paragraph) {
            let token_len = token.chars().count();
            if current_len + token_len <= width {
                current.push_str(token);
                current_len += token_len;
                continue;
            }

            if token.starts_with(char::is_whitespace) {
                if current_len > 0 {
                    lines.push(std::mem::take(&mut current));
                    current_len = 0;
                }
                continue;
            }

            if current_len > 0 {
                lines.push(std::mem::take(&mut current).trim_end().to_string());
                current_len = 0;
            }
            let mut chars = token.chars().peekable();
            while chars.peek().is_some() {
                let piece: String = chars.by_ref().take(width).collect();
                let piece_len = piece.chars().count();
                if piece_len == width && chars.peek().is_some() {
                    lines.push(piece);
                } else {
                    current = piece;
                    current_len = piece_len;
                }
            }
        }

        lines.push(current);
    }

    lines
}

/// Split a line into alternating runs of whitespace and non-whitespace
fn tokens(line: &str) -> Vec<&str> {
    let mut tokens = Vec::new();
    let mut start = 0;
    let mut in_space = None;
    for (index, c) in line.char_indices() {
        let space = c.is_whitespace();
        if in_space.is_some_and(|prev| prev != space) {
            tokens.push(&line[start..index]);
            start = index;
        }
        in_space = Some(space);
    }
    if start < line.len() {
        tokens.push(&line[start..]);
    }
    tokens
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conversation::{Conversation, MessageBody, MessageStatus};
    use pretty_assertions::assert_eq;

    fn line_text(line: &Line) -> String {
        line.spans.iter().map(|span| span.content.as_ref()).collect()
    }

    #[test]
    fn wrap_breaks_on_word_boundaries() {
        assert_eq!(
            wrap_text("the quick brown fox jumps", 10),
            vec!["the quick", "brown fox", "jumps"]
        );
        assert_eq!(wrap_text("one\ntwo", 20), vec!["one", "two"]);
        assert_eq!(wrap_text("", 5), vec![""]);
    }

    #[test]
    fn wrap_keeps_spacing_inside_a_line() {
        assert_eq!(wrap_text("a    b", 40), vec!["a    b"]);
        assert_eq!(wrap_text("  indented", 40), vec!["  indented"]);
        assert_eq!(wrap_text("ab   cd", 4), vec!["ab", "cd"]);
    }

    #[test]
    fn wrap_splits_words_longer_than_the_width() {
        let url = "https://files.example.com/uploads/2024/05/customer-issue/screenshot.png";
        let lines = wrap_text(url, 36);

        assert_eq!(lines.len(), 2);
        assert!(lines.iter().all(|line| line.chars().count() <= 36));
        assert_eq!(lines.concat(), url);

        assert_eq!(wrap_text("see abcdefgh now", 4), vec!["see", "abcd", "efgh", "now"]);
    }

    #[test]
    fn long_urls_are_fully_rendered() {
        let url = "https://files.example.com/uploads/2024/05/customer-issue/screenshot.png";
        let mut conversation = Conversation::new("Hello!");
        conversation.append(Sender::User, MessageBody::text(url), None);

        let area = Rect::new(0, 0, 46, 12);
        let mut buf = Buffer::empty(area);
        MessageList::new(conversation.messages(), "AI").render(
            area,
            &mut buf,
            &mut MessageListState::default(),
        );

        let rendered: String = (0..area.height)
            .map(|y| {
                (0..area.width)
                    .map(|x| buf.get(x, y).symbol().to_string())
                    .collect::<String>()
                    .trim()
                    .to_string()
            })
            .collect();
        assert!(rendered.contains(url));
    }

    #[test]
    fn user_messages_are_right_aligned_and_others_left() {
        let mut conversation = Conversation::new("Hello!");
        conversation.append(Sender::User, MessageBody::text("Hi"), None);

        let list = MessageList::new(conversation.messages(), "AI Assistant");
        let lines = list.lines(40);

        assert!(line_text(&lines[0]).starts_with("AI Assistant"));
        assert_eq!(lines[0].alignment, Some(Alignment::Left));
        let user_header = lines.iter().find(|l| line_text(l).starts_with("You")).unwrap();
        assert_eq!(user_header.alignment, Some(Alignment::Right));
    }

    #[test]
    fn human_messages_carry_a_badge() {
        let mut conversation = Conversation::new("Hello!");
        conversation.append(Sender::Human, MessageBody::text("I'm here"), None);

        let lines = MessageList::new(conversation.messages(), "AI Assistant").lines(40);

        assert!(lines.iter().any(|l| line_text(l).starts_with("Support Agent [Human]")));
    }

    #[test]
    fn typing_indicator_follows_the_last_message() {
        let conversation = Conversation::new("Hello!");

        let idle = MessageList::new(conversation.messages(), "AI Assistant").lines(40);
        let typing = MessageList::new(conversation.messages(), "AI Assistant")
            .typing(Some(Sender::Ai))
            .lines(40);

        assert_eq!(typing.len(), idle.len() + 2);
        assert_eq!(line_text(&typing[idle.len()]), "AI Assistant");
    }

    #[test]
    fn error_messages_render_in_red() {
        let mut conversation = Conversation::new("Hello!");
        conversation.append(
            Sender::Ai,
            MessageBody::text("Sorry"),
            Some(MessageStatus::Error),
        );

        let lines = MessageList::new(conversation.messages(), "AI Assistant").lines(40);
        let sorry = lines.iter().find(|l| line_text(l) == "Sorry").unwrap();
        assert_eq!(sorry.spans[0].style.fg, Some(Color::Red));
    }

    #[test]
    fn images_render_their_url() {
        let mut conversation = Conversation::new("Hello!");
        conversation.append(
            Sender::Human,
            MessageBody::Image {
                url: "https://example.com/work.png".to_string(),
            },
            None,
        );

        let lines = MessageList::new(conversation.messages(), "AI Assistant").lines(60);
        assert!(lines.iter().any(|l| line_text(l) == "[image] https://example.com/work.png"));
    }

    #[test]
    fn very_long_histories_still_show_the_newest_message() {
        let mut conversation = Conversation::new("Hello!");
        for i in 0..22_000 {
            conversation.append(Sender::User, MessageBody::text(format!("message {i}")), None);
        }

        let area = Rect::new(0, 0, 30, 4);
        let mut buf = Buffer::empty(area);
        MessageList::new(conversation.messages(), "AI").render(
            area,
            &mut buf,
            &mut MessageListState::default(),
        );

        let rendered: String = (0..area.height)
            .flat_map(|y| (0..area.width).map(move |x| (x, y)))
            .map(|(x, y)| buf.get(x, y).symbol().to_string())
            .collect();
        assert!(rendered.contains("message 21999"));
    }

    #[test]
    fn new_messages_reset_scroll_to_bottom() {
        let mut conversation = Conversation::new("Hello!");
        let mut state = MessageListState::default();
        let area = Rect::new(0, 0, 30, 4);
        let mut buf = Buffer::empty(area);

        MessageList::new(conversation.messages(), "AI").render(area, &mut buf, &mut state);
        state.scroll_up(3);
        assert_eq!(state.offset_from_bottom(), 3);

        conversation.append(Sender::User, MessageBody::text("Hi"), None);
        MessageList::new(conversation.messages(), "AI").render(area, &mut buf, &mut state);
        assert_eq!(state.offset_from_bottom(), 0);
    }
}
