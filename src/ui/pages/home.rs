use crate::ui::pages::Palette;
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect},
    style::Modifier,
    text::{Line, Span},
    widgets::{Paragraph, Widget, Wrap},
};

const FEATURES: [(&str, &str); 3] = [
    (
        "AI-Powered Responses",
        "Answers common questions instantly, around the clock.",
    ),
    (
        "Human Handoff",
        "Visitors can reach a real person whenever the assistant is not enough.",
    ),
    (
        "Easy Integration",
        "One script tag, a React component, or the WordPress plugin.",
    ),
];

/// Marketing page; the chat widget floats on top of it
pub struct HomePage {
    pub palette: Palette,
    pub widget_id: String,
}

impl Widget for &HomePage {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let palette = &self.palette;
        let mut lines = vec![
            Line::from(Span::styled(
                "AI Chat Widget",
                palette.heading().add_modifier(Modifier::BOLD),
            ))
            .alignment(Alignment::Center),
            Line::from(Span::styled(
                "Smart conversations for every website",
                palette.muted(),
            ))
            .alignment(Alignment::Center),
            Line::default(),
            Line::from(Span::styled(
                "Powerful Features",
                palette.base().add_modifier(Modifier::BOLD),
            )),
        ];

        for (title, description) in FEATURES {
            lines.push(Line::from(vec![
                Span::styled(format!("  • {title}: "), palette.base().add_modifier(Modifier::BOLD)),
                Span::styled(description, palette.base()),
            ]));
        }

        lines.extend([
            Line::default(),
            Line::from(Span::styled(
                "Simple Integration",
                palette.base().add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(
                "  Add to your HTML: run `chatwidget embed` for the snippet",
                palette.base(),
            )),
            Line::from(Span::styled(
                format!("  React: <ChatWidget widgetId=\"{}\" />", self.widget_id),
                palette.base(),
            )),
            Line::from(Span::styled(
                "  WordPress: search for \"AI Chat Widget\" under Plugins > Add New",
                palette.base(),
            )),
            Line::default(),
            Line::from(Span::styled(
                "See it in action: press Enter or c to open the chat widget",
                palette.heading(),
            )),
        ]);

        Paragraph::new(lines)
            .style(palette.base())
            .wrap(Wrap { trim: false })
            .render(area, buf);
    }
}
