use crate::config::{Config, ReplyBackend};
use crate::dashboard::{
    self, ANALYTICS, AGENTS, DOCUMENTS, DashboardTab, ROUTING, SETUP_PROGRESS, SUPPORTED_UPLOADS,
};
use crate::ui::pages::Palette;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind};
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, Paragraph, Tabs, Widget, Wrap},
};
use strum::IntoEnumIterator;

/// Admin console: configuration, knowledge base, analytics, agents, embed code
pub struct DashboardPage {
    config: Config,
    palette: Palette,
    tab: DashboardTab,
}

fn on_off(value: bool) -> &'static str {
    if value { "On" } else { "Off" }
}

impl DashboardPage {
    pub fn new(config: Config, palette: Palette) -> Self {
        Self {
            config,
            palette,
            tab: DashboardTab::AiConfig,
        }
    }

    pub fn tab(&self) -> DashboardTab {
        self.tab
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.kind != KeyEventKind::Press {
            return;
        }
        match key.code {
            KeyCode::Tab | KeyCode::Right => self.tab = self.tab.next(),
            KeyCode::BackTab | KeyCode::Left => self.tab = self.tab.previous(),
            _ => {}
        }
    }

    fn label<'a>(&self, name: &'a str, value: String) -> Line<'a> {
        Line::from(vec![
            Span::styled(format!("{name}: "), Style::default().add_modifier(Modifier::BOLD)),
            Span::raw(value),
        ])
    }

    fn tab_lines(&self) -> Vec<Line<'_>> {
        let assistant = &self.config.assistant;
        let widget = &self.config.widget;

        match self.tab {
            DashboardTab::AiConfig => {
                let backend = match &assistant.backend {
                    ReplyBackend::Mock => format!("simulated ({} ms delay)", assistant.reply_delay_ms),
                    ReplyBackend::Http { endpoint, .. } => format!("http {}", endpoint),
                };
                vec![
                    self.label("AI Model", assistant.model.clone()),
                    self.label("Temperature", format!("{:.1}", assistant.temperature)),
                    self.label("Enable RAG", on_off(assistant.enable_rag).to_string()),
                    self.label("Human Handoff", on_off(assistant.human_handoff).to_string()),
                    self.label("Replies", backend),
                    Line::default(),
                    self.label("System Prompt", assistant.system_prompt.clone()),
                ]
            }
            DashboardTab::Appearance => vec![
                self.label("Widget Title", widget.title.clone()),
                self.label("Subtitle", widget.subtitle.clone()),
                self.label("Welcome Message", widget.greeting()),
                self.label("Agent Name", widget.agent_name.clone()),
                self.label("Primary Color", widget.primary_color.clone()),
                self.label("Secondary Color", widget.secondary_color.clone()),
                self.label("Widget Position", widget.position.to_string()),
                self.label("Open On Load", on_off(widget.initial_open).to_string()),
            ],
            DashboardTab::KnowledgeBase => {
                let mut lines = vec![
                    Line::from(Span::styled(
                        format!("Supports {}", SUPPORTED_UPLOADS),
                        self.palette.muted(),
                    )),
                    Line::default(),
                ];
                lines.extend(DOCUMENTS.iter().map(|doc| {
                    Line::from(format!("{:<24} {:>8}  {}", doc.name, doc.size, doc.added))
                }));
                lines
            }
            DashboardTab::Analytics => {
                let mut lines = vec![
                    self.label("Total Conversations", ANALYTICS.total_conversations.to_string()),
                    self.label("AI Resolution Rate", format!("{}%", ANALYTICS.ai_resolution_rate)),
                    self.label("Human Handoff Rate", format!("{}%", ANALYTICS.human_handoff_rate)),
                    Line::default(),
                    Line::from(Span::styled(
                        "Top User Queries",
                        Style::default().add_modifier(Modifier::BOLD),
                    )),
                ];
                lines.extend(
                    ANALYTICS
                        .top_queries
                        .iter()
                        .map(|(query, count)| Line::from(format!("{:>4}  {}", count, query))),
                );
                lines
            }
            DashboardTab::HumanAgents => {
                let mut lines: Vec<Line> = AGENTS
                    .iter()
                    .map(|agent| {
                        let color = match agent.status {
                            dashboard::AgentStatus::Online => Color::Green,
                            dashboard::AgentStatus::Away => Color::Yellow,
                            dashboard::AgentStatus::Offline => Color::Gray,
                        };
                        Line::from(vec![
                            Span::raw(format!("{:<18} {:<22} ", agent.name, agent.email)),
                            Span::styled(format!("{:<8}", agent.status), Style::default().fg(color)),
                            Span::raw(format!("{:>3} conversations", agent.conversations)),
                        ])
                    })
                    .collect();
                lines.push(Line::default());
                lines.push(self.label("Auto-assign conversations", on_off(ROUTING.auto_assign).to_string()));
                lines.push(self.label(
                    "AI confidence threshold for handoff",
                    format!("{}%", ROUTING.handoff_threshold),
                ));
                lines
            }
            DashboardTab::Embed => {
                let mut lines: Vec<Line> = dashboard::embed_code(widget)
                    .lines()
                    .map(|line| Line::from(line.to_string()))
                    .collect();
                lines.push(Line::default());
                lines.push(Line::from(Span::styled(
                    "Allowed Domains",
                    Style::default().add_modifier(Modifier::BOLD),
                )));
                lines.extend(
                    widget
                        .allowed_domains
                        .iter()
                        .map(|domain| Line::from(format!("  {}", domain))),
                );
                lines
            }
        }
    }
}

impl Widget for &DashboardPage {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(2), // Title
                Constraint::Length(3), // Setup progress
                Constraint::Length(3), // Tabs
                Constraint::Min(5),    // Content
            ])
            .split(area);

        Paragraph::new(vec![
            Line::from(Span::styled(
                "Admin Dashboard",
                self.palette.heading().add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(
                "Configure and manage your AI chat widget",
                self.palette.muted(),
            )),
        ])
        .render(chunks[0], buf);

        Gauge::default()
            .block(Block::default().borders(Borders::ALL).title("Widget Status: Active · Setup"))
            .gauge_style(Style::default().fg(self.palette.accent))
            .percent(SETUP_PROGRESS)
            .render(chunks[1], buf);

        let titles: Vec<String> = DashboardTab::iter().map(|tab| tab.to_string()).collect();
        let selected = DashboardTab::iter().position(|tab| tab == self.tab).unwrap_or(0);
        Tabs::new(titles)
            .block(Block::default().borders(Borders::ALL))
            .select(selected)
            .highlight_style(
                Style::default()
                    .fg(self.palette.accent)
                    .add_modifier(Modifier::BOLD),
            )
            .render(chunks[2], buf);

        Paragraph::new(self.tab_lines())
            .block(Block::default().borders(Borders::ALL).title(self.tab.to_string()))
            .wrap(Wrap { trim: false })
            .render(chunks[3], buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Theme;
    use crossterm::event::KeyModifiers;
    use pretty_assertions::assert_eq;

    fn page() -> DashboardPage {
        DashboardPage::new(Config::default(), Palette::for_theme(Theme::Dark, Color::Blue))
    }

    fn text_of(lines: &[Line]) -> String {
        lines
            .iter()
            .map(|line| line.spans.iter().map(|s| s.content.as_ref()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn tab_key_walks_through_sections() {
        let mut page = page();
        page.handle_key(KeyEvent::new(KeyCode::Tab, KeyModifiers::NONE));
        assert_eq!(page.tab(), DashboardTab::Appearance);
        page.handle_key(KeyEvent::new(KeyCode::Left, KeyModifiers::NONE));
        page.handle_key(KeyEvent::new(KeyCode::Left, KeyModifiers::NONE));
        assert_eq!(page.tab(), DashboardTab::Embed);
    }

    #[test]
    fn sections_show_configured_values() {
        let mut page = page();
        assert!(text_of(&page.tab_lines()).contains("AI Model: gemini-pro"));

        page.tab = DashboardTab::Analytics;
        assert!(text_of(&page.tab_lines()).contains("Total Conversations: 1248"));

        page.tab = DashboardTab::Embed;
        let embed = text_of(&page.tab_lines());
        assert!(embed.contains("widgetId: 'abc123'"));
        assert!(embed.contains("  blog.example.com"));
    }
}
