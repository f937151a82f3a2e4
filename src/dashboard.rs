//! Admin console data: sample analytics, knowledge base, agents and the embed snippet

use crate::config::WidgetConfig;
use once_cell::sync::Lazy;
use strum::{Display, EnumIter, IntoEnumIterator};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter)]
pub enum DashboardTab {
    #[strum(serialize = "AI Configuration")]
    AiConfig,
    #[strum(serialize = "Appearance")]
    Appearance,
    #[strum(serialize = "Knowledge Base")]
    KnowledgeBase,
    #[strum(serialize = "Analytics")]
    Analytics,
    #[strum(serialize = "Human Agents")]
    HumanAgents,
    #[strum(serialize = "Embed Code")]
    Embed,
}

impl DashboardTab {
    /// Next tab, wrapping around
    pub fn next(self) -> Self {
        let tabs: Vec<_> = Self::iter().collect();
        let index = tabs.iter().position(|tab| *tab == self).unwrap_or(0);
        tabs[(index + 1) % tabs.len()]
    }

    /// Previous tab, wrapping around
    pub fn previous(self) -> Self {
        let tabs: Vec<_> = Self::iter().collect();
        let index = tabs.iter().position(|tab| *tab == self).unwrap_or(0);
        tabs[(index + tabs.len() - 1) % tabs.len()]
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KnowledgeDocument {
    pub name: &'static str,
    pub size: &'static str,
    pub added: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum AgentStatus {
    Online,
    Away,
    Offline,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HumanAgent {
    pub name: &'static str,
    pub email: &'static str,
    pub status: AgentStatus,
    pub conversations: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Analytics {
    pub total_conversations: u32,
    pub ai_resolution_rate: u8,
    pub human_handoff_rate: u8,
    pub top_queries: Vec<(&'static str, u32)>,
}

/// Human routing preferences
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoutingSettings {
    pub auto_assign: bool,
    /// AI confidence below which a conversation goes to a human, in percent
    pub handoff_threshold: u8,
}

/// Setup progress shown beside the widget status
pub const SETUP_PROGRESS: u16 = 67;

pub static ANALYTICS: Lazy<Analytics> = Lazy::new(|| Analytics {
    total_conversations: 1248,
    ai_resolution_rate: 87,
    human_handoff_rate: 13,
    top_queries: vec![
        ("How do I reset my password?", 78),
        ("What are your business hours?", 64),
        ("How much does the premium plan cost?", 52),
        ("Do you offer refunds?", 47),
        ("How do I cancel my subscription?", 41),
        ("Is there a free trial available?", 38),
        ("How do I contact support?", 36),
    ],
});

pub static DOCUMENTS: Lazy<Vec<KnowledgeDocument>> = Lazy::new(|| {
    vec![
        KnowledgeDocument { name: "Product Manual.pdf", size: "2.4 MB", added: "2023-06-15" },
        KnowledgeDocument { name: "FAQ.docx", size: "342 KB", added: "2023-06-10" },
        KnowledgeDocument { name: "Pricing.csv", size: "156 KB", added: "2023-06-05" },
        KnowledgeDocument { name: "Terms of Service.pdf", size: "1.2 MB", added: "2023-05-28" },
        KnowledgeDocument { name: "API Documentation.md", size: "890 KB", added: "2023-05-20" },
    ]
});

pub static AGENTS: Lazy<Vec<HumanAgent>> = Lazy::new(|| {
    vec![
        HumanAgent { name: "Sarah Johnson", email: "sarah@example.com", status: AgentStatus::Online, conversations: 12 },
        HumanAgent { name: "Michael Chen", email: "michael@example.com", status: AgentStatus::Away, conversations: 8 },
        HumanAgent { name: "Jessica Williams", email: "jessica@example.com", status: AgentStatus::Offline, conversations: 0 },
        HumanAgent { name: "David Rodriguez", email: "david@example.com", status: AgentStatus::Online, conversations: 5 },
    ]
});

pub const ROUTING: RoutingSettings = RoutingSettings {
    auto_assign: true,
    handoff_threshold: 60,
};

pub const SUPPORTED_UPLOADS: &str = "PDF, DOCX, TXT, CSV, and Markdown files";

/// Agents currently able to take a conversation
pub fn online_agents() -> impl Iterator<Item = &'static HumanAgent> {
    AGENTS.iter().filter(|agent| agent.status == AgentStatus::Online)
}

/// Script tag a site owner pastes into their page
pub fn embed_code(widget: &WidgetConfig) -> String {
    format!(
        r#"<script>
  (function(w,d,s,o,f,js,fjs){{
    w['AIChatWidget']=o;
    w[o]=w[o]||function(){{(w[o].q=w[o].q||[]).push(arguments)}};
    js=d.createElement(s),fjs=d.getElementsByTagName(s)[0];
    js.id=o;js.src=f;js.async=1;fjs.parentNode.insertBefore(js,fjs);
  }}(window,document,'script','aiChat','{script_url}'));
  aiChat('init', {{ widgetId: '{widget_id}' }});
</script>"#,
        script_url = widget.script_url,
        widget_id = widget.widget_id,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn tabs_cycle_in_both_directions() {
        assert_eq!(DashboardTab::AiConfig.next(), DashboardTab::Appearance);
        assert_eq!(DashboardTab::Embed.next(), DashboardTab::AiConfig);
        assert_eq!(DashboardTab::AiConfig.previous(), DashboardTab::Embed);
        assert_eq!(DashboardTab::Analytics.to_string(), "Analytics");
    }

    #[test]
    fn embed_code_carries_widget_id_and_script() {
        let mut widget = WidgetConfig::default();
        widget.widget_id = "xyz789".to_string();

        let code = embed_code(&widget);

        assert!(code.starts_with("<script>"));
        assert!(code.contains("widgetId: 'xyz789'"));
        assert!(code.contains("'https://widget.example.com/chat.js'"));
        assert!(code.contains("w[o]=w[o]||function(){(w[o].q=w[o].q||[]).push(arguments)};"));
    }

    #[test]
    fn two_agents_are_online() {
        let names: Vec<_> = online_agents().map(|agent| agent.name).collect();
        assert_eq!(names, vec!["Sarah Johnson", "David Rodriguez"]);
    }
}
