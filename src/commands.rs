use crate::config::{Config, ReplyBackend};
use crate::dashboard::{self, ANALYTICS, AGENTS, DOCUMENTS, SETUP_PROGRESS};
use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

pub fn show_dashboard(config: &Config) {
    println!("📊 {} ({})", config.widget.title, config.widget.widget_id);
    println!("{}", "=".repeat(50));
    println!("✅ Widget Status: Active · Setup {}% complete", SETUP_PROGRESS);
    println!();

    println!("🤖 AI Configuration");
    println!("   Model: {}", config.assistant.model);
    println!("   Temperature: {:.1}", config.assistant.temperature);
    println!(
        "   Human handoff: {}",
        if config.assistant.human_handoff { "enabled" } else { "disabled" }
    );
    match &config.assistant.backend {
        ReplyBackend::Mock => println!(
            "   Replies: simulated after {} ms",
            config.assistant.reply_delay_ms
        ),
        ReplyBackend::Http { endpoint, .. } => println!("   Replies: {}", endpoint),
    }
    println!();

    println!("📈 Analytics");
    println!("   Total conversations: {}", ANALYTICS.total_conversations);
    println!("   AI resolution rate: {}%", ANALYTICS.ai_resolution_rate);
    println!("   Human handoff rate: {}%", ANALYTICS.human_handoff_rate);
    println!("   Top queries:");
    for (query, count) in &ANALYTICS.top_queries {
        println!("     {:>4}  {}", count, query);
    }
    println!();

    println!("📚 Knowledge base: {} documents", DOCUMENTS.len());
    println!(
        "👥 Human agents: {} of {} online",
        dashboard::online_agents().count(),
        AGENTS.len()
    );
}

pub fn print_embed_code(config: &Config) {
    println!("{}", dashboard::embed_code(&config.widget));

    if !config.widget.allowed_domains.is_empty() {
        println!();
        println!("🌐 Allowed domains:");
        for domain in &config.widget.allowed_domains {
            println!("  • {}", domain);
        }
    }
}

pub fn show_config(path: &Path, config: &Config) -> Result<()> {
    println!("📍 Config file: {}", path.display());
    if !path.exists() {
        println!("💡 No file yet, showing defaults. Run 'chatwidget config --init' to write them.");
    }
    println!("{}", "=".repeat(50));

    let content = toml::to_string_pretty(config).context("Failed to serialize config")?;
    println!("{}", content);
    Ok(())
}

pub fn init_config(path: &Path) -> Result<()> {
    if path.exists() {
        println!("⚠️  Config already exists at {}", path.display());
        return Ok(());
    }

    Config::default().save_to(path)?;
    let written = fs::read_to_string(path).context("Failed to read back config file")?;

    println!("✨ Wrote default config to {}", path.display());
    println!("{}", written);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn init_writes_defaults_once() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        init_config(&path).unwrap();
        let first = fs::read_to_string(&path).unwrap();
        assert!(first.contains("widget_id = \"abc123\""));

        fs::write(&path, "[widget]\ntitle = \"Mine\"\n").unwrap();
        init_config(&path).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "[widget]\ntitle = \"Mine\"\n");
    }
}
