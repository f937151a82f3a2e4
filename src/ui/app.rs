use crate::config::Config;
use crate::conversation::ReplyProducer;
use crate::ui::pages::{AuthForm, AuthKind, DashboardPage, HomePage, Palette};
use crate::ui::router::Route;
use crate::ui::widget::{ChatWidgetShell, ShellAction, shell::parse_color};
use anyhow::{Context, Result};
use crossterm::{
    event::{Event, EventStream, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use futures::StreamExt;
use ratatui::{
    Terminal,
    backend::CrosstermBackend,
    buffer::Buffer,
    layout::{Constraint, Direction, Layout, Rect},
    style::Modifier,
    text::{Line, Span},
    widgets::{Block, Paragraph, Widget},
};
use std::io::{self, Stdout};
use std::sync::Arc;
use std::time::Duration;
use strum::IntoEnumIterator;
use tracing::{debug, info, warn};

const TICK_RATE: Duration = Duration::from_millis(100);

/// Terminal events the app reacts to
#[derive(Debug, Clone)]
pub enum TuiEvent {
    Key(KeyEvent),
    Resize(u16, u16),
    Tick,
}

/// Top-level application: one page per route, chat widget on the home page
pub struct App {
    config: Config,
    producer: Arc<dyn ReplyProducer>,
    palette: Palette,
    route: Route,
    shell: Option<ChatWidgetShell>,
    login: AuthForm,
    register: AuthForm,
    dashboard: DashboardPage,
    should_quit: bool,
}

impl App {
    pub fn new(config: Config, producer: Arc<dyn ReplyProducer>, route: Route) -> Self {
        let accent = parse_color(&config.widget.primary_color, ratatui::style::Color::Blue);
        let palette = Palette::for_theme(config.ui.theme, accent);

        let mut app = Self {
            login: AuthForm::new(AuthKind::Login, palette),
            register: AuthForm::new(AuthKind::Register, palette),
            dashboard: DashboardPage::new(config.clone(), palette),
            config,
            producer,
            palette,
            route,
            shell: None,
            should_quit: false,
        };
        app.navigate(route);
        app
    }

    pub fn route(&self) -> Route {
        self.route
    }

    pub fn shell(&self) -> Option<&ChatWidgetShell> {
        self.shell.as_ref()
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    /// Switch pages. The chat widget lives only on the home page; leaving it
    /// drops the conversation along with any reply still in flight.
    pub fn navigate(&mut self, route: Route) {
        if route == self.route && (route != Route::Home || self.shell.is_some()) {
            return;
        }

        info!(from = %self.route.path(), to = %route.path(), "Navigating");
        self.route = route;
        self.shell = match route {
            Route::Home => Some(ChatWidgetShell::new(&self.config, Arc::clone(&self.producer))),
            _ => None,
        };
    }

    pub fn handle_event(&mut self, event: TuiEvent) {
        match event {
            TuiEvent::Key(key) => self.handle_key(key),
            TuiEvent::Resize(width, height) => debug!(width, height, "Terminal resized"),
            TuiEvent::Tick => {
                if let Some(shell) = self.shell.as_mut() {
                    shell.tick();
                }
            }
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.kind != KeyEventKind::Press {
            return;
        }

        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.should_quit = true;
            return;
        }

        if let KeyCode::F(n) = key.code {
            if let Some(route) = Route::from_function_key(n) {
                self.navigate(route);
            }
            return;
        }

        match self.route {
            Route::Home => {
                let widget_open = self.shell.as_ref().is_some_and(|shell| shell.is_open());
                if !widget_open && key.code == KeyCode::Char('q') {
                    self.should_quit = true;
                    return;
                }

                let action = match self.shell.as_mut() {
                    Some(shell) => shell.handle_key(key),
                    None => ShellAction::None,
                };
                match action {
                    ShellAction::None => {}
                    ShellAction::OpenDashboard => self.navigate(Route::Dashboard),
                    ShellAction::Quit => self.should_quit = true,
                }
            }
            Route::Login => self.login.handle_key(key),
            Route::Register => self.register.handle_key(key),
            Route::Dashboard => {
                if key.code == KeyCode::Char('q') {
                    self.should_quit = true;
                } else {
                    self.dashboard.handle_key(key);
                }
            }
        }
    }

    fn render_nav(&self, area: Rect, buf: &mut Buffer) {
        let mut spans = vec![Span::styled(
            " AI Chat Widget ",
            self.palette.heading().add_modifier(Modifier::BOLD),
        )];
        for route in Route::iter() {
            let style = if route == self.route {
                self.palette.heading().add_modifier(Modifier::REVERSED)
            } else {
                self.palette.base()
            };
            spans.push(Span::raw("  "));
            spans.push(Span::styled(
                format!("F{} {}", route.function_key(), route.path()),
                style,
            ));
        }

        Paragraph::new(Line::from(spans))
            .style(self.palette.base())
            .render(area, buf);
    }

    fn render_hint(&self, area: Rect, buf: &mut Buffer) {
        let hint = match self.route {
            Route::Home if self.shell.as_ref().is_some_and(|shell| shell.is_open()) => {
                "Enter send · Shift+Enter newline · Esc close · /help commands · Ctrl+C quit"
            }
            Route::Home => "Enter open chat · q quit",
            Route::Login | Route::Register => "Tab next field · Enter submit · Ctrl+C quit",
            Route::Dashboard => "←/→ switch tab · q quit",
        };
        Paragraph::new(Line::from(Span::styled(hint, self.palette.muted())))
            .style(self.palette.base())
            .render(area, buf);
    }

    pub fn render(&mut self, area: Rect, buf: &mut Buffer) {
        Block::default().style(self.palette.base()).render(area, buf);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1), // Navigation
                Constraint::Min(1),    // Page
                Constraint::Length(1), // Key hints
            ])
            .split(area);

        self.render_nav(chunks[0], buf);
        let page = Rect {
            x: chunks[1].x + 1,
            width: chunks[1].width.saturating_sub(2),
            ..chunks[1]
        };

        match self.route {
            Route::Home => {
                let home = HomePage {
                    palette: self.palette,
                    widget_id: self.config.widget.widget_id.clone(),
                };
                (&home).render(page, buf);
                if let Some(shell) = self.shell.as_mut() {
                    shell.render(page, buf);
                }
            }
            Route::Login => (&self.login).render(page, buf),
            Route::Register => (&self.register).render(page, buf),
            Route::Dashboard => (&self.dashboard).render(page, buf),
        }

        self.render_hint(chunks[2], buf);
    }
}

type Tui = Terminal<CrosstermBackend<Stdout>>;

fn setup_terminal() -> Result<Tui> {
    enable_raw_mode().context("Failed to enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen).context("Failed to enter alternate screen")?;
    Terminal::new(CrosstermBackend::new(stdout)).context("Failed to create terminal")
}

fn restore_terminal(terminal: &mut Tui) -> Result<()> {
    disable_raw_mode().context("Failed to disable raw mode")?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)
        .context("Failed to leave alternate screen")?;
    terminal.show_cursor().context("Failed to show cursor")?;
    Ok(())
}

/// Run the app until the user quits
pub async fn run(config: Config, producer: Arc<dyn ReplyProducer>, route: Route) -> Result<()> {
    let mut terminal = setup_terminal()?;
    let result = event_loop(&mut terminal, App::new(config, producer, route)).await;
    restore_terminal(&mut terminal)?;
    result
}

async fn event_loop(terminal: &mut Tui, mut app: App) -> Result<()> {
    let mut events = EventStream::new();
    let mut ticker = tokio::time::interval(TICK_RATE);

    info!(route = %app.route().path(), "Starting UI");
    while !app.should_quit() {
        terminal
            .draw(|frame| {
                let area = frame.size();
                app.render(area, frame.buffer_mut());
            })
            .context("Failed to draw frame")?;

        let event = tokio::select! {
            _ = ticker.tick() => TuiEvent::Tick,
            maybe_event = events.next() => match maybe_event {
                Some(Ok(Event::Key(key))) => TuiEvent::Key(key),
                Some(Ok(Event::Resize(width, height))) => TuiEvent::Resize(width, height),
                Some(Ok(_)) => continue,
                Some(Err(e)) => {
                    warn!("Terminal event error: {}", e);
                    continue;
                }
                None => break,
            },
        };
        app.handle_event(event);
    }
    info!("UI closed");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conversation::MockReplyProducer;
    use pretty_assertions::assert_eq;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn app(route: Route) -> App {
        App::new(
            Config::default(),
            Arc::new(MockReplyProducer::new(Duration::from_millis(1500))),
            route,
        )
    }

    #[test]
    fn widget_exists_only_on_the_home_page() {
        let mut app = app(Route::Home);
        assert!(app.shell().is_some());

        app.handle_key(key(KeyCode::F(2)));
        assert_eq!(app.route(), Route::Login);
        assert!(app.shell().is_none());

        app.handle_key(key(KeyCode::F(1)));
        assert_eq!(app.route(), Route::Home);
        assert!(app.shell().is_some());
    }

    #[test]
    fn starting_elsewhere_has_no_widget() {
        let app = app(Route::Dashboard);
        assert!(app.shell().is_none());
    }

    #[test]
    fn q_types_into_the_open_widget_instead_of_quitting() {
        let mut app = app(Route::Home);
        app.handle_key(key(KeyCode::Enter));
        assert!(app.shell().is_some_and(|shell| shell.is_open()));

        app.handle_key(key(KeyCode::Char('q')));
        assert!(!app.should_quit());

        app.handle_key(key(KeyCode::Esc));
        app.handle_key(key(KeyCode::Char('q')));
        assert!(app.should_quit());
    }

    #[test]
    fn admin_command_opens_the_dashboard() {
        let mut app = app(Route::Home);
        app.handle_key(key(KeyCode::Char('c')));
        for c in "/admin".chars() {
            app.handle_key(key(KeyCode::Char(c)));
        }
        app.handle_key(key(KeyCode::Enter));

        assert_eq!(app.route(), Route::Dashboard);
        assert!(app.shell().is_none());
    }

    #[test]
    fn ctrl_c_quits_from_a_form() {
        let mut app = app(Route::Register);
        app.handle_key(key(KeyCode::Char('q')));
        assert!(!app.should_quit());

        app.handle_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert!(app.should_quit());
    }

    #[test]
    fn renders_nav_and_widget_button() {
        let mut app = app(Route::Home);
        let area = Rect::new(0, 0, 100, 30);
        let mut buf = Buffer::empty(area);
        app.render(area, &mut buf);

        let top: String = (0..area.width).map(|x| buf.get(x, 0).symbol().to_string()).collect();
        assert!(top.contains("F4 /dashboard"));
    }
}
