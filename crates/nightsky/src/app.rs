use std::path::PathBuf;
use std::time::{Duration, Instant};

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use nightsky_config::{CliArgs, Config};
use nightsky_field::{CanvasWidget, FrameOutcome, ParticleField, PixelCanvas, viewport_for};
use ratatui::{
    DefaultTerminal, Frame,
    layout::{Constraint, Layout, Rect},
    style::{Color, Stylize},
    text::{Line, Span},
};
use tracing::{debug, info, warn};

/// Poll timeout while paused; nothing needs redrawing until a key arrives.
const PAUSED_POLL: Duration = Duration::from_millis(100);
/// Frame-rate change per `+`/`-` press.
const FPS_STEP: u32 = 10;
/// Highest capped frame rate; one step above it removes the cap.
const MAX_FPS: u32 = 120;
const KEY_COLOR: Color = Color::Rgb(196, 181, 253);

/// The main application which holds the state and logic of the application.
#[derive(Debug)]
pub struct App {
    /// Is the application running?
    running: bool,
    /// Frozen on the last drawn frame.
    paused: bool,
    /// Settings after CLI overrides, kept in sync with runtime toggles.
    config: Config,
    /// Where `config.toml` lives, if a config directory could be found.
    config_dir: Option<PathBuf>,
    /// Re-applied on top of a reloaded config file.
    cli: CliArgs,
    field: ParticleField<PixelCanvas>,
    /// Pixel size the field was last attached or resized to.
    viewport: Option<(u32, u32)>,
    started: Instant,
    /// One-line message shown next to the key help.
    notice: Option<String>,
}

impl App {
    /// Construct a new instance of [`App`].
    pub fn new(config: Config, config_dir: Option<PathBuf>, cli: CliArgs) -> Self {
        let field_config = config.field_config();
        let surface = PixelCanvas::new(0, 0);
        let field = match config.animation.seed {
            Some(seed) => ParticleField::with_seed(surface, field_config, seed),
            None => ParticleField::new(surface, field_config),
        };
        Self {
            running: false,
            paused: false,
            config,
            config_dir,
            cli,
            field,
            viewport: None,
            started: Instant::now(),
            notice: None,
        }
    }

    /// Run the application's main loop.
    pub fn run(mut self, mut terminal: DefaultTerminal) -> color_eyre::Result<()> {
        self.running = true;
        info!(preset = %self.config.animation.preset, "animation started");
        let result = self.event_loop(&mut terminal);
        self.stop();
        result
    }

    fn event_loop(&mut self, terminal: &mut DefaultTerminal) -> color_eyre::Result<()> {
        while self.running {
            terminal.draw(|frame| self.render(frame))?;
            self.handle_crossterm_events()?;
        }
        Ok(())
    }

    /// Teardown shared by every exit path of [`run`](Self::run).
    fn stop(&mut self) {
        self.running = false;
        self.field.detach();
        info!("animation stopped");
    }

    /// Advances the field if a frame is due and draws it with the help line on top.
    fn render(&mut self, frame: &mut Frame) {
        let area = frame.area();
        self.sync_viewport(area);

        if !self.paused {
            let outcome = self.field.frame(self.elapsed_ms());
            if outcome == FrameOutcome::NoSurface {
                self.notice = Some("canvas unavailable".to_string());
            }
        }

        frame.render_widget(CanvasWidget::new(self.field.surface()), area);

        let [_, help_area] =
            Layout::vertical([Constraint::Fill(1), Constraint::Length(1)]).areas(area);
        frame.render_widget(self.help_line(), help_area);
    }

    /// Attach on the first frame, reseed whenever the terminal size changes.
    fn sync_viewport(&mut self, area: Rect) {
        let size = viewport_for(area);
        if self.viewport == Some(size) {
            return;
        }
        let (width, height) = size;
        if self.field.is_attached() {
            self.field.resize(width, height);
        } else {
            self.field.attach(width, height);
        }
        self.viewport = Some(size);
    }

    fn help_line(&self) -> Line<'static> {
        let field = self.field.config();
        let fps = match field.target_fps {
            0 => "uncapped".to_string(),
            fps => format!("{fps} fps"),
        };
        let lightning = if field.lightning.enabled { "on" } else { "off" };

        let mut spans: Vec<Span<'static>> = vec![
            self.config.animation.preset.name().bold().fg(KEY_COLOR),
            format!(" {fps} · {} · lightning {lightning}", self.config.animation.speed).dark_gray(),
        ];
        if self.paused {
            spans.push(" · paused".dark_gray());
        }
        if let Some(notice) = &self.notice {
            spans.push(format!(" · {notice}").dark_gray());
        }
        spans.extend([
            "   q".bold().fg(KEY_COLOR),
            " quit  ".dark_gray(),
            "p".bold().fg(KEY_COLOR),
            " preset  ".dark_gray(),
            "l".bold().fg(KEY_COLOR),
            " lightning  ".dark_gray(),
            "s".bold().fg(KEY_COLOR),
            " speed  ".dark_gray(),
            "+/-".bold().fg(KEY_COLOR),
            " fps  ".dark_gray(),
            "r".bold().fg(KEY_COLOR),
            " reseed  ".dark_gray(),
            "c".bold().fg(KEY_COLOR),
            " reload  ".dark_gray(),
            "space".bold().fg(KEY_COLOR),
            " pause".dark_gray(),
        ]);
        Line::from(spans).centered()
    }

    /// Waits for input until the next frame is due.
    fn handle_crossterm_events(&mut self) -> color_eyre::Result<()> {
        if event::poll(self.poll_timeout())? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => self.on_key_event(key),
                // The next draw picks up the new size.
                Event::Resize(_, _) => {}
                _ => {}
            }
        }
        Ok(())
    }

    fn poll_timeout(&self) -> Duration {
        if self.paused {
            PAUSED_POLL
        } else {
            self.field.clock().until_next(self.elapsed_ms())
        }
    }

    /// Handles the key events and updates the state of [`App`].
    fn on_key_event(&mut self, key: KeyEvent) {
        match (key.modifiers, key.code) {
            (_, KeyCode::Esc | KeyCode::Char('q'))
            | (KeyModifiers::CONTROL, KeyCode::Char('c') | KeyCode::Char('C')) => self.quit(),
            (_, KeyCode::Char('p')) => self.cycle_preset(),
            (_, KeyCode::Char('l')) => self.toggle_lightning(),
            (_, KeyCode::Char('s')) => self.cycle_speed(),
            (_, KeyCode::Char('+') | KeyCode::Char('=')) => self.faster_fps(),
            (_, KeyCode::Char('-')) => self.slower_fps(),
            (_, KeyCode::Char('r')) => self.field.reseed(),
            (_, KeyCode::Char('c')) => self.reload_config(),
            (_, KeyCode::Char(' ')) => self.paused = !self.paused,
            _ => {}
        }
    }

    /// Switch to the next built-in preset and reseed.
    fn cycle_preset(&mut self) {
        let preset = self.config.animation.preset.next();
        self.config.select_preset(preset);
        self.field.set_config(self.config.field_config());
        self.notice = None;
        debug!(%preset, "preset changed");
    }

    fn toggle_lightning(&mut self) {
        let enabled = !self.field.config().lightning.enabled;
        self.config.animation.lightning = Some(enabled);
        self.field.set_lightning(enabled);
    }

    fn cycle_speed(&mut self) {
        self.config.animation.speed = self.config.animation.speed.next();
        self.field
            .set_speed_multiplier(self.config.field_config().speed_multiplier);
    }

    /// Raise the cap by one step; past the highest cap the field runs uncapped.
    fn faster_fps(&mut self) {
        let fps = match self.config.animation.target_fps {
            0 => 0,
            fps if fps + FPS_STEP > MAX_FPS => 0,
            fps => fps + FPS_STEP,
        };
        self.set_fps(fps);
    }

    /// Lower the cap by one step, starting from the highest cap when uncapped.
    fn slower_fps(&mut self) {
        let fps = match self.config.animation.target_fps {
            0 => MAX_FPS,
            fps => fps.saturating_sub(FPS_STEP).max(FPS_STEP),
        };
        self.set_fps(fps);
    }

    fn set_fps(&mut self, fps: u32) {
        self.config.animation.target_fps = fps;
        self.field.set_target_fps(fps);
    }

    /// Re-read `config.toml`, keeping command-line overrides on top.
    fn reload_config(&mut self) {
        let Some(dir) = &self.config_dir else {
            self.notice = Some("no config directory".to_string());
            return;
        };
        match self.config.reload(dir) {
            Ok(Some(mut config)) => {
                config.apply_cli_overrides(&self.cli);
                self.field.set_config(config.field_config());
                self.config = config;
                self.notice = Some("config reloaded".to_string());
            }
            Ok(None) => self.notice = Some("config unchanged".to_string()),
            Err(err) => {
                warn!(%err, "config reload failed");
                self.notice = Some(err.to_string());
            }
        }
    }

    fn elapsed_ms(&self) -> f64 {
        self.started.elapsed().as_secs_f64() * 1000.0
    }

    /// Set running to false to quit the application.
    fn quit(&mut self) {
        self.running = false;
    }
}

#[cfg(test)]
mod tests {
    use nightsky_config::CONFIG_FILE;
    use nightsky_core::{AnimationSpeed, FieldPreset};
    use nightsky_field::FieldConfig;
    use ratatui::{Terminal, backend::TestBackend};

    use super::*;

    fn app() -> App {
        let mut config = Config::default();
        config.animation.seed = Some(1);
        App::new(config, None, CliArgs::default())
    }

    fn press(app: &mut App, code: KeyCode) {
        app.on_key_event(KeyEvent::new(code, KeyModifiers::NONE));
    }

    fn draw(app: &mut App, terminal: &mut Terminal<TestBackend>) {
        terminal.draw(|frame| app.render(frame)).unwrap();
    }

    #[test]
    fn test_quit_keys() {
        for key in [
            KeyEvent::new(KeyCode::Char('q'), KeyModifiers::NONE),
            KeyEvent::new(KeyCode::Esc, KeyModifiers::NONE),
            KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL),
        ] {
            let mut app = app();
            app.running = true;
            app.on_key_event(key);
            assert!(!app.running);
        }
    }

    #[test]
    fn test_first_render_attaches_at_double_height() {
        let mut app = app();
        let mut terminal = Terminal::new(TestBackend::new(40, 12)).unwrap();
        draw(&mut app, &mut terminal);

        assert!(app.field.is_attached());
        assert_eq!(app.viewport, Some((40, 24)));
        assert_eq!(app.field.surface().width(), 40);
        assert_eq!(app.field.surface().height(), 24);
        assert!(!app.field.stars().is_empty());
    }

    #[test]
    fn test_resize_reseeds_field() {
        let mut app = app();
        let mut terminal = Terminal::new(TestBackend::new(40, 12)).unwrap();
        draw(&mut app, &mut terminal);

        terminal.backend_mut().resize(60, 20);
        draw(&mut app, &mut terminal);

        assert_eq!(app.viewport, Some((60, 40)));
        assert_eq!(app.field.bounds().width, 60.0);
        assert!(app.field.stars().iter().all(|star| star.x <= 60.0));
    }

    #[test]
    fn test_stop_detaches_field() {
        let mut app = app();
        let mut terminal = Terminal::new(TestBackend::new(20, 6)).unwrap();
        app.running = true;
        draw(&mut app, &mut terminal);
        assert!(app.field.is_attached());

        app.stop();
        assert!(!app.running);
        assert!(!app.field.is_attached());
        assert!(app.field.stars().is_empty());
        let now = app.elapsed_ms();
        assert_eq!(app.field.frame(now), FrameOutcome::Detached);
    }

    #[test]
    fn test_cycle_preset() {
        let mut app = app();
        press(&mut app, KeyCode::Char('p'));
        assert_eq!(app.config.animation.preset, FieldPreset::Cosmic);
        assert_eq!(
            app.field.config().stars,
            FieldConfig::preset(FieldPreset::Cosmic).stars
        );
    }

    #[test]
    fn test_toggle_lightning() {
        let mut app = app();
        let before = app.field.config().lightning.enabled;
        press(&mut app, KeyCode::Char('l'));
        assert_eq!(app.field.config().lightning.enabled, !before);
        assert_eq!(app.config.animation.lightning, Some(!before));
        press(&mut app, KeyCode::Char('l'));
        assert_eq!(app.field.config().lightning.enabled, before);
    }

    #[test]
    fn test_cycle_speed() {
        let mut app = app();
        press(&mut app, KeyCode::Char('s'));
        assert_eq!(app.config.animation.speed, AnimationSpeed::Fast);
        assert_eq!(
            app.field.config().speed_multiplier,
            app.config.field_config().speed_multiplier
        );
    }

    #[test]
    fn test_fps_steps_through_uncapped() {
        let mut app = app();
        app.set_fps(110);
        press(&mut app, KeyCode::Char('+'));
        assert_eq!(app.field.clock().target_fps(), 120);
        press(&mut app, KeyCode::Char('+'));
        assert_eq!(app.field.clock().target_fps(), 0);
        press(&mut app, KeyCode::Char('+'));
        assert_eq!(app.config.animation.target_fps, 0);
        press(&mut app, KeyCode::Char('-'));
        assert_eq!(app.field.clock().target_fps(), MAX_FPS);

        app.set_fps(10);
        press(&mut app, KeyCode::Char('-'));
        assert_eq!(app.field.clock().target_fps(), 10);
    }

    #[test]
    fn test_pause_freezes_field() {
        let mut app = app();
        let mut terminal = Terminal::new(TestBackend::new(30, 10)).unwrap();
        draw(&mut app, &mut terminal);

        press(&mut app, KeyCode::Char(' '));
        assert!(app.paused);
        assert_eq!(app.poll_timeout(), PAUSED_POLL);

        let stars = app.field.stars().to_vec();
        app.started -= Duration::from_secs(1);
        draw(&mut app, &mut terminal);
        assert_eq!(app.field.stars(), stars.as_slice());
    }

    #[test]
    fn test_help_line_shows_state() {
        let mut app = app();
        app.paused = true;
        let text: String = app
            .help_line()
            .spans
            .iter()
            .map(|span| span.content.as_ref())
            .collect();
        assert!(text.starts_with("hero 60 fps"));
        assert!(text.contains("paused"));
        assert!(text.contains("q quit"));
    }

    #[test]
    fn test_reload_without_dir_sets_notice() {
        let mut app = app();
        press(&mut app, KeyCode::Char('c'));
        assert_eq!(app.notice.as_deref(), Some("no config directory"));
    }

    #[test]
    fn test_reload_keeps_cli_overrides() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::default();
        config.save(dir.path()).unwrap();

        let cli = CliArgs {
            fps: Some(24),
            ..CliArgs::default()
        };
        let mut effective = config.clone();
        effective.apply_cli_overrides(&cli);
        let mut app = App::new(effective, Some(dir.path().to_path_buf()), cli);

        let mut changed = config.clone();
        changed.select_preset(FieldPreset::Starfield);
        changed.save(dir.path()).unwrap();

        press(&mut app, KeyCode::Char('c'));
        assert_eq!(app.config.animation.preset, FieldPreset::Starfield);
        assert_eq!(app.field.clock().target_fps(), 24);
        assert_eq!(app.notice.as_deref(), Some("config reloaded"));
        assert!(dir.path().join(CONFIG_FILE).exists());
    }
}
