use crate::{
    config::Config,
    error::Error,
    fetch::{
        controller::FetchController,
        http::{Fetcher, HttpFetcher},
    },
    query::{EndpointUrl, QueryBuilder},
    screen::{
        color_scheme::ColorScheme,
        command::Command,
        keymap::{Context, Keymap},
        screen::Screen,
    },
    utils::any::Any,
};
use crossterm::{
    cursor::{Hide, Show},
    event::{
        DisableMouseCapture, EnableMouseCapture, Event, EventStream as CrosstermEventStream, KeyCode, KeyEvent,
        KeyEventKind, KeyModifiers, MouseEvent, MouseEventKind,
    },
    terminal::{Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen},
    QueueableCommand,
};
use futures::{Stream, StreamExt};
use ratatui::layout::Rect;
use std::{
    io::{Error as IoError, Stdout, StdoutLock, Write},
    time::Duration,
};

macro_rules! key_pattern {
    ($chr:ident) => {
        Event::Key(KeyEvent {
            code: KeyCode::Char($chr),
            modifiers: KeyModifiers::NONE | KeyModifiers::SHIFT,
            kind: KeyEventKind::Press,
            ..
        })
    };
}

macro_rules! mouse_pattern {
    ($variant:ident) => {
        Event::Mouse(MouseEvent {
            kind: MouseEventKind::$variant,
            ..
        })
    };
}

/// Raw mode on the alternate screen, for as long as this value lives.
struct RawTerminal {
    stdout: Stdout,
}

impl RawTerminal {
    fn enter() -> Result<Self, Error> {
        let mut raw_terminal = Self { stdout: std::io::stdout() };

        crossterm::terminal::enable_raw_mode()?;
        raw_terminal
            .stdout
            .queue(EnterAlternateScreen)?
            .queue(EnableMouseCapture)?
            .queue(Hide)?
            .queue(Clear(ClearType::All))?
            .flush()?;

        raw_terminal.ok()
    }

    fn leave(&mut self) -> Result<(), Error> {
        crossterm::terminal::disable_raw_mode()?;
        self.stdout
            .queue(LeaveAlternateScreen)?
            .queue(DisableMouseCapture)?
            .queue(Show)?
            .flush()?;

        ().ok()
    }
}

impl Drop for RawTerminal {
    fn drop(&mut self) {
        self.leave().error();
    }
}

/// The interactive screen. Owns the fetch slot, and is the only place fetch results are delivered.
pub struct App<F, W> {
    writer: W,
    keymap: Keymap,
    color_scheme: ColorScheme,
    query_builder: QueryBuilder,
    controller: FetchController<F>,
    screen: Screen,
}

impl<F: Fetcher, W: Write> App<F, W> {
    const TICK_INTERVAL: Duration = Duration::from_millis(100);

    fn new(config: Config, fetcher: F, writer: W, area: Rect) -> Result<Self, Error> {
        let query_builder = QueryBuilder::from_config(&config)?;

        Self {
            writer,
            keymap: Keymap::new(config.keymap),
            color_scheme: config.color_scheme,
            query_builder,
            controller: FetchController::new(fetcher),
            screen: Screen::new(area),
        }
        .ok()
    }

    fn render(&mut self) -> Result<(), Error> {
        let bytes = self.screen.render(&self.color_scheme)?;

        if !bytes.is_empty() {
            self.writer.write_all_and_flush(&bytes)?;
        }

        ().ok()
    }

    fn search(screen: &mut Screen, controller: &mut FetchController<F>, query_builder: &QueryBuilder) {
        if let Some(url) = screen.state_mut().submit(query_builder) {
            controller.start(url);
        }
    }

    // NOTE: a resize rebuilds the screen from its saved state and reattaches it to the fetch slot, which hands a
    // delivered result to the new screen again without refetching
    fn recreate_screen(
        writer: &mut W,
        screen: &mut Screen,
        controller: &mut FetchController<F>,
        size: (u16, u16),
    ) -> Result<(), Error> {
        let saved = screen.save();

        tracing::info!(?size, target = ?controller.target().map(EndpointUrl::as_str), "rebuilding screen");

        *screen = Screen::restore(size.rect(), saved, controller.is_pending());
        controller.init(None, screen.state_mut());
        writer.queue(Clear(ClearType::All))?.flush()?;

        ().ok()
    }

    fn feed(&mut self, event: &Event) -> Result<bool, Error> {
        let Self {
            writer,
            keymap,
            query_builder,
            controller,
            screen,
            ..
        } = self;
        let events = std::slice::from_ref(event);

        match keymap.get(screen.state().context(), events) {
            (_, Ok(Command::Quit)) => return true.ok(),
            (_, Err(&[Event::Resize(width, height)])) => {
                Self::recreate_screen(writer, screen, controller, (width, height))?;
            }
            (_, Err(&[mouse_pattern!(ScrollUp)])) => screen.state_mut().scroll_up(1),
            (_, Err(&[mouse_pattern!(ScrollDown)])) => screen.state_mut().scroll_down(1),
            (_, Ok(Command::ToggleFocus)) => screen.state_mut().toggle_focus(),
            (_, Ok(Command::ScrollUp { count })) => screen.state_mut().scroll_up(*count),
            (_, Ok(Command::ScrollDown { count })) => screen.state_mut().scroll_down(*count),
            (Context::Input, Ok(Command::Search)) => Self::search(screen, controller, query_builder),
            (Context::Input, Ok(Command::Clear)) => screen.state_mut().clear_input(),
            (Context::Input, Ok(Command::DeleteBackward)) => screen.state_mut().delete_backward(),
            (Context::Input, Err(&[key_pattern!(chr)])) => screen.state_mut().push_char(chr),
            (context, ignored_result) => tracing::debug!(?context, ?ignored_result),
        }

        false.ok()
    }

    async fn event_loop<S>(&mut self, events: &mut S, initial_query: Option<String>) -> Result<(), Error>
    where
        S: Stream<Item = Result<Event, IoError>> + Unpin,
    {
        let mut ticks = tokio::time::interval(Self::TICK_INTERVAL);

        self.controller.init(None, self.screen.state_mut());

        if let Some(initial_query) = initial_query {
            self.screen.state_mut().set_input(initial_query);
            Self::search(&mut self.screen, &mut self.controller, &self.query_builder);
        }

        loop {
            self.render()?;

            tokio::select! {
                event_res_opt = events.next() => {
                    let Some(event_res) = event_res_opt else { break; };

                    if self.feed(&event_res?)? {
                        break;
                    }
                }
                completion_opt = self.controller.completion() => {
                    let Some(completion) = completion_opt else { break; };

                    self.controller.deliver(completion, self.screen.state_mut());
                }
                _instant = ticks.tick() => self.screen.state_mut().tick(),
            }
        }

        ().ok()
    }

    /// Runs the owner loop over `events`, then tears the fetch slot down however the loop ended.
    async fn drive<S>(&mut self, mut events: S, initial_query: Option<String>) -> Result<(), Error>
    where
        S: Stream<Item = Result<Event, IoError>> + Unpin,
    {
        let result = self.event_loop(&mut events, initial_query).await;

        self.controller.teardown(self.screen.state_mut());

        result
    }
}

impl App<HttpFetcher, StdoutLock<'static>> {
    pub async fn run(config: Config, initial_query: Option<String>) -> Result<(), Error> {
        let fetcher = HttpFetcher::new(&config)?;
        let area = crossterm::terminal::size()?.rect();
        let _raw_terminal = RawTerminal::enter()?;
        let mut app = Self::new(config, fetcher, std::io::stdout().lock(), area)?;

        app.drive(CrosstermEventStream::new(), initial_query).await
    }
}
