use crate::{
    error::Error,
    screen::{color_scheme::ColorScheme, keymap::Context, state::State, terminal::Terminal},
    utils::any::Any,
};
use ratatui::{
    layout::Rect,
    style::Stylize,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
};

pub struct Render<'a> {
    terminal: &'a mut Terminal,
    state: &'a State,
    color_scheme: &'a ColorScheme,
}

impl<'a> Render<'a> {
    const TITLE: &'static str = "Repository Search";
    const INPUT_TITLE: &'static str = " Search GitHub ";
    const RESULTS_TITLE: &'static str = " Results ";
    const LOADING_TEXT: &'static str = "Loading...";
    const HELP_TEXT: &'static str = "enter: search | tab: focus | ctrl+u: clear | j/k: scroll | ctrl+c: quit";
    const CURSOR: &'static str = "_";
    const INPUT_HEIGHT: u16 = 3;

    pub fn new(terminal: &'a mut Terminal, state: &'a State, color_scheme: &'a ColorScheme) -> Self {
        Self {
            terminal,
            state,
            color_scheme,
        }
    }

    fn block(&self, title: &'static str, context: Context) -> Block<'static> {
        let title = if self.state.context() == context {
            title.bold()
        } else {
            title.into()
        };

        Block::default().borders(Borders::ALL).title(title)
    }

    fn render_title(&mut self) {
        let title = Self::TITLE.paragraph().centered().color(&self.color_scheme.title).bold();

        self.terminal
            .render_widget(title, self.terminal.area().width.row_at(0, 0));
    }

    fn render_input(&mut self) {
        let area = Rect::new(0, 1, self.terminal.area().width, Self::INPUT_HEIGHT);
        let mut spans = std::vec![Span::raw(self.state.input())];

        if self.state.context() == Context::Input {
            spans.push(Span::raw(Self::CURSOR).slow_blink());
        }

        let input = Line::from(spans)
            .paragraph()
            .block(self.block(Self::INPUT_TITLE, Context::Input))
            .color(&self.color_scheme.input);

        self.terminal.render_widget(input, area);
    }

    fn render_url(&mut self) {
        let url = self.state.url_display().paragraph().color(&self.color_scheme.url);

        self.terminal
            .render_widget(url, self.terminal.area().width.row_at(0, Self::INPUT_HEIGHT + 1));
    }

    fn render_status(&mut self) {
        let area = self.terminal.area().width.row_at(0, Self::INPUT_HEIGHT + 2);
        let status = if self.state.is_loading() {
            std::format!("{} {}", self.state.spinner(), Self::LOADING_TEXT)
                .paragraph()
                .color(&self.color_scheme.status)
        } else if let Some(error) = self.state.error_message() {
            error.paragraph().color(&self.color_scheme.error).bold()
        } else {
            Paragraph::default().color(&self.color_scheme.status)
        };

        self.terminal.render_widget(status, area);
    }

    fn render_results(&mut self) {
        let Rect { width, height, .. } = self.terminal.area();
        let top = Self::INPUT_HEIGHT + 3;
        let area = Rect::new(0, top, width, height.saturating_sub(top + 1));
        let results = self
            .state
            .results()
            .paragraph()
            .wrap(Wrap { trim: false })
            .scroll((self.state.scroll(), 0))
            .block(self.block(Self::RESULTS_TITLE, Context::Results))
            .color(&self.color_scheme.results);

        self.terminal.render_widget(results, area);
    }

    fn render_help(&mut self) {
        let Rect { width, height, .. } = self.terminal.area();
        let help = Self::HELP_TEXT.paragraph().color(&self.color_scheme.help);

        self.terminal
            .render_widget(help, width.row_at(0, height.saturating_sub(1)));
    }

    pub fn render(&mut self) -> Result<Vec<u8>, Error> {
        self.render_title();
        self.render_input();
        self.render_url();
        self.render_status();
        self.render_results();
        self.render_help();

        self.terminal.finish()
    }
}
