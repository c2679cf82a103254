use crate::{
    fetch::controller::{FetchCallback, FetchResult},
    query::{EndpointUrl, QueryBuilder},
    screen::keymap::Context,
    utils::any::Any,
};

/// What survives the screen being rebuilt. The error line is not kept, the fetch slot hands it back.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SavedState {
    input: String,
    context: Context,
    url_display: String,
    results: String,
    scroll: u16,
}

#[derive(Default)]
pub struct State {
    input: String,
    context: Context,
    url_display: String,
    loading: bool,
    error: Option<&'static str>,
    results: String,
    scroll: u16,
    spinner_frame: usize,
}

impl State {
    pub const NO_QUERY_MESSAGE: &'static str = "No query entered, nothing to search for.";
    pub const FETCH_FAILED_MESSAGE: &'static str = "Failed to fetch search results.";
    const SPINNER_FRAMES: [&'static str; 4] = ["|", "/", "-", "\\"];

    pub fn restore(saved: SavedState, loading: bool) -> Self {
        Self {
            input: saved.input,
            context: saved.context,
            url_display: saved.url_display,
            results: saved.results,
            scroll: saved.scroll,
            loading,
            ..Self::default()
        }
    }

    pub fn save(&self) -> SavedState {
        SavedState {
            input: self.input.clone(),
            context: self.context,
            url_display: self.url_display.clone(),
            results: self.results.clone(),
            scroll: self.scroll,
        }
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn context(&self) -> Context {
        self.context
    }

    pub fn url_display(&self) -> &str {
        &self.url_display
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error_message(&self) -> Option<&'static str> {
        self.error
    }

    pub fn results(&self) -> &str {
        &self.results
    }

    pub fn scroll(&self) -> u16 {
        self.scroll
    }

    pub fn spinner(&self) -> &'static str {
        Self::SPINNER_FRAMES[self.spinner_frame % Self::SPINNER_FRAMES.len()]
    }

    pub fn push_char(&mut self, chr: char) {
        self.input.push(chr);
    }

    pub fn delete_backward(&mut self) {
        self.input.pop();
    }

    pub fn clear_input(&mut self) {
        self.input.clear();
    }

    pub fn set_input(&mut self, input: String) {
        self.input = input;
    }

    pub fn toggle_focus(&mut self) {
        self.context = match self.context {
            Context::Input => Context::Results,
            Context::Results => Context::Input,
        };
    }

    pub fn scroll_up(&mut self, count: u16) {
        self.scroll = self.scroll.saturating_sub(count);
    }

    pub fn scroll_down(&mut self, count: u16) {
        let max_scroll = self.results.lines().count().saturating_sub(1);
        let max_scroll = u16::try_from(max_scroll).unwrap_or(u16::MAX);

        self.scroll = self.scroll.saturating_add(count).min(max_scroll);
    }

    pub fn tick(&mut self) {
        if self.loading {
            self.spinner_frame = self.spinner_frame.wrapping_add(1);
        }
    }

    /// Builds the search url for the current input. An empty query only updates the url display; otherwise the url
    /// is displayed, the loading indicator turned on, and the url returned so that the caller can arm the fetch slot.
    pub fn submit(&mut self, query_builder: &QueryBuilder) -> Option<EndpointUrl> {
        let url = match query_builder.build(&self.input) {
            Ok(url) => url,
            Err(error) => {
                tracing::info!(%error, "not searching");
                self.url_display = Self::NO_QUERY_MESSAGE.into();

                return None;
            }
        };

        self.url_display = url.to_string();
        self.error = None;
        self.loading = true;

        url.some()
    }
}

impl FetchCallback for State {
    fn on_finished(&mut self, result: FetchResult) {
        self.loading = false;

        // NOTE: on failure the previous results stay on screen below the error
        match result {
            Some(body) => {
                // NOTE: the same body handed back after a rebuild keeps its scroll position
                if body != self.results {
                    self.results = body;
                    self.scroll = 0;
                }

                self.error = None;
            }
            None => self.error = Self::FETCH_FAILED_MESSAGE.some(),
        }
    }

    fn on_reset(&mut self) {
        self.loading = false;
    }
}
