use crate::{
    error::Error,
    screen::{
        color_scheme::ColorScheme,
        render::Render,
        state::{SavedState, State},
        terminal::Terminal,
    },
};
use ratatui::layout::Rect;

/// The search screen: its presentation state plus the terminal it draws into. Rebuilt from a [`SavedState`]
/// whenever the terminal is resized.
pub struct Screen {
    terminal: Terminal,
    state: State,
}

impl Screen {
    pub fn new(area: Rect) -> Self {
        Self::from_state(area, State::default())
    }

    pub fn restore(area: Rect, saved: SavedState, loading: bool) -> Self {
        Self::from_state(area, State::restore(saved, loading))
    }

    fn from_state(area: Rect, state: State) -> Self {
        let terminal = Terminal::new(area);

        Self { terminal, state }
    }

    pub fn save(&self) -> SavedState {
        self.state.save()
    }

    pub fn state(&self) -> &State {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut State {
        &mut self.state
    }

    pub fn render(&mut self, color_scheme: &ColorScheme) -> Result<Vec<u8>, Error> {
        Render::new(&mut self.terminal, &self.state, color_scheme).render()
    }
}

#[cfg(test)]
mod tests {
    use super::Screen;
    use crate::{config::Config, fetch::controller::FetchCallback, query::QueryBuilder};
    use ratatui::layout::Rect;

    #[test]
    fn renders_a_frame_and_then_only_the_difference() {
        let config = Config::load(None).unwrap();
        let mut screen = Screen::new(Rect::new(0, 0, 80, 24));
        let first_frame = screen.render(&config.color_scheme).unwrap();

        assert!(!first_frame.is_empty());
        assert!(screen.render(&config.color_scheme).unwrap().is_empty());

        screen.state_mut().on_finished(Some("{\"total_count\":1}".into()));

        assert!(!screen.render(&config.color_scheme).unwrap().is_empty());
    }

    #[test]
    fn tiny_terminals_do_not_panic() {
        let config = Config::load(None).unwrap();

        for (width, height) in [(0, 0), (1, 1), (10, 3), (80, 4)] {
            let mut screen = Screen::new(Rect::new(0, 0, width, height));

            screen.state_mut().set_input("android".into());
            screen.render(&config.color_scheme).unwrap();
        }
    }

    #[test]
    fn restoring_keeps_the_url_display() {
        let query_builder = QueryBuilder::from_config(&Config::load(None).unwrap()).unwrap();
        let mut screen = Screen::new(Rect::new(0, 0, 80, 24));

        screen.state_mut().set_input("android".into());
        screen.state_mut().submit(&query_builder);

        let restored = Screen::restore(Rect::new(0, 0, 100, 30), screen.save(), true);

        assert_eq!(
            restored.state().url_display(),
            "https://api.github.com/search/repositories?q=android"
        );
        assert!(restored.state().is_loading());
    }
}
