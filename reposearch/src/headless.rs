use crate::{
    config::Config,
    error::Error,
    fetch::{
        controller::{FetchCallback, FetchController, FetchResult},
        http::{Fetcher, HttpFetcher},
    },
    query::QueryBuilder,
    screen::state::State,
    utils::any::Any,
};

/// Runs a single search without the interactive screen, delivering into itself instead.
#[derive(Default)]
pub struct Headless {
    result: Option<FetchResult>,
}

impl FetchCallback for Headless {
    fn on_finished(&mut self, result: FetchResult) {
        self.result = result.some();
    }
}

impl Headless {
    pub fn url(config: &Config, query: &str) -> Result<(), Error> {
        match QueryBuilder::from_config(config)?.build(query) {
            Ok(url) => std::println!("{url}"),
            Err(error) => return Self::report(error),
        }

        ().ok()
    }

    pub async fn run(config: &Config, query: &str) -> Result<(), Error> {
        let query_builder = QueryBuilder::from_config(config)?;
        let fetcher = HttpFetcher::new(config)?;

        Self::print(&query_builder, fetcher, query).await
    }

    async fn print<F: Fetcher>(query_builder: &QueryBuilder, fetcher: F, query: &str) -> Result<(), Error> {
        match Self::fetch(query_builder, fetcher, query).await {
            Ok(Some(body)) => std::println!("{body}"),
            Ok(None) => {
                std::eprintln!("{}", State::FETCH_FAILED_MESSAGE);

                return Error::FetchFailed(query.trim().into()).err();
            }
            Err(error) => return Self::report(error),
        }

        ().ok()
    }

    fn report(error: Error) -> Result<(), Error> {
        if let Error::EmptyQuery = error {
            std::eprintln!("{}", State::NO_QUERY_MESSAGE);
        }

        error.err()
    }

    async fn fetch<F: Fetcher>(query_builder: &QueryBuilder, fetcher: F, query: &str) -> Result<FetchResult, Error> {
        let url = query_builder.build(query)?;
        let mut controller = FetchController::new(fetcher);
        let mut headless = Self::default();

        controller.start(url);

        while headless.result.is_none() {
            let Some(completion) = controller.completion().await else {
                break;
            };

            controller.deliver(completion, &mut headless);
        }

        controller.teardown(&mut headless);

        headless.result.flatten().ok()
    }
}
