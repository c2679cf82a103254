use crate::{config::Config, error::Error, utils::any::Any};
use std::fmt::{Display, Formatter, Result as FmtResult};
use url::Url;

/// A fully built search URL. Only [`QueryBuilder::build`] constructs one and nothing mutates it afterwards.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct EndpointUrl {
    url: Url,
}

impl EndpointUrl {
    pub fn as_str(&self) -> &str {
        self.url.as_str()
    }
}

impl Display for EndpointUrl {
    fn fmt(&self, formatter: &mut Formatter) -> FmtResult {
        self.url.fmt(formatter)
    }
}

pub struct QueryBuilder {
    endpoint: Url,
    query_param: String,
    sort: Option<String>,
}

impl QueryBuilder {
    const SORT_PARAM: &'static str = "sort";

    pub fn new(endpoint: &str, query_param: String, sort: Option<String>) -> Result<Self, Error> {
        let endpoint = Url::parse(endpoint)?;

        if endpoint.cannot_be_a_base() || !matches!(endpoint.scheme(), "http" | "https") {
            return Error::InvalidEndpoint(endpoint.into()).err();
        }

        Self {
            endpoint,
            query_param,
            sort,
        }
        .ok()
    }

    pub fn from_config(config: &Config) -> Result<Self, Error> {
        Self::new(&config.endpoint, config.query_param.clone(), config.sort.clone())
    }

    /// Formats the search URL for `query` without touching the network. Empty and whitespace-only queries are
    /// rejected with [`Error::EmptyQuery`].
    pub fn build(&self, query: &str) -> Result<EndpointUrl, Error> {
        let query = query.trim();

        if query.is_empty() {
            return Error::EmptyQuery.err();
        }

        let mut url = self.endpoint.clone();

        // NOTE: query_pairs_mut() appends to whatever query the configured endpoint already carries and
        // form-urlencodes each value
        {
            let mut query_pairs = url.query_pairs_mut();

            query_pairs.append_pair(&self.query_param, query);

            if let Some(sort) = &self.sort {
                query_pairs.append_pair(Self::SORT_PARAM, sort);
            }
        }

        EndpointUrl { url }.ok()
    }
}
