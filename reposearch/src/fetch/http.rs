use crate::{config::Config, error::Error, query::EndpointUrl, utils::any::Any};
use reqwest::{
    header::{HeaderMap, HeaderValue, ACCEPT},
    Client as ReqwestClient,
};
use std::future::Future;

/// Performs the one network retrieval behind an armed fetch slot.
pub trait Fetcher: Send + Sync + 'static {
    fn fetch(&self, url: &EndpointUrl) -> impl Future<Output = Result<String, Error>> + Send;
}

pub struct HttpFetcher {
    client: ReqwestClient,
}

impl HttpFetcher {
    const ACCEPT_HEADER_VALUE: &'static str = "application/vnd.github+json";

    pub fn new(config: &Config) -> Result<Self, Error> {
        let mut headers = HeaderMap::new();

        headers.insert(ACCEPT, HeaderValue::from_static(Self::ACCEPT_HEADER_VALUE));

        let mut builder = ReqwestClient::builder()
            .user_agent(config.user_agent.as_str())
            .default_headers(headers);

        if let Some(timeout) = config.timeout() {
            builder = builder.timeout(timeout);
        }

        Self { client: builder.build()? }.ok()
    }
}

impl Fetcher for HttpFetcher {
    fn fetch(&self, url: &EndpointUrl) -> impl Future<Output = Result<String, Error>> + Send {
        let request = self.client.get(url.as_str());
        let url = url.to_string();

        async move {
            let body = request.send().await?.error_for_status()?.text().await?;

            if body.is_empty() {
                return Error::EmptyResponse(url).err();
            }

            body.ok()
        }
    }
}
