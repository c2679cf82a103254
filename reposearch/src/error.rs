use derive_more::{Display, From};
use reqwest::Error as ReqwestError;
use serde_yaml::Error as SerdeYamlError;
use std::io::Error as IoError;
use url::ParseError as UrlParseError;

// NOTE:
// - Error must implement Debug to be used as E in fn main() -> Result<(), E>
// - Error must implement Display for Any::warn() and Any::error()
#[derive(Debug, Display, From)]
pub enum Error {
    Io(IoError),
    Reqwest(ReqwestError),
    SerdeYaml(SerdeYamlError),
    Url(UrlParseError),

    #[display(fmt = "no query entered")]
    #[from(ignore)]
    EmptyQuery,

    #[display(fmt = "empty response body from {_0}")]
    #[from(ignore)]
    EmptyResponse(String),

    #[display(fmt = "search for {_0} failed")]
    #[from(ignore)]
    FetchFailed(String),

    #[display(fmt = "endpoint {_0} cannot carry a search query")]
    #[from(ignore)]
    InvalidEndpoint(String),
}
