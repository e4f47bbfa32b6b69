use isahc::{Request, http::header};
use url::Url;

use crate::{Error, config::Resolved};

const API_KEY_HEADER: &str = "X-API-KEY";

pub fn user_agent() -> String {
    format!("ipmonster/{}", env!("CARGO_PKG_VERSION"))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    Single,
    Multiple,
}

impl Endpoint {
    fn path(&self) -> &'static str {
        match self {
            Endpoint::Single => "single",
            Endpoint::Multiple => "multiple",
        }
    }
}

/// One GET against the lookup API, fully resolved before it is sent.
#[derive(Debug)]
pub struct LookupRequest {
    endpoint: Endpoint,
    ip: String,
    resolved: Resolved,
}

impl LookupRequest {
    pub fn single(ip: &str, resolved: Resolved) -> Self {
        Self {
            endpoint: Endpoint::Single,
            ip: ip.to_owned(),
            resolved,
        }
    }

    pub fn multiple(ips: &[&str], resolved: Resolved) -> Self {
        Self {
            endpoint: Endpoint::Multiple,
            ip: ips.join(","),
            resolved,
        }
    }

    pub fn timeout(&self) -> u64 {
        self.resolved.timeout
    }

    pub fn url(&self) -> Result<Url, Error> {
        let mut url = Url::parse(&format!(
            "{}/{}",
            self.resolved.base_url,
            self.endpoint.path()
        ))?;
        {
            let mut query = url.query_pairs_mut();
            query.append_pair("ip", &self.ip);
            if !self.resolved.is_default_output() {
                query.append_pair("output", &self.resolved.output);
            }
        }
        Ok(url)
    }

    pub fn build(&self) -> Result<Request<()>, Error> {
        let url = self.url()?;
        debug!("GET {} ({}ms)", url, self.resolved.timeout);
        let request = Request::get(url.as_str())
            .header(API_KEY_HEADER, self.resolved.api_key.as_str())
            .header(header::CONTENT_TYPE, "application/json")
            .header(header::USER_AGENT, user_agent())
            .body(())?;
        Ok(request)
    }
}
