use std::sync::{PoisonError, RwLock};

use once_cell::sync::Lazy;
use serde_json::Value;

mod batch;
mod http_client;
mod request;

use crate::{
    Error,
    config::{ClientConfig, Options, Resolved, Settings},
    validator::validate,
};

use self::{http_client::HttpClient, request::LookupRequest};

pub use request::user_agent;

static IPMONSTER: Lazy<IpMonster> = Lazy::new(|| {
    let settings = Settings::from_env_lenient();
    IpMonster::new(&settings).unwrap()
});

/// Client for the IP Monster lookup API.
///
/// Each call resolves its configuration once, before the request is built,
/// so a concurrent [`IpMonster::configure`] only affects later calls.
pub struct IpMonster {
    config: RwLock<ClientConfig>,
    env_api_key: Option<String>,
    http: HttpClient,
}

impl IpMonster {
    pub fn new(settings: &Settings) -> Result<Self, Error> {
        Ok(Self::with_parts(settings, HttpClient::new()?))
    }

    /// Uses a caller supplied `isahc` client, e.g. one with a proxy configured.
    pub fn with_http_client(settings: &Settings, client: isahc::HttpClient) -> Self {
        Self::with_parts(settings, HttpClient::from_isahc(client))
    }

    fn with_parts(settings: &Settings, http: HttpClient) -> Self {
        Self {
            config: RwLock::new(ClientConfig::from(settings)),
            env_api_key: settings.api_key.clone(),
            http,
        }
    }

    pub fn configure(&self, options: Options) {
        debug!("configure {:?}", options);
        self.config
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .merge(options);
    }

    pub fn config(&self) -> ClientConfig {
        self.config
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn resolve(&self, options: &Options) -> Result<Resolved, Error> {
        let config = self.config.read().unwrap_or_else(PoisonError::into_inner);
        Resolved::resolve(options, &config, self.env_api_key.as_deref())
    }

    /// Looks up a single address.
    pub async fn lookup(&self, ip: &str, options: &Options) -> Result<Value, Error> {
        if !validate(ip) {
            return Err(Error::InvalidIp);
        }
        let resolved = self.resolve(options)?;
        let request = LookupRequest::single(ip, resolved);
        self.http.get_json(&request).await
    }

    /// Looks up to 300 addresses in one request. Entries that fail
    /// validation are dropped as long as one valid entry remains.
    pub async fn batch_lookup<S: AsRef<str>>(
        &self,
        ips: &[S],
        options: &Options,
    ) -> Result<Value, Error> {
        let valid = batch::valid_ips(ips)?;
        let resolved = self.resolve(options)?;
        let request = LookupRequest::multiple(&valid, resolved);
        self.http.get_json(&request).await
    }

    /// [`IpMonster::batch_lookup`] for untyped input such as a parsed JSON
    /// document; anything but an array is rejected.
    pub async fn batch_lookup_value(&self, ips: &Value, options: &Options) -> Result<Value, Error> {
        let valid = batch::valid_ips_value(ips)?;
        let resolved = self.resolve(options)?;
        let request = LookupRequest::multiple(&valid, resolved);
        self.http.get_json(&request).await
    }
}

/// Configures the process-wide client, which reads the environment on first use.
pub fn configure(options: Options) {
    IPMONSTER.configure(options)
}

pub async fn lookup(ip: &str, options: &Options) -> Result<Value, Error> {
    IPMONSTER.lookup(ip, options).await
}

pub async fn batch_lookup<S: AsRef<str>>(ips: &[S], options: &Options) -> Result<Value, Error> {
    IPMONSTER.batch_lookup(ips, options).await
}
