use crate::config::ScanConfig;
use crate::error::Result;
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::debug;

/// What the engine needs back from one request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeResponse {
    pub status_code: u16,
    pub body: Vec<u8>,
}

impl ProbeResponse {
    pub fn new(status_code: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status_code,
            body: body.into(),
        }
    }
}

/// The network seam. Implementations apply their own bounded timeout;
/// the engine treats every error as "no result".
#[async_trait]
pub trait Prober: Send + Sync {
    async fn get(&self, url: &str) -> Result<ProbeResponse>;
}

/// reqwest-backed prober used by the CLI
#[derive(Debug, Clone)]
pub struct HttpProber {
    client: Client,
}

impl HttpProber {
    pub fn new(config: &ScanConfig) -> Result<Self> {
        let redirect = if config.follow_redirects {
            reqwest::redirect::Policy::limited(5)
        } else {
            reqwest::redirect::Policy::none()
        };

        let client = Client::builder()
            .user_agent(config.user_agent.as_str())
            .timeout(config.request_timeout)
            .connect_timeout(config.request_timeout)
            .pool_max_idle_per_host(config.workers.max(1))
            .pool_idle_timeout(Duration::from_secs(90))
            .tcp_keepalive(Duration::from_secs(60))
            .redirect(redirect)
            .build()?;

        Ok(Self { client })
    }
}

#[async_trait]
impl Prober for HttpProber {
    async fn get(&self, url: &str) -> Result<ProbeResponse> {
        debug!("Probing {}", url);
        let response = self.client.get(url).send().await?;
        let status_code = response.status().as_u16();
        let body = response.bytes().await?;
        Ok(ProbeResponse {
            status_code,
            body: body.to_vec(),
        })
    }
}
