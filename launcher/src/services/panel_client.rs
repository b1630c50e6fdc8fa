//! HTTP transport to the panel backend

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;

use shared::{HostBatch, ReporterDirective, SendGate};

use crate::error::LauncherResult;
use crate::traits::PanelClient;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Panel client over reqwest
#[derive(Clone)]
pub struct HttpPanelClient {
    client: Client,
    base_url: String,
}

impl HttpPanelClient {
    pub fn new(base_url: impl Into<String>) -> LauncherResult<Self> {
        let client = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        let base_url = base_url.into().trim_end_matches('/').to_string();

        Ok(Self { client, base_url })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

#[async_trait]
impl PanelClient for HttpPanelClient {
    async fn push_status(&self, batch: &HostBatch) -> LauncherResult<ReporterDirective> {
        let directive = self
            .client
            .post(self.url("/api/status"))
            .json(batch)
            .send()
            .await?
            .error_for_status()?
            .json::<ReporterDirective>()
            .await?;

        Ok(directive)
    }

    async fn should_send(&self) -> LauncherResult<bool> {
        let gate = self
            .client
            .get(self.url("/api/should_send_status"))
            .send()
            .await?
            .error_for_status()?
            .json::<SendGate>()
            .await?;

        Ok(gate.should_send)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trailing_slash_trimmed() {
        let client = HttpPanelClient::new("http://panel.local:3000/").unwrap();
        assert_eq!(client.url("/api/status"), "http://panel.local:3000/api/status");
    }
}
