use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, REFERER};
use serde::Serialize;

use crate::error::{DisclosureError, Result};
use crate::models::settings::ClientSettings;
use crate::utils::throttle::Throttle;

/// KAP 请求客户端：浏览器头 + 超时 + gzip
pub fn build_kap_client(settings: &ClientSettings) -> Result<reqwest::Client> {
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static("application/json, text/plain, */*"));
    headers.insert(
        ACCEPT_LANGUAGE,
        HeaderValue::from_static("tr-TR,tr;q=0.9,en-US;q=0.8,en;q=0.7"),
    );
    headers.insert(REFERER, HeaderValue::from_str(&format!("{}/tr", settings.root()))?);

    let client = reqwest::Client::builder()
        .default_headers(headers)
        .user_agent(settings.user_agent.as_str())
        .timeout(settings.timeout())
        .gzip(true)
        .build()?;
    Ok(client)
}

/// A reqwest client whose every request first passes the throttle.
pub struct ThrottledHttp {
    client: reqwest::Client,
    throttle: Throttle,
}

impl ThrottledHttp {
    pub fn new(settings: &ClientSettings) -> Result<Self> {
        Ok(Self {
            client: build_kap_client(settings)?,
            throttle: Throttle::new(settings.request_delay()?),
        })
    }

    /// POST a JSON body and return the raw response text.
    pub async fn post_json<B: Serialize + ?Sized>(&self, url: &str, body: &B) -> Result<String> {
        self.throttle.wait().await;
        let resp = self.client.post(url).json(body).send().await?;
        read_success_body(url, resp).await
    }

    pub async fn get_text(&self, url: &str) -> Result<String> {
        self.throttle.wait().await;
        let resp = self.client.get(url).send().await?;
        read_success_body(url, resp).await
    }
}

async fn read_success_body(url: &str, resp: reqwest::Response) -> Result<String> {
    let status = resp.status();
    if !status.is_success() {
        return Err(DisclosureError::Status {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }
    Ok(resp.text().await?)
}
