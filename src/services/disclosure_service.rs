use chrono::{Local, NaiveDate};
use std::sync::Arc;
use url::Url;

use crate::error::Result;
use crate::models::announcement::{
    detail_pdf_url, parse_publish_date, CompanyAnnouncement, FundAnnouncement,
    RawCompanyDisclosure, RawDisclosure, RawFundDisclosure,
};
use crate::models::query::{apply_limit, CompanyQuery, DateWindow, FundQuery};
use crate::models::settings::ClientSettings;
use crate::services::attachment::{AttachmentResolver, DetailPageResolver};
use crate::utils::http::ThrottledHttp;

const FUNDS_ENDPOINT: &str = "/tr/api/disclosure/funds/byCriteria";
const MEMBERS_ENDPOINT: &str = "/tr/api/disclosure/members/byCriteria";

/// KAP 公告抓取客户端
///
/// All requests go out one at a time through a shared throttle, so a call
/// that resolves many attachments takes roughly `requests × request_delay`.
pub struct DisclosureClient {
    settings: ClientSettings,
    http: Arc<ThrottledHttp>,
    resolver: Arc<dyn AttachmentResolver>,
}

impl DisclosureClient {
    pub fn new() -> Result<Self> {
        Self::with_settings(ClientSettings::default())
    }

    pub fn with_settings(settings: ClientSettings) -> Result<Self> {
        let base = Url::parse(settings.root())?;
        let http = Arc::new(ThrottledHttp::new(&settings)?);
        let resolver: Arc<dyn AttachmentResolver> =
            Arc::new(DetailPageResolver::new(http.clone(), base));
        Ok(Self {
            settings,
            http,
            resolver,
        })
    }

    /// Use a custom attachment resolver instead of scraping detail pages.
    pub fn with_resolver(
        settings: ClientSettings,
        resolver: Arc<dyn AttachmentResolver>,
    ) -> Result<Self> {
        Url::parse(settings.root())?;
        let http = Arc::new(ThrottledHttp::new(&settings)?);
        Ok(Self {
            settings,
            http,
            resolver,
        })
    }

    pub fn settings(&self) -> &ClientSettings {
        &self.settings
    }

    pub fn detail_pdf_url(&self, announcement_id: &str) -> String {
        detail_pdf_url(self.settings.root(), announcement_id)
    }

    pub async fn resolve_attachment_url(&self, announcement_id: &str) -> Option<String> {
        self.resolver.resolve(announcement_id).await
    }

    /// 获取基金公告
    pub async fn fetch_fund_announcements(
        &self,
        query: &FundQuery,
    ) -> Result<Vec<FundAnnouncement>> {
        let window = query.window(today());
        let payload = query.payload(&window);
        let items = self
            .fetch_disclosures::<RawFundDisclosure>(FUNDS_ENDPOINT, &payload, &window, query.limit)
            .await?;
        log::info!("Fetched {} fund announcements from API", items.len());
        Ok(items)
    }

    /// 获取上市公司公告
    pub async fn fetch_company_announcements(
        &self,
        query: &CompanyQuery,
    ) -> Result<Vec<CompanyAnnouncement>> {
        let window = query.window(today());
        let payload = query.payload(&window);
        let items = self
            .fetch_disclosures::<RawCompanyDisclosure>(
                MEMBERS_ENDPOINT,
                &payload,
                &window,
                query.limit,
            )
            .await?;
        log::info!("Fetched {} company announcements from API", items.len());
        Ok(items)
    }

    async fn fetch_disclosures<R: RawDisclosure>(
        &self,
        endpoint: &str,
        payload: &serde_json::Value,
        window: &DateWindow,
        limit: Option<usize>,
    ) -> Result<Vec<R::Announcement>> {
        let url = format!("{}{}", self.settings.root(), endpoint);
        let body = self.http.post_json(&url, payload).await?;
        let raw: Vec<R> = serde_json::from_str(&body)?;

        let in_window: Vec<R> = raw
            .into_iter()
            .filter(|item| match parse_publish_date(item.publish_date()) {
                Some(at) if !window.contains(&at) => {
                    log::debug!(
                        "skipping {} published {} outside {}..{}",
                        item.announcement_id(),
                        item.publish_date(),
                        window.from,
                        window.to
                    );
                    false
                }
                _ => true,
            })
            .collect();

        let mut items = Vec::new();
        for item in apply_limit(in_window, limit) {
            items.push(self.build_announcement(item).await);
        }
        Ok(items)
    }

    async fn build_announcement<R: RawDisclosure>(&self, item: R) -> R::Announcement {
        let id = item.announcement_id();
        let detail = self.detail_pdf_url(&id);
        let attachment = if item.attachment_count() > 0 {
            self.resolver.resolve(&id).await
        } else {
            None
        };
        item.into_announcement(detail, attachment)
    }
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}
