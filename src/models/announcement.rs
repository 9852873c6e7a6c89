use chrono::NaiveDateTime;
use serde::de::{self, DeserializeOwned};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// KAP publish timestamps, e.g. `05.12.2025 22:17:35`
pub const PUBLISH_DATE_FORMAT: &str = "%d.%m.%Y %H:%M:%S";

/// PDF rendering of a disclosure; needs no network call.
pub fn detail_pdf_url(root: &str, announcement_id: &str) -> String {
    format!("{}/tr/api/BildirimPdf/{}", root.trim_end_matches('/'), announcement_id)
}

pub fn parse_publish_date(date_time: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(date_time.trim(), PUBLISH_DATE_FORMAT).ok()
}

/// 基金公告
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FundAnnouncement {
    pub announcement_id: String,
    /// 发布时间 (DD.MM.YYYY HH:MM:SS)
    pub date_time: String,
    pub fund_code: String,
    pub fund_name: String,
    pub subject: String,
    pub summary: String,
    /// 关联股票代码，保持接口返回顺序
    pub related_stocks: Vec<String>,
    pub has_attachment: bool,
    pub attachment_count: u32,
    pub detail_pdf_url: String,
    /// 附件 PDF；attachment_count > 0 但为 None 表示附件页解析失败
    pub attachment_pdf_url: Option<String>,
}

impl FundAnnouncement {
    pub fn published_at(&self) -> Option<NaiveDateTime> {
        parse_publish_date(&self.date_time)
    }
}

/// 上市公司公告
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompanyAnnouncement {
    pub announcement_id: String,
    pub date_time: String,
    pub company_code: String,
    pub company_name: String,
    pub subject: String,
    pub summary: String,
    pub related_companies: Vec<String>,
    pub has_attachment: bool,
    pub attachment_count: u32,
    pub detail_pdf_url: String,
    pub attachment_pdf_url: Option<String>,
}

impl CompanyAnnouncement {
    pub fn published_at(&self) -> Option<NaiveDateTime> {
        parse_publish_date(&self.date_time)
    }
}

// ============================================================
// Upstream wire records
// ============================================================

/// `disclosureIndex` arrives as a number, occasionally as a string.
#[derive(Deserialize)]
#[serde(untagged)]
enum WireIndex {
    Number(u64),
    Text(String),
}

/// Validated disclosure id: non-empty ASCII digits, not zero.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisclosureIndex(String);

impl DisclosureIndex {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl<'de> Deserialize<'de> for DisclosureIndex {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let id = match WireIndex::deserialize(deserializer)? {
            WireIndex::Number(n) => n.to_string(),
            WireIndex::Text(s) => s.trim().to_string(),
        };
        if id.is_empty() || !id.bytes().all(|b| b.is_ascii_digit()) {
            return Err(de::Error::custom(format!(
                "disclosureIndex {:?} is not numeric",
                id
            )));
        }
        if id.bytes().all(|b| b == b'0') {
            return Err(de::Error::custom("disclosureIndex is zero"));
        }
        Ok(Self(id))
    }
}

impl fmt::Display for DisclosureIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// `relatedStocks` is either a single string or a list.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum RelatedStocks {
    One(String),
    Many(Vec<String>),
}

fn related_list(related: Option<RelatedStocks>) -> Vec<String> {
    match related {
        Some(RelatedStocks::Many(list)) => list,
        Some(RelatedStocks::One(s)) if !s.is_empty() => vec![s],
        _ => Vec::new(),
    }
}

/// One record of a byCriteria response, validated at the boundary.
pub trait RawDisclosure: DeserializeOwned {
    type Announcement;

    fn announcement_id(&self) -> String;
    fn publish_date(&self) -> &str;
    fn attachment_count(&self) -> u32;
    fn into_announcement(
        self,
        detail_pdf_url: String,
        attachment_pdf_url: Option<String>,
    ) -> Self::Announcement;
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawFundDisclosure {
    pub disclosure_index: DisclosureIndex,
    pub publish_date: String,
    pub fund_code: Option<String>,
    pub kap_title: Option<String>,
    pub subject: Option<String>,
    pub summary: Option<String>,
    pub related_stocks: Option<RelatedStocks>,
    pub attachment_count: Option<u32>,
}

impl RawDisclosure for RawFundDisclosure {
    type Announcement = FundAnnouncement;

    fn announcement_id(&self) -> String {
        self.disclosure_index.to_string()
    }

    fn publish_date(&self) -> &str {
        &self.publish_date
    }

    fn attachment_count(&self) -> u32 {
        self.attachment_count.unwrap_or(0)
    }

    fn into_announcement(
        self,
        detail_pdf_url: String,
        attachment_pdf_url: Option<String>,
    ) -> FundAnnouncement {
        let attachment_count = self.attachment_count();
        FundAnnouncement {
            announcement_id: self.announcement_id(),
            date_time: self.publish_date,
            fund_code: self.fund_code.unwrap_or_default(),
            fund_name: self.kap_title.unwrap_or_default(),
            subject: self.subject.unwrap_or_default(),
            summary: self.summary.unwrap_or_default(),
            related_stocks: related_list(self.related_stocks),
            has_attachment: attachment_count > 0,
            attachment_count,
            detail_pdf_url,
            attachment_pdf_url: attachment_pdf_url.filter(|_| attachment_count > 0),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawCompanyDisclosure {
    pub disclosure_index: DisclosureIndex,
    pub publish_date: String,
    /// Comma separated when the company trades under several codes
    pub stock_codes: Option<String>,
    pub kap_title: Option<String>,
    pub subject: Option<String>,
    pub summary: Option<String>,
    pub related_stocks: Option<RelatedStocks>,
    pub attachment_count: Option<u32>,
}

impl RawCompanyDisclosure {
    fn company_code(&self) -> String {
        self.stock_codes
            .as_deref()
            .and_then(|codes| codes.split(',').next())
            .map(|code| code.trim().to_string())
            .unwrap_or_default()
    }
}

impl RawDisclosure for RawCompanyDisclosure {
    type Announcement = CompanyAnnouncement;

    fn announcement_id(&self) -> String {
        self.disclosure_index.to_string()
    }

    fn publish_date(&self) -> &str {
        &self.publish_date
    }

    fn attachment_count(&self) -> u32 {
        self.attachment_count.unwrap_or(0)
    }

    fn into_announcement(
        self,
        detail_pdf_url: String,
        attachment_pdf_url: Option<String>,
    ) -> CompanyAnnouncement {
        let attachment_count = self.attachment_count();
        let company_code = self.company_code();
        CompanyAnnouncement {
            announcement_id: self.announcement_id(),
            date_time: self.publish_date,
            company_code,
            company_name: self.kap_title.unwrap_or_default(),
            subject: self.subject.unwrap_or_default(),
            summary: self.summary.unwrap_or_default(),
            related_companies: related_list(self.related_stocks),
            has_attachment: attachment_count > 0,
            attachment_count,
            detail_pdf_url,
            attachment_pdf_url: attachment_pdf_url.filter(|_| attachment_count > 0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const ROOT: &str = "https://www.kap.org.tr";

    fn fund_item() -> serde_json::Value {
        json!({
            "publishDate": "05.12.2025 22:17:35",
            "fundCode": "PDF",
            "kapTitle": "TEST FUND",
            "summary": "Test summary",
            "subject": "Test subject",
            "disclosureIndex": 1524023,
            "relatedStocks": null,
            "attachmentCount": 0
        })
    }

    #[test]
    fn test_detail_pdf_url() {
        assert_eq!(
            detail_pdf_url(ROOT, "1524023"),
            "https://www.kap.org.tr/tr/api/BildirimPdf/1524023"
        );
        assert_eq!(
            detail_pdf_url("http://localhost:9000/", "7"),
            "http://localhost:9000/tr/api/BildirimPdf/7"
        );
    }

    #[test]
    fn test_extract_fund_announcement() {
        let raw: RawFundDisclosure = serde_json::from_value(fund_item()).unwrap();
        assert_eq!(raw.announcement_id(), "1524023");
        let id = raw.announcement_id();
        let ann = raw.into_announcement(detail_pdf_url(ROOT, &id), None);
        assert_eq!(ann.fund_code, "PDF");
        assert_eq!(ann.fund_name, "TEST FUND");
        assert_eq!(ann.announcement_id, "1524023");
        assert!(!ann.has_attachment);
        assert!(ann.related_stocks.is_empty());
        assert_eq!(ann.detail_pdf_url, "https://www.kap.org.tr/tr/api/BildirimPdf/1524023");
    }

    #[test]
    fn test_extract_company_announcement() {
        let raw: RawCompanyDisclosure = serde_json::from_value(json!({
            "publishDate": "06.12.2025 14:29:07",
            "kapTitle": "TEST COMPANY A.Ş.",
            "stockCodes": "TEST",
            "summary": "Test summary",
            "subject": "Test subject",
            "disclosureIndex": 1524033,
            "relatedStocks": null,
            "attachmentCount": 0
        }))
        .unwrap();
        let ann = raw.into_announcement(detail_pdf_url(ROOT, "1524033"), None);
        assert_eq!(ann.company_code, "TEST");
        assert_eq!(ann.company_name, "TEST COMPANY A.Ş.");
        assert_eq!(ann.announcement_id, "1524033");
        assert!(!ann.has_attachment);
    }

    #[test]
    fn test_company_code_takes_first_of_many() {
        let raw: RawCompanyDisclosure = serde_json::from_value(json!({
            "disclosureIndex": "42",
            "publishDate": "06.12.2025 14:29:07",
            "stockCodes": " GARAN , GARNY"
        }))
        .unwrap();
        assert_eq!(raw.company_code(), "GARAN");
        assert_eq!(raw.announcement_id(), "42");
    }

    #[test]
    fn test_related_stocks_variants() {
        let mut item = fund_item();
        item["relatedStocks"] = json!("THYAO");
        let raw: RawFundDisclosure = serde_json::from_value(item.clone()).unwrap();
        assert_eq!(raw.into_announcement(String::new(), None).related_stocks, vec!["THYAO"]);

        item["relatedStocks"] = json!(["AKBNK", "YKBNK"]);
        let raw: RawFundDisclosure = serde_json::from_value(item.clone()).unwrap();
        assert_eq!(
            raw.into_announcement(String::new(), None).related_stocks,
            vec!["AKBNK", "YKBNK"]
        );

        item["relatedStocks"] = json!("");
        let raw: RawFundDisclosure = serde_json::from_value(item).unwrap();
        assert!(raw.into_announcement(String::new(), None).related_stocks.is_empty());
    }

    #[test]
    fn test_null_text_fields_become_empty() {
        let raw: RawFundDisclosure = serde_json::from_value(json!({
            "disclosureIndex": 1,
            "publishDate": "01.01.2025 00:00:00",
            "summary": null,
            "subject": null
        }))
        .unwrap();
        let ann = raw.into_announcement(String::new(), None);
        assert_eq!(ann.summary, "");
        assert_eq!(ann.subject, "");
        assert_eq!(ann.attachment_count, 0);
    }

    #[test]
    fn test_missing_required_fields_fail() {
        let no_index = json!({"publishDate": "05.12.2025 22:17:35"});
        assert!(serde_json::from_value::<RawFundDisclosure>(no_index).is_err());

        let no_date = json!({"disclosureIndex": 1524023});
        assert!(serde_json::from_value::<RawCompanyDisclosure>(no_date).is_err());
    }

    #[test]
    fn test_disclosure_index_must_be_positive_number() {
        for bad in [json!(""), json!("  "), json!("abc"), json!("12a"), json!(0), json!("000")] {
            let mut item = fund_item();
            item["disclosureIndex"] = bad.clone();
            assert!(
                serde_json::from_value::<RawFundDisclosure>(item).is_err(),
                "accepted {}",
                bad
            );
        }

        let raw: RawCompanyDisclosure = serde_json::from_value(json!({
            "disclosureIndex": " 1524033 ",
            "publishDate": "06.12.2025 14:29:07"
        }))
        .unwrap();
        assert_eq!(raw.announcement_id(), "1524033");
    }

    #[test]
    fn test_attachment_url_dropped_without_attachments() {
        let raw: RawFundDisclosure = serde_json::from_value(fund_item()).unwrap();
        let ann = raw.into_announcement(String::new(), Some("https://x/file.pdf".to_string()));
        assert_eq!(ann.attachment_pdf_url, None);
    }

    #[test]
    fn test_published_at() {
        let raw: RawFundDisclosure = serde_json::from_value(fund_item()).unwrap();
        let ann = raw.into_announcement(String::new(), None);
        let at = ann.published_at().unwrap();
        assert_eq!(at.format("%Y-%m-%d %H:%M:%S").to_string(), "2025-12-05 22:17:35");
        assert_eq!(parse_publish_date("2025-12-05"), None);
    }
}
