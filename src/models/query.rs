use chrono::{Duration, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Default look-back when `from_date` is not given
pub const DEFAULT_LOOKBACK_DAYS: i64 = 30;
/// Yatırım Fonları (investment funds)
pub const DEFAULT_FUND_TYPE: &str = "YF";
/// İşletmeler Genel Sınıfı (listed companies)
pub const DEFAULT_MEMBER_TYPE: &str = "IGS";

const PAYLOAD_DATE_FORMAT: &str = "%Y-%m-%d";

/// Inclusive calendar-day window of a query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateWindow {
    pub from: NaiveDate,
    pub to: NaiveDate,
}

impl DateWindow {
    /// Fills missing bounds: `to` defaults to `today`, `from` to 30 days before today.
    pub fn resolve(from: Option<NaiveDate>, to: Option<NaiveDate>, today: NaiveDate) -> Self {
        Self {
            from: from.unwrap_or(today - Duration::days(DEFAULT_LOOKBACK_DAYS)),
            to: to.unwrap_or(today),
        }
    }

    pub fn contains(&self, at: &NaiveDateTime) -> bool {
        let day = at.date();
        day >= self.from && day <= self.to
    }

    fn from_param(&self) -> String {
        self.from.format(PAYLOAD_DATE_FORMAT).to_string()
    }

    fn to_param(&self) -> String {
        self.to.format(PAYLOAD_DATE_FORMAT).to_string()
    }
}

/// Truncate to `limit`, keeping order. `None` keeps everything.
pub fn apply_limit<T>(mut items: Vec<T>, limit: Option<usize>) -> Vec<T> {
    if let Some(n) = limit {
        items.truncate(n);
    }
    items
}

/// 基金公告查询条件
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FundQuery {
    /// 起始日期，缺省为今天往前 30 天
    #[serde(default)]
    pub from_date: Option<NaiveDate>,
    /// 截止日期，缺省为今天
    #[serde(default)]
    pub to_date: Option<NaiveDate>,
    /// 基金类型代码 (YF, BYF, EYF ...)，为空时使用 YF
    #[serde(default)]
    pub fund_types: Vec<String>,
    /// 最多返回条数，None 为不限
    #[serde(default)]
    pub limit: Option<usize>,
}

impl FundQuery {
    pub fn between(from: NaiveDate, to: NaiveDate) -> Self {
        Self {
            from_date: Some(from),
            to_date: Some(to),
            ..Self::default()
        }
    }

    pub fn fund_types(mut self, types: &[&str]) -> Self {
        self.fund_types = types.iter().map(|t| t.to_string()).collect();
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn window(&self, today: NaiveDate) -> DateWindow {
        DateWindow::resolve(self.from_date, self.to_date, today)
    }

    pub fn effective_fund_types(&self) -> Vec<String> {
        if self.fund_types.is_empty() {
            vec![DEFAULT_FUND_TYPE.to_string()]
        } else {
            self.fund_types.clone()
        }
    }

    /// Request body for `funds/byCriteria`.
    pub fn payload(&self, window: &DateWindow) -> Value {
        serde_json::json!({
            "fromDate": window.from_param(),
            "toDate": window.to_param(),
            "fundTypeList": self.effective_fund_types(),
            "mkkMemberOidList": [],
            "fundOidList": [],
            "passiveFundOidList": [],
            "disclosureClass": "",
            "isLate": "",
            "subjectList": [],
            "discIndex": [],
            "fromSrc": false,
            "srcCategory": ""
        })
    }
}

/// 上市公司公告查询条件
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompanyQuery {
    #[serde(default)]
    pub from_date: Option<NaiveDate>,
    #[serde(default)]
    pub to_date: Option<NaiveDate>,
    /// 成员类型代码，缺省 IGS
    #[serde(default = "default_member_type")]
    pub member_type: String,
    #[serde(default)]
    pub limit: Option<usize>,
}

fn default_member_type() -> String {
    DEFAULT_MEMBER_TYPE.to_string()
}

impl Default for CompanyQuery {
    fn default() -> Self {
        Self {
            from_date: None,
            to_date: None,
            member_type: default_member_type(),
            limit: None,
        }
    }
}

impl CompanyQuery {
    pub fn between(from: NaiveDate, to: NaiveDate) -> Self {
        Self {
            from_date: Some(from),
            to_date: Some(to),
            ..Self::default()
        }
    }

    pub fn member_type(mut self, member_type: &str) -> Self {
        self.member_type = member_type.to_string();
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn window(&self, today: NaiveDate) -> DateWindow {
        DateWindow::resolve(self.from_date, self.to_date, today)
    }

    /// Request body for `members/byCriteria`.
    pub fn payload(&self, window: &DateWindow) -> Value {
        let member_type = if self.member_type.trim().is_empty() {
            DEFAULT_MEMBER_TYPE
        } else {
            self.member_type.as_str()
        };
        serde_json::json!({
            "fromDate": window.from_param(),
            "toDate": window.to_param(),
            "memberType": member_type,
            "mkkMemberOidList": [],
            "inactiveMkkMemberOidList": [],
            "disclosureClass": "",
            "subjectList": [],
            "isLate": "",
            "mainSector": "",
            "sector": "",
            "subSector": "",
            "marketOid": "",
            "index": "",
            "bdkReview": "",
            "bdkMemberOidList": [],
            "year": "",
            "term": "",
            "ruleType": "",
            "period": "",
            "fromSrc": false,
            "srcCategory": "",
            "disclosureIndexList": []
        })
    }
}
