//! Fetch recent fund and company disclosures from KAP and print them.
//!
//!   RUST_LOG=info cargo run --example fetch_latest

use anyhow::Result;
use chrono::NaiveDate;
use kap_disclosure::{ClientSettings, CompanyQuery, DisclosureClient, FundQuery};

fn rule() -> String {
    "=".repeat(60)
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let client = DisclosureClient::with_settings(ClientSettings::default())?;
    let from = NaiveDate::parse_from_str("2024-12-06", "%Y-%m-%d")?;
    let to = NaiveDate::parse_from_str("2025-12-06", "%Y-%m-%d")?;

    println!("{}\nFETCHING FUND ANNOUNCEMENTS\n{}", rule(), rule());
    let funds = client
        .fetch_fund_announcements(&FundQuery::between(from, to).fund_types(&["YF"]).limit(15))
        .await?;
    if funds.is_empty() {
        println!("No fund announcements found");
    }
    for (idx, ann) in funds.iter().enumerate() {
        println!("Fund Announcement #{}:", idx + 1);
        println!("  ID: {}", ann.announcement_id);
        println!("  Date/Time: {}", ann.date_time);
        println!("  Fund: {} ({})", ann.fund_name, ann.fund_code);
        println!("  Subject: {}", ann.subject);
        println!("  Summary: {}", ann.summary);
        println!("  Related Stocks: {:?}", ann.related_stocks);
        println!("  Has Attachment: {} (Count: {})", ann.has_attachment, ann.attachment_count);
        println!("  Detail PDF URL: {}", ann.detail_pdf_url);
        if let Some(url) = &ann.attachment_pdf_url {
            println!("  Attachment PDF URL: {}", url);
        }
        println!();
    }

    println!("{}\nFETCHING COMPANY ANNOUNCEMENTS\n{}", rule(), rule());
    let companies = client
        .fetch_company_announcements(&CompanyQuery::between(from, to).member_type("IGS").limit(5))
        .await?;
    if companies.is_empty() {
        println!("No company announcements found");
    }
    for (idx, ann) in companies.iter().enumerate() {
        println!("Company Announcement #{}:", idx + 1);
        println!("  ID: {}", ann.announcement_id);
        println!("  Date/Time: {}", ann.date_time);
        println!("  Company: {} ({})", ann.company_name, ann.company_code);
        println!("  Subject: {}", ann.subject);
        println!("  Related Companies: {:?}", ann.related_companies);
        println!("  Detail PDF URL: {}", ann.detail_pdf_url);
        if let Some(url) = &ann.attachment_pdf_url {
            println!("  Attachment PDF URL: {}", url);
        }
        println!();
    }

    Ok(())
}
