//! Mom's Touch: menu data embedded as JSON inside the HTML page.

use std::time::Duration;

use async_trait::async_trait;
use scraper::Html;
use serde::Deserialize;

use chainmenu_core::{CandidateRecord, MatchRules};

use crate::util::{absolutize_url, parse_selector, text_or_none};
use crate::{BrandProfile, BrandScraper, BrowserSession, Harvest, PageFetcher, ScrapeContext};

const BASE_ORIGIN: &str = "https://www.momstouch.co.kr";
const THRESHOLD: f64 = 65.0;

#[derive(Debug, Deserialize)]
struct EmbeddedMenuEntry {
    #[serde(default)]
    name: String,
    #[serde(default)]
    image: Option<String>,
    #[serde(default)]
    desc: Option<String>,
    #[serde(default)]
    link: Option<String>,
}

pub struct MomsTouchScraper {
    profile: BrandProfile,
}

impl MomsTouchScraper {
    pub fn new() -> Self {
        let rules = MatchRules::default()
            .with_noise_tokens(&["세트", "단품"])
            .with_containment_min_chars(3);
        Self {
            profile: BrandProfile {
                slug: "momstouch",
                display_name: "맘스터치",
                base_origin: BASE_ORIGIN,
                category: "burger",
                targets: ["싸이버거", "언빌리버블버거", "화이트갈릭버거", "인크레더블버거"]
                    .iter()
                    .map(|s| s.to_string())
                    .collect(),
                rules,
                threshold: THRESHOLD,
                request_delay: Duration::from_millis(400),
            },
        }
    }

    fn menu_url() -> String {
        format!("{BASE_ORIGIN}/menu/burger")
    }
}

impl Default for MomsTouchScraper {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BrandScraper for MomsTouchScraper {
    fn profile(&self) -> &BrandProfile {
        &self.profile
    }

    async fn collect(
        &self,
        fetch: &dyn PageFetcher,
        _browser: Option<&dyn BrowserSession>,
        _ctx: &ScrapeContext,
    ) -> Harvest {
        let mut harvest = Harvest::default();
        let url = Self::menu_url();
        let body = match fetch.fetch_text(self.profile.slug, &url).await {
            Ok(body) => body,
            Err(err) => {
                harvest.push_issue(format!("momstouch menu page failed: {err}"));
                return harvest;
            }
        };

        let embedded = {
            let document = Html::parse_document(&body);
            let script_sel = match parse_selector("script#menu-data") {
                Ok(sel) => sel,
                Err(err) => {
                    harvest.push_issue(format!("momstouch: {err}"));
                    return harvest;
                }
            };
            document
                .select(&script_sel)
                .next()
                .map(|node| node.text().collect::<String>())
        };

        let Some(raw_json) = embedded else {
            harvest.push_issue("momstouch menu page carried no embedded menu data".to_string());
            return harvest;
        };

        let entries: Vec<EmbeddedMenuEntry> = match serde_json::from_str(raw_json.trim()) {
            Ok(entries) => entries,
            Err(err) => {
                harvest.push_issue(format!("momstouch embedded menu data invalid: {err}"));
                return harvest;
            }
        };

        for entry in entries {
            let Some(name) = text_or_none(entry.name) else {
                continue;
            };
            harvest.records.push(CandidateRecord {
                name,
                image_url: entry
                    .image
                    .and_then(text_or_none)
                    .map(|p| absolutize_url(BASE_ORIGIN, &p)),
                detail_url: entry
                    .link
                    .and_then(text_or_none)
                    .map(|p| absolutize_url(BASE_ORIGIN, &p)),
                description: entry.desc.and_then(text_or_none),
                nutrition: None,
            });
        }
        harvest
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::brands::testutil::{read_fixture, test_ctx, FixtureFetcher};

    #[tokio::test]
    async fn parses_embedded_json_block() {
        let fetcher = FixtureFetcher::default()
            .with_page(&MomsTouchScraper::menu_url(), read_fixture("momstouch", "menu.html"));

        let scraper = MomsTouchScraper::new();
        let harvest = scraper.collect(&fetcher, None, &test_ctx()).await;

        assert!(harvest.issues.is_empty(), "issues: {:?}", harvest.issues);
        let cyburger = harvest
            .records
            .iter()
            .find(|r| r.name.contains("싸이"))
            .expect("싸이버거 record");
        assert!(cyburger.image_url.is_some());
    }

    #[tokio::test]
    async fn page_without_embedded_data_is_one_issue() {
        let fetcher = FixtureFetcher::default()
            .with_page(&MomsTouchScraper::menu_url(), "<html><body>renovating</body></html>".into());

        let scraper = MomsTouchScraper::new();
        let harvest = scraper.collect(&fetcher, None, &test_ctx()).await;

        assert!(harvest.records.is_empty());
        assert_eq!(harvest.issues.len(), 1);
    }
}
