//! Burger King Korea: JSON menu API.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;

use chainmenu_core::{CandidateRecord, MatchRules, QualifierRule};

use crate::util::{absolutize_url, text_or_none};
use crate::{BrandProfile, BrandScraper, BrowserSession, Harvest, PageFetcher, ScrapeContext};

const BASE_ORIGIN: &str = "https://www.burgerking.co.kr";
const THRESHOLD: f64 = 70.0;

#[derive(Debug, Deserialize)]
struct MenuListResponse {
    #[serde(rename = "menuList", default)]
    menu_list: Vec<MenuEntry>,
}

#[derive(Debug, Deserialize)]
struct MenuEntry {
    #[serde(rename = "menuNm", default)]
    menu_nm: String,
    #[serde(rename = "imgPath", default)]
    img_path: Option<String>,
    #[serde(rename = "menuDesc", default)]
    menu_desc: Option<String>,
    #[serde(rename = "linkUrl", default)]
    link_url: Option<String>,
}

pub struct BurgerKingScraper {
    profile: BrandProfile,
}

impl BurgerKingScraper {
    pub fn new() -> Self {
        let rules = MatchRules::default()
            .with_noise_tokens(&["라지세트", "세트", "단품"])
            .with_synonyms(&[("쥬니어", "주니어")])
            .with_containment_min_chars(4)
            .with_qualifiers(vec![QualifierRule::new(
                "junior",
                &["주니어", "쥬니어", "jr"],
            )]);
        Self {
            profile: BrandProfile {
                slug: "burgerking",
                display_name: "버거킹",
                base_origin: BASE_ORIGIN,
                category: "burger",
                targets: ["와퍼", "와퍼주니어", "치즈와퍼", "불고기와퍼", "콰트로치즈와퍼"]
                    .iter()
                    .map(|s| s.to_string())
                    .collect(),
                rules,
                threshold: THRESHOLD,
                request_delay: Duration::from_millis(400),
            },
        }
    }

    fn menu_api_url() -> String {
        format!("{BASE_ORIGIN}/api/menu/list?category=burger")
    }
}

impl Default for BurgerKingScraper {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BrandScraper for BurgerKingScraper {
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
        let url = Self::menu_api_url();
        let body = match fetch.fetch_text(self.profile.slug, &url).await {
            Ok(body) => body,
            Err(err) => {
                harvest.push_issue(format!("burgerking menu api failed: {err}"));
                return harvest;
            }
        };

        let parsed: MenuListResponse = match serde_json::from_str(&body) {
            Ok(parsed) => parsed,
            Err(err) => {
                harvest.push_issue(format!("burgerking menu api returned invalid JSON: {err}"));
                return harvest;
            }
        };

        for entry in parsed.menu_list {
            let Some(name) = text_or_none(entry.menu_nm) else {
                continue;
            };
            harvest.records.push(CandidateRecord {
                name,
                image_url: entry
                    .img_path
                    .and_then(text_or_none)
                    .map(|p| absolutize_url(BASE_ORIGIN, &p)),
                detail_url: entry
                    .link_url
                    .and_then(text_or_none)
                    .map(|p| absolutize_url(BASE_ORIGIN, &p)),
                description: entry.menu_desc.and_then(text_or_none),
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
    async fn parses_menu_api_payload() {
        let fetcher = FixtureFetcher::default().with_page(
            &BurgerKingScraper::menu_api_url(),
            read_fixture("burgerking", "menu.json"),
        );

        let scraper = BurgerKingScraper::new();
        let harvest = scraper.collect(&fetcher, None, &test_ctx()).await;

        assert!(harvest.issues.is_empty());
        let whopper = harvest
            .records
            .iter()
            .find(|r| r.name == "와퍼 세트")
            .expect("와퍼 record");
        assert_eq!(
            whopper.image_url.as_deref(),
            Some("https://www.burgerking.co.kr/upload/menu/whopper.png")
        );
    }

    #[tokio::test]
    async fn invalid_json_becomes_single_issue() {
        let fetcher = FixtureFetcher::default()
            .with_page(&BurgerKingScraper::menu_api_url(), "<html>not json</html>".into());

        let scraper = BurgerKingScraper::new();
        let harvest = scraper.collect(&fetcher, None, &test_ctx()).await;

        assert!(harvest.records.is_empty());
        assert_eq!(harvest.issues.len(), 1);
        assert!(harvest.issues[0].contains("invalid JSON"));
    }
}
