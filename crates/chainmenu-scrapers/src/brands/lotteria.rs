//! Lotteria: single-page HTML menu grid.

use std::time::Duration;

use async_trait::async_trait;
use scraper::Html;

use chainmenu_core::{CandidateRecord, MatchRules};

use crate::util::{absolutize_url, element_attr, element_text, parse_selector};
use crate::{BrandProfile, BrandScraper, BrowserSession, Harvest, PageFetcher, ScrapeContext};

const BASE_ORIGIN: &str = "https://www.lotteria.com";
const THRESHOLD: f64 = 65.0;

pub struct LotteriaScraper {
    profile: BrandProfile,
}

impl LotteriaScraper {
    pub fn new() -> Self {
        let rules = MatchRules::default()
            .with_noise_tokens(&["세트", "단품", "팩"])
            .with_synonyms(&[("데리야끼", "데리")])
            .with_containment_min_chars(3);
        Self {
            profile: BrandProfile {
                slug: "lotteria",
                display_name: "롯데리아",
                base_origin: BASE_ORIGIN,
                category: "burger",
                targets: ["불고기버거", "새우버거", "한우불고기버거", "치킨버거", "데리버거"]
                    .iter()
                    .map(|s| s.to_string())
                    .collect(),
                rules,
                threshold: THRESHOLD,
                request_delay: Duration::from_millis(600),
            },
        }
    }

    fn menu_url() -> String {
        format!("{BASE_ORIGIN}/menu/list?category=burger")
    }
}

impl Default for LotteriaScraper {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BrandScraper for LotteriaScraper {
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
                harvest.push_issue(format!("lotteria menu page failed: {err}"));
                return harvest;
            }
        };

        let document = Html::parse_document(&body);
        let item_sel = match parse_selector("div.menu_list ul > li") {
            Ok(sel) => sel,
            Err(err) => {
                harvest.push_issue(format!("lotteria: {err}"));
                return harvest;
            }
        };

        for item in document.select(&item_sel) {
            let Ok(Some(name)) = element_text(&item, "strong.menu_name") else {
                continue;
            };
            harvest.records.push(CandidateRecord {
                name,
                image_url: element_attr(&item, "img", "src")
                    .ok()
                    .flatten()
                    .map(|src| absolutize_url(BASE_ORIGIN, &src)),
                detail_url: element_attr(&item, "a", "href")
                    .ok()
                    .flatten()
                    .map(|href| absolutize_url(BASE_ORIGIN, &href)),
                description: element_text(&item, "p.menu_desc").ok().flatten(),
                nutrition: None,
            });
        }
        harvest
    }
}
