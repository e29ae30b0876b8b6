//! No Brand Burger: single-page HTML grid. Menu labels carry heavy English
//! sub-branding, so Latin letters are stripped before matching.

use std::time::Duration;

use async_trait::async_trait;
use scraper::Html;

use chainmenu_core::{CandidateRecord, MatchRules};

use crate::util::{absolutize_url, element_attr, element_text, parse_selector};
use crate::{BrandProfile, BrandScraper, BrowserSession, Harvest, PageFetcher, ScrapeContext};

const BASE_ORIGIN: &str = "https://www.shinsegaefood.com";
const THRESHOLD: f64 = 75.0;

pub struct NoBrandScraper {
    profile: BrandProfile,
}

impl NoBrandScraper {
    pub fn new() -> Self {
        let rules = MatchRules::default()
            .with_noise_tokens(&["세트", "단품"])
            .with_strip_latin(true)
            .with_containment_min_chars(4);
        Self {
            profile: BrandProfile {
                slug: "nobrand",
                display_name: "노브랜드버거",
                base_origin: BASE_ORIGIN,
                category: "burger",
                targets: ["시그니처버거", "그릴드불고기버거", "치즈버거", "미트마니아버거"]
                    .iter()
                    .map(|s| s.to_string())
                    .collect(),
                rules,
                threshold: THRESHOLD,
                request_delay: Duration::from_millis(300),
            },
        }
    }

    fn menu_url() -> String {
        format!("{BASE_ORIGIN}/nobrandburger/menu")
    }
}

impl Default for NoBrandScraper {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BrandScraper for NoBrandScraper {
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
                harvest.push_issue(format!("nobrand menu page failed: {err}"));
                return harvest;
            }
        };

        let document = Html::parse_document(&body);
        let item_sel = match parse_selector("li.menu-item") {
            Ok(sel) => sel,
            Err(err) => {
                harvest.push_issue(format!("nobrand: {err}"));
                return harvest;
            }
        };

        for item in document.select(&item_sel) {
            let Ok(Some(name)) = element_text(&item, "p.tit") else {
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
                description: element_text(&item, "p.txt").ok().flatten(),
                nutrition: None,
            });
        }
        harvest
    }
}
