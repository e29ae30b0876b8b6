//! KFC Korea: paginated HTML menu list.

use std::time::Duration;

use async_trait::async_trait;
use scraper::Html;

use chainmenu_core::{CandidateRecord, MatchRules};

use crate::util::{absolutize_url, element_attr, element_text, parse_selector};
use crate::{BrandProfile, BrandScraper, BrowserSession, Harvest, PageFetcher, ScrapeContext};

const BASE_ORIGIN: &str = "https://www.kfckorea.com";
const LIST_PAGES: usize = 2;
const THRESHOLD: f64 = 70.0;

pub struct KfcScraper {
    profile: BrandProfile,
}

impl KfcScraper {
    pub fn new() -> Self {
        let rules = MatchRules::default()
            .with_noise_tokens(&["세트", "단품", "콤보", "박스"])
            .with_synonyms(&[("커널", "커넬")])
            .with_containment_min_chars(4);
        Self {
            profile: BrandProfile {
                slug: "kfc",
                display_name: "KFC",
                base_origin: BASE_ORIGIN,
                category: "chicken",
                targets: ["징거버거", "타워버거", "핫크리스피치킨", "커넬오리지널치킨"]
                    .iter()
                    .map(|s| s.to_string())
                    .collect(),
                rules,
                threshold: THRESHOLD,
                request_delay: Duration::from_millis(500),
            },
        }
    }

    fn page_url(page: usize) -> String {
        format!("{BASE_ORIGIN}/kor/menu?page={page}")
    }
}

impl Default for KfcScraper {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BrandScraper for KfcScraper {
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
        let item_sel = match parse_selector("ul.menu_items > li") {
            Ok(sel) => sel,
            Err(err) => {
                harvest.push_issue(format!("kfc: {err}"));
                return harvest;
            }
        };

        for page in 1..=LIST_PAGES {
            let url = Self::page_url(page);
            let body = match fetch.fetch_text(self.profile.slug, &url).await {
                Ok(body) => body,
                Err(err) => {
                    harvest.push_issue(format!("kfc page {page} failed: {err}"));
                    continue;
                }
            };

            let document = Html::parse_document(&body);
            for item in document.select(&item_sel) {
                let Ok(Some(name)) = element_text(&item, "span.name") else {
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
                    description: element_text(&item, "p.desc").ok().flatten(),
                    nutrition: None,
                });
            }
        }
        harvest
    }
}
