//! McDonald's Korea: paginated burger list, static HTML.

use std::time::Duration;

use async_trait::async_trait;
use scraper::Html;

use chainmenu_core::{CandidateRecord, MatchRules};

use crate::util::{absolutize_url, element_attr, element_text, parse_selector};
use crate::{BrandProfile, BrandScraper, BrowserSession, Harvest, PageFetcher, ScrapeContext};

const BASE_ORIGIN: &str = "https://www.mcdonalds.co.kr";
const LIST_PAGES: usize = 3;
const THRESHOLD: f64 = 60.0;

pub struct McdonaldsScraper {
    profile: BrandProfile,
}

impl McdonaldsScraper {
    pub fn new() -> Self {
        let rules = MatchRules::default()
            // `버거` is packaging noise here: canonical targets and scraped
            // labels disagree on carrying it, so both sides drop it.
            .with_noise_tokens(&["세트", "단품", "버거"])
            .with_synonyms(&[("퀘터파운더", "쿼터파운더")])
            .with_containment_min_chars(3);
        Self {
            profile: BrandProfile {
                slug: "mcdonalds",
                display_name: "맥도날드",
                base_origin: BASE_ORIGIN,
                category: "burger",
                targets: [
                    "빅맥",
                    "맥스파이시 상하이 버거",
                    "1955 버거",
                    "맥치킨",
                    "불고기 버거",
                    "더블 쿼터파운더 치즈",
                ]
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
        format!("{BASE_ORIGIN}/kor/menu/list.do?page={page}")
    }

    fn parse_page(&self, body: &str, harvest: &mut Harvest) {
        let document = Html::parse_document(body);
        let item_sel = match parse_selector("ul.sub_contents > li") {
            Ok(sel) => sel,
            Err(err) => {
                harvest.push_issue(format!("mcdonalds: {err}"));
                return;
            }
        };

        for item in document.select(&item_sel) {
            let name = match element_text(&item, "h3.menu_tit") {
                Ok(Some(name)) => name,
                // Nameless tiles (promo banners mixed into the grid) are
                // skipped, not fatal.
                Ok(None) => continue,
                Err(err) => {
                    harvest.push_issue(format!("mcdonalds: {err}"));
                    continue;
                }
            };
            let image_url = element_attr(&item, "img", "src")
                .ok()
                .flatten()
                .map(|src| absolutize_url(BASE_ORIGIN, &src));
            let detail_url = element_attr(&item, "a", "href")
                .ok()
                .flatten()
                .map(|href| absolutize_url(BASE_ORIGIN, &href));
            let description = element_text(&item, "p.menu_desc").ok().flatten();

            harvest.records.push(CandidateRecord {
                name,
                image_url,
                detail_url,
                description,
                nutrition: None,
            });
        }
    }
}

impl Default for McdonaldsScraper {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BrandScraper for McdonaldsScraper {
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
        for page in 1..=LIST_PAGES {
            let url = Self::page_url(page);
            match fetch.fetch_text(self.profile.slug, &url).await {
                Ok(body) => self.parse_page(&body, &mut harvest),
                Err(err) => harvest.push_issue(format!("mcdonalds page {page} failed: {err}")),
            }
        }
        harvest
    }
}
