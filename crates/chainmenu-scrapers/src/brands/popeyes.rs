//! Popeyes Korea: static menu grid, nutrition hidden behind an in-page
//! modal that only renders in a real browser. Without a session the run
//! still harvests names and images and leans on the static table for
//! nutrition.

use std::time::Duration;

use async_trait::async_trait;
use scraper::Html;

use chainmenu_core::{CandidateRecord, MatchRules, NutritionFacts};

use crate::util::{absolutize_url, element_attr, element_text, parse_nutrition_cell, parse_selector};
use crate::{
    BrandProfile, BrandScraper, BrowserSession, Harvest, ModalFlow, PageFetcher, ScrapeContext,
};

const BASE_ORIGIN: &str = "https://www.popeyes.co.kr";
const THRESHOLD: f64 = 60.0;

pub struct PopeyesScraper {
    profile: BrandProfile,
    modal_flow: ModalFlow,
}

impl PopeyesScraper {
    pub fn new() -> Self {
        let rules = MatchRules::default()
            .with_noise_tokens(&["세트", "단품", "콤보"])
            .with_containment_min_chars(3);
        Self {
            profile: BrandProfile {
                slug: "popeyes",
                display_name: "파파이스",
                base_origin: BASE_ORIGIN,
                category: "chicken",
                targets: ["클래식치킨버거", "치킨샌드위치", "비스킷", "케이준후라이"]
                    .iter()
                    .map(|s| s.to_string())
                    .collect(),
                rules,
                threshold: THRESHOLD,
                request_delay: Duration::from_millis(1000),
            },
            modal_flow: ModalFlow::new(
                "button.btn-nutrition",
                "div.modal-nutrition",
                "div.modal-nutrition table",
            ),
        }
    }

    fn menu_url() -> String {
        format!("{BASE_ORIGIN}/menu/chicken")
    }

    /// Pull labeled measures out of the modal's flattened table text,
    /// e.g. `열량 331kcal 단백질 16g 포화지방 6g 나트륨 680mg 당류 4g`.
    fn parse_modal_nutrition(text: &str) -> NutritionFacts {
        let tokens: Vec<&str> = text.split_whitespace().collect();
        let value_after = |label: &str| -> Option<f64> {
            tokens
                .iter()
                .position(|t| *t == label)
                .and_then(|i| tokens.get(i + 1))
                .and_then(|t| parse_nutrition_cell(t))
        };
        NutritionFacts {
            kcal: value_after("열량"),
            protein: value_after("단백질"),
            saturated_fat: value_after("포화지방"),
            sodium: value_after("나트륨"),
            sugar: value_after("당류"),
        }
    }
}

impl Default for PopeyesScraper {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BrandScraper for PopeyesScraper {
    fn profile(&self) -> &BrandProfile {
        &self.profile
    }

    async fn collect(
        &self,
        fetch: &dyn PageFetcher,
        browser: Option<&dyn BrowserSession>,
        _ctx: &ScrapeContext,
    ) -> Harvest {
        let mut harvest = Harvest::default();
        let url = Self::menu_url();
        let body = match fetch.fetch_text(self.profile.slug, &url).await {
            Ok(body) => body,
            Err(err) => {
                harvest.push_issue(format!("popeyes menu page failed: {err}"));
                return harvest;
            }
        };

        {
            let document = Html::parse_document(&body);
            let item_sel = match parse_selector("ul.menu_list > li") {
                Ok(sel) => sel,
                Err(err) => {
                    harvest.push_issue(format!("popeyes: {err}"));
                    return harvest;
                }
            };

            for item in document.select(&item_sel) {
                let Ok(Some(name)) = element_text(&item, "span.menu_name") else {
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
                    description: None,
                    nutrition: None,
                });
            }
        }

        // Nutrition lives behind a JS modal. A timeout on one detail page
        // degrades that record to table-supplied nutrition, nothing more.
        if let Some(session) = browser {
            for record in &mut harvest.records {
                let Some(detail_url) = record.detail_url.clone() else {
                    continue;
                };
                match self.modal_flow.run(session, &detail_url).await {
                    Ok(text) => {
                        let facts = Self::parse_modal_nutrition(&text);
                        if !facts.is_empty() {
                            record.nutrition = Some(facts);
                        }
                    }
                    Err(err) => {
                        harvest
                            .issues
                            .push(format!("popeyes nutrition modal for {}: {err}", record.name));
                    }
                }
            }
        }

        harvest
    }
}
