//! The reconciliation driver: harvest, match, upsert, log.

use std::collections::HashMap;
use std::sync::Arc;

use thiserror::Error;
use tracing::{info, warn};

use chainmenu_core::{
    Brand, CandidateRecord, IngestSummary, MenuItem, MenuItemPatch, NewIngestLog, NewMenuItem,
    NutritionFacts,
};
use chainmenu_scrapers::{
    scraper_for_brand, tables::load_nutrition_table, BrandProfile, BrandScraper, BrowserProvider,
    BrowserSession, ScrapeContext, ThrottledPageFetcher,
};
use chainmenu_storage::db::{MenuStore, StoreError};
use chainmenu_storage::{BackoffPolicy, HttpClientConfig, HttpFetcher, PageArchive};

use crate::config::AppConfig;
use crate::matcher::{assign, MatchOutcome};

/// Only the first N error messages travel in payloads and the log row.
const ERROR_DETAIL_LIMIT: usize = 10;

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("unknown brand `{0}`")]
    BrandNotFound(String),
    #[error("no scraper registered for brand `{0}`")]
    ScraperUnavailable(String),
    #[error(transparent)]
    Store(#[from] StoreError),
}

enum UpsertKind {
    Created,
    Updated,
}

/// Drives one reconciliation run per brand: collect the harvest, assign
/// candidates to the canonical targets, merge accepted matches into the
/// store, and append exactly one ingest log row.
///
/// Precondition failures (unknown brand, unregistered scraper) are fatal and
/// write nothing. Everything downstream of the harvest is recovered per
/// target: the loop continues and the failure lands in the error counter.
pub struct IngestRunner {
    config: AppConfig,
    store: Arc<dyn MenuStore>,
    http: Arc<HttpFetcher>,
    archive: Option<PageArchive>,
    browser: Option<Arc<dyn BrowserProvider>>,
}

impl IngestRunner {
    pub fn from_config(config: AppConfig, store: Arc<dyn MenuStore>) -> anyhow::Result<Self> {
        let http = HttpFetcher::new(HttpClientConfig {
            timeout: config.http_timeout(),
            user_agent: Some(config.user_agent.clone()),
            backoff: BackoffPolicy::default(),
        })?;
        let archive = config.archive_dir.clone().map(PageArchive::new);
        Ok(Self {
            config,
            store,
            http: Arc::new(http),
            archive,
            browser: None,
        })
    }

    pub fn with_browser_provider(mut self, provider: Arc<dyn BrowserProvider>) -> Self {
        self.browser = Some(provider);
        self
    }

    pub fn store(&self) -> &Arc<dyn MenuStore> {
        &self.store
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Run reconciliation for one brand slug.
    pub async fn run_brand(&self, slug: &str) -> Result<IngestSummary, IngestError> {
        let brand = self
            .store
            .brand_by_slug(slug)
            .await?
            .ok_or_else(|| IngestError::BrandNotFound(slug.to_string()))?;
        let scraper = scraper_for_brand(slug)
            .ok_or_else(|| IngestError::ScraperUnavailable(slug.to_string()))?;
        self.run_for_brand(&brand, scraper.as_ref()).await
    }

    /// Run reconciliation for every seeded brand, sequentially. One brand's
    /// failure never stops the next.
    pub async fn run_all(&self) -> Result<Vec<(String, Result<IngestSummary, IngestError>)>, IngestError> {
        let brands = self.store.all_brands().await?;
        let mut results = Vec::with_capacity(brands.len());
        for brand in brands {
            let result = self.run_brand(&brand.slug).await;
            if let Err(err) = &result {
                warn!(brand = %brand.slug, error = %err, "brand ingest failed");
            }
            results.push((brand.slug, result));
        }
        Ok(results)
    }

    /// Reconcile one brand against an already-resolved scraper. Public so
    /// driver tests can script a scraper without touching the registry.
    pub async fn run_for_brand(
        &self,
        brand: &Brand,
        scraper: &dyn BrandScraper,
    ) -> Result<IngestSummary, IngestError> {
        let profile = scraper.profile();
        let ctx = ScrapeContext::new(self.config.workspace_root.clone());
        let fetch = ThrottledPageFetcher::new(
            self.http.clone(),
            profile.request_delay,
            self.archive.clone(),
        );

        let session = self.open_session(profile).await;
        let harvest = scraper.collect(&fetch, session.as_deref(), &ctx).await;
        if let Some(session) = &session {
            if let Err(err) = session.close().await {
                warn!(brand = %profile.slug, error = %err, "closing browser session failed");
            }
        }

        let mut error_details: Vec<String> = harvest.issues;

        let table = match load_nutrition_table(&self.config.workspace_root, profile.slug) {
            Ok(table) => table,
            Err(err) => {
                error_details.push(format!("static nutrition table unreadable: {err:#}"));
                HashMap::new()
            }
        };

        let matches = assign(
            &profile.rules,
            profile.threshold,
            &profile.targets,
            &harvest.records,
        );

        let mut created = 0usize;
        let mut updated = 0usize;
        for target_match in &matches {
            match &target_match.outcome {
                MatchOutcome::Matched { candidate, score } => {
                    match self
                        .upsert_target(brand, profile, &target_match.target, candidate, &table)
                        .await
                    {
                        Ok(UpsertKind::Created) => created += 1,
                        Ok(UpsertKind::Updated) => updated += 1,
                        Err(err) => {
                            error_details.push(format!(
                                "upsert failed for `{}` (score {score:.1}): {err}",
                                target_match.target
                            ));
                        }
                    }
                }
                MatchOutcome::Unmatched { best_rejected } => {
                    let detail = match best_rejected {
                        Some((name, score)) => format!(
                            "no candidate matched `{}`; best was `{name}` at {score:.1}",
                            target_match.target
                        ),
                        None => format!(
                            "no candidate matched `{}`; nothing scored",
                            target_match.target
                        ),
                    };
                    error_details.push(detail);
                }
            }
        }

        let errors = error_details.len();
        error_details.truncate(ERROR_DETAIL_LIMIT);
        let summary = IngestSummary {
            brand: profile.slug.to_string(),
            total: profile.targets.len(),
            created,
            updated,
            errors,
            error_details,
        };

        let error_json = if summary.error_details.is_empty() {
            None
        } else {
            serde_json::to_string(&summary.error_details).ok()
        };
        self.store
            .append_ingest_log(&NewIngestLog {
                brand_id: brand.id,
                status: summary.status(),
                changed_count: summary.changed_count(),
                error: error_json,
                fetched_at: ctx.fetched_at,
            })
            .await?;

        info!(
            brand = %summary.brand,
            status = summary.status().as_str(),
            total = summary.total,
            created = summary.created,
            updated = summary.updated,
            errors = summary.errors,
            "ingest run finished"
        );
        Ok(summary)
    }

    /// A failed session open degrades the run to static nutrition tables
    /// instead of failing it.
    async fn open_session(&self, profile: &BrandProfile) -> Option<Box<dyn BrowserSession>> {
        let provider = self.browser.as_ref()?;
        match provider.open().await {
            Ok(session) => Some(session),
            Err(err) => {
                warn!(brand = %profile.slug, error = %err, "browser session unavailable");
                None
            }
        }
    }

    async fn upsert_target(
        &self,
        brand: &Brand,
        profile: &BrandProfile,
        target: &str,
        candidate: &CandidateRecord,
        table: &HashMap<String, NutritionFacts>,
    ) -> Result<UpsertKind, StoreError> {
        let existing = self.store.menu_item_by_name(brand.id, target).await?;
        let (item, kind) = match existing {
            Some(item) => {
                let patch = MenuItemPatch {
                    image_url: candidate.image_url.clone(),
                    detail_url: candidate.detail_url.clone(),
                    description: candidate.description.clone(),
                };
                if !patch.is_empty() {
                    self.store.update_menu_item(item.id, &patch).await?;
                }
                info!(brand = %profile.slug, name = %target, "menu item updated");
                (item, UpsertKind::Updated)
            }
            None => {
                let item = self
                    .store
                    .insert_menu_item(&NewMenuItem {
                        brand_id: brand.id,
                        name: target.to_string(),
                        category: profile.category.to_string(),
                        image_url: candidate.image_url.clone(),
                        detail_url: candidate.detail_url.clone(),
                        description: candidate.description.clone(),
                        is_active: true,
                    })
                    .await?;
                info!(brand = %profile.slug, name = %target, "menu item created");
                (item, UpsertKind::Created)
            }
        };

        if let Some(incoming) = incoming_nutrition(candidate, table.get(target)) {
            self.put_merged_nutrition(&item, &incoming).await?;
        }
        Ok(kind)
    }

    async fn put_merged_nutrition(
        &self,
        item: &MenuItem,
        incoming: &NutritionFacts,
    ) -> Result<(), StoreError> {
        let stored = self
            .store
            .nutrition_for(item.id)
            .await?
            .unwrap_or_default();
        let merged = stored.merged_with(incoming);
        self.store.put_nutrition(item.id, &merged).await
    }
}

/// Pick the nutrition hint for a matched target. Live-scraped values win
/// field by field over the static table.
fn incoming_nutrition(
    candidate: &CandidateRecord,
    table_entry: Option<&NutritionFacts>,
) -> Option<NutritionFacts> {
    let combined = match (&candidate.nutrition, table_entry) {
        (Some(scraped), Some(table)) => table.merged_with(scraped),
        (Some(scraped), None) => *scraped,
        (None, Some(table)) => *table,
        (None, None) => return None,
    };
    if combined.is_empty() {
        None
    } else {
        Some(combined)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;
    use std::path::{Path, PathBuf};
    use std::sync::Mutex;
    use std::time::Duration;

    use async_trait::async_trait;
    use chrono::Utc;
    use uuid::Uuid;

    use chainmenu_core::{IngestLog, IngestStatus, MatchRules, MenuItem, QualifierRule};
    use chainmenu_scrapers::{Harvest, PageFetcher};

    struct InMemoryStore {
        brands: Vec<Brand>,
        items: Mutex<Vec<MenuItem>>,
        nutrition: Mutex<HashMap<Uuid, NutritionFacts>>,
        logs: Mutex<Vec<IngestLog>>,
    }

    impl InMemoryStore {
        fn with_brand(slug: &str) -> (Arc<Self>, Brand) {
            let brand = Brand {
                id: Uuid::new_v4(),
                slug: slug.to_string(),
                name: slug.to_string(),
                logo_url: None,
                created_at: Utc::now(),
            };
            let store = Arc::new(Self {
                brands: vec![brand.clone()],
                items: Mutex::new(Vec::new()),
                nutrition: Mutex::new(HashMap::new()),
                logs: Mutex::new(Vec::new()),
            });
            (store, brand)
        }

        fn items(&self) -> Vec<MenuItem> {
            self.items.lock().unwrap().clone()
        }

        fn logs(&self) -> Vec<IngestLog> {
            self.logs.lock().unwrap().clone()
        }

        fn nutrition_of(&self, menu_item_id: Uuid) -> Option<NutritionFacts> {
            self.nutrition.lock().unwrap().get(&menu_item_id).copied()
        }
    }

    #[async_trait]
    impl MenuStore for InMemoryStore {
        async fn brand_by_slug(&self, slug: &str) -> Result<Option<Brand>, StoreError> {
            Ok(self.brands.iter().find(|b| b.slug == slug).cloned())
        }

        async fn all_brands(&self) -> Result<Vec<Brand>, StoreError> {
            Ok(self.brands.clone())
        }

        async fn menu_item_by_name(
            &self,
            brand_id: Uuid,
            name: &str,
        ) -> Result<Option<MenuItem>, StoreError> {
            Ok(self
                .items
                .lock()
                .unwrap()
                .iter()
                .find(|i| i.brand_id == brand_id && i.name == name)
                .cloned())
        }

        async fn insert_menu_item(&self, item: &NewMenuItem) -> Result<MenuItem, StoreError> {
            let now = Utc::now();
            let stored = MenuItem {
                id: Uuid::new_v4(),
                brand_id: item.brand_id,
                name: item.name.clone(),
                category: item.category.clone(),
                image_url: item.image_url.clone(),
                detail_url: item.detail_url.clone(),
                description: item.description.clone(),
                is_active: item.is_active,
                created_at: now,
                updated_at: now,
            };
            self.items.lock().unwrap().push(stored.clone());
            Ok(stored)
        }

        async fn update_menu_item(
            &self,
            id: Uuid,
            patch: &MenuItemPatch,
        ) -> Result<(), StoreError> {
            let mut items = self.items.lock().unwrap();
            if let Some(item) = items.iter_mut().find(|i| i.id == id) {
                if let Some(image_url) = &patch.image_url {
                    item.image_url = Some(image_url.clone());
                }
                if let Some(detail_url) = &patch.detail_url {
                    item.detail_url = Some(detail_url.clone());
                }
                if let Some(description) = &patch.description {
                    item.description = Some(description.clone());
                }
                item.updated_at = Utc::now();
            }
            Ok(())
        }

        async fn nutrition_for(
            &self,
            menu_item_id: Uuid,
        ) -> Result<Option<NutritionFacts>, StoreError> {
            Ok(self.nutrition.lock().unwrap().get(&menu_item_id).copied())
        }

        async fn put_nutrition(
            &self,
            menu_item_id: Uuid,
            facts: &NutritionFacts,
        ) -> Result<(), StoreError> {
            self.nutrition.lock().unwrap().insert(menu_item_id, *facts);
            Ok(())
        }

        async fn append_ingest_log(&self, log: &NewIngestLog) -> Result<(), StoreError> {
            self.logs.lock().unwrap().push(IngestLog {
                id: Uuid::new_v4(),
                brand_id: log.brand_id,
                status: log.status,
                changed_count: log.changed_count,
                error: log.error.clone(),
                fetched_at: log.fetched_at,
            });
            Ok(())
        }

        async fn recent_ingest_logs(
            &self,
            brand_id: Uuid,
            limit: i64,
        ) -> Result<Vec<IngestLog>, StoreError> {
            let mut logs: Vec<IngestLog> = self
                .logs
                .lock()
                .unwrap()
                .iter()
                .filter(|l| l.brand_id == brand_id)
                .cloned()
                .collect();
            logs.sort_by(|a, b| b.fetched_at.cmp(&a.fetched_at));
            logs.truncate(limit as usize);
            Ok(logs)
        }
    }

    /// Scripted scraper: each call to `collect` pops the next planned run.
    struct FakeScraper {
        profile: BrandProfile,
        runs: Mutex<VecDeque<(Vec<CandidateRecord>, Vec<String>)>>,
    }

    impl FakeScraper {
        fn new(profile: BrandProfile) -> Self {
            Self {
                profile,
                runs: Mutex::new(VecDeque::new()),
            }
        }

        fn with_run(self, records: Vec<CandidateRecord>, issues: Vec<String>) -> Self {
            self.runs.lock().unwrap().push_back((records, issues));
            self
        }
    }

    #[async_trait]
    impl BrandScraper for FakeScraper {
        fn profile(&self) -> &BrandProfile {
            &self.profile
        }

        async fn collect(
            &self,
            _fetch: &dyn PageFetcher,
            _browser: Option<&dyn BrowserSession>,
            _ctx: &ScrapeContext,
        ) -> Harvest {
            let (records, issues) = self
                .runs
                .lock()
                .unwrap()
                .pop_front()
                .expect("scripted run available");
            Harvest { records, issues }
        }
    }

    fn workspace_root() -> PathBuf {
        Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("../..")
            .canonicalize()
            .expect("workspace root")
    }

    fn test_config() -> AppConfig {
        AppConfig {
            database_url: String::new(),
            admin_token: String::new(),
            user_agent: "test-agent".to_string(),
            http_timeout_secs: 5,
            workspace_root: workspace_root(),
            archive_dir: None,
            scheduler_enabled: false,
            ingest_cron: "0 0 5 * * *".to_string(),
            web_port: 0,
        }
    }

    fn test_profile(slug: &'static str, targets: &[&str], rules: MatchRules) -> BrandProfile {
        BrandProfile {
            slug,
            display_name: slug,
            base_origin: "https://example.test",
            category: "burger",
            targets: targets.iter().map(|t| t.to_string()).collect(),
            rules,
            threshold: 60.0,
            request_delay: Duration::from_millis(1),
        }
    }

    fn runner(store: Arc<InMemoryStore>) -> IngestRunner {
        IngestRunner::from_config(test_config(), store).expect("runner")
    }

    fn with_image(name: &str, image: &str) -> CandidateRecord {
        CandidateRecord {
            image_url: Some(image.to_string()),
            ..CandidateRecord::named(name)
        }
    }

    #[tokio::test]
    async fn normalized_match_creates_item_with_scraped_fields() {
        let (store, brand) = InMemoryStore::with_brand("testbrand");
        let rules = MatchRules::default().with_noise_tokens(&["세트", "단품", "버거"]);
        let scraper = FakeScraper::new(test_profile("testbrand", &["빅맥"], rules)).with_run(
            vec![with_image("빅맥버거 세트", "https://cdn.example.test/bigmac.png")],
            vec![],
        );

        let summary = runner(store.clone())
            .run_for_brand(&brand, &scraper)
            .await
            .expect("run");

        assert_eq!(summary.created, 1);
        assert_eq!(summary.updated, 0);
        assert_eq!(summary.errors, 0);

        let items = store.items();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].name, "빅맥");
        assert!(items[0].is_active);
        assert_eq!(
            items[0].image_url.as_deref(),
            Some("https://cdn.example.test/bigmac.png")
        );

        let logs = store.logs();
        assert_eq!(logs.len(), 1);
        assert_eq!(logs[0].status, IngestStatus::Success);
        assert_eq!(logs[0].changed_count, 1);
        assert!(logs[0].error.is_none());
    }

    #[tokio::test]
    async fn junior_variant_never_binds_to_the_base_item() {
        let (store, brand) = InMemoryStore::with_brand("testbrand");
        let rules = MatchRules::default().with_qualifiers(vec![QualifierRule::new(
            "junior",
            &["주니어", "쥬니어", "jr"],
        )]);
        let scraper = FakeScraper::new(test_profile("testbrand", &["와퍼주니어"], rules))
            .with_run(vec![CandidateRecord::named("와퍼")], vec![]);

        let summary = runner(store.clone())
            .run_for_brand(&brand, &scraper)
            .await
            .expect("run");

        assert_eq!(summary.created, 0);
        assert_eq!(summary.errors, 1);
        assert!(summary.error_details[0].contains("와퍼주니어"));
        assert!(store.items().is_empty());

        let logs = store.logs();
        assert_eq!(logs[0].status, IngestStatus::Error);
        assert_eq!(logs[0].changed_count, 0);
        let detail_json = logs[0].error.as_deref().expect("error details json");
        assert!(detail_json.starts_with('['));
    }

    #[tokio::test]
    async fn second_run_updates_in_place_and_keeps_one_row() {
        let (store, brand) = InMemoryStore::with_brand("testbrand");
        let rules = MatchRules::default().with_noise_tokens(&["세트"]);
        let scraper = FakeScraper::new(test_profile("testbrand", &["빅맥"], rules))
            .with_run(vec![with_image("빅맥 세트", "a.png")], vec![])
            .with_run(vec![with_image("빅맥 세트", "b.png")], vec![]);

        let runner = runner(store.clone());
        let first = runner.run_for_brand(&brand, &scraper).await.expect("run 1");
        let second = runner.run_for_brand(&brand, &scraper).await.expect("run 2");

        assert_eq!(first.created, 1);
        assert_eq!(second.created, 0);
        assert_eq!(second.updated, 1);

        let items = store.items();
        assert_eq!(items.len(), 1, "one row per (brand, name)");
        assert_eq!(items[0].image_url.as_deref(), Some("b.png"));
        assert_eq!(store.logs().len(), 2);
    }

    #[tokio::test]
    async fn rematch_without_scraped_fields_keeps_stored_values() {
        let (store, brand) = InMemoryStore::with_brand("testbrand");
        let rules = MatchRules::default().with_noise_tokens(&["세트"]);
        // Second run re-matches the item but the listing carries no image.
        let scraper = FakeScraper::new(test_profile("testbrand", &["빅맥"], rules))
            .with_run(vec![with_image("빅맥 세트", "a.png")], vec![])
            .with_run(vec![CandidateRecord::named("빅맥 세트")], vec![]);

        let runner = runner(store.clone());
        runner.run_for_brand(&brand, &scraper).await.expect("run 1");
        let second = runner.run_for_brand(&brand, &scraper).await.expect("run 2");

        assert_eq!(second.updated, 1);
        let items = store.items();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].image_url.as_deref(), Some("a.png"));
    }

    #[tokio::test]
    async fn page_failure_degrades_to_partial_not_abort() {
        let (store, brand) = InMemoryStore::with_brand("testbrand");
        let scraper = FakeScraper::new(test_profile(
            "testbrand",
            &["빅맥"],
            MatchRules::default(),
        ))
        .with_run(
            vec![CandidateRecord::named("빅맥")],
            vec!["page 2: request timed out".to_string()],
        );

        let summary = runner(store.clone())
            .run_for_brand(&brand, &scraper)
            .await
            .expect("run");

        assert_eq!(summary.created, 1);
        assert_eq!(summary.errors, 1);
        assert_eq!(summary.status(), IngestStatus::Partial);
        assert_eq!(store.logs()[0].status, IngestStatus::Partial);
    }

    #[tokio::test]
    async fn static_table_fills_nutrition_when_scrape_has_none() {
        let (store, brand) = InMemoryStore::with_brand("burgerking");
        let rules = MatchRules::default().with_noise_tokens(&["세트"]);
        let scraper = FakeScraper::new(test_profile("burgerking", &["와퍼"], rules))
            .with_run(vec![CandidateRecord::named("와퍼 세트")], vec![]);

        runner(store.clone())
            .run_for_brand(&brand, &scraper)
            .await
            .expect("run");

        let item = &store.items()[0];
        let facts = store.nutrition_of(item.id).expect("nutrition row");
        assert_eq!(facts.kcal, Some(594.0));
        assert_eq!(facts.protein, Some(28.0));
        assert_eq!(facts.saturated_fat, None);
        assert_eq!(facts.sodium, None);
        assert_eq!(facts.sugar, None);
    }

    #[tokio::test]
    async fn nutrition_merge_never_nulls_a_stored_measure() {
        let (store, brand) = InMemoryStore::with_brand("testbrand");
        let first = CandidateRecord {
            nutrition: Some(NutritionFacts {
                kcal: Some(500.0),
                sugar: Some(7.0),
                ..NutritionFacts::default()
            }),
            ..CandidateRecord::named("빅맥")
        };
        let second = CandidateRecord {
            nutrition: Some(NutritionFacts {
                kcal: Some(601.0),
                ..NutritionFacts::default()
            }),
            ..CandidateRecord::named("빅맥")
        };
        let scraper = FakeScraper::new(test_profile(
            "testbrand",
            &["빅맥"],
            MatchRules::default(),
        ))
        .with_run(vec![first], vec![])
        .with_run(vec![second], vec![]);

        let runner = runner(store.clone());
        runner.run_for_brand(&brand, &scraper).await.expect("run 1");
        runner.run_for_brand(&brand, &scraper).await.expect("run 2");

        let item = &store.items()[0];
        let facts = store.nutrition_of(item.id).expect("nutrition row");
        assert_eq!(facts.kcal, Some(601.0));
        assert_eq!(facts.sugar, Some(7.0));
    }

    #[tokio::test]
    async fn unknown_brand_is_fatal_and_writes_nothing() {
        let (store, _brand) = InMemoryStore::with_brand("testbrand");
        let err = runner(store.clone())
            .run_brand("subway")
            .await
            .expect_err("unknown brand");
        assert!(matches!(err, IngestError::BrandNotFound(_)));
        assert!(store.logs().is_empty());
    }

    #[tokio::test]
    async fn seeded_brand_without_scraper_is_fatal() {
        let (store, _brand) = InMemoryStore::with_brand("testbrand");
        let err = runner(store.clone())
            .run_brand("testbrand")
            .await
            .expect_err("no scraper");
        assert!(matches!(err, IngestError::ScraperUnavailable(_)));
        assert!(store.logs().is_empty());
    }

    #[test]
    fn scraped_nutrition_wins_over_the_table_field_by_field() {
        let candidate = CandidateRecord {
            nutrition: Some(NutritionFacts {
                kcal: Some(610.0),
                ..NutritionFacts::default()
            }),
            ..CandidateRecord::named("와퍼")
        };
        let table_entry = NutritionFacts {
            kcal: Some(594.0),
            protein: Some(28.0),
            ..NutritionFacts::default()
        };
        let combined =
            incoming_nutrition(&candidate, Some(&table_entry)).expect("combined facts");
        assert_eq!(combined.kcal, Some(610.0));
        assert_eq!(combined.protein, Some(28.0));
    }
}
