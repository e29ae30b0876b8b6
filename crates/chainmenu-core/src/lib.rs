//! Core domain model for the chain menu reconciliation service.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const CRATE_NAME: &str = "chainmenu-core";

/// Static reference row for one tracked restaurant chain.
///
/// Brands are created by seed migration and treated as immutable while a
/// scraper run is in flight.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Brand {
    pub id: Uuid,
    pub slug: String,
    pub name: String,
    pub logo_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Persisted menu item. Identity for upsert purposes is `(brand_id, name)`;
/// the name is fixed at creation and never rewritten by later runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MenuItem {
    pub id: Uuid,
    pub brand_id: Uuid,
    pub name: String,
    pub category: String,
    pub image_url: Option<String>,
    pub detail_url: Option<String>,
    pub description: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Insert payload for a menu item first seen in a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewMenuItem {
    pub brand_id: Uuid,
    pub name: String,
    pub category: String,
    pub image_url: Option<String>,
    pub detail_url: Option<String>,
    pub description: Option<String>,
    pub is_active: bool,
}

/// Field-level patch applied to an existing menu item.
///
/// `None` means "leave the stored value alone"; there is deliberately no way
/// to null out a previously stored field from a scrape.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct MenuItemPatch {
    pub image_url: Option<String>,
    pub detail_url: Option<String>,
    pub description: Option<String>,
}

impl MenuItemPatch {
    pub fn is_empty(&self) -> bool {
        self.image_url.is_none() && self.detail_url.is_none() && self.description.is_none()
    }
}

/// Nutrition measures for one menu item. Every field is independently
/// nullable; partial data is a normal state, not an error.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct NutritionFacts {
    pub kcal: Option<f64>,
    pub protein: Option<f64>,
    pub saturated_fat: Option<f64>,
    pub sodium: Option<f64>,
    pub sugar: Option<f64>,
}

impl NutritionFacts {
    pub fn is_empty(&self) -> bool {
        self.kcal.is_none()
            && self.protein.is_none()
            && self.saturated_fat.is_none()
            && self.sodium.is_none()
            && self.sugar.is_none()
    }

    /// Merge `incoming` over `self`: present fields overwrite, absent fields
    /// keep the stored value.
    pub fn merged_with(&self, incoming: &NutritionFacts) -> NutritionFacts {
        NutritionFacts {
            kcal: incoming.kcal.or(self.kcal),
            protein: incoming.protein.or(self.protein),
            saturated_fat: incoming.saturated_fat.or(self.saturated_fat),
            sodium: incoming.sodium.or(self.sodium),
            sugar: incoming.sugar.or(self.sugar),
        }
    }
}

/// Outcome state of one reconciliation run, recorded in the ingest log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IngestStatus {
    Success,
    Partial,
    Error,
}

impl IngestStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            IngestStatus::Success => "success",
            IngestStatus::Partial => "partial",
            IngestStatus::Error => "error",
        }
    }

    pub fn parse(value: &str) -> Option<IngestStatus> {
        match value {
            "success" => Some(IngestStatus::Success),
            "partial" => Some(IngestStatus::Partial),
            "error" => Some(IngestStatus::Error),
            _ => None,
        }
    }
}

/// Append-only audit row, one per scraper invocation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IngestLog {
    pub id: Uuid,
    pub brand_id: Uuid,
    pub status: IngestStatus,
    pub changed_count: i32,
    pub error: Option<String>,
    pub fetched_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewIngestLog {
    pub brand_id: Uuid,
    pub status: IngestStatus,
    pub changed_count: i32,
    pub error: Option<String>,
    pub fetched_at: DateTime<Utc>,
}

/// One record extracted live from a brand site (or supplied by a static
/// nutrition table). Exists only within a single reconciliation run.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CandidateRecord {
    pub name: String,
    pub image_url: Option<String>,
    pub detail_url: Option<String>,
    pub description: Option<String>,
    pub nutrition: Option<NutritionFacts>,
}

impl CandidateRecord {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}

/// Run-level result returned to the admin caller and logged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngestSummary {
    pub brand: String,
    pub total: usize,
    pub created: usize,
    pub updated: usize,
    pub errors: usize,
    pub error_details: Vec<String>,
}

impl IngestSummary {
    pub fn changed_count(&self) -> i32 {
        (self.created + self.updated) as i32
    }

    pub fn status(&self) -> IngestStatus {
        if self.errors == 0 {
            IngestStatus::Success
        } else if self.created + self.updated > 0 {
            IngestStatus::Partial
        } else {
            IngestStatus::Error
        }
    }
}

/// A binary qualifier that must agree between target and candidate.
///
/// Any of the listed markers flags the qualifier as present; a junior-size
/// marker on one side only forces the pair score to zero so a base item is
/// never bound to its size-variant sibling.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QualifierRule {
    pub label: String,
    pub markers: Vec<String>,
}

impl QualifierRule {
    pub fn new(label: &str, markers: &[&str]) -> Self {
        Self {
            label: label.to_string(),
            markers: markers.iter().map(|m| m.to_string()).collect(),
        }
    }

    pub fn applies_to(&self, normalized: &str) -> bool {
        self.markers.iter().any(|m| normalized.contains(m.as_str()))
    }
}

/// Per-brand matching rule data consumed by the normalizer and scorer.
///
/// Plain data on purpose: brand profiles declare these without depending on
/// the reconciliation engine. Noise tokens are brand-specific because a
/// token like `세트` is packaging noise for one chain and part of a proper
/// name for another.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchRules {
    pub noise_tokens: Vec<String>,
    /// `(variant, canonical)` spelling pairs applied after noise removal.
    pub synonyms: Vec<(String, String)>,
    /// Strip Latin letters entirely; for chains whose Korean menu names
    /// carry English sub-branding that never appears in canonical targets.
    pub strip_latin: bool,
    /// Shortest containment credit; suppresses spurious short-substring
    /// matches such as `치즈` alone inside an unrelated name.
    pub containment_min_chars: usize,
    pub qualifiers: Vec<QualifierRule>,
}

impl Default for MatchRules {
    fn default() -> Self {
        Self {
            noise_tokens: Vec::new(),
            synonyms: Vec::new(),
            strip_latin: false,
            containment_min_chars: 3,
            qualifiers: Vec::new(),
        }
    }
}

impl MatchRules {
    pub fn with_noise_tokens(mut self, tokens: &[&str]) -> Self {
        self.noise_tokens = tokens.iter().map(|t| t.to_string()).collect();
        self
    }

    pub fn with_synonyms(mut self, pairs: &[(&str, &str)]) -> Self {
        self.synonyms = pairs
            .iter()
            .map(|(a, b)| (a.to_string(), b.to_string()))
            .collect();
        self
    }

    pub fn with_strip_latin(mut self, strip: bool) -> Self {
        self.strip_latin = strip;
        self
    }

    pub fn with_containment_min_chars(mut self, min: usize) -> Self {
        self.containment_min_chars = min;
        self
    }

    pub fn with_qualifiers(mut self, qualifiers: Vec<QualifierRule>) -> Self {
        self.qualifiers = qualifiers;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nutrition_merge_keeps_stored_values_for_absent_fields() {
        let stored = NutritionFacts {
            kcal: Some(594.0),
            protein: Some(28.0),
            ..NutritionFacts::default()
        };
        let incoming = NutritionFacts {
            kcal: Some(601.0),
            sodium: Some(880.0),
            ..NutritionFacts::default()
        };
        let merged = stored.merged_with(&incoming);
        assert_eq!(merged.kcal, Some(601.0));
        assert_eq!(merged.protein, Some(28.0));
        assert_eq!(merged.sodium, Some(880.0));
        assert_eq!(merged.saturated_fat, None);
    }

    #[test]
    fn summary_status_reflects_error_and_progress_counts() {
        let mut summary = IngestSummary {
            brand: "mcdonalds".into(),
            total: 3,
            created: 2,
            updated: 1,
            errors: 0,
            error_details: vec![],
        };
        assert_eq!(summary.status(), IngestStatus::Success);
        assert_eq!(summary.changed_count(), 3);

        summary.errors = 1;
        assert_eq!(summary.status(), IngestStatus::Partial);

        summary.created = 0;
        summary.updated = 0;
        assert_eq!(summary.status(), IngestStatus::Error);
    }

    #[test]
    fn qualifier_rule_matches_any_marker() {
        let rule = QualifierRule::new("junior", &["주니어", "쥬니어", "jr"]);
        assert!(rule.applies_to("와퍼주니어"));
        assert!(rule.applies_to("쥬니어와퍼"));
        assert!(!rule.applies_to("와퍼"));
    }
}
