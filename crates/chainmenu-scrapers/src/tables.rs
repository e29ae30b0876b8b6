//! Static per-brand nutrition tables.
//!
//! Several chains do not publish scrapeable nutrition data; for those the
//! values live in versioned YAML assets under `assets/nutrition/` and are
//! consumed through the same nutrition-hint shape as live-scraped data, so
//! the driver never knows which source supplied them.

use std::collections::HashMap;
use std::path::Path;

use anyhow::Context;
use serde::Deserialize;

use chainmenu_core::NutritionFacts;

#[derive(Debug, Deserialize)]
struct NutritionTableFile {
    #[allow(dead_code)]
    version: u32,
    #[serde(default)]
    items: Vec<NutritionTableEntry>,
}

#[derive(Debug, Deserialize)]
struct NutritionTableEntry {
    name: String,
    #[serde(default)]
    kcal: Option<f64>,
    #[serde(default)]
    protein: Option<f64>,
    #[serde(default)]
    saturated_fat: Option<f64>,
    #[serde(default)]
    sodium: Option<f64>,
    #[serde(default)]
    sugar: Option<f64>,
}

/// Load `assets/nutrition/<slug>.yaml`, keyed by canonical menu name.
/// A missing asset file is an empty table, not an error.
pub fn load_nutrition_table(
    workspace_root: &Path,
    brand_slug: &str,
) -> anyhow::Result<HashMap<String, NutritionFacts>> {
    let path = workspace_root
        .join("assets")
        .join("nutrition")
        .join(format!("{brand_slug}.yaml"));
    if !path.exists() {
        tracing::warn!(brand_slug, path = %path.display(), "no static nutrition table");
        return Ok(HashMap::new());
    }
    let text = std::fs::read_to_string(&path)
        .with_context(|| format!("reading {}", path.display()))?;
    let file: NutritionTableFile =
        serde_yaml::from_str(&text).with_context(|| format!("parsing {}", path.display()))?;

    let mut table = HashMap::with_capacity(file.items.len());
    for entry in file.items {
        table.insert(
            entry.name,
            NutritionFacts {
                kcal: entry.kcal,
                protein: entry.protein,
                saturated_fat: entry.saturated_fat,
                sodium: entry.sodium,
                sugar: entry.sugar,
            },
        );
    }
    Ok(table)
}
