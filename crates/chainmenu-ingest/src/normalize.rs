//! Per-source name normalization.

use std::sync::LazyLock;

use regex::Regex;

use chainmenu_core::MatchRules;

/// Calorie annotations scraped along with some labels, e.g. `906~1045kcal`
/// or a bare `594kcal` suffix.
static KCAL_ANNOTATION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\d+(?:\.\d+)?(?:\s*~\s*\d+(?:\.\d+)?)?\s*kcal").expect("kcal annotation regex")
});

/// Convert a raw scraped or canonical label into its comparable form.
///
/// Deterministic and total: applies, in order, calorie-annotation and
/// trademark-glyph removal, per-brand noise-token removal, synonym
/// unification, optional Latin stripping, whitespace collapse, and
/// case-folding. Absence of any noise token is a no-op.
pub fn normalize(rules: &MatchRules, raw: &str) -> String {
    let mut text = KCAL_ANNOTATION.replace_all(raw, " ").into_owned();
    text = text.replace(['®', '™'], "");

    for token in &rules.noise_tokens {
        text = text.replace(token.as_str(), " ");
    }
    for (variant, canonical) in &rules.synonyms {
        text = text.replace(variant.as_str(), canonical.as_str());
    }
    if rules.strip_latin {
        text.retain(|c| !c.is_ascii_alphabetic());
    }

    text.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}
