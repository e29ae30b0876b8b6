//! Cross-brand extraction helpers: URL absolutization, nutrition-cell text
//! parsing, and thin selector wrappers over `scraper`.

use scraper::{ElementRef, Html, Selector};

use crate::ScrapeError;

/// Resolve a scraped URL against the brand's base origin.
///
/// Handles protocol-relative (`//host/x`), root-relative (`/x`), and plain
/// relative (`x`) forms; absolute URLs and data URIs pass through.
pub fn absolutize_url(base_origin: &str, raw: &str) -> String {
    let raw = raw.trim();
    if raw.starts_with("http://") || raw.starts_with("https://") || raw.starts_with("data:") {
        return raw.to_string();
    }
    let origin = base_origin.trim_end_matches('/');
    if let Some(rest) = raw.strip_prefix("//") {
        let scheme = origin.split("://").next().unwrap_or("https");
        return format!("{scheme}://{rest}");
    }
    if raw.starts_with('/') {
        return format!("{origin}{raw}");
    }
    format!("{origin}/{raw}")
}

/// Parse one nutrition table cell into a number.
///
/// Cells arrive as `594kcal`, `28.5g`, `1,020mg (51%)`, `-`, or empty.
/// Parenthetical daily-value percentages and unit suffixes are stripped;
/// `-` and empty cells mean "not published" and map to `None`.
pub fn parse_nutrition_cell(text: &str) -> Option<f64> {
    let mut cleaned = text.trim().to_string();
    if cleaned.is_empty() || cleaned == "-" {
        return None;
    }
    if let Some(open) = cleaned.find('(') {
        cleaned.truncate(open);
    }
    let numeric: String = cleaned
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();
    if numeric.is_empty() {
        return None;
    }
    numeric.parse::<f64>().ok()
}

pub fn parse_selector(selector: &str) -> Result<Selector, ScrapeError> {
    Selector::parse(selector)
        .map_err(|e| ScrapeError::Parse(format!("bad selector `{selector}`: {e}")))
}

pub fn first_text(document: &Html, selector: &str) -> Result<Option<String>, ScrapeError> {
    let sel = parse_selector(selector)?;
    Ok(document
        .select(&sel)
        .next()
        .and_then(|n| text_or_none(n.text().collect::<String>())))
}

pub fn element_text(element: &ElementRef<'_>, selector: &str) -> Result<Option<String>, ScrapeError> {
    let sel = parse_selector(selector)?;
    Ok(element
        .select(&sel)
        .next()
        .and_then(|n| text_or_none(n.text().collect::<String>())))
}

pub fn element_attr(
    element: &ElementRef<'_>,
    selector: &str,
    attr: &str,
) -> Result<Option<String>, ScrapeError> {
    let sel = parse_selector(selector)?;
    Ok(element
        .select(&sel)
        .next()
        .and_then(|n| n.value().attr(attr))
        .and_then(|s| text_or_none(s.to_string())))
}

pub fn text_or_none(value: String) -> Option<String> {
    let trimmed = value.trim().to_string();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absolutize_handles_every_relative_form() {
        let origin = "https://www.mcdonalds.co.kr";
        assert_eq!(
            absolutize_url(origin, "/upload/menu/bigmac.png"),
            "https://www.mcdonalds.co.kr/upload/menu/bigmac.png"
        );
        assert_eq!(
            absolutize_url(origin, "upload/menu/bigmac.png"),
            "https://www.mcdonalds.co.kr/upload/menu/bigmac.png"
        );
        assert_eq!(
            absolutize_url(origin, "//cdn.mcdonalds.co.kr/a.png"),
            "https://cdn.mcdonalds.co.kr/a.png"
        );
        assert_eq!(
            absolutize_url(origin, "https://x/a.png"),
            "https://x/a.png"
        );
    }

    #[test]
    fn nutrition_cell_strips_units_and_percentages() {
        assert_eq!(parse_nutrition_cell("594kcal"), Some(594.0));
        assert_eq!(parse_nutrition_cell("28.5g"), Some(28.5));
        assert_eq!(parse_nutrition_cell("1020mg (51%)"), Some(1020.0));
        assert_eq!(parse_nutrition_cell(" 12 g "), Some(12.0));
    }

    #[test]
    fn nutrition_cell_maps_missing_markers_to_none() {
        assert_eq!(parse_nutrition_cell("-"), None);
        assert_eq!(parse_nutrition_cell(""), None);
        assert_eq!(parse_nutrition_cell("   "), None);
        assert_eq!(parse_nutrition_cell("n/a"), None);
    }
}
