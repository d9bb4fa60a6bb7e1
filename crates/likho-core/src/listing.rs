//! Enumerated-item heuristics. Approximate by nature: both functions can
//! over- and under-count, so callers treat the results as hints, not
//! guarantees.

use std::sync::LazyLock;

use regex::Regex;

static TOP_N: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)top\s+(\d+)").unwrap());

static COUNTED_NOUN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(\d+)\s*(?:items?|laptops?|phones?|mobiles?|tips?|points?)\b").unwrap()
});

static NUMBERED_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?:\d+[).]|[-*]\s)").unwrap());

static BOLD_LABEL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\*\*\s*\w+\s*\d+\s*\*\*").unwrap());

static LABELED_ITEM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^(?:laptop|phone|item)\s*\d+[:-]").unwrap());

/// How many enumerated items the request implies, if any. Scans topic and
/// context for "top N" and "N <noun>" phrasings; the largest match wins.
pub fn expected_item_count(topic: &str, additional_context: Option<&str>) -> Option<u32> {
    let mut text = topic.to_string();
    if let Some(context) = additional_context {
        text.push(' ');
        text.push_str(context);
    }

    let mut best: Option<u32> = None;
    for captures in TOP_N
        .captures_iter(&text)
        .chain(COUNTED_NOUN.captures_iter(&text))
    {
        if let Ok(n) = captures[1].parse::<u32>() {
            best = Some(best.map_or(n, |current| current.max(n)));
        }
    }
    best
}

/// Count lines that look like enumerated items: numbered/bulleted markers,
/// bolded "Label N" headings, or explicit "item N:" prefixes.
pub fn count_list_items(text: &str) -> u32 {
    text.lines()
        .map(str::trim)
        .filter(|line| {
            NUMBERED_LINE.is_match(line)
                || BOLD_LABEL.is_match(line)
                || LABELED_ITEM.is_match(line)
        })
        .count() as u32
}
