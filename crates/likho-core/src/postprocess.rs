//! Deterministic post-processing of raw generation output: cleanup,
//! section headers, the hard word cap, and reporting metrics.

use std::sync::LazyLock;

use regex::Regex;
use uuid::Uuid;

use crate::prompt::WORDS_PER_MINUTE;
use crate::types::{AppliedPatterns, GeneratedScript, ScriptRequest, TimingPlan};

static ZERO_WIDTH: LazyLock<Regex> =
    LazyLock::new(|| Regex::new("[\u{200B}-\u{200D}\u{FEFF}\u{FFFD}]+").unwrap());
static HORIZONTAL_WS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[ \t]+").unwrap());
static BLANK_RUNS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\n(?:[ \t]*\n){2,}").unwrap());
static SENTENCE_BOUNDARY: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[.!?|।]\s").unwrap());

const SECTION_KEYWORDS: [&str; 6] = ["hook", "intro", "main", "conclusion", "outro", "cta"];

/// Marks that close a sentence. The pipe is accepted as an informal
/// separator during truncation but is not a terminator.
const TERMINAL_MARKS: [char; 4] = ['.', '!', '?', '।'];

const HINGLISH_MARKERS: [&str; 12] = [
    "दोस्तों",
    "भाई",
    "यार",
    "सुनिए",
    "देखिए",
    "तो यहाँ पर",
    "doston",
    "bhai",
    "yaar",
    "suniye",
    "dekhiye",
    "yahan par",
];

const ENGAGEMENT_MARKERS: [&str; 6] = [
    "subscribe",
    "like",
    "notification",
    "bell",
    "comment",
    "share",
];

/// Strip invisible artifacts, unify line endings, and collapse whitespace
/// runs. Idempotent; single spaces between words are left alone.
pub fn clean_text(text: &str) -> String {
    let stripped = ZERO_WIDTH.replace_all(text, "");
    let unified = stripped.replace("\r\n", "\n").replace('\r', "\n");
    let collapsed = HORIZONTAL_WS.replace_all(&unified, " ");
    BLANK_RUNS.replace_all(&collapsed, "\n\n").into_owned()
}

/// Promote lines that open with a section keyword to bracketed headers.
/// Blank lines are dropped; everything else passes through in order.
pub fn promote_section_headers(text: &str) -> String {
    let mut formatted = Vec::new();
    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let lowered = line.to_lowercase();
        if SECTION_KEYWORDS
            .iter()
            .any(|keyword| lowered.starts_with(keyword))
        {
            formatted.push(format!("\n[{}]\n", line.to_uppercase()));
        } else {
            formatted.push(line.to_string());
        }
    }
    formatted.join("\n")
}

/// Enforce the hard word cap. Text within the cap is returned unchanged;
/// otherwise the first `cap` words are kept and the cut is moved back to
/// the last sentence boundary inside that prefix, when one exists.
pub fn truncate_to_words(text: &str, cap: u32) -> String {
    let words: Vec<&str> = text.split_whitespace().collect();
    if words.len() <= cap as usize {
        return text.to_string();
    }
    let provisional = words[..cap as usize].join(" ");
    match SENTENCE_BOUNDARY.find_iter(&provisional).last() {
        Some(boundary) => provisional[..boundary.end()].trim_end().to_string(),
        None => provisional,
    }
}

/// Guarantee the script ends on a sentence terminator, appending a single
/// period when it does not. No outro text is ever injected.
pub fn ensure_sentence_boundary(text: &str) -> String {
    let trimmed = text.trim_end();
    if trimmed.is_empty() || trimmed.ends_with(TERMINAL_MARKS) {
        trimmed.to_string()
    } else {
        format!("{trimmed}.")
    }
}

pub fn count_words(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Fixed production offsets derived from the target duration alone.
pub fn timing_plan(duration_minutes: u32) -> TimingPlan {
    let total_secs = duration_minutes.saturating_mul(60);
    TimingPlan {
        hook_secs: (10, 15),
        intro_secs: (15, 20),
        main_start_secs: 25,
        cta_at_secs: total_secs.saturating_sub(30),
        outro_at_secs: total_secs.saturating_sub(15),
        total_minutes: duration_minutes,
    }
}

/// Report which style vocabulary actually made it into the final text.
pub fn applied_patterns(script: &str) -> AppliedPatterns {
    let lowered = script.to_lowercase();
    AppliedPatterns {
        hinglish_expressions: HINGLISH_MARKERS
            .iter()
            .filter(|marker| lowered.contains(*marker))
            .map(|marker| marker.to_string())
            .collect(),
        engagement_phrases: ENGAGEMENT_MARKERS
            .iter()
            .filter(|marker| lowered.contains(*marker))
            .map(|marker| marker.to_string())
            .collect(),
    }
}

/// Run the full pipeline over raw orchestrator output and assemble the
/// reportable result.
pub fn finalize(
    raw: &str,
    request: &ScriptRequest,
    word_cap: u32,
    generation_secs: f64,
) -> GeneratedScript {
    let cleaned = clean_text(raw);
    let sectioned = promote_section_headers(&cleaned);
    let capped = truncate_to_words(&sectioned, word_cap);
    let script = ensure_sentence_boundary(&capped);

    let word_count = count_words(&script) as u32;
    GeneratedScript {
        id: Uuid::new_v4(),
        word_count,
        word_cap,
        speaking_minutes: f64::from(word_count) / f64::from(WORDS_PER_MINUTE),
        timing: timing_plan(request.duration_minutes),
        applied_patterns: applied_patterns(&script),
        generation_secs,
        script,
        request: request.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clean_strips_artifacts_and_unifies_endings() {
        let raw = "namaste\u{200B} doston\r\naaj ka\u{FFFD} topic";
        assert_eq!(clean_text(raw), "namaste doston\naaj ka topic");
    }

    #[test]
    fn clean_collapses_blank_runs_to_one_blank_line() {
        assert_eq!(clean_text("intro\n\n\n\nmain"), "intro\n\nmain");
        assert_eq!(clean_text("intro\n \n\t\n main"), "intro\n\n main");
    }

    #[test]
    fn clean_preserves_word_spacing() {
        assert_eq!(clean_text("दो शब्द अलग"), "दो शब्द अलग");
        assert_eq!(clean_text("tab\tseparated\t\twords"), "tab separated words");
    }

    #[test]
    fn clean_is_idempotent() {
        let raw = "ek \u{200B}\r\n\r\n \r\n\tdo  teen\n\n\n\nchaar \n \n \n paanch";
        let once = clean_text(raw);
        assert_eq!(clean_text(&once), once);
    }

    #[test]
    fn section_lines_become_bracketed_headers() {
        let text = "Hook: kya aapne socha hai\nbaaki sab same rehta hai\nOutro: milte hain agle video mein";
        let formatted = promote_section_headers(text);
        assert!(formatted.contains("\n[HOOK: KYA AAPNE SOCHA HAI]\n"));
        assert!(formatted.contains("\n[OUTRO: MILTE HAIN AGLE VIDEO MEIN]\n"));
        assert!(formatted.contains("baaki sab same rehta hai"));
    }

    #[test]
    fn section_pass_drops_blank_lines() {
        let formatted = promote_section_headers("pehli line\n\n\ndoosri line");
        assert_eq!(formatted, "pehli line\ndoosri line");
    }

    #[test]
    fn truncate_keeps_text_within_cap() {
        let text = "yeh script\npehle se chhoti hai";
        assert_eq!(truncate_to_words(text, 10), text);
    }

    #[test]
    fn truncate_cuts_at_last_sentence_boundary() {
        let text = "pehla vaakya yahan khatam hota hai. doosra vaakya bahut lamba chalta hai aur kabhi rukta nahi";
        let truncated = truncate_to_words(text, 10);
        assert_eq!(truncated, "pehla vaakya yahan khatam hota hai.");
    }

    #[test]
    fn truncate_handles_devanagari_full_stop() {
        let text = "पहला वाक्य यहाँ खत्म। दूसरा वाक्य बहुत लंबा चलता रहता है और रुकता नहीं";
        let truncated = truncate_to_words(text, 8);
        assert_eq!(truncated, "पहला वाक्य यहाँ खत्म।");
    }

    #[test]
    fn truncate_without_boundary_cuts_at_cap() {
        let text = "ek do teen chaar paanch chhe saat aath";
        assert_eq!(truncate_to_words(text, 5), "ek do teen chaar paanch");
    }

    #[test]
    fn boundary_appends_period_only_when_needed() {
        assert_eq!(ensure_sentence_boundary("bas itna hi doston"), "bas itna hi doston.");
        assert_eq!(ensure_sentence_boundary("khatam।"), "khatam।");
        assert_eq!(ensure_sentence_boundary("kya baat hai!  "), "kya baat hai!");
        assert_eq!(ensure_sentence_boundary(""), "");
    }

    #[test]
    fn timing_plan_uses_fixed_offsets() {
        let plan = timing_plan(10);
        assert_eq!(plan.hook_secs, (10, 15));
        assert_eq!(plan.intro_secs, (15, 20));
        assert_eq!(plan.main_start_secs, 25);
        assert_eq!(plan.cta_at_secs, 570);
        assert_eq!(plan.outro_at_secs, 585);
        assert_eq!(plan.total_minutes, 10);

        // Degenerate durations must not underflow or overflow.
        assert_eq!(timing_plan(0).cta_at_secs, 0);
        assert_eq!(timing_plan(u32::MAX).cta_at_secs, u32::MAX - 30);
    }

    #[test]
    fn applied_patterns_scans_both_vocabularies() {
        let script = "Doston, aaj ka video dekhne ke baad subscribe karo aur bell icon dabao.";
        let patterns = applied_patterns(script);
        assert!(patterns.hinglish_expressions.contains(&"doston".to_string()));
        assert!(patterns.engagement_phrases.contains(&"subscribe".to_string()));
        assert!(patterns.engagement_phrases.contains(&"bell".to_string()));
        assert!(!patterns.engagement_phrases.contains(&"share".to_string()));
    }

    #[test]
    fn finalize_enforces_cap_and_reports_metrics() {
        let request = crate::types::ScriptRequest::new("Best budget phones", 10);
        let mut raw = String::from("Intro: doston aaj ka topic.\n\n\n");
        for _ in 0..120 {
            raw.push_str("yeh ek lamba script hai jo cap se aage jata hai. ");
        }
        let script = finalize(&raw, &request, 300, 4.2);

        assert!(script.word_count <= 300);
        assert!(script.script.ends_with(['.', '!', '?', '।']));
        assert_eq!(script.word_cap, 300);
        assert!((script.speaking_minutes - f64::from(script.word_count) / 150.0).abs() < 1e-9);
        assert_eq!(script.timing.total_minutes, 10);
        assert!((script.generation_secs - 4.2).abs() < 1e-9);
        assert!(
            script
                .applied_patterns
                .hinglish_expressions
                .contains(&"doston".to_string())
        );
    }
}
