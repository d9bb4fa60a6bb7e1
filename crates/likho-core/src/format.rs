use crate::types::GeneratedScript;

/// Format seconds as MM:SS timestamp
pub fn format_timestamp(seconds: u32) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}

/// Format a generated script as human-readable markdown
pub fn format_script_readable(script: &GeneratedScript) -> String {
    let mut output = String::new();

    // Title
    output.push_str(&format!("# {}\n\n", script.request.topic));

    // Meta info
    output.push_str(&format!(
        "**Words:** {} / {} cap | **Speaking time:** ~{:.1} min | **Generated in:** {:.1}s\n\n",
        script.word_count, script.word_cap, script.speaking_minutes, script.generation_secs
    ));
    output.push_str(&format!(
        "**Tone:** {} | **Audience:** {} | **Type:** {}\n\n",
        script.request.tone, script.request.audience, script.request.content_type
    ));
    if let Some(creator) = &script.request.creator_style {
        output.push_str(&format!("**Styled after:** {}\n\n", creator));
    }

    // Timing plan
    output.push_str("## Timing Plan\n\n");
    let timing = &script.timing;
    output.push_str(&format!(
        "• Hook: {}–{} seconds\n",
        timing.hook_secs.0, timing.hook_secs.1
    ));
    output.push_str(&format!(
        "• Intro: {}–{} seconds\n",
        timing.intro_secs.0, timing.intro_secs.1
    ));
    output.push_str(&format!(
        "• Main content from: {}\n",
        format_timestamp(timing.main_start_secs)
    ));
    output.push_str(&format!(
        "• Call-to-action at: {}\n",
        format_timestamp(timing.cta_at_secs)
    ));
    output.push_str(&format!(
        "• Outro at: {}\n",
        format_timestamp(timing.outro_at_secs)
    ));
    output.push('\n');

    // Style patterns detected in the final text
    let patterns = &script.applied_patterns;
    if !patterns.hinglish_expressions.is_empty() || !patterns.engagement_phrases.is_empty() {
        output.push_str("## Style Patterns Present\n\n");
        for expression in &patterns.hinglish_expressions {
            output.push_str(&format!("• {}\n", expression));
        }
        for phrase in &patterns.engagement_phrases {
            output.push_str(&format!("• {}\n", phrase));
        }
        output.push('\n');
    }

    // Script body
    output.push_str("## Script\n\n");
    output.push_str(&script.script);
    output.push('\n');

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::postprocess;
    use crate::types::ScriptRequest;

    #[test]
    fn timestamps_are_mm_ss() {
        assert_eq!(format_timestamp(25), "00:25");
        assert_eq!(format_timestamp(570), "09:30");
    }

    #[test]
    fn readable_output_carries_all_sections() {
        let request = ScriptRequest::new("Top 5 Budget Phones", 10).with_creator_style("Trakin Tech");
        let script = postprocess::finalize(
            "Doston, subscribe karna mat bhoolna. Aaj dekhte hain paanch phones.",
            &request,
            1500,
            2.5,
        );
        let rendered = format_script_readable(&script);

        assert!(rendered.starts_with("# Top 5 Budget Phones\n"));
        assert!(rendered.contains("/ 1500 cap"));
        assert!(rendered.contains("**Styled after:** Trakin Tech"));
        assert!(rendered.contains("• Call-to-action at: 09:30"));
        assert!(rendered.contains("## Style Patterns Present"));
        assert!(rendered.contains("• subscribe"));
        assert!(rendered.contains("## Script"));
        assert!(rendered.contains("Doston, subscribe karna mat bhoolna."));
    }

    #[test]
    fn creator_line_is_optional() {
        let request = ScriptRequest::new("Budget phones", 10);
        let script = postprocess::finalize("Chhota sa script.", &request, 1500, 0.4);
        let rendered = format_script_readable(&script);
        assert!(!rendered.contains("Styled after"));
    }
}
