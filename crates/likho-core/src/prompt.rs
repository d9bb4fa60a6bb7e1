use crate::listing;
use crate::style::CreatorStyleProfile;
use crate::types::{ContentType, ScriptRequest, Tone};

/// Average speaking pace used for word caps and speaking-time estimates.
pub const WORDS_PER_MINUTE: u32 = 150;

/// Slower pace quoted inside the prompt's "approximately N words" line,
/// matching average spoken Hindi.
const SPOKEN_WPM: u32 = 140;

const MIN_TARGET_WORDS: u32 = 150;
const OVERRIDE_MIN: u32 = 200;
const OVERRIDE_MAX: u32 = 5000;
const DEFAULT_MAX: u32 = 2000;

static PERSONA: &str = "You are an expert YouTube script writer specializing in creating authentic Hinglish (Hindi + English mix) content for Indian tech channels. Create educational, informative, and family-friendly content about technology, gadgets, and reviews.";

static STRUCTURE_TEMPLATE: &str = "SCRIPT STRUCTURE:\n\
1. Hook (first ~5% of the video): Engaging opening question or statement\n\
2. Intro (next ~5-10%): Channel greeting and video preview\n\
3. Main Content (middle ~70%): Core topic discussion\n\
4. Call-to-Action (~5%): Like, subscribe, notification bell\n\
5. Outro (final ~5-10%): Channel promotion and preview";

static HINGLISH_PATTERNS: &str = "HINGLISH LANGUAGE PATTERNS:\n\
- Natural mix of Hindi and English\n\
- Common phrases: \"दोस्तों\", \"भाई\", \"तो यहाँ पर\", \"सुनिए\"\n\
- Technical terms in English, explanations in Hindi\n\
- Engaging expressions and enthusiasm markers";

static TRANSLITERATION_LINE: &str = "\nIMPORTANT: Write in Hinglish using Latin letters only (no Devanagari). Example: 'aap kya kar rahe ho', 'dosto', 'performance'. Keep it natural.";

/// Resolve the authoritative word cap for a request. A positive override is
/// clamped to [200, 5000]; otherwise the duration-derived target applies,
/// capped at 2000 words.
pub fn resolve_word_cap(duration_minutes: u32, requested: Option<u32>) -> u32 {
    let default_target = duration_minutes
        .saturating_mul(WORDS_PER_MINUTE)
        .max(MIN_TARGET_WORDS);
    match requested {
        Some(cap) if cap > 0 => cap.clamp(OVERRIDE_MIN, OVERRIDE_MAX),
        _ => default_target.min(DEFAULT_MAX),
    }
}

/// Assemble the full request text. Deterministic: the same request, profile,
/// and cap always produce the same prompt.
pub fn build_prompt(
    request: &ScriptRequest,
    style: Option<&CreatorStyleProfile>,
    word_cap: u32,
) -> String {
    let mut parts: Vec<String> = Vec::new();

    parts.push(PERSONA.to_string());

    if let (Some(name), Some(profile)) = (request.creator_style.as_deref(), style) {
        parts.push(format!(
            "\nCREATOR STYLE CONTEXT - Replicate the style of {}:",
            name
        ));
        parts.push(format!(
            "- Language preferences: {}",
            profile.language_summary()
        ));
        parts.push(format!("- Tone profile: {}", profile.tone_summary()));
        parts.push("- Content style: Natural conversational tone".to_string());
    }

    parts.push(format!(
        "\nSCRIPT REQUIREMENTS:\n\
         - Topic: {topic}\n\
         - Duration: {minutes} minutes (approximately {approx_words} words)\n\
         - Tone: {tone}\n\
         - Target Audience: {audience}\n\
         - Content Type: {content_type}\n\
         \n\
         IMPORTANT HARD LIMIT: Write no more than {cap} words. Stop before exceeding this word cap. The script must be complete but concise.\n\
         IMPORTANT: Generate a COMPLETE script from start to finish, but keep it within the word cap. Do not cut off mid-sentence. Include all sections: Hook, Introduction, Main Content, and Conclusion with Call-to-Action.",
        topic = request.topic,
        minutes = request.duration_minutes,
        approx_words = request.duration_minutes.saturating_mul(SPOKEN_WPM),
        tone = request.tone,
        audience = request.audience,
        content_type = request.content_type,
        cap = word_cap,
    ));

    parts.push(format!(
        "\nSTYLE GUIDELINES:\n{}\n\n{}\n\n{}\n\n{}",
        tone_guidance(request.tone),
        content_type_guidance(request.content_type),
        STRUCTURE_TEMPLATE,
        HINGLISH_PATTERNS,
    ));

    if let Some(context) = request.additional_context.as_deref() {
        parts.push(format!("\nADDITIONAL CONTEXT:\n{}", context));
    }

    if request.roman_hinglish {
        parts.push(TRANSLITERATION_LINE.to_string());
    }

    parts.push(
        "\nGenerate an engaging, authentic YouTube script that sounds natural and conversational."
            .to_string(),
    );
    parts.push(
        "\nCRITICAL: Make sure to complete the entire script. Do not stop mid-sentence or leave sections incomplete. The script must be complete from beginning to end."
            .to_string(),
    );
    parts.push(completion_requirements(request));

    parts.join("\n")
}

/// Short, generic, family-friendly reissue prompt used when the first call
/// yields no candidates.
pub fn fallback_prompt(topic: &str, duration_minutes: u32) -> String {
    format!(
        "Create a COMPLETE {duration_minutes}-minute YouTube script about {topic} in Hinglish (Hindi + English mix).\n\
         Make it educational, family-friendly, and suitable for tech enthusiasts.\n\
         Include: Introduction, main content about {topic}, and conclusion with call-to-action.\n\
         Keep it professional and informative.\n\
         IMPORTANT: Generate the ENTIRE script from start to finish. Do not truncate or cut off mid-sentence."
    )
}

fn completion_requirements(request: &ScriptRequest) -> String {
    match listing::expected_item_count(&request.topic, request.additional_context.as_deref()) {
        Some(count) => format!(
            "\nCOMPLETION REQUIREMENTS:\n\
             - The topic implies a list: include exactly {count} fully detailed items with consistent headings and balanced detail per item.\n\
             - If you run out of room, compress wording rather than dropping items.\n\
             - Ensure the script ends with a clear outro/CTA and a complete final sentence."
        ),
        None => "\nCOMPLETION REQUIREMENTS:\n\
                 - If the topic implies a list (e.g., \"Top 5 laptops\"), include exactly that many fully detailed items with consistent headings and balanced detail per item.\n\
                 - If you run out of room, compress wording rather than dropping items.\n\
                 - Ensure the script ends with a clear outro/CTA and a complete final sentence."
            .to_string(),
    }
}

fn tone_guidance(tone: Tone) -> &'static str {
    match tone {
        Tone::FriendlyAndInformative => {
            "- Use conversational tone\n\
             - Include friendly greetings and transitions\n\
             - Make technical concepts accessible\n\
             - Ask rhetorical questions to engage audience"
        }
        Tone::EnthusiasticAndEnergetic => {
            "- High energy language\n\
             - Use enthusiastic expressions frequently\n\
             - Create excitement about the topic\n\
             - Include dramatic emphasis on key points"
        }
        Tone::ProfessionalAndFormal => {
            "- More structured and formal language\n\
             - Technical accuracy is paramount\n\
             - Measured pace and tone\n\
             - Professional vocabulary choices"
        }
        Tone::CasualAndConversational => {
            "- Relaxed, everyday language\n\
             - Use contractions and casual expressions\n\
             - As if talking to a friend\n\
             - Include personal opinions and reactions"
        }
        Tone::DramaticAndEngaging => {
            "- Build suspense and excitement\n\
             - Use dramatic words and expressions\n\
             - Create a story-like narrative\n\
             - Make the audience anticipate what comes next"
        }
        Tone::TechnicalAndDetailed => {
            "- Focus on specifications and technical details\n\
             - Use precise technical vocabulary\n\
             - Include comparisons and benchmarks\n\
             - Detailed explanations of features"
        }
        Tone::HumorousAndEntertaining => {
            "- Include humor and jokes\n\
             - Use wit and clever observations\n\
             - Make the content entertaining\n\
             - Balance information with entertainment"
        }
    }
}

fn content_type_guidance(content_type: ContentType) -> &'static str {
    match content_type {
        ContentType::Review => {
            "- Structure: Introduction -> Key Features -> Pros/Cons -> Performance -> Price Conclusion\n\
             - Include comparisons with similar products\n\
             - Cover practical usage scenarios\n\
             - Provide clear recommendations"
        }
        ContentType::Comparison => {
            "- Structure: Introduction -> Feature-by-feature comparison -> Performance comparison -> Value analysis -> Winner\n\
             - Create fair comparisons\n\
             - Highlight key differences\n\
             - Provide clear winner with reasoning"
        }
        ContentType::Tutorial => {
            "- Structure: Problem introduction -> Step-by-step solution -> Tips and tricks -> Summary\n\
             - Clear instructions with actionable steps\n\
             - Cover different scenarios\n\
             - Include troubleshooting tips"
        }
        ContentType::Unboxing | ContentType::General => {
            "- Structure: Introduction -> Main content points -> Summary -> Conclusion\n\
             - Balanced mix of information and entertainment\n\
             - Engaging throughout the duration\n\
             - Clear main message or takeaway"
        }
    }
}
