//! Content metadata providers.

mod gemini;
mod openai;

pub use gemini::GeminiClient;
pub use openai::OpenAiContentClient;

/// Prompt shared by both content providers; the model is asked for a bare
/// JSON object matching [`shorts_models::ContentMetadata`].
pub(crate) fn metadata_prompt(script: &str) -> String {
    format!(
        r##"You are a YouTube Shorts optimization expert. Based on the following video script, generate:

1. A catchy, engaging title (max 100 characters) that will get clicks
2. A detailed description (2-3 sentences) optimized for SEO
3. 10 relevant tags for YouTube search
4. 5 trending hashtags

Video Script:
{script}

Return ONLY a JSON object in this exact format:
{{
    "title": "Your catchy title here",
    "description": "Your SEO-optimized description here",
    "tags": ["tag1", "tag2", "tag3"],
    "hashtags": ["#hashtag1", "#hashtag2"]
}}"##
    )
}

/// Strip a markdown code fence around a JSON payload, if present.
/// Models routinely wrap the requested object in ```json ... ``` despite
/// instructions.
pub(crate) fn extract_json_block(text: &str) -> &str {
    let trimmed = text.trim();

    for fence in ["```json", "```"] {
        if let Some(rest) = trimmed.strip_prefix(fence) {
            let inner = rest.split("```").next().unwrap_or(rest);
            return inner.trim();
        }
    }

    trimmed
}

#[cfg(test)]
mod tests {
    use super::*;
    use shorts_models::ContentMetadata;

    #[test]
    fn extracts_json_from_fenced_block() {
        let fenced = "```json\n{\"title\":\"t\",\"description\":\"d\"}\n```";
        assert_eq!(
            extract_json_block(fenced),
            "{\"title\":\"t\",\"description\":\"d\"}"
        );
    }

    #[test]
    fn extracts_json_from_anonymous_fence() {
        let fenced = "```\n{\"title\":\"t\",\"description\":\"d\"}\n```\ntrailing chatter";
        assert_eq!(
            extract_json_block(fenced),
            "{\"title\":\"t\",\"description\":\"d\"}"
        );
    }

    #[test]
    fn bare_json_passes_through() {
        let bare = " {\"title\":\"t\",\"description\":\"d\"} ";
        assert_eq!(
            extract_json_block(bare),
            "{\"title\":\"t\",\"description\":\"d\"}"
        );
    }

    #[test]
    fn fenced_payload_parses_as_metadata() {
        let fenced = r##"```json
{
    "title": "Honey Never Spoils!",
    "description": "Ancient honey is still edible.",
    "tags": ["honey", "facts"],
    "hashtags": ["#shorts"]
}
```"##;
        let meta: ContentMetadata = serde_json::from_str(extract_json_block(fenced)).unwrap();
        assert_eq!(meta.title, "Honey Never Spoils!");
        assert_eq!(meta.tags.len(), 2);
    }
}
