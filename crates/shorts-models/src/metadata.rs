//! AI-generated content metadata.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Metadata generated from a script by the content stage: the title,
/// description and tags that end up on the published video.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ContentMetadata {
    /// Video title (clickable, max ~100 chars)
    pub title: String,
    /// SEO description, 2-3 sentences
    pub description: String,
    /// Search tags
    #[serde(default)]
    pub tags: Vec<String>,
    /// Trending hashtags, `#` included
    #[serde(default)]
    pub hashtags: Vec<String>,
}

impl ContentMetadata {
    /// Description followed by the hashtag line, as used for publishing.
    pub fn description_with_hashtags(&self) -> String {
        if self.hashtags.is_empty() {
            self.description.clone()
        } else {
            format!("{}\n\n{}", self.description, self.hashtags.join(" "))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn description_with_hashtags_appends_tag_line() {
        let meta = ContentMetadata {
            title: "t".into(),
            description: "A fact about honey.".into(),
            tags: vec!["honey".into()],
            hashtags: vec!["#shorts".into(), "#facts".into()],
        };
        assert_eq!(
            meta.description_with_hashtags(),
            "A fact about honey.\n\n#shorts #facts"
        );
    }

    #[test]
    fn missing_tag_arrays_default_to_empty() {
        let meta: ContentMetadata =
            serde_json::from_str(r#"{"title":"t","description":"d"}"#).unwrap();
        assert!(meta.tags.is_empty());
        assert!(meta.hashtags.is_empty());
    }
}
