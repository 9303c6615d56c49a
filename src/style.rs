use serde::{Deserialize, Serialize};

/// The closed set of looks the generation preview can apply to a sketch.
///
/// Serialized with the camelCase tags used in project files and export
/// metadata (`"oilPainting"`, not `"OilPainting"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AiStyle {
    #[default]
    Realistic,
    Cartoon,
    OilPainting,
    Watercolor,
    Sketch,
    Anime,
}

impl AiStyle {
    pub const ALL: [AiStyle; 6] = [
        AiStyle::Realistic,
        AiStyle::Cartoon,
        AiStyle::OilPainting,
        AiStyle::Watercolor,
        AiStyle::Sketch,
        AiStyle::Anime,
    ];

    /// Tag as stored in project files
    pub fn as_str(&self) -> &'static str {
        match self {
            AiStyle::Realistic => "realistic",
            AiStyle::Cartoon => "cartoon",
            AiStyle::OilPainting => "oilPainting",
            AiStyle::Watercolor => "watercolor",
            AiStyle::Sketch => "sketch",
            AiStyle::Anime => "anime",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            AiStyle::Realistic => "Realistic",
            AiStyle::Cartoon => "Cartoon",
            AiStyle::OilPainting => "Oil painting",
            AiStyle::Watercolor => "Watercolor",
            AiStyle::Sketch => "Sketch",
            AiStyle::Anime => "Anime",
        }
    }

    /// Name of the built-in filter this style is rendered with
    pub fn filter_name(&self) -> &'static str {
        match self {
            AiStyle::Realistic => "instant",
            AiStyle::Cartoon => "comic",
            AiStyle::OilPainting => "vignette",
            AiStyle::Watercolor => "transfer",
            AiStyle::Sketch => "mono",
            AiStyle::Anime => "process",
        }
    }
}

impl std::fmt::Display for AiStyle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tags_match_serde_names() {
        for style in AiStyle::ALL {
            let json = serde_json::to_string(&style).unwrap();
            assert_eq!(json, format!("\"{}\"", style.as_str()));
        }
    }

    #[test]
    fn test_every_style_has_distinct_filter() {
        let mut names: Vec<_> = AiStyle::ALL.iter().map(|s| s.filter_name()).collect();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), AiStyle::ALL.len());
    }
}
