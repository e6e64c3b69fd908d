//! Fixed cover prompt templates.

use super::models::{CoverImage, CoverPrompt};
use crate::analysis::AnalysisResult;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoverStyle {
    MinimalProfessional,
    ColorfulEnergetic,
    ArtisticCreative,
    GenreMatched,
}

impl CoverStyle {
    pub const ALL: [CoverStyle; 4] = [
        CoverStyle::MinimalProfessional,
        CoverStyle::ColorfulEnergetic,
        CoverStyle::ArtisticCreative,
        CoverStyle::GenreMatched,
    ];

    /// Display title.
    pub fn title(&self) -> &'static str {
        match self {
            CoverStyle::MinimalProfessional => "מינימליסטי ומקצועי",
            CoverStyle::ColorfulEnergetic => "צבעוני ואנרגטי",
            CoverStyle::ArtisticCreative => "אומנותי ויצירתי",
            CoverStyle::GenreMatched => "מותאם לז'אנר",
        }
    }

    /// Short label for logs and metrics.
    pub fn slug(&self) -> &'static str {
        match self {
            CoverStyle::MinimalProfessional => "minimal_professional",
            CoverStyle::ColorfulEnergetic => "colorful_energetic",
            CoverStyle::ArtisticCreative => "artistic_creative",
            CoverStyle::GenreMatched => "genre_matched",
        }
    }

    pub fn prompt_text(&self, analysis: &AnalysisResult) -> String {
        let keywords = analysis.keywords.join(", ");
        match self {
            CoverStyle::MinimalProfessional => format!(
                "Create a 1:1 2K professional minimalistic podcast cover. Topic: {}, Mood: {}, Genre: {}, Audience: {}, Keywords: {}",
                analysis.topic, analysis.mood, analysis.genre, analysis.audience, keywords
            ),
            CoverStyle::ColorfulEnergetic => format!(
                "Create a 1:1 2K colorful and energetic podcast cover. Topic: {}, Mood: {}, Genre: {}, Audience: {}",
                analysis.topic, analysis.mood, analysis.genre, analysis.audience
            ),
            CoverStyle::ArtisticCreative => format!(
                "Create a 1:1 2K artistic and creative podcast cover inspired by {}",
                analysis.topic
            ),
            CoverStyle::GenreMatched => format!(
                "Create a 1:1 2K cover according to genre: {}, Mood: {}, Keywords: {}",
                analysis.genre, analysis.mood, keywords
            ),
        }
    }

    pub fn prompt(&self, analysis: &AnalysisResult) -> CoverPrompt {
        CoverPrompt {
            title: self.title().to_string(),
            prompt_text: self.prompt_text(analysis),
        }
    }
}

/// The four prompts, in display order.
pub fn cover_prompts(analysis: &AnalysisResult) -> Vec<(CoverStyle, CoverPrompt)> {
    CoverStyle::ALL
        .iter()
        .map(|style| (*style, style.prompt(analysis)))
        .collect()
}

/// 1x1 PNG used for offline covers.
pub const PLACEHOLDER_PNG: &[u8] = &[
    0x89, 0x50, 0x4e, 0x47, 0x0d, 0x0a, 0x1a, 0x0a, 0x00, 0x00, 0x00, 0x0d, 0x49, 0x48, 0x44, 0x52,
    0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x01, 0x08, 0x04, 0x00, 0x00, 0x00, 0xb5, 0x1c, 0x0c,
    0x02, 0x00, 0x00, 0x00, 0x0b, 0x49, 0x44, 0x41, 0x54, 0x78, 0x9c, 0x63, 0x60, 0x60, 0x00, 0x00,
    0x00, 0x03, 0x00, 0x01, 0x2b, 0x09, 0x4d, 0x84, 0x00, 0x00, 0x00, 0x00, 0x49, 0x45, 0x4e, 0x44,
    0xae, 0x42, 0x60, 0x82,
];

/// Three placeholder covers, one per non-genre style.
pub fn placeholder_covers() -> Vec<CoverImage> {
    CoverStyle::ALL[..3]
        .iter()
        .map(|style| CoverImage {
            title: style.title().to_string(),
            image_bytes: PLACEHOLDER_PNG.to_vec(),
        })
        .collect()
}
