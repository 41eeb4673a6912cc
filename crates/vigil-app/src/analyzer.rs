//! Filename heuristic media analyzer.
//!
//! A stand-in for a real vision or speech backend. It scores an upload
//! from its file name alone: a stable pseudo-random factor derived from the
//! name plus a fixed bonus when the name carries an explicit-content term.
//! Good enough to drive the moderation workflow end to end.

use async_trait::async_trait;
use tracing::debug;
use vigil_core::{AnalysisError, AnalysisResult, ContentType, MediaAnalyzer, MediaUpload, Tier};

/// Added to the score when the file name carries an explicit term.
const TERM_BONUS: f32 = 0.4;

const VISUAL_TERMS: &[&str] = &["nude", "explicit", "xxx", "adult", "nsfw", "porn"];
const AUDIO_TERMS: &[&str] = &["explicit", "xxx", "adult", "nsfw", "porn", "obscene"];

/// Per-media-type weights and thresholds.
struct Profile {
    noun: &'static str,
    weight: f32,
    harmful_above: f32,
    suspicious_above: f32,
    terms: &'static [&'static str],
}

static IMAGE: Profile = Profile {
    noun: "image",
    weight: 0.7,
    harmful_above: 0.7,
    suspicious_above: 0.4,
    terms: VISUAL_TERMS,
};

static VIDEO: Profile = Profile {
    noun: "video",
    weight: 0.5,
    harmful_above: 0.6,
    suspicious_above: 0.3,
    terms: VISUAL_TERMS,
};

static AUDIO: Profile = Profile {
    noun: "audio",
    weight: 0.5,
    harmful_above: 0.6,
    suspicious_above: 0.3,
    terms: AUDIO_TERMS,
};

/// Scores image, video, or audio uploads by file name.
pub struct FilenameHeuristicAnalyzer {
    content_type: ContentType,
    profile: &'static Profile,
}

impl FilenameHeuristicAnalyzer {
    /// Creates an analyzer for one media type. Returns `None` for text.
    pub fn for_type(content_type: ContentType) -> Option<Self> {
        let profile = match content_type {
            ContentType::Image => &IMAGE,
            ContentType::Video => &VIDEO,
            ContentType::Audio => &AUDIO,
            ContentType::Text => return None,
        };

        Some(Self {
            content_type,
            profile,
        })
    }

    fn score(&self, file_name: &str) -> f32 {
        let name = file_name.to_lowercase();

        let hash: u64 = name.encode_utf16().map(u64::from).sum();
        let factor = (hash % 10) as f32 / 10.0;

        let mut score = factor * self.profile.weight;
        if self.profile.terms.iter().any(|t| name.contains(t)) {
            score += TERM_BONUS;
        }
        score
    }

    fn check_mime(&self, upload: &MediaUpload) -> Result<(), AnalysisError> {
        let Some(ref mime) = upload.mime_type else {
            return Ok(());
        };

        let top_level = mime.split('/').next().unwrap_or_default();
        if top_level != self.content_type.as_str() {
            return Err(AnalysisError::Unsupported(format!(
                "{} is not {} content",
                mime, self.profile.noun
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl MediaAnalyzer for FilenameHeuristicAnalyzer {
    async fn analyze(&self, upload: &MediaUpload) -> Result<AnalysisResult, AnalysisError> {
        if upload.bytes.is_empty() {
            return Err(AnalysisError::Unreadable(format!(
                "{} is empty",
                upload.file_name
            )));
        }
        self.check_mime(upload)?;

        let score = self.score(&upload.file_name);
        let noun = self.profile.noun;
        debug!(file = %upload.file_name, size = upload.size(), score, "Scored upload");

        let result = if score > self.profile.harmful_above {
            AnalysisResult::new(
                Tier::Harmful,
                score,
                format!(
                    "Potential explicit content detected. The {} appears to contain elements that violate content guidelines.",
                    noun
                ),
            )
        } else if score > self.profile.suspicious_above {
            AnalysisResult::new(
                Tier::Suspicious,
                score,
                format!(
                    "Some concerning elements detected. This {} requires human review to determine appropriateness.",
                    noun
                ),
            )
        } else {
            AnalysisResult::new(
                Tier::Safe,
                1.0 - score,
                format!(
                    "No explicit content detected. The {} appears to comply with content guidelines.",
                    noun
                ),
            )
        };

        Ok(result)
    }

    fn name(&self) -> &'static str {
        "filename-heuristic"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio_test::block_on;

    fn analyze(content_type: ContentType, name: &str) -> Result<AnalysisResult, AnalysisError> {
        let analyzer = FilenameHeuristicAnalyzer::for_type(content_type).unwrap();
        let upload = MediaUpload::new(name, None, vec![0u8; 16]);
        block_on(analyzer.analyze(&upload))
    }

    #[test]
    fn test_no_analyzer_for_text() {
        assert!(FilenameHeuristicAnalyzer::for_type(ContentType::Text).is_none());
    }

    #[test]
    fn test_plain_image_is_safe() {
        // "cat.png" hashes to 3: 0.3 * 0.7
        let result = analyze(ContentType::Image, "cat.png").unwrap();
        assert_eq!(result.tier, Tier::Safe);
        assert!((result.confidence - 0.79).abs() < 1e-5);
        assert!(result.details.contains("The image appears to comply"));
    }

    #[test]
    fn test_high_hash_image_is_suspicious() {
        // "cats.png" hashes to 8: 0.8 * 0.7
        let result = analyze(ContentType::Image, "cats.png").unwrap();
        assert_eq!(result.tier, Tier::Suspicious);
        assert!(result.details.contains("requires human review"));
    }

    #[test]
    fn test_explicit_term_image_is_harmful() {
        let result = analyze(ContentType::Image, "NSFW.png").unwrap();
        assert_eq!(result.tier, Tier::Harmful);
        assert!(result.confidence > 0.7);
    }

    #[test]
    fn test_video_thresholds() {
        assert_eq!(analyze(ContentType::Video, "clip.mp4").unwrap().tier, Tier::Safe);
        let result = analyze(ContentType::Video, "xxx.mp4").unwrap();
        assert_eq!(result.tier, Tier::Harmful);
        assert!(result.details.contains("The video appears"));
    }

    #[test]
    fn test_name_is_deterministic() {
        let a = analyze(ContentType::Audio, "podcast.mp3").unwrap();
        let b = analyze(ContentType::Audio, "podcast.mp3").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_empty_file_is_unreadable() {
        let analyzer = FilenameHeuristicAnalyzer::for_type(ContentType::Image).unwrap();
        let upload = MediaUpload::new("cat.png", None, Vec::new());
        let result = block_on(analyzer.analyze(&upload));
        assert!(matches!(result, Err(AnalysisError::Unreadable(_))));
    }

    #[test]
    fn test_mime_mismatch_is_unsupported() {
        let analyzer = FilenameHeuristicAnalyzer::for_type(ContentType::Video).unwrap();
        let upload = MediaUpload::new("notes.mp4", Some("text/plain".into()), vec![1]);
        let result = block_on(analyzer.analyze(&upload));
        assert!(matches!(result, Err(AnalysisError::Unsupported(_))));
    }
}
