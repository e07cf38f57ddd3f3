use crate::utils::{first_sentence, truncate_chars};
use common_types::{CaptionResult, CaptionStyle};

pub const SHORT_MAX_CHARS: usize = 100;
pub const ALT_MAX_CHARS: usize = 150;
pub const CREATIVE_EXCERPT_CHARS: usize = 50;
pub const CREATIVE_PREFIX: &str = "Visual: ";

/// Reformats one backend description into the requested caption styles.
///
/// `max_length` must already be clamped. Styles that were not requested stay `None`.
#[must_use]
pub fn derive_styles(base_caption: &str, styles: &[CaptionStyle], max_length: usize) -> CaptionResult {
    let mut result = CaptionResult::default();
    if base_caption.is_empty() {
        return result;
    }

    let cleaned = base_caption.trim();
    for style in styles {
        match style {
            CaptionStyle::Short => {
                result.short = Some(truncate_chars(first_sentence(cleaned), SHORT_MAX_CHARS).to_string());
            }
            CaptionStyle::Detailed => {
                result.detailed = Some(truncate_chars(cleaned, max_length).to_string());
            }
            CaptionStyle::Alt => {
                let lowered = first_sentence(cleaned).to_lowercase();
                result.alt = Some(truncate_chars(&lowered, ALT_MAX_CHARS).to_string());
            }
            CaptionStyle::Creative => {
                let excerpt = truncate_chars(cleaned, CREATIVE_EXCERPT_CHARS);
                result.creative = Some(format!("{CREATIVE_PREFIX}{excerpt}..."));
            }
        }
    }
    result
}
