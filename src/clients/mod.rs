pub mod primary_vision;
pub mod secondary_vision;

pub use primary_vision::{PrimaryVisionClient, PrimaryVisionConfig};
pub use secondary_vision::{SecondaryVisionClient, SecondaryVisionConfig};

const MAX_ERROR_BODY_LENGTH: usize = 500;

/// エラーレスポンス本文を切り詰める。
fn truncate_body(body: &str) -> String {
    let char_count = body.chars().count();
    if char_count <= MAX_ERROR_BODY_LENGTH {
        return body.to_string();
    }
    let truncated: String = body.chars().take(MAX_ERROR_BODY_LENGTH).collect();
    format!("{truncated}... (truncated, {char_count} chars)")
}
