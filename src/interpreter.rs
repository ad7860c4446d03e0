use crate::error::{MemoraError, Result};
use crate::models::{GenerateContentResponse, GenerationResult, ResultKind};

/// Returned when an analysis reply carries no text.
pub const ANALYSIS_FALLBACK: &str = "Could not analyze the image.";

/// Normalizes a reply into the single payload `expects` asks for.
///
/// Image data is passed through as the service's base64 text.
pub fn interpret(
    response: &GenerateContentResponse,
    expects: ResultKind,
) -> Result<GenerationResult> {
    match expects {
        ResultKind::Image => first_image(response),
        ResultKind::Text => Ok(GenerationResult::Text {
            text: response.text().unwrap_or_else(|| {
                log::warn!("Analysis response had no text, using fallback");
                ANALYSIS_FALLBACK.to_string()
            }),
        }),
    }
}

fn first_image(response: &GenerateContentResponse) -> Result<GenerationResult> {
    let inline = response
        .segments()
        .iter()
        .find_map(|part| part.inline_data.as_ref())
        .ok_or(MemoraError::NoImageInResponse)?;

    Ok(GenerationResult::Image {
        mime_type: inline.mime_type.clone(),
        data: inline.data.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn response(value: serde_json::Value) -> GenerateContentResponse {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_image_after_text_wins() {
        let raw = response(json!({
            "candidates": [{ "content": { "parts": [
                { "text": "Here is your restored photo" },
                { "inlineData": { "mimeType": "image/png", "data": "AAEC" } },
                { "inlineData": { "mimeType": "image/jpeg", "data": "AwQF" } }
            ]}}]
        }));
        let result = interpret(&raw, ResultKind::Image).unwrap();
        assert_eq!(
            result.data_uri().as_deref(),
            Some("data:image/png;base64,AAEC")
        );
    }

    #[test]
    fn test_no_image_fails() {
        let raw = response(json!({
            "candidates": [{ "content": { "parts": [{ "text": "I cannot edit this" }] } }]
        }));
        assert!(matches!(
            interpret(&raw, ResultKind::Image),
            Err(MemoraError::NoImageInResponse)
        ));
        assert!(matches!(
            interpret(&response(json!({})), ResultKind::Image),
            Err(MemoraError::NoImageInResponse)
        ));
    }

    #[test]
    fn test_image_data_is_passed_through_verbatim() {
        let raw = response(json!({
            "candidates": [{ "content": { "parts": [
                { "inlineData": { "mimeType": "image/png", "data": "AAF=" } }
            ]}}]
        }));
        let result = interpret(&raw, ResultKind::Image).unwrap();
        assert_eq!(
            result.data_uri().as_deref(),
            Some("data:image/png;base64,AAF=")
        );
    }

    #[test]
    fn test_first_inline_segment_wins_even_when_empty() {
        let raw = response(json!({
            "candidates": [{ "content": { "parts": [
                { "inlineData": { "mimeType": "image/png", "data": "" } },
                { "inlineData": { "mimeType": "image/jpeg", "data": "AwQF" } }
            ]}}]
        }));
        let result = interpret(&raw, ResultKind::Image).unwrap();
        assert_eq!(result.data_uri().as_deref(), Some("data:image/png;base64,"));
    }

    #[test]
    fn test_analysis_text_and_fallback() {
        let raw = response(json!({
            "candidates": [{ "content": { "parts": [{ "text": "Soft window light." }] } }]
        }));
        assert_eq!(
            interpret(&raw, ResultKind::Text).unwrap().as_text(),
            Some("Soft window light.")
        );

        let empty = response(json!({ "candidates": [] }));
        assert_eq!(
            interpret(&empty, ResultKind::Text).unwrap().as_text(),
            Some(ANALYSIS_FALLBACK)
        );
    }
}
