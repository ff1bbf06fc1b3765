//! Anthropic generator wire format tests.

use serde_json::json;
use tessier::generator::anthropic::{build_request, parse_response};
use tessier::generator::GeneratorError;

#[test]
fn build_request_sets_model_and_instruction() {
    let req = build_request("claude-sonnet", "Build a pricing card");
    assert_eq!(req.model, "claude-sonnet");
    assert_eq!(req.messages.len(), 1);
    assert_eq!(req.messages[0].role, "user");
    assert_eq!(req.messages[0].content, "Build a pricing card");
}

#[test]
fn build_request_system_prompt_pins_the_output_contract() {
    let req = build_request("model", "x");
    assert!(req.system.contains("static imports"));
    assert!(req.system.contains("eval"));
    assert!(req.max_tokens > 0);
}

#[test]
fn request_serializes_to_expected_shape() {
    let req = build_request("claude-sonnet", "Build a badge");
    let value = serde_json::to_value(&req).expect("serialize");
    assert_eq!(value["model"], "claude-sonnet");
    assert_eq!(value["messages"][0]["role"], "user");
    assert!(value["system"].is_string());
    assert!(value["max_tokens"].is_number());
}

#[test]
fn parse_response_extracts_text_content() {
    let body = json!({
        "content": [{"type": "text", "text": "export const X = () => <div />;"}]
    })
    .to_string();
    let source = parse_response(&body).expect("parse");
    assert_eq!(source, "export const X = () => <div />;");
}

#[test]
fn parse_response_unwraps_fenced_code() {
    let body = json!({
        "content": [{
            "type": "text",
            "text": "Here you go:\n```tsx\nexport const X = () => <div />;\n```"
        }]
    })
    .to_string();
    let source = parse_response(&body).expect("parse");
    assert_eq!(source, "export const X = () => <div />;");
}

#[test]
fn parse_response_joins_multiple_text_blocks() {
    let body = json!({
        "content": [
            {"type": "text", "text": "export const X = () => ("},
            {"type": "text", "text": "  <div />\n);"}
        ]
    })
    .to_string();
    let source = parse_response(&body).expect("parse");
    assert!(source.contains("export const X"));
    assert!(source.contains("<div />"));
}

#[test]
fn parse_response_ignores_non_text_blocks() {
    let body = json!({
        "content": [
            {"type": "thinking", "thinking": "..."},
            {"type": "text", "text": "export const X = () => <div />;"}
        ]
    })
    .to_string();
    let source = parse_response(&body).expect("parse");
    assert_eq!(source, "export const X = () => <div />;");
}

#[test]
fn parse_response_with_no_text_is_an_error() {
    let body = json!({"content": []}).to_string();
    let err = parse_response(&body).expect_err("should fail");
    assert!(matches!(err, GeneratorError::Parse(_)));
}

#[test]
fn parse_response_rejects_malformed_json() {
    let err = parse_response("{ not json").expect_err("should fail");
    assert!(matches!(err, GeneratorError::Parse(_)));
}
