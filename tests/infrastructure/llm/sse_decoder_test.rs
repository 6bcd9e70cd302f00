use audiogist::infrastructure::llm::SseDecoder;

#[test]
fn given_complete_lines_when_pushing_then_returns_data_payloads() {
    let mut decoder = SseDecoder::new();

    let payloads = decoder.push(b"data: first\n\ndata: second\n\n");

    assert_eq!(payloads, vec!["first", "second"]);
}

#[test]
fn given_line_split_across_chunks_when_pushing_then_payload_emitted_once_complete() {
    let mut decoder = SseDecoder::new();

    assert!(decoder.push(b"data: {\"choices\":[{\"del").is_empty());
    let payloads = decoder.push(b"ta\":{}}]}\n");

    assert_eq!(payloads, vec![r#"{"choices":[{"delta":{}}]}"#]);
}

#[test]
fn given_crlf_and_no_space_when_pushing_then_payload_is_clean() {
    let mut decoder = SseDecoder::new();

    let payloads = decoder.push(b"data:[DONE]\r\n");

    assert_eq!(payloads, vec!["[DONE]"]);
}

#[test]
fn given_non_data_lines_when_pushing_then_ignored() {
    let mut decoder = SseDecoder::new();

    let payloads = decoder.push(b": keep-alive\nevent: message\nid: 7\ndata: kept\n");

    assert_eq!(payloads, vec!["kept"]);
}

#[test]
fn given_unterminated_trailing_line_when_finishing_then_flushed() {
    let mut decoder = SseDecoder::new();
    assert!(decoder.push(b"data: tail").is_empty());

    assert_eq!(decoder.finish(), Some("tail".to_string()));
    assert_eq!(decoder.finish(), None);
}
