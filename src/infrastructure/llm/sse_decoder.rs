/// Incremental decoder for `text/event-stream` bodies. Network chunks may
/// split a line anywhere, so bytes are buffered until a newline arrives.
#[derive(Debug, Default)]
pub struct SseDecoder {
    buffer: Vec<u8>,
}

impl SseDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feeds a chunk and returns the `data:` payloads of all lines it completed.
    pub fn push(&mut self, chunk: &[u8]) -> Vec<String> {
        self.buffer.extend_from_slice(chunk);

        let mut payloads = Vec::new();
        while let Some(pos) = self.buffer.iter().position(|b| *b == b'\n') {
            let line: Vec<u8> = self.buffer.drain(..=pos).collect();
            if let Some(data) = data_payload(&line) {
                payloads.push(data);
            }
        }
        payloads
    }

    /// Flushes a trailing line that was not newline-terminated.
    pub fn finish(&mut self) -> Option<String> {
        let line = std::mem::take(&mut self.buffer);
        data_payload(&line)
    }
}

fn data_payload(line: &[u8]) -> Option<String> {
    let text = String::from_utf8_lossy(line);
    let text = text.trim_end_matches(['\n', '\r']);
    let data = text.strip_prefix("data:")?;
    Some(data.strip_prefix(' ').unwrap_or(data).to_string())
}
