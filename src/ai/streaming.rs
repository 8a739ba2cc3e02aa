use bytes::Bytes;
use futures_util::{Stream, StreamExt};
use serde::Deserialize;
use std::ops::ControlFlow;

/// One NDJSON record of a streamed `/api/generate` answer.
#[derive(Debug, Deserialize)]
struct GenerateChunk {
    response: Option<String>,
    #[serde(default)]
    done: bool,
    error: Option<String>,
}

/// Text accumulated from a streamed model answer.
#[derive(Debug, Default)]
pub struct ModelAnswer {
    text: String,
    done: bool,
    error: Option<String>,
    chunks: usize,
}

impl ModelAnswer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one line of the stream. Breaks once the answer is complete or the model
    /// reported an error; blank and unparsable lines are skipped.
    pub fn feed_line(&mut self, line: &str) -> ControlFlow<()> {
        if self.is_finished() {
            return ControlFlow::Break(());
        }

        let line = line.trim();
        if line.is_empty() {
            return ControlFlow::Continue(());
        }

        let chunk: GenerateChunk = match serde_json::from_str(line) {
            Ok(chunk) => chunk,
            Err(e) => {
                let preview: String = line.chars().take(100).collect();
                log::debug!("Skipping malformed stream line ({}): {}", e, preview);
                return ControlFlow::Continue(());
            }
        };

        self.chunks += 1;
        if let Some(fragment) = chunk.response {
            log::debug!(
                "Chunk {}: {}...",
                self.chunks,
                fragment.chars().take(30).collect::<String>()
            );
            self.text.push_str(&fragment);
        }

        if let Some(error) = chunk.error {
            log::error!("Error in model stream: {}", error);
            self.error = Some(error);
            return ControlFlow::Break(());
        }

        if chunk.done {
            log::debug!("Response complete after {} chunks", self.chunks);
            self.done = true;
            return ControlFlow::Break(());
        }

        ControlFlow::Continue(())
    }

    pub fn is_finished(&self) -> bool {
        self.done || self.error.is_some()
    }

    pub fn is_done(&self) -> bool {
        self.done
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn chunk_count(&self) -> usize {
        self.chunks
    }

    /// Trimmed answer text, or `None` when nothing usable arrived.
    pub fn text(&self) -> Option<&str> {
        let text = self.text.trim();
        (!text.is_empty()).then_some(text)
    }
}

/// Collect a chunked byte stream, splitting on newlines. Chunk boundaries may fall
/// anywhere, including inside a multi-byte character.
pub async fn collect_stream<S, E>(stream: S) -> Result<ModelAnswer, E>
where
    S: Stream<Item = Result<Bytes, E>>,
{
    futures_util::pin_mut!(stream);
    let mut answer = ModelAnswer::new();
    let mut buffer: Vec<u8> = Vec::new();

    while let Some(chunk) = stream.next().await {
        buffer.extend_from_slice(&chunk?);

        while let Some(pos) = buffer.iter().position(|&b| b == b'\n') {
            let line: Vec<u8> = buffer.drain(..=pos).collect();
            if answer
                .feed_line(&String::from_utf8_lossy(&line))
                .is_break()
            {
                return Ok(answer);
            }
        }
    }

    if !buffer.is_empty() {
        answer.feed_line(&String::from_utf8_lossy(&buffer));
    }

    Ok(answer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures_util::stream;
    use std::convert::Infallible;

    fn collect_lines<I, S>(lines: I) -> ModelAnswer
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut answer = ModelAnswer::new();
        for line in lines {
            if answer.feed_line(line.as_ref()).is_break() {
                break;
            }
        }
        answer
    }

    #[test]
    fn concatenates_fragments_until_done() {
        let answer = collect_lines([
            r#"{"response": "2. The person", "done": false}"#,
            "",
            r#"{"response": " is typing.", "done": false}"#,
            r#"{"response": "", "done": true}"#,
            r#"{"response": " ignored after done"}"#,
        ]);
        assert!(answer.is_done());
        assert_eq!(answer.text(), Some("2. The person is typing."));
        assert_eq!(answer.chunk_count(), 3);
    }

    #[test]
    fn malformed_lines_are_skipped() {
        let answer = collect_lines([
            "{not json at all",
            r#"{"response": "Eating "}"#,
            r#"{"response": "lunch"}"#,
            r#"{"done": true}"#,
        ]);
        assert_eq!(answer.text(), Some("Eating lunch"));
        assert!(answer.error().is_none());
    }

    #[test]
    fn error_record_stops_collection() {
        let answer = collect_lines([
            r#"{"response": "4"}"#,
            r#"{"error": "model 'llava' not found"}"#,
            r#"{"response": " more"}"#,
        ]);
        assert_eq!(answer.error(), Some("model 'llava' not found"));
        assert!(!answer.is_done());
        assert_eq!(answer.text(), Some("4"));
    }

    #[test]
    fn empty_stream_has_no_text_and_no_error() {
        let answer = collect_lines(Vec::<String>::new());
        assert_eq!(answer.text(), None);
        assert!(answer.error().is_none());

        let blank = collect_lines([r#"{"response": "  \n "}"#, r#"{"done": true}"#]);
        assert_eq!(blank.text(), None);
    }

    #[tokio::test]
    async fn stream_reassembles_lines_split_across_chunks() {
        let body = "{\"response\": \"Drinking ☕\"}\n{\"response\": \" tea\"}\n{\"done\": true}\n";
        let bytes = body.as_bytes();
        // Split inside the multi-byte character as well as mid-record.
        let split = body.find('☕').unwrap() + 1;
        let chunks: Vec<Result<Bytes, Infallible>> = vec![
            Ok(Bytes::copy_from_slice(&bytes[..split])),
            Ok(Bytes::copy_from_slice(&bytes[split..split + 7])),
            Ok(Bytes::copy_from_slice(&bytes[split + 7..])),
        ];

        let answer = collect_stream(stream::iter(chunks)).await.unwrap();
        assert!(answer.is_done());
        assert_eq!(answer.text(), Some("Drinking ☕ tea"));
    }

    #[tokio::test]
    async fn stream_flushes_unterminated_last_line() {
        let chunks: Vec<Result<Bytes, Infallible>> = vec![
            Ok(Bytes::from_static(b"{\"response\": \"Sleeping\"}\n")),
            Ok(Bytes::from_static(b"{\"response\": \" soundly\"}")),
        ];

        let answer = collect_stream(stream::iter(chunks)).await.unwrap();
        assert!(!answer.is_done());
        assert_eq!(answer.text(), Some("Sleeping soundly"));
    }

    #[tokio::test]
    async fn stream_errors_propagate() {
        let chunks: Vec<Result<Bytes, &str>> = vec![
            Ok(Bytes::from_static(b"{\"response\": \"partial\"}\n")),
            Err("connection reset"),
        ];

        let result = collect_stream(stream::iter(chunks)).await;
        assert_eq!(result.unwrap_err(), "connection reset");
    }
}
