use tracing::debug;

use crate::{error::Error, provider::ChatTransport};

/// Splits `text` into transport-safe pieces no longer than `max_len` bytes.
/// Cuts prefer the rightmost blank line inside the window, then the
/// rightmost newline, then a hard cut snapped back to a char boundary.
/// Leading whitespace is trimmed off each remainder.
pub fn split_chunks(text: &str, max_len: usize) -> Vec<&str> {
    let max_len = max_len.max(1);
    let mut chunks = Vec::new();
    let mut rest = text;

    while !rest.is_empty() {
        if rest.len() <= max_len {
            chunks.push(rest);
            break;
        }

        let mut window = max_len;
        while !rest.is_char_boundary(window) {
            window -= 1;
        }

        let cut = newline_cut(rest, "\n\n", max_len)
            .or_else(|| newline_cut(rest, "\n", max_len))
            .unwrap_or(window);

        chunks.push(&rest[..cut]);
        rest = rest[cut..].trim_start();
    }

    chunks
}

// Rightmost occurrence of `pattern` starting at or before `max_len`, so the
// resulting chunk never exceeds the limit. Index 0 would produce an empty
// chunk and is ignored.
fn newline_cut(text: &str, pattern: &str, max_len: usize) -> Option<usize> {
    text.match_indices(pattern)
        .take_while(|(idx, _)| *idx <= max_len)
        .map(|(idx, _)| idx)
        .filter(|&idx| idx > 0)
        .last()
}

/// Delivers the report strictly in order, one chunk per send, awaiting each
/// call so the destination channel sees the pieces in sequence. The first
/// failed send aborts the rest; already-sent chunks stay sent.
pub async fn send_in_chunks(
    transport: &dyn ChatTransport,
    text: &str,
    max_len: usize,
) -> Result<(), Error> {
    let chunks = split_chunks(text, max_len);
    let total = chunks.len();

    for (index, chunk) in chunks.into_iter().enumerate() {
        transport.send_message(chunk).await?;
        debug!("delivered chunk {}/{}", index + 1, total);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;

    use super::*;

    #[derive(Default)]
    struct RecordingTransport {
        sent: Arc<Mutex<Vec<String>>>,
        fail_after: Option<usize>,
    }

    #[async_trait]
    impl ChatTransport for RecordingTransport {
        async fn send_message(&self, text: &str) -> Result<(), Error> {
            let mut sent = self.sent.lock().unwrap();
            if let Some(limit) = self.fail_after {
                if sent.len() >= limit {
                    return Err(Error::DeliveryError(String::from(
                        "transport down",
                    )));
                }
            }
            sent.push(String::from(text));
            Ok(())
        }
    }

    #[test]
    fn short_text_is_a_single_chunk() {
        let chunks = split_chunks("hello world", 4000);
        assert_eq!(chunks, vec!["hello world"]);
    }

    #[test]
    fn splits_at_paragraph_boundary() {
        let text = "aaaa\n\nbbbb\n\ncccc";
        let chunks = split_chunks(text, 11);

        assert_eq!(chunks, vec!["aaaa\n\nbbbb", "cccc"]);
    }

    #[test]
    fn falls_back_to_line_boundary() {
        let text = "aaaa\nbbbb\ncccc";
        let chunks = split_chunks(text, 11);

        assert_eq!(chunks, vec!["aaaa\nbbbb", "cccc"]);
    }

    #[test]
    fn hard_cuts_when_no_newline_fits() {
        let text = "abcdefghij";
        let chunks = split_chunks(text, 4);

        assert_eq!(chunks, vec!["abcd", "efgh", "ij"]);
    }

    #[test]
    fn hard_cut_respects_char_boundaries() {
        let text = "ééééé";
        let chunks = split_chunks(text, 3);

        for chunk in &chunks {
            assert!(!chunk.is_empty());
        }
        assert_eq!(chunks.concat(), text);
    }

    #[test]
    fn remainder_has_leading_whitespace_trimmed() {
        let text = "aaaa\n\n\nbbbb";
        let chunks = split_chunks(text, 6);

        assert_eq!(chunks, vec!["aaaa\n", "bbbb"]);
    }

    #[test]
    fn never_splits_inside_bold_tags_of_record_blocks() {
        let mut text = String::new();
        for i in 0..20 {
            text.push_str(&format!(
                "<b>Protocol {}</b> (+12.{}%) → <b>$1.0{}B</b> [Ethereum]\nhttps://defillama.com/protocol/p{}\n\n",
                i, i, i, i
            ));
        }

        for chunk in split_chunks(&text, 300) {
            assert_eq!(
                chunk.matches("<b>").count(),
                chunk.matches("</b>").count(),
                "unbalanced bold tags in chunk: {:?}",
                chunk
            );
        }
    }

    #[tokio::test]
    async fn short_text_issues_exactly_one_send() {
        let transport = RecordingTransport::default();
        let sent = transport.sent.clone();

        send_in_chunks(&transport, "short report", 4000)
            .await
            .unwrap();

        let sent = sent.lock().unwrap();
        assert_eq!(sent.as_slice(), ["short report"]);
    }

    #[tokio::test]
    async fn long_text_is_delivered_in_order() {
        let transport = RecordingTransport::default();
        let sent = transport.sent.clone();

        send_in_chunks(&transport, "one\n\ntwo\n\nthree", 8)
            .await
            .unwrap();

        let sent = sent.lock().unwrap();
        assert_eq!(sent.as_slice(), ["one\n\ntwo", "three"]);
    }

    #[tokio::test]
    async fn first_failure_aborts_remaining_chunks() {
        let transport = RecordingTransport {
            sent: Arc::default(),
            fail_after: Some(1),
        };
        let sent = transport.sent.clone();

        let result =
            send_in_chunks(&transport, "one\n\ntwo\n\nthree", 8).await;

        assert!(matches!(result, Err(Error::DeliveryError(_))));
        assert_eq!(sent.lock().unwrap().len(), 1);
    }
}
