//! Splits completion output into Discord-sized messages.
//!
//! Splits prefer line boundaries; only a single line longer than the limit
//! is sliced mid-line. Lengths are measured in characters, not bytes, so a
//! chunk never lands on a UTF-8 boundary mid-codepoint.

/// Split `text` into chunks of at most `max_len` characters.
///
/// Always returns at least one chunk. Re-chunking a chunk that already fits
/// returns it unchanged.
pub fn chunk_message(text: &str, max_len: usize) -> Vec<String> {
    if text.chars().count() <= max_len {
        return vec![text.to_string()];
    }

    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut current_len = 0usize;

    for line in text.split('\n') {
        let line_len = line.chars().count();
        let separator = usize::from(current_len > 0);

        if current_len + separator + line_len > max_len && current_len > 0 {
            chunks.push(std::mem::take(&mut current));
            current_len = 0;
        }

        if line_len > max_len {
            // A single line over the limit gets sliced; the tail seeds the
            // next buffer so following lines can still pack in behind it.
            let chars: Vec<char> = line.chars().collect();
            let mut start = 0;
            while chars.len() - start > max_len {
                chunks.push(chars[start..start + max_len].iter().collect());
                start += max_len;
            }
            current = chars[start..].iter().collect();
            current_len = chars.len() - start;
        } else {
            if current_len > 0 {
                current.push('\n');
                current_len += 1;
            }
            current.push_str(line);
            current_len += line_len;
        }
    }

    if !current.is_empty() {
        chunks.push(current);
    }

    if chunks.is_empty() {
        chunks.push(text.chars().take(max_len).collect());
    }

    chunks
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_text_is_a_single_chunk() {
        let chunks = chunk_message("hello world", 1900);
        assert_eq!(chunks, vec!["hello world".to_string()]);
    }

    #[test]
    fn every_chunk_respects_the_limit() {
        let text = (0..200)
            .map(|i| format!("line number {} with some padding text", i))
            .collect::<Vec<_>>()
            .join("\n");
        let chunks = chunk_message(&text, 300);

        assert!(!chunks.is_empty());
        for chunk in &chunks {
            assert!(chunk.chars().count() <= 300, "chunk too long: {}", chunk.len());
        }
    }

    #[test]
    fn splits_prefer_line_boundaries() {
        let text = format!("{}\n{}", "x".repeat(1000), "y".repeat(1000));
        let chunks = chunk_message(&text, 1900);

        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0], "x".repeat(1000));
        assert_eq!(chunks[1], "y".repeat(1000));
    }

    #[test]
    fn oversized_line_is_hard_sliced() {
        let text = format!("a\n{}", "b".repeat(3000));
        let chunks = chunk_message(&text, 1900);

        // The short line flushes on its own; the 3000-char line becomes
        // ceil(3000 / 1900) = 2 slices.
        assert_eq!(chunks.len(), 3);
        assert_eq!(chunks[0], "a");
        assert_eq!(chunks[1], "b".repeat(1900));
        assert_eq!(chunks[2], "b".repeat(1100));
    }

    #[test]
    fn rechunking_a_valid_chunk_is_idempotent() {
        let text = (0..100)
            .map(|i| format!("message line {}", i))
            .collect::<Vec<_>>()
            .join("\n");
        let chunks = chunk_message(&text, 500);

        for chunk in &chunks {
            assert_eq!(chunk_message(chunk, 500), vec![chunk.clone()]);
        }
    }

    #[test]
    fn whitespace_only_input_falls_back_to_a_truncated_chunk() {
        let text = "\n".repeat(2500);
        let chunks = chunk_message(&text, 1900);

        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].chars().count(), 1900);
    }

    #[test]
    fn tiny_limit_still_produces_bounded_chunks() {
        let chunks = chunk_message("abcdef", 2);
        assert_eq!(chunks, vec!["ab", "cd", "ef"]);
    }
}
