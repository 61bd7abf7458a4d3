//! Message chunker — splits long replies into transport-sized pieces.
//!
//! Lines are never split. A line that alone exceeds the budget becomes its
//! own oversized chunk, so callers must not assume every chunk fits. Joining
//! the chunks with `\n` gives back the input exactly.

/// Split `text` into chunks of at most `max_size` chars (Unicode scalar
/// values), breaking only at `\n`.
///
/// Empty input yields no chunks. A `max_size` of zero is treated as one.
pub fn chunk(text: &str, max_size: usize) -> Vec<String> {
    let max_size = max_size.max(1);
    if text.is_empty() {
        return Vec::new();
    }
    if text.chars().count() <= max_size {
        return vec![text.to_string()];
    }

    let mut chunks = Vec::new();
    let mut buffer = String::new();
    let mut buffer_len = 0usize;
    // Distinguishes an empty buffer from one holding a single empty line.
    let mut buffered_lines = 0usize;

    for line in text.split('\n') {
        let line_len = line.chars().count();
        if buffered_lines > 0 && buffer_len + line_len + 1 > max_size {
            chunks.push(std::mem::take(&mut buffer));
            buffer_len = 0;
            buffered_lines = 0;
        }
        if buffered_lines > 0 {
            buffer.push('\n');
            buffer_len += 1;
        }
        buffer.push_str(line);
        buffer_len += line_len;
        buffered_lines += 1;
    }
    if buffered_lines > 0 {
        chunks.push(buffer);
    }
    chunks
}
