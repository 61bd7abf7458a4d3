//! Domain-specific assertion macros for sqm-bot harnesses.
//!
//! These wrap `pretty_assertions` and add context-rich failure messages that
//! make it clear *which* pipeline invariant was violated.

// ---------------------------------------------------------------------------
// Chunk assertions
// ---------------------------------------------------------------------------

/// Assert that newline-joining `chunks` gives back `text` exactly.
///
/// ```rust
/// assert_rejoins!(chunks, text);
/// ```
#[macro_export]
macro_rules! assert_rejoins {
    ($chunks:expr, $text:expr) => {{
        let chunks: &[String] = &$chunks;
        let text: &str = &$text;
        let rejoined = chunks.join("\n");
        if rejoined != text {
            panic!(
                "assert_rejoins! failed: {} chunks do not rebuild the input.\n  input len:    {}\n  rejoined len: {}",
                chunks.len(),
                text.chars().count(),
                rejoined.chars().count()
            );
        }
    }};
}

/// Assert that every chunk is within `max` chars unless it is a single line
/// that alone exceeds `max`.
#[macro_export]
macro_rules! assert_chunks_bounded {
    ($chunks:expr, $max:expr) => {{
        let chunks: &[String] = &$chunks;
        let max: usize = $max;
        for (i, chunk) in chunks.iter().enumerate() {
            let len = chunk.chars().count();
            if len > max && chunk.contains('\n') {
                panic!(
                    "assert_chunks_bounded! failed: chunk {} has {} chars (> {}) and {} lines",
                    i,
                    len,
                    max,
                    chunk.split('\n').count()
                );
            }
        }
    }};
}

// ---------------------------------------------------------------------------
// Dataset assertions
// ---------------------------------------------------------------------------

/// Assert the incident ids of a dataset, in order.
///
/// ```rust
/// assert_incidents!(filtered, ["INC1", "INC3"]);
/// ```
#[macro_export]
macro_rules! assert_incidents {
    ($dataset:expr, [$($id:expr),* $(,)?]) => {{
        let dataset: &sqm_core::Dataset = &$dataset;
        let actual: Vec<String> = dataset
            .rows()
            .iter()
            .map(|r| r.get("incident").map(|v| v.to_string()).unwrap_or_default())
            .collect();
        let expected: Vec<String> = vec![$($id.to_string()),*];
        pretty_assertions::assert_eq!(actual, expected, "assert_incidents! failed");
    }};
}

// ---------------------------------------------------------------------------
// Delivery assertions
// ---------------------------------------------------------------------------

/// Assert that exactly one recorded message went to `chat` and return it.
#[macro_export]
macro_rules! assert_single_message_to {
    ($messages:expr, $chat:expr) => {{
        let messages: Vec<$crate::common::SentMessage> = $messages;
        let chat: &str = $chat;
        let to_chat: Vec<_> = messages.iter().filter(|m| m.chat_id == chat).cloned().collect();
        if to_chat.len() != 1 {
            panic!(
                "assert_single_message_to! failed: expected 1 message to {:?}, got {}.\n  all messages: {:#?}",
                chat,
                to_chat.len(),
                messages
            );
        }
        to_chat.into_iter().next().unwrap()
    }};
}
