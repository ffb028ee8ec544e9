// https://tools.ietf.org/html/rfc2047

use base64::{engine::general_purpose::STANDARD, Engine as _};

const PREFIX: &str = "=?utf-8?b?";
const SUFFIX: &str = "?=";

/// Bytes of input per encoded word, keeps each word under 76 columns
const MAX_CHUNK_LEN: usize = 45;

fn allowed_char(c: char) -> bool {
    matches!(c as u32, 1..=9 | 11 | 12 | 14..=127)
}

/// Encodes `s` as a sequence of `utf-8` base64 encoded words, if needed
///
/// Text that already looks like an encoded word is encoded too, so readers
/// don't decode it.
pub(crate) fn encode(s: &str) -> String {
    if s.chars().all(allowed_char) && !s.contains("=?") {
        return s.into();
    }

    let mut words = Vec::new();
    let mut chunk_start = 0;
    for (i, c) in s.char_indices() {
        if i + c.len_utf8() - chunk_start > MAX_CHUNK_LEN {
            words.push(&s[chunk_start..i]);
            chunk_start = i;
        }
    }
    words.push(&s[chunk_start..]);

    words
        .into_iter()
        .map(|word| format!("{PREFIX}{}{SUFFIX}", STANDARD.encode(word)))
        .collect::<Vec<_>>()
        .join("\r\n ")
}
