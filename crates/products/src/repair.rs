//! Repair of doubly-encoded text.
//!
//! Some feeds arrive as UTF-8 bytes that were decoded once as Windows-1252
//! (or Latin-1), e.g. `"GrÃ¶ÃŸe"` instead of `"Größe"`. Reversing that mistake
//! means encoding the text back to Windows-1252 and decoding the bytes as
//! UTF-8 again.

use std::borrow::Cow;

use encoding_rs::{UTF_8, WINDOWS_1252};

/// Best-effort repair of mis-decoded UTF-8.
///
/// Never fails: text that is plain ASCII, contains characters with no
/// Windows-1252 code, or does not re-decode as UTF-8 is returned unchanged.
pub fn repair_text(input: &str) -> Cow<'_, str> {
    if input.is_ascii() {
        return Cow::Borrowed(input);
    }

    let (bytes, _, unmappable) = WINDOWS_1252.encode(input);
    if unmappable {
        return Cow::Borrowed(input);
    }

    match UTF_8.decode_without_bom_handling_and_without_replacement(&bytes) {
        Some(repaired) if repaired != input => Cow::Owned(repaired.into_owned()),
        _ => Cow::Borrowed(input),
    }
}
