/*!
 * Token normalization.
 *
 * Subtitle text is noisy: punctuation, SFX brackets, quotes and digits stick to
 * words. A token is lowercased and then trimmed of every leading and trailing
 * character outside ASCII `a-z`. Nothing inside the word is touched, so
 * contractions (`don't`) and hyphenated words (`well-known`) survive intact.
 * There is no lemmatization here.
 */

/// Normalize a raw token into its canonical word form.
///
/// Returns an empty string when the token holds no letters, which callers
/// treat as "rejected".
pub fn normalize_token(token: &str) -> String {
    token
        .to_lowercase()
        .trim_matches(|c: char| !c.is_ascii_lowercase())
        .to_string()
}

/// Split text on whitespace runs and yield the non-empty normalized words
pub fn normalized_words(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split_whitespace()
        .map(normalize_token)
        .filter(|word| !word.is_empty())
}
