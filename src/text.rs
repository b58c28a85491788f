/// Normalizes review text: any whitespace separated token containing an
/// upper-case character is lower-cased as a whole, other tokens are kept as
/// they are. Tokens are rejoined with single spaces.
pub fn normalize_review(text: &str) -> String {
    text.split_whitespace()
        .map(|token| {
            if token.chars().any(char::is_uppercase) {
                token.to_lowercase()
            } else {
                token.to_owned()
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
