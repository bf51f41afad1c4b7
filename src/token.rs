// tchar set from RFC 7230, section 3.2.6, minus ALPHA / DIGIT
static TOKEN_SPECIAL_CHARS: [char; 15] = [
    '!', '#', '$', '%', '&', '\'', '*', '+', '-', '.', '^', '_', '`', '|', '~',
];

pub fn is_valid_token(value: &str) -> bool {
    !value.is_empty()
        && value
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || TOKEN_SPECIAL_CHARS.contains(&c))
}

/// Origin-form target: non-empty, no whitespace or control characters that
/// would end the request line early.
pub fn is_valid_request_target(value: &str) -> bool {
    !value.is_empty()
        && !value
            .chars()
            .any(|c| c.is_ascii_whitespace() || c.is_ascii_control())
}
