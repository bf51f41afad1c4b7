use crate::token::is_valid_token;

pub static CONTENT_LENGTH: &str = "Content-Length";

static HEADERS_WITH_NUMBER_VALUES: [&str; 1] = [CONTENT_LENGTH];

pub fn is_header_valid(header_name: &str, header_value: &str) -> bool {
    if !is_valid_token(header_name) {
        return false;
    }

    // a bare CR or LF in the value would split the header block
    if header_value.contains(['\r', '\n']) {
        return false;
    }

    if HEADERS_WITH_NUMBER_VALUES
        .iter()
        .any(|name| name.eq_ignore_ascii_case(header_name))
    {
        return header_value.parse::<usize>().is_ok();
    }

    true
}
