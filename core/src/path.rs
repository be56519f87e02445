//! Path segment encoding.
//!
//! Everything outside the URL unreserved set is percent-encoded, so a space
//! becomes `%20` and `/` becomes `%2F`. Literal dots are escaped to `%2E` as
//! well, since the API treats `.` and `..` in identifiers as traversal or
//! extension syntax. Encoding is not idempotent: encode each segment once.

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

/// Unreserved characters minus `.`.
const SEGMENT: &AsciiSet = &NON_ALPHANUMERIC.remove(b'-').remove(b'_').remove(b'~');

pub fn encode(segment: &str) -> String {
    utf8_percent_encode(segment, SEGMENT).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dots_and_spaces() {
        assert_eq!(encode("my image.v1.tar"), "my%20image%2Ev1%2Etar");
    }

    #[test]
    fn traversal_is_neutralised() {
        assert_eq!(encode("../etc"), "%2E%2E%2Fetc");
    }

    #[test]
    fn unreserved_pass_through() {
        assert_eq!(encode("srv-01_a~b"), "srv-01_a~b");
    }

    #[test]
    fn utf8_is_percent_encoded() {
        assert_eq!(encode("é"), "%C3%A9");
    }

    #[test]
    fn encoding_twice_double_encodes() {
        assert_eq!(encode(&encode("a b")), "a%2520b");
    }
}
