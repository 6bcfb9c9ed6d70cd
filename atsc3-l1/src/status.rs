//! Tuner status key/value string parsing.
//!
//! Tuner status is reported as whitespace-separated `key=value` tokens,
//! sometimes spread over several lines (`plpinfo` carries one line per PLP
//! plus a `bsid=` line). Keys the device did not report are simply absent.

use nom::bytes::complete::{tag, take_till, take_till1};
use nom::sequence::separated_pair;
use nom::IResult;

/// Parse one `key=value` token.
fn key_value(input: &str) -> IResult<&str, (&str, &str)> {
    separated_pair(
        take_till1(|c: char| c == '=' || c.is_whitespace()),
        tag("="),
        take_till(|c: char| c.is_whitespace()),
    )(input)
}

/// All `key=value` pairs in a status string, in reported order.
pub fn status_pairs(input: &str) -> Vec<(&str, &str)> {
    input
        .split_whitespace()
        .filter_map(|token| key_value(token).ok().map(|(_, pair)| pair))
        .collect()
}

/// The value of the first `key=` pair, as a string slice.
pub fn find_status_field<'a>(input: &'a str, key: &str) -> Option<&'a str> {
    status_pairs(input)
        .into_iter()
        .find(|(k, _)| *k == key)
        .map(|(_, v)| v)
}

/// The value of the first `key=` pair, parsed as a signed decimal integer.
pub fn find_status_value(input: &str, key: &str) -> Option<i64> {
    find_status_field(input, key).and_then(|v| v.parse().ok())
}
