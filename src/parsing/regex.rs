use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // Log metadata
    pub static ref RE_TIMESTAMP_PREFIX: Regex = Regex::new(r"^(?P<timestamp>.*?) \[").unwrap();
    pub static ref RE_BRACKETED: Regex = Regex::new(r"\[(?P<inner>[^\]]+)\]").unwrap();

    // Statement fragments
    pub static ref RE_VALUES: Regex = Regex::new(r"(?i)\bVALUES\s*\(").unwrap();
    pub static ref RE_ASSIGNMENT: Regex = Regex::new(
        r"\b(?P<key>\w+)\s*=\s*(?:'(?P<quoted>(?:[^']|'')*)'|(?P<bare>[^\s,'()]+))"
    ).unwrap();
    pub static ref RE_RENEW_INCREMENT: Regex =
        Regex::new(r"^(?i:renew_count)\s*\+\s*(?P<step>\d+)$").unwrap();
}
