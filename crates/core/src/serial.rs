//! Serial-number key extraction.
//!
//! Serial numbers arrive in many shapes (`CDL2349-1195`, `CZ5S1000B`,
//! `  1200 `). [`extract_serial_key`] turns one into a comparable integer
//! with an ordered, first-success-wins heuristic:
//!
//! 1. trim whitespace;
//! 2. a digit run at the very end of the string wins;
//! 3. otherwise the **last** digit run anywhere in the string;
//! 4. otherwise the second group of a `<digits>-<digits>` pattern;
//! 5. otherwise every digit character concatenated in order;
//! 6. no digit at all is an extraction failure (`None`).
//!
//! Rules 4 and 5 can only fire when rule 3 did not, which means they never
//! change the result for ASCII input; they are kept so the rule order stays
//! explicit. Only ASCII digits count. A run too large for a `u64` is an
//! extraction failure.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Integer key derived from a serial-number string.
///
/// Not unique: `AB-0100` and `100` share the key `100`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SerialKey(pub u64);

impl SerialKey {
    /// The raw integer value.
    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for SerialKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<u64> for SerialKey {
    fn from(v: u64) -> Self {
        SerialKey(v)
    }
}

type Rule = fn(&str) -> Option<String>;

const RULES: [Rule; 4] = [
    trailing_run,
    last_run,
    dash_separated_second,
    concatenated_digits,
];

/// Extract the comparable key from a serial-number string.
///
/// Returns `None` when the string holds no ASCII digit or the selected
/// digits overflow `u64`.
///
/// ```
/// use serial_label_core::{SerialKey, extract_serial_key};
/// assert_eq!(extract_serial_key("CDL2349-1195"), Some(SerialKey(1195)));
/// assert_eq!(extract_serial_key("CZ5S1000B"), Some(SerialKey(1000)));
/// assert_eq!(extract_serial_key("no digits"), None);
/// ```
pub fn extract_serial_key(serial: &str) -> Option<SerialKey> {
    let serial = serial.trim();
    let digits = RULES.iter().find_map(|rule| rule(serial))?;
    digits.parse::<u64>().ok().map(SerialKey)
}

/// Maximal runs of ASCII digits as `(start, end)` byte ranges.
fn digit_runs(s: &str) -> Vec<(usize, usize)> {
    let bytes = s.as_bytes();
    let mut runs = Vec::new();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i].is_ascii_digit() {
            let start = i;
            while i < bytes.len() && bytes[i].is_ascii_digit() {
                i += 1;
            }
            runs.push((start, i));
        } else {
            i += 1;
        }
    }
    runs
}

fn trailing_run(s: &str) -> Option<String> {
    digit_runs(s)
        .last()
        .filter(|&&(_, end)| end == s.len())
        .map(|&(start, end)| s[start..end].to_string())
}

fn last_run(s: &str) -> Option<String> {
    digit_runs(s)
        .last()
        .map(|&(start, end)| s[start..end].to_string())
}

fn dash_separated_second(s: &str) -> Option<String> {
    let runs = digit_runs(s);
    runs.windows(2).find_map(|pair| {
        let (_, first_end) = pair[0];
        let (second_start, second_end) = pair[1];
        (second_start == first_end + 1 && s.as_bytes()[first_end] == b'-')
            .then(|| s[second_start..second_end].to_string())
    })
}

fn concatenated_digits(s: &str) -> Option<String> {
    let digits: String = s.chars().filter(char::is_ascii_digit).collect();
    (!digits.is_empty()).then_some(digits)
}
