//! Counter display formatting.
//!
//! Pure presentation layered over the counter value; nothing here feeds back
//! into the counting state machine.

use serde::{Deserialize, Serialize};

fn default_separator() -> Option<char> {
    Some(',')
}

/// How a counter value is shown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CounterFormat {
    /// Text before the number.
    #[serde(default)]
    pub prefix: String,
    /// Text after the number.
    #[serde(default)]
    pub suffix: String,
    /// Thousands separator, `None` for plain digits.
    #[serde(default = "default_separator")]
    pub thousands_separator: Option<char>,
}

impl Default for CounterFormat {
    fn default() -> Self {
        Self {
            prefix: String::new(),
            suffix: String::new(),
            thousands_separator: default_separator(),
        }
    }
}

impl CounterFormat {
    /// Format with a suffix, e.g. `"+"` for `2,745+`.
    #[must_use]
    pub fn with_suffix(suffix: impl Into<String>) -> Self {
        Self {
            suffix: suffix.into(),
            ..Self::default()
        }
    }

    /// Renders `value` with prefix, grouping and suffix.
    #[must_use]
    pub fn format(&self, value: u64) -> String {
        let digits = value.to_string();
        let mut out = String::with_capacity(self.prefix.len() + digits.len() * 4 / 3 + self.suffix.len());
        out.push_str(&self.prefix);

        match self.thousands_separator {
            Some(separator) => {
                let len = digits.len();
                for (i, digit) in digits.chars().enumerate() {
                    if i > 0 && (len - i) % 3 == 0 {
                        out.push(separator);
                    }
                    out.push(digit);
                }
            }
            None => out.push_str(&digits),
        }

        out.push_str(&self.suffix);
        out
    }
}
