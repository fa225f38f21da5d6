use regex::Regex;
use std::sync::OnceLock;

use crate::models::PaymentMethod;

pub const HSA_PREFIX: char = 'R';
pub const FLEX_PREFIX: char = 'F';

fn digits_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\d+").unwrap())
}

/// Split `R12` into `('R', 12)`. The number is the first run of digits.
pub fn parse_receipt_number(raw: &str) -> Option<(char, u32)> {
    let raw = raw.trim();
    let prefix = raw.chars().next()?.to_ascii_uppercase();
    if prefix != HSA_PREFIX && prefix != FLEX_PREFIX {
        return None;
    }
    let digits = digits_re().find(raw)?;
    let number = digits.as_str().parse().ok()?;
    Some((prefix, number))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NextNumbers {
    pub hsa: u32,
    pub flex: u32,
}

impl NextNumbers {
    pub fn suggest(&self, method: PaymentMethod) -> String {
        match method {
            PaymentMethod::HsaAccount => format!("{HSA_PREFIX}{}", self.hsa),
            PaymentMethod::Credit => format!("{FLEX_PREFIX}{}", self.flex),
        }
    }
}

pub fn next_numbers<S: AsRef<str>>(existing: &[S]) -> NextNumbers {
    let mut max_hsa = 0;
    let mut max_flex = 0;
    for (prefix, number) in existing.iter().filter_map(|s| parse_receipt_number(s.as_ref())) {
        if prefix == HSA_PREFIX {
            max_hsa = max_hsa.max(number);
        } else {
            max_flex = max_flex.max(number);
        }
    }
    NextNumbers {
        hsa: max_hsa + 1,
        flex: max_flex + 1,
    }
}
