//! Request-parameter accessors with encoding repair.
//!
//! Some upstream stacks decode percent-encoded request parameters as
//! ISO-8859-1, which garbles any UTF-8 text into Latin-1 mojibake. The
//! repair re-reads such a value's code points as Latin-1 bytes and decodes
//! them as UTF-8. Values that already contain Japanese or full-width text
//! decoded correctly and are left alone.
//!
//! Handlers consume this directly through [`Params`]; the dispatcher and
//! router never touch it.

use crate::dispatcher::JsonRequest;
use anyhow::{anyhow, Context, Result};

/// True when a parameter value may need the Latin-1 repair.
///
/// A value that already contains kana, CJK ideographs or full-width forms
/// decoded correctly, so repairing it would corrupt it.
#[must_use]
pub fn needs_latin1_repair(value: &str) -> bool {
    !value.chars().any(is_cjk_or_kana)
}

fn is_cjk_or_kana(c: char) -> bool {
    matches!(c,
        '\u{3000}'..='\u{303F}'   // CJK symbols and punctuation
        | '\u{3040}'..='\u{309F}' // hiragana
        | '\u{30A0}'..='\u{30FF}' // katakana
        | '\u{4E00}'..='\u{9FFF}' // CJK unified ideographs
        | '\u{FF00}'..='\u{FFEF}' // halfwidth and fullwidth forms
    )
}

/// Re-read a mis-decoded value: code points as Latin-1 bytes, bytes as
/// UTF-8. Values that do not round-trip are returned unchanged.
#[must_use]
pub fn repair_latin1(value: &str) -> String {
    let mut bytes = Vec::with_capacity(value.len());
    for c in value.chars() {
        match u8::try_from(u32::from(c)) {
            Ok(byte) => bytes.push(byte),
            // Beyond Latin-1, so this was never a Latin-1 mis-decode.
            Err(_) => return value.to_string(),
        }
    }
    String::from_utf8(bytes).unwrap_or_else(|_| value.to_string())
}

/// Repair a value when the detection says it needs it.
#[must_use]
pub fn repaired(value: &str) -> String {
    if needs_latin1_repair(value) {
        repair_latin1(value)
    } else {
        value.to_string()
    }
}

/// Fold full-width digits and the full-width minus into their ASCII
/// counterparts, for integer parsing of repaired values.
#[must_use]
pub fn normalize_fullwidth_digits(value: &str) -> String {
    value
        .chars()
        .map(|c| match c {
            '\u{FF10}'..='\u{FF19}' => {
                char::from(b'0' + (u32::from(c) - 0xFF10) as u8)
            }
            '\u{FF0D}' => '-',
            other => other,
        })
        .collect()
}

/// Parameter accessor over a request, with repair applied.
///
/// ```rust,ignore
/// let params = Params::of(req);
/// let name = params.value("name");
/// let count = params.value_i64("count")?;
/// ```
pub struct Params<'a> {
    req: &'a JsonRequest,
}

impl<'a> Params<'a> {
    /// Wrap a request.
    #[must_use]
    pub fn of(req: &'a JsonRequest) -> Self {
        Params { req }
    }

    /// The underlying request.
    #[must_use]
    pub fn request(&self) -> &JsonRequest {
        self.req
    }

    /// First value of a parameter, repaired.
    #[must_use]
    pub fn value(&self, name: &str) -> Option<String> {
        self.req.param(name).map(repaired)
    }

    /// All values of a parameter, each repaired.
    #[must_use]
    pub fn values(&self, name: &str) -> Vec<String> {
        self.req
            .param_values(name)
            .iter()
            .map(|v| repaired(v))
            .collect()
    }

    /// First value of a parameter parsed as an integer, with full-width
    /// digits folded to ASCII first.
    ///
    /// # Errors
    ///
    /// Fails when the parameter is missing or does not parse as an integer.
    pub fn value_i64(&self, name: &str) -> Result<i64> {
        let raw = self
            .value(name)
            .ok_or_else(|| anyhow!("missing parameter `{name}`"))?;
        normalize_fullwidth_digits(&raw)
            .parse()
            .with_context(|| format!("parameter `{name}` is not an integer"))
    }
}
