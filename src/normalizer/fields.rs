use serde_json::Value;
use tracing::warn;

/// One un-normalized row: CSV cells as strings, database columns as JSON values.
pub type RawRecord = serde_json::Map<String, Value>;

const BOM: char = '\u{FEFF}';

/// Key-tolerant accessor over a raw record.
///
/// A name resolves to the exact key first, then the BOM-prefixed key, then
/// any key that equals the name once BOM and surrounding whitespace are
/// stripped. Blank strings and nulls count as absent, so resolution falls
/// through to the next variant.
pub struct Fields<'a> {
    raw: &'a RawRecord,
}

impl<'a> Fields<'a> {
    pub fn new(raw: &'a RawRecord) -> Self {
        Self { raw }
    }

    /// First present value for any of `names`, tried in order.
    pub fn value(&self, names: &[&str]) -> Option<&'a Value> {
        names.iter().find_map(|name| self.lookup(name))
    }

    fn lookup(&self, name: &str) -> Option<&'a Value> {
        if let Some(value) = self.raw.get(name).filter(|v| is_present(v)) {
            return Some(value);
        }

        let bom_key = format!("{}{}", BOM, name);
        if let Some(value) = self.raw.get(&bom_key).filter(|v| is_present(v)) {
            return Some(value);
        }

        self.raw
            .iter()
            .find(|(key, value)| clean_key(key) == name && is_present(value))
            .map(|(_, value)| value)
    }

    pub fn string(&self, names: &[&str]) -> Option<String> {
        match self.value(names)? {
            Value::String(s) => Some(s.trim().to_string()),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            _ => None,
        }
    }

    /// Integer with `parseInt`-style leniency: leading digits of a string
    /// are used, trailing text ignored, fractions truncated.
    pub fn integer(&self, names: &[&str]) -> Option<i64> {
        match self.value(names)? {
            Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f.trunc() as i64)),
            Value::String(s) => parse_leading_int(s),
            _ => None,
        }
    }

    /// Non-negative integer that fits in `u32`. Negative values clamp to 0.
    pub fn count(&self, names: &[&str]) -> Option<u32> {
        self.integer(names)
            .map(|n| u32::try_from(n.max(0)).unwrap_or(u32::MAX))
    }

    pub fn float(&self, names: &[&str]) -> Option<f64> {
        let parsed = match self.value(names)? {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        };
        parsed.filter(|f| f.is_finite())
    }

    pub fn boolean(&self, names: &[&str]) -> Option<bool> {
        match self.value(names)? {
            Value::Bool(b) => Some(*b),
            Value::Number(n) => n.as_i64().map(|n| n != 0),
            Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
                "true" | "yes" | "1" => Some(true),
                "false" | "no" | "0" => Some(false),
                _ => None,
            },
            _ => None,
        }
    }

    /// String list from a JSON array or a bracketed, comma-separated string.
    /// Values of any other type are logged and treated as an empty list.
    pub fn list(&self, names: &[&str]) -> Option<Vec<String>> {
        let value = self.value(names)?;
        match value {
            Value::Array(items) => Some(collect_tags(items.iter().filter_map(|item| match item {
                Value::String(s) => Some(s.as_str()),
                _ => None,
            }))),
            Value::String(s) => Some(parse_tag_list(s)),
            other => {
                warn!("Expected a list for {:?}, got {}; using empty list", names, other);
                Some(Vec::new())
            }
        }
    }
}

fn is_present(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::String(s) => !s.trim().is_empty(),
        _ => true,
    }
}

fn clean_key(key: &str) -> &str {
    key.trim().trim_start_matches(BOM).trim()
}

fn parse_leading_int(raw: &str) -> Option<i64> {
    let raw = raw.trim();
    let (negative, digits) = match raw.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, raw.strip_prefix('+').unwrap_or(raw)),
    };
    let end = digits
        .char_indices()
        .find(|(_, c)| !c.is_ascii_digit())
        .map(|(i, _)| i)
        .unwrap_or(digits.len());
    let value = digits[..end].parse::<i64>().ok()?;
    Some(if negative { -value } else { value })
}

/// Parse a raw tag string such as `["wifi", "aircon", ""]`.
///
/// Brackets and double quotes are stripped, the rest is split on commas,
/// each token trimmed. Empty tokens are dropped and repeated tags keep
/// their first position.
pub fn parse_tag_list(raw: &str) -> Vec<String> {
    let cleaned: String = raw.chars().filter(|c| !matches!(c, '[' | ']' | '"')).collect();
    collect_tags(cleaned.split(','))
}

fn collect_tags<'s>(tokens: impl Iterator<Item = &'s str>) -> Vec<String> {
    let mut tags: Vec<String> = Vec::new();
    for token in tokens.map(str::trim).filter(|t| !t.is_empty()) {
        if !tags.iter().any(|t| t == token) {
            tags.push(token.to_string());
        }
    }
    tags
}
