use serde_json::{Map, Value};

/// What an input field must look like to pass validation.
#[derive(Debug, Clone, Copy)]
pub enum FieldKind {
    /// Present, a JSON string, and at least `min_len` characters after trimming.
    Text { min_len: usize },
    /// Present, a JSON number, and above the bound (`> min` when `exclusive`,
    /// `>= min` otherwise).
    Number { min: f64, exclusive: bool },
}

/// One declarative rule: the field it covers, the shape it demands, and the
/// violation message reported when it fails.
#[derive(Debug, Clone, Copy)]
pub struct FieldRule {
    pub field: &'static str,
    pub kind: FieldKind,
    pub message: &'static str,
}

impl FieldKind {
    fn accepts(&self, value: Option<&Value>) -> bool {
        match (self, value) {
            (FieldKind::Text { min_len }, Some(Value::String(s))) => {
                s.trim().chars().count() >= *min_len
            }
            (FieldKind::Number { min, exclusive }, Some(Value::Number(n))) => {
                match n.as_f64() {
                    Some(v) if *exclusive => v > *min,
                    Some(v) => v >= *min,
                    None => false,
                }
            }
            _ => false,
        }
    }
}

/// Check a raw input record against a rule table. Pure and total: every
/// failed rule contributes its message, so callers see all simultaneous
/// violations rather than just the first.
pub fn validate_fields(rules: &[FieldRule], payload: &Map<String, Value>) -> Vec<String> {
    rules
        .iter()
        .filter(|rule| !rule.kind.accepts(payload.get(rule.field)))
        .map(|rule| rule.message.to_string())
        .collect()
}
