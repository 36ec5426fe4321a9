use serde_json::Value;

/// Find the first JSON object in free-form model output.
///
/// The whole text is tried first. After that a single pass collects every
/// top-level `{ ... }` span, skipping string literals inside objects, and
/// returns the first span that parses. Braces nested in an earlier object
/// are never treated as starts, so a truncated reply yields `None` rather
/// than one of its inner objects.
pub fn extract_json_block(text: &str) -> Option<Value> {
    let text = text.trim();

    if let Ok(value) = serde_json::from_str::<Value>(text) {
        if value.is_object() {
            return Some(value);
        }
    }

    let mut depth: usize = 0;
    let mut start = 0;
    let mut in_string = false;
    let mut escaped = false;

    for (index, ch) in text.char_indices() {
        if in_string {
            if escaped {
                escaped = false;
            } else if ch == '\\' {
                escaped = true;
            } else if ch == '"' {
                in_string = false;
            }
            continue;
        }

        match ch {
            // quotes in chatter around the object are not string delimiters
            '"' if depth > 0 => in_string = true,
            '{' => {
                if depth == 0 {
                    start = index;
                }
                depth += 1;
            }
            '}' if depth > 0 => {
                depth -= 1;
                if depth == 0 {
                    let block = &text[start..=index];
                    if let Ok(value) = serde_json::from_str::<Value>(block) {
                        if value.is_object() {
                            return Some(value);
                        }
                    }
                }
            }
            _ => {}
        }
    }

    None
}
