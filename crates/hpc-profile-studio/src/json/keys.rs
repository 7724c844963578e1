//! Key tree rendering for documents of unknown shape.

use serde_json::Value;

/// Render the keys of `doc` as an indented tree
///
/// **Public** - used by the `keys` command
///
/// # Arguments
/// * `doc` - Document to describe
/// * `level` - Number of nested levels to descend below the top level
/// * `show_all` - Descend through every nested object regardless of `level`
///
/// # Returns
/// One line per key, indented with one tab per depth. A document that is not
/// an object is described as a single value.
pub fn render_key_tree(doc: &Value, level: usize, show_all: bool) -> String {
    match doc {
        Value::Object(_) => {
            let mut out = String::new();
            push_keys(doc, Some(level), show_all, 0, &mut out);
            out
        }
        other => format!("JSON read a single value: {}\n", other),
    }
}

fn push_keys(doc: &Value, remaining: Option<usize>, show_all: bool, indent: usize, out: &mut String) {
    let Value::Object(map) = doc else {
        return;
    };

    for (key, child) in map {
        out.push_str(&"\t".repeat(indent));
        out.push_str(key);
        out.push('\n');

        let descend = show_all || remaining.map_or(false, |r| r > 0);
        if descend && child.is_object() {
            let next = remaining.and_then(|r| r.checked_sub(1));
            push_keys(child, next, show_all, indent + 1, out);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_top_level_only() {
        let doc = json!({"info": {"runtime": 1}, "samples": {"count": 2}});
        assert_eq!(render_key_tree(&doc, 0, false), "info\nsamples\n");
    }

    #[test]
    fn test_one_level_down() {
        let doc = json!({"info": {"runtime": 1, "nested": {"deep": 1}}});
        assert_eq!(render_key_tree(&doc, 1, false), "info\n\tnested\n\truntime\n");
    }

    #[test]
    fn test_show_all() {
        let doc = json!({"info": {"nested": {"deep": 1}}});
        assert_eq!(render_key_tree(&doc, 0, true), "info\n\tnested\n\t\tdeep\n");
    }

    #[test]
    fn test_scalar_document() {
        assert_eq!(render_key_tree(&json!(3), 1, false), "JSON read a single value: 3\n");
    }
}
