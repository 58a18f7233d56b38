//! Markdown task lines: `- [ ] todo` and `- [x] done`.
//!
//! Both `-` and `*` bullets are recognized, with any leading indentation.
//! Toggling only ever rewrites the box, so the rest of the line is untouched.

const OPEN: &str = "[ ]";
const DONE: &str = "[x]";

/// Byte offset of the `[` in a task line, if `line` is one.
fn box_offset(line: &str) -> Option<usize> {
    let indent = line.len() - line.trim_start().len();
    let rest = &line[indent..];
    let after_bullet = rest.strip_prefix("- ").or_else(|| rest.strip_prefix("* "))?;
    let checkbox = after_bullet.get(..3)?;
    let is_box = checkbox == OPEN || checkbox.eq_ignore_ascii_case(DONE);
    is_box.then_some(indent + 2)
}

pub fn is_task(line: &str) -> bool {
    box_offset(line).is_some()
}

pub fn is_done(line: &str) -> bool {
    box_offset(line).is_some_and(|at| line[at..at + 3].eq_ignore_ascii_case(DONE))
}

/// Flips the checkbox of a task line. `None` when the line is not a task.
pub fn toggle_line(line: &str) -> Option<String> {
    let at = box_offset(line)?;
    let replacement = if is_done(line) { OPEN } else { DONE };
    let mut out = String::with_capacity(line.len());
    out.push_str(&line[..at]);
    out.push_str(replacement);
    out.push_str(&line[at + 3..]);
    Some(out)
}

/// Toggles the task on line `index` of `content`, keeping every other line
/// (and the original line endings) byte for byte.
pub fn toggle_in(content: &str, index: usize) -> Option<String> {
    let mut lines: Vec<&str> = content.split('\n').collect();
    let raw = *lines.get(index)?;
    let (body, cr) = match raw.strip_suffix('\r') {
        Some(body) => (body, "\r"),
        None => (raw, ""),
    };
    let toggled = format!("{}{}", toggle_line(body)?, cr);
    lines[index] = &toggled;
    Some(lines.join("\n"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recognizes_task_lines() {
        assert!(is_task("- [ ] buy milk"));
        assert!(is_task("  * [x] nested"));
        assert!(is_task("- [X] caps"));
        assert!(!is_task("- buy milk"));
        assert!(!is_task("[ ] no bullet"));
        assert!(!is_task("- ["));
        assert!(!is_task(""));
    }

    #[test]
    fn toggles_both_ways() {
        assert_eq!(toggle_line("- [ ] a").as_deref(), Some("- [x] a"));
        assert_eq!(toggle_line("- [x] a").as_deref(), Some("- [ ] a"));
        assert_eq!(toggle_line("    * [X] deep").as_deref(), Some("    * [ ] deep"));
        assert_eq!(toggle_line("plain"), None);
    }

    #[test]
    fn toggle_in_touches_one_line() {
        let content = "# list\r\n- [ ] one\r\n- [ ] two";
        assert_eq!(
            toggle_in(content, 1).as_deref(),
            Some("# list\r\n- [x] one\r\n- [ ] two")
        );
        assert_eq!(toggle_in(content, 0), None);
        assert_eq!(toggle_in(content, 9), None);
    }

    #[test]
    fn multibyte_text_after_box_survives() {
        assert_eq!(toggle_line("- [ ] café ☕").as_deref(), Some("- [x] café ☕"));
    }
}
