//! # Info Files
//!
//! xpad keeps one `info-XXXXXX` file per note next to its `content-XXXXXX`
//! file. The format is line oriented, `<key> <value>`, split at the first
//! space:
//!
//! ```text
//! width 200
//! height 200
//! x 640
//! y 480
//! follow_font 1
//! follow_color 0
//! sticky 0
//! hidden 0
//! back rgb(238,232,170)
//! text #000000
//! fontname Sans 11
//! content content-4fz81a
//! ```
//!
//! Unknown keys are ignored on read and preserved on rewrite.

use crate::error::{Result, XpadError};
use crate::model::NoteInfo;
use std::path::Path;

pub const KEY_CONTENT: &str = "content";
pub const KEY_HIDDEN: &str = "hidden";
pub const KEY_ENCRYPTED: &str = "encrypted";
pub const KEY_TITLE: &str = "title";

fn split_lines(raw: &str) -> Vec<&str> {
    raw.split('\n')
        .map(|l| l.strip_suffix('\r').unwrap_or(l))
        .collect()
}

fn split_key_value(line: &str) -> (&str, &str) {
    match line.split_once(' ') {
        Some((k, v)) => (k, v),
        None => (line, ""),
    }
}

fn flag(value: &str) -> bool {
    value.trim() == "1"
}

/// Parses the raw text of an info file. `path` only feeds the error.
pub fn parse(raw: &str, path: &Path) -> Result<NoteInfo> {
    let mut info = NoteInfo::default();

    for line in split_lines(raw) {
        let (key, value) = split_key_value(line);
        match key {
            "width" => info.width = value.trim().parse().ok(),
            "height" => info.height = value.trim().parse().ok(),
            "x" => info.x = value.trim().parse().ok(),
            "y" => info.y = value.trim().parse().ok(),
            "follow_font" => info.follow_font = Some(flag(value)),
            "follow_color" => info.follow_color = Some(flag(value)),
            "sticky" => info.sticky = Some(flag(value)),
            KEY_HIDDEN => info.hidden = flag(value),
            KEY_ENCRYPTED => info.encrypted = flag(value),
            KEY_TITLE => info.title = Some(value.trim().to_string()),
            "back" => info.background_color = Some(normalize_color(value)),
            "text" => info.text_color = Some(normalize_color(value)),
            "fontname" => info.font = Some(value.to_string()),
            KEY_CONTENT if info.content_file.is_empty() => {
                info.content_file = value.trim().to_string()
            }
            _ => {}
        }
    }

    if info.content_file.is_empty() {
        return Err(XpadError::MalformedMetadata(path.to_path_buf()));
    }
    Ok(info)
}

/// Returns the value of the first `content` line, if any.
pub fn content_field(raw: &str) -> Option<&str> {
    split_lines(raw).into_iter().find_map(|line| {
        line.strip_prefix("content ")
            .map(str::trim)
            .filter(|v| !v.is_empty())
    })
}

/// Rewrites every `<key> ...` line to `<key> <value>`, or appends one when the
/// key is absent. All other lines keep their content and order.
pub fn set_field(raw: &str, key: &str, value: &str) -> String {
    let prefix = format!("{} ", key);
    let replacement = format!("{} {}", key, value);
    let mut found = false;

    let mut lines: Vec<String> = split_lines(raw)
        .into_iter()
        .map(|line| {
            if line.starts_with(&prefix) || line == key {
                found = true;
                replacement.clone()
            } else {
                line.to_string()
            }
        })
        .collect();

    if !found {
        // A trailing newline leaves an empty last element; keep it last.
        if lines.last().is_some_and(|l| l.is_empty()) {
            let len = lines.len();
            lines.insert(len - 1, replacement);
        } else {
            lines.push(replacement);
        }
    }
    lines.join("\n")
}

/// Normalizes `rgb(r,g,b)` to `#rrggbb`. Anything else passes through trimmed.
pub fn normalize_color(value: &str) -> String {
    let trimmed = value.trim();
    parse_rgb(trimmed)
        .map(|(r, g, b)| format!("#{:02x}{:02x}{:02x}", r, g, b))
        .unwrap_or_else(|| trimmed.to_string())
}

fn parse_rgb(value: &str) -> Option<(u8, u8, u8)> {
    let lower = value.to_ascii_lowercase();
    let inner = lower.strip_prefix("rgb(")?.strip_suffix(')')?;
    let parts: Vec<&str> = inner.split(',').map(str::trim).collect();
    if parts.len() != 3 {
        return None;
    }
    let mut out = [0u8; 3];
    for (slot, part) in out.iter_mut().zip(parts) {
        if part.is_empty() || part.len() > 3 || !part.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        let n: u16 = part.parse().ok()?;
        *slot = n.min(255) as u8;
    }
    Some((out[0], out[1], out[2]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn p() -> PathBuf {
        PathBuf::from("info-test")
    }

    #[test]
    fn parses_all_recognized_keys() {
        let raw = "width 200\nheight 150\nx 10\ny 20\nfollow_font 1\nfollow_color 0\n\
                   sticky 1\nhidden 1\nencrypted 1\ntitle My secret\nback rgb(255, 0, 16)\n\
                   text #112233\nfontname Sans Bold 12\ncontent content-abc123\n";
        let info = parse(raw, &p()).unwrap();
        assert_eq!(info.width, Some(200));
        assert_eq!(info.height, Some(150));
        assert_eq!(info.x, Some(10));
        assert_eq!(info.y, Some(20));
        assert_eq!(info.follow_font, Some(true));
        assert_eq!(info.follow_color, Some(false));
        assert_eq!(info.sticky, Some(true));
        assert!(info.hidden);
        assert!(info.encrypted);
        assert_eq!(info.title.as_deref(), Some("My secret"));
        assert_eq!(info.background_color.as_deref(), Some("#ff0010"));
        assert_eq!(info.text_color.as_deref(), Some("#112233"));
        assert_eq!(info.font.as_deref(), Some("Sans Bold 12"));
        assert_eq!(info.content_file, "content-abc123");
    }

    #[test]
    fn unknown_keys_and_bad_numbers_are_ignored() {
        let raw = "wobble 3\nwidth abc\ncontent content-x";
        let info = parse(raw, &p()).unwrap();
        assert_eq!(info.width, None);
        assert_eq!(info.content_file, "content-x");
    }

    #[test]
    fn missing_content_is_malformed() {
        let err = parse("hidden 0\n", &p()).unwrap_err();
        assert!(matches!(err, XpadError::MalformedMetadata(_)));
    }

    #[test]
    fn crlf_lines_are_accepted() {
        let info = parse("hidden 1\r\ncontent content-q\r\n", &p()).unwrap();
        assert!(info.hidden);
        assert_eq!(info.content_file, "content-q");
    }

    #[test]
    fn rgb_components_are_clamped() {
        assert_eq!(normalize_color("rgb(300, 0, 0)"), "#ff0000");
        assert_eq!(normalize_color("RGB(1,2,3)"), "#010203");
    }

    #[test]
    fn unparseable_color_passes_through() {
        assert_eq!(normalize_color(" lightyellow "), "lightyellow");
        assert_eq!(normalize_color("rgb(1,2)"), "rgb(1,2)");
        assert_eq!(normalize_color("rgb(a,b,c)"), "rgb(a,b,c)");
    }

    #[test]
    fn first_content_line_wins() {
        let raw = "hidden 0\ncontent content-1\ncontent content-2";
        let info = parse(raw, &p()).unwrap();
        assert_eq!(info.content_file, "content-1");
        assert_eq!(content_field(raw), Some(info.content_file.as_str()));
    }

    #[test]
    fn content_field_finds_first_content_line() {
        assert_eq!(content_field("hidden 0\ncontent content-1\ncontent content-2"), Some("content-1"));
        assert_eq!(content_field("hidden 0"), None);
    }

    #[test]
    fn set_field_rewrites_in_place() {
        let raw = "width 10\nhidden 0\ncontent content-x";
        assert_eq!(
            set_field(raw, "hidden", "1"),
            "width 10\nhidden 1\ncontent content-x"
        );
    }

    #[test]
    fn set_field_appends_missing_key() {
        let raw = "content content-x";
        assert_eq!(set_field(raw, "encrypted", "1"), "content content-x\nencrypted 1");
    }

    #[test]
    fn set_field_appends_before_trailing_newline() {
        let raw = "content content-x\n";
        assert_eq!(set_field(raw, "hidden", "1"), "content content-x\nhidden 1\n");
    }
}
