//! Reader for flat key/value translation files.
//!
//! Accepts the classic `.properties` syntax: `key=value`, `key: value` or
//! `key value`, `#`/`!` comments, backslash line continuations and the
//! `\t \n \r \f \uXXXX` escapes.

/// Parses translation source text into ordered key/value pairs.
///
/// Entries keep the order of their first appearance in the source. A key
/// that appears again replaces the earlier value in place.
pub fn parse(source: &str) -> Vec<(String, String)> {
    let mut entries: Vec<(String, String)> = Vec::new();
    let mut lines = source.lines();

    while let Some(line) = lines.next() {
        let trimmed = line.trim_start();
        if trimmed.is_empty() || trimmed.starts_with('#') || trimmed.starts_with('!') {
            continue;
        }

        let mut logical = trimmed.to_string();
        while ends_with_continuation(&logical) {
            logical.pop();
            match lines.next() {
                Some(next) => logical.push_str(next.trim_start()),
                None => break,
            }
        }

        let (raw_key, raw_value) = split_entry(&logical);
        let key = unescape(raw_key);
        let value = unescape(raw_value);

        match entries.iter_mut().find(|(existing, _)| *existing == key) {
            Some(entry) => entry.1 = value,
            None => entries.push((key, value)),
        }
    }

    entries
}

/// An odd number of trailing backslashes joins the next line.
fn ends_with_continuation(line: &str) -> bool {
    line.chars().rev().take_while(|c| *c == '\\').count() % 2 == 1
}

/// Splits a logical line at the first unescaped separator.
fn split_entry(line: &str) -> (&str, &str) {
    let mut escaped = false;

    for (index, c) in line.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match c {
            '\\' => escaped = true,
            '=' | ':' => return (&line[..index], line[index + 1..].trim_start()),
            c if c.is_whitespace() => {
                let rest = line[index..].trim_start();
                let rest = rest
                    .strip_prefix(['=', ':'])
                    .map(str::trim_start)
                    .unwrap_or(rest);
                return (&line[..index], rest);
            }
            _ => {}
        }
    }

    (line, "")
}

fn unescape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut units: Vec<u16> = Vec::new();
    let mut chars = raw.chars();

    while let Some(c) = chars.next() {
        if c == '\\' && chars.as_str().starts_with('u') {
            let digits = chars.as_str().get(1..5);
            if let Some(unit) = digits.and_then(|hex| u16::from_str_radix(hex, 16).ok()) {
                units.push(unit);
                for _ in 0..5 {
                    chars.next();
                }
                continue;
            }
        }

        flush_utf16(&mut units, &mut out);

        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('t') => out.push('\t'),
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('f') => out.push('\u{000C}'),
            Some(other) => out.push(other),
            None => {}
        }
    }

    flush_utf16(&mut units, &mut out);
    out
}

/// Decodes pending `\uXXXX` code units, pairing surrogates.
fn flush_utf16(units: &mut Vec<u16>, out: &mut String) {
    if units.is_empty() {
        return;
    }
    out.extend(
        char::decode_utf16(units.drain(..)).map(|r| r.unwrap_or(char::REPLACEMENT_CHARACTER)),
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(source: &str) -> Vec<(String, String)> {
        parse(source)
    }

    #[test]
    fn test_separators() {
        let entries = pairs("a=1\nb: 2\nc 3\nd = 4\ne\n");
        assert_eq!(
            entries,
            vec![
                ("a".into(), "1".into()),
                ("b".into(), "2".into()),
                ("c".into(), "3".into()),
                ("d".into(), "4".into()),
                ("e".into(), "".into()),
            ]
        );
    }

    #[test]
    fn test_comments_and_blank_lines() {
        let entries = pairs("# title\n\n! other\n   \nkey=value\n");
        assert_eq!(entries, vec![("key".into(), "value".into())]);
    }

    #[test]
    fn test_line_continuation() {
        let entries = pairs("message=Hello \\\n    World\nnext=x");
        assert_eq!(entries[0], ("message".into(), "Hello World".into()));
        assert_eq!(entries[1], ("next".into(), "x".into()));
    }

    #[test]
    fn test_escaped_backslash_is_not_continuation() {
        let entries = pairs("path=C:\\\\\nother=1");
        assert_eq!(entries[0], ("path".into(), "C:\\".into()));
        assert_eq!(entries.len(), 2);
    }

    #[test]
    fn test_escapes() {
        let entries = pairs("tab=a\\tb\nuni=\\u00e9t\\u00E9\nkey\\=part=v\nemoji=\\uD83D\\uDE00");
        assert_eq!(entries[0].1, "a\tb");
        assert_eq!(entries[1].1, "été");
        assert_eq!(entries[2], ("key=part".into(), "v".into()));
        assert_eq!(entries[3].1, "😀");
    }

    #[test]
    fn test_duplicate_key_keeps_first_position() {
        let entries = pairs("a=1\nb=2\na=3");
        assert_eq!(
            entries,
            vec![("a".into(), "3".into()), ("b".into(), "2".into())]
        );
    }

    #[test]
    fn test_crlf_input() {
        let entries = pairs("a=1\r\nb=2\r\n");
        assert_eq!(entries[0].1, "1");
        assert_eq!(entries[1].1, "2");
    }
}
