//! Character reference decoding.

use std::borrow::Cow;

const NAMED: &[(&str, char)] = &[
    ("amp", '&'),
    ("lt", '<'),
    ("gt", '>'),
    ("quot", '"'),
    ("apos", '\''),
    ("nbsp", '\u{a0}'),
    ("copy", '©'),
    ("reg", '®'),
    ("trade", '™'),
    ("hellip", '…'),
    ("mdash", '—'),
    ("ndash", '–'),
    ("lsquo", '‘'),
    ("rsquo", '’'),
    ("ldquo", '“'),
    ("rdquo", '”'),
    ("bull", '•'),
    ("middot", '·'),
    ("deg", '°'),
    ("euro", '€'),
];

/// Decode `&name;`, `&#NN;` and `&#xHH;` references. Unknown references are
/// kept as written.
pub(crate) fn decode_entities(input: &str) -> Cow<'_, str> {
    if !input.contains('&') {
        return Cow::Borrowed(input);
    }

    let mut out = String::with_capacity(input.len());
    let mut rest = input;
    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        rest = &rest[amp..];
        match decode_one(rest) {
            Some((ch, consumed)) => {
                out.push(ch);
                rest = &rest[consumed..];
            }
            None => {
                out.push('&');
                rest = &rest[1..];
            }
        }
    }
    out.push_str(rest);
    Cow::Owned(out)
}

/// Longest reference body looked at.
const MAX_BODY: usize = 32;

/// Decode a reference at the start of `s` (which begins with `&`).
fn decode_one(s: &str) -> Option<(char, usize)> {
    let semi = s
        .bytes()
        .skip(1)
        .take(MAX_BODY + 1)
        .position(|b| b == b';')?
        + 1;
    let body = &s[1..semi];
    if body.is_empty() {
        return None;
    }
    let ch = if let Some(num) = body.strip_prefix('#') {
        let code = match num.strip_prefix(['x', 'X']) {
            Some(hex) => u32::from_str_radix(hex, 16).ok()?,
            None => num.parse::<u32>().ok()?,
        };
        match code {
            0 => '\u{fffd}',
            _ => char::from_u32(code)?,
        }
    } else {
        NAMED
            .iter()
            .find_map(|&(name, ch)| (name == body).then_some(ch))?
    };
    Some((ch, semi + 1))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text_borrowed() {
        assert!(matches!(decode_entities("no refs"), Cow::Borrowed(_)));
    }

    #[test]
    fn test_named_and_numeric() {
        assert_eq!(decode_entities("a &amp; b &lt;3"), "a & b <3");
        assert_eq!(decode_entities("&#39;q&#x27;"), "'q'");
        assert_eq!(decode_entities("caf&#233;"), "café");
    }

    #[test]
    fn test_unknown_kept() {
        assert_eq!(decode_entities("AT&T"), "AT&T");
        assert_eq!(decode_entities("&bogus; &"), "&bogus; &");
        assert_eq!(decode_entities("&#xZZ;"), "&#xZZ;");
    }

    #[test]
    fn test_semicolon_search_is_bounded() {
        let far = format!("&{};", "a".repeat(40));
        assert_eq!(decode_entities(&far), far);
        let amps = "&".repeat(10_000);
        assert_eq!(decode_entities(&format!("{amps}&lt;")), format!("{amps}<"));
    }
}
