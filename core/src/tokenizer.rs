use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref DATE: Regex = Regex::new(
        r"^(?:[0-3]?[0-9]\.[0-1]?[0-9]\.[0-9]?[0-9]?[0-9]{2}|[0-3]?[0-9]\.[0-1]?[0-9]\.)"
    )
    .expect("valid regex");
    static ref URL: Regex = Regex::new(concat!(
        r"^(?:(?:https?|ftp):)?//",
        r"(?:\S+(?::\S*)?@)?",
        r"(?:",
        r"(?P<host>(?:(?:[a-z0-9\x{a1}-\x{ffff}][a-z0-9\x{a1}-\x{ffff}_-]*)?[a-z0-9\x{a1}-\x{ffff}]\.)+",
        r"[a-z\x{a1}-\x{ffff}]{2,}\.?)",
        r"|",
        r"(?P<ip>(?:[1-9][0-9]?|1[0-9][0-9]|2[01][0-9]|22[0-3])",
        r"(?:\.(?:1?[0-9]{1,2}|2[0-4][0-9]|25[0-5])){2}",
        r"\.(?:[1-9][0-9]?|1[0-9][0-9]|2[0-4][0-9]|25[0-4]))",
        r")",
        r"(?::[0-9]{2,5})?",
        r"(?:[/?#]\S*)?",
    ))
    .expect("valid regex");
    static ref DECIMAL: Regex = Regex::new(r"^\d+[.,]\d+").expect("valid regex");
    static ref WORD: Regex = Regex::new(r"^[\p{L}\p{M}\p{N}]+").expect("valid regex");
    static ref TAG: Regex = Regex::new(r"^<.*?>").expect("valid regex");
    static ref PUNCT: Regex = Regex::new(r"^\p{P}").expect("valid regex");
    static ref SPACE: Regex = Regex::new(r"^\s+").expect("valid regex");
}

/// Pattern classes in match priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Date,
    Url,
    Decimal,
    Word,
    Tag,
    Punctuation,
    Whitespace,
    /// Characters no pattern class accepts, e.g. math symbols.
    Other,
}

/// Split text into raw tokens, in input order.
///
/// Whitespace runs and single punctuation characters are dropped, every other
/// token is trimmed and kept. No case folding or stopword removal happens here.
pub fn tokenize(text: &str) -> Vec<String> {
    tokenize_with_kinds(text).into_iter().map(|(token, _)| token).collect()
}

pub fn tokenize_with_kinds(text: &str) -> Vec<(String, TokenKind)> {
    let mut tokens = Vec::new();
    let mut unmatched_from: Option<usize> = None;
    let mut pos = 0;

    while pos < text.len() {
        let rest = &text[pos..];
        match match_class(rest) {
            Some((kind, len)) => {
                if let Some(start) = unmatched_from.take() {
                    push_token(&mut tokens, &text[start..pos], TokenKind::Other);
                }
                if kind != TokenKind::Whitespace {
                    push_token(&mut tokens, &rest[..len], kind);
                }
                pos += len;
            }
            None => {
                unmatched_from.get_or_insert(pos);
                pos += rest.chars().next().map_or(1, char::len_utf8);
            }
        }
    }
    if let Some(start) = unmatched_from {
        push_token(&mut tokens, &text[start..], TokenKind::Other);
    }
    tokens
}

fn match_class(rest: &str) -> Option<(TokenKind, usize)> {
    if let Some(m) = DATE.find(rest) {
        return Some((TokenKind::Date, m.end()));
    }
    if let Some(len) = match_url(rest) {
        return Some((TokenKind::Url, len));
    }
    let classes: [(&Regex, TokenKind); 5] = [
        (&DECIMAL, TokenKind::Decimal),
        (&WORD, TokenKind::Word),
        (&TAG, TokenKind::Tag),
        (&PUNCT, TokenKind::Punctuation),
        (&SPACE, TokenKind::Whitespace),
    ];
    classes
        .iter()
        .find_map(|(re, kind)| re.find(rest).map(|m| (*kind, m.end())))
        .filter(|(_, len)| *len > 0)
}

fn match_url(rest: &str) -> Option<usize> {
    let caps = URL.captures(rest)?;
    if let Some(ip) = caps.name("ip") {
        if is_reserved_ip(ip.as_str()) {
            return None;
        }
    }
    caps.get(0).map(|m| m.end())
}

/// Private, loopback and link-local ranges never count as URL hosts.
fn is_reserved_ip(ip: &str) -> bool {
    let octets: Vec<u16> = ip.split('.').filter_map(|o| o.parse().ok()).collect();
    match octets.as_slice() {
        [10, ..] | [127, ..] => true,
        [169, 254, ..] | [192, 168, ..] => true,
        [172, b, ..] => (16..=31).contains(b),
        _ => false,
    }
}

fn push_token(tokens: &mut Vec<(String, TokenKind)>, raw: &str, kind: TokenKind) {
    let token = raw.trim();
    if token.is_empty() {
        return;
    }
    let mut chars = token.chars();
    if let (Some(_), None) = (chars.next(), chars.next()) {
        if PUNCT.is_match(token) {
            return;
        }
    }
    tokens.push((token.to_string(), kind));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_words_and_drops_punctuation() {
        let t = tokenize("Hello, world! (again)");
        assert_eq!(t, vec!["Hello", "world", "again"]);
    }

    #[test]
    fn keeps_dates_whole() {
        let t = tokenize("vydano 12.05.2020 a opraveno 1.6.");
        assert_eq!(t, vec!["vydano", "12.05.2020", "a", "opraveno", "1.6."]);
    }

    #[test]
    fn keeps_decimals_whole() {
        assert_eq!(tokenize("pi is 3,14 or 3.14"), vec!["pi", "is", "3,14", "or", "3.14"]);
    }

    #[test]
    fn recognizes_urls() {
        let t = tokenize_with_kinds("see http://example.com/path?x=1 and //8.8.8.8/dns");
        let urls: Vec<&str> = t
            .iter()
            .filter(|(_, kind)| *kind == TokenKind::Url)
            .map(|(token, _)| token.as_str())
            .collect();
        assert_eq!(urls, vec!["http://example.com/path?x=1", "//8.8.8.8/dns"]);
    }

    #[test]
    fn private_ip_is_not_a_url() {
        let t = tokenize_with_kinds("//192.168.0.1/admin");
        assert!(t.iter().all(|(_, kind)| *kind != TokenKind::Url));
        assert!(t.iter().any(|(token, _)| token == "admin"));
    }

    #[test]
    fn keeps_tags_and_symbols() {
        assert_eq!(tokenize("<b>bold</b>"), vec!["<b>", "bold", "</b>"]);
        assert_eq!(tokenize("a + b"), vec!["a", "+", "b"]);
    }

    #[test]
    fn empty_and_blank_input() {
        assert!(tokenize("").is_empty());
        assert!(tokenize(" \n\t ").is_empty());
        assert!(tokenize("... ?!").is_empty());
    }
}
