use rust_stemmers::Algorithm;
use serde::{Deserialize, Serialize};

/// Reduces a token to its root form.
pub trait Stemmer: Send + Sync {
    fn stem(&self, token: &str) -> String;

    fn name(&self) -> &'static str;
}

/// Which stemmer an analyzer should be built with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StemmerKind {
    #[default]
    Czech,
    English,
    None,
}

impl StemmerKind {
    pub fn build(self) -> Box<dyn Stemmer> {
        match self {
            StemmerKind::Czech => Box::new(CzechStemmer),
            StemmerKind::English => Box::new(SnowballStemmer::english()),
            StemmerKind::None => Box::new(IdentityStemmer),
        }
    }
}

impl std::str::FromStr for StemmerKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "czech" | "cs" => Ok(StemmerKind::Czech),
            "english" | "en" => Ok(StemmerKind::English),
            "none" => Ok(StemmerKind::None),
            other => Err(format!("unknown stemmer '{other}' (expected czech, english or none)")),
        }
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct IdentityStemmer;

impl Stemmer for IdentityStemmer {
    fn stem(&self, token: &str) -> String {
        token.to_string()
    }

    fn name(&self) -> &'static str {
        "identity"
    }
}

/// Snowball stemmers from `rust-stemmers`.
pub struct SnowballStemmer {
    inner: rust_stemmers::Stemmer,
    name: &'static str,
}

impl SnowballStemmer {
    pub fn new(algorithm: Algorithm, name: &'static str) -> Self {
        Self { inner: rust_stemmers::Stemmer::create(algorithm), name }
    }

    pub fn english() -> Self {
        Self::new(Algorithm::English, "english")
    }
}

impl Stemmer for SnowballStemmer {
    fn stem(&self, token: &str) -> String {
        self.inner.stem(token).into_owned()
    }

    fn name(&self) -> &'static str {
        self.name
    }
}

/// Light Czech stemmer: strips case endings and possessive suffixes, then
/// normalizes the final consonant cluster. Expects lowercase input.
#[derive(Debug, Default, Clone, Copy)]
pub struct CzechStemmer;

impl Stemmer for CzechStemmer {
    fn stem(&self, token: &str) -> String {
        let mut s: Vec<char> = token.chars().collect();
        remove_case(&mut s);
        remove_possessives(&mut s);
        if !s.is_empty() {
            normalize(&mut s);
        }
        s.into_iter().collect()
    }

    fn name(&self) -> &'static str {
        "czech"
    }
}

fn ends_with(s: &[char], suffix: &str) -> bool {
    let n = suffix.chars().count();
    s.len() >= n && s[s.len() - n..].iter().copied().eq(suffix.chars())
}

fn strip_any(s: &mut Vec<char>, min_len: usize, suffixes: &[&str]) -> bool {
    if s.len() <= min_len {
        return false;
    }
    match suffixes.iter().find(|suffix| ends_with(s.as_slice(), suffix)) {
        Some(suffix) => {
            s.truncate(s.len() - suffix.chars().count());
            true
        }
        None => false,
    }
}

fn remove_case(s: &mut Vec<char>) {
    if strip_any(s, 7, &["atech"]) {
        return;
    }
    if strip_any(s, 6, &["ětem", "etem", "atům"]) {
        return;
    }
    let three = [
        "ech", "ich", "ích", "ého", "ěmi", "emi", "ému", "ěte", "ete", "ěti", "eti", "ího", "iho",
        "ími", "ímu", "imu", "ách", "ata", "aty", "ých", "ama", "ami", "ové", "ovi", "ými",
    ];
    if strip_any(s, 5, &three) {
        return;
    }
    let two = ["em", "es", "ém", "ím", "ům", "at", "ám", "os", "us", "ým", "mi", "ou"];
    if strip_any(s, 4, &two) {
        return;
    }
    if s.len() > 3 {
        if let Some('a' | 'e' | 'i' | 'o' | 'u' | 'ů' | 'y' | 'á' | 'é' | 'í' | 'ý' | 'ě') = s.last().copied() {
            s.pop();
        }
    }
}

fn remove_possessives(s: &mut Vec<char>) {
    strip_any(s, 5, &["ov", "in", "ův"]);
}

fn normalize(s: &mut Vec<char>) {
    let len = s.len();
    if ends_with(s, "čt") {
        s[len - 2] = 'c';
        s[len - 1] = 'k';
        return;
    }
    if ends_with(s, "št") {
        s[len - 2] = 's';
        s[len - 1] = 'k';
        return;
    }
    match s[len - 1] {
        'c' | 'č' => {
            s[len - 1] = 'k';
            return;
        }
        'z' | 'ž' => {
            s[len - 1] = 'h';
            return;
        }
        _ => {}
    }
    if len > 1 && s[len - 2] == 'e' {
        // e* -> *
        s.remove(len - 2);
        return;
    }
    if len > 2 && s[len - 2] == 'ů' {
        s[len - 2] = 'o';
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn czech_strips_case_endings() {
        let stemmer = CzechStemmer;
        assert_eq!(stemmer.stem("města"), "měst");
        assert_eq!(stemmer.stem("městech"), "měst");
        assert_eq!(stemmer.stem("město"), "měst");
    }

    #[test]
    fn czech_normalizes_final_consonants() {
        let stemmer = CzechStemmer;
        assert_eq!(stemmer.stem("pec"), "pek");
        assert_eq!(stemmer.stem("muž"), "muh");
    }

    #[test]
    fn czech_leaves_short_words() {
        let stemmer = CzechStemmer;
        assert_eq!(stemmer.stem("je"), "je");
        assert_eq!(stemmer.stem(""), "");
    }

    #[test]
    fn snowball_english() {
        let stemmer = SnowballStemmer::english();
        assert_eq!(stemmer.stem("running"), "run");
        assert_eq!(stemmer.name(), "english");
    }

    #[test]
    fn kind_from_str() {
        assert_eq!("CS".parse::<StemmerKind>(), Ok(StemmerKind::Czech));
        assert_eq!("none".parse::<StemmerKind>(), Ok(StemmerKind::None));
        assert!("klingon".parse::<StemmerKind>().is_err());
    }
}
