use crate::accents::remove_accents;
use crate::analyzer::AnalyzerConfig;
use crate::stemmer::Stemmer;
use std::collections::HashSet;

/// Built-in Czech stopword list.
pub const DEFAULT_STOPWORDS: &[&str] = &[
    "a", "aby", "aj", "ale", "ani", "aniž", "ano", "asi", "až", "bez", "bude", "budem", "budeš",
    "by", "byl", "byla", "byli", "bylo", "být", "co", "což", "cz", "či", "článek", "článku",
    "články", "další", "dnes", "do", "ho", "i", "jak", "jako", "je", "jeho", "jej", "její",
    "jejich", "jen", "jenž", "ještě", "ji", "jiné", "již", "jsem", "jsi", "jsme", "jsou", "jste",
    "k", "kam", "kde", "kdo", "kdy", "když", "ke", "která", "které", "kterou", "který", "kteři",
    "ku", "ma", "má", "mají", "mám", "máme", "máte", "mé", "mezi", "mi", "mít", "mně", "mnou",
    "můj", "může", "my", "na", "nad", "nám", "náš", "naši", "ne", "nebo", "nejsou", "není",
    "než", "nic", "o", "od", "ode", "on", "pak", "po", "pod", "podle", "pokud", "pouze", "právě",
    "pro", "proč", "proto", "protože", "první", "před", "přes", "při", "re", "s", "se", "si",
    "sice", "své", "svých", "svým", "svými", "ta", "tak", "také", "takže", "tato", "te", "tě",
    "tedy", "těma", "ten", "tento", "této", "tím", "tímto", "to", "tohle", "toho", "tohoto",
    "tom", "tomto", "tomuto", "toto", "tu", "tuto", "tvůj", "ty", "tyto", "u", "už", "v", "vám",
    "váš", "vaše", "ve", "více", "však", "všechen", "vy", "z", "za", "zda", "zde", "ze", "zpět",
    "že",
];

/// Where an analyzer takes its stopwords from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StopwordSource {
    Defaults,
    /// Raw lines, one stopword per line. An empty list disables filtering.
    Lines(Vec<String>),
}

impl StopwordSource {
    pub fn none() -> Self {
        StopwordSource::Lines(Vec::new())
    }

    pub fn from_text(text: &str) -> Self {
        StopwordSource::Lines(text.lines().map(str::to_string).collect())
    }
}

impl Default for StopwordSource {
    fn default() -> Self {
        StopwordSource::none()
    }
}

/// Stopword set kept in the same normal form as indexed terms.
#[derive(Debug, Clone, Default)]
pub struct Stopwords {
    words: HashSet<String>,
}

impl Stopwords {
    /// Normalize every stopword with the analyzer's case, accent and stemming settings.
    pub fn build(source: &StopwordSource, config: &AnalyzerConfig, stemmer: Option<&dyn Stemmer>) -> Self {
        let raw: Vec<&str> = match source {
            StopwordSource::Defaults => DEFAULT_STOPWORDS.to_vec(),
            StopwordSource::Lines(lines) => lines.iter().map(String::as_str).collect(),
        };
        let words = raw
            .into_iter()
            .map(str::trim)
            .filter(|w| !w.is_empty())
            .map(|w| {
                let mut word = if config.lowercase { w.to_lowercase() } else { w.to_string() };
                if config.remove_accents {
                    word = remove_accents(&word);
                }
                match stemmer {
                    Some(stemmer) if config.perform_stemming => stemmer.stem(&word),
                    _ => word,
                }
            })
            .collect();
        Self { words }
    }

    pub fn contains(&self, token: &str) -> bool {
        self.words.contains(token)
    }

    pub fn remove(&self, tokens: Vec<String>) -> Vec<String> {
        if self.words.is_empty() {
            return tokens;
        }
        tokens.into_iter().filter(|t| !self.contains(t)).collect()
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}
