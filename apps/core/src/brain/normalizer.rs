//! Tokenization and lemmatization.
//!
//! Turns raw user text into the canonical word forms the vocabulary was built
//! from: lower-cased, split Treebank-style, nouns reduced to their base form.

use regex::Regex;
use std::collections::{HashMap, HashSet};
use std::sync::LazyLock;

// Words (with inner hyphens/dots), optional contraction tail, or a single symbol.
// NOTE: expect() is acceptable for static regex compilation.
static TOKEN_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\w+(?:[-.]\w+)*(?:'\w+)?|[^\w\s]").expect("Invalid regex: token pattern")
});

/// Contraction tails split off as separate tokens.
const CONTRACTION_TAILS: &[&str] = &["'s", "'m", "'re", "'ve", "'ll", "'d"];

/// Irregular plurals that no suffix rule can recover. More pairs can be
/// loaded at startup with [`Lemmatizer::extend_exceptions`].
const NOUN_EXCEPTIONS: &[(&str, &str)] = &[
    ("children", "child"),
    ("men", "man"),
    ("women", "woman"),
    ("feet", "foot"),
    ("teeth", "tooth"),
    ("geese", "goose"),
    ("mice", "mouse"),
    ("lice", "louse"),
    ("oxen", "ox"),
    ("criteria", "criterion"),
    ("phenomena", "phenomenon"),
    ("bacteria", "bacterium"),
    ("fungi", "fungus"),
    ("nuclei", "nucleus"),
    ("stimuli", "stimulus"),
    ("vertebrae", "vertebra"),
    ("larvae", "larva"),
    ("diagnoses", "diagnosis"),
    ("prognoses", "prognosis"),
    ("analyses", "analysis"),
    ("crises", "crisis"),
    ("indices", "index"),
    ("appendices", "appendix"),
    ("matrices", "matrix"),
    ("lives", "life"),
    ("knives", "knife"),
    ("wives", "wife"),
    ("leaves", "leaf"),
    ("halves", "half"),
    ("calves", "calf"),
    ("selves", "self"),
    ("wolves", "wolf"),
    ("people", "person"),
    ("data", "datum"),
    ("media", "medium"),
    ("metastases", "metastasis"),
    ("thromboses", "thrombosis"),
    ("stenoses", "stenosis"),
    ("neuroses", "neurosis"),
    ("psychoses", "psychosis"),
    ("hypotheses", "hypothesis"),
    ("testes", "testis"),
    ("bronchi", "bronchus"),
    ("alveoli", "alveolus"),
    ("emboli", "embolus"),
    ("thrombi", "thrombus"),
    ("bacilli", "bacillus"),
    ("cocci", "coccus"),
    ("ova", "ovum"),
    ("sera", "serum"),
    ("septa", "septum"),
    ("atria", "atrium"),
    ("ganglia", "ganglion"),
    ("stomata", "stoma"),
    ("foramina", "foramen"),
    ("corpora", "corpus"),
    ("viscera", "viscus"),
    ("genera", "genus"),
    ("apices", "apex"),
    ("cortices", "cortex"),
    ("fistulae", "fistula"),
    ("formulae", "formula"),
];

/// Detachment rules, tried in order. Outputs are only candidates.
const NOUN_SUFFIX_RULES: &[(&str, &str)] = &[
    ("s", ""),
    ("ses", "s"),
    ("xes", "x"),
    ("zes", "z"),
    ("ches", "ch"),
    ("shes", "sh"),
    ("men", "man"),
    ("ies", "y"),
];

/// Splits text into tokens: words, numbers, contraction tails and punctuation.
///
/// Case is preserved; lower-casing belongs to [`Normalizer::normalize`].
pub fn tokenize(text: &str) -> Vec<String> {
    let text = text.replace(['\u{2019}', '\u{2018}'], "'");
    let mut tokens = Vec::new();

    for m in TOKEN_PATTERN.find_iter(&text) {
        let token = m.as_str();
        let split = split_tail(token, "n't")
            .or_else(|| CONTRACTION_TAILS.iter().find_map(|tail| split_tail(token, tail)));

        match split {
            Some((head, tail)) => {
                tokens.push(head.to_string());
                tokens.push(tail.to_string());
            }
            None => tokens.push(token.to_string()),
        }
    }

    tokens
}

/// Splits `token` before a case-insensitive ASCII `tail`, keeping a non-empty head.
fn split_tail<'a>(token: &'a str, tail: &str) -> Option<(&'a str, &'a str)> {
    let split = token.len().checked_sub(tail.len()).filter(|n| *n > 0)?;
    let (head, rest) = (token.get(..split)?, token.get(split..)?);
    rest.eq_ignore_ascii_case(tail).then_some((head, rest))
}

/// Noun-oriented base-form reduction.
///
/// With a lexicon of known base forms, the shortest candidate present in the
/// lexicon wins and anything else is returned unchanged. Without one, a guarded
/// heuristic strips regular plural endings.
#[derive(Debug, Clone)]
pub struct Lemmatizer {
    exceptions: HashMap<String, String>,
    lexicon: HashSet<String>,
}

impl Default for Lemmatizer {
    fn default() -> Self {
        Self::new()
    }
}

impl Lemmatizer {
    /// Lemmatizer without a lexicon.
    pub fn new() -> Self {
        Self {
            exceptions: NOUN_EXCEPTIONS
                .iter()
                .map(|(form, lemma)| (form.to_string(), lemma.to_string()))
                .collect(),
            lexicon: HashSet::new(),
        }
    }

    pub fn with_lexicon<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut lemmatizer = Self::new();
        lemmatizer.extend_lexicon(words);
        lemmatizer
    }

    /// Adds known base forms.
    pub fn extend_lexicon<I, S>(&mut self, words: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.lexicon
            .extend(words.into_iter().map(|w| w.into().to_lowercase()));
    }

    /// Adds `(form, lemma)` pairs; a loaded pair replaces a built-in one.
    pub fn extend_exceptions<I, F, L>(&mut self, pairs: I)
    where
        I: IntoIterator<Item = (F, L)>,
        F: Into<String>,
        L: Into<String>,
    {
        self.exceptions.extend(
            pairs
                .into_iter()
                .map(|(form, lemma)| (form.into().to_lowercase(), lemma.into().to_lowercase())),
        );
    }

    pub fn lexicon_len(&self) -> usize {
        self.lexicon.len()
    }

    pub fn exceptions_len(&self) -> usize {
        self.exceptions.len()
    }

    /// Reduces an already lower-cased word to its base form.
    pub fn lemmatize(&self, word: &str) -> String {
        if let Some(base) = self.exceptions.get(word) {
            // A known surface form shorter than its listed lemma is kept as is.
            let keep = self.lexicon.contains(word) && word.len() < base.len();
            return if keep { word } else { base.as_str() }.to_string();
        }

        if self.lexicon.is_empty() {
            return heuristic_base(word);
        }

        let mut best: Option<&str> = self.lexicon.get(word).map(String::as_str);
        for (suffix, replacement) in NOUN_SUFFIX_RULES {
            let Some(stem) = word.strip_suffix(suffix) else {
                continue;
            };
            if stem.is_empty() {
                continue;
            }
            let candidate = format!("{}{}", stem, replacement);
            if let Some(known) = self.lexicon.get(&candidate) {
                if best.map_or(true, |b| known.len() < b.len()) {
                    best = Some(known.as_str());
                }
            }
        }

        best.map_or_else(|| word.to_string(), str::to_string)
    }
}

fn heuristic_base(word: &str) -> String {
    let char_count = word.chars().count();
    if char_count <= 3 || !word.chars().all(char::is_alphabetic) {
        return word.to_string();
    }
    if word.ends_with("ss") || word.ends_with("us") || word.ends_with("is") {
        return word.to_string();
    }

    if let Some(stem) = word.strip_suffix("sses") {
        return format!("{}ss", stem);
    }
    if let Some(stem) = word.strip_suffix("ies") {
        return format!("{}y", stem);
    }
    for suffix in ["ches", "shes", "xes", "zes"] {
        if let Some(stem) = word.strip_suffix(suffix) {
            return format!("{}{}", stem, &suffix[..suffix.len() - 2]);
        }
    }
    match word.strip_suffix('s') {
        Some(stem) => stem.to_string(),
        None => word.to_string(),
    }
}

/// Lower-cases and lemmatizes every token of an utterance.
#[derive(Debug, Clone, Default)]
pub struct Normalizer {
    lemmatizer: Lemmatizer,
}

impl Normalizer {
    pub fn new(lemmatizer: Lemmatizer) -> Self {
        Self { lemmatizer }
    }

    pub fn lemmatizer(&self) -> &Lemmatizer {
        &self.lemmatizer
    }

    /// Empty or punctuation-only input simply yields few or no word tokens.
    pub fn normalize(&self, text: &str) -> Vec<String> {
        tokenize(text)
            .into_iter()
            .map(|token| self.lemmatizer.lemmatize(&token.to_lowercase()))
            .collect()
    }
}
