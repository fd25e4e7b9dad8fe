use std::{
    collections::{BTreeMap, HashSet},
    sync::OnceLock,
};

use jieba_rs::Jieba;
use regex::Regex;

/// Bigrams scoring above this are kept as a single entry.
const COLLOCATION_THRESHOLD: f64 = 30.0;

type CaseCounts = BTreeMap<String, usize>;

fn jieba() -> &'static Jieba {
    static JIEBA: OnceLock<Jieba> = OnceLock::new();
    JIEBA.get_or_init(Jieba::new)
}

fn is_cjk(c: char) -> bool {
    matches!(c,
        '\u{3040}'..='\u{30ff}'
        | '\u{3400}'..='\u{4dbf}'
        | '\u{4e00}'..='\u{9fff}'
        | '\u{f900}'..='\u{faff}'
        | '\u{ac00}'..='\u{d7af}')
}

fn word_pattern(min_word_length: usize) -> Regex {
    let pattern = if min_word_length <= 1 {
        r"\w[\w']*"
    } else {
        r"\w[\w']+"
    };
    Regex::new(pattern).expect("Unable to compile tokenization regex")
}

/// Splits text into words and counts them.
///
/// Matching against the stopword filter is case-insensitive. Case variants of
/// a word are counted together under their most common spelling.
pub struct Tokenizer {
    //分词正则
    regex: Regex,
    pub filter: HashSet<String>,
    pub min_word_length: usize,
    pub exclude_numbers: bool,
    pub max_words: usize,
    pub collocations: bool,
    pub normalize_plurals: bool,
    pub segment_cjk: bool,
}

impl Default for Tokenizer {
    fn default() -> Self {
        Tokenizer {
            regex: word_pattern(0),
            filter: Default::default(),
            min_word_length: 0,
            exclude_numbers: true,
            max_words: 200,
            collocations: true,
            normalize_plurals: true,
            segment_cjk: true,
        }
    }
}

impl Tokenizer {
    pub fn with_min_word_length(mut self, size: usize) -> Self {
        self.min_word_length = size;
        self.regex = word_pattern(size);
        self
    }

    pub fn with_max_words(mut self, size: usize) -> Self {
        self.max_words = size;
        self
    }

    pub fn with_filter<I, S>(mut self, value: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.filter = value
            .into_iter()
            .map(|el| el.as_ref().to_lowercase())
            .collect();

        self
    }

    pub fn with_exclude_numbers(mut self, value: bool) -> Self {
        self.exclude_numbers = value;
        self
    }

    pub fn with_collocations(mut self, value: bool) -> Self {
        self.collocations = value;
        self
    }

    pub fn with_normalize_plurals(mut self, value: bool) -> Self {
        self.normalize_plurals = value;
        self
    }

    pub fn with_segment_cjk(mut self, value: bool) -> Self {
        self.segment_cjk = value;
        self
    }

    fn is_stopword(&self, word: &str) -> bool {
        !self.filter.is_empty() && self.filter.contains(&word.to_lowercase())
    }

    fn segment<'a>(&self, word: &'a str) -> Vec<&'a str> {
        if self.segment_cjk && word.chars().any(is_cjk) {
            jieba()
                .cut(word, false)
                .into_iter()
                .filter(|piece| !piece.trim().is_empty())
                .collect()
        } else {
            vec![word]
        }
    }

    /// Words in text order, before stopword removal.
    pub fn tokenize<'a>(&self, text: &'a str) -> Vec<&'a str> {
        self.regex
            .find_iter(text)
            .map(|mat| mat.as_str())
            .flat_map(|word| self.segment(word))
            .map(|word| {
                word.strip_suffix("'s")
                    .or_else(|| word.strip_suffix("'S"))
                    .unwrap_or(word)
            })
            .filter(|word| !word.is_empty())
            .filter(|word| !(self.exclude_numbers && word.chars().all(char::is_numeric)))
            .filter(|word| {
                self.min_word_length == 0 || word.chars().count() >= self.min_word_length
            })
            .collect()
    }

    pub fn get_word_frequencies(&self, text: &str) -> BTreeMap<String, usize> {
        let words = self.tokenize(text);

        if self.collocations {
            return self.unigrams_and_bigrams(&words);
        }

        let words: Vec<&str> = words
            .into_iter()
            .filter(|word| !self.is_stopword(word))
            .collect();
        keep_common_case(&words, self.normalize_plurals).0
    }

    fn unigrams_and_bigrams(&self, words: &[&str]) -> BTreeMap<String, usize> {
        // Bigrams come from the unfiltered sequence so that removing a
        // stopword never glues its neighbours together.
        let bigrams: Vec<String> = words
            .windows(2)
            .filter(|pair| !pair.iter().any(|word| self.is_stopword(word)))
            .map(|pair| pair.join(" "))
            .collect();
        let unigrams: Vec<&str> = words
            .iter()
            .copied()
            .filter(|word| !self.is_stopword(word))
            .collect();
        let n_words = unigrams.len();

        let (unigram_counts, standard_form) = keep_common_case(&unigrams, self.normalize_plurals);
        let (bigram_counts, _) = keep_common_case(&bigrams, self.normalize_plurals);

        let mut counts: BTreeMap<String, i64> = unigram_counts
            .iter()
            .map(|(word, count)| (word.clone(), *count as i64))
            .collect();

        for (bigram, count) in &bigram_counts {
            let Some((first, second)) = bigram.split_once(' ') else {
                continue;
            };
            let (Some(word1), Some(word2)) = (
                standard_form.get(&first.to_lowercase()),
                standard_form.get(&second.to_lowercase()),
            ) else {
                continue;
            };
            let (Some(count1), Some(count2)) = (unigram_counts.get(word1), unigram_counts.get(word2))
            else {
                continue;
            };

            if collocation_score(*count, *count1, *count2, n_words) > COLLOCATION_THRESHOLD {
                // one word can sit in several collocations, so counts may go negative
                *counts.entry(word1.clone()).or_default() -= *count as i64;
                *counts.entry(word2.clone()).or_default() -= *count as i64;
                counts.insert(bigram.clone(), *count as i64);
            }
        }

        counts
            .into_iter()
            .filter(|(_, count)| *count > 0)
            .map(|(word, count)| (word, count as usize))
            .collect()
    }

    pub fn get_normalized_word_frequencies(&self, text: &str) -> Vec<(String, f32)> {
        let frequencies = self.get_word_frequencies(text);

        let Some(max_freq) = frequencies.values().max().copied() else {
            return vec![];
        };
        let max_freq = max_freq as f32;

        let mut normalized_freqs: Vec<(String, f32)> = frequencies
            .into_iter()
            .map(|(key, val)| (key, val as f32 / max_freq))
            .collect();

        normalized_freqs.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(&b.0)));

        normalized_freqs.truncate(self.max_words);

        normalized_freqs
    }
}

/// Counts words case-insensitively, reporting each under its most common
/// spelling. Returns the counts and the spelling chosen for every lowercase
/// form (plural forms included when they were merged).
fn keep_common_case<S: AsRef<str>>(
    words: &[S],
    normalize_plurals: bool,
) -> (BTreeMap<String, usize>, BTreeMap<String, String>) {
    let mut common_cases = BTreeMap::<String, CaseCounts>::new();
    for word in words {
        let word = word.as_ref();
        *common_cases
            .entry(word.to_lowercase())
            .or_default()
            .entry(word.to_owned())
            .or_insert(0) += 1;
    }

    let mut merged_plurals = BTreeMap::new();
    if normalize_plurals {
        let plurals: Vec<String> = common_cases
            .keys()
            .filter(|key| key.ends_with('s') && !key.ends_with("ss"))
            .filter(|key| common_cases.contains_key(&key[..key.len() - 1]))
            .cloned()
            .collect();

        for plural in plurals {
            let singular_key = plural[..plural.len() - 1].to_owned();
            let Some(plural_cases) = common_cases.remove(&plural) else {
                continue;
            };
            let singular_cases = common_cases.entry(singular_key.clone()).or_default();
            for (word, count) in plural_cases {
                let mut singular = word;
                singular.pop();
                *singular_cases.entry(singular).or_insert(0) += count;
            }
            merged_plurals.insert(plural, singular_key);
        }
    }

    let mut fused_cases = BTreeMap::new();
    let mut standard_cases = BTreeMap::new();
    for (lower, cases) in &common_cases {
        let Some((most_common_case, _)) = cases
            .iter()
            .max_by(|a, b| a.1.cmp(b.1).then_with(|| b.0.cmp(a.0)))
        else {
            continue;
        };

        fused_cases.insert(most_common_case.clone(), cases.values().sum());
        standard_cases.insert(lower.clone(), most_common_case.clone());
    }

    for (plural, singular) in merged_plurals {
        if let Some(standard) = standard_cases.get(&singular).cloned() {
            standard_cases.insert(plural, standard);
        }
    }

    (fused_cases, standard_cases)
}

/// Dunning's log-likelihood ratio for a bigram against its two unigrams.
fn collocation_score(count_bigram: usize, count1: usize, count2: usize, n_words: usize) -> f64 {
    if n_words <= count1 || n_words <= count2 {
        // only one word appears in the whole document
        return 0.0;
    }

    let (c12, c1, c2, n) = (
        count_bigram as f64,
        count1 as f64,
        count2 as f64,
        n_words as f64,
    );
    let p = c2 / n;
    let p1 = c12 / c1;
    let p2 = (c2 - c12) / (n - c1);

    let score = log_likelihood(c12, c1, p) + log_likelihood(c2 - c12, n - c1, p)
        - log_likelihood(c12, c1, p1)
        - log_likelihood(c2 - c12, n - c1, p2);
    -2.0 * score
}

fn log_likelihood(k: f64, n: f64, x: f64) -> f64 {
    x.max(1e-10).ln() * k + (1.0 - x).max(1e-10).ln() * (n - k)
}
