use std::collections::BTreeSet;

const STOPWORDS: &str = include_str!("stopwords");

/// The default English stopword vocabulary, one lowercase word per entry.
pub fn default_stopwords() -> impl Iterator<Item = &'static str> {
    STOPWORDS
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
}

/// Add extra stopwords
///
/// The result holds every default stopword plus the extra words, each once.
/// Order carries no meaning.
pub fn extend_stopwords<I, S>(extended_words: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let mut stopwords: BTreeSet<String> = default_stopwords().map(str::to_owned).collect();
    stopwords.extend(extended_words.into_iter().map(Into::into));

    stopwords.into_iter().collect()
}
