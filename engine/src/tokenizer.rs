use lazy_static::lazy_static;
use regex::Regex;
use rust_stemmers::{Algorithm, Stemmer};
use std::collections::HashSet;

lazy_static! {
    static ref NON_LETTER: Regex = Regex::new(r"[^a-zA-Z\s]").expect("valid regex");
    static ref STEMMER: Stemmer = Stemmer::create(Algorithm::English);
    static ref STOPWORDS: HashSet<&'static str> = {
        // NLTK's English list. Its apostrophe forms ("don't") can never match once punctuation is
        // stripped, so only the bare fragments are kept; joined forms like "dont" stay as terms.
        let words: &[&str] = &[
            "a","about","above","after","again","against","ain","all","am","an","and","any","are","aren","as","at",
            "be","because","been","before","being","below","between","both","but","by",
            "can","couldn",
            "d","did","didn","do","does","doesn","doing","don","down","during",
            "each","few","for","from","further",
            "had","hadn","has","hasn","have","haven","having","he","her","here","hers","herself","him","himself","his","how",
            "i","if","in","into","is","isn","it","its","itself",
            "just","ll","m","ma","me","mightn","more","most","mustn","my","myself",
            "needn","no","nor","not","now",
            "o","of","off","on","once","only","or","other","our","ours","ourselves","out","over","own",
            "re","s","same","shan","she","should","shouldn","so","some","such",
            "t","than","that","the","their","theirs","them","themselves","then","there","these","they","this","those","through","to","too",
            "under","until","up","ve","very",
            "was","wasn","we","were","weren","what","when","where","which","while","who","whom","why","will","with","won","wouldn",
            "y","you","your","yours","yourself","yourselves"
        ];
        words.iter().copied().collect()
    };
}

/// Tokens of this many bytes or fewer are dropped.
const MIN_TOKEN_LEN: usize = 2;

pub fn is_stopword(token: &str) -> bool { STOPWORDS.contains(token) }

/// Normalize text into a sequence of stems.
///
/// Lowercase, drop every character that is not an ASCII letter or whitespace
/// (without inserting a separator, so `e-mail` becomes `email`), split on whitespace,
/// drop stopwords and short tokens, then stem what remains.
pub fn normalize(text: &str) -> Vec<String> {
    let lowered = text.to_lowercase();
    let letters = NON_LETTER.replace_all(&lowered, "");
    letters
        .split_whitespace()
        .filter(|token| token.len() > MIN_TOKEN_LEN && !is_stopword(token))
        .map(|token| STEMMER.stem(token).into_owned())
        .collect()
}
