//! Text layer: answer-option normalization, stem extraction, and the word
//! tables the similarity analyzer consults.

pub mod lexicon;
pub mod normalize;
pub mod stems;

pub use lexicon::{Lexicon, DEFAULT_ANTONYMS, DEFAULT_NEGATIONS, DEFAULT_STOPWORDS};
pub use normalize::{
    normalize_answer, normalize_distractors, normalize_options, split_raw_options,
    NormalizedOptions,
};
pub use stems::{content_stems, stem, word_count};
