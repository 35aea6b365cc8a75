use std::collections::HashMap;
use std::fmt::{Debug, Formatter};

use smallvec::SmallVec;

use crate::{WordId, MAX_SLOT_LENGTH};

/// A struct representing a word that can be chosen for a given slot.
#[derive(Debug, Clone)]
pub struct Word {
    pub string: String,
    pub glyphs: SmallVec<[char; MAX_SLOT_LENGTH]>,
}

impl Word {
    /// Number of letters in the word, which is what has to match a slot's length.
    pub fn len(&self) -> usize {
        self.glyphs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.glyphs.is_empty()
    }
}

/// The immutable set of candidate words. Each distinct word gets a stable `WordId` equal to the
/// position at which it was first seen, so domains can refer to words by index.
pub struct Vocabulary {
    words: Vec<Word>,
    ids_by_string: HashMap<String, WordId>,
}

impl Debug for Vocabulary {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Vocabulary")
            .field("words", &(["(", &self.words.len().to_string(), " entries)"].join("")))
            .finish()
    }
}

impl Vocabulary {
    /// Build a vocabulary from raw strings. Entries are trimmed and upper-cased; blank entries
    /// and repeats are dropped.
    pub fn new<I, S>(words: I) -> Vocabulary
        where
            I: IntoIterator<Item=S>,
            S: AsRef<str>,
    {
        let mut vocabulary = Vocabulary { words: vec![], ids_by_string: HashMap::new() };

        for raw in words {
            let string = raw.as_ref().trim().to_uppercase();
            if string.is_empty() || vocabulary.ids_by_string.contains_key(&string) {
                continue;
            }

            vocabulary.ids_by_string.insert(string.clone(), vocabulary.words.len());
            vocabulary.words.push(Word { glyphs: string.chars().collect(), string });
        }

        vocabulary
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Look up a word by id. Ids come from this vocabulary, so an unknown id is a bug.
    pub fn word(&self, word_id: WordId) -> &Word {
        &self.words[word_id]
    }

    /// Find the id of a word, ignoring case and surrounding whitespace.
    pub fn id_of(&self, word: &str) -> Option<WordId> {
        self.ids_by_string.get(&word.trim().to_uppercase()).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item=(WordId, &Word)> {
        self.words.iter().enumerate()
    }
}
