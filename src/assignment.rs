use bit_set::BitSet;

use crate::{Crossword, SlotId, Vocabulary, WordId};

/// A struct recording a slot assignment made during the filling process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Choice {
    pub slot_id: SlotId,
    pub word_id: WordId,
}

/// A partial mapping from slot to word. Choices are pushed when the search enters a branch and
/// popped when it leaves, so `choices` is always in the order the search made them.
#[derive(Debug, Clone)]
pub struct Assignment {
    choices: Vec<Choice>,
    words_by_slot: Vec<Option<WordId>>,
    used_words: BitSet,
}

impl Assignment {
    pub fn new(slot_count: usize) -> Assignment {
        Assignment {
            choices: Vec::with_capacity(slot_count),
            words_by_slot: vec![None; slot_count],
            used_words: BitSet::new(),
        }
    }

    /// Assign a word to an unassigned slot.
    pub fn insert(&mut self, slot_id: SlotId, word_id: WordId) {
        debug_assert!(self.words_by_slot[slot_id].is_none(), "slot {} assigned twice", slot_id);

        self.words_by_slot[slot_id] = Some(word_id);
        self.used_words.insert(word_id);
        self.choices.push(Choice { slot_id, word_id });
    }

    /// Unassign a slot, returning the word it held. Removing anything but the most recent choice
    /// is allowed but costs a linear scan.
    pub fn remove(&mut self, slot_id: SlotId) -> Option<WordId> {
        let word_id = self.words_by_slot[slot_id].take()?;

        let idx = self.choices.iter().rposition(|choice| choice.slot_id == slot_id)?;
        self.choices.remove(idx);

        // The same word may still sit in another slot of an invalid assignment.
        if !self.choices.iter().any(|choice| choice.word_id == word_id) {
            self.used_words.remove(word_id);
        }

        Some(word_id)
    }

    pub fn get(&self, slot_id: SlotId) -> Option<WordId> {
        self.words_by_slot[slot_id]
    }

    pub fn contains_slot(&self, slot_id: SlotId) -> bool {
        self.words_by_slot[slot_id].is_some()
    }

    /// Is this word already assigned to some slot?
    pub fn uses_word(&self, word_id: WordId) -> bool {
        self.used_words.contains(word_id)
    }

    /// Number of assigned slots.
    pub fn len(&self) -> usize {
        self.choices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.choices.is_empty()
    }

    /// Does every slot have a word?
    pub fn is_complete(&self) -> bool {
        self.words_by_slot.iter().all(|word| word.is_some())
    }

    pub fn choices(&self) -> &[Choice] {
        &self.choices
    }

    /// Assigned (slot, word) pairs in slot id order.
    pub fn iter(&self) -> impl Iterator<Item=(SlotId, WordId)> + '_ {
        self.words_by_slot.iter().enumerate()
            .filter_map(|(slot_id, word)| word.map(|word_id| (slot_id, word_id)))
    }

    /// The assigned word strings indexed by slot id.
    pub fn words<'a>(&self, vocabulary: &'a Vocabulary) -> Vec<Option<&'a str>> {
        self.words_by_slot.iter()
            .map(|word| word.map(|word_id| vocabulary.word(word_id).string.as_str()))
            .collect()
    }

    /// Check the whole assignment against the puzzle: every word fits its slot's length, no word is
    /// used twice, and crossing slots agree on their shared letter.
    pub fn is_valid(&self, crossword: &Crossword, vocabulary: &Vocabulary) -> bool {
        let mut seen = BitSet::with_capacity(vocabulary.len());

        for (slot_id, word_id) in self.iter() {
            let word = vocabulary.word(word_id);
            if word.len() != crossword.variable(slot_id).length || !seen.insert(word_id) {
                return false;
            }

            for crossing in crossword.crossings(slot_id) {
                if let Some(other_word_id) = self.get(crossing.other_slot_id) {
                    let other_word = vocabulary.word(other_word_id);
                    if word.glyphs[crossing.cell] != other_word.glyphs[crossing.other_slot_cell] {
                        return false;
                    }
                }
            }
        }

        true
    }
}

#[cfg(test)]
mod tests {
    use crate::Direction::{Across, Down};
    use crate::{Assignment, Choice, Crossword, Variable, Vocabulary};

    fn corner() -> (Crossword, Vocabulary) {
        let crossword = Crossword::from_variables(vec![
            Variable::new((0, 0), Across, 3),
            Variable::new((0, 0), Down, 3),
        ]).unwrap();
        let vocabulary = Vocabulary::new(["CAT", "CAR", "DOG", "BOAT"]);
        (crossword, vocabulary)
    }

    #[test]
    fn test_assignment_is_a_stack() {
        let mut assignment = Assignment::new(3);
        assert!(assignment.is_empty());

        assignment.insert(2, 7);
        assignment.insert(0, 4);
        assert_eq!(assignment.len(), 2);
        assert!(!assignment.is_complete());
        assert!(assignment.uses_word(7));
        assert_eq!(assignment.choices(), &[
            Choice { slot_id: 2, word_id: 7 },
            Choice { slot_id: 0, word_id: 4 },
        ]);

        assert_eq!(assignment.remove(0), Some(4));
        assert_eq!(assignment.remove(0), None);
        assert!(!assignment.uses_word(4));
        assert!(!assignment.contains_slot(0));

        assignment.insert(0, 1);
        assignment.insert(1, 2);
        assert!(assignment.is_complete());
        assert_eq!(assignment.iter().collect::<Vec<_>>(), vec![(0, 1), (1, 2), (2, 7)]);
    }

    #[test]
    fn test_is_valid_checks_crossings_lengths_and_dupes() {
        let (crossword, vocabulary) = corner();
        let id = |word: &str| vocabulary.id_of(word).unwrap();

        let mut assignment = Assignment::new(2);
        assignment.insert(0, id("CAT"));
        assignment.insert(1, id("CAR"));
        assert!(assignment.is_valid(&crossword, &vocabulary));
        assert_eq!(assignment.words(&vocabulary), vec![Some("CAT"), Some("CAR")]);

        assignment.remove(1);
        assignment.insert(1, id("DOG"));
        assert!(!assignment.is_valid(&crossword, &vocabulary), "crossing letters disagree");

        assignment.remove(1);
        assignment.insert(1, id("CAT"));
        assert!(!assignment.is_valid(&crossword, &vocabulary), "word used twice");

        assignment.remove(1);
        assignment.remove(0);
        assignment.insert(0, id("BOAT"));
        assert!(!assignment.is_valid(&crossword, &vocabulary), "word too long for slot");
    }
}
