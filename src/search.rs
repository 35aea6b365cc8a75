use std::cmp::Reverse;
use std::collections::HashMap;

use instant::{Duration, Instant};
use smallvec::SmallVec;
use thiserror::Error;
use tracing::{debug, info, trace};

use crate::consistency::{self, establish_arc_consistency, Arc};
use crate::{
    Assignment, Crossing, Crossword, Domains, SlotId, SolverConfig, Vocabulary, WordId,
    MAX_SLOT_LENGTH,
};

/// A struct tracking statistics about the filling process.
#[derive(Debug, Clone, Default)]
pub struct Statistics {
    /// Search nodes entered, i.e. slots we started picking a word for.
    pub states: u64,
    /// Tentative assignments that were undone.
    pub backtracks: u64,
    /// Arc revisions that removed at least one word.
    pub revisions: u64,
    pub duration: Duration,
}

/// A struct representing the results of a fill operation.
#[derive(Debug)]
pub struct FillSuccess {
    pub statistics: Statistics,
    pub assignment: Assignment,
}

/// The puzzle can't be filled from the vocabulary. Whether that was proven by arc consistency up
/// front or by exhausting the search isn't distinguished.
#[derive(Debug, Error)]
#[error("No solution.")]
pub struct NoSolution {
    pub statistics: Statistics,
}

/// Backtracking filler over a crossword and vocabulary. Owns the live domains for one solve.
pub struct Filler<'a> {
    crossword: &'a Crossword,
    vocabulary: &'a Vocabulary,
    config: SolverConfig,
    domains: Domains,
    statistics: Statistics,
}

impl<'a> Filler<'a> {
    pub fn new(crossword: &'a Crossword, vocabulary: &'a Vocabulary) -> Filler<'a> {
        Filler::with_config(crossword, vocabulary, SolverConfig::default())
    }

    /// Seed every slot's domain with the whole vocabulary.
    pub fn with_config(
        crossword: &'a Crossword,
        vocabulary: &'a Vocabulary,
        config: SolverConfig,
    ) -> Filler<'a> {
        Filler {
            crossword,
            vocabulary,
            config,
            domains: Domains::new(crossword.slot_count(), vocabulary.len()),
            statistics: Statistics::default(),
        }
    }

    pub fn domains(&self) -> &Domains {
        &self.domains
    }

    pub fn domains_mut(&mut self) -> &mut Domains {
        &mut self.domains
    }

    pub fn statistics(&self) -> &Statistics {
        &self.statistics
    }

    pub fn enforce_node_consistency(&mut self) {
        consistency::enforce_node_consistency(self.crossword, self.vocabulary, &mut self.domains);
    }

    pub fn revise(&mut self, x: SlotId, y: SlotId) -> bool {
        consistency::revise(self.crossword, self.vocabulary, &mut self.domains, x, y)
    }

    pub fn ac3(&mut self, arcs: Option<Vec<Arc>>) -> bool {
        establish_arc_consistency(
            self.crossword,
            self.vocabulary,
            &mut self.domains,
            arcs,
            &mut self.statistics.revisions,
        )
    }

    /// Could `word_id` go in `slot_id` given what's already assigned? It has to be the right
    /// length, not already used elsewhere, and agree with every assigned crossing slot.
    pub fn consistent(&self, assignment: &Assignment, slot_id: SlotId, word_id: WordId) -> bool {
        let word = self.vocabulary.word(word_id);
        if word.len() != self.crossword.variable(slot_id).length {
            return false;
        }

        if assignment.uses_word(word_id) && assignment.get(slot_id) != Some(word_id) {
            return false;
        }

        self.crossword.crossings(slot_id).iter().all(|crossing| {
            match assignment.get(crossing.other_slot_id) {
                Some(other_word_id) => {
                    word.glyphs[crossing.cell] ==
                        self.vocabulary.word(other_word_id).glyphs[crossing.other_slot_cell]
                }
                None => true,
            }
        })
    }

    /// Pick the unassigned slot with the fewest remaining candidates, preferring the slot with
    /// the most crossings on a tie. Returns `None` if every slot is assigned.
    pub fn select_unassigned_variable(&self, assignment: &Assignment) -> Option<SlotId> {
        (0..self.crossword.slot_count())
            .filter(|&slot_id| !assignment.contains_slot(slot_id))
            .min_by_key(|&slot_id| {
                (self.domains.len(slot_id), Reverse(self.crossword.degree(slot_id)))
            })
    }

    /// The slot's candidates, ordered so that the word ruling out the fewest options in unassigned
    /// crossing slots comes first. Ties keep word id order.
    pub fn order_domain_values(&self, slot_id: SlotId, assignment: &Assignment) -> Vec<WordId> {
        // For each unassigned crossing, how many of its candidates put each glyph in the shared
        // cell, and how many candidates it has in total.
        let crossing_counts: SmallVec<[(&Crossing, HashMap<char, usize>, usize); MAX_SLOT_LENGTH]> =
            self.crossword.crossings(slot_id).iter()
                .filter(|crossing| !assignment.contains_slot(crossing.other_slot_id))
                .map(|crossing| {
                    let mut glyph_counts: HashMap<char, usize> = HashMap::new();
                    let mut total = 0;
                    for other_word_id in self.domains.iter(crossing.other_slot_id) {
                        let glyph = self.vocabulary.word(other_word_id).glyphs[crossing.other_slot_cell];
                        *glyph_counts.entry(glyph).or_insert(0) += 1;
                        total += 1;
                    }
                    (crossing, glyph_counts, total)
                })
                .collect();

        let mut values: Vec<WordId> = self.domains.iter(slot_id).collect();
        values.sort_by_cached_key(|&word_id| {
            let word = self.vocabulary.word(word_id);
            crossing_counts.iter().map(|(crossing, glyph_counts, total)| {
                total - glyph_counts.get(&word.glyphs[crossing.cell]).copied().unwrap_or(0)
            }).sum::<usize>()
        });

        values
    }

    /// Narrow the domains to reflect assigning `word_id` to `slot_id`, and propagate. Returns
    /// `false` if some slot is left with no candidates.
    fn propagate(&mut self, assignment: &Assignment, slot_id: SlotId, word_id: WordId) -> bool {
        self.domains.restrict_to(slot_id, word_id);

        let mut arcs: Vec<Arc> =
            self.crossword.neighbors(slot_id).map(|neighbor| (neighbor, slot_id)).collect();

        if self.config.eliminate_duplicates {
            let length = self.crossword.variable(slot_id).length;

            for other_slot_id in 0..self.crossword.slot_count() {
                if {
                    other_slot_id == slot_id ||
                        assignment.contains_slot(other_slot_id) ||
                        self.crossword.variable(other_slot_id).length != length
                } {
                    continue;
                }

                if self.domains.remove(other_slot_id, word_id) {
                    if self.domains.is_empty(other_slot_id) {
                        return false;
                    }
                    arcs.extend(self.crossword.neighbors(other_slot_id).map(|z| (z, other_slot_id)));
                }
            }
        }

        self.ac3(Some(arcs))
    }

    /// Extend `assignment` to a complete one. On success returns `true` with the assignment filled
    /// in; on failure returns `false` with the assignment as it was passed in.
    pub fn backtrack(&mut self, assignment: &mut Assignment) -> bool {
        if assignment.is_complete() {
            return true;
        }

        let Some(slot_id) = self.select_unassigned_variable(assignment) else {
            return false;
        };
        self.statistics.states += 1;

        for word_id in self.order_domain_values(slot_id, assignment) {
            if !self.consistent(assignment, slot_id, word_id) {
                continue;
            }

            assignment.insert(slot_id, word_id);
            trace!(
                slot_id,
                word = %self.vocabulary.word(word_id).string,
                depth = assignment.len(),
                "trying word"
            );

            self.domains.checkpoint();
            if self.propagate(assignment, slot_id, word_id) && self.backtrack(assignment) {
                self.domains.commit();
                return true;
            }

            self.statistics.backtracks += 1;
            if self.config.restore_on_backtrack {
                self.domains.rollback();
            } else {
                self.domains.commit();
            }
            assignment.remove(slot_id);
        }

        trace!(slot_id, "no candidate worked, backtracking");
        false
    }

    /// Enforce node and arc consistency, then search. The domains are reseeded from the
    /// vocabulary first, so calling this again starts over.
    pub fn solve(&mut self) -> Option<Assignment> {
        let start = Instant::now();
        let slot_count = self.crossword.slot_count();

        self.domains = Domains::new(slot_count, self.vocabulary.len());
        self.statistics = Statistics::default();
        debug!(slots = slot_count, words = self.vocabulary.len(), "starting fill");

        self.enforce_node_consistency();

        let result = if self.ac3(None) {
            debug!(revisions = self.statistics.revisions, "initial arc consistency established");

            let mut assignment = Assignment::new(slot_count);
            if self.backtrack(&mut assignment) {
                Some(assignment)
            } else {
                None
            }
        } else {
            debug!("initial arc consistency emptied a domain");
            None
        };

        self.statistics.duration = start.elapsed();
        info!(
            solved = result.is_some(),
            states = self.statistics.states,
            backtracks = self.statistics.backtracks,
            revisions = self.statistics.revisions,
            duration = ?self.statistics.duration,
            "fill finished"
        );

        result
    }
}

/// Search for a valid fill for the given grid and vocabulary.
pub fn find_fill(crossword: &Crossword, vocabulary: &Vocabulary) -> Result<FillSuccess, NoSolution> {
    find_fill_with_config(crossword, vocabulary, &SolverConfig::default())
}

/// Search for a valid fill with explicit solver settings.
pub fn find_fill_with_config(
    crossword: &Crossword,
    vocabulary: &Vocabulary,
    config: &SolverConfig,
) -> Result<FillSuccess, NoSolution> {
    let mut filler = Filler::with_config(crossword, vocabulary, config.clone());

    match filler.solve() {
        Some(assignment) => Ok(FillSuccess { statistics: filler.statistics.clone(), assignment }),
        None => Err(NoSolution { statistics: filler.statistics.clone() }),
    }
}
