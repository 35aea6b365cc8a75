use std::collections::{HashSet, VecDeque};

use tracing::{debug, trace};

use crate::{Crossword, Domains, SlotId, Vocabulary, WordId};

/// An ordered pair of crossing slots `(x, y)`: revising it makes `x` consistent with `y`.
pub type Arc = (SlotId, SlotId);

/// FIFO worklist of arcs for `ac3`. An arc that's already waiting isn't queued a second time.
#[derive(Debug)]
struct ConsistencyQueue {
    queue: VecDeque<Arc>,
    pending: HashSet<Arc>,
}

impl ConsistencyQueue {
    fn with_initial_queue<Items>(items: Items) -> ConsistencyQueue
        where
            Items: IntoIterator<Item=Arc>
    {
        let mut queue = ConsistencyQueue { queue: VecDeque::new(), pending: HashSet::new() };
        for arc in items {
            queue.enqueue(arc);
        }
        queue
    }

    fn pop_front(&mut self) -> Option<Arc> {
        let arc = self.queue.pop_front()?;
        self.pending.remove(&arc);
        Some(arc)
    }

    fn enqueue(&mut self, arc: Arc) {
        if self.pending.insert(arc) {
            self.queue.push_back(arc);
        }
    }
}

/// Remove every word whose length differs from its slot's length. Running it twice changes
/// nothing the second time.
pub fn enforce_node_consistency(crossword: &Crossword, vocabulary: &Vocabulary, domains: &mut Domains) {
    for (slot_id, variable) in crossword.variables().iter().enumerate() {
        let wrong_length: Vec<WordId> = domains.iter(slot_id)
            .filter(|&word_id| vocabulary.word(word_id).len() != variable.length)
            .collect();

        for word_id in wrong_length {
            domains.remove(slot_id, word_id);
        }

        if domains.is_empty(slot_id) {
            debug!(slot_id, length = variable.length, "no words of the right length for slot");
        }
    }
}

/// Make `x` arc consistent with `y`: drop every word in `x`'s domain that has no word in `y`'s
/// domain with the same letter in their shared cell. Returns whether `x`'s domain changed.
pub fn revise(
    crossword: &Crossword,
    vocabulary: &Vocabulary,
    domains: &mut Domains,
    x: SlotId,
    y: SlotId,
) -> bool {
    let Some((x_cell, y_cell)) = crossword.overlap(x, y) else {
        return false;
    };

    let acceptable_glyphs: HashSet<char> = domains.iter(y)
        .map(|word_id| vocabulary.word(word_id).glyphs[y_cell])
        .collect();

    let unsupported: Vec<WordId> = domains.iter(x)
        .filter(|&word_id| !acceptable_glyphs.contains(&vocabulary.word(word_id).glyphs[x_cell]))
        .collect();

    for &word_id in &unsupported {
        domains.remove(x, word_id);
    }

    !unsupported.is_empty()
}

/// Propagate arc consistency with AC-3. With `arcs` set to `None` the worklist starts with every
/// ordered pair of crossing slots; otherwise it starts with just the given arcs. Whenever a
/// revision shrinks `x`, every arc `(z, x)` is queued again.
///
/// Returns `false` if any domain ends up empty, `true` otherwise.
pub fn ac3(
    crossword: &Crossword,
    vocabulary: &Vocabulary,
    domains: &mut Domains,
    arcs: Option<Vec<Arc>>,
) -> bool {
    let mut revisions = 0;
    establish_arc_consistency(crossword, vocabulary, domains, arcs, &mut revisions)
}

/// `ac3`, also counting how many revisions shrank a domain.
pub(crate) fn establish_arc_consistency(
    crossword: &Crossword,
    vocabulary: &Vocabulary,
    domains: &mut Domains,
    arcs: Option<Vec<Arc>>,
    revisions: &mut u64,
) -> bool {
    let mut queue = match arcs {
        Some(arcs) => ConsistencyQueue::with_initial_queue(arcs),
        None => ConsistencyQueue::with_initial_queue(
            (0..crossword.slot_count()).flat_map(|x| crossword.neighbors(x).map(move |y| (x, y)))
        ),
    };

    while let Some((x, y)) = queue.pop_front() {
        if !revise(crossword, vocabulary, domains, x, y) {
            continue;
        }
        *revisions += 1;

        if domains.is_empty(x) {
            trace!(slot_id = x, other_slot_id = y, "domain wiped out");
            return false;
        }

        for z in crossword.neighbors(x) {
            queue.enqueue((z, x));
        }
    }

    !domains.any_empty()
}
