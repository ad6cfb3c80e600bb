use std::collections::HashMap;

use super::{Program, ShowClassifier, ShowInfo, TimelineError};

/// Per-show "which episode airs first" snapshot.
///
/// `save` arms the snapshot; `recover` may then be applied any number of
/// times until the memory is re-saved or invalidated.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct EpisodeMemory {
    positions: HashMap<String, i64>,
    saved: bool,
}

impl EpisodeMemory {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn is_saved(&self) -> bool {
        self.saved
    }

    pub(crate) fn remembered(&self, show_id: &str) -> Option<i64> {
        self.positions.get(show_id).copied()
    }

    pub(crate) fn len(&self) -> usize {
        self.positions.len()
    }

    pub(crate) fn invalidate(&mut self) {
        self.positions.clear();
        self.saved = false;
    }

    pub(crate) fn save<C: ShowClassifier + ?Sized>(&mut self, programs: &[Program], classifier: &C) {
        self.positions.clear();
        for program in programs {
            let info = classifier.classify(program);
            if info.has_show {
                self.positions.entry(info.show_id).or_insert(info.order);
            }
        }
        self.saved = true;
        tracing::debug!(shows = self.len(), "saved episode positions");
    }

    pub(crate) fn recover<C: ShowClassifier + ?Sized>(
        &self,
        programs: &[Program],
        classifier: &C,
    ) -> Result<Vec<Program>, TimelineError> {
        if !self.is_saved() {
            return Err(TimelineError::RecoveryUnavailable);
        }
        Ok(self.recover_saved(programs, classifier))
    }

    pub(super) fn recover_saved<C: ShowClassifier + ?Sized>(
        &self,
        programs: &[Program],
        classifier: &C,
    ) -> Vec<Program> {
        let infos: Vec<ShowInfo> = programs.iter().map(|p| classifier.classify(p)).collect();

        // Canonical rotation per show: every distinct episode once in ordinal
        // order, then every second copy, and so on.
        let mut seen_copies: HashMap<(&str, i64), usize> = HashMap::new();
        let mut sequences: HashMap<&str, Vec<(usize, i64, usize)>> = HashMap::new();
        for (idx, info) in infos.iter().enumerate() {
            if !info.has_show {
                continue;
            }
            let copies = seen_copies
                .entry((info.show_id.as_str(), info.order))
                .or_insert(0);
            sequences
                .entry(info.show_id.as_str())
                .or_default()
                .push((*copies, info.order, idx));
            *copies += 1;
        }

        let mut cursors: HashMap<&str, usize> = HashMap::new();
        for (show_id, sequence) in sequences.iter_mut() {
            sequence.sort_by_key(|&(copies, order, _)| (copies, order));
            if let Some(remembered) = self.remembered(show_id) {
                let start = sequence
                    .iter()
                    .position(|&(_, order, _)| order == remembered)
                    .unwrap_or(0);
                cursors.insert(*show_id, start);
            }
        }

        let mut recovered = programs.to_vec();
        for (slot, info) in infos.iter().enumerate() {
            if !info.has_show {
                continue;
            }
            let show_id = info.show_id.as_str();
            let (Some(cursor), Some(sequence)) = (cursors.get_mut(show_id), sequences.get(show_id))
            else {
                continue;
            };
            recovered[slot] = programs[sequence[*cursor].2].clone();
            *cursor = (*cursor + 1) % sequence.len();
        }
        recovered
    }
}
