use std::collections::VecDeque;

use rand::Rng;
use rand::seq::SliceRandom;

use super::super::{
    EpisodeMemory, MOVIE_SHOW_ID, Program, ShowClassifier, TimelineError, group,
};
use super::Edited;

/// Uniformly permutes `programs[lo..hi]`; everything outside the range stays put.
pub(crate) fn random_shuffle<R: Rng>(
    programs: &[Program],
    lo: usize,
    hi: usize,
    rng: &mut R,
) -> Result<Edited, TimelineError> {
    if lo > hi || hi > programs.len() {
        return Err(TimelineError::InvalidRange {
            lo,
            hi,
            len: programs.len(),
        });
    }
    let mut shuffled = programs.to_vec();
    shuffled[lo..hi].shuffle(rng);
    Ok(Edited::keeping(shuffled))
}

pub(crate) fn shuffle_all<R: Rng>(programs: &[Program], rng: &mut R) -> Edited {
    let mut shuffled = programs.to_vec();
    shuffled.shuffle(rng);
    Edited::keeping(shuffled)
}

/// Randomizes clip order while every show keeps airing its episodes in
/// rotation from the episode that aired first before the shuffle.
///
/// Uses a private memory; any memory the caller holds is left alone.
pub(crate) fn cyclic_shuffle<C: ShowClassifier + ?Sized, R: Rng>(
    programs: &[Program],
    classifier: &C,
    rng: &mut R,
) -> Edited {
    let mut memory = EpisodeMemory::new();
    memory.save(programs, classifier);
    let shuffled = shuffle_all(programs, rng).programs;
    Edited::keeping(memory.recover_saved(&shuffled, classifier))
}

/// Interleaves shows in blocks of up to `block_count` consecutive episodes.
///
/// Movies are kept in their original order at the end. Offline filler and
/// redirects are dropped.
pub(crate) fn block_shuffle<C: ShowClassifier + ?Sized, R: Rng>(
    programs: &[Program],
    classifier: &C,
    block_count: usize,
    randomize: bool,
    rng: &mut R,
) -> Edited {
    let block_count = block_count.max(1);
    let mut shows = group(programs, classifier);
    let movies = shows.shift_remove(MOVIE_SHOW_ID).unwrap_or_default();
    let mut queues: Vec<VecDeque<Program>> =
        shows.into_values().map(VecDeque::from).collect();

    let mut out = Vec::with_capacity(programs.len());
    let mut index = if randomize && !queues.is_empty() {
        rng.gen_range(0..queues.len())
    } else {
        0
    };

    while !queues.is_empty() {
        let queue = &mut queues[index];
        for _ in 0..block_count {
            match queue.pop_front() {
                Some(program) => out.push(program),
                None => break,
            }
        }

        let exhausted = queues[index].is_empty();
        if exhausted {
            queues.remove(index);
        }
        if queues.is_empty() {
            break;
        }

        if randomize {
            index = if exhausted {
                rng.gen_range(0..queues.len())
            } else {
                pick_other(rng, queues.len(), index)
            };
        } else {
            if !exhausted {
                index += 1;
            }
            if index >= queues.len() {
                index = 0;
            }
        }
    }

    out.extend(movies);
    tracing::debug!(programs = out.len(), block_count, randomize, "block shuffle");
    Edited::keeping(out)
}

// Uniform over every index except `current`, in a single draw.
fn pick_other<R: Rng>(rng: &mut R, len: usize, current: usize) -> usize {
    if len < 2 {
        return 0;
    }
    let pick = rng.gen_range(0..len - 1);
    if pick >= current { pick + 1 } else { pick }
}

pub(crate) fn replicate(programs: &[Program], times: usize) -> Edited {
    if programs.is_empty() {
        return Edited::keeping(Vec::new());
    }
    let mut out = Vec::with_capacity(programs.len() * times);
    for _ in 0..times {
        out.extend(programs.iter().cloned());
    }
    Edited::keeping(out)
}

/// Shuffles once, replicates, then reshuffles each half of every copy on its
/// own so consecutive copies differ but keep their halves apart.
pub(crate) fn shuffle_replicate<R: Rng>(programs: &[Program], times: usize, rng: &mut R) -> Edited {
    let base = shuffle_all(programs, rng).programs;
    if base.is_empty() {
        return Edited::keeping(base);
    }
    let n = base.len();
    let half = n / 2;
    let mut out = replicate(&base, times).programs;
    for copy in 0..times {
        let start = n * copy;
        out[start..start + half].shuffle(rng);
        out[start + half..start + n].shuffle(rng);
    }
    Edited::keeping(out)
}
