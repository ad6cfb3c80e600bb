use rand::Rng;

use super::super::{Program, SECOND_MS};
use super::Edited;

const GRACE_MS: i64 = 5 * SECOND_MS;

/// Inserts an offline break before any program that would take the time
/// since the last break past `after` ms (plus a few seconds of grace).
///
/// Plain filler already counts as a break. The scan wraps once past the end
/// so a break owed before the first program on the next loop is appended at
/// the end. Break lengths are drawn uniformly from `min_sec..=max_sec`.
pub(crate) fn insert_breaks<R: Rng>(
    programs: &[Program],
    after: i64,
    min_sec: u32,
    max_sec: u32,
    rng: &mut R,
) -> Edited {
    let threshold = after + GRACE_MS;
    let (lo, hi) = if min_sec <= max_sec {
        (min_sec, max_sec)
    } else {
        (max_sec, min_sec)
    };

    let mut out = Vec::with_capacity(programs.len() * 2);
    let mut tired = 0;
    let mut inserted = 0;
    for (i, program) in programs.iter().chain(programs.first()).enumerate() {
        if program.is_filler() {
            tired = 0;
        } else {
            let duration = program.effective_duration();
            if tired > 0 && tired + duration >= threshold {
                out.push(Program::offline(SECOND_MS * i64::from(rng.gen_range(lo..=hi))));
                inserted += 1;
                tired = 0;
            }
            tired += duration;
        }
        if i < programs.len() {
            out.push(program.clone());
        }
    }

    tracing::debug!(inserted, "inserted breaks");
    Edited::keeping(out)
}
