use chrono::FixedOffset;

use super::super::{HOUR_MS, MINUTE_MS, Program, SECOND_MS, local_phase};
use super::{Edited, remove_offline};

const MIN_GAP_MS: i64 = 15 * SECOND_MS;
const SNAP_MS: i64 = 5 * MINUTE_MS;

/// Pads programs with offline filler so they start on local clock
/// boundaries of `modulo` ms (an hour when `modulo` is not positive).
///
/// Existing filler is removed first and the anchor moves down to the
/// preceding boundary. Gaps under 15 s are left alone except after the last
/// program. With `allow_five`, a program that overruns a boundary by at most
/// five minutes is padded to the five minute mark instead.
pub(crate) fn pad_to_clock(
    programs: &[Program],
    start_time: i64,
    modulo: i64,
    allow_five: bool,
    offset: FixedOffset,
) -> Edited {
    let modulo = if modulo > 0 { modulo } else { HOUR_MS };
    let programs = remove_offline(programs).programs;
    let anchor = start_time - local_phase(start_time, modulo, offset);

    let mut out = Vec::with_capacity(programs.len() * 2);
    let mut t = anchor;
    for (i, program) in programs.iter().enumerate() {
        out.push(program.clone());
        t += program.effective_duration();

        let last = i + 1 == programs.len();
        let past = local_phase(t, modulo, offset);
        let mut gap = (modulo - past).rem_euclid(modulo);
        if (last && past != 0) || (past >= MIN_GAP_MS && gap >= MIN_GAP_MS) {
            if allow_five && past <= SNAP_MS {
                gap = SNAP_MS - past;
            }
            if gap > 0 {
                out.push(Program::offline(gap));
                t += gap;
            }
        }
    }

    tracing::debug!(modulo, programs = out.len(), "padded to clock");
    Edited::keeping(out).anchored_at(anchor)
}
