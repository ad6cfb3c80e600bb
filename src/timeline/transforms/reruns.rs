use chrono::FixedOffset;

use super::super::{Program, SECOND_MS, TimelineError, local_midnight};
use super::Edited;

// A program may spill this far past a block before it is pushed to the next one.
const BLOCK_SPILL_MS: i64 = 500;
// Gaps shorter than this are not worth a filler.
const MIN_PAD_MS: i64 = SECOND_MS;

/// Cuts the schedule into consecutive blocks of `block_size` ms and airs
/// each block `repeats` times in a row, padding every block with offline
/// filler up to the next block boundary.
///
/// The anchor moves to `day_offset` ms after local midnight of the day the
/// schedule currently starts on.
pub(crate) fn rerun_blocks(
    programs: &[Program],
    start_time: i64,
    block_size: i64,
    repeats: usize,
    day_offset: i64,
    offset: FixedOffset,
) -> Result<Edited, TimelineError> {
    if block_size <= 0 {
        return Err(TimelineError::InvalidParameter(format!(
            "rerun block size must be positive, got {block_size} ms"
        )));
    }
    let mut builder = RerunBuilder {
        out: Vec::new(),
        emitted: 0,
        block_size,
        repeats: repeats.max(1),
    };

    let mut block = Vec::new();
    let mut block_len = 0;
    for program in programs {
        let d = program.effective_duration();
        if !block.is_empty() && block_len + d - block_size >= BLOCK_SPILL_MS {
            builder.close(std::mem::take(&mut block), block_len);
            block_len = 0;
        }
        block.push(program.clone());
        block_len += d;
    }
    if !block.is_empty() {
        builder.close(block, block_len);
    }

    let anchor = local_midnight(start_time, offset) + day_offset;
    tracing::debug!(
        programs = builder.out.len(),
        block_size,
        repeats = builder.repeats,
        "built rerun blocks"
    );
    Ok(Edited::keeping(builder.out).anchored_at(anchor))
}

struct RerunBuilder {
    out: Vec<Program>,
    emitted: i64,
    block_size: i64,
    repeats: usize,
}

impl RerunBuilder {
    fn close(&mut self, mut block: Vec<Program>, mut block_len: i64) {
        let mut high = self.emitted + block_len;
        let overshoot = high.rem_euclid(self.block_size);
        if overshoot >= MIN_PAD_MS {
            high += self.block_size - overshoot;
        }
        let pad = (high - self.emitted - block_len).max(0);
        if pad >= MIN_PAD_MS {
            block_len += pad;
            match block.last_mut() {
                Some(last) if last.is_filler() && last.end_position.is_none() => {
                    last.duration += pad;
                }
                _ => block.push(Program::offline(pad)),
            }
        }

        for _ in 0..self.repeats {
            self.out.extend(block.iter().cloned());
        }
        self.emitted += self.repeats as i64 * block_len;
    }
}

#[cfg(test)]
mod tests {
    use super::super::super::test_support::*;
    use super::super::super::{HOUR_MS, MINUTE_MS, rebuild};
    use super::*;

    const DAY_START: i64 = 19_724 * 24 * HOUR_MS;

    fn utc() -> FixedOffset {
        FixedOffset::east_opt(0).expect("utc")
    }

    #[test]
    fn exact_block_is_repeated_without_filler() {
        let programs = vec![ep("A", 1, 1, 120), ep("A", 1, 2, 60), ep("B", 1, 1, 60)];

        let edited = rerun_blocks(&programs, DAY_START, 4 * HOUR_MS, 3, 0, utc())
            .expect("valid block size");

        assert_eq!(edited.programs.len(), 3 * programs.len());
        assert!(edited.programs.iter().all(|program| !program.is_offline()));
        assert_eq!(
            titles(&edited.programs[3..6]),
            vec!["A 1x01", "A 1x02", "B 1x01"]
        );
    }

    #[test]
    fn short_blocks_are_padded_to_the_boundary() {
        let programs = vec![
            ep("A", 1, 1, 90),
            ep("A", 1, 2, 90),
            ep("B", 1, 1, 90),
            ep("B", 1, 2, 45),
        ];

        let edited = rerun_blocks(&programs, DAY_START, 4 * HOUR_MS, 2, 0, utc())
            .expect("valid block size");

        // 90+90 fits a 4h block, a third 90 does not.
        assert_eq!(
            titles(&edited.programs),
            vec![
                "A 1x01",
                "A 1x02",
                format!("offline:{}", 60 * MINUTE_MS).as_str(),
                "A 1x01",
                "A 1x02",
                format!("offline:{}", 60 * MINUTE_MS).as_str(),
                "B 1x01",
                "B 1x02",
                format!("offline:{}", 105 * MINUTE_MS).as_str(),
                "B 1x01",
                "B 1x02",
                format!("offline:{}", 105 * MINUTE_MS).as_str(),
            ]
        );
        let timeline = rebuild(&edited.programs, 0);
        assert_eq!(timeline.duration, 4 * 4 * HOUR_MS);
    }

    #[test]
    fn trailing_filler_is_extended_instead_of_duplicated() {
        let programs = vec![ep("A", 1, 1, 60), Program::offline(30 * MINUTE_MS)];

        let edited = rerun_blocks(&programs, DAY_START, 2 * HOUR_MS, 1, 0, utc())
            .expect("valid block size");

        assert_eq!(
            titles(&edited.programs),
            vec!["A 1x01", format!("offline:{}", 60 * MINUTE_MS).as_str()]
        );
    }

    #[test]
    fn small_spill_stays_in_block() {
        let programs = vec![
            clip("a", HOUR_MS),
            clip("b", HOUR_MS + 400),
            clip("c", HOUR_MS),
        ];

        let edited = rerun_blocks(&programs, DAY_START, 2 * HOUR_MS, 1, 0, utc())
            .expect("valid block size");

        assert_eq!(titles(&edited.programs[..2]), vec!["a", "b"]);
        assert_eq!(titles(&edited.programs[2..3]), vec!["c"]);
    }

    #[test]
    fn anchor_moves_to_local_rerun_start() {
        let offset = FixedOffset::east_opt(2 * 3600).expect("offset");
        let start = DAY_START + 10 * HOUR_MS;

        let edited = rerun_blocks(&[clip("a", HOUR_MS)], start, HOUR_MS, 1, 6 * HOUR_MS, offset)
            .expect("valid block size");

        // Local midnight at +02:00 is 22:00 UTC the previous day.
        assert_eq!(edited.start_time, Some(DAY_START - 2 * HOUR_MS + 6 * HOUR_MS));
    }

    #[test]
    fn non_positive_block_size_is_rejected() {
        assert!(rerun_blocks(&[clip("a", 1)], 0, 0, 2, 0, utc()).is_err());
    }

    #[test]
    fn empty_schedule_yields_empty_reruns() {
        let edited = rerun_blocks(&[], DAY_START, HOUR_MS, 4, 0, utc()).expect("valid");
        assert!(edited.programs.is_empty());
    }
}
