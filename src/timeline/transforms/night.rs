use chrono::FixedOffset;

use super::super::{DAY_MS, HOUR_MS, Program, SECOND_MS, TimelineError, offset_ms};
use super::Edited;

// Overruns shorter than this are allowed to cross the window end.
const SPILL_MS: i64 = 30 * SECOND_MS;

/// Confines programming to the local daily window `[start_hour, end_hour)`,
/// wrapping past midnight when `end_hour < start_hour`.
///
/// Time outside the window is filled with offline filler, or with a redirect
/// to `overflow_channel` when one is given. A program that would overrun the
/// window end by 30 s or more is moved to the next window; one longer than
/// the whole window is clipped to it. The anchor moves back to the window
/// start preceding the current anchor.
pub(crate) fn night_window(
    programs: &[Program],
    start_time: i64,
    start_hour: u32,
    end_hour: u32,
    overflow_channel: Option<u32>,
    offset: FixedOffset,
) -> Result<Edited, TimelineError> {
    if start_hour >= 24 || end_hour >= 24 {
        return Err(TimelineError::InvalidParameter(format!(
            "window hours must be below 24, got {start_hour}..{end_hour}"
        )));
    }
    if start_hour == end_hour {
        return Ok(Edited::keeping(programs.to_vec()));
    }

    let window_start = (i64::from(start_hour) * HOUR_MS - offset_ms(offset)).rem_euclid(DAY_MS);
    let window = ((i64::from(end_hour) - i64::from(start_hour)) * HOUR_MS).rem_euclid(DAY_MS);
    let anchor = start_time - (start_time - window_start).rem_euclid(DAY_MS);

    let outside = |duration: i64| match overflow_channel {
        Some(channel) => Program::redirect(channel, duration),
        None => Program::offline(duration),
    };

    let mut out = Vec::with_capacity(programs.len() * 2);
    let mut position = 0;
    for program in programs {
        let duration = program.effective_duration();
        if position >= window {
            out.push(outside(DAY_MS - position));
            position = 0;
        }
        if position > 0 && position + duration - window >= SPILL_MS {
            let rest = window - position;
            if rest >= SPILL_MS {
                out.push(Program::offline(rest));
                position = window;
            }
            out.push(outside(DAY_MS - position));
            position = 0;
        }
        if duration - window >= SPILL_MS {
            out.push(program.clipped_to(window));
            position = window;
            continue;
        }
        out.push(program.clone());
        position += duration;
    }

    if position != 0 {
        if position < window {
            out.push(Program::offline(window - position));
            position = window;
        }
        out.push(outside(DAY_MS - position));
    }

    tracing::debug!(
        start_hour,
        end_hour,
        programs = out.len(),
        "confined schedule to window"
    );
    Ok(Edited::keeping(out).anchored_at(anchor))
}
