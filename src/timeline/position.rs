use serde::{Deserialize, Serialize};

use super::{Program, total_duration};

/// On-demand playback state as reported by the channel's policy provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct OnDemand {
    #[serde(default)]
    pub(crate) is_on_demand: bool,
    #[serde(default)]
    pub(crate) paused: bool,
    #[serde(default)]
    pub(crate) played_offset: i64,
    #[serde(default = "default_modulo")]
    pub(crate) modulo: i64,
    #[serde(default)]
    pub(crate) first_program_modulo: i64,
}

fn default_modulo() -> i64 {
    1
}

impl Default for OnDemand {
    fn default() -> Self {
        Self {
            is_on_demand: false,
            paused: false,
            played_offset: 0,
            modulo: default_modulo(),
            first_program_modulo: 0,
        }
    }
}

impl OnDemand {
    pub(crate) fn is_paused(&self) -> bool {
        self.is_on_demand && self.paused
    }
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Recovered {
    pub(crate) programs: Vec<Program>,
    pub(crate) start_time: i64,
}

/// Smallest non-negative shift that puts `anchor mod modulo` on `target`.
pub(crate) fn align_anchor(anchor: i64, modulo: i64, target: i64) -> i64 {
    if modulo <= 0 {
        return anchor;
    }
    let phase = anchor.rem_euclid(modulo);
    let target = target.rem_euclid(modulo);
    anchor + (target - phase).rem_euclid(modulo)
}

/// Rotates `programs` so that whatever is airing at `now` comes first, and
/// returns the anchor that keeps it airing at the same offset.
///
/// A paused on-demand policy replaces the stored anchor with one derived
/// from its played offset; callers pass the policy only once per session.
pub(crate) fn recover_position(
    programs: &[Program],
    start_time: i64,
    now: i64,
    on_demand: Option<&OnDemand>,
) -> Recovered {
    let mut anchor = start_time;
    if let Some(policy) = on_demand
        && policy.is_paused()
    {
        anchor = align_anchor(
            now - policy.played_offset,
            policy.modulo,
            policy.first_program_modulo,
        );
        tracing::debug!(anchor, "re-anchored paused on-demand channel");
    }

    let total = total_duration(programs);
    if total <= 0 {
        return Recovered {
            programs: programs.to_vec(),
            start_time: anchor,
        };
    }

    let elapsed = (now - anchor).rem_euclid(total);
    let mut running = 0;
    let mut current = 0;
    let mut offset = 0;
    for (idx, program) in programs.iter().enumerate() {
        let d = program.effective_duration();
        if running + d > elapsed {
            current = idx;
            offset = elapsed - running;
            break;
        }
        running += d;
    }

    let mut rotated = Vec::with_capacity(programs.len());
    rotated.extend_from_slice(&programs[current..]);
    rotated.extend_from_slice(&programs[..current]);

    Recovered {
        programs: rotated,
        start_time: now - offset,
    }
}

/// Moves the whole schedule `offset` ms earlier, then re-anchors on `now`.
pub(crate) fn slide(programs: &[Program], start_time: i64, offset: i64, now: i64) -> Recovered {
    let total = total_duration(programs);
    let mut anchor = start_time - offset;
    if total > 0 && anchor > now {
        let loops = (anchor - now + total - 1) / total;
        anchor -= loops * total;
    }
    recover_position(programs, anchor, now, None)
}
