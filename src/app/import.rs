use serde::Deserialize;

use crate::db::ChannelRecord;
use crate::timeline::{OnDemand, Program, ProgramKind, total_duration};

/// Channel JSON as exported by older tools. Programs are kept loose until
/// [`ImportedChannel::into_record`] cleans them.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ImportedChannel {
    number: u32,
    #[serde(default)]
    name: String,
    start_time: i64,
    #[serde(default)]
    programs: Vec<ImportedProgram>,
    #[serde(default)]
    on_demand: OnDemand,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ImportedProgram {
    #[serde(default)]
    duration: Option<f64>,
    #[serde(default, alias = "startPosition")]
    seek_position: i64,
    #[serde(default)]
    end_position: Option<i64>,
    #[serde(flatten)]
    kind: ProgramKind,
}

impl ImportedProgram {
    fn into_program(self, channel: u32) -> Option<Program> {
        let duration = match self.duration {
            Some(duration) if duration > 0.0 => duration,
            other => {
                tracing::warn!(channel, duration = ?other, "dropped program with invalid duration");
                return None;
            }
        };
        let rounded = duration.ceil();
        if rounded != duration {
            tracing::warn!(channel, duration, "rounded fractional program duration up");
        }
        Some(Program {
            duration: rounded as i64,
            seek_position: self.seek_position,
            end_position: self.end_position,
            kind: self.kind,
        })
    }
}

impl ImportedChannel {
    /// Drops programs without a positive duration, rounds fractional
    /// durations up and recomputes the channel duration. Returns the record
    /// and how many programs were dropped.
    pub(crate) fn into_record(self) -> (ChannelRecord, usize) {
        let number = self.number;
        let before = self.programs.len();
        let programs: Vec<Program> = self
            .programs
            .into_iter()
            .filter_map(|program| program.into_program(number))
            .collect();
        let dropped = before - programs.len();

        let record = ChannelRecord {
            number,
            name: self.name,
            start_time: self.start_time,
            duration: total_duration(&programs),
            programs,
            on_demand: self.on_demand,
        };
        (record, dropped)
    }
}
