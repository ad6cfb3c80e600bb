mod clock;
mod error;
mod memory;
mod position;
mod shows;
pub(crate) mod transforms;

pub(crate) use clock::*;
pub(crate) use error::TimelineError;
pub(crate) use memory::EpisodeMemory;
pub(crate) use position::*;
pub(crate) use shows::*;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct Program {
    pub(crate) duration: i64,
    #[serde(default, skip_serializing_if = "is_zero")]
    pub(crate) seek_position: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) end_position: Option<i64>,
    #[serde(flatten)]
    pub(crate) kind: ProgramKind,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub(crate) enum ProgramKind {
    Content(ContentMeta),
    Offline,
    Redirect { channel: u32 },
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub(crate) enum MediaKind {
    Episode,
    #[default]
    Movie,
    Track,
}

/// Library metadata carried by content programs. The timeline never reads it;
/// only a [`ShowClassifier`] does.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ContentMeta {
    #[serde(default, rename = "mediaType")]
    pub(crate) media: MediaKind,
    #[serde(default)]
    pub(crate) title: String,
    #[serde(default)]
    pub(crate) key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) show_title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) season: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) episode: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) artist: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) album: Option<String>,
}

fn is_zero(value: &i64) -> bool {
    *value == 0
}

impl Program {
    pub(crate) fn offline(duration: i64) -> Self {
        Self {
            duration,
            seek_position: 0,
            end_position: None,
            kind: ProgramKind::Offline,
        }
    }

    pub(crate) fn redirect(channel: u32, duration: i64) -> Self {
        Self {
            duration,
            seek_position: 0,
            end_position: None,
            kind: ProgramKind::Redirect { channel },
        }
    }

    /// Portion of the clip that actually airs once seek and end offsets are applied.
    pub(crate) fn effective_duration(&self) -> i64 {
        self.end_position.unwrap_or(self.duration) - self.seek_position
    }

    pub(crate) fn content_meta(&self) -> Option<&ContentMeta> {
        match &self.kind {
            ProgramKind::Content(meta) => Some(meta),
            _ => None,
        }
    }

    /// Offline filler or a redirect; anything that is not library content.
    pub(crate) fn is_offline(&self) -> bool {
        !matches!(self.kind, ProgramKind::Content(_))
    }

    /// Plain offline filler. Redirects do not count as natural breaks.
    pub(crate) fn is_filler(&self) -> bool {
        matches!(self.kind, ProgramKind::Offline)
    }

    pub(crate) fn is_redirect(&self) -> bool {
        matches!(self.kind, ProgramKind::Redirect { .. })
    }

    /// Copy of this program that stops airing after `effective` ms.
    pub(crate) fn clipped_to(&self, effective: i64) -> Self {
        let mut clipped = self.clone();
        clipped.end_position = Some(self.seek_position + effective.max(0));
        clipped
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Slot {
    pub(crate) index: usize,
    pub(crate) start: i64,
    pub(crate) stop: i64,
    pub(crate) effective_duration: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Timeline {
    pub(crate) start_time: i64,
    pub(crate) slots: Vec<Slot>,
    pub(crate) duration: i64,
    pub(crate) has_offline: bool,
}

impl Timeline {
    pub(crate) fn end_time(&self) -> i64 {
        self.start_time + self.duration
    }

    /// Slot on air at `instant` during the first pass through the list.
    pub(crate) fn airing_at(&self, instant: i64) -> Option<&Slot> {
        self.slots
            .iter()
            .find(|slot| slot.start <= instant && instant < slot.stop)
    }
}

/// Recomputes every derived timing value for `programs` anchored at `start_time`.
///
/// The channel duration is always the sum of effective durations. Spans that
/// come out empty or negative are carried through as-is.
pub(crate) fn rebuild(programs: &[Program], start_time: i64) -> Timeline {
    let mut slots = Vec::with_capacity(programs.len());
    let mut running = 0_i64;
    let mut has_offline = false;

    for (index, program) in programs.iter().enumerate() {
        let effective_duration = program.effective_duration();
        let start = start_time + running;
        running += effective_duration;
        slots.push(Slot {
            index,
            start,
            stop: start_time + running,
            effective_duration,
        });
        has_offline |= program.is_offline();
    }

    Timeline {
        start_time,
        slots,
        duration: running,
        has_offline,
    }
}

pub(crate) fn total_duration(programs: &[Program]) -> i64 {
    programs.iter().map(Program::effective_duration).sum()
}


#[cfg(test)]
mod tests {
    use super::test_support::*;
    use super::*;

    #[test]
    fn rebuild_accumulates_effective_durations() {
        let mut trimmed = clip("b", 20_000);
        trimmed.seek_position = 5_000;
        trimmed.end_position = Some(15_000);
        let programs = vec![clip("a", 10_000), trimmed, Program::offline(3_000)];

        let timeline = rebuild(&programs, 1_000_000);

        assert_eq!(timeline.duration, 10_000 + 10_000 + 3_000);
        assert_eq!(timeline.duration, total_duration(&programs));
        assert_eq!(timeline.slots[1].start, 1_010_000);
        assert_eq!(timeline.slots[1].stop, 1_020_000);
        assert_eq!(timeline.slots[2].index, 2);
        assert_eq!(timeline.end_time(), 1_023_000);
        assert!(timeline.has_offline);
    }

    #[test]
    fn rebuild_without_offline_programs_reports_no_offline_segment() {
        let timeline = rebuild(&[clip("a", 1), clip("b", 2)], 0);
        assert!(!timeline.has_offline);
        assert_eq!(timeline.duration, 3);
    }

    #[test]
    fn rebuild_tolerates_non_positive_spans() {
        let mut broken = clip("broken", 1_000);
        broken.seek_position = 4_000;
        let programs = vec![clip("a", 1_000), broken, clip("c", 1_000)];

        let timeline = rebuild(&programs, 0);

        assert_eq!(timeline.slots[1].effective_duration, -3_000);
        assert_eq!(timeline.duration, -1_000);
        assert_eq!(timeline.slots[2].start, -2_000);
    }

    #[test]
    fn rebuild_of_empty_list_is_zero_length() {
        let timeline = rebuild(&[], 42);
        assert!(timeline.slots.is_empty());
        assert_eq!(timeline.duration, 0);
        assert_eq!(timeline.end_time(), 42);
    }

    #[test]
    fn airing_at_finds_covering_slot() {
        let timeline = rebuild(&[clip("a", 10), clip("b", 20)], 100);
        assert_eq!(timeline.airing_at(105).map(|slot| slot.index), Some(0));
        assert_eq!(timeline.airing_at(110).map(|slot| slot.index), Some(1));
        assert!(timeline.airing_at(130).is_none());
    }

    #[test]
    fn clipped_program_keeps_seek_and_sets_clip_out() {
        let mut program = clip("a", 60_000);
        program.seek_position = 10_000;
        let clipped = program.clipped_to(20_000);
        assert_eq!(clipped.end_position, Some(30_000));
        assert_eq!(clipped.effective_duration(), 20_000);
    }

    #[test]
    fn program_json_uses_type_tag() {
        let raw = r#"[
            {"type":"content","duration":1000,"mediaType":"episode","title":"Pilot","key":"k1","showTitle":"Show","season":1,"episode":1},
            {"type":"offline","duration":500},
            {"type":"redirect","duration":700,"channel":4,"seekPosition":100}
        ]"#;
        let programs: Vec<Program> = serde_json::from_str(raw).expect("programs should parse");

        assert_eq!(programs.len(), 3);
        let meta = programs[0].content_meta().expect("first program is content");
        assert_eq!(meta.media, MediaKind::Episode);
        assert_eq!(meta.show_title.as_deref(), Some("Show"));
        assert!(programs[1].is_filler());
        assert_eq!(programs[2].kind, ProgramKind::Redirect { channel: 4 });
        assert_eq!(programs[2].effective_duration(), 600);

        let encoded = serde_json::to_value(&programs[1]).expect("encode");
        assert_eq!(encoded["type"], "offline");
        assert!(encoded.get("seekPosition").is_none());
    }
}
