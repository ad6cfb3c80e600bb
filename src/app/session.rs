use anyhow::{Result, bail};
use chrono::FixedOffset;
use rand::Rng;

use crate::timeline::transforms::{self, Edited, ShowWeights};
use crate::timeline::{
    EpisodeMemory, HOUR_MS, MINUTE_MS, MetadataClassifier, OnDemand, Program, SECOND_MS,
    Timeline, list_shows, rebuild, recover_position, slide,
};

use super::ops::EditOp;

/// One editing pass over a channel: the program list, its anchor and the
/// episode memory armed by `save-positions`.
pub(crate) struct EditSession {
    programs: Vec<Program>,
    start_time: i64,
    on_demand: OnDemand,
    on_demand_fixed: bool,
    memory: EpisodeMemory,
    classifier: MetadataClassifier,
    weights: ShowWeights,
    max_programs: usize,
    offset: FixedOffset,
    now: i64,
}

impl EditSession {
    pub(crate) fn new(
        programs: Vec<Program>,
        start_time: i64,
        on_demand: OnDemand,
        now: i64,
        offset: FixedOffset,
    ) -> Self {
        Self {
            programs,
            start_time,
            on_demand,
            on_demand_fixed: false,
            memory: EpisodeMemory::new(),
            classifier: MetadataClassifier,
            weights: ShowWeights::default(),
            max_programs: crate::config::DEFAULT_MAX_PROGRAMS,
            offset,
            now,
        }
    }

    pub(crate) fn with_limits(mut self, max_programs: usize, default_weight: u32) -> Self {
        self.max_programs = max_programs;
        self.weights = ShowWeights::with_default(default_weight);
        self
    }

    pub(crate) fn programs(&self) -> &[Program] {
        &self.programs
    }

    pub(crate) fn start_time(&self) -> i64 {
        self.start_time
    }

    pub(crate) fn timeline(&self) -> Timeline {
        rebuild(&self.programs, self.start_time)
    }

    /// Rotates the list to what is airing now. A paused on-demand anchor is
    /// only honoured on the first call of the session.
    pub(crate) fn recover_now(&mut self) {
        let policy = (!self.on_demand_fixed).then_some(&self.on_demand);
        let recovered = recover_position(&self.programs, self.start_time, self.now, policy);
        self.on_demand_fixed = true;
        self.programs = recovered.programs;
        self.start_time = recovered.start_time;
    }

    pub(crate) fn apply<R: Rng>(&mut self, op: &EditOp, rng: &mut R) -> Result<()> {
        let programs = &self.programs;
        let classifier = &self.classifier;
        let edited = match op {
            EditOp::RemoveDuplicates => transforms::remove_duplicates(programs, classifier),
            EditOp::RemoveSpecials => transforms::remove_specials(programs, classifier),
            EditOp::RemoveOffline => transforms::remove_offline(programs),
            EditOp::RemoveShows(ids) => {
                let known = list_shows(programs, classifier);
                for id in ids {
                    if !known.iter().any(|(show_id, _)| show_id == id) {
                        tracing::warn!(show = %id, "no such show in channel");
                    }
                }
                transforms::remove_shows(programs, classifier, ids)
            }
            EditOp::SortShows => transforms::sort_shows(programs, classifier),
            EditOp::SortByDate => transforms::sort_by_date(programs),
            EditOp::Shuffle(None) => transforms::shuffle_all(programs, rng),
            EditOp::Shuffle(Some((lo, hi))) => transforms::random_shuffle(programs, *lo, *hi, rng)?,
            EditOp::CyclicShuffle => transforms::cyclic_shuffle(programs, classifier, rng),
            EditOp::BlockShuffle { count, randomize } => {
                transforms::block_shuffle(programs, classifier, *count, *randomize, rng)
            }
            EditOp::Replicate(times) => {
                self.check_replicas(*times)?;
                transforms::replicate(programs, *times)
            }
            EditOp::ShuffleReplicate(times) => {
                self.check_replicas(*times)?;
                transforms::shuffle_replicate(programs, *times, rng)
            }
            EditOp::Equalize(overrides) => {
                let mut weights = self.weights.clone();
                weights.per_show.extend(overrides.iter().cloned());
                let unique = transforms::remove_duplicates(programs, classifier).programs;
                transforms::equalize_shows(&unique, classifier, &weights)
            }
            EditOp::Reruns {
                start_hour,
                block_hours,
                repeats,
            } => transforms::rerun_blocks(
                programs,
                self.start_time,
                i64::from(*block_hours) * HOUR_MS,
                *repeats,
                i64::from(*start_hour) * HOUR_MS,
                self.offset,
            )?,
            EditOp::Night {
                start_hour,
                end_hour,
                channel,
            } => transforms::night_window(
                programs,
                self.start_time,
                *start_hour,
                *end_hour,
                *channel,
                self.offset,
            )?,
            EditOp::Breaks {
                after_minutes,
                min_sec,
                max_sec,
            } => transforms::insert_breaks(
                programs,
                i64::from(*after_minutes) * MINUTE_MS,
                *min_sec,
                *max_sec,
                rng,
            ),
            EditOp::Pad { minutes, five } => transforms::pad_to_clock(
                programs,
                self.start_time,
                i64::from(*minutes) * MINUTE_MS,
                *five,
                self.offset,
            ),
            EditOp::SavePositions => {
                self.memory.save(&self.programs, &self.classifier);
                return Ok(());
            }
            EditOp::RecoverPositions => {
                Edited::keeping(self.memory.recover(programs, classifier)?)
            }
            EditOp::Slide(minutes) => {
                let Some(shift) = minutes
                    .checked_mul(MINUTE_MS)
                    .filter(|shift| self.start_time.checked_sub(*shift).is_some())
                else {
                    bail!("cannot slide by {minutes} minutes");
                };
                let slid = slide(programs, self.start_time, shift, self.now);
                Edited::keeping(slid.programs).anchored_at(slid.start_time)
            }
            EditOp::AddOffline(seconds) => {
                let mut extended = programs.clone();
                extended.push(Program::offline(i64::from(*seconds) * SECOND_MS));
                Edited::keeping(extended)
            }
            EditOp::AddRedirect { channel, seconds } => {
                let mut extended = programs.clone();
                extended.push(Program::redirect(*channel, i64::from(*seconds) * SECOND_MS));
                Edited::keeping(extended)
            }
            EditOp::Wipe => Edited::dropping(Vec::new()),
        };
        self.accept(op, edited)
    }

    fn check_replicas(&self, times: usize) -> Result<()> {
        let limit = transforms::max_replicas(self.programs.len(), self.max_programs);
        if times > limit {
            bail!(
                "{} copies of {} programs exceed the limit of {} programs (at most {limit} copies)",
                times,
                self.programs.len(),
                self.max_programs
            );
        }
        Ok(())
    }

    fn accept(&mut self, op: &EditOp, edited: Edited) -> Result<()> {
        if edited.programs.len() > self.max_programs {
            bail!(
                "{op:?} would leave {} programs, the limit is {}",
                edited.programs.len(),
                self.max_programs
            );
        }
        self.programs = edited.programs;
        if let Some(start_time) = edited.start_time {
            self.start_time = start_time;
        }
        if !edited.memory_valid {
            self.memory.invalidate();
        }
        tracing::debug!(
            ?op,
            programs = self.programs.len(),
            duration = self.timeline().duration,
            "applied edit"
        );
        Ok(())
    }
}
