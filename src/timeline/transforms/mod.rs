mod breaks;
mod cleanup;
mod equalize;
mod night;
mod padding;
mod reruns;
mod shuffle;

pub(crate) use breaks::*;
pub(crate) use cleanup::*;
pub(crate) use equalize::*;
pub(crate) use night::*;
pub(crate) use padding::*;
pub(crate) use reruns::*;
pub(crate) use shuffle::*;

use super::Program;

/// Result of one transform: the replacement program list, an optional new
/// anchor, and whether a previously saved [`super::EpisodeMemory`] still
/// describes the list.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Edited {
    pub(crate) programs: Vec<Program>,
    pub(crate) start_time: Option<i64>,
    pub(crate) memory_valid: bool,
}

impl Edited {
    pub(crate) fn keeping(programs: Vec<Program>) -> Self {
        Self {
            programs,
            start_time: None,
            memory_valid: true,
        }
    }

    pub(crate) fn dropping(programs: Vec<Program>) -> Self {
        Self {
            programs,
            start_time: None,
            memory_valid: false,
        }
    }

    pub(crate) fn anchored_at(mut self, start_time: i64) -> Self {
        self.start_time = Some(start_time);
        self
    }
}
