use std::collections::HashMap;

use indexmap::IndexMap;

use super::super::{Program, ShowClassifier};
use super::Edited;

pub(crate) const DEFAULT_WEIGHT: u32 = 3;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ShowWeights {
    pub(crate) default: u32,
    pub(crate) per_show: HashMap<String, u32>,
}

impl Default for ShowWeights {
    fn default() -> Self {
        Self {
            default: DEFAULT_WEIGHT,
            per_show: HashMap::new(),
        }
    }
}

impl ShowWeights {
    pub(crate) fn with_default(default: u32) -> Self {
        Self {
            default,
            per_show: HashMap::new(),
        }
    }

    pub(crate) fn weight_of(&self, show_id: &str) -> u32 {
        self.per_show
            .get(show_id)
            .copied()
            .unwrap_or(self.default)
            .max(1)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct WeightSuggestion {
    pub(crate) show_id: String,
    pub(crate) display_name: String,
    pub(crate) weight: u32,
    pub(crate) episodes: usize,
    pub(crate) special_category: bool,
}

/// Repeats every show's episode list so that airtime tracks its weight:
/// a show of weight `w` and total duration `T` costs `ceil(T / w)`, and is
/// repeated `floor(max_cost * F / cost)` times.
///
/// `F` is 1 when every show's doubled repeat count is even, otherwise 2.
/// Offline filler and redirects are removed.
pub(crate) fn equalize_shows<C: ShowClassifier + ?Sized>(
    programs: &[Program],
    classifier: &C,
    weights: &ShowWeights,
) -> Edited {
    let mut shows: IndexMap<String, (i64, Vec<Program>)> = IndexMap::new();
    for program in programs.iter().filter(|program| !program.is_offline()) {
        let info = classifier.classify(program);
        let entry = shows.entry(info.show_id).or_default();
        entry.0 += program.effective_duration();
        entry.1.push(program.clone());
    }
    if shows.is_empty() {
        return Edited::keeping(Vec::new());
    }

    let costs: Vec<i64> = shows
        .iter()
        .map(|(show_id, (total, _))| {
            let weight = i64::from(weights.weight_of(show_id));
            ((total + weight - 1).div_euclid(weight)).max(1)
        })
        .collect();
    let max_cost = costs.iter().copied().max().unwrap_or(1);

    let factor = if costs.iter().all(|cost| (max_cost * 2 / cost) % 2 == 0) {
        1
    } else {
        2
    };

    let mut out = Vec::new();
    for ((show_id, (_, episodes)), cost) in shows.iter().zip(&costs) {
        let repeats = (max_cost * factor / cost) as usize;
        tracing::debug!(show = %show_id, repeats, "equalized show");
        for _ in 0..repeats {
            out.extend(episodes.iter().cloned());
        }
    }
    Edited::keeping(out)
}

/// Starting weights on a 1..=24 scale proportional to each show's airtime.
pub(crate) fn suggest_weights<C: ShowClassifier + ?Sized>(
    programs: &[Program],
    classifier: &C,
) -> Vec<WeightSuggestion> {
    let mut shows: IndexMap<String, (String, i64, usize)> = IndexMap::new();
    for program in programs {
        let info = classifier.classify(program);
        if !info.has_show {
            continue;
        }
        let entry = shows
            .entry(info.show_id)
            .or_insert_with(|| (info.display_name, 0, 0));
        entry.1 += program.effective_duration();
        entry.2 += 1;
    }

    let max_total = shows.values().map(|(_, total, _)| *total).max().unwrap_or(0);
    shows
        .into_iter()
        .map(|(show_id, (display_name, total, episodes))| {
            let weight = if max_total > 0 {
                ((24 * total + max_total - 1) / max_total).clamp(1, 24) as u32
            } else {
                1
            };
            WeightSuggestion {
                special_category: !show_id.starts_with("tv."),
                show_id,
                display_name,
                weight,
                episodes,
            }
        })
        .collect()
}

pub(crate) fn max_replicas(len: usize, max_programs: usize) -> usize {
    max_programs.checked_div(len).unwrap_or(usize::MAX)
}

#[cfg(test)]
mod tests {
    use super::super::super::test_support::*;
    use super::super::super::MetadataClassifier;
    use super::*;

    fn count(programs: &[Program], prefix: &str) -> usize {
        titles(programs)
            .iter()
            .filter(|title| title.starts_with(prefix))
            .count()
    }

    #[test]
    fn equal_weights_balance_airtime() {
        // A: 4 x 30 min, B: 1 x 60 min.
        let mut programs: Vec<Program> = (1..=4).map(|e| ep("A", 1, e, 30)).collect();
        programs.push(ep("B", 1, 1, 60));
        programs.push(Program::offline(60_000));

        let edited = equalize_shows(&programs, &MetadataClassifier, &ShowWeights::default());

        assert_eq!(count(&edited.programs, "A "), 4);
        assert_eq!(count(&edited.programs, "B "), 2);
        assert!(edited.programs.iter().all(|program| !program.is_offline()));
        assert_eq!(
            titles(&edited.programs[..6]),
            vec!["A 1x01", "A 1x02", "A 1x03", "A 1x04", "B 1x01", "B 1x01"]
        );
    }

    #[test]
    fn odd_ratios_switch_to_double_granularity() {
        // Costs 3h/3 = 1h and 2h/3 = 40min: 1h*2/40min = 3 is odd, so F = 2.
        let a: Vec<Program> = (1..=3).map(|e| ep("A", 1, e, 60)).collect();
        let b: Vec<Program> = (1..=2).map(|e| ep("B", 1, e, 60)).collect();
        let programs: Vec<Program> = a.into_iter().chain(b).collect();

        let edited = equalize_shows(&programs, &MetadataClassifier, &ShowWeights::default());

        assert_eq!(count(&edited.programs, "A "), 3 * 2);
        assert_eq!(count(&edited.programs, "B "), 2 * 3);
    }

    #[test]
    fn doubling_a_weight_doubles_its_airtime() {
        let programs = vec![ep("A", 1, 1, 60), ep("B", 1, 1, 60)];
        let mut weights = ShowWeights::default();
        weights.per_show.insert("tv.A".to_string(), 6);

        let edited = equalize_shows(&programs, &MetadataClassifier, &weights);

        assert_eq!(count(&edited.programs, "A "), 2);
        assert_eq!(count(&edited.programs, "B "), 1);
    }

    #[test]
    fn empty_and_single_show_inputs_degrade_gracefully() {
        let empty = equalize_shows(
            &[Program::offline(1_000)],
            &MetadataClassifier,
            &ShowWeights::default(),
        );
        assert!(empty.programs.is_empty());

        let single = vec![ep("A", 1, 1, 30), ep("A", 1, 2, 30)];
        let edited = equalize_shows(&single, &MetadataClassifier, &ShowWeights::default());
        assert_eq!(titles(&edited.programs), titles(&single));
    }

    #[test]
    fn zero_weight_is_treated_as_one() {
        let weights = ShowWeights::with_default(0);
        assert_eq!(weights.weight_of("tv.A"), 1);
    }

    #[test]
    fn suggested_weights_scale_to_the_longest_show() {
        let programs = vec![
            ep("A", 1, 1, 60),
            ep("A", 1, 2, 60),
            ep("B", 1, 1, 30),
            movie("Short", 45),
            Program::offline(1_000),
        ];

        let suggestions = suggest_weights(&programs, &MetadataClassifier);

        assert_eq!(suggestions.len(), 3);
        assert_eq!(suggestions[0].show_id, "tv.A");
        assert_eq!(suggestions[0].weight, 24);
        assert_eq!(suggestions[0].episodes, 2);
        assert_eq!(suggestions[1].weight, 6);
        assert!(!suggestions[1].special_category);
        assert_eq!(suggestions[2].weight, 9);
        assert_eq!(suggestions[2].display_name, "Movies");
        assert!(suggestions[2].special_category);
    }

    #[test]
    fn max_replicas_divides_capacity() {
        assert_eq!(max_replicas(0, 50_000), usize::MAX);
        assert_eq!(max_replicas(300, 50_000), 166);
    }
}
