use chrono::{Datelike, NaiveDate};
use indexmap::IndexMap;

use super::{ContentMeta, MediaKind, Program, ProgramKind};

pub(crate) const MOVIE_SHOW_ID: &str = "movie.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ShowInfo {
    pub(crate) has_show: bool,
    pub(crate) show_id: String,
    pub(crate) order: i64,
    pub(crate) display_name: String,
    pub(crate) is_special: bool,
}

impl ShowInfo {
    pub(crate) fn none() -> Self {
        Self {
            has_show: false,
            show_id: String::new(),
            order: 0,
            display_name: String::new(),
            is_special: false,
        }
    }
}

/// Maps programs to show identities. Implementations only see content
/// metadata; offline filler and redirects never belong to a show.
pub(crate) trait ShowClassifier {
    fn classify_content(&self, meta: &ContentMeta) -> ShowInfo;

    fn classify(&self, program: &Program) -> ShowInfo {
        match &program.kind {
            ProgramKind::Content(meta) => self.classify_content(meta),
            ProgramKind::Offline | ProgramKind::Redirect { .. } => ShowInfo::none(),
        }
    }
}

/// Classifier driven by the library metadata stored on each program.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct MetadataClassifier;

impl ShowClassifier for MetadataClassifier {
    fn classify_content(&self, meta: &ContentMeta) -> ShowInfo {
        match meta.media {
            MediaKind::Episode => {
                let show = meta
                    .show_title
                    .as_deref()
                    .filter(|title| !title.trim().is_empty())
                    .unwrap_or(&meta.title)
                    .trim();
                let season = meta.season.unwrap_or(1);
                let episode = meta.episode.unwrap_or(0);
                ShowInfo {
                    has_show: true,
                    show_id: format!("tv.{show}"),
                    order: i64::from(season) * 10_000 + i64::from(episode),
                    display_name: show.to_string(),
                    is_special: season == 0,
                }
            }
            MediaKind::Movie => ShowInfo {
                has_show: true,
                show_id: MOVIE_SHOW_ID.to_string(),
                order: meta
                    .date
                    .as_deref()
                    .and_then(parse_air_date)
                    .map(|date| i64::from(date.num_days_from_ce()))
                    .unwrap_or(0),
                display_name: "Movies".to_string(),
                is_special: false,
            },
            MediaKind::Track => {
                let artist = meta
                    .artist
                    .as_deref()
                    .or(meta.album.as_deref())
                    .unwrap_or("Unknown Artist")
                    .trim();
                ShowInfo {
                    has_show: true,
                    show_id: format!("track.{artist}"),
                    order: 0,
                    display_name: artist.to_string(),
                    is_special: false,
                }
            }
        }
    }
}

pub(crate) fn parse_air_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").ok()
}

/// Groups show episodes by show id, in the order each show first appears.
pub(crate) fn group<C: ShowClassifier + ?Sized>(
    programs: &[Program],
    classifier: &C,
) -> IndexMap<String, Vec<Program>> {
    let mut shows: IndexMap<String, Vec<Program>> = IndexMap::new();
    for program in programs {
        let info = classifier.classify(program);
        if info.has_show {
            shows.entry(info.show_id).or_default().push(program.clone());
        }
    }
    shows
}

pub(crate) fn list_shows<C: ShowClassifier + ?Sized>(
    programs: &[Program],
    classifier: &C,
) -> Vec<(String, String)> {
    let mut seen: IndexMap<String, String> = IndexMap::new();
    for program in programs {
        let info = classifier.classify(program);
        if info.has_show && !seen.contains_key(&info.show_id) {
            seen.insert(info.show_id, info.display_name);
        }
    }
    seen.into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use super::*;

    #[test]
    fn episodes_group_by_show_title() {
        let info = MetadataClassifier.classify(&ep("Cheers", 2, 5, 22));
        assert!(info.has_show);
        assert_eq!(info.show_id, "tv.Cheers");
        assert_eq!(info.order, 20_005);
        assert_eq!(info.display_name, "Cheers");
        assert!(!info.is_special);
    }

    #[test]
    fn season_zero_episodes_are_specials() {
        let info = MetadataClassifier.classify(&ep("Cheers", 0, 1, 22));
        assert!(info.is_special);
    }

    #[test]
    fn movies_share_one_bucket_ordered_by_date() {
        let mut older = movie("Alien", 117);
        let mut newer = movie("Aliens", 137);
        if let ProgramKind::Content(meta) = &mut older.kind {
            meta.date = Some("1979-05-25".to_string());
        }
        if let ProgramKind::Content(meta) = &mut newer.kind {
            meta.date = Some("1986-07-18".to_string());
        }

        let a = MetadataClassifier.classify(&older);
        let b = MetadataClassifier.classify(&newer);
        assert_eq!(a.show_id, MOVIE_SHOW_ID);
        assert_eq!(b.show_id, MOVIE_SHOW_ID);
        assert!(a.order < b.order);
    }

    #[test]
    fn offline_and_redirects_have_no_show() {
        assert!(!MetadataClassifier.classify(&Program::offline(1_000)).has_show);
        assert!(!MetadataClassifier.classify(&Program::redirect(3, 1_000)).has_show);
    }

    #[test]
    fn group_preserves_first_seen_order() {
        let programs = vec![
            ep("B", 1, 1, 30),
            ep("A", 1, 1, 30),
            Program::offline(1_000),
            ep("B", 1, 2, 30),
            movie("Heat", 170),
        ];

        let shows = group(&programs, &MetadataClassifier);

        let keys: Vec<&str> = shows.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["tv.B", "tv.A", MOVIE_SHOW_ID]);
        assert_eq!(titles(&shows["tv.B"]), vec!["B 1x01", "B 1x02"]);
    }

    #[test]
    fn list_shows_reports_display_names_once() {
        let programs = vec![ep("B", 1, 1, 30), ep("B", 1, 2, 30), ep("A", 1, 1, 30)];
        assert_eq!(
            list_shows(&programs, &MetadataClassifier),
            vec![
                ("tv.B".to_string(), "B".to_string()),
                ("tv.A".to_string(), "A".to_string())
            ]
        );
    }
}
