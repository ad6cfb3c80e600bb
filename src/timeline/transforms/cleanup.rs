use std::collections::HashSet;

use super::super::{Program, ShowClassifier, group, parse_air_date};
use super::Edited;

pub(crate) fn remove_duplicates<C: ShowClassifier + ?Sized>(
    programs: &[Program],
    classifier: &C,
) -> Edited {
    let mut seen = HashSet::new();
    let kept: Vec<Program> = programs
        .iter()
        .filter(|program| {
            let Some(meta) = program.content_meta() else {
                return true;
            };
            let info = classifier.classify(program);
            seen.insert((info.show_id, meta.key.clone()))
        })
        .cloned()
        .collect();
    tracing::debug!(removed = programs.len() - kept.len(), "removed duplicates");
    Edited::keeping(kept)
}

pub(crate) fn remove_specials<C: ShowClassifier + ?Sized>(
    programs: &[Program],
    classifier: &C,
) -> Edited {
    let kept: Vec<Program> = programs
        .iter()
        .filter(|program| !classifier.classify(program).is_special)
        .cloned()
        .collect();
    tracing::debug!(removed = programs.len() - kept.len(), "removed specials");
    Edited::dropping(kept)
}

/// Drops plain offline filler; redirects stay.
pub(crate) fn remove_offline(programs: &[Program]) -> Edited {
    Edited::keeping(
        programs
            .iter()
            .filter(|program| !program.is_filler())
            .cloned()
            .collect(),
    )
}

pub(crate) fn remove_shows<C: ShowClassifier + ?Sized>(
    programs: &[Program],
    classifier: &C,
    show_ids: &[String],
) -> Edited {
    let doomed: HashSet<&str> = show_ids.iter().map(String::as_str).collect();
    let kept: Vec<Program> = programs
        .iter()
        .filter(|program| {
            let info = classifier.classify(program);
            !info.has_show || !doomed.contains(info.show_id.as_str())
        })
        .cloned()
        .collect();
    tracing::debug!(removed = programs.len() - kept.len(), "removed shows");
    Edited::dropping(kept)
}

/// Lays out each show's episodes contiguously in ordinal order, shows in the
/// order they first appear. Filler is dropped; redirects go last.
pub(crate) fn sort_shows<C: ShowClassifier + ?Sized>(
    programs: &[Program],
    classifier: &C,
) -> Edited {
    let cleaned = remove_offline(programs).programs;
    let mut sorted = Vec::with_capacity(cleaned.len());
    for (_, mut episodes) in group(&cleaned, classifier) {
        episodes.sort_by_key(|program| classifier.classify(program).order);
        sorted.extend(episodes);
    }
    sorted.extend(
        cleaned
            .iter()
            .filter(|program| !classifier.classify(program).has_show)
            .cloned(),
    );
    Edited::keeping(sorted)
}

/// Orders content by air date; undated content keeps its relative order after
/// the dated content. Filler is dropped; redirects go last.
pub(crate) fn sort_by_date(programs: &[Program]) -> Edited {
    let mut content: Vec<Program> = programs
        .iter()
        .filter(|program| !program.is_offline())
        .cloned()
        .collect();
    content.sort_by_key(|program| {
        let date = program
            .content_meta()
            .and_then(|meta| meta.date.as_deref())
            .and_then(parse_air_date);
        (date.is_none(), date)
    });
    content.extend(programs.iter().filter(|p| p.is_redirect()).cloned());
    Edited::keeping(content)
}

#[cfg(test)]
mod tests {
    use super::super::super::test_support::*;
    use super::super::super::{MetadataClassifier, ProgramKind};
    use super::*;

    fn dated(title: &str, date: Option<&str>) -> Program {
        let mut program = movie(title, 90);
        if let ProgramKind::Content(meta) = &mut program.kind {
            meta.date = date.map(str::to_string);
        }
        program
    }

    #[test]
    fn remove_duplicates_keeps_first_copy_and_all_filler() {
        let programs = vec![
            ep("A", 1, 1, 30),
            Program::offline(1_000),
            ep("A", 1, 1, 30),
            Program::offline(1_000),
            ep("A", 1, 2, 30),
            Program::redirect(2, 1_000),
            Program::redirect(2, 1_000),
        ];

        let edited = remove_duplicates(&programs, &MetadataClassifier);

        assert_eq!(
            titles(&edited.programs),
            vec![
                "A 1x01",
                "offline:1000",
                "offline:1000",
                "A 1x02",
                "redirect:2:1000",
                "redirect:2:1000"
            ]
        );
        assert!(edited.memory_valid);
    }

    #[test]
    fn remove_specials_leaves_filler_untouched() {
        let programs = vec![
            ep("A", 0, 1, 30),
            ep("A", 1, 1, 30),
            Program::offline(1_000),
            Program::redirect(9, 1_000),
        ];

        let edited = remove_specials(&programs, &MetadataClassifier);

        assert_eq!(
            titles(&edited.programs),
            vec!["A 1x01", "offline:1000", "redirect:9:1000"]
        );
        assert!(!edited.memory_valid);
    }

    #[test]
    fn remove_offline_keeps_redirects() {
        let programs = vec![
            Program::offline(1_000),
            ep("A", 1, 1, 30),
            Program::redirect(4, 2_000),
        ];
        assert_eq!(
            titles(&remove_offline(&programs).programs),
            vec!["A 1x01", "redirect:4:2000"]
        );
    }

    #[test]
    fn remove_shows_drops_only_named_shows() {
        let programs = vec![
            ep("A", 1, 1, 30),
            ep("B", 1, 1, 30),
            Program::offline(1_000),
            ep("A", 1, 2, 30),
        ];
        let edited = remove_shows(&programs, &MetadataClassifier, &["tv.A".to_string()]);
        assert_eq!(titles(&edited.programs), vec!["B 1x01", "offline:1000"]);
    }

    #[test]
    fn sort_shows_groups_and_orders_episodes() {
        let programs = vec![
            ep("B", 1, 2, 30),
            Program::redirect(3, 1_000),
            ep("A", 2, 1, 30),
            Program::offline(1_000),
            ep("B", 1, 1, 30),
            ep("A", 1, 5, 30),
        ];

        let edited = sort_shows(&programs, &MetadataClassifier);

        assert_eq!(
            titles(&edited.programs),
            vec!["B 1x01", "B 1x02", "A 1x05", "A 2x01", "redirect:3:1000"]
        );
    }

    #[test]
    fn sort_by_date_puts_undated_content_last() {
        let programs = vec![
            dated("undated-1", None),
            dated("new", Some("2001-01-01")),
            Program::offline(1_000),
            dated("old", Some("1990-06-01")),
            dated("undated-2", None),
        ];

        assert_eq!(
            titles(&sort_by_date(&programs).programs),
            vec!["old", "new", "undated-1", "undated-2"]
        );
    }
}
