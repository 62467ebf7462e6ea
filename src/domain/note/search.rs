//! Note list filtering and id lookup

use crate::domain::error::NoteError;

use super::VoiceNote;

/// Keep the notes whose name contains `query`, ignoring case.
///
/// Order is preserved. An empty query keeps every note.
pub fn filter_notes<'a>(notes: &'a [VoiceNote], query: &str) -> Vec<&'a VoiceNote> {
    notes.iter().filter(|note| note.matches(query)).collect()
}

/// Find a note by exact id, or by a unique id prefix
pub fn resolve_id<'a>(notes: &'a [VoiceNote], input: &str) -> Result<&'a VoiceNote, NoteError> {
    let input = input.trim();

    if let Some(note) = notes.iter().find(|n| n.id.as_str() == input) {
        return Ok(note);
    }

    if input.is_empty() {
        return Err(NoteError::NotFound(input.to_string()));
    }

    let mut candidates = notes.iter().filter(|n| n.id.as_str().starts_with(input));
    let first = candidates.next();
    let rest = candidates.count();
    match (first, rest) {
        (Some(note), 0) => Ok(note),
        (Some(_), rest) => Err(NoteError::AmbiguousId {
            prefix: input.to_string(),
            count: rest + 1,
        }),
        (None, _) => Err(NoteError::NotFound(input.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::note::NoteId;
    use chrono::Utc;

    fn note(id: &str, name: &str) -> VoiceNote {
        VoiceNote {
            id: NoteId::from(id),
            name: name.to_string(),
            uri: format!("/audio/{id}.wav"),
            duration: 5,
            created_at: Utc::now(),
            size: None,
        }
    }

    fn notes() -> Vec<VoiceNote> {
        vec![
            note("1700000000001", "Team Meeting"),
            note("1700000000002", "grocery list"),
            note("1700000005003", "Meeting follow-up"),
        ]
    }

    #[test]
    fn filter_matches_case_insensitively() {
        let notes = notes();
        let found = filter_notes(&notes, "MEETING");
        let names: Vec<_> = found.iter().map(|n| n.name.as_str()).collect();
        assert_eq!(names, vec!["Team Meeting", "Meeting follow-up"]);
    }

    #[test]
    fn filter_with_empty_query_returns_all() {
        let notes = notes();
        assert_eq!(filter_notes(&notes, "").len(), 3);
    }

    #[test]
    fn filter_with_no_match_returns_empty() {
        let notes = notes();
        assert!(filter_notes(&notes, "podcast").is_empty());
    }

    #[test]
    fn resolve_exact_id() {
        let notes = notes();
        let found = resolve_id(&notes, "1700000000002").unwrap();
        assert_eq!(found.name, "grocery list");
    }

    #[test]
    fn resolve_unique_prefix() {
        let notes = notes();
        let found = resolve_id(&notes, "17000000050").unwrap();
        assert_eq!(found.name, "Meeting follow-up");
    }

    #[test]
    fn resolve_ambiguous_prefix() {
        let notes = notes();
        let err = resolve_id(&notes, "1700000000").unwrap_err();
        assert_eq!(
            err,
            NoteError::AmbiguousId {
                prefix: "1700000000".to_string(),
                count: 2
            }
        );
    }

    #[test]
    fn resolve_unknown_id() {
        let notes = notes();
        assert!(matches!(
            resolve_id(&notes, "42"),
            Err(NoteError::NotFound(_))
        ));
        assert!(matches!(resolve_id(&notes, ""), Err(NoteError::NotFound(_))));
    }
}
