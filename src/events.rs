use serde::Deserialize;
use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use time::{format_description::FormatItem, macros::date, macros::format_description, Date};

pub(crate) static YMD_FMT: &[FormatItem<'_>] = format_description!("[year]-[month]-[day]");

#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub(crate) enum Category {
    Term,
    Holiday,
    Event,
    ParentMeeting,
    Exam,
    /// Any tag not otherwise recognized
    Info,
}

impl Category {
    /// The named categories, in legend order
    pub(crate) const ALL: [Category; 5] = [
        Category::Term,
        Category::Holiday,
        Category::Event,
        Category::ParentMeeting,
        Category::Exam,
    ];

    pub(crate) fn label(self) -> &'static str {
        match self {
            Category::Term => "Term",
            Category::Holiday => "Holiday",
            Category::Event => "Event",
            Category::ParentMeeting => "PTM",
            Category::Exam => "Exams",
            Category::Info => "Info",
        }
    }

    /// Classify an events-file `type` tag, ignoring case.  Unrecognized tags
    /// become [`Category::Info`].
    pub(crate) fn from_tag(tag: &str) -> Category {
        match tag.to_ascii_lowercase().as_str() {
            "term" => Category::Term,
            "holiday" => Category::Holiday,
            "event" => Category::Event,
            "ptm" | "parent-meeting" => Category::ParentMeeting,
            "exam" => Category::Exam,
            _ => Category::Info,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct Event {
    pub(crate) date: Date,
    pub(crate) category: Category,
    pub(crate) title: String,
}

impl Event {
    pub(crate) fn new<S: Into<String>>(date: Date, category: Category, title: S) -> Event {
        Event {
            date,
            category,
            title: title.into(),
        }
    }
}

/// Anything that can say which events fall on a given date
pub(crate) trait EventSource {
    /// Returns the events on `date` in source order
    fn events_on(&self, date: Date) -> &[Event];
}

/// Events grouped by date.  Events sharing a date keep the order in which
/// they were added.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub(crate) struct EventIndex(BTreeMap<Date, Vec<Event>>);

impl EventIndex {
    pub(crate) fn new() -> EventIndex {
        EventIndex::default()
    }

    pub(crate) fn builtin() -> EventIndex {
        BUILTIN_EVENTS
            .iter()
            .map(|&(date, category, title)| Event::new(date, category, title))
            .collect()
    }

    pub(crate) fn insert(&mut self, event: Event) {
        self.0.entry(event.date).or_default().push(event);
    }

    /// Total number of events (not dates) in the index
    pub(crate) fn len(&self) -> usize {
        self.0.values().map(Vec::len).sum()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl EventSource for EventIndex {
    fn events_on(&self, date: Date) -> &[Event] {
        self.0.get(&date).map(Vec::as_slice).unwrap_or_default()
    }
}

impl FromIterator<Event> for EventIndex {
    fn from_iter<I: IntoIterator<Item = Event>>(iter: I) -> EventIndex {
        let mut index = EventIndex::new();
        for ev in iter {
            index.insert(ev);
        }
        index
    }
}

/// An event as it appears in an events file, before validation
#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
pub(crate) struct EventRecord {
    date: String,
    #[serde(rename = "type")]
    category: String,
    title: String,
}

impl EventRecord {
    /// Deserialize one element of an events file.  A malformed element is
    /// reported under whatever title it has, if any.
    fn from_value(value: serde_json::Value, position: usize) -> Result<EventRecord, BadEventError> {
        let title = value
            .get("title")
            .and_then(serde_json::Value::as_str)
            .unwrap_or_default()
            .to_owned();
        serde_json::from_value(value).map_err(|e| BadEventError {
            position,
            title,
            reason: BadEventReason::Malformed(e.to_string()),
        })
    }

    fn validate(self, position: usize) -> Result<Event, BadEventError> {
        let Ok(date) = Date::parse(&self.date, &YMD_FMT) else {
            return Err(BadEventError {
                position,
                title: self.title,
                reason: BadEventReason::Date(self.date),
            });
        };
        Ok(Event {
            date,
            category: Category::from_tag(&self.category),
            title: self.title,
        })
    }
}

#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub(crate) enum BadEventReason {
    #[error("invalid date {0:?}")]
    Date(String),
    #[error("malformed record: {0}")]
    Malformed(String),
}

/// An event record that was rejected and left out of the index
#[derive(Clone, Debug, Eq, Error, PartialEq)]
#[error("bad event #{position} ({title:?}): {reason}")]
pub(crate) struct BadEventError {
    /// One-based position of the record in its source
    pub(crate) position: usize,
    pub(crate) title: String,
    pub(crate) reason: BadEventReason,
}

#[derive(Debug, Error)]
pub(crate) enum LoadEventsError {
    #[error("failed to read {}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse {}", path.display())]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
}

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub(crate) struct LoadedEvents {
    pub(crate) index: EventIndex,
    pub(crate) rejected: Vec<BadEventError>,
}

impl LoadedEvents {
    /// Parse a JSON array of event records, indexing the good ones and
    /// setting aside the bad.  Only a document that is not an array at all
    /// is an error.
    pub(crate) fn from_json(src: &str) -> Result<LoadedEvents, serde_json::Error> {
        let values = serde_json::from_str::<Vec<serde_json::Value>>(src)?;
        let mut loaded = LoadedEvents::default();
        for (i, value) in values.into_iter().enumerate() {
            let position = i + 1;
            match EventRecord::from_value(value, position).and_then(|rec| rec.validate(position)) {
                Ok(ev) => loaded.index.insert(ev),
                Err(e) => {
                    tracing::warn!(position, "{e}");
                    loaded.rejected.push(e);
                }
            }
        }
        Ok(loaded)
    }

    pub(crate) fn from_path(path: &Path) -> Result<LoadedEvents, LoadEventsError> {
        let src = fs::read_to_string(path).map_err(|source| LoadEventsError::Read {
            path: path.to_owned(),
            source,
        })?;
        let loaded = LoadedEvents::from_json(&src).map_err(|source| LoadEventsError::Parse {
            path: path.to_owned(),
            source,
        })?;
        tracing::info!(
            path = %path.display(),
            loaded = loaded.index.len(),
            rejected = loaded.rejected.len(),
            "Loaded events file"
        );
        Ok(loaded)
    }
}

static BUILTIN_EVENTS: &[(Date, Category, &str)] = &[
    (date!(2025 - 03 - 25), Category::Term, "New session planning / orientation week (tentative)"),
    (date!(2025 - 04 - 01), Category::Term, "Academic Session Begins (tentative)"),
    (date!(2025 - 04 - 14), Category::Holiday, "Ambedkar Jayanti (holiday) (tentative)"),
    (date!(2025 - 08 - 15), Category::Holiday, "Independence Day (holiday)"),
    (date!(2025 - 10 - 02), Category::Holiday, "Gandhi Jayanti (holiday)"),
    (date!(2025 - 12 - 25), Category::Holiday, "Christmas (holiday)"),
    (date!(2026 - 01 - 26), Category::Holiday, "Republic Day (holiday)"),
    (date!(2026 - 03 - 14), Category::Holiday, "Holi (holiday) (tentative)"),
    (date!(2025 - 06 - 21), Category::Event, "International Yoga Day activities"),
    (date!(2025 - 08 - 10), Category::Event, "Independence Day rehearsal week"),
    (date!(2026 - 01 - 20), Category::Event, "Annual Day / Cultural Program week (tentative)"),
    (date!(2025 - 05 - 25), Category::ParentMeeting, "PTM – Progress discussion (tentative)"),
    (date!(2025 - 09 - 28), Category::ParentMeeting, "PTM – Half-year results discussion (tentative)"),
    (date!(2025 - 12 - 14), Category::ParentMeeting, "PTM – Term 2 progress (tentative)"),
    (date!(2026 - 03 - 22), Category::ParentMeeting, "PTM – Final results discussion (tentative)"),
    (date!(2025 - 06 - 10), Category::Exam, "Unit Test 1 (UT-1) begins (tentative)"),
    (date!(2025 - 06 - 15), Category::Exam, "UT-1 ends (tentative)"),
    (date!(2025 - 08 - 26), Category::Exam, "Unit Test 2 (UT-2) begins (tentative)"),
    (date!(2025 - 08 - 31), Category::Exam, "UT-2 ends (tentative)"),
    (date!(2025 - 09 - 16), Category::Exam, "Half-Yearly Exams begin (tentative)"),
    (date!(2025 - 09 - 28), Category::Exam, "Half-Yearly Exams end (tentative)"),
    (date!(2025 - 11 - 18), Category::Exam, "Unit Test 3 (UT-3) begins (tentative)"),
    (date!(2025 - 11 - 23), Category::Exam, "UT-3 ends (tentative)"),
    (date!(2026 - 02 - 10), Category::Exam, "Final Exams begin (tentative)"),
    (date!(2026 - 02 - 22), Category::Exam, "Final Exams end (tentative)"),
    (date!(2026 - 04 - 05), Category::Term, "Session closes / preparation for next session (tentative)"),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_index() {
        let index = EventIndex::builtin();
        assert_eq!(index.len(), BUILTIN_EVENTS.len());
        let evs = index.events_on(date!(2025 - 09 - 28));
        assert_eq!(evs.len(), 2);
        assert_eq!(evs[0].category, Category::ParentMeeting);
        assert_eq!(evs[1].category, Category::Exam);
        assert!(index.events_on(date!(2025 - 09 - 29)).is_empty());
    }

    #[test]
    fn test_insertion_order_kept() {
        let index = EventIndex::from_iter([
            Event::new(date!(2025 - 05 - 01), Category::Exam, "b"),
            Event::new(date!(2025 - 04 - 30), Category::Term, "x"),
            Event::new(date!(2025 - 05 - 01), Category::Holiday, "a"),
        ]);
        let titles = index
            .events_on(date!(2025 - 05 - 01))
            .iter()
            .map(|ev| ev.title.as_str())
            .collect::<Vec<_>>();
        assert_eq!(titles, ["b", "a"]);
    }

    #[test]
    fn test_category_tags() {
        assert_eq!(Category::from_tag("ptm"), Category::ParentMeeting);
        assert_eq!(Category::from_tag("parent-meeting"), Category::ParentMeeting);
        assert_eq!(Category::from_tag("Holiday"), Category::Holiday);
        assert_eq!(Category::from_tag("picnic"), Category::Info);
        assert_eq!(Category::Info.label(), "Info");
        assert!(!Category::ALL.contains(&Category::Info));
    }

    #[test]
    fn test_from_json_drops_bad_events() {
        let src = r#"[
            {"date": "2025-04-01", "type": "term", "title": "Session begins"},
            {"date": "2025-02-30", "type": "holiday", "title": "Nonexistent"},
            {"date": "2025-04-01", "type": "exam", "title": "Placement test"},
            {"date": "2025-05-01", "type": "picnic", "title": "Picnic"}
        ]"#;
        let loaded = LoadedEvents::from_json(src).unwrap();
        assert_eq!(loaded.index.len(), 3);
        assert_eq!(loaded.index.events_on(date!(2025 - 04 - 01)).len(), 2);
        assert_eq!(
            loaded.index.events_on(date!(2025 - 05 - 01)),
            [Event::new(date!(2025 - 05 - 01), Category::Info, "Picnic")]
        );
        assert_eq!(
            loaded.rejected,
            [BadEventError {
                position: 2,
                title: String::from("Nonexistent"),
                reason: BadEventReason::Date(String::from("2025-02-30")),
            }]
        );
        assert_eq!(
            loaded.rejected[0].to_string(),
            r#"bad event #2 ("Nonexistent"): invalid date "2025-02-30""#
        );
    }

    #[test]
    fn test_from_json_keeps_good_records_around_malformed_ones() {
        let src = r#"[
            {"date": "2025-04-01", "type": "term", "title": "Session begins"},
            {"date": 20250402, "type": "exam", "title": "Numeric date"},
            {"date": "2025-04-03", "title": "No type"},
            "not an object",
            {"date": "2025-04-04", "type": "holiday", "title": "Still here"}
        ]"#;
        let loaded = LoadedEvents::from_json(src).unwrap();
        assert_eq!(loaded.index.len(), 2);
        assert_eq!(loaded.index.events_on(date!(2025 - 04 - 01)).len(), 1);
        assert_eq!(loaded.index.events_on(date!(2025 - 04 - 04)).len(), 1);
        let rejected = loaded
            .rejected
            .iter()
            .map(|e| (e.position, e.title.as_str()))
            .collect::<Vec<_>>();
        assert_eq!(rejected, [(2, "Numeric date"), (3, "No type"), (4, "")]);
        for e in &loaded.rejected {
            assert!(
                matches!(e.reason, BadEventReason::Malformed(_)),
                "{e}"
            );
        }
        assert!(loaded.rejected[0]
            .to_string()
            .starts_with(r#"bad event #2 ("Numeric date"): malformed record: invalid type: integer `20250402`"#));
    }

    #[test]
    fn test_from_json_not_a_list() {
        assert!(LoadedEvents::from_json(r#"{"events": []}"#).is_err());
    }
}
