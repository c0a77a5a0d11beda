//! The ordered log of one day's time entries.
//!
//! A [`DayLog`] is loaded for a single command, mutated, saved, and dropped.
//! Its entries are kept sorted by start time with no two intervals
//! overlapping; at most one entry is open and it is always the last one.

use std::path::{Path, PathBuf};
use std::str::FromStr;

use chrono::Duration;

use crate::clock::ClockMinute;
use crate::date::CalendarDate;
use crate::entry::{EntryDetails, TimeEntry};
use crate::error::{Result, TrackError};
use crate::storage;

/// How open entries count towards a duration total.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpenEntryPolicy {
    /// Count an open entry as running until the given minute.
    AccrueUntil(ClockMinute),
    /// Fail with [`TrackError::UnendedEntry`] when an open entry is included.
    Reject,
}

impl OpenEntryPolicy {
    const fn now(self) -> Option<ClockMinute> {
        match self {
            Self::AccrueUntil(now) => Some(now),
            Self::Reject => None,
        }
    }
}

/// Which entry `resume` copies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResumeTarget {
    /// The last entry today, or the last entry of the previous day.
    Latest,
    /// A 1-based position in today's log.
    Index(usize),
}

impl FromStr for ResumeTarget {
    type Err = std::num::ParseIntError;

    /// `-1` selects [`ResumeTarget::Latest`]; anything else is an index.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s == "-1" {
            return Ok(Self::Latest);
        }
        s.parse().map(Self::Index)
    }
}

/// The entries recorded for one calendar day.
#[derive(Debug, Clone)]
pub struct DayLog {
    date: CalendarDate,
    base_dir: PathBuf,
    entries: Vec<TimeEntry>,
}

impl DayLog {
    /// A log with no entries that has not been written yet.
    pub fn empty(date: CalendarDate, base_dir: impl Into<PathBuf>) -> Self {
        Self {
            date,
            base_dir: base_dir.into(),
            entries: Vec::new(),
        }
    }

    /// Loads the log for `date` from `base_dir/YYYY/MM/DD`.
    ///
    /// A missing file yields an empty log; nothing is created on disk until
    /// the first [`save`](Self::save).
    pub fn load(date: CalendarDate, base_dir: &Path) -> Result<Self> {
        let path = storage::day_path(base_dir, date);
        let entries = storage::read_entries(&path)?;
        Ok(Self {
            date,
            base_dir: base_dir.to_path_buf(),
            entries,
        })
    }

    /// Rewrites the whole backing file from the in-memory entries.
    pub fn save(&self) -> Result<()> {
        storage::write_entries(&self.path(), &self.entries)
    }

    /// Creates the backing file with only a header if it does not exist yet.
    pub fn ensure_file(&self) -> Result<PathBuf> {
        let path = self.path();
        storage::ensure_day_file(&path)?;
        Ok(path)
    }

    pub fn path(&self) -> PathBuf {
        storage::day_path(&self.base_dir, self.date)
    }

    pub const fn date(&self) -> CalendarDate {
        self.date
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    pub fn entries(&self) -> &[TimeEntry] {
        &self.entries
    }

    /// Entries paired with their 1-based position.
    ///
    /// Positions are recomputed on every call; they shift whenever an
    /// insertion lands before an entry.
    pub fn indexed(&self) -> impl Iterator<Item = (usize, &TimeEntry)> {
        self.entries.iter().enumerate().map(|(i, entry)| (i + 1, entry))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Inserts `entry`, truncating or splitting neighbours so that nothing
    /// overlaps afterwards.
    ///
    /// An open entry takes over the tail of the closed entry it starts in,
    /// fills the gap up to the next entry it starts before, or closes the open
    /// entry it follows. A closed entry wins over everything it covers:
    /// covered entries are dropped, partially covered ones are trimmed, and an
    /// entry that strictly contains it is split around it.
    pub fn add_entry(&mut self, entry: TimeEntry) -> Result<()> {
        match entry.stop {
            None => self.insert_open(entry),
            Some(stop) if stop < entry.start => {
                return Err(TrackError::StopBeforeStart {
                    start: entry.start,
                    stop,
                });
            }
            Some(stop) => self.insert_closed(entry, stop),
        }

        self.entries.sort_by_key(|entry| entry.start);
        self.entries.retain(|entry| entry.stop != Some(entry.start));
        Ok(())
    }

    fn insert_open(&mut self, mut entry: TimeEntry) {
        let start = entry.start;
        let mut position = self.entries.len();

        for (i, existing) in self.entries.iter_mut().enumerate() {
            match existing.stop {
                Some(stop) if start.between(existing.start, stop) => {
                    tracing::debug!(%start, "new entry takes over the tail of an existing one");
                    entry.stop = Some(stop);
                    existing.stop = Some(start);
                    position = i + 1;
                    break;
                }
                _ if start < existing.start => {
                    tracing::debug!(%start, next = %existing.start, "new entry fills the gap before an existing one");
                    entry.stop = Some(existing.start);
                    position = i;
                    break;
                }
                None => {
                    // start >= existing.start here; an equal start leaves a
                    // zero-length entry that is dropped after sorting
                    tracing::debug!(%start, "closing the running entry");
                    existing.stop = Some(start);
                    position = i + 1;
                    break;
                }
                Some(_) => {}
            }
        }

        self.entries.insert(position, entry);
    }

    fn insert_closed(&mut self, entry: TimeEntry, stop: ClockMinute) {
        let start = entry.start;
        let mut kept = Vec::with_capacity(self.entries.len() + 2);

        for existing in self.entries.drain(..) {
            let ends_after = |instant: ClockMinute| existing.stop.is_none_or(|end| end > instant);
            if existing.start >= stop || !ends_after(start) {
                kept.push(existing);
                continue;
            }

            let keeps_tail = ends_after(stop);
            if existing.start < start {
                let mut head = existing.clone();
                head.stop = Some(start);
                kept.push(head);
            }
            if keeps_tail {
                let mut tail = existing;
                tail.start = stop;
                kept.push(tail);
            }
        }

        tracing::debug!(%start, %stop, "inserted closed entry");
        kept.push(entry);
        self.entries = kept;
    }

    /// Starts a new entry at `start` and saves the log.
    pub fn start(&mut self, start: ClockMinute, details: EntryDetails) -> Result<()> {
        self.add_entry(TimeEntry::open(start, details))?;
        self.save()
    }

    /// Stops the running entry at `stop` and saves the log.
    ///
    /// Only the last entry can be running, so that is the only one considered.
    /// Stopping at the minute it started discards the entry.
    pub fn stop(&mut self, stop: ClockMinute) -> Result<()> {
        let last = self
            .entries
            .last_mut()
            .filter(|entry| entry.is_open())
            .ok_or(TrackError::NoOpenEntry)?;
        if stop < last.start {
            return Err(TrackError::StopBeforeStart {
                start: last.start,
                stop,
            });
        }
        if stop == last.start {
            tracing::debug!(%stop, "dropping zero-length entry");
            self.entries.pop();
        } else {
            last.stop = Some(stop);
        }
        self.save()
    }

    /// Starts a copy of an earlier entry.
    ///
    /// Type, project, customer and task ID always come from the source entry;
    /// the description does unless one is given.
    pub fn resume(
        &mut self,
        target: ResumeTarget,
        description: Option<String>,
        start: ClockMinute,
    ) -> Result<()> {
        let source = match target {
            ResumeTarget::Latest => match self.entries.last() {
                Some(entry) => entry.details(),
                None => {
                    let previous = Self::load(self.date.add_days(-1), &self.base_dir)?;
                    previous
                        .entries
                        .last()
                        .map(TimeEntry::details)
                        .ok_or(TrackError::NoEntryToResume)?
                }
            },
            ResumeTarget::Index(index) => index
                .checked_sub(1)
                .and_then(|i| self.entries.get(i))
                .map(TimeEntry::details)
                .ok_or(TrackError::EntryIndexOutOfRange {
                    index,
                    len: self.entries.len(),
                })?,
        };

        let details = EntryDetails {
            description: description.unwrap_or(source.description),
            ..source
        };
        self.start(start, details)
    }

    /// Entries for `customer`, in order. `None` or an empty name selects all.
    pub fn entries_for_customer(&self, customer: Option<&str>) -> Vec<&TimeEntry> {
        match customer.filter(|c| !c.is_empty()) {
            None => self.entries.iter().collect(),
            Some(customer) => self
                .entries
                .iter()
                .filter(|entry| entry.customer == customer)
                .collect(),
        }
    }

    /// Sum of the durations of [`entries_for_customer`](Self::entries_for_customer).
    pub fn total_duration(
        &self,
        customer: Option<&str>,
        policy: OpenEntryPolicy,
    ) -> Result<Duration> {
        self.entries_for_customer(customer)
            .into_iter()
            .try_fold(Duration::zero(), |total, entry| {
                entry
                    .duration(policy.now())
                    .map(|duration| total + duration)
                    .ok_or(TrackError::UnendedEntry { date: self.date })
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry::EntryType;
    use proptest::prelude::*;

    fn hm(h: u16, m: u16) -> ClockMinute {
        ClockMinute::from_hm(h, m).unwrap()
    }

    fn day() -> CalendarDate {
        CalendarDate::from_ymd(2025, 1, 29).unwrap()
    }

    fn labelled(description: &str) -> EntryDetails {
        EntryDetails {
            description: description.to_string(),
            ..EntryDetails::default()
        }
    }

    fn client_work() -> EntryDetails {
        EntryDetails {
            kind: EntryType::GitLab,
            project: "P".to_string(),
            customer: "C".to_string(),
            task_id: "#7".to_string(),
            description: "client work".to_string(),
        }
    }

    fn spans(log: &DayLog) -> Vec<(ClockMinute, Option<ClockMinute>, &str)> {
        log.entries()
            .iter()
            .map(|e| (e.start, e.stop, e.description.as_str()))
            .collect()
    }

    fn assert_no_overlap(log: &DayLog) {
        for pair in log.entries().windows(2) {
            let (a, b) = (&pair[0], &pair[1]);
            let a_stop = a.stop.expect("only the last entry may be open");
            assert!(a_stop <= b.start, "{a} overlaps {b}");
            assert!(a.start <= b.start, "{a} is after {b}");
        }
    }

    fn log_in(dir: &Path) -> DayLog {
        DayLog::empty(day(), dir)
    }

    #[test]
    fn mid_interval_start_takes_over_the_tail() {
        let temp = tempfile::tempdir().unwrap();
        let mut log = log_in(temp.path());
        log.add_entry(TimeEntry::closed(hm(9, 0), hm(12, 0), client_work()))
            .unwrap();

        log.start(hm(10, 0), labelled("break")).unwrap();

        assert_eq!(
            spans(&log),
            vec![
                (hm(9, 0), Some(hm(10, 0)), "client work"),
                (hm(10, 0), Some(hm(12, 0)), "break"),
            ]
        );
        assert_eq!(log.entries()[0].project, "P");
        assert_eq!(log.entries()[0].customer, "C");
    }

    #[test]
    fn start_before_an_entry_fills_the_gap() {
        let temp = tempfile::tempdir().unwrap();
        let mut log = log_in(temp.path());
        log.add_entry(TimeEntry::closed(hm(10, 0), hm(12, 0), client_work()))
            .unwrap();

        log.start(hm(9, 0), labelled("prep")).unwrap();

        assert_eq!(
            spans(&log),
            vec![
                (hm(9, 0), Some(hm(10, 0)), "prep"),
                (hm(10, 0), Some(hm(12, 0)), "client work"),
            ]
        );
    }

    #[test]
    fn start_after_open_entry_closes_it() {
        let temp = tempfile::tempdir().unwrap();
        let mut log = log_in(temp.path());
        log.start(hm(8, 0), labelled("first")).unwrap();

        log.start(hm(9, 30), labelled("next task")).unwrap();

        assert_eq!(
            spans(&log),
            vec![
                (hm(8, 0), Some(hm(9, 30)), "first"),
                (hm(9, 30), None, "next task"),
            ]
        );
    }

    #[test]
    fn start_after_closed_entries_appends_open() {
        let temp = tempfile::tempdir().unwrap();
        let mut log = log_in(temp.path());
        log.add_entry(TimeEntry::closed(hm(8, 0), hm(9, 0), labelled("a")))
            .unwrap();

        log.start(hm(13, 0), labelled("b")).unwrap();

        assert_eq!(
            spans(&log),
            vec![(hm(8, 0), Some(hm(9, 0)), "a"), (hm(13, 0), None, "b")]
        );
    }

    #[test]
    fn start_at_same_minute_replaces_instead_of_leaving_empty_entry() {
        let temp = tempfile::tempdir().unwrap();
        let mut log = log_in(temp.path());
        log.add_entry(TimeEntry::closed(hm(9, 0), hm(10, 0), labelled("old")))
            .unwrap();
        log.start(hm(9, 0), labelled("new")).unwrap();
        assert_eq!(spans(&log), vec![(hm(9, 0), Some(hm(10, 0)), "new")]);

        let mut running = log_in(temp.path());
        running.add_entry(TimeEntry::open(hm(11, 0), labelled("old"))).unwrap();
        running.add_entry(TimeEntry::open(hm(11, 0), labelled("new"))).unwrap();
        assert_eq!(spans(&running), vec![(hm(11, 0), None, "new")]);
    }

    #[test]
    fn closed_entry_replaces_everything_it_covers() {
        let temp = tempfile::tempdir().unwrap();
        let mut log = log_in(temp.path());
        for (start, stop, label) in [(8, 9, "a"), (9, 10, "b"), (10, 11, "c"), (11, 12, "d")] {
            log.add_entry(TimeEntry::closed(hm(start, 0), hm(stop, 0), labelled(label)))
                .unwrap();
        }

        log.add_entry(TimeEntry::closed(hm(8, 30), hm(11, 15), labelled("span")))
            .unwrap();

        assert_eq!(
            spans(&log),
            vec![
                (hm(8, 0), Some(hm(8, 30)), "a"),
                (hm(8, 30), Some(hm(11, 15)), "span"),
                (hm(11, 15), Some(hm(12, 0)), "d"),
            ]
        );
        assert_no_overlap(&log);
    }

    #[test]
    fn closed_entry_inside_another_splits_it() {
        let temp = tempfile::tempdir().unwrap();
        let mut log = log_in(temp.path());
        log.add_entry(TimeEntry::closed(hm(9, 0), hm(12, 0), labelled("long")))
            .unwrap();

        log.add_entry(TimeEntry::closed(hm(10, 0), hm(10, 30), labelled("call")))
            .unwrap();

        assert_eq!(
            spans(&log),
            vec![
                (hm(9, 0), Some(hm(10, 0)), "long"),
                (hm(10, 0), Some(hm(10, 30)), "call"),
                (hm(10, 30), Some(hm(12, 0)), "long"),
            ]
        );
    }

    #[test]
    fn closed_entry_inside_running_entry_keeps_it_running() {
        let temp = tempfile::tempdir().unwrap();
        let mut log = log_in(temp.path());
        log.add_entry(TimeEntry::open(hm(9, 0), labelled("running")))
            .unwrap();

        log.add_entry(TimeEntry::closed(hm(9, 15), hm(9, 45), labelled("interrupt")))
            .unwrap();

        assert_eq!(
            spans(&log),
            vec![
                (hm(9, 0), Some(hm(9, 15)), "running"),
                (hm(9, 15), Some(hm(9, 45)), "interrupt"),
                (hm(9, 45), None, "running"),
            ]
        );
    }

    #[test]
    fn closed_entry_with_stop_before_start_is_rejected() {
        let mut log = DayLog::empty(day(), "/nonexistent");
        let err = log
            .add_entry(TimeEntry::closed(hm(10, 0), hm(9, 0), labelled("x")))
            .unwrap_err();
        assert!(matches!(err, TrackError::StopBeforeStart { .. }));
        assert!(log.is_empty());
    }

    #[derive(Debug, Clone)]
    enum Command {
        Start(u16),
        Stop(u16),
        Resume(Option<usize>, u16),
        Insert(u16, u16),
    }

    fn minute(value: u16) -> ClockMinute {
        ClockMinute::from_minutes(value).unwrap()
    }

    prop_compose! {
        fn closed_span()(start in 0u16..1440, length in 0u16..240) -> Command {
            Command::Insert(start, (start + length).min(1439))
        }
    }

    fn command() -> impl Strategy<Value = Command> {
        prop_oneof![
            (0u16..1440).prop_map(Command::Start),
            (0u16..1440).prop_map(Command::Stop),
            (prop::option::of(1usize..6), 0u16..1440)
                .prop_map(|(index, start)| Command::Resume(index, start)),
            closed_span(),
        ]
    }

    fn check_invariants(log: &DayLog) -> Result<(), TestCaseError> {
        for entry in log.entries() {
            prop_assert_ne!(entry.stop, Some(entry.start), "zero-length entry {}", entry);
        }
        for pair in log.entries().windows(2) {
            let (a, b) = (&pair[0], &pair[1]);
            let a_stop = a.stop;
            prop_assert!(a_stop.is_some(), "{} is open but not last", a);
            prop_assert!(a_stop <= Some(b.start), "{} overlaps {}", a, b);
            prop_assert!(a.start < b.start, "{} is not before {}", a, b);
        }
        Ok(())
    }

    proptest! {
        #[test]
        fn no_overlap_after_any_sequence_of_commands(
            commands in prop::collection::vec(command(), 1..40)
        ) {
            let temp = tempfile::tempdir().unwrap();
            let mut log = log_in(temp.path());

            for (step, command) in commands.into_iter().enumerate() {
                let details = labelled(&format!("step {step}"));
                let result = match command {
                    Command::Start(start) => log.start(minute(start), details),
                    Command::Stop(stop) => log.stop(minute(stop)),
                    Command::Resume(index, start) => {
                        let target = index.map_or(ResumeTarget::Latest, ResumeTarget::Index);
                        log.resume(target, None, minute(start))
                    }
                    Command::Insert(start, stop) => {
                        log.add_entry(TimeEntry::closed(minute(start), minute(stop), details))
                    }
                };
                if let Err(err) = result {
                    prop_assert!(
                        matches!(
                            err,
                            TrackError::NoOpenEntry
                                | TrackError::StopBeforeStart { .. }
                                | TrackError::NoEntryToResume
                                | TrackError::EntryIndexOutOfRange { .. }
                        ),
                        "unexpected error: {}",
                        err
                    );
                }
                check_invariants(&log)?;
            }

            log.save().unwrap();
            let reloaded = DayLog::load(day(), temp.path()).unwrap();
            prop_assert_eq!(reloaded.entries(), log.entries());
        }
    }

    #[test]
    fn stop_requires_open_last_entry() {
        let temp = tempfile::tempdir().unwrap();
        let mut log = log_in(temp.path());
        assert!(matches!(log.stop(hm(10, 0)), Err(TrackError::NoOpenEntry)));

        log.add_entry(TimeEntry::closed(hm(9, 0), hm(10, 0), labelled("done")))
            .unwrap();
        assert!(matches!(log.stop(hm(11, 0)), Err(TrackError::NoOpenEntry)));
    }

    #[test]
    fn stop_closes_and_persists() {
        let temp = tempfile::tempdir().unwrap();
        let mut log = log_in(temp.path());
        log.start(hm(9, 0), labelled("work")).unwrap();

        assert!(matches!(
            log.stop(hm(8, 0)),
            Err(TrackError::StopBeforeStart { .. })
        ));
        log.stop(hm(10, 15)).unwrap();

        let reloaded = DayLog::load(day(), temp.path()).unwrap();
        assert_eq!(spans(&reloaded), vec![(hm(9, 0), Some(hm(10, 15)), "work")]);
    }

    #[test]
    fn stop_at_start_minute_discards_entry() {
        let temp = tempfile::tempdir().unwrap();
        let mut log = log_in(temp.path());
        log.start(hm(8, 0), labelled("kept")).unwrap();
        log.start(hm(9, 0), labelled("no time")).unwrap();

        log.stop(hm(9, 0)).unwrap();

        let reloaded = DayLog::load(day(), temp.path()).unwrap();
        assert_eq!(spans(&reloaded), vec![(hm(8, 0), Some(hm(9, 0)), "kept")]);
        assert!(matches!(log.stop(hm(9, 30)), Err(TrackError::NoOpenEntry)));
    }

    #[test]
    fn resume_latest_falls_back_to_previous_day() {
        let temp = tempfile::tempdir().unwrap();
        let mut yesterday = DayLog::empty(day().add_days(-1), temp.path());
        yesterday
            .add_entry(TimeEntry::closed(hm(9, 0), hm(10, 0), labelled("early")))
            .unwrap();
        yesterday
            .add_entry(TimeEntry::closed(hm(15, 0), hm(17, 0), client_work()))
            .unwrap();
        yesterday.save().unwrap();

        let mut today = DayLog::load(day(), temp.path()).unwrap();
        today.resume(ResumeTarget::Latest, None, hm(8, 30)).unwrap();

        let resumed = &today.entries()[0];
        assert_eq!(resumed.start, hm(8, 30));
        assert!(resumed.is_open());
        assert_eq!(resumed.details(), client_work());
    }

    #[test]
    fn resume_latest_with_nothing_to_resume_fails() {
        let temp = tempfile::tempdir().unwrap();
        let mut log = log_in(temp.path());
        assert!(matches!(
            log.resume(ResumeTarget::Latest, None, hm(9, 0)),
            Err(TrackError::NoEntryToResume)
        ));
        assert!(!log.path().exists());
    }

    #[test]
    fn resume_by_index_overrides_description() {
        let temp = tempfile::tempdir().unwrap();
        let mut log = log_in(temp.path());
        log.add_entry(TimeEntry::closed(hm(9, 0), hm(10, 0), client_work()))
            .unwrap();
        log.add_entry(TimeEntry::closed(hm(10, 0), hm(11, 0), labelled("other")))
            .unwrap();

        log.resume(ResumeTarget::Index(1), Some("follow-up".to_string()), hm(13, 0))
            .unwrap();

        let resumed = log.entries().last().unwrap();
        assert_eq!(resumed.description, "follow-up");
        assert_eq!(resumed.project, "P");
        assert_eq!(resumed.kind, EntryType::GitLab);
        assert_eq!(resumed.task_id, "#7");
    }

    #[test]
    fn resume_out_of_range_index_fails() {
        let temp = tempfile::tempdir().unwrap();
        let mut log = log_in(temp.path());
        log.add_entry(TimeEntry::closed(hm(9, 0), hm(10, 0), labelled("only")))
            .unwrap();

        for index in [0, 2] {
            let err = log
                .resume(ResumeTarget::Index(index), None, hm(12, 0))
                .unwrap_err();
            assert!(matches!(
                err,
                TrackError::EntryIndexOutOfRange { len: 1, .. }
            ));
        }
    }

    #[test]
    fn resume_target_parses_cli_values() {
        assert_eq!("-1".parse::<ResumeTarget>().unwrap(), ResumeTarget::Latest);
        assert_eq!("3".parse::<ResumeTarget>().unwrap(), ResumeTarget::Index(3));
        assert!("-2".parse::<ResumeTarget>().is_err());
        assert!("x".parse::<ResumeTarget>().is_err());
    }

    #[test]
    fn save_then_load_round_trips() {
        let temp = tempfile::tempdir().unwrap();
        let mut log = log_in(temp.path());
        log.add_entry(TimeEntry::closed(hm(8, 0), hm(9, 0), client_work()))
            .unwrap();
        log.add_entry(TimeEntry::closed(
            hm(9, 0),
            hm(9, 30),
            EntryDetails {
                kind: EntryType::Other("meeting".to_string()),
                project: "ops, infra".to_string(),
                customer: "\"quoted\"".to_string(),
                task_id: String::new(),
                description: "line one".to_string(),
            },
        ))
        .unwrap();
        log.start(hm(9, 30), labelled("running")).unwrap();

        let reloaded = DayLog::load(day(), temp.path()).unwrap();
        assert_eq!(reloaded.entries(), log.entries());
        assert_eq!(
            reloaded.path(),
            temp.path().join("2025").join("01").join("29")
        );
    }

    #[test]
    fn indexes_follow_position() {
        let temp = tempfile::tempdir().unwrap();
        let mut log = log_in(temp.path());
        log.start(hm(10, 0), labelled("b")).unwrap();
        log.start(hm(9, 0), labelled("a")).unwrap();

        let indexed: Vec<_> = log
            .indexed()
            .map(|(i, e)| (i, e.description.as_str()))
            .collect();
        assert_eq!(indexed, vec![(1, "a"), (2, "b")]);
    }

    #[test]
    fn customer_filter_and_totals_agree() {
        let temp = tempfile::tempdir().unwrap();
        let mut log = log_in(temp.path());
        log.add_entry(TimeEntry::closed(hm(8, 0), hm(9, 0), client_work()))
            .unwrap();
        log.add_entry(TimeEntry::closed(hm(9, 0), hm(9, 20), labelled("internal")))
            .unwrap();
        log.add_entry(TimeEntry::closed(hm(10, 0), hm(10, 45), client_work()))
            .unwrap();
        log.add_entry(TimeEntry::open(hm(11, 0), client_work()))
            .unwrap();
        let policy = OpenEntryPolicy::AccrueUntil(hm(11, 30));

        for customer in [None, Some(""), Some("C"), Some("nobody")] {
            let expected = log
                .entries_for_customer(customer)
                .iter()
                .map(|e| e.duration(Some(hm(11, 30))).unwrap())
                .fold(Duration::zero(), |a, b| a + b);
            assert_eq!(log.total_duration(customer, policy).unwrap(), expected);
        }

        assert_eq!(log.entries_for_customer(Some("C")).len(), 3);
        assert_eq!(
            log.total_duration(Some("C"), policy).unwrap(),
            Duration::minutes(60 + 45 + 30)
        );
        assert_eq!(
            log.total_duration(None, policy).unwrap(),
            Duration::minutes(60 + 20 + 45 + 30)
        );
    }

    #[test]
    fn rejecting_open_entries_fails_total() {
        let temp = tempfile::tempdir().unwrap();
        let mut log = log_in(temp.path());
        log.add_entry(TimeEntry::closed(hm(8, 0), hm(9, 0), labelled("done")))
            .unwrap();
        log.add_entry(TimeEntry::open(hm(9, 0), labelled("running")))
            .unwrap();

        let err = log
            .total_duration(None, OpenEntryPolicy::Reject)
            .unwrap_err();
        assert!(matches!(err, TrackError::UnendedEntry { date } if date == day()));
    }
}
