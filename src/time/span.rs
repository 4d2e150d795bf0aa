//! Time spans: a start selection plus a duration, with a derived end.

use std::cmp::Ordering;
use std::fmt;

use chrono_tz::Tz;

use super::change::{Listeners, PropertyChange, SubscriptionId};
use super::duration::Duration;
use super::selection::{align, DateTimeSelection, Selection};
use super::zone;
use crate::error::ValidationError;

/// A change reported by a [`TimeSpan`] setter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpanChange {
    Start(PropertyChange<DateTimeSelection>),
    Duration(PropertyChange<Duration>),
    End(PropertyChange<DateTimeSelection>),
    Zone(PropertyChange<Option<Tz>>),
}

impl SpanChange {
    /// Name of the field that changed.
    pub fn field(&self) -> &'static str {
        match self {
            SpanChange::Start(c) => c.field,
            SpanChange::Duration(c) => c.field,
            SpanChange::End(c) => c.field,
            SpanChange::Zone(c) => c.field,
        }
    }
}

/// A start selection plus a non-negative duration.
///
/// `end` is always `start.plus(duration)`; it is recomputed by every setter
/// and never stored independently of the other two.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimeSpan {
    start: DateTimeSelection,
    duration: Duration,
    end: DateTimeSelection,
    zone: Option<Tz>,
}

impl TimeSpan {
    /// A naive span.
    pub fn new(start: DateTimeSelection, duration: Duration) -> Result<Self, ValidationError> {
        Ok(Self {
            start,
            duration,
            end: start.plus(duration)?,
            zone: None,
        })
    }

    /// A span whose readings belong to `zone`.
    pub fn zoned(
        start: DateTimeSelection,
        duration: Duration,
        zone: Tz,
    ) -> Result<Self, ValidationError> {
        let mut span = Self::new(start, duration)?;
        span.zone = Some(zone);
        Ok(span)
    }

    /// A naive span covering `[start, end)`.
    pub fn from_bounds(
        start: DateTimeSelection,
        end: DateTimeSelection,
    ) -> Result<Self, ValidationError> {
        Self::new(start, start.until(&end)?)
    }

    pub fn start(&self) -> DateTimeSelection {
        self.start
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }

    pub fn end(&self) -> DateTimeSelection {
        self.end
    }

    pub fn zone(&self) -> Option<Tz> {
        self.zone
    }

    /// The start as a tagged selection.
    pub fn start_selection(&self) -> Selection {
        self.tag(self.start)
    }

    /// The end as a tagged selection.
    pub fn end_selection(&self) -> Selection {
        self.tag(self.end)
    }

    fn tag(&self, value: DateTimeSelection) -> Selection {
        match self.zone {
            Some(zone) => Selection::Zoned(value.at_zone(zone)),
            None => Selection::Naive(value),
        }
    }

    // ========================================================================
    // Mutation
    // ========================================================================

    /// Move the start, keeping the duration. Emits `start` and `end` changes.
    pub fn set_start(&mut self, start: DateTimeSelection) -> Result<Vec<SpanChange>, ValidationError> {
        let end = start.plus(self.duration)?;
        let mut changes = Vec::new();
        if let Some(c) = PropertyChange::between("start", self.start, start) {
            changes.push(SpanChange::Start(c));
        }
        if let Some(c) = PropertyChange::between("end", self.end, end) {
            changes.push(SpanChange::End(c));
        }
        self.start = start;
        self.end = end;
        Ok(changes)
    }

    /// Change the duration, keeping the start. Emits `duration` and `end` changes.
    pub fn set_duration(&mut self, duration: Duration) -> Result<Vec<SpanChange>, ValidationError> {
        let end = self.start.plus(duration)?;
        let mut changes = Vec::new();
        if let Some(c) = PropertyChange::between("duration", self.duration, duration) {
            changes.push(SpanChange::Duration(c));
        }
        if let Some(c) = PropertyChange::between("end", self.end, end) {
            changes.push(SpanChange::End(c));
        }
        self.duration = duration;
        self.end = end;
        Ok(changes)
    }

    /// Move the end, keeping the start; the duration is recomputed.
    pub fn set_end(&mut self, end: DateTimeSelection) -> Result<Vec<SpanChange>, ValidationError> {
        let duration = self.start.until(&end)?;
        let mut changes = Vec::new();
        if let Some(c) = PropertyChange::between("end", self.end, end) {
            changes.push(SpanChange::End(c));
        }
        if let Some(c) = PropertyChange::between("duration", self.duration, duration) {
            changes.push(SpanChange::Duration(c));
        }
        self.duration = duration;
        self.end = end;
        Ok(changes)
    }

    /// Relabel the zone without touching the readings.
    pub fn set_zone(&mut self, zone: Option<Tz>) -> Vec<SpanChange> {
        let change = PropertyChange::between("zone", self.zone, zone).map(SpanChange::Zone);
        self.zone = zone;
        change.into_iter().collect()
    }

    // ========================================================================
    // Zone conversion
    // ========================================================================

    /// Label a naive span with `zone`. Already-zoned spans are unchanged.
    pub fn at_zone(&self, zone: Tz) -> Self {
        match self.zone {
            Some(_) => *self,
            None => self.with_zone_same_local(zone),
        }
    }

    /// Keep the readings and relabel the zone.
    pub fn with_zone_same_local(&self, zone: Tz) -> Self {
        Self {
            zone: Some(zone),
            ..*self
        }
    }

    /// Move the start to the same instant in `zone`, keeping the duration.
    ///
    /// Naive spans are first anchored in the default zone.
    pub fn with_zone_same_instant(&self, zone: Tz) -> Result<Self, ValidationError> {
        self.with_zone_same_instant_in(zone, zone::default_zone())
    }

    /// As [`TimeSpan::with_zone_same_instant`], with an explicit default zone.
    pub fn with_zone_same_instant_in(
        &self,
        zone: Tz,
        default_zone: Tz,
    ) -> Result<Self, ValidationError> {
        let start = self.start_selection().local_in(zone, default_zone);
        Self::zoned(start, self.duration, zone)
    }

    // ========================================================================
    // Comparison
    // ========================================================================

    /// Zone-aware ordering by start, then end, using the process default zone.
    pub fn compare(&self, other: &TimeSpan) -> Ordering {
        self.compare_in(other, zone::default_zone())
    }

    /// Zone-aware ordering by start, then end.
    ///
    /// Both spans are moved into one zone first (this span's, else the
    /// other's) so that their ends are derived the same way.
    pub fn compare_in(&self, other: &TimeSpan, default_zone: Tz) -> Ordering {
        let Some(target) = self.zone.or(other.zone) else {
            return (self.start, self.end).cmp(&(other.start, other.end));
        };
        match (self.in_zone(target, default_zone), other.in_zone(target, default_zone)) {
            (Ok(a), Ok(b)) => (a.start, a.end).cmp(&(b.start, b.end)),
            // Conversion pushed an end off the calendar; compare readings instead.
            _ => {
                let (a, b) = align(&self.start_selection(), &other.start_selection(), default_zone);
                a.cmp(&b).then_with(|| {
                    let (a, b) = align(&self.end_selection(), &other.end_selection(), default_zone);
                    a.cmp(&b)
                })
            }
        }
    }

    fn in_zone(&self, zone: Tz, default_zone: Tz) -> Result<Self, ValidationError> {
        if self.zone == Some(zone) {
            Ok(*self)
        } else {
            self.with_zone_same_instant_in(zone, default_zone)
        }
    }

    /// Whether `start <= point < end`, using the process default zone.
    pub fn is_in_range(&self, point: &Selection) -> bool {
        self.is_in_range_in(point, zone::default_zone())
    }

    pub fn is_in_range_in(&self, point: &Selection, default_zone: Tz) -> bool {
        let (start, p) = align(&self.start_selection(), point, default_zone);
        let (end, p_end) = align(&self.end_selection(), point, default_zone);
        p >= start && p_end < end
    }

    /// Whether the two half-open spans share any instant.
    pub fn overlaps(&self, other: &TimeSpan) -> bool {
        self.overlaps_in(other, zone::default_zone())
    }

    pub fn overlaps_in(&self, other: &TimeSpan, default_zone: Tz) -> bool {
        let (end, other_start) = align(&self.end_selection(), &other.start_selection(), default_zone);
        let (start, other_end) = align(&self.start_selection(), &other.end_selection(), default_zone);
        end > other_start && start < other_end
    }
}

impl fmt::Display for TimeSpan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {} ({})", self.start, self.end, self.duration)?;
        if let Some(zone) = self.zone {
            write!(f, " [{}]", zone.name())?;
        }
        Ok(())
    }
}

// ============================================================================
// Observable Span
// ============================================================================

/// A [`TimeSpan`] that notifies subscribers after each effective mutation.
#[derive(Debug)]
pub struct ObservableSpan {
    span: TimeSpan,
    listeners: Listeners<SpanChange>,
}

impl ObservableSpan {
    pub fn new(span: TimeSpan) -> Self {
        Self {
            span,
            listeners: Listeners::new(),
        }
    }

    pub fn span(&self) -> &TimeSpan {
        &self.span
    }

    pub fn subscribe(&mut self, callback: impl FnMut(&SpanChange) + 'static) -> SubscriptionId {
        self.listeners.subscribe(callback)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.listeners.unsubscribe(id)
    }

    pub fn set_start(&mut self, start: DateTimeSelection) -> Result<(), ValidationError> {
        self.apply(|span| span.set_start(start))
    }

    pub fn set_duration(&mut self, duration: Duration) -> Result<(), ValidationError> {
        self.apply(|span| span.set_duration(duration))
    }

    pub fn set_end(&mut self, end: DateTimeSelection) -> Result<(), ValidationError> {
        self.apply(|span| span.set_end(end))
    }

    pub fn set_zone(&mut self, zone: Option<Tz>) {
        let changes = self.span.set_zone(zone);
        self.emit(&changes);
    }

    fn apply(
        &mut self,
        mutate: impl FnOnce(&mut TimeSpan) -> Result<Vec<SpanChange>, ValidationError>,
    ) -> Result<(), ValidationError> {
        let changes = mutate(&mut self.span)?;
        self.emit(&changes);
        Ok(())
    }

    fn emit(&mut self, changes: &[SpanChange]) {
        for change in changes {
            self.listeners.notify(change);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn sel(y: i32, m: u32, d: u32, h: i32, min: i32) -> DateTimeSelection {
        DateTimeSelection::of(NaiveDate::from_ymd_opt(y, m, d).unwrap(), h, min).unwrap()
    }

    fn minutes(n: i64) -> Duration {
        Duration::from_minutes(n).unwrap()
    }

    fn assert_end_invariant(span: &TimeSpan) {
        assert_eq!(span.end(), span.start().plus(span.duration()).unwrap());
    }

    #[test]
    fn test_end_is_derived() {
        let span = TimeSpan::new(sel(2024, 3, 1, 22, 0), minutes(180)).unwrap();
        assert_eq!(span.end(), sel(2024, 3, 2, 1, 0));
        assert_end_invariant(&span);
    }

    #[test]
    fn test_set_start_emits_start_and_end() {
        let mut span = TimeSpan::new(sel(2024, 3, 1, 9, 0), minutes(60)).unwrap();
        let changes = span.set_start(sel(2024, 3, 1, 10, 0)).unwrap();
        let fields: Vec<_> = changes.iter().map(SpanChange::field).collect();
        assert_eq!(fields, vec!["start", "end"]);
        assert_eq!(span.end(), sel(2024, 3, 1, 11, 0));
        assert_end_invariant(&span);

        // Writing the same value again is silent.
        assert!(span.set_start(sel(2024, 3, 1, 10, 0)).unwrap().is_empty());
    }

    #[test]
    fn test_set_duration_emits_duration_and_end() {
        let mut span = TimeSpan::new(sel(2024, 3, 1, 9, 0), minutes(60)).unwrap();
        let changes = span.set_duration(minutes(90)).unwrap();
        let fields: Vec<_> = changes.iter().map(SpanChange::field).collect();
        assert_eq!(fields, vec!["duration", "end"]);
        assert_end_invariant(&span);
    }

    #[test]
    fn test_set_end_recomputes_duration() {
        let mut span = TimeSpan::new(sel(2024, 3, 1, 9, 0), minutes(60)).unwrap();
        span.set_end(sel(2024, 3, 2, 9, 30)).unwrap();
        assert_eq!(span.duration().total_minutes(), 24 * 60 + 30);
        assert_end_invariant(&span);

        let before = span;
        assert!(span.set_end(sel(2024, 3, 1, 8, 0)).is_err());
        assert_eq!(span, before);
    }

    #[test]
    fn test_end_past_calendar_range_rejected() {
        let huge = minutes(i64::MAX / 2);
        assert_eq!(
            TimeSpan::new(sel(2024, 3, 1, 9, 0), huge),
            Err(ValidationError::DateOutOfRange)
        );

        let mut span = TimeSpan::new(sel(2024, 3, 1, 9, 0), minutes(60)).unwrap();
        let before = span;
        assert_eq!(span.set_duration(huge), Err(ValidationError::DateOutOfRange));
        assert_eq!(span, before);
    }

    #[test]
    fn test_zero_duration() {
        let start = sel(2024, 3, 1, 9, 0);
        let span = TimeSpan::new(start, Duration::ZERO).unwrap();
        assert_eq!(span.end(), start);
        assert!(!span.is_in_range_in(&start.into(), Tz::UTC));
    }

    #[test]
    fn test_compare_start_then_end() {
        let a = TimeSpan::new(sel(2024, 3, 1, 9, 0), minutes(30)).unwrap();
        let b = TimeSpan::new(sel(2024, 3, 1, 9, 0), minutes(60)).unwrap();
        let c = TimeSpan::new(sel(2024, 3, 1, 8, 0), minutes(600)).unwrap();
        assert_eq!(a.compare_in(&b, Tz::UTC), Ordering::Less);
        assert_eq!(b.compare_in(&a, Tz::UTC), Ordering::Greater);
        assert_eq!(c.compare_in(&a, Tz::UTC), Ordering::Less);
        assert_eq!(a.compare_in(&a, Tz::UTC), Ordering::Equal);
    }

    #[test]
    fn test_compare_across_zones() {
        let ny = TimeSpan::zoned(sel(2024, 3, 5, 10, 0), minutes(60), Tz::America__New_York)
            .unwrap();
        let berlin = ny.with_zone_same_instant(Tz::Europe__Berlin).unwrap();
        assert_eq!(berlin.start(), sel(2024, 3, 5, 16, 0));
        assert_eq!(ny.compare_in(&berlin, Tz::UTC), Ordering::Equal);
        assert_eq!(berlin.compare_in(&ny, Tz::UTC), Ordering::Equal);
    }

    #[test]
    fn test_compare_across_dst_is_symmetric() {
        // 01:00 EST plus two hours of wall clock lands on 03:00 EDT, one real hour later.
        let ny = TimeSpan::zoned(sel(2024, 3, 10, 1, 0), minutes(120), Tz::America__New_York)
            .unwrap();
        let utc = TimeSpan::zoned(sel(2024, 3, 10, 6, 0), minutes(120), Tz::UTC).unwrap();

        assert_eq!(ny.compare_in(&utc, Tz::UTC), Ordering::Equal);
        assert_eq!(utc.compare_in(&ny, Tz::UTC), Ordering::Equal);

        let later = TimeSpan::zoned(sel(2024, 3, 10, 6, 0), minutes(180), Tz::UTC).unwrap();
        assert_eq!(ny.compare_in(&later, Tz::UTC), Ordering::Less);
        assert_eq!(later.compare_in(&ny, Tz::UTC), Ordering::Greater);
    }

    #[test]
    fn test_is_in_range() {
        let span = TimeSpan::zoned(sel(2024, 3, 5, 9, 0), minutes(60), Tz::Europe__London)
            .unwrap();
        let inside = sel(2024, 3, 5, 4, 30).at_zone(Tz::America__New_York);
        let at_end = sel(2024, 3, 5, 5, 0).at_zone(Tz::America__New_York);
        assert!(span.is_in_range_in(&inside.into(), Tz::UTC));
        assert!(!span.is_in_range_in(&at_end.into(), Tz::UTC));

        // A naive point is read in the default zone.
        let naive: Selection = sel(2024, 3, 5, 9, 15).into();
        assert!(span.is_in_range_in(&naive, Tz::UTC));
        assert!(!span.is_in_range_in(&naive, Tz::America__New_York));
    }

    #[test]
    fn test_overlaps() {
        let a = TimeSpan::new(sel(2024, 3, 1, 9, 0), minutes(60)).unwrap();
        let b = TimeSpan::new(sel(2024, 3, 1, 9, 30), minutes(60)).unwrap();
        let c = TimeSpan::new(sel(2024, 3, 1, 10, 0), minutes(60)).unwrap();
        assert!(a.overlaps_in(&b, Tz::UTC));
        assert!(b.overlaps_in(&a, Tz::UTC));
        assert!(!a.overlaps_in(&c, Tz::UTC));
    }

    #[test]
    fn test_observable_span_notifies() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut span =
            ObservableSpan::new(TimeSpan::new(sel(2024, 3, 1, 9, 0), minutes(60)).unwrap());

        let sink = Rc::clone(&seen);
        let id = span.subscribe(move |change| sink.borrow_mut().push(change.field()));

        span.set_duration(minutes(120)).unwrap();
        span.set_duration(minutes(120)).unwrap();
        assert_eq!(*seen.borrow(), vec!["duration", "end"]);

        assert!(span.unsubscribe(id));
        span.set_start(sel(2024, 3, 2, 9, 0)).unwrap();
        assert_eq!(seen.borrow().len(), 2);
        assert_end_invariant(span.span());
    }

    #[test]
    fn test_observable_span_rejected_edit_is_silent() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let original = TimeSpan::new(sel(2024, 3, 1, 9, 0), minutes(60)).unwrap();
        let mut span = ObservableSpan::new(original);

        let sink = Rc::clone(&seen);
        span.subscribe(move |change| sink.borrow_mut().push(change.field()));

        assert!(matches!(
            span.set_end(sel(2024, 3, 1, 8, 0)),
            Err(ValidationError::EndBeforeStart { .. })
        ));
        assert_eq!(
            span.set_duration(minutes(i64::MAX / 2)),
            Err(ValidationError::DateOutOfRange)
        );
        assert!(seen.borrow().is_empty());
        assert_eq!(*span.span(), original);

        span.set_zone(Some(Tz::Europe__Paris));
        assert_eq!(*seen.borrow(), vec!["zone"]);
        assert_eq!(span.span().zone(), Some(Tz::Europe__Paris));
    }
}
