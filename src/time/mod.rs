//! Time-zone-aware value model for appointment scheduling.
//!
//! The types here are small immutable values:
//!
//! - [`TimeValue`]: a wall-clock hour and minute
//! - [`Duration`]: a non-negative span of whole minutes
//! - [`DateTimeSelection`]: a calendar date plus a [`TimeValue`]
//! - [`ZonedDateTimeSelection`]: a selection bound to an IANA zone
//! - [`Selection`]: the naive/zoned tagged variant used by the comparators
//! - [`TimeSpan`]: a start selection plus a duration with a derived end
//!
//! Values that can be mutated in place report a [`PropertyChange`] only when
//! the stored value actually changed, so owners can skip dependent
//! recomputation on no-op writes.
//!
//! # Zone-aware comparison
//!
//! Comparing two selections (or spans) first brings both into one zone:
//!
//! 1. neither carries a zone: compare the fields directly;
//! 2. one carries a zone: anchor the naive one in the default zone and move
//!    it, instant-preserving, into the other operand's zone;
//! 3. both carry different zones: move the right operand into the left
//!    operand's zone.
//!
//! The aligned values are then compared by date, then time of day.

pub mod change;
pub mod clock;
pub mod duration;
pub mod selection;
pub mod span;
pub mod zone;

pub use change::{Listeners, PropertyChange, SubscriptionId};
pub use clock::TimeValue;
pub use duration::Duration;
pub use selection::{DateTimeSelection, Selection, ZonedDateTimeSelection};
pub use span::{ObservableSpan, SpanChange, TimeSpan};
pub use zone::{default_zone, parse_zone, set_default_zone};
