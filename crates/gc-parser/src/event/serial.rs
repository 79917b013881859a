//! Serial 수집기 문법 -- DefNew young 수집과 Tenured full GC

use gclens_core::types::{CollectionData, EventKind, LogEvent};

use super::{EventTypeDescriptor, Fields};
use crate::error::GcLogError;
use crate::grammar::{line_end, secs, transition, trigger, ts, DURATION, TIMESTAMP};

pub fn descriptors() -> Result<Vec<EventTypeDescriptor>, regex::Error> {
    Ok(vec![
        EventTypeDescriptor::new(EventKind::SerialOld, &serial_old_pattern(), extract_serial_old)?,
        EventTypeDescriptor::new(EventKind::SerialNew, &serial_new_pattern(), extract_serial_new)?,
    ])
}

fn serial_old_pattern() -> String {
    format!(
        concat!(
            r"^{timestamp}: \[Full GC ?(?:\({trigger}\) ?)?{TIMESTAMP}: \[Tenured: {old}, {DURATION} secs\] ",
            r"{combined}, \[(?:Perm |Metaspace): {perm}\], {duration}\]{end}"
        ),
        timestamp = ts("timestamp"),
        trigger = trigger("trigger"),
        old = transition("old"),
        combined = transition("combined"),
        perm = transition("perm"),
        duration = secs("duration"),
        end = line_end(),
        TIMESTAMP = TIMESTAMP,
        DURATION = DURATION,
    )
}

fn extract_serial_old(f: &Fields<'_, '_>) -> Result<LogEvent, GcLogError> {
    let old = f.occupancy("old")?;
    let combined = f.occupancy("combined")?;
    Ok(LogEvent::SerialOld(CollectionData {
        common: f.common(
            f.timestamp("timestamp")?,
            f.millis("duration")?,
            f.trigger(&["trigger"], &[]),
        ),
        young: Some(combined.saturating_sub(&old)),
        old: Some(old),
        perm: Some(f.occupancy("perm")?),
        combined: Some(combined),
    }))
}

fn serial_new_pattern() -> String {
    format!(
        concat!(
            r"^{timestamp}: \[GC ?(?:\({trigger}\) ?)?{TIMESTAMP}: \[DefNew: {young}, {DURATION} secs\] ",
            r"{combined}, {duration}\]{end}"
        ),
        timestamp = ts("timestamp"),
        trigger = trigger("trigger"),
        young = transition("young"),
        combined = transition("combined"),
        duration = secs("duration"),
        end = line_end(),
        TIMESTAMP = TIMESTAMP,
        DURATION = DURATION,
    )
}

fn extract_serial_new(f: &Fields<'_, '_>) -> Result<LogEvent, GcLogError> {
    let young = f.occupancy("young")?;
    let combined = f.occupancy("combined")?;
    Ok(LogEvent::SerialNew(CollectionData {
        common: f.common(
            f.timestamp("timestamp")?,
            f.millis("duration")?,
            f.trigger(&["trigger"], &[]),
        ),
        young: Some(young),
        old: Some(combined.saturating_sub(&young)),
        perm: None,
        combined: Some(combined),
    }))
}
