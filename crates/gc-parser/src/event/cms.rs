//! CMS 계열 문법 -- ParNew young 수집과 CMS old 세대 수집
//!
//! 서술자 순서가 중요합니다. `ParNewConcurrentModeFailure`는 ParNew 블록 뒤에
//! CMS 블록이 이어지는 라인이므로 일반 `ParNew`보다 먼저 시도해야 합니다.

use gclens_core::types::{CollectionData, ConcurrentPhaseData, EventKind, LogEvent};

use super::{EventTypeDescriptor, Fields};
use crate::error::GcLogError;
use crate::grammar::{
    histogram, kb, line_end, secs, transition, trigger, ts, CONCURRENT_TIME, DURATION, ICMS_DC_BLOCK,
    KB_SIZE, TIMESTAMP,
};

/// CMS 계열 서술자 (구체성 순서)
pub fn descriptors() -> Result<Vec<EventTypeDescriptor>, regex::Error> {
    Ok(vec![
        EventTypeDescriptor::new(
            EventKind::ParNewConcurrentModeFailure,
            &par_new_concurrent_mode_failure_pattern(),
            extract_par_new_concurrent_mode_failure,
        )?,
        EventTypeDescriptor::new(
            EventKind::CmsSerialOld,
            &cms_serial_old_pattern(),
            extract_cms_serial_old,
        )?,
        EventTypeDescriptor::new(EventKind::CmsRemark, &cms_remark_pattern(), extract_cms_remark)?,
        EventTypeDescriptor::new(
            EventKind::CmsInitialMark,
            &cms_initial_mark_pattern(),
            extract_cms_initial_mark,
        )?,
        EventTypeDescriptor::new(EventKind::ParNew, &par_new_pattern(), extract_par_new)?,
        EventTypeDescriptor::new(
            EventKind::CmsConcurrent,
            &cms_concurrent_pattern(),
            extract_cms_concurrent,
        )?,
    ])
}

/// `[CMS Perm : ...]` 또는 `[Metaspace: ...]` 블록
fn perm_block() -> String {
    format!(r"(?:, \[(?:CMS Perm |Metaspace): {}\])?", transition("perm"))
}

/// CMS 블록 안에 끼어드는 remark 하위 단계 (concurrent mode failure 중 remark)
fn embedded_remark_block() -> String {
    format!(
        concat!(
            r"(?: ?\[YG occupancy: \d{{1,12}} K \(\d{{1,12}} K\)\]",
            r"{ts}: \[Rescan \(parallel\) , {d} secs\]",
            r"{ts}: \[weak refs processing, {d} secs\]",
            r"(?:{ts}: \[class unloading, {d} secs\]",
            r"{ts}: \[scrub symbol (?:& string )?tables?, {d} secs\])?)"
        ),
        ts = TIMESTAMP,
        d = DURATION
    )
}

fn par_new_concurrent_mode_failure_pattern() -> String {
    format!(
        concat!(
            r"^{timestamp}: \[GC(?: \({t_outer}\))? ?{TIMESTAMP}: \[ParNew",
            r"(?: \({t_par}\)(?: \({t_par2}\))?",
            r"|(?: \({t_promo}\))?: {KB_SIZE}->{KB_SIZE}\({KB_SIZE}\), {DURATION} secs\]{hist1}?",
            r"{TIMESTAMP}: \[CMS(?:bailing out to foreground collection)?(?: \({t_cms}\))?)",
            r": {old}, {DURATION} secs\]{hist2}? {combined}{perm}{ICMS_DC_BLOCK}?, {duration}\]{end}"
        ),
        timestamp = ts("timestamp"),
        t_outer = trigger("t_outer"),
        t_par = trigger("t_par"),
        t_par2 = trigger("t_par2"),
        t_promo = trigger("t_promo"),
        t_cms = trigger("t_cms"),
        hist1 = histogram("hist1"),
        hist2 = histogram("hist2"),
        old = transition("old"),
        combined = transition("combined"),
        perm = perm_block(),
        duration = secs("duration"),
        end = line_end(),
        TIMESTAMP = TIMESTAMP,
        KB_SIZE = KB_SIZE,
        DURATION = DURATION,
        ICMS_DC_BLOCK = ICMS_DC_BLOCK,
    )
}

fn extract_par_new_concurrent_mode_failure(f: &Fields<'_, '_>) -> Result<LogEvent, GcLogError> {
    let old = f.occupancy("old")?;
    let combined = f.occupancy("combined")?;
    let trigger = f.trigger(
        &["t_outer", "t_par", "t_par2", "t_promo", "t_cms"],
        &["hist1", "hist2"],
    );
    Ok(LogEvent::ParNewConcurrentModeFailure(CollectionData {
        common: f.common(f.timestamp("timestamp")?, f.millis("duration")?, trigger),
        young: Some(combined.saturating_sub(&old)),
        old: Some(old),
        perm: f.opt_occupancy("perm")?,
        combined: Some(combined),
    }))
}

fn cms_serial_old_pattern() -> String {
    format!(
        concat!(
            r"^{timestamp}: \[Full GC ?(?:\({t_outer}\) )?{hist1}?",
            r"(?:{TIMESTAMP}: \[CMS(?:bailing out to foreground collection)?",
            r"(?: \({t_cms1}\))?(?: \({t_cms2}\))?{remark}?: {old}, {DURATION} secs\])?",
            r"{hist2}? {combined}{perm}{ICMS_DC_BLOCK}?, {duration}\]{end}"
        ),
        timestamp = ts("timestamp"),
        t_outer = trigger("t_outer"),
        t_cms1 = trigger("t_cms1"),
        t_cms2 = trigger("t_cms2"),
        hist1 = histogram("hist1"),
        hist2 = histogram("hist2"),
        remark = embedded_remark_block(),
        old = transition("old"),
        combined = transition("combined"),
        perm = perm_block(),
        duration = secs("duration"),
        end = line_end(),
        TIMESTAMP = TIMESTAMP,
        DURATION = DURATION,
        ICMS_DC_BLOCK = ICMS_DC_BLOCK,
    )
}

fn extract_cms_serial_old(f: &Fields<'_, '_>) -> Result<LogEvent, GcLogError> {
    let old = f.opt_occupancy("old")?;
    let combined = f.occupancy("combined")?;
    // CMS 블록 트리거 > 클래스 히스토그램 > `Full GC` 뒤 트리거
    let trigger = f
        .trigger(&["t_cms1", "t_cms2"], &["hist1", "hist2"])
        .or_else(|| f.trigger(&["t_outer"], &[]));
    Ok(LogEvent::CmsSerialOld(CollectionData {
        common: f.common(f.timestamp("timestamp")?, f.millis("duration")?, trigger),
        young: old.map(|old| combined.saturating_sub(&old)),
        old,
        perm: f.opt_occupancy("perm")?,
        combined: Some(combined),
    }))
}

fn cms_remark_pattern() -> String {
    format!(
        concat!(
            r"^{timestamp}: \[GC ?(?:\(CMS Final Remark\) ?)?",
            r"\[YG occupancy: (?P<yg_used>\d{{1,12}}) ?K \((?P<yg_alloc>\d{{1,12}}) ?K\)\]",
            r"{TIMESTAMP}: \[Rescan \(parallel\) , {DURATION} secs\]",
            r"(?:{TIMESTAMP}: \[weak refs processing, {DURATION} secs\])?",
            r"(?:{TIMESTAMP}: \[class unloading, {DURATION} secs\])?",
            r"(?:{TIMESTAMP}: \[scrub symbol (?:& string )?tables?, {DURATION} secs\])?",
            r"(?:{TIMESTAMP}: \[scrub string table, {DURATION} secs\])?",
            r"\[1 CMS-remark: {old_used}\({old_alloc}\)\] {combined_used}\({combined_alloc}\), ",
            r"{duration}\]{end}"
        ),
        timestamp = ts("timestamp"),
        old_used = kb("old_used"),
        old_alloc = kb("old_alloc"),
        combined_used = kb("combined_used"),
        combined_alloc = kb("combined_alloc"),
        duration = secs("duration"),
        end = line_end(),
        TIMESTAMP = TIMESTAMP,
        DURATION = DURATION,
    )
}

fn extract_cms_remark(f: &Fields<'_, '_>) -> Result<LogEvent, GcLogError> {
    Ok(LogEvent::CmsRemark(CollectionData {
        common: f.common(f.timestamp("timestamp")?, f.millis("duration")?, None),
        young: Some(f.snapshot("yg_used", "yg_alloc")?),
        old: Some(f.snapshot("old_used", "old_alloc")?),
        perm: None,
        combined: Some(f.snapshot("combined_used", "combined_alloc")?),
    }))
}

fn cms_initial_mark_pattern() -> String {
    format!(
        concat!(
            r"^{timestamp}: \[GC ?(?:\(CMS Initial Mark\) ?)?",
            r"\[1 CMS-initial-mark: {old_used}\({old_alloc}\)\] {combined_used}\({combined_alloc}\), ",
            r"{duration}\]{end}"
        ),
        timestamp = ts("timestamp"),
        old_used = kb("old_used"),
        old_alloc = kb("old_alloc"),
        combined_used = kb("combined_used"),
        combined_alloc = kb("combined_alloc"),
        duration = secs("duration"),
        end = line_end(),
    )
}

fn extract_cms_initial_mark(f: &Fields<'_, '_>) -> Result<LogEvent, GcLogError> {
    let old = f.snapshot("old_used", "old_alloc")?;
    let combined = f.snapshot("combined_used", "combined_alloc")?;
    Ok(LogEvent::CmsInitialMark(CollectionData {
        common: f.common(f.timestamp("timestamp")?, f.millis("duration")?, None),
        young: Some(combined.saturating_sub(&old)),
        old: Some(old),
        perm: None,
        combined: Some(combined),
    }))
}

fn par_new_pattern() -> String {
    format!(
        concat!(
            r"^{timestamp}: \[GC ?(?:\({t_outer}\) ?)?{TIMESTAMP}: \[ParNew: {young}, {DURATION} secs\] ",
            r"{combined}{ICMS_DC_BLOCK}?, {duration}\]{end}"
        ),
        timestamp = ts("timestamp"),
        t_outer = trigger("t_outer"),
        young = transition("young"),
        combined = transition("combined"),
        duration = secs("duration"),
        end = line_end(),
        TIMESTAMP = TIMESTAMP,
        DURATION = DURATION,
        ICMS_DC_BLOCK = ICMS_DC_BLOCK,
    )
}

fn extract_par_new(f: &Fields<'_, '_>) -> Result<LogEvent, GcLogError> {
    let young = f.occupancy("young")?;
    let combined = f.occupancy("combined")?;
    Ok(LogEvent::ParNew(CollectionData {
        common: f.common(
            f.timestamp("timestamp")?,
            f.millis("duration")?,
            f.trigger(&["t_outer"], &[]),
        ),
        young: Some(young),
        old: Some(combined.saturating_sub(&young)),
        perm: None,
        combined: Some(combined),
    }))
}

fn cms_concurrent_pattern() -> String {
    format!(
        r"^{timestamp}: \[CMS-concurrent-(?P<phase>[a-z-]+)(?:: (?P<cpu>{CONCURRENT_TIME})/(?P<wall>{CONCURRENT_TIME}) secs)?\]{end}",
        timestamp = ts("timestamp"),
        end = line_end(),
    )
}

fn extract_cms_concurrent(f: &Fields<'_, '_>) -> Result<LogEvent, GcLogError> {
    Ok(LogEvent::CmsConcurrent(ConcurrentPhaseData {
        common: f.common(
            f.timestamp("timestamp")?,
            f.opt_millis("wall")?.unwrap_or(0),
            None,
        ),
        phase: f.required("phase")?.to_owned(),
        cpu_ms: f.opt_millis("cpu")?,
    }))
}
