//! 통합 테스트 -- 전처리부터 이벤트 생성까지의 전체 흐름 검증
//!
//! 실제 JVM 버전별 로그 조각을 입력으로 사용합니다.

use proptest::prelude::*;

use gclens_core::types::{EventKind, LogEvent, Occupancy, TriggerCause};
use gclens_gc_parser::{
    CanonicalLine, Dispatched, Dispatcher, GcLogParser, ParserConfig, preprocess,
};

fn parse(lines: &[&str]) -> gclens_gc_parser::ParsedRun {
    GcLogParser::new(ParserConfig::default())
        .expect("parser")
        .parse_lines(lines.iter().copied())
        .expect("run")
}

/// CMS serial old 단일 라인 시나리오
#[test]
fn test_cms_serial_old_scenario() {
    let run = parse(&[
        "5.980: [Full GC 5.980: [CMS: 5589K->5796K(122880K), 0.0889610 secs] 11695K->5796K(131072K), [CMS Perm : 13140K->13124K(131072K)], 0.0891270 secs]",
    ]);

    assert_eq!(run.events.len(), 1);
    assert!(run.unidentified.is_empty());

    let event = &run.events[0];
    assert_eq!(event.kind(), EventKind::CmsSerialOld);
    assert_eq!(event.timestamp_ms(), 5980);
    assert_eq!(event.duration_ms(), 89);
    assert_eq!(event.old(), Some(Occupancy::new(5589, 5796, 122880)));
    assert_eq!(event.young().map(|y| y.init), Some(6106));
    let perm = event.perm().expect("perm");
    assert_eq!(perm.init, 13140);
    assert_eq!(perm.allocated, 131072);
}

/// 끼어든 동시 단계가 분리되고 ParNew 조각이 합쳐지는 시나리오
#[test]
fn test_merge_scenario() {
    let line1 = "2210.281: [GC 2210.282: [ParNew2210.314: [CMS-concurrent-abortable-preclean: 0.043/0.144 secs] [Times: user=0.58 sys=0.03, real=0.14 secs]";
    let line2 = ": 212981K->3156K(242304K), 0.0364435 secs] 4712182K->4502357K(4971420K), 0.0368807 secs] [Times: user=0.18 sys=0.02, real=0.04 secs]";
    let run = parse(&[line1, line2]);

    assert_eq!(run.canonical_lines, 2);
    assert!(run.unidentified.is_empty());
    let kinds: Vec<_> = run.events.iter().map(LogEvent::kind).collect();
    assert_eq!(kinds, vec![EventKind::CmsConcurrent, EventKind::ParNew]);

    // 끌어올린 단계의 시작 시각은 호스트 이벤트보다 늦을 수 없다
    let hoisted = &run.events[0];
    let host = &run.events[1];
    assert!(hoisted.timestamp_ms() - hoisted.duration_ms() <= host.timestamp_ms());
    assert_eq!(host.raw_text(), format!("2210.281: [GC 2210.282: [ParNew{line2}"));
    assert_eq!(host.duration_ms(), 37);
}

/// 미식별 라인은 이후 처리를 막지 않는다
#[test]
fn test_unidentified_line_does_not_abort() {
    let run = parse(&[
        "Lorem ipsum dolor sit amet",
        "4.220: Application time: 0.6547360 seconds",
    ]);
    assert_eq!(run.unidentified.len(), 1);
    assert_eq!(run.unidentified[0].line_number, 1);
    assert_eq!(run.unidentified[0].reason, None);
    assert_eq!(run.events.len(), 1);
    assert_eq!(run.events[0].kind(), EventKind::ApplicationConcurrentTime);
}

/// 중첩된 트리거 중 안쪽 문구가 우선
#[test]
fn test_trigger_precedence() {
    let run = parse(&[
        "2.928: [Full GC (System) 2.929: [CMS (concurrent mode failure): 0K->6501K(8218240K), 0.2525532 secs] 66502K->6501K(8367360K), [CMS Perm : 16640K->16623K(524288K)], 0.2527331 secs]",
    ]);
    assert_eq!(
        run.events[0].trigger(),
        Some(TriggerCause::ConcurrentModeFailure)
    );
}

/// 쉼표 소수 구분자는 점 구분자와 같은 값
#[test]
fn test_comma_decimal_separator() {
    let run = parse(&[
        "32552,602: Application time: 0,6547360 seconds",
        "32552.602: Application time: 0.6547360 seconds",
    ]);
    assert_eq!(run.events.len(), 2);
    assert_eq!(run.events[0].timestamp_ms(), 32_552_602);
    assert_eq!(run.events[0], {
        let mut dotted = run.events[1].clone();
        if let LogEvent::ApplicationConcurrentTime(common) = &mut dotted {
            common.raw_text = "32552,602: Application time: 0,6547360 seconds".to_owned();
        }
        dotted
    });
}

/// 여러 수집기 방언이 섞인 로그 전체 실행
#[test]
fn test_multi_dialect_run() {
    let run = parse(&[
        "OpenJDK 64-Bit Server VM (25.131-b11) for linux-amd64 JRE (1.8.0_131-b11), built on Apr 13 2017 14:08:02 by \"mockbuild\" with gcc 4.8.5",
        "Memory: 4k page, physical 65806300k(58281908k free), swap 16777212k(16777212k free)",
        "CommandLine flags: -XX:+PrintGCDetails -XX:+UseParallelGC ",
        "19810.091: [GC [PSYoungGen: 27808K->632K(28032K)] 160183K->133159K(585088K), 0.0225213 secs]",
        "1.234: [Full GC (Ergonomics) [PSYoungGen: 11528K->0K(76288K)] [ParOldGen: 121386K->111893K(175104K)] 132914K->111893K(251392K), [Metaspace: 27007K->27007K(1073152K)], 0.5106350 secs] [Times: user=1.82 sys=0.01, real=0.51 secs]",
        "7.798: [GC 7.798: [DefNew: 37172K->3631K(39296K), 0.0209300 secs] 41677K->10314K(126720K), 0.0210210 secs]",
        "0.304: [GC pause (young) 849M->583M(968M), 0.0392710 secs]",
        "106.180: [GC cleanup 1008M->1008M(1024M), 0.0024130 secs]",
        "2.853: [GC concurrent-mark-end, 0.0059080 secs]",
        "8.722: [GC (CMS Initial Mark) [1 CMS-initial-mark: 2131450K(3145728K)] 2147834K(3299328K), 0.0123810 secs] [Times: user=0.01 sys=0.00, real=0.01 secs]",
        "1.512: Total time for which application threads were stopped: 0.0004502 seconds, Stopping threads took: 0.0000320 seconds",
    ]);

    assert!(run.unidentified.is_empty(), "{:?}", run.unidentified);
    let kinds = run.event_kinds();
    for kind in [
        EventKind::HeaderVersion,
        EventKind::HeaderMemory,
        EventKind::HeaderCommandLineFlags,
        EventKind::ParallelScavenge,
        EventKind::ParallelOldCompacting,
        EventKind::SerialNew,
        EventKind::G1YoungPause,
        EventKind::G1Cleanup,
        EventKind::G1Concurrent,
        EventKind::CmsInitialMark,
        EventKind::ApplicationStoppedTime,
    ] {
        assert!(kinds.contains(&kind), "missing {kind}");
    }
    assert_eq!(
        run.vm_options(),
        Some("-XX:+PrintGCDetails -XX:+UseParallelGC")
    );

    let g1 = run
        .events
        .iter()
        .find(|e| e.kind() == EventKind::G1YoungPause)
        .expect("g1 young pause");
    assert_eq!(g1.combined(), Some(Occupancy::new(849 * 1024, 583 * 1024, 968 * 1024)));

    let summary = run.summary();
    assert_eq!(summary.events, 11);
    assert_eq!(summary.kinds.values().sum::<usize>(), 11);
}

/// 날짜 스탬프만 있는 로그는 첫 스탬프 기준의 상대 시각이 된다
#[test]
fn test_datestamp_only_log() {
    let run = parse(&[
        "2016-10-18T08:20:54.102+0200: [GC concurrent-mark-start]",
        "2016-10-18T08:21:01.617+0200: [GC concurrent-mark-end, 0.0059080 secs]",
    ]);
    let timestamps: Vec<_> = run.events.iter().map(LogEvent::timestamp_ms).collect();
    assert_eq!(timestamps, vec![0, 7515]);
}

/// 기준 날짜를 지정하면 그 시각이 0이 된다
#[test]
fn test_supplied_reference_date() {
    let config = ParserConfig::builder()
        .reference_date("2016-10-18T08:20:00")
        .build()
        .expect("config");
    let run = GcLogParser::new(config)
        .expect("parser")
        .parse_lines(["2016-10-18T08:20:54.102+0200: [GC concurrent-mark-start]"])
        .expect("run");
    assert_eq!(run.events[0].timestamp_ms(), 54_102);
}

/// 장식 블록은 이벤트도 미식별 라인도 만들지 않는다
#[test]
fn test_decorations_are_dropped() {
    let run = parse(&[
        "{Heap before GC invocations=1 (full 0):",
        " par new generation   total 39296K, used 34944K [0x00000000e0000000, 0x00000000e2aa0000, 0x00000000e2aa0000)",
        "  eden space 34944K, 100% used [0x00000000e0000000, 0x00000000e2220000, 0x00000000e2220000)",
        "2.523: [GC (Allocation Failure) 2.523: [ParNew: 34944K->4352K(39296K), 0.0225213 secs] 34944K->6041K(126720K), 0.0226290 secs]",
        "Heap after GC invocations=2 (full 0):",
        " par new generation   total 39296K, used 4352K [0x00000000e0000000, 0x00000000e2aa0000, 0x00000000e2aa0000)",
        "}",
    ]);
    assert_eq!(run.events.len(), 1);
    assert!(run.unidentified.is_empty(), "{:?}", run.unidentified);
    assert_eq!(run.events[0].kind(), EventKind::ParNew);
}

/// 힙 배너로 나뉜 ParNew concurrent mode failure가 한 줄로 합쳐진다
#[test]
fn test_par_new_concurrent_mode_failure_split_by_heap_banners() {
    let input = [
        "27067.966: [GC {Heap before gc invocations=498:",
        " par new generation   total 261952K, used 261760K [0x00000006b0000000, 0x00000006c0000000, 0x00000006c0000000)",
        "  eden space 209600K, 100% used [0x00000006b0000000, 0x00000006bccb0000, 0x00000006bccb0000)",
        "  from space 52352K,  99% used [0x00000006bccb0000, 0x00000006bffe0000, 0x00000006c0000000)",
        "  to   space 52352K,   0% used [0x00000006bffe0000, 0x00000006bffe0000, 0x00000006c0000000)",
        " concurrent mark-sweep generation total 1179648K, used 1147900K [0x00000006c0000000, 0x0000000708000000, 0x0000000708000000)",
        " concurrent-mark-sweep perm gen total 262144K, used 71172K [0x0000000708000000, 0x0000000718000000, 0x0000000800000000)",
        "27067.966: [ParNew: 261760K->261760K(261952K), 0.0000160 secs]27067.966: [CMS27067.966: [CMS-concurrent-abortable-preclean: 2.272/29.793 secs]",
        " (concurrent mode failure): 1147900K->1155037K(1179648K), 7.3953900 secs] 1409660K->1155037K(1441600K)Heap after gc invocations=499:",
        " par new generation   total 261952K, used 0K [0x00000006b0000000, 0x00000006c0000000, 0x00000006c0000000)",
        "  eden space 209600K,   0% used [0x00000006b0000000, 0x00000006b0000000, 0x00000006bccb0000)",
        "  from space 52352K,   0% used [0x00000006bccb0000, 0x00000006bccb0000, 0x00000006bffe0000)",
        "  to   space 52352K,   0% used [0x00000006bffe0000, 0x00000006bffe0000, 0x00000006c0000000)",
        " concurrent mark-sweep generation total 1179648K, used 1155037K [0x00000006c0000000, 0x0000000708000000, 0x0000000708000000)",
        " concurrent-mark-sweep perm gen total 262144K, used 71171K [0x0000000708000000, 0x0000000718000000, 0x0000000800000000)",
        "}",
        ", 7.3957430 secs] [Times: user=7.26 sys=0.13, real=7.40 secs]",
    ];

    let canonical = preprocess(&ParserConfig::default(), input).expect("preprocess");
    assert_eq!(
        texts(&canonical),
        vec![
            "27067.966: [CMS-concurrent-abortable-preclean: 2.272/29.793 secs]",
            "27067.966: [GC27067.966: [ParNew: 261760K->261760K(261952K), 0.0000160 secs]27067.966: [CMS (concurrent mode failure): 1147900K->1155037K(1179648K), 7.3953900 secs] 1409660K->1155037K(1441600K), 7.3957430 secs] [Times: user=7.26 sys=0.13, real=7.40 secs]",
        ]
    );
    assert_eq!(canonical[0].line_number, 8);
    assert_eq!(canonical[1].line_number, 1);

    let run = parse(&input);
    assert!(run.unidentified.is_empty(), "{:?}", run.unidentified);
    let kinds: Vec<_> = run.events.iter().map(LogEvent::kind).collect();
    assert_eq!(
        kinds,
        vec![EventKind::CmsConcurrent, EventKind::ParNewConcurrentModeFailure]
    );
    let event = &run.events[1];
    assert_eq!(event.trigger(), Some(TriggerCause::ConcurrentModeFailure));
    assert_eq!(event.timestamp_ms(), 27067966);
    assert_eq!(event.duration_ms(), 7396);
    assert_eq!(event.old(), Some(Occupancy::new(1147900, 1155037, 1179648)));
    assert_eq!(event.young(), Some(Occupancy::new(261760, 0, 261952)));
}

/// VM 경고로 끊긴 CMS 블록은 경고를 지우고 이어 붙인다
#[test]
fn test_hotspot_bailing_warning_inside_fragment() {
    let input = [
        "1901.217: [GC 1901.217: [ParNew: 261760K->261760K(261952K), 0.0000570 secs]1901.217: [CMSJava HotSpot(TM) Server VM warning: bailing out to foreground collection",
        "1907.974: [CMS-concurrent-mark: 23.751/40.476 secs]",
        " (concurrent mode failure): 1266652K->1279396K(1392640K), 11.7616911 secs] 1528412K->1279396K(1654400K), [CMS Perm : 31857K->31857K(131072K)], 11.7621102 secs]",
    ];

    let canonical = preprocess(&ParserConfig::default(), input).expect("preprocess");
    assert_eq!(
        texts(&canonical),
        vec![
            "1907.974: [CMS-concurrent-mark: 23.751/40.476 secs]",
            "1901.217: [GC 1901.217: [ParNew: 261760K->261760K(261952K), 0.0000570 secs]1901.217: [CMSbailing out to foreground collection (concurrent mode failure): 1266652K->1279396K(1392640K), 11.7616911 secs] 1528412K->1279396K(1654400K), [CMS Perm : 31857K->31857K(131072K)], 11.7621102 secs]",
        ]
    );

    let run = parse(&input);
    assert!(run.unidentified.is_empty(), "{:?}", run.unidentified);
    assert_eq!(run.events[0].kind(), EventKind::CmsConcurrent);
    let event = &run.events[1];
    assert_eq!(event.kind(), EventKind::ParNewConcurrentModeFailure);
    assert_eq!(event.trigger(), Some(TriggerCause::ConcurrentModeFailure));
    assert_eq!(event.young(), Some(Occupancy::new(261760, 0, 261952)));
    assert_eq!(event.perm(), Some(Occupancy::new(31857, 31857, 131072)));
    assert_eq!(event.duration_ms(), 11762);
}

/// 여러 줄에 걸친 클래스 히스토그램 표는 지워지고 닫는 토큰이 조각을 완성한다
#[test]
fn test_multi_line_class_histogram_inside_cms_serial_old() {
    let input = [
        "11662.232: [Full GC 11662.233: [Class Histogram:",
        " num     #instances         #bytes  class name",
        "----------------------------------------------",
        "   1:       1234567      98765432  [B",
        "   2:         42424       1234567  java.lang.String",
        "Total       1276991      99999999",
        ", 2.5617940 secs]11664.795: [CMS: 1887153K->1887153K(2097152K), 4.6280560 secs]11669.423: [Class Histogram:",
        " num     #instances         #bytes  class name",
        "----------------------------------------------",
        "   1:        987654      87654321  [C",
        "Total        987654      87654321",
        ", 2.4880990 secs] 1908413K->1887153K(3105280K), [CMS Perm : 126012K->126012K(262144K)], 11.6780200 secs]",
    ];

    let canonical = preprocess(&ParserConfig::default(), input).expect("preprocess");
    assert_eq!(
        texts(&canonical),
        vec![
            "11662.232: [Full GC 11662.233: [Class Histogram:, 2.5617940 secs]11664.795: [CMS: 1887153K->1887153K(2097152K), 4.6280560 secs]11669.423: [Class Histogram:, 2.4880990 secs] 1908413K->1887153K(3105280K), [CMS Perm : 126012K->126012K(262144K)], 11.6780200 secs]",
        ]
    );

    let run = parse(&input);
    assert!(run.unidentified.is_empty(), "{:?}", run.unidentified);
    assert_eq!(run.events.len(), 1);
    let event = &run.events[0];
    assert_eq!(event.kind(), EventKind::CmsSerialOld);
    assert_eq!(event.trigger(), Some(TriggerCause::ClassHistogram));
    assert_eq!(event.old(), Some(Occupancy::new(1887153, 1887153, 2097152)));
    assert_eq!(event.duration_ms(), 11678);
}

/// young + old = combined (스냅샷 반올림 1KB 허용)
#[test]
fn test_young_plus_old_equals_combined() {
    let run = parse(&[
        "5.980: [Full GC 5.980: [CMS: 5589K->5796K(122880K), 0.0889610 secs] 11695K->5796K(131072K), [CMS Perm : 13140K->13124K(131072K)], 0.0891270 secs]",
        "2210.281: [GC 2210.282: [ParNew: 212981K->3156K(242304K), 0.0364435 secs] 4712182K->4502357K(4971420K), 0.0368807 secs]",
        "1202.526: [GC 1202.526: [ParNew: 261760K->261760K(261952K), 0.0000160 secs]1202.526: [CMS (concurrent mode failure): 1794415K->909664K(1835008K), 4.4628626 secs] 2056175K->909664K(2096960K), [CMS Perm : 127009K->127009K(262144K)], 4.4630556 secs]",
        "13.749: [GC (CMS Final Remark) [YG occupancy: 149636 K (153600 K)]13.749: [Rescan (parallel) , 0.0216980 secs]13.771: [weak refs processing, 0.0005180 secs]13.772: [class unloading, 0.0068830 secs]13.779: [scrub symbol table, 0.0047640 secs]13.783: [scrub string table, 0.0006270 secs][1 CMS-remark: 2125548K(3145728K)] 2275184K(3299328K), 0.0380190 secs] [Times: user=0.08 sys=0.00, real=0.04 secs]",
        "253.102: [GC[YG occupancy: 16172 K (149120 K)]253.102: [Rescan (parallel) , 0.0226730 secs]253.125: [weak refs processing, 0.0000060 secs][1 CMS-remark: 62686K(2233472K)] 78859K(2382592K), 0.0227750 secs]",
        "8.722: [GC (CMS Initial Mark) [1 CMS-initial-mark: 2131450K(3145728K)] 2147834K(3299328K), 0.0123810 secs]",
        "19810.091: [GC [PSYoungGen: 27808K->632K(28032K)] 160183K->133159K(585088K), 0.0225213 secs]",
        "1.234: [Full GC [PSYoungGen: 480K->0K(15616K)] [PSOldGen: 5432K->5786K(110016K)] 5912K->5786K(125632K) [PSPermGen: 13092K->13094K(131072K)], 0.0699360 secs]",
        "7.798: [GC 7.798: [DefNew: 37172K->3631K(39296K), 0.0209300 secs] 41677K->10314K(126720K), 0.0210210 secs]",
        "116.957: [Full GC 116.957: [Tenured: 3453K->4290K(30336K), 0.0630136 secs] 4025K->4290K(44032K), [Perm : 12062K->12062K(24576K)], 0.0631094 secs]",
    ]);
    assert!(run.unidentified.is_empty(), "{:?}", run.unidentified);

    let mut checked = 0;
    for event in &run.events {
        let (Some(young), Some(old), Some(combined)) = (event.young(), event.old(), event.combined())
        else {
            continue;
        };
        for (y, o, c) in [
            (young.init, old.init, combined.init),
            (young.end, old.end, combined.end),
        ] {
            assert!((y + o).abs_diff(c) <= 1, "{}: {y} + {o} != {c}", event.kind());
        }
        checked += 1;
    }
    assert!(checked >= 8, "only {checked} events carried all three regions");
}

/// 타임스탬프는 끌어올린 단계 외에는 입력 순서대로 유지
#[test]
fn test_order_preservation() {
    let run = parse(&[
        "2.523: [GC (Allocation Failure) 2.523: [ParNew: 34944K->4352K(39296K), 0.0225213 secs] 34944K->6041K(126720K), 0.0226290 secs]",
        "2210.281: [GC 2210.282: [ParNew2210.314: [CMS-concurrent-abortable-preclean: 0.043/0.144 secs] [Times: user=0.58 sys=0.03, real=0.14 secs]",
        ": 212981K->3156K(242304K), 0.0364435 secs] 4712182K->4502357K(4971420K), 0.0368807 secs]",
        "2211.000: [CMS-concurrent-sweep-start]",
    ]);
    let kinds: Vec<_> = run.events.iter().map(LogEvent::kind).collect();
    assert_eq!(
        kinds,
        vec![
            EventKind::ParNew,
            EventKind::CmsConcurrent,
            EventKind::ParNew,
            EventKind::CmsConcurrent,
        ]
    );
    let hoisted = &run.events[1];
    assert!(hoisted.timestamp_ms() - hoisted.duration_ms() <= run.events[2].timestamp_ms());
    assert!(run.events[2].timestamp_ms() <= run.events[3].timestamp_ms());
}

/// 열린 조각이 입력 끝까지 닫히지 않으면 그대로 내보내고 미식별 처리
#[test]
fn test_unterminated_fragment_at_eof() {
    let run = parse(&["5.000: [GC 5.000: [ParNew"]);
    assert!(run.events.is_empty());
    assert_eq!(run.unidentified.len(), 1);
    assert_eq!(run.unidentified[0].raw_text, "5.000: [GC 5.000: [ParNew");
}

/// 이벤트는 JSON으로 직렬화되고 안정적인 종류 태그를 가진다
#[test]
fn test_events_serialize_with_kind_tag() {
    let run = parse(&["106.180: [GC cleanup 1008M->1008M(1024M), 0.0024130 secs]"]);
    let json = serde_json::to_value(&run.events[0]).expect("serialize");
    assert_eq!(json["kind"], EventKind::G1Cleanup.as_str());

    let back: LogEvent = serde_json::from_value(json).expect("deserialize");
    assert_eq!(back, run.events[0]);
}

// --- 속성 기반 테스트 ---

const LINE_GROUPS: &[&[&str]] = &[
    &["2.523: [GC (Allocation Failure) 2.523: [ParNew: 34944K->4352K(39296K), 0.0225213 secs] 34944K->6041K(126720K), 0.0226290 secs]"],
    &["4.220: Application time: 0.6547360 seconds"],
    &["Lorem ipsum dolor sit amet"],
    &[""],
    &["251.781: [CMS-concurrent-mark-start]"],
    &["2016-10-18T08:20:54.102+0200: [GC concurrent-mark-start]"],
    &[
        "0.219: [GC 0.219: [ParNew",
        "Desired survivor size 2228224 bytes, new threshold 1 (max 4)",
        "- age   1:    2119992 bytes,    2119992 total",
        ": 34944K->4352K(39296K), 0.0225213 secs] 34944K->6041K(126720K), 0.0226290 secs]",
    ],
    &[
        "2210.281: [GC 2210.282: [ParNew2210.314: [CMS-concurrent-abortable-preclean: 0.043/0.144 secs] [Times: user=0.58 sys=0.03, real=0.14 secs]",
        ": 212981K->3156K(242304K), 0.0364435 secs] 4712182K->4502357K(4971420K), 0.0368807 secs]",
    ],
];

/// 크기 제한(256바이트)을 넘는 조각과 그 나머지 라인
const OVERSIZED_GROUP: &[&str] = &[
    "1.000: [GC 1.000: [ParNew",
    ": 1K->1K(2K) 1K->1K(2K) 1K->1K(2K) 1K->1K(2K) 1K->1K(2K) 1K->1K(2K) 1K->1K(2K) 1K->1K(2K) 1K->1K(2K) 1K->1K(2K) 1K->1K(2K) 1K->1K(2K) 1K->1K(2K) 1K->1K(2K) 1K->1K(2K) 1K->1K(2K) 1K->1K(2K) 1K->1K(2K) 1K->1K(2K) 1K->1K(2K) 1K->1K(2K) 1K->1K(2K) 1K->1K(2K) 1K->1K(2K)",
    "1.000: [CMS",
    ": 1K->1K(2K), 0.0100000 secs] 3K->3K(4K), 0.0100000 secs]",
];

fn group(index: usize) -> &'static [&'static str] {
    LINE_GROUPS.get(index).copied().unwrap_or(OVERSIZED_GROUP)
}

fn texts(lines: &[CanonicalLine]) -> Vec<String> {
    lines.iter().map(|l| l.text.clone()).collect()
}

proptest! {
    /// 전처리 결과를 다시 전처리해도 변하지 않는다
    #[test]
    fn preprocessing_is_idempotent(picks in prop::collection::vec(0..LINE_GROUPS.len(), 0..24)) {
        let config = ParserConfig::default();
        let input: Vec<&str> = picks.iter().flat_map(|&i| LINE_GROUPS[i].iter().copied()).collect();

        let once = preprocess(&config, input).expect("first pass");
        let twice = preprocess(&config, texts(&once)).expect("second pass");
        prop_assert_eq!(texts(&once), texts(&twice));
    }

    /// 크기 제한으로 잘린 조각이 섞여도 재전처리 결과가 같다
    #[test]
    fn preprocessing_is_idempotent_past_fragment_limit(
        picks in prop::collection::vec(0..=LINE_GROUPS.len(), 0..24)
    ) {
        let config = ParserConfig::builder()
            .max_fragment_bytes(256)
            .build()
            .expect("config");
        let input: Vec<&str> = picks.iter().flat_map(|&i| group(i).iter().copied()).collect();

        let once = preprocess(&config, input).expect("first pass");
        let twice = preprocess(&config, texts(&once)).expect("second pass");
        prop_assert_eq!(texts(&once), texts(&twice));
    }

    /// 어떤 라인이든 디스패처는 패닉 없이 분류한다
    #[test]
    fn dispatcher_is_total(text in "\\PC{0,200}") {
        let dispatcher = Dispatcher::new().expect("dispatcher");
        match dispatcher.dispatch(&CanonicalLine::new(1, text.clone())) {
            Dispatched::Event(event) => prop_assert_eq!(event.raw_text(), text.as_str()),
            Dispatched::Unidentified(line) => prop_assert_eq!(line.raw_text, text),
        }
    }

    /// 임의 입력에도 전처리와 실행이 패닉 없이 끝나고 모든 라인이 설명된다
    #[test]
    fn run_never_panics(lines in prop::collection::vec("[ -~]{0,80}", 0..20)) {
        let parser = GcLogParser::new(ParserConfig::default()).expect("parser");
        let run = parser.parse_lines(&lines).expect("run");
        prop_assert_eq!(run.lines_read, lines.len());
        prop_assert_eq!(run.canonical_lines, run.events.len() + run.unidentified.len());
    }

    /// 타임스탬프 쉼표/점 구분자 동등성
    #[test]
    fn separator_equivalence(secs in 0u64..1_000_000, millis in 0u64..1000) {
        let parser = GcLogParser::new(ParserConfig::default()).expect("parser");
        let dotted = format!("{secs}.{millis:03}: Application time: 0.0010000 seconds");
        let comma = format!("{secs},{millis:03}: Application time: 0,0010000 seconds");
        let run = parser.parse_lines([dotted, comma]).expect("run");
        prop_assert_eq!(run.events.len(), 2);
        prop_assert_eq!(run.events[0].timestamp_ms(), secs * 1000 + millis);
        prop_assert_eq!(run.events[0].timestamp_ms(), run.events[1].timestamp_ms());
    }
}
