/*!
 * Tests for the option driven executor
 */

use std::path::PathBuf;

use srtgears::formats::subrip::srt_to_string;
use srtgears::{ExecError, ExecOptions, Executor, Pos};
use crate::common;

fn options_with_out() -> ExecOptions {
    ExecOptions {
        out: Some(PathBuf::from("out.srt")),
        ..Default::default()
    }
}

/// Test that a missing primary input is rejected
#[test]
fn test_execute_withoutInput_shouldReturnMissingInput() {
    let executor = Executor::new(options_with_out());
    let result = executor.execute(None, None);

    assert_eq!(result.err(), Some(ExecError::MissingInput));
}

/// Test that merging without a second input is rejected
#[test]
fn test_execute_mergeWithoutSecondInput_shouldReturnMissingSecondInput() {
    let executor = Executor::new(ExecOptions {
        merge: true,
        ..options_with_out()
    });
    let result = executor.execute(Some(common::pack(&[(0, 1000, "a")])), None);

    assert_eq!(result.err(), Some(ExecError::MissingSecondInput));
}

/// Test that a transformation without an output is rejected
#[test]
fn test_execute_shiftWithoutOutput_shouldReturnMissingOutput() {
    let executor = Executor::new(ExecOptions {
        shift_by_ms: Some(500),
        ..Default::default()
    });
    let result = executor.execute(Some(common::pack(&[(0, 1000, "a")])), None);

    assert_eq!(result.err(), Some(ExecError::MissingOutput));
}

/// Test that splitting without a second output is rejected
#[test]
fn test_execute_splitWithoutSecondOutput_shouldReturnMissingSecondOutput() {
    let executor = Executor::new(ExecOptions {
        split_at: Some("00:00:01,000".to_string()),
        ..options_with_out()
    });
    let result = executor.execute(Some(common::pack(&[(0, 1000, "a")])), None);

    assert_eq!(result.err(), Some(ExecError::MissingSecondOutput));
}

/// Test that malformed time options are rejected
#[test]
fn test_execute_withInvalidTimes_shouldReturnInvalidTime() {
    let executor = Executor::new(ExecOptions {
        split_at: Some("soon".to_string()),
        out2: Some(PathBuf::from("out2.srt")),
        ..options_with_out()
    });
    let result = executor.execute(Some(common::pack(&[(0, 1000, "a")])), None);

    assert_eq!(
        result.err(),
        Some(ExecError::InvalidTime { option: "splitAt", value: "soon".to_string() })
    );
}

/// Test that unknown position tokens are rejected before anything runs
#[test]
fn test_execute_withInvalidPos_shouldReturnInvalidPos() {
    let executor = Executor::new(ExecOptions {
        pos: Some("middle".to_string()),
        ..options_with_out()
    });
    let result = executor.execute(Some(common::pack(&[(0, 1000, "a")])), None);

    assert_eq!(result.err(), Some(ExecError::InvalidPos("middle".to_string())));
}

/// Test that concat and merge cannot be combined
#[test]
fn test_execute_concatAndMerge_shouldReturnConflictingOptions() {
    let executor = Executor::new(ExecOptions {
        concat: Some("00:01:00,000".to_string()),
        merge: true,
        ..options_with_out()
    });
    let result = executor.execute(
        Some(common::pack(&[(0, 1000, "a")])),
        Some(common::pack(&[(0, 1000, "b")])),
    );

    assert!(matches!(result, Err(ExecError::ConflictingOptions(_))));
}

/// Test that shifting through the executor moves the timestamps
#[test]
fn test_execute_withShift_shouldShiftPrimary() {
    let executor = Executor::new(ExecOptions {
        shift_by_ms: Some(500),
        ..options_with_out()
    });
    let outcome = executor
        .execute(Some(common::pack(&[(1000, 2000, "a")])), None)
        .expect("execution should succeed");

    assert!(outcome.modified);
    assert_eq!(outcome.primary.subs[0].time_in_ms, 1500);
    assert_eq!(outcome.primary.subs[0].time_out_ms, 2500);
    assert!(outcome.secondary.is_none());
    assert!(outcome.stats.is_none());
}

/// Test that the operations run in the fixed order
#[test]
fn test_execute_withManyOptions_shouldApplyInOrder() {
    // Scale runs before shift: (1000 * 2) + 500
    let executor = Executor::new(ExecOptions {
        remove_hi: true,
        remove_html: true,
        pos: Some("T".to_string()),
        color: Some("yellow".to_string()),
        scale: Some(2.0),
        shift_by_ms: Some(500),
        ..options_with_out()
    });
    let outcome = executor
        .execute(
            Some(common::pack(&[(1000, 2000, "<i>Hello</i>"), (3000, 4000, "[MUSIC]")])),
            None,
        )
        .expect("execution should succeed");

    let primary = outcome.primary;
    assert_eq!(primary.len(), 1);
    assert_eq!(primary.subs[0].time_in_ms, 2500);
    assert_eq!(primary.subs[0].time_out_ms, 3500);
    assert_eq!(primary.subs[0].lines, vec!["Hello"]);
    assert_eq!(primary.subs[0].pos, Pos::Top);
    // Color is set after HTML removal, so it survives
    assert_eq!(primary.subs[0].color, "yellow");
}

/// Test that merging consumes the second input and positions the entries
#[test]
fn test_execute_withMerge_shouldCreateDualSubtitle() {
    let executor = Executor::new(ExecOptions {
        merge: true,
        ..options_with_out()
    });
    let outcome = executor
        .execute(
            Some(common::pack(&[(1000, 2000, "eng")])),
            Some(common::pack(&[(1000, 2000, "hun")])),
        )
        .expect("execution should succeed");

    assert_eq!(outcome.primary.len(), 2);
    let top: Vec<&str> = outcome
        .primary
        .subs
        .iter()
        .filter(|s| s.pos == Pos::Top)
        .map(|s| s.lines[0].as_str())
        .collect();
    assert_eq!(top, vec!["hun"]);
}

/// Test that concatenation shifts the second part by the given time
#[test]
fn test_execute_withConcat_shouldAppendSecondPart() {
    let executor = Executor::new(ExecOptions {
        concat: Some("00:59:00,123".to_string()),
        ..options_with_out()
    });
    let outcome = executor
        .execute(
            Some(common::pack(&[(1000, 2000, "part1")])),
            Some(common::pack(&[(1000, 2000, "part2")])),
        )
        .expect("execution should succeed");

    assert_eq!(outcome.primary.len(), 2);
    assert_eq!(outcome.primary.subs[1].time_in_ms, 3_541_123);
}

/// Test that splitting returns the second part
#[test]
fn test_execute_withSplit_shouldReturnSecondary() {
    let executor = Executor::new(ExecOptions {
        split_at: Some("00:00:10,000".to_string()),
        out2: Some(PathBuf::from("out2.srt")),
        ..options_with_out()
    });
    let outcome = executor
        .execute(Some(common::pack(&[(1000, 2000, "a"), (12_000, 13_000, "b")])), None)
        .expect("execution should succeed");

    assert_eq!(outcome.primary.len(), 1);
    let secondary = outcome.secondary.expect("second part");
    assert_eq!(secondary.subs[0].time_in_ms, 2000);
}

/// Test that statistics alone do not need an output
#[test]
fn test_execute_statsOnly_shouldNotRequireOutput() {
    let executor = Executor::new(ExecOptions {
        stats: true,
        ..Default::default()
    });
    let outcome = executor
        .execute(Some(common::pack(&[(0, 1000, "one two")])), None)
        .expect("execution should succeed");

    assert!(!outcome.modified);
    assert_eq!(outcome.stats.map(|s| s.words), Some(2));
}

/// Test that nothing requested leaves the pack untouched
#[test]
fn test_execute_withNoOptions_shouldReturnUnmodified() {
    let pack = common::pack(&[(0, 1000, "a")]);
    let outcome = Executor::default()
        .execute(Some(pack.clone()), None)
        .expect("execution should succeed");

    assert!(!outcome.modified);
    assert_eq!(outcome.primary, pack);
}

/// Test that extreme shift and scale values are applied without overflow
#[test]
fn test_execute_withExtremeShiftAndScale_shouldSaturate() {
    let executor = Executor::new(ExecOptions {
        scale: Some(1e300),
        shift_by_ms: Some(i64::MAX),
        lengthen: Some(1e300),
        stats: true,
        ..options_with_out()
    });
    let outcome = executor
        .execute(Some(common::pack(&[(1000, 2000, "a"), (3000, 4000, "b")])), None)
        .expect("execution should succeed");

    assert!(outcome.primary.subs.iter().all(|s| s.time_in_ms == i64::MAX));
    assert!(outcome.primary.subs.iter().all(|s| s.time_out_ms == i64::MAX));
    assert_eq!(outcome.stats.map(|s| s.total_disp_dur_ms), Some(0));

    let written = srt_to_string(&outcome.primary);
    assert!(written.contains("2562047788015:12:55,807 --> 2562047788015:12:55,807"));
}
