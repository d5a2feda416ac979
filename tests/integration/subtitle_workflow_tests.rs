/*!
 * Integration tests for subtitle processing workflow
 */

use std::fs;
use std::path::PathBuf;

use anyhow::Result;
use srtgears::file_utils::FileManager;
use srtgears::{Config, ExecOptions, Executor, Pos};
use crate::common;

/// Test a full read, transform and write cycle through the executor
#[test]
fn test_subtitle_workflow_withCleanupOptions_shouldWriteCleanSubtitle() -> Result<()> {
    common::init_logger();
    let temp_dir = common::create_temp_dir()?;
    let input = common::create_test_subtitle(temp_dir.path(), "movie.srt")?;
    let output = temp_dir.path().join("movie.clean.srt");

    let config = Config::default();
    let primary = FileManager::read_srt_file(&input, &config.read_options())?.pack;

    let executor = Executor::new(ExecOptions {
        out: Some(output.clone()),
        remove_hi: true,
        remove_html: true,
        remove_ctrl: true,
        shift_by_ms: Some(500),
        ..Default::default()
    });
    let outcome = executor.execute(Some(primary), None)?;
    FileManager::write_pack_file(&output, &outcome.primary, config.force_overwrite)?;

    let written = fs::read_to_string(&output)?;
    assert!(!written.contains("PHONE RINGING"));
    assert!(!written.contains("<i>"));
    assert!(!written.contains("{\\an8}"));
    assert!(!written.contains("<font"));
    assert!(written.starts_with("1\r\n00:00:01,500 --> 00:00:04,500\r\n"));
    assert!(written.contains("3\r\n00:00:15,500 --> 00:00:20,000\r\nFor testing\r\npurposes.\r\n"));

    let reread = FileManager::read_srt_file(&output, &config.read_options())?.pack;
    assert_eq!(reread, outcome.primary);
    Ok(())
}

/// Test that a dual subtitle can be created and converted to Sub Station Alpha
#[test]
fn test_subtitle_workflow_withMergeToSsa_shouldWriteTwoStyles() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let eng = common::create_test_file(
        temp_dir.path(),
        "eng.srt",
        "1\n00:00:01,000 --> 00:00:02,000\nHello\n\n2\n00:00:03,000 --> 00:00:04,000\nBye\n",
    )?;
    let hun = common::create_test_file(
        temp_dir.path(),
        "hun.srt",
        "1\n00:00:01,100 --> 00:00:02,100\nSzia\n\n2\n00:00:03,100 --> 00:00:04,100\nViszlat\n",
    )?;
    let output = temp_dir.path().join("dual.ssa");

    let options = Config::default().read_options();
    let executor = Executor::new(ExecOptions {
        out: Some(output.clone()),
        merge: true,
        ..Default::default()
    });
    let outcome = executor.execute(
        Some(FileManager::read_srt_file(&eng, &options)?.pack),
        Some(FileManager::read_srt_file(&hun, &options)?.pack),
    )?;
    assert_eq!(outcome.primary.subs.iter().filter(|s| s.pos == Pos::Top).count(), 2);

    FileManager::write_pack_file(&output, &outcome.primary, false)?;

    let written = fs::read_to_string(&output)?;
    assert_eq!(written.lines().filter(|l| l.starts_with("Style:")).count(), 2);
    assert_eq!(written.lines().filter(|l| l.starts_with("Dialogue:")).count(), 4);
    assert!(written.contains(",0:00:01.10,0:00:02.10,2,,0000,0000,0000,,Szia"));
    Ok(())
}

/// Test splitting a subtitle into two files and concatenating them back
#[test]
fn test_subtitle_workflow_withSplitAndConcat_shouldRestoreOriginal() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let input = common::create_test_subtitle(temp_dir.path(), "full.srt")?;
    let part1: PathBuf = temp_dir.path().join("cd1.srt");
    let part2: PathBuf = temp_dir.path().join("cd2.srt");
    let options = Config::default().read_options();
    let original = FileManager::read_srt_file(&input, &options)?.pack;

    let split = Executor::new(ExecOptions {
        out: Some(part1.clone()),
        out2: Some(part2.clone()),
        split_at: Some("00:00:09,500".to_string()),
        ..Default::default()
    })
    .execute(Some(original.clone()), None)?;
    let second = split.secondary.expect("split should produce a second part");
    assert_eq!(split.primary.len(), 2);
    assert_eq!(second.len(), 2);
    FileManager::write_pack_file(&part1, &split.primary, false)?;
    FileManager::write_pack_file(&part2, &second, false)?;

    let joined = Executor::new(ExecOptions {
        out: Some(temp_dir.path().join("joined.srt")),
        concat: Some("00:00:09.500".to_string()),
        ..Default::default()
    })
    .execute(
        Some(FileManager::read_srt_file(&part1, &options)?.pack),
        Some(FileManager::read_srt_file(&part2, &options)?.pack),
    )?;

    assert_eq!(joined.primary, original);
    Ok(())
}

/// Test statistics of the sample subtitle
#[test]
fn test_subtitle_workflow_withStats_shouldCountSample() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let input = common::create_test_subtitle(temp_dir.path(), "stats.srt")?;
    let primary = FileManager::read_srt_file(&input, &Config::default().read_options())?.pack;

    let outcome = Executor::new(ExecOptions {
        stats: true,
        ..Default::default()
    })
    .execute(Some(primary), None)?;
    let stats = outcome.stats.expect("stats should be computed");

    assert_eq!(stats.subs, 4);
    assert_eq!(stats.lines, 5);
    assert_eq!(stats.his, 1);
    assert_eq!(stats.controls, 1);
    assert_eq!(stats.htmls, 2);
    assert_eq!(stats.total_disp_dur_ms, 3000 + 4000 + 4000 + 4500);
    Ok(())
}
