use std::f32::consts::PI;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use serde_json::Value;
use spectro_audio::audio::{decode_file, write_wav, BitDepth, SampleBuffer};

fn cli() -> Command {
    Command::new(env!("CARGO_BIN_EXE_spectro_cli"))
}

fn scratch_dir(test: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("spectro_cli_{}_{}", test, std::process::id()));
    fs::create_dir_all(&dir).expect("create scratch dir");
    dir
}

/// 100 ms tone bursts separated by 100 ms of silence, 16-bit
fn write_vowel_fixture(dir: &Path) -> PathBuf {
    let samples = (0..44_100)
        .map(|i| {
            if (i / 4_410) % 2 == 0 {
                0.4 * (2.0 * PI * 220.0 * i as f32 / 44_100.0).sin()
            } else {
                0.0
            }
        })
        .collect();
    let path = dir.join("vowels.wav");
    write_wav(
        &path,
        &SampleBuffer::mono(samples, 44_100).unwrap(),
        BitDepth::Pcm16,
    )
    .expect("write fixture");
    path
}

fn arg(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}

#[test]
fn analyze_prints_report_json() {
    let dir = scratch_dir("analyze");
    let input = write_vowel_fixture(&dir);

    let output = cli()
        .args(["analyze", &arg(&input)])
        .output()
        .expect("failed to run spectro_cli analyze");
    assert!(
        output.status.success(),
        "CLI exited with {:?}",
        output.status.code()
    );

    let stdout = String::from_utf8(output.stdout).expect("stdout UTF-8");
    let json: Value = serde_json::from_str(stdout.trim()).expect("analysis report JSON payload");
    assert_eq!(json["sampleRate"], 44_100);
    assert_eq!(json["channels"], 1);
    assert!(json["features"]["estimatedLUFS"].is_number());
    assert!(
        !json["assessment"]["regions"]
            .as_array()
            .expect("regions array")
            .is_empty(),
        "expected missing-consonant regions"
    );
}

#[test]
fn analyze_writes_output_file() {
    let dir = scratch_dir("analyze_output");
    let input = write_vowel_fixture(&dir);
    let report = dir.join("report.json");

    let output = cli()
        .args(["analyze", &arg(&input), "--output", &arg(&report)])
        .output()
        .expect("failed to run analyze --output");
    assert!(output.status.success());

    let json: Value =
        serde_json::from_str(&fs::read_to_string(&report).expect("report written")).unwrap();
    assert!(json["recommendations"].as_array().is_some());
}

#[test]
fn master_writes_float_wav() {
    let dir = scratch_dir("master");
    let input = write_vowel_fixture(&dir);
    let mastered = dir.join("mastered.wav");

    let output = cli()
        .args([
            "master",
            &arg(&input),
            &arg(&mastered),
            "--target-lufs=-12",
            "--bit-depth",
            "32",
        ])
        .output()
        .expect("failed to run master");
    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let stdout = String::from_utf8(output.stdout).expect("stdout UTF-8");
    let json: Value = serde_json::from_str(stdout.trim()).expect("processing report JSON");
    assert_eq!(json["processesApplied"][0]["type"], "loudnessGain");

    let bytes = fs::read(&mastered).expect("mastered file");
    assert_eq!(u16::from_le_bytes([bytes[20], bytes[21]]), 3);
    assert_eq!(decode_file(&mastered).unwrap().frame_count(), 44_100);
}

#[test]
fn correct_with_seed_is_reproducible() {
    let dir = scratch_dir("correct");
    let input = write_vowel_fixture(&dir);
    let first = dir.join("first.wav");
    let second = dir.join("second.wav");

    for out in [&first, &second] {
        let output = cli()
            .args([
                "correct",
                &arg(&input),
                &arg(out),
                "--intensity",
                "80",
                "--seed",
                "42",
            ])
            .output()
            .expect("failed to run correct");
        assert!(output.status.success());
    }

    assert_eq!(fs::read(&first).unwrap(), fs::read(&second).unwrap());
    assert_ne!(fs::read(&first).unwrap(), fs::read(&input).unwrap());
}

#[test]
fn invalid_bit_depth_fails() {
    let dir = scratch_dir("bit_depth");
    let input = write_vowel_fixture(&dir);

    let output = cli()
        .args([
            "master",
            &arg(&input),
            &arg(&dir.join("out.wav")),
            "--bit-depth",
            "24",
        ])
        .output()
        .expect("failed to run master");
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8(output.stderr).expect("stderr UTF-8");
    assert!(stderr.contains("bit-depth"), "got {stderr}");
}

#[test]
fn undecodable_input_fails() {
    let dir = scratch_dir("undecodable");
    let input = dir.join("not_audio.wav");
    fs::write(&input, b"definitely not a wav file").unwrap();

    let output = cli()
        .args(["analyze", &arg(&input)])
        .output()
        .expect("failed to run analyze");
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8(output.stderr).expect("stderr UTF-8");
    assert!(stderr.contains("decoding"), "got {stderr}");
}

#[test]
fn explicit_config_must_parse() {
    let dir = scratch_dir("config");
    let input = write_vowel_fixture(&dir);
    let config = dir.join("broken.json");
    fs::write(&config, "{ not json").unwrap();

    let output = cli()
        .args(["--config", &arg(&config), "analyze", &arg(&input)])
        .output()
        .expect("failed to run analyze --config");
    assert_eq!(output.status.code(), Some(1));
}

#[test]
fn non_finite_intensity_is_rejected() {
    let dir = scratch_dir("nan_intensity");
    let input = write_vowel_fixture(&dir);
    let out = dir.join("out.wav");

    let output = cli()
        .args(["correct", &arg(&input), &arg(&out), "--intensity", "NaN"])
        .output()
        .expect("failed to run correct");
    assert!(!output.status.success());
    let stderr = String::from_utf8(output.stderr).expect("stderr UTF-8");
    assert!(stderr.contains("not a finite number"), "got {stderr}");
    assert!(!out.exists());
}
