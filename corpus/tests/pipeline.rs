//! End-to-end runs of augment, balance and partition on temporary corpora.

use std::fs;
use std::path::Path;

use kwsprep_audio::noise::{NoiseKind, NoiseSpec};
use kwsprep_audio::pcm::write_wav;
use kwsprep_audio::Waveform;
use kwsprep_corpus::{
    augment, balance_dir, partition, scan, write_labels, AugmentOptions, LabelRecord,
    ScanOptions, SplitRatio,
};

fn write_tone(path: &Path, len: usize, freq: f32) {
    let samples = (0..len)
        .map(|i| 0.4 * (freq * i as f32 / 16000.0 * std::f32::consts::TAU).sin())
        .collect();
    write_wav(path, &Waveform::new(samples, 16000)).unwrap();
}

fn read_labels(path: &Path) -> Vec<LabelRecord> {
    serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap()
}

#[test]
fn balance_then_partition_small_corpus() {
    let dir = tempfile::tempdir().unwrap();
    let raw = dir.path().join("raw");
    let balanced = dir.path().join("balanced");
    let labels = dir.path().join("labels");

    for (i, name) in ["base_1.wav", "aug_1.wav", "neg_1.wav", "neg_2.wav", "neg_3.wav"]
        .iter()
        .enumerate()
    {
        write_tone(&raw.join(name), 1600, 200.0 + 100.0 * i as f32);
    }

    let opts = ScanOptions::default();
    let outcome = balance_dir(&raw, &balanced, &opts, 42).unwrap();
    assert_eq!(outcome.copied(), 4);
    assert_eq!(outcome.sampled_negatives.len(), 2);

    let split = partition(&balanced, SplitRatio::new(1, 1, 8).unwrap(), &opts, 42).unwrap();
    assert!(split.warnings.is_empty());
    write_labels(&labels, &split.labels()).unwrap();

    for empty in ["p_dev.json", "p_test.json", "n_dev.json", "n_test.json"] {
        assert_eq!(fs::read_to_string(labels.join(empty)).unwrap(), "[]", "{empty}");
    }

    let mut p_train: Vec<String> = read_labels(&labels.join("p_train.json"))
        .into_iter()
        .map(|r| {
            assert_eq!(r.keyword_id, 0);
            assert_eq!(r.utt_id, r.speaker_id);
            r.utt_id
        })
        .collect();
    p_train.sort();
    assert_eq!(p_train, ["aug_1", "base_1"]);

    let n_train = read_labels(&labels.join("n_train.json"));
    assert_eq!(n_train.len(), 2);
    assert!(n_train.iter().all(|r| r.keyword_id == -1 && r.utt_id.starts_with("neg_")));
}

#[test]
fn repeated_runs_are_identical() {
    let dir = tempfile::tempdir().unwrap();
    let raw = dir.path().join("raw");
    for i in 0..6 {
        write_tone(&raw.join(format!("spk{}/base_{i}.wav", i % 2)), 1200, 300.0);
    }
    for i in 0..25 {
        write_tone(&raw.join(format!("spk{}/neg_{i}.wav", i % 3)), 1200, 500.0);
    }

    let opts = ScanOptions::default();
    let ratio = SplitRatio::new(1, 1, 2).unwrap();
    let mut runs = Vec::new();
    for run in 0..2 {
        let balanced = dir.path().join(format!("balanced_{run}"));
        let labels = dir.path().join(format!("labels_{run}"));
        balance_dir(&raw, &balanced, &opts, 7).unwrap();
        let split = partition(&balanced, ratio, &opts, 7).unwrap();
        let paths = write_labels(&labels, &split.labels()).unwrap();
        let contents: Vec<String> = paths.iter().map(|p| fs::read_to_string(p).unwrap()).collect();
        runs.push((split, contents));
    }

    assert_eq!(runs[0].0, runs[1].0);
    assert_eq!(runs[0].1, runs[1].1);
    assert_eq!(runs[0].0.positive.counts().total(), 6);
    assert_eq!(runs[0].0.negative.counts().total(), 6);
}

#[test]
fn augment_balance_partition() {
    let dir = tempfile::tempdir().unwrap();
    let raw = dir.path().join("raw");
    let balanced = dir.path().join("balanced");

    for i in 0..3 {
        write_tone(&raw.join(format!("base_{i}.wav")), 2000, 440.0);
    }
    for i in 0..10 {
        write_tone(&raw.join(format!("neg_{i}.wav")), 2000, 220.0);
    }

    let opts = AugmentOptions::new(NoiseSpec::new(NoiseKind::White, 0.02, 42));
    let report = augment(&raw, &raw, &opts).unwrap();
    assert_eq!(report.processed, 3);
    assert_eq!(report.skipped, 10);

    let scanned = scan(&raw, &ScanOptions::default()).unwrap();
    assert_eq!(scanned.positive.len(), 6);

    let outcome = balance_dir(&raw, &balanced, &ScanOptions::default(), 42).unwrap();
    assert_eq!(outcome.copied(), 12);

    let split = partition(&balanced, SplitRatio::default(), &ScanOptions::default(), 42).unwrap();
    assert_eq!(split.positive.counts().total(), 6);
    assert_eq!(split.negative.counts().total(), 6);
    assert!(split.positive.train.iter().all(|s| s.starts_with("base_")));
}
