//! Noise augmentation of keyword utterances.
//!
//! Every positive file under the input root is decoded, mixed with noise
//! and written under the output root at the same relative directory, with
//! the noise type and level appended to its stem:
//! `spk1/base_1.wav` becomes `spk1/base_1_white_noise0.02.wav`.

use std::path::{Path, PathBuf};

use kwsprep_audio::noise::{mix, NoiseKind, NoiseSpec};
use kwsprep_audio::pcm::{is_wav, read_audio, write_wav};
use kwsprep_audio::AudioError;
use tracing::{debug, info, warn};

use crate::report::{ItemOutcome, StageReport};
use crate::scan::{scan, CorpusEntry, ScanOptions};
use crate::seed::SeedMode;
use crate::{CorpusError, Result};

/// Options for [`augment`].
#[derive(Debug, Clone)]
pub struct AugmentOptions {
    pub noise: NoiseSpec,
    pub seed_mode: SeedMode,
    pub scan: ScanOptions,
}

impl AugmentOptions {
    pub fn new(noise: NoiseSpec) -> Self {
        Self {
            noise,
            seed_mode: SeedMode::default(),
            scan: ScanOptions::default(),
        }
    }
}

/// Returns the output path for an augmented copy of `relative_path`.
///
/// Augmented audio is always WAV-encoded: a WAV source keeps its extension
/// as written, any other source gets `.wav`.
pub fn augmented_path(relative_path: &Path, kind: NoiseKind, level: f64) -> PathBuf {
    let stem = relative_path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let mut name = format!("{stem}_{kind}_noise{}", format_level(level));
    match relative_path.extension() {
        Some(ext) if is_wav(relative_path) => {
            name.push('.');
            name.push_str(&ext.to_string_lossy());
        }
        _ => name.push_str(".wav"),
    }
    relative_path.with_file_name(name)
}

/// Renders a level the way it appears in file names.
///
/// Shortest round-trip digits with `.0` kept on whole numbers. Magnitudes
/// below 1e-4 or from 1e16 up use an exponent with an explicit sign and at
/// least two digits (`1e-05`, `2.5e+16`).
fn format_level(level: f64) -> String {
    let magnitude = level.abs();
    if level.is_finite() && level != 0.0 && !(1e-4..1e16).contains(&magnitude) {
        let sci = format!("{level:e}");
        if let Some((mantissa, exp)) = sci.split_once('e') {
            if let Ok(exp) = exp.parse::<i32>() {
                let sign = if exp < 0 { '-' } else { '+' };
                return format!("{mantissa}e{sign}{:02}", exp.unsigned_abs());
            }
        }
        return sci;
    }
    if level.fract() == 0.0 && level.is_finite() {
        format!("{level:.1}")
    } else {
        format!("{level}")
    }
}

/// Augments every positive file under `input_root` into `output_root`.
///
/// The full file list is collected before anything is written, so when
/// `output_root` is `input_root` the new files are not picked up again in
/// the same run. Negative and non-audio files are counted as skipped;
/// decode, synthesis and write errors are logged and counted as failed.
pub fn augment(
    input_root: impl AsRef<Path>,
    output_root: impl AsRef<Path>,
    opts: &AugmentOptions,
) -> Result<StageReport> {
    opts.noise
        .validate()
        .map_err(|e| CorpusError::InvalidArgument(e.to_string()))?;

    let output_root = output_root.as_ref();
    let scanned = scan(input_root, &opts.scan)?;

    let mut report = StageReport::new("augment");
    report.add_skipped(scanned.skipped);
    for entry in &scanned.negative {
        report.record(&entry.source, ItemOutcome::Skipped("negative sample".into()));
    }

    info!(
        noise = %opts.noise.kind,
        level = opts.noise.level,
        seed = opts.noise.seed,
        seed_mode = %opts.seed_mode,
        files = scanned.positive.len(),
        "augment: starting"
    );

    for entry in &scanned.positive {
        let outcome = match augment_one(entry, output_root, opts) {
            Ok(dest) => {
                debug!(path = %dest.display(), "augment: written");
                ItemOutcome::Done
            }
            Err(e) => {
                warn!(path = %entry.source.display(), error = %e, "augment: file failed");
                ItemOutcome::Failed(e.to_string())
            }
        };
        report.record(&entry.source, outcome);
    }

    info!(
        processed = report.processed,
        skipped = report.skipped,
        failed = report.failed,
        "augment: complete"
    );
    Ok(report)
}

fn augment_one(
    entry: &CorpusEntry,
    output_root: &Path,
    opts: &AugmentOptions,
) -> std::result::Result<PathBuf, AudioError> {
    let seed = opts.seed_mode.seed_for(opts.noise.seed, &entry.relative_path);
    let spec = opts.noise.with_seed(seed);

    let clean = read_audio(&entry.source)?;
    let noisy = mix(&clean, &spec)?;

    let dest = output_root.join(augmented_path(&entry.relative_path, spec.kind, spec.level));
    write_wav(&dest, &noisy)?;
    Ok(dest)
}

#[cfg(test)]
mod tests {
    use super::*;
    use kwsprep_audio::pcm::read_wav;
    use kwsprep_audio::Waveform;
    use std::fs;

    fn write_tone(path: &Path, len: usize) {
        let samples = (0..len).map(|i| 0.3 * (i as f32 * 0.01).sin()).collect();
        write_wav(path, &Waveform::new(samples, 16000)).unwrap();
    }

    #[test]
    fn test_augmented_path() {
        let p = augmented_path(Path::new("spk1/base_1.wav"), NoiseKind::White, 0.02);
        assert_eq!(p, PathBuf::from("spk1/base_1_white_noise0.02.wav"));

        let p = augmented_path(Path::new("aug_3.WAV"), NoiseKind::Impulse, 1.0);
        assert_eq!(p, PathBuf::from("aug_3_impulse_noise1.0.WAV"));

        let p = augmented_path(Path::new("spk2/base_2.flac"), NoiseKind::Pink, 0.1);
        assert_eq!(p, PathBuf::from("spk2/base_2_pink_noise0.1.wav"));

        let p = augmented_path(Path::new("aug_4.m4a"), NoiseKind::White, 0.02);
        assert_eq!(p, PathBuf::from("aug_4_white_noise0.02.wav"));
    }

    #[test]
    fn test_format_level() {
        assert_eq!(format_level(0.02), "0.02");
        assert_eq!(format_level(0.0001), "0.0001");
        assert_eq!(format_level(2.0), "2.0");
        assert_eq!(format_level(1e-5), "1e-05");
        assert_eq!(format_level(2.5e-7), "2.5e-07");
        assert_eq!(format_level(1e16), "1e+16");
        assert_eq!(format_level(1e15), "1000000000000000.0");
        assert_eq!(format_level(1e-123), "1e-123");
    }

    #[test]
    fn test_augment_positive_only() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("raw");
        let output = dir.path().join("aug");
        write_tone(&input.join("spk1/base_1.wav"), 2000);
        write_tone(&input.join("neg_1.wav"), 2000);
        fs::write(input.join("notes.txt"), b"x").unwrap();

        let opts = AugmentOptions::new(NoiseSpec::new(NoiseKind::White, 0.02, 42));
        let report = augment(&input, &output, &opts).unwrap();

        assert_eq!(report.processed, 1);
        assert_eq!(report.skipped, 2);
        assert_eq!(report.failed, 0);

        let out = read_wav(output.join("spk1/base_1_white_noise0.02.wav")).unwrap();
        assert_eq!(out.len(), 2000);
        assert_eq!(out.sample_rate, 16000);
        assert!(!output.join("neg_1_white_noise0.02.wav").exists());
    }

    #[test]
    fn test_augment_in_place_does_not_recurse() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        write_tone(&root.join("base_1.wav"), 1500);

        let opts = AugmentOptions::new(NoiseSpec::new(NoiseKind::Pink, 0.05, 1));
        let report = augment(root, root, &opts).unwrap();
        assert_eq!(report.processed, 1);
        assert!(root.join("base_1_pink_noise0.05.wav").exists());
        assert!(!root.join("base_1_pink_noise0.05_pink_noise0.05.wav").exists());
    }

    #[test]
    fn test_bad_files_counted_as_failed() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("raw");
        let output = dir.path().join("aug");
        write_tone(&input.join("base_ok.wav"), 4000);
        // Too short for any impulse to be drawn.
        write_tone(&input.join("base_short.wav"), 100);
        fs::write(input.join("base_garbage.wav"), b"not a wav").unwrap();
        fs::write(input.join("base_2.flac"), b"fLaC").unwrap();

        let opts = AugmentOptions::new(NoiseSpec::new(NoiseKind::Impulse, 0.1, 42));
        let report = augment(&input, &output, &opts).unwrap();
        assert_eq!(report.processed, 1);
        assert_eq!(report.failed, 3);
        assert_eq!(report.failures.len(), 3);
    }

    #[test]
    fn test_invalid_level_rejected_before_scan() {
        let dir = tempfile::tempdir().unwrap();
        let opts = AugmentOptions::new(NoiseSpec::new(NoiseKind::White, -1.0, 42));
        let err = augment(dir.path().join("missing"), dir.path(), &opts).unwrap_err();
        assert!(matches!(err, CorpusError::InvalidArgument(_)));
    }

    #[test]
    fn test_per_file_seeds_differ() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("raw");
        let output = dir.path().join("aug");
        write_tone(&input.join("base_1.wav"), 3000);
        write_tone(&input.join("base_2.wav"), 3000);

        let mut opts = AugmentOptions::new(NoiseSpec::new(NoiseKind::White, 0.5, 42));
        opts.seed_mode = SeedMode::PerFile;
        augment(&input, &output, &opts).unwrap();

        let a = read_wav(output.join("base_1_white_noise0.5.wav")).unwrap();
        let b = read_wav(output.join("base_2_white_noise0.5.wav")).unwrap();
        assert_ne!(a.samples, b.samples);
    }
}
