//! WAV decoding and encoding via `hound`.

use std::fs;
use std::path::Path;

use hound::{SampleFormat, WavReader, WavSpec, WavWriter};

use super::Waveform;
use crate::AudioError;

/// Bit depth used when writing waveforms.
pub const WAV_BITS_PER_SAMPLE: u16 = 16;

/// Reads a WAV file into a mono waveform at its native sample rate.
///
/// Integer PCM is scaled by `2^(bits-1)`; 32-bit float is taken as-is.
/// Multi-channel audio is down-mixed by averaging the channels of each frame.
pub fn read_wav(path: impl AsRef<Path>) -> Result<Waveform, AudioError> {
    let path = path.as_ref();
    if !is_wav(path) {
        return Err(AudioError::UnsupportedFormat(format!(
            "{}: only WAV can be decoded",
            path.display()
        )));
    }

    let reader = WavReader::open(path)?;
    let spec = reader.spec();
    let channels = spec.channels as usize;
    if channels == 0 {
        return Err(AudioError::UnsupportedFormat(format!(
            "{}: zero channels",
            path.display()
        )));
    }

    let interleaved: Vec<f32> = match (spec.sample_format, spec.bits_per_sample) {
        (SampleFormat::Float, 32) => reader.into_samples::<f32>().collect::<Result<_, _>>()?,
        (SampleFormat::Int, bits @ 1..=32) => {
            let scale = 1.0 / (1u64 << (bits - 1)) as f64;
            reader
                .into_samples::<i32>()
                .map(|s| s.map(|v| (v as f64 * scale) as f32))
                .collect::<Result<_, _>>()?
        }
        (format, bits) => {
            return Err(AudioError::UnsupportedFormat(format!(
                "{}: {:?} at {} bits",
                path.display(),
                format,
                bits
            )));
        }
    };

    let samples = if channels == 1 {
        interleaved
    } else {
        interleaved
            .chunks_exact(channels)
            .map(|frame| frame.iter().sum::<f32>() / channels as f32)
            .collect()
    };

    Ok(Waveform::new(samples, spec.sample_rate))
}

/// Writes a waveform as mono 16-bit PCM, creating parent directories.
///
/// Samples outside [-1.0, 1.0] saturate.
pub fn write_wav(path: impl AsRef<Path>, waveform: &Waveform) -> Result<(), AudioError> {
    let path = path.as_ref();
    if waveform.sample_rate == 0 {
        return Err(AudioError::InvalidArgument("sample rate must be positive".into()));
    }
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let spec = WavSpec {
        channels: 1,
        sample_rate: waveform.sample_rate,
        bits_per_sample: WAV_BITS_PER_SAMPLE,
        sample_format: SampleFormat::Int,
    };
    let mut writer = WavWriter::create(path, spec)?;
    for &s in &waveform.samples {
        let v = (s.clamp(-1.0, 1.0) * i16::MAX as f32).round() as i16;
        writer.write_sample(v)?;
    }
    writer.finalize()?;
    Ok(())
}

/// Returns true if `path` has a `.wav` extension, in any case.
pub fn is_wav(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("wav"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_then_read_preserves_rate_and_length() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/dir/base_1.wav");

        let samples: Vec<f32> = (0..441).map(|i| (i as f32 / 441.0) - 0.5).collect();
        let original = Waveform::new(samples, 44100);
        write_wav(&path, &original).unwrap();

        let decoded = read_wav(&path).unwrap();
        assert_eq!(decoded.sample_rate, 44100);
        assert_eq!(decoded.len(), original.len());
        for (a, b) in decoded.samples.iter().zip(&original.samples) {
            assert!((a - b).abs() < 1e-3, "{a} vs {b}");
        }
    }

    #[test]
    fn test_stereo_is_downmixed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("stereo.WAV");
        let spec = WavSpec {
            channels: 2,
            sample_rate: 8000,
            bits_per_sample: 16,
            sample_format: SampleFormat::Int,
        };
        let mut writer = WavWriter::create(&path, spec).unwrap();
        for _ in 0..4 {
            writer.write_sample(16384i16).unwrap();
            writer.write_sample(0i16).unwrap();
        }
        writer.finalize().unwrap();

        let w = read_wav(&path).unwrap();
        assert_eq!(w.len(), 4);
        assert!(w.samples.iter().all(|s| (s - 0.25).abs() < 1e-6));
    }

    #[test]
    fn test_clipped_on_write() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("loud.wav");
        write_wav(&path, &Waveform::new(vec![2.0, -2.0], 16000)).unwrap();

        let w = read_wav(&path).unwrap();
        assert!(w.samples[0] <= 1.0 && w.samples[0] > 0.99);
        assert!(w.samples[1] >= -1.0 && w.samples[1] < -0.99);
    }

    #[test]
    fn test_non_wav_rejected() {
        let err = read_wav("corpus/base_1.flac").unwrap_err();
        assert!(matches!(err, AudioError::UnsupportedFormat(_)));
    }

    #[test]
    fn test_zero_sample_rate_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let err = write_wav(dir.path().join("x.wav"), &Waveform::new(vec![0.0], 0)).unwrap_err();
        assert!(matches!(err, AudioError::InvalidArgument(_)));
    }
}
