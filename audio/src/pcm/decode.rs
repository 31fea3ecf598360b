//! Decoding of compressed and container formats via `symphonia`.

use std::fs::File;
use std::io;
use std::path::Path;

use symphonia::core::audio::SampleBuffer;
use symphonia::core::codecs::{DecoderOptions, CODEC_TYPE_NULL};
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;

use super::wav::{is_wav, read_wav};
use super::Waveform;
use crate::AudioError;

/// Reads any supported audio file into a mono waveform at its native rate.
///
/// WAV goes through [`read_wav`]; everything else through [`decode_file`].
pub fn read_audio(path: impl AsRef<Path>) -> Result<Waveform, AudioError> {
    let path = path.as_ref();
    if is_wav(path) {
        read_wav(path)
    } else {
        decode_file(path)
    }
}

/// Decodes the first audio track of `path` with symphonia.
///
/// The extension is passed as a probe hint. Packets that fail to decode are
/// dropped; container and I/O errors abort the read.
pub fn decode_file(path: impl AsRef<Path>) -> Result<Waveform, AudioError> {
    let path = path.as_ref();
    let file = File::open(path)?;
    let mss = MediaSourceStream::new(Box::new(file), Default::default());

    let mut hint = Hint::new();
    if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
        hint.with_extension(ext);
    }

    let probed = symphonia::default::get_probe().format(
        &hint,
        mss,
        &FormatOptions::default(),
        &MetadataOptions::default(),
    )?;
    let mut format = probed.format;

    let track = format
        .tracks()
        .iter()
        .find(|t| t.codec_params.codec != CODEC_TYPE_NULL)
        .ok_or_else(|| {
            AudioError::UnsupportedFormat(format!("{}: no audio track", path.display()))
        })?;
    let track_id = track.id;
    let params = track.codec_params.clone();
    let mut sample_rate = params.sample_rate;

    let mut decoder =
        symphonia::default::get_codecs().make(&params, &DecoderOptions::default())?;

    let mut samples = Vec::new();
    let mut buf: Option<SampleBuffer<f32>> = None;
    loop {
        let packet = match format.next_packet() {
            Ok(p) => p,
            Err(SymphoniaError::IoError(e)) if e.kind() == io::ErrorKind::UnexpectedEof => break,
            Err(SymphoniaError::ResetRequired) => break,
            Err(e) => return Err(e.into()),
        };
        if packet.track_id() != track_id {
            continue;
        }

        let decoded = match decoder.decode(&packet) {
            Ok(d) => d,
            Err(SymphoniaError::DecodeError(_)) => continue,
            Err(e) => return Err(e.into()),
        };

        let spec = *decoded.spec();
        let channels = spec.channels.count();
        if channels == 0 {
            continue;
        }
        if sample_rate.is_none() {
            sample_rate = Some(spec.rate);
        }

        let needed = decoded.capacity() * channels;
        if buf.as_ref().is_none_or(|sb| sb.capacity() < needed) {
            buf = Some(SampleBuffer::new(decoded.capacity() as u64, spec));
        }
        let Some(sb) = buf.as_mut() else {
            continue;
        };
        sb.copy_interleaved_ref(decoded);

        if channels == 1 {
            samples.extend_from_slice(sb.samples());
        } else {
            samples.extend(
                sb.samples()
                    .chunks_exact(channels)
                    .map(|frame| frame.iter().sum::<f32>() / channels as f32),
            );
        }
    }

    let sample_rate = sample_rate.filter(|&r| r > 0).ok_or_else(|| {
        AudioError::UnsupportedFormat(format!("{}: unknown sample rate", path.display()))
    })?;
    Ok(Waveform::new(samples, sample_rate))
}
