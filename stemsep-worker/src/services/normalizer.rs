//! Optional output normalization
//!
//! Some deployment profiles require a canonical mono WAV at a fixed
//! sample rate regardless of the tool's native output. This is a pure
//! in-memory transform: decode with symphonia, downmix to mono,
//! resample with rubato, re-encode as 16-bit PCM WAV with hound.

use anyhow::{Context, Result};
use rubato::{
    Resampler, SincFixedIn, SincInterpolationParameters, SincInterpolationType, WindowFunction,
};
use symphonia::core::audio::SampleBuffer;
use symphonia::core::codecs::{DecoderOptions, CODEC_TYPE_NULL};
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;
use tracing::debug;

/// Normalized audio ready for encoding
#[derive(Debug, Clone)]
pub struct NormalizedAudio {
    /// Complete WAV file bytes (16-bit PCM, mono)
    pub bytes: Vec<u8>,
    /// Sample rate of the normalized audio
    pub sample_rate: u32,
    /// Duration in seconds
    pub duration: f64,
}

/// Transcode arbitrary audio bytes to mono WAV at `target_rate`
///
/// `extension_hint` helps symphonia pick a demuxer ("wav", "mp3", ...).
pub fn normalize(bytes: &[u8], extension_hint: &str, target_rate: u32) -> Result<NormalizedAudio> {
    let (samples, native_rate) =
        decode_mono(bytes, extension_hint).context("Failed to decode artifact for normalization")?;

    if samples.is_empty() {
        anyhow::bail!("artifact decoded to zero audio frames");
    }

    let samples = if native_rate != target_rate {
        debug!(
            native_rate,
            target_rate, "Resampling normalized output with rubato"
        );
        resample_mono(samples, native_rate, target_rate)
            .context("Failed to resample normalized output")?
    } else {
        samples
    };

    let duration = samples.len() as f64 / target_rate as f64;
    let bytes = write_wav_mono(&samples, target_rate).context("Failed to encode WAV output")?;

    Ok(NormalizedAudio {
        bytes,
        sample_rate: target_rate,
        duration,
    })
}

/// Decode audio bytes to mono f32 PCM and report the native sample rate
fn decode_mono(bytes: &[u8], extension_hint: &str) -> Result<(Vec<f32>, u32)> {
    let cursor = std::io::Cursor::new(bytes.to_vec());
    let mss = MediaSourceStream::new(Box::new(cursor), Default::default());

    let mut hint = Hint::new();
    hint.with_extension(extension_hint);

    let probed = symphonia::default::get_probe()
        .format(
            &hint,
            mss,
            &FormatOptions::default(),
            &MetadataOptions::default(),
        )
        .context("Failed to probe audio format")?;

    let mut format = probed.format;

    let track = format
        .tracks()
        .iter()
        .find(|t| t.codec_params.codec != CODEC_TYPE_NULL)
        .context("No audio tracks found in artifact")?;

    let track_id = track.id;
    let codec_params = track.codec_params.clone();
    let native_rate = codec_params
        .sample_rate
        .context("Sample rate not specified in codec params")?;

    let mut decoder = symphonia::default::get_codecs()
        .make(&codec_params, &DecoderOptions::default())
        .context("Failed to create decoder")?;

    let mut mono = Vec::new();
    let mut sample_buf: Option<SampleBuffer<f32>> = None;

    loop {
        let packet = match format.next_packet() {
            Ok(packet) => packet,
            Err(symphonia::core::errors::Error::IoError(e))
                if e.kind() == std::io::ErrorKind::UnexpectedEof =>
            {
                break;
            }
            Err(e) => return Err(e).context("Failed to read packet"),
        };

        if packet.track_id() != track_id {
            continue;
        }

        let decoded = decoder.decode(&packet).context("Failed to decode packet")?;
        let spec = *decoded.spec();
        let channels = spec.channels.count();

        if sample_buf.is_none() {
            sample_buf = Some(SampleBuffer::<f32>::new(decoded.capacity() as u64, spec));
        }
        let buf = sample_buf.as_mut().unwrap();
        buf.copy_interleaved_ref(decoded);

        // Downmix interleaved frames by averaging channels
        let interleaved = buf.samples();
        for frame in interleaved.chunks_exact(channels) {
            mono.push(frame.iter().sum::<f32>() / channels as f32);
        }
    }

    debug!(
        frames = mono.len(),
        native_rate, "Decoded artifact for normalization"
    );

    Ok((mono, native_rate))
}

/// Resample mono PCM with the sinc interpolation profile used elsewhere
/// in the workspace: 256-tap filter, 0.95 cutoff, BlackmanHarris2 window
fn resample_mono(samples: Vec<f32>, source_rate: u32, target_rate: u32) -> Result<Vec<f32>> {
    let params = SincInterpolationParameters {
        sinc_len: 256,
        f_cutoff: 0.95,
        interpolation: SincInterpolationType::Linear,
        oversampling_factor: 256,
        window: WindowFunction::BlackmanHarris2,
    };

    let resample_ratio = target_rate as f64 / source_rate as f64;
    let num_frames = samples.len();

    // Chunk size = input length for single-pass processing
    let mut resampler = SincFixedIn::<f32>::new(resample_ratio, 4.0, params, num_frames, 1)
        .context("Failed to create rubato resampler")?;

    let output = resampler
        .process(&[samples], None)
        .context("Rubato resampling failed")?;

    Ok(output.into_iter().next().unwrap_or_default())
}

/// Encode mono f32 PCM as a complete 16-bit WAV file in memory
fn write_wav_mono(samples: &[f32], sample_rate: u32) -> Result<Vec<u8>> {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };

    let mut cursor = std::io::Cursor::new(Vec::new());
    {
        let mut writer =
            hound::WavWriter::new(&mut cursor, spec).context("Failed to create WAV writer")?;
        for &sample in samples {
            let clamped = (sample.clamp(-1.0, 1.0) * i16::MAX as f32) as i16;
            writer.write_sample(clamped)?;
        }
        writer.finalize().context("Failed to finalize WAV")?;
    }

    Ok(cursor.into_inner())
}
