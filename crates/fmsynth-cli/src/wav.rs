//! WAV export.

use std::path::Path;

use hound::{SampleFormat, WavSpec, WavWriter};

/// Writes a mono 32-bit float WAV file.
///
/// Samples are written as-is; values outside [-1, 1] are not clipped.
pub fn write_mono_f32(path: &Path, samples: &[f64], sample_rate: u32) -> Result<(), hound::Error> {
    let spec = WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 32,
        sample_format: SampleFormat::Float,
    };

    let mut writer = WavWriter::create(path, spec)?;
    for &sample in samples {
        writer.write_sample(sample as f32)?;
    }
    writer.finalize()
}
