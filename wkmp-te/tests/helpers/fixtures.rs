//! Audio fixtures
//!
//! Smallest files lofty will open: a FLAC stream holding only its
//! STREAMINFO block, and a short silent WAV written with hound.

use std::path::{Path, PathBuf};

/// FLAC with STREAMINFO only (44.1 kHz, stereo, 16 bit, no frames)
pub fn write_minimal_flac(path: &Path) -> std::io::Result<PathBuf> {
    let mut bytes = Vec::with_capacity(42);
    bytes.extend_from_slice(b"fLaC");
    // Last metadata block, type STREAMINFO, 34 bytes
    bytes.extend_from_slice(&[0x80, 0x00, 0x00, 0x22]);
    // Min/max block size
    bytes.extend_from_slice(&[0x10, 0x00, 0x10, 0x00]);
    // Min/max frame size (unknown)
    bytes.extend_from_slice(&[0x00; 6]);
    // Sample rate (20 bits), channels - 1 (3), bits per sample - 1 (5), samples high bits (4)
    let info: u32 = (44_100 << 12) | (1 << 9) | (15 << 4);
    bytes.extend_from_slice(&info.to_be_bytes());
    // Total samples low 32 bits
    bytes.extend_from_slice(&[0x00; 4]);
    // MD5 of unencoded audio
    bytes.extend_from_slice(&[0x00; 16]);

    std::fs::write(path, bytes)?;
    Ok(path.to_path_buf())
}

/// 0.1 s of mono 16-bit silence
pub fn write_silent_wav(path: &Path) -> anyhow::Result<PathBuf> {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate: 8000,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };

    let mut writer = hound::WavWriter::create(path, spec)?;
    for _ in 0..800 {
        writer.write_sample(0i16)?;
    }
    writer.finalize()?;
    Ok(path.to_path_buf())
}
