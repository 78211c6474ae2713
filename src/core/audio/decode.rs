//! PCM fragment decoding into the canonical sample stream.
//!
//! The streaming wire path carries raw PCM; container formats and
//! resampling are handled upstream of this service. Fragments are
//! normalized to mono f32 in [-1.0, 1.0] before they reach the buffer.

/// PCM encodings accepted on the wire.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PcmEncoding {
    /// Little-endian signed 16-bit samples
    #[default]
    Linear16,
    /// Little-endian IEEE-754 32-bit float samples
    Float32,
}

impl PcmEncoding {
    /// Bytes per sample for a single channel.
    pub fn sample_bytes(self) -> usize {
        match self {
            PcmEncoding::Linear16 => 2,
            PcmEncoding::Float32 => 4,
        }
    }
}

/// Errors raised by fragment decoding.
///
/// A decode failure drops the offending fragment only; the session keeps
/// running.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DecodeError {
    #[error("fragment of {len} bytes is not aligned to {frame_bytes}-byte frames")]
    MisalignedFragment { len: usize, frame_bytes: usize },
    #[error("channel count must be at least 1")]
    NoChannels,
}

/// Decoder for one connection's declared PCM format.
#[derive(Debug, Clone, Copy)]
pub struct PcmDecoder {
    encoding: PcmEncoding,
    channels: u16,
}

impl PcmDecoder {
    pub fn new(encoding: PcmEncoding, channels: u16) -> Result<Self, DecodeError> {
        if channels == 0 {
            return Err(DecodeError::NoChannels);
        }
        Ok(Self { encoding, channels })
    }

    /// Decode one fragment into canonical mono f32 samples.
    ///
    /// Multi-channel input is downmixed by averaging the channels of each
    /// frame. An empty fragment decodes to an empty sample vector.
    pub fn decode(&self, bytes: &[u8]) -> Result<Vec<f32>, DecodeError> {
        let frame_bytes = self.encoding.sample_bytes() * self.channels as usize;
        if bytes.len() % frame_bytes != 0 {
            return Err(DecodeError::MisalignedFragment {
                len: bytes.len(),
                frame_bytes,
            });
        }

        let samples = match self.encoding {
            PcmEncoding::Linear16 => pcm16_bytes_to_f32(bytes),
            PcmEncoding::Float32 => f32_bytes_to_f32(bytes),
        };

        if self.channels == 1 {
            return Ok(samples);
        }

        let channels = self.channels as usize;
        Ok(samples
            .chunks_exact(channels)
            .map(|frame| frame.iter().sum::<f32>() / channels as f32)
            .collect())
    }

    pub fn encoding(&self) -> PcmEncoding {
        self.encoding
    }

    pub fn channels(&self) -> u16 {
        self.channels
    }
}

/// Convert PCM16 bytes to f32 samples normalized to [-1.0, 1.0].
pub fn pcm16_bytes_to_f32(bytes: &[u8]) -> Vec<f32> {
    bytes
        .chunks_exact(2)
        .map(|chunk| {
            let sample = i16::from_le_bytes([chunk[0], chunk[1]]);
            f32::from(sample) / 32768.0
        })
        .collect()
}

fn f32_bytes_to_f32(bytes: &[u8]) -> Vec<f32> {
    bytes
        .chunks_exact(4)
        .map(|chunk| f32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]))
        .collect()
}

/// Convert f32 samples back to little-endian PCM16 bytes.
///
/// Samples are clamped to [-1.0, 1.0] before scaling.
pub fn f32_to_pcm16_bytes(samples: &[f32]) -> Vec<u8> {
    samples
        .iter()
        .map(|&s| {
            let clamped = s.clamp(-1.0, 1.0);
            (clamped * 32767.0).round() as i16
        })
        .flat_map(i16::to_le_bytes)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pcm16(samples: &[i16]) -> Vec<u8> {
        samples.iter().flat_map(|s| s.to_le_bytes()).collect()
    }

    #[test]
    fn test_pcm16_normalization_range() {
        let bytes = pcm16(&[i16::MAX, i16::MIN, 0]);
        let samples = pcm16_bytes_to_f32(&bytes);

        assert!((samples[0] - 32767.0 / 32768.0).abs() < 1e-6);
        assert!((samples[1] + 1.0).abs() < 1e-6);
        assert_eq!(samples[2], 0.0);
    }

    #[test]
    fn test_decode_linear16_mono() {
        let decoder = PcmDecoder::new(PcmEncoding::Linear16, 1).unwrap();
        let samples = decoder.decode(&pcm16(&[16384, -16384])).unwrap();

        assert_eq!(samples.len(), 2);
        assert!((samples[0] - 0.5).abs() < 1e-6);
        assert!((samples[1] + 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_decode_float32_passthrough() {
        let decoder = PcmDecoder::new(PcmEncoding::Float32, 1).unwrap();
        let bytes: Vec<u8> = [0.25f32, -0.75f32]
            .iter()
            .flat_map(|s| s.to_le_bytes())
            .collect();

        assert_eq!(decoder.decode(&bytes).unwrap(), vec![0.25, -0.75]);
    }

    #[test]
    fn test_decode_stereo_downmix() {
        let decoder = PcmDecoder::new(PcmEncoding::Linear16, 2).unwrap();
        let samples = decoder.decode(&pcm16(&[16384, -16384, 8192, 8192])).unwrap();

        assert_eq!(samples.len(), 2);
        assert!(samples[0].abs() < 1e-6);
        assert!((samples[1] - 0.25).abs() < 1e-6);
    }

    #[test]
    fn test_decode_misaligned_fragment() {
        let decoder = PcmDecoder::new(PcmEncoding::Linear16, 1).unwrap();
        assert_eq!(
            decoder.decode(&[0u8; 3]),
            Err(DecodeError::MisalignedFragment {
                len: 3,
                frame_bytes: 2,
            })
        );
    }

    #[test]
    fn test_decode_misaligned_stereo_frame() {
        // an even byte count can still split a stereo frame
        let decoder = PcmDecoder::new(PcmEncoding::Linear16, 2).unwrap();
        assert!(decoder.decode(&[0u8; 6]).is_err());
    }

    #[test]
    fn test_decode_empty_fragment() {
        let decoder = PcmDecoder::new(PcmEncoding::Linear16, 1).unwrap();
        assert_eq!(decoder.decode(&[]).unwrap(), Vec::<f32>::new());
    }

    #[test]
    fn test_zero_channels_rejected() {
        assert_eq!(
            PcmDecoder::new(PcmEncoding::Linear16, 0).unwrap_err(),
            DecodeError::NoChannels
        );
    }

    #[test]
    fn test_f32_to_pcm16_clamps_out_of_range() {
        let bytes = f32_to_pcm16_bytes(&[2.0, -2.0, 0.0]);
        let restored = pcm16_bytes_to_f32(&bytes);

        assert!((restored[0] - 32767.0 / 32768.0).abs() < 1e-4);
        assert!((restored[1] + 32767.0 / 32768.0).abs() < 1e-4);
        assert_eq!(restored[2], 0.0);
    }
}
