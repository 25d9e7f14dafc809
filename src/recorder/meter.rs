use crate::recorder::input::PcmFormat;

/// RMS level of the most recent chunk, normalised to 0..=1. Purely cosmetic.
pub struct LevelMeter {
    format: PcmFormat,
    carry: Option<u8>,
}

impl LevelMeter {
    /// `None` when the input is encoded and cannot be metered; recording goes
    /// on without a meter in that case.
    pub fn for_format(pcm: Option<PcmFormat>) -> Option<LevelMeter> {
        pcm.map(|format| LevelMeter { format, carry: None })
    }

    pub fn measure(&mut self, chunk: &[u8]) -> f32 {
        match self.format {
            PcmFormat::S16Le => self.measure_s16le(chunk),
        }
    }

    fn measure_s16le(&mut self, chunk: &[u8]) -> f32 {
        let mut sum = 0f64;
        let mut count = 0usize;
        let mut bytes = chunk.iter().copied();

        // a sample split across chunks
        if let Some(low) = self.carry.take() {
            match bytes.next() {
                Some(high) => {
                    let s = i16::from_le_bytes([low, high]) as f64;
                    sum += s * s;
                    count += 1;
                }
                None => self.carry = Some(low),
            }
        }

        loop {
            match (bytes.next(), bytes.next()) {
                (Some(low), Some(high)) => {
                    let s = i16::from_le_bytes([low, high]) as f64;
                    sum += s * s;
                    count += 1;
                }
                (Some(low), None) => {
                    self.carry = Some(low);
                    break;
                }
                _ => break,
            }
        }

        if count == 0 {
            return 0.0;
        }
        let rms = (sum / count as f64).sqrt();
        (rms / i16::MAX as f64).min(1.0) as f32
    }
}
