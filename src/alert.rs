//! Reminder beep as an in-memory WAV file (PCM, mono, 16-bit).

use std::f64::consts::PI;

pub const SAMPLE_RATE: u32 = 44_100;
pub const FREQUENCY_HZ: f64 = 880.0;
pub const DURATION_SECS: f64 = 0.3;
pub const VOLUME: f64 = 0.4;

const HEADER_LEN: usize = 44;

pub fn beep_wav() -> Vec<u8> {
    let samples = (DURATION_SECS * f64::from(SAMPLE_RATE)) as u32;
    let data_len = samples * 2;

    let mut wav = Vec::with_capacity(HEADER_LEN + data_len as usize);
    wav.extend_from_slice(b"RIFF");
    wav.extend_from_slice(&(36 + data_len).to_le_bytes());
    wav.extend_from_slice(b"WAVE");

    wav.extend_from_slice(b"fmt ");
    wav.extend_from_slice(&16u32.to_le_bytes());
    wav.extend_from_slice(&1u16.to_le_bytes()); // PCM
    wav.extend_from_slice(&1u16.to_le_bytes()); // mono
    wav.extend_from_slice(&SAMPLE_RATE.to_le_bytes());
    wav.extend_from_slice(&(SAMPLE_RATE * 2).to_le_bytes());
    wav.extend_from_slice(&2u16.to_le_bytes());
    wav.extend_from_slice(&16u16.to_le_bytes());

    wav.extend_from_slice(b"data");
    wav.extend_from_slice(&data_len.to_le_bytes());

    for i in 0..samples {
        let t = f64::from(i) / f64::from(SAMPLE_RATE);
        let sample = (32767.0 * VOLUME * (2.0 * PI * FREQUENCY_HZ * t).sin()) as i16;
        wav.extend_from_slice(&sample.to_le_bytes());
    }

    wav
}

#[cfg(test)]
mod tests {
    use super::*;

    fn u32_at(bytes: &[u8], offset: usize) -> u32 {
        u32::from_le_bytes(bytes[offset..offset + 4].try_into().unwrap())
    }

    #[test]
    fn header_describes_payload() {
        let wav = beep_wav();
        assert_eq!(&wav[0..4], b"RIFF");
        assert_eq!(&wav[8..12], b"WAVE");
        assert_eq!(&wav[36..40], b"data");
        assert_eq!(u32_at(&wav, 24), SAMPLE_RATE);

        let data_len = u32_at(&wav, 40) as usize;
        assert_eq!(data_len, 13_230 * 2);
        assert_eq!(wav.len(), HEADER_LEN + data_len);
        assert_eq!(u32_at(&wav, 4) as usize, wav.len() - 8);
    }

    #[test]
    fn samples_stay_within_volume() {
        let wav = beep_wav();
        let limit = (32767.0 * VOLUME) as i16 + 1;
        assert!(
            wav[HEADER_LEN..]
                .chunks_exact(2)
                .map(|pair| i16::from_le_bytes([pair[0], pair[1]]))
                .all(|sample| sample.abs() <= limit)
        );
    }
}
