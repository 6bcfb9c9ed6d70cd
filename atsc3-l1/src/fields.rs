//! Field enumerations shared by both signaling sections.
//!
//! Every table is a closed enum with an explicit fallback variant, so an
//! out-of-range code renders as `Reserved` instead of indexing anything.

use std::fmt;

/// OFDM FFT size (2-bit code).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FftSize {
    Fft8k,
    Fft16k,
    Fft32k,
    Reserved(u8),
}

impl FftSize {
    pub fn from_code(code: u64) -> Self {
        match code {
            0 => FftSize::Fft8k,
            1 => FftSize::Fft16k,
            2 => FftSize::Fft32k,
            _ => FftSize::Reserved(code as u8),
        }
    }
}

impl fmt::Display for FftSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FftSize::Fft8k => write!(f, "8K"),
            FftSize::Fft16k => write!(f, "16K"),
            FftSize::Fft32k => write!(f, "32K"),
            FftSize::Reserved(_) => write!(f, "Reserved"),
        }
    }
}

/// OFDM guard interval (4-bit code). The sample count is part of the name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardInterval {
    Gi1_192,
    Gi2_384,
    Gi3_512,
    Gi4_768,
    Gi5_1024,
    Gi6_1536,
    Gi7_2048,
    Gi8_2432,
    Gi9_3072,
    Gi10_3648,
    Gi11_4096,
    Gi12_4864,
    Reserved(u8),
}

impl GuardInterval {
    pub fn from_code(code: u64) -> Self {
        match code {
            1 => GuardInterval::Gi1_192,
            2 => GuardInterval::Gi2_384,
            3 => GuardInterval::Gi3_512,
            4 => GuardInterval::Gi4_768,
            5 => GuardInterval::Gi5_1024,
            6 => GuardInterval::Gi6_1536,
            7 => GuardInterval::Gi7_2048,
            8 => GuardInterval::Gi8_2432,
            9 => GuardInterval::Gi9_3072,
            10 => GuardInterval::Gi10_3648,
            11 => GuardInterval::Gi11_4096,
            12 => GuardInterval::Gi12_4864,
            _ => GuardInterval::Reserved(code as u8),
        }
    }
}

impl fmt::Display for GuardInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GuardInterval::Gi1_192 => write!(f, "GI_1_192"),
            GuardInterval::Gi2_384 => write!(f, "GI_2_384"),
            GuardInterval::Gi3_512 => write!(f, "GI_3_512"),
            GuardInterval::Gi4_768 => write!(f, "GI_4_768"),
            GuardInterval::Gi5_1024 => write!(f, "GI_5_1024"),
            GuardInterval::Gi6_1536 => write!(f, "GI_6_1536"),
            GuardInterval::Gi7_2048 => write!(f, "GI_7_2048"),
            GuardInterval::Gi8_2432 => write!(f, "GI_8_2432"),
            GuardInterval::Gi9_3072 => write!(f, "GI_9_3072"),
            GuardInterval::Gi10_3648 => write!(f, "GI_10_3648"),
            GuardInterval::Gi11_4096 => write!(f, "GI_11_4096"),
            GuardInterval::Gi12_4864 => write!(f, "GI_12_4864"),
            GuardInterval::Reserved(code) => write!(f, "Reserved ({})", code),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fft_size_labels() {
        assert_eq!(FftSize::from_code(0).to_string(), "8K");
        assert_eq!(FftSize::from_code(2).to_string(), "32K");
        assert_eq!(FftSize::from_code(3).to_string(), "Reserved");
    }

    #[test]
    fn test_guard_interval_labels() {
        assert_eq!(GuardInterval::from_code(1).to_string(), "GI_1_192");
        assert_eq!(GuardInterval::from_code(12).to_string(), "GI_12_4864");
        assert_eq!(GuardInterval::from_code(0).to_string(), "Reserved (0)");
        assert_eq!(GuardInterval::from_code(15).to_string(), "Reserved (15)");
    }
}
