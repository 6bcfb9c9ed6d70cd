//! ATSC 3.0 ModCod to required-SNR lookup.
//!
//! The table pairs every (modulation, code rate) combination with the
//! receive SNR window it needs for reliable decoding. Values originate from
//! laboratory ModCod measurements for A/322 transmissions.

/// One (modulation, code rate) row with its required receive SNR window.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModcodSnr {
    pub modulation: &'static str,
    pub code_rate: &'static str,
    pub min_snr: f32,
    pub max_snr: f32,
}

const fn row(modulation: &'static str, code_rate: &'static str, min_snr: f32, max_snr: f32) -> ModcodSnr {
    ModcodSnr {
        modulation,
        code_rate,
        min_snr,
        max_snr,
    }
}

/// Required-SNR table covering the full ATSC 3.0 ModCod space.
static SNR_TABLE: [ModcodSnr; 72] = [
    row("QPSK", "2/15", -6.23, -5.06),
    row("QPSK", "3/15", -4.32, -2.97),
    row("QPSK", "4/15", -2.89, -1.36),
    row("QPSK", "5/15", -1.7, -0.08),
    row("QPSK", "6/15", -0.54, 1.15),
    row("QPSK", "7/15", 0.3, 2.3),
    row("QPSK", "8/15", 1.16, 3.44),
    row("QPSK", "9/15", 1.97, 4.7),
    row("QPSK", "10/15", 2.77, 5.97),
    row("QPSK", "11/15", 3.6, 7.46),
    row("QPSK", "12/15", 4.49, 9.15),
    row("QPSK", "13/15", 5.53, 11.56),
    row("16QAM", "2/15", -2.73, -1.14),
    row("16QAM", "3/15", -0.25, 1.45),
    row("16QAM", "4/15", 1.46, 3.41),
    row("16QAM", "5/15", 2.82, 4.78),
    row("16QAM", "6/15", 4.21, 6.27),
    row("16QAM", "7/15", 5.21, 7.58),
    row("16QAM", "8/15", 6.3, 8.96),
    row("16QAM", "9/15", 7.32, 10.28),
    row("16QAM", "10/15", 8.36, 11.73),
    row("16QAM", "11/15", 9.5, 13.22),
    row("16QAM", "12/15", 10.57, 14.97),
    row("16QAM", "13/15", 11.83, 17.44),
    row("64QAM", "2/15", -0.26, 1.6),
    row("64QAM", "3/15", 2.27, 4.3),
    row("64QAM", "4/15", 4.07, 6.22),
    row("64QAM", "5/15", 5.5, 7.74),
    row("64QAM", "6/15", 6.96, 9.31),
    row("64QAM", "7/15", 8.01, 10.65),
    row("64QAM", "8/15", 9.11, 12.03),
    row("64QAM", "9/15", 10.15, 13.34),
    row("64QAM", "10/15", 11.21, 14.77),
    row("64QAM", "11/15", 12.38, 16.23),
    row("64QAM", "12/15", 13.48, 17.95),
    row("64QAM", "13/15", 14.75, 20.37),
    row("256QAM", "2/15", 2.37, 4.21),
    row("256QAM", "3/15", 5.0, 7.0),
    row("256QAM", "4/15", 6.88, 8.99),
    row("256QAM", "5/15", 8.35, 10.55),
    row("256QAM", "6/15", 9.85, 12.15),
    row("256QAM", "7/15", 10.93, 13.51),
    row("256QAM", "8/15", 12.05, 14.9),
    row("256QAM", "9/15", 13.1, 16.2),
    row("256QAM", "10/15", 14.18, 17.61),
    row("256QAM", "11/15", 15.35, 19.05),
    row("256QAM", "12/15", 16.45, 20.73),
    row("256QAM", "13/15", 17.72, 23.1),
    row("1024QAM", "2/15", 4.97, 6.81),
    row("1024QAM", "3/15", 7.69, 9.7),
    row("1024QAM", "4/15", 9.61, 11.75),
    row("1024QAM", "5/15", 11.12, 13.34),
    row("1024QAM", "6/15", 12.65, 14.97),
    row("1024QAM", "7/15", 13.75, 16.35),
    row("1024QAM", "8/15", 14.89, 17.75),
    row("1024QAM", "9/15", 15.95, 19.06),
    row("1024QAM", "10/15", 17.03, 20.46),
    row("1024QAM", "11/15", 18.2, 21.9),
    row("1024QAM", "12/15", 19.31, 23.55),
    row("1024QAM", "13/15", 20.58, 25.88),
    row("4096QAM", "2/15", 7.58, 9.41),
    row("4096QAM", "3/15", 10.38, 12.4),
    row("4096QAM", "4/15", 12.34, 14.45),
    row("4096QAM", "5/15", 13.88, 16.07),
    row("4096QAM", "6/15", 15.44, 17.72),
    row("4096QAM", "7/15", 16.56, 19.11),
    row("4096QAM", "8/15", 17.72, 20.52),
    row("4096QAM", "9/15", 18.79, 21.84),
    row("4096QAM", "10/15", 19.88, 23.25),
    row("4096QAM", "11/15", 21.05, 24.69),
    row("4096QAM", "12/15", 22.16, 26.34),
    row("4096QAM", "13/15", 23.43, 28.62),
];

/// Normalize a device-reported modulation string to table form.
///
/// Devices report e.g. `qam256` where the table uses `256QAM`: digits come
/// first, letters are upper-cased, anything else is dropped.
pub fn normalize_modulation(raw: &str) -> String {
    let mut digits = String::new();
    let mut alphas = String::new();
    for ch in raw.chars() {
        if ch.is_ascii_digit() {
            digits.push(ch);
        } else if ch.is_ascii_alphabetic() {
            alphas.push(ch.to_ascii_uppercase());
        }
    }
    digits + &alphas
}

/// Exact-match lookup over the static table.
///
/// A miss returns `None` and renders as an omitted annotation, never an
/// error.
pub fn snr_for_modcod(modulation: &str, code_rate: &str) -> Option<&'static ModcodSnr> {
    SNR_TABLE
        .iter()
        .find(|entry| entry.modulation == modulation && entry.code_rate == code_rate)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_modulation() {
        assert_eq!(normalize_modulation("qam256"), "256QAM");
        assert_eq!(normalize_modulation("QPSK"), "QPSK");
        assert_eq!(normalize_modulation("1024qam"), "1024QAM");
        assert_eq!(normalize_modulation("qam-64"), "64QAM");
    }

    #[test]
    fn test_lookup_hit() {
        let entry = snr_for_modcod("256QAM", "2/15").unwrap();
        assert_eq!(entry.min_snr, 2.37);
        assert_eq!(entry.max_snr, 4.21);
    }

    #[test]
    fn test_lookup_miss() {
        assert!(snr_for_modcod("2048QAM", "1/15").is_none());
        assert!(snr_for_modcod("256QAM", "14/15").is_none());
        // The raw device spelling misses until normalized.
        assert!(snr_for_modcod("qam256", "2/15").is_none());
        assert!(snr_for_modcod(&normalize_modulation("qam256"), "2/15").is_some());
    }

    #[test]
    fn test_table_is_complete() {
        for modulation in ["QPSK", "16QAM", "64QAM", "256QAM", "1024QAM", "4096QAM"] {
            for numerator in 2..=13 {
                let code_rate = format!("{}/15", numerator);
                assert!(
                    snr_for_modcod(modulation, &code_rate).is_some(),
                    "missing {} {}",
                    modulation,
                    code_rate
                );
            }
        }
    }
}
