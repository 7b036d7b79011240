//! Status text formatting
//!
//! Turns raw counters and sensor readings into the short strings drawn on
//! the panel. Byte counts use IEC units and never go below KiB.

use core::fmt::Write;

use heapless::String;

/// Maximum length of one formatted status line (bytes)
pub const LINE_LEN: usize = 24;

/// One formatted status line
pub type Line = String<LINE_LEN>;

/// IEC unit prefixes, starting at Ki
pub const IEC_PREFIXES: [char; 6] = ['K', 'M', 'G', 'T', 'P', 'E'];

/// Scale a byte count to IEC units
///
/// Returns the scaled value and its unit prefix. Values below 1 KiB are
/// still expressed in KiB.
pub fn byte_count_iec(bytes: u64) -> (f64, char) {
    const UNIT: u64 = 1024;

    let mut div = UNIT;
    let mut exp = 0;
    let mut n = bytes / UNIT;
    while n >= UNIT {
        div *= UNIT;
        exp += 1;
        n /= UNIT;
    }

    (bytes as f64 / div as f64, IEC_PREFIXES[exp])
}

/// Temperature and relative humidity reading
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Climate {
    /// Temperature (°C)
    pub temperature_c: f32,
    /// Relative humidity (%)
    pub humidity_pct: f32,
}

/// Interface throughput for one tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Throughput {
    /// Bytes received since the previous tick
    pub rx_rate: u64,
    /// Bytes sent since the previous tick
    pub tx_rate: u64,
    /// Bytes received since the interface came up
    pub rx_total: u64,
    /// Bytes sent since the interface came up
    pub tx_total: u64,
}

/// Text handed to the frame renderer
///
/// Rates are drawn right-aligned after a separate arrow glyph; totals
/// carry their arrow inline. Climate lines are absent when the sensor read
/// failed this tick.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StatusText {
    pub rx_rate: Line,
    pub tx_rate: Line,
    pub rx_total: Line,
    pub tx_total: Line,
    pub temperature: Option<Line>,
    pub humidity: Option<Line>,
}

impl StatusText {
    /// Format a status frame
    pub fn new(throughput: &Throughput, climate: Option<&Climate>) -> Self {
        Self {
            rx_rate: format_rate(throughput.rx_rate),
            tx_rate: format_rate(throughput.tx_rate),
            rx_total: format_total('↓', throughput.rx_total),
            tx_total: format_total('↑', throughput.tx_total),
            temperature: climate.map(|c| {
                let mut line = Line::new();
                let _ = write!(line, "{:.1}°C", c.temperature_c);
                line
            }),
            humidity: climate.map(|c| {
                let mut line = Line::new();
                let _ = write!(line, "{:.1}%", c.humidity_pct);
                line
            }),
        }
    }
}

/// Per-second rate, e.g. "12.3 MiB/s"
pub fn format_rate(bytes: u64) -> Line {
    let (value, prefix) = byte_count_iec(bytes);
    let mut line = Line::new();
    let _ = write!(line, "{:.1} {}iB/s", value, prefix);
    line
}

/// Running total, three decimals below 100 and two above
pub fn format_total(arrow: char, bytes: u64) -> Line {
    let (value, prefix) = byte_count_iec(bytes);
    let mut line = Line::new();
    let _ = if value < 100.0 {
        write!(line, "{}{:.3} {}iB", arrow, value, prefix)
    } else {
        write!(line, "{}{:.2} {}iB", arrow, value, prefix)
    };
    line
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_small_counts_stay_in_kib() {
        assert_eq!(byte_count_iec(0), (0.0, 'K'));
        assert_eq!(byte_count_iec(512), (0.5, 'K'));
        assert_eq!(byte_count_iec(1536), (1.5, 'K'));
    }

    #[test]
    fn test_prefix_steps() {
        assert_eq!(byte_count_iec(1024 * 1024), (1.0, 'M'));
        assert_eq!(byte_count_iec(3 * 1024 * 1024 * 1024), (3.0, 'G'));
        assert_eq!(byte_count_iec(u64::MAX).1, 'E');
    }

    #[test]
    fn test_format_rate() {
        assert_eq!(format_rate(1536).as_str(), "1.5 KiB/s");
        assert_eq!(format_rate(5 * 1024 * 1024).as_str(), "5.0 MiB/s");
    }

    #[test]
    fn test_format_total_precision() {
        assert_eq!(format_total('↓', 1536).as_str(), "↓1.500 KiB");
        assert_eq!(format_total('↑', 200 * 1024).as_str(), "↑200.00 KiB");
    }

    #[test]
    fn test_status_text_with_climate() {
        let throughput = Throughput {
            rx_rate: 2048,
            tx_rate: 1024,
            rx_total: 10 * 1024 * 1024,
            tx_total: 1024,
        };
        let climate = Climate {
            temperature_c: 21.44,
            humidity_pct: 45.06,
        };

        let text = StatusText::new(&throughput, Some(&climate));
        assert_eq!(text.rx_rate.as_str(), "2.0 KiB/s");
        assert_eq!(text.tx_rate.as_str(), "1.0 KiB/s");
        assert_eq!(text.rx_total.as_str(), "↓10.000 MiB");
        assert_eq!(text.temperature.as_deref(), Some("21.4°C"));
        assert_eq!(text.humidity.as_deref(), Some("45.1%"));
    }

    #[test]
    fn test_status_text_without_climate() {
        let text = StatusText::new(&Throughput::default(), None);
        assert!(text.temperature.is_none());
        assert!(text.humidity.is_none());
    }
}
