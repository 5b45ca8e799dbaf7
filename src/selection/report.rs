//! Per-pass summary

use crate::batch::BatchWindow;
use serde::Serialize;
use std::time::Duration;

/// What one selection pass did
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PassReport {
    pub window: BatchWindow,

    /// Points appended by this pass
    pub admitted: u32,

    /// Output count after the pass (includes earlier passes into the same buffer)
    pub total_count: u32,

    #[serde(serialize_with = "serialize_millis")]
    pub elapsed: Duration,
}

impl PassReport {
    /// Input points processed per millisecond
    pub fn throughput_points_per_ms(&self) -> f64 {
        let millis = self.elapsed.as_secs_f64() * 1000.0;
        if millis <= 0.0 {
            return 0.0;
        }
        self.window.size as f64 / millis
    }

    /// Share of the window that survived selection
    pub fn admission_ratio(&self) -> f64 {
        if self.window.size == 0 {
            return 0.0;
        }
        self.admitted as f64 / self.window.size as f64
    }
}

fn serialize_millis<S: serde::Serializer>(elapsed: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_f64(elapsed.as_secs_f64() * 1000.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_throughput_and_ratio() {
        let report = PassReport {
            window: BatchWindow::new(0, 1_000_000),
            admitted: 250_000,
            total_count: 250_000,
            elapsed: Duration::from_millis(4),
        };
        assert!((report.throughput_points_per_ms() - 250_000.0).abs() < 1e-3);
        assert!((report.admission_ratio() - 0.25).abs() < 1e-12);

        let json = serde_json::to_value(report).expect("serializable");
        assert_eq!(json["admitted"], 250_000);
        assert_eq!(json["elapsed"], 4.0);
        assert_eq!(json["window"]["size"], 1_000_000);
    }

    #[test]
    fn test_zero_duration_has_no_throughput() {
        let report = PassReport {
            window: BatchWindow::new(0, 10),
            admitted: 0,
            total_count: 0,
            elapsed: Duration::ZERO,
        };
        assert_eq!(report.throughput_points_per_ms(), 0.0);
    }
}
