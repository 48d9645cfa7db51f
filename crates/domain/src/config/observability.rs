use serde::{Deserialize, Serialize};

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Trace export
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// `[observability]`: optional OTLP export of the relay's spans
/// (`conversation`, remote calls, HTTP requests). JSON logs are written
/// either way.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObservabilityConfig {
    /// OTLP/gRPC collector, e.g. `http://localhost:4317`. Unset or blank
    /// disables export.
    #[serde(default)]
    pub otlp_endpoint: Option<String>,
    #[serde(default = "d_service_name")]
    pub service_name: String,
    /// Fraction of traces exported, `0.0..=1.0`.
    #[serde(default = "d_sample_rate")]
    pub sample_rate: f64,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            otlp_endpoint: None,
            service_name: d_service_name(),
            sample_rate: d_sample_rate(),
        }
    }
}

impl ObservabilityConfig {
    /// The collector endpoint, if export is enabled.
    pub fn export_endpoint(&self) -> Option<&str> {
        self.otlp_endpoint
            .as_deref()
            .map(str::trim)
            .filter(|e| !e.is_empty())
    }

    /// `sample_rate` clamped into the range the trace-id ratio sampler
    /// accepts. NaN samples nothing.
    pub fn sampling_ratio(&self) -> f64 {
        if self.sample_rate.is_nan() {
            0.0
        } else {
            self.sample_rate.clamp(0.0, 1.0)
        }
    }
}

fn d_service_name() -> String {
    "assist-relay".into()
}

fn d_sample_rate() -> f64 {
    1.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_rate(sample_rate: f64) -> ObservabilityConfig {
        ObservabilityConfig {
            sample_rate,
            ..ObservabilityConfig::default()
        }
    }

    #[test]
    fn export_is_off_by_default() {
        assert_eq!(ObservabilityConfig::default().export_endpoint(), None);
    }

    #[test]
    fn blank_endpoint_disables_export() {
        let cfg: ObservabilityConfig = toml::from_str(r#"otlp_endpoint = "   ""#).unwrap();
        assert_eq!(cfg.export_endpoint(), None);

        let cfg: ObservabilityConfig =
            toml::from_str(r#"otlp_endpoint = " http://otel:4317 ""#).unwrap();
        assert_eq!(cfg.export_endpoint(), Some("http://otel:4317"));
    }

    #[test]
    fn sampling_ratio_stays_in_range() {
        assert_eq!(with_rate(0.25).sampling_ratio(), 0.25);
        assert_eq!(with_rate(-1.0).sampling_ratio(), 0.0);
        assert_eq!(with_rate(7.5).sampling_ratio(), 1.0);
        assert_eq!(with_rate(f64::NAN).sampling_ratio(), 0.0);
    }
}
