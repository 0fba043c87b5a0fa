use prometheus::{Encoder, HistogramVec, IntCounterVec, IntGauge, Opts, Registry, TextEncoder};

#[derive(Clone)]
pub struct Metrics {
    registry: Registry,
    pub bookings_total: IntCounterVec,
    pub submission_latency_seconds: HistogramVec,
    pub forms_mounted: IntGauge,
}

impl Metrics {
    pub fn new() -> Self {
        let registry = Registry::new();

        let bookings_total = IntCounterVec::new(
            Opts::new("bookings_total", "Total submit attempts by outcome"),
            &["outcome"],
        )
        .expect("valid bookings_total metric");

        let submission_latency_seconds = HistogramVec::new(
            prometheus::HistogramOpts::new(
                "submission_latency_seconds",
                "Latency of submit attempts in seconds",
            ),
            &["outcome"],
        )
        .expect("valid submission_latency_seconds metric");

        let forms_mounted = IntGauge::new("forms_mounted", "Current number of mounted booking forms")
            .expect("valid forms_mounted metric");

        registry
            .register(Box::new(bookings_total.clone()))
            .expect("register bookings_total");
        registry
            .register(Box::new(submission_latency_seconds.clone()))
            .expect("register submission_latency_seconds");
        registry
            .register(Box::new(forms_mounted.clone()))
            .expect("register forms_mounted");

        Self {
            registry,
            bookings_total,
            submission_latency_seconds,
            forms_mounted,
        }
    }

    pub fn record_submission(&self, outcome: &str, elapsed_secs: f64) {
        self.bookings_total.with_label_values(&[outcome]).inc();
        self.submission_latency_seconds
            .with_label_values(&[outcome])
            .observe(elapsed_secs);
    }

    pub fn encode(&self) -> Result<String, String> {
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();

        TextEncoder::new()
            .encode(&metric_families, &mut buffer)
            .map_err(|err| format!("failed to encode metrics: {err}"))?;

        String::from_utf8(buffer).map_err(|err| format!("metrics are not valid utf8: {err}"))
    }
}
