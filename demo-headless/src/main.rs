use anyhow::{Context, Result};
use clap::Parser;
use std::io::Write;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing::info;
use tracing_subscriber::EnvFilter;
use weather_sim_core::{
    Celsius, SimulationConfig, Subscriber, SubscriberError, WeatherCondition, WeatherSample,
    WeatherSimulationEngine,
};

/// Synthetic weather stream demo with configurable parameters
#[derive(Parser, Debug)]
#[command(name = "weather-demo")]
#[command(about = "Headless synthetic weather stream", long_about = None)]
struct Args {
    /// First simulated day (YYYY-MM-DD), stream starts at midnight
    #[arg(short, long, default_value = "2025-06-01")]
    start_date: String,

    /// Simulated minutes between samples
    #[arg(short, long, default_value_t = 60)]
    interval: u32,

    /// Number of samples to generate
    #[arg(short = 'n', long, default_value_t = 48)]
    steps: usize,

    /// Seed for a reproducible stream
    #[arg(long)]
    seed: Option<u64>,

    /// Real milliseconds to wait between samples (0 = as fast as possible)
    #[arg(short, long, default_value_t = 0)]
    pace_ms: u64,

    /// Emit JSON lines instead of text
    #[arg(long)]
    json: bool,
}

/// Prints one text line per sample
struct ConsoleSubscriber;

impl Subscriber for ConsoleSubscriber {
    fn on_sample(&self, sample: &WeatherSample) -> Result<(), SubscriberError> {
        let mut out = std::io::stdout().lock();
        writeln!(
            out,
            "{}  {:>7}  precip {:>4}  {}",
            sample.timestamp().format("%Y-%m-%d %H:%M"),
            sample.temperature().to_string(),
            sample.precipitation_probability().to_string(),
            sample.condition()
        )?;
        Ok(())
    }

    fn name(&self) -> &str {
        "console"
    }
}

/// Prints one JSON object per sample
struct JsonLinesSubscriber;

impl Subscriber for JsonLinesSubscriber {
    fn on_sample(&self, sample: &WeatherSample) -> Result<(), SubscriberError> {
        let mut out = std::io::stdout().lock();
        serde_json::to_writer(&mut out, sample).map_err(std::io::Error::from)?;
        writeln!(out)?;
        Ok(())
    }

    fn name(&self) -> &str {
        "json-lines"
    }
}

/// Running summary of the stream, reported at exit
#[derive(Default)]
struct Summary {
    samples: usize,
    min: Option<Celsius>,
    max: Option<Celsius>,
    conditions: [usize; 5],
}

#[derive(Default)]
struct SummarySubscriber(Mutex<Summary>);

impl Subscriber for SummarySubscriber {
    fn on_sample(&self, sample: &WeatherSample) -> Result<(), SubscriberError> {
        let mut summary = self
            .0
            .lock()
            .map_err(|e| SubscriberError::Rejected(e.to_string()))?;
        let t = sample.temperature();
        summary.samples += 1;
        summary.min = Some(summary.min.map_or(t, |m| m.min(t)));
        summary.max = Some(summary.max.map_or(t, |m| m.max(t)));
        if let Some(i) = WeatherCondition::ALL
            .iter()
            .position(|c| *c == sample.condition())
        {
            summary.conditions[i] += 1;
        }
        Ok(())
    }

    fn name(&self) -> &str {
        "summary"
    }
}

impl SummarySubscriber {
    fn report(&self) {
        let Ok(summary) = self.0.lock() else {
            return;
        };
        eprintln!("\n=== Stream Summary ===");
        eprintln!("Samples: {}", summary.samples);
        if let (Some(min), Some(max)) = (summary.min, summary.max) {
            eprintln!("Temperature: {min} .. {max}");
        }
        for (condition, count) in WeatherCondition::ALL.iter().zip(summary.conditions) {
            eprintln!("  {condition:<12} {count}");
        }
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let config = SimulationConfig {
        start_date: args.start_date,
        interval_minutes: args.interval,
        seed: args.seed,
    };
    let mut engine =
        WeatherSimulationEngine::from_config(&config).context("Failed to create simulation")?;

    let output: Arc<dyn Subscriber> = if args.json {
        Arc::new(JsonLinesSubscriber)
    } else {
        Arc::new(ConsoleSubscriber)
    };
    let summary = Arc::new(SummarySubscriber::default());
    engine.subscribe(output);
    engine.subscribe(summary.clone());

    info!(
        "Streaming {} samples every {} simulated minutes",
        args.steps, args.interval
    );

    // Pacing loop: the engine never sleeps on its own
    for _ in 0..args.steps {
        engine.step().context("Simulation step failed")?;
        if args.pace_ms > 0 {
            std::thread::sleep(Duration::from_millis(args.pace_ms));
        }
    }

    if engine.notification_failures() > 0 {
        eprintln!(
            "Warning: {} sample deliveries failed",
            engine.notification_failures()
        );
    }
    summary.report();

    Ok(())
}
