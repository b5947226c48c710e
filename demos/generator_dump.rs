//! Dump a generator's output in every encoding, then compose the report.
//!
//! Run with: cargo run --example generator_dump

use seqdump::{
    dump_generated, save_checkpoint, send_report, AttachmentManifest, Checkpoint, DumpOptions,
    Error, Generator, Nested, Report, ReportConfig, Result, TrainingSettings, Transport,
};
use std::path::Path;

/// Stand-in for a trained generator: a 16-bit linear congruential sequence.
struct Lcg {
    state: u32,
    width: usize,
}

impl Generator for Lcg {
    fn generate(&mut self, count: usize, bound: f64) -> Result<Nested> {
        let mut rows = Vec::with_capacity(count);
        for _ in 0..count {
            let row: Vec<f64> = (0..self.width)
                .map(|_| {
                    self.state = self.state.wrapping_mul(1_103_515_245).wrapping_add(12_345);
                    f64::from(self.state >> 16) % bound
                })
                .collect();
            rows.push(row);
        }
        Ok(Nested::from(rows))
    }
}

impl Checkpoint for Lcg {
    fn save(&self, path: &Path) -> Result<()> {
        std::fs::write(path, self.state.to_be_bytes()).map_err(|e| Error::io(&e.to_string()))
    }
}

/// Prints the report instead of submitting it.
struct Stdout;

impl Transport for Stdout {
    fn send(&mut self, config: &ReportConfig, report: &Report) -> Result<()> {
        println!("To: {} via {}:{}", report.recipient, config.smtp.host, config.smtp.port);
        println!("Subject: {}\nDate: {}\n", report.subject, report.date_header());
        println!("{}", report.body);
        for attachment in &report.attachments {
            println!("  [attached] {} ({} bytes)", attachment.file_name, attachment.content.len());
        }
        Ok(())
    }
}

fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("seqdump=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let output = std::env::temp_dir().join("seqdump-demo");
    let sequences = output.join("sequences");
    std::fs::create_dir_all(&sequences)?;

    let mut jerry = Lcg { state: 7, width: 8 };

    for (name, options) in [
        ("jerry.txt", DumpOptions::hex16()),
        ("jerry_bin.txt", DumpOptions::binary(16)),
        ("jerry_f32.txt", DumpOptions::float32().concatenated()),
    ] {
        let written = dump_generated(&mut jerry, 4, 65_536.0, sequences.join(name), &options)?;
        println!("{}: {} tokens ({})", name, written, options.encoding);
    }

    let checkpoint = save_checkpoint(&jerry, &output, "jerry.h5")?;
    println!("checkpoint: {}\n", checkpoint.display());

    let manifest: AttachmentManifest = [
        ("jerry.h5", "saved_models"),
        ("jerry.txt", "sequences"),
        ("jerry_bin.txt", "sequences"),
        ("jerry_f32.txt", "sequences"),
        ("jerry.png", "model_graphs"),
    ]
    .into_iter()
    .collect();

    let config = ReportConfig::new("lab@example.org", "me@example.org")
        .with_output_directory(&output)
        .with_manifest(manifest);

    let report = send_report(&config, &TrainingSettings::new(2048, 400, 5, 2), &mut Stdout)?;
    println!("\nmissing: {:?}", report.missing);

    Ok(())
}
