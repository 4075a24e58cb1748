use std::path::PathBuf;
use std::thread;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};

use clip_waveform_core::{
    CaptureConfiguration, CaptureSession, DeviceCapabilityResolver, PixelBuffer, Rgba, ToggleOutcome, Visualizer,
    WaveformRenderer,
};
use clip_waveform_cpal::{CpalCaptureBackend, CpalDeviceCatalog};

/// Record a short microphone clip and draw its waveform.
#[derive(Parser)]
#[command(name = "waveform-probe", version)]
struct Cli {
    /// JSON configuration file (max duration, candidate rates, render target)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List input devices and the sample rates offered for each
    Devices,

    /// Record a clip, render it and print a summary
    Record {
        /// Input device name (default: first device)
        #[arg(long)]
        device: Option<String>,

        /// Sample rate in Hz (default: lowest offered rate)
        #[arg(long)]
        rate: Option<u32>,

        /// Seconds to record before stopping
        #[arg(long, default_value_t = 3)]
        seconds: u32,

        /// Override the render target width
        #[arg(long)]
        width: Option<u32>,

        /// Override the render target height
        #[arg(long)]
        height: Option<u32>,

        /// Print the rendered image as text
        #[arg(long)]
        ascii: bool,
    },
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let config = load_config(cli.config.as_ref())?;

    match cli.command {
        Command::Devices => list_devices(&config),
        Command::Record {
            device,
            rate,
            seconds,
            width,
            height,
            ascii,
        } => {
            let mut config = config;
            if let Some(width) = width {
                config.target.width = width;
            }
            if let Some(height) = height {
                config.target.height = height;
            }
            record(&config, device.as_deref(), rate, seconds, ascii)
        }
    }
}

fn load_config(path: Option<&PathBuf>) -> Result<CaptureConfiguration> {
    let Some(path) = path else {
        return Ok(CaptureConfiguration::default());
    };
    let json = std::fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
    Ok(CaptureConfiguration::from_json(&json)?)
}

fn list_devices(config: &CaptureConfiguration) -> Result<()> {
    let catalog = CpalDeviceCatalog::new();
    let default_name = catalog.default_device_name();
    let resolver = DeviceCapabilityResolver::new(catalog);

    let devices = resolver.enumerate()?;
    if devices.is_empty() {
        println!("no input devices found");
        return Ok(());
    }

    for name in devices {
        let marker = if default_name.as_deref() == Some(name.as_str()) { "*" } else { " " };
        match resolver.offered_rates(&name, &config.candidate_sample_rates) {
            Ok(rates) => println!("{} {} {:?}", marker, name, rates),
            Err(e) => println!("{} {} (unavailable: {})", marker, name, e),
        }
    }
    Ok(())
}

fn record(
    config: &CaptureConfiguration,
    device: Option<&str>,
    rate: Option<u32>,
    seconds: u32,
    ascii: bool,
) -> Result<()> {
    let resolver = DeviceCapabilityResolver::new(CpalDeviceCatalog::new());
    let session = CaptureSession::new(CpalCaptureBackend::new(), config);
    let renderer = WaveformRenderer::new(config.target, config.style);
    let mut visualizer = Visualizer::new(session, renderer, &resolver, &config.candidate_sample_rates)?;

    if let Some(name) = device {
        let index = visualizer
            .devices()
            .iter()
            .position(|option| option.name == name)
            .with_context(|| format!("no input device named '{}'", name))?;
        visualizer.select_device(index)?;
    }
    if let Some(rate) = rate {
        let offered = visualizer.selected_device().map(|o| o.rates.clone()).unwrap_or_default();
        let Some(index) = offered.iter().position(|&r| r == rate) else {
            bail!("{} Hz is not offered; choose one of {:?}", rate, offered);
        };
        visualizer.select_rate(index)?;
    }

    let seconds = seconds.clamp(1, config.max_duration_secs);
    if let ToggleOutcome::Started { device, sample_rate } = visualizer.toggle()? {
        println!("recording {}s from '{}' at {} Hz", seconds, device, sample_rate);
    }

    thread::sleep(Duration::from_secs(u64::from(seconds)));

    let ToggleOutcome::Stopped { clip, image } = visualizer.toggle()? else {
        bail!("recorder did not stop");
    };

    println!(
        "captured {} frames x {} channel(s) at {} Hz ({:.2}s)",
        clip.frame_count(),
        clip.channel_count(),
        clip.sample_rate(),
        clip.duration().as_secs_f64()
    );
    println!("rendered {}x{} waveform", image.width(), image.height());

    if ascii {
        print!("{}", to_ascii(&image, config.style.foreground));
    }
    Ok(())
}

fn to_ascii(image: &PixelBuffer, foreground: Rgba) -> String {
    let mut out = String::with_capacity(image.len() + image.height() as usize);
    for row in image.rows_top_down() {
        out.extend(row.iter().map(|&p| if p == foreground { '#' } else { '.' }));
        out.push('\n');
    }
    out
}
