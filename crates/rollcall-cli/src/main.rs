use anyhow::Result;
use clap::{Parser, Subcommand};
use rollcall_client::{AttendancePipeline, Config, HttpRecognitionClient};
use rollcall_core::capability::{Notice, Notifier, PhotoSource, Severity};
use rollcall_core::types::{AttendanceResult, PersonIdentity};
use rollcall_hw::{Camera, FileSource};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "rollcall", about = "Face-recognition attendance client")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Enroll a person with the attendance backend
    Enroll {
        #[arg(short = 'f', long)]
        first_name: String,
        #[arg(short = 'l', long)]
        last_name: String,
        /// Submit an image file instead of capturing from the camera
        #[arg(long)]
        photo: Option<PathBuf>,
    },
    /// Capture a photo and check attendance
    Recognize {
        /// Submit an image file instead of capturing from the camera
        #[arg(long)]
        photo: Option<PathBuf>,
        /// Write the annotated image returned by the backend here
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// List available camera devices
    Devices,
}

/// Prints notifications to the terminal: successes to stdout, errors to
/// stderr. Duration and position are hints for richer front ends.
struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn notify(&self, notice: &Notice) {
        match notice.severity {
            Severity::Success => println!("{}", notice.message),
            Severity::Error => eprintln!("{}", notice.message),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let config = Config::from_env();

    match cli.command {
        Commands::Enroll {
            first_name,
            last_name,
            photo,
        } => {
            let pipeline = build_pipeline(&config, photo.as_deref())?;
            let identity = PersonIdentity {
                first_name,
                last_name,
            };
            if pipeline.enroll_flow(&identity).await.is_err() {
                // The notifier already reported; detail is in the log.
                std::process::exit(1);
            }
        }
        Commands::Recognize { photo, output } => {
            let pipeline = build_pipeline(&config, photo.as_deref())?;
            match pipeline.recognize_flow().await {
                Ok(result) => render(&result, output.as_deref())?,
                Err(_) => std::process::exit(1),
            }
        }
        Commands::Devices => {
            let devices = Camera::list_devices();
            if devices.is_empty() {
                println!("No video capture devices found");
            }
            for dev in devices {
                println!("{}  {} ({})", dev.path, dev.name, dev.driver);
            }
        }
    }

    Ok(())
}

fn build_pipeline(
    config: &Config,
    photo: Option<&Path>,
) -> Result<AttendancePipeline<Box<dyn PhotoSource>, HttpRecognitionClient, ConsoleNotifier>> {
    let photos: Box<dyn PhotoSource> = match photo {
        Some(path) => Box::new(FileSource::new(path)),
        None => Box::new(Camera::open(&config.camera_device, config.jpeg_quality)?),
    };
    let api = HttpRecognitionClient::new(config.api_url.clone(), config.http_timeout)?;

    Ok(AttendancePipeline::new(
        photos,
        api,
        ConsoleNotifier,
        config.notice_duration,
    ))
}

fn render(result: &AttendanceResult, output: Option<&Path>) -> Result<()> {
    if result.recognized_faces.is_empty() {
        println!("No known faces recognized");
    }
    for face in &result.recognized_faces {
        let b = &face.bounding_box;
        println!(
            "{:<24} {:>5.1}%  box [top {:.0}, right {:.0}, bottom {:.0}, left {:.0}]{}",
            face.name,
            face.confidence * 100.0,
            b.top,
            b.right,
            b.bottom,
            b.left,
            if face.cropped_image.is_some() {
                ""
            } else {
                "  (crop unavailable)"
            }
        );
    }

    if let Some(path) = output {
        let bytes = result.annotated_image.decode_bytes()?;
        std::fs::write(path, bytes)?;
        println!("Annotated image written to {}", path.display());
    }

    Ok(())
}
