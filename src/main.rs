//! activity-sentry: classify the activity in a video clip and write a
//! captioned copy of the clip.
//!
//! Video decoding, encoding and caption drawing come from OpenCV and are only
//! compiled with the `opencv` feature:
//!
//!     cargo build --release --features opencv
//!
//! Without it the binary still builds (and `logs` / `stats` work), but
//! `predict` exits with "built without video support". The default build and
//! `cargo test` need no system OpenCV; the OpenCV backends and their tests
//! only compile under `--features opencv`.

use activity_classifier::impl_fake::ActivityModelFake;
use activity_classifier::impl_tract_onnx::ActivityModelTractOnnx;
use activity_classifier::interface::ActivityModel;
use alerter::impl_logger::AlerterLogger;
use app::App;
use caption_renderer::interface::CaptionRenderer;
use chrono::{FixedOffset, Utc};
use clap::{Args, Parser, Subcommand, ValueEnum};
use config::{ChannelOrder, Config};
use library::logger::impl_console::LoggerConsole;
use library::logger::impl_tracing::LoggerTracing;
use library::logger::interface::Logger;
use pipeline::main::Pipeline;
use prediction_log::impl_csv::PredictionLogCsv;
use prediction_log::interface::{summarize, PredictionLog};
use std::error::Error;
use std::path::PathBuf;
use std::sync::Arc;
use video_io::interface::{VideoSink, VideoSource};

mod activity_classifier;
mod alerter;
mod app;
mod caption_renderer;
mod config;
mod error;
mod frame_sampler;
mod library;
mod pipeline;
mod prediction_log;
mod video_annotator;
mod video_io;

#[derive(Parser, Debug)]
#[command(name = "activity-sentry")]
#[command(about = "Classify the activity in a video clip and caption the clip with it")]
#[command(version)]
struct Cli {
    /// Log output: plain console lines or tracing events (honours RUST_LOG)
    #[arg(long, value_enum, default_value_t = LoggerKind::Tracing, global = true)]
    logger: LoggerKind,

    /// Prediction history CSV
    #[arg(long, default_value = "prediction_logs.csv", global = true)]
    log_path: PathBuf,

    /// Offset from UTC for log timestamps and history entries
    #[arg(long, default_value_t = 0, allow_negative_numbers = true, global = true)]
    utc_offset_hours: i32,

    #[command(subcommand)]
    command: Command,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum LoggerKind {
    Console,
    Tracing,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Classify a video and write a captioned copy of it
    Predict(PredictArgs),
    /// Print the prediction history
    Logs,
    /// Per-activity counts and confidence from the prediction history
    Stats,
}

#[derive(Args, Debug)]
struct PredictArgs {
    /// Video to classify
    video: PathBuf,

    /// Annotated output (default: output_videos/output_<unix-seconds>.avi)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// ONNX sequence model
    #[arg(long)]
    model: Option<PathBuf>,

    /// Skip the model and use these scores, comma separated, one per class
    #[arg(long, value_delimiter = ',', conflicts_with = "model")]
    fixed_scores: Option<Vec<f32>>,

    #[arg(long)]
    sequence_length: Option<usize>,

    #[arg(long)]
    height: Option<u32>,

    #[arg(long)]
    width: Option<u32>,

    /// Class labels in model output order, comma separated
    #[arg(long, value_delimiter = ',')]
    classes: Option<Vec<String>>,

    /// Labels that raise an alert, comma separated. Empty turns alerts off
    #[arg(long, value_delimiter = ',')]
    alert_on: Option<Vec<String>>,

    #[arg(long, value_enum)]
    channel_order: Option<ChannelOrder>,

    /// Do not append the result to the prediction history
    #[arg(long)]
    no_log: bool,
}

impl PredictArgs {
    fn apply(&self, config: &mut Config) {
        if let Some(model) = &self.model {
            config.model_path = model.clone();
        }
        if let Some(sequence_length) = self.sequence_length {
            config.sequence_length = sequence_length;
        }
        if let Some(height) = self.height {
            config.image_height = height;
        }
        if let Some(width) = self.width {
            config.image_width = width;
        }
        if let Some(classes) = &self.classes {
            config.class_labels = classes.clone();
            // Default alert labels only survive if they are still classes.
            config
                .alert_labels
                .retain(|label| classes.contains(label));
        }
        if let Some(alert_on) = &self.alert_on {
            config.alert_labels = alert_on
                .iter()
                .filter(|label| !label.is_empty())
                .cloned()
                .collect();
        }
        if let Some(channel_order) = self.channel_order {
            config.channel_order = channel_order;
        }
    }
}

struct VideoBackends {
    source: Arc<dyn VideoSource + Send + Sync>,
    sink: Arc<dyn VideoSink + Send + Sync>,
    caption_renderer: Arc<dyn CaptionRenderer + Send + Sync>,
}

#[cfg(feature = "opencv")]
fn video_backends() -> Result<VideoBackends, Box<dyn Error + Send + Sync>> {
    use caption_renderer::impl_opencv::CaptionRendererOpenCv;
    use video_io::impl_opencv::{VideoSinkOpenCv, VideoSourceOpenCv};

    Ok(VideoBackends {
        source: Arc::new(VideoSourceOpenCv),
        sink: Arc::new(VideoSinkOpenCv::default()),
        caption_renderer: Arc::new(CaptionRendererOpenCv),
    })
}

#[cfg(not(feature = "opencv"))]
fn video_backends() -> Result<VideoBackends, Box<dyn Error + Send + Sync>> {
    Err("built without video support; rebuild with `--features opencv`".into())
}

fn main() -> Result<(), Box<dyn Error + Send + Sync>> {
    let cli = Cli::parse();

    let timezone = cli
        .utc_offset_hours
        .checked_mul(3600)
        .and_then(FixedOffset::east_opt)
        .ok_or_else(|| format!("UTC offset {}h is out of range", cli.utc_offset_hours))?;

    let config = Config {
        log_path: cli.log_path.clone(),
        logger_timezone: timezone,
        ..Config::default()
    };

    let logger: Arc<dyn Logger + Send + Sync> = match cli.logger {
        LoggerKind::Console => Arc::new(LoggerConsole::new(timezone)),
        LoggerKind::Tracing => {
            LoggerTracing::init_subscriber("info");
            Arc::new(LoggerTracing::new())
        }
    };

    match cli.command {
        Command::Predict(args) => predict(config, logger, args),
        Command::Logs => {
            let records = PredictionLogCsv::new(&config.log_path).records()?;
            println!("{}", app::render_logs(&records));
            Ok(())
        }
        Command::Stats => {
            let records = PredictionLogCsv::new(&config.log_path).records()?;
            println!("{}", app::render_stats(&summarize(&records)));
            Ok(())
        }
    }
}

fn predict(
    mut config: Config,
    logger: Arc<dyn Logger + Send + Sync>,
    args: PredictArgs,
) -> Result<(), Box<dyn Error + Send + Sync>> {
    args.apply(&mut config);
    config.validate()?;

    let backends = video_backends()?;

    let model: Arc<dyn ActivityModel> = match &args.fixed_scores {
        Some(scores) => Arc::new(ActivityModelFake::new(scores.clone()).with_declared_width()),
        None => {
            let _ = logger.info(&format!("Loading model {}", config.model_path.display()));
            Arc::new(ActivityModelTractOnnx::new(
                &config.model_path,
                config.batch_shape(),
            )?)
        }
    };

    let pipeline = Pipeline::new(
        config.clone(),
        logger.clone(),
        backends.source,
        backends.sink,
        backends.caption_renderer,
        model,
    )?;

    let prediction_log: Option<Arc<dyn PredictionLog>> = if args.no_log {
        None
    } else {
        Some(Arc::new(PredictionLogCsv::new(&config.log_path)))
    };

    let alerter = Arc::new(AlerterLogger::new(logger.clone()));

    let app = App::new(config.clone(), logger, pipeline, prediction_log, alerter);

    let now = Utc::now().with_timezone(&config.logger_timezone);
    let outcome = app.predict(&args.video, args.output.as_deref(), now)?;

    println!("{}", app::render_outcome(&outcome));

    Ok(())
}
