use anyhow::{Context, Result};
use clap::error::ErrorKind;
use clap::Parser;
use food_image_generator::models::Config;
use food_image_generator::ImageGenerator;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const USAGE: &str = "Usage:   food-image-generator '<dish name>' '<output path>'
Example: food-image-generator 'cheese omelette roll' ./omelette.png";

#[derive(Debug, Parser)]
#[command(name = "food-image-generator", version)]
#[command(about = "Generate a food photo for a dish with Gemini")]
struct CliArgs {
    /// Dish to depict. May start with `-`.
    #[arg(value_name = "DISH", allow_hyphen_values = true)]
    dish: String,

    /// Where to write the image. The parent directory must already exist.
    #[arg(value_name = "OUTPUT_PATH", allow_hyphen_values = true)]
    output: PathBuf,

    /// Extra positional arguments are accepted and ignored.
    #[arg(hide = true, trailing_var_arg = true, allow_hyphen_values = true)]
    ignored: Vec<String>,

    /// Image model to use instead of GEMINI_IMAGE_MODEL.
    #[arg(long)]
    model: Option<String>,
}

async fn run(args: CliArgs) -> Result<bool> {
    let mut config = Config::from_env().context("Failed to load configuration")?;
    if let Some(model) = args.model {
        config.image_model = model;
    }

    let generator = ImageGenerator::from_config(&config);
    Ok(generator.generate(&args.dish, &args.output).await)
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = match CliArgs::try_parse() {
        Ok(args) => args,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            let _ = e.print();
            return ExitCode::SUCCESS;
        }
        Err(_) => {
            println!("{}", USAGE);
            return ExitCode::FAILURE;
        }
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "food_image_generator=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    match run(args).await {
        Ok(true) => {
            info!("Generation completed successfully");
            ExitCode::SUCCESS
        }
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}
