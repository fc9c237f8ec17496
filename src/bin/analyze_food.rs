//! Analyze a meal photo from the command line
//!
//! Prints the energy estimate, the detected food items and the dietary advice.

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use eatwise::config::ModelConfig;
use eatwise::llm::HttpModelClient;
use eatwise::models::HealthProfile;
use eatwise::nutrition::EnergyEstimate;
use eatwise::tools::advice::FoodAdvisor;

#[derive(Parser)]
#[command(
    name = "analyze-food",
    about = "Should I eat this?",
    long_about = "Detect the food items in a JPEG or PNG meal photo and get dietary advice for your health details"
)]
struct Args {
    /// Meal photo (JPEG or PNG)
    #[arg(long)]
    image: PathBuf,

    /// Age in years
    #[arg(long)]
    age: u32,

    /// Height in centimeters
    #[arg(long)]
    height: f64,

    /// Current weight in kilograms
    #[arg(long)]
    weight: f64,

    /// Target weight in kilograms
    #[arg(long)]
    target_weight: f64,

    /// Months to reach the target weight
    #[arg(long)]
    time_plan: f64,

    /// Also write the energy chart to this PNG file
    #[arg(long)]
    chart: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(long, short = 'v')]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let level = if args.verbose { "eatwise=debug" } else { "eatwise=warn" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(level.parse()?))
        .with_writer(std::io::stderr)
        .init();

    let profile = HealthProfile::new(args.age, args.height, args.weight, args.target_weight, args.time_plan);
    let estimate = EnergyEstimate::from_profile(&profile)?;

    println!("Energy estimate");
    println!("  BMR:                  {:.1} kcal/day", estimate.bmr);
    println!("  Maintenance calories: {:.1} kcal/day", estimate.maintenance_calories);
    println!("  Caloric deficit:      {:.1} kcal/day", estimate.caloric_deficit_per_day);

    if let Some(path) = &args.chart {
        let bytes = eatwise::nutrition::write_energy_chart(&estimate, path)?;
        println!("  Chart:                {} ({} bytes)", path.display(), bytes);
    }

    let config = ModelConfig::from_env()?;
    let client = HttpModelClient::new(config.endpoint)?;
    let advisor = FoodAdvisor::new(Arc::new(client), config.settings);

    let image = std::fs::read(&args.image)?;
    let analysis = advisor.analyze_with_detection(&image, &profile).await?;

    println!();
    println!("Detected food items");
    for item in &analysis.detection.items {
        println!("  - {}", item);
    }
    println!();
    println!("Dietary advice");
    println!("{}", analysis.advice);

    Ok(())
}
