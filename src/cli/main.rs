use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use clap::{Parser, Subcommand};
use tracing::info;

use mathreasoner::{BenchmarkCatalog, Category, Difficulty};

mod telemetry;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Catalog document to load instead of the built-in catalog
    #[arg(short, long, global = true, env = "MATHBENCH_CATALOG")]
    file: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print per-category counts, points and weights
    Summary,
    /// List problems, one per line
    List {
        /// Only list problems of this difficulty
        #[arg(short, long)]
        difficulty: Option<Difficulty>,
    },
    /// Print the prompt of a single problem
    Show {
        /// Problem id, e.g. V1
        id: String,
        /// Also print the expected answer
        #[arg(long)]
        with_expected: bool,
    },
    /// Write the catalog as a JSON document
    Export {
        #[arg(short, long, default_value = "mathreasoner_catalog.json")]
        output: PathBuf,
    },
    /// Check a catalog document against the schema
    Validate {
        /// Catalog document to check
        path: PathBuf,
    },
}

fn load_catalog(file: Option<&Path>) -> Result<BenchmarkCatalog> {
    let catalog = match file {
        Some(path) => BenchmarkCatalog::load_from_file(path)
            .with_context(|| format!("Failed to load catalog from {}", path.display()))?,
        None => BenchmarkCatalog::builtin().context("Built-in catalog is malformed")?,
    };
    info!(
        catalog = catalog.name(),
        version = catalog.version(),
        problems = catalog.len(),
        "catalog ready"
    );
    Ok(catalog)
}

fn print_summary(catalog: &BenchmarkCatalog) {
    let metrics = catalog.evaluation_metrics();
    let criteria = catalog.scoring_criteria();

    println!("Benchmark: {} {}", catalog.name(), catalog.version());
    if !catalog.description().is_empty() {
        println!("{}", catalog.description());
    }
    println!("Total Problems: {}", catalog.len());
    println!(
        "Overall Score: max {} points, passing threshold {}",
        metrics.overall_score.max_points, metrics.overall_score.passing_threshold
    );

    println!("\nCategory Breakdown:");
    for category in Category::ALL {
        let problems = catalog.problems_in(category);
        if problems.is_empty() && criteria.get(category).is_none() {
            continue;
        }
        println!(
            "  {}: {} problems, {} points, criteria total {}, weight {:.2}",
            category,
            problems.len(),
            catalog.total_points(category),
            criteria.total_for(category),
            metrics.weight_for(category).unwrap_or(0.0)
        );
    }

    println!("\nSkill Metrics:");
    for skill in &metrics.skill_metrics {
        println!("  {}", skill);
    }
}

fn print_list(catalog: &BenchmarkCatalog, difficulty: Option<Difficulty>) {
    for problem in catalog.iter() {
        if difficulty.is_some_and(|d| d != problem.difficulty) {
            continue;
        }
        println!(
            "  {:<4} {:<14} {:<7} {:>3} pts",
            problem.id,
            problem.category().as_str(),
            problem.difficulty.as_str(),
            problem.points
        );
    }
}

fn print_problem(catalog: &BenchmarkCatalog, id: &str, with_expected: bool) -> Result<()> {
    let problem = catalog
        .find(id)
        .ok_or_else(|| anyhow!("No problem with id {}", id))?;

    println!(
        "{} [{}, {}, {} points]\n",
        problem.id,
        problem.category(),
        problem.difficulty,
        problem.points
    );
    println!("{}", problem.prompt());

    if with_expected {
        let expected = problem.expected_json()?;
        println!("\nExpected:\n{}", serde_json::to_string_pretty(&expected)?);
    }
    Ok(())
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    telemetry::init_tracing();
    let args = Args::parse();

    match args.command {
        Command::Summary => print_summary(&load_catalog(args.file.as_deref())?),
        Command::List { difficulty } => {
            print_list(&load_catalog(args.file.as_deref())?, difficulty)
        }
        Command::Show { id, with_expected } => {
            print_problem(&load_catalog(args.file.as_deref())?, &id, with_expected)?
        }
        Command::Export { output } => {
            let catalog = load_catalog(args.file.as_deref())?;
            catalog
                .save_to_file(&output)
                .with_context(|| format!("Could not export catalog to {}", output.display()))?;
            println!("Catalog exported to {}", output.display());
        }
        Command::Validate { path } => {
            let catalog = load_catalog(Some(&path))?;
            println!(
                "✅ {}: {} {} ({} problems, {} points)",
                path.display(),
                catalog.name(),
                catalog.version(),
                catalog.len(),
                catalog.max_points_total()
            );
        }
    }

    Ok(())
}
