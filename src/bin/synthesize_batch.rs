use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use newsfuse::logging;
use newsfuse::{KeywordScope, RawArticle, SynthesisConfig, SynthesisPipeline, TitleMetric};
use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;
use tracing::info;

/// Merge a batch of scraped news items into one article per event.
///
/// Reads a JSON array of articles from FILE (or stdin), writes the synthesized
/// JSON array to stdout and a summary to stderr.
///
/// Example:
///    cargo run --bin synthesize_batch -- articles.json --threshold 0.5 --pretty
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// JSON file with an array of articles; reads stdin when omitted
    input: Option<PathBuf>,

    /// JSON config file; NEWSFUSE_* environment variables override it
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Minimum combined score for two articles to be merged
    #[arg(short, long)]
    threshold: Option<f64>,

    /// Text used for keyword sets: "title" or "title_and_description"
    #[arg(short, long)]
    keyword_scope: Option<KeywordScope>,

    /// Metric for raw title similarity
    #[arg(long)]
    title_metric: Option<TitleMetric>,

    /// Stem keywords before comparing them
    #[arg(long)]
    stem: bool,

    /// Run on the built-in sample batch instead of reading input
    #[arg(long)]
    demo: bool,

    /// Pretty-print the output JSON
    #[arg(short, long)]
    pretty: bool,
}

fn main() -> Result<()> {
    logging::configure_stderr_logging();

    let args = Args::parse();
    let config = build_config(&args)?;

    let articles = if args.demo {
        demo_articles()
    } else {
        read_articles(args.input.as_ref())?
    };
    info!("Loaded {} articles", articles.len());

    let report = SynthesisPipeline::new(&config).synthesize_articles(&articles);

    let json = if args.pretty {
        serde_json::to_string_pretty(&report.articles)?
    } else {
        serde_json::to_string(&report.articles)?
    };
    println!("{}", json);

    let stats = &report.stats;
    eprintln!("\n{}", "═".repeat(60).bright_blue());
    eprintln!("{}", "SYNTHESIS SUMMARY".bright_blue());
    eprintln!("{}", "═".repeat(60).bright_blue());
    eprintln!("{}: {}", "Input articles".bright_blue(), stats.total_input);
    eprintln!("{}: {}", "Groups found".bright_blue(), stats.groups_found);
    eprintln!("{}: {}", "Output articles".bright_blue(), stats.synthesized);
    let ratio = format!("{:.2}", stats.compression_ratio);
    let ratio = if stats.compression_ratio < 1.0 {
        ratio.bright_green()
    } else {
        ratio.normal()
    };
    eprintln!("{}: {}", "Compression ratio".bright_blue(), ratio);

    for article in &report.articles {
        eprintln!(
            "  {} {} [{}] ({})",
            "•".dimmed(),
            article.title(),
            article.synthesis_method().to_string().bright_yellow(),
            article.source_names().join(", ")
        );
    }

    Ok(())
}

fn build_config(args: &Args) -> Result<SynthesisConfig> {
    let mut config = match &args.config {
        Some(path) => SynthesisConfig::from_json_file(path)?,
        None => SynthesisConfig::default(),
    }
    .overlay_env();

    if let Some(threshold) = args.threshold {
        config = config.with_threshold(threshold);
    }
    if let Some(scope) = args.keyword_scope {
        config = config.with_keyword_scope(scope);
    }
    if let Some(metric) = args.title_metric {
        config = config.with_title_metric(metric);
    }
    if args.stem {
        config = config.with_stemming(true);
    }
    Ok(config)
}

fn read_articles(path: Option<&PathBuf>) -> Result<Vec<RawArticle>> {
    let raw = match path {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?,
        None => {
            let mut buffer = String::new();
            io::stdin()
                .read_to_string(&mut buffer)
                .context("Failed to read stdin")?;
            buffer
        }
    };
    serde_json::from_str(&raw).context("Input must be a JSON array of articles")
}

fn demo_articles() -> Vec<RawArticle> {
    vec![
        RawArticle::new(
            "México anuncia nuevo plan económico para 2026",
            "El gobierno mexicano presentó un ambicioso plan económico que incluye reducción de impuestos y apoyo a pequeñas empresas. Se espera que el PIB crezca 3.5% el próximo año.",
            "El Economista",
        )
        .with_published_at("2026-01-20"),
        RawArticle::new(
            "Gobierno federal lanza estrategia económica 2026",
            "La administración anunció medidas fiscales para impulsar la economía. Entre ellas, beneficios tributarios para PYMES y una proyección de crecimiento del 3.5%.",
            "Reforma",
        )
        .with_published_at("2026-01-20"),
        RawArticle::new(
            "Nuevas políticas fiscales beneficiarán a empresas mexicanas",
            "El Ejecutivo presentó reformas tributarias orientadas a la reactivación económica. Las PYMES serán las principales beneficiadas con reducciones de impuestos.",
            "Milenio",
        )
        .with_published_at("2026-01-21"),
        RawArticle::new(
            "Descubren nueva especie de dinosaurio en Argentina",
            "Paleontólogos argentinos encontraron restos fósiles de una especie desconocida de dinosaurio herbívoro en la Patagonia.",
            "National Geographic",
        )
        .with_published_at("2026-01-20"),
    ]
}
