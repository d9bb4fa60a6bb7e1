use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use clap::{Parser, ValueEnum};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tokio::fs;
use tracing_subscriber::EnvFilter;

use likho_core::{
    Audience, ContentType, GenerationParams, HttpGenerationClient, Provider, ScriptPipeline,
    ScriptRequest, StyleSnapshot, Tone, format_script_readable, load_snapshot,
    load_transcript_library, save_snapshot, snapshot_path,
};

/// CLI wrapper for Tone enum (needed for clap ValueEnum)
#[derive(Clone, Default, ValueEnum)]
enum CliTone {
    #[default]
    FriendlyAndInformative,
    EnthusiasticAndEnergetic,
    ProfessionalAndFormal,
    CasualAndConversational,
    DramaticAndEngaging,
    TechnicalAndDetailed,
    HumorousAndEntertaining,
}

impl From<CliTone> for Tone {
    fn from(cli: CliTone) -> Self {
        match cli {
            CliTone::FriendlyAndInformative => Tone::FriendlyAndInformative,
            CliTone::EnthusiasticAndEnergetic => Tone::EnthusiasticAndEnergetic,
            CliTone::ProfessionalAndFormal => Tone::ProfessionalAndFormal,
            CliTone::CasualAndConversational => Tone::CasualAndConversational,
            CliTone::DramaticAndEngaging => Tone::DramaticAndEngaging,
            CliTone::TechnicalAndDetailed => Tone::TechnicalAndDetailed,
            CliTone::HumorousAndEntertaining => Tone::HumorousAndEntertaining,
        }
    }
}

/// CLI wrapper for Audience enum (needed for clap ValueEnum)
#[derive(Clone, Default, ValueEnum)]
enum CliAudience {
    #[default]
    TechEnthusiasts,
    GeneralAudience,
    Beginners,
    Professionals,
    Students,
    Gamers,
    ContentCreators,
}

impl From<CliAudience> for Audience {
    fn from(cli: CliAudience) -> Self {
        match cli {
            CliAudience::TechEnthusiasts => Audience::TechEnthusiasts,
            CliAudience::GeneralAudience => Audience::GeneralAudience,
            CliAudience::Beginners => Audience::Beginners,
            CliAudience::Professionals => Audience::Professionals,
            CliAudience::Students => Audience::Students,
            CliAudience::Gamers => Audience::Gamers,
            CliAudience::ContentCreators => Audience::ContentCreators,
        }
    }
}

/// CLI wrapper for ContentType enum (needed for clap ValueEnum)
#[derive(Clone, Default, ValueEnum)]
enum CliContentType {
    Review,
    Comparison,
    Unboxing,
    Tutorial,
    #[default]
    General,
}

impl From<CliContentType> for ContentType {
    fn from(cli: CliContentType) -> Self {
        match cli {
            CliContentType::Review => ContentType::Review,
            CliContentType::Comparison => ContentType::Comparison,
            CliContentType::Unboxing => ContentType::Unboxing,
            CliContentType::Tutorial => ContentType::Tutorial,
            CliContentType::General => ContentType::General,
        }
    }
}

/// CLI wrapper for Provider enum (needed for clap ValueEnum)
#[derive(Clone, Default, ValueEnum)]
enum CliProvider {
    #[default]
    Gemini,
    Openai,
    Grok,
}

impl From<CliProvider> for Provider {
    fn from(cli: CliProvider) -> Self {
        match cli {
            CliProvider::Gemini => Provider::Gemini,
            CliProvider::Openai => Provider::Openai,
            CliProvider::Grok => Provider::Grok,
        }
    }
}

#[derive(Parser)]
#[command(name = "likho")]
#[command(about = "Generate creator-style Hinglish YouTube scripts from analyzed transcripts")]
struct Cli {
    /// Script topic
    topic: String,

    /// Directory of analyzed transcript JSON files
    #[arg(long, default_value = "data/processed")]
    transcripts: PathBuf,

    /// Target video length in minutes
    #[arg(short, long, default_value_t = 10)]
    minutes: u32,

    /// Script tone
    #[arg(short, long, default_value = "friendly-and-informative")]
    tone: CliTone,

    /// Target audience
    #[arg(short, long, default_value = "tech-enthusiasts")]
    audience: CliAudience,

    /// Content type
    #[arg(short, long, default_value = "general")]
    content_type: CliContentType,

    /// Creator whose style to replicate (must appear in the transcript corpus)
    #[arg(short = 's', long)]
    creator: Option<String>,

    /// Extra context folded into the prompt
    #[arg(short = 'x', long)]
    context: Option<String>,

    /// Hard word cap override (200-5000)
    #[arg(short, long)]
    word_cap: Option<u32>,

    /// Allow Devanagari output instead of Latin-script Hinglish
    #[arg(long)]
    devanagari: bool,

    /// Sampling temperature (0.0-2.0)
    #[arg(long, default_value_t = 0.7)]
    temperature: f32,

    /// AI provider for script generation
    #[arg(short, long, default_value = "gemini")]
    provider: CliProvider,

    /// Write the result to this file (.json gets the full record, anything else markdown)
    #[arg(short, long)]
    out: Option<PathBuf>,

    /// Rebuild the style context even if a cached snapshot exists
    #[arg(short, long)]
    force: bool,
}

fn create_spinner(msg: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .tick_chars("⠁⠂⠄⡀⢀⠠⠐⠈ ")
            .template("{spinner:.cyan} {msg}")
            .unwrap(),
    );
    pb.set_message(msg.to_string());
    pb.enable_steady_tick(Duration::from_millis(80));
    pb
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let provider: Provider = cli.provider.into();

    // Validate API key early
    if let Err(e) = provider.validate_api_key() {
        eprintln!("{} {}", style("Error:").red().bold(), e);
        std::process::exit(1);
    }

    println!(
        "\n{}  {}\n",
        style("likho").cyan().bold(),
        style("Hinglish Script Writer").dim()
    );

    // Step 1: Style context (check cache)
    let snapshot_file = snapshot_path(&cli.transcripts);
    let snapshot = if !cli.force && snapshot_file.exists() {
        let snapshot = load_snapshot(&snapshot_file).await?;
        println!(
            "{} Style context: {} creators {}",
            style("✓").green().bold(),
            snapshot.catalog.len(),
            style("(cached)").dim()
        );
        snapshot
    } else {
        let spinner = create_spinner("Reading transcripts...");
        let library =
            load_transcript_library(&cli.transcripts, likho_core::corpus::DEFAULT_LIBRARY_SIZE)
                .await?;
        let snapshot = StyleSnapshot::build(&library, GenerationParams::default());
        if let Some(parent) = snapshot_file.parent() {
            fs::create_dir_all(parent).await?;
        }
        save_snapshot(&snapshot, &snapshot_file).await?;
        spinner.finish_with_message(format!(
            "{} Style context built: {} creators from {} transcripts",
            style("✓").green().bold(),
            snapshot.catalog.len(),
            library.len()
        ));
        snapshot
    };

    if snapshot.catalog.is_empty() {
        println!(
            "{} No usable transcripts found, writing without creator context",
            style("!").yellow().bold()
        );
    }

    // Step 2: Assemble the request
    let mut request = ScriptRequest::new(cli.topic, cli.minutes)
        .with_tone(cli.tone.into())
        .with_audience(cli.audience.into())
        .with_content_type(cli.content_type.into())
        .with_roman_hinglish(!cli.devanagari)
        .with_temperature(cli.temperature);
    if let Some(creator) = cli.creator {
        if snapshot.catalog.get(&creator).is_none() {
            println!(
                "{} Creator '{}' not in style context, writing without their style",
                style("!").yellow().bold(),
                creator
            );
        }
        request = request.with_creator_style(creator);
    }
    if let Some(context) = cli.context {
        request = request.with_additional_context(context);
    }
    if let Some(cap) = cli.word_cap {
        request = request.with_word_cap(cap);
    }

    // Step 3: Generate
    let client = HttpGenerationClient::new(provider.clone())?;
    let pipeline = ScriptPipeline::new(Arc::new(client), GenerationParams::default());

    let spinner = create_spinner(&format!("Writing script with {}...", provider.name()));
    let script = match pipeline.generate(&request, &snapshot.catalog).await {
        Ok(script) => {
            spinner.finish_with_message(format!(
                "{} Script written: {} words in {:.1}s",
                style("✓").green().bold(),
                script.word_count,
                script.generation_secs
            ));
            script
        }
        Err(error) => {
            spinner.finish_and_clear();
            eprintln!("{} {}", style("Error:").red().bold(), error.user_message());
            std::process::exit(1);
        }
    };

    // Step 4: Save and print
    if let Some(out) = &cli.out {
        let contents = if out.extension().is_some_and(|ext| ext == "json") {
            serde_json::to_string_pretty(&script)?
        } else {
            format_script_readable(&script)
        };
        fs::write(out, contents).await?;
        println!("\n{} {}", style("Saved:").dim(), style(out.display()).cyan());
    }

    println!("\n{}", style("─".repeat(60)).dim());

    // Human-readable output
    let readable = format_script_readable(&script);
    println!("{}", readable);

    Ok(())
}
