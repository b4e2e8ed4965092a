//! CLI for Xmasify - Christmas-themed pet photo edits.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use xmasify::credentials::{CredentialGate, CredentialHost, EnvCredentialHost};
use xmasify::session::{Session, WorkflowPhase};
use xmasify::{generate_christmas_edit, presets, upload, GeminiClient};

#[derive(Parser)]
#[command(name = "xmasify")]
#[command(about = "Turn a pet photo into a Christmas-themed edit via Gemini")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a Christmas edit of a pet photo
    Edit(EditArgs),

    /// List the built-in style presets
    Presets,
}

#[derive(Args)]
struct EditArgs {
    /// Pet photo to edit (JPG, PNG or WEBP)
    input: PathBuf,

    /// Style preset id (see `xmasify presets`)
    #[arg(short, long)]
    style: Option<String>,

    /// Free-text instructions, combined with the preset when both are given
    #[arg(short, long)]
    prompt: Option<String>,

    /// Output file path (defaults to a timestamped name)
    #[arg(short, long)]
    output: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "xmasify=info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Edit(args) => run_edit(args, cli.json).await,
        Commands::Presets => list_presets(cli.json),
    }
}

async fn run_edit(args: EditArgs, json_output: bool) -> anyhow::Result<()> {
    let mut gate = CredentialGate::new(EnvCredentialHost);
    if !gate.is_available() {
        eprintln!("No API key is active, so the magic can't start yet.");
        if !gate.request_selection() {
            anyhow::bail!("no API key selected");
        }
    }

    let preset = match args.style.as_deref() {
        Some(id) => Some(presets::find(id).ok_or_else(|| {
            let known: Vec<&str> = presets::PRESET_STYLES.iter().map(|p| p.id).collect();
            anyhow::anyhow!("unknown style '{id}' (available: {})", known.join(", "))
        })?),
        None => None,
    };
    let instruction = presets::compose(preset, args.prompt.as_deref().unwrap_or(""));

    let source = upload::load_source(&args.input)?;
    let active = source.clone();

    let mut session = Session::new();
    session.select_source(source);
    let ticket = session.begin_generation()?;

    let client = GeminiClient::builder().build()?;
    let result = generate_christmas_edit(&client, &active, &instruction).await;

    if result.as_ref().is_err_and(|e| e.is_credential_failure()) {
        // The only place the gate is revised after startup.
        gate.revoke();
    }
    session.finish_generation(ticket, result);

    match (session.phase(), session.generated()) {
        (WorkflowPhase::Succeeded, Some(image)) => {
            let output = args
                .output
                .unwrap_or_else(|| PathBuf::from(image.default_filename(chrono::Local::now())));
            image.save(&output)?;

            if json_output {
                let result = serde_json::json!({
                    "success": true,
                    "input": args.input.display().to_string(),
                    "output": output.display().to_string(),
                    "input_bytes": active.size(),
                    "output_bytes": image.size(),
                    "format": image.format.extension(),
                });
                println!("{}", serde_json::to_string_pretty(&result)?);
            } else {
                println!("Your pet is now a holiday star!");
                println!(
                    "  original:  {} ({} bytes, {})",
                    args.input.display(),
                    active.size(),
                    active.format.mime_type()
                );
                println!(
                    "  festive:   {} ({} bytes, {})",
                    output.display(),
                    image.size(),
                    image.format.mime_type()
                );
            }
            Ok(())
        }
        _ => {
            let message = session
                .error()
                .unwrap_or("Something went wrong. Please try again.")
                .to_string();
            if !gate.is_available() {
                eprintln!("{message}");
                EnvCredentialHost.request_selection();
                anyhow::bail!("API key rejected, select a new key and retry");
            }
            anyhow::bail!(message)
        }
    }
}

fn list_presets(json_output: bool) -> anyhow::Result<()> {
    if json_output {
        let entries: Vec<serde_json::Value> = presets::PRESET_STYLES
            .iter()
            .map(|p| {
                serde_json::json!({
                    "id": p.id,
                    "label": p.label,
                    "prompt": p.prompt,
                    "icon": p.icon,
                })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&entries)?);
    } else {
        println!("Available styles:\n");
        for p in &presets::PRESET_STYLES {
            println!("  {} {} ({})", p.icon, p.label, p.id);
            println!("      {}", p.prompt);
        }
    }
    Ok(())
}
