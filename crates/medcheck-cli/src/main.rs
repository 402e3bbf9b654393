use std::path::PathBuf;

use anyhow::Context;
use base64::Engine as _;
use clap::{Parser, Subcommand, ValueEnum};
use medcheck_ai::{DEFAULT_MODEL, GeminiClient, ImageAttachment};
use medcheck_core::Role;
use medcheck_store::{ANALYSIS_FAILED_NOTICE, AppState, SignInForm, StoreError};

mod display;

#[derive(Parser)]
#[command(name = "medcheck", version, about = "Verify medical claims with scientific rigor")]
struct Cli {
    /// Provider API key.
    #[arg(long, env = "GEMINI_API_KEY", hide_env_values = true, global = true)]
    api_key: Option<String>,

    /// Provider model identifier.
    #[arg(long, env = "MEDCHECK_MODEL", default_value = DEFAULT_MODEL, global = true)]
    model: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Analyze a medical claim and render the verdict card.
    Analyze {
        /// Claim text. May be omitted when --image is given.
        claim: Option<String>,

        /// Screenshot or photo of the claim to attach.
        #[arg(long)]
        image: Option<PathBuf>,

        #[arg(long, value_enum, default_value = "patient")]
        role: RoleArg,

        /// Medical license id, required with --role professional.
        #[arg(long, required_if_eq("role", "professional"))]
        license: Option<String>,

        #[arg(long)]
        name: Option<String>,

        #[arg(long, default_value = "you@example.org")]
        email: String,
    },
    /// Show what the community is checking right now.
    Trending,
    /// Browse the wellness feed, optionally sharing an experience first.
    Feed {
        /// Share this experience before rendering the feed.
        #[arg(long)]
        post: Option<String>,

        #[arg(long)]
        name: Option<String>,

        #[arg(long, default_value = "you@example.org")]
        email: String,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum RoleArg {
    Patient,
    Professional,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();
    tracing::info!("medcheck v{}", env!("CARGO_PKG_VERSION"));
    let cli = Cli::parse();

    match cli.command {
        Command::Analyze {
            claim,
            image,
            role,
            license,
            name,
            email,
        } => {
            let api_key = cli
                .api_key
                .context("set GEMINI_API_KEY or pass --api-key")?;
            let analyzer = GeminiClient::new(api_key).with_model(cli.model);
            run_analyze(&analyzer, claim, image, role, license, name, email).await
        }
        Command::Trending => {
            run_trending();
            Ok(())
        }
        Command::Feed { post, name, email } => run_feed(post, name, email),
    }
}

async fn run_analyze(
    analyzer: &GeminiClient,
    claim: Option<String>,
    image: Option<PathBuf>,
    role: RoleArg,
    license: Option<String>,
    name: Option<String>,
    email: String,
) -> anyhow::Result<()> {
    let mut state = AppState::with_seed_data();
    let role = match role {
        RoleArg::Patient => Role::Patient,
        RoleArg::Professional => Role::Professional {
            license_number: license.unwrap_or_default(),
            specialty: None,
        },
    };
    state.sign_in(SignInForm {
        name: name.unwrap_or_default(),
        email,
        role,
    });

    let image = image.map(load_image).transpose()?;
    let claim = claim.unwrap_or_default();

    let outcome = state
        .submit_claim(analyzer, &claim, image.as_ref())
        .await
        .map(|_| ());
    if let Err(e) = outcome {
        match e {
            StoreError::Analysis(_) => {
                anyhow::bail!("{}", state.last_error().unwrap_or(ANALYSIS_FAILED_NOTICE))
            }
            other => anyhow::bail!(other),
        }
    }

    if let Some(verdict) = state.current_verdict() {
        display::print_verdict_card(verdict);
    }
    if let Some(question) = state.questions().first() {
        println!(
            "Queued for clinician review as case {} ({}).",
            question.id,
            question.status().as_str()
        );
    }
    Ok(())
}

fn run_trending() {
    let state = AppState::with_seed_data();
    display::print_trending(state.trending());
}

fn run_feed(post: Option<String>, name: Option<String>, email: String) -> anyhow::Result<()> {
    let mut state = AppState::with_seed_data();
    if let Some(content) = post {
        state.sign_in(SignInForm {
            name: name.unwrap_or_default(),
            email,
            role: Role::Patient,
        });
        state.post_experience(&content)?;
    }
    display::print_feed(state.posts());
    Ok(())
}

/// Read an image file into a base64 attachment, inferring the media type
/// from the extension.
fn load_image(path: PathBuf) -> anyhow::Result<ImageAttachment> {
    let bytes =
        std::fs::read(&path).with_context(|| format!("reading {}", path.display()))?;
    let media_type = match path.extension().and_then(|e| e.to_str()) {
        Some("png") => "image/png",
        Some("webp") => "image/webp",
        Some("gif") => "image/gif",
        _ => "image/jpeg",
    };
    let data = base64::engine::general_purpose::STANDARD.encode(&bytes);
    Ok(ImageAttachment::new(media_type, data))
}
