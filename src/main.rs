//! BaleCare demo shell.
//!
//! Loads configuration, wires the identity adapter, the generative text
//! gateway and the session store, then runs a single command.

use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use balecare::adapters::ai::{GeminiConfig, GeminiProvider};
use balecare::adapters::auth::StaticCredentialSource;
use balecare::application::{
    AiTools, BookingSessionStore, GenerativeTextGateway, IdentityProviderAdapter, LoginOutcome,
    SignInFlow,
};
use balecare::config::{AppConfig, LoggingConfig};
use balecare::domain::assistant::AiTool;
use balecare::domain::booking::{ReviewDraft, ServiceCategory};
use balecare::domain::foundation::{Language, StarRating};
use balecare::ports::{ProviderCredential, ProviderCredentialSource};

#[derive(Parser)]
#[command(name = "balecare", about = "BaleCare booking and assistant demo shell")]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Display language override (id or en)
    #[arg(long, short = 'l', global = true)]
    language: Option<Language>,
}

#[derive(Subcommand)]
enum Command {
    /// Sign in with Google, falling back to a guest session where not allowed
    Login {
        /// Google ID token obtained from the sign-in popup
        #[arg(long)]
        id_token: Option<String>,
    },
    /// Continue as a guest
    Guest,
    /// Diagnose a property problem
    Diagnose { text: String },
    /// Write a villa listing description
    Villa { text: String },
    /// Post a review
    Review {
        name: String,
        text: String,
        #[arg(default_value_t = 5)]
        rating: u8,
    },
    /// List the service catalog
    Catalog,
}

fn init_tracing(config: &LoggingConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.filter));

    if config.json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .compact()
            .init();
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = AppConfig::load()?;
    config.validate()?;
    if let Some(language) = cli.language {
        config.session.language = language;
    }
    init_tracing(&config.logging);

    let credentials: Option<Arc<dyn ProviderCredentialSource>> = match &cli.command {
        Command::Login {
            id_token: Some(token),
        } => Some(Arc::new(StaticCredentialSource::new(ProviderCredential::google(
            token.clone(),
        )))),
        _ => None,
    };

    let identity = Arc::new(IdentityProviderAdapter::from_config(&config.identity, credentials));
    tracing::info!(
        mode = identity.mode().name(),
        configured = identity.mode().is_configured(),
        "Identity provider mode selected"
    );

    let session = Arc::new(BookingSessionStore::from_config(&config.session));
    let _session_subscription = session.attach(&identity);
    let _log_subscription = identity.subscribe(|current| match current {
        Some(identity) => tracing::info!(user = %identity.id, anonymous = identity.is_anonymous, "Signed in"),
        None => tracing::info!("Signed out"),
    });

    let language = config.session.language;
    let generator = Arc::new(GeminiProvider::new(GeminiConfig::from_app_config(&config.ai))?);
    let gateway = Arc::new(GenerativeTextGateway::new(generator).with_language(language));
    let tools = AiTools::new(gateway, session.clone());
    let flow = SignInFlow::new(identity.clone());

    match cli.command {
        Command::Login { .. } => match flow.login().await {
            LoginOutcome::SignedIn(identity) => {
                println!("{}", identity.display_label(language));
            }
            LoginOutcome::GuestFallback(identity) => {
                println!("{} (guest mode)", identity.display_label(language));
            }
            LoginOutcome::Unavailable => println!("Sign-in is not available."),
            LoginOutcome::Unauthenticated => println!("Sign-in failed."),
        },
        Command::Guest => match flow.continue_as_guest().await {
            Ok(identity) => println!("{}", identity.display_label(language)),
            Err(e) => println!("Guest sign-in failed: {}", e),
        },
        Command::Diagnose { text } => print_tool(&tools, AiTool::Diagnose, &text).await,
        Command::Villa { text } => print_tool(&tools, AiTool::VillaCopy, &text).await,
        Command::Review { name, text, rating } => {
            let draft = ReviewDraft::new(name, text, StarRating::new(rating)?);
            if session.add_review(draft).is_ok() {
                for review in session.reviews() {
                    println!("{} ({}) {}: {}", review.name, review.role, review.rating, review.text);
                }
            }
        }
        Command::Catalog => {
            for service in ServiceCategory::ALL {
                println!(
                    "{:<12} {:<28} {}",
                    service.id(),
                    service.name(language),
                    service.starting_price()
                );
            }
        }
    }

    Ok(())
}

async fn print_tool(tools: &AiTools, tool: AiTool, text: &str) {
    match tools.run(tool, text).await {
        Ok(output) => println!("{}", output.display),
        Err(e) => tracing::warn!("Nothing to send: {}", e),
    }
}
