//! shellgate - log in to the backend and inspect the dashboard.
//!
//! Without arguments, prompts for credentials and logs in. Other commands:
//! `--dashboard`, `--status`, `--logout`.

use std::io::{self, Write};

use anyhow::Result;
use shellgate_core::auth::Credentials;
use shellgate_core::config::Config;
use shellgate_core::AppContext;
use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initialize the tracing subscriber for logging
fn init_tracing() {
    // Use RUST_LOG env var to control log level (e.g., RUST_LOG=debug)
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(filter)
        .init();
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Login,
    Dashboard,
    Status,
    Logout,
}

impl Command {
    fn parse(arg: Option<&str>) -> Result<Self> {
        match arg {
            None | Some("--login") => Ok(Command::Login),
            Some("--dashboard") => Ok(Command::Dashboard),
            Some("--status") => Ok(Command::Status),
            Some("--logout") => Ok(Command::Logout),
            Some(other) => Err(anyhow::anyhow!(
                "Unknown argument: {} (expected --login, --dashboard, --status or --logout)",
                other
            )),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();

    init_tracing();

    let args: Vec<String> = std::env::args().collect();
    let command = Command::parse(args.get(1).map(String::as_str))?;

    let mut config = Config::load()?;
    let mut ctx = AppContext::from_config(&config)?;

    ctx.auth.session_mut().subscribe(|change| {
        info!(
            was_authenticated = change.was_authenticated,
            is_authenticated = change.is_authenticated,
            "Session changed"
        );
    });

    match command {
        Command::Login => login(&mut ctx, &mut config).await,
        Command::Dashboard => dashboard(&ctx).await,
        Command::Status => {
            if ctx.session().is_authenticated() {
                println!("Authenticated");
            } else {
                println!("Not logged in");
            }
            Ok(())
        }
        Command::Logout => {
            ctx.auth.logout();
            println!("Logged out");
            Ok(())
        }
    }
}

/// Interactive login
async fn login(ctx: &mut AppContext, config: &mut Config) -> Result<()> {
    println!("\n=== shellgate login ===\n");

    let default_username = std::env::var("SHELLGATE_USERNAME")
        .ok()
        .or_else(|| config.last_username.clone());
    let username = prompt_username(default_username.as_deref())?;

    let password = match std::env::var("SHELLGATE_PASSWORD") {
        Ok(password) => password,
        Err(_) => rpassword::prompt_password("Password: ")?,
    };

    let credentials = Credentials::new(username, password);

    println!("\nAuthenticating...");
    let result = ctx.login_form.submit(&mut ctx.auth, &credentials).await;

    let errors = ctx.login_form.field_errors();
    for message in [&errors.username, &errors.password].into_iter().flatten() {
        eprintln!("  {}", message);
    }

    match result {
        Ok(_) => {
            if let Some(message) = ctx.login_form.success() {
                println!("{}\n", message);
            }
            config.last_username = Some(credentials.username.clone());
            if let Err(e) = config.save() {
                warn!(error = %e, "Failed to save config");
            }
            Ok(())
        }
        Err(failure) => {
            let message = ctx
                .login_form
                .error()
                .map(str::to_string)
                .unwrap_or_else(|| failure.to_string());
            Err(anyhow::anyhow!(message))
        }
    }
}

fn prompt_username(default: Option<&str>) -> Result<String> {
    match default {
        Some(last_user) => print!("Username [{}]: ", last_user),
        None => print!("Username: "),
    }
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    let input = input.trim();

    Ok(match default {
        Some(last_user) if input.is_empty() => last_user.to_string(),
        _ => input.to_string(),
    })
}

async fn dashboard(ctx: &AppContext) -> Result<()> {
    let dashboard = ctx.integration.fetch_dashboard().await?;
    println!("{}", serde_json::to_string_pretty(&dashboard)?);
    Ok(())
}
