//! ResQ CLI - a terminal front-end for the ResQ dispatch session core.
//!
//! Signs an operator in against the ResQ data server, then accepts paths at a
//! prompt and reports what the dashboard router would render for them.

use std::io::{self, BufRead, Write};

use anyhow::Result;
use tracing::{debug, info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use resq_core::guard::landing_route;
use resq_core::{navigate, Config, Credentials, Navigation, SessionPhase, SessionStore, User};

// ============================================================================
// Constants
// ============================================================================

/// Prefills the email prompt
const ENV_EMAIL: &str = "RESQ_EMAIL";

/// Skips the password prompt when set
const ENV_PASSWORD: &str = "RESQ_PASSWORD";

const HELP: &str = "\
Commands:
  /<path>   show what the dashboard renders for a path (e.g. /FleetManagement)
  whoami    show the signed-in operator
  status    show the session state
  login     sign in again
  logout    sign out
  quit      exit";

/// Initialize the tracing subscriber for logging
fn init_tracing() {
    // Use RUST_LOG env var to control log level (e.g., RUST_LOG=resq_core=debug)
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(filter)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();

    init_tracing();
    info!("ResQ CLI starting");

    let mut config = match Config::load() {
        Ok(c) => c,
        Err(e) => {
            warn!(error = %e, "Failed to load config, using defaults");
            Config::default()
        }
    };
    debug!(api = %config.api_base_url, "Config loaded");

    let store = resq_core::session_store(&config)?;
    watch_session(&store);

    println!("ResQ - Ambulance Dispatching Solution");
    println!("Server: {}\n", config.api_base_url);

    if !login(&store, &mut config).await? {
        println!("Not signed in. Type 'login' to try again.\n");
    }
    run_prompt(&store, &mut config).await?;

    store.reset();
    info!("ResQ CLI shutting down");
    Ok(())
}

/// Log every session transition
fn watch_session(store: &SessionStore) {
    let mut rx = store.subscribe();
    tokio::spawn(async move {
        while rx.changed().await.is_ok() {
            let snapshot = rx.borrow_and_update().clone();
            debug!(
                phase = ?snapshot.phase(),
                user = ?snapshot.current_user.as_ref().map(|u| u.email.as_str()),
                error = ?snapshot.error,
                "Session changed"
            );
        }
    });
}

async fn run_prompt(store: &SessionStore, config: &mut Config) -> Result<()> {
    println!("{}\n", HELP);
    let stdin = io::stdin();

    loop {
        print!("resq> ");
        io::stdout().flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            return Ok(());
        }

        match line.trim() {
            "" => continue,
            "quit" | "exit" => return Ok(()),
            "help" => println!("{}", HELP),
            "whoami" => match store.current_user() {
                Some(user) => print_user(&user),
                None => println!("Not signed in"),
            },
            "status" => print_status(store),
            "logout" => {
                store.clear_current_user();
                println!("Signed out");
            }
            "login" => {
                if !login(store, config).await? {
                    print_status(store);
                }
            }
            path if path.starts_with('/') => {
                let navigation = navigate(&store.snapshot(), path, config.unrecognized_role_policy);
                match navigation {
                    Navigation::Render(route) => println!("render {} ({})", route, route.title()),
                    Navigation::Redirect(route) => println!("redirect -> {} ({})", route, route.title()),
                }
            }
            other => println!("Unknown command: {} (type 'help')", other),
        }
    }
}

/// Prompt for credentials and sign in. Returns whether a user is now signed in.
async fn login(store: &SessionStore, config: &mut Config) -> Result<bool> {
    let default_email = std::env::var(ENV_EMAIL).ok().or_else(|| config.last_email.clone());
    let email = prompt_email(default_email.as_deref())?;
    let password = match std::env::var(ENV_PASSWORD) {
        Ok(p) if !p.is_empty() => p,
        _ => rpassword::prompt_password("Password: ")?,
    };

    let credentials = match Credentials::validate(&email, &password) {
        Ok(c) => c,
        Err(errors) => {
            for error in &errors.0 {
                eprintln!("  {}", error.message);
            }
            return Ok(false);
        }
    };

    println!("Signing in...");
    let email = credentials.email.clone();
    match store.start_login(credentials).await {
        Ok(user) => {
            config.last_email = Some(email);
            if let Err(e) = config.save() {
                warn!(error = %e, "Failed to save config");
            }

            println!("Welcome, {}!", user.name);
            let landing = landing_route(user.role(), config.unrecognized_role_policy);
            println!("Landing on {} ({})\n", landing, landing.title());
            Ok(true)
        }
        Err(e) => {
            eprintln!("{}\n", e.user_message());
            Ok(false)
        }
    }
}

fn prompt_email(default: Option<&str>) -> Result<String> {
    match default {
        Some(d) => print!("Email [{}]: ", d),
        None => print!("Email: "),
    }
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    let input = input.trim();

    Ok(match default {
        Some(d) if input.is_empty() => d.to_string(),
        _ => input.to_string(),
    })
}

fn print_user(user: &User) {
    println!("{} <{}>", user.name, user.email);
    println!(
        "  role: {}",
        user.role().map(|r| r.display_name().to_string()).unwrap_or_else(|| "none".to_string())
    );
    if let Some(since) = user.member_since() {
        println!("  member since: {}", since);
    }
}

fn print_status(store: &SessionStore) {
    let snapshot = store.snapshot();
    let phase = match snapshot.phase() {
        SessionPhase::LoggedOut => "logged out",
        SessionPhase::Authenticating => "signing in",
        SessionPhase::Authenticated => "signed in",
        SessionPhase::LoginFailed => "login failed",
    };
    println!("{}", phase);
    if let Some(error) = snapshot.error {
        println!("  last error: {}", error);
    }
}
