//! orderdash - Order Dashboard Client
//!
//! Signs in, then shows the user's profile and orders in the terminal.

use anyhow::{Context, Result};
use clap::{Arg, ArgAction, Command};
use orderdash::app::runtime::spawn_input_thread;
use orderdash::auth::{AuthProvider, FirebaseAuth, Session, SessionHub};
use orderdash::config::DashboardConfig;
use orderdash::render::ui::{ColorTheme, TerminalUI};
use orderdash::store::{DataStore, MemoryStore, RestDataStore};
use orderdash::{Application, PageState};
use serde_json::json;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

const PASSWORD_ENV: &str = "ORDERDASH_PASSWORD";
const NO_COLOR_ENV: &str = "NO_COLOR";
const DEMO_USER: &str = "demo-user";

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging for development
    env_logger::init();

    let matches = Command::new("orderdash")
        .version(orderdash::VERSION)
        .about("Terminal dashboard for a user's profile and orders")
        .long_about(
            "orderdash signs in through Firebase Authentication and renders the user's name, \
             latest order and order history from a Firebase Realtime Database.",
        )
        .arg(
            Arg::new("config")
                .long("config")
                .short('c')
                .value_name("PATH")
                .help("TOML config file (defaults to $FIREBASE_CONFIG, then the user config dir)"),
        )
        .arg(
            Arg::new("email")
                .long("email")
                .value_name("EMAIL")
                .help("Sign in with this email address"),
        )
        .arg(
            Arg::new("password")
                .long("password")
                .value_name("PASSWORD")
                .help("Password for --email (or set ORDERDASH_PASSWORD)"),
        )
        .arg(
            Arg::new("once")
                .long("once")
                .action(ArgAction::SetTrue)
                .help("Render a single pass and print the page as plain text"),
        )
        .arg(
            Arg::new("no-color")
                .long("no-color")
                .action(ArgAction::SetTrue)
                .help("Draw without colors (also enabled by a non-empty NO_COLOR)"),
        )
        .arg(
            Arg::new("demo")
                .long("demo")
                .action(ArgAction::SetTrue)
                .conflicts_with_all(["config", "email"])
                .help("Use built-in sample data instead of a remote backend"),
        )
        .get_matches();

    let (auth, store, root_path): (Arc<dyn AuthProvider>, Arc<dyn DataStore>, String) =
        if matches.get_flag("demo") {
            demo_backend()
        } else {
            let config_path = matches.get_one::<String>("config").map(PathBuf::from);
            let email = matches.get_one::<String>("email").cloned();
            let password = matches
                .get_one::<String>("password")
                .cloned()
                .or_else(|| std::env::var(PASSWORD_ENV).ok());
            remote_backend(config_path, email, password).await?
        };

    let mut app = Application::new(auth, store, PageState::new(), root_path);

    if matches.get_flag("once") {
        app.run_until_idle().await?;
        print!("{}", app.page().to_plain_text());
        return Ok(());
    }

    let no_color = matches.get_flag("no-color")
        || std::env::var(NO_COLOR_ENV).is_ok_and(|value| !value.is_empty());
    let mut ui = TerminalUI::with_theme(theme_for(no_color))?;
    let (command_tx, command_rx) = tokio::sync::mpsc::unbounded_channel();
    let shutdown = Arc::new(AtomicBool::new(false));
    let input = spawn_input_thread(command_tx, Arc::clone(&shutdown), Duration::from_millis(50));

    let outcome = app.run(&mut ui, command_rx).await;

    shutdown.store(true, Ordering::SeqCst);
    let _ = input.join();
    outcome?;
    Ok(())
}

fn theme_for(no_color: bool) -> ColorTheme {
    if no_color {
        ColorTheme::monochrome()
    } else {
        ColorTheme::default()
    }
}

async fn remote_backend(
    config_path: Option<PathBuf>,
    email: Option<String>,
    password: Option<String>,
) -> Result<(Arc<dyn AuthProvider>, Arc<dyn DataStore>, String)> {
    let config = match config_path {
        Some(path) => DashboardConfig::load(&path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => DashboardConfig::discover()?,
    };

    let client = reqwest::Client::builder()
        .timeout(config.request_timeout())
        .build()
        .context("building HTTP client")?;

    let auth = Arc::new(FirebaseAuth::new(&config.firebase, client.clone())?);
    if let Some(email) = email {
        let Some(password) = password else {
            anyhow::bail!("--email requires --password or {PASSWORD_ENV}");
        };
        auth.sign_in_with_email_and_password(&email, &password)
            .await
            .context("sign-in failed")?;
    }

    let store: Arc<dyn DataStore> =
        Arc::new(RestDataStore::new(&config.firebase.database_url, client)?);
    let auth: Arc<dyn AuthProvider> = auth;
    Ok((auth, store, config.root_path))
}

fn demo_backend() -> (Arc<dyn AuthProvider>, Arc<dyn DataStore>, String) {
    let store = MemoryStore::from_value(json!({
        "users": {
            DEMO_USER: {"name": "Asha"}
        },
        "orders": {
            DEMO_USER: {
                "latest": {
                    "items": {
                        "a": {"name": "Pen", "quantity": 2},
                        "b": {"name": "Notebook", "quantity": 1}
                    },
                    "total": 50,
                    "timestamp": "2024-01-01"
                },
                "history": {
                    "h1": {"total": 100, "timestamp": "2023-12-01"},
                    "h2": {"total": 200, "timestamp": "2023-12-15"}
                }
            }
        }
    }));
    let hub: Arc<dyn AuthProvider> = Arc::new(SessionHub::with_session(Session::new(DEMO_USER)));
    let store: Arc<dyn DataStore> = Arc::new(store);
    (hub, store, "/".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_constant() {
        assert!(!orderdash::VERSION.is_empty());
    }

    #[test]
    fn no_color_selects_monochrome_theme() {
        assert_eq!(theme_for(true), ColorTheme::monochrome());
        assert_eq!(theme_for(false), ColorTheme::default());
    }

    #[tokio::test]
    async fn demo_backend_renders_sample_data() {
        let (auth, store, root) = demo_backend();
        let mut app = Application::new(auth, store, PageState::new(), root);
        app.run_until_idle().await.unwrap();

        let text = app.page().to_plain_text();
        assert!(text.contains("Name: Asha"));
        assert!(text.contains("Pen x 2"));
        assert!(text.contains("₹200 on 2023-12-15"));
    }
}
