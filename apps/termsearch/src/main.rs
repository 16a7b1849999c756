use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use client_core::{
    load_settings, strength, transport::normalize_base_url, ClientSettings, GuardDecision, Route,
    TerminologyClient,
};
use shared::domain::{FormField, Session};
use tracing::debug;
use tracing_subscriber::EnvFilter;

mod render;

#[derive(Parser, Debug)]
#[command(name = "termsearch", about = "Scientific terminology search client")]
struct Cli {
    #[arg(long, global = true)]
    api_base_url: Option<String>,
    #[arg(long, global = true)]
    session_path: Option<PathBuf>,
    #[arg(long, global = true)]
    timeout_secs: Option<u64>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show how strong a password is without registering.
    Strength { password: String },
    Register {
        #[arg(long)]
        username: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
        #[arg(long)]
        confirm_password: String,
    },
    /// Store a session issued by the login service.
    Login {
        #[arg(long)]
        username: String,
        #[arg(long)]
        token: String,
    },
    Search { term: String },
    Logout,
    Whoami,
}

impl Cli {
    fn apply_overrides(&self, settings: &mut ClientSettings) {
        if let Some(v) = &self.api_base_url {
            settings.api_base_url = normalize_base_url(v);
        }
        if let Some(v) = &self.session_path {
            settings.session_path = v.clone();
        }
        if let Some(v) = self.timeout_secs {
            settings.request_timeout_secs = v;
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let mut settings = load_settings();
    cli.apply_overrides(&mut settings);
    debug!(?settings, "effective settings");

    if let Command::Strength { password } = &cli.command {
        print!("{}", render::strength_panel(&strength::score(password)));
        return Ok(());
    }

    let client = TerminologyClient::from_settings(&settings)?;

    match cli.command {
        Command::Strength { .. } => {}
        Command::Register {
            username,
            email,
            password,
            confirm_password,
        } => {
            let screen = client.register_screen();
            screen.edit(FormField::Username, username).await;
            screen.edit(FormField::Email, email).await;
            screen.edit(FormField::Password, password).await;
            screen.edit(FormField::ConfirmPassword, confirm_password).await;
            print!("{}", render::strength_panel(&screen.strength().await));

            match screen.submit().await {
                Some(navigation) => {
                    if let Some(notice) = navigation.notice {
                        println!("{notice}");
                    }
                    println!("Next: {}", render::next_step(navigation.route));
                }
                None => bail!(screen
                    .error()
                    .await
                    .unwrap_or_else(|| "Registration failed".to_string())),
            }
        }
        Command::Login { username, token } => {
            client.sign_in(&Session::new(token, username.clone()))?;
            println!("Signed in as {username}");
        }
        Command::Search { term } => {
            let screen = client.search_screen();
            if let GuardDecision::Redirect(route) = screen.mount().await {
                bail!("Not signed in. Next: {}", render::next_step(route));
            }
            if let Some(greeting) = screen.greeting().await {
                println!("{greeting}");
            }
            if let Some(route) = screen.submit(&term).await {
                bail!("Session rejected. Next: {}", render::next_step(route));
            }
            if let Some(error) = screen.error().await {
                bail!(error);
            }
            let heading = screen.results_heading().await.unwrap_or_default();
            print!("{}", render::results(&heading, &screen.results().await));
        }
        Command::Logout => {
            let screen = client.search_screen();
            let route = screen.logout().await?;
            println!("Logged out. Next: {}", render::next_step(route));
        }
        Command::Whoami => match client.current_session() {
            Some(session) => println!("{}", session.username),
            None => bail!("Not signed in. Next: {}", render::next_step(Route::Login)),
        },
    }

    Ok(())
}
