// Main entry point
use clap::Parser;
use colored::Colorize;

use routesaathi::application::filter::FilterCriteria;
use routesaathi::application::pages::{self, PageContext};
use routesaathi::application::session;
use routesaathi::domain::model::Role;
use routesaathi::infrastructure::config::{self, load_config, Logging};
use routesaathi::infrastructure::storage::session::SqliteSessionStore;
use routesaathi::interfaces::cli::{Cli, Command};
use routesaathi::presentation::render::RenderOptions;
use routesaathi::presentation::theme::Theme;
use routesaathi::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Setup graceful shutdown handler
    let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel::<()>();

    // Spawn signal handler task
    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            eprintln!("Failed to listen for shutdown signal: {}", e);
        } else {
            let _ = shutdown_tx.send(());
        }
    });

    let cli = Cli::parse();
    let config = load_config()?;

    // Initialize logging
    if config.logging.enable {
        init_logging(&config.logging)?;
    }

    // Session store lives next to the config file
    let db_path = config::get_session_db_path();
    if let Some(parent) = db_path.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }
    let sessions = SqliteSessionStore::open(&db_path).await?;
    let state = AppState::new(sessions, config.clone())?;

    // Load theme
    let theme_name = cli.theme.as_deref().unwrap_or(config.theme.as_str());
    let ctx = PageContext {
        theme: Theme::from_name(theme_name),
        render: RenderOptions {
            enable_emoji: config.enable_emoji,
        },
        json: cli.json,
    };

    match cli.command {
        Command::Login {
            role,
            username,
            password,
        } => {
            let role: Role = match role.parse() {
                Ok(role) => role,
                Err(e) => {
                    eprintln!("{}", e.red());
                    std::process::exit(1);
                }
            };
            match session::login(&state, &username, &password, role).await {
                Ok(session) => {
                    println!(
                        "{}",
                        format!("Logged in as {} ({})", session.username, session.user_role)
                            .green()
                    );
                }
                Err(err) => {
                    // The store is untouched; show the server's detail
                    eprintln!("{}", err.to_string().red());
                    std::process::exit(1);
                }
            }
        }
        Command::Logout => {
            session::logout(&state).await?;
            println!("Logged out.");
        }
        Command::Status => {
            print_status(&state).await?;
        }
        Command::Dashboard => {
            pages::show_dashboard(&state, &ctx).await?;
        }
        Command::Buses {
            route,
            status,
            search,
            watch,
            export,
        } => {
            let criteria = FilterCriteria {
                route,
                status,
                search,
            };
            pages::show_buses(&state, &ctx, criteria, watch, export.as_deref(), shutdown_rx)
                .await?;
        }
        Command::Conductors {
            search,
            online,
            thread,
        } => {
            let criteria = FilterCriteria {
                route: None,
                status: online.then(|| "online".to_string()),
                search,
            };
            pages::show_conductors(&state, &ctx, criteria, thread).await?;
        }
        Command::Messages => {
            pages::show_messages(&state, &ctx).await?;
        }
        Command::Send { conductor, message } => match conductor {
            Some(id) => pages::send_to_conductor(&state, &ctx, id, &message).await?,
            None => pages::send_to_coordinator(&state, &ctx, &message).await?,
        },
        Command::Report { issue, note } => {
            pages::report_issue(&state, &ctx, &issue, note.as_deref()).await?;
        }
        Command::Broadcast { message, route } => {
            pages::broadcast(&state, &ctx, &message, route.as_deref()).await?;
        }
        Command::Recommendations {
            priority,
            apply,
            apply_all,
        } => {
            if let Some(route) = apply {
                pages::apply_recommendation(&state, &ctx, &route).await?;
            } else if apply_all {
                pages::apply_all_recommendations(&state, &ctx).await?;
            } else {
                let criteria = FilterCriteria {
                    route: None,
                    status: priority,
                    search: None,
                };
                pages::show_recommendations(&state, &ctx, criteria).await?;
            }
        }
        Command::GenerateConfig => {
            config::generate_config_sample()?;
        }
    }

    Ok(())
}

/// Initialize logging with path and level configuration
fn init_logging(logging: &Logging) -> anyhow::Result<()> {
    use tracing_subscriber::EnvFilter;

    let level = match logging.level.as_str() {
        "DEBUG" => "debug",
        "INFO" => "info",
        "WARN" => "warn",
        "ERROR" => "error",
        _ => "warn",
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    if let Some(path) = &logging.path {
        if !path.is_empty() {
            // Log to file
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)?;
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(file)
                .init();
            return Ok(());
        }
    }

    // Log to stderr (default)
    tracing_subscriber::fmt().with_env_filter(filter).init();

    Ok(())
}

async fn print_status(state: &AppState) -> anyhow::Result<()> {
    println!("{}", "saathi Status".green().bold());
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

    let config = state.config.read().await;
    println!(
        "Config: {}",
        config::get_config_path()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "Not found".to_string())
    );
    println!("API: {}", config.base_url);
    drop(config);

    // Session status
    match session::current_session(state).await? {
        Some(s) => {
            println!("Session: {} ({}), since {}", s.username, s.user_role, s.login_time);
        }
        None => println!("Session: Not logged in"),
    }

    // Reachability: one cheap read against the API
    match state.api.dashboard_stats().await {
        Ok(_) => println!("Server: Reachable"),
        Err(err) => println!("Server: Unreachable ({})", err),
    }

    Ok(())
}
