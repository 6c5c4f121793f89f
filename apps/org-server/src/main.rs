use anyhow::{anyhow, Context, Result};
use axum::Router;
use clap::{Parser, Subcommand};
use mimalloc::MiMalloc;
use org_info::config::{OrgInfoConfig, StorageKind};
use org_info::infra::storage::InMemoryStore;
use org_info::{OrgInfo, StoreBackend};
use runtime::{AppConfig, CliArgs, DatabaseConfig};
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

/// Expand a sqlite DSN into an absolute-path DSN using a base directory.
/// - Keeps "sqlite::memory:" as-is.
/// - Normalizes backslashes into forward slashes (important on Windows).
fn absolutize_sqlite_dsn(dsn: &str, base_dir: &Path) -> Result<String> {
    if dsn.eq_ignore_ascii_case("sqlite::memory:") || dsn.eq_ignore_ascii_case("sqlite://:memory:")
    {
        return Ok("sqlite::memory:".to_string());
    }
    let db_path = dsn
        .strip_prefix("sqlite://")
        .ok_or_else(|| anyhow!("DSN must start with sqlite:// (got: {})", dsn))?;

    let (path_str, query) = match db_path.split_once('?') {
        Some((p, q)) => (p, Some(q)),
        None => (db_path, None),
    };

    let mut p = PathBuf::from(path_str);
    if p.as_os_str().is_empty() {
        return Err(anyhow!("Empty SQLite path in DSN"));
    }
    if p.is_relative() {
        p = base_dir.join(p);
    }
    if let Some(dir) = p.parent() {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("cannot create database directory {}", dir.display()))?;
    }

    let mut out = String::from("sqlite://");
    out.push_str(&p.to_string_lossy().replace('\\', "/"));
    out.push('?');
    // Create the file on first use unless the DSN says otherwise.
    out.push_str(query.unwrap_or("mode=rwc"));
    Ok(out)
}

/// Organization records server: departments, employees and projects
#[derive(Parser)]
#[command(name = "org-server")]
#[command(about = "Organization records server - departments, employees and projects")]
#[command(version = "0.1.0")]
struct Cli {
    /// Path to configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Port for HTTP server (overrides config)
    #[arg(short, long)]
    port: Option<u16>,

    /// Print current configuration and exit
    #[arg(long)]
    print_config: bool,

    /// Log verbosity level (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Keep records in memory instead of the configured database
    #[arg(long)]
    mock: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the server
    Run,
    /// Check configuration
    Check,
    /// Apply database migrations and exit
    Migrate,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let args = CliArgs {
        config: cli.config.as_ref().map(|p| p.to_string_lossy().to_string()),
        port: cli.port,
        print_config: cli.print_config,
        verbose: cli.verbose,
        mock: cli.mock,
    };

    // Load configuration (normalized home_dir is applied inside)
    let mut config = AppConfig::load_or_default(cli.config.as_deref())?;
    config.apply_cli_overrides(&args);

    let logging_config = config.logging.clone().unwrap_or_default();
    runtime::logging::init_logging_from_config(&logging_config, Path::new(&config.server.home_dir));
    tracing::info!("org-server starting");

    if cli.print_config {
        println!("{}", config.to_yaml()?);
        return Ok(());
    }

    match cli.command.unwrap_or(Commands::Run) {
        Commands::Run => run_server(config, args).await,
        Commands::Check => check_config(config, args),
        Commands::Migrate => migrate(config, args).await,
    }
}

/// `modules.org_info`, with `--mock` forcing the in-memory store.
fn org_info_config(config: &AppConfig, args: &CliArgs) -> Result<OrgInfoConfig> {
    let mut module: OrgInfoConfig = config.module_config("org_info")?;
    if args.mock {
        module.storage = StorageKind::Memory;
    }
    Ok(module)
}

fn database_section(config: &AppConfig) -> Result<&DatabaseConfig> {
    config
        .database
        .as_ref()
        .ok_or_else(|| anyhow!("database storage selected but no database section configured"))
}

async fn connect_database(db_config: &DatabaseConfig, base_dir: &Path) -> Result<DatabaseConnection> {
    let mut dsn = db_config.dsn()?;
    if db_config.backend()? == "sqlite" {
        dsn = absolutize_sqlite_dsn(&dsn, base_dir)?;
    }

    let mut opts = ConnectOptions::new(dsn.clone());
    opts.max_connections(db_config.max_conns.unwrap_or(25))
        .min_connections(db_config.min_conns.unwrap_or(5))
        .acquire_timeout(Duration::from_millis(
            db_config.acquire_timeout_ms.unwrap_or(5_000),
        ))
        .sqlx_logging(false);

    tracing::info!("Connecting to database: {}", redact(&dsn));
    let db = Database::connect(opts)
        .await
        .with_context(|| format!("failed to connect to {}", redact(&dsn)))?;
    tracing::info!("Connected DB backend: {:?}", db.get_database_backend());
    Ok(db)
}

/// Hide the password part of a DSN for logs.
fn redact(dsn: &str) -> String {
    match (dsn.find("://"), dsn.rfind('@')) {
        (Some(scheme_end), Some(at)) if at > scheme_end => {
            let creds = &dsn[scheme_end + 3..at];
            match creds.split_once(':') {
                Some((user, _)) => format!("{}{}:***{}", &dsn[..scheme_end + 3], user, &dsn[at..]),
                None => dsn.to_string(),
            }
        }
        _ => dsn.to_string(),
    }
}

async fn build_backend(config: &AppConfig, module: &OrgInfoConfig) -> Result<StoreBackend> {
    match module.storage {
        StorageKind::Memory => {
            tracing::warn!("org_info uses the in-memory store; records are lost on exit");
            Ok(StoreBackend::Memory(InMemoryStore::new()))
        }
        StorageKind::Database => {
            let db =
                connect_database(database_section(config)?, Path::new(&config.server.home_dir))
                    .await?;
            OrgInfo::migrate(&db).await?;
            Ok(StoreBackend::Database(db))
        }
    }
}

async fn run_server(config: AppConfig, args: CliArgs) -> Result<()> {
    tracing::info!("Initializing modules...");
    let module_config = org_info_config(&config, &args)?;
    let backend = build_backend(&config, &module_config).await?;
    let org_info = OrgInfo::init(module_config, backend);

    let mut app = org_info
        .register_rest(Router::new())
        .layer(TraceLayer::new_for_http());
    if config.server.timeout_sec > 0 {
        app = app.layer(TimeoutLayer::new(Duration::from_secs(config.server.timeout_sec)));
    }

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind address {addr}"))?;
    tracing::info!("HTTP server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server failed")?;

    tracing::info!("org-server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("failed to listen for ctrl-c: {}", e);
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => tracing::error!("failed to listen for SIGTERM: {}", e),
        }
    };
    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    tracing::info!("shutdown signal received");
}

fn check_config(config: AppConfig, args: CliArgs) -> Result<()> {
    tracing::info!("Checking configuration...");

    let module = org_info_config(&config, &args)?;
    if module.storage == StorageKind::Database {
        let db = database_section(&config)?;
        let backend = db.backend()?;
        tracing::info!("database backend: {}", backend);
    }

    tracing::info!("Configuration is valid");
    println!("Configuration check passed");
    println!("{}", config.to_yaml()?);
    Ok(())
}

async fn migrate(config: AppConfig, args: CliArgs) -> Result<()> {
    if args.mock {
        println!("In-memory store needs no migrations");
        return Ok(());
    }
    let db = connect_database(database_section(&config)?, Path::new(&config.server.home_dir))
        .await?;
    OrgInfo::migrate(&db).await?;
    println!("Migrations applied");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absolutize_keeps_memory_dsn() {
        let base = Path::new("/srv/org");
        assert_eq!(
            absolutize_sqlite_dsn("sqlite://:memory:", base).unwrap(),
            "sqlite::memory:"
        );
    }

    #[test]
    fn test_absolutize_anchors_relative_paths() {
        let tmp = tempfile::tempdir().unwrap();
        let dsn = absolutize_sqlite_dsn("sqlite://data/org.db", tmp.path()).unwrap();
        assert!(dsn.starts_with("sqlite://"));
        assert!(dsn.ends_with("data/org.db?mode=rwc"));
        assert!(tmp.path().join("data").exists());
    }

    #[test]
    fn test_absolutize_rejects_foreign_scheme() {
        assert!(absolutize_sqlite_dsn("postgres://x/y", Path::new("/")).is_err());
    }

    #[test]
    fn test_redact_hides_password() {
        assert_eq!(
            redact("postgres://org:s3cret@db:5432/records"),
            "postgres://org:***@db:5432/records"
        );
        assert_eq!(redact("sqlite:///tmp/org.db"), "sqlite:///tmp/org.db");
    }
}
