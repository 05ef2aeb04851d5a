use std::fmt;
use std::sync::Arc;

use dashboard_core::model::UserId;
use dioxus::LaunchBuilder;
use dioxus::desktop::{Config as DesktopConfig, WindowBuilder};
use services::{
    AppServices, Backend, Clock, DashboardContext, DashboardService, RemoteConfig, SessionUser,
};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use ui::{App, DesktopLinkOpener, LinkOpenerRef, UiApp, build_app_context};
use url::Url;

const DEFAULT_LOG_FILTER: &str = "services=info,storage=info,ui=info";
const DEFAULT_LAB_URL: &str = "https://lab.example.com";

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidDbUrl { raw: String },
    InvalidUrl { flag: &'static str, raw: String },
    InvalidUserId { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidDbUrl { raw } => write!(f, "invalid --db value: {raw}"),
            ArgsError::InvalidUrl { flag, raw } => write!(f, "invalid {flag} value: {raw}"),
            ArgsError::InvalidUserId { raw } => write!(f, "invalid --user value: {raw}"),
        }
    }
}

impl std::error::Error for ArgsError {}

fn require_value(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<String, ArgsError> {
    args.next().ok_or(ArgsError::MissingValue { flag })
}

fn parse_url(flag: &'static str, raw: String) -> Result<Url, ArgsError> {
    Url::parse(raw.trim()).map_err(|_| ArgsError::InvalidUrl { flag, raw })
}

fn non_blank_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

struct DesktopApp {
    dashboard: Arc<DashboardService>,
    session: DashboardContext,
}

impl UiApp for DesktopApp {
    fn dashboard(&self) -> Arc<DashboardService> {
        Arc::clone(&self.dashboard)
    }

    fn session(&self) -> DashboardContext {
        self.session.clone()
    }

    fn link_opener(&self) -> LinkOpenerRef {
        Arc::new(DesktopLinkOpener)
    }
}

#[derive(Debug)]
struct Args {
    db_url: String,
    api_url: Option<String>,
    user_id: Option<UserId>,
    email: Option<String>,
    plan: Option<String>,
    lab_url: Url,
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  cargo run -p app -- [options]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --db <sqlite_url>    SQLite URL (default: sqlite://dev.sqlite3)");
    eprintln!("  --api <url>          Read from the remote API instead of SQLite");
    eprintln!("  --user <id>          Signed-in user id (default: none, empty dashboard)");
    eprintln!("  --email <address>    Email used to open courses in the lab");
    eprintln!("  --plan <name>        Subscription plan: free, basic, premium");
    eprintln!("  --lab-url <url>      Learning environment base URL (default: {DEFAULT_LAB_URL})");
    eprintln!("  -h, --help           Show this help");
    eprintln!();
    eprintln!("Environment (same as flags):");
    eprintln!("  LEARN_DB_URL, LEARN_API_URL, LEARN_API_KEY, LEARN_USER_ID,");
    eprintln!("  LEARN_USER_EMAIL, LEARN_PLAN, LEARN_LAB_URL, RUST_LOG");
}

impl Args {
    fn parse(args: &mut impl Iterator<Item = String>) -> Result<Self, ArgsError> {
        let mut db_url = std::env::var("LEARN_DB_URL")
            .ok()
            .map_or_else(|| "sqlite://dev.sqlite3".into(), normalize_sqlite_url);
        let mut api_url = non_blank_env("LEARN_API_URL");
        let mut user_id = non_blank_env("LEARN_USER_ID").map(UserId::new);
        let mut email = non_blank_env("LEARN_USER_EMAIL");
        let mut plan = non_blank_env("LEARN_PLAN");
        let mut lab_url = parse_url(
            "LEARN_LAB_URL",
            std::env::var("LEARN_LAB_URL").unwrap_or_else(|_| DEFAULT_LAB_URL.into()),
        )?;

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--db" => {
                    let value = require_value(args, "--db")?;
                    if value.trim().is_empty() {
                        return Err(ArgsError::InvalidDbUrl { raw: value });
                    }
                    db_url = normalize_sqlite_url(value);
                }
                "--api" => {
                    let value = require_value(args, "--api")?;
                    parse_url("--api", value.clone())?;
                    api_url = Some(value);
                }
                "--user" => {
                    let value = require_value(args, "--user")?;
                    let parsed = value
                        .parse::<UserId>()
                        .map_err(|_| ArgsError::InvalidUserId { raw: value.clone() })?;
                    user_id = Some(parsed);
                }
                "--email" => email = Some(require_value(args, "--email")?),
                "--plan" => plan = Some(require_value(args, "--plan")?),
                "--lab-url" => {
                    lab_url = parse_url("--lab-url", require_value(args, "--lab-url")?)?;
                }
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        Ok(Self {
            db_url,
            api_url,
            user_id,
            email,
            plan,
            lab_url,
        })
    }

    fn session(&self) -> DashboardContext {
        let user = self.user_id.clone().map(|id| {
            let user = SessionUser::new(id);
            match &self.email {
                Some(email) => user.with_email(email.as_str()),
                None => user,
            }
        });
        DashboardContext {
            user,
            plan: self.plan.clone(),
        }
    }
}

fn normalize_sqlite_url(raw: String) -> String {
    if raw == "sqlite::memory:" || raw.starts_with("sqlite://") {
        return raw;
    }

    let trimmed = raw.trim().to_string();
    let path_str = trimmed
        .strip_prefix("sqlite:")
        .unwrap_or(trimmed.as_str())
        .to_string();
    let path = std::path::Path::new(&path_str);
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .unwrap_or_else(|_| std::path::PathBuf::from("."))
            .join(path)
    };
    format!("sqlite://{}", absolute.display())
}

fn prepare_sqlite_file(db_url: &str) -> Result<(), Box<dyn std::error::Error>> {
    if db_url == "sqlite::memory:" {
        return Ok(());
    }

    let path = db_url
        .strip_prefix("sqlite://")
        .ok_or_else(|| ArgsError::InvalidDbUrl {
            raw: db_url.to_string(),
        })?;
    let path = path.split('?').next().unwrap_or(path);
    if path.is_empty() {
        return Err(ArgsError::InvalidDbUrl {
            raw: db_url.to_string(),
        }
        .into());
    }

    let path = std::path::Path::new(path);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    if !path.exists() {
        std::fs::OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(path)?;
    }

    Ok(())
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_LOG_FILTER.into()))
        .with(tracing_subscriber::fmt::layer())
        .init();
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    let mut argv = std::env::args().skip(1);
    let parsed = Args::parse(&mut argv).map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?;

    let backend = match &parsed.api_url {
        Some(api_url) => {
            let api_key = non_blank_env("LEARN_API_KEY");
            Backend::Remote(RemoteConfig::new(api_url, api_key)?)
        }
        None => {
            // Open + migrate SQLite at startup. Keep this in the binary glue so core/services stay pure.
            prepare_sqlite_file(&parsed.db_url)?;
            Backend::Sqlite {
                db_url: parsed.db_url.clone(),
            }
        }
    };

    let services =
        AppServices::connect(backend, parsed.lab_url.clone(), Clock::default_clock()).await?;
    let session = parsed.session();
    if session.user.is_none() {
        tracing::info!("no user configured; the dashboard will be empty");
    }

    let app: Arc<dyn UiApp> = Arc::new(DesktopApp {
        dashboard: services.dashboard(),
        session,
    });
    let context = build_app_context(&app);

    // On macOS, Dioxus/tao can default to an always-on-top window in some dev setups.
    let desktop_cfg = DesktopConfig::new().with_window(
        WindowBuilder::new()
            .with_title("Learn")
            .with_always_on_top(false),
    );

    LaunchBuilder::desktop()
        .with_cfg(desktop_cfg)
        .with_context(context)
        .launch(App);
    Ok(())
}

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        // At this layer (binary glue), printing once is fine.
        eprintln!("{err}");
        std::process::exit(2);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Args, ArgsError> {
        let mut iter = args.iter().map(|s| (*s).to_owned());
        Args::parse(&mut iter)
    }

    #[test]
    fn flags_build_the_session() {
        let args = parse(&[
            "--user", "u1", "--email", "kid@example.com", "--plan", "premium", "--db",
            "sqlite::memory:",
        ])
        .unwrap();
        let session = args.session();
        assert_eq!(session.user_id(), Some(&UserId::new("u1")));
        assert_eq!(session.email(), Some("kid@example.com"));
        assert_eq!(session.plan(), Some("premium"));
        assert_eq!(args.db_url, "sqlite::memory:");
    }

    #[test]
    fn bad_lab_url_is_rejected() {
        let err = parse(&["--lab-url", "not a url"]).unwrap_err();
        assert!(matches!(err, ArgsError::InvalidUrl { flag: "--lab-url", .. }));
    }

    #[test]
    fn missing_value_is_reported() {
        let err = parse(&["--user"]).unwrap_err();
        assert!(matches!(err, ArgsError::MissingValue { flag: "--user" }));
    }

    #[test]
    fn relative_sqlite_paths_become_absolute() {
        let url = normalize_sqlite_url("sqlite:data/dev.sqlite3".into());
        assert!(url.starts_with("sqlite:///"), "{url}");
        assert!(url.ends_with("data/dev.sqlite3"));
    }
}
