//! Panel entry-point: loads settings, wires adapters, and runs the shell on
//! stdin/stdout.
#![cfg_attr(not(any(test, doctest)), deny(clippy::unwrap_used))]
#![cfg_attr(not(any(test, doctest)), deny(clippy::expect_used))]

use std::ffi::OsString;
use std::io;
use std::sync::Arc;

use clap::Parser;
use color_eyre::eyre::{Context, Result, eyre};
use mockable::DefaultClock;
use ortho_config::OrthoConfig;
use pagination::PageNumber;
use tokio::io::BufReader;
use tokio::runtime::Builder;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use panel::PanelSettings;
use panel::domain::Route;
use panel::inbound::shell::{Shell, ShellOptions};
use panel::outbound::directory::HttpUserDirectory;
use panel::outbound::session_store::FileSessionStore;

/// `panel` command arguments.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "panel",
    about = "List, search, edit, and delete users in a remote directory",
    version
)]
struct CliArgs {
    /// Route to open first: `/` (login) or `/users`.
    #[arg(long = "start-route", value_name = "path", default_value = "/users")]
    start_route: Route,
    /// Page to load first when the users route opens.
    #[arg(long, value_name = "n", default_value = "1")]
    page: PageNumber,
}

fn main() -> Result<()> {
    color_eyre::install()?;
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .with_writer(io::stderr)
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let args = CliArgs::parse();
    let settings = PanelSettings::load_from_iter([OsString::from("panel")])
        .map_err(|error| eyre!("failed to load panel settings: {error}"))?;

    let base_url = settings
        .api_base_url()
        .wrap_err("PANEL_API_BASE_URL is not a valid URL")?;
    info!(base_url = %base_url, "starting panel");
    let mut directory = HttpUserDirectory::new(base_url, settings.request_timeout())
        .wrap_err("failed to build the directory HTTP client")?;
    if let Some(api_key) = settings.api_key() {
        directory = directory.with_api_key(api_key);
    }
    let store = FileSessionStore::open(settings.store_path())
        .wrap_err("failed to open the session store")?;
    info!(store = %store.path().display(), "session store opened");

    let shell = Shell::new(
        Arc::new(directory),
        Arc::new(store),
        Arc::new(DefaultClock),
        ShellOptions {
            start_route: args.start_route,
            start_page: args.page,
            session_ttl_secs: settings.session_ttl_secs(),
        },
    );

    let runtime = Builder::new_current_thread()
        .enable_all()
        .build()
        .wrap_err("failed to build the shell runtime")?;
    runtime
        .block_on(async {
            let input = BufReader::new(tokio::io::stdin());
            let mut out = io::stdout().lock();
            shell.run(input, &mut out).await
        })
        .wrap_err("shell terminated with an I/O error")
}
