//! Backend entry-point: validates configuration, migrates the schema and
//! serves the landlord site.

mod server;

use std::net::{IpAddr, SocketAddr};

use actix_web::web;
use clap::Parser;
use color_eyre::eyre::{Context, Result};
use mockable::DefaultEnv;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use landlord_backend::inbound::http::health::HealthState;
use landlord_backend::inbound::http::session_config::{BuildMode, session_settings_from_env};
use landlord_backend::inbound::http::state::{HttpOptions, HttpState, ResetHandoff};
use landlord_backend::outbound::persistence::{DbPool, PoolConfig, run_pending_migrations};

use server::{ServerConfig, build_ports, create_server};

/// Landlord accounts server.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    /// Address to bind.
    #[arg(long, default_value = "0.0.0.0")]
    host: IpAddr,
    /// Port to bind.
    #[arg(long, default_value_t = 3000)]
    port: u16,
    /// How forgotten-password links reach the landlord.
    #[arg(long, value_enum, default_value_t = ResetHandoff::Notify)]
    reset_handoff: ResetHandoff,
    /// Accept contact form submissions.
    #[arg(long)]
    enable_contact_form: bool,
    /// Origin used in reset links; defaults to `http://localhost:<port>`.
    #[arg(long)]
    public_base_url: Option<String>,
}

impl Cli {
    fn http_options(&self) -> HttpOptions {
        let public_base_url = self
            .public_base_url
            .clone()
            .unwrap_or_else(|| format!("http://localhost:{}", self.port));
        HttpOptions {
            reset_handoff: self.reset_handoff,
            public_base_url: public_base_url.trim_end_matches('/').to_owned(),
            contact_form_enabled: self.enable_contact_form,
        }
    }
}

#[actix_web::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let cli = Cli::parse();
    let env = DefaultEnv::new();
    let session = session_settings_from_env(&env, BuildMode::from_debug_assertions())
        .wrap_err("invalid session settings")?;
    let pool_config = PoolConfig::from_env(&env).wrap_err("invalid database settings")?;

    let applied = run_pending_migrations(pool_config.database_url())
        .await
        .wrap_err("schema migration failed")?;
    info!(applied, "schema up to date");

    let pool = DbPool::new(pool_config)
        .await
        .wrap_err("database pool unavailable")?;
    let ports = build_ports(&pool);

    match ports.deletion.resume_pending_deletions().await {
        Ok(summary) => {
            for (landlord, error) in &summary.failed {
                warn!(%landlord, %error, "interrupted account deletion still pending");
            }
            info!(
                completed = summary.completed.len(),
                failed = summary.failed.len(),
                "resumed interrupted account deletions"
            );
        }
        Err(error) => warn!(%error, "could not scan for interrupted account deletions"),
    }

    let http_state = HttpState::new(ports, cli.http_options());
    let config = ServerConfig::new(session, SocketAddr::new(cli.host, cli.port));
    #[cfg(feature = "metrics")]
    let config = config.with_metrics(server::request_metrics()?);

    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state.clone(), http_state, config)?;
    health_state.mark_ready();
    server.await?;
    info!("server stopped");
    Ok(())
}
