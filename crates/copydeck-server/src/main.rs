use anyhow::Context;
use clap::{value_parser, Arg, ArgAction, Command};
use copydeck_server::{routes, telemetry, AppState, LogFormat, ServerConfig};
use std::net::SocketAddr;
use std::path::PathBuf;

fn cli() -> Command {
    Command::new("copydeck-server")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Config blob store, chat, sample generation and TTS endpoints")
        .arg(
            Arg::new("config")
                .long("config")
                .short('c')
                .env("COPYDECK_CONFIG")
                .value_parser(value_parser!(PathBuf))
                .help("Path to a TOML configuration file"),
        )
        .arg(
            Arg::new("bind")
                .long("bind")
                .env("COPYDECK_BIND")
                .value_parser(value_parser!(SocketAddr))
                .help("Listen address, e.g. 127.0.0.1:3000"),
        )
        .arg(
            Arg::new("blob-root")
                .long("blob-root")
                .value_parser(value_parser!(PathBuf))
                .help("Directory holding config blobs"),
        )
        .arg(
            Arg::new("public-base-url")
                .long("public-base-url")
                .help("Base URL under which blobs are reachable"),
        )
        .arg(
            Arg::new("json-logs")
                .long("json-logs")
                .action(ArgAction::SetTrue)
                .help("Emit logs as JSON"),
        )
}

fn load_config(matches: &clap::ArgMatches) -> anyhow::Result<ServerConfig> {
    let mut config = match matches.get_one::<PathBuf>("config") {
        Some(path) => ServerConfig::load(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => ServerConfig::default(),
    };

    if let Some(addr) = matches.get_one::<SocketAddr>("bind") {
        config = config.with_bind_addr(*addr);
    }
    if let Some(root) = matches.get_one::<PathBuf>("blob-root") {
        config = config.with_blob_root(root.clone());
    }
    if let Some(url) = matches.get_one::<String>("public-base-url") {
        config = config.with_public_base_url(url.clone());
    }
    if matches.get_flag("json-logs") {
        config.log.format = LogFormat::Json;
    }
    Ok(config.with_env_api_key())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let matches = cli().get_matches();
    let config = load_config(&matches)?;
    telemetry::init(&config.log);

    let state = AppState::from_config(&config).context("building backends")?;
    tracing::info!(
        addr = %config.bind_addr,
        blobs = %config.blob_root.display(),
        model = %config.llm.model,
        "copydeck-server listening"
    );

    let (_, server) = warp::serve(routes(state))
        .try_bind_with_graceful_shutdown(config.bind_addr, async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!("failed to listen for shutdown signal: {}", e);
            }
        })
        .with_context(|| format!("binding {}", config.bind_addr))?;
    server.await;

    tracing::info!("copydeck-server stopped");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_overrides_defaults() {
        let matches = cli()
            .try_get_matches_from([
                "copydeck-server",
                "--bind",
                "0.0.0.0:8080",
                "--blob-root",
                "/srv/blobs",
                "--json-logs",
            ])
            .unwrap();
        let config = load_config(&matches).unwrap();
        assert_eq!(config.bind_addr, SocketAddr::from(([0, 0, 0, 0], 8080)));
        assert_eq!(config.blob_root, PathBuf::from("/srv/blobs"));
        assert_eq!(config.log.format, LogFormat::Json);
    }

    #[test]
    fn cli_is_consistent() {
        cli().debug_assert();
    }
}
