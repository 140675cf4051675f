//! Action handlers and key resolution

use anyhow::Result;
use clap::CommandFactory;
use openblu_core::{pipeline, CredentialStore, FilterField, FilterSpec, OpenBluError, Pipeline};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::client::{mask_key, OpenBluClient};
use crate::config::CliConfig;
use crate::format::{
    format_criteria, format_server_info, format_servers, format_success, format_warning,
    OutputFormat,
};
use crate::ovpn;

use super::commands::{Action, Cli};

/// Ask for the key on the terminal without echoing it
pub fn prompt_for_key() -> std::io::Result<String> {
    rpassword::prompt_password("OpenBlu access key: ")
}

/// Find the API key to use.
///
/// A stored key wins over the `--key` flag; without either the user is
/// prompted.
pub fn resolve_key<P>(
    store: &CredentialStore,
    flag: Option<&str>,
    prompt: P,
) -> openblu_core::Result<String>
where
    P: FnOnce() -> std::io::Result<String>,
{
    if let Some(key) = store.resolve(flag)? {
        debug!(key = %mask_key(&key), path = %store.path().display(), "using access key");
        return Ok(key);
    }

    let answer =
        prompt().map_err(|e| OpenBluError::Auth(format!("Could not read access key: {}", e)))?;
    let answer = answer.trim();
    if answer.is_empty() {
        return Err(OpenBluError::Auth(
            "An access key is required; pass --key or run --set-access-key".to_string(),
        ));
    }
    Ok(answer.to_string())
}

/// Status lines share stdout with the result except in JSON mode, where
/// stdout carries only the document.
fn status_to_stderr(format: &OutputFormat) -> bool {
    *format == OutputFormat::Json
}

fn print_status(format: &OutputFormat, line: &str) {
    if status_to_stderr(format) {
        eprintln!("{}", line);
    } else {
        println!("{}", line);
    }
}

/// Handle --set-access-key
pub fn handle_set_access_key(store: &CredentialStore, key: &str) -> Result<()> {
    store.save(key)?;
    info!(path = %store.path().display(), "stored access key");
    println!(
        "{}",
        format_success(&format!("Access key saved to {}", store.path().display()))
    );
    Ok(())
}

/// Handle --fetch-servers
pub async fn handle_fetch_servers(
    client: &OpenBluClient,
    key: &str,
    pipeline: &Pipeline,
    format: &OutputFormat,
    verbose: bool,
) -> Result<()> {
    if verbose {
        eprintln!("Fetching available VPN servers from {}", client.base_url());
        eprintln!("{}", format_criteria(pipeline));
    }

    let servers = client.list_servers(key).await?;
    let total = servers.len();
    let selected = pipeline.apply(servers);
    debug!(total, shown = selected.len(), "listing servers");

    println!("{}", format_servers(&selected, format, verbose)?);
    Ok(())
}

/// Handle --connect-best
///
/// Returns the path of the written configuration.
pub async fn handle_connect_best(
    client: &OpenBluClient,
    key: &str,
    country: Option<&str>,
    out_dir: &Path,
    format: &OutputFormat,
) -> Result<PathBuf> {
    let servers = client.list_servers(key).await?;

    let candidates = match country {
        Some(country) => {
            let in_country = pipeline::filter(
                servers.clone(),
                &FilterSpec::new(FilterField::Country, country),
            );
            if in_country.is_empty() {
                warn!(country, "no server in requested country");
                eprintln!(
                    "{}",
                    format_warning(&format!(
                        "No server found in '{}', picking the best one anywhere",
                        country
                    ))
                );
                servers
            } else {
                in_country
            }
        }
        None => servers,
    };

    let best = pipeline::best_by_score(&candidates)
        .ok_or_else(|| OpenBluError::NotFound("no servers available".to_string()))?;
    info!(id = %best.id, score = best.score, "selected best server");

    let path = download_config(client, key, &best.id, out_dir, format, false).await?;
    print_status(format, &format!("Run: openvpn --config {}", path.display()));
    Ok(path)
}

/// Handle --info
///
/// Returns the path of the written configuration.
pub async fn handle_info(
    client: &OpenBluClient,
    key: &str,
    id: &str,
    out_dir: &Path,
    format: &OutputFormat,
    verbose: bool,
) -> Result<PathBuf> {
    download_config(client, key, id, out_dir, format, verbose).await
}

async fn download_config(
    client: &OpenBluClient,
    key: &str,
    id: &str,
    out_dir: &Path,
    format: &OutputFormat,
    verbose: bool,
) -> Result<PathBuf> {
    ovpn::validate_server_id(id)?;

    let info = client.get_server_info(key, id).await?;
    let blob = info.ovpn_configuration().ok_or_else(|| {
        OpenBluError::Parse(format!("Server {} has no OpenVPN configuration", id))
    })?;

    println!("{}", format_server_info(&info, format, verbose)?);

    let path = ovpn::save_config(out_dir, id, blob)?;
    print_status(
        format,
        &format_success(&format!("Configuration saved to {}", path.display())),
    );
    Ok(path)
}

/// Run the action selected by `cli`.
///
/// `out_dir` receives `.ovpn` files; `prompt` is only called when no key is
/// stored or passed.
pub async fn dispatch<P>(cli: &Cli, config: &CliConfig, out_dir: &Path, prompt: P) -> Result<()>
where
    P: FnOnce() -> std::io::Result<String>,
{
    let action = cli.action()?;
    // Catch flag mistakes before prompting or touching the network
    let pipeline = cli.pipeline()?;
    let format = OutputFormat::from_config(&config.output_format);
    let store = CredentialStore::new(&config.credential_path);

    let session = |prompt: P| -> Result<(OpenBluClient, String)> {
        let key = resolve_key(&store, cli.key.as_deref(), prompt)?;
        let client = OpenBluClient::with_config(config.endpoint.clone(), config.timeout)?;
        Ok((client, key))
    };

    match action {
        Action::SaveKey(key) => handle_set_access_key(&store, &key),
        Action::FetchServers => {
            let (client, key) = session(prompt)?;
            handle_fetch_servers(&client, &key, &pipeline, &format, config.verbose).await
        }
        Action::ConnectBest => {
            let (client, key) = session(prompt)?;
            handle_connect_best(&client, &key, cli.country.as_deref(), out_dir, &format).await?;
            Ok(())
        }
        Action::Info(id) => {
            let (client, key) = session(prompt)?;
            handle_info(&client, &key, &id, out_dir, &format, config.verbose).await?;
            Ok(())
        }
    }
}

/// Build configuration using priority chain: defaults → file → env → CLI args
///
/// A bad value given on the command line is a usage error; file and
/// environment problems are not.
pub fn build_config(cli: &Cli) -> Result<CliConfig> {
    let usage = |e: anyhow::Error| OpenBluError::Usage(e.to_string());

    let mut builder = CliConfig::builder()
        .with_config_file(!cli.no_config)?
        .with_env_overrides();

    if let Some(ref endpoint) = cli.endpoint {
        builder = builder.with_endpoint(endpoint).map_err(usage)?;
    }
    if let Some(ref format) = cli.format {
        builder = builder.with_output_format(format.as_str()).map_err(usage)?;
    }
    if cli.verbose {
        builder = builder.with_verbose(true);
    }

    builder.build()
}

/// Generate shell completion
pub fn generate_completion(shell: clap_complete::Shell) {
    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();
    clap_complete::generate(shell, &mut cmd, name, &mut std::io::stdout());
}

/// Process exit status for an error returned by [`dispatch`]
pub fn exit_code(err: &anyhow::Error) -> i32 {
    err.downcast_ref::<OpenBluError>()
        .map(OpenBluError::exit_code)
        .unwrap_or(1)
}
