//! Integration tests for the OpenBlu CLI
//!
//! These run the public library surface the binary uses, without a network:
//! flag parsing, key storage and the listing pipeline.

use anyhow::Result;
use clap::Parser;
use openblu_core::{CredentialStore, OpenBluError, Pipeline, ServerRecord};
use openbluctl::cli::{dispatch, exit_code, Action, Cli};
use openbluctl::config::CliConfig;
use tempfile::TempDir;

fn parse(args: &[&str]) -> Cli {
    Cli::try_parse_from(std::iter::once("openbluctl").chain(args.iter().copied()))
        .expect("valid arguments")
}

fn config_in(dir: &TempDir) -> CliConfig {
    CliConfig::builder()
        // Nothing listens on the discard port; tests must not reach it
        .with_endpoint("http://127.0.0.1:9")
        .and_then(|b| b.with_timeout(2))
        .map(|b| b.with_credential_path(dir.path().join("access_key")))
        .and_then(|b| b.build())
        .expect("valid config")
}

fn no_prompt() -> std::io::Result<String> {
    panic!("prompt must not be called")
}

fn servers(json: &str) -> Vec<ServerRecord> {
    serde_json::from_str(json).expect("valid fixture")
}

#[tokio::test]
async fn test_set_access_key_then_load() -> Result<()> {
    let dir = TempDir::new()?;
    let config = config_in(&dir);

    dispatch(
        &parse(&["--set-access-key", "0123456789abcdef"]),
        &config,
        dir.path(),
        no_prompt,
    )
    .await?;

    let store = CredentialStore::new(&config.credential_path);
    assert_eq!(store.load()?.as_deref(), Some("0123456789abcdef"));
    Ok(())
}

#[tokio::test]
async fn test_set_access_key_overwrites_previous_key() -> Result<()> {
    let dir = TempDir::new()?;
    let config = config_in(&dir);

    for key in ["first", "second"] {
        dispatch(&parse(&["--set-access-key", key]), &config, dir.path(), no_prompt).await?;
    }

    let store = CredentialStore::new(&config.credential_path);
    assert_eq!(store.load()?.as_deref(), Some("second"));
    Ok(())
}

#[tokio::test]
async fn test_path_like_server_id_is_rejected_without_writing() -> Result<()> {
    let dir = TempDir::new()?;
    let config = config_in(&dir);

    let err = dispatch(
        &parse(&["-i", "../escape", "--key", "k"]),
        &config,
        dir.path(),
        no_prompt,
    )
    .await
    .unwrap_err();

    assert!(matches!(
        err.downcast_ref::<OpenBluError>(),
        Some(OpenBluError::Usage(_))
    ));
    assert_eq!(std::fs::read_dir(dir.path())?.count(), 0);
    Ok(())
}

#[tokio::test]
async fn test_unreachable_api_is_network_error() -> Result<()> {
    let dir = TempDir::new()?;
    let config = config_in(&dir);

    let err = dispatch(&parse(&["-f", "--key", "k"]), &config, dir.path(), no_prompt)
        .await
        .unwrap_err();

    assert_eq!(exit_code(&err), 4);
    Ok(())
}

#[test]
fn test_readme_style_invocation() {
    let cli = parse(&[
        "--key",
        "k",
        "-f",
        "--filter-by",
        "country",
        "--filter",
        "japan",
        "-o",
        "score",
        "-s",
        "descending",
        "-l",
        "2",
        "-v",
    ]);

    assert_eq!(cli.action().unwrap(), Action::FetchServers);
    assert!(cli.verbose);

    let records = servers(
        r#"[
            {"id": "1", "country": "Japan", "score": 10},
            {"id": "2", "country": "Thailand", "score": 30},
            {"id": "3", "country": "Japan", "score": 20},
            {"id": "4", "country": "Japan", "score": 15}
        ]"#,
    );
    let out = cli.pipeline().unwrap().apply(records);

    let ids: Vec<&str> = out.iter().map(|r| r.id.as_str()).collect();
    assert_eq!(ids, vec!["3", "4"]);
}

#[test]
fn test_default_pipeline_keeps_listing_order() {
    let records = servers(
        r#"[
            {"id": "a"}, {"id": "b"}, {"id": "c"}, {"id": "d"},
            {"id": "e"}, {"id": "f"}, {"id": "g"}
        ]"#,
    );

    let out = parse(&["-f"]).pipeline().unwrap().apply(records);
    let ids: Vec<&str> = out.iter().map(|r| r.id.as_str()).collect();
    assert_eq!(ids, vec!["a", "b", "c", "d", "e"]);
    assert_eq!(Pipeline::default().limit, 5);
}
