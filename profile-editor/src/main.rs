use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use env_logger::{Builder, Target};
use log::{LevelFilter, info, warn};

use profile_editor::app::{AppConfig, EditorRuntime, runtime_boot};
use profile_editor::domains::profile::SelectedFile;
use profile_model::ProfileField;

/// Run one scripted profile editing session
#[derive(Debug, Parser)]
#[command(name = "profile-editor", version, about)]
struct Args {
    /// Account whose profile is edited
    #[arg(long)]
    username: String,

    /// Image to stage as an avatar candidate (repeatable)
    #[arg(long = "avatar", value_name = "PATH")]
    avatars: Vec<PathBuf>,

    /// Select the N-th staged candidate (0-based) after staging
    #[arg(long, value_name = "N")]
    select: Option<usize>,

    /// Remove the N-th staged candidate (0-based, repeatable)
    #[arg(long = "remove", value_name = "N")]
    remove: Vec<usize>,

    #[arg(long)]
    full_name: Option<String>,

    #[arg(long)]
    website: Option<String>,

    /// Submit the edited profile
    #[arg(long)]
    save: bool,

    /// Sign out once everything else is done
    #[arg(long)]
    logout: bool,

    /// Use in-memory collaborators instead of the profile server
    #[arg(long)]
    use_test_stubs: bool,

    #[arg(long)]
    server_url: Option<String>,

    /// Bearer token for the profile server
    #[arg(long)]
    token: Option<String>,

    /// Compression window, e.g. `1500ms` or `2s`
    #[arg(long, value_parser = humantime::parse_duration)]
    compress_timeout: Option<Duration>,
}

fn init_logger() {
    Builder::new()
        .target(Target::Stderr)
        .filter_level(LevelFilter::Warn)
        .filter_module("profile_editor", LevelFilter::Info)
        .init();
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    if std::env::var("RUST_LOG").is_err() {
        init_logger();
    } else {
        env_logger::init();
    }

    let args = Args::parse();
    let config = configure(&args);

    let mut runtime = runtime_boot(&config, &args.username).await?;
    runtime.run_until_idle().await;
    if runtime.editor().profile().is_none() {
        warn!("No profile found for {}; save will be skipped", args.username);
    }

    stage_avatars(&mut runtime, &args).await?;

    if let Some(full_name) = &args.full_name {
        runtime.edit_field(ProfileField::FullName, full_name.as_str());
    }
    if let Some(website) = &args.website {
        runtime.edit_field(ProfileField::Website, website.as_str());
    }

    if args.save {
        runtime.save();
        runtime.run_until_idle().await;
    } else if runtime.editor().has_unsaved_changes() {
        warn!("Discarding unsaved changes (pass --save to submit them)");
    }

    report(&runtime)?;

    if args.logout {
        runtime.logout();
    } else {
        runtime.end_session();
    }
    runtime.run_until_idle().await;

    Ok(())
}

fn configure(args: &Args) -> AppConfig {
    let mut config = AppConfig::from_environment();
    if args.use_test_stubs {
        config = config.with_test_stubs(true);
    }
    if let Some(url) = &args.server_url {
        config = config.with_server_url(url.as_str());
    }
    if let Some(token) = &args.token {
        config = config.with_auth_token(token.as_str());
    }
    if let Some(timeout) = args.compress_timeout {
        config = config.with_compress_timeout(timeout);
    }
    config
}

async fn stage_avatars(runtime: &mut EditorRuntime, args: &Args) -> Result<()> {
    for path in &args.avatars {
        let bytes = tokio::fs::read(path)
            .await
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        // One at a time so candidate indices follow the argument order.
        runtime.select_file(Some(SelectedFile::new(name, bytes)));
        runtime.run_until_idle().await;
    }

    let candidates = runtime.editor().candidates();
    let selected = args
        .select
        .and_then(|index| candidates.nth(index).map(|c| c.id()));
    let removed: Vec<_> = args
        .remove
        .iter()
        .filter_map(|&index| candidates.nth(index).map(|c| c.id()))
        .collect();

    if let Some(id) = selected {
        runtime.select_candidate(id);
    } else if let Some(index) = args.select {
        warn!("No candidate at index {}", index);
    }
    for id in removed {
        runtime.remove_candidate(id);
    }

    info!(
        "{} avatar candidate(s) staged",
        runtime.editor().candidates().len()
    );
    Ok(())
}

fn report(runtime: &EditorRuntime) -> Result<()> {
    let editor = runtime.editor();
    if let Some(error) = editor.error() {
        warn!("{}", error);
    }
    if let Some(message) = editor.success_message() {
        println!("{message}");
    }
    if let Some(profile) = editor.profile() {
        println!(
            "{}",
            serde_json::to_string_pretty(&profile)
                .context("Failed to render profile")?
        );
    }
    println!(
        "avatar: {}",
        editor.avatar_display().as_src().unwrap_or("<none>")
    );
    Ok(())
}
