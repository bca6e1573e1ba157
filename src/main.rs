//! Command-line entry point.
//!
//! # Startup sequence
//!
//! 1. Initialise logging.
//! 2. Load [`AppConfig`] from disk (returns default on first run).
//! 3. Build the [`TemplateRegistry`] from the configured models.
//! 4. Build the [`Dispatcher`]; a missing API key stops here.
//! 5. Create the tokio runtime and run one task.
//!
//! # Usage
//!
//! ```text
//! kurdish-ai-tools --list
//! kurdish-ai-tools --init-config
//! kurdish-ai-tools <task-id> [--text TEXT] [--field KEY=VALUE]...
//!                  [--media PATH[:MIME]]... [--out PATH]
//! ```
//!
//! Without `--text`, piped stdin is used as the primary text.

use std::io::{IsTerminal, Read};
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::Parser;
use kurdish_ai_tools::{
    config::{AppConfig, AppPaths},
    dispatch::{DispatchOutput, Dispatcher},
    media::MediaPart,
    prompt::{TaskInputs, TemplateRegistry},
};

// ---------------------------------------------------------------------------
// Arguments
// ---------------------------------------------------------------------------

/// Kurdish (Sorani) language tools backed by a hosted generative model
#[derive(Debug, Parser)]
#[command(name = "kurdish-ai-tools")]
#[command(about = "Run Kurdish language AI tasks", long_about = None)]
#[command(version)]
struct CliArgs {
    /// Task id to run (see --list)
    task: Option<String>,

    /// List the built-in tasks and exit
    #[arg(short, long)]
    list: bool,

    /// Write a starter settings.toml and exit
    #[arg(long, conflicts_with_all = ["list", "task"])]
    init_config: bool,

    /// Primary text input (defaults to piped stdin)
    #[arg(short, long)]
    text: Option<String>,

    /// Named task field, e.g. `target=English` (repeatable)
    #[arg(short = 'f', long = "field", value_name = "KEY=VALUE", value_parser = parse_field)]
    fields: Vec<(String, String)>,

    /// Media file, optionally suffixed with `:mime/type` (repeatable)
    #[arg(short = 'm', long = "media", value_name = "PATH[:MIME]", value_parser = parse_media)]
    media: Vec<MediaArg>,

    /// Where to write an image result (defaults to `<task-id>.<ext>`)
    #[arg(short, long)]
    out: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq)]
struct MediaArg {
    path: PathBuf,
    mime: Option<String>,
}

fn parse_field(raw: &str) -> Result<(String, String), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got `{raw}`"))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("empty key in `{raw}`"));
    }
    Ok((key.to_string(), value.to_string()))
}

/// `path:mime/type` or just `path`.  The suffix only counts as a MIME type
/// when it contains a `/`, so drive letters survive.
fn parse_media(raw: &str) -> Result<MediaArg, String> {
    Ok(match raw.rsplit_once(':') {
        Some((path, mime)) if mime.contains('/') && !path.is_empty() => MediaArg {
            path: PathBuf::from(path),
            mime: Some(mime.to_string()),
        },
        _ => MediaArg {
            path: PathBuf::from(raw),
            mime: None,
        },
    })
}

fn guess_mime(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    Some(match ext.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "webp" => "image/webp",
        "mp3" => "audio/mp3",
        "wav" => "audio/wav",
        "ogg" => "audio/ogg",
        "m4a" => "audio/mp4",
        "webm" => "video/webm",
        "mp4" => "video/mp4",
        "mov" => "video/quicktime",
        _ => return None,
    })
}

fn extension_for(mime: &str) -> &'static str {
    match mime {
        "image/jpeg" => "jpg",
        "image/webp" => "webp",
        _ => "png",
    }
}

// ---------------------------------------------------------------------------
// Input assembly
// ---------------------------------------------------------------------------

fn build_inputs(args: &CliArgs) -> Result<TaskInputs> {
    let mut inputs = TaskInputs::new();

    let text = match &args.text {
        Some(t) => Some(t.clone()),
        None if !std::io::stdin().is_terminal() => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("failed to read stdin")?;
            (!buf.is_empty()).then_some(buf)
        }
        None => None,
    };
    if let Some(text) = text {
        inputs = inputs.with_text(text);
    }

    for (key, value) in &args.fields {
        inputs = inputs.with_field(key.clone(), value.clone());
    }

    for MediaArg { path, mime } in &args.media {
        let mime = match mime {
            Some(m) => m.clone(),
            None => guess_mime(path)
                .with_context(|| {
                    format!("cannot guess MIME type of {}; use PATH:MIME", path.display())
                })?
                .to_string(),
        };
        let bytes =
            std::fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
        log::debug!("media {} ({mime}, {} bytes)", path.display(), bytes.len());
        inputs = inputs.with_media(MediaPart::from_bytes(&bytes, mime));
    }

    Ok(inputs)
}

fn print_catalogue(registry: &TemplateRegistry) {
    for task in registry.iter() {
        println!("{:<28} {:<24} {}", task.id(), task.model(), task.summary());
    }
}

/// Write the default settings to `path`, refusing to overwrite.
fn write_starter_config(path: &Path) -> Result<()> {
    if path.exists() {
        bail!("{} already exists", path.display());
    }
    AppConfig::default()
        .save_to(path)
        .with_context(|| format!("failed to write {}", path.display()))?;
    log::info!("wrote starter settings to {}", path.display());
    Ok(())
}

// ---------------------------------------------------------------------------
// main
// ---------------------------------------------------------------------------

fn main() -> Result<()> {
    // 1. Logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = CliArgs::parse();

    // 2. Configuration
    if args.init_config {
        return write_starter_config(&AppPaths::new().settings_file);
    }
    let config = AppConfig::load().unwrap_or_else(|e| {
        log::warn!("Failed to load config ({e}); using defaults");
        AppConfig::default()
    });

    // 3. Registry
    let registry = TemplateRegistry::builtin(&config.models);
    if args.list {
        print_catalogue(&registry);
        return Ok(());
    }
    let Some(task_id) = args.task.as_deref() else {
        bail!("no task given; run with --list to see available tasks");
    };

    // 4. Dispatcher (credentials are resolved once, here)
    let dispatcher = Dispatcher::from_config(&config)?;
    let inputs = build_inputs(&args)?;

    // 5. Runtime
    let rt = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(2)
        .enable_all()
        .build()
        .context("failed to create tokio runtime")?;

    let output = rt.block_on(dispatcher.invoke_id(&registry, task_id, &inputs))?;

    match output {
        DispatchOutput::Text(text) => println!("{text}"),
        DispatchOutput::Image(image) => {
            let path = args.out.clone().unwrap_or_else(|| {
                PathBuf::from(format!("{task_id}.{}", extension_for(&image.mime_type)))
            });
            std::fs::write(&path, image.decode()?)
                .with_context(|| format!("failed to write {}", path.display()))?;
            log::info!("image written to {}", path.display());
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
