use memora::logger::{self, LoggerConfig};
use memora::{
    registry, AppState, CapabilityId, GeminiClient, GeminiConfig, GenerationResult, ImageInput,
    MemoraError, QualityTier, SessionState,
};
use std::env;
use std::fs;
use std::path::PathBuf;

const USAGE: &str =
    "usage: memora <CAPABILITY> <image>... [--prompt TEXT] [--quality 1K|2K|4K] [--out FILE]";

struct Args {
    capability: CapabilityId,
    images: Vec<PathBuf>,
    prompt: Option<String>,
    quality: Option<QualityTier>,
    out: Option<PathBuf>,
}

fn parse_args(raw: &[String]) -> Result<Args, MemoraError> {
    let mut iter = raw.iter();
    let capability = iter
        .next()
        .ok_or_else(|| MemoraError::ConfigError(USAGE.into()))?
        .parse::<CapabilityId>()?;

    let mut args = Args {
        capability,
        images: Vec::new(),
        prompt: None,
        quality: None,
        out: None,
    };
    while let Some(arg) = iter.next() {
        let mut value = |flag: &str| {
            iter.next()
                .cloned()
                .ok_or_else(|| MemoraError::ConfigError(format!("{} needs a value", flag)))
        };
        match arg.as_str() {
            "--prompt" | "-p" => args.prompt = Some(value("--prompt")?),
            "--quality" | "-q" => {
                args.quality = Some(value("--quality")?.parse::<QualityTier>()?)
            }
            "--out" | "-o" => args.out = Some(PathBuf::from(value("--out")?)),
            path => args.images.push(PathBuf::from(path)),
        }
    }
    Ok(args)
}

fn extension_for(mime_type: &str) -> &'static str {
    match mime_type {
        "image/png" => "png",
        "image/jpeg" => "jpg",
        "image/webp" => "webp",
        _ => "bin",
    }
}

fn print_capabilities() {
    println!("Available capabilities:");
    for capability in registry::all() {
        println!(
            "  {:<13} {} ({}-{} photo(s)){} - {}",
            capability.id.as_str(),
            capability.title,
            capability.min_inputs,
            capability.max_inputs,
            if capability.premium { " ★" } else { "" },
            capability.description
        );
    }
    println!();
    println!("{}", USAGE);
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let dotenv_loaded = dotenv::dotenv().is_ok();

    logger::init_with_config(LoggerConfig::from_env())?;

    if dotenv_loaded {
        log::info!("✅ .env file loaded");
    } else {
        log::debug!("No .env file found, using system environment variables");
    }

    let raw: Vec<String> = env::args().skip(1).collect();
    if raw.is_empty() || raw.iter().any(|arg| arg == "--help" || arg == "-h") {
        print_capabilities();
        return Ok(());
    }
    let args = parse_args(&raw)?;

    let config = GeminiConfig::from_env();
    logger::log_client_info(&config);
    let client = GeminiClient::new(config)?;

    let mut app = AppState::new();
    let session = app.select_capability(args.capability);
    let capability = session.capability();

    let mut images = Vec::with_capacity(args.images.len());
    for path in &args.images {
        images.push(ImageInput::from_path(path)?);
    }
    let accepted = session.add_inputs(images)?;
    if accepted < args.images.len() {
        log::warn!(
            "{} takes at most {} photo(s); ignoring {}",
            capability.id,
            capability.max_inputs,
            args.images.len() - accepted
        );
    }
    if let Some(prompt) = &args.prompt {
        session.set_instruction(prompt.clone());
    }
    if let Some(quality) = args.quality {
        session.set_quality(quality);
    }

    let ticket = session.begin_dispatch()?;
    let wants_suggestion = capability.offers_suggestion && args.prompt.is_none();
    let suggestion = async {
        if wants_suggestion {
            client
                .suggestion()
                .fast_suggestion("A beautiful memory photo")
                .await
        } else {
            String::new()
        }
    };
    let (suggestion, outcome) = tokio::join!(suggestion, client.generation().dispatch(ticket));
    if !suggestion.is_empty() {
        println!("Suggested prompt: {}", suggestion);
    }

    app.apply_outcome(outcome);
    if let Some(SessionState::Failed { message, retryable }) = app.session().map(|s| s.state()) {
        let hint = if *retryable { " (you can try again)" } else { "" };
        return Err(format!("{}{}", message, hint).into());
    }

    let artifact_id = app.save_result()?;
    let artifact = app
        .gallery()
        .get(&artifact_id)
        .ok_or("saved artifact missing from the gallery")?;

    match &artifact.result {
        GenerationResult::Image { mime_type, .. } => {
            let out = args.out.unwrap_or_else(|| {
                PathBuf::from(format!("memora-{}.{}", artifact.id, extension_for(mime_type)))
            });
            if let Some(bytes) = artifact.result.image_bytes() {
                fs::write(&out, bytes?)?;
            }
            println!("Saved {} result to {}", artifact.capability, out.display());
        }
        GenerationResult::Text { text } => {
            println!("{}", text);
            if let Some(out) = args.out {
                fs::write(&out, text)?;
            }
        }
    }

    Ok(())
}
