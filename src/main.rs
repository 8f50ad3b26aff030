// src/main.rs

use anyhow::Context;
use clap::Parser;
use log::LevelFilter;
use log4rs::{
    append::console::ConsoleAppender,
    config::{Appender, Root},
    encode::pattern::PatternEncoder,
    Config,
};
use std::path::Path;
use std::sync::Arc;
use wms_animator::{
    service, write_animation, AnimationRequest, AppConfig, Command, CommandLineInput,
    WmsAnimator, WmsHttpClient,
};

/// Sets up console logging; `debug` raises the level to trace.
fn setup_logging(debug: bool) -> anyhow::Result<()> {
    let log_level = if debug {
        LevelFilter::Trace
    } else {
        LevelFilter::Info
    };

    // Logs go to stderr so `render --output -` can stream the GIF on stdout.
    let console = ConsoleAppender::builder()
        .target(log4rs::append::console::Target::Stderr)
        .encoder(Box::new(PatternEncoder::new(
            "{d(%Y-%m-%d %H:%M:%S)} [{l}] - {m}{n}",
        )))
        .build();

    let config = Config::builder()
        .appender(Appender::builder().build("console", Box::new(console)))
        .build(Root::builder().appender("console").build(log_level))?;

    log4rs::init_config(config)?;
    Ok(())
}

/// Renders one request file to disk without starting the service.
async fn render_once(
    animator: &WmsAnimator,
    request_path: &Path,
    output: &Path,
) -> anyhow::Result<()> {
    let body = std::fs::read(request_path)
        .with_context(|| format!("cannot read request file {}", request_path.display()))?;
    let request: AnimationRequest = serde_json::from_slice(&body)
        .with_context(|| format!("invalid request in {}", request_path.display()))?;

    let animation = animator.animate(&request).await?;
    write_animation(output, &animation.bytes)?;

    log::info!(
        "Rendered {} frames ({} per frame) to {}",
        animation.frame_count,
        animation.frame_delay,
        output.display()
    );
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CommandLineInput::parse();

    setup_logging(cli.debug)?;
    log::info!(
        "----  {} - Version {} ----------",
        env!("CARGO_PKG_NAME"),
        env!("CARGO_PKG_VERSION")
    );

    let config = AppConfig::resolve(cli)?;
    log::debug!("Resolved configuration: {:?}", config);
    if config.pipeline.font_path.as_os_str().is_empty() {
        log::warn!("No overlay font configured; set wms.font_path or pass --font");
    }

    let client = WmsHttpClient::new()?;
    let animator = WmsAnimator::new(Arc::new(client), config.pipeline.clone());

    match &config.command {
        Command::Serve => service::run(animator, &config.service).await?,
        Command::Render { request, output } => render_once(&animator, request, output).await?,
    }

    Ok(())
}
