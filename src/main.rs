//! sitepipe CLI - static-asset pipeline
//!
//! Usage: sitepipe [COMMAND]
//!
//! Commands:
//!   dev     Build, serve and rebuild on change (default)
//!   build   One-shot production build
//!   run     Run a single named task
//!   tasks   List task names

mod cli;
mod ui;

use std::path::Path;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use tracing::warn;
use tracing_subscriber::EnvFilter;

use sitepipe::tasks::{self, TaskContext};
use sitepipe::transform::LessCompiler;
use sitepipe::{pipeline, Config, EventSink, NotifySource, PipelineEvent, Runner, ServerSlot};

use cli::{Cli, Commands};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("warn,sitepipe={level}")));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

async fn run(cli: Cli) -> Result<()> {
    match cli.command() {
        Commands::Tasks => cmd_tasks(cli.json),
        Commands::Build => {
            let (ctx, runner) = load(&cli)?;
            check_style_compiler(&ctx);
            runner.run(&pipeline::build(&ctx)).await?;
            Ok(())
        }
        Commands::Run { task } => {
            let (ctx, runner) = load(&cli)?;
            runner.run(&tasks::named(&ctx, &task)?).await?;
            Ok(())
        }
        Commands::Dev => {
            let (ctx, runner) = load(&cli)?;
            check_style_compiler(&ctx);
            cmd_dev(&ctx, &runner).await
        }
    }
}

/// Resolve config and wire the event output
fn load(cli: &Cli) -> Result<(TaskContext, Runner)> {
    let (config, warnings) = Config::resolve(&cli.root, cli.config.as_deref())?;
    for warning in &warnings {
        warn!("{warning}");
        if !cli.json {
            eprintln!("Warning: {warning}");
        }
    }

    let sink = event_sink(cli.json);
    let ctx = TaskContext::new(config, &cli.root, Arc::clone(&sink));
    Ok((ctx, Runner::new(sink)))
}

fn cmd_tasks(json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string(tasks::TASK_NAMES)?);
    } else {
        for name in tasks::TASK_NAMES {
            println!("{name}");
        }
    }
    Ok(())
}

/// Runs until Ctrl+C, or until a startup stage or the watch subscription fails
async fn cmd_dev(ctx: &TaskContext, runner: &Runner) -> Result<()> {
    let slot = ServerSlot::default();
    let task = pipeline::dev(ctx, Arc::new(NotifySource), Arc::clone(&slot))?;

    let result = tokio::select! {
        result = runner.run(&task) => result.map_err(anyhow::Error::from),
        _ = tokio::signal::ctrl_c() => Ok(()),
    };

    runner.emit(PipelineEvent::Shutdown);
    let server = slot.lock().await.take();
    if let Some(server) = server {
        server.stop().await?;
    }
    result
}

/// Warn early when `.less` entries cannot be compiled
fn check_style_compiler(ctx: &TaskContext) {
    let styles = &ctx.config.styles;
    let is_less = Path::new(&styles.entry)
        .extension()
        .is_some_and(|ext| ext == "less");
    if is_less && !LessCompiler::new(styles.lessc.clone()).is_available() {
        warn!(
            program = %styles.lessc,
            "less compiler not found; the styles task will fail"
        );
    }
}

fn event_sink(json: bool) -> EventSink {
    let caps = ui::detect_capabilities();
    Arc::new(move |event: PipelineEvent| {
        if json {
            println!("{}", event.to_json());
            return;
        }
        let rendered = ui::render_event(&ui::timestamp(), &event, caps.color, caps.unicode);
        if event.is_error() {
            eprint!("{rendered}");
        } else {
            print!("{rendered}");
        }
    })
}
