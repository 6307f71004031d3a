use std::{
    fs::File,
    io::{BufReader, Write as _},
    path::{Path, PathBuf},
    time::Duration,
};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "trailhop", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Parse and validate a journey layout.
    Validate(ValidateArgs),
    /// Print every segment's hop points and the resulting checkpoint table.
    Plan(LayoutArgs),
    /// Run a list of actions against a recording stage and print the emitted intents.
    Replay(ReplayArgs),
    /// Send the promise letter through the dry-run transport.
    Promise(PromiseArgs),
}

#[derive(Parser, Debug)]
struct ValidateArgs {
    /// Input layout JSON.
    #[arg(long = "in")]
    in_path: PathBuf,
}

#[derive(Parser, Debug)]
struct LayoutArgs {
    /// Input layout JSON. The built-in layout is used when omitted.
    #[arg(long = "in")]
    in_path: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct ReplayArgs {
    #[command(flatten)]
    layout: LayoutArgs,

    /// Comma-separated actions, e.g. `start,advance:0,close:1,reopen:1,resize`.
    #[arg(long, value_delimiter = ',', required = true)]
    actions: Vec<trailhop::Action>,

    /// Zero every delay instead of waiting in real time.
    #[arg(long)]
    instant: bool,
}

#[derive(Parser, Debug)]
struct PromiseArgs {
    /// Recipient address (repeatable).
    #[arg(long = "to", required = true)]
    to: Vec<String>,

    /// Sender display name.
    #[arg(long, default_value = "Trailhop")]
    from_name: String,

    /// Sender address.
    #[arg(long, default_value = "promise@trailhop.invalid")]
    from_email: String,

    /// Number of leading send attempts the dry-run transport rejects.
    #[arg(long, default_value_t = 0)]
    fail_first: u64,

    /// Delay after the first failed attempt, in milliseconds.
    #[arg(long, default_value_t = 1000)]
    base_delay_ms: u64,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Validate(args) => cmd_validate(args),
        Command::Plan(args) => cmd_plan(args),
        Command::Replay(args) => runtime()?.block_on(cmd_replay(args)),
        Command::Promise(args) => runtime()?.block_on(cmd_promise(args)),
    }
}

fn runtime() -> anyhow::Result<tokio::runtime::Runtime> {
    tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()
        .context("build tokio runtime")
}

fn read_layout_json(path: &Path) -> anyhow::Result<trailhop::JourneyLayout> {
    let f = File::open(path).with_context(|| format!("open layout '{}'", path.display()))?;
    let r = BufReader::new(f);
    let layout: trailhop::JourneyLayout =
        serde_json::from_reader(r).with_context(|| "parse layout JSON")?;
    Ok(layout)
}

fn load_layout(path: Option<&Path>) -> anyhow::Result<trailhop::JourneyLayout> {
    let layout = match path {
        Some(p) => read_layout_json(p)?,
        None => trailhop::JourneyLayout::default(),
    };
    layout.validate()?;
    Ok(layout)
}

fn cmd_validate(args: ValidateArgs) -> anyhow::Result<()> {
    let layout = load_layout(Some(&args.in_path))?;
    layout
        .build_curve()
        .with_context(|| format!("build curve for '{}'", args.in_path.display()))?;
    eprintln!(
        "ok: {} checkpoints, {} cards, {} hops per segment",
        layout.checkpoints.len(),
        layout.card_count,
        layout.hops_per_segment
    );
    Ok(())
}

fn cmd_plan(args: LayoutArgs) -> anyhow::Result<()> {
    let layout = load_layout(args.in_path.as_deref())?;
    let geometry = layout.build_geometry()?;
    let segments = geometry.plan();

    let mut checkpoints = Vec::with_capacity(segments.len() + 1);
    checkpoints.push(layout.checkpoints[0]);
    checkpoints.extend(segments.iter().map(|s| s.arrival));

    let out = serde_json::json!({
        "hops_per_segment": geometry.hops_per_segment(),
        "segments": segments,
        "checkpoints": checkpoints,
    });
    println!("{}", serde_json::to_string_pretty(&out)?);
    Ok(())
}

async fn cmd_replay(args: ReplayArgs) -> anyhow::Result<()> {
    let mut layout = load_layout(args.layout.in_path.as_deref())?;
    if args.instant {
        layout.timings = trailhop::Timings::instant();
    }
    let controller = trailhop::JourneyController::new(layout, trailhop::RecordingStage::new())?;

    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    controller.init().await;
    write_intents(&mut out, &controller.stage_mut().take_intents())?;

    for action in args.actions {
        let outcome = controller.dispatch(action).await;
        let line = serde_json::json!({ "action": action, "result": outcome });
        writeln!(out, "{}", serde_json::to_string(&line)?)?;
        write_intents(&mut out, &controller.stage_mut().take_intents())?;
    }

    let snap = controller.snapshot();
    let summary = serde_json::json!({
        "summary": {
            "unlocked": snap.unlocked,
            "visited": snap.visited,
            "active_card": snap.active_card,
            "complete": snap.complete,
        }
    });
    writeln!(out, "{}", serde_json::to_string(&summary)?)?;
    Ok(())
}

fn write_intents(
    out: &mut impl std::io::Write,
    intents: &[trailhop::Intent],
) -> anyhow::Result<()> {
    for intent in intents {
        writeln!(out, "{}", serde_json::to_string(intent)?)?;
    }
    Ok(())
}

async fn cmd_promise(args: PromiseArgs) -> anyhow::Result<()> {
    use trailhop::notify::{
        DryRunTransport, PromiseLetter, PromiseTrigger, RetryPolicy, Sender, TriggerState,
    };

    let letter = PromiseLetter::new(
        Sender {
            name: args.from_name,
            email: args.from_email,
        },
        args.to,
    );
    let transport = DryRunTransport::failing_first(args.fail_first);
    let policy = RetryPolicy {
        base_delay: Duration::from_millis(args.base_delay_ms),
        ..RetryPolicy::default()
    };

    let mut trigger = PromiseTrigger::new();
    let report = trigger
        .press(&transport, &letter, &policy)
        .await
        .cloned()
        .context("promise control was not ready")?;

    println!("{}", serde_json::to_string_pretty(&report)?);
    eprintln!("{} ({} attempt(s))", report.summary(), transport.attempts());
    if trigger.state() == TriggerState::Failed {
        report.into_result()?;
    }
    Ok(())
}
