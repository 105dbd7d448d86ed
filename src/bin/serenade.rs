use std::{
    io::Write as _,
    path::{Path, PathBuf},
};

use anyhow::Context as _;
use clap::{Parser, Subcommand, ValueEnum};
use serenade::{
    HitTarget, InputEvent, KeyCode, Millis, PortCall, RecordingPort, ScriptAction, ScriptStep,
    SequenceConfig, Simulation, TextSink, TraceEntry, ViewportWidth,
};

#[derive(Parser, Debug)]
#[command(name = "serenade", version)]
struct Cli {
    /// Log filter for stderr diagnostics (e.g. `debug`, `serenade=trace`).
    #[arg(long, global = true, default_value = "warn")]
    log: String,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the full sequence on a virtual clock and print its timeline.
    Simulate(SimulateArgs),
    /// Print the device profile chosen for a viewport width.
    Profile(ProfileArgs),
    /// Print the default configuration as JSON.
    Defaults,
}

#[derive(Parser, Debug)]
struct SimulateArgs {
    /// Viewport width in CSS pixels at load.
    #[arg(long, default_value_t = 375)]
    width: u32,

    /// Seed for jitter and decoration placement.
    #[arg(long, default_value_t = 1)]
    seed: u64,

    /// Configuration JSON overriding the defaults.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Tap this many milliseconds after the continue gate opens.
    #[arg(long, default_value_t = 1500, conflicts_with = "advance_at")]
    advance_after: u64,

    /// Tap at these absolute times instead (ms); may repeat.
    #[arg(long)]
    advance_at: Vec<u64>,

    /// Resize the viewport, as `TIME:WIDTH`; may repeat.
    #[arg(long, value_parser = parse_resize)]
    resize_at: Vec<(u64, u32)>,

    /// Press a key, as `TIME:CODE` with a DOM key code (`Space`, `Enter`, `KeyM`); may repeat.
    #[arg(long, value_parser = parse_key)]
    key_at: Vec<(u64, KeyCode)>,

    /// JSON file holding an array of `{ "at": ms, "action": {..} }` script steps.
    #[arg(long)]
    script: Option<PathBuf>,

    /// Click the music toggle at these times (ms); may repeat.
    #[arg(long)]
    music_at: Vec<u64>,

    /// Hide the page at these times (ms); may repeat.
    #[arg(long)]
    hide_at: Vec<u64>,

    /// Show the page again at these times (ms); may repeat.
    #[arg(long)]
    show_at: Vec<u64>,

    /// Refuse audio playback as a browser without a user gesture would.
    #[arg(long)]
    deny_autoplay: bool,

    /// Pretend the device has no vibration motor.
    #[arg(long)]
    no_vibrate: bool,

    /// Make the paragraph layout query fail.
    #[arg(long)]
    no_layout: bool,

    /// Give up if the sequence has not completed by this time (ms).
    #[arg(long, default_value_t = 120_000)]
    limit: u64,

    /// Include one line per typed character.
    #[arg(long)]
    chars: bool,

    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,
}

#[derive(Parser, Debug)]
struct ProfileArgs {
    /// Viewport width in CSS pixels.
    #[arg(long)]
    width: u32,

    /// Configuration JSON overriding the defaults.
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    tracing_subscriber::fmt()
        .with_env_filter(cli.log.as_str())
        .with_writer(std::io::stderr)
        .init();

    match cli.cmd {
        Command::Simulate(args) => cmd_simulate(args),
        Command::Profile(args) => cmd_profile(args),
        Command::Defaults => cmd_defaults(),
    }
}

fn parse_resize(s: &str) -> Result<(u64, u32), String> {
    let (t, w) = s
        .split_once(':')
        .ok_or_else(|| format!("expected TIME:WIDTH, got '{s}'"))?;
    let t = t
        .trim()
        .parse::<u64>()
        .map_err(|e| format!("bad time '{t}': {e}"))?;
    let w = w
        .trim()
        .parse::<u32>()
        .map_err(|e| format!("bad width '{w}': {e}"))?;
    Ok((t, w))
}

fn parse_key(s: &str) -> Result<(u64, KeyCode), String> {
    let (t, code) = s
        .split_once(':')
        .ok_or_else(|| format!("expected TIME:CODE, got '{s}'"))?;
    let t = t
        .trim()
        .parse::<u64>()
        .map_err(|e| format!("bad time '{t}': {e}"))?;
    Ok((t, KeyCode::from_dom_code(code.trim())))
}

fn load_script(path: &Path) -> anyhow::Result<Vec<ScriptStep>> {
    let file = std::fs::File::open(path).with_context(|| format!("open '{}'", path.display()))?;
    serde_json::from_reader(std::io::BufReader::new(file))
        .with_context(|| format!("parse script '{}'", path.display()))
}

fn load_config(path: Option<&Path>) -> anyhow::Result<SequenceConfig> {
    match path {
        Some(p) => SequenceConfig::load_json(p)
            .with_context(|| format!("load config '{}'", p.display())),
        None => Ok(SequenceConfig::default()),
    }
}

fn cmd_simulate(args: SimulateArgs) -> anyhow::Result<()> {
    let config = load_config(args.config.as_deref())?;

    let mut port = RecordingPort::new(ViewportWidth(args.width));
    if args.deny_autoplay {
        port = port.deny_autoplay();
    }
    if args.no_vibrate {
        port = port.without_vibration();
    }
    if args.no_layout {
        port = port.without_layout();
    }

    let mut sim = Simulation::new(config, port, args.seed).context("build simulation")?;
    if args.advance_at.is_empty() {
        sim = sim.with_auto_advance(Millis(args.advance_after));
    }
    for &t in &args.advance_at {
        sim.push(
            Millis(t),
            ScriptAction::Input {
                event: InputEvent::Click {
                    target: HitTarget::IntroRegion,
                },
            },
        );
    }
    if let Some(path) = args.script.as_deref() {
        sim = sim.with_script(load_script(path)?);
    }
    for &(t, code) in &args.key_at {
        sim.push(
            Millis(t),
            ScriptAction::Input {
                event: InputEvent::Key { code },
            },
        );
    }
    for &(t, w) in &args.resize_at {
        sim.push(
            Millis(t),
            ScriptAction::SetViewport {
                width: ViewportWidth(w),
            },
        );
    }
    for &t in &args.music_at {
        sim.push(Millis(t), ScriptAction::ToggleMusic);
    }
    for &t in &args.hide_at {
        sim.push(
            Millis(t),
            ScriptAction::Input {
                event: InputEvent::VisibilityChanged { hidden: true },
            },
        );
    }
    for &t in &args.show_at {
        sim.push(
            Millis(t),
            ScriptAction::Input {
                event: InputEvent::VisibilityChanged { hidden: false },
            },
        );
    }

    sim.start();
    let done = sim.run_to_completion(Millis(args.limit))?;

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    for entry in sim.trace() {
        if !args.chars && is_char_entry(entry) {
            continue;
        }
        match args.format {
            OutputFormat::Json => {
                serde_json::to_writer(&mut out, entry).context("write trace entry")?;
                writeln!(out)?;
            }
            OutputFormat::Text => writeln!(out, "{}", describe(entry))?,
        }
    }

    if matches!(args.format, OutputFormat::Text) {
        writeln!(out, "completed at {done}")?;
        writeln!(out, "title:     {}", sim.port().text(TextSink::Title))?;
        writeln!(
            out,
            "paragraph: {} chars",
            sim.port().text(TextSink::Paragraph).chars().count()
        )?;
        writeln!(out, "music:     {}", sim.sequencer().music_playing())?;
    }
    Ok(())
}

fn is_char_entry(entry: &TraceEntry) -> bool {
    matches!(
        entry,
        TraceEntry::Call {
            call: PortCall::AppendChar { .. },
            ..
        }
    )
}

fn describe(entry: &TraceEntry) -> String {
    match entry {
        TraceEntry::State { at, state } => format!("{:>8}  state   {state}", at.to_string()),
        TraceEntry::Action { at, action } => {
            format!("{:>8}  action  {action:?}", at.to_string())
        }
        TraceEntry::Call { at, call } => format!("{:>8}  call    {call:?}", at.to_string()),
    }
}

fn cmd_profile(args: ProfileArgs) -> anyhow::Result<()> {
    let config = load_config(args.config.as_deref())?;
    let width = ViewportWidth(args.width);
    let report = serde_json::json!({
        "width": width,
        "class": config.presets.class(width),
        "profile": config.profile_for(width),
    });
    println!(
        "{}",
        serde_json::to_string_pretty(&report).context("encode profile")?
    );
    Ok(())
}

fn cmd_defaults() -> anyhow::Result<()> {
    let config = SequenceConfig::default();
    println!(
        "{}",
        serde_json::to_string_pretty(&config).context("encode defaults")?
    );
    Ok(())
}
