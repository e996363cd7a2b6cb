use clap::{Parser, Subcommand};
use horologe_cli::commands::{self, SetArgs};
use horologe_cli::readline;
use horologe_cli::{CliContext, logging};
use horologe_core::{SchedulerConfig, SchedulerConfigExt};
use std::io::Write;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), String> {
    let config = SchedulerConfig::load();
    let _log_guard = logging::init(config.debug_logging);
    let mut ctx = CliContext::new(config);

    loop {
        let line = readline()?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        match respond(line, &mut ctx).await {
            Ok(quit) => {
                if quit {
                    break;
                }
            }
            Err(err) => {
                write!(std::io::stdout(), "{err}").map_err(|e| e.to_string())?;
                std::io::stdout().flush().map_err(|e| e.to_string())?;
            }
        }
    }

    Ok(())
}

#[derive(Parser)]
#[command(version, about = "horologe timer console")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Create an owner entity
    Spawn { label: String },
    /// Destroy an owner; its bound timers drop on the next frame
    Despawn { owner: u32 },
    Activate { owner: u32 },
    /// Freeze an owner's bound timers
    Deactivate { owner: u32 },
    /// Create or re-arm a named timer
    Set(SetArgs),
    /// Declare an inert slot to arm later with `set`
    Register {
        name: String,
        #[arg(short, long)]
        owner: Option<u32>,
    },
    Cancel {
        name: String,
        #[arg(short, long)]
        owner: Option<u32>,
    },
    Pause {
        name: String,
        #[arg(short, long)]
        owner: Option<u32>,
    },
    Resume {
        name: String,
        #[arg(short, long)]
        owner: Option<u32>,
    },
    /// Print a message once after `delay` seconds of scaled time
    After { delay: f32, message: String },
    /// Keep a condition true every frame until it has held for `target` seconds
    Hold { name: String, target: f32 },
    Release { name: String },
    /// Advance a number of fixed frames
    Step {
        #[arg(default_value_t = 1)]
        frames: u32,
        #[arg(short, long, default_value_t = 0.1)]
        dt: f32,
    },
    /// Run in real time for a number of seconds
    Run { seconds: f32 },
    /// Show the timer viewer
    List,
    Scale { scale: f32 },
    Config,
    SaveConfig,
    Clear,
    Exit,
}

async fn respond(line: &str, ctx: &mut CliContext) -> Result<bool, String> {
    let mut args = shlex::split(line).ok_or("error: Invalid quoting\n")?;
    args.insert(0, "horologe".to_string());
    let cli = Cli::try_parse_from(args).map_err(|e| e.to_string())?;

    match cli.command {
        Some(Commands::Spawn { label }) => commands::spawn(ctx, &label),
        Some(Commands::Despawn { owner }) => commands::despawn(ctx, owner),
        Some(Commands::Activate { owner }) => commands::set_active(ctx, owner, true),
        Some(Commands::Deactivate { owner }) => commands::set_active(ctx, owner, false),
        Some(Commands::Set(args)) => commands::set_timer(ctx, &args),
        Some(Commands::Register { name, owner }) => commands::register(ctx, &name, owner),
        Some(Commands::Cancel { name, owner }) => commands::cancel(ctx, &name, owner),
        Some(Commands::Pause { name, owner }) => commands::set_paused(ctx, &name, owner, true),
        Some(Commands::Resume { name, owner }) => commands::set_paused(ctx, &name, owner, false),
        Some(Commands::After { delay, message }) => commands::after(ctx, delay, message),
        Some(Commands::Hold { name, target }) => commands::hold(ctx, &name, target),
        Some(Commands::Release { name }) => commands::release(ctx, &name),
        Some(Commands::Step { frames, dt }) => commands::step(ctx, frames, dt)?,
        Some(Commands::Run { seconds }) => commands::run(ctx, seconds).await?,
        Some(Commands::List) => commands::list(ctx),
        Some(Commands::Scale { scale }) => commands::set_scale(ctx, scale)?,
        Some(Commands::Config) => commands::show_config(ctx),
        Some(Commands::SaveConfig) => commands::save_config(ctx)?,
        Some(Commands::Clear) => commands::clear(ctx),
        Some(Commands::Exit) => {
            commands::exit()?;
            return Ok(true);
        }
        None => {}
    }
    Ok(false)
}
