use std::io::Write;
use std::time::Duration;

use clap::Args;
use horologe_core::math::round_to_nearest_multiple;
use horologe_core::{
    FrameTime, OwnerId, OwnerLiveness, SchedulerConfigExt, SetTimerResult, TimerOptions,
};

use crate::context::{CliContext, Hold};

/// Display precision for seconds in `list`
const DISPLAY_STEP: f32 = 0.01;

#[derive(Args, Debug, Clone)]
pub struct SetArgs {
    pub name: String,
    pub duration: f32,
    /// Scope the timer to an owner (bound unless --no-bind)
    #[arg(short, long)]
    pub owner: Option<u32>,
    /// Extra runs after the first completion
    #[arg(short, long, default_value_t = 0)]
    pub loops: u32,
    #[arg(long)]
    pub forever: bool,
    /// Count down in real time, ignoring the time scale
    #[arg(long)]
    pub unscaled: bool,
    /// Keep the slot after it completes
    #[arg(long)]
    pub preserve: bool,
    #[arg(long)]
    pub paused: bool,
    #[arg(long)]
    pub no_bind: bool,
    /// Print progress every frame
    #[arg(long)]
    pub verbose: bool,
}

fn parse_owner(owner: Option<u32>) -> Option<OwnerId> {
    owner.map(OwnerId)
}

pub fn spawn(ctx: &mut CliContext, label: &str) {
    match ctx.owners.spawn(label) {
        Some(id) => println!("spawned owner {id} ({label})"),
        None => println!("error: no owner ids left"),
    }
}

pub fn despawn(ctx: &mut CliContext, owner: u32) {
    let owner = OwnerId(owner);
    if ctx.owners.despawn(owner) {
        let bound = ctx.scheduler.timers_for_owner(owner).len();
        println!("despawned {owner}, {bound} timer(s) drop on the next frame");
    } else {
        println!("no owner {owner}");
    }
}

pub fn set_active(ctx: &mut CliContext, owner: u32, active: bool) {
    let owner = OwnerId(owner);
    if ctx.owners.set_active(owner, active) {
        let state = if active { "active" } else { "inactive" };
        println!("{owner} is now {state}");
    } else {
        println!("no owner {owner}");
    }
}

pub fn set_timer(ctx: &mut CliContext, args: &SetArgs) {
    let owner = parse_owner(args.owner);
    if let Some(owner) = owner.filter(|o| !ctx.owners.is_alive(*o)) {
        println!("warning: owner {owner} does not exist, the timer will drop on the next frame");
    }

    let name = args.name.clone();
    let mut options = TimerOptions::default().on_complete(move |scheduler| {
        println!("[frame {}] {name} fired", scheduler.frame_count());
    });
    if args.forever {
        options = options.loop_forever();
    } else if args.loops > 0 {
        options = options.looping(args.loops);
    }
    if args.unscaled {
        options = options.unscaled();
    }
    if args.preserve {
        options = options.preserve();
    }
    if args.paused {
        options = options.paused();
    }
    if args.no_bind {
        options = options.no_auto_bind();
    }
    if args.verbose {
        let name = args.name.clone();
        options = options.on_tick(move |left, total| {
            println!("  {name}: {left:.2}/{total:.2}");
        });
    }

    let result = match owner {
        Some(owner) => ctx.scheduler.set_on(owner, &args.name, args.duration, options),
        None => ctx.scheduler.set_named(&args.name, args.duration, options),
    };
    let verb = match result {
        SetTimerResult::NewTimer => "created",
        SetTimerResult::TimeLeftChanged | SetTimerResult::CallbackReplaced => "re-armed",
    };
    let key = CliContext::key_for(owner, &args.name);
    println!("{verb} {} [{key}] for {:.2}s", args.name, ctx.scheduler.time_left(key));
}

pub fn register(ctx: &mut CliContext, name: &str, owner: Option<u32>) {
    match parse_owner(owner) {
        Some(owner) => ctx.scheduler.register_on(owner, name, TimerOptions::default()),
        None => ctx.scheduler.register_named(name, TimerOptions::default()),
    }
    println!("registered slot {name}");
}

pub fn cancel(ctx: &mut CliContext, name: &str, owner: Option<u32>) {
    let key = CliContext::key_for(parse_owner(owner), name);
    if ctx.scheduler.cancel(key) {
        println!("cancelled {name}");
    } else {
        println!("no timer {name}");
    }
}

pub fn set_paused(ctx: &mut CliContext, name: &str, owner: Option<u32>, paused: bool) {
    let key = CliContext::key_for(parse_owner(owner), name);
    if !ctx.scheduler.set_paused(key, paused) {
        println!("no timer {name}");
        return;
    }
    let state = if paused { "paused" } else { "resumed" };
    println!("{name} {state}");
}

pub fn after(ctx: &mut CliContext, delay: f32, message: String) {
    ctx.scheduler.add_nameless(delay, move |scheduler| {
        println!("[frame {}] {message}", scheduler.frame_count());
    });
    println!("scheduled in {delay:.2}s ({} pending)", ctx.scheduler.nameless_len());
}

pub fn hold(ctx: &mut CliContext, name: &str, target: f32) {
    let key = CliContext::key_for(None, name);
    ctx.holds.retain(|h| h.name != name);
    ctx.holds.push(Hold {
        name: name.to_string(),
        key,
        target,
    });
    println!("holding {name} until {target:.2}s");
}

pub fn release(ctx: &mut CliContext, name: &str) {
    let before = ctx.holds.len();
    ctx.holds.retain(|h| h.name != name);
    if ctx.holds.len() == before {
        println!("{name} was not held");
    } else {
        println!("released {name}");
    }
}

fn after_frame(ctx: &mut CliContext) {
    for name in ctx.trigger_holds() {
        println!("[frame {}] {name} held long enough", ctx.scheduler.frame_count());
    }
}

/// Advance `frames` frames of `dt` seconds each
pub fn step(ctx: &mut CliContext, frames: u32, dt: f32) -> Result<(), String> {
    if !dt.is_finite() || dt < 0.0 {
        return Err(format!("error: invalid frame delta {dt}\n"));
    }
    let frame = FrameTime::new(dt * ctx.config.time_scale, dt);
    for _ in 0..frames {
        ctx.scheduler.advance(frame, &ctx.owners);
        after_frame(ctx);
    }
    println!("advanced {frames} frame(s), now at frame {}", ctx.scheduler.frame_count());
    Ok(())
}

/// Drive the scheduler from the wall clock for `seconds`
pub async fn run(ctx: &mut CliContext, seconds: f32) -> Result<(), String> {
    if !seconds.is_finite() || seconds < 0.0 {
        return Err(format!("error: invalid run length {seconds}\n"));
    }
    let interval = Duration::from_secs_f32(ctx.config.frame_interval_secs());
    let deadline = tokio::time::Instant::now() + Duration::from_secs_f32(seconds);

    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
    ctx.scheduler.reset_clock();

    tracing::debug!(seconds, fps = ctx.config.target_frame_rate, "real-time run");
    while tokio::time::Instant::now() < deadline {
        ticker.tick().await;
        ctx.scheduler.tick(&ctx.owners);
        after_frame(ctx);
    }
    println!("ran {seconds:.2}s, now at frame {}", ctx.scheduler.frame_count());
    Ok(())
}

/// Timer viewer: one row per named timer
pub fn list(ctx: &CliContext) {
    let rows = ctx.scheduler.snapshot(&ctx.owners);
    if rows.is_empty() {
        println!("No timers");
    } else {
        println!(
            "{:<18} {:<16} {:<14} {:<10} {:>8} {:>8}  Flags",
            "Key", "Name", "Owner", "State", "Left", "Total"
        );
        println!("{}", "-".repeat(86));
        for row in rows {
            let owner = match row.owner {
                Some(id) => {
                    let id = OwnerId(id);
                    let label = ctx.owners.label(id).unwrap_or_else(|| "?".to_string());
                    format!("{id} {label}")
                }
                None => "-".to_string(),
            };
            let mut flags = String::new();
            if row.loop_forever {
                flags.push_str("loop:inf ");
            } else if row.loops_remaining > 0 {
                flags.push_str(&format!("loop:{} ", row.loops_remaining));
            }
            if row.unscaled {
                flags.push_str("unscaled ");
            }
            if row.preserve {
                flags.push_str("preserve ");
            }
            if row.paused {
                flags.push_str("paused");
            }
            println!(
                "{:<18} {:<16} {:<14} {:<10} {:>8.2} {:>8.2}  {}",
                format!("{:016x}", row.key),
                row.name,
                owner,
                row.owner_state.label(),
                round_to_nearest_multiple(row.time_left, DISPLAY_STEP),
                round_to_nearest_multiple(row.duration, DISPLAY_STEP),
                flags.trim_end()
            );
        }
    }

    println!("nameless pending: {}", ctx.scheduler.nameless_len());
    for hold in &ctx.holds {
        let progress = ctx.scheduler.chronometer_progress(hold.key).unwrap_or(0.0);
        println!(
            "hold {}: {:.2}/{:.2}s",
            hold.name,
            round_to_nearest_multiple(progress, DISPLAY_STEP),
            hold.target
        );
    }
}

pub fn show_config(ctx: &CliContext) {
    let c = &ctx.config;
    println!("time_scale:           {}", c.time_scale);
    println!("max_frame_delta_secs: {}", c.max_frame_delta_secs);
    println!("target_frame_rate:    {}", c.target_frame_rate);
    println!("debug_logging:        {}", c.debug_logging);
    match horologe_core::SchedulerConfig::config_path() {
        Ok(path) => println!("file:                 {}", path.display()),
        Err(e) => println!("file:                 unavailable ({e})"),
    }
}

pub fn set_scale(ctx: &mut CliContext, scale: f32) -> Result<(), String> {
    if !scale.is_finite() || scale < 0.0 {
        return Err(format!("error: invalid time scale {scale}\n"));
    }
    ctx.config.time_scale = scale;
    ctx.scheduler.set_time_scale(scale);
    println!("time scale set to {scale}");
    Ok(())
}

pub fn save_config(ctx: &CliContext) -> Result<(), String> {
    ctx.config.save().map_err(|e| format!("error: {e}\n"))?;
    println!("configuration saved");
    Ok(())
}

pub fn clear(ctx: &mut CliContext) {
    ctx.scheduler.clear();
    ctx.holds.clear();
    println!("cleared all timers");
}

pub fn exit() -> Result<(), String> {
    writeln!(std::io::stdout(), "quitting...").map_err(|e| e.to_string())?;
    std::io::stdout().flush().map_err(|e| e.to_string())
}
