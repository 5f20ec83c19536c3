use std::{io, num::NonZeroUsize};

use clap::Parser;
use color_eyre::eyre::Result;
use eyre::Context;
use glam::DVec2;
use sound_locator::{
    config::{BearingTarget, Config, Params},
    feedback::{FeedbackLoop, RunSummary},
    io::prompt_params,
    motion::{ConstantStep, Displacement, RandomWalk, Stationary},
    tui::TuiSink,
};

#[derive(Debug, Clone, clap::Parser)]
#[command(version, about, long_about = None)]
struct Args {
    /// Ask for the run parameters on the terminal instead.
    #[arg(short, long)]
    interactive: bool,
    #[arg(long, default_value_t = 10.0)]
    width: f64,
    #[arg(long, default_value_t = 10.0)]
    height: f64,
    #[arg(short = 'x', long, default_value_t = 2.0, allow_negative_numbers = true)]
    source_x: f64,
    #[arg(short = 'y', long, default_value_t = 0.0, allow_negative_numbers = true)]
    source_y: f64,
    /// Leave out to run until interrupted.
    #[arg(short = 'n', long, allow_negative_numbers = true)]
    iterations: Option<i64>,
    #[arg(short, long, default_value_t = 0.5)]
    delay_secs: f64,
    #[arg(long, value_enum, default_value_t = BearingTarget::Estimate)]
    bearing_target: BearingTarget,
    /// Distance the source moves along x every iteration.
    #[arg(long, default_value_t = 1.0, allow_negative_numbers = true)]
    step_x: f64,
    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    step_y: f64,
    /// Keep the source in place.
    #[arg(long, conflicts_with_all = ["random_walk", "step_x", "step_y"])]
    stationary: bool,
    /// Move the source randomly by up to this much per axis, staying inside the room.
    #[arg(long, conflicts_with_all = ["step_x", "step_y"])]
    random_walk: Option<f64>,
    #[arg(long, default_value_t = 0)]
    seed: u64,
    /// How many recent iterations the accuracy report averages over (and how often it prints).
    #[arg(long, default_value_t = NonZeroUsize::new(10).expect("non-zero literal"))]
    report_window: NonZeroUsize,
    /// Only print the periodic accuracy reports.
    #[arg(short, long)]
    quiet: bool,
}

impl Args {
    fn params(&self) -> Params {
        Params {
            room_width: self.width,
            room_height: self.height,
            source_x: self.source_x,
            source_y: self.source_y,
            iterations: self.iterations,
            delay_secs: self.delay_secs,
            bearing_target: self.bearing_target,
        }
    }
}

fn main() -> Result<()> {
    color_eyre::install()?;
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    let params = if args.interactive {
        let params = prompt_params(&mut io::stdin().lock(), &mut io::stdout())
            .wrap_err("reading parameters")?;
        Params {
            bearing_target: args.bearing_target,
            ..params
        }
    } else {
        args.params()
    };
    let config = Config::try_from(params).wrap_err("invalid parameters")?;

    let mut sink = TuiSink::new(args.report_window, args.report_window.get());
    if args.quiet {
        sink = sink.quiet();
    }

    let summary = if args.stationary {
        run(config, Stationary, sink)?
    } else if let Some(max_step) = args.random_walk {
        let walk = RandomWalk::new(max_step, args.seed)?.within(config.room());
        run(config, walk, sink)?
    } else {
        let step = ConstantStep::new(DVec2::new(args.step_x, args.step_y))?;
        run(config, step, sink)?
    };

    println!(
        "done after {} iterations, source ended at ({:.3}, {:.3})",
        summary.iterations, summary.final_position.x, summary.final_position.y
    );
    if let (Some(mean), Some(std_dev)) = (summary.mean_error, summary.error_std_dev) {
        println!("estimation error: {mean:.3} ± {std_dev:.3}");
    }

    Ok(())
}

fn run<D: Displacement>(config: Config, displacement: D, sink: TuiSink) -> Result<RunSummary> {
    FeedbackLoop::new(config, displacement, sink)
        .run()
        .wrap_err("running locator loop")
}
