use std::io::{self, BufRead, Write};

use clap::Parser;
use color_eyre::eyre::Result;
use glam::DVec2;
use sound_locator::{
    computer::Computer,
    direction::Bearing,
    geometry::{MicrophoneArray, RoomSize},
    io::parse_point,
    simulator::Simulator,
};

#[derive(Parser)]
#[command(version, about, long_about = None)]
struct Args {
    #[arg(long, default_value_t = 10.0)]
    width: f64,
    #[arg(long, default_value_t = 10.0)]
    height: f64,
}

fn main() -> Result<()> {
    color_eyre::install()?;

    let args = Args::parse();

    let room = RoomSize::new(args.width, args.height)?;
    let microphones = MicrophoneArray::corners(&room);
    let simulator = Simulator::new(microphones.clone());
    let computer = Computer::new(microphones);

    let stdin = io::stdin();
    let mut line = String::new();

    loop {
        print!("source x y < ");
        io::stdout().flush()?;
        line.clear();
        if stdin.lock().read_line(&mut line)? == 0 {
            return Ok(());
        }

        let (x, y) = match parse_point(&line) {
            Ok(point) => point,
            Err(err) => {
                eprintln!("{err:#}");
                continue;
            }
        };

        let intensities = simulator.listen(DVec2::new(x, y));
        let estimate = computer.estimate(&intensities)?;
        let bearing = Bearing::from_camera(estimate);

        println!("> intensities {:.2?}", intensities.as_slice());
        println!("> estimate ({:.3}, {:.3}), camera {bearing}\n", estimate.x, estimate.y);
    }
}
