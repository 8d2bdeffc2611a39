use std::{num::NonZeroUsize, path::PathBuf, thread};

use clap::Parser;
use color_eyre::eyre::{ensure, Result};
use lennard_jones::{
    config::Parameters, csv::write_csv_diagnostics, diagnostics::Sample, Boundary,
    DirectSummation, Particles, Simulation, Sorting,
};
use log::info;
use rand::{rngs::SmallRng, SeedableRng};

/// Simulate a two-dimensional Lennard-Jones gas and render it as a GIF.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Number of particles, has to be twice a perfect square
    #[arg(long, default_value_t = 200)]
    n: usize,

    /// Simulated time
    #[arg(long, default_value_t = 5.)]
    time: f64,

    /// Half the side length of the square box
    #[arg(long, default_value_t = 10.)]
    box_radius: f64,

    /// Initial speed of the particles
    #[arg(long, default_value_t = 1.)]
    avg_speed: f64,

    /// Updates per unit of simulated time
    #[arg(long, default_value_t = 1000.)]
    ups: f64,

    /// Frames per unit of simulated time
    #[arg(long, default_value_t = 50.)]
    fps: f64,

    /// Side length of the frames in pixels
    #[arg(long, default_value_t = 240)]
    resolution: u32,

    #[arg(short, long, default_value = "lennard_jones.gif")]
    output_file: PathBuf,

    #[arg(long, value_enum, default_value_t = Boundary::Periodic)]
    boundary: Boundary,

    /// Seed for the initial velocities, random if not given
    #[arg(long)]
    seed: Option<u64>,

    /// Number of worker threads, all cores if not given
    #[arg(long)]
    threads: Option<usize>,

    /// Reorder the particles by height every this many updates
    #[arg(long)]
    sort_every: Option<usize>,

    /// Also write temperature and pressure of every frame to this CSV file
    #[arg(long)]
    diagnostics: Option<PathBuf>,
}

impl Args {
    fn parameters(&self) -> Parameters {
        Parameters {
            n: self.n,
            time: self.time,
            box_radius: self.box_radius,
            avg_speed: self.avg_speed,
            ups: self.ups,
            fps: self.fps,
            resolution: self.resolution,
        }
    }
}

fn main() -> Result<()> {
    color_eyre::install()?;
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let params = args.parameters();
    params.validate()?;
    ensure!(args.sort_every != Some(0), "cannot sort every 0th update");
    ensure!(args.threads != Some(0), "need at least one thread");

    let mut rng = match args.seed {
        Some(seed) => SmallRng::seed_from_u64(seed),
        None => SmallRng::from_entropy(),
    };
    let particles = Particles::lattice(params.n, params.box_radius, params.avg_speed, &mut rng);

    let num_threads = args
        .threads
        .unwrap_or_else(|| thread::available_parallelism().map_or(1, NonZeroUsize::get));
    let solver = if num_threads > 1 {
        DirectSummation::new().multithreaded(num_threads)
    } else {
        DirectSummation::new()
    };

    let mut simulation =
        Simulation::new(particles, solver, params.box_radius).boundary(args.boundary);
    if let Some(every) = args.sort_every {
        simulation = simulation.sorting(Sorting::EveryNIteration(every));
    }

    let n_updates = params.n_updates();
    let n_frames = params.n_frames();
    let dt = params.dt();
    let frame_interval = params.frame_interval();
    info!(
        "{} particles, {n_updates} updates of {dt}, {n_frames} frames, {num_threads} threads",
        params.n
    );

    #[cfg(feature = "visualization")]
    let mut animation =
        lennard_jones::visualization::Animation::with_capacity(params.resolution, n_frames);
    let mut samples = Vec::with_capacity(n_frames);
    let mut next_frame = frame_interval;

    for update in 1..=n_updates {
        simulation.step(dt);

        let time = update as f64 * dt;
        if time >= next_frame && samples.len() < n_frames {
            let sample = Sample::measure(
                time,
                simulation.particles().velocities(),
                params.box_radius,
            );
            info!(
                "T: {:7.3}  P: {:7.3}  update: {update:>6}/{n_updates}  frame: {:>4}/{n_frames}",
                sample.temperature,
                sample.pressure,
                samples.len() + 1,
            );

            #[cfg(feature = "visualization")]
            animation.push(simulation.particles().positions(), params.box_radius);
            samples.push(sample);
            next_frame += frame_interval;
        }
    }

    info!(
        "done: T: {:.3}  P: {:.3}  E: {:.3}",
        simulation.temperature(),
        simulation.pressure(),
        simulation.total_energy()
    );

    if let Some(path) = &args.diagnostics {
        write_csv_diagnostics(&samples, path)?;
        info!("wrote diagnostics to {}", path.display());
    }

    #[cfg(feature = "visualization")]
    {
        animation.write_gif(&args.output_file, params.fps)?;
        info!("wrote {} frames to {}", animation.len(), args.output_file.display());
    }
    #[cfg(not(feature = "visualization"))]
    log::warn!(
        "built without the visualization feature, {} is not written",
        args.output_file.display()
    );

    Ok(())
}
