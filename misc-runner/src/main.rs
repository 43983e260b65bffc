#[macro_use]
extern crate clap;

mod error;
mod persistence;

use std::path::PathBuf;

use clap::Arg;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use misc_genetic::{evaluate_population, GaHooks, GeneticAlgo};
use misc_maze::{Maze, MazeLayout};

use error::RunnerError;

struct Args {
    generations: usize,
    mutation_rate: f64,
    crossover_rate: f64,
    maze_width: usize,
    maze_height: usize,
    maze_count: usize,
    population_size: usize,
    step_budget: u32,
    seed: u64,
    save_population: Option<PathBuf>,
    load_population: Option<PathBuf>,
    csv_log: Option<PathBuf>,
    processes: Option<usize>,
    print_output: bool,
}

fn parse_args() -> Args {
    let matches = app_from_crate!()
        .arg(Arg::with_name("generations").long("generations").takes_value(true).default_value("50"))
        .arg(Arg::with_name("mutation-rate").long("mutation-rate").takes_value(true).default_value("0.01"))
        .arg(Arg::with_name("crossover-rate").long("crossover-rate").takes_value(true).default_value("0.7"))
        .arg(Arg::with_name("maze-width").long("maze-width").takes_value(true).default_value("9"))
        .arg(Arg::with_name("maze-height").long("maze-height").takes_value(true).default_value("9"))
        .arg(Arg::with_name("maze-count").long("maze-count").takes_value(true).default_value("8"))
        .arg(Arg::with_name("population-size").long("population-size").takes_value(true).default_value("64"))
        .arg(Arg::with_name("step-budget").long("step-budget").takes_value(true).default_value("500"))
        .arg(Arg::with_name("seed").long("seed").takes_value(true).default_value("0"))
        .arg(Arg::with_name("save-population").long("save-population").takes_value(true).value_name("PATH"))
        .arg(Arg::with_name("load-population").long("load-population").takes_value(true).value_name("PATH"))
        .arg(Arg::with_name("csv-log").long("csv-log").takes_value(true).value_name("PATH"))
        .arg(Arg::with_name("processes").long("processes").takes_value(true).value_name("N"))
        .arg(Arg::with_name("print-output").long("print-output"))
        .get_matches();

    fn parse<T: std::str::FromStr>(matches: &clap::ArgMatches, name: &str) -> T
    where
        T::Err: std::fmt::Debug,
    {
        matches.value_of(name).unwrap().parse().expect("numeric flag")
    }

    Args {
        generations: parse(&matches, "generations"),
        mutation_rate: parse(&matches, "mutation-rate"),
        crossover_rate: parse(&matches, "crossover-rate"),
        maze_width: parse(&matches, "maze-width"),
        maze_height: parse(&matches, "maze-height"),
        maze_count: parse(&matches, "maze-count"),
        population_size: parse(&matches, "population-size"),
        step_budget: parse(&matches, "step-budget"),
        seed: parse(&matches, "seed"),
        save_population: matches.value_of("save-population").map(PathBuf::from),
        load_population: matches.value_of("load-population").map(PathBuf::from),
        csv_log: matches.value_of("csv-log").map(PathBuf::from),
        processes: matches.value_of("processes").map(|n| n.parse().expect("numeric flag")),
        print_output: matches.is_present("print-output"),
    }
}

fn random_program(len_words: usize, rng: &mut impl Rng) -> Vec<u8> {
    (0..len_words * 2).map(|_| rng.gen()).collect()
}

fn run(args: Args) -> Result<(), RunnerError> {
    if let Some(n) = args.processes {
        rayon::ThreadPoolBuilder::new().num_threads(n).build_global().ok();
    }

    let mut master_rng = ChaCha8Rng::seed_from_u64(args.seed);

    let mazes: Vec<MazeLayout> = (0..args.maze_count)
        .map(|_| Maze::generate(args.maze_width, args.maze_height, &mut master_rng).layout().clone())
        .collect();

    let population: Vec<Vec<u8>> = if let Some(path) = &args.load_population {
        let run_file = persistence::load_population(path)?;
        persistence::decode_population(&run_file)
    } else {
        (0..args.population_size).map(|_| random_program(8, &mut master_rng)).collect()
    };
    if population.is_empty() {
        return Err(RunnerError::EmptyPopulation);
    }

    let mut score_log = match &args.csv_log {
        Some(path) => Some(persistence::ScoreLog::create(path)?),
        None => None,
    };

    let progress = indicatif::ProgressBar::new(args.generations as u64);
    if let Ok(style) = indicatif::ProgressStyle::default_bar()
        .template("{prefix} [{bar:40}] gen {pos}/{len} | avg {msg}")
    {
        progress.set_style(style);
    }

    let generations = args.generations;
    let mutation_rate = args.mutation_rate;
    let crossover_rate = args.crossover_rate;
    let step_budget = args.step_budget;
    let master_seed = args.seed;

    let hooks = GaHooks {
        on_next_gen: Box::new({
            let progress = progress.clone();
            move |generation| {
                progress.set_position(generation as u64);
                tracing::debug!(generation, "starting generation");
            }
        }),
        on_log_scores: Box::new({
            let mut log = score_log.take();
            move |generation, scores| {
                let avg = scores.iter().sum::<i64>() as f64 / scores.len() as f64;
                println!("generation {generation}: average score {avg:.2}");
                if let Some(log) = log.as_mut() {
                    if let Err(err) = log.log_generation(generation, scores) {
                        tracing::warn!(%err, "failed to write CSV row");
                    }
                }
            }
        }),
        on_selection: Box::new({
            let progress = progress.clone();
            move |avg| progress.set_message(format!("{avg:.1}"))
        }),
        on_reproduction: Box::new(|| tracing::trace!("reproducing next generation")),
        on_finished: Box::new({
            let progress = progress.clone();
            move || progress.finish_with_message("done")
        }),
    };

    let algo = GeneticAlgo::new(mutation_rate, crossover_rate);
    let mut rng = ChaCha8Rng::seed_from_u64(master_seed.wrapping_add(1));
    let scored = algo.run(
        population,
        hooks,
        &mut rng,
        |pop| evaluate_population(pop, &mazes, step_budget, master_seed),
        GeneticAlgo::fixed_generations(generations),
    );

    let scores: Vec<i64> = scored.iter().map(|s| s.score).collect();
    let mean = scores.iter().sum::<i64>() as f64 / scores.len() as f64;
    let min = *scores.iter().min().expect("non-empty population");
    let max = *scores.iter().max().expect("non-empty population");
    println!("final generation: mean {mean:.2}, min {min}, max {max}");

    let best = scored.iter().max_by_key(|s| s.score).expect("non-empty population");
    println!("best score: {}", best.score);
    if args.print_output {
        println!("best program: {}", persistence::hex_summary(&best.program));
    }

    if let Some(path) = &args.save_population {
        let population: Vec<Vec<u8>> = scored.iter().map(|s| s.program.clone()).collect();
        persistence::save_run(path, &population, &best.program, &mazes)?;
    }

    Ok(())
}

fn main() {
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .finish();
    tracing::subscriber::set_global_default(subscriber).ok();

    let args = parse_args();
    if let Err(err) = run(args) {
        eprintln!("{err}");
        std::process::exit(1);
    }
}
