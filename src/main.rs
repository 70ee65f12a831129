//! Emergent CA CLI - Evolve density classifiers or run a single rule.

use std::fs;
use std::path::Path;
use std::process;
use std::time::Instant;

use serde::Serialize;

use emergent_ca::{
    compute::{Automaton, AutomatonStats, evolution::GeneticAlgorithm},
    random::SeededSource,
    schema::{EvaluationConfig, Rule, RulePreset, RunConfig},
};

#[derive(Serialize)]
struct EvolveReport {
    generations: usize,
    best_fitness: f64,
    best_rule: Option<Rule>,
    fitness_history: Vec<f64>,
    showcase: Option<AutomatonStats>,
}

#[derive(Serialize)]
struct RunReport {
    rule: Rule,
    preset: Option<RulePreset>,
    seed: u64,
    stats: AutomatonStats,
}

fn main() {
    #[cfg(not(target_arch = "wasm32"))]
    env_logger::init();

    let args: Vec<String> = std::env::args().collect();

    let result = match args.get(1).map(String::as_str) {
        Some("--example") => print_example_config(),
        Some("evolve") => evolve(args.get(2).map(Path::new)),
        Some("run") if args.len() >= 3 => run(&args[2], args.get(3), args.get(4)),
        _ => {
            print_usage(&args[0]);
            process::exit(1);
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn print_usage(program: &str) {
    eprintln!("Usage: {} evolve [config.json]", program);
    eprintln!("       {} run <preset|hex> [size] [seed]", program);
    eprintln!("       {} --example", program);
    eprintln!();
    eprintln!("Evolve radius-3 rules for density classification, or run one rule.");
    eprintln!();
    eprintln!("Presets:");
    for preset in RulePreset::ALL {
        eprintln!("  {:<16} {}", preset.name(), preset.description());
    }
    eprintln!();
    eprintln!("Example configuration is generated with --example flag.");
}

fn evolve(config_path: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    let config: RunConfig = match config_path {
        Some(path) => {
            let config_str = fs::read_to_string(path)
                .map_err(|e| format!("reading {}: {}", path.display(), e))?;
            serde_json::from_str(&config_str)?
        }
        None => RunConfig::default(),
    };
    config.validate()?;

    eprintln!("Density Classification Evolution");
    eprintln!("================================");
    eprintln!("Lattice: {}", config.lattice_size);
    eprintln!("Population: {}", config.evolution.population_size);
    eprintln!("Mutation rate: {}", config.evolution.mutation_rate);
    eprintln!("Generations: {}", config.generations);
    eprintln!();

    let mut ga = GeneticAlgorithm::from_config(config.evolution.clone())?;
    let start = Instant::now();

    ga.run_with_callback(config.generations, config.lattice_size, |stats| {
        eprintln!(
            "  Generation {}/{}: best={:.3} gen_best={:.3} mean={:.3} diversity={:.3}, {:.1}s",
            stats.generation,
            config.generations,
            stats.best_fitness,
            stats.generation_best,
            stats.mean_fitness,
            stats.diversity,
            start.elapsed().as_secs_f32()
        );
    })?;

    let showcase = ga
        .showcase(config.lattice_size)?
        .map(|automaton| AutomatonStats::from_automaton(&automaton));

    let report = EvolveReport {
        generations: ga.generation(),
        best_fitness: ga.best_fitness(),
        best_rule: ga.best_rule().cloned(),
        fitness_history: ga.fitness_history().to_vec(),
        showcase,
    };
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

fn run(
    rule_arg: &str,
    size_arg: Option<&String>,
    seed_arg: Option<&String>,
) -> Result<(), Box<dyn std::error::Error>> {
    let (rule, preset) = match rule_arg.parse::<RulePreset>() {
        Ok(preset) => (preset.rule(), Some(preset)),
        Err(_) => (rule_arg.parse::<Rule>()?, None),
    };
    let size: usize = match size_arg {
        Some(s) => s.parse()?,
        None => RunConfig::default().lattice_size,
    };
    let seed: u64 = match seed_arg {
        Some(s) => s.parse()?,
        None => 0,
    };

    let max_steps = EvaluationConfig::default().step_budget(size);
    let mut automaton = Automaton::new(size, Some(rule.clone()), SeededSource::new(seed))?;
    automaton.run_until_settled(max_steps);

    for row in automaton.history() {
        let line: String = row
            .iter()
            .map(|&cell| if cell == 1 { '#' } else { '.' })
            .collect();
        eprintln!("{}", line);
    }

    let report = RunReport {
        rule,
        preset,
        seed,
        stats: AutomatonStats::from_automaton(&automaton),
    };
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

fn print_example_config() -> Result<(), Box<dyn std::error::Error>> {
    let config = RunConfig::default();

    println!("Example configuration (config.json):");
    println!("{}", serde_json::to_string_pretty(&config)?);
    Ok(())
}
