//! stb: CLI binary for Shut the Box.
//!
//! Subcommands:
//! - simulate
//! - compare
//! - distribution
//! - check-table
//! - play

use std::env;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process;
use std::str::FromStr;

use stb_core::{
    check_flaps, check_num_dice, Dice, DicePolicy, FlapBox, FlapStrategy, StbConfig,
};
use stb_engine::{dice_sum_distribution, DecisionEngine, EngineSettings, OptimalTable};

fn fail(msg: impl std::fmt::Display) -> ! {
    eprintln!("{msg}");
    process::exit(1);
}

/// Value following flag `args[i]`, or exit.
fn flag_value<'a>(args: &'a [String], i: usize) -> &'a str {
    match args.get(i + 1) {
        Some(v) => v,
        None => fail(format!("Missing value for {}", args[i])),
    }
}

fn parse_flag<T: FromStr>(args: &[String], i: usize) -> T {
    let v = flag_value(args, i);
    v.parse()
        .unwrap_or_else(|_| fail(format!("Invalid {} value: {}", args[i], v)))
}

fn cmd_simulate(args: &[String]) {
    let mut config_path: Option<PathBuf> = None;
    let mut turns: Option<u32> = None;
    let mut seed: Option<u64> = None;
    let mut strategy: Option<FlapStrategy> = None;
    let mut dice_policy: Option<DicePolicy> = None;
    let mut table: Option<PathBuf> = None;
    let mut events: Option<PathBuf> = None;
    let mut no_hist = false;
    let mut print_scores = false;
    let mut debug = false;

    let mut i = 0usize;
    while i < args.len() {
        match args[i].as_str() {
            "--help" | "-h" => {
                println!(
                    r#"stb simulate

USAGE:
    stb simulate [--config PATH] [--turns N] [--seed S] [--strategy X]
                 [--dice-policy Y] [--table PATH] [--events PATH]
                 [--scores] [--no-hist] [--debug]

OPTIONS:
    --config PATH      YAML run config (default: built-in defaults)
    --turns N          Number of turns to simulate (default: 10000)
    --seed S           Dice seed (default: 0)
    --strategy X       highest | lowest | next_roll_probability | table
    --dice-policy Y    one_if_possible | always_all
    --table PATH       Optimal-strategy table file (for --strategy table)
    --events PATH      Append NDJSON roll/turn events here
    --scores           Print each turn's score on its own line
    --no-hist          Skip printing histogram
    --debug            Print the box and every roll
"#
                );
                return;
            }
            "--config" => {
                config_path = Some(PathBuf::from(flag_value(args, i)));
                i += 2;
            }
            "--turns" => {
                turns = Some(parse_flag(args, i));
                i += 2;
            }
            "--seed" => {
                seed = Some(parse_flag(args, i));
                i += 2;
            }
            "--strategy" => {
                strategy = Some(parse_flag(args, i));
                i += 2;
            }
            "--dice-policy" => {
                dice_policy = Some(parse_flag(args, i));
                i += 2;
            }
            "--table" => {
                table = Some(PathBuf::from(flag_value(args, i)));
                i += 2;
            }
            "--events" => {
                events = Some(PathBuf::from(flag_value(args, i)));
                i += 2;
            }
            "--scores" => {
                print_scores = true;
                i += 1;
            }
            "--no-hist" => {
                no_hist = true;
                i += 1;
            }
            "--debug" => {
                debug = true;
                i += 1;
            }
            other => {
                eprintln!("Unknown option for `stb simulate`: {}", other);
                eprintln!("Run `stb simulate --help` for usage.");
                process::exit(1);
            }
        }
    }

    let mut cfg = match &config_path {
        Some(p) => StbConfig::load(p).unwrap_or_else(|e| fail(e)),
        None => StbConfig::default(),
    };
    if let Some(t) = turns {
        cfg.simulation.turns = t;
    }
    if let Some(s) = seed {
        cfg.simulation.seed = s;
    }
    if let Some(s) = strategy {
        cfg.strategy.flap_strategy = s;
    }
    if let Some(p) = dice_policy {
        cfg.strategy.dice_policy = p;
    }
    if table.is_some() {
        cfg.strategy.table_path = table;
    }
    if events.is_some() {
        cfg.logging.events_path = events;
    }
    if let Err(e) = cfg.validate() {
        fail(e);
    }

    let engine = DecisionEngine::from_config(&cfg).unwrap_or_else(|e| fail(e));
    let report = stb_sim::simulate(&cfg, &engine, debug).unwrap_or_else(|e| fail(e));

    if print_scores {
        for s in &report.scores {
            println!("{s}");
        }
    }

    let s = &report.summary;
    println!();
    println!("Simulation:");
    println!(
        "  - Strategy: {} (dice policy: {})",
        cfg.strategy.flap_strategy, cfg.strategy.dice_policy
    );
    println!("  - Turns: {}", report.scores.len());
    println!(
        "  - Score: mean={:.2}, median={}, std={:.2}, min={}, max={}",
        s.mean, s.median, s.std_dev, s.min, s.max
    );
    println!("  - Shut the box: {:.1}%", s.shut_rate * 100.0);
    if let Some(p) = &report.manifest_path {
        println!("  - Manifest: {}", p.display());
    }

    if !no_hist {
        stb_sim::print_histogram(&report.scores);
    }
}

fn cmd_compare(args: &[String]) {
    let mut a = FlapStrategy::Highest;
    let mut b = FlapStrategy::NextRollProbability;
    let mut policy = DicePolicy::OneIfPossible;
    let mut min_len: usize = 4;
    let mut max_len: Option<usize> = None;
    let mut table: Option<PathBuf> = None;

    let mut i = 0usize;
    while i < args.len() {
        match args[i].as_str() {
            "--help" | "-h" => {
                println!(
                    r#"stb compare

Print every open-flaps/dice-total case where two strategies choose differently.

USAGE:
    stb compare [--a X] [--b Y] [--dice-policy P] [--min-len L] [--max-len L] [--table PATH]

OPTIONS:
    --a X              First strategy (default: highest)
    --b Y              Second strategy (default: next_roll_probability)
    --dice-policy P    one_if_possible | always_all (default: one_if_possible)
    --min-len L        Fewest open flaps to consider (default: 4)
    --max-len L        Most open flaps to consider (default: all 9)
    --table PATH       Optimal-strategy table, if either strategy is `table`
"#
                );
                return;
            }
            "--a" => {
                a = parse_flag(args, i);
                i += 2;
            }
            "--b" => {
                b = parse_flag(args, i);
                i += 2;
            }
            "--dice-policy" => {
                policy = parse_flag(args, i);
                i += 2;
            }
            "--min-len" => {
                min_len = parse_flag(args, i);
                i += 2;
            }
            "--max-len" => {
                max_len = Some(parse_flag(args, i));
                i += 2;
            }
            "--table" => {
                table = Some(PathBuf::from(flag_value(args, i)));
                i += 2;
            }
            other => {
                eprintln!("Unknown option for `stb compare`: {}", other);
                eprintln!("Run `stb compare --help` for usage.");
                process::exit(1);
            }
        }
    }

    let settings = EngineSettings::default();
    let mut engine = DecisionEngine::new(settings).unwrap_or_else(|e| fail(e));
    if let Some(p) = table {
        engine = engine.with_table(OptimalTable::load(p).unwrap_or_else(|e| fail(e)));
    }
    let max_len = max_len.unwrap_or(settings.num_flaps as usize);
    let totals = settings.num_dice as u32..=settings.num_dice as u32 * 6;

    let diffs = stb_sim::strategy_differences(&engine, a, b, policy, min_len..=max_len, totals)
        .unwrap_or_else(|e| fail(e));
    for d in &diffs {
        println!("{d}");
    }
    println!("{} differences between {a} (a) and {b} (b)", diffs.len());
}

fn cmd_distribution(args: &[String]) {
    let mut dice: u8 = 2;

    let mut i = 0usize;
    while i < args.len() {
        match args[i].as_str() {
            "--help" | "-h" => {
                println!(
                    r#"stb distribution

USAGE:
    stb distribution [--dice N]

OPTIONS:
    --dice N    Number of dice, 1..=8 (default: 2)
"#
                );
                return;
            }
            "--dice" => {
                dice = parse_flag(args, i);
                i += 2;
            }
            other => {
                eprintln!("Unknown option for `stb distribution`: {}", other);
                process::exit(1);
            }
        }
    }
    if !(1..=stb_core::MAX_DICE).contains(&dice) {
        fail(format!("--dice must be in 1..={}", stb_core::MAX_DICE));
    }

    let d = dice_sum_distribution(dice);
    println!("Totals for {} dice ({} outcomes):", dice, d.outcomes());
    for (total, p) in d.iter() {
        println!("{:3} {:8} {:.6}", total, d.count(total), p);
    }
}

fn cmd_check_table(args: &[String]) {
    let Some(path) = args.first() else {
        fail("Usage: stb check-table FILE");
    };
    if path == "--help" || path == "-h" {
        println!("stb check-table FILE\n\nLoad and validate an optimal-strategy table.");
        return;
    }
    match OptimalTable::load(path) {
        Ok(t) => println!("OK: {} records in {}", t.len(), path),
        Err(e) => fail(e),
    }
}

/// Print `msg`, read one line. `None` on end of input.
fn prompt(msg: &str) -> Option<String> {
    print!("{msg}");
    let _ = io::stdout().flush();
    let mut line = String::new();
    match io::stdin().lock().read_line(&mut line) {
        Ok(0) | Err(_) => None,
        Ok(_) => Some(line.trim_end_matches(['\r', '\n']).to_string()),
    }
}

/// Y/N answer; `None` if it was neither.
fn check_another_game_choice(s: &str) -> Option<bool> {
    match s.trim().chars().next().map(|c| c.to_ascii_lowercase()) {
        Some('y') => Some(true),
        Some('n') => Some(false),
        _ => {
            println!("Please enter Y or N");
            None
        }
    }
}

/// One human turn. Returns the score, or `None` if input ran out.
fn play_turn(
    flap_box: &mut FlapBox,
    dice: &mut Dice,
    engine: &DecisionEngine,
    hint: bool,
) -> Option<u32> {
    let max_single = engine.settings().single_die_max_sum;
    'rolls: while !flap_box.is_shut() {
        println!("{flap_box}\n");

        let num_dice = if flap_box.sum_open() <= max_single {
            loop {
                let answer = prompt(&format!(
                    "How many dice would you like to roll? (between 1 and {}) ",
                    dice.num_dice()
                ))?;
                match check_num_dice(&answer, dice.num_dice(), flap_box.sum_open(), max_single) {
                    Ok(n) => break n,
                    Err(e) => println!("{e}"),
                }
            }
        } else {
            dice.num_dice()
        };

        let total = dice.roll(num_dice).unwrap_or_else(|e| fail(e));
        println!("Dice total: {total}");

        if hint {
            let open = flap_box.open_flaps();
            let policy = if num_dice == 1 {
                DicePolicy::OneIfPossible
            } else {
                DicePolicy::AlwaysAll
            };
            match engine.close_next_roll_probability(open, total, policy) {
                Some(c) => println!("Hint: lower {c:?}"),
                None => println!("Hint: no flaps can be lowered"),
            }
        }

        loop {
            let answer = prompt(
                "Which flaps would you like to lower?\n(Separate with spaces and leave blank for none) ",
            )?;
            match check_flaps(&answer, flap_box, total) {
                Ok(flaps) if flaps.is_empty() => break 'rolls,
                Ok(flaps) => {
                    flap_box.lower_all(&flaps).unwrap_or_else(|e| fail(e));
                    println!();
                    break;
                }
                Err(e) => println!("{e}"),
            }
        }
    }

    println!();
    let score = flap_box.sum_open();
    if score == 0 {
        println!("You have lowered all the flaps and shut the box. Well done!");
    } else {
        println!("Your score was {score}");
    }
    flap_box.reset();
    Some(score)
}

fn cmd_play(args: &[String]) {
    let mut hint = false;
    let mut seed: Option<u64> = None;

    let mut i = 0usize;
    while i < args.len() {
        match args[i].as_str() {
            "--help" | "-h" => {
                println!(
                    r#"stb play

Play Shut the Box on the command line.

USAGE:
    stb play [--hint] [--seed S]

OPTIONS:
    --hint      Show the engine's suggestion after each roll
    --seed S    Dice seed (default: from the clock)
"#
                );
                return;
            }
            "--hint" => {
                hint = true;
                i += 1;
            }
            "--seed" => {
                seed = Some(parse_flag(args, i));
                i += 2;
            }
            other => {
                eprintln!("Unknown option for `stb play`: {}", other);
                process::exit(1);
            }
        }
    }

    let settings = EngineSettings::default();
    let engine = DecisionEngine::new(settings).unwrap_or_else(|e| fail(e));
    let mut flap_box = FlapBox::new(settings.num_flaps).unwrap_or_else(|e| fail(e));
    let seed = seed.unwrap_or_else(stb_logging::now_ms);
    let mut dice = Dice::new_rng(settings.num_dice, seed).unwrap_or_else(|e| fail(e));

    loop {
        if play_turn(&mut flap_box, &mut dice, &engine, hint).is_none() {
            return;
        }
        loop {
            let Some(answer) = prompt("Play another turn? [Y/N] ") else {
                return;
            };
            match check_another_game_choice(&answer) {
                Some(true) => {
                    println!();
                    break;
                }
                Some(false) => return,
                None => {}
            }
        }
    }
}

fn print_help() {
    eprintln!(
        r#"stb - Shut the Box simulator

USAGE:
    stb <COMMAND> [OPTIONS]

COMMANDS:
    simulate        Simulate computer turns and summarize scores
    compare         List cases where two flap strategies disagree
    distribution    Print the distribution of dice totals
    check-table     Validate an optimal-strategy table file
    play            Play interactively

OPTIONS:
    -h, --help      Print this help message
    -V, --version   Print version

Run `stb <COMMAND> --help` for command options.
"#
    );
}

fn print_version() {
    println!("stb {}", env!("CARGO_PKG_VERSION"));
}

fn main() {
    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        print_help();
        process::exit(0);
    }

    match args[1].as_str() {
        "-h" | "--help" | "help" => {
            print_help();
        }
        "-V" | "--version" => {
            print_version();
        }
        "simulate" => {
            cmd_simulate(&args[2..]);
        }
        "compare" => {
            cmd_compare(&args[2..]);
        }
        "distribution" => {
            cmd_distribution(&args[2..]);
        }
        "check-table" => {
            cmd_check_table(&args[2..]);
        }
        "play" => {
            cmd_play(&args[2..]);
        }
        other => {
            eprintln!("Unknown command: {}", other);
            print_help();
            process::exit(1);
        }
    }
}
