//! Register machine runner CLI.
//!
//! Loads a program, provisions its registers, runs it, and reports the final
//! machine state, registers, and cost profile.
//!
//! # Usage
//! ```text
//! regvm <program.rvm> [OPTIONS]
//! ```
//!
//! # Options
//! - `--int NAME[=VALUE]`: Declare an int register in addition to the program's
//! - `--float NAME[=VALUE]`: Declare a float register in addition to the program's
//! - `--budget COST`: Stop once the next instruction would exceed this cost
//! - `--max-steps N`: Stop after N instructions
//! - `--no-color`: Disable colored log output
//! - `-q, --quiet`: Only print the final state line
//!
//! The `REGVM_LOG` env var sets the log level (`debug|info|warn|error|off`).
//!
//! Exits with status 2 when the program faults.

use regvm::config::{MachineConfig, RunLimits, parse_register_decl};
use regvm::machine::operator::OperatorSet;
use regvm::machine::program::{Program, render_diagnostic};
use regvm::machine::registers::NumericKind;
use regvm::machine::vm::{Machine, RunOutcome};
use regvm::utils::log::{self, Level};
use regvm::{error, info};
use std::env;
use std::fs;
use std::process;
use std::sync::atomic::Ordering;

const EXIT_FAULT: i32 = 2;

fn main() {
    log::init_from_env();
    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        eprint!("{}", usage(&args[0]));
        process::exit(1);
    }
    if args[1] == "--help" || args[1] == "-h" {
        print!("{}", usage(&args[0]));
        return;
    }

    let input_path = &args[1];
    let mut config = MachineConfig::new();
    let mut limits = RunLimits::default();
    let mut quiet = false;

    let mut i = 2;
    while i < args.len() {
        match args[i].as_str() {
            k @ ("--int" | "--float") => {
                let kind = if k == "--int" {
                    NumericKind::Int
                } else {
                    NumericKind::Float
                };
                let spec = flag_value(&args, &mut i, k);
                let (name, initial) = parse_register_decl(kind, spec).unwrap_or_else(|e| {
                    error!("{k}: {e}");
                    process::exit(1);
                });
                config = config.declare(&name, initial);
            }
            k @ "--budget" => {
                let raw = flag_value(&args, &mut i, k);
                let budget = raw
                    .parse::<f64>()
                    .ok()
                    .filter(|b| b.is_finite() && *b >= 0.0)
                    .unwrap_or_else(|| {
                        error!("Invalid budget: '{raw}' is not a non-negative number");
                        process::exit(1);
                    });
                limits = limits.with_cost(budget);
            }
            k @ "--max-steps" => {
                let raw = flag_value(&args, &mut i, k);
                let steps = raw.parse::<usize>().unwrap_or_else(|_| {
                    error!("Invalid step count: '{raw}' is not a valid number");
                    process::exit(1);
                });
                limits = limits.with_steps(steps);
            }
            "--no-color" => {
                log::USE_COLOR.store(false, Ordering::Relaxed);
                i += 1;
            }
            "--quiet" | "-q" => {
                quiet = true;
                log::set_level(Some(Level::Warn));
                i += 1;
            }
            other => {
                error!("Unexpected argument: {}\n", other);
                eprint!("{}", usage(&args[0]));
                process::exit(1);
            }
        }
    }

    let source = fs::read_to_string(input_path).unwrap_or_else(|e| {
        error!("Failed to read {input_path}: {e}");
        process::exit(1);
    });

    let program = Program::parse(&source).unwrap_or_else(|e| {
        eprint!("{}", render_diagnostic(input_path, &source, &e));
        process::exit(1);
    });

    let config = config
        .with_program_declarations(&program)
        .with_limits(limits);
    let mut machine = Machine::new(&config, OperatorSet::builtins()).unwrap_or_else(|e| {
        error!("{e}");
        process::exit(1);
    });

    info!(
        "Running {} ({} instructions, {} registers)",
        input_path,
        program.len(),
        machine.registers().len()
    );
    let report = machine.run(&program);

    println!("state: {}", machine.state());
    if let Some(fault) = machine.fault() {
        println!("fault: {}", fault.error.kind_name());
        println!("reason: {fault}");
    }
    if report.outcome == RunOutcome::BudgetExhausted {
        println!(
            "paused at instruction {} after {} steps (cost {})",
            report.next, report.executed, report.cost
        );
    }

    if !quiet {
        print_registers(&machine);
        print_cost_profile(&machine);
    }

    if report.outcome == RunOutcome::Errored {
        process::exit(EXIT_FAULT);
    }
}

/// Returns the value following flag `k`, advancing past both.
fn flag_value<'a>(args: &'a [String], i: &mut usize, k: &str) -> &'a str {
    *i += 1;
    if *i >= args.len() {
        error!("{k} requires an argument");
        process::exit(1);
    }
    let value = &args[*i];
    *i += 1;
    value
}

fn print_registers(machine: &Machine) {
    let points = machine.points();
    if points.is_empty() {
        return;
    }
    let name_w = points.iter().map(|(n, _)| n.chars().count()).max().unwrap_or(0);

    println!("Registers:");
    for (name, value) in points {
        println!("  {:<name_w$}  {:<5}  {}", name, value.kind().as_str(), value);
    }
}

fn print_cost_profile(machine: &Machine) {
    let profile = machine.cost_profile();
    let total = profile.total();

    let cat_w = 2 + profile
        .iter()
        .map(|(c, _)| c.as_str().chars().count())
        .max()
        .unwrap_or(0)
        .max("total".chars().count());
    let amt_w = profile
        .iter()
        .map(|(_, a)| format!("{a:.1}").chars().count())
        .max()
        .unwrap_or(0)
        .max(format!("{total:.1}").chars().count());
    let dash_w = cat_w + 1 + amt_w + 2 + "( 100.0%)".len();

    println!("Cost Profile:");
    println!("{}", "-".repeat(dash_w));
    for (category, amount) in profile.iter() {
        if amount == 0.0 {
            continue;
        }
        let percent = if total > 0.0 {
            amount / total * 100.0
        } else {
            0.0
        };
        println!(
            "{:<cat_w$} {:>amt_w$.1} ({:>5.1}%)",
            category.as_str(),
            amount,
            percent
        );
    }
    println!("{}", "-".repeat(dash_w));
    println!("{:<cat_w$} {:>amt_w$.1} ({:>5.1}%)", "total", total, 100.0);
}

const USAGE: &str = "\
Register Machine Runner

USAGE:
    {program} <program.rvm> [OPTIONS]

ARGS:
    <program.rvm>    Program text to execute

OPTIONS:
    --int NAME[=VALUE]      Declare an int register (default value 0)
    --float NAME[=VALUE]    Declare a float register (default value 0.0)
    --budget COST           Pause before the instruction that would exceed COST
    --max-steps N           Pause after N instructions
    --no-color              Disable colored log output
    -q, --quiet             Print only the final state
    -h, --help              Print this help message

ENVIRONMENT:
    REGVM_LOG               Log level: debug, info, warn, error, off

EXAMPLES:
    # Run a program that declares its own registers
    {program} blink.rvm

    # Provide an input register and cap execution
    {program} blink.rvm --int ticks=20 --max-steps 1000
";

fn usage(program: &str) -> String {
    USAGE.replace("{program}", program)
}
