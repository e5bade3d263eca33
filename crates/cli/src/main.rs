//! Simulator CLI.
//!
//! This binary is the driving harness around the execution core. It performs:
//! 1. **Run:** Load a text program image and tick the machine until it halts.
//! 2. **Debug output:** Per-tick state dumps, Enter-gated single stepping,
//!    and thread-table dumps on context switches, selected by debug level.
//! 3. **Reporting:** A final memory/thread dump and run statistics.
//!
//! All output here is observability; correctness lives in `coopsim-core`.

use clap::{Parser, Subcommand};
use std::io::{BufRead, Write};
use std::process;
use tracing_subscriber::EnvFilter;

use coopsim_core::core::thread::ThreadState;
use coopsim_core::{Config, Fault, Machine, ProgramImage};

#[derive(Parser, Debug)]
#[command(
    name = "coopsim",
    author,
    version,
    about = "Cooperative-multithreading CPU and mini-kernel simulator",
    long_about = "Run a text program image on the simulated machine.\n\n\
Debug levels:\n  \
0  run silently\n  \
1  dump machine state to stderr every tick\n  \
2  as 1, but wait for Enter between ticks\n  \
3  dump thread states whenever the scheduler switches threads\n\n\
Examples:\n  coopsim run programs/threads.img\n  coopsim run programs/threads.img -d 3"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run a program image until the machine halts.
    Run {
        /// Program image file (text format with data/instruction sections).
        file: String,

        /// Debug level (0-3).
        #[arg(short, long, default_value_t = 0)]
        debug: u8,

        /// Override the watchdog's global tick cap.
        #[arg(long)]
        max_ticks: Option<u64>,

        /// JSON configuration file (defaults apply for missing fields).
        #[arg(long)]
        config: Option<String>,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Run {
            file,
            debug,
            max_ticks,
            config,
        } => cmd_run(&file, debug, max_ticks, config.as_deref()),
    }
}

/// Loads the image, then loops on `tick` until the machine halts.
fn cmd_run(file: &str, debug: u8, max_ticks: Option<u64>, config_path: Option<&str>) {
    let mut config = match config_path {
        Some(path) => load_config(path),
        None => Config::default(),
    };
    if let Some(limit) = max_ticks {
        config.watchdog.tick_limit = limit;
    }

    let image = ProgramImage::parse_str(&read_image(file)).unwrap_or_else(|e| {
        eprintln!("[!] Bad program image '{file}': {e}");
        process::exit(1);
    });

    let mut machine = Machine::new(&config);
    if let Err(e) = image.load_into(&mut machine) {
        eprintln!("[!] Bad program image '{file}': {e}");
        process::exit(1);
    }
    tracing::info!(
        file,
        data_cells = image.data().len(),
        instructions = image.instructions().len(),
        "program image loaded"
    );

    let mut last_thread = machine.current_thread().unwrap_or(0);
    while !machine.is_halted() {
        if (1..=2).contains(&debug) {
            print_machine_state(&machine);
        }
        if debug == 2 {
            wait_for_enter();
        }

        if let Err(fault) = machine.tick() {
            report_fatal(&machine, &fault);
        }

        if debug == 3 {
            let thread = machine.current_thread().unwrap_or(0);
            if thread != last_thread {
                print_thread_states(&machine);
                last_thread = thread;
            }
        }
    }

    tracing::info!(ticks = machine.stats.ticks, "machine halted");
    print_machine_state(&machine);
    machine.stats.print();
}

/// Reads the image file, exiting with an error message on failure.
fn read_image(path: &str) -> String {
    std::fs::read_to_string(path).unwrap_or_else(|e| {
        eprintln!("[!] Cannot read '{path}': {e}");
        process::exit(1);
    })
}

/// Reads a JSON config file, exiting with an error message on failure.
fn load_config(path: &str) -> Config {
    let text = std::fs::read_to_string(path).unwrap_or_else(|e| {
        eprintln!("[!] Cannot read config '{path}': {e}");
        process::exit(1);
    });
    Config::from_json(&text).unwrap_or_else(|e| {
        eprintln!("[!] Bad config '{path}': {e}");
        process::exit(1);
    })
}

/// Prints the fault, a final dump, and the stats, then exits non-zero.
fn report_fatal(machine: &Machine, fault: &Fault) -> ! {
    eprintln!("\n[!] FATAL: {fault}");
    print_machine_state(machine);
    machine.stats.print();
    process::exit(1);
}

/// Renders a register read, showing `?` for unreadable cells.
fn reg_display(value: Result<i64, Fault>) -> String {
    value.map_or_else(|_| "?".to_string(), |v| v.to_string())
}

/// Prints the control registers and the thread table to stderr.
fn print_machine_state(machine: &Machine) {
    eprintln!("\nMachine State ({} mode):", machine.mode());
    eprintln!("  PC:                  {}", reg_display(machine.pc()));
    eprintln!("  SP:                  {}", reg_display(machine.sp()));
    eprintln!(
        "  Syscall result:      {}",
        reg_display(machine.syscall_result())
    );
    eprintln!(
        "  Instructions:        {}",
        reg_display(machine.instruction_count())
    );
    eprintln!(
        "  Current thread:      {}",
        reg_display(machine.current_thread())
    );
    eprintln!(
        "  Active threads:      {}",
        reg_display(machine.active_threads())
    );
    print_thread_table(machine);
}

/// Prints every thread-table slot to stderr, when a table is configured.
fn print_thread_table(machine: &Machine) {
    if machine.thread_table_base().map_or(true, |base| base <= 0) {
        return;
    }
    eprintln!("  Thread table:");
    for id in 1..=machine.thread_slots() {
        let Ok(snapshot) = machine.thread_snapshot(id) else {
            eprintln!("    Thread {id}: <unreadable slot>");
            continue;
        };
        let state = ThreadState::from_word(snapshot.state)
            .map_or("unknown", |s| s.name());
        eprintln!(
            "    Thread {id}: {state:<8} PC={:<6} SP={:<6} instr={:<6} start={}",
            snapshot.pc, snapshot.sp, snapshot.instruction_count, snapshot.start_time
        );
    }
}

/// Prints a one-line state summary per thread to stderr.
fn print_thread_states(machine: &Machine) {
    if machine.thread_table_base().map_or(true, |base| base <= 0) {
        return;
    }
    eprintln!("\nThread States:");
    for id in 1..=machine.thread_slots() {
        if let Ok(snapshot) = machine.thread_snapshot(id) {
            let state = ThreadState::from_word(snapshot.state)
                .map_or("unknown", |s| s.name());
            eprintln!("  Thread {id}: {state} (PC: {})", snapshot.pc);
        }
    }
}

/// Blocks until the user presses Enter.
fn wait_for_enter() {
    eprint!("Press Enter to continue...");
    let _ = std::io::stderr().flush();
    let mut line = String::new();
    let _ = std::io::stdin().lock().read_line(&mut line);
}
