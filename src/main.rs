//! ET-3400 Emulator - CLI Entry Point
//!
//! Commands:
//! - `et3400-emu run <program>` - Load a hex program and execute it
//! - `et3400-emu monitor` - Boot the monitor ROM alone
//! - `et3400-emu keys` - Show the trainer key chart

use clap::{Parser, Subcommand};
use et3400::system::keypad::key_chart;
use et3400::Et3400;

#[derive(Parser)]
#[command(name = "et3400-emu")]
#[command(version = "0.1.0")]
#[command(about = "An emulator of the Heathkit ET-3400 microprocessor trainer (Motorola 6800)")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Load a hex program, jump to it and run
    Run {
        /// Path to the program: hex byte pairs, whitespace ignored,
        /// optionally led by a four-digit load address
        program: String,
        /// Load/start address (hex), overriding any in-file address
        #[arg(short, long)]
        address: Option<String>,
        /// Number of execution slices to run (default: 20)
        #[arg(short, long, default_value = "20")]
        slices: u32,
        /// Print registers after every slice
        #[arg(short, long)]
        trace: bool,
        /// Print a JSON snapshot of the final machine state
        #[arg(short, long)]
        dump_state: bool,
    },
    /// Boot the monitor ROM and show the display
    Monitor {
        /// Number of execution slices to run (default: 5)
        #[arg(short, long, default_value = "5")]
        slices: u32,
    },
    /// Show the trainer key chart
    Keys,
}

fn main() {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Run {
            program,
            address,
            slices,
            trace,
            dump_state,
        }) => {
            run_program(&program, address.as_deref(), slices, trace, dump_state);
        }
        Some(Commands::Monitor { slices }) => {
            run_monitor(slices);
        }
        Some(Commands::Keys) => {
            println!("{}", key_chart());
        }
        None => {
            println!("ET-3400 Emulator v0.1.0");
            println!("A Heathkit ET-3400 trainer emulator (Motorola 6800)");
            println!();
            println!("Use --help for available commands");
        }
    }
}

/// Parse a program file into (load address, clean hex string).
///
/// Accepts bare hex pairs with arbitrary whitespace, or the annotated
/// form whose first token is a four-digit load address:
/// `0000 0123456789ABCDEF`.
fn parse_program_file(content: &str) -> (Option<u16>, String) {
    let mut tokens: Vec<&str> = content.split_whitespace().collect();
    let mut address = None;
    if tokens.len() > 1 && tokens[0].len() == 4 {
        if let Ok(parsed) = u16::from_str_radix(tokens[0], 16) {
            address = Some(parsed);
            tokens.remove(0);
        }
    }
    (address, tokens.concat())
}

fn run_program(path: &str, address: Option<&str>, slices: u32, trace: bool, dump_state: bool) {
    println!("🔧 Running: {path}");

    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(error) => {
            eprintln!("❌ Failed to read file: {error}");
            std::process::exit(1);
        }
    };

    let (file_address, hex) = parse_program_file(&content);
    let address = match address {
        Some(text) => match u16::from_str_radix(text.trim_start_matches("0x"), 16) {
            Ok(address) => address,
            Err(error) => {
                eprintln!("❌ Invalid address {text:?}: {error}");
                std::process::exit(1);
            }
        },
        None => file_address.unwrap_or(0x0000),
    };

    let mut et3400 = Et3400::new();
    et3400.power_on();
    if let Err(error) = et3400.load_hex(address, &hex) {
        eprintln!("❌ Bad program: {error}");
        std::process::exit(1);
    }
    println!("📂 Loaded {} bytes at {address:#06X}", hex.len() / 2);
    et3400.jump(address);

    println!();
    println!("━━━ Execution ━━━");
    for slice in 0..slices {
        match et3400.tick() {
            Ok(report) => {
                if report.display_changed {
                    println!("{}", et3400.render_display());
                }
                if trace {
                    let regs = &et3400.mpu.regs;
                    println!(
                        "slice {slice}: {} cycles  PC={:04X} A={:02X} B={:02X} X={:04X} SP={:04X} CC={:02X}",
                        report.cycles,
                        regs.program_counter,
                        regs.accumulator_a,
                        regs.accumulator_b,
                        regs.index_register,
                        regs.stack_pointer,
                        et3400.mpu.condition_codes(),
                    );
                }
            }
            Err(error) => {
                eprintln!("❌ CPU fault: {error}");
                break;
            }
        }
    }

    println!();
    println!("━━━ Result ━━━");
    print_state(&et3400);
    if dump_state {
        match serde_json::to_string_pretty(&et3400.snapshot()) {
            Ok(json) => println!("{json}"),
            Err(error) => eprintln!("❌ Failed to serialize state: {error}"),
        }
    }
}

fn run_monitor(slices: u32) {
    println!("🔌 Powering on");
    let mut et3400 = Et3400::new();
    et3400.power_on();

    for _ in 0..slices {
        match et3400.tick() {
            Ok(report) => {
                if report.display_changed {
                    println!("{}", et3400.render_display());
                }
            }
            Err(error) => {
                eprintln!("❌ CPU fault: {error}");
                break;
            }
        }
    }

    print_state(&et3400);
}

fn print_state(et3400: &Et3400) {
    let regs = &et3400.mpu.regs;
    println!("Program Counter: {:#06X}", regs.program_counter);
    println!("Accumulator A:   {:#04X}", regs.accumulator_a);
    println!("Accumulator B:   {:#04X}", regs.accumulator_b);
    println!("Index Register:  {:#06X}", regs.index_register);
    println!("Stack Pointer:   {:#06X}", regs.stack_pointer);
    println!("Condition Codes: {:#04X}", et3400.mpu.condition_codes());
    println!();
    println!("{}", et3400.render_display());
}
