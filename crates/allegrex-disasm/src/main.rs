use std::path::Path;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

use allegrex_rs::isa::mips::{MipsConfig, MipsDisassembler, MipsProcessor};
use allegrex_rs::{CachingDisassembler, FunctionDef};
use allegrex_disasm::{disassemble_function, load_config, load_raw_bin, scan_range, Line, ScanOptions, SwitchOut};

#[derive(Parser, Debug)]
#[command(author, version, about = "MIPS/Allegrex disassembler CLI", long_about = None)]
struct Cli {
    /// Load address for the binary in target address space
    #[arg(long, default_value = "0", value_parser = parse_u32)]
    base: u32,
    /// Skip N bytes at start of file before loading
    #[arg(long, default_value_t = 0usize)]
    skip: usize,
    /// Limit bytes loaded (default: to EOF after --skip)
    #[arg(long)]
    len: Option<usize>,
    /// Input binary path
    #[arg(value_name = "BINFILE")]
    input: String,
    /// Words are big-endian
    #[arg(long)]
    big_endian: bool,
    /// Target processor; opcodes it lacks are rejected
    #[arg(long, value_enum, default_value_t = Cpu::Allegrex)]
    processor: Cpu,
    /// Accept encodings with non-zero unused fields
    #[arg(long)]
    no_strict: bool,
    /// Load decoder settings from JSON ({ "processor": ..., "strict": ... });
    /// overrides --processor and --no-strict
    #[arg(long, value_name = "FILE")]
    config: Option<String>,
    /// Fold pseudo-instructions (move, li, b, beqz, bnez)
    #[arg(long)]
    pseudo: bool,
    /// Output format: text or json
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,
    /// Write output to file instead of stdout
    #[arg(long, value_name = "FILE")]
    out: Option<String>,
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Disassemble one function; any undecodable word fails it
    Function {
        /// Start address (hex or dec)
        #[arg(value_parser = parse_u32)]
        start: u32,
        /// Size in bytes (hex or dec)
        #[arg(value_parser = parse_u32)]
        size: u32,
        #[arg(long, default_value = "func")]
        name: String,
    },
    /// Linear sweep over [start, end), skipping undecodable words
    Scan {
        /// Start address (hex or dec, default: image base)
        #[arg(value_parser = parse_u32)]
        start: Option<u32>,
        /// End address (hex or dec, exclusive, default: image end)
        #[arg(value_parser = parse_u32)]
        end: Option<u32>,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Cpu {
    Mips1,
    Mips2,
    Mips3,
    Mips4,
    Mips32r1,
    Mips32r2,
    Mips32r3,
    Mips32r5,
    Allegrex,
}

impl From<Cpu> for MipsProcessor {
    fn from(cpu: Cpu) -> Self {
        match cpu {
            Cpu::Mips1 => MipsProcessor::MipsI,
            Cpu::Mips2 => MipsProcessor::MipsII,
            Cpu::Mips3 => MipsProcessor::MipsIII,
            Cpu::Mips4 => MipsProcessor::MipsIV,
            Cpu::Mips32r1 => MipsProcessor::Mips32r1,
            Cpu::Mips32r2 => MipsProcessor::Mips32r2,
            Cpu::Mips32r3 => MipsProcessor::Mips32r3,
            Cpu::Mips32r5 => MipsProcessor::Mips32r5,
            Cpu::Allegrex => MipsProcessor::Allegrex,
        }
    }
}

fn parse_u32(s: &str) -> Result<u32> {
    let s = s.trim();
    if let Some(hex) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Ok(u32::from_str_radix(hex, 16)?)
    } else {
        Ok(s.parse::<u32>()?)
    }
}

fn render_text(lines: &[Line], switches: &[SwitchOut], buf: &mut String) {
    use std::fmt::Write as _;
    for line in lines {
        let _ = writeln!(buf, "{}", line.text);
    }
    if !switches.is_empty() {
        let _ = writeln!(buf, "Switches:");
        for s in switches {
            let _ = writeln!(
                buf,
                "  {:#010x}: table {:#010x}, {} cases",
                s.jump, s.jump_table, s.case_count
            );
        }
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let img = load_raw_bin(Path::new(&cli.input), cli.base, cli.skip, cli.len, cli.big_endian)?;
    let cfg = match &cli.config {
        Some(path) => load_config(Path::new(path))?,
        None => MipsConfig { processor: cli.processor.into(), strict: !cli.no_strict },
    };
    let dis = CachingDisassembler::new(MipsDisassembler::new(cfg));
    let opts = ScanOptions { pseudo: cli.pseudo, switches: true, processor: Some(cfg.processor.processor()) };

    let mut buf = String::new();
    match cli.cmd {
        Command::Function { start, size, name } => {
            let def = FunctionDef::new(name, start, size);
            let report = disassemble_function(&img, &dis, &def, opts)?;
            match cli.format {
                OutputFormat::Json => buf = serde_json::to_string_pretty(&report)?,
                OutputFormat::Text => {
                    use std::fmt::Write as _;
                    let _ = writeln!(buf, "{} @ {:#010x} ({:#x} bytes)", report.name, report.start, report.size);
                    render_text(&report.lines, &report.switches, &mut buf);
                }
            }
        }
        Command::Scan { start, end } => {
            let start = start.unwrap_or(img.base);
            let end = end.unwrap_or_else(|| img.end());
            let report = scan_range(&img, &dis, start, end, opts)?;
            match cli.format {
                OutputFormat::Json => buf = serde_json::to_string_pretty(&report)?,
                OutputFormat::Text => {
                    render_text(&report.lines, &report.switches, &mut buf);
                    if report.skipped > 0 {
                        use std::fmt::Write as _;
                        let _ = writeln!(buf, "{} undecodable words skipped", report.skipped);
                    }
                }
            }
        }
    }

    if let Some(path) = cli.out {
        std::fs::write(path, buf)?;
    } else {
        print!("{buf}");
    }
    Ok(())
}
