use anyhow::Result;
use serde::Serialize;
use tracing::{debug, info, warn};

use allegrex_rs::isa::mips::{fmt_instr, PseudoFolder, SwitchIdioms};
use allegrex_rs::{ByteSource, Disassembler, FunctionDef, Instr, MemoryImage, Processor};

#[derive(Debug, Clone, Copy, Default)]
pub struct ScanOptions {
    /// Fold `move`/`li`/`b`/`beqz`/`bnez` in the listing.
    pub pseudo: bool,
    /// Report switch dispatch sequences.
    pub switches: bool,
    /// Skip opcodes this processor doesn't implement.
    pub processor: Option<Processor>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Line {
    pub addr: u32,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SwitchOut {
    /// Address of the indirect jump.
    pub jump: u32,
    pub jump_table: u32,
    pub case_count: i32,
}

#[derive(Debug, Clone, Serialize)]
pub struct ScanReport {
    pub start: u32,
    pub end: u32,
    pub lines: Vec<Line>,
    pub switches: Vec<SwitchOut>,
    /// Words that failed to decode and were emitted as `.word`.
    pub skipped: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct FunctionReport {
    pub name: String,
    pub start: u32,
    pub size: u32,
    pub lines: Vec<Line>,
    pub switches: Vec<SwitchOut>,
}

struct Renderer {
    switches: SwitchIdioms,
    folder: PseudoFolder,
    opts: ScanOptions,
}

impl Renderer {
    fn new(opts: ScanOptions) -> Self {
        Self { switches: SwitchIdioms::new(), folder: PseudoFolder::new(), opts }
    }

    /// Renders one contiguous run of decoded instructions.
    fn render(&self, run: &[Instr], lines: &mut Vec<Line>, switches: &mut Vec<SwitchOut>) {
        if run.is_empty() {
            return;
        }
        if self.opts.switches {
            switches.extend(self.switches.scan(run).into_iter().filter_map(|s| {
                let jump = s.instrs.first()?.addr;
                Some(SwitchOut { jump, jump_table: s.jump_table, case_count: s.case_count })
            }));
        }
        let line = |i: &Instr| Line { addr: i.addr, text: fmt_instr(i) };
        if self.opts.pseudo {
            lines.extend(self.folder.fold(run).iter().map(line));
        } else {
            lines.extend(run.iter().map(line));
        }
    }
}

/// Decodes `[start, end)` word by word. Undecodable words are logged and
/// listed as `.word` instead of aborting the scan.
pub fn scan_range<D: Disassembler>(
    img: &MemoryImage,
    dis: &D,
    start: u32,
    end: u32,
    opts: ScanOptions,
) -> Result<ScanReport> {
    anyhow::ensure!(end >= start, "end must be >= start");
    anyhow::ensure!(start % 4 == 0, "start must be word aligned");

    let listing = Renderer::new(opts);
    let mut lines = Vec::new();
    let mut switches = Vec::new();
    let mut run = Vec::new();
    let mut skipped = 0;

    let mut pc = start;
    while pc < end {
        let decoded = match dis.disassemble_instruction(img, pc) {
            Ok(instr) if opts.processor.map_or(true, |p| instr.has_processor(p)) => Some(instr),
            Ok(instr) => {
                warn!(addr = pc, mnemonic = instr.opcode.mnemonic, "skipping opcode unsupported by processor");
                None
            }
            Err(err) => {
                warn!(addr = pc, error = %err, "skipping undecodable word");
                None
            }
        };
        match decoded {
            Some(instr) => run.push(instr),
            None => {
                listing.render(&run, &mut lines, &mut switches);
                run.clear();
                let text = match img.read_u32(pc) {
                    Ok(raw) => format!("{pc:#x}: .word {raw:#010x}"),
                    Err(_) => format!("{pc:#x}: <oob>"),
                };
                lines.push(Line { addr: pc, text });
                skipped += 1;
            }
        }
        pc = match pc.checked_add(4) {
            Some(next) => next,
            None => break,
        };
    }
    listing.render(&run, &mut lines, &mut switches);

    info!(start, end, lines = lines.len(), skipped, switches = switches.len(), "scan finished");
    Ok(ScanReport { start, end, lines, switches, skipped })
}

/// Decodes one function as a unit; any bad word fails the whole function.
pub fn disassemble_function<D: Disassembler>(
    img: &MemoryImage,
    dis: &D,
    def: &FunctionDef,
    opts: ScanOptions,
) -> Result<FunctionReport> {
    let out = dis.disassemble(img, def)?;
    debug!(name = %def.name, count = out.instrs.len(), "function decoded");
    let listing = Renderer::new(opts);
    let mut lines = Vec::new();
    let mut switches = Vec::new();
    listing.render(&out.instrs, &mut lines, &mut switches);
    Ok(FunctionReport { name: def.name.clone(), start: def.start, size: def.size, lines, switches })
}
