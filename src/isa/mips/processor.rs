use serde::{Deserialize, Serialize};

use crate::opcode::Processor;

pub const MIPS_I: Processor = Processor::new("MIPS I");
pub const MIPS_II: Processor = Processor::new("MIPS II");
pub const MIPS_III: Processor = Processor::new("MIPS III");
pub const MIPS_IV: Processor = Processor::new("MIPS IV");
pub const MIPS32_R1: Processor = Processor::new("MIPS32r1");
pub const MIPS32_R2: Processor = Processor::new("MIPS32r2");
pub const MIPS32_R3: Processor = Processor::new("MIPS32r3");
pub const MIPS32_R5: Processor = Processor::new("MIPS32r5");
pub const ALLEGREX: Processor = Processor::new("Allegrex");

/// Every MIPS variant from MIPS I on, including Allegrex.
pub const COMMON: &[Processor] = &[
    MIPS_I, MIPS_II, MIPS_III, MIPS_IV, MIPS32_R1, MIPS32_R2, MIPS32_R3, MIPS32_R5, ALLEGREX,
];

/// Variants from MIPS II on.
pub const COMMON_II: &[Processor] = &[
    MIPS_II, MIPS_III, MIPS_IV, MIPS32_R1, MIPS32_R2, MIPS32_R3, MIPS32_R5, ALLEGREX,
];

/// Variants from MIPS IV on.
pub const COMMON_IV: &[Processor] = &[MIPS_IV, MIPS32_R1, MIPS32_R2, MIPS32_R3, MIPS32_R5, ALLEGREX];

/// Processor a MIPS disassembler targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum MipsProcessor {
    MipsI,
    MipsII,
    MipsIII,
    MipsIV,
    Mips32r1,
    Mips32r2,
    Mips32r3,
    Mips32r5,
    #[default]
    Allegrex,
}

impl MipsProcessor {
    pub const fn processor(self) -> Processor {
        match self {
            MipsProcessor::MipsI => MIPS_I,
            MipsProcessor::MipsII => MIPS_II,
            MipsProcessor::MipsIII => MIPS_III,
            MipsProcessor::MipsIV => MIPS_IV,
            MipsProcessor::Mips32r1 => MIPS32_R1,
            MipsProcessor::Mips32r2 => MIPS32_R2,
            MipsProcessor::Mips32r3 => MIPS32_R3,
            MipsProcessor::Mips32r5 => MIPS32_R5,
            MipsProcessor::Allegrex => ALLEGREX,
        }
    }

    pub const fn name(self) -> &'static str {
        self.processor().name
    }

    pub const fn is_legacy(self) -> bool {
        matches!(
            self,
            MipsProcessor::MipsI | MipsProcessor::MipsII | MipsProcessor::MipsIII | MipsProcessor::MipsIV
        )
    }
}

/// Legacy variants starting at `origin`, each later one being a superset.
pub fn legacy_from(origin: MipsProcessor) -> &'static [Processor] {
    const LEGACY: &[Processor] = &[MIPS_I, MIPS_II, MIPS_III, MIPS_IV];
    match origin {
        MipsProcessor::MipsI => LEGACY,
        MipsProcessor::MipsII => &LEGACY[1..],
        MipsProcessor::MipsIII => &LEGACY[2..],
        MipsProcessor::MipsIV => &LEGACY[3..],
        _ => &[],
    }
}

/// Modern (MIPS32) variants starting at `origin`.
pub fn modern_from(origin: MipsProcessor) -> &'static [Processor] {
    const MODERN: &[Processor] = &[MIPS32_R1, MIPS32_R2, MIPS32_R3, MIPS32_R5];
    match origin {
        MipsProcessor::Mips32r1 => MODERN,
        MipsProcessor::Mips32r2 => &MODERN[1..],
        MipsProcessor::Mips32r3 => &MODERN[2..],
        MipsProcessor::Mips32r5 => &MODERN[3..],
        _ => &[],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn family_sets() {
        assert_eq!(legacy_from(MipsProcessor::MipsII), &[MIPS_II, MIPS_III, MIPS_IV]);
        assert_eq!(modern_from(MipsProcessor::Mips32r5), &[MIPS32_R5]);
        assert!(legacy_from(MipsProcessor::Allegrex).is_empty());
        assert!(COMMON.contains(&ALLEGREX));
        assert!(!COMMON_II.contains(&MIPS_I));
        assert!(!COMMON_IV.contains(&MIPS_III));
    }

    #[test]
    fn enum_maps_to_processor() {
        assert_eq!(MipsProcessor::default().processor(), ALLEGREX);
        assert_eq!(MipsProcessor::MipsIII.name(), "MIPS III");
        assert!(MipsProcessor::MipsIV.is_legacy());
        assert!(!MipsProcessor::Mips32r2.is_legacy());
    }
}
