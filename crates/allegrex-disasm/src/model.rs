use std::path::Path;

use anyhow::Result;

use allegrex_rs::isa::mips::MipsConfig;
use allegrex_rs::MemoryImage;

/// Loads a raw binary, dropping `skip` leading bytes and keeping at most `len`.
pub fn load_raw_bin(path: &Path, base: u32, skip: usize, len: Option<usize>, big_endian: bool) -> Result<MemoryImage> {
    let file = std::fs::read(path)?;
    anyhow::ensure!(skip <= file.len(), "--skip exceeds file size");
    let mut payload = &file[skip..];
    if let Some(lim) = len {
        anyhow::ensure!(lim <= payload.len(), "--len exceeds remaining file size after skip");
        payload = &payload[..lim];
    }
    anyhow::ensure!(
        u32::try_from(payload.len()).is_ok_and(|n| base.checked_add(n).is_some()),
        "image does not fit in the 32-bit address space at {base:#010x}"
    );
    let img = MemoryImage::new(payload.to_vec()).with_base(base);
    Ok(if big_endian { img.big_endian() } else { img })
}

/// Reads decoder settings from a JSON file.
pub fn load_config(path: &Path) -> Result<MipsConfig> {
    let txt = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&txt)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use allegrex_rs::ByteSource;

    #[test]
    fn loader_maps_skip_and_len() {
        let path = std::env::temp_dir().join("_allegrex_loader_test.bin");
        std::fs::write(&path, [0u8, 1, 2, 3, 4, 5]).unwrap();
        let img = load_raw_bin(&path, 0x1000_0000, 2, Some(3), false).unwrap();
        assert_eq!(img.base, 0x1000_0000);
        assert_eq!(img.mem, vec![2, 3, 4]);
        assert_eq!(img.read_u8(0x1000_0002).unwrap(), 4);
        assert!(img.read_u32(0x1000_0000).is_err());

        let img = load_raw_bin(&path, 0, 0, Some(4), true).unwrap();
        assert_eq!(img.read_u32(0).unwrap(), 0x0001_0203);

        assert!(load_raw_bin(&path, 0, 7, None, false).is_err());
        assert!(load_raw_bin(&path, 0, 2, Some(5), false).is_err());
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn config_loads_from_json() {
        use allegrex_rs::isa::mips::MipsProcessor;

        let path = std::env::temp_dir().join("_allegrex_config_test.json");
        std::fs::write(&path, r#"{ "processor": "MipsII", "strict": false }"#).unwrap();
        let cfg = load_config(&path).unwrap();
        assert_eq!(cfg, MipsConfig { processor: MipsProcessor::MipsII, strict: false });

        std::fs::write(&path, r#"{ "processor": "Pentium", "strict": true }"#).unwrap();
        assert!(load_config(&path).is_err());
        let _ = std::fs::remove_file(&path);
    }
}
