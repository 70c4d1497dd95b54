//! CRC-32 as used by ZIP: reflected polynomial, all-ones initial value and
//! final complement.

pub const POLYNOMIAL: u32 = 0xEDB8_8320;

/// Remainders of every byte value, one shift of eight bits each.
pub struct CrcTable([u32; 256]);

impl CrcTable {
    pub const fn new() -> CrcTable {
        let mut table = [0u32; 256];
        let mut i = 0;
        while i < 256 {
            let mut c = i as u32;
            let mut k = 0;
            while k < 8 {
                c = if c & 1 != 0 {
                    POLYNOMIAL ^ (c >> 1)
                } else {
                    c >> 1
                };
                k += 1;
            }
            table[i] = c;
            i += 1;
        }
        CrcTable(table)
    }

    pub fn get(&self, index: u8) -> u32 {
        self.0[index as usize]
    }
}

/// Evaluated once at compile time and shared read-only by every builder and
/// reader.
pub static CRC_TABLE: CrcTable = CrcTable::new();

/// Running CRC-32, for data that arrives in chunks.
#[derive(Clone, Copy, Debug)]
pub struct Crc32 {
    state: u32,
}

impl Crc32 {
    pub fn new() -> Crc32 {
        Crc32 { state: !0 }
    }

    pub fn update(&mut self, data: &[u8]) {
        let mut crc = self.state;
        for &byte in data {
            crc = (crc >> 8) ^ CRC_TABLE.get((crc as u8) ^ byte);
        }
        self.state = crc;
    }

    pub fn finalize(self) -> u32 {
        !self.state
    }
}

impl Default for Crc32 {
    fn default() -> Self {
        Self::new()
    }
}

/// CRC-32 of a complete buffer
pub fn crc32(data: &[u8]) -> u32 {
    let mut crc = Crc32::new();
    crc.update(data);
    crc.finalize()
}

#[cfg(test)]
mod tests {
    use super::{crc32, Crc32, CRC_TABLE};

    #[test]
    fn empty() {
        assert_eq!(crc32(b""), 0);
    }

    #[test]
    fn check_value() {
        assert_eq!(crc32(b"123456789"), 0xCBF4_3926);
    }

    #[test]
    fn table_spot_checks() {
        assert_eq!(CRC_TABLE.get(0), 0);
        assert_eq!(CRC_TABLE.get(1), 0x7707_3096);
        assert_eq!(CRC_TABLE.get(255), 0x2D02_EF8D);
    }

    #[test]
    fn chunked_matches_whole() {
        let data = b"The quick brown fox jumps over the lazy dog";
        let mut crc = Crc32::new();
        for chunk in data.chunks(5) {
            crc.update(chunk);
        }
        assert_eq!(crc.finalize(), crc32(data));
        assert_eq!(crc32(data), 0x414F_A339);
    }
}
