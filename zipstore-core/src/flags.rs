bitflags::bitflags! {
    /// General purpose bit flags shared by local and central headers
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
    pub struct GeneralFlags: u16 {
        /// Entry data is encrypted
        const ENCRYPTED = 1 << 0;
        /// Sizes and CRC follow the data instead of living in the header
        const DATA_DESCRIPTOR = 1 << 3;
        /// Name is UTF-8 rather than code page 437
        const UTF8 = 1 << 11;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    /// Data is copied verbatim
    Stored,
    Reserved(u16),
}

impl From<u16> for Method {
    fn from(value: u16) -> Self {
        match value {
            0 => Method::Stored,
            v => Method::Reserved(v),
        }
    }
}

impl From<Method> for u16 {
    fn from(method: Method) -> u16 {
        match method {
            Method::Stored => 0,
            Method::Reserved(n) => n,
        }
    }
}
