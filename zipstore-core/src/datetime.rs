use core::fmt::{self, Display};

/// MS-DOS packed timestamp, two seconds of resolution, years 1980 to 2107
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DosDateTime {
    /// `hour << 11 | minute << 5 | second / 2`
    pub time: u16,
    /// `(year - 1980) << 9 | month << 5 | day`
    pub date: u16,
}

impl DosDateTime {
    /// 1980-01-01 00:00:00
    pub const MIN: DosDateTime = DosDateTime {
        time: 0,
        date: (1 << 5) | 1,
    };

    /// 2107-12-31 23:59:58
    pub const MAX: DosDateTime = DosDateTime {
        time: (23 << 11) | (59 << 5) | 29,
        date: (127 << 9) | (12 << 5) | 31,
    };

    /// Pack calendar fields. Years outside 1980..=2107 clamp to
    /// [`DosDateTime::MIN`] or [`DosDateTime::MAX`].
    pub fn new(year: i32, month: u32, day: u32, hour: u32, minute: u32, second: u32) -> Self {
        if year < 1980 {
            return Self::MIN;
        }
        if year > 2107 {
            return Self::MAX;
        }

        let time = ((hour & 0x1F) << 11) | ((minute & 0x3F) << 5) | ((second / 2) & 0x1F);
        let date = (((year - 1980) as u32) << 9) | ((month & 0xF) << 5) | (day & 0x1F);
        DosDateTime {
            time: time as u16,
            date: date as u16,
        }
    }

    pub fn year(&self) -> i32 {
        i32::from(self.date >> 9) + 1980
    }

    pub fn month(&self) -> u32 {
        u32::from((self.date >> 5) & 0xF)
    }

    pub fn day(&self) -> u32 {
        u32::from(self.date & 0x1F)
    }

    pub fn hour(&self) -> u32 {
        u32::from(self.time >> 11)
    }

    pub fn minute(&self) -> u32 {
        u32::from((self.time >> 5) & 0x3F)
    }

    pub fn second(&self) -> u32 {
        u32::from(self.time & 0x1F) * 2
    }
}

impl Display for DosDateTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:04}-{:02}-{:02} {:02}:{:02}:{:02}",
            self.year(),
            self.month(),
            self.day(),
            self.hour(),
            self.minute(),
            self.second()
        )
    }
}
