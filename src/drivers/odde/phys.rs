use std::fmt::{self, Write};

/// Size of the physical path buffer. One byte is kept free for the
/// terminator the input core expects, so the path holds at most
/// `PHYS_LEN - 1` bytes of text.
pub const PHYS_LEN: usize = 32;

/// Fixed capacity physical path of an input device (e.g. "PNP0C32/button/input0")
pub type PhysPath = heapless::String<PHYS_LEN>;

/// Formats the physical path for the button input device of the device
/// with the given hardware ID. Output that does not fit is silently
/// truncated on a character boundary.
pub fn format_phys(hid: &str) -> PhysPath {
    let mut phys = PhysPath::new();
    let mut writer = TruncatingWriter {
        buf: &mut phys,
        limit: PHYS_LEN - 1,
        full: false,
    };
    // The writer never fails, it drops what does not fit
    let _ = write!(writer, "{hid}/button/input0");
    phys
}

struct TruncatingWriter<'a, const N: usize> {
    buf: &'a mut heapless::String<N>,
    limit: usize,
    full: bool,
}

impl<const N: usize> Write for TruncatingWriter<'_, N> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        for c in s.chars() {
            if self.full || self.buf.len() + c.len_utf8() > self.limit {
                self.full = true;
                return Ok(());
            }
            if self.buf.push(c).is_err() {
                self.full = true;
                return Ok(());
            }
        }
        Ok(())
    }
}
