/*!
 * Console Module
 * Blocking character I/O used by the console syscalls
 */

mod buffer;
mod stdio;

pub use buffer::BufferConsole;
pub use stdio::StdConsole;

/// Character device contract
///
/// Both operations block the calling trap handler until the byte is
/// available or emitted.
pub trait Console {
    /// Next input byte, or `None` once input is exhausted
    fn get_char(&mut self) -> Option<u8>;

    /// Emit one byte
    fn put_char(&mut self, c: u8);

    /// Emit every byte of `bytes` in order
    fn put_bytes(&mut self, bytes: &[u8]) {
        for &b in bytes {
            self.put_char(b);
        }
    }
}
