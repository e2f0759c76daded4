/*!
 * Buffer Console
 * In-memory console with scripted input and captured output
 */

use super::Console;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::Arc;

#[derive(Debug, Default)]
struct Inner {
    input: VecDeque<u8>,
    output: Vec<u8>,
}

/// Console whose input is queued up front and whose output is captured
///
/// Clones share the same buffers, so a caller can hand one clone to the
/// kernel and inspect output through another.
#[derive(Debug, Clone, Default)]
pub struct BufferConsole {
    inner: Arc<Mutex<Inner>>,
}

impl BufferConsole {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a console that will yield `input` and then end-of-input
    pub fn with_input(input: impl AsRef<[u8]>) -> Self {
        let console = Self::new();
        console.push_input(input);
        console
    }

    /// Append bytes to the pending input
    pub fn push_input(&self, input: impl AsRef<[u8]>) {
        self.inner.lock().input.extend(input.as_ref());
    }

    /// Bytes not yet consumed by `get_char`
    pub fn pending_input(&self) -> usize {
        self.inner.lock().input.len()
    }

    /// Everything written so far
    pub fn output(&self) -> Vec<u8> {
        self.inner.lock().output.clone()
    }

    /// Output decoded as lossy UTF-8
    pub fn output_string(&self) -> String {
        String::from_utf8_lossy(&self.inner.lock().output).into_owned()
    }

    /// Drain and return captured output
    pub fn take_output(&self) -> Vec<u8> {
        std::mem::take(&mut self.inner.lock().output)
    }
}

impl Console for BufferConsole {
    fn get_char(&mut self) -> Option<u8> {
        self.inner.lock().input.pop_front()
    }

    fn put_char(&mut self, c: u8) {
        self.inner.lock().output.push(c);
    }

    fn put_bytes(&mut self, bytes: &[u8]) {
        self.inner.lock().output.extend_from_slice(bytes);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shared_buffers() {
        let console = BufferConsole::with_input("ab");
        let mut handle = console.clone();

        assert_eq!(handle.get_char(), Some(b'a'));
        assert_eq!(console.pending_input(), 1);
        assert_eq!(handle.get_char(), Some(b'b'));
        assert_eq!(handle.get_char(), None);

        handle.put_bytes(b"ok");
        handle.put_char(b'!');
        assert_eq!(console.output_string(), "ok!");
        assert_eq!(console.take_output(), b"ok!".to_vec());
        assert!(console.output().is_empty());
    }
}
