/*!
 * Standard I/O Console
 * Host stdin/stdout as the user console
 */

use super::Console;
use std::io::{self, Read, Stdin, Stdout, Write};
use tracing::warn;

/// Console backed by the process's stdin and stdout
pub struct StdConsole {
    stdin: Stdin,
    stdout: Stdout,
}

impl StdConsole {
    pub fn new() -> Self {
        Self {
            stdin: io::stdin(),
            stdout: io::stdout(),
        }
    }
}

impl Default for StdConsole {
    fn default() -> Self {
        Self::new()
    }
}

impl Console for StdConsole {
    fn get_char(&mut self) -> Option<u8> {
        // Flush first so prompts are visible before blocking on input
        flush_logged(&mut self.stdout);
        let mut byte = [0u8; 1];
        loop {
            match self.stdin.lock().read(&mut byte) {
                Ok(0) => return None,
                Ok(_) => return Some(byte[0]),
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => {
                    warn!(error = %e, "Console read failed, treating as end of input");
                    return None;
                }
            }
        }
    }

    fn put_char(&mut self, c: u8) {
        self.put_bytes(&[c]);
    }

    fn put_bytes(&mut self, bytes: &[u8]) {
        let mut out = self.stdout.lock();
        if let Err(e) = out.write_all(bytes).and_then(|_| out.flush()) {
            warn!(error = %e, "Console write failed");
        }
    }
}

/// Flush `out`, logging a failure instead of returning it
fn flush_logged(out: &mut impl Write) -> bool {
    match out.flush() {
        Ok(()) => true,
        Err(e) => {
            warn!(error = %e, "Console flush failed");
            false
        }
    }
}
