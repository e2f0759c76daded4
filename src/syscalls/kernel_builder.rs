/*!
 * Kernel Builder
 * Fluent construction of a `Kernel` with its collaborators
 */

use std::sync::Arc;

use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::info;

use super::fd::FdTable;
use super::kernel::Kernel;
use super::types::DispatchState;
use crate::config::KernelConfig;
use crate::console::{Console, StdConsole};
use crate::core::types::KernelResult;
use crate::monitoring::TrapStats;
use crate::vfs::{FileSystem, MemFS};

/// Builder for [`Kernel`]
///
/// Unset collaborators default to the host console and an empty in-memory
/// filesystem.
#[derive(Default)]
pub struct KernelBuilder {
    config: Option<KernelConfig>,
    console: Option<Box<dyn Console>>,
    filesystem: Option<Arc<dyn FileSystem>>,
}

impl KernelBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use explicit limits instead of the defaults
    pub fn with_config(mut self, config: KernelConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Attach the user console
    pub fn with_console(mut self, console: impl Console + 'static) -> Self {
        self.console = Some(Box::new(console));
        self
    }

    /// Attach the filesystem backing Open/Read
    pub fn with_filesystem(mut self, fs: Arc<dyn FileSystem>) -> Self {
        self.filesystem = Some(fs);
        self
    }

    /// Validate the configuration and build the kernel
    pub fn build(self) -> KernelResult<Kernel> {
        let config = self.config.unwrap_or_default();
        config.validate()?;

        let rng = match config.random_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let console = self
            .console
            .unwrap_or_else(|| Box::new(StdConsole::new()));
        let filesystem = self
            .filesystem
            .unwrap_or_else(|| Arc::new(MemFS::new()));

        info!(
            max_open_files = config.max_open_files,
            max_user_string = config.max_user_string,
            filesystem = filesystem.name(),
            "Trap kernel initialized"
        );

        Ok(Kernel {
            fds: FdTable::with_capacity(config.max_open_files),
            config,
            console,
            filesystem,
            rng,
            state: DispatchState::Idle,
            halt_reason: None,
            next_trap_id: 0,
            stats: TrapStats::default(),
        })
    }
}
