//! Application context — the three injected collaborators plus config.
//!
//! Everything the commands need is carried here explicitly; there is no
//! ambient global state, and the remote session is owned by exactly one
//! context for the lifetime of the process.

use anyhow::{Context, Result};

use lettersync_core::Config;
use lettersync_remote::HttpRemote;
use lettersync_sync::{LocalRepository, StatusLedger};

pub struct AppContext {
    pub config: Config,
    pub remote: HttpRemote,
    pub repo: LocalRepository,
    pub ledger: StatusLedger,
}

impl AppContext {
    /// Load config from the working directory, connect the remote session,
    /// and open the local repository and status ledger.
    pub fn bootstrap() -> Result<AppContext> {
        let cwd = std::env::current_dir().context("cannot determine working directory")?;
        let config = Config::load_at(&cwd)?;

        let mut remote = HttpRemote::new(&config.remote);
        remote
            .connect()
            .context("could not establish remote session")?;

        let repo = LocalRepository::new(cwd.join(&config.letters_dir));
        let ledger = StatusLedger::load(&cwd.join(&config.status_path))
            .context("could not load status ledger")?;

        Ok(AppContext {
            config,
            remote,
            repo,
            ledger,
        })
    }
}
