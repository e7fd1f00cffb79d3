pub mod export;
pub mod line;
pub mod new;
pub mod play;
pub mod status;

use std::path::PathBuf;

use ff_adventure::{Adventure, AdventureConfig, FileStore};

/// Global flags shared by every subcommand.
pub struct Options {
    pub save: Option<PathBuf>,
    pub seed: Option<u64>,
}

impl Options {
    fn config(&self) -> AdventureConfig {
        let mut config = AdventureConfig::default();
        if let Some(seed) = self.seed {
            config = config.with_seed(seed);
        }
        if let Some(path) = &self.save {
            config = config.with_save_path(path);
        }
        config
    }
}

/// Open the adventure in the configured save file.
fn open(opts: &Options) -> Adventure<FileStore> {
    let config = opts.config();
    let path = config.resolved_save_path();
    tracing::debug!(path = %path.display(), "opening save");
    Adventure::open(FileStore::new(path), &config)
}
