use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum TidemarkError {
    #[error("cannot read {}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot write {}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("config error: {0}")]
    Config(String),

    #[error("invalid token manifest {}", .path.display())]
    Manifest {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("strict mode: {}", .0.join("; "))]
    Degraded(Vec<String>),

    #[error("I/O error")]
    Io(#[from] std::io::Error),
}
