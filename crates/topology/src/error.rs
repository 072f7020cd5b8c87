// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use thiserror::Error;

#[derive(Debug, Error)]
pub enum TopologyLoadError {
    #[error("failed to read topology config at {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse topology config at {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: toml::de::Error,
    },
    #[error("failed to parse embedded default topology config: {0}")]
    ParseDefault(#[source] toml::de::Error),
    #[error("unknown object class {0:?} in topology config")]
    UnknownClass(String),
}
