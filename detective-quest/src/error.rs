use std::path::PathBuf;

/// Problems found while turning a layout table into a room tree.
#[derive(Debug, thiserror::Error)]
pub enum MapError {
    #[error("layout has no rooms")]
    Empty,
    #[error("room id {id} is declared more than once")]
    DuplicateId { id: u32 },
    #[error("room {from} points to unknown room {to}")]
    DanglingChild { from: u32, to: u32 },
    #[error("room {id} is reachable from more than one door (first via {first_parent}, again via {second_parent})")]
    SharedChild {
        id: u32,
        first_parent: u32,
        second_parent: u32,
    },
    #[error("room {from} points back to the root room {root}")]
    ChildIsRoot { from: u32, root: u32 },
    #[error("rooms {ids:?} cannot be reached from the root")]
    Unreachable { ids: Vec<u32> },
}

/// Problems loading layout or rule configuration from disk.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error(transparent)]
    Map(#[from] MapError),
    #[error("rule #{index} has an empty pattern")]
    EmptyPattern { index: usize },
}
