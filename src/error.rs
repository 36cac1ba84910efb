use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Failures that stop the game before the first frame.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("failed to load font {path}: {source}")]
    Font {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("font file {0} is empty")]
    EmptyFont(PathBuf),
    #[error("failed to open the game window: {0}")]
    Window(String),
}

/// A single element could not be drawn this frame.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RenderError {
    #[error("font family {0} is not registered")]
    MissingFontFamily(String),
}

/// Why a purchase attempt left the game state untouched.
#[derive(Debug, Error, PartialEq, Eq, Clone, Copy)]
pub enum PurchaseRejected {
    #[error("there is no upgrade in slot {0}")]
    NoSuchSlot(usize),
    #[error("upgrade slot {0} is disabled")]
    Disabled(usize),
    #[error("upgrade costs {cost} but the balance is {balance}")]
    Unaffordable { cost: u64, balance: u64 },
}
