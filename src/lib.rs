// src/lib.rs

pub mod config;
pub mod core;
pub mod error;
pub mod evaluation;
pub mod persistence;

pub use crate::core::assignment::{assign, ChordMap, ChordMapDocument};
pub use crate::core::engine::{Analysis, ChordEngine, FrequencySnapshot};
pub use crate::core::fingers::FingerMap;
pub use crate::core::types::{ChordSignature, KeyEvent, NgramScore};
pub use crate::error::{ChordError, Result};
