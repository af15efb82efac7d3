// src/core/mod.rs

pub mod assignment;
pub mod engine;
pub mod fingers;
pub mod frequency;
pub mod ngram;
pub mod tokenizer;
pub mod types;
