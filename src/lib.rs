//! Pixel Bloom - looping 16x16 pixel-art animations from a text prompt
//!
//! This library provides functionality to:
//! - Request an animation (palette, frames, cadence) from a generative model
//! - Validate the returned data into an [`models::AnimationData`]
//! - Play it back on a timer and render frames with optional dithering
//! - Export a horizontal spritesheet PNG with a filesystem-safe name

pub mod cli;
pub mod color;
pub mod config;
pub mod generate;
pub mod gif;
pub mod models;
pub mod output;
pub mod playback;
pub mod renderer;
pub mod session;
pub mod spritesheet;
pub mod terminal;
