//! Voice Notes - record, organize and play back voice memos
//!
//! This crate provides the core functionality for capturing audio from the
//! microphone, keeping a library of voice notes with their metadata, and
//! playing them back with seeking and variable speed.
//!
//! # Architecture
//!
//! The crate follows hexagonal (ports & adapters) architecture:
//!
//! - **Domain**: Value objects, the recording and playback state machines, settings, and errors
//! - **Application**: Use cases and port interfaces (traits)
//! - **Infrastructure**: Adapter implementations (cpal, rodio, JSON key-value files, WAV files)
//! - **CLI**: Command-line interface, argument parsing, and signal handling

pub mod application;
pub mod cli;
pub mod domain;
pub mod infrastructure;
