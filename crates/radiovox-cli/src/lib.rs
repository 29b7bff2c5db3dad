//! radiovox CLI library.
//!
//! WAV decoding and encoding plus the subcommands behind the `radiovox` binary.
//! All signal processing lives in `radiovox-fx`.

pub mod audio_io;
pub mod commands;
