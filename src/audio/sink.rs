//! Utilities for creating `rodio` sinks from in-memory preview bytes.

use std::io::Cursor;
use std::sync::Arc;

use rodio::{Decoder, OutputStream, Sink};
use thiserror::Error;

#[derive(Debug, Error)]
#[error("cannot decode preview: {0}")]
pub struct DecodeError(#[from] rodio::decoder::DecoderError);

pub type PreviewSource = Decoder<Cursor<Arc<[u8]>>>;

/// Decode preview bytes without touching an output device.
pub fn decode(audio: Arc<[u8]>) -> Result<PreviewSource, DecodeError> {
    Ok(Decoder::new(Cursor::new(audio))?)
}

/// Create a paused `Sink` holding `audio`.
pub(super) fn create_sink(stream: &OutputStream, audio: Arc<[u8]>) -> Result<Sink, DecodeError> {
    let source = decode(audio)?;
    let sink = Sink::connect_new(stream.mixer());
    sink.append(source);
    sink.pause();
    Ok(sink)
}
