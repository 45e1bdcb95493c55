//! Background music.  Best effort only: the controller logs failures and
//! carries on.

use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;

use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink, Source};

use crate::error::AudioError;

pub trait Soundtrack {
    /// Start the background track, or resume it where it was paused.
    fn play(&mut self) -> Result<(), AudioError>;
    fn pause(&mut self);
}

impl<T: Soundtrack + ?Sized> Soundtrack for Box<T> {
    fn play(&mut self) -> Result<(), AudioError> {
        (**self).play()
    }

    fn pause(&mut self) {
        (**self).pause()
    }
}

/// No music at all.
#[derive(Debug, Default)]
pub struct Silent;

impl Soundtrack for Silent {
    fn play(&mut self) -> Result<(), AudioError> {
        Ok(())
    }

    fn pause(&mut self) {}
}

/// Loops a music file on the default output device.
///
/// The file is decoded and the device opened on the first `play`, so a bad
/// track or a missing device surfaces as an error right there.  Later calls
/// pause and resume the same sink.
pub struct MusicPlayer {
    track: PathBuf,
    output: Option<(OutputStream, OutputStreamHandle)>,
    sink: Option<Sink>,
}

impl MusicPlayer {
    pub fn new(track: PathBuf) -> Self {
        Self {
            track,
            output: None,
            sink: None,
        }
    }

    pub fn is_playing(&self) -> bool {
        self.sink
            .as_ref()
            .is_some_and(|sink| !sink.is_paused() && !sink.empty())
    }

    fn load(&self) -> Result<Decoder<BufReader<File>>, AudioError> {
        let file = File::open(&self.track).map_err(|source| AudioError::Open {
            path: self.track.clone(),
            source,
        })?;
        Decoder::new(BufReader::new(file)).map_err(|source| AudioError::Decode {
            path: self.track.clone(),
            source,
        })
    }
}

impl Soundtrack for MusicPlayer {
    fn play(&mut self) -> Result<(), AudioError> {
        if let Some(sink) = self.sink.as_ref().filter(|sink| !sink.empty()) {
            sink.play();
            return Ok(());
        }

        let source = self.load()?;
        let output = match self.output.take() {
            Some(output) => output,
            None => OutputStream::try_default().map_err(AudioError::Device)?,
        };
        let sink = Sink::try_new(&output.1);
        self.output = Some(output);
        let sink = sink.map_err(AudioError::Playback)?;

        sink.append(source.repeat_infinite());
        tracing::debug!("playing {}", self.track.display());
        self.sink = Some(sink);
        Ok(())
    }

    fn pause(&mut self) {
        if let Some(sink) = &self.sink {
            sink.pause();
        }
    }
}
