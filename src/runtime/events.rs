use crate::api::ApiReply;
use crate::assets::AssetEvent;
use crate::audio::AudioEvent;

/// Everything the background threads report, multiplexed onto one queue.
#[derive(Debug)]
pub enum AppEvent {
    Api(ApiReply),
    Asset(AssetEvent),
    Audio(AudioEvent),
}

impl From<ApiReply> for AppEvent {
    fn from(reply: ApiReply) -> Self {
        Self::Api(reply)
    }
}

impl From<AssetEvent> for AppEvent {
    fn from(event: AssetEvent) -> Self {
        Self::Asset(event)
    }
}

impl From<AudioEvent> for AppEvent {
    fn from(event: AudioEvent) -> Self {
        Self::Audio(event)
    }
}
