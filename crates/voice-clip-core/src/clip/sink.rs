/// Receiver of finished voice messages (the chat pipeline).
pub trait VoiceMessageSink {
    /// Called exactly once for every clip that is sent.
    fn on_voice_message(&mut self, payload: Vec<u8>, duration_seconds: u32, waveform: Vec<f32>);
}
