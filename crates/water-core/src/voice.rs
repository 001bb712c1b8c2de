/// Drops blank transcripts and immediate repeats from a continuous speech
/// recognizer, which re-reports the same phrase while it refines a result.
#[derive(Clone, Debug, Default)]
pub struct TranscriptFilter {
    last: Option<String>,
}

impl TranscriptFilter {
    pub fn accept(&mut self, raw: &str) -> Option<String> {
        let transcript = raw.trim();
        if transcript.is_empty() || self.last.as_deref() == Some(transcript) {
            return None;
        }
        self.last = Some(transcript.to_owned());
        self.last.clone()
    }
}
