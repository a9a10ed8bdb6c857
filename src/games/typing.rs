//! Typing speed test

pub const REFERENCE_TEXT: &str = "The quick brown fox jumps over the lazy dog. Programming is the art of telling another human what one wants the computer to do.";

#[derive(Debug, Clone)]
pub struct TypingTest {
    reference: String,
    pub input: String,
    /// Clock value (ms) of the first non-empty keystroke
    pub started_at: Option<u64>,
    pub wpm: Option<u32>,
}

impl Default for TypingTest {
    fn default() -> Self {
        Self::new()
    }
}

/// Words per minute, with a zero interval clamped to 1 ms
pub fn words_per_minute(words: usize, elapsed_ms: u64) -> u32 {
    let minutes = elapsed_ms.max(1) as f64 / 60_000.0;
    (words as f64 / minutes).round() as u32
}

impl TypingTest {
    pub fn new() -> Self {
        Self::with_reference(REFERENCE_TEXT)
    }

    pub fn with_reference(reference: &str) -> Self {
        Self {
            reference: reference.to_string(),
            input: String::new(),
            started_at: None,
            wpm: None,
        }
    }

    pub fn reference(&self) -> &str {
        &self.reference
    }

    pub fn word_count(&self) -> usize {
        self.reference.split_whitespace().count()
    }

    pub fn is_finished(&self) -> bool {
        self.wpm.is_some()
    }

    /// Characters of the input that match the reference from the start
    pub fn correct_prefix_len(&self) -> usize {
        self.input
            .chars()
            .zip(self.reference.chars())
            .take_while(|(a, b)| a == b)
            .count()
    }

    /// Replace the input buffer with the textarea's current value
    pub fn input(&mut self, value: &str, now_ms: u64) -> bool {
        if self.is_finished() {
            return false;
        }
        if self.started_at.is_none() && !value.is_empty() {
            self.started_at = Some(now_ms);
        }
        self.input.clear();
        self.input.push_str(value);

        if self.input == self.reference {
            let elapsed = now_ms.saturating_sub(self.started_at.unwrap_or(now_ms));
            let wpm = words_per_minute(self.word_count(), elapsed);
            log::info!("Typing test finished at {wpm} WPM");
            self.wpm = Some(wpm);
        }
        true
    }

    pub fn reset(&mut self) {
        self.input.clear();
        self.started_at = None;
        self.wpm = None;
    }
}
