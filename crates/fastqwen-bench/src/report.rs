use std::fmt::Write as _;
use std::time::Duration;

/// Result of one benchmark run.
#[derive(Debug, Clone, PartialEq)]
pub enum BenchOutcome {
    Completed(BenchmarkReport),
    /// The request did not produce a usable completion.
    Failed(String),
}

/// Measurements from a completed request.
#[derive(Debug, Clone, PartialEq)]
pub struct BenchmarkReport {
    pub content: String,
    pub completion_tokens: u32,
    /// Send to full response.
    pub duration: Duration,
    pub tokens_per_second: f64,
}

impl BenchmarkReport {
    pub fn new(content: String, completion_tokens: u32, duration: Duration) -> Self {
        let secs = duration.as_secs_f64();
        let tokens_per_second = if secs > 0.0 {
            f64::from(completion_tokens) / secs
        } else {
            0.0
        };
        Self {
            content,
            completion_tokens,
            duration,
            tokens_per_second,
        }
    }

    /// Human-readable summary for the terminal.
    pub fn render(&self) -> String {
        let rule = "-".repeat(40);
        let mut out = String::new();
        let _ = writeln!(out, "{rule}");
        let _ = writeln!(out, "Response:\n{}", self.content.trim());
        let _ = writeln!(out, "{rule}");
        let _ = writeln!(out, "Total Duration: {:.2}s", self.duration.as_secs_f64());
        let _ = writeln!(out, "Tokens Generated: {}", self.completion_tokens);
        let _ = writeln!(out, "Speed: {:.2} tokens/sec", self.tokens_per_second);
        let _ = write!(out, "{rule}");
        out
    }
}
