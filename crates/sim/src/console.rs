//! Narration sink that echoes every line to stdout.
use delve_core::{ColorTag, MessageSink};
use delve_runtime::MessageLog;

pub struct ConsoleSink {
    log: MessageLog,
    echo: bool,
}

impl ConsoleSink {
    pub fn new(capacity: usize, echo: bool) -> Self {
        Self {
            log: MessageLog::new(capacity),
            echo,
        }
    }

    pub fn log(&self) -> &MessageLog {
        &self.log
    }
}

impl MessageSink for ConsoleSink {
    fn add_message(&mut self, text: String, tag: ColorTag) {
        if self.echo {
            println!("[{tag:>16}] {text}");
        }
        self.log.add_message(text, tag);
    }
}
