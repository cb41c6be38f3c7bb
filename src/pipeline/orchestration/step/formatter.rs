use crate::pipeline::sink::ResultSink;
use std::sync::Arc;
use tracing::debug;

/// Groups a token into fixed-size chunks joined by a separator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResultFormatter {
    group_size: usize,
    separator: char,
}

impl ResultFormatter {
    pub fn new(group_size: usize, separator: char) -> Self {
        Self {
            group_size: group_size.max(1),
            separator,
        }
    }

    pub fn format(&self, token: &str) -> String {
        let chars: Vec<char> = token.chars().collect();
        let mut formatted = String::with_capacity(token.len() + chars.len() / self.group_size);
        for (i, group) in chars.chunks(self.group_size).enumerate() {
            if i > 0 {
                formatted.push(self.separator);
            }
            formatted.extend(group);
        }
        formatted
    }

    pub fn unformat(&self, formatted: &str) -> String {
        formatted.chars().filter(|c| *c != self.separator).collect()
    }
}

impl Default for ResultFormatter {
    fn default() -> Self {
        Self::new(3, '-')
    }
}

/// Formats winners for the sink and suppresses repeats of what is already shown.
pub struct ResultPublisher {
    formatter: ResultFormatter,
    sink: Arc<dyn ResultSink>,
    displayed: Option<String>,
}

impl ResultPublisher {
    pub fn new(formatter: ResultFormatter, sink: Arc<dyn ResultSink>) -> Self {
        Self {
            formatter,
            sink,
            displayed: None,
        }
    }

    pub fn displayed(&self) -> Option<&str> {
        self.displayed.as_deref()
    }

    /// Returns whether the sink was updated.
    pub fn publish(&mut self, token: &str) -> bool {
        if let Some(displayed) = &self.displayed {
            if self.formatter.unformat(displayed) == token {
                debug!("Result '{}' already displayed", displayed);
                return false;
            }
        }

        let formatted = self.formatter.format(token);
        self.displayed = Some(formatted.clone());
        self.sink.on_result(formatted);
        true
    }
}
