use std::io::{self, BufRead, Write};

/// Blocking operator dialogs: prompts, confirmations and notices.
pub trait InputSource {
    /// `None` when the operator cancels.
    fn prompt(&mut self, message: &str) -> Option<String>;
    fn confirm(&mut self, message: &str) -> bool;
    fn alert(&mut self, message: &str);
}

/// Terminal dialogs over a line reader. End of input cancels.
pub struct ConsoleInput<R, W> {
    reader: R,
    writer: W,
}

impl ConsoleInput<io::StdinLock<'static>, io::Stdout> {
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> ConsoleInput<R, W> {
    pub fn new(reader: R, writer: W) -> Self {
        Self { reader, writer }
    }

    /// Next raw line without its terminator; `None` at end of input.
    pub fn read_line(&mut self) -> Option<String> {
        let mut line = String::new();
        match self.reader.read_line(&mut line) {
            Ok(0) | Err(_) => None,
            Ok(_) => Some(line.trim_end_matches(['\r', '\n']).to_string()),
        }
    }

    pub fn writer(&mut self) -> &mut W {
        &mut self.writer
    }

    fn ask(&mut self, message: &str) -> Option<String> {
        let _ = write!(self.writer, "{message} ");
        let _ = self.writer.flush();
        self.read_line()
    }
}

impl<R: BufRead, W: Write> InputSource for ConsoleInput<R, W> {
    fn prompt(&mut self, message: &str) -> Option<String> {
        self.ask(message)
    }

    fn confirm(&mut self, message: &str) -> bool {
        self.ask(&format!("{message} [y/N]"))
            .map(|answer| matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes"))
            .unwrap_or(false)
    }

    fn alert(&mut self, message: &str) {
        let _ = writeln!(self.writer, "! {message}");
    }
}
