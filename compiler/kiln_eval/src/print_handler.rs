//! Destination of `print`/`println` intrinsic output.

use std::sync::Arc;

use parking_lot::Mutex;

/// Where printed text goes.
///
/// Enum dispatch; the variants are few and fixed.
pub enum PrintHandler {
    Stdout,
    /// Captures output for embedders and tests.
    Buffer(Mutex<String>),
    Silent,
}

impl PrintHandler {
    pub fn print(&self, text: &str) {
        match self {
            PrintHandler::Stdout => print!("{text}"),
            PrintHandler::Buffer(buffer) => buffer.lock().push_str(text),
            PrintHandler::Silent => {}
        }
    }

    pub fn println(&self, text: &str) {
        match self {
            PrintHandler::Stdout => println!("{text}"),
            PrintHandler::Buffer(buffer) => {
                let mut buffer = buffer.lock();
                buffer.push_str(text);
                buffer.push('\n');
            }
            PrintHandler::Silent => {}
        }
    }

    /// Everything captured so far; empty unless buffering.
    pub fn output(&self) -> String {
        match self {
            PrintHandler::Buffer(buffer) => buffer.lock().clone(),
            PrintHandler::Stdout | PrintHandler::Silent => String::new(),
        }
    }

    pub fn clear(&self) {
        if let PrintHandler::Buffer(buffer) = self {
            buffer.lock().clear();
        }
    }
}

pub type SharedPrintHandler = Arc<PrintHandler>;

pub fn stdout_handler() -> SharedPrintHandler {
    Arc::new(PrintHandler::Stdout)
}

pub fn buffer_handler() -> SharedPrintHandler {
    Arc::new(PrintHandler::Buffer(Mutex::new(String::new())))
}

pub fn silent_handler() -> SharedPrintHandler {
    Arc::new(PrintHandler::Silent)
}
