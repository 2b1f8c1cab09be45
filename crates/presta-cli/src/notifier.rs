use colored::Colorize;
use presta_core::notice::{NoticeLevel, Notifier};

/// Prints notices straight to the terminal, colored by level.
pub struct TerminalNotifier;

impl Notifier for TerminalNotifier {
    fn notify(&self, level: NoticeLevel, message: &str) {
        match level {
            NoticeLevel::Success => println!("{}", message.bright_green()),
            NoticeLevel::Error => println!("{}", message.bright_red()),
        }
    }
}
