use colored::Colorize;
use nbpipe::api::{CmdMessage, ConvertedNotebook, MessageLevel};
use nbpipe::runner::Outcome;

pub(super) fn print_messages(messages: &[CmdMessage]) {
    for message in messages {
        match message.level {
            MessageLevel::Info => println!("{}", message.content.dimmed()),
            MessageLevel::Success => println!("{}", message.content.green()),
            MessageLevel::Warning => println!("{}", message.content.yellow()),
        }
    }
}

/// Failed notebooks with the tail of what the runner reported, after the regular messages.
pub(super) fn print_failures<'a>(failures: impl Iterator<Item = &'a ConvertedNotebook>) {
    for nb in failures {
        if let Outcome::Failed(reason) = &nb.outcome {
            println!();
            println!("{}", nb.job.rel_path.display().to_string().red().bold());
            for line in reason.lines() {
                println!("    {}", line.dimmed());
            }
        }
    }
}
