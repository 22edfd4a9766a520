use std::io::{self, BufRead, Write};

use grc_core::presenter::{Host, Level, Notification};

/// The terminal as a notification host.
///
/// Notifications go to stderr (info to stdout). Prompts read one line from
/// stdin; an empty line or EOF counts as dismissing the prompt.
pub struct TerminalHost {
    assume_yes: bool,
}

impl TerminalHost {
    pub fn new(assume_yes: bool) -> Self {
        Self { assume_yes }
    }

    fn read_line(&self) -> Option<String> {
        let mut line = String::new();
        match io::stdin().lock().read_line(&mut line) {
            Ok(0) => None,
            Ok(_) => {
                let trimmed = line.trim();
                (!trimmed.is_empty()).then(|| trimmed.to_string())
            }
            Err(e) => {
                tracing::warn!("failed to read from stdin: {e}");
                None
            }
        }
    }

    fn prompt(&self, text: &str) {
        eprint!("{text} ");
        let _ = io::stderr().flush();
    }
}

impl Host for TerminalHost {
    fn notify(&self, notification: &Notification) -> Option<usize> {
        match notification.level {
            Level::Info => println!("{}", notification.message),
            Level::Warning => eprintln!("warning: {}", notification.message),
            Level::Error => eprintln!("error: {}", notification.message),
        }

        if notification.actions.is_empty() {
            return None;
        }
        if self.assume_yes {
            eprintln!("  -> {}", notification.actions[0].label());
            return Some(0);
        }

        for (i, action) in notification.actions.iter().enumerate() {
            eprintln!("  [{}] {}", i + 1, action.label());
        }
        self.prompt("Choose an action (Enter to dismiss):");
        let answer = self.read_line()?;
        if answer.eq_ignore_ascii_case("y") || answer.eq_ignore_ascii_case("yes") {
            return Some(0);
        }
        choose(&answer, notification.actions.iter().map(|a| a.label()))
    }

    fn input(&self, prompt: &str) -> Option<String> {
        self.prompt(prompt);
        self.read_line()
    }

    fn pick(&self, prompt: &str, items: &[String]) -> Option<String> {
        eprintln!("{prompt}");
        for (i, item) in items.iter().enumerate() {
            eprintln!("  [{}] {item}", i + 1);
        }
        // Ask again on an unknown answer; only an empty line or EOF dismisses.
        loop {
            self.prompt(">");
            let answer = self.read_line()?;
            match choose(&answer, items.iter().map(String::as_str)) {
                Some(i) => return Some(items[i].clone()),
                None => eprintln!("'{answer}' is not one of the choices."),
            }
        }
    }

    fn status(&self, text: &str) {
        eprintln!("[{text}]");
    }
}

/// Match a typed answer against choices: 1-based index, or a label ignoring
/// case.
fn choose<'a>(answer: &str, choices: impl Iterator<Item = &'a str>) -> Option<usize> {
    let choices: Vec<&str> = choices.collect();
    if let Ok(n) = answer.parse::<usize>() {
        return (1..=choices.len()).contains(&n).then(|| n - 1);
    }
    choices.iter().position(|c| c.eq_ignore_ascii_case(answer))
}
