//! Interactive prompts over rustyline.
//!
//! Every prompt returns `Ok(None)` when the user backs out with Ctrl-C or
//! Ctrl-D, so callers can unwind to the previous screen instead of treating
//! it as an error.

use std::path::PathBuf;

use anyhow::Result;
use colored::Colorize;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;

use presta_core::quote::{self, AMOUNT_STEP, DEFAULT_AMOUNT, MAX_AMOUNT, MIN_AMOUNT};

/// Reads one trimmed line. `None` means the user backed out.
pub fn line(rl: &mut DefaultEditor, prompt: &str) -> Result<Option<String>> {
    match rl.readline(prompt) {
        Ok(input) => {
            let trimmed = input.trim().to_string();
            if !trimmed.is_empty() {
                let _ = rl.add_history_entry(&input);
            }
            Ok(Some(trimmed))
        }
        Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Prompts until a non-empty value arrives.
pub fn required_line(rl: &mut DefaultEditor, label: &str) -> Result<Option<String>> {
    loop {
        let Some(value) = line(rl, &format!("{label}: "))? else {
            return Ok(None);
        };
        if !value.is_empty() {
            return Ok(Some(value));
        }
        println!("{}", "This field is required.".yellow());
    }
}

/// Prompts once; an empty answer is kept as an empty string.
pub fn optional_line(rl: &mut DefaultEditor, label: &str) -> Result<Option<String>> {
    line(rl, &format!("{label} (optional): "))
}

/// Prompts for the amount to borrow. An empty answer takes the default, and
/// anything off the offered grid is asked again.
pub fn amount(rl: &mut DefaultEditor) -> Result<Option<f64>> {
    let prompt = format!(
        "Amount ({} to {}, steps of {}) [{}]: ",
        MIN_AMOUNT as u32, MAX_AMOUNT as u32, AMOUNT_STEP as u32, DEFAULT_AMOUNT as u32
    );
    loop {
        let Some(value) = line(rl, &prompt)? else {
            return Ok(None);
        };
        if value.is_empty() {
            return Ok(Some(DEFAULT_AMOUNT));
        }
        match value.parse::<f64>() {
            Ok(amount) if quote::amount_in_range(amount) && quote::amount_on_step(amount) => {
                return Ok(Some(amount));
            }
            Ok(_) => println!(
                "{}",
                format!(
                    "Enter a multiple of {} between {} and {}.",
                    AMOUNT_STEP as u32, MIN_AMOUNT as u32, MAX_AMOUNT as u32
                )
                .yellow()
            ),
            Err(_) => println!("{}", "Enter a number.".yellow()),
        }
    }
}

/// Numbered menu. Returns the index of the chosen item.
pub fn choose<S: AsRef<str>>(
    rl: &mut DefaultEditor,
    title: &str,
    items: &[S],
) -> Result<Option<usize>> {
    println!("{}", title.bold());
    for (index, item) in items.iter().enumerate() {
        println!("  {}. {}", index + 1, item.as_ref());
    }
    loop {
        let Some(value) = line(rl, "> ")? else {
            return Ok(None);
        };
        match value.parse::<usize>() {
            Ok(choice) if (1..=items.len()).contains(&choice) => return Ok(Some(choice - 1)),
            _ => println!(
                "{}",
                format!("Enter a number between 1 and {}.", items.len()).yellow()
            ),
        }
    }
}

/// Yes/no question.
pub fn confirm(rl: &mut DefaultEditor, question: &str) -> Result<Option<bool>> {
    loop {
        let Some(value) = line(rl, &format!("{question} (y/n): "))? else {
            return Ok(None);
        };
        match value.to_lowercase().as_str() {
            "y" | "yes" => return Ok(Some(true)),
            "n" | "no" => return Ok(Some(false)),
            _ => println!("{}", "Answer y or n.".yellow()),
        }
    }
}

/// Prompts for the path of an existing file.
pub fn existing_path(rl: &mut DefaultEditor, label: &str) -> Result<Option<PathBuf>> {
    loop {
        let Some(value) = line(rl, &format!("{label}: "))? else {
            return Ok(None);
        };
        if value.is_empty() {
            println!("{}", "This field is required.".yellow());
            continue;
        }
        let path = PathBuf::from(&value);
        if path.is_file() {
            return Ok(Some(path));
        }
        println!("{}", format!("No file at {}.", path.display()).yellow());
    }
}
