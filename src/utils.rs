// src/utils.rs
use std::borrow::Cow;
use std::fmt::Display;
use std::time::Duration;

use console::style;
use indicatif::{ProgressBar, ProgressStyle};

const SPINNER_TICK: Duration = Duration::from_millis(80);

/// Starts a ticking spinner for a single long-running step.
pub fn spinner(message: impl Into<Cow<'static, str>>) -> ProgressBar {
  let pb = ProgressBar::new_spinner();
  pb.set_style(
    ProgressStyle::default_spinner()
      .template("{spinner:.cyan} {msg}")
      .expect("Failed to set spinner style") // Panic if template is invalid
      .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏ "),
  );
  pb.set_message(message);
  pb.enable_steady_tick(SPINNER_TICK);
  pb
}

/// Runs one step under a spinner. The spinner ends with `done` on success and
/// with a failure mark otherwise; the step's error is returned untouched.
pub fn run_step<T, E>(
  message: impl Into<Cow<'static, str>>,
  done: impl Display,
  step: impl FnOnce(&ProgressBar) -> Result<T, E>,
) -> Result<T, E> {
  let pb = spinner(message);
  match step(&pb) {
    Ok(value) => {
      succeed(&pb, done);
      Ok(value)
    }
    Err(e) => {
      fail(&pb);
      Err(e)
    }
  }
}

/// Stops the spinner and leaves a green check mark with `message` on screen.
pub fn succeed(pb: &ProgressBar, message: impl Display) {
  pb.set_style(plain_style());
  pb.finish_with_message(format!("{} {}", style("✔").green(), message));
}

/// Stops the spinner and leaves a red cross with its current message on screen.
pub fn fail(pb: &ProgressBar) {
  let message = pb.message();
  pb.set_style(plain_style());
  pb.abandon_with_message(format!("{} {}", style("✖").red(), message));
}

fn plain_style() -> ProgressStyle {
  ProgressStyle::default_spinner()
    .template("{msg}")
    .expect("Failed to set plain style")
}

pub fn print_error(context: &str, error: &dyn Display) {
  eprintln!("{} {}: {}", style("error:").red().bold(), context, error);
}

pub fn print_heading(text: &str) {
  println!("\n{}", style(text).cyan());
}

pub fn print_hint(text: &str) {
  println!("{}", style(text).white());
}

pub fn print_success(text: &str) {
  println!("\n{}", style(text).green().bold());
}

pub fn print_notice(text: &str) {
  println!("\n{}", style(text).yellow());
}
