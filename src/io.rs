//! Interactive parameter entry on a terminal.

use std::{
    io::{BufRead, Write},
    str::FromStr,
};

use color_eyre::eyre::Result;
use eyre::{bail, eyre, Context};

use crate::config::Params;

/// Ask for every run parameter in turn. An empty answer keeps the default.
pub fn prompt_params<R: BufRead, W: Write>(input: &mut R, output: &mut W) -> Result<Params> {
    let defaults = Params::default();

    let room_width = prompt_or(input, output, "Enter the room width", defaults.room_width)?;
    let room_height = prompt_or(input, output, "Enter the room height", defaults.room_height)?;
    let source_x = prompt_or(
        input,
        output,
        "Enter the sound source X position",
        defaults.source_x,
    )?;
    let source_y = prompt_or(
        input,
        output,
        "Enter the sound source Y position",
        defaults.source_y,
    )?;
    // Left empty this runs forever, so no default is offered.
    let iterations = prompt(
        input,
        output,
        "Enter the number of iterations (empty to run until interrupted)",
    )?;
    let delay_secs = prompt_or(
        input,
        output,
        "Enter the delay between iterations in seconds",
        defaults.delay_secs,
    )?;

    Ok(Params {
        room_width,
        room_height,
        source_x,
        source_y,
        iterations,
        delay_secs,
        bearing_target: defaults.bearing_target,
    })
}

/// Read a whitespace separated `x y` pair.
pub fn parse_point(line: &str) -> Result<(f64, f64)> {
    let mut parts = line.split_whitespace();
    let (Some(x), Some(y), None) = (parts.next(), parts.next(), parts.next()) else {
        bail!("expected two numbers separated by a space, got '{}'", line.trim());
    };

    Ok((
        x.parse().wrap_err_with(|| format!("parsing x from '{x}'"))?,
        y.parse().wrap_err_with(|| format!("parsing y from '{y}'"))?,
    ))
}

fn prompt_or<T, R, W>(input: &mut R, output: &mut W, question: &str, default: T) -> Result<T>
where
    T: FromStr + std::fmt::Display + Copy,
    T::Err: std::error::Error + Send + Sync + 'static,
    R: BufRead,
    W: Write,
{
    Ok(prompt(input, output, &format!("{question} [{default}]"))?.unwrap_or(default))
}

fn prompt<T, R, W>(input: &mut R, output: &mut W, question: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
    R: BufRead,
    W: Write,
{
    write!(output, "{question}: ").wrap_err("writing prompt")?;
    output.flush().wrap_err("flushing prompt")?;

    let mut line = String::new();
    let read = input.read_line(&mut line).wrap_err("reading answer")?;
    if read == 0 {
        return Err(eyre!("input closed while waiting for: {question}"));
    }

    let answer = line.trim();
    if answer.is_empty() {
        return Ok(None);
    }

    answer
        .parse()
        .map(Some)
        .wrap_err_with(|| format!("'{answer}' is not a valid answer to: {question}"))
}
