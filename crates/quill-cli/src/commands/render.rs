use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use colored::Colorize;
use quill_kit::markdown;
use quill_store::Config;

fn read_source(file: &Path) -> Result<String> {
    fs::read_to_string(file).with_context(|| format!("Failed to read markdown file: {:?}", file))
}

pub fn execute(file: &Path, out: Option<&Path>) -> Result<()> {
    let html = markdown::to_html(&read_source(file)?);

    match out {
        Some(out) => {
            fs::write(out, &html).with_context(|| format!("Failed to write HTML file: {:?}", out))?;
            println!("  {} {}", "✓".green(), out.display());
        }
        None => print!("{}", html),
    }

    Ok(())
}

pub fn stats(file: &Path, config: &Config) -> Result<()> {
    let source = read_source(file)?;
    let words = markdown::count_words(&source);
    let minutes = markdown::reading_time_at(&source, config.ui.words_per_minute);
    let excerpt = markdown::extract_excerpt(&source, config.ui.excerpt_length);

    println!("{}", file.display().to_string().cyan().bold());
    println!("Words:        {}", words);
    println!("Reading time: {} min", minutes);
    println!();
    println!("{}", excerpt.dimmed());

    Ok(())
}
