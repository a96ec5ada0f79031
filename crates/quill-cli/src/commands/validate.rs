use anyhow::{bail, Result};
use colored::Colorize;
use quill_validation::{FieldValue, Rule};

use crate::RuleArg;

pub fn execute(rule: RuleArg, value: &str, length: usize) -> Result<()> {
    let rule = match rule {
        RuleArg::Required => Rule::required(),
        RuleArg::Email => Rule::email(),
        RuleArg::Url => Rule::url(),
        RuleArg::MinLength => Rule::min_length(length),
        RuleArg::MaxLength => Rule::max_length(length),
    };

    let outcome = rule.validate(&FieldValue::from(value));
    if outcome.valid {
        println!("{} {}", "✓".green(), "valid".green());
        Ok(())
    } else {
        let message = outcome.message.unwrap_or_default();
        println!("{} {}", "✗".red(), message.red());
        bail!("validation failed: {}", message)
    }
}
