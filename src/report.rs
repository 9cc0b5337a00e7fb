//! Run reporting
//!
//! Verbosity-gated console output and the end-of-run summary block.

use crate::infer::InferenceResult;

/// Output verbosity mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputMode {
    /// No output
    Quiet,
    /// Summary only
    #[default]
    Normal,
    /// Per-stage progress
    Verbose,
    /// Per-page assignments
    VeryVerbose,
}

impl OutputMode {
    /// Create OutputMode from verbosity level
    pub fn from_verbosity(level: u8) -> Self {
        match level {
            0 => OutputMode::Normal,
            1 => OutputMode::Verbose,
            _ => OutputMode::VeryVerbose,
        }
    }

    /// Check if output should be shown at this mode
    pub fn should_show(&self, required: OutputMode) -> bool {
        use OutputMode::*;
        match (self, required) {
            (Quiet, _) => false,
            (Normal, Quiet | Normal) => true,
            (Verbose, Quiet | Normal | Verbose) => true,
            (VeryVerbose, _) => true,
            _ => false,
        }
    }
}

/// Print the end-of-run summary
pub fn print_summary(result: &InferenceResult, mode: OutputMode) {
    if !mode.should_show(OutputMode::Normal) {
        return;
    }

    let total = result.assigned.len();
    let assigned = result.assigned.iter().filter(|c| c.is_some()).count();
    let synthetic = result
        .assigned
        .iter()
        .filter(|c| c.as_ref().is_some_and(|c| c.synthetic))
        .count();

    println!("{}", "=".repeat(60));
    println!("Page Number Inference Summary");
    println!("{}", "=".repeat(60));
    println!("  Pages:       {}", total);
    println!("  Assigned:    {}", assigned);
    println!("  Synthesized: {}", synthetic);
    println!("  Runs:        {}", result.refined.len());
    println!(
        "  Classifier:  {}",
        if result.classifier_trained {
            "trained"
        } else {
            "skipped"
        }
    );
    println!("  Confidence:  {}%", (result.confidence * 100.0).round());
    println!("{}", "=".repeat(60));
}

/// Print per-page assignments at the highest verbosity
pub fn print_assignments(result: &InferenceResult, mode: OutputMode) {
    if !mode.should_show(OutputMode::VeryVerbose) {
        return;
    }
    for (assigned, &leaf) in result.assigned.iter().zip(result.leaf_nums.iter()) {
        match assigned {
            Some(c) => println!(
                "  leaf {:>4}  {}{}",
                leaf,
                c.value,
                if c.synthetic { " (synthesized)" } else { "" }
            ),
            None => println!("  leaf {:>4}  -", leaf),
        }
    }
}
