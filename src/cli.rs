//! Command line interface definitions

use crate::classify::ClassifierKind;
use crate::infer::{InferenceOptions, PASS1_DENSITY_THRESHOLD, PASS2_DENSITY_THRESHOLD};
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Which classifier the second pass trains
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum ClassifierChoice {
    /// Gaussian naive Bayes
    #[default]
    Naivebayes,
    /// L2-regularized logistic regression
    Logisticregression,
}

impl From<ClassifierChoice> for ClassifierKind {
    fn from(choice: ClassifierChoice) -> Self {
        match choice {
            ClassifierChoice::Naivebayes => ClassifierKind::NaiveBayes,
            ClassifierChoice::Logisticregression => ClassifierKind::LogisticRegression,
        }
    }
}

/// Infer printed page numbers for a scanned book from its hOCR file
#[derive(Debug, Parser)]
#[command(name = "hocr-pagenum", version, about)]
pub struct Cli {
    /// hOCR input file
    pub infile: PathBuf,

    /// JSON output file; stdout when omitted
    #[arg(short, long)]
    pub outfile: Option<PathBuf>,

    /// Scandata XML listing leaves absent from access formats
    #[arg(long)]
    pub scandata: Option<PathBuf>,

    /// Classifier trained between the passes
    #[arg(long, value_enum, default_value = "naivebayes")]
    pub classifier: ClassifierChoice,

    /// Skip the classifier-filtered second pass
    #[arg(long)]
    pub one_pass: bool,

    /// Sequence parking threshold for pass 1
    #[arg(long, default_value_t = PASS1_DENSITY_THRESHOLD)]
    pub pass1_threshold: f64,

    /// Sequence parking threshold for pass 2
    #[arg(long, default_value_t = PASS2_DENSITY_THRESHOLD)]
    pub pass2_threshold: f64,

    /// Back-fill and forward-fill page numbers towards the document edges
    #[arg(long)]
    pub opportunistic_fill: bool,

    /// Identifier recorded in the output document
    #[arg(long)]
    pub identifier: Option<String>,

    /// Increase output verbosity (repeatable)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress all console output
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,
}

impl Cli {
    /// Engine options derived from the arguments
    pub fn inference_options(&self) -> InferenceOptions {
        InferenceOptions {
            classifier: self.classifier.into(),
            two_pass: !self.one_pass,
            pass1_threshold: self.pass1_threshold,
            pass2_threshold: self.pass2_threshold,
            opportunistic_fill: self.opportunistic_fill,
        }
    }
}
