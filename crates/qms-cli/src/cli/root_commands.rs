use clap::{Args, Subcommand};

/// Top-level commands of the `qms` binary.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Per-section progress and score, in navigator order
    Progress(AssessmentArgs),

    /// Overall score summary and section status counts
    Score(AssessmentArgs),

    /// Record or change one answer and save it
    Answer(AnswerArgs),
}

#[derive(Debug, Args)]
pub struct AssessmentArgs {
    /// Assessment ID
    #[arg(short, long)]
    pub assessment: String,
}

#[derive(Debug, Args)]
pub struct AnswerArgs {
    /// Assessment ID
    #[arg(short, long)]
    pub assessment: String,

    /// Question ID
    pub question: String,

    /// Compliance score (1-3)
    #[arg(long, value_parser = clap::value_parser!(u8).range(1..=3), conflicts_with = "clear_score")]
    pub score: Option<u8>,

    /// Remove the current score
    #[arg(long)]
    pub clear_score: bool,

    /// Free-text justification
    #[arg(long)]
    pub justification: Option<String>,

    /// Leaf section the question belongs to
    #[arg(long)]
    pub section: Option<String>,
}
