use clap::Parser;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Food or cuisine to ask about straight away
    pub topic: Option<String>,

    /// Calorie target; together with TOPIC this answers both questions and
    /// prints the recommendation without entering the chat loop
    #[arg(short, long, requires = "topic")]
    pub calories: Option<String>,

    /// Model to use (overrides the config file)
    #[arg(short, long)]
    pub model: Option<String>,

    /// Acknowledge the outbound-call disclosure without prompting
    #[arg(short, long)]
    pub yes: bool,
}
