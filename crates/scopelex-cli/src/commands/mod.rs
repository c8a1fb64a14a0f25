use std::path::PathBuf;

use scopelex::Grammar;

mod nodes;
mod tokenize;

/// Subcommands for scopelex
#[derive(clap::Subcommand, Debug)]
pub enum Commands {
    /// Tokenize text with a grammar.
    Tokenize(tokenize::TokenizeArgs),

    /// Print a grammar's node table.
    Nodes(nodes::NodesArgs),
}

impl Commands {
    /// Run the subcommand.
    pub fn run(&self) -> Result<(), Box<dyn std::error::Error>> {
        match self {
            Commands::Tokenize(cmd) => cmd.run(),
            Commands::Nodes(cmd) => cmd.run(),
        }
    }
}

/// Grammar file arg group.
#[derive(clap::Args, Debug)]
pub struct GrammarArgs {
    /// JSON grammar definition file.
    #[arg(long, short)]
    pub grammar: PathBuf,

    /// Reject grammars with invalid regex patterns.
    #[arg(long)]
    pub strict: bool,
}

impl GrammarArgs {
    /// Load and build the grammar.
    pub fn load_grammar(&self) -> Result<Grammar, Box<dyn std::error::Error>> {
        log::info!("grammar: {}", self.grammar.display());
        let definition = scopelex::GrammarDefinition::from_json_file(&self.grammar)?;
        let options = scopelex::GrammarOptions::default().with_strict_patterns(self.strict);
        let grammar = Grammar::with_options(&definition, options)?;
        log::info!("{} nodes", grammar.nodes().len());
        Ok(grammar)
    }
}
