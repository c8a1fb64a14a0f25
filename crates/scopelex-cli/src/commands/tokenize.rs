use std::io::Write;

use scopelex::{Grammar, MatchOptions, NodeId, Token};

use crate::{
    commands::GrammarArgs,
    input_output::{InputArgs, OutputArgs},
    logging::LogArgs,
};

/// Output formats for the tokenize command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum TokenFormat {
    /// A JSON array of `[kind, from, to, opened?, closed?]` tuples.
    Json,

    /// One line per token, with type ids and the covered text.
    Text,
}

/// Args for the tokenize command.
#[derive(clap::Args, Debug)]
pub struct TokenizeArgs {
    #[command(flatten)]
    grammar: GrammarArgs,

    #[command(flatten)]
    input: InputArgs,

    #[command(flatten)]
    output: OutputArgs,

    #[arg(long, default_value = "json")]
    format: TokenFormat,

    /// Tokenize without looking past each scope's begin.
    #[arg(long)]
    incremental: bool,

    #[clap(flatten)]
    pub logging: LogArgs,
}

impl TokenizeArgs {
    /// Run the tokenize command.
    pub fn run(&self) -> Result<(), Box<dyn std::error::Error>> {
        self.logging.setup_logging(2)?;

        let grammar = self.grammar.load_grammar()?;
        let text = self.input.read_text()?;

        let options = MatchOptions::default().with_possibly_incomplete(self.incremental);
        let mut state = grammar.start_state();
        let tokens = grammar.tokenize_from(&mut state, &text, &options)?;
        log::info!("{} tokens; {} scopes open", tokens.len(), state.stack().len() - 1);

        let mut writer = self.output.open_writer()?;
        match self.format {
            TokenFormat::Json => {
                serde_json::to_writer(&mut writer, &tokens)?;
                writeln!(writer)?;
            }
            TokenFormat::Text => write_text(&mut writer, &grammar, &text, &tokens)?,
        }
        writer.flush()?;

        Ok(())
    }
}

fn type_name(
    grammar: &Grammar,
    id: NodeId,
) -> &str {
    grammar.node(id).map_or("?", |node| node.type_id.as_str())
}

fn write_text(
    writer: &mut dyn Write,
    grammar: &Grammar,
    text: &str,
    tokens: &[Token],
) -> Result<(), Box<dyn std::error::Error>> {
    for token in tokens {
        let kind = token.kind.map_or("-", |id| type_name(grammar, id));
        write!(writer, "{}..{}\t{kind}", token.from, token.to)?;
        for id in &token.opened_by {
            write!(writer, " +{}", type_name(grammar, *id))?;
        }
        for id in &token.closed_by {
            write!(writer, " -{}", type_name(grammar, *id))?;
        }
        writeln!(writer, "\t{:?}", &text[token.range()])?;
    }
    Ok(())
}
