use std::io::Write;

use crate::{commands::GrammarArgs, input_output::OutputArgs, logging::LogArgs};

/// Args for the nodes command.
#[derive(clap::Args, Debug)]
pub struct NodesArgs {
    #[command(flatten)]
    grammar: GrammarArgs,

    #[command(flatten)]
    output: OutputArgs,

    #[clap(flatten)]
    pub logging: LogArgs,
}

impl NodesArgs {
    /// Run the nodes command.
    pub fn run(&self) -> Result<(), Box<dyn std::error::Error>> {
        self.logging.setup_logging(2)?;

        let grammar = self.grammar.load_grammar()?;
        let mut writer = self.output.open_writer()?;

        for node in grammar.nodes() {
            if node.props.is_empty() {
                writeln!(writer, "{}\t{}", node.id.index(), node.type_id)?;
            } else {
                writeln!(
                    writer,
                    "{}\t{}\t{}",
                    node.id.index(),
                    node.type_id,
                    serde_json::to_string(&node.props)?
                )?;
            }
        }
        writer.flush()?;

        Ok(())
    }
}
