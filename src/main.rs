use anyhow::Result;

fn main() -> Result<()> {
    corpus_report::cli::run()
}
