use anyhow::Result;

mod app;
mod logging;

fn main() -> Result<()> {
    let args = reorg::cli::parse();
    app::run(args)
}
