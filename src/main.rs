use anyhow::Result;

mod app;
mod logging;

fn main() -> Result<()> {
    let args = tmpalloc::cli::parse();
    app::run(args)
}
