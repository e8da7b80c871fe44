mod config;
mod driver;
mod hardware;
mod io;
mod kernel;
mod logger;

use anyhow::Context;

use config::Config;
use driver::Driver;

fn main() -> anyhow::Result<()> {
    let config = Config::from_args(std::env::args().skip(1)).context("invalid arguments")?;
    logger::init(config.verbose).context("failed to install logger")?;

    let mut driver = Driver::new(&config);
    let stats = driver.start()?;

    println!("Stats for executed processes ({} scheduling):", config.scheduling);
    driver::print_stats(&stats);

    Ok(())
}
