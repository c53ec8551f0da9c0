use log::LevelFilter;
use simple_logger::SimpleLogger;

fn main() -> eyre::Result<()> {
    SimpleLogger::new()
        .with_level(LevelFilter::Info)
        .env()
        .init()?;

    let config = match detect_sv::parse(std::env::args_os()) {
        Ok(config) => config,
        Err(err) => {
            err.report();
            std::process::exit(err.exit_code());
        }
    };

    log::info!("Using params:\n{config}");

    Ok(())
}
