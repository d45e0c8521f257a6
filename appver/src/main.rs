use appver::cli;
use human_panic::setup_panic;
use polyfmt::error;

fn main() {
    setup_panic!();

    let cli = match cli::Cli::new() {
        Ok(cli) => cli,
        Err(e) => {
            error!("{:?}", e);
            std::process::exit(1)
        }
    };

    if let Err(e) = cli.run() {
        error!("{:?}", e);
        std::process::exit(1)
    }
}
