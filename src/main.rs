// src/main.rs

use spinguard::guard::ExitGuard;
use spinguard::terminal::{AnsiTerminal, SharedTerminal};
use spinguard::{cli, logging, run};

#[tokio::main]
async fn main() {
    let args = cli::parse();

    if let Err(err) = logging::init_logging(args.log_level) {
        eprintln!("spinguard error: {err:?}");
        std::process::exit(1);
    }

    let terminal = SharedTerminal::new(AnsiTerminal::stderr(args.progress.into()));
    let guard = match ExitGuard::new("spinguard", terminal).install() {
        Ok(guard) => guard,
        Err(err) => {
            eprintln!("spinguard error: {err}");
            std::process::exit(1);
        }
    };

    let code = match run(args, guard).await {
        Ok(code) => code,
        Err(err) => {
            eprintln!("spinguard error: {err:?}");
            1
        }
    };

    guard.exit(code)
}
