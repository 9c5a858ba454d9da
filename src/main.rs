//! keysh entry point.
//!
//! Usage: `keysh [--version | --dump-config]`

use keysh::config::Config;
use keysh::shell::Shell;

fn main() {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let config = Config::load();

    match args.first().map(String::as_str) {
        None => {}
        Some("--version") => {
            println!("keysh {}", env!("CARGO_PKG_VERSION"));
            return;
        }
        Some("--dump-config") => match config.to_toml() {
            Ok(text) => {
                print!("{text}");
                return;
            }
            Err(e) => {
                eprintln!("keysh: failed to render config: {e}");
                std::process::exit(1);
            }
        },
        Some(other) => {
            eprintln!("keysh: unknown argument: {other}");
            eprintln!("usage: keysh [--version | --dump-config]");
            std::process::exit(2);
        }
    }

    keysh::logging::init(&config.logging);

    let mut shell = match Shell::new(&config) {
        Ok(shell) => shell,
        Err(e) => {
            eprintln!("keysh: {e}");
            std::process::exit(1);
        }
    };

    // `shell` holds the terminal guard only inside run(), so the terminal is
    // already restored by the time we exit here
    let status = match shell.run() {
        Ok(status) => status,
        Err(e) => {
            eprintln!("keysh: {e}");
            1
        }
    };
    std::process::exit(status);
}
