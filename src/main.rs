use console::style;
use std::env;

fn main() {
    if env::args().len() > 1 {
        eprintln!(
            "docscrub es interactivo y no acepta argumentos. Ejecuta solo `cargo run` o el binario sin parámetros."
        );
        std::process::exit(1);
    }

    docscrub::logging::init();

    if let Err(error) = docscrub::app::run() {
        eprintln!("{}", style(error).red().bold());
        std::process::exit(1);
    }
}
