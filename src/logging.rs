use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "warn";

/// Inicializa el registro de diagnóstico en stderr, filtrado por `RUST_LOG`.
pub fn init() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    // Un suscriptor ya instalado (por ejemplo en pruebas) no es un error.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
