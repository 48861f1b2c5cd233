use axum::Router;

/// A business module that contributes HTTP routes.
///
/// Each module (production, inventory, labels, alerts, clients) implements
/// this trait; the server binary collects all modules and merges their
/// routers into the application. Routers carry their own `/{module}/v1`
/// prefix.
pub trait Module: Send + Sync {
    /// Module name, used for logging.
    fn name(&self) -> &str;

    /// The module's routes, already prefixed.
    fn routes(&self) -> Router;
}
