//! Interface bindings with singleton-locator.
//!
//! Demonstrates the **contract-based** pattern:
//! - Define traits (contracts) that specify behavior
//! - Bind a concrete implementation to `dyn Trait` at bootstrap
//! - Consumers depend on the contract only
//!
//! Run with: `cargo run --example interface_bindings`

use singleton_locator::define_locator;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

define_locator!(services);

/// Contract for a logging service.
trait Logger: Send + Sync {
    fn log(&self, message: &str);
    fn name(&self) -> &str;
}

/// Contract for a notification service.
trait Notifier: Send + Sync {
    fn notify(&self, recipient: &str, message: &str);
}

struct ConsoleLogger;

impl Logger for ConsoleLogger {
    fn log(&self, message: &str) {
        println!("[CONSOLE] {}", message);
    }

    fn name(&self) -> &str {
        "ConsoleLogger"
    }
}

struct EmailNotifier {
    smtp_server: String,
}

impl Notifier for EmailNotifier {
    fn notify(&self, recipient: &str, message: &str) {
        println!("[EMAIL via {}] To: {} - {}", self.smtp_server, recipient, message);
    }
}

struct SignupFlow {
    logger: singleton_locator::Inject<dyn Logger, services::Api>,
    notifier: singleton_locator::Inject<dyn Notifier, services::Api>,
}

impl SignupFlow {
    fn new() -> Self {
        Self {
            logger: services::bind(),
            notifier: services::bind(),
        }
    }

    fn run(&self, user: &str) -> Result<(), singleton_locator::LocatorError> {
        let logger = self.logger.get()?;
        logger.log(&format!("signing up {} (logger: {})", user, logger.name()));
        self.notifier.get()?.notify(user, "Welcome aboard!");
        Ok(())
    }
}

fn main() -> Result<(), singleton_locator::LocatorError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!("=== Singleton Locator: Interface Bindings ===\n");

    // Lazily created implementation bound to its contract
    services::provide_arc::<dyn Logger, _>(|| Arc::new(ConsoleLogger));

    // Pre-built implementation registered under its contract
    let notifier: Arc<dyn Notifier> = Arc::new(EmailNotifier {
        smtp_server: "smtp.example.com".to_string(),
    });
    services::add_instance_arc(notifier)?;

    SignupFlow::new().run("alice@example.com")?;

    println!("\n=== Done ===");
    Ok(())
}
