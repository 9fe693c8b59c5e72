use vanda_ui_lib::RunError;

#[tokio::main]
async fn main() {
    match vanda_ui_lib::run().await {
        Ok(()) => {}
        // Already on screen through the notifier
        Err(RunError::Reported(_)) => std::process::exit(1),
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(1);
        }
    }
}
