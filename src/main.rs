#[tokio::main]
async fn main() {
    if let Err(err) = otf_cli::run().await {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}
