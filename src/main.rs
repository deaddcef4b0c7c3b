#[tokio::main]
async fn main() -> std::io::Result<()> {
    data_cleaner_lib::run().await
}
