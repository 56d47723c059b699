#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    village_certificate_server::run().await
}
